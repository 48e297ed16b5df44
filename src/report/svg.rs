use crate::report::escape_html;

// ============================================================================
// Inline SVG charts: no scripts, no external assets
// ============================================================================

const WIDTH: f64 = 860.0;
const HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 160.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 48.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#d62728", "#2ca02c", "#ff7f0e", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// One line of a line chart. `values[i]` belongs to `x_labels[i]`; `None`
/// leaves a gap in the markers but the line joins the present points.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Color for a named series. Pass/fail keep their conventional colors.
pub fn series_color(name: &str, index: usize) -> &'static str {
    match name {
        "PASSED" => "#4CAF50",
        "FAILED" => "#f44336",
        _ => PALETTE[index % PALETTE.len()],
    }
}

/// Line chart with markers, one polyline per series and a legend on the
/// right.
pub fn line_chart(title: &str, y_label: &str, x_labels: &[String], series: &[Series]) -> String {
    let max_value = series
        .iter()
        .flat_map(|s| s.values.iter().flatten())
        .fold(0.0_f64, |acc, v| acc.max(*v));
    let y_max = nice_max(max_value);

    let mut body = String::new();
    body.push_str(&axes(title, y_label, y_max));

    for (i, label) in x_labels.iter().enumerate() {
        let x = x_position(i, x_labels.len());
        body.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" class=\"tick\" text-anchor=\"middle\">{label}</text>\n",
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            label = escape_html(label),
        ));
    }

    for (index, s) in series.iter().enumerate() {
        let color = series_color(&s.name, index);
        let points: Vec<(f64, f64)> = s
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (x_position(i, x_labels.len()), y_position(v, y_max))))
            .collect();

        let path = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        body.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" points=\"{path}\" />\n"
        ));
        for (x, y) in &points {
            body.push_str(&format!(
                "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3.5\" fill=\"{color}\" />\n"
            ));
        }

        let legend_y = MARGIN_TOP + 16.0 * index as f64;
        let legend_x = WIDTH - MARGIN_RIGHT + 16.0;
        body.push_str(&format!(
            "<rect x=\"{legend_x:.1}\" y=\"{ry:.1}\" width=\"10\" height=\"10\" fill=\"{color}\" />\n<text x=\"{tx:.1}\" y=\"{ty:.1}\" class=\"legend\">{name}</text>\n",
            ry = legend_y - 9.0,
            tx = legend_x + 14.0,
            ty = legend_y,
            name = escape_html(&s.name),
        ));
    }

    wrap(&body)
}

/// Vertical bar chart, one bar per `(label, value)`.
pub fn bar_chart(title: &str, y_label: &str, bars: &[(String, f64)]) -> String {
    let max_value = bars.iter().fold(0.0_f64, |acc, (_, v)| acc.max(*v));
    let y_max = nice_max(max_value);

    let mut body = String::new();
    body.push_str(&axes(title, y_label, y_max));

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let slot = plot_width / bars.len().max(1) as f64;
    let bar_width = (slot * 0.6).min(80.0);

    for (i, (label, value)) in bars.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let top = y_position(*value, y_max);
        body.push_str(&format!(
            "<rect x=\"{x:.1}\" y=\"{top:.1}\" width=\"{bar_width:.1}\" height=\"{h:.1}\" fill=\"{color}\"><title>{label}: {value:.2}</title></rect>\n",
            x = center - bar_width / 2.0,
            h = HEIGHT - MARGIN_BOTTOM - top,
            color = PALETTE[0],
            label = escape_html(label),
        ));
        body.push_str(&format!(
            "<text x=\"{center:.1}\" y=\"{y:.1}\" class=\"tick\" text-anchor=\"middle\">{label}</text>\n",
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            label = escape_html(label),
        ));
    }

    wrap(&body)
}

fn wrap(body: &str) -> String {
    format!(
        "<svg class=\"chart\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\">\n{body}</svg>\n"
    )
}

/// Title, y axis with three gridlines, x baseline.
fn axes(title: &str, y_label: &str, y_max: f64) -> String {
    let mut out = format!(
        "<text x=\"{MARGIN_LEFT}\" y=\"20\" class=\"title\">{}</text>\n",
        escape_html(title)
    );

    for step in 0..=2 {
        let value = y_max * step as f64 / 2.0;
        let y = y_position(value, y_max);
        out.push_str(&format!(
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{x2:.1}\" y2=\"{y:.1}\" class=\"grid\" />\n<text x=\"{tx:.1}\" y=\"{ty:.1}\" class=\"tick\" text-anchor=\"end\">{value}</text>\n",
            x2 = WIDTH - MARGIN_RIGHT,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
            value = trim_number(value),
        ));
    }

    out.push_str(&format!(
        "<text x=\"14\" y=\"{y:.1}\" class=\"tick\" transform=\"rotate(-90 14 {y:.1})\" text-anchor=\"middle\">{label}</text>\n",
        y = MARGIN_TOP + (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
        label = escape_html(y_label),
    ));
    out
}

fn x_position(index: usize, count: usize) -> f64 {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    if count <= 1 {
        MARGIN_LEFT + plot_width / 2.0
    } else {
        MARGIN_LEFT + plot_width * index as f64 / (count - 1) as f64
    }
}

fn y_position(value: f64, y_max: f64) -> f64 {
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    HEIGHT - MARGIN_BOTTOM - plot_height * (value / y_max)
}

/// Round the axis maximum up so gridlines land on readable values.
fn nice_max(max_value: f64) -> f64 {
    if max_value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max_value.log10().floor());
    let scaled = max_value / magnitude;
    let nice = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
