use clap::Parser;
use junit_dashboard::cli::commands::{build_filter, cmd_dashboard, cmd_extract};
use junit_dashboard::cli::config::{Cli, Commands, load_config, verbosity_filter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so console reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    match cli.command {
        Commands::Extract {
            input,
            output,
            marker,
            project,
        } => {
            let input = input.unwrap_or(config.extract.input_dir);
            let output = output.unwrap_or(config.extract.output);
            let marker = marker.unwrap_or(config.extract.marker);
            let project = project.or(config.extract.project);
            cmd_extract(&input, &output, &marker, project.as_deref())?;
        }
        Commands::Dashboard {
            data,
            projects,
            suites,
            from,
            to,
            format,
            output,
        } => {
            let data = data.unwrap_or(config.dashboard.data);
            let format = format.unwrap_or(config.dashboard.format);
            let output = output.or(config.dashboard.output);
            let filter = build_filter(&projects, &suites, from.as_deref(), to.as_deref())?;
            cmd_dashboard(
                &data,
                &filter,
                &format,
                output.as_deref(),
                config.dashboard.date_formats,
            )?;
        }
    }

    Ok(())
}
