use anyhow::Result;
use clap::Parser;

use blogtl_cli::cli::commands::{init, logs, targets, translate};
use blogtl_cli::cli::{Args, Command};
use blogtl_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    output::init(OutputConfig::from_flags(args.quiet, args.no_color));

    match args.command {
        Some(Command::Targets) => {
            targets::print_targets()?;
        }
        Some(Command::Init { force }) => {
            init::run_init(force)?;
        }
        Some(Command::Logs { limit, db }) => {
            logs::print_logs(limit, db.as_deref())?;
        }
        None => {
            let options = translate::TranslateOptions {
                target: args.target,
                force: args.force,
                last: args.last,
                to: args.to,
                endpoint: args.endpoint,
                db: args.db,
                no_metrics: args.no_metrics,
            };
            let summary = translate::run_translate(options).await?;
            if !summary.is_success() {
                output::flush_stderr();
                std::process::exit(exitcode::SOFTWARE);
            }
        }
    }

    Ok(())
}
