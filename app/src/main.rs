use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod compare;
mod figures;
mod timeseries;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Extra tracing directives, e.g. "common=debug"
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate throughput figures from fio JSON summaries
    Figures {
        /// Root directory holding one subdirectory per dataset
        #[arg(short, long, default_value = "json")]
        input: PathBuf,
        /// Directory the figures are written to
        #[arg(short, long, default_value = "figures")]
        figures: PathBuf,
    },
    /// Generate bandwidth-over-time figures and print series statistics
    Timeseries {
        /// Directory of fio bandwidth logs
        #[arg(short, long, default_value = "json_throughput_log")]
        input: PathBuf,
        /// Directory the figures are written to
        #[arg(short, long, default_value = "figures")]
        figures: PathBuf,
    },
    /// Compare the optimized luks2flt driver against BitLocker and VeraCrypt
    Compare {
        /// Root directory holding one subdirectory per dataset
        #[arg(short, long, default_value = "json")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();

    let mut env_filter = EnvFilter::new(format!("fio_report={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in ["common", "plot_common", "bw_blocksize", "bw_over_time"] {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();

    let result = match args.command {
        Commands::Figures { input, figures } => figures::generate(&input, &figures),
        Commands::Timeseries { input, figures } => timeseries::generate(&input, &figures),
        Commands::Compare { input } => compare::run(&input),
    };
    if let Err(err) = result {
        error!("{err:#?}");
        return Err(err);
    }

    Ok(())
}
