use clap::Parser;
use hwdash::config::{load_config, Config};
use hwdash::display::render_summary;
use hwdash::{SummaryService, SysfsProvider, TtlCache};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Hardware summary for the local machine
#[derive(Parser, Debug)]
#[command(name = "hwdash", version, about)]
struct Args {
    /// Config file to use instead of the default search path
    #[arg(short, long)]
    config: Option<String>,

    /// Print the summary again every N seconds, reading through the cache
    #[arg(short, long, value_name = "SECS")]
    watch: Option<u64>,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("hwdash: {}", err);
            process::exit(1);
        }
    };
    init_tracing(&config);

    let provider = Arc::new(SysfsProvider::new(config.root_path()));
    let service = SummaryService::new(Arc::new(TtlCache::new()), provider, config.ttl());

    let summary = service.summary();
    print!("{}", render_summary(&config, &summary));

    let Some(interval) = args.watch else {
        return;
    };
    let interval = Duration::from_secs(interval.max(1));
    info!(interval_secs = interval.as_secs(), "watching");
    loop {
        thread::sleep(interval);
        let summary = service.summary();
        println!("{}", "-".repeat(40));
        print!("{}", render_summary(&config, &summary));
    }
}
