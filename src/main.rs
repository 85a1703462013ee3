use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use log::{debug, error, info};
use tokio::sync::Mutex;

use newsdesk::{
    sample_articles, App, ArticleStore, Cli, Config, FileBackend, GeminiGenerator, Result,
};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    debug!("Logger initialized");
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    info!("Using data directory {}", config.data_dir.display());
    let mut store = ArticleStore::with_key(
        FileBackend::new(&config.data_dir),
        sample_articles(),
        config.storage_key.clone(),
    );
    store.load();

    let mut app = App::new(
        Arc::new(Mutex::new(store)),
        config.clone(),
        config_path,
        cli.verbose,
    );

    match GeminiGenerator::from_config(&config) {
        Ok(generator) => app = app.with_generator(Arc::new(generator)),
        Err(e) => debug!("Draft generation unavailable: {}", e),
    }

    app.run(cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
