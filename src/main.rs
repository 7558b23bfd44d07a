use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{error, info};

use equity_swap::api::{SharedStore, run_http_server};
use equity_swap::cli::{Cli, Command, run_calc};
use equity_swap::settings::{JsonFileStore, SettingsStore};

#[tokio::main]
async fn main() {
    equity_swap::logging::init_logging();

    match Cli::parse().command {
        Command::Serve {
            port,
            settings_file,
        } => {
            let store = JsonFileStore::open(settings_file);
            info!(path = %store.path().display(), "using settings file");
            let store: Box<dyn SettingsStore + Send> = Box::new(store);
            let store: SharedStore = Arc::new(Mutex::new(store));
            if let Err(e) = run_http_server(port, store).await {
                error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        Command::Calc(args) => match run_calc(&args) {
            Ok(report) => print!("{report}"),
            Err(msg) => {
                eprintln!("{msg}");
                std::process::exit(1);
            }
        },
    }
}
