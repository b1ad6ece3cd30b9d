// Command line client for the tennis club site: member sessions, court
// reservations and the weekly class schedule.
use clap::Parser;
use dotenv::dotenv;
use log::{debug, error, info};
use std::{process::exit, sync::Arc};

use courtside::api::ApiClient;
use courtside::cli::{self, Cli};
use courtside::config::Config;
use courtside::session::{AdminSessionStore, SessionContext};
use courtside::storage::FileStorage;
use courtside::types::SharedStorage;
use courtside::util;

#[tokio::main]
async fn main() {
    dotenv().ok();
    util::init_logging();

    let cli = Cli::parse();
    let config = Config::from_env();

    let storage: SharedStorage = match FileStorage::open(&config.data_dir) {
        Ok(storage) => {
            debug!("Using storage at {}", storage.path().display());
            Arc::new(storage)
        }
        Err(e) => {
            eprintln!("Cannot open data directory {}: {e}", config.data_dir.display());
            exit(1)
        }
    };

    let session = SessionContext::new(storage.clone());
    let admin = AdminSessionStore::new(storage.clone());
    let client = ApiClient::new(config.api_url.as_str(), session.clone(), admin);

    let mut changes = session.subscribe();
    info!("Backend at {}", client.base_url());

    if let Err(e) = cli::run(cli, &client, storage).await {
        error!("{e}");
        eprintln!("{e}");
        exit(1)
    }

    if changes.has_changed().unwrap_or(false) {
        match changes.borrow_and_update().as_ref() {
            Some(session) => debug!("Session now held by {}", session.user.full_name()),
            None => debug!("Session cleared"),
        }
    }
}
