//! Wiring & DI. Entry point: bootstrap storage, open the store, run the UI.
//! No business logic here.

use careflow::adapters::persistence::{JsonFileStorage, MemoryStorage};
use careflow::adapters::ui::tui::TuiInputPort;
use careflow::domain::seed_state;
use careflow::ports::{InputPort, KeyValuePort};
use careflow::shared::config::{AppConfig, StorageKind};
use careflow::usecases::{CareStore, SessionService, SnapshotPersistence};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv::dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    careflow::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration; using defaults");
        AppConfig::default()
    });

    // --- Storage backend (key-value; holds both the snapshot and the session flag) ---
    let data_dir = cfg.data_dir_or_default();
    let storage: Arc<dyn KeyValuePort> = match cfg.storage {
        StorageKind::File => {
            let path = cfg.storage_path();
            let file = JsonFileStorage::open(&path)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let abs = file
                .path()
                .canonicalize()
                .unwrap_or_else(|_| file.path().to_path_buf());
            info!(path = %abs.display(), "file storage");
            Arc::new(file)
        }
        StorageKind::Memory => {
            warn!("memory storage: nothing will survive this session");
            Arc::new(MemoryStorage::new())
        }
    };

    // --- Store: seed, then stored snapshot if readable; commits flow to the worker ---
    let mut seed = seed_state(chrono::Utc::now().timestamp_millis());
    if let Some(name) = cfg.user_name() {
        seed.user_name = name.to_string();
    }
    let persistence = Arc::new(SnapshotPersistence::new(Arc::clone(&storage)));
    let (store, worker) = CareStore::open(seed, persistence).await;
    let store = Arc::new(store);
    let worker_handle = tokio::spawn(worker.run());

    let session = Arc::new(SessionService::new(Arc::clone(&storage)));
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&store),
        session,
        data_dir,
    ));

    let result = input_port.run().await;

    // Dropping the last store handle closes the channel; let the worker flush what is queued.
    drop(input_port);
    drop(store);
    if let Err(e) = worker_handle.await {
        warn!(error = %e, "persistence worker did not shut down cleanly");
    }

    result.map_err(|e| anyhow::anyhow!("{}", e))
}
