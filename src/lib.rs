pub mod api;
pub mod config;
pub mod db;
pub mod storage;

pub use db::DbPool;

use config::Config;
use storage::PhotoStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub photos: PhotoStore,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let photos = PhotoStore::new(
            config.storage.upload_dir.clone(),
            config.storage.max_upload_bytes,
        );
        Self { config, db, photos }
    }
}
