use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use tunecast_db::db::{CatalogDatabase, DatabaseConfig};

use crate::media::session::TrackResolver;

static APP_DB: OnceLock<CatalogDatabase> = OnceLock::new();

pub(crate) async fn init_app_db(url: &str) -> anyhow::Result<()> {
    let config = DatabaseConfig::new(url);
    let db = CatalogDatabase::new(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to init app db: {:?}", e))?;
    APP_DB
        .set(db)
        .map_err(|_| anyhow::anyhow!("Failed to set APP_DB"))?;
    Ok(())
}

fn get_app_db() -> anyhow::Result<&'static CatalogDatabase> {
    APP_DB
        .get()
        .ok_or_else(|| anyhow::anyhow!("APP_DB not initialized"))
}

pub(crate) fn app_db_conn() -> anyhow::Result<turso::Connection> {
    get_app_db()?.connect()
}

/// Resolves track ids against the catalog database.
pub(crate) struct DbTrackResolver;

#[async_trait]
impl TrackResolver for DbTrackResolver {
    async fn resolve(&self, track_id: i64) -> anyhow::Result<Option<PathBuf>> {
        let conn = app_db_conn()?;
        let track = tunecast_db::track::by_id(track_id, &conn).await?;
        Ok(track.map(|t| PathBuf::from(t.path)))
    }
}
