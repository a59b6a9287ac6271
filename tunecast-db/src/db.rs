use turso::{Builder, Connection, Database};

pub struct DatabaseConfig<'a> {
    url: &'a str,
}

impl<'a> DatabaseConfig<'a> {
    pub fn new(url: &'a str) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &str {
        self.url
    }
}

pub struct CatalogDatabase {
    db: Database,
}

impl CatalogDatabase {
    pub async fn new(config: &DatabaseConfig<'_>) -> anyhow::Result<Self> {
        let db = Builder::new_local(config.url())
            .build()
            .await
            .map_err(|e| anyhow::anyhow!("open {}: {}", config.url(), e))?;

        // Enable WAL mode for better performance
        let conn = db.connect().map_err(anyhow::Error::from)?;
        conn.pragma_update("journal_mode", "wal").await?;

        Ok(Self { db })
    }

    pub fn connect(&self) -> anyhow::Result<Connection> {
        self.db.connect().map_err(anyhow::Error::from)
    }
}
