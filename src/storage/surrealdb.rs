use crate::config::config::DatabaseConfig;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};

/// SurrealDB connection pool
///
/// The underlying client multiplexes over one connection and is cheap to
/// clone; this wrapper owns the connect/signin/namespace handshake.
#[derive(Clone)]
pub struct SurrealPool {
    db: Surreal<Any>,
    config: DatabaseConfig,
}

impl SurrealPool {
    /// Connect and authenticate a new pool
    pub async fn new(config: DatabaseConfig) -> Result<Self, surrealdb::Error> {
        let db: Surreal<Any> = connect(config.url.as_str()).await?;

        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db, config })
    }

    /// Get a database handle
    pub fn db(&self) -> Surreal<Any> {
        self.db.clone()
    }

    /// Connection configuration
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}
