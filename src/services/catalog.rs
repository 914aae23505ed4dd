//! Vehicle catalog lookup.
//!
//! The catalog itself (CRUD, search, ingestion) lives elsewhere; this service
//! only enriches a turn's selected vehicle ids with display data.

use async_trait::async_trait;
use surrealdb::{Surreal, engine::any::Any};

use crate::error::Result;
use crate::models::vehicle::Vehicle;

/// Catalog lookup trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleCatalog: Send + Sync {
    /// Fetch vehicle records by catalog id; unknown ids are simply absent
    async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<Vehicle>>;
}

/// SurrealDB-backed catalog lookup
#[derive(Clone)]
pub struct SurrealVehicleCatalog {
    db: Surreal<Any>,
}

impl SurrealVehicleCatalog {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleCatalog for SurrealVehicleCatalog {
    async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = "SELECT * FROM vehicle WHERE id IN $ids";
        let result: Vec<Vehicle> = self
            .db
            .query(query)
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;

        tracing::debug!("resolved {} of {} selected vehicles", result.len(), ids.len());
        Ok(result)
    }
}

/// Create the catalog lookup service
pub fn create_vehicle_catalog(db: Surreal<Any>) -> Box<dyn VehicleCatalog> {
    Box::new(SurrealVehicleCatalog::new(db))
}
