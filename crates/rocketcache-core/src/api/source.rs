use async_trait::async_trait;

use super::ApiError;
use crate::models::Rocket;

/// Read-only remote catalog the store pulls records from.
///
/// `ApiClient` is the HTTP implementation; tests plug in fakes.
#[async_trait]
pub trait RocketSource: Send + Sync {
    /// Fetch the whole remote collection.
    async fn fetch_rockets(&self) -> Result<Vec<Rocket>, ApiError>;

    /// Fetch a single record by identifier.
    async fn fetch_rocket(&self, id: &str) -> Result<Rocket, ApiError>;
}
