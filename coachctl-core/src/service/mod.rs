//! Batch data access
//!
//! The screens only talk to [`BatchService`]; the HTTP client and the
//! in-memory store are interchangeable behind it.

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Batch, BatchId, BatchStatus, NewBatch};

pub use http::HttpBatchService;
pub use memory::{Fixture, MemoryBatchService};

/// Batch data-access contract
#[async_trait]
pub trait BatchService: Send + Sync {
    /// All batches of a coaching in server order, optionally narrowed by status
    async fn list_batches(
        &self,
        coaching_id: &str,
        status: Option<BatchStatus>,
    ) -> Result<Vec<Batch>>;

    /// Batches the calling identity is assigned to
    async fn get_my_batches(&self, coaching_id: &str) -> Result<Vec<Batch>>;

    /// Create a batch and return it as stored
    async fn create_batch(&self, coaching_id: &str, draft: NewBatch) -> Result<Batch>;

    /// Fetch a single batch
    async fn get_batch(&self, coaching_id: &str, batch_id: &BatchId) -> Result<Batch>;

    /// Archive or unarchive a batch
    async fn set_batch_status(
        &self,
        coaching_id: &str,
        batch_id: &BatchId,
        status: BatchStatus,
    ) -> Result<Batch>;
}
