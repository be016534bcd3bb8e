pub mod capability;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod service;

pub use capability::Capability;
pub use config::CoachConfig;
pub use error::{CoachError, Result};
pub use model::{
    Avatar, Batch, BatchId, BatchStatus, CoachingContext, CoachingRole, NewBatch, Teacher,
    UserContext,
};
pub use query::{BatchFilter, BatchQuery};
pub use service::{BatchService, Fixture, HttpBatchService, MemoryBatchService};
