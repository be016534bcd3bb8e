//! Which batches to fetch, given who is asking and what filter is selected

use std::fmt;

use crate::capability::Capability;
use crate::error::Result;
use crate::model::{Batch, BatchStatus};
use crate::service::BatchService;

/// Filter chip selection on the batches list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BatchFilter {
    #[default]
    All,
    Active,
    Archived,
}

impl BatchFilter {
    /// Chip order
    pub const ALL: [BatchFilter; 3] = [BatchFilter::All, BatchFilter::Active, BatchFilter::Archived];

    /// Status constraint this filter maps to (`All` means none)
    pub fn status(&self) -> Option<BatchStatus> {
        match self {
            BatchFilter::All => None,
            BatchFilter::Active => Some(BatchStatus::Active),
            BatchFilter::Archived => Some(BatchStatus::Archived),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatchFilter::All => "All",
            BatchFilter::Active => "Active",
            BatchFilter::Archived => "Archived",
        }
    }

    /// Next chip, wrapping around
    pub fn next(&self) -> Self {
        match self {
            BatchFilter::All => BatchFilter::Active,
            BatchFilter::Active => BatchFilter::Archived,
            BatchFilter::Archived => BatchFilter::All,
        }
    }
}

impl From<Option<BatchStatus>> for BatchFilter {
    fn from(status: Option<BatchStatus>) -> Self {
        match status {
            None => BatchFilter::All,
            Some(BatchStatus::Active) => BatchFilter::Active,
            Some(BatchStatus::Archived) => BatchFilter::Archived,
        }
    }
}

impl fmt::Display for BatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved fetch: either the coaching's batches or the caller's own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchQuery {
    /// Admin view, optionally narrowed by status
    Coaching { status: Option<BatchStatus> },
    /// Batches the caller is assigned to; filters do not apply
    Assigned,
}

impl BatchQuery {
    pub fn resolve(capability: Capability, filter: BatchFilter) -> Self {
        match capability {
            Capability::Admin => BatchQuery::Coaching {
                status: filter.status(),
            },
            Capability::Member => BatchQuery::Assigned,
        }
    }

    pub async fn run(&self, service: &dyn BatchService, coaching_id: &str) -> Result<Vec<Batch>> {
        match self {
            BatchQuery::Coaching { status } => service.list_batches(coaching_id, *status).await,
            BatchQuery::Assigned => service.get_my_batches(coaching_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_status_mapping() {
        assert_eq!(BatchFilter::All.status(), None);
        assert_eq!(BatchFilter::Active.status(), Some(BatchStatus::Active));
        assert_eq!(BatchFilter::Archived.status(), Some(BatchStatus::Archived));

        for filter in BatchFilter::ALL {
            assert_eq!(BatchFilter::from(filter.status()), filter);
        }
    }

    #[test]
    fn test_filter_cycles() {
        let mut filter = BatchFilter::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(filter);
            filter = filter.next();
        }
        assert_eq!(seen, BatchFilter::ALL.to_vec());
        assert_eq!(filter, BatchFilter::All);
    }

    #[test]
    fn test_admin_query_follows_filter() {
        assert_eq!(
            BatchQuery::resolve(Capability::Admin, BatchFilter::All),
            BatchQuery::Coaching { status: None }
        );
        assert_eq!(
            BatchQuery::resolve(Capability::Admin, BatchFilter::Archived),
            BatchQuery::Coaching {
                status: Some(BatchStatus::Archived)
            }
        );
    }

    #[test]
    fn test_member_query_ignores_filter() {
        for filter in BatchFilter::ALL {
            assert_eq!(
                BatchQuery::resolve(Capability::Member, filter),
                BatchQuery::Assigned
            );
        }
    }
}
