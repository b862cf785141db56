use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller identity derived from bearer token claims.
/// Every read and write is narrowed to one of these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub tenant_id: Uuid,
    pub store_id: Uuid,
}

/// Which claim a table is filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Tenant,
    Store,
}

impl Scope {
    pub fn new(tenant_id: Uuid, store_id: Uuid) -> Self {
        Self { tenant_id, store_id }
    }

    pub fn value(&self, kind: ScopeKind) -> Uuid {
        match kind {
            ScopeKind::Tenant => self.tenant_id,
            ScopeKind::Store => self.store_id,
        }
    }
}

/// Effective pagination window after defaulting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const MAX_LIMIT: i64 = 50_000;

    /// Absent or oversized limits fall back to `MAX_LIMIT`; smaller limits are kept as-is.
    /// Absent offsets start at zero.
    pub fn resolve(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(limit) if limit <= Self::MAX_LIMIT => limit,
            _ => Self::MAX_LIMIT,
        };

        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}
