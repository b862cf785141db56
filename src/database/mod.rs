pub mod manager;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;
pub mod scope;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgRepository;
pub use repository::Repository;
pub use scope::{Page, Scope, ScopeKind};

#[cfg(test)]
pub use repository::MockRepository;
