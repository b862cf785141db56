// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind `require_scope`, which places the caller's
// `Scope` in the request extensions. Reads, updates and deletes are narrowed
// to that scope; creates take their owning ids from the request body.

pub mod customers;
pub mod orders;
pub mod stocks;
pub mod users;
