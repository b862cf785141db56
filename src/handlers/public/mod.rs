// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Liveness and readiness probes for load balancers and orchestrators.

pub mod health;

pub use health::{health_get, ready_get};
