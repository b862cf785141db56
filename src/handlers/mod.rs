// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token scope required)

pub mod protected; // Scoped CRUD for users, stocks, customers and orders
pub mod public;    // Health probes
