//! Users resource with v1/v2/v3 APIs over a table whose shape evolves at
//! runtime from `{full_name, email_addr}` to also carry `first_name` and
//! `last_name`.

// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::Users;

pub mod config;
pub use config::UsersConfig;

// === INTERNAL MODULES ===
// Exposed for integration tests; consumers should stay on `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
