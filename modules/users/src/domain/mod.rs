pub mod error;
pub mod payload;
pub mod repo;
pub mod schema;
pub mod service;
