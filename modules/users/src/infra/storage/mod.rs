pub mod sqlx_repo;

pub use sqlx_repo::SqlxUsersRepository;
