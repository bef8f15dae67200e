mod memory;
mod repo;
mod repo_types;

pub use memory::InMemoryUserRepository;
pub use repo::{PgUserRepository, UserRepository};
pub use repo_types::User;
