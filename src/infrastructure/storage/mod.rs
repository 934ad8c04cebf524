//! Non-database credential stores

pub mod memory;

pub use memory::InMemoryUserRepository;
