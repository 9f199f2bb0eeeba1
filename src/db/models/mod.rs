//! Database models split into domain-specific modules.

pub mod book;
pub mod user;

pub use book::*;
pub use user::*;
