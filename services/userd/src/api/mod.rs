pub mod error;
pub mod system;
pub mod types;
pub mod users;
