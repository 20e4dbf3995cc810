//! CLI commands implementation

pub mod analyze;
pub mod discover;
pub mod init;

pub use analyze::*;
pub use discover::*;
pub use init::*;
