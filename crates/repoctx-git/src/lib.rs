//! Git remote enumeration and resolution-hint persistence.

pub mod client;
pub mod errors;
pub mod remote;

pub use client::GitClient;
pub use errors::GitError;
pub use remote::Remote;
