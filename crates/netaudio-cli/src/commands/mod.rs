//! Command implementations.

pub mod discover;
pub mod interfaces;
pub mod watch;

pub use discover::run_discover;
pub use interfaces::run_interfaces;
pub use watch::run_watch;
