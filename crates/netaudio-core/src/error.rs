//! Error types for the netaudio core library.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Interface error: {0}")]
    Interface(#[from] InterfaceError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Network interface selection errors.
///
/// Selection failure is fatal to engine construction: without a bound
/// interface no discovery is possible.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Interface not found: {0}")]
    NotFound(String),

    #[error("No usable network interface found")]
    NoUsableInterface,
}

/// Device registry errors, returned synchronously to the caller.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Cannot store a device with an empty name")]
    EmptyName,

    #[error("Device not found: {0}")]
    NotFound(String),
}

/// Discovery transport errors. Per-cycle and recoverable: the engine logs
/// them and proceeds to the next cycle.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mDNS error: {0}")]
    Mdns(#[from] mdns_sd::Error),

    #[error("Query aborted: {0}")]
    Aborted(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
