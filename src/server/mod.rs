/// Token authentication applied ahead of every handler.
pub mod auth;

/// Server configuration.
pub mod config;

/// Greeting text composition.
pub mod greeting;

/// Shared user registry.
pub mod registry;

/// gRPC service implementation.
pub mod service;

pub use auth::AuthInterceptor;
pub use config::ServerConfig;
pub use registry::UserRegistry;
pub use service::DirectoryService;
