//! # User Directory
//!
//! A small gRPC user directory guarded by a shared-secret token.
//!
//! Every call passes through [`AuthInterceptor`], which admits it only when the
//! `token` metadata entry carries exactly one value equal to the configured
//! secret. Admitted calls reach [`DirectoryService`], which stores users in a
//! [`UserRegistry`] and serves `CreateUser`, `GetUser` and `GreetUser`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_directory::proto::user_service_server::UserServiceServer;
//! use user_directory::{AuthInterceptor, DirectoryService, UserRegistry};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = DirectoryService::new(UserRegistry::new());
//! let gated = UserServiceServer::with_interceptor(service, AuthInterceptor::new("valid-token"));
//!
//! tonic::transport::Server::builder()
//!     .add_service(gated)
//!     .serve("127.0.0.1:6000".parse()?)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Client-side helpers.
pub mod client;
/// Error types.
pub mod error;
/// Server-side components: auth gate, registry, service and configuration.
pub mod server;
/// The directory's user entity.
pub mod user;

/// Generated protobuf messages and gRPC stubs.
#[allow(missing_docs)]
pub mod proto {
    tonic::include_proto!("directory.v1");
}

pub use client::TokenInterceptor;
pub use error::Error;
pub use server::{AuthInterceptor, DirectoryService, ServerConfig, UserRegistry};
pub use user::User;

/// Metadata key carrying the call credential.
pub const TOKEN_METADATA_KEY: &str = "token";

/// The shared secret accepted when no other token is configured.
pub const DEFAULT_TOKEN: &str = "valid-token";

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, Error>;
