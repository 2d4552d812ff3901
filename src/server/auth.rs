//! Shared-secret authentication for every directory call.
//!
//! The gate runs as a tonic [`Interceptor`], so it sees only the call metadata
//! and rejects the call before any handler is polled. Wrap the generated
//! server with [`UserServiceServer::with_interceptor`] to install it.
//!
//! [`UserServiceServer::with_interceptor`]: crate::proto::user_service_server::UserServiceServer::with_interceptor

use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::warn;

use crate::{Error, Result, TOKEN_METADATA_KEY};

/// Admits calls whose `token` metadata entry holds exactly the configured secret.
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    token: String,
}

impl AuthInterceptor {
    /// Creates a gate accepting `token` as the only valid credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Checks the call metadata against the configured token.
    ///
    /// A map with no entries at all counts as a call without metadata.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingMetadata`] if the map is empty.
    /// - [`Error::InvalidToken`] if `token` is absent, repeated, or does not match.
    pub fn authorize(&self, metadata: &MetadataMap) -> Result<()> {
        if metadata.is_empty() {
            return Err(Error::MissingMetadata);
        }

        let mut values = metadata.get_all(TOKEN_METADATA_KEY).iter();
        let (Some(value), None) = (values.next(), values.next()) else {
            return Err(Error::InvalidToken);
        };

        match value.to_str() {
            Ok(presented) if presented == self.token => Ok(()),
            _ => Err(Error::InvalidToken),
        }
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, request: Request<()>) -> std::result::Result<Request<()>, Status> {
        if let Err(e) = self.authorize(request.metadata()) {
            warn!(error = %e, "Rejected unauthenticated call");
            return Err(e.into());
        }

        Ok(request)
    }
}
