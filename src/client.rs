//! Client-side helpers for calling the directory.

use std::str::FromStr;

use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::{Error, Result, TOKEN_METADATA_KEY};

/// Attaches the shared-secret `token` metadata entry to every outgoing call.
///
/// ```rust,no_run
/// use user_directory::TokenInterceptor;
/// use user_directory::proto::user_service_client::UserServiceClient;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let channel = tonic::transport::Endpoint::from_static("http://127.0.0.1:6000")
///     .connect()
///     .await?;
/// let client = UserServiceClient::with_interceptor(channel, TokenInterceptor::new("valid-token")?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TokenInterceptor {
    token: MetadataValue<Ascii>,
}

impl TokenInterceptor {
    /// Creates an interceptor presenting `token` on every call.
    ///
    /// # Errors
    /// Returns [`Error::InvalidToken`] if `token` is not valid metadata text.
    pub fn new(token: &str) -> Result<Self> {
        let token = MetadataValue::from_str(token).map_err(|_| Error::InvalidToken)?;
        Ok(Self { token })
    }
}

impl Interceptor for TokenInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(TOKEN_METADATA_KEY, self.token.clone());
        Ok(request)
    }
}
