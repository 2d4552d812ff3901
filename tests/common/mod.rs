//! Common test utilities shared across integration tests.

use tokio::task::JoinHandle;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint, Server};
use user_directory::proto::user_service_client::UserServiceClient;
use user_directory::proto::user_service_server::UserServiceServer;
use user_directory::{AuthInterceptor, DEFAULT_TOKEN, DirectoryService, TokenInterceptor, UserRegistry};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Only logs from the directory crate are shown, filtering out HTTP/2 and tower noise.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("user_directory=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// A running directory server on an ephemeral port.
pub struct TestServer {
    pub url: String,
    pub registry: UserRegistry,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Starts a server guarded by [`DEFAULT_TOKEN`].
    pub async fn start() -> Self {
        init_tracing();

        let registry = UserRegistry::new();
        let service = DirectoryService::new(registry.clone());
        let gate = AuthInterceptor::new(DEFAULT_TOKEN);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local_addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            Server::builder()
                .add_service(UserServiceServer::with_interceptor(service, gate))
                .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
                .await
                .unwrap();
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            url: format!("http://{local_addr}"),
            registry,
            _handle: handle,
        }
    }

    /// Connects a client that sends no credentials.
    pub async fn bare_client(&self) -> UserServiceClient<Channel> {
        UserServiceClient::connect(self.url.clone())
            .await
            .expect("Failed to connect to server")
    }

    /// Connects a client presenting `token` on every call.
    pub async fn client_with_token(
        &self,
        token: &str,
    ) -> UserServiceClient<InterceptedService<Channel, TokenInterceptor>> {
        let channel = Endpoint::from_shared(self.url.clone())
            .unwrap()
            .connect()
            .await
            .expect("Failed to connect to server");
        UserServiceClient::with_interceptor(channel, TokenInterceptor::new(token).unwrap())
    }

    /// Connects a client presenting the valid token.
    pub async fn client(&self) -> UserServiceClient<InterceptedService<Channel, TokenInterceptor>> {
        self.client_with_token(DEFAULT_TOKEN).await
    }
}
