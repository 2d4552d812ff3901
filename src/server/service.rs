use std::time::Instant;

use metrics::{counter, histogram};
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use super::greeting;
use super::registry::UserRegistry;
use crate::proto::user_service_server::UserService;
use crate::proto::{
    self, CreateUserRequest, CreateUserResponse, GetUserRequest, GreetUserRequest,
    GreetUserResponse,
};
use crate::{Error, User};

/// gRPC service implementation for the user directory.
///
/// Holds no authentication logic; install [`AuthInterceptor`](super::AuthInterceptor)
/// in front of it.
#[derive(Clone, Debug)]
pub struct DirectoryService {
    registry: UserRegistry,
}

impl DirectoryService {
    /// Creates a service backed by `registry`.
    pub fn new(registry: UserRegistry) -> Self {
        Self { registry }
    }

    /// Returns the registry this service reads and writes.
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    #[allow(clippy::result_large_err)]
    fn require(field: &'static str, value: &str) -> Result<(), Status> {
        if value.is_empty() {
            return Err(Error::EmptyField(field).into());
        }
        Ok(())
    }

    fn record(operation: &'static str, start: Instant, succeeded: bool) {
        histogram!(format!("directory.{operation}.duration")).record(start.elapsed().as_secs_f64());
        if succeeded {
            counter!(format!("directory.{operation}.success")).increment(1);
        } else {
            counter!(format!("directory.{operation}.failure")).increment(1);
        }
    }
}

#[tonic::async_trait]
impl UserService for DirectoryService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<CreateUserResponse>, Status> {
        let start = Instant::now();
        counter!("directory.create_user.requests").increment(1);
        debug!("Creating user");

        let user = User::try_from(request.into_inner().user.unwrap_or_default());
        let user = match user {
            Ok(user) => user,
            Err(e) => {
                Self::record("create_user", start, false);
                return Err(e.into());
            }
        };

        let username = user.username().to_string();
        let replaced = self.registry.upsert(user).await;

        Self::record("create_user", start, true);
        info!(
            username = %username,
            replaced = replaced.is_some(),
            "User created"
        );

        Ok(Response::new(CreateUserResponse {}))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<proto::User>, Status> {
        let start = Instant::now();
        counter!("directory.get_user.requests").increment(1);

        let req = request.into_inner();
        debug!(username = %req.username, "Getting user");

        if let Err(status) = Self::require("username", &req.username) {
            Self::record("get_user", start, false);
            return Err(status);
        }

        let Some(user) = self.registry.get(&req.username).await else {
            Self::record("get_user", start, false);
            return Err(Error::UserNotFound.into());
        };

        Self::record("get_user", start, true);
        debug!(username = %req.username, "User found");

        Ok(Response::new(user.into()))
    }

    async fn greet_user(
        &self,
        request: Request<GreetUserRequest>,
    ) -> Result<Response<GreetUserResponse>, Status> {
        let start = Instant::now();
        counter!("directory.greet_user.requests").increment(1);

        let req = request.into_inner();
        debug!(username = %req.username, "Greeting user");

        let validated = Self::require("username", &req.username)
            .and_then(|()| Self::require("greeting", &req.greeting));
        if let Err(status) = validated {
            Self::record("greet_user", start, false);
            return Err(status);
        }

        let found = self
            .get_user(Request::new(GetUserRequest {
                username: req.username,
            }))
            .await;

        let user = match found.map(Response::into_inner).map(User::try_from) {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                Self::record("greet_user", start, false);
                return Err(e.into());
            }
            Err(status) => {
                Self::record("greet_user", start, false);
                return Err(Status::new(
                    status.code(),
                    format!("failed to find matching user: {}", status.message()),
                ));
            }
        };

        Self::record("greet_user", start, true);

        Ok(Response::new(GreetUserResponse {
            greeting: greeting::compose(&req.greeting, &user),
        }))
    }
}
