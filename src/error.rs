//! Error types for the user directory

use tonic::Status;

/// Main error types for the library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required field was empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// No user is stored under the requested username.
    #[error("user not found")]
    UserNotFound,

    /// The call carried no metadata at all.
    #[error("missing context metadata")]
    MissingMetadata,

    /// The `token` entry was absent, repeated, or wrong.
    #[error("invalid token")]
    InvalidToken,

    /// Server configuration could not be loaded or is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::EmptyField(_) => Status::invalid_argument(message),
            Error::UserNotFound => Status::not_found(message),
            Error::MissingMetadata | Error::InvalidToken => Status::unauthenticated(message),
            Error::Config(_) => Status::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;

    #[test]
    fn empty_field_maps_to_invalid_argument() {
        let status = Status::from(Error::EmptyField("username"));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "username cannot be empty");
    }

    #[test]
    fn auth_errors_map_to_unauthenticated() {
        let missing = Status::from(Error::MissingMetadata);
        assert_eq!(missing.code(), Code::Unauthenticated);
        assert_eq!(missing.message(), "missing context metadata");

        let invalid = Status::from(Error::InvalidToken);
        assert_eq!(invalid.code(), Code::Unauthenticated);
        assert_eq!(invalid.message(), "invalid token");
    }

    #[test]
    fn user_not_found_maps_to_not_found() {
        let status = Status::from(Error::UserNotFound);
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "user not found");
    }
}
