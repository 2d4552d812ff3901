//! The directory's only stored entity.

use crate::{Error, Result, proto};

/// A directory entry keyed by its username.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
    role: String,
}

impl User {
    /// Builds a user, rejecting an empty username or role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] naming the first empty field.
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let role = role.into();

        if username.is_empty() {
            return Err(Error::EmptyField("username"));
        }
        if role.is_empty() {
            return Err(Error::EmptyField("role"));
        }

        Ok(Self { username, role })
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the role.
    pub fn role(&self) -> &str {
        &self.role
    }
}

impl TryFrom<proto::User> for User {
    type Error = Error;

    fn try_from(user: proto::User) -> Result<Self> {
        Self::new(user.username, user.role)
    }
}

impl From<User> for proto::User {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
        }
    }
}
