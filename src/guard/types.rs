use std::fmt;
use thiserror::Error;

/// A CRUD action a client asks to perform on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Get,
    GetAll,
    Update,
    Delete,
    DeleteAll,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Get,
        Action::GetAll,
        Action::Update,
        Action::Delete,
        Action::DeleteAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Get => "get",
            Action::GetAll => "get all",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::DeleteAll => "delete all",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity produced by authentication and handed to authorization.
///
/// Opaque to the dispatcher; a guard may use it for per-client permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Client(pub String);

impl Client {
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A guard's refusal, carrying the message sent back to the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct Denied(pub String);

impl Denied {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
