use std::fmt;

use crate::error::AppError;
use crate::models::{Identity, Role};

/// The operations the API can perform on the book collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role gate: reads are open to any verified identity, mutations require
/// admin. Pure function of (role, operation); there is no per-resource
/// ownership.
pub fn authorize(identity: &Identity, operation: Operation) -> Result<(), AppError> {
    if !operation.is_mutation() || identity.role == Role::Admin {
        return Ok(());
    }

    Err(AppError::InsufficientRole {
        role: identity.role.to_string(),
        operation: operation.to_string(),
    })
}
