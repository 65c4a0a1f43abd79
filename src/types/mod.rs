//! Remote GraphQL shapes: inputs sent to QueryDesk and nodes it sends back.
//!
//! Layout:
//! - `database.rs`: database connection inputs, node, and adapter enum
//! - `credential.rs`: database user inputs and node

pub mod credential;
pub mod database;

use serde::{Deserialize, Serialize};

pub use credential::{CreateCredentialInput, RemoteCredential, UpdateCredentialInput};
pub use database::{CreateDatabaseInput, DatabaseAdapter, RemoteDatabase, UpdateDatabaseInput};

/// An application-level error reported inside a successful mutation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<String>,
}

/// Mutation payload: either a populated `result` or a list of `errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub errors: Vec<RemoteError>,
}

impl<T> MutationResult<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<RemoteError>) -> Self {
        Self {
            result: None,
            errors,
        }
    }
}

/// Identity-only node returned by delete mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteId {
    #[serde(default)]
    pub id: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
