use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialInput {
    pub database_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub username: String,
    pub password: String,
    pub reviews_required: i64,
}

/// `database_id` is absent on purpose: moving a credential means replacing it.
/// `description` is always sent; an empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialInput {
    pub description: String,
    pub username: String,
    pub new_password: String,
    pub reviews_required: i64,
}

/// Credential node as QueryDesk returns it. The password is never sent back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteCredential {
    pub id: String,
    pub description: Option<String>,
    pub username: String,
    pub reviews_required: i64,
    pub database: DatabaseRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseRef {
    pub id: String,
}
