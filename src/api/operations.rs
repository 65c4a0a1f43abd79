//! Typed GraphQL operations against the QueryDesk schema.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], pairing the
//! query document with its variables and response data types.

use crate::types::{
    CreateCredentialInput, CreateDatabaseInput, MutationResult, RemoteCredential, RemoteDatabase,
    RemoteId, UpdateCredentialInput, UpdateDatabaseInput,
};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

pub const GET_DATABASE: &str = r#"
query getDatabase($id: ID!) {
  database(id: $id) { id name adapter hostname database ssl restrictAccess }
}
"#;

pub const CREATE_DATABASE: &str = r#"
mutation createDatabase($input: CreateDatabaseInput!) {
  createDatabase(input: $input) {
    result { id name adapter hostname database ssl restrictAccess }
    errors { message code fields }
  }
}
"#;

pub const UPDATE_DATABASE: &str = r#"
mutation updateDatabase($id: ID!, $input: UpdateDatabaseInput!) {
  updateDatabase(id: $id, input: $input) {
    result { id name adapter hostname database ssl restrictAccess }
    errors { message code fields }
  }
}
"#;

pub const DELETE_DATABASE: &str = r#"
mutation deleteDatabase($id: ID!) {
  deleteDatabase(id: $id) {
    result { id }
    errors { message code fields }
  }
}
"#;

pub const GET_CREDENTIAL: &str = r#"
query getCredential($id: ID!) {
  credential(id: $id) { id description username reviewsRequired database { id } }
}
"#;

pub const CREATE_CREDENTIAL: &str = r#"
mutation createCredential($input: CreateCredentialInput!) {
  createCredential(input: $input) {
    result { id description username reviewsRequired database { id } }
    errors { message code fields }
  }
}
"#;

pub const UPDATE_CREDENTIAL: &str = r#"
mutation updateCredential($id: ID!, $input: UpdateCredentialInput!) {
  updateCredential(id: $id, input: $input) {
    result { id description username reviewsRequired database { id } }
    errors { message code fields }
  }
}
"#;

pub const DELETE_CREDENTIAL: &str = r#"
mutation deleteCredential($id: ID!) {
  deleteCredential(id: $id) {
    result { id }
    errors { message code fields }
  }
}
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdVariables {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputVariables<I> {
    pub input: I,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInputVariables<I> {
    pub id: String,
    pub input: I,
}

macro_rules! graphql_operation {
    ($name:ident, $operation:literal, $query:ident, $variables:ty, $data:ty) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $query,
                    operation_name: $operation,
                }
            }
        }
    };
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetDatabaseData {
    #[serde(default)]
    pub database: Option<RemoteDatabase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseData {
    pub create_database: MutationResult<RemoteDatabase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabaseData {
    pub update_database: MutationResult<RemoteDatabase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDatabaseData {
    pub delete_database: MutationResult<RemoteId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetCredentialData {
    #[serde(default)]
    pub credential: Option<RemoteCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialData {
    pub create_credential: MutationResult<RemoteCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialData {
    pub update_credential: MutationResult<RemoteCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCredentialData {
    pub delete_credential: MutationResult<RemoteId>,
}

graphql_operation!(GetDatabase, "getDatabase", GET_DATABASE, IdVariables, GetDatabaseData);
graphql_operation!(
    CreateDatabase,
    "createDatabase",
    CREATE_DATABASE,
    InputVariables<CreateDatabaseInput>,
    CreateDatabaseData
);
graphql_operation!(
    UpdateDatabase,
    "updateDatabase",
    UPDATE_DATABASE,
    IdInputVariables<UpdateDatabaseInput>,
    UpdateDatabaseData
);
graphql_operation!(
    DeleteDatabase,
    "deleteDatabase",
    DELETE_DATABASE,
    IdVariables,
    DeleteDatabaseData
);
graphql_operation!(
    GetCredential,
    "getCredential",
    GET_CREDENTIAL,
    IdVariables,
    GetCredentialData
);
graphql_operation!(
    CreateCredential,
    "createCredential",
    CREATE_CREDENTIAL,
    InputVariables<CreateCredentialInput>,
    CreateCredentialData
);
graphql_operation!(
    UpdateCredential,
    "updateCredential",
    UPDATE_CREDENTIAL,
    IdInputVariables<UpdateCredentialInput>,
    UpdateCredentialData
);
graphql_operation!(
    DeleteCredential,
    "deleteCredential",
    DELETE_CREDENTIAL,
    IdVariables,
    DeleteCredentialData
);
