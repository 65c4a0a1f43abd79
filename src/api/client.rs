use super::QueryDeskApi;
use super::operations::{
    CreateCredential, CreateDatabase, DeleteCredential, DeleteDatabase, GetCredential, GetDatabase,
    IdInputVariables, IdVariables, InputVariables, UpdateCredential, UpdateDatabase,
};
use crate::config::{API_KEY_HEADER, Config, GRAPHQL_PATH};
use crate::error::QueryDeskError;
use crate::types::{
    CreateCredentialInput, CreateDatabaseInput, MutationResult, RemoteCredential, RemoteDatabase,
    RemoteId, UpdateCredentialInput, UpdateDatabaseInput,
};
use graphql_client::{GraphQLQuery, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Authenticated GraphQL client for `<host>/graphql`.
#[derive(Clone, Debug)]
pub struct QueryDeskClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl QueryDeskClient {
    /// Build the client. Fails without an API key before touching the network.
    pub fn new(cfg: &Config) -> Result<Self, QueryDeskError> {
        let api_key = cfg.require_api_key()?;
        let endpoint = graphql_endpoint(cfg.require_host()?)?;

        let mut key = HeaderValue::from_str(api_key)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post one operation. Top-level GraphQL `errors` count as a failed call.
    #[tracing::instrument(level = tracing::Level::DEBUG, err, skip_all)]
    pub async fn post_graphql<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, QueryDeskError> {
        let body = Q::build_query(variables);
        let operation = body.operation_name;
        debug!(operation, endpoint = %self.endpoint, "posting graphql operation");

        let resp: Response<Q::ResponseData> = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = resp.errors.filter(|e| !e.is_empty()) {
            warn!(operation, ?errors, "graphql response has errors");
            return Err(QueryDeskError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        resp.data.ok_or(QueryDeskError::EmptyResponse(operation))
    }
}

fn graphql_endpoint(host: &str) -> Result<Url, QueryDeskError> {
    let base = host.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/{GRAPHQL_PATH}"))?)
}

impl QueryDeskApi for QueryDeskClient {
    async fn get_database(&self, id: &str) -> Result<Option<RemoteDatabase>, QueryDeskError> {
        let data = self
            .post_graphql::<GetDatabase>(IdVariables { id: id.to_string() })
            .await?;
        Ok(data.database)
    }

    async fn create_database(
        &self,
        input: CreateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        let data = self
            .post_graphql::<CreateDatabase>(InputVariables { input })
            .await?;
        Ok(data.create_database)
    }

    async fn update_database(
        &self,
        id: &str,
        input: UpdateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        let data = self
            .post_graphql::<UpdateDatabase>(IdInputVariables {
                id: id.to_string(),
                input,
            })
            .await?;
        Ok(data.update_database)
    }

    async fn delete_database(&self, id: &str) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        let data = self
            .post_graphql::<DeleteDatabase>(IdVariables { id: id.to_string() })
            .await?;
        Ok(data.delete_database)
    }

    async fn get_credential(&self, id: &str) -> Result<Option<RemoteCredential>, QueryDeskError> {
        let data = self
            .post_graphql::<GetCredential>(IdVariables { id: id.to_string() })
            .await?;
        Ok(data.credential)
    }

    async fn create_credential(
        &self,
        input: CreateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        let data = self
            .post_graphql::<CreateCredential>(InputVariables { input })
            .await?;
        Ok(data.create_credential)
    }

    async fn update_credential(
        &self,
        id: &str,
        input: UpdateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        let data = self
            .post_graphql::<UpdateCredential>(IdInputVariables {
                id: id.to_string(),
                input,
            })
            .await?;
        Ok(data.update_credential)
    }

    async fn delete_credential(
        &self,
        id: &str,
    ) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        let data = self
            .post_graphql::<DeleteCredential>(IdVariables { id: id.to_string() })
            .await?;
        Ok(data.delete_credential)
    }
}
