use crate::api::QueryDeskApi;
use crate::error::Diagnostic;
use crate::schema::{Attribute, Schema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// `querydesk_database` data source result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseDataModel {
    pub id: String,
    pub name: String,
    pub adapter: String,
    pub hostname: String,
    pub database: String,
    pub ssl: bool,
    pub restrict_access: bool,
}

pub struct DatabaseDataSource<C> {
    client: Option<Arc<C>>,
}

impl<C> Default for DatabaseDataSource<C> {
    fn default() -> Self {
        Self { client: None }
    }
}

impl<C: QueryDeskApi> DatabaseDataSource<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{provider_type_name}_database")
    }

    pub fn schema() -> Schema {
        Schema::new(
            "Look up an existing QueryDesk database by id.",
            vec![
                Attribute::string("id").required().description("Database identifier"),
                Attribute::string("name").computed(),
                Attribute::string("adapter").computed(),
                Attribute::string("hostname").computed(),
                Attribute::string("database").computed(),
                Attribute::bool("ssl").computed(),
                Attribute::bool("restrict_access").computed(),
            ],
        )
    }

    pub fn configure(&mut self, client: Option<Arc<C>>) {
        if client.is_some() {
            self.client = client;
        }
    }

    pub async fn read(&self, id: &str) -> Result<DatabaseDataModel, Diagnostic> {
        let client = self.client.as_deref().ok_or_else(|| {
            Diagnostic::error(
                "Unconfigured Data Source",
                "The database data source has no QueryDesk client. Configure the provider before using it.",
            )
        })?;
        if id.is_empty() {
            return Err(Diagnostic::attribute_error(
                "id",
                "Unable to read database",
                "Cannot read a database without an id.",
            ));
        }

        let node = client
            .get_database(id)
            .await
            .map_err(|e| Diagnostic::error("Unable to Read Database", e.to_string()))?
            .filter(|n| !n.id.is_empty())
            .ok_or_else(|| {
                Diagnostic::attribute_error(
                    "id",
                    "Database not found",
                    format!("Database with id {id} not found"),
                )
            })?;

        debug!(id = %node.id, "database data source read");
        let adapter = node.adapter_name();
        Ok(DatabaseDataModel {
            id: node.id,
            name: node.name,
            adapter,
            hostname: node.hostname,
            database: node.database,
            ssl: node.ssl,
            restrict_access: node.restrict_access,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::types::RemoteDatabase;

    #[tokio::test]
    async fn reads_existing_database() {
        let api = Arc::new(FakeApi::new());
        api.insert_database(RemoteDatabase {
            id: "db_1".into(),
            name: "analytics".into(),
            adapter: "mysql".into(),
            hostname: "mysql.internal".into(),
            database: "events".into(),
            ssl: true,
            restrict_access: false,
        });

        let model = DatabaseDataSource::with_client(api).read("db_1").await.expect("read");
        assert_eq!(model.adapter, "MYSQL");
        assert_eq!(model.hostname, "mysql.internal");
        assert!(model.ssl);
        assert!(!model.restrict_access);
    }

    #[tokio::test]
    async fn missing_database_is_an_error() {
        let api = Arc::new(FakeApi::new());
        let diag = DatabaseDataSource::with_client(api)
            .read("db_missing")
            .await
            .expect_err("missing");
        assert_eq!(diag.detail, "Database with id db_missing not found");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let api = Arc::new(FakeApi::new());
        api.fail_next("connection reset");
        let diag = DatabaseDataSource::with_client(api)
            .read("db_1")
            .await
            .expect_err("fails");
        assert_eq!(diag.summary, "Unable to Read Database");
        assert!(diag.detail.contains("connection reset"));
    }

    #[tokio::test]
    async fn unconfigured_data_source_is_a_diagnostic() {
        let source: DatabaseDataSource<FakeApi> = DatabaseDataSource::new();
        let diag = source.read("db_1").await.expect_err("unconfigured");
        assert_eq!(diag.summary, "Unconfigured Data Source");
        assert_eq!(DatabaseDataSource::<FakeApi>::type_name("querydesk"), "querydesk_database");
    }
}
