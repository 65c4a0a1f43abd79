use crate::api::QueryDeskClient;
use crate::config::{Config, ProviderSettings};
use crate::error::{Diagnostic, Diagnostics};
use crate::resources::{CredentialReconciler, DatabaseDataSource, DatabaseReconciler};
use crate::schema::{Attribute, Schema};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const TYPE_NAME: &str = "querydesk";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub type_name: &'static str,
    pub version: String,
}

/// Every schema the provider exposes, keyed by type name.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

#[derive(Debug, Clone)]
pub struct QueryDeskProvider {
    version: String,
}

impl Default for QueryDeskProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

impl QueryDeskProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            type_name: TYPE_NAME,
            version: self.version.clone(),
        }
    }

    pub fn schema() -> Schema {
        Schema::new(
            "Manage QueryDesk databases and database users.",
            vec![
                Attribute::string("host")
                    .optional()
                    .description("QueryDesk API host. May also be set with QUERYDESK_HOST."),
                Attribute::string("api_key")
                    .optional()
                    .sensitive()
                    .description("QueryDesk API key. May also be set with QUERYDESK_API_KEY."),
            ],
        )
    }

    pub fn resource_type_names() -> Vec<String> {
        vec![
            DatabaseReconciler::<QueryDeskClient>::type_name(TYPE_NAME),
            CredentialReconciler::<QueryDeskClient>::type_name(TYPE_NAME),
        ]
    }

    pub fn data_source_type_names() -> Vec<String> {
        vec![DatabaseDataSource::<QueryDeskClient>::type_name(TYPE_NAME)]
    }

    pub fn schemas() -> ProviderSchemas {
        let resources = BTreeMap::from([
            (
                DatabaseReconciler::<QueryDeskClient>::type_name(TYPE_NAME),
                DatabaseReconciler::<QueryDeskClient>::schema(),
            ),
            (
                CredentialReconciler::<QueryDeskClient>::type_name(TYPE_NAME),
                CredentialReconciler::<QueryDeskClient>::schema(),
            ),
        ]);
        let data_sources = BTreeMap::from([(
            DatabaseDataSource::<QueryDeskClient>::type_name(TYPE_NAME),
            DatabaseDataSource::<QueryDeskClient>::schema(),
        )]);
        ProviderSchemas {
            provider: Self::schema(),
            resources,
            data_sources,
        }
    }

    /// Resolve settings over `base` and build the shared client.
    ///
    /// The API key check runs before any client is constructed.
    pub fn configure(
        &self,
        settings: &ProviderSettings,
        base: Config,
    ) -> Result<Arc<QueryDeskClient>, Diagnostics> {
        let cfg = base.with_settings(settings);
        let mut diags = Diagnostics::new();

        if cfg.require_api_key().is_err() {
            diags.push(Diagnostic::attribute_error(
                "api_key",
                "Missing QueryDesk API Key",
                "The provider cannot create the QueryDesk API client as there is a missing or empty value for the QueryDesk API key. \
                 Set the api key value in the configuration or use the QUERYDESK_API_KEY environment variable. \
                 If either is already set, ensure the value is not empty.",
            ));
            return Err(diags);
        }

        debug!(host = cfg.host.as_deref().unwrap_or("<none>"), "configuring provider");
        match QueryDeskClient::new(&cfg) {
            Ok(client) => {
                info!(endpoint = %client.endpoint(), version = %self.version, "provider configured");
                Ok(Arc::new(client))
            }
            Err(e) => {
                let diagnostic = Diagnostic::error(
                    "Unable to Create QueryDesk API Client",
                    format!(
                        "An unexpected error occurred when creating the QueryDesk API client.\n\nQueryDesk Client Error: {e}"
                    ),
                );
                diags.push(match e.attribute() {
                    Some(attribute) => Diagnostic {
                        attribute: Some(attribute.to_string()),
                        ..diagnostic
                    },
                    None => diagnostic,
                });
                Err(diags)
            }
        }
    }
}
