//! Command-line host: drives the provider lifecycle from JSON records.

use crate::api::QueryDeskClient;
use crate::config::{Config, ProviderSettings};
use crate::error::{Diagnostic, Diagnostics};
use crate::provider::QueryDeskProvider;
use crate::resources::{CredentialResource, DatabaseDataSource, DatabaseResource};
use crate::service::{Reconciler, RemoteResource};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "querydesk-provider", version, about = "Manage QueryDesk databases and database users")]
pub struct Cli {
    /// QueryDesk API host, overrides QUERYDESK_HOST
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// QueryDesk API key, overrides QUERYDESK_API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print provider, resource, and data source schemas
    Schema,
    /// Manage `querydesk_database` resources
    Database {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage `querydesk_database_user` resources
    DatabaseUser {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Read data sources
    Data {
        #[command(subcommand)]
        source: DataSource,
    },
}

#[derive(Subcommand, Debug)]
pub enum ResourceAction {
    Create(RecordInput),
    Read(RecordInput),
    Update(RecordInput),
    Delete(RecordInput),
    /// Seed state from an existing remote id
    Import { id: String },
    /// Compare desired configuration with prior state
    Plan {
        /// Prior state JSON; omit for a resource that does not exist yet
        #[arg(long)]
        prior: Option<PathBuf>,
        #[command(flatten)]
        input: RecordInput,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataSource {
    Database { id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordInput {
    /// JSON record to read, `-` or omitted for stdin
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

/// Result of one command: the JSON to print and any warnings raised on the way.
#[derive(Debug, Default)]
pub struct Output {
    pub value: Value,
    pub warnings: Diagnostics,
}

impl Output {
    fn value(value: Value) -> Self {
        Self {
            value,
            warnings: Diagnostics::new(),
        }
    }
}

impl Cli {
    fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            host: self.host.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

pub async fn run(cli: Cli, cfg: Config) -> Result<Output, Diagnostics> {
    let provider = QueryDeskProvider::default();
    let connect = Connector {
        provider: &provider,
        settings: cli.settings(),
        cfg,
    };

    match cli.command {
        Command::Schema => Ok(Output::value(json!({
            "metadata": provider.metadata(),
            "schemas": QueryDeskProvider::schemas(),
        }))),
        Command::Database { action } => run_resource::<DatabaseResource>(action, &connect).await,
        Command::DatabaseUser { action } => {
            run_resource::<CredentialResource>(action, &connect).await
        }
        Command::Data {
            source: DataSource::Database { id },
        } => {
            let mut source = DatabaseDataSource::new();
            source.configure(Some(connect.client()?));
            let model = source.read(&id).await?;
            Ok(Output::value(encode(&model)?))
        }
    }
}

/// Builds the client on demand; schema, import, and plan never need one.
struct Connector<'a> {
    provider: &'a QueryDeskProvider,
    settings: ProviderSettings,
    cfg: Config,
}

impl Connector<'_> {
    fn client(&self) -> Result<Arc<QueryDeskClient>, Diagnostics> {
        self.provider.configure(&self.settings, self.cfg.clone())
    }

    fn reconciler<R: RemoteResource>(&self) -> Result<Reconciler<R, QueryDeskClient>, Diagnostics> {
        let mut reconciler = Reconciler::new();
        reconciler.configure(Some(self.client()?));
        Ok(reconciler)
    }
}

async fn run_resource<R: RemoteResource>(
    action: ResourceAction,
    connect: &Connector<'_>,
) -> Result<Output, Diagnostics> {
    let type_name = Reconciler::<R, QueryDeskClient>::type_name(crate::provider::TYPE_NAME);
    debug!(resource = %type_name, ?action, "running command");

    match action {
        ResourceAction::Create(input) => {
            let plan = load_desired::<R>(&input).await?;
            let state = connect.reconciler::<R>()?.create(plan).await?;
            Ok(Output::value(encode(&state)?))
        }
        ResourceAction::Read(input) => {
            let current: R::Model = decode(read_json(input.file.as_deref()).await?)?;
            match connect.reconciler::<R>()?.read(current).await? {
                Some(state) => Ok(Output::value(encode(&state)?)),
                None => {
                    let mut warnings = Diagnostics::new();
                    warnings.push(Diagnostic::warning(
                        "Resource removed",
                        format!("The remote {type_name} no longer exists and was removed from state."),
                    ));
                    Ok(Output {
                        value: Value::Null,
                        warnings,
                    })
                }
            }
        }
        ResourceAction::Update(input) => {
            let plan = load_desired::<R>(&input).await?;
            let state = connect.reconciler::<R>()?.update(plan).await?;
            Ok(Output::value(encode(&state)?))
        }
        ResourceAction::Delete(input) => {
            let current: R::Model = decode(read_json(input.file.as_deref()).await?)?;
            connect.reconciler::<R>()?.delete(current).await?;
            Ok(Output::value(Value::Null))
        }
        ResourceAction::Import { id } => {
            let state = Reconciler::<R, QueryDeskClient>::new().import_state(&id);
            Ok(Output::value(encode(&state)?))
        }
        ResourceAction::Plan { prior, input } => {
            let desired = load_desired::<R>(&input).await?;
            let prior: Option<R::Model> = match prior {
                Some(path) => Some(decode(read_json(Some(path.as_path())).await?)?),
                None => None,
            };
            let action = Reconciler::<R, QueryDeskClient>::new().plan(prior.as_ref(), &desired)?;
            Ok(Output::value(encode(&action)?))
        }
    }
}

/// Read desired configuration, fill schema defaults, and validate it.
async fn load_desired<R: RemoteResource>(input: &RecordInput) -> Result<R::Model, Diagnostics> {
    let mut value = read_json(input.file.as_deref()).await?;
    let schema = R::schema();
    schema.apply_defaults(&mut value);
    let diags = schema.validate(&value);
    if diags.has_error() {
        return Err(diags);
    }
    Ok(decode(value)?)
}

async fn read_json(path: Option<&Path>) -> Result<Value, Diagnostic> {
    let raw = match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| {
                Diagnostic::error("Unable to read input", format!("{}: {e}", path.display()))
            })?,
        _ => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .map_err(|e| Diagnostic::error("Unable to read input", e.to_string()))?;
            raw
        }
    };
    serde_json::from_str(&raw).map_err(|e| Diagnostic::error("Invalid JSON input", e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Diagnostic> {
    serde_json::from_value(value).map_err(|e| Diagnostic::error("Invalid record", e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, Diagnostic> {
    serde_json::to_value(value).map_err(|e| Diagnostic::error("Unable to encode output", e.to_string()))
}
