use crate::api::QueryDeskApi;
use crate::error::QueryDeskError;
use crate::schema::{Attribute, PlanModifier, Schema};
use crate::service::RemoteResource;
use crate::types::{
    CreateDatabaseInput, DatabaseAdapter, MutationResult, RemoteDatabase, RemoteId,
    UpdateDatabaseInput,
};
use serde::{Deserialize, Serialize};

/// `querydesk_database` state. Certificates are write-only: never refreshed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseModel {
    pub id: Option<String>,
    pub name: String,
    pub adapter: String,
    pub hostname: String,
    pub database: String,
    pub ssl: bool,
    pub cacertfile: Option<String>,
    pub keyfile: Option<String>,
    pub certfile: Option<String>,
    pub restrict_access: bool,
}

impl Default for DatabaseModel {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            adapter: String::new(),
            hostname: String::new(),
            database: String::new(),
            ssl: false,
            cacertfile: None,
            keyfile: None,
            certfile: None,
            restrict_access: true,
        }
    }
}

impl std::fmt::Debug for DatabaseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<sensitive>");
        f.debug_struct("DatabaseModel")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("adapter", &self.adapter)
            .field("hostname", &self.hostname)
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .field("cacertfile", &redact(&self.cacertfile))
            .field("keyfile", &redact(&self.keyfile))
            .field("certfile", &redact(&self.certfile))
            .field("restrict_access", &self.restrict_access)
            .finish()
    }
}

impl DatabaseModel {
    fn parsed_adapter(&self) -> Result<DatabaseAdapter, QueryDeskError> {
        self.adapter.parse()
    }
}

pub struct DatabaseResource;

fn database_schema() -> Schema {
    Schema::new(
        "Database connection managed by QueryDesk.",
        vec![
            Attribute::string("id")
                .computed()
                .description("Database identifier")
                .plan_modifier(PlanModifier::UseStateForUnknown),
            Attribute::string("name")
                .required()
                .description("Name shown for this connection in QueryDesk."),
            Attribute::string("adapter")
                .required()
                .description("Database engine, one of `POSTGRES` or `MYSQL`."),
            Attribute::string("hostname")
                .required()
                .description("Host the database listens on."),
            Attribute::string("database")
                .required()
                .description("Name of the database to connect to."),
            Attribute::bool("ssl")
                .optional()
                .default_value(false)
                .description("Connect over TLS."),
            Attribute::string("cacertfile")
                .optional()
                .sensitive()
                .description("CA certificate used to verify the server."),
            Attribute::string("keyfile")
                .optional()
                .sensitive()
                .description("Client private key."),
            Attribute::string("certfile")
                .optional()
                .sensitive()
                .description("Client certificate."),
            Attribute::bool("restrict_access")
                .optional()
                .default_value(true)
                .description("Only users granted access can query this database."),
        ],
    )
}

impl RemoteResource for DatabaseResource {
    type Model = DatabaseModel;
    type CreateInput = CreateDatabaseInput;
    type UpdateInput = UpdateDatabaseInput;
    type Node = RemoteDatabase;

    const TYPE_SUFFIX: &'static str = "database";
    const NOUN: &'static str = "database";
    const CREATE_OPERATION: &'static str = "createDatabase";
    const UPDATE_OPERATION: &'static str = "updateDatabase";

    fn schema() -> Schema {
        database_schema()
    }

    fn id(model: &DatabaseModel) -> Option<&str> {
        model.id.as_deref()
    }

    fn with_id(id: String) -> DatabaseModel {
        DatabaseModel {
            id: Some(id),
            ..DatabaseModel::default()
        }
    }

    fn node_id(node: &RemoteDatabase) -> &str {
        &node.id
    }

    fn create_input(model: &DatabaseModel) -> Result<CreateDatabaseInput, QueryDeskError> {
        Ok(CreateDatabaseInput {
            name: model.name.clone(),
            adapter: model.parsed_adapter()?,
            hostname: model.hostname.clone(),
            database: model.database.clone(),
            ssl: model.ssl,
            cacertfile: model.cacertfile.clone(),
            keyfile: model.keyfile.clone(),
            certfile: model.certfile.clone(),
            restrict_access: model.restrict_access,
        })
    }

    fn update_input(model: &DatabaseModel) -> Result<UpdateDatabaseInput, QueryDeskError> {
        Ok(UpdateDatabaseInput {
            name: model.name.clone(),
            adapter: model.parsed_adapter()?,
            hostname: model.hostname.clone(),
            database: model.database.clone(),
            ssl: model.ssl,
            new_cacertfile: model.cacertfile.clone(),
            new_keyfile: model.keyfile.clone(),
            new_certfile: model.certfile.clone(),
            restrict_access: model.restrict_access,
        })
    }

    fn apply_created(model: &mut DatabaseModel, node: RemoteDatabase) {
        model.id = Some(node.id);
        model.ssl = node.ssl;
        model.restrict_access = node.restrict_access;
    }

    fn refresh(model: &mut DatabaseModel, node: RemoteDatabase) {
        // Local spelling is kept when it names the same engine.
        let remote_adapter = node.adapter.parse::<DatabaseAdapter>().ok();
        if !node.adapter.is_empty()
            && (remote_adapter.is_none() || model.parsed_adapter().ok() != remote_adapter)
        {
            model.adapter = node.adapter_name();
        }
        model.name = node.name;
        model.hostname = node.hostname;
        model.database = node.database;
        model.ssl = node.ssl;
        model.restrict_access = node.restrict_access;
    }

    async fn fetch<C: QueryDeskApi>(
        client: &C,
        id: &str,
    ) -> Result<Option<RemoteDatabase>, QueryDeskError> {
        client.get_database(id).await
    }

    async fn create<C: QueryDeskApi>(
        client: &C,
        input: CreateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        client.create_database(input).await
    }

    async fn update<C: QueryDeskApi>(
        client: &C,
        id: &str,
        input: UpdateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        client.update_database(id, input).await
    }

    async fn delete<C: QueryDeskApi>(
        client: &C,
        id: &str,
    ) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        client.delete_database(id).await
    }
}
