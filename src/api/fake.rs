//! In-memory QueryDesk used by unit tests. Records every call by operation name.

use super::QueryDeskApi;
use crate::error::QueryDeskError;
use crate::types::{
    CreateCredentialInput, CreateDatabaseInput, MutationResult, RemoteCredential, RemoteDatabase,
    RemoteError, RemoteId, UpdateCredentialInput, UpdateDatabaseInput, credential::DatabaseRef,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    databases: BTreeMap<String, RemoteDatabase>,
    credentials: BTreeMap<String, RemoteCredential>,
    calls: Vec<&'static str>,
    reject_next: Vec<RemoteError>,
    fail_next: Option<String>,
    next_database: u32,
    next_credential: u32,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub(crate) fn database(&self, id: &str) -> Option<RemoteDatabase> {
        self.lock().databases.get(id).cloned()
    }

    pub(crate) fn credential(&self, id: &str) -> Option<RemoteCredential> {
        self.lock().credentials.get(id).cloned()
    }

    pub(crate) fn insert_database(&self, database: RemoteDatabase) {
        self.lock().databases.insert(database.id.clone(), database);
    }

    /// Store a node with an empty identity under `id`, as a soft-deleted record reads back.
    pub(crate) fn insert_blank_database(&self, id: &str) {
        self.lock()
            .databases
            .insert(id.to_string(), RemoteDatabase::default());
    }

    pub(crate) fn insert_blank_credential(&self, id: &str) {
        self.lock()
            .credentials
            .insert(id.to_string(), RemoteCredential::default());
    }

    pub(crate) fn insert_credential(&self, credential: RemoteCredential) {
        self.lock()
            .credentials
            .insert(credential.id.clone(), credential);
    }

    /// The next mutation answers with these domain errors and no result.
    pub(crate) fn reject_next<I: IntoIterator<Item = &'static str>>(&self, messages: I) {
        self.lock().reject_next = messages
            .into_iter()
            .map(|message| RemoteError {
                message: message.to_string(),
                ..RemoteError::default()
            })
            .collect();
    }

    /// The next call fails at the transport level.
    pub(crate) fn fail_next(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>, QueryDeskError> {
        let mut state = self.lock();
        state.calls.push(operation);
        match state.fail_next.take() {
            Some(message) => Err(QueryDeskError::GraphQl(vec![message])),
            None => Ok(state),
        }
    }
}

fn take_rejection<T>(state: &mut FakeState) -> Option<MutationResult<T>> {
    if state.reject_next.is_empty() {
        None
    } else {
        Some(MutationResult::rejected(std::mem::take(&mut state.reject_next)))
    }
}

impl QueryDeskApi for FakeApi {
    async fn get_database(&self, id: &str) -> Result<Option<RemoteDatabase>, QueryDeskError> {
        let state = self.begin("getDatabase")?;
        Ok(state.databases.get(id).cloned())
    }

    async fn create_database(
        &self,
        input: CreateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        let mut state = self.begin("createDatabase")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        let id = format!("db_{}", 12345 + state.next_database);
        state.next_database += 1;
        let database = RemoteDatabase {
            id: id.clone(),
            name: input.name,
            adapter: input.adapter.to_string(),
            hostname: input.hostname,
            database: input.database,
            ssl: input.ssl,
            restrict_access: input.restrict_access,
        };
        state.databases.insert(id, database.clone());
        Ok(MutationResult::ok(database))
    }

    async fn update_database(
        &self,
        id: &str,
        input: UpdateDatabaseInput,
    ) -> Result<MutationResult<RemoteDatabase>, QueryDeskError> {
        let mut state = self.begin("updateDatabase")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        let Some(database) = state.databases.get_mut(id) else {
            return Ok(MutationResult::rejected(vec![RemoteError {
                message: format!("could not find database {id}"),
                ..RemoteError::default()
            }]));
        };
        database.name = input.name;
        database.adapter = input.adapter.to_string();
        database.hostname = input.hostname;
        database.database = input.database;
        database.ssl = input.ssl;
        database.restrict_access = input.restrict_access;
        Ok(MutationResult::ok(database.clone()))
    }

    async fn delete_database(&self, id: &str) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        let mut state = self.begin("deleteDatabase")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        state.databases.remove(id);
        Ok(MutationResult::ok(RemoteId { id: id.to_string() }))
    }

    async fn get_credential(&self, id: &str) -> Result<Option<RemoteCredential>, QueryDeskError> {
        let state = self.begin("getCredential")?;
        Ok(state.credentials.get(id).cloned())
    }

    async fn create_credential(
        &self,
        input: CreateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        let mut state = self.begin("createCredential")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        let id = format!("crd_{}", 12345 + state.next_credential);
        state.next_credential += 1;
        let credential = RemoteCredential {
            id: id.clone(),
            description: input.description,
            username: input.username,
            reviews_required: input.reviews_required,
            database: DatabaseRef {
                id: input.database_id,
            },
        };
        state.credentials.insert(id, credential.clone());
        Ok(MutationResult::ok(credential))
    }

    async fn update_credential(
        &self,
        id: &str,
        input: UpdateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        let mut state = self.begin("updateCredential")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        let Some(credential) = state.credentials.get_mut(id) else {
            return Ok(MutationResult::rejected(vec![RemoteError {
                message: format!("could not find credential {id}"),
                ..RemoteError::default()
            }]));
        };
        credential.description = Some(input.description).filter(|d| !d.is_empty());
        credential.username = input.username;
        credential.reviews_required = input.reviews_required;
        Ok(MutationResult::ok(credential.clone()))
    }

    async fn delete_credential(
        &self,
        id: &str,
    ) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        let mut state = self.begin("deleteCredential")?;
        if let Some(rejected) = take_rejection(&mut state) {
            return Ok(rejected);
        }
        state.credentials.remove(id);
        Ok(MutationResult::ok(RemoteId { id: id.to_string() }))
    }
}
