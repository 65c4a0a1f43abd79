use crate::api::QueryDeskApi;
use crate::error::{Diagnostic, QueryDeskError};
use crate::schema::Schema;
use crate::types::{MutationResult, RemoteError, RemoteId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a remote mutation amounted to, in classification order.
#[derive(Debug)]
pub enum RemoteOutcome<T> {
    /// The call itself failed: network, HTTP status, or decoding.
    Transport(QueryDeskError),
    /// QueryDesk accepted the request and reported domain errors.
    Rejected(Vec<RemoteError>),
    Applied(T),
}

impl<T> RemoteOutcome<T> {
    /// A payload with neither result nor errors counts as a transport failure.
    pub fn classify(
        operation: &'static str,
        call: Result<MutationResult<T>, QueryDeskError>,
    ) -> Self {
        match call {
            Err(e) => RemoteOutcome::Transport(e),
            Ok(payload) if !payload.errors.is_empty() => RemoteOutcome::Rejected(payload.errors),
            Ok(MutationResult {
                result: Some(value),
                ..
            }) => RemoteOutcome::Applied(value),
            Ok(_) => RemoteOutcome::Transport(QueryDeskError::EmptyResult(operation)),
        }
    }
}

impl RemoteOutcome<()> {
    /// Deletions only need the absence of errors; the echoed node is ignored.
    pub fn classify_deletion(call: Result<MutationResult<RemoteId>, QueryDeskError>) -> Self {
        match call {
            Err(e) => RemoteOutcome::Transport(e),
            Ok(payload) if !payload.errors.is_empty() => RemoteOutcome::Rejected(payload.errors),
            Ok(_) => RemoteOutcome::Applied(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        }
    }
}

/// Per-resource capabilities: field mapping plus the remote calls to make.
///
/// The reconciler owns ordering and error classification; implementors only
/// translate between the local record and the remote shapes.
#[allow(async_fn_in_trait)]
pub trait RemoteResource {
    /// Local desired/current state record.
    type Model: Clone + Debug + Default + Serialize + DeserializeOwned;
    type CreateInput;
    type UpdateInput;
    /// Node returned by reads and mutations.
    type Node;

    /// Appended to the provider type name, e.g. `database`.
    const TYPE_SUFFIX: &'static str;
    /// Human-readable noun used in diagnostics, e.g. `database user`.
    const NOUN: &'static str;
    const CREATE_OPERATION: &'static str;
    const UPDATE_OPERATION: &'static str;

    fn schema() -> Schema;

    fn id(model: &Self::Model) -> Option<&str>;

    /// Minimal record carrying only the id.
    fn with_id(id: String) -> Self::Model;

    fn node_id(node: &Self::Node) -> &str;

    fn create_input(model: &Self::Model) -> Result<Self::CreateInput, QueryDeskError>;

    fn update_input(model: &Self::Model) -> Result<Self::UpdateInput, QueryDeskError>;

    /// Copy the remote id and remote-computed values into a freshly created record.
    fn apply_created(model: &mut Self::Model, node: Self::Node);

    /// Overwrite mirrored fields from a fetched node, leaving write-only ones alone.
    fn refresh(model: &mut Self::Model, node: Self::Node);

    async fn fetch<C: QueryDeskApi>(client: &C, id: &str) -> Result<Option<Self::Node>, QueryDeskError>;

    async fn create<C: QueryDeskApi>(
        client: &C,
        input: Self::CreateInput,
    ) -> Result<MutationResult<Self::Node>, QueryDeskError>;

    async fn update<C: QueryDeskApi>(
        client: &C,
        id: &str,
        input: Self::UpdateInput,
    ) -> Result<MutationResult<Self::Node>, QueryDeskError>;

    async fn delete<C: QueryDeskApi>(
        client: &C,
        id: &str,
    ) -> Result<MutationResult<RemoteId>, QueryDeskError>;
}

/// How a desired record relates to what is already tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    Replace { attributes: Vec<&'static str> },
    NoOp,
}

/// Drives one resource type through Create / Read / Update / Delete / Import.
pub struct Reconciler<R, C> {
    client: Option<Arc<C>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, C> Default for Reconciler<R, C> {
    fn default() -> Self {
        Self {
            client: None,
            _resource: PhantomData,
        }
    }
}

impl<R: RemoteResource, C: QueryDeskApi> Reconciler<R, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client: Some(client),
            _resource: PhantomData,
        }
    }

    pub fn type_name(provider_type_name: &str) -> String {
        format!("{provider_type_name}_{}", R::TYPE_SUFFIX)
    }

    pub fn schema() -> Schema {
        R::schema()
    }

    /// A missing client leaves the resource unconfigured; the host may call
    /// this before the provider itself is configured.
    pub fn configure(&mut self, client: Option<Arc<C>>) {
        if client.is_some() {
            self.client = client;
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn create(&self, plan: R::Model) -> Result<R::Model, Diagnostic> {
        let client = self.client()?;
        let input = R::create_input(&plan).map_err(config_diagnostic::<R>)?;

        debug!(resource = R::TYPE_SUFFIX, "creating");
        let call = R::create(client, input).await;
        match RemoteOutcome::classify(R::CREATE_OPERATION, call) {
            RemoteOutcome::Applied(node) => {
                let mut state = plan;
                R::apply_created(&mut state, node);
                info!(resource = R::TYPE_SUFFIX, id = R::id(&state).unwrap_or_default(), "created");
                Ok(state)
            }
            outcome => Err(failure_diagnostic::<R, _>(Operation::Create, outcome)),
        }
    }

    /// `Ok(None)` means the remote record is gone and the caller should stop tracking it.
    pub async fn read(&self, current: R::Model) -> Result<Option<R::Model>, Diagnostic> {
        let client = self.client()?;
        let id = require_id::<R>(&current, Operation::Read)?;

        let node = R::fetch(client, &id).await.map_err(|e| {
            Diagnostic::error("Unable to Refresh Resource", e.to_string())
        })?;

        let Some(node) = node.filter(|n| !R::node_id(n).is_empty()) else {
            warn!(resource = R::TYPE_SUFFIX, id = %id, "remote record not found, removing from state");
            return Ok(None);
        };

        let mut state = current;
        R::refresh(&mut state, node);
        debug!(resource = R::TYPE_SUFFIX, id = %id, "refreshed");
        Ok(Some(state))
    }

    /// The id comes from `plan` and is never rewritten.
    pub async fn update(&self, plan: R::Model) -> Result<R::Model, Diagnostic> {
        let client = self.client()?;
        let input = R::update_input(&plan).map_err(config_diagnostic::<R>)?;
        let id = require_id::<R>(&plan, Operation::Update)?;

        let call = R::update(client, &id, input).await;
        match RemoteOutcome::classify(R::UPDATE_OPERATION, call) {
            RemoteOutcome::Applied(_) => {
                info!(resource = R::TYPE_SUFFIX, id = %id, "updated");
                Ok(plan)
            }
            outcome => Err(failure_diagnostic::<R, _>(Operation::Update, outcome)),
        }
    }

    pub async fn delete(&self, current: R::Model) -> Result<(), Diagnostic> {
        let client = self.client()?;
        let id = require_id::<R>(&current, Operation::Delete)?;

        let call = R::delete(client, &id).await;
        match RemoteOutcome::classify_deletion(call) {
            RemoteOutcome::Applied(()) => {
                info!(resource = R::TYPE_SUFFIX, id = %id, "deleted");
                Ok(())
            }
            outcome => Err(failure_diagnostic::<R, _>(Operation::Delete, outcome)),
        }
    }

    /// Seed a record from an externally supplied id; a Read hydrates the rest.
    pub fn import_state(&self, id: &str) -> R::Model {
        R::with_id(id.to_string())
    }

    /// Decide between create, in-place update, and replacement.
    pub fn plan(&self, prior: Option<&R::Model>, desired: &R::Model) -> Result<PlanAction, Diagnostic> {
        let Some(prior) = prior else {
            return Ok(PlanAction::Create);
        };
        let prior = to_value(prior)?;
        let mut desired = to_value(desired)?;
        if let (Some(object), Some(id)) = (desired.as_object_mut(), prior.get("id")) {
            object.insert("id".to_string(), id.clone());
        }

        let replaced = R::schema().replaced_attributes(&prior, &desired);
        Ok(if !replaced.is_empty() {
            PlanAction::Replace {
                attributes: replaced,
            }
        } else if prior == desired {
            PlanAction::NoOp
        } else {
            PlanAction::Update
        })
    }

    fn client(&self) -> Result<&C, Diagnostic> {
        self.client.as_deref().ok_or_else(|| {
            Diagnostic::error(
                "Unconfigured Resource",
                format!(
                    "The {} resource has no QueryDesk client. Configure the provider before using it.",
                    R::NOUN
                ),
            )
        })
    }
}

fn to_value<T: Serialize>(model: &T) -> Result<serde_json::Value, Diagnostic> {
    serde_json::to_value(model).map_err(|e| Diagnostic::error("Unable to encode state", e.to_string()))
}

fn require_id<R: RemoteResource>(model: &R::Model, op: Operation) -> Result<String, Diagnostic> {
    R::id(model)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Diagnostic::attribute_error(
                "id",
                format!("Unable to {} {}", op.verb(), R::NOUN),
                format!("Cannot {} a {} without an id.", op.verb(), R::NOUN),
            )
        })
}

fn config_diagnostic<R: RemoteResource>(e: QueryDeskError) -> Diagnostic {
    let summary = format!("Invalid {} configuration", R::NOUN);
    match e.attribute() {
        Some(attribute) => Diagnostic::attribute_error(attribute, summary, e.to_string()),
        None => Diagnostic::error(summary, e.to_string()),
    }
}

/// Only the first domain error is surfaced.
fn failure_diagnostic<R: RemoteResource, T>(op: Operation, outcome: RemoteOutcome<T>) -> Diagnostic {
    let summary = format!("Error {} {}", op.gerund(), R::NOUN);
    match outcome {
        RemoteOutcome::Transport(e) => {
            warn!(resource = R::TYPE_SUFFIX, operation = op.verb(), error = %e, "remote call failed");
            Diagnostic::error(
                summary,
                format!("Could not {} {}, unexpected error: {e}", op.verb(), R::NOUN),
            )
        }
        RemoteOutcome::Rejected(errors) => {
            warn!(
                resource = R::TYPE_SUFFIX,
                operation = op.verb(),
                count = errors.len(),
                "remote rejected request"
            );
            let message = errors
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_default();
            Diagnostic::error(summary, format!("Could not {} {}: {message}", op.verb(), R::NOUN))
        }
        RemoteOutcome::Applied(_) => Diagnostic::error(
            summary,
            format!("Could not {} {}: unexpected success", op.verb(), R::NOUN),
        ),
    }
}
