use crate::api::QueryDeskApi;
use crate::error::QueryDeskError;
use crate::schema::{Attribute, PlanModifier, Schema};
use crate::service::RemoteResource;
use crate::types::{
    CreateCredentialInput, MutationResult, RemoteCredential, RemoteId, UpdateCredentialInput,
};
use serde::{Deserialize, Serialize};

/// `querydesk_database_user` state. The password is write-only.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialModel {
    pub id: Option<String>,
    pub database_id: String,
    pub description: Option<String>,
    pub username: String,
    pub password: String,
    pub reviews_required: i64,
}

impl std::fmt::Debug for CredentialModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialModel")
            .field("id", &self.id)
            .field("database_id", &self.database_id)
            .field("description", &self.description)
            .field("username", &self.username)
            .field("password", &"<sensitive>")
            .field("reviews_required", &self.reviews_required)
            .finish()
    }
}

impl CredentialModel {
    fn checked_reviews_required(&self) -> Result<i64, QueryDeskError> {
        if self.reviews_required < 0 {
            return Err(QueryDeskError::InvalidAttribute {
                attribute: "reviews_required",
                message: format!("must be 0 or greater, got {}", self.reviews_required),
            });
        }
        Ok(self.reviews_required)
    }

    /// Blank descriptions are left out of create inputs.
    fn description(&self) -> Option<String> {
        self.description.clone().filter(|d| !d.is_empty())
    }
}

pub struct CredentialResource;

impl RemoteResource for CredentialResource {
    type Model = CredentialModel;
    type CreateInput = CreateCredentialInput;
    type UpdateInput = UpdateCredentialInput;
    type Node = RemoteCredential;

    const TYPE_SUFFIX: &'static str = "database_user";
    const NOUN: &'static str = "database user";
    const CREATE_OPERATION: &'static str = "createCredential";
    const UPDATE_OPERATION: &'static str = "updateCredential";

    fn schema() -> Schema {
        Schema::new(
            "Database user QueryDesk connects as.",
            vec![
                Attribute::string("id")
                    .computed()
                    .description("ID")
                    .plan_modifier(PlanModifier::UseStateForUnknown),
                Attribute::string("description")
                    .optional()
                    .description("Info shown in the UI to help identify available users."),
                Attribute::string("username")
                    .required()
                    .description("The user to authenticate with."),
                Attribute::string("password")
                    .required()
                    .sensitive()
                    .description("The password to authenticate the user with."),
                Attribute::int64("reviews_required")
                    .required()
                    .description(
                        "How many reviews are required to use this user. Can be set to 0 to not require reviews.",
                    ),
                Attribute::string("database_id")
                    .required()
                    .description("Identifier of the related database.")
                    .plan_modifier(PlanModifier::RequiresReplace),
            ],
        )
    }

    fn id(model: &CredentialModel) -> Option<&str> {
        model.id.as_deref()
    }

    fn with_id(id: String) -> CredentialModel {
        CredentialModel {
            id: Some(id),
            ..CredentialModel::default()
        }
    }

    fn node_id(node: &RemoteCredential) -> &str {
        &node.id
    }

    fn create_input(model: &CredentialModel) -> Result<CreateCredentialInput, QueryDeskError> {
        Ok(CreateCredentialInput {
            database_id: model.database_id.clone(),
            description: model.description(),
            username: model.username.clone(),
            password: model.password.clone(),
            reviews_required: model.checked_reviews_required()?,
        })
    }

    fn update_input(model: &CredentialModel) -> Result<UpdateCredentialInput, QueryDeskError> {
        Ok(UpdateCredentialInput {
            description: model.description().unwrap_or_default(),
            username: model.username.clone(),
            new_password: model.password.clone(),
            reviews_required: model.checked_reviews_required()?,
        })
    }

    fn apply_created(model: &mut CredentialModel, node: RemoteCredential) {
        model.id = Some(node.id);
    }

    fn refresh(model: &mut CredentialModel, node: RemoteCredential) {
        if let Some(description) = node.description.filter(|d| !d.is_empty()) {
            model.description = Some(description);
        }
        model.username = node.username;
        model.reviews_required = node.reviews_required;
        model.database_id = node.database.id;
    }

    async fn fetch<C: QueryDeskApi>(
        client: &C,
        id: &str,
    ) -> Result<Option<RemoteCredential>, QueryDeskError> {
        client.get_credential(id).await
    }

    async fn create<C: QueryDeskApi>(
        client: &C,
        input: CreateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        client.create_credential(input).await
    }

    async fn update<C: QueryDeskApi>(
        client: &C,
        id: &str,
        input: UpdateCredentialInput,
    ) -> Result<MutationResult<RemoteCredential>, QueryDeskError> {
        client.update_credential(id, input).await
    }

    async fn delete<C: QueryDeskApi>(
        client: &C,
        id: &str,
    ) -> Result<MutationResult<RemoteId>, QueryDeskError> {
        client.delete_credential(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::service::{PlanAction, Reconciler};
    use crate::types::credential::DatabaseRef;
    use std::sync::Arc;

    type CredentialReconciler = Reconciler<CredentialResource, FakeApi>;

    fn desired(username: &str) -> CredentialModel {
        CredentialModel {
            database_id: "db_12345".into(),
            username: username.into(),
            password: "postgres".into(),
            reviews_required: 0,
            ..CredentialModel::default()
        }
    }

    fn setup() -> (Arc<FakeApi>, CredentialReconciler) {
        let api = Arc::new(FakeApi::new());
        let reconciler = CredentialReconciler::with_client(api.clone());
        (api, reconciler)
    }

    #[tokio::test]
    async fn create_then_read_hydrates_from_remote() {
        let (api, reconciler) = setup();

        let created = reconciler.create(desired("postgres")).await.expect("create");
        assert_eq!(created.id.as_deref(), Some("crd_12345"));

        let read = reconciler
            .read(reconciler.import_state("crd_12345"))
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(read.username, "postgres");
        assert_eq!(read.reviews_required, 0);
        assert_eq!(read.database_id, "db_12345");
        assert!(read.password.is_empty(), "password is never read back");
        assert_eq!(api.calls(), vec!["createCredential", "getCredential"]);
    }

    #[tokio::test]
    async fn read_keeps_password_and_local_description_over_blank_remote() {
        let (api, reconciler) = setup();
        api.insert_credential(RemoteCredential {
            id: "crd_1".into(),
            description: Some(String::new()),
            username: "reader".into(),
            reviews_required: 2,
            database: DatabaseRef { id: "db_7".into() },
        });
        let local = CredentialModel {
            id: Some("crd_1".into()),
            description: Some("read replica".into()),
            ..desired("old")
        };

        let read = reconciler.read(local).await.expect("read").expect("exists");

        assert_eq!(read.description.as_deref(), Some("read replica"));
        assert_eq!(read.password, "postgres");
        assert_eq!(read.username, "reader");
        assert_eq!(read.reviews_required, 2);
        assert_eq!(read.database_id, "db_7");
    }

    #[tokio::test]
    async fn read_takes_non_empty_remote_description() {
        let (api, reconciler) = setup();
        api.insert_credential(RemoteCredential {
            id: "crd_1".into(),
            description: Some("set in the UI".into()),
            username: "reader".into(),
            reviews_required: 1,
            database: DatabaseRef { id: "db_7".into() },
        });

        let read = reconciler
            .read(reconciler.import_state("crd_1"))
            .await
            .expect("read")
            .expect("exists");
        assert_eq!(read.description.as_deref(), Some("set in the UI"));
    }

    #[tokio::test]
    async fn blank_remote_identity_drops_the_record() {
        let (api, reconciler) = setup();
        api.insert_blank_credential("crd_gone");

        let read = reconciler
            .read(reconciler.import_state("crd_gone"))
            .await
            .expect("not an error");
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn update_rotates_password_and_keeps_id() {
        let (api, reconciler) = setup();
        let created = reconciler.create(desired("postgres")).await.expect("create");

        let updated = reconciler
            .update(CredentialModel {
                username: "other_user".into(),
                password: "rotated".into(),
                ..created
            })
            .await
            .expect("update");
        assert_eq!(updated.id.as_deref(), Some("crd_12345"));
        assert_eq!(updated.password, "rotated");

        let remote = api.credential("crd_12345").expect("remote");
        assert_eq!(remote.username, "other_user");
    }

    #[tokio::test]
    async fn cleared_description_is_sent_and_stays_cleared() {
        let (api, reconciler) = setup();
        let created = reconciler
            .create(CredentialModel {
                description: Some("old".into()),
                ..desired("postgres")
            })
            .await
            .expect("create");

        let config = CredentialModel {
            description: None,
            ..desired("postgres")
        };
        let input = CredentialResource::update_input(&config).expect("input");
        assert_eq!(
            serde_json::to_value(&input).expect("serialize")["description"],
            serde_json::json!("")
        );

        let updated = reconciler
            .update(CredentialModel {
                id: created.id.clone(),
                ..config.clone()
            })
            .await
            .expect("update");
        let read = reconciler.read(updated).await.expect("read").expect("exists");

        assert_eq!(read.description, None);
        assert_eq!(
            api.credential("crd_12345").and_then(|c| c.description),
            None
        );
        assert_eq!(reconciler.plan(Some(&read), &config), Ok(PlanAction::NoOp));
    }

    #[tokio::test]
    async fn update_rejection_leaves_state_untouched() {
        let (api, reconciler) = setup();
        let created = reconciler.create(desired("postgres")).await.expect("create");
        api.reject_next(["username is reserved"]);

        let diag = reconciler
            .update(CredentialModel {
                username: "root".into(),
                ..created
            })
            .await
            .expect_err("rejected");
        assert_eq!(diag.summary, "Error updating database user");
        assert!(diag.detail.ends_with("username is reserved"));
        assert_eq!(
            api.credential("crd_12345").map(|c| c.username).as_deref(),
            Some("postgres")
        );
    }

    #[tokio::test]
    async fn delete_with_no_errors_succeeds() {
        let (api, reconciler) = setup();
        reconciler.create(desired("postgres")).await.expect("create");

        reconciler
            .delete(reconciler.import_state("crd_12345"))
            .await
            .expect("delete");
        assert!(api.credential("crd_12345").is_none());
    }

    #[tokio::test]
    async fn delete_rejection_reports_first_error() {
        let (api, reconciler) = setup();
        api.reject_next(["credential is in use", "pending reviews"]);

        let diag = reconciler
            .delete(reconciler.import_state("crd_12345"))
            .await
            .expect_err("rejected");
        assert_eq!(diag.summary, "Error deleting database user");
        assert!(diag.detail.contains("credential is in use"));
        assert!(!diag.detail.contains("pending reviews"));
    }

    #[tokio::test]
    async fn negative_reviews_required_is_a_configuration_error() {
        let (api, reconciler) = setup();
        let diag = reconciler
            .create(CredentialModel {
                reviews_required: -1,
                ..desired("postgres")
            })
            .await
            .expect_err("invalid");
        assert_eq!(diag.attribute.as_deref(), Some("reviews_required"));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn moving_to_another_database_forces_replacement() {
        let reconciler = CredentialReconciler::new();
        let prior = CredentialModel {
            id: Some("crd_12345".into()),
            ..desired("postgres")
        };
        let moved = CredentialModel {
            database_id: "db_99".into(),
            ..desired("postgres")
        };
        assert_eq!(
            reconciler.plan(Some(&prior), &moved),
            Ok(PlanAction::Replace {
                attributes: vec!["database_id"]
            })
        );
        assert_eq!(
            reconciler.plan(Some(&prior), &desired("other_user")),
            Ok(PlanAction::Update)
        );
    }

    #[test]
    fn type_name_and_sensitive_password() {
        assert_eq!(
            CredentialReconciler::type_name("querydesk"),
            "querydesk_database_user"
        );
        let schema = CredentialReconciler::schema();
        assert!(schema.attribute("password").is_some_and(|a| a.sensitive));
        assert!(
            schema
                .attribute("database_id")
                .is_some_and(|a| a.requires_replace())
        );
        assert!(!format!("{:?}", desired("u")).contains("postgres\""));
    }
}
