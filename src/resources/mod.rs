//! Managed resource types and the read-only database data source.

pub mod credential;
pub mod data_source;
pub mod database;

use crate::service::Reconciler;

pub use credential::{CredentialModel, CredentialResource};
pub use data_source::{DatabaseDataModel, DatabaseDataSource};
pub use database::{DatabaseModel, DatabaseResource};

pub type DatabaseReconciler<C> = Reconciler<DatabaseResource, C>;
pub type CredentialReconciler<C> = Reconciler<CredentialResource, C>;
