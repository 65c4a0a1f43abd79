//! Remote API surface: the operations the reconciler depends on and the
//! HTTP client that implements them.

pub mod client;
pub mod operations;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::QueryDeskError;
use crate::types::{
    CreateCredentialInput, CreateDatabaseInput, MutationResult, RemoteCredential, RemoteDatabase,
    RemoteId, UpdateCredentialInput, UpdateDatabaseInput,
};
use std::future::Future;

pub use client::QueryDeskClient;

/// The eight QueryDesk operations. `Err` is a transport failure; domain
/// failures travel inside [`MutationResult::errors`].
pub trait QueryDeskApi: Send + Sync {
    fn get_database(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RemoteDatabase>, QueryDeskError>> + Send;

    fn create_database(
        &self,
        input: CreateDatabaseInput,
    ) -> impl Future<Output = Result<MutationResult<RemoteDatabase>, QueryDeskError>> + Send;

    fn update_database(
        &self,
        id: &str,
        input: UpdateDatabaseInput,
    ) -> impl Future<Output = Result<MutationResult<RemoteDatabase>, QueryDeskError>> + Send;

    fn delete_database(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MutationResult<RemoteId>, QueryDeskError>> + Send;

    fn get_credential(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RemoteCredential>, QueryDeskError>> + Send;

    fn create_credential(
        &self,
        input: CreateCredentialInput,
    ) -> impl Future<Output = Result<MutationResult<RemoteCredential>, QueryDeskError>> + Send;

    fn update_credential(
        &self,
        id: &str,
        input: UpdateCredentialInput,
    ) -> impl Future<Output = Result<MutationResult<RemoteCredential>, QueryDeskError>> + Send;

    fn delete_credential(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MutationResult<RemoteId>, QueryDeskError>> + Send;
}
