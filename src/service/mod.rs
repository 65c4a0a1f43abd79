pub mod reconciler;

pub use reconciler::{PlanAction, Reconciler, RemoteOutcome, RemoteResource};
