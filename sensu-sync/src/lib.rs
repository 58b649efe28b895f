//! sensu-sync: declarative state synchronization for Sensu Go resources.
//!
//! The operator declares a desired state (present with attributes, or
//! absent) for a named resource; the reconciliation core fetches the
//! current remote object, compares it field by field and issues at most
//! one mutating request to converge. Check mode computes and reports the
//! change without mutating anything.

pub mod auth;
pub mod client;
pub mod compare;
pub mod error;
pub mod payload;
pub mod reconcile;
pub mod resources;

pub use auth::Credentials;
pub use client::{Client, Document, object_path};
pub use compare::{CompareSchema, FieldPolicy};
pub use error::{Error, Result};
pub use reconcile::{DesiredState, sync};
