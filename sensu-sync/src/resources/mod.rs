//! Resource modules: thin per-type declarations over the shared core.
//!
//! Each module declares its field comparison schema, assembles the wire
//! payload from operator parameters and delegates to
//! [`crate::reconcile::sync`]. All handler flavors live in the same
//! `/handlers` collection and are distinguished by the `type` field.

pub mod handler_set;
pub mod pipe_handler;
pub mod socket_handler;

/// Collection segment shared by all handler flavors.
pub(crate) const HANDLERS: &str = "handlers";
