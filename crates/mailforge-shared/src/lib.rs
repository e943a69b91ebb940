//! # mailforge-shared
//!
//! Domain models for the Mailforge CRM / email-marketing core.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer over IPC.  The store crate reuses the same
//! types when encoding rows, so there is exactly one definition of each
//! entity in the workspace.

pub mod funnel;
pub mod models;

pub use funnel::{Branches, FunnelConfig, FunnelError, FunnelKind, FunnelNode};
pub use models::*;
