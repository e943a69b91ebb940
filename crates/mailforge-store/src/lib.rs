//! # mailforge-store
//!
//! Local persistence core for the Mailforge CRM dashboard.
//!
//! The relational engine lives entirely in memory; after every mutation
//! the whole database is serialized and published as a single snapshot
//! blob on disk by a background persister thread.  A [`Repository`] wraps
//! the store with an in-memory cache so UI reads never touch SQLite, and
//! exposes the CRUD / search surface the dashboard views consume.
//!
//! Durability is eventual: a repository call returns before its snapshot
//! has been renamed into place.  Call [`Store::flush`] (or
//! [`Repository::close`]) to wait for the persister to drain.

pub mod cache;
pub mod repository;
pub mod schema;
pub mod seed;
pub mod store;

mod codec;
mod error;
mod persist;
mod tables;

pub use error::{Result, StoreError};
pub use repository::{
    ContactPatch, NewActivity, NewContact, NewNotification, Repository, TemplateDraft,
};
pub use store::Store;
