//! Project access control.
//!
//! Every protected resource belongs to a project through a fixed ownership
//! chain (entity -> data model -> project). The [`RoleResolver`] walks that
//! chain and decides the caller's [`Role`]; [`is_method_allowed`] maps a role
//! onto the HTTP verbs it may use; the [`AccessGate`] composes both and is
//! what the HTTP layer calls at every guarded route.

pub mod error;
pub mod gate;
pub mod method;
pub mod resolver;
pub mod resource;
pub mod role;
pub mod store;

pub use error::AccessError;
pub use gate::{AccessGate, GatePolicy, Permit};
pub use method::{allowed_methods, is_method_allowed, is_method_allowed_str};
pub use resolver::{Resolution, RoleResolver};
pub use resource::ResourceRef;
pub use role::{Role, UnknownRole};
pub use store::{AccessFixture, AccessStore, MemoryAccessStore, PgAccessStore, ProjectOwnership, StoreError};
