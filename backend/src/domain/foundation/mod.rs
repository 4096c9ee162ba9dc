//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, roles, authentication and
//! authorization primitives, and error types shared by every domain module.

mod auth;
mod authorization;
mod command;
mod errors;
mod ids;
mod ownership;
mod role;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, Principal};
pub use authorization::{
    has_role, is_owner, require_owner, require_role, Authorizable, AuthorizationResult,
};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EventId, EventSessionId, ForumId, ForumMessageId, UserId};
pub use ownership::OwnedByUser;
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
