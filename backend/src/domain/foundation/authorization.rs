//! Authorization primitives.
//!
//! Every protected operation performs exactly one of two flat checks:
//!
//! - [`has_role`] - the principal's role equals the required role
//! - [`is_owner`] - the principal owns the resource
//!
//! There is no role hierarchy and no permission composition. The
//! [`require_role`] and [`require_owner`] helpers wrap those checks in an
//! [`AuthorizationResult`] so handlers log and convert them the same way.
//!
//! ```ignore
//! let result = require_role(&principal, Role::Organizer, "create event");
//! log_authorization(&result);
//! result.into_result()?;
//! ```

use super::{DomainError, ErrorCode, OwnedByUser, Principal, Role};

/// Returns true when the principal's role is exactly `required`.
pub fn has_role(principal: &Principal, required: Role) -> bool {
    principal.role == required
}

/// Returns true when the principal owns `resource`.
pub fn is_owner<T>(principal: &Principal, resource: &T) -> bool
where
    T: OwnedByUser + ?Sized,
{
    resource.is_owner(&principal.id)
}

/// Result of an authorization check.
///
/// Contains both the decision and context for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// What was being attempted (e.g., "create event", "Event").
    pub subject: String,

    /// The user who requested access.
    pub user_id: String,

    /// Reason for denial, if denied.
    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(subject: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            granted: true,
            subject: subject.into(),
            user_id: user_id.into(),
            denial_reason: None,
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        subject: impl Into<String>,
        user_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            subject: subject.into(),
            user_id: user_id.into(),
            denial_reason: Some(reason.into()),
        }
    }

    /// Converts this result to a `Result<(), DomainError>`.
    ///
    /// Returns `Ok(())` if granted, `Err(Forbidden)` if denied.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.granted {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                self.denial_reason
                    .unwrap_or_else(|| "Access denied".to_string()),
            )
            .with_detail("subject", self.subject)
            .with_detail("user_id", self.user_id))
        }
    }

    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Returns true if access was denied.
    pub fn is_denied(&self) -> bool {
        !self.granted
    }
}

/// Helper trait for resources that appear in authorization logs.
pub trait Authorizable {
    /// The type name for authorization logs (e.g., "Event").
    const RESOURCE_TYPE: &'static str;

    /// Returns a string representation of this resource's ID.
    fn resource_id(&self) -> String;
}

/// Role check wrapped as an [`AuthorizationResult`].
pub fn require_role(
    principal: &Principal,
    required: Role,
    action: &str,
) -> AuthorizationResult {
    if has_role(principal, required) {
        AuthorizationResult::granted(action, principal.id.to_string())
    } else {
        AuthorizationResult::denied(
            action,
            principal.id.to_string(),
            format!(
                "Role {} is required to {}, user has {}",
                required, action, principal.role
            ),
        )
    }
}

/// Ownership check wrapped as an [`AuthorizationResult`].
pub fn require_owner<T>(principal: &Principal, resource: &T) -> AuthorizationResult
where
    T: OwnedByUser + Authorizable,
{
    let subject = format!("{} {}", T::RESOURCE_TYPE, resource.resource_id());
    if is_owner(principal, resource) {
        AuthorizationResult::granted(subject, principal.id.to_string())
    } else {
        AuthorizationResult::denied(
            subject,
            principal.id.to_string(),
            format!(
                "User {} does not own {} {}",
                principal.id,
                T::RESOURCE_TYPE,
                resource.resource_id()
            ),
        )
    }
}
