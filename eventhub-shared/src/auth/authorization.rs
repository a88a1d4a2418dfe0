/// Authorization helpers and permission checks
///
/// # Permission Model
///
/// 1. **Role gates**: a route declares the [`RoleSet`] allowed through it;
///    the caller's role (from the token) must be a member.
/// 2. **Ownership**: participant records may be read or changed by staff
///    (ADMIN, ORGANIZER) or by the user the record wraps.
/// 3. **Verified email**: optionally required before self-registration; this
///    check reads the `users` row on every call.
///
/// # Example
///
/// ```
/// use eventhub_shared::auth::authorization::{require_role, RoleSet};
/// use eventhub_shared::auth::middleware::AuthContext;
/// use eventhub_shared::models::user::Role;
///
/// let auth = AuthContext { user_id: 1, email: "o@example.com".into(), role: Role::Organizer };
///
/// assert!(require_role(&auth, RoleSet::STAFF).is_ok());
/// assert!(require_role(&auth, RoleSet::ADMIN).is_err());
/// ```

use sqlx::PgPool;

use super::middleware::AuthContext;
use crate::models::user::{Role, User};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the allowed set
    #[error("Insufficient permissions: role {actual} not in {allowed:?}")]
    InsufficientRole { allowed: RoleSet, actual: Role },

    /// Caller neither owns the resource nor is staff
    #[error("Not authorized to access this resource")]
    NotOwner,

    /// Caller's email address is not verified yet
    #[error("Email address not verified")]
    EmailNotVerified,

    /// Caller's user row no longer exists
    #[error("User {0} not found")]
    UnknownUser(i32),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// A set of roles, checked by membership
///
/// Built at compile time from the closed [`Role`] enum:
///
/// ```
/// use eventhub_shared::auth::authorization::RoleSet;
/// use eventhub_shared::models::user::Role;
///
/// const WRITERS: RoleSet = RoleSet::of(&[Role::Admin, Role::Organizer]);
/// assert!(WRITERS.contains(Role::Organizer));
/// assert!(!WRITERS.contains(Role::User));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    /// ADMIN only
    pub const ADMIN: RoleSet = RoleSet::of(&[Role::Admin]);

    /// ADMIN or ORGANIZER
    pub const STAFF: RoleSet = RoleSet::of(&[Role::Admin, Role::Organizer]);

    /// Every role
    pub const ANY: RoleSet = RoleSet::of(&[Role::Admin, Role::Organizer, Role::User]);

    /// Builds a set from a list of roles
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= Self::bit(roles[i]);
            i += 1;
        }
        Self(bits)
    }

    /// Checks whether `role` is in the set
    pub const fn contains(self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    /// Iterates the roles in the set, highest privilege first
    pub fn roles(self) -> impl Iterator<Item = Role> {
        [Role::Admin, Role::Organizer, Role::User]
            .into_iter()
            .filter(move |role| self.contains(*role))
    }

    const fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 0b001,
            Role::Organizer => 0b010,
            Role::User => 0b100,
        }
    }
}

impl std::fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.roles()).finish()
    }
}

/// Checks the caller's role against an allowed set
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` if the role is not allowed
pub fn require_role(auth: &AuthContext, allowed: RoleSet) -> Result<(), AuthzError> {
    if !allowed.contains(auth.role) {
        return Err(AuthzError::InsufficientRole {
            allowed,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Checks that the caller may act on a record owned by `owner_user_id`
///
/// Staff may act on any record; everyone else only on their own.
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` otherwise
pub fn require_ownership(auth: &AuthContext, owner_user_id: i32) -> Result<(), AuthzError> {
    if RoleSet::STAFF.contains(auth.role) || auth.user_id == owner_user_id {
        return Ok(());
    }

    Err(AuthzError::NotOwner)
}

/// Checks that the caller's email address is verified
///
/// Performs one read of the `users` row per call; nothing is cached.
///
/// # Errors
///
/// - `AuthzError::UnknownUser` if the user was deleted after the token was issued
/// - `AuthzError::EmailNotVerified` if the flag is unset
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn require_verified(pool: &PgPool, auth: &AuthContext) -> Result<(), AuthzError> {
    let user = User::find_by_id(pool, auth.user_id)
        .await?
        .ok_or(AuthzError::UnknownUser(auth.user_id))?;

    if !user.is_email_verified {
        return Err(AuthzError::EmailNotVerified);
    }

    Ok(())
}
