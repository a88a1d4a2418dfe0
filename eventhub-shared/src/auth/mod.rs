/// Authentication and authorization utilities
///
/// This module provides the authentication primitives for EventHub:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: JWT token generation and validation
/// - [`verification`]: Email verification token generation and hashing
/// - [`middleware`]: Bearer token extraction and the request `AuthContext`
/// - [`authorization`]: Roles, role sets and ownership checks
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::auth::password::{hash_password, verify_password};
/// use eventhub_shared::auth::jwt::{create_token, validate_token, Claims};
/// use eventhub_shared::models::user::Role;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(1, "user@example.com", Role::User, Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod verification;
