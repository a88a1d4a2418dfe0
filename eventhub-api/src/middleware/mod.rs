/// Middleware for the API server
///
/// - `auth`: bearer authentication, role gates and the verified-email gate
/// - `validation`: the `ValidatedJson` extractor and custom field predicates
/// - `errors`: exposes diagnostic error detail outside production

pub mod auth;
pub mod errors;
pub mod validation;
