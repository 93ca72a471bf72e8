//! Test helpers for generating unique test data
//!
//! ULID-based so that repeated test runs against the same database never
//! collide on unique columns.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email1 = unique_email("test");
/// let email2 = unique_email("test");
/// assert_ne!(email1, email2);
/// assert!(email1.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
