//! Unique test data built from ULIDs so parallel tests never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("game");
/// let b = unique_str("game");
/// assert_ne!(a, b);
/// assert!(a.starts_with("game-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A display name that fits the 32 character limit for session names.
///
/// Keeps the prefix (up to 8 chars) and the random tail of a ULID.
pub fn unique_display_name(prefix: &str) -> String {
    let prefix: String = prefix.chars().take(8).collect();
    let ulid = Ulid::new().to_string();
    format!("{}-{}", prefix, &ulid[ulid.len() - 12..])
}

/// A random v4-shaped UUID string, useful for video task ids.
pub fn unique_task_uuid() -> String {
    let bytes = Ulid::new().0.to_be_bytes();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    // Force version 4 and RFC 4122 variant nibbles.
    format!(
        "{}-{}-4{}-a{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[13..16],
        &hex[17..20],
        &hex[20..32]
    )
}
