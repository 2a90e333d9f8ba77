//! Origin allow-list checking for the relay path.

/// Check a declared Origin against an account's allow-list.
///
/// An empty list allows any origin. Otherwise the origin must match an
/// entry exactly, or match modulo a single trailing slash in either
/// direction (the two common serializations of the same origin). No
/// wildcard or subdomain matching.
pub fn origin_allowed(allowed_origins: &[String], origin: &str) -> bool {
    if allowed_origins.is_empty() {
        return true;
    }

    allowed_origins.iter().any(|allowed| {
        allowed == origin
            || allowed.strip_suffix('/') == Some(origin)
            || origin.strip_suffix('/') == Some(allowed.as_str())
    })
}
