//! Page route classification for the access gate.
//!
//! Classification is a pair of static prefix lists evaluated in order. A
//! prefix matches a path when the path equals it or continues with `/`, so
//! `/dashboard` covers `/dashboard/ideas/4` but not `/dashboards`.

/// Page routes that require a session.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/arena"];

/// Protected routes that additionally require a verified email address.
pub const VERIFICATION_REQUIRED_PREFIXES: &[&str] = &["/arena"];

/// Paths the gate never inspects: API routes, static assets and image
/// optimisation.
pub const UNGATED_PREFIXES: &[&str] = &[
    "/api",
    "/assets",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
];

/// Where unauthenticated visitors of protected pages are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Where signed-in but unverified visitors of verification-gated pages are sent.
pub const VERIFICATION_NEEDED_PATH: &str = "/verify-email";

/// Access requirement of a page route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected,
    /// Protected and the user's email must be verified.
    VerificationRequired,
}

impl RouteAccess {
    pub fn is_protected(self) -> bool {
        !matches!(self, RouteAccess::Public)
    }
}

/// Whether the access gate applies to `path` at all.
pub fn is_gated(path: &str) -> bool {
    !matches_any(path, UNGATED_PREFIXES)
}

/// Classify a request path.
pub fn classify(path: &str) -> RouteAccess {
    if matches_any(path, VERIFICATION_REQUIRED_PREFIXES) {
        RouteAccess::VerificationRequired
    } else if matches_any(path, PROTECTED_PREFIXES) {
        RouteAccess::Protected
    } else {
        RouteAccess::Public
    }
}

fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| matches_prefix(path, prefix))
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
