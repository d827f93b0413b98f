//! User-Agent string for download requests.

/// Homepage advertised in the User-Agent.
const PROJECT_UA_URL: &str = "https://github.com/fierce/picfetch";

/// `picfetch/<version> (+<homepage>)`
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("picfetch/{version} (+{PROJECT_UA_URL})")
}
