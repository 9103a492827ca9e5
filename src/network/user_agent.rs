//! User agent and header values

/// User agent identifying this application
pub fn default_user_agent() -> String {
    format!(
        "skdocs/{} (+{})",
        crate::VERSION,
        env!("CARGO_PKG_REPOSITORY")
    )
}

/// Standard accept header for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}
