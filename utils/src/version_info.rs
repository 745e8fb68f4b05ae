//! Version information for the service, populated at build time.
//!
//! Display format per runtime environment:
//! - PR: `pr:{number}` (number passed via `PR_NUMBER` at build time)
//! - Prod: `stable:{version}`
//! - Nightly: `nightly:{date}`
//! - Internal: `internal:{commit}`
//! - Local/Test: `main:{commit}`

/// Environment the service was started in, decided at runtime from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    /// Local development
    Local,
    /// Production
    Prod,
    /// Internal testing
    Internal,
    /// Test environment
    Test,
    /// Test-internal environment
    TestInternal,
    /// Pull request preview
    Pr,
    /// Nightly build
    Nightly,
}

/// Build date in RFC3339 format.
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

/// Short git commit hash, or `unknown` outside a checkout.
pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

/// Package version.
pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Format the version string reported for `env`, e.g. `main:1a2b3c4`.
pub fn format_version_for_runtime_env(env: RuntimeEnv) -> String {
    match env {
        RuntimeEnv::Pr => {
            let pr_number = option_env!("PR_NUMBER").unwrap_or("unknown");
            format!("pr:{pr_number}")
        }
        RuntimeEnv::Nightly => format!("nightly:{}", date_part(build_date())),
        RuntimeEnv::Internal => format!("internal:{}", build_commit()),
        RuntimeEnv::TestInternal => format!("test-internal:{}", build_commit()),
        RuntimeEnv::Test | RuntimeEnv::Local => format!("main:{}", build_commit()),
        RuntimeEnv::Prod => format!("stable:{}", build_version()),
    }
}

// BUILD_DATE is RFC3339, so the first ten bytes are the calendar date.
fn date_part(date: &str) -> &str {
    if date.len() >= 10 && date.is_ascii() {
        &date[..10]
    } else {
        date
    }
}
