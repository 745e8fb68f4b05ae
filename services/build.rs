use std::process::Command;

fn main() {
    let build_date = chrono::Utc::now().to_rfc3339();
    let commit = git(&["rev-parse", "--short", "HEAD"]);
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"]);

    for (key, value) in [
        ("BUILD_DATE", build_date.as_str()),
        ("BUILD_COMMIT", commit.as_str()),
        ("BUILD_BRANCH", branch.as_str()),
    ] {
        println!("cargo:rustc-env={key}={value}");
    }
    println!("cargo:rerun-if-changed=../.git/HEAD");
}

/// Trimmed stdout of a git command, or `unknown` outside a checkout.
fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|stdout| stdout.trim().to_owned())
        .filter(|stdout| !stdout.is_empty())
        .unwrap_or_else(|| "unknown".to_owned())
}
