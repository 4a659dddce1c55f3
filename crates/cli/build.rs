use std::process::Command;

fn main() {
    // APP_VERSION env wins, then the nearest git tag, then the crate version
    let version = std::env::var("APP_VERSION")
        .ok()
        .map(|v| strip_v(&v))
        .or_else(git_tag)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=APP_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=APP_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn git_tag() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let tag = String::from_utf8(output.stdout).ok()?;
    Some(strip_v(tag.trim()))
}

fn strip_v(tag: &str) -> String {
    tag.strip_prefix('v').unwrap_or(tag).to_string()
}
