/// Build-time git commit SHA stamped by build.rs when available.
pub fn git_sha() -> Option<&'static str> {
    option_env!("CHAPTER_MIGRATE_BUILD_GIT_SHA")
}

/// Version string shown by `--version`, with the commit appended when known.
pub fn long_version() -> String {
    match git_sha() {
        Some(sha) => {
            let short = sha.get(..12).unwrap_or(sha);
            format!("{} ({short})", env!("CARGO_PKG_VERSION"))
        }
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}
