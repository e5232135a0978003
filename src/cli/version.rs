//! Version command handler

/// One-line version string
pub fn version_string() -> String {
    format!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Display version information
pub fn display_version() {
    println!("{}", version_string());
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        let version = version_string();
        assert!(version.starts_with("kubectl-check-ownerreferences version "));
        assert!(version.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
