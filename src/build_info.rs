//! Build information module
//!
//! Compile-time build number and timestamp, plus the startup banner.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Counter value stamped by build.rs; 0 outside a cargo build
pub fn build_number() -> u64 {
    parse_build_number(option_env!("BARTINDR_BUILD_NUMBER"))
}

/// ISO 8601 build time, or "unknown"
pub fn build_timestamp() -> &'static str {
    option_env!("BARTINDR_BUILD_TIMESTAMP")
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
}

fn parse_build_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Build information for status responses
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: build_number(),
            build_timestamp: build_timestamp(),
        }
    }
}

/// Print the startup banner to stderr (stdout carries MCP traffic)
pub fn print_startup_banner(vocabulary_source: &str) {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  Bartindr measure normalization");
    eprintln!("  Version: {} | Build: {}", info.version, info.build_number);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("  Vocabulary: {}", vocabulary_source);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number(Some("42")), 42);
        assert_eq!(parse_build_number(Some(" 7\n")), 7);
        assert_eq!(parse_build_number(Some("")), 0);
        assert_eq!(parse_build_number(Some("4x")), 0);
        assert_eq!(parse_build_number(None), 0);
    }

    #[test]
    fn test_build_info_current() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "bartindr");
        assert_eq!(info.version, VERSION);
    }
}
