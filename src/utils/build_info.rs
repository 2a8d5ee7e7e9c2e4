/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub rustc: &'static str,
}

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: CLI_VERSION,
        git_hash: option_env!("COMMODITY_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("COMMODITY_LEDGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("COMMODITY_LEDGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("COMMODITY_LEDGER_BUILD_TARGET").unwrap_or("unknown"),
        rustc: option_env!("COMMODITY_LEDGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    pub fn summary(&self) -> String {
        format!(
            "commodity_ledger {} ({} {}, built {} for {})",
            self.version, self.git_hash, self.git_status, self.timestamp, self.target
        )
    }
}
