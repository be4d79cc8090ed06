//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "gwref",
    "gwref_io",
    "gwref_model",
    "gwref_series",
    "gwref_stats",
];

/// Filter directive for a verbosity level.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
pub fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a `fmt` subscriber filtered to the workspace crates.
///
/// `RUST_LOG` overrides `verbosity` if set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_levels() {
        assert!(default_filter(0).starts_with("gwref=warn,"));
        assert!(default_filter(1).contains("gwref_model=info"));
        assert!(default_filter(2).contains("gwref_series=debug"));
        assert!(default_filter(7).ends_with("gwref_stats=trace"));
    }

    #[test]
    fn filter_covers_every_crate() {
        let filter = default_filter(1);
        assert_eq!(filter.split(',').count(), CRATE_TARGETS.len());
        assert!(EnvFilter::try_new(filter).is_ok());
    }
}
