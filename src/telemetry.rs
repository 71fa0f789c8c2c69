//! Logging setup for the game server.
//!
//! `LOG_LEVEL` holds the filter directives, `LOG_FORMAT=json` switches to
//! structured output. Gameplay events go to the `quest` target, process and
//! server lifecycle to `skystack`.

use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Gameplay and lifecycle at debug, HTTP plumbing at info.
pub const DEFAULT_FILTER: &str = "info,quest=debug,skystack=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything other than "json" (any case) falls back to pretty output.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing() {
    let format = LogFormat::from_env();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let installed = match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.try_init().is_ok(),
    };
    if installed {
        tracing::info!(target: "skystack", ?format, "Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("compact")), LogFormat::Pretty);
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
