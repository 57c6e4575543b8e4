use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Extra filter directives, e.g. `flycam_frame=debug,flycam_transport=warn`.
pub const LOG_ENV: &str = "FLYCAM_LOG";

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// The level sets the default for every target; directives from the
/// environment are layered after it and win for the targets they name.
fn filter_directives(level: LogLevel, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|extra| !extra.is_empty()) {
        Some(extra) => format!("{},{extra}", level.as_str()),
        None => level.as_str().to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let extra = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::builder().parse_lossy(filter_directives(level, extra.as_deref()));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(matches!(level, LogLevel::Debug | LogLevel::Trace) || extra.is_some());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().with_current_span(false).try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_alone() {
        assert_eq!(filter_directives(LogLevel::Warn, None), "warn");
        assert_eq!(filter_directives(LogLevel::Info, Some("  ")), "info");
    }

    #[test]
    fn env_directives_follow_level() {
        let directives = filter_directives(LogLevel::Error, Some("flycam_frame=debug"));
        assert_eq!(directives, "error,flycam_frame=debug");

        let filter = EnvFilter::builder().parse_lossy(&directives);
        assert!(filter.to_string().contains("flycam_frame=debug"));
    }
}
