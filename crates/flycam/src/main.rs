mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "flycam", version, about = "Flycam live video receiver")]
struct Cli {
    /// Output format (default: table on a terminal, json otherwise).
    #[arg(long, short = 'o', value_name = "FORMAT", global = true)]
    output: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). `FLYCAM_LOG` adds per-target directives.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let output = cli.output.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, output);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::FormatArg;

    #[test]
    fn parses_inspect_subcommand() {
        let cli = Cli::try_parse_from([
            "flycam",
            "inspect",
            "/tmp/frame.bin",
            "--format",
            "jpeg",
            "--metadata",
            "/tmp/meta.bin",
        ])
        .expect("inspect args should parse");

        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.format, FormatArg::Jpeg);
        assert!(args.metadata.is_some());
    }

    #[test]
    fn inspect_defaults_to_packed() {
        let cli = Cli::try_parse_from(["flycam", "inspect", "frame.bin"]).unwrap();
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.format, FormatArg::Packed);
    }

    #[test]
    fn rejects_unknown_wire_format() {
        let err = Cli::try_parse_from(["flycam", "inspect", "f.bin", "--format", "png"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["flycam", "version"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
        let cli = Cli::try_parse_from(["flycam", "version", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn output_flag_is_global() {
        let cli = Cli::try_parse_from(["flycam", "version", "-o", "json"]).unwrap();
        assert!(matches!(cli.output, Some(OutputFormat::Json)));
    }

    #[cfg(feature = "zmq")]
    #[test]
    fn parses_watch_subcommand() {
        let cli = Cli::try_parse_from([
            "flycam",
            "watch",
            "tcp://127.0.0.1:5555",
            "--meta",
            "tcp://127.0.0.1:5556",
            "--format",
            "jpeg",
            "--count",
            "3",
        ])
        .expect("watch args should parse");
        assert!(matches!(cli.command, Command::Watch(_)));
    }
}
