use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use flycam_frame::WireFormat;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod inspect;
pub mod version;
#[cfg(feature = "zmq")]
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one captured video message and print a summary.
    Inspect(InspectArgs),
    /// Subscribe to a camera and print every decoded frame.
    #[cfg(feature = "zmq")]
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, output: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, output),
        #[cfg(feature = "zmq")]
        Command::Watch(args) => watch::run(args, output),
        Command::Version(args) => version::run(args),
    }
}

/// Packed frames embed their own metadata table; a separate metadata source
/// only pairs with JPEG.
pub(crate) fn check_metadata_source(format: FormatArg, flag: &str) -> CliResult<()> {
    match format {
        FormatArg::Jpeg => Ok(()),
        FormatArg::Packed => Err(CliError::new(
            USAGE,
            format!("{flag} requires --format jpeg; packed frames carry their own metadata"),
        )),
    }
}

/// Wire layout of the video channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[default]
    Packed,
    Jpeg,
}

impl From<FormatArg> for WireFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Packed => WireFormat::Packed,
            FormatArg::Jpeg => WireFormat::Jpeg,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File holding one video message exactly as received.
    pub file: PathBuf,
    /// Wire layout of the message.
    #[arg(long, value_enum, default_value = "packed")]
    pub format: FormatArg,
    /// Metadata-channel message to apply before decoding (JPEG only).
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,
    /// Reject frames with more pixels than this.
    #[arg(long, value_name = "PIXELS")]
    pub max_pixels: Option<usize>,
}

#[cfg(feature = "zmq")]
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Video endpoint, e.g. tcp://127.0.0.1:5555.
    pub endpoint: String,
    /// Metadata endpoint (JPEG only; packed frames embed their metadata).
    #[arg(long, value_name = "ENDPOINT")]
    pub meta: Option<String>,
    /// Wire layout of the video channel.
    #[arg(long, value_enum, default_value = "packed")]
    pub format: FormatArg,
    /// Wait per poll cycle (e.g. 16ms, 1s).
    #[arg(long, default_value = "16ms")]
    pub timeout: String,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Keep every queued message instead of only the newest.
    #[arg(long)]
    pub no_conflate: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
