use flycam_frame::{DecoderConfig, FrameAssembler, WireFormat};
use tracing::debug;

use crate::cmd::{check_metadata_source, InspectArgs};
use crate::exit::{decode_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, FrameSummary, OutputFormat};

pub fn run(args: InspectArgs, output: OutputFormat) -> CliResult<i32> {
    let format = WireFormat::from(args.format);
    let mut config = DecoderConfig::default();
    if let Some(max_pixels) = args.max_pixels {
        config.max_pixels = max_pixels;
    }
    let mut assembler = FrameAssembler::with_config(format, config);

    if let Some(path) = &args.metadata {
        check_metadata_source(args.format, "--metadata")?;
        let bytes = std::fs::read(path)
            .map_err(|err| io_error(&format!("read {}", path.display()), err))?;
        let entries = assembler
            .apply_metadata(&bytes)
            .map_err(|err| decode_error("metadata decode failed", err))?;
        debug!(entries, "applied metadata message");
    }

    let wire = std::fs::read(&args.file)
        .map_err(|err| io_error(&format!("read {}", args.file.display()), err))?;
    let header = format
        .parse(&wire)
        .map_err(|err| decode_error("header parse failed", err))?
        .header;
    let frame = assembler
        .assemble(&wire)
        .map_err(|err| decode_error("frame decode failed", err))?;

    print_frame(&FrameSummary::new(format, &frame).with_header(&header), output);
    Ok(SUCCESS)
}
