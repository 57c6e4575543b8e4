use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flycam_frame::{Receiver, ReceiverConfig, Throughput, WireFormat};
use flycam_transport::{SubscribeOptions, Subscriber, ZmqContext};
use tracing::info;

use crate::cmd::{check_metadata_source, WatchArgs};
use crate::exit::{receiver_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_frame, FrameSummary, OutputFormat};

pub fn run(args: WatchArgs, output: OutputFormat) -> CliResult<i32> {
    if args.meta.is_some() {
        check_metadata_source(args.format, "--meta")?;
    }
    let config = ReceiverConfig {
        format: WireFormat::from(args.format),
        poll_timeout: parse_duration(&args.timeout)?,
        ..ReceiverConfig::default()
    };
    let options = SubscribeOptions {
        conflate: !args.no_conflate,
        ..SubscribeOptions::default()
    };

    let ctx = ZmqContext::new();
    let video = ctx
        .subscribe(&args.endpoint, &options)
        .map_err(|err| transport_error("subscribe failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    match &args.meta {
        Some(endpoint) => {
            let meta = ctx
                .subscribe(endpoint, &options)
                .map_err(|err| transport_error("metadata subscribe failed", err))?;
            receive_loop(
                Receiver::with_metadata(video, meta, config),
                args.count,
                output,
                &running,
            )
        }
        None => receive_loop(Receiver::new(video, config), args.count, output, &running),
    }
}

fn receive_loop<V: Subscriber, M: Subscriber>(
    mut receiver: Receiver<V, M>,
    count: Option<usize>,
    output: OutputFormat,
    running: &AtomicBool,
) -> CliResult<i32> {
    let format = receiver.format();
    let mut meter = Throughput::default();
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match receiver.poll_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(err) => return Err(receiver_error("receive failed", err)),
        };

        if let Some(report) = meter.record(frame.wire_size()) {
            info!(
                "throughput {:.1} KB/s, {:.1} fps",
                report.kib_per_sec, report.fps
            );
        }

        print_frame(&FrameSummary::new(format, &frame), output);
        printed = printed.saturating_add(1);
        if count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    let stats = receiver.stats();
    info!(
        frames = stats.frames,
        dropped = stats.dropped,
        metadata_applied = stats.metadata_applied,
        metadata_skipped = stats.metadata_skipped,
        "watch finished"
    );
    receiver.close();
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, true)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
