//! In-process loopback: a producer thread publishes synthetic RGB565 frames
//! (LZ4-compressed, with an embedded metadata table) and the receiver decodes
//! them.
//!
//! Run with:
//!   cargo run --example loopback

use std::thread;
use std::time::Duration;

use flycam::transport::channel;
use flycam::{PixelOrder, Receiver, ReceiverConfig, WireFormat};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;
const FRAMES: u32 = 5;

fn rgb565_gradient(shift: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((WIDTH * HEIGHT * 2) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let r = (x + shift) % 32;
            let g = (y * 63 / HEIGHT) % 64;
            let b = (shift * 4) % 32;
            let packed = (r | (g << 5) | (b << 11)) as u16;
            out.extend_from_slice(&packed.to_le_bytes());
        }
    }
    out
}

fn packed_message(timestamp: u32) -> Vec<u8> {
    let image = lz4_flex::block::compress(&rgb565_gradient(timestamp));

    let mut wire = Vec::new();
    wire.extend_from_slice(&timestamp.to_le_bytes());
    wire.extend_from_slice(&WIDTH.to_le_bytes());
    wire.extend_from_slice(&HEIGHT.to_le_bytes());
    wire.extend_from_slice(&[3, 5, 6, 5, 1]);
    wire.extend_from_slice(&(image.len() as u32).to_le_bytes());
    wire.extend_from_slice(&image);

    let mut table = vec![0u8; 256 * 12];
    table[..8].copy_from_slice(b"exposure");
    table[8..12].copy_from_slice(&(timestamp as f32 * 0.5).to_le_bytes());
    wire.extend_from_slice(&table);
    wire
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = channel();
    let producer = thread::spawn(move || {
        for ts in 0..FRAMES {
            if tx.publish(packed_message(ts)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
    });

    let mut receiver = Receiver::new(rx, ReceiverConfig::for_format(WireFormat::Packed));
    let mut received = 0;
    while received < FRAMES {
        let Some(frame) = receiver.poll_frame()? else {
            continue;
        };
        let [r, g, b] = PixelOrder::Xrgb.unpack(frame.pixels()[0]);
        println!(
            "frame ts={} {}x{} first=({r},{g},{b}) exposure={:?}",
            frame.timestamp(),
            frame.width(),
            frame.height(),
            frame.metadata_value("exposure"),
        );
        received += 1;
    }

    producer.join().map_err(|_| "producer thread panicked")?;
    println!("{:?}", receiver.stats());
    receiver.close();
    Ok(())
}
