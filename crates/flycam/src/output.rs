use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use flycam_frame::{DecodedFrame, Encoding, PacketHeader, PixelOrder, WireFormat};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MetadataOutput {
    pub name: String,
    pub value: f32,
}

/// What gets printed for one decoded frame.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub format: &'static str,
    pub timestamp: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_order: &'static str,
    pub wire_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub mean_rgb: [u8; 3],
    pub metadata: Vec<MetadataOutput>,
}

impl FrameSummary {
    pub fn new(format: WireFormat, frame: &DecodedFrame) -> Self {
        Self {
            format: format.as_str(),
            timestamp: frame.timestamp(),
            width: frame.width(),
            height: frame.height(),
            pixel_order: match frame.pixel_order() {
                PixelOrder::Xrgb => "xrgb",
                PixelOrder::Xbgr => "xbgr",
            },
            wire_size: frame.wire_size(),
            encoding: None,
            mean_rgb: mean_rgb(frame),
            metadata: frame
                .metadata()
                .iter()
                .map(|entry| MetadataOutput {
                    name: entry.name.clone(),
                    value: entry.value,
                })
                .collect(),
        }
    }

    /// Attach the header's encoding details.
    pub fn with_header(mut self, header: &PacketHeader) -> Self {
        self.encoding = Some(match header.encoding {
            Encoding::Packed {
                channels,
                compression,
            } => {
                let [r, g, b] = channels.depths();
                format!(
                    "packed channels={} bits={r}/{g}/{b} compression={compression:?}",
                    channels.count()
                )
                .to_lowercase()
            }
            Encoding::Jpeg => "jpeg".to_string(),
        });
        self
    }
}

fn mean_rgb(frame: &DecodedFrame) -> [u8; 3] {
    let pixels = frame.pixels();
    if pixels.is_empty() {
        return [0; 3];
    }

    let order = frame.pixel_order();
    let mut sums = [0u64; 3];
    for &px in pixels {
        for (sum, channel) in sums.iter_mut().zip(order.unpack(px)) {
            *sum += u64::from(channel);
        }
    }
    let n = pixels.len() as u64;
    sums.map(|sum| (sum / n) as u8)
}

pub fn print_frame(summary: &FrameSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            table.add_row(vec!["format".to_string(), summary.format.to_string()]);
            table.add_row(vec!["timestamp".to_string(), summary.timestamp.to_string()]);
            table.add_row(vec![
                "resolution".to_string(),
                format!("{}x{}", summary.width, summary.height),
            ]);
            if let Some(encoding) = &summary.encoding {
                table.add_row(vec!["encoding".to_string(), encoding.clone()]);
            }
            table.add_row(vec!["pixel order".to_string(), summary.pixel_order.to_string()]);
            table.add_row(vec!["wire size".to_string(), summary.wire_size.to_string()]);
            let [r, g, b] = summary.mean_rgb;
            table.add_row(vec!["mean rgb".to_string(), format!("{r},{g},{b}")]);
            for entry in &summary.metadata {
                table.add_row(vec![format!("meta.{}", entry.name), entry.value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let [r, g, b] = summary.mean_rgb;
            print!(
                "ts={} {}x{} {} size={} mean=({r},{g},{b})",
                summary.timestamp,
                summary.width,
                summary.height,
                summary.format,
                summary.wire_size
            );
            for entry in &summary.metadata {
                print!(" {}={}", entry.name, entry.value);
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use flycam_frame::FrameAssembler;

    use super::*;

    fn packed_wire(width: u32, height: u32, image: &[u8], meta_name: &[u8]) -> Vec<u8> {
        let mut wire = Vec::new();
        wire.extend_from_slice(&7u32.to_le_bytes());
        wire.extend_from_slice(&width.to_le_bytes());
        wire.extend_from_slice(&height.to_le_bytes());
        wire.extend_from_slice(&[3, 8, 8, 8, 0]);
        wire.extend_from_slice(&(image.len() as u32).to_le_bytes());
        wire.extend_from_slice(image);
        let mut table = vec![0u8; 256 * 12];
        table[..meta_name.len()].copy_from_slice(meta_name);
        table[8..12].copy_from_slice(&1.5f32.to_le_bytes());
        wire.extend_from_slice(&table);
        wire
    }

    #[test]
    fn summary_reports_mean_and_metadata() {
        let wire = packed_wire(2, 1, &[10, 20, 30, 30, 40, 50], b"gain");
        let mut assembler = FrameAssembler::new(WireFormat::Packed);
        let frame = assembler.assemble(&wire).unwrap();
        let header = WireFormat::Packed.parse(&wire).unwrap().header;

        let summary = FrameSummary::new(WireFormat::Packed, &frame).with_header(&header);
        assert_eq!(summary.timestamp, 7);
        assert_eq!(summary.mean_rgb, [20, 30, 40]);
        assert_eq!(summary.pixel_order, "xrgb");
        assert_eq!(
            summary.encoding.as_deref(),
            Some("packed channels=3 bits=8/8/8 compression=none")
        );
        assert_eq!(
            summary.metadata,
            vec![MetadataOutput {
                name: "gain".to_string(),
                value: 1.5
            }]
        );
    }

    #[test]
    fn json_omits_missing_encoding() {
        let wire = packed_wire(0, 0, &[], b"");
        let frame = FrameAssembler::new(WireFormat::Packed)
            .assemble(&wire)
            .unwrap();
        let summary = FrameSummary::new(WireFormat::Packed, &frame);
        assert_eq!(summary.mean_rgb, [0, 0, 0]);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("encoding").is_none());
        assert_eq!(json["format"], "packed");
        assert_eq!(json["metadata"].as_array().map(Vec::len), Some(0));
    }
}
