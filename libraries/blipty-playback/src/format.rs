//! Human readable labels for stream quality and stream info

use blipty_core::{StreamInfo, StreamQuality};
use serde::Serialize;

/// Bitrate in bits per second as "X.X Mbps" or "X Kbps"
pub fn format_bitrate(bitrate: Option<u64>) -> String {
    match bitrate {
        None | Some(0) => "N/A".to_string(),
        Some(bps) if bps >= 1_000_000 => format!("{:.1} Mbps", bps as f64 / 1_000_000.0),
        Some(bps) => format!("{:.0} Kbps", bps as f64 / 1000.0),
    }
}

/// Named resolution class by height, or "WxH" below 480 lines
pub fn format_resolution(width: u32, height: u32) -> String {
    match height {
        h if h >= 2160 => "4K".to_string(),
        h if h >= 1080 => "1080p".to_string(),
        h if h >= 720 => "720p".to_string(),
        h if h >= 480 => "480p".to_string(),
        _ => format!("{width}x{height}"),
    }
}

/// Label such as "1080p 30fps (5.0 Mbps)"; missing parts are left out
pub fn quality_label(quality: &StreamQuality) -> String {
    let mut label = format_resolution(quality.width, quality.height);

    if let Some(fps) = quality.framerate.filter(|fps| *fps > 0.0) {
        label.push_str(&format!(" {:.0}fps", fps.round()));
    }
    if let Some(bps) = quality.bitrate.filter(|bps| *bps > 0) {
        label.push_str(&format!(" ({})", format_bitrate(Some(bps))));
    }

    label
}

/// "H:MM:SS" when at least an hour, otherwise "M:SS"
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Display strings for a stream info panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub quality: String,
    pub codec: String,
    pub bitrate: String,
    pub duration: String,
}

pub fn summarize_stream_info(info: &StreamInfo) -> StreamSummary {
    let codec = [info.video_codec.as_deref(), info.audio_codec.as_deref()]
        .into_iter()
        .flatten()
        .filter(|codec| !codec.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");

    StreamSummary {
        quality: info
            .resolution
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "Auto".to_string()),
        codec,
        bitrate: format_bitrate(info.bitrate),
        duration: match info.duration {
            Some(d) if d > 0.0 => format_duration(d),
            _ => "Live".to_string(),
        },
    }
}
