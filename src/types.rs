use serde::{Deserialize, Serialize};

use crate::stance::Stance;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub inference: InferenceConfig,
    pub roi: RoiConfig,
    pub smoothing: SmoothingConfig,
    pub video: VideoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub input_width: usize,
    pub input_height: usize,
    pub num_landmarks: usize,
    pub values_per_landmark: usize,
    pub visibility_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub num_threads: usize,
}

/// ROI as fractions of the full frame, fixed for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiConfig {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub window_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_path: String,
    pub output_dir: String,
    pub save_annotated: bool,
}

/// ROI rectangle in full-frame pixels, derived once per run from the
/// fractional bounds and the frame dimensions.
#[derive(Debug, Clone, Copy)]
pub struct RoiRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoiRect {
    pub fn from_fractions(roi: &RoiConfig, frame_width: i32, frame_height: i32) -> Self {
        let x1 = (roi.x1 * frame_width as f32) as i32;
        let y1 = (roi.y1 * frame_height as f32) as i32;
        let x2 = (roi.x2 * frame_width as f32) as i32;
        let y2 = (roi.y2 * frame_height as f32) as i32;
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

/// Decoded frame, RGB byte order.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// One row of the stance timeline: seconds into the video (1 dp) and the
/// smoothed label at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEntry {
    pub time_sec: f64,
    pub stance: Stance,
}

#[derive(Debug)]
pub struct RunSummary {
    pub timeline: Vec<TimelineEntry>,
    pub total_frames: u64,
    pub avg_fps: f64,
}
