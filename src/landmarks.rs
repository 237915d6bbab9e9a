// src/landmarks.rs

use crate::types::RoiRect;

// BlazePose 33-point indexing; fixed by the model contract
// (11/12 shoulders, 13/14 elbows, 15/16 wrists, 23/24 hips).
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const RIGHT_HIP: usize = 24;

/// Single body keypoint with normalized coordinates and a visibility score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }
}

/// Parse a raw model output tensor into a landmark set.
///
/// The tensor carries `num_landmarks` groups of `values_per_landmark`
/// floats, x and y first (normalized to the crop) and a visibility score
/// last. Groups shorter than 3 values have no score and get visibility 1.0.
/// Returns `None` when the tensor is too short or the mean visibility falls
/// below `visibility_threshold` (no pose in the crop).
pub fn parse_landmarks(
    output: &[f32],
    num_landmarks: usize,
    values_per_landmark: usize,
    visibility_threshold: f32,
) -> Option<Vec<Landmark>> {
    if values_per_landmark < 2 || output.len() < num_landmarks * values_per_landmark {
        return None;
    }

    let landmarks: Vec<Landmark> = output
        .chunks_exact(values_per_landmark)
        .take(num_landmarks)
        .map(|chunk| {
            let visibility = if values_per_landmark >= 3 {
                chunk[values_per_landmark - 1]
            } else {
                1.0
            };
            Landmark::new(chunk[0], chunk[1], visibility)
        })
        .collect();

    let mean_visibility: f32 =
        landmarks.iter().map(|lm| lm.visibility).sum::<f32>() / landmarks.len() as f32;

    if mean_visibility < visibility_threshold {
        return None;
    }

    Some(landmarks)
}

/// Map crop-normalized landmarks back to full-frame normalized coordinates.
pub fn remap_to_frame(
    landmarks: &[Landmark],
    roi: &RoiRect,
    frame_width: usize,
    frame_height: usize,
) -> Vec<Landmark> {
    landmarks
        .iter()
        .map(|lm| Landmark {
            x: (lm.x * roi.width as f32 + roi.x as f32) / frame_width as f32,
            y: (lm.y * roi.height as f32 + roi.y as f32) / frame_height as f32,
            visibility: lm.visibility,
        })
        .collect()
}
