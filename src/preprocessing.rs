// src/preprocessing.rs

use crate::types::RoiRect;
use anyhow::{bail, Result};

/// Extract the ROI from a full RGB frame, clamped to the frame bounds.
/// Returns the pixels plus the clamped width and height; callers must use
/// those dimensions, not the ROI's, since they can differ when the clamp
/// fires.
pub fn crop_rgb(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    roi: &RoiRect,
) -> (Vec<u8>, usize, usize) {
    let x = roi.x.max(0) as usize;
    let y = roi.y.max(0) as usize;
    let w = (roi.width.max(0) as usize).min(src_width.saturating_sub(x));
    let h = (roi.height.max(0) as usize).min(src_height.saturating_sub(y));

    let mut dst = Vec::with_capacity(w * h * 3);
    for row in y..y + h {
        let start = (row * src_width + x) * 3;
        dst.extend_from_slice(&src[start..start + w * 3]);
    }
    (dst, w, h)
}

/// Preprocess an RGB crop for the pose model: bilinear resize to the model
/// input size, scale to [0,1], HWC -> CHW.
pub fn preprocess(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Result<Vec<f32>> {
    if src_width == 0 || src_height == 0 {
        bail!("empty source image ({}x{})", src_width, src_height);
    }

    let resized = resize_bilinear(src, src_width, src_height, dst_width, dst_height);

    let mut output = vec![0.0f32; 3 * dst_height * dst_width];
    for c in 0..3 {
        for h in 0..dst_height {
            for w in 0..dst_width {
                let hwc_idx = (h * dst_width + w) * 3 + c;
                let chw_idx = c * dst_height * dst_width + h * dst_width + w;
                output[chw_idx] = resized[hwc_idx] as f32 / 255.0;
            }
        }
    }

    Ok(output)
}

/// Bilinear image resize
fn resize_bilinear(src: &[u8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dst_h * dst_w * 3];

    let x_ratio = src_w as f32 / dst_w as f32;
    let y_ratio = src_h as f32 / dst_h as f32;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx as f32 * x_ratio;
            let sy = dy as f32 * y_ratio;

            let sx0 = sx.floor() as usize;
            let sy0 = sy.floor() as usize;
            let sx1 = (sx0 + 1).min(src_w - 1);
            let sy1 = (sy0 + 1).min(src_h - 1);

            let fx = sx - sx0 as f32;
            let fy = sy - sy0 as f32;

            for c in 0..3 {
                let p00 = src[(sy0 * src_w + sx0) * 3 + c] as f32;
                let p10 = src[(sy0 * src_w + sx1) * 3 + c] as f32;
                let p01 = src[(sy1 * src_w + sx0) * 3 + c] as f32;
                let p11 = src[(sy1 * src_w + sx1) * 3 + c] as f32;

                let val = p00 * (1.0 - fx) * (1.0 - fy)
                    + p10 * fx * (1.0 - fy)
                    + p01 * (1.0 - fx) * fy
                    + p11 * fx * fy;

                dst[(dy * dst_w + dx) * 3 + c] = val.round() as u8;
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rgb() {
        // 4x4 frame where each pixel stores its column index
        let mut src = vec![0u8; 4 * 4 * 3];
        for row in 0..4 {
            for col in 0..4 {
                let i = (row * 4 + col) * 3;
                src[i] = col as u8;
                src[i + 1] = col as u8;
                src[i + 2] = col as u8;
            }
        }

        let roi = RoiRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let (crop, w, h) = crop_rgb(&src, 4, 4, &roi);
        assert_eq!((w, h), (2, 2));
        assert_eq!(crop.len(), 2 * 2 * 3);
        assert_eq!(crop[0], 1); // top-left of crop is column 1
        assert_eq!(crop[3], 2); // next pixel is column 2
    }

    #[test]
    fn test_crop_clamps_to_frame() {
        let src = vec![0u8; 4 * 4 * 3];
        let roi = RoiRect {
            x: 2,
            y: 2,
            width: 10,
            height: 10,
        };
        let (crop, w, h) = crop_rgb(&src, 4, 4, &roi);
        assert_eq!((w, h), (2, 2));
        assert_eq!(crop.len(), 2 * 2 * 3);
    }

    #[test]
    fn test_clamped_crop_feeds_preprocess() {
        // ROI wider than the frame: the clamped dimensions must keep the
        // crop buffer and the resize input in agreement.
        let src = vec![100u8; 10 * 10 * 3];
        let roi = RoiRect {
            x: 4,
            y: 0,
            width: 8,
            height: 10,
        };
        let (crop, w, h) = crop_rgb(&src, 10, 10, &roi);
        assert_eq!((w, h), (6, 10));

        let out = preprocess(&crop, w, h, 16, 16).unwrap();
        assert_eq!(out.len(), 3 * 16 * 16);
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let src = vec![255u8; 64 * 48 * 3];
        let out = preprocess(&src, 64, 48, 256, 256).unwrap();
        assert_eq!(out.len(), 3 * 256 * 256);
        assert!((out[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_preprocess_rejects_empty() {
        assert!(preprocess(&[], 0, 0, 256, 256).is_err());
    }

    #[test]
    fn test_resize() {
        let src = vec![255u8; 100 * 100 * 3];
        let dst = resize_bilinear(&src, 100, 100, 50, 50);
        assert_eq!(dst.len(), 50 * 50 * 3);
    }
}
