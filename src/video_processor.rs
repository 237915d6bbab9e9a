// src/video_processor.rs

use crate::stance::Stance;
use crate::types::{Frame, RoiRect, VideoConfig};
use anyhow::Result;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTraitConst, VideoWriter},
};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ANNOTATED_FILE_NAME: &str = "batsman_labeled.mp4";

pub fn open_video(path: &Path) -> Result<VideoReader> {
    info!("Opening video: {}", path.display());

    let cap = VideoCapture::from_file(path.to_string_lossy().as_ref(), videoio::CAP_ANY)?;

    if !cap.is_opened()? {
        anyhow::bail!("Cannot open video at: {}", path.display());
    }

    let fps = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FPS)?;
    let total_frames = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_COUNT)? as i32;
    let width = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_WIDTH)? as i32;
    let height = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

    info!(
        "Video properties: {}x{} @ {:.1} FPS, {} frames",
        width, height, fps, total_frames
    );

    Ok(VideoReader {
        cap,
        fps,
        total_frames,
        current_frame: 0,
        width,
        height,
    })
}

pub fn create_writer(
    config: &VideoConfig,
    width: i32,
    height: i32,
    fps: f64,
) -> Result<Option<VideoWriter>> {
    if !config.save_annotated {
        return Ok(None);
    }

    let output_path = PathBuf::from(&config.output_dir).join(ANNOTATED_FILE_NAME);
    info!("Output video: {}", output_path.display());

    let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
    let writer = VideoWriter::new(
        output_path.to_string_lossy().as_ref(),
        fourcc,
        fps,
        core::Size::new(width, height),
        true,
    )?;

    Ok(Some(writer))
}

pub struct VideoReader {
    pub cap: VideoCapture,
    pub fps: f64,
    pub total_frames: i32,
    pub current_frame: i32,
    pub width: i32,
    pub height: i32,
}

impl VideoReader {
    /// Decode the next frame as RGB. `Ok(None)` is end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        use opencv::videoio::VideoCaptureTrait;

        let mut mat = Mat::default();

        if !VideoCaptureTrait::read(&mut self.cap, &mut mat)? || mat.empty() {
            return Ok(None);
        }

        self.current_frame += 1;

        let mut rgb_mat = Mat::default();
        imgproc::cvt_color(&mat, &mut rgb_mat, imgproc::COLOR_BGR2RGB, 0)?;

        let data = rgb_mat.data_bytes()?.to_vec();

        Ok(Some(Frame {
            data,
            width: self.width as usize,
            height: self.height as usize,
        }))
    }

    pub fn progress(&self) -> f32 {
        if self.total_frames == 0 {
            return 0.0;
        }
        (self.current_frame as f32 / self.total_frames as f32) * 100.0
    }

    pub fn release(&mut self) -> Result<()> {
        use opencv::videoio::VideoCaptureTrait;
        VideoCaptureTrait::release(&mut self.cap)?;
        Ok(())
    }
}

/// Draw the ROI box and the current smoothed label onto a frame, returning
/// a BGR Mat ready for the video writer.
pub fn annotate_frame(frame: &[u8], height: i32, roi: &RoiRect, label: Stance) -> Result<Mat> {
    let mat = Mat::from_slice(frame)?;
    let mat = mat.reshape(3, height)?;

    let mut output = Mat::default();
    imgproc::cvt_color(&mat, &mut output, imgproc::COLOR_RGB2BGR, 0)?;

    // ROI box
    imgproc::rectangle(
        &mut output,
        core::Rect::new(roi.x, roi.y, roi.width, roi.height),
        core::Scalar::new(255.0, 120.0, 50.0, 0.0),
        2,
        imgproc::LINE_8,
        0,
    )?;

    // Green for right-handed, red otherwise
    let label_color = match label {
        Stance::RightHanded => core::Scalar::new(0.0, 255.0, 0.0, 0.0),
        Stance::LeftHanded => core::Scalar::new(0.0, 0.0, 255.0, 0.0),
    };

    imgproc::put_text(
        &mut output,
        &format!("BATSMAN: {}", label),
        core::Point::new(roi.x, roi.y - 10),
        imgproc::FONT_HERSHEY_SIMPLEX,
        1.0,
        label_color,
        3,
        imgproc::LINE_8,
        false,
    )?;

    Ok(output)
}
