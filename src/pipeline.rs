// src/pipeline.rs

use crate::landmarks::{self, Landmark};
use crate::pose::PoseEstimator;
use crate::preprocessing;
use crate::smoother::StanceSmoother;
use crate::stance::{self, Stance};
use crate::types::{Config, RoiRect, RunSummary, TimelineEntry};
use crate::video_processor;
use anyhow::Result;
use opencv::videoio::VideoWriterTrait;
use std::path::Path;
use std::time::Instant;
use tracing::info;

const PROGRESS_INTERVAL: u64 = 600;

/// Per-frame classification state: the smoothing window plus the running
/// timeline. Owns no I/O, so the whole frame path is testable with
/// synthetic detections.
pub struct StancePipeline {
    roi: RoiRect,
    frame_width: usize,
    frame_height: usize,
    fps: f64,
    smoother: StanceSmoother,
    timeline: Vec<TimelineEntry>,
}

impl StancePipeline {
    pub fn new(
        roi: RoiRect,
        frame_width: usize,
        frame_height: usize,
        fps: f64,
        window_size: usize,
    ) -> Self {
        Self {
            roi,
            frame_width,
            frame_height,
            fps,
            smoother: StanceSmoother::new(window_size),
            timeline: Vec::new(),
        }
    }

    /// Advance one frame: remap + classify the detection (or take the
    /// no-pose default), smooth, and record a timeline entry. Returns the
    /// smoothed label for annotation. `frame_idx` is 1-based.
    pub fn advance(&mut self, frame_idx: u64, detection: Option<&[Landmark]>) -> Stance {
        let raw = match detection {
            Some(lms) => {
                let mapped =
                    landmarks::remap_to_frame(lms, &self.roi, self.frame_width, self.frame_height);
                stance::classify(&mapped)
            }
            None => Stance::RightHanded, // default when no pose found
        };

        let label = self.smoother.update(raw);

        self.timeline.push(TimelineEntry {
            time_sec: round_to_tenth(frame_idx as f64 / self.fps),
            stance: label,
        });

        label
    }

    pub fn roi(&self) -> &RoiRect {
        &self.roi
    }

    pub fn into_timeline(self) -> Vec<TimelineEntry> {
        self.timeline
    }
}

fn round_to_tenth(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}

/// Run the full video: decode, crop, infer, classify, smooth, annotate.
/// Reader and writer are both released once the frame loop ends.
pub fn run(config: &Config) -> Result<RunSummary> {
    std::fs::create_dir_all(&config.video.output_dir)?;

    let mut reader = video_processor::open_video(Path::new(&config.video.input_path))?;
    let mut writer =
        video_processor::create_writer(&config.video, reader.width, reader.height, reader.fps)?;
    let mut estimator = PoseEstimator::new(&config.model, &config.inference)?;

    let roi = RoiRect::from_fractions(&config.roi, reader.width, reader.height);
    info!(
        "ROI: {}x{} at ({}, {}) | smoothing window: {}",
        roi.width, roi.height, roi.x, roi.y, config.smoothing.window_size
    );

    let mut pipeline = StancePipeline::new(
        roi,
        reader.width as usize,
        reader.height as usize,
        reader.fps,
        config.smoothing.window_size,
    );

    let start_time = Instant::now();
    let mut frame_count: u64 = 0;

    while let Some(frame) = reader.read_frame()? {
        frame_count += 1;

        let (crop, crop_w, crop_h) =
            preprocessing::crop_rgb(&frame.data, frame.width, frame.height, pipeline.roi());
        let input = preprocessing::preprocess(
            &crop,
            crop_w,
            crop_h,
            config.model.input_width,
            config.model.input_height,
        )?;

        let detection = estimator.detect(&input)?;
        let label = pipeline.advance(frame_count, detection.as_deref());

        if let Some(ref mut w) = writer {
            let annotated =
                video_processor::annotate_frame(&frame.data, reader.height, pipeline.roi(), label)?;
            w.write(&annotated)?;
        }

        if frame_count % PROGRESS_INTERVAL == 0 {
            let elapsed = start_time.elapsed().as_secs_f64();
            info!(
                "Processed {}/{} ({:.1}%) - {:.2} fps",
                frame_count,
                reader.total_frames,
                reader.progress(),
                frame_count as f64 / elapsed
            );
        }
    }

    reader.release()?;
    if let Some(mut w) = writer {
        w.release()?;
    }

    let duration = start_time.elapsed().as_secs_f64();
    let avg_fps = if duration > 0.0 {
        frame_count as f64 / duration
    } else {
        0.0
    };

    Ok(RunSummary {
        timeline: pipeline.into_timeline(),
        total_frames: frame_count,
        avg_fps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_handed_pose() -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.5, 1.0); 33];
        lms[landmarks::LEFT_SHOULDER] = Landmark::new(0.3, 0.3, 1.0);
        lms[landmarks::RIGHT_SHOULDER] = Landmark::new(0.7, 0.3, 1.0);
        lms[landmarks::LEFT_WRIST] = Landmark::new(0.5, 0.8, 1.0);
        lms[landmarks::RIGHT_WRIST] = Landmark::new(0.5, 0.6, 1.0);
        lms
    }

    fn make_pipeline(window_size: usize) -> StancePipeline {
        let roi = RoiRect {
            x: 400,
            y: 180,
            width: 200,
            height: 360,
        };
        StancePipeline::new(roi, 1000, 720, 30.0, window_size)
    }

    #[test]
    fn test_timeline_one_entry_per_frame() {
        let mut pipeline = make_pipeline(15);
        let pose = right_handed_pose();

        for idx in 1..=20u64 {
            // Alternate detectable / non-detectable frames
            let detection = if idx % 2 == 0 {
                Some(pose.as_slice())
            } else {
                None
            };
            pipeline.advance(idx, detection);
        }

        let timeline = pipeline.into_timeline();
        assert_eq!(timeline.len(), 20);

        // Timestamps monotonically non-decreasing at 1/fps spacing (rounded)
        for pair in timeline.windows(2) {
            assert!(pair[1].time_sec >= pair[0].time_sec);
            assert!(pair[1].time_sec - pair[0].time_sec <= 0.1 + 1e-9);
        }
        assert!((timeline.last().unwrap().time_sec - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_no_detection_defaults_right_handed() {
        let mut pipeline = make_pipeline(15);
        assert_eq!(pipeline.advance(1, None), Stance::RightHanded);
    }

    #[test]
    fn test_smoothing_holds_label_through_noise() {
        let mut left_pose = right_handed_pose();
        left_pose.swap(landmarks::LEFT_SHOULDER, landmarks::RIGHT_SHOULDER);
        left_pose.swap(landmarks::LEFT_WRIST, landmarks::RIGHT_WRIST);

        let mut pipeline = make_pipeline(5);
        for idx in 1..=4u64 {
            assert_eq!(pipeline.advance(idx, Some(&left_pose)), Stance::LeftHanded);
        }
        // A single dropped frame (raw default Right) must not flip the label
        assert_eq!(pipeline.advance(5, None), Stance::LeftHanded);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(1.0 / 30.0), 0.0);
        assert_eq!(round_to_tenth(2.0 / 30.0), 0.1);
        assert_eq!(round_to_tenth(1.25), 1.3);
    }
}
