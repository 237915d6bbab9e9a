// src/pose.rs

use crate::landmarks::{self, Landmark};
use crate::types::{InferenceConfig, ModelConfig};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::{debug, info};

/// ONNX Runtime wrapper around a single-pose landmark model.
///
/// The model takes a 1x3xHxW RGB tensor in [0,1] and emits one tensor of
/// `num_landmarks * values_per_landmark` floats with crop-normalized x/y
/// first and a visibility score last per landmark.
pub struct PoseEstimator {
    session: Session,
    config: ModelConfig,
}

impl PoseEstimator {
    pub fn new(config: &ModelConfig, inference: &InferenceConfig) -> Result<Self> {
        info!("Initializing pose estimator");
        info!("Model path: {}", config.path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(inference.num_threads)?
            .commit_from_file(&config.path)
            .context("Failed to load pose model")?;

        info!("✓ Pose estimator ready");

        Ok(Self {
            session,
            config: config.clone(),
        })
    }

    /// Run the model on a preprocessed crop. `Ok(None)` means no pose was
    /// found in the crop; that is a normal per-frame outcome, not an error.
    pub fn detect(&mut self, input: &[f32]) -> Result<Option<Vec<Landmark>>> {
        let shape = [
            1,
            3,
            self.config.input_height,
            self.config.input_width,
        ];

        let input_value =
            ort::value::Value::from_array((shape.as_slice(), input.to_vec().into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs!["input" => input_value])?;

        let output = &outputs[0];
        let (_, data_slice) = output.try_extract_tensor::<f32>()?;

        let landmarks = landmarks::parse_landmarks(
            data_slice,
            self.config.num_landmarks,
            self.config.values_per_landmark,
            self.config.visibility_threshold,
        );

        if landmarks.is_none() {
            debug!("No pose detected in crop");
        }

        Ok(landmarks)
    }
}
