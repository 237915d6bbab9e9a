// src/main.rs

mod config;
mod landmarks;
mod pipeline;
mod pose;
mod preprocessing;
mod report;
mod smoother;
mod stance;
mod types;
mod video_processor;

use anyhow::Result;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("stance_analyzer=info,ort=warn")
        .init();

    info!("🏏 Batsman Stance Analyzer Starting");

    let config = types::Config::load("config.yaml")?;
    info!("✓ Configuration loaded");

    let summary = pipeline::run(&config)?;

    let output_dir = Path::new(&config.video.output_dir);
    report::write_timeline_csv(&output_dir.join(report::CSV_FILE_NAME), &summary.timeline)?;
    report::render_timeline_plot(&output_dir.join(report::PLOT_FILE_NAME), &summary.timeline)?;

    info!(
        "Finished - {} frames processed at {:.1} FPS",
        summary.total_frames, summary.avg_fps
    );

    Ok(())
}
