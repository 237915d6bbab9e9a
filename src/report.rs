// src/report.rs

use crate::stance::Stance;
use crate::types::TimelineEntry;
use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat},
    imgcodecs, imgproc,
    prelude::*,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

pub const CSV_FILE_NAME: &str = "batsman_stance.csv";
pub const PLOT_FILE_NAME: &str = "stance_plot.png";

// Plot canvas geometry (pixels)
const PLOT_WIDTH: i32 = 1200;
const PLOT_HEIGHT: i32 = 400;
const MARGIN_LEFT: i32 = 150;
const MARGIN_RIGHT: i32 = 30;
const MARGIN_TOP: i32 = 50;
const MARGIN_BOTTOM: i32 = 60;

/// Write the timeline as a two-column CSV with a header row. An empty
/// timeline still produces the header.
pub fn write_timeline_csv(path: &Path, timeline: &[TimelineEntry]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "time_sec,stance")?;
    for entry in timeline {
        writeln!(writer, "{:.1},{}", entry.time_sec, entry.stance)?;
    }
    writer.flush()?;

    info!("CSV -> {}", path.display());
    Ok(())
}

/// Render the stance timeline as a binary step chart and save it as a PNG.
/// Right-Handed maps to 1, Left-Handed to 0. Skipped silently when the
/// timeline is empty.
pub fn render_timeline_plot(path: &Path, timeline: &[TimelineEntry]) -> Result<()> {
    if timeline.is_empty() {
        debug!("Empty timeline, skipping plot");
        return Ok(());
    }

    let mut canvas = Mat::new_rows_cols_with_default(
        PLOT_HEIGHT,
        PLOT_WIDTH,
        core::CV_8UC3,
        core::Scalar::all(255.0),
    )?;

    let plot_w = PLOT_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = PLOT_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bottom = PLOT_HEIGHT - MARGIN_BOTTOM;

    let last_sec = timeline.last().map(|e| e.time_sec).unwrap_or(0.0);
    let span = last_sec.max(0.1);

    let x_at = |sec: f64| MARGIN_LEFT + ((sec / span) * plot_w as f64) as i32;
    let y_at = |stance: Stance| match stance {
        Stance::RightHanded => bottom - plot_h,
        Stance::LeftHanded => bottom,
    };

    let grid_color = core::Scalar::new(220.0, 220.0, 220.0, 0.0);
    let axis_color = core::Scalar::new(0.0, 0.0, 0.0, 0.0);
    let line_color = core::Scalar::new(0.0, 160.0, 0.0, 0.0);
    let text_color = core::Scalar::new(60.0, 60.0, 60.0, 0.0);

    // Vertical grid and x tick labels at five even divisions
    for i in 0..=5 {
        let sec = span * i as f64 / 5.0;
        let x = x_at(sec);
        imgproc::line(
            &mut canvas,
            core::Point::new(x, MARGIN_TOP),
            core::Point::new(x, bottom),
            grid_color,
            1,
            imgproc::LINE_8,
            0,
        )?;
        imgproc::put_text(
            &mut canvas,
            &format!("{:.1}", sec),
            core::Point::new(x - 15, bottom + 25),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.45,
            text_color,
            1,
            imgproc::LINE_AA,
            false,
        )?;
    }

    // Horizontal grid and y tick labels at the two levels
    for stance in [Stance::LeftHanded, Stance::RightHanded] {
        let y = y_at(stance);
        imgproc::line(
            &mut canvas,
            core::Point::new(MARGIN_LEFT, y),
            core::Point::new(PLOT_WIDTH - MARGIN_RIGHT, y),
            grid_color,
            1,
            imgproc::LINE_8,
            0,
        )?;
        imgproc::put_text(
            &mut canvas,
            stance.as_str(),
            core::Point::new(10, y + 5),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.5,
            text_color,
            1,
            imgproc::LINE_AA,
            false,
        )?;
    }

    // Axis frame
    imgproc::rectangle(
        &mut canvas,
        core::Rect::new(MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h),
        axis_color,
        1,
        imgproc::LINE_8,
        0,
    )?;

    // Step trace: hold each label until the next entry, vertical jump on change
    let mut prev = timeline[0];
    for entry in &timeline[1..] {
        imgproc::line(
            &mut canvas,
            core::Point::new(x_at(prev.time_sec), y_at(prev.stance)),
            core::Point::new(x_at(entry.time_sec), y_at(prev.stance)),
            line_color,
            2,
            imgproc::LINE_AA,
            0,
        )?;
        if entry.stance != prev.stance {
            imgproc::line(
                &mut canvas,
                core::Point::new(x_at(entry.time_sec), y_at(prev.stance)),
                core::Point::new(x_at(entry.time_sec), y_at(entry.stance)),
                line_color,
                2,
                imgproc::LINE_AA,
                0,
            )?;
        }
        prev = *entry;
    }
    if timeline.len() == 1 {
        imgproc::circle(
            &mut canvas,
            core::Point::new(x_at(prev.time_sec), y_at(prev.stance)),
            3,
            line_color,
            -1,
            imgproc::LINE_AA,
            0,
        )?;
    }

    imgproc::put_text(
        &mut canvas,
        "Batsman Stance Detection Timeline",
        core::Point::new(MARGIN_LEFT, 30),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.8,
        axis_color,
        2,
        imgproc::LINE_AA,
        false,
    )?;
    imgproc::put_text(
        &mut canvas,
        "Time (s)",
        core::Point::new(MARGIN_LEFT + plot_w / 2 - 40, PLOT_HEIGHT - 15),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.55,
        text_color,
        1,
        imgproc::LINE_AA,
        false,
    )?;

    imgcodecs::imwrite(
        path.to_string_lossy().as_ref(),
        &canvas,
        &core::Vector::new(),
    )?;

    info!("Plot -> {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("stance_report_{}", name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn entry(time_sec: f64, stance: Stance) -> TimelineEntry {
        TimelineEntry { time_sec, stance }
    }

    #[test]
    fn test_csv_rows_match_timeline() {
        let dir = temp_dir("rows");
        let path = dir.join(CSV_FILE_NAME);
        let timeline = vec![
            entry(0.0, Stance::RightHanded),
            entry(0.1, Stance::RightHanded),
            entry(0.1, Stance::LeftHanded),
        ];

        write_timeline_csv(&path, &timeline).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time_sec,stance");
        assert_eq!(lines[1], "0.0,Right-Handed");
        assert_eq!(lines[3], "0.1,Left-Handed");
    }

    #[test]
    fn test_empty_timeline_writes_header_only_and_no_plot() {
        let dir = temp_dir("empty");
        let csv_path = dir.join(CSV_FILE_NAME);
        let plot_path = dir.join(PLOT_FILE_NAME);
        let _ = fs::remove_file(&plot_path);

        write_timeline_csv(&csv_path, &[]).unwrap();
        render_timeline_plot(&plot_path, &[]).unwrap();

        let contents = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents, "time_sec,stance\n");
        assert!(!plot_path.exists());
    }

    #[test]
    fn test_plot_written_for_nonempty_timeline() {
        let dir = temp_dir("plot");
        let plot_path = dir.join(PLOT_FILE_NAME);
        let _ = fs::remove_file(&plot_path);

        let timeline = vec![
            entry(0.0, Stance::RightHanded),
            entry(0.5, Stance::LeftHanded),
            entry(1.0, Stance::RightHanded),
        ];
        render_timeline_plot(&plot_path, &timeline).unwrap();
        assert!(plot_path.exists());
    }
}
