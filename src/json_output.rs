//! JSON output for GUI integration
//!
//! When --json-progress is enabled, progress and results are emitted as JSON
//! lines on stdout instead of the styled console output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::image_processing::CompositeResult;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// Composite written (or planned, in dry-run mode)
    Composited {
        input_path: String,
        output_path: String,
        axis: String,
        width: u32,
        height: u32,
        x: i64,
        y: i64,
        dry_run: bool,
    },
    /// Composite failed
    Failed { input_path: String, error: String },
    /// Run summary
    Summary {
        total_files: usize,
        processed: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        Self::Progress {
            current,
            total,
            message: message.into(),
        }
        .emit();
    }

    pub fn from_result(result: &CompositeResult, dry_run: bool) -> Self {
        Self::Composited {
            input_path: result.content_path.display().to_string(),
            output_path: result.output_path.display().to_string(),
            axis: result.layout.axis.label().to_string(),
            width: result.layout.width,
            height: result.layout.height,
            x: result.layout.x,
            y: result.layout.y,
            dry_run,
        }
    }

    pub fn composited(result: &CompositeResult, dry_run: bool) {
        Self::from_result(result, dry_run).emit();
    }

    pub fn failed(input_path: &Path, error: impl Into<String>) {
        Self::Failed {
            input_path: input_path.display().to_string(),
            error: error.into(),
        }
        .emit();
    }

    pub fn summary(total_files: usize, processed: usize, failed: usize, duration_secs: f64) {
        Self::Summary {
            total_files,
            processed,
            failed,
            duration_secs,
        }
        .emit();
    }
}
