// Library exports for reuse by the CLI and other applications
pub mod cli;
pub mod config_file;
pub mod error;
pub mod image_processing;
pub mod json_output;
pub mod profile;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use error::{FramerError, Result};
pub use image_processing::layout::{compute_fit, FitLayout, LimitingAxis, Placement};
pub use image_processing::{
    apply_snapshot, apply_template, compose, plan_template, CompositeResult, TemplateRequest,
};
pub use json_output::JsonMessage;
pub use profile::{FrameCanvas, FrameProfile, FrameSnapshot, SharedFrameProfile};
