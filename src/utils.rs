use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::{DirEntry, WalkDir};

use crate::cli::Args;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(bar_style) = ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
    ) {
        pb.set_style(bar_style.progress_chars("#>-"));
    }
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    match &args.frame {
        None => {
            return Err(anyhow::anyhow!(
                "No frame given. Use --frame <FILE> or set \"frame\" in the --config profile"
            ))
        }
        Some(frame) if !frame.is_file() => {
            return Err(anyhow::anyhow!(
                "Frame image does not exist: {}",
                frame.display()
            ))
        }
        Some(_) => {}
    }

    for input_path in &args.input_paths {
        if !input_path.exists() {
            return Err(anyhow::anyhow!(
                "Input path does not exist: {}",
                input_path.display()
            ));
        }
        if !input_path.is_dir() && !input_path.is_file() {
            return Err(anyhow::anyhow!(
                "Input path is neither a file nor a directory: {}",
                input_path.display()
            ));
        }
    }

    if args.parse_extensions().is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    Ok(())
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext)
    } else {
        false
    }
}

/// Expand the input list into image files.
///
/// Files are taken as given; directories are walked for files with one of the
/// extensions. Directory results are sorted for a stable processing order.
/// `output_dir` is never descended into, so earlier composites are not picked
/// up again as content.
pub fn discover_images(
    inputs: &[PathBuf],
    extensions: &[String],
    output_dir: &Path,
    verbose: bool,
) -> Result<Vec<PathBuf>> {
    // Missing until the first composite is written; nothing to skip then
    let output_dir = output_dir.canonicalize().ok();
    let mut image_files = Vec::new();

    for input in inputs {
        if input.is_file() {
            image_files.push(input.clone());
            continue;
        }

        verbose_println(verbose, &format!("Scanning directory: {}", input.display()));

        let walker = WalkDir::new(input)
            .follow_links(false)
            .max_depth(10)
            .into_iter()
            .filter_entry(|entry| !is_output_dir(entry, output_dir.as_deref()));

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && has_valid_extension(path, extensions) {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        image_files.extend(found);
    }

    verbose_println(verbose, &format!("Found {} image files", image_files.len()));
    Ok(image_files)
}

fn is_output_dir(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    match output_dir {
        Some(output_dir) if entry.file_type().is_dir() => entry
            .path()
            .canonicalize()
            .is_ok_and(|path| path == output_dir),
        _ => false,
    }
}

/// Fail when two inputs would be written to the same output file.
///
/// `destinations` pairs every input with its resolved output path.
pub fn check_unique_destinations(destinations: &[(PathBuf, PathBuf)]) -> Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();

    for (input, output) in destinations {
        if let Some(previous) = seen.insert(output.as_path(), input.as_path()) {
            return Err(anyhow::anyhow!(
                "{} and {} would both be written to {}. Use --name or separate runs",
                previous.display(),
                input.display(),
                output.display()
            ));
        }
    }

    Ok(())
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
