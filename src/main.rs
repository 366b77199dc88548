use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::level_filters::LevelFilter;

use frame_compositor::cli::Args;
use frame_compositor::report::CompositeReport;
use frame_compositor::utils::{
    check_unique_destinations, create_progress_bar, discover_images, error_println,
    format_duration, validate_inputs, verbose_println, warn_println,
};
use frame_compositor::{
    apply_template, plan_template, FrameProfile, JsonMessage, TemplateRequest,
};

fn init_tracing(args: &Args) {
    let level = if args.verbose && !args.json_progress {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the frame profile from the merged arguments
fn build_profile(args: &Args) -> Result<FrameProfile> {
    let mut profile = FrameProfile::new();

    if let Some(output_dir) = &args.output_dir {
        profile
            .set_output_directory(output_dir)
            .with_context(|| format!("Invalid output directory: {}", output_dir.display()))?;
    }

    profile.set_placement(args.margin, args.right, args.bottom);

    let frame = args
        .frame
        .as_ref()
        .context("No frame given. Use --frame <FILE>")?;
    profile
        .set_frame(frame)
        .with_context(|| format!("Failed to load frame: {}", frame.display()))?;

    Ok(profile)
}

fn print_configuration(profile: &FrameProfile, args: &Args) {
    let placement = profile.placement();

    println!("{}", style("Configuration:").bold());
    if let (Some(path), Some((width, height))) = (profile.frame_path(), profile.frame_size()) {
        println!("  Frame: {} ({}x{})", path, width, height);
    }
    println!("  Output directory: {}", profile.output_dir().display());
    println!("  Margin: {}px", placement.margin);
    println!("  Offset: right {:+}px, bottom {:+}px", placement.right, placement.bottom);
    println!("  Extensions: {:?}", args.parse_extensions());
    if args.dry_run {
        println!("  Dry run mode: enabled (simulation only - no files will be created)");
    }
    println!();
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();
    args.load_and_merge_config()?;

    init_tracing(&args);

    let json = args.json_progress;
    let verbose = args.verbose && !json;

    if !json {
        println!("{}", style("Frame Compositor").bold().blue());
        println!("{}", style("Fit content images into a decorative frame").dim());
        println!();
    }

    validate_inputs(&args)?;

    let profile = build_profile(&args)?;
    if verbose {
        print_configuration(&profile, &args);
    }

    let image_files = discover_images(
        &args.input_paths,
        &args.parse_extensions(),
        profile.output_dir(),
        verbose,
    )?;

    if image_files.is_empty() {
        if json {
            JsonMessage::summary(0, 0, 0, start_time.elapsed().as_secs_f64());
        } else {
            println!(
                "{}",
                style("No images found with specified extensions").red()
            );
        }
        return Ok(());
    }

    if args.file_name.is_some() && image_files.len() > 1 {
        return Err(anyhow::anyhow!(
            "--name can only be used with a single input image, found {}",
            image_files.len()
        ));
    }

    let request = TemplateRequest {
        file_name: args.file_name.clone(),
        ..Default::default()
    };

    let output_dir = request.resolve_output_dir(profile.output_dir())?;
    let destinations = image_files
        .iter()
        .map(|path| Ok((path.clone(), request.resolve_destination(&output_dir, path)?)))
        .collect::<Result<Vec<_>>>()?;
    check_unique_destinations(&destinations)?;

    let progress = if json || verbose {
        ProgressBar::hidden()
    } else {
        create_progress_bar(image_files.len() as u64)
    };
    progress.set_message("Compositing");

    let (frame_path, frame_size) = match (profile.frame_path(), profile.frame_size()) {
        (Some(path), Some(size)) => (path.to_string(), size),
        _ => return Err(anyhow::anyhow!("Frame profile is not configured")),
    };
    let mut report = CompositeReport::new(frame_path, frame_size);
    let mut failed = 0usize;

    for (index, image_path) in image_files.iter().enumerate() {
        if json {
            JsonMessage::progress(
                index,
                image_files.len(),
                format!("Compositing {}", image_path.display()),
            );
        }

        let outcome = if args.dry_run {
            plan_template(&profile, image_path, &request)
        } else {
            apply_template(&profile, image_path, &request)
        };

        match outcome {
            Ok(result) => {
                if json {
                    JsonMessage::composited(&result, args.dry_run);
                } else {
                    let verb = if args.dry_run { "Would save" } else { "Saved" };
                    verbose_println(
                        verbose,
                        &format!(
                            "{} {} ({}x{} at {}, {})",
                            verb,
                            result.output_path.display(),
                            result.layout.width,
                            result.layout.height,
                            result.layout.x,
                            result.layout.y
                        ),
                    );
                }
                report.add(&result);
            }
            Err(e) => {
                failed += 1;
                if json {
                    JsonMessage::failed(image_path, e.to_string());
                } else {
                    progress.suspend(|| {
                        error_println(&format!("{}: {}", image_path.display(), e));
                    });
                }
                report.add_failure(image_path, e.to_string());
            }
        }

        progress.inc(1);
    }

    if json {
        JsonMessage::progress(image_files.len(), image_files.len(), "Done");
    }
    progress.finish_with_message("Done");

    let total_time = start_time.elapsed();
    let processed = image_files.len() - failed;

    if json {
        JsonMessage::summary(image_files.len(), processed, failed, total_time.as_secs_f64());
    } else {
        println!();
        println!("{}", style("Summary:").bold());
        println!("  Composited: {}", style(processed).green());
        if failed > 0 {
            println!("  Failed: {}", style(failed).red());
        }
        println!("  Total time: {}", format_duration(total_time));

        if args.dry_run {
            warn_println("Dry run: no files were written");
        }

        if args.report {
            report.print();
        }
    }

    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} images could not be composited",
            failed,
            image_files.len()
        ));
    }

    Ok(())
}
