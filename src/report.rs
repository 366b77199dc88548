//! Placement report for a run
//!
//! Lists, for every content image, where it ended up and how it was fitted.

use prettytable::{format, Cell, Row, Table};
use std::path::Path;

use crate::image_processing::CompositeResult;

/// Single row of the report
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub input_filename: String,
    pub output_filename: String,
    pub content_size: (u32, u32),
    pub axis: &'static str,
    pub scaled_size: (u32, u32),
    pub anchor: (i64, i64),
    pub margin: u32,
}

impl From<&CompositeResult> for ReportEntry {
    fn from(result: &CompositeResult) -> Self {
        Self {
            input_filename: extract_filename(&result.content_path),
            output_filename: extract_filename(&result.output_path),
            content_size: result.content_size,
            axis: result.layout.axis.label(),
            scaled_size: (result.layout.width, result.layout.height),
            anchor: (result.layout.x, result.layout.y),
            margin: result.placement.margin,
        }
    }
}

#[derive(Debug, Default)]
pub struct CompositeReport {
    pub frame: String,
    pub frame_size: (u32, u32),
    pub entries: Vec<ReportEntry>,
    pub failures: Vec<(String, String)>,
}

impl CompositeReport {
    pub fn new(frame: impl Into<String>, frame_size: (u32, u32)) -> Self {
        Self {
            frame: frame.into(),
            frame_size,
            ..Default::default()
        }
    }

    pub fn add(&mut self, result: &CompositeResult) {
        self.entries.push(ReportEntry::from(result));
    }

    pub fn add_failure(&mut self, input: &Path, error: impl Into<String>) {
        self.failures.push((extract_filename(input), error.into()));
    }

    pub fn build_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.add_row(Row::new(vec![
            Cell::new("Input"),
            Cell::new("Output"),
            Cell::new("Source"),
            Cell::new("Axis"),
            Cell::new("Scaled"),
            Cell::new("Anchor"),
            Cell::new("Margin"),
        ]));

        for entry in &self.entries {
            table.add_row(Row::new(vec![
                Cell::new(&truncate(&entry.input_filename, 25)),
                Cell::new(&truncate(&entry.output_filename, 25)),
                Cell::new(&format!("{}x{}", entry.content_size.0, entry.content_size.1)),
                Cell::new(entry.axis),
                Cell::new(&format!("{}x{}", entry.scaled_size.0, entry.scaled_size.1)),
                Cell::new(&format!("({}, {})", entry.anchor.0, entry.anchor.1)),
                Cell::new(&entry.margin.to_string()),
            ]));
        }

        table
    }

    pub fn print(&self) {
        println!();
        println!(
            "FRAME {} ({}x{}), {} composites\n",
            self.frame,
            self.frame_size.0,
            self.frame_size.1,
            self.entries.len()
        );

        if !self.entries.is_empty() {
            self.build_table().printstd();
            println!();
        }

        if !self.failures.is_empty() {
            println!("FAILED ({})\n", self.failures.len());
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BOX_CHARS);
            table.add_row(Row::new(vec![Cell::new("Input"), Cell::new("Error")]));
            for (input, error) in &self.failures {
                table.add_row(Row::new(vec![
                    Cell::new(&truncate(input, 25)),
                    Cell::new(&truncate(error, 60)),
                ]));
            }
            table.printstd();
            println!();
        }
    }
}

/// Truncate string to fit in column
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

/// Helper to extract filename from path
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("unknown")
        .to_string()
}
