use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Saved frame profile, as written by hand or by a front-end
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfigFile {
    pub name: Option<String>,
    pub frame: Option<String>,
    pub output_dir: Option<String>,
    pub margin: Option<u32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
    pub extensions: Option<String>,
}

impl ProfileConfigFile {
    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid profile JSON")
    }
}

impl Args {
    /// Load the profile file given with --config and merge it into the arguments.
    /// Command-line arguments take precedence over config file values.
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config = ProfileConfigFile::parse(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            self.merge_from_config(config);
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ProfileConfigFile) {
        if self.frame.is_none() {
            self.frame = config.frame.map(PathBuf::from);
        }

        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.map(PathBuf::from);
        }

        if self.margin.is_none() {
            self.margin = config.margin;
        }

        if self.right.is_none() {
            self.right = config.right;
        }

        if self.bottom.is_none() {
            self.bottom = config.bottom;
        }

        if self.extensions_str.is_none() {
            self.extensions_str = config.extensions;
        }
    }
}
