//! Output formatting for multiple formats
//!
//! Formatters for build recipes, resolved FDK versions and the runtime list.
//! JSON and YAML are machine-readable, `Human` is for terminals, and
//! `Dockerfile` renders a recipe as a ready-to-build multi-stage Dockerfile.
//!
//! # Example
//!
//! ```ignore
//! use fnpack::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_recipe(&recipe)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::dockerfile;
use crate::fdk::ResolvedVersion;
use crate::langs::{BuildRecipe, RuntimeIdentity};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
    /// Multi-stage Dockerfile (recipes only)
    Dockerfile,
}

#[derive(Serialize)]
struct VersionReport<'a> {
    runtime: &'a str,
    #[serde(flatten)]
    resolved: &'a ResolvedVersion,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_recipe(&self, recipe: &BuildRecipe) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(recipe).context("Failed to serialize recipe to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(recipe).context("Failed to serialize recipe to YAML")
            }
            OutputFormat::Human => Ok(self.format_recipe_human(recipe)),
            OutputFormat::Dockerfile => Ok(dockerfile::render(recipe)),
        }
    }

    pub fn format_version(&self, runtime: &str, resolved: &ResolvedVersion) -> Result<String> {
        let report = VersionReport { runtime, resolved };
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize version to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&report).context("Failed to serialize version to YAML")
            }
            OutputFormat::Human | OutputFormat::Dockerfile => Ok(format!(
                "{} FDK {} (from {})\n",
                runtime, resolved.version, resolved.source
            )),
        }
    }

    pub fn format_runtimes(&self, runtimes: &[RuntimeIdentity]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(runtimes)
                .context("Failed to serialize runtimes to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(runtimes).context("Failed to serialize runtimes to YAML")
            }
            OutputFormat::Human | OutputFormat::Dockerfile => {
                Ok(self.format_runtimes_human(runtimes))
            }
        }
    }

    fn format_recipe_human(&self, recipe: &BuildRecipe) -> String {
        let mut output = String::new();

        output.push_str(&format!("\u{2713} Build Recipe ({})\n", recipe.runtime));
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str("Images:\n");
        match &recipe.build_image {
            Some(image) => output.push_str(&format!("\u{251C}\u{2500} Build:  {}\n", image)),
            None => output.push_str("\u{251C}\u{2500} Build:  (single stage)\n"),
        }
        output.push_str(&format!("\u{2514}\u{2500} Run:    {}\n\n", recipe.run_image));

        if !recipe.build_stage.is_empty() {
            output.push_str("Build Stage:\n");
            push_tree(&mut output, &recipe.build_stage);
            output.push('\n');
        }

        output.push_str("Final Stage:\n");
        push_tree(&mut output, &recipe.final_stage);
        output.push('\n');

        output.push_str(&format!("Entrypoint:  {}\n", recipe.entrypoint));
        if let Some(memory) = recipe.memory {
            output.push_str(&format!("Memory:      {} MB\n", memory));
        }
        if recipe.pin_images_at_init {
            output.push_str("Images are pinned in func.yaml at init\n");
        }

        output
    }

    fn format_runtimes_human(&self, runtimes: &[RuntimeIdentity]) -> String {
        let mut output = String::from("Supported runtimes:\n");
        for identity in runtimes {
            let extensions = if identity.extensions.is_empty() {
                "-".to_string()
            } else {
                identity.extensions.join(", ")
            };
            output.push_str(&format!(
                "  {:<10} aliases: {:<20} files: {}\n",
                identity.primary,
                identity.aliases.join(", "),
                extensions
            ));
        }
        output
    }
}

fn push_tree(output: &mut String, lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        let connector = if i == lines.len() - 1 {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        output.push_str(&format!("{}\u{2500} {}\n", connector, line));
    }
}
