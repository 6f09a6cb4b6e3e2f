//! `func.yaml`, the project descriptor written when a function is initialized

use crate::langs::{LanguageHelper, PinnedImages};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const FUNC_FILE: &str = "func.yaml";
pub const SCHEMA_VERSION: u32 = 20180708;
const INITIAL_VERSION: &str = "0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncFile {
    pub schema_version: u32,
    pub name: String,
    pub version: String,
    pub runtime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_image: Option<String>,
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

impl FuncFile {
    /// Descriptor for a new function. Images are resolved and pinned only for
    /// helpers that ask for it.
    pub fn for_helper(name: &str, helper: &dyn LanguageHelper) -> Result<Self> {
        let (build_image, run_image) = if helper.should_pin_base_images_at_init() {
            let build = if helper.is_multi_stage() {
                Some(helper.build_image()?)
            } else {
                None
            };
            (build, Some(helper.run_image()?))
        } else {
            (None, None)
        };

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            name: name.to_string(),
            version: INITIAL_VERSION.to_string(),
            runtime: helper.runtime(),
            build_image,
            run_image,
            cmd: helper.entrypoint()?,
            memory: Some(helper.custom_memory()).filter(|m| *m > 0),
        })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FUNC_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Images frozen at init, used instead of re-resolving on every build
    pub fn pinned_images(&self) -> PinnedImages {
        PinnedImages {
            build_image: self.build_image.clone(),
            run_image: self.run_image.clone(),
        }
    }

    /// Writes `func.yaml` into `dir`, refusing to replace an existing one.
    pub fn write_new(&self, dir: &Path) -> Result<()> {
        let path = dir.join(FUNC_FILE);
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize func.yaml")?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}
