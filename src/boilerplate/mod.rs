//! Starter project generation
//!
//! A [`ProjectTemplate`] renders the files of a new function project for a
//! resolved FDK version; [`BoilerplateGenerator`] writes them. The manifest is
//! always written first, so a generation that fails halfway leaves the
//! manifest behind and the next attempt is refused instead of mixing files.

use crate::error::{LangError, Result};
use crate::fdk::ResolvedVersion;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A single file of a generated project, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoilerplateFile {
    pub path: PathBuf,
    pub content: String,
}

impl BoilerplateFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoilerplateBundle {
    manifest: BoilerplateFile,
    sources: Vec<BoilerplateFile>,
}

impl BoilerplateBundle {
    pub fn new(manifest: BoilerplateFile) -> Self {
        Self {
            manifest,
            sources: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.sources.push(BoilerplateFile::new(path, content));
        self
    }

    /// All files in write order, manifest first
    pub fn files(&self) -> impl Iterator<Item = &BoilerplateFile> {
        std::iter::once(&self.manifest).chain(self.sources.iter())
    }
}

/// Renders the starter files for one runtime
pub trait ProjectTemplate: Send + Sync {
    /// Manifest file name relative to the project root (e.g. "pom.xml")
    fn manifest_name(&self) -> &str;

    fn render(&self, fdk: &ResolvedVersion) -> BoilerplateBundle;
}

pub struct BoilerplateGenerator<'a> {
    template: &'a dyn ProjectTemplate,
}

impl<'a> BoilerplateGenerator<'a> {
    pub fn new(template: &'a dyn ProjectTemplate) -> Self {
        Self { template }
    }

    /// Fails with [`LangError::ManifestAlreadyExists`] if the manifest is present.
    pub fn ensure_manifest_absent(&self, target_dir: &Path) -> Result<()> {
        let manifest = target_dir.join(self.template.manifest_name());
        if manifest.exists() {
            return Err(LangError::ManifestAlreadyExists(manifest));
        }
        Ok(())
    }

    /// Writes the rendered project into `target_dir`, returning the written paths.
    ///
    /// Nothing is written when the manifest already exists. A failed write
    /// stops generation and leaves earlier files in place.
    pub fn generate(&self, target_dir: &Path, fdk: &ResolvedVersion) -> Result<Vec<PathBuf>> {
        self.ensure_manifest_absent(target_dir)?;

        let bundle = self.template.render(fdk);
        let mut written = Vec::new();

        for file in bundle.files() {
            let full_path = target_dir.join(&file.path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| LangError::io(parent, e))?;
            }
            fs::write(&full_path, &file.content).map_err(|e| LangError::io(&full_path, e))?;
            debug!(path = %full_path.display(), "Wrote boilerplate file");
            written.push(full_path);
        }

        info!(
            dir = %target_dir.display(),
            files = written.len(),
            fdk_version = %fdk.version,
            "Generated function boilerplate"
        );
        Ok(written)
    }
}
