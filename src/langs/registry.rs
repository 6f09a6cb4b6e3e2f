//! Runtime lookup by name, file extension, or project contents

use super::{JavaLangHelper, LanguageHelper, SUPPORTED_JAVA_VERSIONS};
use crate::config::FnpackConfig;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

const DETECT_MAX_DEPTH: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Runtime alias '{alias}' is already registered by '{existing}'")]
    DuplicateAlias { alias: String, existing: String },
    #[error("File extension '{extension}' is already registered by '{existing}'")]
    DuplicateExtension { extension: String, existing: String },
}

/// Maps runtime strings and file extensions to exactly one helper each
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: Vec<Arc<dyn LanguageHelper>>,
    aliases: HashMap<String, usize>,
    extensions: HashMap<String, usize>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every supported Java version; `config.java_version` also owns `java`
    /// and `.java`.
    pub fn with_defaults(config: &FnpackConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        let default_java = JavaLangHelper::new(config.java_version.clone(), config).claiming_language();
        registry.register(Arc::new(default_java))?;

        for version in SUPPORTED_JAVA_VERSIONS
            .iter()
            .filter(|v| **v != config.java_version)
        {
            registry.register(Arc::new(JavaLangHelper::new(*version, config)))?;
        }

        Ok(registry)
    }

    /// Adds `helper`, rejecting it without changes if any alias or extension
    /// is already claimed.
    pub fn register(&mut self, helper: Arc<dyn LanguageHelper>) -> Result<(), RegistryError> {
        let identity = helper.identity();

        for alias in &identity.aliases {
            if let Some(&idx) = self.aliases.get(alias) {
                return Err(RegistryError::DuplicateAlias {
                    alias: alias.clone(),
                    existing: self.helpers[idx].runtime(),
                });
            }
        }
        for extension in &identity.extensions {
            if let Some(&idx) = self.extensions.get(extension) {
                return Err(RegistryError::DuplicateExtension {
                    extension: extension.clone(),
                    existing: self.helpers[idx].runtime(),
                });
            }
        }

        let idx = self.helpers.len();
        for alias in identity.aliases {
            self.aliases.insert(alias, idx);
        }
        for extension in identity.extensions {
            self.extensions.insert(extension, idx);
        }
        debug!(runtime = %identity.primary, "Registered language helper");
        self.helpers.push(helper);
        Ok(())
    }

    /// Helper selected by an explicit runtime string (exact match)
    pub fn helper_for(&self, runtime: &str) -> Option<&dyn LanguageHelper> {
        self.aliases
            .get(runtime)
            .map(|&idx| self.helpers[idx].as_ref())
    }

    pub fn helper_for_file(&self, path: &Path) -> Option<&dyn LanguageHelper> {
        let ext = path.extension()?.to_str()?;
        self.extensions
            .get(&format!(".{}", ext))
            .map(|&idx| self.helpers[idx].as_ref())
    }

    /// Infer the runtime from the first source file with a registered extension.
    pub fn detect_in_dir(&self, dir: &Path) -> Option<&dyn LanguageHelper> {
        for result in WalkBuilder::new(dir)
            .max_depth(Some(DETECT_MAX_DEPTH))
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if let Some(helper) = self.helper_for_file(entry.path()) {
                debug!(
                    file = %entry.path().display(),
                    runtime = %helper.runtime(),
                    "Detected runtime from source file"
                );
                return Some(helper);
            }
        }
        None
    }

    pub fn helpers(&self) -> impl Iterator<Item = &dyn LanguageHelper> {
        self.helpers.iter().map(|h| h.as_ref())
    }
}
