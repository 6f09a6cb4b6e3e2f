//! Language runtime helpers
//!
//! A [`LanguageHelper`] knows everything runtime-specific about turning a
//! function project into a container image: which images compile and run it,
//! which build-stage instructions produce the artifact, how the final stage
//! picks it up, and how a new project is scaffolded. The CLI drives every
//! runtime through this one interface.

mod java;
mod proxy;
mod registry;

pub use java::{
    JavaLangHelper, JavaProjectTemplate, FDK_VERSION_ENV, MAVEN_METADATA_URL, PACKAGE_SEARCH_URL,
    SECONDARY_REPOSITORY_URL, SUPPORTED_JAVA_VERSIONS,
};
pub use proxy::ProxySettings;
pub use registry::{HelperRegistry, RegistryError};

use crate::error::Result;
use crate::fdk::ResolvedVersion;
use serde::Serialize;
use std::path::Path;

/// The strings a user may type to select a runtime, plus the file extensions
/// that select it implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeIdentity {
    /// Canonical runtime name, also the first alias
    pub primary: String,
    pub aliases: Vec<String>,
    /// Extensions including the leading dot (e.g. ".java")
    pub extensions: Vec<String>,
}

impl RuntimeIdentity {
    pub fn new(aliases: Vec<String>, extensions: Vec<String>) -> Self {
        let primary = aliases.first().cloned().unwrap_or_default();
        Self {
            primary,
            aliases,
            extensions,
        }
    }

    pub fn handles(&self, lang: &str) -> bool {
        default_handles(&self.aliases, lang)
    }

    pub fn matches_file(&self, path: &Path) -> bool {
        matches_extension(&self.extensions, path)
    }
}

/// Case-sensitive exact match of `lang` against an alias list.
pub fn default_handles(aliases: &[String], lang: &str) -> bool {
    aliases.iter().any(|alias| alias == lang)
}

/// Whether `path` ends in one of `extensions` (given with leading dot).
pub fn matches_extension(extensions: &[String], path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.strip_prefix('.') == Some(ext))
}

/// Trait implemented once per supported language runtime
pub trait LanguageHelper: Send + Sync {
    fn identity(&self) -> RuntimeIdentity;

    /// Canonical runtime name written to the project descriptor
    fn runtime(&self) -> String {
        self.identity().primary
    }

    fn handles(&self, lang: &str) -> bool {
        self.identity().handles(lang)
    }

    fn file_extensions(&self) -> Vec<String> {
        self.identity().extensions
    }

    /// Latest FDK release for runtimes that resolve one
    fn latest_fdk_version(&self) -> Result<Option<ResolvedVersion>> {
        Ok(None)
    }

    /// Image used to compile the project
    fn build_image(&self) -> Result<String>;

    /// Image the compiled function runs in
    fn run_image(&self) -> Result<String>;

    fn has_boilerplate(&self) -> bool {
        false
    }

    fn generate_boilerplate(&self, target_dir: &Path) -> Result<()> {
        let _ = target_dir;
        Ok(())
    }

    fn supports_pre_build_validation(&self) -> bool {
        false
    }

    fn pre_build_validate(&self, working_dir: &Path) -> Result<()> {
        let _ = working_dir;
        Ok(())
    }

    /// Instructions executed in the build stage, in order
    fn build_stage_instructions(&self) -> Vec<String>;

    /// Instructions copying the artifact into the run stage, in order
    fn final_stage_instructions(&self) -> Vec<String>;

    fn entrypoint(&self) -> Result<String>;

    /// Resolve and freeze image references at init instead of on every build
    fn should_pin_base_images_at_init(&self) -> bool {
        false
    }

    /// Memory hint in MB, 0 when the runtime has no preference
    fn custom_memory(&self) -> u64 {
        0
    }

    fn is_multi_stage(&self) -> bool {
        true
    }
}

/// Image references frozen into a project at init. Missing entries are
/// resolved through the helper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedImages {
    pub build_image: Option<String>,
    pub run_image: Option<String>,
}

/// Everything the container build needs for one function project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRecipe {
    pub runtime: String,
    /// None for single-stage runtimes
    pub build_image: Option<String>,
    pub run_image: String,
    pub pre_build_validated: bool,
    pub build_stage: Vec<String>,
    pub final_stage: Vec<String>,
    pub entrypoint: String,
    pub pin_images_at_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

impl BuildRecipe {
    /// Runs pre-build validation against `working_dir`, then collects the recipe.
    pub fn assemble(helper: &dyn LanguageHelper, working_dir: &Path) -> Result<Self> {
        Self::assemble_pinned(helper, working_dir, &PinnedImages::default())
    }

    /// Like [`BuildRecipe::assemble`], but pinned images are used as-is and
    /// never re-resolved.
    pub fn assemble_pinned(
        helper: &dyn LanguageHelper,
        working_dir: &Path,
        pinned: &PinnedImages,
    ) -> Result<Self> {
        let pre_build_validated = helper.supports_pre_build_validation();
        if pre_build_validated {
            helper.pre_build_validate(working_dir)?;
        }

        let (build_image, build_stage) = if helper.is_multi_stage() {
            let build_image = match &pinned.build_image {
                Some(image) => image.clone(),
                None => helper.build_image()?,
            };
            (Some(build_image), helper.build_stage_instructions())
        } else {
            (None, Vec::new())
        };

        let run_image = match &pinned.run_image {
            Some(image) => image.clone(),
            None => helper.run_image()?,
        };
        let memory = Some(helper.custom_memory()).filter(|m| *m > 0);

        Ok(Self {
            runtime: helper.runtime(),
            build_image,
            run_image,
            pre_build_validated,
            build_stage,
            final_stage: helper.final_stage_instructions(),
            entrypoint: helper.entrypoint()?,
            pin_images_at_init: helper.should_pin_base_images_at_init(),
            memory,
        })
    }
}
