//! fnpack - language runtime build plugins for serverless functions
//!
//! This library decides how a function project becomes a container image.
//! For each supported language runtime it knows the image that compiles the
//! project, the image that runs it, the build-stage and final-stage
//! instructions, the entrypoint, and how to scaffold a new project.
//!
//! # Core Concepts
//!
//! - **Language helpers**: one [`LanguageHelper`] per runtime, looked up by
//!   runtime string or source-file extension through a [`HelperRegistry`]
//! - **FDK version resolution**: the function development kit version tags
//!   the build and run images. [`FdkVersionResolver`] honours an override
//!   variable, then a per-process cache, then an ordered list of registries
//! - **Boilerplate**: [`BoilerplateGenerator`] writes a starter project and
//!   refuses to touch a directory that already has a manifest
//!
//! # Example Usage
//!
//! ```no_run
//! use fnpack::{BuildRecipe, FnpackConfig, HelperRegistry};
//! use std::path::Path;
//!
//! let config = FnpackConfig::default();
//! let registry = HelperRegistry::with_defaults(&config)?;
//! let java = registry.helper_for("java").expect("java is always registered");
//!
//! let recipe = BuildRecipe::assemble(java, Path::new("./hello"))?;
//! println!("build with {:?}, run on {}", recipe.build_image, recipe.run_image);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Project Structure
//!
//! - [`fdk`]: version resolution and the registries it queries
//! - [`langs`]: the helper trait, the Java helper and the registry
//! - [`boilerplate`]: project scaffolding
//! - [`dockerfile`], [`func_file`]: artifacts derived from a helper
//! - [`cli`]: the `fnpack` command line

pub mod boilerplate;
pub mod cli;
pub mod config;
pub mod dockerfile;
pub mod error;
pub mod fdk;
pub mod func_file;
pub mod langs;
pub mod util;

pub use boilerplate::{BoilerplateBundle, BoilerplateFile, BoilerplateGenerator, ProjectTemplate};
pub use config::{ConfigError, FnpackConfig};
pub use error::{LangError, Result};
pub use fdk::{
    CacheState, FdkVersionResolver, ResolvedVersion, SourceError, VersionCache, VersionSource,
    VersionStrategy,
};
pub use func_file::FuncFile;
pub use langs::{
    BuildRecipe, HelperRegistry, JavaLangHelper, LanguageHelper, PinnedImages, ProxySettings,
    RegistryError, RuntimeIdentity,
};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
