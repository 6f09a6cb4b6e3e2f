//! Subcommand handlers
//!
//! Each handler returns the process exit code. Failures are logged with
//! `error!` and reported as exit code 1.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::commands::{InitArgs, RecipeArgs, RuntimesArgs, ValidateArgs, VersionArgs};
use super::output::OutputFormatter;
use crate::config::FnpackConfig;
use crate::func_file::{FuncFile, FUNC_FILE};
use crate::langs::{BuildRecipe, HelperRegistry, LanguageHelper, PinnedImages};

const DEFAULT_FUNCTION_NAME: &str = "func";

pub fn handle_runtimes(args: &RuntimesArgs) -> i32 {
    report(run_runtimes(args))
}

pub fn handle_version(args: &VersionArgs) -> i32 {
    report(run_version(args))
}

pub fn handle_recipe(args: &RecipeArgs) -> i32 {
    report(run_recipe(args))
}

pub fn handle_init(args: &InitArgs, quiet: bool) -> i32 {
    match run_init(args) {
        Ok(summary) => {
            if !quiet {
                print!("{}", summary);
            }
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub fn handle_validate(args: &ValidateArgs, quiet: bool) -> i32 {
    match run_validate(args) {
        Ok(message) => {
            if !quiet {
                println!("{}", message);
            }
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn report(result: Result<String>) -> i32 {
    match result {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn load_registry() -> Result<HelperRegistry> {
    let config = FnpackConfig::default();
    config.validate().context("Invalid configuration")?;
    debug!("Loaded configuration:\n{}", config);
    HelperRegistry::with_defaults(&config).context("Failed to register language helpers")
}

fn working_dir(path: &Option<PathBuf>) -> PathBuf {
    path.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Named runtime if given (from `--runtime` or `func.yaml`), otherwise the
/// runtime of the first recognized source file under `dir`.
fn select_helper<'r>(
    registry: &'r HelperRegistry,
    runtime: Option<&str>,
    dir: &Path,
) -> Result<&'r dyn LanguageHelper> {
    match runtime {
        Some(name) => registry.helper_for(name).ok_or_else(|| {
            anyhow!(
                "Unknown runtime '{}'. Supported runtimes: {}",
                name,
                supported_aliases(registry)
            )
        }),
        None => registry.detect_in_dir(dir).ok_or_else(|| {
            anyhow!(
                "Could not detect a runtime in {}; pass --runtime",
                dir.display()
            )
        }),
    }
}

fn supported_aliases(registry: &HelperRegistry) -> String {
    registry
        .helpers()
        .flat_map(|h| h.identity().aliases)
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_runtimes(args: &RuntimesArgs) -> Result<String> {
    let registry = load_registry()?;
    let identities: Vec<_> = registry.helpers().map(|h| h.identity()).collect();
    OutputFormatter::new(args.format.into()).format_runtimes(&identities)
}

fn run_version(args: &VersionArgs) -> Result<String> {
    let registry = load_registry()?;
    let helper = select_helper(&registry, Some(&args.runtime), Path::new("."))?;

    let resolved = helper
        .latest_fdk_version()?
        .ok_or_else(|| anyhow!("Runtime '{}' does not use an FDK", args.runtime))?;

    OutputFormatter::new(args.format.into()).format_version(&helper.runtime(), &resolved)
}

/// `func.yaml` in `dir`, if the project has been initialized
fn load_func_file(dir: &Path) -> Result<Option<FuncFile>> {
    if !dir.join(FUNC_FILE).is_file() {
        return Ok(None);
    }
    FuncFile::load(dir).map(Some)
}

/// Images pinned in `func_file`, unless it was written for another runtime.
fn pinned_images(func_file: Option<&FuncFile>, helper: &dyn LanguageHelper) -> PinnedImages {
    match func_file {
        Some(func) if helper.handles(&func.runtime) => func.pinned_images(),
        Some(func) => {
            debug!(
                pinned_runtime = %func.runtime,
                runtime = %helper.runtime(),
                "Ignoring images pinned for another runtime"
            );
            PinnedImages::default()
        }
        None => PinnedImages::default(),
    }
}

fn run_recipe(args: &RecipeArgs) -> Result<String> {
    let dir = working_dir(&args.path);
    let registry = load_registry()?;
    let func_file = load_func_file(&dir)?;
    let runtime = args
        .runtime
        .as_deref()
        .or(func_file.as_ref().map(|f| f.runtime.as_str()));
    let helper = select_helper(&registry, runtime, &dir)?;
    info!(runtime = %helper.runtime(), dir = %dir.display(), "Assembling build recipe");

    let pinned = pinned_images(func_file.as_ref(), helper);
    let recipe = BuildRecipe::assemble_pinned(helper, &dir, &pinned)?;
    OutputFormatter::new(args.format.into()).format_recipe(&recipe)
}

fn run_init(args: &InitArgs) -> Result<String> {
    let dir = working_dir(&args.path);
    let registry = load_registry()?;
    let helper = select_helper(&registry, Some(&args.runtime), &dir)?;

    if dir.join(FUNC_FILE).exists() {
        anyhow::bail!("{} already exists in {}", FUNC_FILE, dir.display());
    }
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => function_name(&dir),
    };
    info!(name = %name, runtime = %helper.runtime(), "Initializing function");

    if helper.has_boilerplate() {
        helper.generate_boilerplate(&dir)?;
    }

    let func_file = FuncFile::for_helper(&name, helper)?;
    func_file.write_new(&dir)?;

    let mut summary = format!(
        "\u{2713} Created function '{}' ({}) in {}\n",
        func_file.name,
        func_file.runtime,
        dir.display()
    );
    if let Some(image) = &func_file.build_image {
        summary.push_str(&format!("  build image: {}\n", image));
    }
    if let Some(image) = &func_file.run_image {
        summary.push_str(&format!("  run image:   {}\n", image));
    }
    Ok(summary)
}

fn function_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_lowercase()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string())
}

fn run_validate(args: &ValidateArgs) -> Result<String> {
    let dir = working_dir(&args.path);
    let registry = load_registry()?;
    let func_file = load_func_file(&dir)?;
    let runtime = args
        .runtime
        .as_deref()
        .or(func_file.as_ref().map(|f| f.runtime.as_str()));
    let helper = select_helper(&registry, runtime, &dir)?;

    if helper.supports_pre_build_validation() {
        helper.pre_build_validate(&dir)?;
        Ok(format!(
            "\u{2713} {} is a valid {} project",
            dir.display(),
            helper.runtime()
        ))
    } else {
        Ok(format!(
            "\u{2713} {} has no pre-build checks",
            helper.runtime()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_function_name_from_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("Hello-World");
        fs::create_dir(&dir).unwrap();
        assert_eq!(function_name(&dir), "hello-world");
    }

    #[test]
    fn test_function_name_missing_directory() {
        assert_eq!(
            function_name(Path::new("/definitely/not/here")),
            DEFAULT_FUNCTION_NAME
        );
    }

    #[test]
    fn test_load_func_file_absent() {
        let dir = TempDir::new().unwrap();
        assert!(load_func_file(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_func_file_invalid() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FUNC_FILE), "schema_version: [").unwrap();
        assert!(load_func_file(dir.path()).is_err());
    }

    #[test]
    fn test_pins_only_apply_to_matching_runtime() {
        let config = FnpackConfig {
            log_level: "info".to_string(),
            request_timeout_secs: 1,
            java_version: "11".to_string(),
            java_metadata_url: "http://127.0.0.1:9/maven-metadata.xml".to_string(),
            java_search_url: "http://127.0.0.1:9/search".to_string(),
        };
        let registry = HelperRegistry::with_defaults(&config).unwrap();
        let func = FuncFile {
            schema_version: crate::func_file::SCHEMA_VERSION,
            name: "hello".to_string(),
            version: "0.0.1".to_string(),
            runtime: "java".to_string(),
            build_image: Some("fnproject/fn-java-fdk-build:jdk11-1.0.42".to_string()),
            run_image: Some("fnproject/fn-java-fdk:jre11-1.0.42".to_string()),
            cmd: "com.example.fn.HelloFunction::handleRequest".to_string(),
            memory: None,
        };

        let java11 = registry.helper_for("java11").unwrap();
        assert_eq!(pinned_images(Some(&func), java11), func.pinned_images());

        let java8 = registry.helper_for("java8").unwrap();
        assert_eq!(pinned_images(Some(&func), java8), PinnedImages::default());
        assert_eq!(pinned_images(None, java11), PinnedImages::default());
    }

    #[test]
    fn test_working_dir_defaults_to_current() {
        assert_eq!(working_dir(&None), PathBuf::from("."));
        assert_eq!(
            working_dir(&Some(PathBuf::from("fn"))),
            PathBuf::from("fn")
        );
    }
}
