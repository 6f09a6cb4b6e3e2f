use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Language runtime build recipes and project scaffolding for serverless functions
#[derive(Parser, Debug)]
#[command(
    name = "fnpack",
    about = "Language runtime build recipes and project scaffolding for serverless functions",
    version,
    long_about = "fnpack decides how a function project is built into a container image: \
                  which image compiles it, which image runs it, the build-stage instructions \
                  and the entrypoint. It also scaffolds new function projects."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "List supported runtimes")]
    Runtimes(RuntimesArgs),

    #[command(
        about = "Resolve the latest FDK version for a runtime",
        long_about = "Resolves the latest function development kit release, querying the \
                      primary registry first and the secondary registry if that fails. \
                      Set FN_JAVA_FDK_VERSION to skip the lookup.\n\n\
                      Examples:\n  \
                      fnpack version\n  \
                      fnpack version --runtime java8"
    )]
    Version(VersionArgs),

    #[command(
        about = "Print the build recipe for a function project",
        long_about = "Validates the project and prints the build image, run image, build-stage \
                      instructions, final-stage instructions and entrypoint.\n\n\
                      Examples:\n  \
                      fnpack recipe\n  \
                      fnpack recipe ./hello --format json\n  \
                      fnpack recipe --format dockerfile > Dockerfile"
    )]
    Recipe(RecipeArgs),

    #[command(
        about = "Create a new function project",
        long_about = "Writes starter source, test and manifest files plus func.yaml. \
                      Refuses to run when the runtime's manifest already exists.\n\n\
                      Examples:\n  \
                      fnpack init --runtime java hello"
    )]
    Init(InitArgs),

    #[command(about = "Check that a directory is a buildable project for its runtime")]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RuntimesArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct VersionArgs {
    #[arg(short = 'r', long, default_value = "java", help = "Runtime to resolve")]
    pub runtime: String,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct RecipeArgs {
    #[arg(
        value_name = "PATH",
        help = "Function directory (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'r',
        long,
        help = "Runtime (detected from source files when omitted)"
    )]
    pub runtime: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        value_name = "PATH",
        help = "Directory to create the function in (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(short = 'r', long, default_value = "java", help = "Runtime of the new function")]
    pub runtime: String,

    #[arg(short = 'n', long, help = "Function name (defaults to the directory name)")]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(
        value_name = "PATH",
        help = "Function directory (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'r',
        long,
        help = "Runtime (detected from source files when omitted)"
    )]
    pub runtime: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
    Dockerfile,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Dockerfile => super::output::OutputFormat::Dockerfile,
        }
    }
}
