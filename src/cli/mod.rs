pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    CliArgs, Commands, InitArgs, OutputFormatArg, RecipeArgs, RuntimesArgs, ValidateArgs,
    VersionArgs,
};
pub use output::{OutputFormat, OutputFormatter};
