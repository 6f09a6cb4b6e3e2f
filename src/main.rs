use fnpack::cli::commands::{CliArgs, Commands};
use fnpack::cli::handlers::{
    handle_init, handle_recipe, handle_runtimes, handle_validate, handle_version,
};
use fnpack::util::logging::{init_logging, parse_level, LoggingConfig};
use fnpack::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("fnpack v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Runtimes(runtimes_args) => handle_runtimes(runtimes_args),
        Commands::Version(version_args) => handle_version(version_args),
        Commands::Recipe(recipe_args) => handle_recipe(recipe_args),
        Commands::Init(init_args) => handle_init(init_args, args.quiet),
        Commands::Validate(validate_args) => handle_validate(validate_args, args.quiet),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
