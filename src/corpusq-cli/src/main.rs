use std::process;

use corpusq_cli::cli::{parse_args, Commands, ConfigCommands};
use corpusq_cli::{Config, Executor};
use corpusq_shared::Result;

fn main() {
    // Check for --version flag and show enhanced version info
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        print_version();
        return;
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("BUILD_DATE").unwrap_or("unknown");
    let rustc_version = option_env!("RUSTC_VERSION").unwrap_or("unknown");

    println!("corpusq {}", version);
    println!("Commit: {}", git_hash);
    println!("Built: {}", build_date);
    println!("Rustc: {}", rustc_version);
}

fn run() -> Result<()> {
    let args = parse_args();

    // Load configuration
    let mut config = Config::load()?;
    if let Some(config_path) = &args.config {
        config.merge_file(config_path)?;
    }
    config.apply_cli(&args)?;

    // Set up logging
    setup_logging(&config);

    let mut executor = Executor::new(config)?;
    let output = dispatch(&mut executor, args.command)?;

    print!("{}", output);
    Ok(())
}

fn dispatch(executor: &mut Executor, command: Commands) -> Result<String> {
    match command {
        Commands::Summary { file } => executor.summary(&file),
        Commands::Facets { file } => executor.facets(&file),
        Commands::Preview { file, start, end } => executor.preview(&file, start, end),
        Commands::Filter { file, filter } => executor.filter(&file, &filter.to_spec()),
        Commands::Queries => executor.queries(),
        Commands::Ask { file, key, filter } => executor.ask(&file, &key, &filter.to_spec()),
        Commands::Author {
            file,
            name,
            year,
            timeline,
        } => executor.author(&file, &name, year, &timeline.to_spec()),
        Commands::Config {
            command: ConfigCommands::Show,
        } => executor.config_show(),
        Commands::Config {
            command: ConfigCommands::Init { path, force },
        } => Executor::config_init(&path, force),
    }
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
