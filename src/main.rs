use anyhow::Context;
use clap::Parser;
use lnegc::{Config, DedupPolicy, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "lnegc",
    version,
    author,
    about = "Compile LNEGC documents into code-generation prompts",
    long_about = "Compile LNEGC documents into code-generation prompts.\n\n\
    This tool reads the config.lnegc of a project, collects the documents of the \
    componentes, entidades, interfaces and testes folders, and writes one prompt \
    per document to a single output file.\n\n\
    USAGE EXAMPLES:\n  \
      # Compile ./lnegc into prompt.txt\n  \
      lnegc\n\n  \
      # Target Go regardless of the project configuration\n  \
      lnegc --dir ./docs --language go\n\n  \
      # Check what would be compiled without writing\n  \
      lnegc --dry-run -v"
)]
struct Cli {
    /// Project directory holding config.lnegc and the category folders
    #[arg(short, long, default_value = "lnegc", value_name = "PATH")]
    dir: PathBuf,

    /// Output file for the compiled prompts
    #[arg(short, long, default_value = "prompt.txt", value_name = "PATH")]
    output: PathBuf,

    /// Target language, overriding the project configuration
    #[arg(short, long, value_name = "LANG", env = "LNEGC_LANGUAGE")]
    language: Option<String>,

    /// Language used when neither --language nor the project names one
    #[arg(long, default_value = lnegc::DEFAULT_LANGUAGE, value_name = "LANG")]
    default_language: String,

    /// Which document to keep when two in a category share a name
    #[arg(long, value_enum, default_value = "last")]
    dedup: CliDedup,

    /// Glob of document paths to skip, relative to the project directory
    /// (can be used multiple times)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Directory with component.tera, entity.tera, interface.tera or
    /// test.tera files replacing the built-in templates
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Append a built-in reference implementation to documents without one
    #[arg(long)]
    reference_fallback: bool,

    /// Keep a timestamped copy of an existing output file
    #[arg(long)]
    backup: bool,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDedup {
    /// Later documents replace earlier ones
    Last,
    /// Earlier documents are kept
    First,
}

impl From<CliDedup> for DedupPolicy {
    fn from(d: CliDedup) -> Self {
        match d {
            CliDedup::Last => Self::LastWins,
            CliDedup::First => Self::FirstWins,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose > 0;

    setup_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if verbose {
                eprintln!("\n{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut builder = Config::builder()
        .root_dir(cli.dir)
        .output_path(cli.output)
        .maybe_target_language(cli.language)
        .default_language(cli.default_language)
        .dedup(cli.dedup.into())
        .exclude_patterns(cli.exclude)
        .reference_fallback(cli.reference_fallback)
        .backup_existing(cli.backup)
        .dry_run(cli.dry_run);

    if let Some(dir) = cli.templates {
        builder = builder.template_dir(dir);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Compilation failed")?;

    if cli.verbose > 0 {
        stats.print_summary();
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("lnegc=info"),
        1 => EnvFilter::new("lnegc=debug"),
        _ => EnvFilter::new("lnegc=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
