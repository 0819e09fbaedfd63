//! # lnegc
//!
//! Compiles LNEGC specification documents into prompts for code-generating
//! language models.
//!
//! An LNEGC project is a directory of `.lnegc` documents sorted into
//! category folders (`componentes`, `entidades`, `interfaces`, `testes`) plus
//! a `config.lnegc` file naming the default target language. Each document
//! is parsed into metadata and named sections, then rendered through the
//! template of its category.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lnegc::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./lnegc")
//!     .output_path("prompt.txt")
//!     .target_language("go")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Parser**: turns document text into a [`Document`]
//! 2. **Resolver**: locates `config.lnegc` and resolves the target language
//! 3. **Processor**: discovers, deduplicates and renders documents per
//!    [`Category`]
//! 4. **Writer**: joins the prompts and writes the output file atomically

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod category;
mod config;
mod discovery;
mod document;
mod error;
mod parser;
mod pipeline;
mod processor;
mod resolve;
mod template;
mod template_validator;
mod writer;

pub use category::Category;
pub use config::{Config, ConfigBuilder, DEFAULT_LANGUAGE, DedupPolicy};
pub use document::{Document, ListItems, MetadataValue, list_items, strip_accents, title_variants};
pub use error::{Error, Result};
pub use parser::{MetadataStrategy, normalize_key, parse, parse_file};
pub use pipeline::{CompileStats, Pipeline};
pub use processor::{CategoryPrompts, Processor};
pub use resolve::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, LanguageSources, config_candidates, locate_config,
    resolve_language,
};
pub use template::display_name;
pub use writer::PROMPT_SEPARATOR;

/// Compiles the project and writes the prompt file.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The project directory or its `config.lnegc` cannot be found
/// - A document cannot be read or is not valid UTF-8
/// - The output file cannot be written
///
/// # Examples
///
/// ```no_run
/// use lnegc::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir("./lnegc")
///     .build()?;
///
/// let stats = run(config)?;
/// println!("{} prompts", stats.total_prompts);
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<CompileStats> {
    Pipeline::new(config)?.run()
}
