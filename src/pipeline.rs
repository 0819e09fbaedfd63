use crate::{
    category::Category,
    config::Config,
    error::Result,
    processor::{CategoryPrompts, Processor},
    writer::Writer,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Statistics collected during a compile run.
#[derive(Debug, Clone, Serialize)]
pub struct CompileStats {
    /// Prompts rendered per category
    pub prompts_per_category: BTreeMap<Category, usize>,

    /// Total number of prompts
    pub total_prompts: usize,

    /// Resolved target language
    pub language: String,

    /// Output file path
    pub output_path: String,

    /// Number of files written
    pub files_written: usize,

    /// Total execution time
    pub duration: Duration,

    /// Time spent compiling prompts
    pub compile_duration: Duration,

    /// Time spent writing
    pub write_duration: Duration,

    /// Generation timestamp
    pub generated_at: String,
}

impl CompileStats {
    /// Creates statistics from the compiled prompts and run data.
    #[must_use]
    pub fn new(
        prompts: &CategoryPrompts,
        language: String,
        output_path: String,
        files_written: usize,
        duration: Duration,
        compile_duration: Duration,
        write_duration: Duration,
    ) -> Self {
        Self {
            prompts_per_category: prompts
                .iter()
                .map(|(category, prompts)| (category, prompts.len()))
                .collect(),
            total_prompts: prompts.total(),
            language,
            output_path,
            files_written,
            duration,
            compile_duration,
            write_duration,
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }

    /// Returns the number of prompts rendered for `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.prompts_per_category
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║               LNEGC Compile Summary                   ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        for (category, count) in &self.prompts_per_category {
            println!("║ {:<22}{:>8}                        ║", format!("{category}:"), count);
        }
        println!(
            "║ Total Prompts:        {:>8}                        ║",
            self.total_prompts
        );
        println!("║                                                       ║");
        println!("║ Language:             {:<32}║", self.language);
        println!(
            "║ Files Written:        {:>8}                        ║",
            self.files_written
        );
        println!("║ Output:                                               ║");
        println!("║   {:<52}║", self.output_path);
        println!("║                                                       ║");
        println!("║ Timing Breakdown:                                     ║");
        println!(
            "║   - Compiling:        {:>8.2}s                     ║",
            self.compile_duration.as_secs_f64()
        );
        println!(
            "║   - Writing:          {:>8.2}s                     ║",
            self.write_duration.as_secs_f64()
        );
        println!(
            "║   - Total:            {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        println!("║ Generated at: {:<40}║", self.generated_at);
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Compiles a project and writes the prompt file.
pub struct Pipeline {
    config: Config,
    processor: Processor,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation or template loading
    /// fails.
    pub fn new(config: Config) -> Result<Self> {
        let writer = Writer::new(&config);
        let processor = Processor::new(config.clone())?;

        Ok(Self {
            config,
            processor,
            writer,
        })
    }

    /// Executes the pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Compile**: resolves the project configuration and renders every
    ///    category's prompts
    /// 2. **Write**: joins the prompts and writes them atomically, unless in
    ///    dry run mode
    ///
    /// # Errors
    ///
    /// Returns an error if compilation or writing fails. The output file is
    /// left untouched on error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lnegc::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir("./lnegc")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(self) -> Result<CompileStats> {
        let start_time = Instant::now();

        info!("Starting compilation");

        info!("Stage 1/2: Compiling documents...");
        let compile_start = Instant::now();
        let (language, prompts) = self.processor.compile()?;
        let compile_duration = compile_start.elapsed();

        info!(
            "✓ Compiled {} prompt(s) in {:.2}s",
            prompts.total(),
            compile_duration.as_secs_f64()
        );

        if prompts.is_empty() {
            warn!("No documents found under {}", self.config.root_dir.display());
        }

        let write_start = Instant::now();
        let files_written = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            0
        } else {
            info!("Stage 2/2: Writing output file...");
            self.writer.write_prompts(&prompts.clone().into_flat())?;
            1
        };
        let write_duration = write_start.elapsed();

        let stats = CompileStats::new(
            &prompts,
            language,
            self.writer.output_path().display().to_string(),
            files_written,
            start_time.elapsed(),
            compile_duration,
            write_duration,
        );

        info!(
            "✓ Compilation completed successfully in {:.2}s",
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }
}
