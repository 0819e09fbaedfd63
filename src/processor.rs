use crate::{
    category::Category,
    config::{Config, DedupPolicy},
    discovery::{Discovery, DocumentFile},
    document::Document,
    error::Result,
    parser::parse_file,
    resolve::{LanguageSources, locate_config, resolve_language},
    template::{TemplateEngine, display_name},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Rendered prompts keyed by category, iterated in category order.
///
/// Every category is present, possibly with no prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPrompts {
    prompts: BTreeMap<Category, Vec<String>>,
}

impl Default for CategoryPrompts {
    fn default() -> Self {
        Self {
            prompts: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

impl CategoryPrompts {
    /// Returns the prompts of one category.
    #[must_use]
    pub fn get(&self, category: Category) -> &[String] {
        self.prompts
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates categories and their prompts in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.prompts
            .iter()
            .map(|(category, prompts)| (*category, prompts.as_slice()))
    }

    /// Total number of prompts across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.prompts.values().map(Vec::len).sum()
    }

    /// Returns true if no category has a prompt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Flattens the prompts in category order.
    #[must_use]
    pub fn into_flat(self) -> Vec<String> {
        self.prompts.into_values().flatten().collect()
    }

    fn insert(&mut self, category: Category, prompts: Vec<String>) {
        self.prompts.insert(category, prompts);
    }
}

/// Compiles the documents of an LNEGC project into prompts.
pub struct Processor {
    config: Config,
    discovery: Discovery,
    engine: TemplateEngine,
}

impl Processor {
    /// Creates a processor for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a template
    /// override cannot be loaded.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let discovery = Discovery::new(&config)?;
        let engine = TemplateEngine::new(&config)?;

        Ok(Self {
            config,
            discovery,
            engine,
        })
    }

    /// Locates and parses the project configuration, then resolves the
    /// target language.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigNotFound`] if no configuration document
    /// exists, or the parse error of the one found.
    pub fn target_language(&self) -> Result<String> {
        let config_path = locate_config(&self.config.root_dir)?;
        self.language_from(&config_path)
    }

    fn language_from(&self, config_path: &Path) -> Result<String> {
        let project = parse_file(config_path)?;

        let language = resolve_language(&LanguageSources {
            explicit: self.config.target_language.as_deref(),
            config: &project,
            default: &self.config.default_language,
        });

        info!("Target language: {}", language);
        Ok(language)
    }

    /// Compiles every category into its prompts.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration document is missing, a
    /// document cannot be read or decoded, or rendering fails. Nothing is
    /// returned partially.
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn process(&self) -> Result<CategoryPrompts> {
        self.compile().map(|(_, prompts)| prompts)
    }

    /// Compiles every category, also returning the language used.
    pub(crate) fn compile(&self) -> Result<(String, CategoryPrompts)> {
        let config_path = locate_config(&self.config.root_dir)?;
        let language = self.language_from(&config_path)?;

        let files: Vec<DocumentFile> = self
            .discovery
            .scan()?
            .into_iter()
            .filter(|file| file.absolute_path != config_path)
            .collect();

        let mut prompts = CategoryPrompts::default();
        for category in Category::ALL {
            let selected = Discovery::select(&files, category);
            let documents = self.load_documents(category, &selected)?;

            let rendered = documents
                .iter()
                .map(|document| self.engine.render(category, document, &language))
                .collect::<Result<Vec<_>>>()?;

            info!("✓ {}: {} prompt(s)", category, rendered.len());
            prompts.insert(category, rendered);
        }

        Ok((language, prompts))
    }

    /// Compiles every category and flattens the prompts in category order.
    ///
    /// # Errors
    ///
    /// Same as [`Processor::process`].
    pub fn process_all(&self) -> Result<Vec<String>> {
        Ok(self.process()?.into_flat())
    }

    /// Parses the files of a category, deduplicating by display name.
    fn load_documents(&self, category: Category, files: &[&DocumentFile]) -> Result<Vec<Document>> {
        let mut documents: Vec<Document> = Vec::with_capacity(files.len());
        let mut slots: HashMap<String, usize> = HashMap::new();

        for file in files {
            let document = parse_file(&file.absolute_path)?;
            let name = display_name(&document, category).to_string();

            match (slots.get(&name), self.config.dedup) {
                (Some(&slot), DedupPolicy::LastWins) => {
                    warn!(
                        "{} '{}' redefined by {}, replacing earlier document",
                        category, name, file.relative_path
                    );
                    documents[slot] = document;
                }
                (Some(_), DedupPolicy::FirstWins) => {
                    warn!(
                        "{} '{}' redefined by {}, keeping earlier document",
                        category, name, file.relative_path
                    );
                }
                (None, _) => {
                    debug!("{} '{}' from {}", category, name, file.relative_path);
                    slots.insert(name, documents.len());
                    documents.push(document);
                }
            }
        }

        Ok(documents)
    }
}
