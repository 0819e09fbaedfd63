use crate::{
    category::{Category, REFERENCE_SECTION, SectionSlot},
    config::Config,
    document::{Document, list_items},
    error::{Error, Result},
    template_validator::TemplateValidator,
};
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_AUTHOR: &str = "Equipe LNEGC";

#[derive(Serialize)]
struct PromptContext<'a> {
    language: &'a str,
    name: &'a str,
    version: &'a str,
    author: &'a str,
    kind: &'a str,
    tags: &'a [String],
    sections: Vec<SectionView<'a>>,
    extras: Vec<SectionView<'a>>,
    reference: Option<&'a str>,
    reference_fallback: bool,
}

#[derive(Serialize)]
struct SectionView<'a> {
    heading: &'a str,
    body: Cow<'a, str>,
}

/// Returns the name a document is shown and deduplicated under.
#[must_use]
pub fn display_name(document: &Document, category: Category) -> &str {
    document
        .field("nome")
        .unwrap_or_else(|| category.default_name())
}

/// Renders one prompt per document with a per-category Tera template.
pub(crate) struct TemplateEngine {
    tera: Tera,
    reference_fallback: bool,
}

impl TemplateEngine {
    /// Creates a new template engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to register or an
    /// override template is invalid.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let mut tera = Tera::default();

        Self::register_builtin_templates(&mut tera)?;

        if let Some(dir) = &config.template_dir {
            Self::register_overrides(&mut tera, dir)?;
        }

        Ok(Self {
            tera,
            reference_fallback: config.reference_fallback,
        })
    }

    /// Registers the built-in template of each category.
    fn register_builtin_templates(tera: &mut Tera) -> Result<()> {
        let templates = [
            (Category::Component, include_str!("../templates/component.tera")),
            (Category::Entity, include_str!("../templates/entity.tera")),
            (Category::Interface, include_str!("../templates/interface.tera")),
            (Category::Test, include_str!("../templates/test.tera")),
        ];

        for (category, source) in templates {
            let name = category.template_name();
            tera.add_raw_template(name, source)
                .map_err(|e| Error::template(name, e))?;
        }

        Ok(())
    }

    /// Replaces built-in templates with `<name>.tera` files from `dir`.
    fn register_overrides(tera: &mut Tera, dir: &Path) -> Result<()> {
        for category in Category::ALL {
            let name = category.template_name();
            let path = dir.join(format!("{name}.tera"));
            if !path.is_file() {
                continue;
            }

            let source = TemplateValidator::load(&path)?;
            tera.add_raw_template(name, &source)
                .map_err(|e| Error::template(name, e))?;
            info!("Using template override {}", path.display());
        }

        Ok(())
    }

    /// Renders the prompt for `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub(crate) fn render(
        &self,
        category: Category,
        document: &Document,
        language: &str,
    ) -> Result<String> {
        let template_name = category.template_name();

        let context = PromptContext {
            language,
            name: display_name(document, category),
            version: document.field("versao").unwrap_or(DEFAULT_VERSION),
            author: document.field("autor").unwrap_or(DEFAULT_AUTHOR),
            kind: document
                .field("tipo")
                .unwrap_or_else(|| category.default_kind()),
            tags: document.tags(),
            sections: category
                .required_sections()
                .iter()
                .map(|slot| SectionView {
                    heading: slot.heading,
                    body: document
                        .section(slot.title)
                        .map_or(Cow::Borrowed(slot.fallback), |body| section_body(slot, body)),
                })
                .collect(),
            extras: category
                .optional_sections()
                .iter()
                .filter_map(|slot| {
                    document.section(slot.title).map(|body| SectionView {
                        heading: slot.heading,
                        body: section_body(slot, body),
                    })
                })
                .collect(),
            reference: document.section(REFERENCE_SECTION),
            reference_fallback: self.reference_fallback,
        };

        let mut tera_context = Context::new();
        tera_context.insert("ctx", &context);

        let rendered = self
            .tera
            .render(template_name, &tera_context)
            .map_err(|e| Error::template(template_name, e))?;

        debug!("Rendered {} prompt '{}'", category, context.name);
        Ok(rendered.trim_end().to_string())
    }
}

/// Returns the body to render for a section that is present.
///
/// List sections are re-emitted as their `- ` items when they have any.
fn section_body<'a>(slot: &SectionSlot, body: &'a str) -> Cow<'a, str> {
    if !slot.as_list {
        return Cow::Borrowed(body);
    }

    let items: Vec<String> = list_items(body).map(|item| format!("- {item}")).collect();
    if items.is_empty() {
        Cow::Borrowed(body)
    } else {
        Cow::Owned(items.join("\n"))
    }
}
