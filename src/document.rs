use serde::Serialize;
use std::collections::BTreeMap;

/// A single metadata value.
///
/// Only the `tags` key is multi-valued; every other key holds text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Plain text value
    Text(String),
    /// Ordered list of values (comma separated in the source)
    List(Vec<String>),
}

impl MetadataValue {
    /// Returns the text value, or `None` for lists.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the list value, or `None` for text.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The parsed form of one LNEGC file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Normalized metadata keys to values
    pub metadata: BTreeMap<String, MetadataValue>,

    /// Section titles (as written) to trimmed bodies
    pub sections: BTreeMap<String, String>,
}

impl Document {
    /// Returns true if the document has neither metadata nor sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.sections.is_empty()
    }

    /// Looks up a text metadata field by its canonical key, falling back to
    /// the label used in bulleted `Metadados` sections (`versao` → `Versão`).
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .or_else(|| bullet_label(key).and_then(|label| self.metadata.get(label)))
            .and_then(MetadataValue::as_str)
    }

    /// Returns the tags, or an empty slice.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.metadata
            .get("tags")
            .and_then(MetadataValue::as_list)
            .unwrap_or_default()
    }

    /// Looks up a section body, trying every spelling from [`title_variants`].
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&str> {
        title_variants(title)
            .iter()
            .find_map(|variant| self.sections.get(variant))
            .map(String::as_str)
    }

    /// Returns the list items of a section (empty when the section is absent).
    #[must_use]
    pub fn list(&self, title: &str) -> ListItems<'_> {
        list_items(self.section(title).unwrap_or_default())
    }

    /// Writes the sections back out as `## Title` blocks.
    ///
    /// Parsing the result yields the same `sections` mapping as long as no
    /// body line itself looks like a header.
    #[must_use]
    pub fn sections_to_text(&self) -> String {
        self.sections
            .iter()
            .map(|(title, body)| {
                if body.is_empty() {
                    format!("## {title}\n")
                } else {
                    format!("## {title}\n{body}\n")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Maps a canonical metadata key to its bold-bullet label.
fn bullet_label(key: &str) -> Option<&'static str> {
    Some(match key {
        "nome" => "Nome",
        "versao" => "Versão",
        "autor" => "Autor",
        "tipo" => "Tipo",
        "data" => "Data",
        "dominio" => "Domínio",
        "descricao" => "Descrição",
        "linguagem" => "Linguagem",
        _ => return None,
    })
}

/// Returns the spellings a section title is looked up under, in order:
/// as written, uppercase, and uppercase without accents.
#[must_use]
pub fn title_variants(title: &str) -> Vec<String> {
    let upper = title.to_uppercase();
    let plain = strip_accents(&upper);

    let mut variants = vec![title.to_string()];
    for candidate in [upper, plain] {
        if !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Replaces accented Latin letters with their base letter.
#[must_use]
pub fn strip_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Lazy iterator over the `- ` items of a section body.
///
/// Cloning restarts the iteration from the beginning of the body.
#[derive(Debug, Clone)]
pub struct ListItems<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Iterator for ListItems<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines
            .by_ref()
            .find_map(|line| line.strip_prefix("- ").map(str::trim))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.lines.size_hint().1)
    }
}

/// Extracts the list items of a section body.
///
/// Every line starting with `- ` is an item (prefix stripped, rest trimmed);
/// all other lines, including indented sub-items, are ignored.
#[must_use]
pub fn list_items(body: &str) -> ListItems<'_> {
    ListItems {
        lines: body.lines(),
    }
}
