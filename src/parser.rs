//! Line-oriented parser for LNEGC documents.
//!
//! A document is an optional `# Title` line, an optional block of
//! `key: value` lines and a body of sections opened by either `[Name]` or
//! `## Name` markers:
//!
//! ```text
//! # Validador de CPF
//! Versão: 1.0.0
//! Tags: cpf, validação
//!
//! ## Interface
//! - Entrada: String
//! - Saída: Boolean
//! ```

use crate::document::{Document, MetadataValue};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, trace};

/// Localized and English header labels mapped to canonical metadata keys.
static KEY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("nome", "nome"),
        ("name", "nome"),
        ("versão", "versao"),
        ("versao", "versao"),
        ("version", "versao"),
        ("autor", "autor"),
        ("author", "autor"),
        ("data", "data"),
        ("date", "data"),
        ("domínio", "dominio"),
        ("dominio", "dominio"),
        ("domain", "dominio"),
        ("tipo", "tipo"),
        ("type", "tipo"),
        ("tags", "tags"),
        ("linguagem_padrão", "linguagem"),
        ("linguagem_padrao", "linguagem"),
        ("linguagem padrão", "linguagem"),
        ("linguagem padrao", "linguagem"),
        ("default language", "linguagem"),
        ("default_language", "linguagem"),
    ]
    .into_iter()
    .collect()
});

/// Section titles holding bulleted `- **Key**: value` metadata.
const METADATA_SECTIONS: &[&str] = &["Metadados", "Metadata"];

/// The two metadata syntaxes found in LNEGC documents.
///
/// They are applied in declaration order; a key produced by an earlier
/// strategy is never overwritten by a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStrategy {
    /// `key: value` lines between the title and the first section header
    LeadingBlock,
    /// `- **Key**: value` lines inside a `Metadados` section
    BulletedSection,
}

impl MetadataStrategy {
    /// All strategies in application order.
    pub const ALL: [Self; 2] = [Self::LeadingBlock, Self::BulletedSection];

    fn extract(
        self,
        lines: &[&str],
        sections: &BTreeMap<String, String>,
    ) -> BTreeMap<String, MetadataValue> {
        match self {
            Self::LeadingBlock => leading_block(lines),
            Self::BulletedSection => bulleted_section(sections),
        }
    }
}

/// Parses the document at `path`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the file does not exist and
/// [`Error::InvalidUtf8`] if its bytes are not valid UTF-8.
pub fn parse_file(path: &Path) -> Result<Document> {
    trace!("Parsing {}", path.display());

    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let document = parse(&content);

    debug!(
        "Parsed {} ({} metadata keys, {} sections)",
        path.display(),
        document.metadata.len(),
        document.sections.len()
    );
    Ok(document)
}

/// Parses raw document text.
///
/// Parsing never fails: lines that fit no known shape are skipped.
#[must_use]
pub fn parse(text: &str) -> Document {
    let lines: Vec<&str> = text.lines().collect();
    let sections = parse_sections(&lines);

    let mut metadata = BTreeMap::new();
    for strategy in MetadataStrategy::ALL {
        for (key, value) in strategy.extract(&lines, &sections) {
            metadata.entry(key).or_insert(value);
        }
    }

    Document { metadata, sections }
}

/// Returns the section name if `line` opens a section.
fn section_header(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('[') {
        Some(rest.trim().trim_end_matches(']'))
    } else {
        line.strip_prefix("## ").map(str::trim)
    }
}

fn is_title(line: &str) -> bool {
    line.starts_with("# ")
}

fn parse_sections(lines: &[&str]) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();
    let mut current: Option<&str> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for &line in lines {
        if let Some(name) = section_header(line) {
            if let Some(open) = current.take() {
                sections.insert(open.to_string(), buffer.join("\n").trim().to_string());
            }
            buffer.clear();
            current = (!name.is_empty()).then_some(name);
        } else if current.is_some() && !is_title(line) {
            buffer.push(line);
        }
    }

    if let Some(open) = current {
        sections.insert(open.to_string(), buffer.join("\n").trim().to_string());
    }

    sections
}

/// Splits a `key: value` line. The key must be non-empty and the line must
/// not be a heading; the value may be empty.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    if line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    (!key.is_empty()).then(|| (key, value.trim()))
}

/// Maps a header label to its canonical metadata key.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let lowered = key.trim().to_lowercase();
    KEY_ALIASES
        .get(lowered.as_str())
        .map_or(lowered, |canonical| (*canonical).to_string())
}

fn leading_block(lines: &[&str]) -> BTreeMap<String, MetadataValue> {
    let mut metadata = BTreeMap::new();

    let (title, body) = match lines.split_first() {
        Some((first, rest)) if is_title(first) => (Some(first[2..].trim()), rest),
        _ => (None, lines),
    };

    let mut closed = false;
    for &line in body {
        if section_header(line).is_some() {
            closed = true;
            break;
        }

        let Some((key, value)) = split_key_value(line) else {
            continue;
        };

        let key = normalize_key(key);
        let value = if key == "tags" {
            MetadataValue::List(value.split(',').map(|tag| tag.trim().to_string()).collect())
        } else {
            MetadataValue::Text(value.to_string())
        };
        metadata.insert(key, value);
    }

    // A bare title is a heading, not a name.
    if let Some(title) = title {
        if closed && !metadata.is_empty() {
            metadata.insert("nome".to_string(), MetadataValue::Text(title.to_string()));
        }
    }

    metadata
}

fn bulleted_section(sections: &BTreeMap<String, String>) -> BTreeMap<String, MetadataValue> {
    let Some(body) = METADATA_SECTIONS.iter().find_map(|title| {
        crate::document::title_variants(title)
            .iter()
            .find_map(|variant| sections.get(variant))
    }) else {
        return BTreeMap::new();
    };

    body.lines()
        .filter_map(|line| line.strip_prefix("- **"))
        .filter_map(|rest| rest.split_once("**:"))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                MetadataValue::Text(value.trim().to_string()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    const BASIC: &str = "# Componente de Teste
Versão: 1.0.0
Autor: Equipe LNEGC
Data: 2023-10-15
Domínio: Testes
Tags: teste, componente

## Descrição
Este é um componente de teste.

## Interface
- Entrada: String
- Saída: String

## Algoritmo
1. Receber entrada
2. Processar
3. Retornar resultado
";

    fn text(doc: &Document, key: &str) -> String {
        doc.metadata[key].as_str().unwrap().to_string()
    }

    #[test]
    fn test_parse_basic() {
        let doc = parse(BASIC);

        assert_eq!(text(&doc, "nome"), "Componente de Teste");
        assert_eq!(text(&doc, "versao"), "1.0.0");
        assert_eq!(text(&doc, "autor"), "Equipe LNEGC");
        assert_eq!(text(&doc, "data"), "2023-10-15");
        assert_eq!(text(&doc, "dominio"), "Testes");
        assert_eq!(doc.tags(), ["teste", "componente"]);

        assert_eq!(doc.sections["Descrição"], "Este é um componente de teste.");
        assert_eq!(doc.sections["Interface"], "- Entrada: String\n- Saída: String");
        assert!(doc.sections.contains_key("Algoritmo"));
    }

    #[test]
    fn test_title_without_metadata_is_not_a_name() {
        let doc = parse("# Componente de Teste\n\n## Descrição\nTexto.\n");

        assert!(doc.metadata.is_empty());
        assert_eq!(doc.sections["Descrição"], "Texto.");
    }

    #[test]
    fn test_no_sections_means_no_name() {
        let doc = parse("# Título\nVersão: 2.0\nAutor: Ana\n");

        assert!(doc.sections.is_empty());
        assert!(!doc.metadata.contains_key("nome"));
        assert_eq!(text(&doc, "versao"), "2.0");
        assert_eq!(text(&doc, "autor"), "Ana");
    }

    #[test]
    fn test_name_is_trimmed_title() {
        let doc = parse("#   Validador  \nVersão: 1\n[Descrição]\nx");
        assert_eq!(text(&doc, "nome"), "Validador");
    }

    #[test]
    fn test_tag_splitting() {
        let doc = parse("# X\nTags: a, b ,c\n## S\n");
        assert_eq!(doc.tags(), ["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_keys_are_lowercased() {
        let doc = parse("# X\nFramework: FastAPI\nLinguagem_Padrão: Go\n## S\n");

        assert_eq!(text(&doc, "framework"), "FastAPI");
        assert_eq!(text(&doc, "linguagem"), "Go");
    }

    #[test]
    fn test_english_labels_normalize() {
        let doc = parse("# X\nVersion: 3\nDomain: Billing\nDefault language: rust\n## S\n");

        assert_eq!(text(&doc, "versao"), "3");
        assert_eq!(text(&doc, "dominio"), "Billing");
        assert_eq!(text(&doc, "linguagem"), "rust");
    }

    #[test]
    fn test_malformed_metadata_lines_are_skipped() {
        let doc = parse("# X\nnot metadata\n: no key\n#tag: skipped\nAutor: Ana\n## S\n");

        assert_eq!(doc.metadata.len(), 2);
        assert_eq!(text(&doc, "autor"), "Ana");
    }

    #[test]
    fn test_metadata_stops_at_first_section() {
        let doc = parse("# X\nAutor: Ana\n## S\nVersão: 9\n");

        assert!(!doc.metadata.contains_key("versao"));
        assert_eq!(doc.sections["S"], "Versão: 9");
    }

    #[test]
    fn test_bracket_sections() {
        let doc = parse("[DESCRIÇÃO]\nLinha 1\n\nLinha 3\n[ALGORITMO]]\n1. passo\n");

        assert_eq!(doc.sections["DESCRIÇÃO"], "Linha 1\n\nLinha 3");
        assert_eq!(doc.sections["ALGORITMO"], "1. passo");
    }

    #[test]
    fn test_mixed_markers_and_title_lines() {
        let doc = parse("intro ignored\n## A\nbody a\n# not content\n[B]\n  body b  \n### sub\n");

        assert_eq!(doc.sections["A"], "body a");
        assert_eq!(doc.sections["B"], "body b  \n### sub");
    }

    #[test]
    fn test_empty_sections() {
        let doc = parse("# X\nVersão: 1.0.0\n\n## Descrição\n\n## Interface\n## Algoritmo\n");

        assert_eq!(doc.sections["Descrição"], "");
        assert_eq!(doc.sections["Interface"], "");
        assert_eq!(doc.sections["Algoritmo"], "");
    }

    #[test]
    fn test_whitespace_only_document() {
        let doc = parse("  \n\t\n   ");
        assert!(doc.is_empty());

        assert!(parse("").is_empty());
    }

    #[test]
    fn test_later_duplicate_section_wins() {
        let doc = parse("## A\nfirst\n## A\nsecond\n");
        assert_eq!(doc.sections["A"], "second");
    }

    #[test]
    fn test_bulleted_metadata_section() {
        let doc = parse(
            "# Cliente\n\n## Metadados\n- **Nome**: Cliente\n- **Versão**: 2.1.0\n\
             - **Tipo** sem delimitador\n\n## Atributos\n- id: UUID\n",
        );

        assert_eq!(text(&doc, "Nome"), "Cliente");
        assert_eq!(text(&doc, "Versão"), "2.1.0");
        assert_eq!(doc.metadata.len(), 2);
        assert_eq!(doc.field("versao"), Some("2.1.0"));
    }

    #[test]
    fn test_leading_block_takes_precedence() {
        let doc = parse("# X\nautor: Ana\n## Metadados\n- **autor**: Bia\n- **Extra**: sim\n");

        assert_eq!(text(&doc, "autor"), "Ana");
        assert_eq!(text(&doc, "Extra"), "sim");
    }

    #[test]
    fn test_sections_survive_reserialization() {
        let doc = parse(BASIC);
        let reparsed = parse(&doc.sections_to_text());

        assert_eq!(doc.sections, reparsed.sections);
    }

    #[test]
    fn test_crlf_input() {
        let doc = parse("# X\r\nAutor: Ana\r\n## S\r\nbody\r\n");

        assert_eq!(text(&doc, "autor"), "Ana");
        assert_eq!(doc.sections["S"], "body");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" Versão "), "versao");
        assert_eq!(normalize_key("DOMÍNIO"), "dominio");
        assert_eq!(normalize_key("Custom"), "custom");
    }

    #[test]
    fn test_parse_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("test.lnegc");
        file.write_str(BASIC).unwrap();

        let doc = parse_file(file.path()).unwrap();
        assert_eq!(doc, parse(BASIC));
    }

    #[test]
    fn test_parse_file_not_found() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = parse_file(&temp.path().join("missing.lnegc")).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_file_invalid_utf8() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("bad.lnegc");
        file.write_binary(b"\xFF\xFE Invalid UTF-8 bytes").unwrap();

        let err = parse_file(file.path()).unwrap_err();
        assert!(err.is_decoding());
    }
}
