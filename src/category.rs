use serde::Serialize;
use std::fmt;

/// One section a category's prompt is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionSlot {
    /// Section title as written in documents (accented, capitalized)
    pub(crate) title: &'static str,

    /// Heading used in the rendered prompt
    pub(crate) heading: &'static str,

    /// Sentence substituted when a required section is absent
    pub(crate) fallback: &'static str,

    /// Render the section's `- ` items instead of its raw body
    pub(crate) as_list: bool,
}

impl SectionSlot {
    const fn required(title: &'static str, fallback: &'static str) -> Self {
        Self {
            title,
            heading: title,
            fallback,
            as_list: false,
        }
    }

    const fn optional(title: &'static str, heading: &'static str) -> Self {
        Self {
            title,
            heading,
            fallback: "",
            as_list: false,
        }
    }

    const fn optional_list(title: &'static str, heading: &'static str) -> Self {
        Self {
            title,
            heading,
            fallback: "",
            as_list: true,
        }
    }
}

/// Section holding a reference implementation, in every category.
pub(crate) const REFERENCE_SECTION: &str = "Implementação";

const COMPONENT_REQUIRED: &[SectionSlot] = &[
    SectionSlot::required("Descrição", "Sem descrição disponível."),
    SectionSlot::required("Algoritmo", "Sem algoritmo definido."),
    SectionSlot::required("Regras", "Sem regras definidas."),
    SectionSlot::required("Interface", "Sem interface definida."),
];

const COMPONENT_OPTIONAL: &[SectionSlot] = &[SectionSlot::optional("Exemplos", "Exemplos")];

const ENTITY_REQUIRED: &[SectionSlot] = &[
    SectionSlot::required("Descrição", "Sem descrição disponível."),
    SectionSlot::required("Atributos", "Sem atributos definidos."),
    SectionSlot::required("Regras", "Sem regras definidas."),
    SectionSlot::required("Relacionamentos", "Sem relacionamentos definidos."),
];

const ENTITY_OPTIONAL: &[SectionSlot] = &[
    SectionSlot::optional_list("Validações", "Validações de Negócio"),
    SectionSlot::optional_list("Métodos", "Métodos de Domínio"),
    SectionSlot::optional_list("Índices", "Índices do Banco de Dados"),
    SectionSlot::optional_list("Permissões", "Regras de Permissão"),
    SectionSlot::optional_list("Auditoria", "Requisitos de Auditoria"),
];

const INTERFACE_REQUIRED: &[SectionSlot] = &[
    SectionSlot::required("Descrição", "Sem descrição disponível."),
    SectionSlot::required("Métodos", "Sem métodos definidos."),
    SectionSlot::required("Propriedades", "Sem propriedades definidas."),
    SectionSlot::required("Regras", "Sem regras definidas."),
];

const TEST_REQUIRED: &[SectionSlot] = &[
    SectionSlot::required("Descrição", "Sem descrição disponível."),
    SectionSlot::required("Cenários", "Sem cenários definidos."),
    SectionSlot::required("Mocks", "Sem mocks definidos."),
    SectionSlot::required("Fixtures", "Sem fixtures definidas."),
];

/// Document classification. Declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Reusable software component
    Component,
    /// Domain data entity
    Entity,
    /// Interface or contract
    Interface,
    /// Test specification
    Test,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Self; 4] = [Self::Component, Self::Entity, Self::Interface, Self::Test];

    /// Key of this category in processing results.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Component => "componentes",
            Self::Entity => "entidades",
            Self::Interface => "interfaces",
            Self::Test => "testes",
        }
    }

    /// Folder-name tokens that place a document in this category.
    ///
    /// Both the localized and the English folder names are accepted.
    #[must_use]
    pub const fn folder_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Component => &["componentes", "components"],
            Self::Entity => &["entidades", "entities"],
            Self::Interface => &["interfaces"],
            Self::Test => &["testes", "tests"],
        }
    }

    /// Name of the template that renders this category.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Entity => "entity",
            Self::Interface => "interface",
            Self::Test => "test",
        }
    }

    /// Display name used when a document has no `nome`.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Component => "Componente",
            Self::Entity => "Entidade",
            Self::Interface => "Interface",
            Self::Test => "Teste",
        }
    }

    /// `tipo` used when a document has none.
    #[must_use]
    pub const fn default_kind(self) -> &'static str {
        match self {
            Self::Component => "Utilitário",
            Self::Entity => "Domínio",
            Self::Interface => "Interface",
            Self::Test => "Teste Unitário",
        }
    }

    pub(crate) const fn required_sections(self) -> &'static [SectionSlot] {
        match self {
            Self::Component => COMPONENT_REQUIRED,
            Self::Entity => ENTITY_REQUIRED,
            Self::Interface => INTERFACE_REQUIRED,
            Self::Test => TEST_REQUIRED,
        }
    }

    pub(crate) const fn optional_sections(self) -> &'static [SectionSlot] {
        match self {
            Self::Component => COMPONENT_OPTIONAL,
            Self::Entity => ENTITY_OPTIONAL,
            Self::Interface | Self::Test => &[],
        }
    }

    /// Returns true if `relative_path` contains one of the folder tokens.
    #[must_use]
    pub fn matches_path(self, relative_path: &str) -> bool {
        self.folder_tokens()
            .iter()
            .any(|token| relative_path.contains(token))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        let mut shuffled = vec![
            Category::Test,
            Category::Component,
            Category::Interface,
            Category::Entity,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL);
    }

    #[test]
    fn test_matches_path() {
        assert!(Category::Component.matches_path("componentes/cpf.lnegc"));
        assert!(Category::Component.matches_path("web/components/button.lnegc"));
        assert!(Category::Test.matches_path("testes/cpf.lnegc"));
        assert!(Category::Test.matches_path("tests/cpf.lnegc"));
        assert!(!Category::Entity.matches_path("interfaces/repo.lnegc"));
    }

    #[test]
    fn test_every_category_has_four_required_sections() {
        for category in Category::ALL {
            let required = category.required_sections();
            assert_eq!(required.len(), 4, "{category}");
            assert_eq!(required[0].title, "Descrição");
            assert!(required.iter().all(|s| !s.fallback.is_empty()));
        }
    }

    #[test]
    fn test_display_uses_key() {
        assert_eq!(Category::Entity.to_string(), "entidades");
    }
}
