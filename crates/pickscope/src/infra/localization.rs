//! Message catalogs for overlay markup.

use std::collections::BTreeMap;

use crate::domain::errors::CatalogError;
use crate::domain::ports::Localizer;

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../../assets/locales/en.toml")),
    ("de", include_str!("../../assets/locales/de.toml")),
];

/// Flat key to message catalog for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    language: String,
    messages: BTreeMap<String, String>,
}

impl Catalog {
    /// Load the bundled catalog for `locale`, accepting region suffixes such as `de-AT`.
    pub fn load(locale: &str) -> Result<Self, CatalogError> {
        let language = base_language(locale);
        let (_, source) = BUNDLED
            .iter()
            .find(|(name, _)| *name == language)
            .ok_or_else(|| CatalogError::UnknownLocale(locale.to_owned()))?;
        Self::parse(&language, source)
    }

    /// Load `locale`, falling back to English when it is not bundled.
    pub fn load_or_default(locale: &str) -> Result<Self, CatalogError> {
        match Self::load(locale) {
            Err(CatalogError::UnknownLocale(_)) => {
                tracing::warn!(locale = %locale, "no bundled catalog, using english");
                Self::load("en")
            }
            other => other,
        }
    }

    pub fn parse(language: &str, source: &str) -> Result<Self, CatalogError> {
        let messages = toml::from_str(source).map_err(|err| CatalogError::Invalid {
            locale: language.to_owned(),
            message: err.to_string(),
        })?;
        Ok(Self {
            language: language.to_owned(),
            messages,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localizer for Catalog {
    fn message(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

fn base_language(locale: &str) -> String {
    locale
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
