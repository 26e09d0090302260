//! Catalog sources.

use std::path::PathBuf;

use annadata_core::{error::AnnadataError, shellexpand};
use async_trait::async_trait;
use tracing::debug;

use crate::{catalog::Catalog, language::Language};

/// Loads the complete catalog for one language.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self, language: Language) -> Result<Catalog, AnnadataError>;
}

/// Reads `<dir>/<code>.json`.
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    pub fn new(dir: &str) -> Self {
        Self {
            dir: PathBuf::from(shellexpand(dir)),
        }
    }
}

#[async_trait]
impl CatalogLoader for DirLoader {
    async fn load(&self, language: Language) -> Result<Catalog, AnnadataError> {
        let path = self.dir.join(format!("{}.json", language.code()));
        debug!("loading catalog {}", path.display());
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AnnadataError::Localization(format!("failed to read {}: {e}", path.display()))
        })?;
        Catalog::from_json_str(&content).map_err(|e| {
            AnnadataError::Localization(format!("invalid catalog {}: {e}", path.display()))
        })
    }
}

/// Catalogs compiled into the binary. Languages without a bundled file
/// fail to load, and the localizer falls back to the default language.
pub struct BundledLoader;

impl BundledLoader {
    fn source(language: Language) -> Option<&'static str> {
        match language {
            Language::En => Some(include_str!("../locales/en.json")),
            Language::Hi => Some(include_str!("../locales/hi.json")),
            Language::Mr => Some(include_str!("../locales/mr.json")),
            Language::Ta => Some(include_str!("../locales/ta.json")),
            Language::Bn | Language::Te | Language::Pa => None,
        }
    }

    /// Languages with a bundled catalog.
    pub fn bundled() -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|l| Self::source(*l).is_some())
            .collect()
    }
}

#[async_trait]
impl CatalogLoader for BundledLoader {
    async fn load(&self, language: Language) -> Result<Catalog, AnnadataError> {
        let source = Self::source(language).ok_or_else(|| {
            AnnadataError::Localization(format!("no bundled catalog for '{language}'"))
        })?;
        Catalog::from_json_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_catalogs_parse() {
        for lang in BundledLoader::bundled() {
            let catalog = BundledLoader.load(lang).await.unwrap();
            assert!(!catalog.is_empty(), "{lang} catalog should not be empty");
        }
        assert!(BundledLoader.load(Language::Te).await.is_err());
    }

    #[tokio::test]
    async fn test_bundled_catalogs_share_english_keys() {
        let english = BundledLoader.load(Language::En).await.unwrap().keys();
        for lang in BundledLoader::bundled() {
            let keys = BundledLoader.load(lang).await.unwrap().keys();
            assert_eq!(keys, english, "{lang} keys should match English");
        }
    }

    #[tokio::test]
    async fn test_bundled_sample_lookup() {
        let en = BundledLoader.load(Language::En).await.unwrap();
        assert_eq!(
            en.t_with("dashboard.totalRevenue", &[("amount", &"12,500")]),
            "Total revenue: \u{20b9}12,500"
        );
    }

    #[tokio::test]
    async fn test_dir_loader_reads_code_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hi.json"),
            r#"{"greeting": {"welcome": "नमस्ते {name}"}}"#,
        )
        .unwrap();
        let loader = DirLoader::new(dir.path().to_str().unwrap());

        let hi = loader.load(Language::Hi).await.unwrap();
        assert_eq!(hi.t_with("greeting.welcome", &[("name", &"Asha")]), "नमस्ते Asha");

        let err = loader.load(Language::En).await.unwrap_err();
        assert!(matches!(err, AnnadataError::Localization(_)));
    }

    #[tokio::test]
    async fn test_dir_loader_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), "not json").unwrap();
        let loader = DirLoader::new(dir.path().to_str().unwrap());
        let err = loader.load(Language::En).await.unwrap_err();
        assert!(err.to_string().contains("invalid catalog"));
    }
}
