//! Provider and localizer factories: build runtime services from config.

use std::sync::Arc;

use annadata_core::{config, traits::Provider};
use annadata_i18n::{BundledLoader, CatalogLoader, DirLoader, Language, Localizer, PreferenceStore};
use annadata_providers::{gemini::GeminiProvider, openai::OpenAiProvider};

/// Build the configured provider.
pub fn build_provider(cfg: &config::Config) -> anyhow::Result<Arc<dyn Provider>> {
    match cfg.provider.default.as_str() {
        "gemini" => {
            let gc = cfg
                .provider
                .gemini
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("provider.gemini section missing in config"))?;
            Ok(Arc::new(GeminiProvider::from_config(
                gc.api_key.clone(),
                gc.model.clone(),
                gc.base_url.clone(),
            )))
        }
        "openai" => {
            let oc = cfg
                .provider
                .openai
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("provider.openai section missing in config"))?;
            Ok(Arc::new(OpenAiProvider::from_config(
                oc.base_url.clone(),
                oc.api_key.clone(),
                oc.model.clone(),
            )))
        }
        other => anyhow::bail!("unsupported provider: {other}"),
    }
}

/// Catalog source: a locales directory if configured, else bundled catalogs.
pub fn build_loader(cfg: &config::LocalizationConfig) -> Arc<dyn CatalogLoader> {
    if cfg.locales_dir.is_empty() {
        Arc::new(BundledLoader)
    } else {
        Arc::new(DirLoader::new(&cfg.locales_dir))
    }
}

/// Build the localizer, restoring the saved language when persistence is on.
pub async fn build_localizer(cfg: &config::LocalizationConfig) -> anyhow::Result<Localizer> {
    let default_language: Language = cfg.default_language.parse()?;
    let loader = build_loader(cfg);
    if cfg.persist_selection {
        let prefs = PreferenceStore::open(&cfg.preferences_db).await?;
        Ok(Localizer::restore(loader, default_language, prefs).await?)
    } else {
        Ok(Localizer::new(loader, default_language).await?)
    }
}

/// Localizer showing `code` for this run only. The saved choice is left
/// alone, and a missing catalog falls back like any language switch.
pub async fn build_localizer_for(
    cfg: &config::LocalizationConfig,
    code: &str,
) -> anyhow::Result<Localizer> {
    let cfg = config::LocalizationConfig {
        persist_selection: false,
        ..cfg.clone()
    };
    let localizer = build_localizer(&cfg).await?;
    localizer.set_language(code).await?;
    Ok(localizer)
}
