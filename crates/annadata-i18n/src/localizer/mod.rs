//! Shared language state with wholesale catalog replacement.
//!
//! Readers clone the current `Arc<Snapshot>` and never see a partially
//! loaded catalog. Every `set_language` call takes a ticket from a
//! monotonic counter; a finished load is applied only if its ticket is
//! newer than the generation already applied, so the most recent request
//! wins whatever order the loads complete in.


use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use annadata_core::error::AnnadataError;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::language::Language;
use crate::loader::CatalogLoader;
use crate::preferences::{PreferenceStore, LANGUAGE_KEY};

#[derive(Debug)]
struct Snapshot {
    /// Most recently requested language.
    selected: Language,
    /// Ticket of the request that set `selected`.
    selected_ticket: u64,
    /// Language whose catalog is loaded. Differs from `selected` after a
    /// fallback or while a load is in flight.
    loaded: Language,
    catalog: Arc<Catalog>,
    /// Ticket of the load that produced `catalog`.
    generation: u64,
}

/// Outcome of a `set_language` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageSwitch {
    pub requested: Language,
    /// Language whose catalog this call loaded.
    pub loaded: Language,
    /// `false` when a newer request had already been applied.
    pub applied: bool,
}

/// Process-wide localization state. Share it as `Arc<Localizer>`.
pub struct Localizer {
    state: RwLock<Arc<Snapshot>>,
    tickets: AtomicU64,
    default_language: Language,
    loader: Arc<dyn CatalogLoader>,
    preferences: Option<PreferenceStore>,
    /// Ticket of the last selection written to `preferences`. Held across
    /// the write so stored values follow ticket order.
    persisted: tokio::sync::Mutex<u64>,
}

impl Localizer {
    /// Create with the default language's catalog loaded.
    pub async fn new(
        loader: Arc<dyn CatalogLoader>,
        default_language: Language,
    ) -> Result<Self, AnnadataError> {
        let catalog = loader.load(default_language).await?;
        Ok(Self {
            state: RwLock::new(Arc::new(Snapshot {
                selected: default_language,
                selected_ticket: 0,
                loaded: default_language,
                catalog: Arc::new(catalog),
                generation: 0,
            })),
            tickets: AtomicU64::new(0),
            default_language,
            loader,
            preferences: None,
            persisted: tokio::sync::Mutex::new(0),
        })
    }

    /// Create and restore the persisted language, if any. An unknown stored
    /// code is ignored.
    pub async fn restore(
        loader: Arc<dyn CatalogLoader>,
        default_language: Language,
        preferences: PreferenceStore,
    ) -> Result<Self, AnnadataError> {
        let stored = preferences.get(LANGUAGE_KEY).await?;
        let localizer = Self::new(loader, default_language)
            .await?
            .with_preferences(preferences);

        match stored.as_deref().map(str::parse::<Language>) {
            Some(Ok(lang)) if lang != default_language => {
                info!("restoring saved language '{lang}'");
                localizer.switch(lang, false).await?;
            }
            Some(Err(e)) => warn!("ignoring saved language: {e}"),
            _ => {}
        }
        Ok(localizer)
    }

    /// Persist every accepted language switch to `preferences`.
    pub fn with_preferences(mut self, preferences: PreferenceStore) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Currently selected language.
    pub fn language(&self) -> Language {
        self.state.read().selected
    }

    /// Language of the catalog lookups currently resolve against.
    pub fn loaded_language(&self) -> Language {
        self.state.read().loaded
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Ticket of the load currently applied (0 = initial load).
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// The current catalog, for a batch of consistent lookups.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.state.read().catalog)
    }

    /// Resolve a dotted key; the key itself when missing.
    pub fn t(&self, key: &str) -> String {
        self.catalog().t(key)
    }

    /// Resolve a dotted key and substitute `{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &dyn Display)]) -> String {
        self.catalog().t_with(key, args)
    }

    /// Select `code` and load its catalog.
    ///
    /// An unsupported code is rejected without touching state. If the
    /// catalog cannot be loaded the default language's catalog is loaded
    /// instead; if that fails too, the previous catalog stays.
    pub async fn set_language(&self, code: &str) -> Result<LanguageSwitch, AnnadataError> {
        let language = code.parse::<Language>().map_err(|e| {
            warn!("rejected language switch: {e}");
            e
        })?;
        self.switch(language, true).await
    }

    /// Return to the default language and forget the stored preference.
    pub async fn reset_language(&self) -> Result<LanguageSwitch, AnnadataError> {
        let switch = self.switch(self.default_language, false).await?;
        if let Some(ref prefs) = self.preferences {
            let _order = self.persisted.lock().await;
            if prefs.delete(LANGUAGE_KEY).await? {
                info!("cleared saved language");
            }
        }
        Ok(switch)
    }

    async fn switch(
        &self,
        language: Language,
        persist: bool,
    ) -> Result<LanguageSwitch, AnnadataError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        self.select(language, ticket);

        let loaded = self.load_with_fallback(language).await;
        if persist {
            self.persist(language, ticket).await;
        }

        let (loaded, catalog) = loaded?;
        let applied = self.apply(ticket, loaded, catalog);
        Ok(LanguageSwitch {
            requested: language,
            loaded,
            applied,
        })
    }

    fn select(&self, language: Language, ticket: u64) {
        let mut state = self.state.write();
        if ticket > state.selected_ticket {
            *state = Arc::new(Snapshot {
                selected: language,
                selected_ticket: ticket,
                loaded: state.loaded,
                catalog: Arc::clone(&state.catalog),
                generation: state.generation,
            });
        }
    }

    /// Store `language` unless a newer request has been made or stored.
    async fn persist(&self, language: Language, ticket: u64) {
        let Some(ref prefs) = self.preferences else {
            return;
        };
        let mut last = self.persisted.lock().await;
        let selected_ticket = self.state.read().selected_ticket;
        if ticket <= *last || ticket != selected_ticket {
            debug!("not persisting superseded language '{language}' (#{ticket})");
            return;
        }
        match prefs.set(LANGUAGE_KEY, language.code()).await {
            Ok(()) => *last = ticket,
            Err(e) => warn!("failed to persist language '{language}': {e}"),
        }
    }

    async fn load_with_fallback(
        &self,
        language: Language,
    ) -> Result<(Language, Catalog), AnnadataError> {
        match self.loader.load(language).await {
            Ok(catalog) => Ok((language, catalog)),
            Err(e) if language != self.default_language => {
                warn!(
                    "catalog '{language}' unavailable ({e}), loading '{}' instead",
                    self.default_language
                );
                let catalog = self.loader.load(self.default_language).await?;
                Ok((self.default_language, catalog))
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the catalog if `ticket` is newer than the applied generation.
    fn apply(&self, ticket: u64, loaded: Language, catalog: Catalog) -> bool {
        let mut state = self.state.write();
        if ticket <= state.generation {
            debug!(
                "discarding superseded catalog load #{ticket} ('{loaded}'), #{} already applied",
                state.generation
            );
            return false;
        }
        *state = Arc::new(Snapshot {
            selected: state.selected,
            selected_ticket: state.selected_ticket,
            loaded,
            catalog: Arc::new(catalog),
            generation: ticket,
        });
        info!("language catalog '{loaded}' applied (#{ticket})");
        true
    }
}
