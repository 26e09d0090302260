//! # annadata-i18n
//!
//! Process-wide language selection and dotted-key translation lookup.
//!
//! - `language`: the fixed set of supported language codes
//! - `catalog`: a loaded translation mapping and `{name}` interpolation
//! - `loader`: where catalogs come from (directory or bundled)
//! - `localizer`: the shared state: one writer (`set_language`), many readers (`t`)
//! - `preferences`: SQLite key-value store for the persisted language choice

pub mod catalog;
pub mod language;
pub mod loader;
mod localizer;
pub mod preferences;

pub use catalog::{interpolate, Catalog};
pub use language::Language;
pub use loader::{BundledLoader, CatalogLoader, DirLoader};
pub use localizer::{LanguageSwitch, Localizer};
pub use preferences::PreferenceStore;
