//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Annadata Connect".to_string()
}

pub fn default_data_dir() -> String {
    "~/.annadata".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_provider() -> String {
    "gemini".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_cache_ttl_secs() -> u64 {
    600
}

pub fn default_cache_max_entries() -> u64 {
    1_000
}

pub fn default_language() -> String {
    "en".to_string()
}

pub fn default_preferences_db() -> String {
    "~/.annadata/data/preferences.db".to_string()
}
