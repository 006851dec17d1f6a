use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Storefront tunables. Every field has a default, so an empty config file
/// (or none at all) yields the stock storefront behaviour.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Prefix prepended to every storage key (empty keeps the bare slot names)
    #[serde(default)]
    pub storage_prefix: String,
    /// Directory for the native file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_search_latency_ms")]
    pub search_latency_ms: u64,
    #[serde(default = "default_search_message_ms")]
    pub search_message_ms: u64,
    #[serde(default = "default_search_panel_hide_ms")]
    pub search_panel_hide_ms: u64,
    #[serde(default = "default_results_page")]
    pub results_page: String,
    #[serde(default = "default_cart_auto_open_ms")]
    pub cart_auto_open_ms: u64,
    #[serde(default = "default_cart_feedback_ms")]
    pub cart_feedback_ms: u64,
    #[serde(default = "default_toast_show_delay_ms")]
    pub toast_show_delay_ms: u64,
    #[serde(default = "default_toast_visible_ms")]
    pub toast_visible_ms: u64,
    #[serde(default = "default_toast_removal_ms")]
    pub toast_removal_ms: u64,
    #[serde(default = "default_notification_visible_ms")]
    pub notification_visible_ms: u64,
    #[serde(default = "default_login_latency_ms")]
    pub login_latency_ms: u64,
    #[serde(default = "default_register_latency_ms")]
    pub register_latency_ms: u64,
    #[serde(default = "default_nav_breakpoint_px")]
    pub nav_breakpoint_px: u32,
    #[serde(default = "default_back_to_top_threshold_px")]
    pub back_to_top_threshold_px: f64,
    #[serde(default = "default_counter_duration_ms")]
    pub counter_duration_ms: u64,
    #[serde(default = "default_counter_frame_ms")]
    pub counter_frame_ms: u64,
    #[serde(default = "default_mobile_search_focus_ms")]
    pub mobile_search_focus_ms: u64,
}

impl Settings {
    #[cfg(feature = "native")]
    pub fn from_file(path: &str) -> Result<Self, CoreError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path));
        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    #[cfg(feature = "native")]
    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        let toml_string = self.to_toml()?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Parse settings from TOML text (used where no filesystem is available)
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        toml::from_str(s).map_err(|e| CoreError::InvalidInput(format!("Invalid settings: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        Ok(toml::to_string(self)?)
    }

    /// Validate settings ranges and constraints
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_query_chars == 0 {
            return Err(CoreError::Validation("min_query_chars must be > 0".to_string()));
        }
        if self.suggestion_limit == 0 {
            return Err(CoreError::Validation("suggestion_limit must be > 0".to_string()));
        }
        if self.toast_visible_ms <= self.toast_show_delay_ms {
            return Err(CoreError::Validation(
                "toast_visible_ms must be greater than toast_show_delay_ms".to_string(),
            ));
        }
        if self.counter_frame_ms == 0 {
            return Err(CoreError::Validation("counter_frame_ms must be > 0".to_string()));
        }
        if self.results_page.trim().is_empty() {
            return Err(CoreError::Validation("results_page must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn search_latency(&self) -> Duration {
        Duration::from_millis(self.search_latency_ms)
    }

    pub fn cart_auto_open_delay(&self) -> Duration {
        Duration::from_millis(self.cart_auto_open_ms)
    }

    pub fn cart_feedback(&self) -> Duration {
        Duration::from_millis(self.cart_feedback_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_prefix: String::new(),
            data_dir: default_data_dir(),
            min_query_chars: default_min_query_chars(),
            suggestion_limit: default_suggestion_limit(),
            search_latency_ms: default_search_latency_ms(),
            search_message_ms: default_search_message_ms(),
            search_panel_hide_ms: default_search_panel_hide_ms(),
            results_page: default_results_page(),
            cart_auto_open_ms: default_cart_auto_open_ms(),
            cart_feedback_ms: default_cart_feedback_ms(),
            toast_show_delay_ms: default_toast_show_delay_ms(),
            toast_visible_ms: default_toast_visible_ms(),
            toast_removal_ms: default_toast_removal_ms(),
            notification_visible_ms: default_notification_visible_ms(),
            login_latency_ms: default_login_latency_ms(),
            register_latency_ms: default_register_latency_ms(),
            nav_breakpoint_px: default_nav_breakpoint_px(),
            back_to_top_threshold_px: default_back_to_top_threshold_px(),
            counter_duration_ms: default_counter_duration_ms(),
            counter_frame_ms: default_counter_frame_ms(),
            mobile_search_focus_ms: default_mobile_search_focus_ms(),
        }
    }
}

fn default_data_dir() -> String { ".supreme".to_string() }
fn default_min_query_chars() -> usize { 2 }
fn default_suggestion_limit() -> usize { 5 }
fn default_search_latency_ms() -> u64 { 300 }
fn default_search_message_ms() -> u64 { 2000 }
fn default_search_panel_hide_ms() -> u64 { 200 }
fn default_results_page() -> String { "pages/search.html".to_string() }
fn default_cart_auto_open_ms() -> u64 { 300 }
fn default_cart_feedback_ms() -> u64 { 2000 }
fn default_toast_show_delay_ms() -> u64 { 100 }
fn default_toast_visible_ms() -> u64 { 3000 }
fn default_toast_removal_ms() -> u64 { 300 }
fn default_notification_visible_ms() -> u64 { 5000 }
fn default_login_latency_ms() -> u64 { 1500 }
fn default_register_latency_ms() -> u64 { 2000 }
fn default_nav_breakpoint_px() -> u32 { 1024 }
fn default_back_to_top_threshold_px() -> f64 { 300.0 }
fn default_counter_duration_ms() -> u64 { 2000 }
fn default_counter_frame_ms() -> u64 { 16 }
fn default_mobile_search_focus_ms() -> u64 { 300 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.min_query_chars, 2);
        assert_eq!(s.search_latency(), Duration::from_millis(300));
        s.validate().unwrap();
    }

    #[test]
    fn partial_toml_overrides() {
        let s = Settings::from_toml_str("suggestion_limit = 8\nstorage_prefix = \"sn_\"").unwrap();
        assert_eq!(s.suggestion_limit, 8);
        assert_eq!(s.storage_prefix, "sn_");
        assert_eq!(s.cart_feedback_ms, 2000);
    }

    #[test]
    fn toml_round_trip() {
        let s = Settings::default();
        let text = s.to_toml().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn validate_rejects_bad_limits() {
        let s = Settings { min_query_chars: 0, ..Settings::default() };
        assert!(matches!(s.validate(), Err(CoreError::Validation(_))));

        let s = Settings { toast_visible_ms: 50, ..Settings::default() };
        assert!(s.validate().is_err());
    }

    #[cfg(feature = "native")]
    #[test]
    fn save_and_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("supreme.toml");
        let path = path.to_str().unwrap();
        let s = Settings { suggestion_limit: 3, ..Settings::default() };
        s.save_to_file(path).unwrap();
        let loaded = Settings::from_file(path).unwrap();
        assert_eq!(loaded.suggestion_limit, 3);
    }
}
