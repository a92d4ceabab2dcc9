//! Launch configuration read from the page URL.
//!
//! `?preview=1` enters editor-preview mode, `seed=<u64>` fixes the RNG seed
//! and `stage=<name>` picks the starting stage. Unknown keys are ignored and
//! malformed values fall back to defaults.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    pub preview: bool,
    pub seed: Option<u64>,
    pub stage: Option<String>,
}

impl LaunchConfig {
    /// Parse a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "preview" => config.preview = matches!(value, "" | "1" | "true"),
                "seed" => config.seed = value.parse().ok(),
                "stage" if !value.is_empty() => config.stage = Some(value.to_string()),
                _ => {}
            }
        }
        config
    }

    /// Read `window.location.search`. Only meaningful in the browser.
    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::from_query(&search)
    }
}
