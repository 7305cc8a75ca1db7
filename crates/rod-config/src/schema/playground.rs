use serde::{Deserialize, Serialize};

/// Defaults for the webview the playground binary opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub title: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            title: "Rod WebView Playground".into(),
            url: "https://example.com".into(),
            width: 400,
            height: 300,
        }
    }
}
