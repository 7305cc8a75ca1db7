//! Host options and their wire encoding.
//!
//! Host option types mirror the camelCase field names embedders write in
//! JSON or TOML and can be built directly in Rust. The engine expects
//! snake_case objects with unset fields omitted entirely, which is what the
//! `encode_*` functions produce.
//!
//! Size bounds are the one place where "unset" and "clear" differ: an absent
//! bound is omitted, a cleared bound is sent as the empty string.

use rod_common::{BridgeError, Position, ProgressBar, Result, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A minimum or maximum window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBound {
    /// Remove any existing bound.
    Clear,
    Limit(Size),
}

impl From<Size> for SizeBound {
    fn from(size: Size) -> Self {
        Self::Limit(size)
    }
}

impl From<Option<Size>> for SizeBound {
    fn from(size: Option<Size>) -> Self {
        size.map_or(Self::Clear, Self::Limit)
    }
}

impl Serialize for SizeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Clear => serializer.serialize_str(""),
            Self::Limit(size) => size.serialize(serializer),
        }
    }
}

/// Absent stays `None`; an explicit `null` becomes [`SizeBound::Clear`].
fn nullable_bound<'de, D>(deserializer: D) -> std::result::Result<Option<SizeBound>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<Size>::deserialize(deserializer)?.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowOptions {
    pub always_on_bottom: Option<bool>,
    pub always_on_top: Option<bool>,
    pub closable: Option<bool>,
    pub content_protection: Option<bool>,
    pub decorations: Option<bool>,
    pub focusable: Option<bool>,
    pub focused: Option<bool>,
    pub size: Option<Size>,
    #[serde(deserialize_with = "nullable_bound")]
    pub minimum_size: Option<SizeBound>,
    #[serde(deserialize_with = "nullable_bound")]
    pub maximum_size: Option<SizeBound>,
    pub maximizable: Option<bool>,
    pub maximized: Option<bool>,
    pub minimizable: Option<bool>,
    pub position: Option<Position>,
    pub resizable: Option<bool>,
    pub title: Option<String>,
    pub transparent: Option<bool>,
    pub visible: Option<bool>,
    pub visible_on_all_workspaces: Option<bool>,
}

impl WindowOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }
}

/// Options for a webview: its window plus the surface settings.
///
/// `transparent` lives on the window half and is sent to both create calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebViewOptions {
    #[serde(flatten)]
    pub window: WindowOptions,
    pub autoplay: Option<bool>,
    pub back_forward_navigation_gestures: Option<bool>,
    pub dev_tools: Option<bool>,
    pub hotkeys_zoom: Option<bool>,
    pub html: Option<String>,
    pub url: Option<String>,
    pub incognito: Option<bool>,
}

impl From<WindowOptions> for WebViewOptions {
    fn from(window: WindowOptions) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrayOptions {
    pub icon_path: Option<String>,
    pub tooltip: Option<String>,
    pub title: Option<String>,
}

#[derive(Serialize)]
struct WindowWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    always_on_bottom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    always_on_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_protection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decorations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    focusable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    focused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_size: Option<SizeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum_size: Option<SizeBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transparent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible_on_all_workspaces: Option<bool>,
}

#[derive(Serialize)]
struct WebViewWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    autoplay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_forward_navigation_gestures: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev_tools: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hotkeys_zoom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transparent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    incognito: Option<bool>,
}

#[derive(Serialize)]
struct TrayWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BridgeError::Encode(e.to_string()))
}

pub fn encode_window_options(options: &WindowOptions) -> Result<String> {
    to_json(&WindowWire {
        always_on_bottom: options.always_on_bottom,
        always_on_top: options.always_on_top,
        closable: options.closable,
        content_protection: options.content_protection,
        decorations: options.decorations,
        focusable: options.focusable,
        focused: options.focused,
        size: options.size,
        minimum_size: options.minimum_size,
        maximum_size: options.maximum_size,
        maximizable: options.maximizable,
        maximized: options.maximized,
        minimizable: options.minimizable,
        position: options.position,
        resizable: options.resizable,
        title: options.title.as_deref(),
        transparent: options.transparent,
        visible: options.visible,
        visible_on_all_workspaces: options.visible_on_all_workspaces
    })
}

/// Encode the surface half of webview options. The window half goes
/// through [`encode_window_options`].
pub fn encode_webview_options(options: &WebViewOptions) -> Result<String> {
    to_json(&WebViewWire {
        autoplay: options.autoplay,
        back_forward_navigation_gestures: options.back_forward_navigation_gestures,
        dev_tools: options.dev_tools,
        hotkeys_zoom: options.hotkeys_zoom,
        transparent: options.window.transparent,
        html: options.html.as_deref(),
        url: options.url.as_deref(),
        incognito: options.incognito
    })
}

pub fn encode_tray_options(options: &TrayOptions) -> Result<String> {
    to_json(&TrayWire {
        icon_path: options.icon_path.as_deref(),
        tooltip: options.tooltip.as_deref(),
        title: options.title.as_deref()
    })
}

pub fn encode_size(size: Size) -> Result<String> {
    to_json(&size)
}

pub fn encode_position(position: Position) -> Result<String> {
    to_json(&position)
}

/// `None` clears the bound and encodes as `""`.
pub fn encode_size_bound(bound: Option<Size>) -> Result<String> {
    match bound {
        Some(size) => encode_size(size),
        None => Ok(String::new()),
    }
}

pub fn encode_progress_bar(progress: ProgressBar) -> Result<String> {
    to_json(&progress)
}
