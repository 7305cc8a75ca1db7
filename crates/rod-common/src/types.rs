use serde::{Deserialize, Serialize};
use std::fmt;

/// Window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Window position in pixels. Negative on monitors left of / above the
/// primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Taskbar progress indicator state. The discriminant is the wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProgressState {
    Normal = 0,
    Intermediate = 1,
    Paused = 2,
    Error = 3,
    None = 4,
}

impl ProgressState {
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Intermediate),
            2 => Some(Self::Paused),
            3 => Some(Self::Error),
            4 => Some(Self::None),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        self as u8
    }
}

impl Serialize for ProgressState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for ProgressState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_wire(value).ok_or_else(|| {
            serde::de::Error::custom(format!("progress state out of range: {value}"))
        })
    }
}

/// Payload of a progress-bar update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub state: ProgressState,
    pub progress: f64,
}

/// The kinds of native resource the bridge wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    EventLoop,
    Window,
    WebView,
    WebContext,
    Tray,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EventLoop => "event loop",
            Self::Window => "window",
            Self::WebView => "webview",
            Self::WebContext => "webcontext",
            Self::Tray => "tray",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
