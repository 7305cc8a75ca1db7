//! Native event frames and the typed events decoded from them.

use std::fmt;

use rod_common::{BridgeError, Position, ResourceId, Result, Size};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::strings;

/// Event kinds the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WindowCloseRequested,
    WindowFocused,
    WindowMoved,
    WindowResized,
    TrayClicked,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WindowCloseRequested => "window_close_requested",
            Self::WindowFocused => "window_focused",
            Self::WindowMoved => "window_moved",
            Self::WindowResized => "window_resized",
            Self::TrayClicked => "tray_clicked",
        }
    }

    /// `None` for kinds this version does not know about.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "window_close_requested" => Some(Self::WindowCloseRequested),
            "window_focused" => Some(Self::WindowFocused),
            "window_moved" => Some(Self::WindowMoved),
            "window_resized" => Some(Self::WindowResized),
            "tray_clicked" => Some(Self::TrayClicked),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw frame from the engine: a kind string and its parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    pub kind: String,
    pub payload: Value,
}

impl EventEnvelope {
    pub fn decode(kind: &[u8], payload: &[u8]) -> Result<Self> {
        let kind = strings::decode(kind)?;
        let payload = strings::decode(payload)?;
        let payload =
            serde_json::from_str(&payload).map_err(|e| BridgeError::Decode(e.to_string()))?;
        Ok(Self { kind, payload })
    }
}

#[derive(Deserialize)]
struct IdPayload {
    id: ResourceId,
}

#[derive(Deserialize)]
struct FocusPayload {
    id: ResourceId,
    focused: bool,
}

#[derive(Deserialize)]
struct MovePayload {
    id: ResourceId,
    x: i32,
    y: i32,
}

#[derive(Deserialize)]
struct ResizePayload {
    id: ResourceId,
    width: u32,
    height: u32,
}

/// A decoded native event, addressed to one resource by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeEvent {
    WindowCloseRequested { id: ResourceId },
    WindowFocused { id: ResourceId, focused: bool },
    WindowMoved { id: ResourceId, position: Position },
    WindowResized { id: ResourceId, size: Size },
    TrayClicked { id: ResourceId },
}

impl BridgeEvent {
    pub fn id(&self) -> ResourceId {
        match *self {
            Self::WindowCloseRequested { id }
            | Self::WindowFocused { id, .. }
            | Self::WindowMoved { id, .. }
            | Self::WindowResized { id, .. }
            | Self::TrayClicked { id } => id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::WindowCloseRequested { .. } => EventKind::WindowCloseRequested,
            Self::WindowFocused { .. } => EventKind::WindowFocused,
            Self::WindowMoved { .. } => EventKind::WindowMoved,
            Self::WindowResized { .. } => EventKind::WindowResized,
            Self::TrayClicked { .. } => EventKind::TrayClicked,
        }
    }

    /// Type an envelope. `Ok(None)` means the kind is unknown; a known
    /// kind with the wrong payload shape is an error.
    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Option<Self>> {
        let Some(kind) = EventKind::parse(&envelope.kind) else {
            return Ok(None);
        };
        let payload = &envelope.payload;
        let event = match kind {
            EventKind::WindowCloseRequested => {
                let p: IdPayload = parse_payload(payload)?;
                Self::WindowCloseRequested { id: p.id }
            }
            EventKind::WindowFocused => {
                let p: FocusPayload = parse_payload(payload)?;
                Self::WindowFocused {
                    id: p.id,
                    focused: p.focused,
                }
            }
            EventKind::WindowMoved => {
                let p: MovePayload = parse_payload(payload)?;
                Self::WindowMoved {
                    id: p.id,
                    position: Position::new(p.x, p.y),
                }
            }
            EventKind::WindowResized => {
                let p: ResizePayload = parse_payload(payload)?;
                Self::WindowResized {
                    id: p.id,
                    size: Size::new(p.width, p.height),
                }
            }
            EventKind::TrayClicked => {
                let p: IdPayload = parse_payload(payload)?;
                Self::TrayClicked { id: p.id }
            }
        };
        Ok(Some(event))
    }

    /// Decode a raw native frame, dropping anything that does not parse.
    ///
    /// The engine's event stream is outside the bridge's control, so a bad
    /// frame is logged and skipped rather than reported.
    pub fn decode(kind: &[u8], payload: &[u8]) -> Option<Self> {
        let envelope = match EventEnvelope::decode(kind, payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "dropping undecodable native event");
                return None;
            }
        };
        match Self::from_envelope(&envelope) {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                trace!(kind = %envelope.kind, "ignoring unknown native event kind");
                None
            }
            Err(e) => {
                debug!(kind = %envelope.kind, error = %e, "dropping malformed native event");
                None
            }
        }
    }
}

fn parse_payload<T: for<'de> Deserialize<'de>>(payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|e| BridgeError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            EventKind::WindowCloseRequested,
            EventKind::WindowFocused,
            EventKind::WindowMoved,
            EventKind::WindowResized,
            EventKind::TrayClicked,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("window_theme_changed"), None);
    }

    #[test]
    fn decodes_every_known_kind() {
        assert_eq!(
            BridgeEvent::decode(b"window_close_requested", br#"{"id":1}"#),
            Some(BridgeEvent::WindowCloseRequested { id: ResourceId(1) })
        );
        assert_eq!(
            BridgeEvent::decode(b"window_focused", br#"{"id":2,"focused":true}"#),
            Some(BridgeEvent::WindowFocused {
                id: ResourceId(2),
                focused: true
            })
        );
        assert_eq!(
            BridgeEvent::decode(b"window_moved", br#"{"id":3,"x":-1920,"y":40}"#),
            Some(BridgeEvent::WindowMoved {
                id: ResourceId(3),
                position: Position::new(-1920, 40)
            })
        );
        assert_eq!(
            BridgeEvent::decode(b"window_resized", br#"{"id":4,"width":500,"height":350}"#),
            Some(BridgeEvent::WindowResized {
                id: ResourceId(4),
                size: Size::new(500, 350)
            })
        );
        assert_eq!(
            BridgeEvent::decode(b"tray_clicked", br#"{"id":5}"#),
            Some(BridgeEvent::TrayClicked { id: ResourceId(5) })
        );
    }

    #[test]
    fn unknown_kind_is_ignored() {
        let envelope = EventEnvelope::decode(b"window_theme_changed", br#"{"id":1}"#).unwrap();
        assert_eq!(BridgeEvent::from_envelope(&envelope), Ok(None));
        assert_eq!(BridgeEvent::decode(b"window_theme_changed", br#"{"id":1}"#), None);
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert_eq!(BridgeEvent::decode(b"window_resized", b"{not json"), None);
        assert_eq!(BridgeEvent::decode(b"window_resized", br#"{"id":1}"#), None);
        assert_eq!(BridgeEvent::decode(b"tray_clicked", br#"{"id":null}"#), None);
        assert_eq!(BridgeEvent::decode(&[0xff], br#"{"id":1}"#), None);
    }

    #[test]
    fn known_kind_with_bad_payload_is_an_error() {
        let envelope = EventEnvelope::decode(b"window_focused", br#"{"id":1}"#).unwrap();
        assert!(matches!(
            BridgeEvent::from_envelope(&envelope),
            Err(BridgeError::Decode(_))
        ));
    }

    #[test]
    fn trailing_nul_in_frame_is_tolerated() {
        assert_eq!(
            BridgeEvent::decode(b"tray_clicked\0", b"{\"id\":9}\0"),
            Some(BridgeEvent::TrayClicked { id: ResourceId(9) })
        );
    }

    #[test]
    fn accessors() {
        let event = BridgeEvent::WindowMoved {
            id: ResourceId(8),
            position: Position::new(1, 2),
        };
        assert_eq!(event.id(), ResourceId(8));
        assert_eq!(event.kind(), EventKind::WindowMoved);
        assert_eq!(event.kind().to_string(), "window_moved");
    }
}
