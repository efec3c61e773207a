//! `Input` domain types: synthetic mouse, keyboard, and wheel events, the
//! CDP counterpart of BiDi `input.performActions`.

use serde::Serialize;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// No button.
    None,
    /// Primary (left) button.
    Left,
    /// Auxiliary (middle) button.
    Middle,
    /// Secondary (right) button.
    Right,
    /// Browser back button.
    Back,
    /// Browser forward button.
    Forward,
}

/// `Input.dispatchMouseEvent` event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    /// Button pressed.
    MousePressed,
    /// Button released.
    MouseReleased,
    /// Pointer moved.
    MouseMoved,
    /// Wheel scrolled; use [`DispatchMouseWheelParams`] instead for this.
    MouseWheel,
}

/// Bitmask of modifier keys held during an input event (Alt=1, Ctrl=2, Meta/Cmd=4, Shift=8).
pub type Modifiers = i64;

/// Parameters for `Input.dispatchMouseEvent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    /// Type of the mouse event.
    #[serde(rename = "type")]
    pub event_type: MouseEventType,
    /// X coordinate relative to the viewport in CSS pixels.
    pub x: f64,
    /// Y coordinate relative to the viewport in CSS pixels.
    pub y: f64,
    /// Modifier key bitmask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
    /// Button that changed state, for press/release events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// Bitmask of currently pressed buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<i64>,
    /// Number of times the button has been clicked, for multi-click detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i64>,
}

/// Parameters for `Input.dispatchMouseEvent` when dispatching a wheel scroll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseWheelParams {
    /// Always `"mouseWheel"`.
    #[serde(rename = "type")]
    pub event_type: MouseEventType,
    /// X coordinate relative to the viewport in CSS pixels.
    pub x: f64,
    /// Y coordinate relative to the viewport in CSS pixels.
    pub y: f64,
    /// Horizontal scroll delta.
    pub delta_x: f64,
    /// Vertical scroll delta.
    pub delta_y: f64,
    /// Modifier key bitmask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
}

impl DispatchMouseWheelParams {
    /// Creates wheel params scrolling by the given deltas at the given position.
    pub fn new(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            event_type: MouseEventType::MouseWheel,
            x,
            y,
            delta_x,
            delta_y,
            modifiers: None,
        }
    }
}

/// `Input.dispatchKeyEvent` event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    /// Key pressed down.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Raw key down, bypassing IME.
    RawKeyDown,
    /// A character was produced.
    Char,
}

/// Parameters for `Input.dispatchKeyEvent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    /// Type of key event.
    #[serde(rename = "type")]
    pub event_type: KeyEventType,
    /// Modifier key bitmask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
    /// Time at which the event occurred, seconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Text produced, for `Char` and `KeyDown` events with a printable result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text ignoring modifiers, for `Char`/`KeyDown` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmodified_text: Option<String>,
    /// Legacy key identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_identifier: Option<String>,
    /// Physical key code, e.g. `"KeyA"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Key value, e.g. `"a"`, `"Enter"`, `"Shift"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Windows virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_virtual_key_code: Option<i64>,
    /// Native virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_virtual_key_code: Option<i64>,
    /// Whether this is an auto-repeated key down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repeat: Option<bool>,
    /// Whether the key originates from the numeric keypad.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_keypad: Option<bool>,
    /// Whether this is a system key (e.g. part of an Alt+key combo).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system_key: Option<bool>,
    /// Editing commands to execute as a result of this key event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
}

/// Parameters for `Input.insertText`, inserting text without synthesizing key events.
#[derive(Debug, Clone, Serialize)]
pub struct InsertTextParams {
    /// Text to insert.
    pub text: String,
}

/// Type of a dispatched touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchEventType {
    /// A touch started.
    TouchStart,
    /// A touch point moved.
    TouchMove,
    /// A touch ended.
    TouchEnd,
    /// A touch was canceled.
    TouchCancel,
}

/// A single active touch point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    /// X coordinate relative to the viewport in CSS pixels.
    pub x: f64,
    /// Y coordinate relative to the viewport in CSS pixels.
    pub y: f64,
    /// Identifier used to track this point across events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<f64>,
}

/// Parameters for `Input.dispatchTouchEvent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchTouchEventParams {
    /// Type of touch event.
    #[serde(rename = "type")]
    pub event_type: TouchEventType,
    /// Active touch points.
    pub touch_points: Vec<TouchPoint>,
    /// Modifier key bitmask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_event_serializes_type_as_camel_case() {
        let params = DispatchMouseEventParams {
            event_type: MouseEventType::MousePressed,
            x: 1.0,
            y: 2.0,
            modifiers: None,
            button: Some(MouseButton::Left),
            buttons: Some(1),
            click_count: Some(1),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "mousePressed");
        assert_eq!(json["button"], "left");
    }

    #[test]
    fn key_event_omits_absent_fields() {
        let params = DispatchKeyEventParams {
            event_type: KeyEventType::KeyDown,
            modifiers: None,
            timestamp: None,
            text: None,
            unmodified_text: None,
            key_identifier: None,
            code: Some("Enter".into()),
            key: Some("Enter".into()),
            windows_virtual_key_code: Some(13),
            native_virtual_key_code: Some(13),
            auto_repeat: None,
            is_keypad: None,
            is_system_key: None,
            commands: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
