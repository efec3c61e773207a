//! `input` module handlers (spec §2 "input/storage/other").
//!
//! Source-action sequences are dispatched to CDP's `Input` domain action by
//! action, in order, within a single source; sources are not interleaved —
//! good enough for the single-pointer, single-keyboard sequences this mapper
//! actually receives.

use std::sync::Arc;

use bidi_cdp::protocol::input;
use bidi_types::input::{Action, PerformActionsParams, ReleaseActionsParams};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;

use super::ok;

async fn dispatch_action(
    engine: &Arc<MapperEngine>,
    session: &str,
    pointer_x: &mut f64,
    pointer_y: &mut f64,
    action: &Action,
) -> Result<(), MapperError> {
    match action {
        Action::PointerDown { button } => {
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchMouseEvent",
                    Some(input::DispatchMouseEventParams {
                        event_type: input::MouseEventType::MousePressed,
                        x: *pointer_x,
                        y: *pointer_y,
                        modifiers: None,
                        button: Some(mouse_button(*button)),
                        buttons: Some(1),
                        click_count: Some(1),
                    }),
                    Some(session),
                )
                .await?;
        }
        Action::PointerUp { button } => {
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchMouseEvent",
                    Some(input::DispatchMouseEventParams {
                        event_type: input::MouseEventType::MouseReleased,
                        x: *pointer_x,
                        y: *pointer_y,
                        modifiers: None,
                        button: Some(mouse_button(*button)),
                        buttons: Some(0),
                        click_count: Some(1),
                    }),
                    Some(session),
                )
                .await?;
        }
        Action::PointerMove { x, y } => {
            *pointer_x = *x;
            *pointer_y = *y;
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchMouseEvent",
                    Some(input::DispatchMouseEventParams {
                        event_type: input::MouseEventType::MouseMoved,
                        x: *x,
                        y: *y,
                        modifiers: None,
                        button: None,
                        buttons: None,
                        click_count: None,
                    }),
                    Some(session),
                )
                .await?;
        }
        Action::Pause { duration } => {
            if let Some(ms) = duration {
                tokio::time::sleep(std::time::Duration::from_millis(*ms)).await;
            }
        }
        Action::KeyDown { value } => {
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchKeyEvent",
                    Some(key_event_params(input::KeyEventType::KeyDown, value)),
                    Some(session),
                )
                .await?;
        }
        Action::KeyUp { value } => {
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchKeyEvent",
                    Some(key_event_params(input::KeyEventType::KeyUp, value)),
                    Some(session),
                )
                .await?;
        }
        Action::Scroll {
            x,
            y,
            delta_x,
            delta_y,
        } => {
            let _: Value = engine
                .cdp
                .send_command(
                    "Input.dispatchMouseEvent",
                    Some(input::DispatchMouseWheelParams::new(*x, *y, *delta_x, *delta_y)),
                    Some(session),
                )
                .await?;
        }
    }
    Ok(())
}

fn mouse_button(button: u8) -> input::MouseButton {
    match button {
        0 => input::MouseButton::Left,
        1 => input::MouseButton::Middle,
        2 => input::MouseButton::Right,
        3 => input::MouseButton::Back,
        4 => input::MouseButton::Forward,
        _ => input::MouseButton::None,
    }
}

fn key_event_params(event_type: input::KeyEventType, key: &str) -> input::DispatchKeyEventParams {
    let is_printable = key.chars().count() == 1;
    input::DispatchKeyEventParams {
        event_type,
        modifiers: None,
        timestamp: None,
        text: is_printable.then(|| key.to_string()),
        unmodified_text: is_printable.then(|| key.to_string()),
        key_identifier: None,
        code: None,
        key: Some(key.to_string()),
        windows_virtual_key_code: None,
        native_virtual_key_code: None,
        auto_repeat: Some(false),
        is_keypad: Some(false),
        is_system_key: Some(false),
        commands: None,
    }
}

pub async fn perform_actions(
    engine: &Arc<MapperEngine>,
    params: PerformActionsParams,
) -> Result<Value, MapperError> {
    engine.contexts.read().get(&params.context)?;
    let session = engine.session_for(&params.context)?;

    for source in &params.actions {
        let mut pointer_x = 0.0;
        let mut pointer_y = 0.0;
        for action in &source.actions {
            dispatch_action(engine, &session, &mut pointer_x, &mut pointer_y, action).await?;
        }
    }

    ok(serde_json::json!({}))
}

pub async fn release_actions(
    engine: &Arc<MapperEngine>,
    params: ReleaseActionsParams,
) -> Result<Value, MapperError> {
    engine.contexts.read().get(&params.context)?;
    let session = engine.session_for(&params.context)?;

    let _: Value = engine
        .cdp
        .send_command(
            "Input.dispatchMouseEvent",
            Some(input::DispatchMouseEventParams {
                event_type: input::MouseEventType::MouseReleased,
                x: 0.0,
                y: 0.0,
                modifiers: None,
                button: Some(input::MouseButton::Left),
                buttons: Some(0),
                click_count: Some(0),
            }),
            Some(&session),
        )
        .await?;

    ok(serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_maps_known_indices() {
        assert_eq!(mouse_button(0), input::MouseButton::Left);
        assert_eq!(mouse_button(1), input::MouseButton::Middle);
        assert_eq!(mouse_button(2), input::MouseButton::Right);
    }

    #[test]
    fn key_event_marks_single_char_as_printable_text() {
        let params = key_event_params(input::KeyEventType::KeyDown, "a");
        assert_eq!(params.text.as_deref(), Some("a"));
        let params = key_event_params(input::KeyEventType::KeyDown, "Enter");
        assert_eq!(params.text, None);
    }
}
