//! `input` module params (spec §2 "input/storage/other").
//!
//! Only `performActions`/`releaseActions` are modeled — source-action
//! sequences are forwarded to CDP's `Input` domain essentially unchanged,
//! so the mapper does not need a richer local model than this.

use serde::Deserialize;

/// A single action within a source's action sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename = "pointerDown")]
    PointerDown { button: u8 },
    #[serde(rename = "pointerUp")]
    PointerUp { button: u8 },
    #[serde(rename = "pointerMove")]
    PointerMove { x: f64, y: f64 },
    Pause {
        #[serde(default)]
        duration: Option<u64>,
    },
    KeyDown {
        value: String,
    },
    KeyUp {
        value: String,
    },
    Scroll {
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
    },
}

/// One input source's ordered action sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceActions {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub actions: Vec<Action>,
}

/// Parameters for `input.performActions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PerformActionsParams {
    pub context: String,
    pub actions: Vec<SourceActions>,
}

/// Parameters for `input.releaseActions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseActionsParams {
    pub context: String,
}
