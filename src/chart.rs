//! Chart document model.
//!
//! The structured document a container carries: chart metadata, the BPM
//! list, and per-line animation keyframes plus notes. Serialized as JSON
//! inside the payload; the container layer itself only sees the bytes.

use serde::{Deserialize, Serialize};

use crate::error::{ContainerError, FormatError};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Chart {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub bpm_list: Vec<BpmPoint>,
    #[serde(default)]
    pub lines: Vec<JudgeLine>,
}

impl Chart {
    /// Serializes the chart to its JSON document bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ContainerError> {
        serde_json::to_vec(self).map_err(|e| FormatError::Document(e).into())
    }

    /// Parses a chart from JSON document bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ContainerError> {
        serde_json::from_slice(data).map_err(|e| FormatError::Document(e).into())
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ChartMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub composer: String,
    #[serde(default)]
    pub charter: String,
    #[serde(default)]
    pub level: String,
    /// Delay between audio start and beat zero, in milliseconds.
    #[serde(default)]
    pub offset_ms: f64,
}

/// A tempo change taking effect at `beat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BpmPoint {
    pub beat: f64,
    pub bpm: f64,
}

/// A judgment line: four animated properties plus its notes.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct JudgeLine {
    #[serde(default)]
    pub move_x: Vec<Keyframe>,
    #[serde(default)]
    pub move_y: Vec<Keyframe>,
    #[serde(default)]
    pub rotate: Vec<Keyframe>,
    #[serde(default)]
    pub alpha: Vec<Keyframe>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// One point on an animation curve.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub beat: f64,
    pub value: f64,
    #[serde(default)]
    pub easing: Easing,
}

/// Interpolation towards the next keyframe.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    SineIn,
    SineOut,
    QuadIn,
    QuadOut,
    /// Hold the value until the next keyframe.
    Hold,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub kind: NoteKind,
    pub beat: f64,
    /// Horizontal position on the line, -1.0 (left edge) to 1.0 (right edge).
    pub x: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Duration in beats; only meaningful for hold notes.
    #[serde(default)]
    pub hold_beats: f64,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    #[default]
    Tap,
    Drag,
    Flick,
    Hold,
}

fn default_speed() -> f64 {
    1.0
}
