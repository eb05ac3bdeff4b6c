//! Shared domain types: actuator state and the typed frame-input contract.
//!
//! Upstream flow stages deliver one JSON object per frame carrying a
//! `frame_data` mapping from stage keys to stage outputs. Decoding that shape
//! once at the boundary replaces the deep dynamic field lookups the device
//! protocol would otherwise require.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix identifying stage entries inside a frame's `frame_data` mapping.
const STAGE_KEY_MARKER: &str = "component_";

/// Physical state of the relay output.
///
/// The authoritative copy lives on the device; this value is never cached
/// across transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorState {
    Off,
    On,
}

impl ActuatorState {
    /// Wire encoding used by the relay HTTP protocol (0 = off, 1 = on).
    pub fn as_wire(self) -> u8 {
        match self {
            ActuatorState::Off => 0,
            ActuatorState::On => 1,
        }
    }

    /// Decode the wire encoding. Returns `None` for any value outside {0, 1}.
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(ActuatorState::Off),
            1 => Some(ActuatorState::On),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorState::Off => write!(f, "off"),
            ActuatorState::On => write!(f, "on"),
        }
    }
}

/// One detected object reported by an upstream stage for one frame.
///
/// Only `label` is consulted by the controller; score and bounding box are
/// decoded for completeness of the frame contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

impl DetectionRecord {
    /// Construct a record carrying only a label.
    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            score: None,
            bbox: None,
        }
    }
}

/// Output of one named pipeline stage for one frame: the stage's declared
/// component name plus a mapping of result-group id to an ordered sequence of
/// detection records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    pub component_name: String,
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<DetectionRecord>>,
}

/// One frame's worth of per-stage outputs, keyed by stage identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInput {
    pub frame_data: BTreeMap<String, StageOutput>,
}

impl FrameInput {
    /// Iterate the stage outputs attributed to the given stage name.
    ///
    /// Only `frame_data` keys containing the stage marker are considered, and
    /// of those only entries whose `component_name` matches.
    pub fn stage_outputs<'a>(&'a self, stage_name: &'a str) -> impl Iterator<Item = &'a StageOutput> {
        self.frame_data
            .iter()
            .filter(|(key, _)| key.contains(STAGE_KEY_MARKER))
            .map(|(_, value)| value)
            .filter(move |stage| stage.component_name == stage_name)
    }

    /// Iterate every detection record produced by the given stage, in
    /// result-group order.
    pub fn detections<'a>(&'a self, stage_name: &'a str) -> impl Iterator<Item = &'a DetectionRecord> {
        self.stage_outputs(stage_name)
            .flat_map(|stage| stage.outputs.values())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> serde_json::Value {
        serde_json::json!({
            "frame_data": {
                "component_3": {
                    "component_name": "roi_tracker",
                    "outputs": {
                        "group_0": [
                            {"label": "forklift", "score": 0.91, "bbox": [10.0, 20.0, 80.0, 120.0]},
                            {"label": "person"}
                        ]
                    }
                },
                "component_1": {
                    "component_name": "detector",
                    "outputs": {
                        "group_0": [{"label": "forklift"}]
                    }
                },
                "video_info": {
                    "component_name": "ignored",
                    "outputs": {}
                }
            }
        })
    }

    #[test]
    fn test_actuator_state_wire_round_trip() {
        assert_eq!(ActuatorState::Off.as_wire(), 0);
        assert_eq!(ActuatorState::On.as_wire(), 1);
        assert_eq!(ActuatorState::from_wire(0), Some(ActuatorState::Off));
        assert_eq!(ActuatorState::from_wire(1), Some(ActuatorState::On));
        assert_eq!(ActuatorState::from_wire(2), None);
        assert_eq!(ActuatorState::from_wire(255), None);
    }

    #[test]
    fn test_actuator_state_display() {
        assert_eq!(ActuatorState::Off.to_string(), "off");
        assert_eq!(ActuatorState::On.to_string(), "on");
    }

    #[test]
    fn test_frame_decodes_from_json() {
        let frame: FrameInput = serde_json::from_value(sample_frame()).unwrap();
        assert_eq!(frame.frame_data.len(), 3);
        let stage = &frame.frame_data["component_3"];
        assert_eq!(stage.component_name, "roi_tracker");
        assert_eq!(stage.outputs["group_0"].len(), 2);
        assert_eq!(stage.outputs["group_0"][0].score, Some(0.91));
    }

    #[test]
    fn test_stage_filter_matches_name_and_key_marker() {
        let frame: FrameInput = serde_json::from_value(sample_frame()).unwrap();

        let tracked: Vec<_> = frame.detections("roi_tracker").collect();
        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked[0].label, "forklift");
        assert_eq!(tracked[1].label, "person");

        // The detector stage is keyed under "component_1" and matches its own name.
        assert_eq!(frame.detections("detector").count(), 1);

        // "video_info" lacks the stage key marker and is never consumed,
        // even if its component_name were to match.
        assert_eq!(frame.detections("ignored").count(), 0);
    }

    #[test]
    fn test_missing_outputs_defaults_to_empty() {
        let frame: FrameInput = serde_json::from_value(serde_json::json!({
            "frame_data": {
                "component_0": {"component_name": "roi_tracker"}
            }
        }))
        .unwrap();

        assert_eq!(frame.detections("roi_tracker").count(), 0);
    }

    #[test]
    fn test_record_missing_label_is_decode_error() {
        let result: Result<FrameInput, _> = serde_json::from_value(serde_json::json!({
            "frame_data": {
                "component_0": {
                    "component_name": "roi_tracker",
                    "outputs": {"group_0": [{"score": 0.5}]}
                }
            }
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_with_label_carries_only_label() {
        let record = DetectionRecord::with_label("forklift");
        assert_eq!(record.label, "forklift");
        assert_eq!(record.score, None);
        assert_eq!(record.bbox, None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"label": "forklift"}));
    }

    #[test]
    fn test_missing_frame_data_is_decode_error() {
        let result: Result<FrameInput, _> = serde_json::from_value(serde_json::json!({"other": 1}));
        assert!(result.is_err());
    }
}
