//! Scripted interaction sessions for `vitae replay`.
//!
//! ```json
//! {
//!   "editorHeight": 600,
//!   "previewHeight": 500,
//!   "steps": [
//!     { "at": 0,   "action": { "type": "scroll", "pane": "editor", "top": 750 } },
//!     { "at": 400, "action": { "type": "activate", "section": "certifications" } },
//!     { "at": 500, "action": { "type": "edit", "mutation": { "op": "setField", "field": "bio", "value": "Hi" } } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use vitae_document::{Mutation, SectionId};
use vitae_editor::{LayoutMode, PaneSide};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {index} at {at}ms comes before the previous step at {previous}ms")]
    OutOfOrder { index: usize, at: u64, previous: u64 },

    #[error("{name} must be a positive number of pixels, got {value}")]
    Viewport { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Visible height of the editing pane
    #[serde(default = "default_editor_height")]
    pub editor_height: f64,

    /// Visible height of the preview pane
    #[serde(default = "default_preview_height")]
    pub preview_height: f64,

    /// How long to keep running timers after the last step
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    pub steps: Vec<Step>,
}

fn default_editor_height() -> f64 {
    600.0
}

fn default_preview_height() -> f64 {
    500.0
}

fn default_settle_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds from the start of the session
    pub at: u64,
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Scroll { pane: PaneSide, top: f64 },
    Activate { section: SectionId },
    Edit { mutation: Mutation },
    Layout { mode: LayoutMode },
    Sync { enabled: bool },
    Focus { enabled: bool },
    Resize { fraction: f64 },
    Reset,
    Save,
}

impl Script {
    pub fn from_json_str(source: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(source)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        for (name, value) in [("editorHeight", self.editor_height), ("previewHeight", self.preview_height)] {
            if !(value > 0.0) {
                return Err(ScriptError::Viewport { name, value });
            }
        }

        let mut previous = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at: step.at,
                    previous,
                });
            }
            previous = step.at;
        }
        Ok(())
    }

    /// Time of the last step
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map(|step| step.at).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitae_document::ProfileField;

    #[test]
    fn test_parse_script() {
        let script = Script::from_json_str(
            r#"{
                "steps": [
                    { "at": 0, "action": { "type": "scroll", "pane": "preview", "top": 120.5 } },
                    { "at": 200, "action": { "type": "activate", "section": "additionalInfo" } },
                    { "at": 300, "action": { "type": "edit", "mutation": { "op": "setField", "field": "title", "value": "CTO" } } },
                    { "at": 300, "action": { "type": "layout", "mode": "previewOnly" } },
                    { "at": 900, "action": { "type": "save" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.editor_height, 600.0);
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.duration_ms(), 900);
        assert!(matches!(
            script.steps[1].action,
            Action::Activate {
                section: SectionId::AdditionalInfo
            }
        ));
        assert!(matches!(
            &script.steps[2].action,
            Action::Edit {
                mutation: Mutation::SetField {
                    field: ProfileField::Title,
                    ..
                }
            }
        ));
        assert!(matches!(
            script.steps[3].action,
            Action::Layout {
                mode: LayoutMode::PreviewOnly
            }
        ));
    }

    #[test]
    fn test_steps_must_be_ordered() {
        let result = Script::from_json_str(
            r#"{ "steps": [
                { "at": 500, "action": { "type": "reset" } },
                { "at": 100, "action": { "type": "reset" } }
            ] }"#,
        );
        assert!(matches!(
            result,
            Err(ScriptError::OutOfOrder {
                index: 1,
                at: 100,
                previous: 500
            })
        ));
    }

    #[test]
    fn test_viewport_must_be_positive() {
        let result = Script::from_json_str(r#"{ "previewHeight": 0, "steps": [] }"#);
        assert!(matches!(
            result,
            Err(ScriptError::Viewport {
                name: "previewHeight",
                ..
            })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "steps": [{ "at": 10, "action": { "type": "focus", "enabled": true } }] }"#)
            .unwrap();

        let script = Script::load(&path).unwrap();
        assert!(matches!(script.steps[0].action, Action::Focus { enabled: true }));
        assert!(matches!(Script::load(&dir.path().join("missing.json")), Err(ScriptError::Io(_))));
    }
}
