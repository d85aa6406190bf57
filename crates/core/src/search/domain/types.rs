use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// Owner of a matched face crop. `display_name` is absent for persons that
/// have been clustered but not yet confirmed by an operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Person {
    /// Label shown in result grids: confirmed name, or a truncated cluster id.
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Person {}", &self.id[..self.id.len().min(8)]),
        }
    }
}

/// One message inside a context window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub has_photo: bool,
}

/// Chronological window around the anchor message a match was found in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    #[serde(default)]
    pub group_name: Option<String>,
    pub message: ContextMessage,
    #[serde(default)]
    pub before: Vec<ContextMessage>,
    #[serde(default)]
    pub after: Vec<ContextMessage>,
}

/// One ranked candidate for a detected face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    /// Similarity percentage in `[0, 100]` from the recognition service.
    pub similarity: f32,
    #[serde(default)]
    pub crop_path: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub person: Option<Person>,
    #[serde(default)]
    pub context: Option<MessageContext>,
}

impl FaceMatch {
    /// Preferred stored path for the grid cell (tight crop over full photo).
    pub fn grid_path(&self) -> Option<&str> {
        self.crop_path.as_deref().or(self.photo_path.as_deref())
    }

    /// Preferred stored path for the expanded inspector (full photo first).
    pub fn inspector_path(&self) -> Option<&str> {
        self.photo_path.as_deref().or(self.crop_path.as_deref())
    }
}

/// One face the recognition service found in the uploaded photo, in backend
/// order (index 0 is the first reported face).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub matches: Vec<FaceMatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceSearchResponse {
    #[serde(default)]
    pub faces_detected: usize,
    #[serde(default)]
    pub results: Vec<DetectedFace>,
    /// Backend-side rejection carried in-band (bad image, oversized upload).
    #[serde(default)]
    pub error: Option<String>,
}

/// One ranked message snippet from the text protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextResult {
    pub id: i64,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSearchResponse {
    #[serde(default)]
    pub results: Vec<TextResult>,
}
