//! Wire types for the text-generation backend.
//!
//! The backend speaks JSON over HTTP. Requests carry the prompt and
//! sampling settings; responses carry a list of candidate generations,
//! of which only the first is used.

use serde::{Deserialize, Serialize};

/// Alternate sampling settings, flattened into the request body when present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub top_p: f32,
    pub top_k: u32,
    pub rep_pen: f32,
}

/// One generation request, shaped for the backend's JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_length: u32,
    pub temperature: f32,
    pub stop_sequence: Vec<String>,
    /// Flattened into the body when present, absent otherwise.
    #[serde(flatten)]
    pub sampling: Option<SamplingParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
}

/// The backend's response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub results: Vec<GeneratedText>,
}

impl GenerationResponse {
    /// The first candidate's text, trimmed. `None` when the results list
    /// is empty or the first candidate is blank.
    pub fn first_text(&self) -> Option<&str> {
        let text = self.results.first()?.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
