//! Wire messages exchanged across the sandbox boundary.
//!
//! Every message is a JSON object tagged by `kind`:
//!
//! ```json
//! {"kind": "upload-request", "id": "upload-1", "name": "hero_1_2.png", "data": "iVBORw0..."}
//! {"kind": "upload-response", "id": "upload-1", "filename": "a81f.png"}
//! ```

use figbridge_core::{AssetMap, SerializedNode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Messages posted by the sandbox to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PluginMessage {
    UploadRequest(UploadRequest),
    SelectionData(SelectionData),
    Error { message: String },
}

/// Messages posted by the UI to the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UiMessage {
    ConvertSelection(ConvertSelection),
    UploadResponse(UploadResponse),
}

/// A base64 PNG to be stored by the UI side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub id: String,
    pub name: String,
    pub data: String,
}

/// Answer to an [`UploadRequest`] with the same `id`.
///
/// `filename` is set on success and `error` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn stored(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: Some(filename.into()),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: None,
            error: Some(error.into()),
        }
    }

    /// The stored filename, unless the UI reported an error.
    pub fn into_filename(self) -> Option<String> {
        match self.error {
            Some(_) => None,
            None => self.filename,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertSelection {
    #[serde(default)]
    pub save_to_file: bool,
}

/// Result of one conversion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionData {
    pub data: SerializedNode,
    pub assets: AssetMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_image: Option<String>,
    pub save_to_file: bool,
}

/// Encode a message as JSON.
pub fn encode<T: Serialize>(message: &T) -> crate::Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a JSON message.
pub fn decode<T: DeserializeOwned>(json: &str) -> crate::Result<T> {
    Ok(serde_json::from_str(json)?)
}
