//! Error types for figbridge.

use thiserror::Error;

/// Top-level error type for figbridge.
#[derive(Debug, Error)]
pub enum FigbridgeError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Errors reading from the scene graph.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Node {id} no longer exists in the document")]
    NodeRemoved { id: String },
}

/// Errors rendering a node to a raster image.
///
/// These are always recovered by the serializer; the node is emitted without
/// the image.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Node {id} has no renderable content")]
    NothingToRender { id: String },

    #[error("Export of node {id} failed: {reason}")]
    Failed { id: String, reason: String },

    #[error("Invalid raster data for node {id}: {reason}")]
    InvalidData { id: String, reason: String },
}

/// Errors from per-range text queries.
#[derive(Debug, Error)]
pub enum TextRangeError {
    #[error("Range {start}..{end} is outside text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Text range query failed: {reason}")]
    QueryFailed { reason: String },
}

/// Errors loading a scene document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },

    #[error("Style range {start}..{end} on node {id} is outside its text")]
    InvalidStyleRange { id: String, start: usize, end: usize },
}

/// Fatal errors of a serialization pass.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Maximum tree depth ({depth}) exceeded at node {id}")]
    MaxDepthExceeded { depth: u32, id: String },
}

/// Errors at the sandbox message bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid bridge message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bridge channel closed")]
    ChannelClosed,
}
