//! Message bridge between the sandboxed serializer and its host UI.
//!
//! The sandbox cannot reach the network or the filesystem. Every upload is
//! posted as a message and completed later when the UI answers with a
//! correlated response.

pub mod coordinator;
pub mod messages;
pub mod pending;

pub use coordinator::{AssetUploader, MessageSink, UploadCoordinator};
pub use messages::{
    decode, encode, ConvertSelection, PluginMessage, SelectionData, UiMessage, UploadRequest,
    UploadResponse,
};
pub use pending::PendingUploads;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, figbridge_core::BridgeError>;
