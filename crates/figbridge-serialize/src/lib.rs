//! Scene tree serialization for figbridge.
//!
//! [`TreeSerializer`] walks a scene graph and produces the
//! [`SerializedNode`](figbridge_core::SerializedNode) IR, exporting raster
//! content through a [`RasterExporter`] and uploading it through an
//! [`AssetUploader`](figbridge_bridge::AssetUploader).
//! [`PluginController`] wires the serializer to the sandbox message bridge.

pub mod export;
pub mod options;
pub mod plugin;
pub mod serializer;

pub use export::{DocumentExporter, ExportSettings, RasterExporter};
pub use options::SerializeOptions;
pub use plugin::{PluginController, EMPTY_SELECTION_MESSAGE};
pub use serializer::{escape_node_id, sanitize_file_stem, NodePosition, TreeSerializer};

/// Result type for serialization.
pub type Result<T> = std::result::Result<T, figbridge_core::SerializeError>;
