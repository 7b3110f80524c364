//! Raster export of scene nodes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use figbridge_core::{DocumentNode, ExportError, SceneNode};
use futures::future::{self, LocalBoxFuture};

/// Settings for one raster export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    /// Scale factor (1.0 = 1:1, 2.0 = 2x resolution).
    pub scale: f64,
}

impl ExportSettings {
    pub fn png(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Renders a node and its subtree to PNG bytes.
///
/// Host bindings implement this over the design tool's export call.
pub trait RasterExporter<N> {
    fn export_png<'a>(
        &'a self,
        node: &'a N,
        settings: ExportSettings,
    ) -> LocalBoxFuture<'a, Result<Vec<u8>, ExportError>>;
}

/// Serves the pre-rendered raster embedded in a scene document.
///
/// The embedded image is returned as-is; the requested scale is not applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl DocumentExporter {
    pub fn new() -> Self {
        Self
    }

    fn decode(node: &DocumentNode) -> Result<Vec<u8>, ExportError> {
        let raster = node
            .raster
            .as_deref()
            .ok_or_else(|| ExportError::NothingToRender {
                id: node.id().to_string(),
            })?;
        BASE64
            .decode(raster.trim())
            .map_err(|e| ExportError::InvalidData {
                id: node.id().to_string(),
                reason: e.to_string(),
            })
    }
}

impl RasterExporter<DocumentNode> for DocumentExporter {
    fn export_png<'a>(
        &'a self,
        node: &'a DocumentNode,
        _settings: ExportSettings,
    ) -> LocalBoxFuture<'a, Result<Vec<u8>, ExportError>> {
        Box::pin(future::ready(Self::decode(node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figbridge_core::NodeType;
    use futures::executor::block_on;

    #[test]
    fn test_decodes_embedded_raster() {
        let node = DocumentNode::new("1:2", "Hero", NodeType::Rectangle).with_raster("iVBORw0KGgo=");
        let bytes = block_on(DocumentExporter::new().export_png(&node, ExportSettings::png(2.0)))
            .unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_missing_raster() {
        let node = DocumentNode::new("1:2", "Hero", NodeType::Rectangle);
        let result = block_on(DocumentExporter::new().export_png(&node, ExportSettings::default()));
        assert!(matches!(result, Err(ExportError::NothingToRender { id }) if id == "1:2"));
    }

    #[test]
    fn test_invalid_raster() {
        let node = DocumentNode::new("1:2", "Hero", NodeType::Rectangle).with_raster("not base64!");
        let result = block_on(DocumentExporter::new().export_png(&node, ExportSettings::default()));
        assert!(matches!(result, Err(ExportError::InvalidData { .. })));
    }
}
