//! Recursive tree serializer.
//!
//! The walk is single-threaded. Sibling subtrees are driven concurrently on
//! the same task and reassembled in source order, so export and upload round
//! trips of different children overlap without any locking. The asset map is
//! shared by every in-flight subtree through a `RefCell` that is never
//! borrowed across an await.

use std::cell::RefCell;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use figbridge_bridge::AssetUploader;
use figbridge_core::{
    AssetEntry, AssetMap, NodeMetadata, NodeType, Paint, Prop, SceneNode, SerializeError,
    SerializedNode,
};
use figbridge_extract::{
    analyze_visual_context, extract_layout, extract_style, extract_text, SemanticClassifier,
};
use futures::future::{try_join_all, FutureExt, LocalBoxFuture};
use tracing::{debug, debug_span, info, warn, Instrument};

use crate::export::{ExportSettings, RasterExporter};
use crate::options::SerializeOptions;

/// Where a node sits in the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    pub depth: u32,
    pub sibling_index: usize,
    pub total_siblings: usize,
}

impl NodePosition {
    /// The selection node itself.
    pub fn root() -> Self {
        Self {
            depth: 0,
            sibling_index: 0,
            total_siblings: 1,
        }
    }

    fn child(&self, index: usize, count: usize) -> Self {
        Self {
            depth: self.depth + 1,
            sibling_index: index,
            total_siblings: count,
        }
    }
}

impl Default for NodePosition {
    fn default() -> Self {
        Self::root()
    }
}

/// Serializes scene trees into the IR.
pub struct TreeSerializer<E, U> {
    exporter: E,
    uploader: U,
    classifier: SemanticClassifier,
    options: SerializeOptions,
}

impl<E, U: AssetUploader> TreeSerializer<E, U> {
    pub fn new(exporter: E, uploader: U) -> Self {
        Self {
            exporter,
            uploader,
            classifier: SemanticClassifier::new(),
            options: SerializeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_classifier(mut self, classifier: SemanticClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    /// Serialize `node` as the root of a selection.
    ///
    /// Uploaded assets are inserted into `assets`, keyed by node id.
    pub async fn serialize<N>(
        &self,
        node: &N,
        assets: &mut AssetMap,
    ) -> crate::Result<SerializedNode>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        self.serialize_at(node, assets, NodePosition::root()).await
    }

    /// Serialize `node` as if found at `position` in a larger walk.
    ///
    /// The context image is only taken at depth 0.
    #[tracing::instrument(skip_all, fields(root = node.id(), depth = position.depth))]
    pub async fn serialize_at<N>(
        &self,
        node: &N,
        assets: &mut AssetMap,
        position: NodePosition,
    ) -> crate::Result<SerializedNode>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        let shared = RefCell::new(std::mem::take(assets));
        let result = self.serialize_node(node, &shared, position).await;
        *assets = shared.into_inner();

        if let Ok(tree) = &result {
            info!(
                nodes = tree.node_count(),
                assets = assets.len(),
                "serialization complete"
            );
        }
        result
    }

    fn serialize_node<'a, N>(
        &'a self,
        node: &'a N,
        assets: &'a RefCell<AssetMap>,
        position: NodePosition,
    ) -> LocalBoxFuture<'a, crate::Result<SerializedNode>>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        let span = debug_span!("node", id = node.id(), depth = position.depth);
        async move {
            node.ensure_present()?;
            if position.depth > self.options.max_depth {
                return Err(SerializeError::MaxDepthExceeded {
                    depth: self.options.max_depth,
                    id: node.id().to_string(),
                });
            }

            let node_type = node.node_type();
            let mut serialized = SerializedNode {
                id: node.id().to_string(),
                name: node.name().to_string(),
                metadata: metadata(node, &node_type, position),
                semantic_hints: self.classifier.classify(node, position.depth),
                visual_context: analyze_visual_context(node),
                layout: extract_layout(node),
                style: extract_style(node),
                node_type,
                text: None,
                children: None,
                context_image_filename: None,
            };

            if position.depth == 0 && self.options.include_context_image {
                let name = format!("context_{}.png", escape_node_id(node.id()));
                serialized.context_image_filename = self
                    .export_and_upload(node, self.options.context_scale, &name)
                    .await;
            }

            if serialized.node_type == NodeType::Text {
                serialized.text = node.as_text().map(extract_text);
            }

            if self.options.export_image_fills && has_image_fill(node) {
                let name = format!(
                    "{}_{}.png",
                    sanitize_file_stem(node.name()),
                    escape_node_id(node.id())
                );
                if let Some(filename) = self
                    .export_and_upload(node, self.options.asset_scale, &name)
                    .await
                {
                    let entry = AssetEntry {
                        id: node.id().to_string(),
                        name: node.name().to_string(),
                        filename,
                    };
                    assets.borrow_mut().insert(entry.id.clone(), entry);
                }
            }

            if let Some(children) = node.children() {
                let count = children.len();
                let pending = children.iter().enumerate().map(|(index, child)| {
                    self.serialize_node(child, assets, position.child(index, count))
                });
                serialized.children = Some(try_join_all(pending).await?);
            }

            Ok(serialized)
        }
        .instrument(span)
        .boxed_local()
    }

    /// Export `node` and upload it under `name`. Failures are logged and
    /// reported as `None`.
    async fn export_and_upload<N>(&self, node: &N, scale: f64, name: &str) -> Option<String>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        let bytes = match self
            .exporter
            .export_png(node, ExportSettings::png(scale))
            .await
        {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(id = node.id(), error = %err, "raster export failed, continuing without image");
                return None;
            }
        };

        let filename = self.uploader.request_upload(name, BASE64.encode(bytes)).await;
        match &filename {
            Some(filename) => debug!(id = node.id(), %filename, "raster uploaded"),
            None => warn!(id = node.id(), name, "raster upload failed, continuing without image"),
        }
        filename
    }
}

fn metadata<N: SceneNode>(node: &N, node_type: &NodeType, position: NodePosition) -> NodeMetadata {
    let component = if node_type.is_component_like() {
        node.main_component()
    } else {
        None
    };
    NodeMetadata {
        is_component: node_type.is_component_like(),
        component_name: component.as_ref().map(|c| c.name.clone()),
        main_component_id: component.and_then(|c| c.id),
        depth: position.depth,
        sibling_index: position.sibling_index,
        total_siblings: position.total_siblings,
    }
}

fn has_image_fill<N: SceneNode>(node: &N) -> bool {
    matches!(node.fills(), Prop::Value(fills) if fills.iter().any(Paint::is_image))
}

/// Make `raw` safe to use in an upload filename.
///
/// ASCII alphanumerics, `-` and `_` are kept; everything else becomes `_`.
pub fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Encode a node id for an upload filename without merging distinct ids.
///
/// ASCII alphanumerics are kept and `:` becomes `_`. Every other byte is
/// written as `-` followed by two lowercase hex digits.
pub fn escape_node_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b if b.is_ascii_alphanumeric() => out.push(char::from(b)),
            b':' => out.push('_'),
            b => out.push_str(&format!("-{b:02x}")),
        }
    }
    out
}
