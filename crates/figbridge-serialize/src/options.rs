use serde::{Deserialize, Serialize};

/// Options for one serialization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializeOptions {
    /// Raster scale of the root screenshot.
    pub context_scale: f64,
    /// Raster scale of image-filled nodes.
    pub asset_scale: f64,
    /// Export and upload a screenshot of the root node.
    pub include_context_image: bool,
    /// Export and upload nodes carrying image fills.
    pub export_image_fills: bool,
    /// Deepest level the walk descends to before failing.
    pub max_depth: u32,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            context_scale: 2.0,
            asset_scale: 2.0,
            include_context_image: true,
            export_image_fills: true,
            max_depth: 512,
        }
    }
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both raster scales.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.context_scale = scale;
        self.asset_scale = scale;
        self
    }

    pub fn with_context_image(mut self, enabled: bool) -> Self {
        self.include_context_image = enabled;
        self
    }

    pub fn with_image_fills(mut self, enabled: bool) -> Self {
        self.export_image_fills = enabled;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
