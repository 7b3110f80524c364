//! Sandbox-side message handling.

use figbridge_bridge::{
    MessageSink, PluginMessage, SelectionData, UiMessage, UploadCoordinator,
};
use figbridge_core::{AssetMap, SceneNode};
use tracing::{error, info};

use crate::export::RasterExporter;
use crate::options::SerializeOptions;
use crate::serializer::TreeSerializer;

/// Shown to the user when a conversion is requested with nothing selected.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select a node to convert";

/// Routes UI messages to the serializer and the upload coordinator.
///
/// A conversion suspends on upload round trips, so the host must keep
/// delivering `upload-response` messages while a `convert-selection` is being
/// handled.
pub struct PluginController<E, S> {
    serializer: TreeSerializer<E, UploadCoordinator<S>>,
}

impl<E, S: MessageSink> PluginController<E, S> {
    pub fn new(exporter: E, sink: S) -> Self {
        Self {
            serializer: TreeSerializer::new(exporter, UploadCoordinator::new(sink)),
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.serializer = self.serializer.with_options(options);
        self
    }

    pub fn coordinator(&self) -> &UploadCoordinator<S> {
        self.serializer.uploader()
    }

    fn post(&self, message: PluginMessage) -> figbridge_bridge::Result<()> {
        self.coordinator().sink().post(message)
    }

    /// Handle one message from the UI against the current selection.
    pub async fn handle_message<N>(
        &self,
        message: UiMessage,
        selection: &[N],
    ) -> figbridge_bridge::Result<()>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        match message {
            UiMessage::UploadResponse(response) => {
                self.coordinator().resolve(response);
                Ok(())
            }
            UiMessage::ConvertSelection(request) => {
                self.convert_selection(selection, request.save_to_file).await
            }
        }
    }

    /// Serialize the first selected node and post the result.
    pub async fn convert_selection<N>(
        &self,
        selection: &[N],
        save_to_file: bool,
    ) -> figbridge_bridge::Result<()>
    where
        N: SceneNode,
        E: RasterExporter<N>,
    {
        let Some(node) = selection.first() else {
            return self.post(PluginMessage::Error {
                message: EMPTY_SELECTION_MESSAGE.to_string(),
            });
        };

        info!(id = node.id(), name = node.name(), "converting selection");
        let mut assets = AssetMap::new();
        match self.serializer.serialize(node, &mut assets).await {
            Ok(data) => {
                let context_image = data.context_image_filename.clone();
                self.post(PluginMessage::SelectionData(SelectionData {
                    data,
                    assets,
                    context_image,
                    save_to_file,
                }))
            }
            Err(err) => {
                error!(id = node.id(), error = %err, "conversion failed");
                self.post(PluginMessage::Error {
                    message: err.to_string(),
                })
            }
        }
    }
}
