//! Upload coordinator.
//!
//! `request_upload` posts an [`UploadRequest`] and suspends until
//! [`UploadCoordinator::resolve`] delivers the matching response. There is no
//! timeout: a request the UI never answers stays pending.

use std::cell::RefCell;
use std::rc::Rc;

use figbridge_core::BridgeError;
use futures::channel::mpsc;
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, warn};

use crate::messages::{PluginMessage, UploadRequest, UploadResponse};
use crate::pending::PendingUploads;

/// Outbound half of the bridge.
pub trait MessageSink {
    fn post(&self, message: PluginMessage) -> crate::Result<()>;
}

impl<S: MessageSink + ?Sized> MessageSink for Rc<S> {
    fn post(&self, message: PluginMessage) -> crate::Result<()> {
        (**self).post(message)
    }
}

impl MessageSink for mpsc::UnboundedSender<PluginMessage> {
    fn post(&self, message: PluginMessage) -> crate::Result<()> {
        self.unbounded_send(message)
            .map_err(|_| BridgeError::ChannelClosed)
    }
}

/// Something that can store a base64 PNG and report the stored filename.
///
/// `None` means the upload failed; callers treat it as "no image".
pub trait AssetUploader {
    fn request_upload<'a>(&'a self, name: &'a str, data: String) -> LocalBoxFuture<'a, Option<String>>;
}

/// Correlates upload requests with responses arriving from the UI.
///
/// Clones share the same pending table, so one clone can be handed to the
/// serializer while another pumps responses.
#[derive(Debug)]
pub struct UploadCoordinator<S> {
    sink: S,
    pending: Rc<RefCell<PendingUploads>>,
}

impl<S: Clone> Clone for UploadCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<S: MessageSink> UploadCoordinator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pending: Rc::new(RefCell::new(PendingUploads::new())),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of requests still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Post an upload request and wait for its response.
    pub async fn request_upload(&self, name: &str, data: String) -> Option<String> {
        let (id, rx) = self.pending.borrow_mut().register();
        let request = PluginMessage::UploadRequest(UploadRequest {
            id: id.clone(),
            name: name.to_string(),
            data,
        });

        if let Err(err) = self.sink.post(request) {
            warn!(%id, name, error = %err, "failed to post upload request");
            self.pending.borrow_mut().cancel(&id);
            return None;
        }
        debug!(%id, name, "upload requested");

        // A dropped sender means the table went away; treat it as a failure.
        rx.await.ok().flatten()
    }

    /// Deliver a response from the UI. Returns `false` when no request with
    /// that id is pending.
    pub fn resolve(&self, response: UploadResponse) -> bool {
        let id = response.id.clone();
        if let Some(error) = &response.error {
            warn!(%id, %error, "upload failed");
        }
        let resolved = self
            .pending
            .borrow_mut()
            .complete(&id, response.into_filename());
        if !resolved {
            debug!(%id, "ignoring response for unknown upload");
        }
        resolved
    }
}

impl<S: MessageSink> AssetUploader for UploadCoordinator<S> {
    fn request_upload<'a>(&'a self, name: &'a str, data: String) -> LocalBoxFuture<'a, Option<String>> {
        UploadCoordinator::request_upload(self, name, data).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::poll;
    use pretty_assertions::assert_eq;
    use std::pin::pin;

    #[derive(Default)]
    struct RecordingSink {
        posted: RefCell<Vec<PluginMessage>>,
    }

    impl RecordingSink {
        fn request_ids(&self) -> Vec<String> {
            self.posted
                .borrow()
                .iter()
                .filter_map(|m| match m {
                    PluginMessage::UploadRequest(r) => Some(r.id.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl MessageSink for RecordingSink {
        fn post(&self, message: PluginMessage) -> Result<(), BridgeError> {
            self.posted.borrow_mut().push(message);
            Ok(())
        }
    }

    struct ClosedSink;

    impl MessageSink for ClosedSink {
        fn post(&self, _message: PluginMessage) -> Result<(), BridgeError> {
            Err(BridgeError::ChannelClosed)
        }
    }

    #[test]
    fn test_concurrent_requests_resolve_independently() {
        let coordinator = UploadCoordinator::new(Rc::new(RecordingSink::default()));

        block_on(async {
            let mut a = pin!(coordinator.request_upload("a.png", "AAAA".into()));
            let mut b = pin!(coordinator.request_upload("b.png", "BBBB".into()));
            assert!(poll!(a.as_mut()).is_pending());
            assert!(poll!(b.as_mut()).is_pending());

            let ids = coordinator.sink().request_ids();
            assert_eq!(ids.len(), 2);
            assert_eq!(coordinator.pending_count(), 2);

            assert!(coordinator.resolve(UploadResponse::stored(ids[1].as_str(), "stored-b.png")));
            assert_eq!(b.await, Some("stored-b.png".to_string()));
            assert!(poll!(a.as_mut()).is_pending());
            assert_eq!(coordinator.pending_count(), 1);

            // Second response for the same id is ignored.
            assert!(!coordinator.resolve(UploadResponse::stored(ids[1].as_str(), "again.png")));

            assert!(coordinator.resolve(UploadResponse::failed(ids[0].as_str(), "quota")));
            assert_eq!(a.await, None);
            assert_eq!(coordinator.pending_count(), 0);
        });
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let coordinator = UploadCoordinator::new(RecordingSink::default());
        assert!(!coordinator.resolve(UploadResponse::stored("upload-99", "x.png")));
    }

    #[test]
    fn test_post_failure_resolves_to_none() {
        let coordinator = UploadCoordinator::new(ClosedSink);
        let filename = block_on(coordinator.request_upload("a.png", "AAAA".into()));
        assert_eq!(filename, None);
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[test]
    fn test_channel_sink() {
        let (tx, mut rx) = mpsc::unbounded();
        let coordinator = UploadCoordinator::new(tx);
        let responder = coordinator.clone();

        let filename = block_on(async {
            let mut upload = pin!(AssetUploader::request_upload(&coordinator, "hero.png", "QUJD".into()));
            assert!(poll!(upload.as_mut()).is_pending());
            let request = match rx.try_recv() {
                Ok(PluginMessage::UploadRequest(r)) => r,
                other => panic!("expected upload request, got {other:?}"),
            };
            assert_eq!(request.name, "hero.png");
            responder.resolve(UploadResponse::stored(request.id, "hero-stored.png"));
            upload.await
        });
        assert_eq!(filename, Some("hero-stored.png".to_string()));
    }

    #[test]
    fn test_dropped_receiver_reports_channel_closed() {
        let (tx, rx) = mpsc::unbounded::<PluginMessage>();
        drop(rx);
        let result = tx.post(PluginMessage::Error { message: "late".into() });
        assert!(matches!(result, Err(BridgeError::ChannelClosed)));
    }

    #[test]
    fn test_cancelled_request_resolves_to_none() {
        let coordinator = UploadCoordinator::new(RecordingSink::default());
        let filename = block_on(async {
            let mut upload = pin!(coordinator.request_upload("a.png", "AAAA".into()));
            assert!(poll!(upload.as_mut()).is_pending());
            coordinator.pending.borrow_mut().cancel("upload-1");
            upload.await
        });
        assert_eq!(filename, None);
    }
}
