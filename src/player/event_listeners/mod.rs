use crate::bindings::{
    formatters::content_length_from_js, jsAnnounceProgress, jsFreeResource, PlaybackErrorCode,
    RequestId, ResourceId, SourceBufferId,
};
use crate::requester::FullBodyPurpose;
use crate::wasm_bindgen;
use crate::Logger;

use super::{MediaChunkPlayer, MediaSourceReadyState};

/// Methods of the `MediaChunkPlayer` called by the JavaScript-side when an
/// asynchronous browser operation settled: requests finishing, chunks being
/// received, MediaSource and SourceBuffer events and so on.
///
/// Events carrying a `RequestId` or `SourceBufferId` that is not tracked
/// anymore (e.g. because a new load superseded theirs) are ignored, after
/// freeing any resource they carried.
#[wasm_bindgen]
impl MediaChunkPlayer {
    /// Called by the JavaScript-side when a request started with `jsFetchFull`
    /// finished with success.
    ///
    /// `resource_id` points to the complete payload, now stored in
    /// JavaScript's memory.
    pub fn on_request_finished(
        &mut self,
        request_id: RequestId,
        resource_id: ResourceId,
        resource_size: u32,
    ) {
        let payload = JsMemoryBlob::from_resource_id(resource_id);
        match self.requester.on_full_body_finished(request_id) {
            Some(FullBodyPurpose::Playback) => {
                Logger::debug(&format!(
                    "Whole body received, id:{request_id}, size:{resource_size}"
                ));
                self.on_whole_body_payload(payload);
            }
            Some(FullBodyPurpose::Download) => self.on_download_payload(payload),
            // Superseded request, `payload` is dropped and freed here.
            None => Logger::info(&format!("Ignoring unknown request, id:{request_id}")),
        }
    }

    /// Called by the JavaScript-side while the response of a request started
    /// with `jsFetchFull` is being downloaded.
    ///
    /// `total` is `None` when the response did not announce its length.
    pub fn on_request_progress(&mut self, request_id: RequestId, loaded: f64, total: Option<f64>) {
        if self.requester.full_body_purpose(request_id) != Some(FullBodyPurpose::Playback) {
            return;
        }
        let total = content_length_from_js(total);
        jsAnnounceProgress(
            loaded,
            total.map(|t| t as f64).unwrap_or(0.),
            total.is_some(),
        );
    }

    /// Called by the JavaScript-side when a request started with `jsFetchFull`
    /// failed, with the HTTP status when a response was received.
    pub fn on_request_failed(&mut self, request_id: RequestId, status: Option<u32>) {
        match self.requester.on_full_body_failed(request_id) {
            Some(FullBodyPurpose::Playback) => {
                self.fail_load(PlaybackErrorCode::RequestFailed, status, "Request failed");
            }
            Some(FullBodyPurpose::Download) => self.fail_download(status, "Request failed"),
            None => Logger::info(&format!("Ignoring unknown request, id:{request_id}")),
        }
    }

    /// Called by the JavaScript-side when the response headers of a request
    /// started with `jsOpenStream` were resolved.
    ///
    /// `content_length` carries the value of the `Content-Length` header when
    /// one was present.
    pub fn on_stream_opened(&mut self, request_id: RequestId, content_length: Option<f64>) {
        if self.requester.on_stream_response(request_id) {
            self.on_playback_stream_opened(content_length_from_js(content_length));
        } else {
            Logger::info(&format!("Ignoring unknown stream, id:{request_id}"));
        }
    }

    /// Called by the JavaScript-side when a chunk asked through
    /// `jsReadNextChunk` was received.
    pub fn on_stream_chunk(
        &mut self,
        request_id: RequestId,
        resource_id: ResourceId,
        chunk_size: u32,
    ) {
        let chunk = JsMemoryBlob::from_resource_id(resource_id);
        if self.requester.on_chunk_received(request_id) {
            self.on_playback_chunk(chunk, chunk_size);
        } else {
            // Superseded stream, `chunk` is dropped and freed here.
            Logger::info(&format!("Ignoring unknown stream, id:{request_id}"));
        }
    }

    /// Called by the JavaScript-side when the transport of a request started
    /// with `jsOpenStream` signaled that no chunk is left.
    pub fn on_stream_ended(&mut self, request_id: RequestId) {
        if self.requester.on_stream_ended(request_id) {
            self.on_transport_ended();
        } else {
            Logger::info(&format!("Ignoring unknown stream, id:{request_id}"));
        }
    }

    /// Called by the JavaScript-side when a request started with
    /// `jsOpenStream` failed, with the HTTP status when a response was
    /// received.
    pub fn on_stream_failed(&mut self, request_id: RequestId, status: Option<u32>) {
        if self.requester.on_stream_failed(request_id) {
            self.fail_load(
                PlaybackErrorCode::RequestFailed,
                status,
                "Streaming request failed",
            );
        } else {
            Logger::info(&format!("Ignoring unknown stream, id:{request_id}"));
        }
    }

    /// Called by the JavaScript-side each time the attached MediaSource's
    /// `readyState` changed.
    pub fn on_media_source_state_change(&mut self, state: MediaSourceReadyState) {
        self.media_element_ref.update_media_source_ready_state(state);
        if state == MediaSourceReadyState::Open {
            self.on_media_source_opened();
        }
    }

    /// Called by the JavaScript-side once an append scheduled through
    /// `jsAppendBuffer` has been applied by the SourceBuffer.
    pub fn on_source_buffer_update(&mut self, source_buffer_id: SourceBufferId) {
        self.on_append_settled(source_buffer_id);
    }

    /// Called by the JavaScript-side when the SourceBuffer emitted an `error`
    /// event while applying an append.
    pub fn on_source_buffer_error(&mut self, source_buffer_id: SourceBufferId) {
        if self.media_element_ref.is_current_source_buffer(source_buffer_id) {
            self.fail_load(
                PlaybackErrorCode::SourceBufferError,
                None,
                "SourceBuffer errored while applying an append",
            );
        }
    }

    /// Called by the JavaScript-side when the media element's playback reached
    /// the end of the current source.
    pub fn on_playback_ended(&mut self) {
        Logger::debug("Playback reached the end of the current source");
    }
}

/// Special structure to handle data, in JavaScript's memory, identified by a
/// `ResourceId`.
///
/// Can be used to avoid the need of copying the resource's data into WASM's
/// memory, which can be expensive for media chunks.
///
/// The JavaScript resource is freed once this structure is dropped.
pub(crate) struct JsMemoryBlob {
    id: ResourceId,
}

impl JsMemoryBlob {
    /// Take ownership of the resource behind the given `ResourceId`.
    pub(crate) fn from_resource_id(id: ResourceId) -> Self {
        Self { id }
    }

    pub(crate) fn get_id(&self) -> ResourceId {
        self.id
    }
}

impl Drop for JsMemoryBlob {
    fn drop(&mut self) {
        jsFreeResource(self.id);
    }
}
