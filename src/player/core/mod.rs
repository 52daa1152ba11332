use crate::bindings::{
    jsAnnounceLoaded, jsAnnounceProgress, jsCanStreamMedia, jsSendPlaybackError, PlaybackErrorCode,
};
use crate::requester::FullBodyPurpose;
use crate::Logger;

use super::{JsMemoryBlob, LoadState, MediaChunkPlayer, MediaSourceReadyState};

/// Fetch/playback strategy chosen for a load.
///
/// The choice is a capability check evaluated once per load, with no retry
/// across strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LoadStrategy {
    /// Begin playback as chunks arrive, appended to a streaming media buffer.
    Incremental,

    /// Await the entire response, then play it from a blob source.
    WholeBody,
}

impl LoadStrategy {
    pub(super) fn select(can_stream: bool) -> Self {
        if can_stream {
            LoadStrategy::Incremental
        } else {
            LoadStrategy::WholeBody
        }
    }
}

/// Returns `true` when the given request body differs from the one the
/// current source was loaded with, meaning a fresh load is needed.
///
/// With no stored body (nothing loaded yet, or the previous load failed), any
/// body counts as different.
pub(super) fn body_changed(stored: Option<&str>, next: &str) -> bool {
    stored != Some(next)
}

impl MediaChunkPlayer {
    /// Begin a fresh load of the configured URL with the stored body and
    /// headers, discarding everything related to the previous one.
    pub(super) fn load_file(&mut self) {
        self.progress.reset();
        self.download_helper.clear();
        self.requester.reset();
        let url = match self.url.clone() {
            Some(url) => url,
            None => {
                self.fail_load(PlaybackErrorCode::Unknown, None, "No URL was configured");
                return;
            }
        };
        match LoadStrategy::select(jsCanStreamMedia()) {
            LoadStrategy::Incremental => {
                Logger::info("Starting incremental load");
                self.load_state = LoadState::AwaitingMediaSource;
                if let Err(err) = self.media_element_ref.attach_media_source() {
                    self.fail_load(
                        PlaybackErrorCode::MediaSourceAttachmentError,
                        None,
                        &err.to_string(),
                    );
                }
            }
            LoadStrategy::WholeBody => {
                Logger::info("Starting whole-body load");
                self.load_state = LoadState::LoadingWholeBody;
                self.requester.fetch_full_body(
                    &url,
                    &self.method,
                    &self.headers,
                    self.body.as_deref(),
                    FullBodyPurpose::Playback,
                );
            }
        }
    }

    /// The attached MediaSource became usable: create the mime-typed
    /// SourceBuffer and open the streaming request.
    pub(super) fn on_media_source_opened(&mut self) {
        if self.load_state != LoadState::AwaitingMediaSource {
            return;
        }
        if let Err(err) = self.media_element_ref.create_source_buffer(&self.mime_type) {
            self.fail_load(
                PlaybackErrorCode::SourceBufferCreationError,
                None,
                &err.to_string(),
            );
            return;
        }
        // Checked before attaching the MediaSource
        let url = match self.url.clone() {
            Some(url) => url,
            None => return,
        };
        self.load_state = LoadState::AwaitingStreamResponse;
        self.requester
            .open_stream(&url, &self.method, &self.headers, self.body.as_deref());
    }

    /// The streaming response's headers were resolved: record the expected
    /// total when one was announced and pull the first chunk.
    pub(super) fn on_playback_stream_opened(&mut self, content_length: Option<u64>) {
        if self.load_state != LoadState::AwaitingStreamResponse {
            return;
        }
        self.progress.set_total(content_length);
        self.load_state = LoadState::Streaming { reached_end: false };
        self.requester.read_next_chunk();
    }

    /// A chunk of the streaming response was received: account for it,
    /// announce progress, and schedule its append.
    ///
    /// The next chunk is only pulled once this append settled (see
    /// `on_append_settled`), keeping appends strictly in receipt order.
    ///
    /// Playback is started with the first chunk of the load, so it can begin
    /// while the rest of the resource is still being received.
    pub(super) fn on_playback_chunk(&mut self, chunk: JsMemoryBlob, chunk_size: u32) {
        if !matches!(self.load_state, LoadState::Streaming { .. }) {
            return;
        }
        let first_chunk = !self.progress.has_received_bytes();
        let snapshot = self.progress.record(u64::from(chunk_size));
        jsAnnounceProgress(
            snapshot.loaded_for_js(),
            snapshot.total_for_js(),
            snapshot.length_computable(),
        );
        if let Err(err) = self.media_element_ref.push_chunk(chunk) {
            self.fail_load(PlaybackErrorCode::SourceBufferError, None, &err.to_string());
            return;
        }
        if first_chunk {
            self.media_element_ref.play();
        }
    }

    /// A previously scheduled append was applied by the SourceBuffer.
    ///
    /// The appended chunk is retained when download support is enabled, then
    /// either the next chunk is pulled or end-of-stream is signaled.
    pub(super) fn on_append_settled(&mut self, source_buffer_id: u32) {
        if !self.media_element_ref.is_current_source_buffer(source_buffer_id) {
            Logger::info(&format!(
                "Update for an unknown SourceBuffer, id:{source_buffer_id}"
            ));
            return;
        }
        if let Some(chunk) = self.media_element_ref.on_append_ended(source_buffer_id) {
            if self.download_enabled {
                self.download_helper.retain_chunk(chunk);
            }
        }
        match self.load_state {
            LoadState::Streaming { reached_end: true } => self.check_end_of_stream(),
            LoadState::Streaming { reached_end: false } => {
                if self.media_element_ref.media_source_ready_state()
                    == Some(MediaSourceReadyState::Open)
                {
                    self.requester.read_next_chunk();
                }
            }
            _ => {}
        }
    }

    /// The transport signaled the completion of the streaming response.
    pub(super) fn on_transport_ended(&mut self) {
        if matches!(self.load_state, LoadState::Streaming { .. }) {
            self.load_state = LoadState::Streaming { reached_end: true };
            self.check_end_of_stream();
        }
    }

    /// Signal end-of-stream and finish the load once the last append settled.
    fn check_end_of_stream(&mut self) {
        if self.media_element_ref.has_pending_append() {
            return;
        }
        match self.media_element_ref.end_of_stream() {
            Ok(()) => self.finish_load(),
            Err(err) => self.fail_load(PlaybackErrorCode::Unknown, None, &err.to_string()),
        }
    }

    /// The whole-body playback request's payload was received: assign it as
    /// the media element's source and finish the load.
    pub(super) fn on_whole_body_payload(&mut self, payload: JsMemoryBlob) {
        if self.load_state != LoadState::LoadingWholeBody {
            return;
        }
        if let Err(err) = self
            .media_element_ref
            .set_blob_source(payload.get_id(), &self.mime_type)
        {
            self.fail_load(PlaybackErrorCode::Unknown, None, &err.to_string());
            return;
        }
        if self.download_enabled {
            self.download_helper.retain_full_body(payload);
        }
        self.finish_load();
        self.media_element_ref.play();
    }

    /// The payload of a dedicated download fetch was received: retain it and
    /// perform the save action that was awaiting it, if any.
    pub(super) fn on_download_payload(&mut self, payload: JsMemoryBlob) {
        self.download_helper.retain_full_body(payload);
        if let Some(filename) = self.download_helper.take_pending_save() {
            if let Some(resource_id) = self.download_helper.blob_for_save(&self.mime_type) {
                self.download_helper.save(resource_id, &filename);
            }
        }
    }

    /// Mark the current load finished and announce it, exactly once per load.
    fn finish_load(&mut self) {
        Logger::info("Load finished");
        self.load_state = LoadState::Loaded;
        jsAnnounceLoaded();
    }

    /// Replay the current source from its beginning, without re-fetching.
    pub(super) fn restart_playback(&mut self) {
        Logger::info("Identical body, replaying current source");
        jsAnnounceLoaded();
        self.media_element_ref.restart();
    }

    /// Forward a playback failure to the application and clear the stored
    /// body, so a subsequent identical `play` call re-attempts the load.
    pub(super) fn fail_load(
        &mut self,
        code: PlaybackErrorCode,
        status: Option<u32>,
        message: &str,
    ) {
        Logger::error(&format!("Load failed: {message}"));
        self.body = None;
        self.load_state = LoadState::Stopped;
        self.media_element_ref.clear_buffer_queue();
        jsSendPlaybackError(code, status, Some(message));
    }

    /// Forward a dedicated download fetch failure to the application.
    ///
    /// The current playback source, if any, stays untouched.
    pub(super) fn fail_download(&mut self, status: Option<u32>, message: &str) {
        Logger::error(&format!("Download fetch failed: {message}"));
        self.body = None;
        self.download_helper.take_pending_save();
        jsSendPlaybackError(PlaybackErrorCode::RequestFailed, status, Some(message));
    }

    /// Discard the current load and every resource linked to it.
    pub(super) fn internal_stop(&mut self) {
        Logger::info("Stopping current content");
        self.requester.reset();
        self.media_element_ref.reset();
        self.download_helper.clear();
        self.progress.reset();
        self.body = None;
        self.load_state = LoadState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_strategy() {
        assert_eq!(LoadStrategy::select(true), LoadStrategy::Incremental);
        assert_eq!(LoadStrategy::select(false), LoadStrategy::WholeBody);
    }

    #[test]
    fn test_body_changed() {
        assert!(body_changed(None, ""));
        assert!(body_changed(None, "text=hello"));
        assert!(body_changed(Some("text=hello"), "text=bye"));
        assert!(body_changed(Some(""), "text=hello"));
        assert!(!body_changed(Some("text=hello"), "text=hello"));
        assert!(!body_changed(Some(""), ""));
    }
}
