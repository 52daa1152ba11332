use crate::bindings::{formatters::parse_header_pairs, LogLevel};
use crate::download::DownloadHelper;
use crate::media_element::MediaElementReference;
use crate::requester::{FullBodyPurpose, Requester};
use crate::utils::url::Url;
use crate::wasm_bindgen;
use crate::Logger;

use super::core::body_changed;
use super::progress::ProgressTracker;
use super::{LoadState, MediaChunkPlayer};

/// Methods of the `MediaChunkPlayer` exposed to the application.
#[wasm_bindgen]
impl MediaChunkPlayer {
    /// Create a new `MediaChunkPlayer`, not yet linked to a media element on
    /// the page.
    ///
    /// Arguments left to `None` take their default: a `GET` method, no URL
    /// (in which case `play` fails until one is set) and an `audio/mpeg`
    /// mime-type.
    #[wasm_bindgen(constructor)]
    pub fn new(method: Option<String>, url: Option<String>, mime_type: Option<String>) -> Self {
        Self {
            load_state: LoadState::Stopped,
            method: method.unwrap_or_else(|| "GET".to_owned()),
            url: url.map(Url::new),
            mime_type: mime_type.unwrap_or_else(|| "audio/mpeg".to_owned()),
            body: None,
            headers: vec![],
            download_enabled: false,
            media_element_ref: MediaElementReference::new(),
            requester: Requester::new(),
            download_helper: DownloadHelper::new(),
            progress: ProgressTracker::new(),
        }
    }

    /// Update the HTTP method used by upcoming requests.
    pub fn set_method(&mut self, method: String) {
        self.method = method;
    }

    /// Update the address of the resource to play.
    ///
    /// Only applies to upcoming loads: a load already in progress keeps
    /// fetching the previous URL.
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url.map(Url::new);
    }

    /// Update the mime-type communicated to the streaming buffer and used when
    /// wrapping payloads into blobs.
    pub fn set_mime_type(&mut self, mime_type: String) {
        self.mime_type = mime_type;
    }

    /// Link the media element with the given DOM id to this
    /// `MediaChunkPlayer`, or a default detached audio element when `None`.
    ///
    /// Returns `false` when no element with that id was found, in which case
    /// the previously linked element stays in use.
    pub fn set_media_element(&mut self, element_id: Option<String>) -> bool {
        self.media_element_ref
            .set_media_element(element_id.as_deref())
    }

    /// Retain received bytes from now on, so `download` can save them.
    pub fn enable_download(&mut self) {
        self.download_enabled = true;
    }

    /// Stop retaining received bytes. Already retained ones are released at
    /// the next load.
    pub fn disable_download(&mut self) {
        self.download_enabled = false;
    }

    /// Flip download support, returning its new state.
    pub fn toggle_download(&mut self) -> bool {
        self.download_enabled = !self.download_enabled;
        self.download_enabled
    }

    /// Update the minimum level a log has to be to be actually logged.
    pub fn set_log_level(&mut self, level: LogLevel) {
        Logger::set_logger_level(level.into());
    }

    /// Play the configured URL with the given request body and headers.
    ///
    /// When the body differs from the one the current source was loaded with
    /// (or when nothing is loaded, or the previous load failed), a fresh load
    /// begins. With an identical body and a playable source, that source is
    /// simply replayed from its beginning, without a new fetch.
    ///
    /// `headers` is a flattened list of header name/value pairs.
    pub fn play(&mut self, body: Option<String>, headers: Option<Vec<String>>) {
        let body = body.unwrap_or_default();
        self.headers = parse_header_pairs(headers.unwrap_or_default());
        if body_changed(self.body.as_deref(), &body) {
            self.body = Some(body);
            self.load_file();
        } else if self.load_state.has_playable_source() {
            self.restart_playback();
        } else {
            Logger::debug("Identical body while a load is in progress, ignoring");
        }
    }

    /// Pause playback of the current source.
    pub fn pause(&self) {
        self.media_element_ref.pause();
    }

    /// Resume playback of the current source.
    pub fn resume(&self) {
        self.media_element_ref.play();
    }

    /// Save the received bytes to disk under the given filename, or under a
    /// name derived from the URL when `None`.
    ///
    /// Does nothing when download support is disabled. When no bytes were
    /// retained yet, a dedicated whole-body fetch is issued first and the save
    /// happens once its payload is received.
    pub fn download(&mut self, filename: Option<String>) {
        if !self.download_enabled {
            Logger::warn("Download support is disabled, ignoring save action");
            return;
        }
        let filename = filename.unwrap_or_else(|| {
            self.url
                .as_ref()
                .map(|u| u.default_save_filename())
                .unwrap_or_else(|| "audio".to_owned())
        });
        if let Some(resource_id) = self.download_helper.blob_for_save(&self.mime_type) {
            self.download_helper.save(resource_id, &filename);
            return;
        }
        let url = match self.url.clone() {
            Some(url) => url,
            None => {
                Logger::warn("No URL was configured, ignoring save action");
                return;
            }
        };
        Logger::info("No retained bytes, fetching the resource for the save action");
        self.download_helper.set_pending_save(filename);
        self.requester.fetch_full_body(
            &url,
            &self.method,
            &self.headers,
            self.body.as_deref(),
            FullBodyPurpose::Download,
        );
    }

    /// Stop the current load, if one, and release every resource linked to
    /// it: pending requests stop being tracked, the MediaSource is removed
    /// and retained bytes are freed.
    pub fn stop(&mut self) {
        self.internal_stop();
    }
}
