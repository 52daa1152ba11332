use crate::{
    download::DownloadHelper, media_element::MediaElementReference, requester::Requester,
    utils::url::Url, wasm_bindgen,
};

mod api;
mod core;
mod event_listeners;
mod progress;

pub(crate) use event_listeners::JsMemoryBlob;
use progress::ProgressTracker;

/// The `MediaChunkPlayer` is the interface exported to the JavaScript-side,
/// wrapping an audio element to play a remote resource either fully
/// downloaded, or incrementally as its bytes arrive, with optional
/// save-to-disk support for the received bytes.
#[wasm_bindgen]
pub struct MediaChunkPlayer {
    /// Where the player currently is in the lifecycle of a load.
    load_state: LoadState,

    /// HTTP method used for upcoming requests.
    method: String,

    /// Address of the resource to play.
    ///
    /// `None` until configured, in which case `play` fails.
    url: Option<Url>,

    /// Mime-type communicated both to the streaming buffer and when wrapping
    /// payloads into blobs.
    mime_type: String,

    /// Request body the current source was loaded with.
    ///
    /// `None` when nothing was loaded yet or after a failed load, so an
    /// identical `play` call re-fetches instead of replaying a stale source.
    body: Option<String>,

    /// Header name/value pairs stored at the last `play` call, reused by
    /// whichever fetch strategy is selected (including dedicated download
    /// fetches).
    headers: Vec<(String, String)>,

    /// When `true`, received bytes are retained so a downloadable artifact
    /// can be reconstructed and saved client-side.
    download_enabled: bool,

    /// Allows to perform actions related to the media element on the page,
    /// like attaching a MediaSource, buffering media, pausing or seeking.
    media_element_ref: MediaElementReference,

    /// Abstraction performing whole-body and streaming requests, while easily
    /// keeping track of those that are pending.
    requester: Requester,

    /// Bookkeeping for the optional save-to-disk support.
    download_helper: DownloadHelper,

    /// Bytes-received accounting for the current load, backing progress
    /// announcements.
    progress: ProgressTracker,
}

/// Identify the load-related state the `MediaChunkPlayer` is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadState {
    /// No load is in progress and no source is playable.
    Stopped,

    /// A whole-body request is in flight; playback starts once its complete
    /// payload is received.
    LoadingWholeBody,

    /// The incremental strategy was selected; we are waiting for the attached
    /// MediaSource to become usable.
    AwaitingMediaSource,

    /// The streaming request was issued; we are waiting for its response
    /// headers.
    AwaitingStreamResponse,

    /// Chunks are being received and appended.
    Streaming {
        /// `true` once the transport signaled completion. End-of-stream is
        /// only signaled to the buffer after the last append settled.
        reached_end: bool,
    },

    /// The current source was completely loaded.
    Loaded,
}

impl LoadState {
    /// Returns `true` when the current source can be replayed without a new
    /// fetch.
    fn has_playable_source(&self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Streaming { .. })
    }
}

/// Identify the JavaScript `readyState` of a created `MediaSource` instance.
#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaSourceReadyState {
    /// Corresponds to the "closed" JavaScript MediaSource's `readyState`
    Closed = 0,
    /// Corresponds to the "ended" JavaScript MediaSource's `readyState`
    Ended = 1,
    /// Corresponds to the "open" JavaScript MediaSource's `readyState`
    Open = 2,
}
