use crate::wasm_bindgen;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Returns `true` if the host exposes both a streaming media buffer
    // (MediaSource) and a streaming body reader on its fetch implementation.
    //
    // This capability check decides, once per load, whether the incremental
    // strategy can be used. There is no retry across strategies: when `false`
    // is returned the whole-body strategy is used for the whole load.
    pub fn jsCanStreamMedia() -> bool;

    // Link the media element with the given DOM id to this `MediaChunkPlayer`.
    //
    // When `element_id` is `None`, a default detached audio element is created
    // and used instead.
    //
    // Returns `false` if no element with that id could be found, in which case
    // the previously linked element (or the default one) stays in use.
    pub fn jsSetMediaElement(element_id: Option<&str>) -> bool;

    // Fetch the whole resource behind `url` from the network and await the
    // complete response body as binary data.
    //
    // `headers` is a flattened list of header name/value pairs. `body` is only
    // attached by the caller for methods carrying one (POST/PUT).
    //
    // If and when it finishes with success, the payload is kept in
    // JavaScript's memory and communicated as a `ResourceId` through the
    // `on_request_finished` method of this `MediaChunkPlayer`.
    //
    // While the response is being downloaded, the JavaScript-side may call the
    // `on_request_progress` method with the number of bytes received so far
    // and, when known, the total expected.
    //
    // If and when it fails, the error is emitted through the
    // `on_request_failed` method, with the HTTP status when one was received.
    //
    // Both of those methods are always called asynchronously after the
    // `jsFetchFull` call.
    //
    // To avoid memory leaks, it is __VERY__ important to call the
    // `jsFreeResource` function with the communicated `ResourceId` once the
    // payload is not needed anymore.
    pub fn jsFetchFull(
        url: &str,
        method: &str,
        headers: Vec<String>,
        body: Option<&str>,
    ) -> RequestId;

    // Open a streaming request for the resource behind `url`.
    //
    // The JavaScript-side resolves the response's headers first and then calls
    // the `on_stream_opened` method of this `MediaChunkPlayer` with the value
    // of the `Content-Length` header if one was present. If the response has a
    // non-success status or the request fails before headers are received, the
    // `on_stream_failed` method is called instead.
    //
    // No chunk is read until `jsReadNextChunk` is called: the Rust-side pulls
    // chunks one at a time so that buffer appends stay serialized.
    pub fn jsOpenStream(
        url: &str,
        method: &str,
        headers: Vec<String>,
        body: Option<&str>,
    ) -> RequestId;

    // Read the next chunk from the streaming request started with
    // `jsOpenStream`.
    //
    // Exactly one of the following `MediaChunkPlayer` methods is then called
    // asynchronously:
    //
    //   - `on_stream_chunk` with a `ResourceId` for the received bytes, when a
    //     chunk was read.
    //
    //   - `on_stream_ended` when the transport signaled completion.
    //
    //   - `on_stream_failed` when reading failed.
    //
    // Returns `false` synchronously when no streaming request with that
    // `RequestId` is currently open.
    pub fn jsReadNextChunk(request_id: RequestId) -> bool;

    // Free a resource stored in JavaScript's memory kept alive for the current
    // `MediaChunkPlayer`.
    pub fn jsFreeResource(resource_id: ResourceId) -> bool;

    // Create a MediaSource, attach it to the media element associated with
    // this `MediaChunkPlayer` and assign its object URL as the element's
    // source, revoking any object URL previously created for that element.
    //
    // The MediaSource is not usable right away: this `MediaChunkPlayer` knows
    // it became usable when its `on_media_source_state_change` method is
    // called with the "Open" `MediaSourceReadyState`.
    pub fn jsAttachMediaSource() -> AttachMediaSourceResult;

    // Remove the MediaSource attached to the media element associated with
    // this `MediaChunkPlayer` if one, and free all its associated resources
    // (such as event listeners or created object URLs).
    //
    // This function performs all those operations synchronously.
    pub fn jsRemoveMediaSource() -> RemoveMediaSourceResult;

    // Add a SourceBuffer with the given mime-type to the attached MediaSource,
    // allowing to push binary chunks to a lower-level media buffer.
    //
    // This function performs this operation synchronously and may fail, see
    // `AddSourceBufferResult` for more details on the return value.
    pub fn jsAddSourceBuffer(mime_type: &str) -> AddSourceBufferResult;

    // Append the bytes behind `chunk_id` to the given SourceBuffer.
    //
    // This process is asynchronous: the `on_source_buffer_update` method of
    // this `MediaChunkPlayer` is called with the same `source_buffer_id` once
    // the append has been applied, and `on_source_buffer_error` if it failed.
    //
    // The Rust-side never schedules a second append before the previous one
    // settled, so the underlying buffer's operation queue holds at most one
    // element.
    pub fn jsAppendBuffer(source_buffer_id: SourceBufferId, chunk_id: ResourceId)
        -> AppendBufferResult;

    // Call the `MediaSource.prototype.endOfStream` API, allowing to signal
    // that all chunks have been pushed to the buffer.
    //
    // Note that you should make sure that the buffer has no append still
    // pending (no `jsAppendBuffer` call not yet validated through a
    // `on_source_buffer_update` callback) before making the `jsEndOfStream`
    // call.
    pub fn jsEndOfStream() -> EndOfStreamResult;

    // Wrap the resource behind `resource_id` in a mime-typed blob, create an
    // object URL for it and assign that URL as the source of the media element
    // associated with this `MediaChunkPlayer`.
    //
    // Any object URL previously created for that element is revoked first.
    pub fn jsSetBlobSource(resource_id: ResourceId, mime_type: &str) -> SetBlobSourceResult;

    // Concatenate the resources behind `chunk_ids`, in order, into a single
    // mime-typed blob kept in JavaScript's memory and return its `ResourceId`.
    //
    // The input resources are left untouched. As with any resource, the
    // returned one must eventually be freed through `jsFreeResource`.
    pub fn jsBuildBlob(chunk_ids: Vec<u32>, mime_type: &str) -> ResourceId;

    // Trigger a client-side save of the blob resource behind `resource_id`
    // under the given filename.
    //
    // The JavaScript-side synthesizes a transient invisible anchor element
    // with a `download` attribute pointing at the blob's object URL, clicks it
    // and removes it. On platforms without anchor-based downloads but with a
    // native "save blob" affordance (e.g. `msSaveOrOpenBlob`), that affordance
    // is used instead.
    //
    // Returns `false` when no resource with that id exists.
    pub fn jsSaveBlob(resource_id: ResourceId, filename: &str) -> bool;

    // Call the `play` method of the media element associated with this
    // `MediaChunkPlayer`.
    pub fn jsPlay();

    // Call the `pause` method of the media element associated with this
    // `MediaChunkPlayer`.
    pub fn jsPause();

    // Move the playhead of the associated media element to the given position,
    // in seconds.
    pub fn jsSeek(position: f64);

    // Announce to the application that the current load completed (or that a
    // replay of the current source was started).
    pub fn jsAnnounceLoaded();

    // Announce download progress to the application.
    //
    // `total` only carries a meaningful value when `length_computable` is
    // `true`; it is `0` otherwise.
    pub fn jsAnnounceProgress(loaded: f64, total: f64, length_computable: bool);

    // Communicate a playback failure to the application, with the HTTP status
    // when the failure was carried by a response.
    pub fn jsSendPlaybackError(code: PlaybackErrorCode, status: Option<u32>, message: Option<&str>);
}

/// Identify a resource allocated on the JavaScript side and kept alive until
/// `jsFreeResource` is called with it.
///
/// Special care of those id should be taken to avoid memory leaks: you should
/// always call `jsFreeResource` as soon as the resource is not needed anymore.
pub type ResourceId = u32;

/// Identify a pending request.
pub type RequestId = u32;

/// Identify a SourceBuffer.
pub type SourceBufferId = u32;

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// Category of a playback failure communicated to the application through the
/// `jsSendPlaybackError` function.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackErrorCode {
    /// A request (whole-body or streaming) failed, either with a non-success
    /// status or a network error.
    RequestFailed,

    /// The MediaSource could not be attached to the media element.
    MediaSourceAttachmentError,

    /// The SourceBuffer could not be created on the attached MediaSource.
    SourceBufferCreationError,

    /// A chunk could not be appended to the SourceBuffer, or the SourceBuffer
    /// errored while applying an append.
    SourceBufferError,

    /// An uncategorized error arised.
    Unknown,
}

/// Trait allowing to convert "JavaScript Results" as exposed by the JavaScript functions into
/// `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// Errors that can arise when attempting to attach a MediaSource to a media
/// element.
#[wasm_bindgen]
pub enum AttachMediaSourceErrorCode {
    /// No media element is currently linked to this `MediaChunkPlayer`.
    NoMediaElement,

    /// Could not attach MediaSource to the media element because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsAttachMediaSource` JavaScript function.
///
/// Creation of an `AttachMediaSourceResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct AttachMediaSourceResult {
    error: Option<(AttachMediaSourceErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl AttachMediaSourceResult {
    /// Creates an `AttachMediaSourceResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `AttachMediaSourceResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: AttachMediaSourceErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), AttachMediaSourceErrorCode> for AttachMediaSourceResult {
    /// Basically unwrap and consume the `AttachMediaSourceResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (AttachMediaSourceErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Errors that can arise when attempting to remove a MediaSource previously attached
/// to a media element.
#[wasm_bindgen]
pub enum RemoveMediaSourceErrorCode {
    /// Could not remove MediaSource from the media element because this `MediaChunkPlayer`
    /// had no MediaSource attached to its media element.
    NoMediaSourceAttached,

    /// Could not remove MediaSource from the media element because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsRemoveMediaSource` JavaScript function.
///
/// Creation of a `RemoveMediaSourceResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct RemoveMediaSourceResult {
    error: Option<(RemoveMediaSourceErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl RemoveMediaSourceResult {
    /// Creates a `RemoveMediaSourceResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates a `RemoveMediaSourceResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: RemoveMediaSourceErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), RemoveMediaSourceErrorCode> for RemoveMediaSourceResult {
    /// Basically unwrap and consume the `RemoveMediaSourceResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (RemoveMediaSourceErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Error that might arise when adding a SourceBuffer through a MediaSource instance.
#[wasm_bindgen]
pub enum AddSourceBufferErrorCode {
    /// The `MediaChunkPlayer` linked to it had no MediaSource attached to its media
    /// element.
    NoMediaSourceAttached,

    /// The `MediaSource` instance linked to this `MediaChunkPlayer` is in a "closed" state.
    MediaSourceIsClosed,

    /// A `QuotaExceededError` was received while trying to add the `SourceBuffer`.
    QuotaExceededError,

    /// The given mime-type is not supported
    TypeNotSupportedError,

    /// The given mime-type is empty
    EmptyMimeType,

    /// An unknown error happened.
    UnknownError,
}

/// Result of calling the `jsAddSourceBuffer` JavaScript function.
///
/// Creation of an `AddSourceBufferResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct AddSourceBufferResult {
    source_buffer_id: SourceBufferId,
    error: Option<(AddSourceBufferErrorCode, Option<String>)>,
}

/// `AddSourceBufferResult` methods exposed to JavaScript.
#[wasm_bindgen]
impl AddSourceBufferResult {
    /// Creates an `AddSourceBufferResult` indicating success, with the corresponding
    /// `SourceBufferId`.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success(val: SourceBufferId) -> Self {
        Self {
            source_buffer_id: val,
            error: None,
        }
    }

    /// Creates an `AddSourceBufferResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: AddSourceBufferErrorCode, desc: Option<String>) -> Self {
        Self {
            source_buffer_id: 0,
            error: Some((err, desc)),
        }
    }
}

impl JsResult<SourceBufferId, AddSourceBufferErrorCode> for AddSourceBufferResult {
    /// Basically unwrap and consume the `AddSourceBufferResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<SourceBufferId, (AddSourceBufferErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.source_buffer_id)
        }
    }
}

/// Errors that can arise when calling the `jsAppendBuffer` JavaScript function.
#[wasm_bindgen]
pub enum AppendBufferErrorCode {
    /// The operation failed because the resource to append was not found.
    NoResource,

    /// The operation failed because the SourceBuffer instance linked to the
    /// given `SourceBufferId` was not found.
    NoSourceBuffer,

    /// The operation failed because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsAppendBuffer` JavaScript function.
///
/// Creation of an `AppendBufferResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct AppendBufferResult {
    error: Option<(AppendBufferErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl AppendBufferResult {
    /// Creates an `AppendBufferResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `AppendBufferResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: AppendBufferErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), AppendBufferErrorCode> for AppendBufferResult {
    /// Basically unwrap and consume the `AppendBufferResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (AppendBufferErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Errors that can arise when calling the `jsEndOfStream` JavaScript function.
#[wasm_bindgen]
pub enum EndOfStreamErrorCode {
    /// The `MediaChunkPlayer` linked had no MediaSource attached to its media
    /// element.
    NoMediaSourceAttached,

    /// The operation failed because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsEndOfStream` JavaScript function.
///
/// Creation of an `EndOfStreamResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct EndOfStreamResult {
    error: Option<(EndOfStreamErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl EndOfStreamResult {
    /// Creates an `EndOfStreamResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `EndOfStreamResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: EndOfStreamErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), EndOfStreamErrorCode> for EndOfStreamResult {
    /// Basically unwrap and consume the `EndOfStreamResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (EndOfStreamErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Errors that can arise when calling the `jsSetBlobSource` JavaScript function.
#[wasm_bindgen]
pub enum SetBlobSourceErrorCode {
    /// No media element is currently linked to this `MediaChunkPlayer`.
    NoMediaElement,

    /// The operation failed because the resource to wrap was not found.
    NoResource,

    /// The operation failed because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsSetBlobSource` JavaScript function.
///
/// Creation of a `SetBlobSourceResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct SetBlobSourceResult {
    error: Option<(SetBlobSourceErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl SetBlobSourceResult {
    /// Creates a `SetBlobSourceResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates a `SetBlobSourceResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: SetBlobSourceErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), SetBlobSourceErrorCode> for SetBlobSourceResult {
    /// Basically unwrap and consume the `SetBlobSourceResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (SetBlobSourceErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}
