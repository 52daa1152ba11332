use crate::bindings::{
    jsAttachMediaSource, jsEndOfStream, jsPause, jsPlay, jsRemoveMediaSource, jsSeek,
    jsSetBlobSource, jsSetMediaElement, AddSourceBufferErrorCode, AttachMediaSourceErrorCode,
    EndOfStreamErrorCode, JsResult, ResourceId, SetBlobSourceErrorCode, SourceBufferId,
};
use crate::player::{JsMemoryBlob, MediaSourceReadyState};
use crate::Logger;

pub(crate) use source_buffer::PushChunkError;

mod source_buffer;

/// Structure linked to the media element on the page which allows to perform
/// media-related actions on it, such as:
///   - attaching a MediaSource and creating a SourceBuffer on it
///   - appending chunks to that SourceBuffer and closing the stream
///   - assigning a fully-downloaded payload as a blob source
///   - pausing, resuming and rewinding playback
pub(crate) struct MediaElementReference {
    /// Current state of the attached MediaSource.
    ///
    /// `None` if no MediaSource is attached for now.
    media_source_ready_state: Option<MediaSourceReadyState>,

    /// SourceBuffer currently created for the incremental strategy.
    /// `None` if none has been created.
    audio_buffer: Option<source_buffer::SourceBuffer>,

    /// Set to `true` once `jsEndOfStream` has been called for the current
    /// MediaSource, so end-of-stream is only ever signaled once per load.
    end_of_stream_signaled: bool,
}

impl MediaElementReference {
    /// Create a new `MediaElementReference`.
    ///
    /// This has no effect on playback. You may then call `attach_media_source`
    /// to begin an incremental load or `set_blob_source` for a whole-body one.
    pub(crate) fn new() -> Self {
        Self {
            media_source_ready_state: None,
            audio_buffer: None,
            end_of_stream_signaled: false,
        }
    }

    /// Dispose the current MediaSource if one and completely reset this
    /// `MediaElementReference` to its initial default state.
    ///
    /// Any object URL previously created for the media element is revoked by
    /// the JavaScript-side as part of this call.
    pub(crate) fn reset(&mut self) {
        jsRemoveMediaSource();
        self.media_source_ready_state = None;
        self.audio_buffer = None;
        self.end_of_stream_signaled = false;
    }

    /// Replace the media element linked on the JavaScript-side by the one with
    /// the given DOM id, or by a default detached audio element when `None`.
    ///
    /// Returns `false` when no element with that id was found, in which case
    /// the previous element stays in use.
    pub(crate) fn set_media_element(&mut self, element_id: Option<&str>) -> bool {
        jsSetMediaElement(element_id)
    }

    /// Attach a new `MediaSource` to the linked media element.
    ///
    /// This is a necessary step before creating a media buffer on it.
    pub(crate) fn attach_media_source(&mut self) -> Result<(), AttachMediaSourceError> {
        self.reset();
        jsAttachMediaSource()
            .result()
            .map_err(AttachMediaSourceError::from_js_error)
    }

    /// Returns the last communicated `readyState` of the attached
    /// `MediaSource`, or `None` when no `MediaSource` is currently attached.
    pub(crate) fn media_source_ready_state(&self) -> Option<MediaSourceReadyState> {
        self.media_source_ready_state
    }

    /// To call whenever the attached MediaSource's `readyState` changed.
    pub(crate) fn update_media_source_ready_state(&mut self, state: MediaSourceReadyState) {
        Logger::debug(&format!("MediaSource ready state changed: {state:?}"));
        self.media_source_ready_state = Some(state);
    }

    /// Create the `SourceBuffer` receiving media chunks, with the given
    /// mime-type.
    ///
    /// A `MediaSource` first needs to be attached and open (see
    /// `attach_media_source`).
    pub(crate) fn create_source_buffer(
        &mut self,
        mime_type: &str,
    ) -> Result<(), SourceBufferCreationError> {
        match self.media_source_ready_state {
            Some(MediaSourceReadyState::Closed) => {
                return Err(SourceBufferCreationError::MediaSourceIsClosed);
            }
            None => {
                return Err(SourceBufferCreationError::NoMediaSourceAttached {
                    message: "The MediaSource does not seem to be attached".to_string(),
                });
            }
            _ => {}
        }
        if self.audio_buffer.is_some() {
            return Err(SourceBufferCreationError::AlreadyCreated);
        }
        self.audio_buffer = Some(source_buffer::SourceBuffer::new(mime_type.to_owned())?);
        Ok(())
    }

    /// Schedule the append of a received chunk to the created SourceBuffer.
    ///
    /// The append settles asynchronously: `on_append_ended` will be called
    /// with the corresponding `SourceBufferId` once it has been applied.
    pub(crate) fn push_chunk(&mut self, chunk: JsMemoryBlob) -> Result<(), PushChunkError> {
        match self.audio_buffer.as_mut() {
            None => Err(PushChunkError::NoSourceBuffer),
            Some(sb) => sb.push_chunk(chunk),
        }
    }

    /// To call once a previously scheduled append has been applied by the
    /// underlying SourceBuffer.
    ///
    /// Returns the appended chunk, whose resource may now be retained for
    /// download reconstruction or dropped (and thus freed).
    pub(crate) fn on_append_ended(
        &mut self,
        source_buffer_id: SourceBufferId,
    ) -> Option<JsMemoryBlob> {
        match self.audio_buffer.as_mut() {
            Some(sb) if sb.id() == source_buffer_id => sb.on_operation_end(),
            _ => {
                Logger::info(&format!(
                    "Append end for an unknown SourceBuffer, id:{source_buffer_id}"
                ));
                None
            }
        }
    }

    /// Returns `true` if a chunk append has been scheduled but has not
    /// settled yet.
    pub(crate) fn has_pending_append(&self) -> bool {
        self.audio_buffer
            .as_ref()
            .map(|sb| sb.has_operations_pending())
            .unwrap_or(false)
    }

    /// Returns `true` if the given `SourceBufferId` refers to the currently
    /// created SourceBuffer.
    pub(crate) fn is_current_source_buffer(&self, source_buffer_id: SourceBufferId) -> bool {
        self.audio_buffer
            .as_ref()
            .map(|sb| sb.id() == source_buffer_id)
            .unwrap_or(false)
    }

    /// Empty the SourceBuffer's operation queue, freeing the resources of
    /// appends that will never settle. To call when an append failed.
    pub(crate) fn clear_buffer_queue(&mut self) {
        if let Some(sb) = self.audio_buffer.as_mut() {
            sb.clear_queue();
        }
    }

    /// Signal to the attached MediaSource that all chunks have been pushed.
    ///
    /// Only the first call per attached MediaSource has an effect: subsequent
    /// ones are no-ops returning `Ok`.
    pub(crate) fn end_of_stream(&mut self) -> Result<(), EndOfStreamError> {
        if self.end_of_stream_signaled {
            return Ok(());
        }
        jsEndOfStream()
            .result()
            .map_err(EndOfStreamError::from_js_error)?;
        self.end_of_stream_signaled = true;
        Ok(())
    }

    /// Assign the fully-downloaded payload behind `resource_id` as the media
    /// element's source, wrapped in a blob of the given mime-type.
    ///
    /// Any previously attached MediaSource is removed first, and any
    /// previously created object URL is revoked by the JavaScript-side.
    pub(crate) fn set_blob_source(
        &mut self,
        resource_id: ResourceId,
        mime_type: &str,
    ) -> Result<(), SetBlobSourceError> {
        self.reset();
        jsSetBlobSource(resource_id, mime_type)
            .result()
            .map_err(SetBlobSourceError::from_js_error)
    }

    /// Start or resume playback of the current source.
    pub(crate) fn play(&self) {
        jsPlay();
    }

    /// Pause playback of the current source.
    pub(crate) fn pause(&self) {
        jsPause();
    }

    /// Rewind the current source to its beginning and play it again.
    pub(crate) fn restart(&self) {
        jsPause();
        jsSeek(0.);
        jsPlay();
    }
}

use thiserror::Error;

/// Error returned when attaching a MediaSource to the media element failed.
#[derive(Error, Debug)]
pub(crate) enum AttachMediaSourceError {
    #[error("Error when attaching MediaSource: no media element is linked.")]
    NoMediaElement,
    #[error("Uncategorized Error when attaching MediaSource: {message}")]
    UnknownError { message: String },
}

impl AttachMediaSourceError {
    fn from_js_error(err: (AttachMediaSourceErrorCode, Option<String>)) -> Self {
        match err.0 {
            AttachMediaSourceErrorCode::NoMediaElement => AttachMediaSourceError::NoMediaElement,
            AttachMediaSourceErrorCode::UnknownError => AttachMediaSourceError::UnknownError {
                message: err.1.unwrap_or_else(|| "Unknown error.".to_owned()),
            },
        }
    }
}

/// Error returned when the creation of a MSE SourceBuffer failed.
#[derive(Error, Debug)]
pub(crate) enum SourceBufferCreationError {
    #[error("SourceBuffer initialization impossible: {message}")]
    NoMediaSourceAttached { message: String },
    #[error("Could not create SourceBuffer because the MediaSource instance was closed.")]
    MediaSourceIsClosed,
    #[error("QuotaExceededError received when trying to create SourceBuffer: {message}")]
    QuotaExceededError { message: String },
    #[error("Could not create SourceBuffer due to unsupported `{mime_type}` mime-type: {message}")]
    CantPlayType { mime_type: String, message: String },
    #[error("Could not create SourceBuffer because no mime-type was defined.")]
    EmptyMimeType,
    #[error("A SourceBuffer was already created for this load.")]
    AlreadyCreated,
    #[error("Uncategorized Error when creating SourceBuffer: {message}")]
    UnknownError { message: String },
}

impl SourceBufferCreationError {
    /// Translate an `AddSourceBufferErrorCode` and its optional accompanying
    /// message, as returned by the `jsAddSourceBuffer` JavaScript function,
    /// into the corresponding `SourceBufferCreationError`.
    fn from_js_add_source_buffer_error(
        err: (AddSourceBufferErrorCode, Option<String>),
        mime_type: &str,
    ) -> Self {
        match err.0 {
            AddSourceBufferErrorCode::NoMediaSourceAttached => {
                SourceBufferCreationError::NoMediaSourceAttached {
                    message: err
                        .1
                        .unwrap_or_else(|| "MediaSource instance not found.".to_owned()),
                }
            }
            AddSourceBufferErrorCode::MediaSourceIsClosed => {
                SourceBufferCreationError::MediaSourceIsClosed
            }
            AddSourceBufferErrorCode::QuotaExceededError => {
                SourceBufferCreationError::QuotaExceededError {
                    message: err
                        .1
                        .unwrap_or_else(|| "Unknown QuotaExceededError error".to_owned()),
                }
            }
            AddSourceBufferErrorCode::TypeNotSupportedError => {
                SourceBufferCreationError::CantPlayType {
                    mime_type: mime_type.to_string(),
                    message: err
                        .1
                        .unwrap_or_else(|| "Unknown NotSupportedError error".to_owned()),
                }
            }
            AddSourceBufferErrorCode::EmptyMimeType => SourceBufferCreationError::EmptyMimeType,
            AddSourceBufferErrorCode::UnknownError => SourceBufferCreationError::UnknownError {
                message: err.1.unwrap_or_else(|| "Unknown error.".to_owned()),
            },
        }
    }
}

/// Error returned when signaling end-of-stream failed.
#[derive(Error, Debug)]
pub(crate) enum EndOfStreamError {
    #[error("Could not signal end of stream: no MediaSource is attached.")]
    NoMediaSourceAttached,
    #[error("Uncategorized Error when signaling end of stream: {message}")]
    UnknownError { message: String },
}

impl EndOfStreamError {
    fn from_js_error(err: (EndOfStreamErrorCode, Option<String>)) -> Self {
        match err.0 {
            EndOfStreamErrorCode::NoMediaSourceAttached => EndOfStreamError::NoMediaSourceAttached,
            EndOfStreamErrorCode::UnknownError => EndOfStreamError::UnknownError {
                message: err.1.unwrap_or_else(|| "Unknown error.".to_owned()),
            },
        }
    }
}

/// Error returned when assigning a blob source to the media element failed.
#[derive(Error, Debug)]
pub(crate) enum SetBlobSourceError {
    #[error("Could not assign blob source: no media element is linked.")]
    NoMediaElement,
    #[error("Could not assign blob source: the payload resource did not exist.")]
    NoResource,
    #[error("Uncategorized Error when assigning blob source: {message}")]
    UnknownError { message: String },
}

impl SetBlobSourceError {
    fn from_js_error(err: (SetBlobSourceErrorCode, Option<String>)) -> Self {
        match err.0 {
            SetBlobSourceErrorCode::NoMediaElement => SetBlobSourceError::NoMediaElement,
            SetBlobSourceErrorCode::NoResource => SetBlobSourceError::NoResource,
            SetBlobSourceErrorCode::UnknownError => SetBlobSourceError::UnknownError {
                message: err.1.unwrap_or_else(|| "Unknown error.".to_owned()),
            },
        }
    }
}
