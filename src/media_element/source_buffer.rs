use std::collections::VecDeque;

use crate::bindings::{
    jsAddSourceBuffer, jsAppendBuffer, AppendBufferErrorCode, JsResult, SourceBufferId,
};
use crate::player::JsMemoryBlob;
use crate::Logger;

use super::SourceBufferCreationError;

/// Abstraction over the Media Source Extension's `SourceBuffer` concept.
///
/// This is the interface allowing to push received media chunks to the
/// lower-level media buffer backing the media element.
pub(super) struct SourceBuffer {
    /// The `SourceBufferId` given on SourceBuffer creation, used to identify
    /// this `SourceBuffer` on the JavaScript-side.
    id: SourceBufferId,

    /// Chunks whose append has been scheduled through `jsAppendBuffer` but
    /// not yet settled through an `on_source_buffer_update` callback.
    ///
    /// From the most imminent to the least. Because the next chunk is only
    /// read once the previous append settled, this queue holds at most one
    /// element in practice.
    queue: VecDeque<JsMemoryBlob>,

    /// The Content-Type currently linked to the SourceBuffer
    typ: String,
}

impl SourceBuffer {
    /// Create a new `SourceBuffer` with the mime-type indicated by `typ`.
    pub(super) fn new(typ: String) -> Result<Self, SourceBufferCreationError> {
        Logger::info(&format!("Creating new SourceBuffer for \"{typ}\""));
        match jsAddSourceBuffer(&typ).result() {
            Ok(id) => Ok(Self {
                id,
                typ,
                queue: VecDeque::new(),
            }),
            Err(err) => Err(SourceBufferCreationError::from_js_add_source_buffer_error(
                err, &typ,
            )),
        }
    }

    /// Returns the `SourceBufferId` needed to refer to that SourceBuffer when
    /// interacting with JavaScript.
    pub(super) fn id(&self) -> SourceBufferId {
        self.id
    }

    /// Returns `true` if there is at least one append scheduled on that
    /// SourceBuffer which isn't finished yet.
    pub(super) fn has_operations_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Schedule the append of the given chunk to the underlying SourceBuffer.
    ///
    /// Ownership of the chunk stays here until the append settles, keeping the
    /// JavaScript-side resource alive for the whole operation.
    pub(super) fn push_chunk(&mut self, chunk: JsMemoryBlob) -> Result<(), PushChunkError> {
        let chunk_id = chunk.get_id();
        self.queue.push_back(chunk);
        Logger::lazy_debug(&|| format!("Buffer {} ({}): Pushing chunk", self.id, self.typ));
        match jsAppendBuffer(self.id, chunk_id).result() {
            Err(err) => {
                self.queue.pop_back();
                Err(PushChunkError::from_js_append_buffer_error(err))
            }
            Ok(()) => Ok(()),
        }
    }

    /// To call once an append scheduled through `push_chunk` has been applied
    /// by the underlying MSE SourceBuffer.
    ///
    /// Returns the corresponding chunk, whose resource may now be either
    /// retained for download reconstruction or freed.
    pub(super) fn on_operation_end(&mut self) -> Option<JsMemoryBlob> {
        self.queue.pop_front()
    }

    /// In the rare scenario where a scheduled append fails, the queued chunk
    /// will never settle. This method empties the SourceBuffer's queue in such
    /// situations, freeing the corresponding resources.
    pub(super) fn clear_queue(&mut self) {
        Logger::info(&format!("Buffer {} ({}): clearing queue.", self.id, self.typ));
        self.queue.clear();
    }
}

use thiserror::Error;

/// Error encountered synchronously after trying to push a chunk to a `SourceBuffer`.
#[derive(Error, Debug)]
pub(crate) enum PushChunkError {
    #[error("No SourceBuffer was found for the append.")]
    NoSourceBuffer,
    #[error("The chunk resource appended did not exist.")]
    NoResource,
    #[error("Uncategorized error when appending chunk: {0}")]
    UnknownError(String),
}

impl PushChunkError {
    /// Creates a new `PushChunkError` based on the original error as returned
    /// by the `jsAppendBuffer` binding.
    fn from_js_append_buffer_error(err: (AppendBufferErrorCode, Option<String>)) -> Self {
        match err.0 {
            AppendBufferErrorCode::NoSourceBuffer => PushChunkError::NoSourceBuffer,
            AppendBufferErrorCode::NoResource => PushChunkError::NoResource,
            AppendBufferErrorCode::UnknownError => {
                PushChunkError::UnknownError(err.1.unwrap_or_else(|| "Unknown error.".to_owned()))
            }
        }
    }
}
