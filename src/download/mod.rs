use crate::bindings::{jsBuildBlob, jsSaveBlob, ResourceId};
use crate::player::JsMemoryBlob;
use crate::Logger;

/// Bookkeeping for the optional save-to-disk support.
///
/// When download support is enabled, chunks received by the incremental
/// strategy (or the payload of a whole-body load) are retained here so a
/// single downloadable blob can be reconstructed on demand. All retained
/// resources live in JavaScript's memory and are freed when dropped.
pub(crate) struct DownloadHelper {
    /// Chunks retained during an incremental load, in receipt order.
    retained_chunks: Vec<JsMemoryBlob>,

    /// Blob previously built from `retained_chunks`, kept so repeated save
    /// actions do not rebuild it.
    built_blob: Option<JsMemoryBlob>,

    /// Payload of a whole-body load (either the playback request's or a
    /// dedicated download fetch's).
    full_body: Option<JsMemoryBlob>,

    /// Filename of a save action awaiting the completion of a dedicated
    /// download fetch.
    pending_save_filename: Option<String>,
}

impl DownloadHelper {
    pub(crate) fn new() -> Self {
        Self {
            retained_chunks: vec![],
            built_blob: None,
            full_body: None,
            pending_save_filename: None,
        }
    }

    /// Release every retained resource and forget any awaited save action.
    ///
    /// To call whenever a new load begins, so bytes from a previous body are
    /// never mixed into a reconstructed artifact.
    pub(crate) fn clear(&mut self) {
        self.retained_chunks.clear();
        self.built_blob = None;
        self.full_body = None;
        self.pending_save_filename = None;
    }

    /// Retain a chunk received by the incremental strategy.
    pub(crate) fn retain_chunk(&mut self, chunk: JsMemoryBlob) {
        // A previously built blob no longer reflects the chunk sequence.
        self.built_blob = None;
        self.retained_chunks.push(chunk);
    }

    /// Retain the payload of a whole-body load.
    pub(crate) fn retain_full_body(&mut self, payload: JsMemoryBlob) {
        self.full_body = Some(payload);
    }

    /// Returns the resource to save, reconstructing a single blob from the
    /// retained chunks when needed.
    ///
    /// Preference order: a previously built blob, a blob built now from the
    /// retained chunks, the retained whole-body payload. `None` when nothing
    /// was retained.
    pub(crate) fn blob_for_save(&mut self, mime_type: &str) -> Option<ResourceId> {
        if let Some(blob) = self.built_blob.as_ref() {
            return Some(blob.get_id());
        }
        if !self.retained_chunks.is_empty() {
            let chunk_ids: Vec<ResourceId> =
                self.retained_chunks.iter().map(|c| c.get_id()).collect();
            Logger::debug(&format!(
                "Down: Building blob from {} retained chunk(s)",
                chunk_ids.len()
            ));
            let built = JsMemoryBlob::from_resource_id(jsBuildBlob(chunk_ids, mime_type));
            let id = built.get_id();
            self.built_blob = Some(built);
            return Some(id);
        }
        self.full_body.as_ref().map(|b| b.get_id())
    }

    /// Trigger the client-side save of the given resource.
    pub(crate) fn save(&self, resource_id: ResourceId, filename: &str) {
        Logger::info(&format!("Down: Saving blob as \"{filename}\""));
        if !jsSaveBlob(resource_id, filename) {
            Logger::warn("Down: Save action failed, resource not found");
        }
    }

    /// Record that a save action awaits the completion of a dedicated
    /// download fetch.
    pub(crate) fn set_pending_save(&mut self, filename: String) {
        self.pending_save_filename = Some(filename);
    }

    /// Take the filename of an awaited save action, if any.
    pub(crate) fn take_pending_save(&mut self) -> Option<String> {
        self.pending_save_filename.take()
    }
}
