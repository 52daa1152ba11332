use crate::bindings::{
    formatters::format_headers_for_js, jsFetchFull, jsOpenStream, jsReadNextChunk, RequestId,
};
use crate::utils::url::Url;
use crate::Logger;

/// The `Requester` is the module performing HTTP(s) requests.
///
/// It issues both whole-body and streaming requests through the JavaScript
/// bindings and keeps track of which `RequestId` belongs to which purpose, so
/// that asynchronous completion events can be routed (and events for
/// superseded loads ignored).
///
/// There is intentionally no retry, backoff nor abort mechanism: a failed
/// request is only re-attempted when the caller re-initiates a load, and a
/// superseded load's events are dropped by `RequestId` lookup failure.
pub(crate) struct Requester {
    /// In-flight whole-body requests, by chronological order (from the time
    /// the request was made).
    ///
    /// A playback request and a download request may be pending at the same
    /// time.
    pending_full_body: Vec<FullBodyRequestInfo>,

    /// The in-flight streaming request, if any.
    ///
    /// There is at most one: starting a new one supersedes the previous.
    pending_stream: Option<StreamRequestInfo>,
}

/// What a whole-body request was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FullBodyPurpose {
    /// The payload will become the media element's source.
    Playback,

    /// The payload will be saved to disk (dedicated download fetch).
    Download,
}

/// Metadata associated with a pending whole-body request.
struct FullBodyRequestInfo {
    /// ID identifying the request on the JavaScript-side.
    request_id: RequestId,

    /// What the payload will be used for once received.
    purpose: FullBodyPurpose,
}

/// Metadata associated with the pending streaming request.
struct StreamRequestInfo {
    /// ID identifying the request on the JavaScript-side.
    request_id: RequestId,

    /// `true` while a `jsReadNextChunk` call has not been answered yet.
    awaiting_chunk: bool,
}

impl StreamRequestInfo {
    fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            awaiting_chunk: false,
        }
    }

    /// Mark a chunk read as issued.
    ///
    /// Returns `false` when one is already awaited, in which case no second
    /// read may be issued: at most one chunk is in flight, so at most one
    /// append is ever queued.
    fn begin_chunk_read(&mut self) -> bool {
        if self.awaiting_chunk {
            false
        } else {
            self.awaiting_chunk = true;
            true
        }
    }

    /// To call once the awaited chunk arrived, allowing the next read.
    fn chunk_received(&mut self) {
        self.awaiting_chunk = false;
    }
}

impl Requester {
    pub(crate) fn new() -> Self {
        Self {
            pending_full_body: vec![],
            pending_stream: None,
        }
    }

    /// Forget every in-flight request.
    ///
    /// The underlying transfers are not aborted; their completion events will
    /// simply not be recognized anymore.
    pub(crate) fn reset(&mut self) {
        self.pending_full_body.clear();
        self.pending_stream = None;
    }

    /// Fetch the whole resource behind `url` and keep track of the request.
    ///
    /// `body` is only attached to methods carrying one (POST/PUT).
    /// Once it succeeds, the `on_request_finished` player method will be
    /// called with the returned `RequestId`.
    pub(crate) fn fetch_full_body(
        &mut self,
        url: &Url,
        method: &str,
        headers: &[(String, String)],
        body: Option<&str>,
        purpose: FullBodyPurpose,
    ) -> RequestId {
        let url_ref = url.get_ref();
        let request_id = jsFetchFull(
            url_ref,
            method,
            format_headers_for_js(headers),
            attached_body(method, body),
        );
        Logger::lazy_info(&|| format!("Req: Fetching whole body u:{url_ref}, id:{request_id}"));
        self.pending_full_body.push(FullBodyRequestInfo {
            request_id,
            purpose,
        });
        request_id
    }

    /// Open a streaming request for the resource behind `url`, superseding any
    /// previous one.
    ///
    /// Once the response's headers are resolved, the `on_stream_opened` player
    /// method will be called with the returned `RequestId`.
    pub(crate) fn open_stream(
        &mut self,
        url: &Url,
        method: &str,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> RequestId {
        let url_ref = url.get_ref();
        let request_id = jsOpenStream(
            url_ref,
            method,
            format_headers_for_js(headers),
            attached_body(method, body),
        );
        Logger::lazy_info(&|| format!("Req: Opening stream u:{url_ref}, id:{request_id}"));
        self.pending_stream = Some(StreamRequestInfo::new(request_id));
        request_id
    }

    /// Ask the JavaScript-side for the next chunk of the current streaming
    /// request.
    ///
    /// Does nothing when no stream is open or when a chunk read is already
    /// awaited, which keeps appends strictly serialized.
    pub(crate) fn read_next_chunk(&mut self) {
        if let Some(stream) = self.pending_stream.as_mut() {
            if stream.begin_chunk_read() {
                jsReadNextChunk(stream.request_id);
            }
        }
    }

    /// To call when the response headers of a streaming request were resolved.
    ///
    /// Returns `false` when the request is not the tracked one (e.g. it
    /// belongs to a superseded load) and its event should be ignored.
    pub(crate) fn on_stream_response(&mut self, request_id: RequestId) -> bool {
        self.is_current_stream(request_id)
    }

    /// To call when a chunk of the current streaming request was received.
    ///
    /// Returns `false` when the request is not the tracked one.
    pub(crate) fn on_chunk_received(&mut self, request_id: RequestId) -> bool {
        match self.pending_stream.as_mut() {
            Some(stream) if stream.request_id == request_id => {
                stream.chunk_received();
                true
            }
            _ => false,
        }
    }

    /// To call when the transport of the current streaming request signaled
    /// completion. The request stops being tracked.
    ///
    /// Returns `false` when the request is not the tracked one.
    pub(crate) fn on_stream_ended(&mut self, request_id: RequestId) -> bool {
        if self.is_current_stream(request_id) {
            self.pending_stream = None;
            true
        } else {
            false
        }
    }

    /// To call when the current streaming request failed. The request stops
    /// being tracked.
    ///
    /// Returns `false` when the request is not the tracked one.
    pub(crate) fn on_stream_failed(&mut self, request_id: RequestId) -> bool {
        if self.is_current_stream(request_id) {
            self.pending_stream = None;
            true
        } else {
            false
        }
    }

    /// To call when a whole-body request finished with success. The request
    /// stops being tracked.
    ///
    /// Returns the purpose it was issued for, or `None` when the request is
    /// unknown and its event should be ignored.
    pub(crate) fn on_full_body_finished(&mut self, request_id: RequestId) -> Option<FullBodyPurpose> {
        self.end_pending_full_body_request(request_id)
    }

    /// To call when a whole-body request failed. The request stops being
    /// tracked.
    ///
    /// Returns the purpose it was issued for, or `None` when the request is
    /// unknown.
    pub(crate) fn on_full_body_failed(&mut self, request_id: RequestId) -> Option<FullBodyPurpose> {
        self.end_pending_full_body_request(request_id)
    }

    /// Returns the purpose of the given pending whole-body request without
    /// ending it. Used to route progress events.
    pub(crate) fn full_body_purpose(&self, request_id: RequestId) -> Option<FullBodyPurpose> {
        self.pending_full_body
            .iter()
            .find(|r| r.request_id == request_id)
            .map(|r| r.purpose)
    }

    fn is_current_stream(&self, request_id: RequestId) -> bool {
        matches!(
            self.pending_stream.as_ref(),
            Some(stream) if stream.request_id == request_id
        )
    }

    fn end_pending_full_body_request(&mut self, request_id: RequestId) -> Option<FullBodyPurpose> {
        let pos = self
            .pending_full_body
            .iter()
            .position(|r| r.request_id == request_id)?;
        Some(self.pending_full_body.remove(pos).purpose)
    }
}

/// Returns the body to attach to a request, `None` for methods that do not
/// carry one.
fn attached_body<'a>(method: &str, body: Option<&'a str>) -> Option<&'a str> {
    if method_carries_body(method) {
        body
    } else {
        None
    }
}

/// Returns `true` for HTTP methods on which a request body is sent.
fn method_carries_body(method: &str) -> bool {
    method.eq_ignore_ascii_case("POST") || method.eq_ignore_ascii_case("PUT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_carries_body() {
        assert!(method_carries_body("POST"));
        assert!(method_carries_body("post"));
        assert!(method_carries_body("PUT"));
        assert!(method_carries_body("Put"));
        assert!(!method_carries_body("GET"));
        assert!(!method_carries_body("DELETE"));
        assert!(!method_carries_body(""));
    }

    #[test]
    fn test_attached_body() {
        assert_eq!(attached_body("POST", Some("text=hello")), Some("text=hello"));
        assert_eq!(attached_body("GET", Some("text=hello")), None);
        assert_eq!(attached_body("PUT", None), None);
    }

    #[test]
    fn test_chunk_read_gate() {
        let mut stream = StreamRequestInfo::new(1);
        assert!(stream.begin_chunk_read());
        assert!(
            !stream.begin_chunk_read(),
            "no second read may be issued before the previous chunk arrived"
        );
        stream.chunk_received();
        assert!(stream.begin_chunk_read());
        assert!(!stream.begin_chunk_read());
    }

    #[test]
    fn test_chunk_receipt_clears_gate_for_current_stream_only() {
        let mut requester = Requester::new();
        requester.pending_stream = Some(StreamRequestInfo {
            request_id: 7,
            awaiting_chunk: true,
        });
        assert!(!requester.on_chunk_received(8));
        assert!(
            requester.pending_stream.as_ref().map(|s| s.awaiting_chunk) == Some(true),
            "a chunk from another stream must not clear the gate"
        );
        assert!(requester.on_chunk_received(7));
        assert_eq!(
            requester.pending_stream.as_ref().map(|s| s.awaiting_chunk),
            Some(false)
        );
    }

    #[test]
    fn test_reset_while_awaiting_chunk() {
        let mut requester = Requester::new();
        requester.pending_stream = Some(StreamRequestInfo {
            request_id: 7,
            awaiting_chunk: true,
        });
        requester.reset();
        assert!(requester.pending_stream.is_none());
        // With no tracked stream, this must not reach the JavaScript-side.
        requester.read_next_chunk();
        assert!(requester.pending_stream.is_none());
    }
}
