use bytes::{Bytes, BytesMut};
use uuid::Uuid;

/// Default clip length in seconds.
pub const DEFAULT_DURATION_SECONDS: u32 = 5;

/// A finalized recording: the concatenated encoder output plus its container type.
///
/// Cloning is cheap; the bytes are reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    bytes: Bytes,
    mime_type: String,
}

impl Clip {
    /// Join `chunks` in order into a single clip tagged with `mime_type`.
    ///
    /// Zero chunks yield a valid, empty clip.
    pub fn assemble(chunks: &[Bytes], mime_type: impl Into<String>) -> Self {
        let total = chunks.iter().map(Bytes::len).sum();
        let mut buf = BytesMut::with_capacity(total);
        for chunk in chunks {
            buf.extend_from_slice(chunk);
        }

        Self {
            bytes: buf.freeze(),
            mime_type: mime_type.into(),
        }
    }

    /// Raw clip bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Container MIME type, e.g. `video/webm`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no encoder output was captured.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One recording attempt, from start until it is discarded.
#[derive(Debug)]
pub struct ClipSession {
    id: Uuid,
    duration_seconds: u32,
    seconds_remaining: u32,
    chunks: Vec<Bytes>,
    final_clip: Option<Clip>,
}

impl ClipSession {
    /// Fresh session with an empty chunk list and a full countdown.
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            duration_seconds,
            seconds_remaining: duration_seconds,
            chunks: Vec::new(),
            final_clip: None,
        }
    }

    /// Session id used for log correlation and stale-event filtering.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configured target length.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Countdown value.
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Fragments received so far, in arrival order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// The assembled clip, once finalized.
    pub fn final_clip(&self) -> Option<&Clip> {
        self.final_clip.as_ref()
    }

    /// Append a fragment. Ignored once the clip is finalized.
    pub(crate) fn push_chunk(&mut self, data: Bytes) -> bool {
        if self.final_clip.is_some() {
            return false;
        }
        self.chunks.push(data);
        true
    }

    /// Count down one second and return what is left.
    pub(crate) fn tick(&mut self) -> u32 {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining
    }

    /// Assemble the clip. Only the first call has an effect.
    pub(crate) fn finalize(&mut self, mime_type: &str) -> Option<&Clip> {
        if self.final_clip.is_some() {
            return None;
        }
        self.final_clip = Some(Clip::assemble(&self.chunks, mime_type));
        self.final_clip.as_ref()
    }
}
