//! Per-stream tag sets and the metadata panel text built from them.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Header prefix used in the metadata panel.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "Video stream",
            MediaKind::Audio => "Audio stream",
        }
    }

    /// Tags shown for this kind of stream, in display order.
    pub fn fields(self) -> &'static [TagField] {
        match self {
            MediaKind::Video => VIDEO_FIELDS,
            MediaKind::Audio => AUDIO_FIELDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Unsigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagField {
    pub name: &'static str,
    pub kind: ValueKind,
}

const fn text(name: &'static str) -> TagField {
    TagField {
        name,
        kind: ValueKind::Text,
    }
}

const fn unsigned(name: &'static str) -> TagField {
    TagField {
        name,
        kind: ValueKind::Unsigned,
    }
}

pub const VIDEO_FIELDS: &[TagField] = &[
    text("video-codec"),
    unsigned("minimum-bitrate"),
    unsigned("maximum-bitrate"),
    unsigned("bitrate"),
];

pub const AUDIO_FIELDS: &[TagField] = &[
    text("audio-codec"),
    unsigned("nominal-bitrate"),
    unsigned("minimum-bitrate"),
    unsigned("maximum-bitrate"),
    unsigned("bitrate"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Unsigned(u32),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Unsigned(n) => write!(f, "{}", n),
        }
    }
}

/// Tags reported for one stream. An empty set still counts as "tags present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamTagSet {
    values: BTreeMap<String, TagValue>,
}

impl StreamTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: TagValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: TagValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCounts {
    pub video: u32,
    pub audio: u32,
}

/// Anything that can answer stream-count and per-stream tag queries.
pub trait StreamSource {
    fn stream_counts(&self) -> StreamCounts;
    fn stream_tags(&self, kind: MediaKind, index: u32) -> Option<StreamTagSet>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    lines: Vec<String>,
}

impl DisplayBuffer {
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Rebuilds the metadata panel contents from scratch on every pass.
#[derive(Debug, Default)]
pub struct TagAggregator {
    buffer: DisplayBuffer,
}

impl TagAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh<S: StreamSource + ?Sized>(&mut self, source: &S) -> &DisplayBuffer {
        self.buffer.clear();

        let counts = source.stream_counts();
        self.append_streams(source, MediaKind::Video, counts.video);
        self.append_streams(source, MediaKind::Audio, counts.audio);

        &self.buffer
    }

    fn append_streams<S>(&mut self, source: &S, kind: MediaKind, count: u32)
    where
        S: StreamSource + ?Sized,
    {
        for index in 0..count {
            let Some(tags) = source.stream_tags(kind, index) else {
                continue;
            };

            self.buffer.push(format!("{}{}", kind.label(), index));
            for field in kind.fields() {
                if let Some(value) = tags.get(field.name) {
                    self.buffer.push(format!("{}: {}", field.name, value));
                }
            }
        }
    }
}
