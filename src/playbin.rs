use gstreamer as gst;
use gst::prelude::*;
use gtk::gdk;
use gtk::prelude::*;
use tracing::{debug, info};

use crate::bus;
use crate::controller::MediaPipeline;
use crate::error::{Result, ViewerError};
use crate::state::{PlaybackState, StateChange};
use crate::tags::{MediaKind, StreamCounts, StreamSource, StreamTagSet, TagValue, ValueKind};

/// A `playbin` rendering its video into a GTK paintable.
pub struct Playbin {
    element: gst::Element,
    video_sink: gst::Element,
}

impl Playbin {
    pub fn new(uri: Option<&str>, av_offset: i64) -> Result<Self> {
        let element = make_element("playbin", Some("pipeline"))?;
        let video_sink = make_element("gtk4paintablesink", None)?;

        match uri {
            Some(uri) => element.set_property("uri", uri),
            None => debug!("No stream URI configured"),
        }
        element.set_property("av-offset", av_offset);
        element.set_property("video-sink", &video_sink);

        // These fire on streaming threads; only repost onto the bus.
        for signal in ["video-tags-changed", "audio-tags-changed"] {
            element.connect(signal, false, |values| {
                if let Some(Ok(pipeline)) = values.first().map(|v| v.get::<gst::Element>()) {
                    bus::post_tags_changed(&pipeline);
                }
                None
            });
        }

        info!("Created playbin (av-offset {} ns)", av_offset);
        Ok(Self {
            element,
            video_sink,
        })
    }

    pub fn element(&self) -> &gst::Element {
        &self.element
    }

    pub fn bus(&self) -> Option<gst::Bus> {
        self.element.bus()
    }
}

fn make_element(factory: &'static str, name: Option<&str>) -> Result<gst::Element> {
    let mut builder = gst::ElementFactory::make(factory);
    if let Some(name) = name {
        builder = builder.name(name);
    }
    builder
        .build()
        .map_err(|source| ViewerError::ElementCreation { factory, source })
}

impl MediaPipeline for Playbin {
    type RenderTarget = gtk::Picture;

    fn set_state(&self, target: PlaybackState) -> Result<StateChange> {
        self.element
            .set_state(target.into())
            .map(StateChange::from)
            .map_err(|_| ViewerError::StateChange { target })
    }

    fn bind_render_target(&self, picture: &gtk::Picture) -> Result<()> {
        let paintable = self.video_sink.property::<gdk::Paintable>("paintable");
        picture.set_paintable(Some(&paintable));
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.element
            .set_state(gst::State::Null)
            .map(|_| ())
            .map_err(|_| ViewerError::StateChange {
                target: PlaybackState::Null,
            })
    }
}

impl StreamSource for Playbin {
    fn stream_counts(&self) -> StreamCounts {
        let count = |property: &str| {
            u32::try_from(self.element.property::<i32>(property)).unwrap_or(0)
        };
        StreamCounts {
            video: count("n-video"),
            audio: count("n-audio"),
        }
    }

    fn stream_tags(&self, kind: MediaKind, index: u32) -> Option<StreamTagSet> {
        let signal = match kind {
            MediaKind::Video => "get-video-tags",
            MediaKind::Audio => "get-audio-tags",
        };
        let index = i32::try_from(index).ok()?;
        let tags = self
            .element
            .emit_by_name::<Option<gst::TagList>>(signal, &[&index])?;
        Some(tag_set(&tags, kind))
    }
}

/// Keeps only the fields the panel shows for `kind`.
fn tag_set(tags: &gst::TagListRef, kind: MediaKind) -> StreamTagSet {
    let mut set = StreamTagSet::new();
    for field in kind.fields() {
        let Some(value) = tags.generic(field.name) else {
            continue;
        };
        let value = match field.kind {
            ValueKind::Text => value.get::<String>().ok().map(TagValue::Text),
            ValueKind::Unsigned => value.get::<u32>().ok().map(TagValue::Unsigned),
        };
        if let Some(value) = value {
            set.insert(field.name, value);
        }
    }
    set
}
