//! Relay from pipeline bus messages to the controller and the window.
//!
//! The bus watch runs on the main-loop thread, so every handler here may touch
//! UI state. Notifications raised on streaming threads are reposted onto the bus
//! as application messages and only acted on once they come back out here.

use gstreamer as gst;
use gst::prelude::*;
use tracing::{debug, error, info, trace};

use crate::controller::{MediaPipeline, PipelineController};
use crate::state::PlaybackState;
use crate::tags::{DisplayBuffer, TagAggregator};

/// Name of the application message posted when stream tags change.
pub const TAGS_CHANGED: &str = "tags-changed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    Error {
        source: String,
        message: String,
        debug: Option<String>,
    },
    EndOfStream,
    StateChanged {
        /// Whether the top-level pipeline sent it, as opposed to a child element.
        from_pipeline: bool,
        old: PlaybackState,
        new: PlaybackState,
    },
    Application(String),
}

impl BusMessage {
    /// Converts the message classes the viewer cares about; everything else is `None`.
    pub fn from_gst(msg: &gst::MessageRef, pipeline: &gst::Element) -> Option<Self> {
        use gst::MessageView;

        match msg.view() {
            MessageView::Error(err) => Some(BusMessage::Error {
                source: err
                    .src()
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string()),
                message: err.error().to_string(),
                debug: err.debug().map(|d| d.to_string()),
            }),
            MessageView::Eos(..) => Some(BusMessage::EndOfStream),
            MessageView::StateChanged(change) => Some(BusMessage::StateChanged {
                from_pipeline: change
                    .src()
                    .is_some_and(|src| src == pipeline.upcast_ref::<gst::Object>()),
                old: change.old().into(),
                new: change.current().into(),
            }),
            MessageView::Application(app) => app
                .structure()
                .map(|s| BusMessage::Application(s.name().to_string())),
            _ => None,
        }
    }
}

/// Posts the tags-changed notification on the pipeline's own bus.
///
/// Called from streaming threads; it must not do anything else.
pub fn post_tags_changed(pipeline: &gst::Element) {
    let msg = gst::message::Application::builder(gst::Structure::new_empty(TAGS_CHANGED))
        .src(pipeline)
        .build();
    if pipeline.post_message(msg).is_err() {
        debug!("Pipeline has no bus, dropping {}", TAGS_CHANGED);
    }
}

/// The window side of the relay.
pub trait Shell {
    /// Periodic UI refresh hook; also run once when the pipeline prerolls.
    fn refresh(&mut self, state: PlaybackState);

    fn state_changed(&mut self, state: PlaybackState);

    fn show_metadata(&mut self, buffer: &DisplayBuffer);
}

#[derive(Debug, Default)]
pub struct BusRelay {
    aggregator: TagAggregator,
}

impl BusRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle<P, S>(
        &mut self,
        message: BusMessage,
        controller: &mut PipelineController<P>,
        shell: &mut S,
    ) where
        P: MediaPipeline,
        S: Shell + ?Sized,
    {
        match message {
            BusMessage::Error {
                source,
                message,
                debug: detail,
            } => {
                error!("ERROR: {}: {}", source, message);
                if let Some(detail) = detail {
                    error!("Debug info: {}", detail);
                }
            }
            BusMessage::EndOfStream => {
                info!("End-Of-Stream reached");
                controller.request(PlaybackState::Ready);
            }
            BusMessage::StateChanged {
                from_pipeline: false,
                ..
            } => {}
            BusMessage::StateChanged { old, new, .. } => {
                controller.record_state(new);
                info!("State changed from {} to {}", old, new);
                shell.state_changed(new);

                if old == PlaybackState::Ready && new == PlaybackState::Paused {
                    shell.refresh(new);
                }
            }
            BusMessage::Application(name) if name == TAGS_CHANGED => {
                let buffer = self.aggregator.refresh(&*controller);
                shell.show_metadata(buffer);
            }
            BusMessage::Application(name) => {
                trace!("Ignoring application message {}", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline_with_child() -> (gst::Pipeline, gst::Element, gst::Bus) {
        gst::init().unwrap();
        let pipeline = gst::Pipeline::new();
        let child = gst::ElementFactory::make("identity")
            .name("child")
            .build()
            .unwrap();
        pipeline.add(&child).unwrap();
        let bus = pipeline.bus().unwrap();
        (pipeline, child, bus)
    }

    fn next(bus: &gst::Bus, pipeline: &gst::Pipeline) -> Option<BusMessage> {
        let msg = bus.pop().expect("bus should hold a message");
        BusMessage::from_gst(&msg, pipeline.upcast_ref())
    }

    #[test]
    fn state_changes_are_tagged_with_their_origin() {
        let (pipeline, child, bus) = pipeline_with_child();

        let ready_to_paused = |src: &gst::Object| {
            gst::message::StateChanged::builder(
                gst::State::Ready,
                gst::State::Paused,
                gst::State::VoidPending,
            )
            .src(src)
            .build()
        };
        let from_child = ready_to_paused(child.upcast_ref());
        let from_pipeline = ready_to_paused(pipeline.upcast_ref());
        bus.post(from_child).unwrap();
        bus.post(from_pipeline).unwrap();

        assert_eq!(
            next(&bus, &pipeline),
            Some(BusMessage::StateChanged {
                from_pipeline: false,
                old: PlaybackState::Ready,
                new: PlaybackState::Paused,
            })
        );
        assert_eq!(
            next(&bus, &pipeline),
            Some(BusMessage::StateChanged {
                from_pipeline: true,
                old: PlaybackState::Ready,
                new: PlaybackState::Paused,
            })
        );
    }

    #[test]
    fn tags_changed_is_reposted_as_application_message() {
        let (pipeline, _child, bus) = pipeline_with_child();

        post_tags_changed(pipeline.upcast_ref());

        assert_eq!(
            next(&bus, &pipeline),
            Some(BusMessage::Application(TAGS_CHANGED.to_string()))
        );
    }

    #[test]
    fn errors_carry_source_name_and_debug_detail() {
        let (pipeline, child, bus) = pipeline_with_child();

        let msg = gst::message::Error::builder(gst::CoreError::Failed, "stream stalled")
            .debug("poll error")
            .src(&child)
            .build();
        bus.post(msg).unwrap();

        assert_eq!(
            next(&bus, &pipeline),
            Some(BusMessage::Error {
                source: "child".to_string(),
                message: "stream stalled".to_string(),
                debug: Some("poll error".to_string()),
            })
        );
    }

    #[test]
    fn end_of_stream_converts_and_other_messages_are_dropped() {
        let (pipeline, _child, bus) = pipeline_with_child();

        bus.post(gst::message::Eos::builder().src(&pipeline).build())
            .unwrap();
        bus.post(gst::message::Latency::builder().src(&pipeline).build())
            .unwrap();

        assert_eq!(next(&bus, &pipeline), Some(BusMessage::EndOfStream));
        assert_eq!(next(&bus, &pipeline), None);
    }
}
