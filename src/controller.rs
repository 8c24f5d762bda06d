//! Ownership and lifecycle of the single playback pipeline.

use tracing::{debug, error, info, warn};

use crate::error::{Result, ViewerError};
use crate::state::{PlaybackState, StateChange};
use crate::tags::{MediaKind, StreamCounts, StreamSource, StreamTagSet};

/// The operations the viewer needs from a media pipeline.
pub trait MediaPipeline: StreamSource {
    /// Whatever the pipeline renders video into.
    type RenderTarget: ?Sized;

    /// Requests a transition. Completion is reported later on the bus.
    fn set_state(&self, target: PlaybackState) -> Result<StateChange>;

    fn bind_render_target(&self, target: &Self::RenderTarget) -> Result<()>;

    /// Brings the pipeline down to NULL synchronously.
    fn shutdown(&self) -> Result<()>;
}

pub struct PipelineController<P: MediaPipeline> {
    pipeline: Option<P>,
    state: PlaybackState,
    render_bound: bool,
}

impl<P: MediaPipeline> PipelineController<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline: Some(pipeline),
            state: PlaybackState::Null,
            render_bound: false,
        }
    }

    /// Initial PLAYING request. An error here is fatal, so the pipeline is
    /// released before it is returned.
    pub fn start(&mut self) -> Result<StateChange> {
        let result = self.set_state(PlaybackState::Playing);
        if result.is_err() {
            self.teardown();
        }
        result
    }

    pub fn set_state(&mut self, target: PlaybackState) -> Result<StateChange> {
        let pipeline = self.pipeline.as_ref().ok_or(ViewerError::Released)?;
        let change = pipeline.set_state(target)?;
        debug!("Requested {} ({:?})", target, change);
        Ok(change)
    }

    /// State request from the UI or bus handlers; failures are logged, never fatal.
    pub fn request(&mut self, target: PlaybackState) {
        if let Err(e) = self.set_state(target) {
            error!("{}", e);
        }
    }

    pub fn play(&mut self) {
        self.request(PlaybackState::Playing);
    }

    pub fn pause(&mut self) {
        self.request(PlaybackState::Paused);
    }

    pub fn bind_render_target(&mut self, target: &P::RenderTarget) -> Result<()> {
        if self.render_bound {
            return Err(ViewerError::RenderTargetBound);
        }
        let pipeline = self.pipeline.as_ref().ok_or(ViewerError::Released)?;
        pipeline.bind_render_target(target)?;
        self.render_bound = true;
        info!("Render target bound");
        Ok(())
    }

    /// Records a state reported by the pipeline's bus.
    pub fn record_state(&mut self, state: PlaybackState) {
        self.state = state;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_render_bound(&self) -> bool {
        self.render_bound
    }

    pub fn is_released(&self) -> bool {
        self.pipeline.is_none()
    }

    /// Moves the pipeline to NULL and releases it. Safe to call more than once.
    pub fn teardown(&mut self) {
        let Some(pipeline) = self.pipeline.take() else {
            return;
        };
        if let Err(e) = pipeline.shutdown() {
            warn!("Pipeline did not reach NULL cleanly: {}", e);
        }
        drop(pipeline);
        self.state = PlaybackState::Null;
        self.render_bound = false;
        info!("Pipeline released");
    }
}

impl<P: MediaPipeline> StreamSource for PipelineController<P> {
    fn stream_counts(&self) -> StreamCounts {
        self.pipeline
            .as_ref()
            .map(|p| p.stream_counts())
            .unwrap_or_default()
    }

    fn stream_tags(&self, kind: MediaKind, index: u32) -> Option<StreamTagSet> {
        self.pipeline.as_ref()?.stream_tags(kind, index)
    }
}

impl<P: MediaPipeline> Drop for PipelineController<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
