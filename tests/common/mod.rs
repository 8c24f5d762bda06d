//! In-memory pipeline and shell doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rtsp_viewer::bus::Shell;
use rtsp_viewer::tags::{DisplayBuffer, MediaKind, StreamCounts, StreamSource, StreamTagSet};
use rtsp_viewer::{MediaPipeline, PlaybackState, Result, StateChange, ViewerError};

#[derive(Debug, Default)]
pub struct PipelineLog {
    pub requests: Vec<PlaybackState>,
    pub binds: usize,
    pub shutdowns: usize,
    pub fail_on: Vec<PlaybackState>,
    pub counts: StreamCounts,
    pub tags: HashMap<(bool, u32), StreamTagSet>,
}

/// Fake pipeline that records every call into a log the test keeps a handle to.
#[derive(Clone, Default)]
pub struct FakePipeline {
    pub log: Rc<RefCell<PipelineLog>>,
}

impl FakePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(state: PlaybackState) -> Self {
        let pipeline = Self::new();
        pipeline.log.borrow_mut().fail_on.push(state);
        pipeline
    }

    pub fn with_stream(self, kind: MediaKind, index: u32, tags: StreamTagSet) -> Self {
        {
            let mut log = self.log.borrow_mut();
            match kind {
                MediaKind::Video => log.counts.video = log.counts.video.max(index + 1),
                MediaKind::Audio => log.counts.audio = log.counts.audio.max(index + 1),
            }
            log.tags.insert((kind == MediaKind::Video, index), tags);
        }
        self
    }

    pub fn requests(&self) -> Vec<PlaybackState> {
        self.log.borrow().requests.clone()
    }
}

impl StreamSource for FakePipeline {
    fn stream_counts(&self) -> StreamCounts {
        self.log.borrow().counts
    }

    fn stream_tags(&self, kind: MediaKind, index: u32) -> Option<StreamTagSet> {
        self.log
            .borrow()
            .tags
            .get(&(kind == MediaKind::Video, index))
            .cloned()
    }
}

impl MediaPipeline for FakePipeline {
    type RenderTarget = ();

    fn set_state(&self, target: PlaybackState) -> Result<StateChange> {
        let mut log = self.log.borrow_mut();
        log.requests.push(target);
        if log.fail_on.contains(&target) {
            return Err(ViewerError::StateChange { target });
        }
        Ok(StateChange::Async)
    }

    fn bind_render_target(&self, _target: &()) -> Result<()> {
        self.log.borrow_mut().binds += 1;
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.log.borrow_mut().shutdowns += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingShell {
    pub refreshes: Vec<PlaybackState>,
    pub states: Vec<PlaybackState>,
    pub metadata: Vec<Vec<String>>,
}

impl Shell for RecordingShell {
    fn refresh(&mut self, state: PlaybackState) {
        self.refreshes.push(state);
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.states.push(state);
    }

    fn show_metadata(&mut self, buffer: &DisplayBuffer) {
        self.metadata.push(buffer.lines().to_vec());
    }
}
