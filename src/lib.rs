//! Desktop viewer for a single RTSP stream.
//!
//! GStreamer's `playbin` does all of the media work; this crate owns the pipeline,
//! relays its bus messages onto the GTK main loop and shows stream tags next to the
//! video.

pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod playbin;
pub mod shell;
pub mod state;
pub mod tags;

pub use bus::{BusMessage, BusRelay, Shell};
pub use controller::{MediaPipeline, PipelineController};
pub use error::{Result, ViewerError};
pub use state::{PlaybackState, StateChange};
