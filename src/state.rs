use gstreamer as gst;
use std::fmt;

/// Pipeline state as seen by the viewer, ordered `Null < Ready < Paused < Playing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaybackState {
    #[default]
    Null,
    Ready,
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn name(self) -> &'static str {
        match self {
            PlaybackState::Null => "NULL",
            PlaybackState::Ready => "READY",
            PlaybackState::Paused => "PAUSED",
            PlaybackState::Playing => "PLAYING",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<gst::State> for PlaybackState {
    fn from(state: gst::State) -> Self {
        match state {
            gst::State::Ready => PlaybackState::Ready,
            gst::State::Paused => PlaybackState::Paused,
            gst::State::Playing => PlaybackState::Playing,
            // VoidPending only shows up as a pending state, never as a current one
            _ => PlaybackState::Null,
        }
    }
}

impl From<PlaybackState> for gst::State {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Null => gst::State::Null,
            PlaybackState::Ready => gst::State::Ready,
            PlaybackState::Paused => gst::State::Paused,
            PlaybackState::Playing => gst::State::Playing,
        }
    }
}

/// How a state-change request was accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Success,
    Async,
    NoPreroll,
}

impl From<gst::StateChangeSuccess> for StateChange {
    fn from(success: gst::StateChangeSuccess) -> Self {
        match success {
            gst::StateChangeSuccess::Async => StateChange::Async,
            gst::StateChangeSuccess::NoPreroll => StateChange::NoPreroll,
            _ => StateChange::Success,
        }
    }
}

/// What the video surface shows for a given pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFill {
    /// Opaque black, painted by the shell.
    Blank,
    /// Nothing painted by the shell; the pipeline output shows through.
    Delegate,
}

pub fn surface_fill(state: PlaybackState) -> SurfaceFill {
    if state < PlaybackState::Paused {
        SurfaceFill::Blank
    } else {
        SurfaceFill::Delegate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PlaybackState; 4] = [
        PlaybackState::Null,
        PlaybackState::Ready,
        PlaybackState::Paused,
        PlaybackState::Playing,
    ];

    #[test]
    fn states_are_totally_ordered() {
        for pair in ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn surface_is_blank_only_below_paused() {
        for state in ALL {
            let expected = if state < PlaybackState::Paused {
                SurfaceFill::Blank
            } else {
                SurfaceFill::Delegate
            };
            assert_eq!(surface_fill(state), expected, "state {state}");
        }
    }

    #[test]
    fn gst_states_round_trip() {
        for state in ALL {
            assert_eq!(PlaybackState::from(gst::State::from(state)), state);
        }
        assert_eq!(
            PlaybackState::from(gst::State::VoidPending),
            PlaybackState::Null
        );
    }

    #[test]
    fn names_match_gstreamer_spelling() {
        assert_eq!(PlaybackState::Ready.to_string(), "READY");
        assert_eq!(PlaybackState::Playing.name(), "PLAYING");
    }
}
