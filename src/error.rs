use thiserror::Error;

use crate::state::PlaybackState;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("could not create the `{factory}` element")]
    ElementCreation {
        factory: &'static str,
        #[source]
        source: glib::BoolError,
    },

    #[error("unable to set the pipeline to the {target} state")]
    StateChange { target: PlaybackState },

    #[error("render target is already bound")]
    RenderTargetBound,

    #[error("pipeline has already been released")]
    Released,

    #[error("GTK could not be initialized")]
    Toolkit(#[source] glib::BoolError),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
