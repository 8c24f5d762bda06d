use anyhow::{Context, Result};
use gstreamer as gst;
use rtsp_viewer::config::{AV_OFFSET_NS, Config, REFRESH_INTERVAL_SECS};
use rtsp_viewer::playbin::Playbin;
use rtsp_viewer::shell::{SharedController, ViewerShell};
use rtsp_viewer::{BusMessage, BusRelay, PipelineController, Shell, ViewerError};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("Invalid configuration")?;

    gtk::init().map_err(ViewerError::Toolkit)?;
    gst::init().context("Failed to initialize GStreamer")?;
    gstgtk4::plugin_register_static().context("Failed to register gtk4paintablesink")?;

    let playbin = Playbin::new(config.stream_uri(), AV_OFFSET_NS)
        .context("Could not create pipeline")?;
    let pipeline_element = playbin.element().clone();
    let bus = playbin.bus().context("Pipeline has no bus")?;

    let controller: SharedController = Rc::new(RefCell::new(PipelineController::new(playbin)));
    let main_loop = glib::MainLoop::new(None, false);
    let shell = ViewerShell::build(&controller, &main_loop);

    let _bus_watch = {
        let mut relay = BusRelay::new();
        let controller = controller.clone();
        let mut shell = shell.clone();
        bus.add_watch_local(move |_, msg| {
            if let Some(message) = BusMessage::from_gst(msg, &pipeline_element) {
                relay.handle(message, &mut controller.borrow_mut(), &mut shell);
            }
            glib::ControlFlow::Continue
        })
        .context("Failed to add bus watch")?
    };

    // A failed first PLAYING also releases the pipeline.
    controller
        .borrow_mut()
        .start()
        .context("Unable to set the pipeline to the playing state")?;

    let _refresh_timer = {
        let controller = controller.clone();
        let mut shell = shell.clone();
        glib::timeout_add_seconds_local(REFRESH_INTERVAL_SECS, move || {
            let state = controller.borrow().state();
            shell.refresh(state);
            glib::ControlFlow::Continue
        })
    };

    info!("Running main loop");
    main_loop.run();

    controller.borrow_mut().teardown();
    Ok(())
}
