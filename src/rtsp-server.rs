use anyhow::{Context, Result};
use clap::Parser;
use gstreamer as gst;
use gstreamer_rtsp_server as gst_rtsp_server;
use gst_rtsp_server::prelude::*;
use tracing::info;

/// Test source for the viewer: H.264 video and MPEG audio over RTSP.
#[derive(Parser, Debug)]
#[command(name = "rtsp-server")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8554")]
    service: String,

    /// Mount point of the stream
    #[arg(long, default_value = "/test")]
    mount: String,
}

const LAUNCH: &str = "( videotestsrc is-live=true ! \
    x264enc tune=zerolatency speed-preset=veryfast key-int-max=30 ! \
    video/x-h264,profile=baseline ! \
    rtph264pay config-interval=1 name=pay0 pt=96 \
    audiotestsrc is-live=true wave=sine ! \
    audioconvert ! lamemp3enc bitrate=128 ! \
    rtpmpapay name=pay1 pt=97 )";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    gst::init().context("Failed to initialize GStreamer")?;

    let main_loop = glib::MainLoop::new(None, false);
    let server = gst_rtsp_server::RTSPServer::new();
    server.set_service(&args.service);

    let mounts = server
        .mount_points()
        .context("RTSP server has no mount points")?;

    let factory = gst_rtsp_server::RTSPMediaFactory::new();
    factory.set_launch(LAUNCH);
    factory.set_shared(true); // Allow multiple clients to connect

    mounts.add_factory(&args.mount, factory);

    // Attach the server to the GLib main loop context
    let _source = server
        .attach(None)
        .context("Cannot attach server to context")?;

    info!(
        "RTSP stream ready at rtsp://127.0.0.1:{}{}",
        args.service, args.mount
    );
    main_loop.run();
    Ok(())
}
