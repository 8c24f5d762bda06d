//! The GTK window: video surface, metadata panel and play/pause buttons.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk::prelude::*;
use tracing::{error, trace, warn};

use crate::bus::Shell;
use crate::controller::PipelineController;
use crate::playbin::Playbin;
use crate::state::{PlaybackState, SurfaceFill, surface_fill};
use crate::tags::DisplayBuffer;

pub type SharedController = Rc<RefCell<PipelineController<Playbin>>>;

/// Handles to the widgets the relay updates. Cheap to clone.
#[derive(Clone)]
pub struct ViewerShell {
    blank: gtk::DrawingArea,
    streams_list: gtk::TextView,
    surface_state: Rc<Cell<PlaybackState>>,
}

impl ViewerShell {
    /// Builds and shows the window. The picture binds itself to the pipeline on realize.
    pub fn build(controller: &SharedController, main_loop: &glib::MainLoop) -> Self {
        let surface_state = Rc::new(Cell::new(PlaybackState::Null));

        let picture = gtk::Picture::new();
        picture.set_hexpand(true);
        picture.set_vexpand(true);
        {
            let controller = controller.clone();
            picture.connect_realize(move |picture| {
                if let Err(e) = controller.borrow_mut().bind_render_target(picture) {
                    warn!("Ignoring render target bind: {}", e);
                }
            });
        }

        // Paints black over the picture while there is no video to show.
        let blank = gtk::DrawingArea::new();
        blank.set_can_target(false);
        {
            let surface_state = surface_state.clone();
            blank.set_draw_func(move |_, cr, width, height| {
                if surface_fill(surface_state.get()) != SurfaceFill::Blank {
                    return;
                }
                cr.set_source_rgb(0.0, 0.0, 0.0);
                cr.rectangle(0.0, 0.0, f64::from(width), f64::from(height));
                if let Err(e) = cr.fill() {
                    error!("Failed to paint video surface: {}", e);
                }
            });
        }

        let video_window = gtk::Overlay::new();
        video_window.set_child(Some(&picture));
        video_window.add_overlay(&blank);

        let play_button = gtk::Button::with_label("PLAY");
        {
            let controller = controller.clone();
            play_button.connect_clicked(move |_| controller.borrow_mut().play());
        }
        let pause_button = gtk::Button::with_label("PAUSE");
        {
            let controller = controller.clone();
            pause_button.connect_clicked(move |_| controller.borrow_mut().pause());
        }

        let streams_list = gtk::TextView::new();
        streams_list.set_editable(false);
        streams_list.set_cursor_visible(false);
        streams_list.set_vexpand(true);

        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 2);
        controls.set_homogeneous(true);
        controls.append(&play_button);
        controls.append(&pause_button);

        let main_vbox = gtk::Box::new(gtk::Orientation::Vertical, 2);
        main_vbox.append(&streams_list);
        main_vbox.append(&controls);

        let main_box = gtk::Box::new(gtk::Orientation::Horizontal, 0);
        main_box.append(&video_window);
        main_box.append(&main_vbox);

        let window = gtk::Window::builder()
            .title("RTSP Viewer")
            .default_width(640)
            .default_height(480)
            .child(&main_box)
            .build();
        {
            let main_loop = main_loop.clone();
            window.connect_close_request(move |_| {
                main_loop.quit();
                glib::Propagation::Proceed
            });
        }
        window.present();

        Self {
            blank,
            streams_list,
            surface_state,
        }
    }
}

impl Shell for ViewerShell {
    fn refresh(&mut self, state: PlaybackState) {
        if state < PlaybackState::Paused {
            return;
        }
        trace!("UI refresh in {}", state);
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.surface_state.set(state);
        self.blank.queue_draw();
    }

    fn show_metadata(&mut self, buffer: &DisplayBuffer) {
        self.streams_list.buffer().set_text(&buffer.text());
    }
}
