//! GTK4 + layer-shell overlay that runs on the **main thread**.
//!
//! One transparent layer-shell surface per screen, on the overlay layer,
//! anchored to every edge.  Each surface draws its screen's cells with
//! cairo:
//!
//! * every cell gets a dim background, except cells whose label starts with
//!   the typed character;
//! * every label sits on a dark plate, yellow, with the first character
//!   turned red on matching cells;
//! * in cursor mode nothing is drawn so the target stays visible.
//!
//! Key releases on any surface go to the shared [`Navigator`]; all surfaces
//! are redrawn after each event.  There is no render loop: GTK only paints
//! when a redraw is queued.

use crate::command::{Key, KeyEvent, Modifiers, ScreenId, Status};
use crate::navigator::{Navigator, NavigatorError};
use crate::session::{Mode, Session};
use crate::traits::{OverlayHost, PointerDispatcher};
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

const LABEL_FONT: &str = "monospace";
const LABEL_FONT_SIZE: f64 = 16.0;

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}
"#;

/// Errors that abort the overlay.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("failed to initialise GTK4: {0}")]
    Init(#[from] glib::BoolError),
    #[error("no GDK display")]
    NoDisplay,
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
}

//  Overlay host

/// The surfaces, indexed by [`ScreenId`].
struct Surfaces {
    display: gdk::Display,
    windows: Vec<gtk4::Window>,
}

impl OverlayHost for Surfaces {
    fn focus_screen(&mut self, screen: ScreenId) {
        match self.windows.get(screen.0) {
            Some(window) => window.present(),
            None => warn!("no surface for screen {}", screen.0),
        }
    }

    fn hide(&mut self) {
        for window in &self.windows {
            window.set_visible(false);
        }
        // Make sure the compositor has unmapped the surfaces before a click
        // is injected.
        self.display.sync();
    }

    fn show(&mut self) {
        for window in &self.windows {
            window.set_visible(true);
            window.present();
        }
    }
}

//  Public API

/// Show the overlay and run the GLib main loop until the session ends.
///
/// Returns the session status at exit; [`Status::Continue`] means a
/// surface was closed from outside.
pub fn run_main_loop<P: PointerDispatcher + 'static>(
    mut navigator: Navigator<P>,
) -> Result<Status, OverlayError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    let display = gdk::Display::default().ok_or(OverlayError::NoDisplay)?;
    load_css(&display);

    //  One surface per screen
    let mut windows = Vec::new();
    let mut areas = Vec::new();
    for screen in navigator.session().grid().screens() {
        let (x, y) = screen.origin();
        let (width, height) = screen.size();

        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(Layer::Overlay);
        window.set_namespace("hyprwarp");
        window.set_keyboard_mode(KeyboardMode::Exclusive);
        window.set_exclusive_zone(-1);
        for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
            window.set_anchor(edge, true);
        }
        match gdk_monitor_at(&display, x, y) {
            Some(monitor) => window.set_monitor(Some(&monitor)),
            None => warn!("no GDK monitor at ({}, {}) for {}", x, y, screen.name()),
        }
        window.set_decorated(false);
        window.set_default_size(width as i32, height as i32);
        window.remove_css_class("background");

        let area = gtk4::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        window.set_child(Some(&area));

        debug!(
            "surface for {}: {}x{} at ({}, {})",
            screen.name(),
            width,
            height,
            x,
            y
        );
        windows.push(window);
        areas.push(area);
    }

    navigator.set_overlay(Box::new(Surfaces {
        display: display.clone(),
        windows: windows.clone(),
    }));

    let navigator = Rc::new(RefCell::new(navigator));
    let failure: Rc<RefCell<Option<NavigatorError>>> = Rc::default();
    let areas = Rc::new(areas);
    let main_loop = glib::MainLoop::new(None, false);

    for (idx, (window, area)) in windows.iter().zip(areas.iter()).enumerate() {
        //  Drawing
        let nav = navigator.clone();
        area.set_draw_func(move |_, cr, _, _| {
            let Ok(nav) = nav.try_borrow() else {
                return;
            };
            draw_screen(cr, nav.session(), ScreenId(idx));
        });

        //  Keys
        let keys = gtk4::EventControllerKey::new();
        let nav = navigator.clone();
        let areas = areas.clone();
        let failure = failure.clone();
        let main_loop_keys = main_loop.clone();
        keys.connect_key_released(move |_, keyval, _, state| {
            let event = translate_key(keyval, state);
            let result = nav.borrow_mut().handle(event);
            match result {
                Ok(Status::Continue) => {
                    for area in areas.iter() {
                        area.queue_draw();
                    }
                }
                Ok(Status::Finished(_)) => main_loop_keys.quit(),
                Err(e) => {
                    error!("session aborted: {}", e);
                    *failure.borrow_mut() = Some(e);
                    main_loop_keys.quit();
                }
            }
        });
        window.add_controller(keys);

        let main_loop_close = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("overlay surface closed");
            main_loop_close.quit();
            glib::Propagation::Proceed
        });

        window.present();
    }

    info!("overlay ready on {} screen(s)", windows.len());
    main_loop.run();

    for window in &windows {
        window.destroy();
    }

    if let Some(e) = failure.borrow_mut().take() {
        return Err(e.into());
    }
    let status = navigator.borrow().session().status();
    Ok(status)
}

//  Rendering

fn draw_screen(cr: &cairo::Context, session: &Session, screen: ScreenId) {
    cr.set_operator(cairo::Operator::Source);
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.0);
    let _ = cr.paint();
    cr.set_operator(cairo::Operator::Over);

    if session.mode() == Mode::Cursor {
        return;
    }
    let Some(screen) = session.grid().screen(screen) else {
        return;
    };

    let cell_size = session.grid().cell_size();
    let size = cell_size as f64;
    let half = size / 2.0;
    cr.select_font_face(LABEL_FONT, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(LABEL_FONT_SIZE);

    for cell in screen.cells() {
        let (ox, oy) = cell.offset(cell_size);
        let (x, y) = (ox as f64, oy as f64);
        let is_match = session.is_match(cell);

        if !is_match {
            cr.set_source_rgba(0.0, 0.0, 0.0, 0.2);
            cr.rectangle(x + 1.0, y + 1.0, size - 2.0, size - 2.0);
            let _ = cr.fill();
        }

        let label = cell.label.to_string();
        let Ok(extents) = cr.text_extents(&label) else {
            continue;
        };
        let (lw, lh) = (extents.width(), extents.height());

        cr.set_source_rgba(0.0, 0.0, 0.0, if is_match { 0.2 } else { 0.4 });
        let (px, py, pw, ph) = label_plate(x + half, y + half, lw, lh);
        cr.rectangle(px, py, pw, ph);
        let _ = cr.fill();

        let tx = x + half - lw / 2.0 - extents.x_bearing();
        let ty = y + half - lh / 2.0 - extents.y_bearing();
        cr.set_source_rgba(1.0, 0.8, 0.0, 1.0);
        cr.move_to(tx, ty);
        let _ = cr.show_text(&label);

        if is_match {
            cr.set_source_rgba(1.0, 0.0, 0.0, 1.0);
            cr.move_to(tx, ty);
            let _ = cr.show_text(&cell.label.first().to_string());
        }
    }
}

/// Backing plate for a label of extent `lw × lh` centred on `(cx, cy)`:
/// twice the text width, exactly the text height.
fn label_plate(cx: f64, cy: f64, lw: f64, lh: f64) -> (f64, f64, f64, f64) {
    (cx - lw, cy - lh / 2.0, lw * 2.0, lh)
}

//  Input translation

fn translate_key(keyval: gdk::Key, state: gdk::ModifierType) -> KeyEvent {
    let key = if keyval == gdk::Key::Escape {
        Key::Escape
    } else if keyval == gdk::Key::Caps_Lock {
        Key::CapsLock
    } else if keyval == gdk::Key::BackSpace {
        Key::Backspace
    } else if keyval == gdk::Key::Return || keyval == gdk::Key::KP_Enter {
        Key::Enter
    } else {
        keyval
            .to_unicode()
            .filter(|c| c.is_ascii_alphabetic())
            .map(Key::Char)
            .unwrap_or(Key::Other)
    };
    let modifiers = Modifiers {
        shift: state.contains(gdk::ModifierType::SHIFT_MASK),
        control: state.contains(gdk::ModifierType::CONTROL_MASK),
    };
    KeyEvent::new(key, modifiers)
}

//  Helpers

/// Find the GDK monitor whose layout origin is `(x, y)`.
fn gdk_monitor_at(display: &gdk::Display, x: i32, y: i32) -> Option<gdk::Monitor> {
    let monitors = display.monitors();
    (0..monitors.n_items())
        .filter_map(|i| monitors.item(i).and_downcast::<gdk::Monitor>())
        .find(|m| {
            let geometry = m.geometry();
            geometry.x() == x && geometry.y() == y
        })
}

fn load_css(display: &gdk::Display) {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(DEFAULT_CSS);
    gtk4::style_context_add_provider_for_display(
        display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(keyval: gdk::Key) -> KeyEvent {
        translate_key(keyval, gdk::ModifierType::empty())
    }

    #[test]
    fn label_plate_is_text_height() {
        let (x, y, w, h) = label_plate(60.0, 60.0, 20.0, 12.0);
        assert_eq!((x, y, w, h), (40.0, 54.0, 40.0, 12.0));
        // Vertically centred on the cell.
        assert_eq!(y + h / 2.0, 60.0);
    }

    #[test]
    fn named_keys() {
        assert_eq!(plain(gdk::Key::Escape).key, Key::Escape);
        assert_eq!(plain(gdk::Key::Caps_Lock).key, Key::CapsLock);
        assert_eq!(plain(gdk::Key::BackSpace).key, Key::Backspace);
        assert_eq!(plain(gdk::Key::Return).key, Key::Enter);
        assert_eq!(plain(gdk::Key::KP_Enter).key, Key::Enter);
    }

    #[test]
    fn letters_and_modifiers() {
        let ev = translate_key(gdk::Key::A, gdk::ModifierType::SHIFT_MASK);
        assert_eq!(ev, KeyEvent::new(Key::Char('A'), Modifiers::SHIFT));

        let ev = translate_key(gdk::Key::l, gdk::ModifierType::CONTROL_MASK);
        assert_eq!(ev, KeyEvent::new(Key::Char('l'), Modifiers::CONTROL));
    }

    #[test]
    fn non_letters_are_other() {
        assert_eq!(plain(gdk::Key::_1).key, Key::Other);
        assert_eq!(plain(gdk::Key::space).key, Key::Other);
        assert_eq!(plain(gdk::Key::Shift_L).key, Key::Other);
    }
}
