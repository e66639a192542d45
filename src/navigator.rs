//! The adapter that ties a [`Session`] to real collaborators.
//!
//! [`Navigator`] feeds key events into the session and carries out the
//! returned [`Effect`]s: pointer commands go to the [`PointerDispatcher`],
//! overlay requests to the attached [`OverlayHost`].  Effects run strictly
//! in order, so the overlay is hidden before a click is injected.

use crate::command::{Effect, KeyEvent, OverlayRequest, PointerCommand, Status};
use crate::session::Session;
use crate::traits::{OverlayHost, PointerDispatcher};
use log::{debug, info};

/// Possible errors from the navigator.
#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    /// The pointer dispatcher returned an error.
    #[error("pointer error: {0}")]
    Pointer(String),
}

/// Drives a [`Session`] against a [`PointerDispatcher`].
///
/// # Typical usage
///
/// ```ignore
/// let session = Session::from_monitors(&monitors, &Config::default())?;
/// let mut nav = Navigator::new(session, pointer);
/// while nav.handle(next_key())? == Status::Continue {}
/// ```
pub struct Navigator<P: PointerDispatcher> {
    session: Session,
    pointer: P,
    overlay: Option<Box<dyn OverlayHost>>,
}

impl<P: PointerDispatcher> Navigator<P> {
    pub fn new(session: Session, pointer: P) -> Self {
        Self {
            session,
            pointer,
            overlay: None,
        }
    }

    /// Attach the rendering host that receives focus/hide/show requests.
    pub fn set_overlay(&mut self, overlay: Box<dyn OverlayHost>) {
        self.overlay = Some(overlay);
    }

    /// Read-only view of the session, for renderers.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Process a single key event.
    ///
    /// A pointer failure aborts the remaining effects of this step; the
    /// caller is expected to end the session.
    pub fn handle(&mut self, event: KeyEvent) -> Result<Status, NavigatorError> {
        let mode = self.session.mode();
        let step = self.session.step(event);
        debug!(
            "{:?} in {} mode -> input {:?}, {} effect(s)",
            event.key,
            mode,
            self.session.input().to_string(),
            step.effects.len()
        );
        if mode != self.session.mode() {
            if let Some(cell) = self.session.focused() {
                info!("selected cell {}", cell.label);
            }
        }

        for effect in step.effects {
            match effect {
                Effect::Pointer(cmd) => self.dispatch(cmd)?,
                Effect::Overlay(req) => self.request_overlay(req),
            }
        }

        if let Status::Finished(outcome) = step.status {
            info!("session finished: {:?}", outcome);
        }
        Ok(step.status)
    }

    //  Helpers

    fn dispatch(&mut self, cmd: PointerCommand) -> Result<(), NavigatorError> {
        debug!("pointer {:?}", cmd);
        let result = match cmd {
            PointerCommand::MoveAbsolute { x, y } => self.pointer.move_absolute(x, y),
            PointerCommand::MoveRelative {
                direction,
                magnitude,
            } => self.pointer.move_relative(direction, magnitude),
            PointerCommand::PrimaryClick => self.pointer.primary_click(),
            PointerCommand::SecondaryClick => self.pointer.secondary_click(),
        };
        result.map_err(|e| NavigatorError::Pointer(e.to_string()))
    }

    fn request_overlay(&mut self, req: OverlayRequest) {
        let Some(overlay) = self.overlay.as_mut() else {
            debug!("no overlay attached, dropping {:?}", req);
            return;
        };
        match req {
            OverlayRequest::FocusScreen(screen) => overlay.focus_screen(screen),
            OverlayRequest::Hide => overlay.hide(),
            OverlayRequest::Show => overlay.show(),
        }
    }
}

//  Tests
