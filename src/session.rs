//! The interaction state machine.
//!
//! A [`Session`] starts in [`Mode::Grid`], where typed letters fill a
//! two-character sliding buffer.  As soon as the buffer spells a label the
//! session warps the pointer to that cell's center and switches to
//! [`Mode::Cursor`], where H/J/K/L nudge the pointer and Enter clicks.
//!
//! [`Session::step`] is a pure transition: it mutates the session and
//! returns the [`Effect`]s the host must carry out, in order, plus a
//! [`Status`] telling the host whether to keep going.  The session itself
//! never touches a device or a window.

use crate::command::{
    Direction, Effect, Key, KeyEvent, MonitorInfo, Outcome, OverlayRequest, PointerCommand,
    Status,
};
use crate::config::{AfterClick, Config, ConfigError, NudgeConfig};
use crate::grid::{Cell, CellId, Grid, GridError};
use crate::label::{Alphabet, Label, LabelAllocator, LabelError};
use std::fmt;

/// Errors from setting up a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid alphabet: {0}")]
    Label(#[from] LabelError),
    #[error("cannot build grid: {0}")]
    Grid(#[from] GridError),
}

/// Interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Selecting a cell by typing its label.
    Grid,
    /// A cell is selected; nudging and clicking.
    Cursor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Grid => write!(f, "grid"),
            Mode::Cursor => write!(f, "cursor"),
        }
    }
}

/// The most recent typed characters, at most [`InputBuffer::CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    chars: Vec<char>,
}

impl InputBuffer {
    pub const CAPACITY: usize = 2;

    /// Append `c`, dropping the oldest character once over capacity.
    pub fn push(&mut self, c: char) {
        self.chars.push(c);
        if self.chars.len() > Self::CAPACITY {
            self.chars.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The buffer as a label, once it holds two characters.
    pub fn label(&self) -> Option<Label> {
        Label::from_chars(&self.chars)
    }
}

impl fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

/// Result of feeding one event into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Side effects to execute, in order.
    pub effects: Vec<Effect>,
    pub status: Status,
}

impl Step {
    fn idle(status: Status) -> Self {
        Self {
            effects: Vec::new(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Grid,
    Cursor(CellId),
}

/// One overlay interaction, from the first keystroke to the click.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    alphabet: Alphabet,
    input: InputBuffer,
    state: State,
    finished: Option<Outcome>,
    nudge: NudgeConfig,
    after_click: AfterClick,
}

impl Session {
    pub fn new(grid: Grid, alphabet: Alphabet, nudge: NudgeConfig, after_click: AfterClick) -> Self {
        Self {
            grid,
            alphabet,
            input: InputBuffer::default(),
            state: State::Grid,
            finished: None,
            nudge,
            after_click,
        }
    }

    /// Validate `config`, allocate labels and tile every monitor.
    pub fn from_monitors(monitors: &[MonitorInfo], config: &Config) -> Result<Self, SessionError> {
        config.validate()?;
        let alphabet = Alphabet::new(&config.alphabet)?;
        let mut allocator = LabelAllocator::shuffled(&alphabet, config.label_seed);
        let grid = Grid::build(monitors, config.cell_size, &mut allocator)?;
        Ok(Self::new(grid, alphabet, config.nudge, config.after_click))
    }

    //  Accessors

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Grid => Mode::Grid,
            State::Cursor(_) => Mode::Cursor,
        }
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// The selected cell; `Some` exactly when in cursor mode.
    pub fn focused_cell(&self) -> Option<CellId> {
        match self.state {
            State::Grid => None,
            State::Cursor(id) => Some(id),
        }
    }

    pub fn focused(&self) -> Option<&Cell> {
        self.focused_cell().and_then(|id| self.grid.cell(id))
    }

    pub fn status(&self) -> Status {
        match self.finished {
            Some(outcome) => Status::Finished(outcome),
            None => Status::Continue,
        }
    }

    /// Whether `cell` shares its first character with the typed input.
    ///
    /// Used by renderers to highlight candidate cells.
    pub fn is_match(&self, cell: &Cell) -> bool {
        self.input.first() == Some(cell.label.first())
    }

    //  Transitions

    /// Feed one key-release event.
    pub fn step(&mut self, event: KeyEvent) -> Step {
        if let Some(outcome) = self.finished {
            return Step::idle(Status::Finished(outcome));
        }
        if event.key.is_cancel() {
            self.finished = Some(Outcome::Cancelled);
            return Step::idle(Status::Finished(Outcome::Cancelled));
        }
        match self.state {
            State::Grid => self.step_grid(event),
            State::Cursor(_) => self.step_cursor(event),
        }
    }

    fn step_grid(&mut self, event: KeyEvent) -> Step {
        match event.key {
            Key::Char(c) => match self.alphabet.normalize(c) {
                Some(c) => self.input.push(c),
                None => return Step::idle(Status::Continue),
            },
            Key::Backspace => {
                self.input.pop();
            }
            _ => return Step::idle(Status::Continue),
        }

        let mut effects = Vec::new();
        let target = self
            .input
            .label()
            .and_then(|label| self.grid.lookup(&label))
            .and_then(|id| self.grid.cell_center(id).map(|center| (id, center)));
        if let Some((id, (x, y))) = target {
            self.state = State::Cursor(id);
            effects.push(Effect::Overlay(OverlayRequest::FocusScreen(id.screen)));
            effects.push(Effect::Pointer(PointerCommand::MoveAbsolute { x, y }));
        }
        Step {
            effects,
            status: Status::Continue,
        }
    }

    fn step_cursor(&mut self, event: KeyEvent) -> Step {
        match event.key {
            Key::Char(c) => match nudge_direction(c) {
                Some(direction) => {
                    let magnitude = if event.modifiers.control {
                        self.nudge.coarse_step
                    } else {
                        self.nudge.step
                    };
                    Step {
                        effects: vec![Effect::Pointer(PointerCommand::MoveRelative {
                            direction,
                            magnitude,
                        })],
                        status: Status::Continue,
                    }
                }
                None => Step::idle(Status::Continue),
            },
            Key::Enter => self.click(event),
            _ => Step::idle(Status::Continue),
        }
    }

    fn click(&mut self, event: KeyEvent) -> Step {
        let mut effects = vec![Effect::Overlay(OverlayRequest::Hide)];
        if event.modifiers.shift {
            effects.push(Effect::Pointer(PointerCommand::SecondaryClick));
        } else if event.modifiers.control {
            effects.push(Effect::Pointer(PointerCommand::PrimaryClick));
            effects.push(Effect::Pointer(PointerCommand::PrimaryClick));
        } else {
            effects.push(Effect::Pointer(PointerCommand::PrimaryClick));
        }

        let status = match self.after_click {
            AfterClick::Exit => {
                self.finished = Some(Outcome::Clicked);
                Status::Finished(Outcome::Clicked)
            }
            AfterClick::ReturnToGrid => {
                self.input.clear();
                self.state = State::Grid;
                effects.push(Effect::Overlay(OverlayRequest::Show));
                Status::Continue
            }
        };
        Step { effects, status }
    }
}

/// Vim-style nudge keys.
fn nudge_direction(c: char) -> Option<Direction> {
    match c.to_ascii_uppercase() {
        'H' => Some(Direction::Left),
        'J' => Some(Direction::Down),
        'K' => Some(Direction::Up),
        'L' => Some(Direction::Right),
        _ => None,
    }
}

//  Tests
