//! Per-monitor cell grids.
//!
//! Each monitor is tiled into square cells of a fixed size, starting at its
//! top-left corner.  Trailing strips narrower than a cell are left uncovered
//! rather than stretched, so no cell ever crosses a monitor edge.
//!
//! Labels come from one shared [`LabelAllocator`], which makes them unique
//! across all monitors; the [`Grid`] keeps the global `label -> cell` map.

use crate::command::{MonitorInfo, ScreenId};
use crate::label::{Label, LabelAllocator, LabelError};
use std::collections::HashMap;

/// Errors from building a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell size must be greater than zero")]
    ZeroCellSize,
    #[error("{required} cells need labels but only {capacity} are available")]
    Capacity { required: usize, capacity: usize },
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Address of a cell: its screen plus its row-major index on that screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub screen: ScreenId,
    pub index: usize,
}

/// One labeled cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    pub label: Label,
}

impl Cell {
    /// Pixel offset of the cell's top-left corner from the screen origin.
    pub fn offset(&self, cell_size: u32) -> (i32, i32) {
        ((self.col * cell_size) as i32, (self.row * cell_size) as i32)
    }
}

/// A monitor and its cells.
#[derive(Debug, Clone)]
pub struct Screen {
    name: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Screen {
    /// Number of `(cols, rows)` a `width × height` area holds.
    pub fn dimensions_for(width: u32, height: u32, cell_size: u32) -> (u32, u32) {
        (width / cell_size, height / cell_size)
    }

    /// Tile `monitor` into cells of `cell_size`, labeling them row-major.
    pub fn tile(
        monitor: &MonitorInfo,
        cell_size: u32,
        allocator: &mut LabelAllocator,
    ) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let (cols, rows) = Self::dimensions_for(monitor.width, monitor.height, cell_size);
        let mut cells = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let label = allocator.next_label()?;
                cells.push(Cell { col, row, label });
            }
        }
        Ok(Self {
            name: monitor.name.clone(),
            x: monitor.x,
            y: monitor.y,
            width: monitor.width,
            height: monitor.height,
            cols,
            rows,
            cells,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-left corner in global desktop coordinates.
    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Grid dimensions as `(cols, rows)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Every screen's cells plus the global label map.
#[derive(Debug, Clone)]
pub struct Grid {
    cell_size: u32,
    screens: Vec<Screen>,
    labels: HashMap<Label, CellId>,
}

impl Grid {
    /// Tile every monitor, drawing labels from `allocator`.
    ///
    /// The total cell count is checked against the allocator before any
    /// label is taken, so an oversized layout fails up front with
    /// [`GridError::Capacity`].
    pub fn build(
        monitors: &[MonitorInfo],
        cell_size: u32,
        allocator: &mut LabelAllocator,
    ) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let required: usize = monitors
            .iter()
            .map(|m| {
                let (cols, rows) = Screen::dimensions_for(m.width, m.height, cell_size);
                cols as usize * rows as usize
            })
            .sum();
        if required > allocator.remaining() {
            return Err(GridError::Capacity {
                required,
                capacity: allocator.remaining(),
            });
        }

        let mut screens = Vec::with_capacity(monitors.len());
        let mut labels = HashMap::with_capacity(required);
        for (idx, monitor) in monitors.iter().enumerate() {
            let screen = Screen::tile(monitor, cell_size, allocator)?;
            for (index, cell) in screen.cells().iter().enumerate() {
                let id = CellId {
                    screen: ScreenId(idx),
                    index,
                };
                let previous = labels.insert(cell.label, id);
                debug_assert!(previous.is_none(), "label {} assigned twice", cell.label);
            }
            screens.push(screen);
        }

        Ok(Self {
            cell_size,
            screens,
            labels,
        })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(id.0)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.screen(id.screen)?.cells.get(id.index)
    }

    /// Find the cell carrying `label`.
    pub fn lookup(&self, label: &Label) -> Option<CellId> {
        self.labels.get(label).copied()
    }

    /// Total number of cells across all screens.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Center of a cell in global desktop coordinates.
    pub fn cell_center(&self, id: CellId) -> Option<(i32, i32)> {
        let screen = self.screen(id.screen)?;
        let cell = screen.cells.get(id.index)?;
        let (ox, oy) = cell.offset(self.cell_size);
        let half = (self.cell_size / 2) as i32;
        Some((screen.x + ox + half, screen.y + oy + half))
    }
}

//  Tests
