// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering of laid-out trees.
//!
//! The renderer draws onto a bounds-checked character `Canvas` and returns, next to the text, the
//! cell rectangle of every node so the TUI can highlight and hit-test without re-deriving geometry.

use std::fmt;

use thiserror::Error;

mod text;
pub mod tree;

pub use tree::{
    render_layout_annotated, render_tree_annotated, render_tree_unicode, AnnotatedRender,
    CellRect, RenderError,
};

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';
pub const ARROW_DOWN: char = '▼';

/// Which neighbours a box-drawing cell connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Links(u8);

impl Links {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);
    const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);

    fn has(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn of_char(ch: char) -> Option<Self> {
        let links = match ch {
            BOX_HORIZONTAL => Self::HORIZONTAL,
            BOX_VERTICAL => Self::VERTICAL,
            BOX_TOP_LEFT => Self::RIGHT.with(Self::DOWN),
            BOX_TOP_RIGHT => Self::LEFT.with(Self::DOWN),
            BOX_BOTTOM_LEFT => Self::RIGHT.with(Self::UP),
            BOX_BOTTOM_RIGHT => Self::LEFT.with(Self::UP),
            BOX_TEE_RIGHT => Self::VERTICAL.with(Self::RIGHT),
            BOX_TEE_LEFT => Self::VERTICAL.with(Self::LEFT),
            BOX_TEE_DOWN => Self::HORIZONTAL.with(Self::DOWN),
            BOX_TEE_UP => Self::HORIZONTAL.with(Self::UP),
            BOX_CROSS => Self::HORIZONTAL.with(Self::VERTICAL),
            _ => return None,
        };
        Some(links)
    }

    fn glyph(self) -> char {
        let (l, r, u, d) =
            (self.has(Self::LEFT), self.has(Self::RIGHT), self.has(Self::UP), self.has(Self::DOWN));
        match (l, r, u, d) {
            (false, false, false, false) => ' ',
            (_, _, false, false) => BOX_HORIZONTAL,
            (false, false, _, _) => BOX_VERTICAL,
            (false, true, false, true) => BOX_TOP_LEFT,
            (true, false, false, true) => BOX_TOP_RIGHT,
            (false, true, true, false) => BOX_BOTTOM_LEFT,
            (true, false, true, false) => BOX_BOTTOM_RIGHT,
            (false, true, true, true) => BOX_TEE_RIGHT,
            (true, false, true, true) => BOX_TEE_LEFT,
            (true, true, false, true) => BOX_TEE_DOWN,
            (true, true, true, false) => BOX_TEE_UP,
            (true, true, true, true) => BOX_CROSS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    links: Links,
    /// Shows `ch` even though `links` is set (arrowheads that still join a line).
    pinned: bool,
}

impl Cell {
    fn blank(fill: char) -> Self {
        Self { ch: fill, links: Links::NONE, pinned: false }
    }
}

/// A fixed-size, bounds-checked character grid.
///
/// Plain characters overwrite. Box-drawing characters merge with what is already in the cell and
/// render as the junction their connected neighbours imply (`┬`, `┴`, `├`, `┤`, `┼`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        Self::new_filled(width, height, ' ')
    }

    pub fn new_filled(width: usize, height: usize, fill: char) -> Result<Self, CanvasError> {
        let len = width.checked_mul(height).ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self { width, height, cells: vec![Cell::blank(fill); len] })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.glyph_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        let cell = &mut self.cells[idx];
        match Links::of_char(ch) {
            Some(links) => {
                cell.links = cell.links.with(links);
                cell.pinned = false;
            }
            None => *cell = Cell { ch, links: Links::NONE, pinned: false },
        }
        Ok(())
    }

    /// Places a `▼` that still joins a vertical line arriving from above.
    pub fn set_arrow_down(&mut self, x: usize, y: usize) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        self.cells[idx] = Cell { ch: ARROW_DOWN, links: Links::UP, pinned: true };
        Ok(())
    }

    /// Writes `text` from `(x, y)` to the right, clipping at the right edge. Box-drawing
    /// characters in `text` are written literally and never merge; control characters become
    /// spaces so a cell never breaks the line.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        for (x, ch) in (x..self.width).zip(text.chars()) {
            let ch = if ch.is_control() { ' ' } else { ch };
            let idx = self.index_of(x, y)?;
            self.cells[idx] = Cell { ch, links: Links::NONE, pinned: false };
        }
        Ok(())
    }

    /// Horizontal line over `x0..=x1` (either order).
    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (lo, hi) = (x0.min(x1), x0.max(x1));
        self.check_point(hi, y)?;
        for x in lo..=hi {
            self.set(x, y, BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    /// Vertical line over `y0..=y1` (either order).
    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (lo, hi) = (y0.min(y1), y0.max(y1));
        self.check_point(x, hi)?;
        for y in lo..=hi {
            self.set(x, y, BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Single-line box spanning the two corners (inclusive). Nothing is drawn when a corner is
    /// out of bounds.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        self.check_point(right, bottom)?;

        if left == right || top == bottom {
            self.draw_hline(left, right, top)?;
            return self.draw_vline(left, top, bottom);
        }

        for x in left + 1..right {
            self.set(x, top, BOX_HORIZONTAL)?;
            self.set(x, bottom, BOX_HORIZONTAL)?;
        }
        for y in top + 1..bottom {
            self.set(left, y, BOX_VERTICAL)?;
            self.set(right, y, BOX_VERTICAL)?;
        }
        self.set(left, top, BOX_TOP_LEFT)?;
        self.set(right, top, BOX_TOP_RIGHT)?;
        self.set(left, bottom, BOX_BOTTOM_LEFT)?;
        self.set(right, bottom, BOX_BOTTOM_RIGHT)
    }

    fn check_point(&self, x: usize, y: usize) -> Result<(), CanvasError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds { x, y, width: self.width, height: self.height }
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        self.check_point(x, y)?;
        Ok(y * self.width + x)
    }

    fn links_at(&self, x: usize, y: usize) -> Links {
        if self.in_bounds(x, y) {
            self.cells[y * self.width + x].links
        } else {
            Links::NONE
        }
    }

    fn glyph_at(&self, x: usize, y: usize, idx: usize) -> char {
        let cell = self.cells[idx];
        if cell.pinned || cell.links == Links::NONE {
            return cell.ch;
        }

        // Keep only the directions a neighbour links back to; lone strokes keep their own shape.
        let mut joined = Links::NONE;
        if cell.links.has(Links::LEFT) && x > 0 && self.links_at(x - 1, y).has(Links::RIGHT) {
            joined = joined.with(Links::LEFT);
        }
        if cell.links.has(Links::RIGHT) && self.links_at(x + 1, y).has(Links::LEFT) {
            joined = joined.with(Links::RIGHT);
        }
        if cell.links.has(Links::UP) && y > 0 && self.links_at(x, y - 1).has(Links::DOWN) {
            joined = joined.with(Links::UP);
        }
        if cell.links.has(Links::DOWN) && self.links_at(x, y + 1).has(Links::UP) {
            joined = joined.with(Links::DOWN);
        }

        if joined == Links::NONE {
            cell.links.glyph()
        } else {
            joined.glyph()
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            if y > 0 {
                f.write_char('\n')?;
            }
            for x in 0..self.width {
                f.write_char(self.glyph_at(x, y, y * self.width + x))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
}
