//! Shared boundary types for Pike Engine.
//!
//! This module defines the geometry and raster contracts used across crates:
//! - World geometry (persisted in `.pik` files): `Rect`, `Point`, `Rgb`
//! - Raster → terminal (in-memory): `DrawOp`, `Cell`, `CellChange`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// World geometry
// ---------------------------------------------------------------------------

/// 8-bit RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// A position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in world units (top-left origin).
///
/// Serialized as `[x, y, width, height]`. The size is unsigned, so a
/// rectangle with a negative width or height cannot be constructed or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "[i64; 4]", try_from = "[i64; 4]")]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x as i64 + self.width as i64 / 2) as i32,
            (self.y as i64 + self.height as i64 / 2) as i32,
        )
    }

    /// Half-open containment: `[x, x + width) × [y, y + height)`.
    pub fn contains(&self, p: Point) -> bool {
        let (px, py) = (p.x as i64, p.y as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// AABB overlap test. Touching edges do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && self.right() > other.x as i64
            && (self.y as i64) < other.bottom()
            && self.bottom() > other.y as i64
    }

    /// Same size, origin shifted by `(dx, dy)`. Saturates at the `i32` range.
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    pub fn with_size(&self, width: u32, height: u32) -> Rect {
        Rect { width, height, ..*self }
    }
}

impl From<Rect> for [i64; 4] {
    fn from(r: Rect) -> Self {
        [r.x as i64, r.y as i64, r.width as i64, r.height as i64]
    }
}

impl TryFrom<[i64; 4]> for Rect {
    type Error = String;

    fn try_from([x, y, w, h]: [i64; 4]) -> Result<Self, Self::Error> {
        let x = i32::try_from(x).map_err(|_| format!("rect x {x} out of range"))?;
        let y = i32::try_from(y).map_err(|_| format!("rect y {y} out of range"))?;
        let width =
            u32::try_from(w).map_err(|_| format!("rect width {w} must be a non-negative integer"))?;
        let height =
            u32::try_from(h).map_err(|_| format!("rect height {h} must be a non-negative integer"))?;
        Ok(Rect { x, y, width, height })
    }
}

// ---------------------------------------------------------------------------
// Raster → terminal boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

impl Cell {
    pub const fn filled(color: Rgb) -> Self {
        Cell {
            ch: ' ',
            fg: None,
            bg: Some(color),
        }
    }

    pub const fn glyph(ch: char, fg: Rgb) -> Self {
        Cell {
            ch,
            fg: Some(fg),
            bg: None,
        }
    }
}

/// A single cell write at grid coordinates.
#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
    pub z_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
