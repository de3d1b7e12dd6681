//! Cell rasterizer for scene geometry.
//!
//! Projects world-space rectangles onto a terminal cell grid and produces
//! cell-level diffs between consecutive frames, so the hosts only write the
//! cells that changed.
//!
//! The renderer is pure and stateless apart from the final `paint_*` calls,
//! which queue crossterm commands on a writer.

use std::io::Write;

use crossterm::{cursor, queue, style};
use serde::{Deserialize, Serialize};

use crate::types::{Cell, CellChange, DrawOp, Point, Rect, Rgb};
use crate::viewport::DrawCommand;

pub type Grid = Vec<Vec<Cell>>;

/// World units per terminal column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasScale {
    pub x: u32,
    pub y: u32,
}

impl Default for CanvasScale {
    /// Terminal cells are roughly twice as tall as wide.
    fn default() -> Self {
        CanvasScale { x: 5, y: 10 }
    }
}

impl CanvasScale {
    /// Largest accepted world units per cell on either axis.
    pub const MAX: u32 = 10_000;

    /// Both axes forced into `1..=MAX`.
    pub fn clamped(self) -> Self {
        CanvasScale {
            x: self.x.clamp(1, Self::MAX),
            y: self.y.clamp(1, Self::MAX),
        }
    }

    /// Size of one cell in world units, for stepping by whole cells.
    pub fn step(&self) -> (i32, i32) {
        let c = self.clamped();
        (c.x as i32, c.y as i32)
    }

    fn sx(&self) -> i64 {
        self.x.max(1) as i64
    }

    fn sy(&self) -> i64 {
        self.y.max(1) as i64
    }

    /// World position of the top-left corner of cell `(col, row)`.
    pub fn to_world(&self, origin: Point, col: u16, row: u16) -> Point {
        let x = origin.x as i64 + col as i64 * self.sx();
        let y = origin.y as i64 + row as i64 * self.sy();
        Point::new(clamp_i32(x), clamp_i32(y))
    }

    /// Columns and rows covering a `width × height` world-unit area
    /// (rounded up).
    pub fn cells(&self, width: u32, height: u32) -> (u16, u16) {
        let w = ceil_div(width as i64, self.sx());
        let h = ceil_div(height as i64, self.sy());
        (w.min(u16::MAX as i64) as u16, h.min(u16::MAX as i64) as u16)
    }

    /// Cell span `[col0, col1) × [row0, row1)` covered by `rect`, relative to
    /// the world point drawn at cell `(0, 0)`. May be negative or empty.
    pub fn project(&self, rect: &Rect, origin: Point) -> CellSpan {
        let x0 = rect.x as i64 - origin.x as i64;
        let y0 = rect.y as i64 - origin.y as i64;
        CellSpan {
            col0: x0.div_euclid(self.sx()),
            row0: y0.div_euclid(self.sy()),
            col1: ceil_div(x0 + rect.width as i64, self.sx()),
            row1: ceil_div(y0 + rect.height as i64, self.sy()),
        }
    }
}

fn ceil_div(v: i64, d: i64) -> i64 {
    -((-v).div_euclid(d))
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub col0: i64,
    pub row0: i64,
    pub col1: i64,
    pub row1: i64,
}

impl CellSpan {
    fn clipped(&self, width: u16, height: u16) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col0.max(0);
        let r0 = self.row0.max(0);
        let c1 = self.col1.min(width as i64);
        let r1 = self.row1.min(height as i64);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((c0 as u16, r0 as u16, c1 as u16, r1 as u16))
    }
}

/// A fixed-size cell surface that world geometry is projected onto.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub width: u16,
    pub height: u16,
    pub scale: CanvasScale,
    /// World point drawn at cell `(0, 0)`.
    pub origin: Point,
}

impl Surface {
    /// Filled cells for each draw command, in order.
    pub fn fill_ops(&self, commands: &[DrawCommand], z_order: i32, ops: &mut Vec<DrawOp>) {
        for cmd in commands {
            let span = self.scale.project(&cmd.rect, self.origin);
            let Some((c0, r0, c1, r1)) = span.clipped(self.width, self.height) else {
                continue;
            };
            for y in r0..r1 {
                for x in c0..c1 {
                    ops.push(DrawOp {
                        x,
                        y,
                        cell: Cell::filled(cmd.color),
                        z_order,
                    });
                }
            }
        }
    }

    /// Box-drawing outline around `rect`. Edges outside the surface are
    /// skipped; the visible part of the outline is still drawn.
    pub fn outline_ops(&self, rect: &Rect, color: Rgb, z_order: i32, ops: &mut Vec<DrawOp>) {
        let span = self.scale.project(rect, self.origin);
        let (left, top) = (span.col0, span.row0);
        let right = (span.col1 - 1).max(left);
        let bottom = (span.row1 - 1).max(top);

        let mut put = |x: i64, y: i64, ch: char| {
            if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
                ops.push(DrawOp {
                    x: x as u16,
                    y: y as u16,
                    cell: Cell::glyph(ch, color),
                    z_order,
                });
            }
        };

        // Only walk the visible stretch of long edges.
        let x_from = (left + 1).max(0);
        let x_to = right.min(self.width as i64);
        for x in x_from..x_to {
            put(x, top, '─');
            put(x, bottom, '─');
        }
        let y_from = (top + 1).max(0);
        let y_to = bottom.min(self.height as i64);
        for y in y_from..y_to {
            put(left, y, '│');
            put(right, y, '│');
        }
        put(left, top, '┌');
        put(right, top, '┐');
        put(left, bottom, '└');
        put(right, bottom, '┘');
    }
}

pub struct Renderer;

impl Renderer {
    /// Rasterize draw operations onto a `width × height` grid.
    ///
    /// Operations are sorted by z-order (stable), so higher z values paint
    /// over lower ones and equal z values keep submission order.
    pub fn rasterize(ops: &[DrawOp], width: u16, height: u16) -> Grid {
        let w = width as usize;
        let h = height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = op.cell;
            }
        }

        grid
    }

    /// Cell-level diff between two grids of the same size. A size change
    /// yields every cell of `next`.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let same_shape = prev.len() == next.len()
            && prev.iter().zip(next).all(|(a, b)| a.len() == b.len());

        let mut changes = Vec::new();
        for (y, next_row) in next.iter().enumerate() {
            for (x, next_cell) in next_row.iter().enumerate() {
                if !same_shape || prev[y][x] != *next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: *next_cell,
                    });
                }
            }
        }
        changes
    }

    /// Queue every cell of `grid` at terminal offset `(ox, oy)`.
    pub fn paint_grid(out: &mut impl Write, grid: &[Vec<Cell>], ox: u16, oy: u16) -> anyhow::Result<()> {
        for (y, row) in grid.iter().enumerate() {
            queue!(out, cursor::MoveTo(ox, oy + y as u16))?;
            for cell in row {
                queue!(out, style::PrintStyledContent(styled(cell)))?;
            }
        }
        Ok(())
    }

    /// Queue only the changed cells at terminal offset `(ox, oy)`.
    pub fn paint_changes(
        out: &mut impl Write,
        changes: &[CellChange],
        ox: u16,
        oy: u16,
    ) -> anyhow::Result<()> {
        for change in changes {
            queue!(
                out,
                cursor::MoveTo(ox + change.x, oy + change.y),
                style::PrintStyledContent(styled(&change.cell)),
            )?;
        }
        Ok(())
    }
}

fn styled(cell: &Cell) -> style::StyledContent<char> {
    let mut cs = style::ContentStyle::default();
    cs.foreground_color = cell.fg.map(to_ct_color);
    cs.background_color = cell.bg.map(to_ct_color);
    style::StyledContent::new(cs, cell.ch)
}

pub fn to_ct_color(c: Rgb) -> style::Color {
    style::Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}
