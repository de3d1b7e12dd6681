use std::io;

use crate::renderer::{Grid, Renderer, Surface};
use crate::scene::{Camera, EntryRef};
use crate::types::{DrawOp, Rgb};
use crate::viewport::DrawCommand;

use super::state::EditorState;
use super::ui::Layout;

/// Highlight drawn around the selected entry.
const SELECTION_COLOR: Rgb = Rgb::WHITE;

const Z_OBJECTS: i32 = 0;
const Z_CAMERAS: i32 = 1;
const Z_SELECTION: i32 = 2;

/// Rasterize the editor canvas: objects filled in scene order, camera
/// outlines above them, and the selection outline on top.
pub fn compose_canvas(layout: &Layout, state: &EditorState) -> Grid {
    let surface = Surface {
        width: layout.canvas_width,
        height: layout.canvas_height,
        scale: state.config.canvas_scale,
        origin: state.view_origin,
    };

    let mut ops: Vec<DrawOp> = Vec::new();

    let commands: Vec<DrawCommand> = state
        .scene
        .objects()
        .map(|(_, o)| DrawCommand {
            color: o.color,
            rect: o.bounds,
        })
        .collect();
    surface.fill_ops(&commands, Z_OBJECTS, &mut ops);

    for (_, camera) in state.scene.cameras() {
        surface.outline_ops(&camera.bounds, Camera::COLOR, Z_CAMERAS, &mut ops);
    }

    if let Some(entry) = state.selection {
        if let Ok(bounds) = state.scene.bounds(entry) {
            // Objects are filled, so their highlight sits just outside them.
            let highlight = match entry {
                EntryRef::Object(_) => {
                    let (sx, sy) = state.config.canvas_scale.step();
                    bounds.translated(-sx, -sy).with_size(
                        bounds.width.saturating_add((sx as u32).saturating_mul(2)),
                        bounds.height.saturating_add((sy as u32).saturating_mul(2)),
                    )
                }
                EntryRef::Camera(_) => bounds,
            };
            surface.outline_ops(&highlight, SELECTION_COLOR, Z_SELECTION, &mut ops);
        }
    }

    Renderer::rasterize(&ops, surface.width, surface.height)
}

pub fn render_canvas(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    let grid = compose_canvas(layout, state);
    Renderer::paint_grid(stdout, &grid, layout.canvas_x, layout.canvas_y)
}
