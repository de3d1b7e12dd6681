use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::codec::{self, storage::FsStorage};
use crate::config::Config;
use crate::scene::{EntryRef, ObjectRef, Scene};
use crate::types::{Point, Rect};

use super::ui::Layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete(EntryRef),
    NewProject,
    Load(PathBuf),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Confirm {
        message: String,
        /// 0 = Yes, 1 = No
        selected: usize,
        action: ConfirmAction,
    },
    /// Typing the path of a project to load.
    OpenPath { input: String },
}

/// An object being dragged with the mouse. `grab` is the pointer's offset
/// from the object's top-left corner when the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub object: ObjectRef,
    pub grab: (i32, i32),
}

pub struct EditorState {
    pub scene: Scene,
    pub file_path: PathBuf,
    pub selection: Option<EntryRef>,
    pub mode: Mode,
    pub config: Config,
    pub dirty: bool,
    pub status_message: Option<String>,
    pub drag: Option<Drag>,
    /// Last pointer position over the canvas, in world units.
    pub last_pointer: Option<Point>,
    /// World point drawn at the canvas's top-left cell.
    pub view_origin: Point,
    /// Layout of the last redraw; used to map mouse cells to world points.
    pub layout: Layout,
}

impl EditorState {
    pub fn new(scene: Scene, file_path: impl Into<PathBuf>, config: Config) -> Self {
        EditorState {
            scene,
            file_path: file_path.into(),
            selection: None,
            mode: Mode::Normal,
            config,
            dirty: false,
            status_message: None,
            drag: None,
            last_pointer: None,
            view_origin: Point::default(),
            layout: Layout::default(),
        }
    }

    /// Open `path`, or start an empty scene if it does not exist yet.
    pub fn open(path: &Path, config: Config) -> Result<Self> {
        let scene = if path.exists() {
            codec::load_project(&FsStorage, path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        } else {
            Scene::new()
        };
        Ok(Self::new(scene, path, config))
    }

    pub fn save(&mut self) -> Result<()> {
        codec::save_project(&FsStorage, &self.file_path, &self.scene)
            .with_context(|| format!("Failed to save {}", self.file_path.display()))?;
        self.dirty = false;
        self.status_message = Some("Saved".into());
        Ok(())
    }

    /// Replace the scene with the project at `path`. On failure the scene,
    /// its handles and the dirty flag are left as they were.
    pub fn load(&mut self, path: &Path) {
        match codec::load_into(&mut self.scene, &FsStorage, path) {
            Ok(()) => {
                self.file_path = path.to_path_buf();
                self.selection = None;
                self.drag = None;
                self.dirty = false;
                self.status_message = Some(format!("Loaded {}", path.display()));
            }
            Err(e) => {
                debug!("load of {} failed: {e}", path.display());
                self.status_message = Some(format!("Load failed: {e}"));
            }
        }
    }

    /// Called when play mode returns. Camera pans made while playing stay in
    /// the scene, so they count as unsaved changes.
    pub fn finish_play(&mut self, before: &Scene) {
        if self.scene != *before {
            self.dirty = true;
            self.status_message = Some("Kept camera moves from play mode".into());
        }
        if self.selection.is_some_and(|entry| !self.scene.contains(entry)) {
            self.selection = None;
        }
    }

    /// Every entry in panel order: objects, then cameras.
    pub fn entries(&self) -> Vec<EntryRef> {
        self.scene
            .objects()
            .map(|(h, _)| EntryRef::Object(h))
            .chain(self.scene.cameras().map(|(h, _)| EntryRef::Camera(h)))
            .collect()
    }

    pub fn select_step(&mut self, forward: bool) {
        let entries = self.entries();
        if entries.is_empty() {
            self.selection = None;
            return;
        }
        let current = self
            .selection
            .and_then(|sel| entries.iter().position(|e| *e == sel));
        let n = entries.len();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        self.selection = Some(entries[next]);
    }

    /// Map a terminal cell to a world point, if it lies on the canvas.
    pub fn cell_to_world(&self, column: u16, row: u16) -> Option<Point> {
        let l = &self.layout;
        if column < l.canvas_x
            || row < l.canvas_y
            || column >= l.canvas_x + l.canvas_width
            || row >= l.canvas_y + l.canvas_height
        {
            return None;
        }
        Some(self.config.canvas_scale.to_world(
            self.view_origin,
            column - l.canvas_x,
            row - l.canvas_y,
        ))
    }

    /// World point at the middle of the visible canvas.
    pub fn canvas_center(&self) -> Point {
        let half_w = self.layout.canvas_width / 2;
        let half_h = self.layout.canvas_height / 2;
        self.config
            .canvas_scale
            .to_world(self.view_origin, half_w, half_h)
    }

    pub fn add_object(&mut self) {
        let at = self.last_pointer.unwrap_or(self.view_origin);
        let size = self.config.default_object_size;
        let color = self.config.default_object_color;
        let handle = self
            .scene
            .add_object(color, Rect::new(at.x, at.y, size.width, size.height));
        self.selection = Some(handle.into());
        self.dirty = true;
        self.status_message = Some("Added object".into());
    }

    /// Add a camera of the default size centered on the visible canvas.
    pub fn add_camera(&mut self) {
        let center = self.canvas_center();
        let size = self.config.default_camera_size;
        let x = center.x.saturating_sub((size.width / 2) as i32);
        let y = center.y.saturating_sub((size.height / 2) as i32);
        let handle = self
            .scene
            .add_camera(Rect::new(x, y, size.width, size.height));
        self.selection = Some(handle.into());
        self.dirty = true;
        self.status_message = Some("Added camera".into());
    }

    /// Shift the selection by whole canvas cells.
    pub fn nudge_selection(&mut self, dx: i32, dy: i32) {
        let Some(entry) = self.selection else { return };
        let (sx, sy) = self.config.canvas_scale.step();
        let result = self.scene.bounds(entry).and_then(|b| {
            self.scene.move_to(
                entry,
                b.x.saturating_add(dx.saturating_mul(sx)),
                b.y.saturating_add(dy.saturating_mul(sy)),
            )
        });
        self.apply_edit(result);
    }

    /// Grow or shrink the selection by whole canvas cells; sizes stop at zero.
    pub fn resize_selection(&mut self, dw: i32, dh: i32) {
        let Some(entry) = self.selection else { return };
        let (sx, sy) = self.config.canvas_scale.step();
        let result = self.scene.bounds(entry).and_then(|b| {
            let w = b.width.saturating_add_signed(dw.saturating_mul(sx));
            let h = b.height.saturating_add_signed(dh.saturating_mul(sy));
            self.scene.resize(entry, w, h)
        });
        self.apply_edit(result);
    }

    /// Give the selected object the next palette color.
    pub fn recolor_selection(&mut self) {
        let Some(EntryRef::Object(handle)) = self.selection else {
            self.status_message = Some("Select an object to recolor".into());
            return;
        };
        let palette = &self.config.palette;
        let Some(current) = self.scene.object(handle).map(|o| o.color) else {
            self.selection = None;
            return;
        };
        if palette.is_empty() {
            return;
        }
        let next = palette
            .iter()
            .position(|c| *c == current)
            .map_or(0, |i| (i + 1) % palette.len());
        let result = self.scene.set_color(handle, palette[next]);
        self.apply_edit(result);
    }

    pub fn delete(&mut self, entry: EntryRef) {
        match self.scene.remove(entry) {
            Ok(()) => {
                if self.selection == Some(entry) {
                    self.selection = None;
                }
                self.dirty = true;
                self.status_message = Some(format!("Deleted {entry}"));
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn new_project(&mut self) {
        self.scene.clear();
        self.selection = None;
        self.drag = None;
        self.dirty = true;
        self.status_message = Some("New project".into());
    }

    /// Record the outcome of an edit on the current selection. A stale
    /// selection is dropped and reported.
    fn apply_edit(&mut self, result: crate::error::SceneResult<()>) {
        match result {
            Ok(()) => self.dirty = true,
            Err(e) => {
                debug!("edit failed: {e}");
                self.selection = None;
                self.status_message = Some(e.to_string());
            }
        }
    }
}
