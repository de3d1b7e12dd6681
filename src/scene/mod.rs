//! Scene model: the objects and cameras a project is made of.
//!
//! Objects and cameras live in separate arenas but share one id sequence, so
//! an `EntryRef` is unambiguous and a handle is never handed out twice within
//! a scene's lifetime (not even across `clear` or `replace_with`).

mod arena;

use std::fmt;

use log::debug;

use crate::error::{SceneError, SceneResult};
use crate::types::{Point, Rect, Rgb};

pub use arena::Handle;
use arena::Arena;

/// A colored rectangle placed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneObject {
    pub color: Rgb,
    pub bounds: Rect,
}

/// A viewport rectangle. Cameras have no color of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub bounds: Rect,
}

impl Camera {
    /// Fixed outline color for cameras on the editor canvas.
    pub const COLOR: Rgb = Rgb::BLUE;
}

pub type ObjectRef = Handle<SceneObject>;
pub type CameraRef = Handle<Camera>;

/// Either kind of scene entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryRef {
    Object(ObjectRef),
    Camera(CameraRef),
}

impl From<ObjectRef> for EntryRef {
    fn from(h: ObjectRef) -> Self {
        EntryRef::Object(h)
    }
}

impl From<CameraRef> for EntryRef {
    fn from(h: CameraRef) -> Self {
        EntryRef::Camera(h)
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRef::Object(h) => write!(f, "object #{}", h.raw()),
            EntryRef::Camera(h) => write!(f, "camera #{}", h.raw()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Arena<SceneObject>,
    cameras: Arena<Camera>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_object(&mut self, color: Rgb, bounds: Rect) -> ObjectRef {
        let id = self.alloc_id();
        let handle = self.objects.insert(id, SceneObject { color, bounds });
        debug!("added object #{id} at {bounds:?}");
        handle
    }

    pub fn add_camera(&mut self, bounds: Rect) -> CameraRef {
        let id = self.alloc_id();
        let handle = self.cameras.insert(id, Camera { bounds });
        debug!("added camera #{id} at {bounds:?}");
        handle
    }

    pub fn object(&self, handle: ObjectRef) -> Option<&SceneObject> {
        self.objects.get(handle)
    }

    pub fn camera(&self, handle: CameraRef) -> Option<&Camera> {
        self.cameras.get(handle)
    }

    pub fn contains(&self, entry: impl Into<EntryRef>) -> bool {
        self.bounds(entry).is_ok()
    }

    pub fn bounds(&self, entry: impl Into<EntryRef>) -> SceneResult<Rect> {
        let entry = entry.into();
        let bounds = match entry {
            EntryRef::Object(h) => self.objects.get(h).map(|o| o.bounds),
            EntryRef::Camera(h) => self.cameras.get(h).map(|c| c.bounds),
        };
        bounds.ok_or(SceneError::NotFound(entry))
    }

    fn bounds_mut(&mut self, entry: EntryRef) -> SceneResult<&mut Rect> {
        let bounds = match entry {
            EntryRef::Object(h) => self.objects.get_mut(h).map(|o| &mut o.bounds),
            EntryRef::Camera(h) => self.cameras.get_mut(h).map(|c| &mut c.bounds),
        };
        bounds.ok_or(SceneError::NotFound(entry))
    }

    /// Move the top-left corner of an entry. No clamping: entries may leave
    /// the canvas or overlap freely.
    pub fn move_to(&mut self, entry: impl Into<EntryRef>, x: i32, y: i32) -> SceneResult<()> {
        let bounds = self.bounds_mut(entry.into())?;
        bounds.x = x;
        bounds.y = y;
        Ok(())
    }

    pub fn resize(
        &mut self,
        entry: impl Into<EntryRef>,
        width: u32,
        height: u32,
    ) -> SceneResult<()> {
        let bounds = self.bounds_mut(entry.into())?;
        bounds.width = width;
        bounds.height = height;
        Ok(())
    }

    pub fn set_color(&mut self, handle: ObjectRef, color: Rgb) -> SceneResult<()> {
        let object = self
            .objects
            .get_mut(handle)
            .ok_or(SceneError::NotFound(EntryRef::Object(handle)))?;
        object.color = color;
        Ok(())
    }

    pub fn remove(&mut self, entry: impl Into<EntryRef>) -> SceneResult<()> {
        let entry = entry.into();
        let removed = match entry {
            EntryRef::Object(h) => self.objects.remove(h).is_some(),
            EntryRef::Camera(h) => self.cameras.remove(h).is_some(),
        };
        if !removed {
            return Err(SceneError::NotFound(entry));
        }
        debug!("removed {entry}");
        Ok(())
    }

    /// First object, in insertion order, whose bounds contain `point`.
    /// Cameras are never hit.
    pub fn hit_test(&self, point: Point) -> Option<ObjectRef> {
        self.objects
            .iter()
            .find(|(_, o)| o.bounds.contains(point))
            .map(|(h, _)| h)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectRef, &SceneObject)> {
        self.objects.iter()
    }

    pub fn cameras(&self) -> impl Iterator<Item = (CameraRef, &Camera)> {
        self.cameras.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.cameras.is_empty()
    }

    /// Remove every entry. Outstanding handles become `NotFound`.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.cameras.clear();
    }

    /// Replace this scene's contents with `other`'s, keeping order.
    ///
    /// Entries are re-keyed from this scene's id sequence, so handles issued
    /// before the swap never alias the new entries.
    pub fn replace_with(&mut self, other: Scene) {
        self.clear();
        for object in other.objects.into_values() {
            self.add_object(object.color, object.bounds);
        }
        for camera in other.cameras.into_values() {
            self.add_camera(camera.bounds);
        }
    }
}

/// Scenes are equal when their ordered object and camera lists are equal.
/// Handles are not compared.
impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.objects().map(|(_, o)| o).eq(other.objects().map(|(_, o)| o))
            && self.cameras().map(|(_, c)| c).eq(other.cameras().map(|(_, c)| c))
    }
}

impl Eq for Scene {}
