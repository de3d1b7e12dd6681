//! Viewport renderer: which objects each camera sees, and where.
//!
//! Pure and allocation-light: one linear pass over the scene's objects per
//! camera. Output order is scene order, so rendering is reproducible.

use crate::scene::{Camera, CameraRef, Scene, SceneObject};
use crate::types::{Rect, Rgb};

/// Objects intersecting `camera`, each paired with its bounds translated into
/// the camera's local space.
pub fn visible_in<'a>(camera: &Camera, scene: &'a Scene) -> Vec<(&'a SceneObject, Rect)> {
    let view = camera.bounds;
    scene
        .objects()
        .filter(|(_, o)| o.bounds.intersects(&view))
        .map(|(_, o)| (o, to_camera_space(o.bounds, &view)))
        .collect()
}

fn to_camera_space(bounds: Rect, view: &Rect) -> Rect {
    Rect {
        x: clamp_i32(bounds.x as i64 - view.x as i64),
        y: clamp_i32(bounds.y as i64 - view.y as i64),
        ..bounds
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// A filled rectangle to draw, in camera-local world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub color: Rgb,
    pub rect: Rect,
}

/// Everything one camera draws in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraView {
    pub camera: CameraRef,
    /// Camera bounds in world space, for sizing the output surface.
    pub bounds: Rect,
    pub commands: Vec<DrawCommand>,
}

/// One frame step: `visible_in` once per camera, in camera order. Cameras do
/// not occlude each other.
pub fn frame_views(scene: &Scene) -> Vec<CameraView> {
    scene
        .cameras()
        .map(|(handle, camera)| CameraView {
            camera: handle,
            bounds: camera.bounds,
            commands: visible_in(camera, scene)
                .into_iter()
                .map(|(o, rect)| DrawCommand { color: o.color, rect })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(x: i32, y: i32, w: u32, h: u32) -> Camera {
        Camera { bounds: Rect::new(x, y, w, h) }
    }

    #[test]
    fn only_overlapping_objects_are_visible() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(50, 50, 20, 20));
        scene.add_object(Rgb::GREEN, Rect::new(200, 200, 10, 10));

        let visible = visible_in(&camera(0, 0, 100, 100), &scene);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0.color, Rgb::RED);
        assert_eq!(visible[0].1, Rect::new(50, 50, 20, 20));
    }

    #[test]
    fn visible_objects_are_translated_into_camera_space() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(50, 60, 10, 10));

        let visible = visible_in(&camera(30, 40, 100, 100), &scene);

        assert_eq!(visible[0].1, Rect::new(20, 20, 10, 10));
    }

    #[test]
    fn partially_visible_object_keeps_negative_offset() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(-10, -10, 20, 20));

        let visible = visible_in(&camera(0, 0, 100, 100), &scene);

        assert_eq!(visible[0].1, Rect::new(-10, -10, 20, 20));
    }

    #[test]
    fn edge_touching_object_is_not_visible() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(100, 0, 10, 10));
        scene.add_object(Rgb::RED, Rect::new(-10, 0, 10, 10));

        assert!(visible_in(&camera(0, 0, 100, 100), &scene).is_empty());
    }

    #[test]
    fn output_follows_insertion_order() {
        let mut scene = Scene::new();
        scene.add_object(Rgb(1, 0, 0), Rect::new(90, 90, 5, 5));
        scene.add_object(Rgb(2, 0, 0), Rect::new(0, 0, 5, 5));
        scene.add_object(Rgb(3, 0, 0), Rect::new(40, 40, 50, 50));

        let colors: Vec<Rgb> = visible_in(&camera(0, 0, 100, 100), &scene)
            .iter()
            .map(|(o, _)| o.color)
            .collect();

        assert_eq!(colors, vec![Rgb(1, 0, 0), Rgb(2, 0, 0), Rgb(3, 0, 0)]);
    }

    #[test]
    fn frame_views_render_each_camera_independently() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(10, 10, 10, 10));
        let left = scene.add_camera(Rect::new(0, 0, 50, 50));
        let right = scene.add_camera(Rect::new(500, 0, 50, 50));

        let views = frame_views(&scene);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].camera, left);
        assert_eq!(
            views[0].commands,
            vec![DrawCommand { color: Rgb::RED, rect: Rect::new(10, 10, 10, 10) }]
        );
        assert_eq!(views[1].camera, right);
        assert!(views[1].commands.is_empty());
    }

    #[test]
    fn visible_in_does_not_mutate_scene() {
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(10, 10, 10, 10));
        let before = scene.clone();
        let _ = visible_in(&camera(5, 5, 10, 10), &scene);
        assert_eq!(scene, before);
    }
}
