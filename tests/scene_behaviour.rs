use pike_engine::codec;
use pike_engine::error::SceneError;
use pike_engine::scene::{EntryRef, Scene};
use pike_engine::types::{Rect, Rgb};
use pike_engine::viewport::{frame_views, visible_in, DrawCommand};

/// Small deterministic generator so edit sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn coord(&mut self) -> i32 {
        (self.next() % 2001) as i32 - 1000
    }

    fn rect(&mut self) -> Rect {
        Rect::new(self.coord(), self.coord(), self.next() % 300, self.next() % 300)
    }
}

fn random_scene(seed: u64, steps: usize) -> Scene {
    let mut rng = Lcg(seed);
    let mut scene = Scene::new();
    let mut live: Vec<EntryRef> = Vec::new();

    for _ in 0..steps {
        match rng.next() % 4 {
            0 => {
                let color = Rgb(rng.next() as u8, rng.next() as u8, rng.next() as u8);
                live.push(scene.add_object(color, rng.rect()).into());
            }
            1 => live.push(scene.add_camera(rng.rect()).into()),
            2 if !live.is_empty() => {
                let entry = live[rng.next() as usize % live.len()];
                scene.move_to(entry, rng.coord(), rng.coord()).unwrap();
            }
            3 if !live.is_empty() => {
                let entry = live.swap_remove(rng.next() as usize % live.len());
                scene.remove(entry).unwrap();
            }
            _ => {}
        }
    }
    scene
}

#[test]
fn edit_sequences_survive_a_round_trip() {
    for seed in 1..=25 {
        let scene = random_scene(seed, 60);
        let records = codec::serialize(&scene);
        let restored = codec::deserialize(&records);

        assert_eq!(restored, scene, "seed {seed}");

        let bytes = codec::encode_document(&scene).unwrap();
        assert_eq!(codec::decode_document(&bytes).unwrap(), scene, "seed {seed}");
    }
}

#[test]
fn camera_at_origin_sees_only_overlapping_objects() {
    let mut scene = Scene::new();
    let a = scene.add_object(Rgb::RED, Rect::new(50, 50, 20, 20));
    scene.add_object(Rgb::GREEN, Rect::new(200, 200, 10, 10));
    let cam = scene.add_camera(Rect::new(0, 0, 100, 100));

    let visible = visible_in(scene.camera(cam).unwrap(), &scene);

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].0, scene.object(a).unwrap());
    assert_eq!(visible[0].1, Rect::new(50, 50, 20, 20));
}

#[test]
fn visible_objects_are_translated_into_camera_space() {
    let mut scene = Scene::new();
    scene.add_object(Rgb::RED, Rect::new(50, 60, 10, 10));
    scene.add_camera(Rect::new(30, 40, 100, 100));

    let views = frame_views(&scene);

    assert_eq!(views.len(), 1);
    assert_eq!(
        views[0].commands,
        vec![DrawCommand {
            color: Rgb::RED,
            rect: Rect::new(20, 20, 10, 10)
        }]
    );
}

#[test]
fn removed_handles_fail_and_others_stay_valid() {
    let mut scene = Scene::new();
    let a = scene.add_object(Rgb::RED, Rect::new(0, 0, 10, 10));
    let b = scene.add_object(Rgb::GREEN, Rect::new(10, 0, 10, 10));
    let c = scene.add_object(Rgb::BLUE, Rect::new(20, 0, 10, 10));
    let cam = scene.add_camera(Rect::new(0, 0, 50, 50));

    scene.remove(b).unwrap();

    assert!(matches!(
        scene.move_to(b, 5, 5),
        Err(SceneError::NotFound(EntryRef::Object(h))) if h == b
    ));
    assert!(matches!(scene.remove(b), Err(SceneError::NotFound(_))));
    scene.move_to(a, 1, 1).unwrap();
    scene.move_to(c, 2, 2).unwrap();
    scene.move_to(cam, 3, 3).unwrap();
    assert_eq!(scene.bounds(a).unwrap(), Rect::new(1, 1, 10, 10));
    assert_eq!(scene.bounds(c).unwrap(), Rect::new(2, 2, 10, 10));
}

#[test]
fn handles_stay_valid_across_many_removals() {
    let mut scene = Scene::new();
    let keep = scene.add_object(Rgb::WHITE, Rect::new(7, 7, 1, 1));
    let doomed: Vec<_> = (0..100)
        .map(|i| scene.add_object(Rgb::RED, Rect::new(i, 0, 1, 1)))
        .collect();
    for handle in doomed {
        scene.remove(handle).unwrap();
    }

    assert_eq!(scene.object_count(), 1);
    assert_eq!(scene.bounds(keep).unwrap(), Rect::new(7, 7, 1, 1));
}

#[test]
fn visibility_follows_insertion_order() {
    let mut scene = Scene::new();
    scene.add_object(Rgb::RED, Rect::new(80, 80, 5, 5));
    scene.add_object(Rgb::GREEN, Rect::new(0, 0, 50, 50));
    scene.add_object(Rgb::BLUE, Rect::new(40, 10, 1, 1));
    let cam = scene.add_camera(Rect::new(0, 0, 100, 100));

    let colors: Vec<Rgb> = visible_in(scene.camera(cam).unwrap(), &scene)
        .into_iter()
        .map(|(o, _)| o.color)
        .collect();

    assert_eq!(colors, vec![Rgb::RED, Rgb::GREEN, Rgb::BLUE]);
}
