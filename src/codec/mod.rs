//! Scene codec: the `.pik` project format.
//!
//! A scene flattens into an ordered list of tagged records (all objects in
//! scene order, then all cameras), wrapped in a versioned document:
//!
//! ```json
//! {
//!   "objects_and_cameras": [
//!     { "kind": "object", "color": [255, 0, 0], "rect": [10, 20, 50, 50] },
//!     { "kind": "camera", "rect": [0, 0, 200, 150] }
//!   ],
//!   "format_version": 1
//! }
//! ```

pub mod storage;

use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::scene::Scene;
use crate::types::{Rect, Rgb};

use storage::Storage;

/// Highest `format_version` this build reads, and the one it writes.
pub const FORMAT_VERSION: u64 = 1;

/// One persisted scene entry. Camera records carry no color; a `color` field
/// on a camera record is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Object { color: Rgb, rect: Rect },
    Camera { rect: Rect },
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    objects_and_cameras: &'a [Record],
    format_version: u64,
}

/// Records stay raw until the version is checked, so a newer file is reported
/// as a version problem rather than as a bad record.
#[derive(Deserialize)]
struct DocumentIn {
    format_version: u64,
    objects_and_cameras: Vec<serde_json::Value>,
}

pub fn serialize(scene: &Scene) -> Vec<Record> {
    let objects = scene.objects().map(|(_, o)| Record::Object {
        color: o.color,
        rect: o.bounds,
    });
    let cameras = scene
        .cameras()
        .map(|(_, c)| Record::Camera { rect: c.bounds });
    objects.chain(cameras).collect()
}

pub fn deserialize(records: &[Record]) -> Scene {
    let mut scene = Scene::new();
    for record in records {
        match *record {
            Record::Object { color, rect } => {
                scene.add_object(color, rect);
            }
            Record::Camera { rect } => {
                scene.add_camera(rect);
            }
        }
    }
    scene
}

/// Validate one raw record. `index` is its position in the document.
pub fn decode_record(index: usize, value: &serde_json::Value) -> SceneResult<Record> {
    Record::deserialize(value).map_err(|e| SceneError::MalformedRecord {
        index,
        reason: e.to_string(),
    })
}

pub fn encode_document(scene: &Scene) -> SceneResult<Vec<u8>> {
    let records = serialize(scene);
    let doc = DocumentOut {
        objects_and_cameras: &records,
        format_version: FORMAT_VERSION,
    };
    serde_json::to_vec_pretty(&doc).map_err(|e| SceneError::MalformedDocument(e.to_string()))
}

pub fn decode_document(bytes: &[u8]) -> SceneResult<Scene> {
    let doc: DocumentIn =
        serde_json::from_slice(bytes).map_err(|e| SceneError::MalformedDocument(e.to_string()))?;

    if doc.format_version == 0 || doc.format_version > FORMAT_VERSION {
        return Err(SceneError::UnsupportedFormatVersion {
            found: doc.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let records = doc
        .objects_and_cameras
        .iter()
        .enumerate()
        .map(|(i, v)| decode_record(i, v))
        .collect::<SceneResult<Vec<_>>>()?;

    Ok(deserialize(&records))
}

/// Write `scene` to `path` through a staged file. On any failure the
/// existing file at `path` is left as it was.
pub fn save_project<S: Storage>(storage: &S, path: &Path, scene: &Scene) -> SceneResult<()> {
    let bytes = encode_document(scene)?;

    let mut staged = storage
        .stage(path)
        .map_err(|e| SceneError::storage(path, e))?;
    staged
        .write_all(&bytes)
        .and_then(|()| staged.flush())
        .map_err(|e| SceneError::storage(path, e))?;
    storage
        .commit(staged, path)
        .map_err(|e| SceneError::storage(path, e))?;

    info!(
        "saved {} objects and {} cameras to {}",
        scene.object_count(),
        scene.camera_count(),
        path.display()
    );
    Ok(())
}

pub fn load_project<S: Storage>(storage: &S, path: &Path) -> SceneResult<Scene> {
    let bytes = storage.read(path).map_err(|e| SceneError::storage(path, e))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    let scene = decode_document(&bytes)?;
    info!(
        "loaded {} objects and {} cameras from {}",
        scene.object_count(),
        scene.camera_count(),
        path.display()
    );
    Ok(scene)
}

/// Load `path` into `scene`. The scene is only touched once the whole file
/// has been read and validated.
pub fn load_into<S: Storage>(scene: &mut Scene, storage: &S, path: &Path) -> SceneResult<()> {
    let loaded = load_project(storage, path)?;
    scene.replace_with(loaded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_camera(Rect::new(0, 0, 200, 150));
        scene.add_object(Rgb::RED, Rect::new(10, 20, 50, 50));
        scene.add_object(Rgb(1, 2, 3), Rect::new(-40, 7, 0, 3));
        scene
    }

    #[test]
    fn serialize_emits_objects_before_cameras() {
        let records = serialize(&sample_scene());
        assert_eq!(
            records,
            vec![
                Record::Object { color: Rgb::RED, rect: Rect::new(10, 20, 50, 50) },
                Record::Object { color: Rgb(1, 2, 3), rect: Rect::new(-40, 7, 0, 3) },
                Record::Camera { rect: Rect::new(0, 0, 200, 150) },
            ]
        );
    }

    #[test]
    fn record_json_shape() {
        let object = serde_json::to_value(Record::Object {
            color: Rgb::RED,
            rect: Rect::new(1, 2, 3, 4),
        })
        .unwrap();
        assert_eq!(object, json!({ "kind": "object", "color": [255, 0, 0], "rect": [1, 2, 3, 4] }));

        let camera = serde_json::to_value(Record::Camera { rect: Rect::new(1, 2, 3, 4) }).unwrap();
        assert_eq!(camera, json!({ "kind": "camera", "rect": [1, 2, 3, 4] }));
    }

    #[test]
    fn document_round_trip() {
        let scene = sample_scene();
        let bytes = encode_document(&scene).unwrap();
        assert_eq!(decode_document(&bytes).unwrap(), scene);
    }

    #[test]
    fn camera_record_may_carry_a_color() {
        let record = decode_record(0, &json!({ "kind": "camera", "color": [0, 0, 255], "rect": [0, 0, 5, 5] }))
            .unwrap();
        assert_eq!(record, Record::Camera { rect: Rect::new(0, 0, 5, 5) });
    }

    #[test]
    fn malformed_records_are_rejected() {
        let cases = [
            json!({ "kind": "object", "color": [255, 0, 0], "rect": [0, 0, 5] }),
            json!({ "kind": "object", "color": [255, 0, 0], "rect": [0, 0, 5, 5, 5] }),
            json!({ "kind": "object", "color": [255, 0, 0], "rect": [0, 0, -5, 5] }),
            json!({ "kind": "object", "color": [255, 0, 0], "rect": [0, 0, 5.5, 5] }),
            json!({ "kind": "object", "rect": [0, 0, 5, 5] }),
            json!({ "kind": "object", "color": [256, 0, 0], "rect": [0, 0, 5, 5] }),
            json!({ "color": [255, 0, 0], "rect": [0, 0, 5, 5] }),
            json!({ "kind": "light", "rect": [0, 0, 5, 5] }),
            json!({ "kind": "camera" }),
        ];
        for (i, case) in cases.iter().enumerate() {
            let err = decode_record(i, case).unwrap_err();
            assert!(
                matches!(err, SceneError::MalformedRecord { index, .. } if index == i),
                "case {i} gave {err:?}"
            );
        }
    }

    #[test]
    fn malformed_record_index_points_at_the_bad_entry() {
        let doc = json!({
            "objects_and_cameras": [
                { "kind": "camera", "rect": [0, 0, 5, 5] },
                { "kind": "object", "color": [1, 2, 3], "rect": [0, 0, 5] }
            ],
            "format_version": 1
        });
        let err = decode_document(doc.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, SceneError::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let doc = json!({ "objects_and_cameras": [{ "kind": "hologram" }], "format_version": 2 });
        let err = decode_document(doc.to_string().as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedFormatVersion { found: 2, supported: FORMAT_VERSION }
        ));
    }

    #[test]
    fn version_zero_is_rejected() {
        let doc = json!({ "objects_and_cameras": [], "format_version": 0 });
        let err = decode_document(doc.to_string().as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedFormatVersion { found: 0, supported: FORMAT_VERSION }
        ));
    }

    #[test]
    fn missing_version_or_garbage_is_a_malformed_document() {
        let no_version = json!({ "objects_and_cameras": [] });
        assert!(matches!(
            decode_document(no_version.to_string().as_bytes()),
            Err(SceneError::MalformedDocument(_))
        ));
        assert!(matches!(decode_document(b"{ not json"), Err(SceneError::MalformedDocument(_))));
    }

    #[test]
    fn legacy_sentinel_color_documents_are_not_imported() {
        let legacy = json!({
            "game_objects": [{ "color": [0, 0, 255], "rect": [0, 0, 200, 150] }],
            "cameras": []
        });
        assert!(matches!(
            decode_document(legacy.to_string().as_bytes()),
            Err(SceneError::MalformedDocument(_))
        ));
    }
}
