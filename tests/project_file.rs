use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pike_engine::codec::{self, storage::FsStorage, storage::Storage, FORMAT_VERSION};
use pike_engine::error::SceneError;
use pike_engine::scene::Scene;
use pike_engine::types::{Rect, Rgb};

fn sample_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_object(Rgb::RED, Rect::new(10, 20, 50, 50));
    scene.add_object(Rgb(12, 34, 56), Rect::new(-40, 5, 8, 0));
    scene.add_camera(Rect::new(0, 0, 200, 150));
    scene
}

#[test]
fn save_then_load_reproduces_the_scene() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("level.pik");
    let scene = sample_scene();

    codec::save_project(&FsStorage, &path, &scene)?;
    let loaded = codec::load_project(&FsStorage, &path)?;

    assert_eq!(loaded, scene);
    assert_eq!(codec::serialize(&loaded), codec::serialize(&scene));
    Ok(())
}

#[test]
fn saved_file_is_a_versioned_json_document() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("level.pik");

    codec::save_project(&FsStorage, &path, &sample_scene())?;
    let doc: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;

    assert_eq!(doc["format_version"], FORMAT_VERSION);
    let records = doc["objects_and_cameras"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["kind"], "object");
    assert_eq!(records[0]["rect"], serde_json::json!([10, 20, 50, 50]));
    assert_eq!(records[2]["kind"], "camera");
    Ok(())
}

#[test]
fn saving_leaves_no_scratch_files_behind() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("level.pik");

    codec::save_project(&FsStorage, &path, &sample_scene())?;
    codec::save_project(&FsStorage, &path, &Scene::new())?;

    let names: Vec<_> = fs::read_dir(dir.path())?
        .map(|e| e.map(|e| e.file_name()))
        .collect::<Result<_, _>>()?;
    assert_eq!(names, vec![std::ffi::OsString::from("level.pik")]);
    assert!(codec::load_project(&FsStorage, &path)?.is_empty());
    Ok(())
}

#[test]
fn loading_a_missing_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.pik");

    let err = codec::load_project(&FsStorage, &path).unwrap_err();
    assert!(matches!(err, SceneError::Storage { .. }));
}

#[test]
fn failed_load_leaves_the_current_scene_untouched() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.pik");
    fs::write(
        &path,
        r#"{"format_version": 1, "objects_and_cameras": [
            {"kind": "object", "color": [1, 2, 3], "rect": [0, 0, 5, 5]},
            {"kind": "object", "color": [1, 2], "rect": [0, 0, 5, 5]}
        ]}"#,
    )?;

    let mut scene = sample_scene();
    let before = scene.clone();
    let err = codec::load_into(&mut scene, &FsStorage, &path).unwrap_err();

    assert!(matches!(err, SceneError::MalformedRecord { index: 1, .. }));
    assert_eq!(scene, before);
    Ok(())
}

#[test]
fn newer_format_version_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("future.pik");
    fs::write(
        &path,
        r#"{"format_version": 2, "objects_and_cameras": [{"kind": "sprite"}]}"#,
    )?;

    let err = codec::load_project(&FsStorage, &path).unwrap_err();
    assert!(matches!(
        err,
        SceneError::UnsupportedFormatVersion { found: 2, supported: 1 }
    ));
    Ok(())
}

#[test]
fn load_into_replaces_contents_and_invalidates_old_handles() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("level.pik");
    codec::save_project(&FsStorage, &path, &sample_scene())?;

    let mut scene = Scene::new();
    let stale = scene.add_object(Rgb::GREEN, Rect::new(1, 1, 1, 1));
    codec::load_into(&mut scene, &FsStorage, &path)?;

    assert_eq!(scene, sample_scene());
    assert!(!scene.contains(stale));
    Ok(())
}

/// In-memory storage whose staged writer fails once `budget` bytes have been
/// written. Committed files live in `files`.
#[derive(Default)]
struct FlakyStorage {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    budget: Option<usize>,
}

struct StagedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
    budget: Option<usize>,
}

impl Write for StagedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.borrow_mut();
        if let Some(budget) = self.budget {
            let room = budget.saturating_sub(bytes.len());
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = room.min(buf.len());
            bytes.extend_from_slice(&buf[..n]);
            return Ok(n);
        }
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Storage for FlakyStorage {
    type Staged = StagedBuffer;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn stage(&self, _path: &Path) -> io::Result<StagedBuffer> {
        Ok(StagedBuffer {
            bytes: Rc::default(),
            budget: self.budget,
        })
    }

    fn commit(&self, staged: StagedBuffer, path: &Path) -> io::Result<()> {
        let bytes = staged.bytes.borrow().clone();
        self.files.borrow_mut().insert(path.to_path_buf(), bytes);
        Ok(())
    }
}

#[test]
fn interrupted_save_keeps_the_previous_file() -> anyhow::Result<()> {
    let path = Path::new("memory/level.pik");
    let mut storage = FlakyStorage::default();
    codec::save_project(&storage, path, &sample_scene())?;
    let before = storage.read(path)?;

    storage.budget = Some(16);
    let mut bigger = sample_scene();
    bigger.add_object(Rgb::YELLOW, Rect::new(99, 99, 1, 1));
    let err = codec::save_project(&storage, path, &bigger).unwrap_err();

    assert!(matches!(err, SceneError::Storage { .. }));
    assert_eq!(storage.read(path)?, before);
    assert_eq!(codec::load_project(&storage, path)?, sample_scene());
    Ok(())
}
