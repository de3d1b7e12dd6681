use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use log::warn;

use pike_engine::{
    codec::{self, storage::FsStorage},
    config::Config,
    editor::Editor,
    logging::{init_logging, LoggingConfig},
    player::Player,
    viewport::frame_views,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const EDIT_USAGE: &str = "pike-engine edit <project.pik>";
const PLAY_USAGE: &str = "pike-engine play <project.pik>";
const CHECK_USAGE: &str = "pike-engine check <project.pik>";

fn run() -> Result<()> {
    let (config, config_error) = Config::load();
    init_logging(LoggingConfig {
        env_filter: None,
        log_file: config.log_file.clone(),
    });
    if let Some(e) = config_error {
        warn!("ignoring editor config: {e:#}");
    }

    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("edit") => {
            let path = args.next().context(EDIT_USAGE)?;
            edit(Path::new(&path), config)
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(Path::new(&path), &config)
        }
        Some("check") => {
            let path = args.next().context(CHECK_USAGE)?;
            check(Path::new(&path))
        }
        _ => bail!(
            "Pike Engine - scene editor and player\n\nUsage:\n  {EDIT_USAGE}\n  {PLAY_USAGE}\n  {CHECK_USAGE}"
        ),
    }
}

fn edit(path: &Path, config: Config) -> Result<()> {
    let mut editor = Editor::open(path, config)?;
    editor.run()
}

fn play(path: &Path, config: &Config) -> Result<()> {
    let mut scene = codec::load_project(&FsStorage, path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let mut player = Player::new(&mut scene, config);
    player.play()
}

/// Load a project and report what each camera would show.
fn check(path: &Path) -> Result<()> {
    let scene = codec::load_project(&FsStorage, path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    println!(
        "{}: {} objects, {} cameras",
        path.display(),
        scene.object_count(),
        scene.camera_count()
    );
    for (i, view) in frame_views(&scene).iter().enumerate() {
        let b = view.bounds;
        println!(
            "  camera {} at ({},{}) {}x{}: {} visible",
            i + 1,
            b.x,
            b.y,
            b.width,
            b.height,
            view.commands.len()
        );
    }
    Ok(())
}
