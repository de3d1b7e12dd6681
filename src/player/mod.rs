//! Play mode.
//!
//! Runs a fixed-rate loop over a scene: every tick renders each camera's
//! view onto the play surface and writes only the cells that changed. The
//! loop never mutates the scene while a frame is being computed; camera pans
//! requested from the keyboard are queued and applied at the next frame
//! boundary.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{info, warn};

use crate::config::{matches_binding, Config};
use crate::menubar::render_hints;
use crate::renderer::{Grid, Renderer, Surface};
use crate::scene::{CameraRef, Scene};
use crate::types::Point;
use crate::viewport::frame_views;

/// Rows reserved above the play surface for the menu bar.
const SURFACE_OFFSET: u16 = 1;

/// A scene mutation requested while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEdit {
    PanCamera { camera: CameraRef, dx: i32, dy: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    Continue,
    Repaint,
    Quit,
}

pub struct Player<'a> {
    scene: &'a mut Scene,
    config: &'a Config,
    pending: Vec<SceneEdit>,
    active_camera: usize,
    surface: Surface,
    /// Last grid written to the terminal; empty forces a full repaint.
    painted: Grid,
    frames: u64,
}

impl<'a> Player<'a> {
    pub fn new(scene: &'a mut Scene, config: &'a Config) -> Self {
        let scale = config.canvas_scale;
        let (width, height) = scale.cells(config.play.surface.width, config.play.surface.height);
        Player {
            scene,
            config,
            pending: Vec::new(),
            active_camera: 0,
            surface: Surface {
                width,
                height,
                scale,
                origin: Point::new(0, 0),
            },
            painted: Vec::new(),
            frames: 0,
        }
    }

    /// Play the scene in the terminal until the user quits.
    ///
    /// Sets up the terminal, enters the loop, and restores the terminal on
    /// exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        info!(
            "play started: {} objects, {} cameras",
            self.scene.object_count(),
            self.scene.camera_count()
        );
        let started = Instant::now();
        let result = self.run(&mut stdout);

        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        let secs = started.elapsed().as_secs_f64();
        info!(
            "play stopped after {} frames ({:.1} fps)",
            self.frames,
            self.frames as f64 / secs.max(f64::EPSILON)
        );
        result
    }

    /// Run the frame loop on a terminal that is already in raw mode.
    pub fn run(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let period = Duration::from_secs(1) / self.config.play.fps.max(1);
        let mut next_tick = Instant::now();
        self.fit_to_terminal()?;

        loop {
            // Gather input until the tick is due.
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                match self.handle_event(event::read()?) {
                    PlayAction::Quit => return Ok(()),
                    PlayAction::Repaint => {
                        self.fit_to_terminal()?;
                        self.painted.clear();
                    }
                    PlayAction::Continue => {}
                }
            }

            self.tick(stdout)?;

            next_tick += period;
            let now = Instant::now();
            if next_tick < now {
                // Running behind: drop the missed ticks instead of bursting.
                next_tick = now;
            }
        }
    }

    fn fit_to_terminal(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let scale = self.config.canvas_scale;
        let (want_w, want_h) =
            scale.cells(self.config.play.surface.width, self.config.play.surface.height);
        self.surface.width = want_w.min(term_w);
        self.surface.height = want_h.min(term_h.saturating_sub(SURFACE_OFFSET + 1));
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> PlayAction {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => PlayAction::Repaint,
            _ => PlayAction::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> PlayAction {
        let bindings = &self.config.key_bindings;
        if matches_binding(&bindings.quit, &key) || matches_binding(&bindings.cancel, &key) {
            return PlayAction::Quit;
        }
        if matches_binding(&bindings.next_camera, &key) {
            let count = self.scene.camera_count();
            if count > 0 {
                self.active_camera = (self.active_camera + 1) % count;
            }
            return PlayAction::Continue;
        }

        let (step_x, step_y) = self.config.canvas_scale.step();
        let (dx, dy) = match key.code {
            KeyCode::Left => (-step_x, 0),
            KeyCode::Right => (step_x, 0),
            KeyCode::Up => (0, -step_y),
            KeyCode::Down => (0, step_y),
            _ => return PlayAction::Continue,
        };
        if let Some(camera) = self.active_camera() {
            self.pending.push(SceneEdit::PanCamera { camera, dx, dy });
        }
        PlayAction::Continue
    }

    pub fn active_camera(&self) -> Option<CameraRef> {
        self.scene
            .cameras()
            .nth(self.active_camera)
            .map(|(handle, _)| handle)
    }

    /// Apply queued edits. Only called between frames.
    pub fn apply_pending(&mut self) {
        for edit in self.pending.drain(..) {
            match edit {
                SceneEdit::PanCamera { camera, dx, dy } => {
                    let moved = self.scene.bounds(camera).and_then(|b| {
                        self.scene
                            .move_to(camera, b.x.saturating_add(dx), b.y.saturating_add(dy))
                    });
                    if let Err(e) = moved {
                        warn!("dropping camera pan: {e}");
                    }
                }
            }
        }
    }

    /// Render one frame of every camera onto the play surface.
    pub fn compose(&self) -> Grid {
        let mut ops = Vec::new();
        for view in frame_views(self.scene) {
            self.surface.fill_ops(&view.commands, 0, &mut ops);
        }
        Renderer::rasterize(&ops, self.surface.width, self.surface.height)
    }

    fn tick(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.apply_pending();
        let grid = self.compose();

        if self.painted.is_empty() {
            queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
            self.render_menubar(stdout)?;
            Renderer::paint_grid(stdout, &grid, 0, SURFACE_OFFSET)?;
        } else {
            let changes = Renderer::diff(&self.painted, &grid);
            Renderer::paint_changes(stdout, &changes, 0, SURFACE_OFFSET)?;
        }
        self.painted = grid;
        self.frames += 1;

        self.render_status(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let kb = &self.config.key_bindings;
        render_hints(
            stdout,
            0,
            &[
                ("←→↑↓", "pan camera"),
                (kb.next_camera.as_str(), "next camera"),
                (kb.quit.as_str(), "stop"),
            ],
        )
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.surface.height + SURFACE_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(());
        }

        let count = self.scene.camera_count();
        let camera = if count == 0 {
            "no cameras".to_string()
        } else {
            format!("Camera {}/{count}", self.active_camera + 1)
        };
        let status = format!(" PLAY | {camera} | frame {} ", self.frames);

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);
        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Rect, Rgb};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.canvas_scale = crate::renderer::CanvasScale { x: 10, y: 10 };
        config.play.surface = crate::config::Size { width: 100, height: 100 };
        config
    }

    #[test]
    fn compose_draws_objects_in_camera_space() {
        let config = config();
        let mut scene = Scene::new();
        scene.add_object(Rgb::RED, Rect::new(50, 60, 10, 10));
        scene.add_camera(Rect::new(30, 40, 100, 100));

        let player = Player::new(&mut scene, &config);
        let grid = player.compose();

        assert_eq!(grid[2][2], Cell::filled(Rgb::RED));
        assert_eq!(grid[0][0], Cell::default());
    }

    #[test]
    fn pans_are_deferred_to_the_frame_boundary() {
        let config = config();
        let mut scene = Scene::new();
        let cam = scene.add_camera(Rect::new(0, 0, 100, 100));

        let mut player = Player::new(&mut scene, &config);
        player.handle_event(press(KeyCode::Right));
        player.handle_event(press(KeyCode::Down));
        assert_eq!(player.scene.bounds(cam).unwrap(), Rect::new(0, 0, 100, 100));

        player.apply_pending();
        assert_eq!(player.scene.bounds(cam).unwrap(), Rect::new(10, 10, 100, 100));
    }

    #[test]
    fn tab_cycles_the_active_camera() {
        let config = config();
        let mut scene = Scene::new();
        let first = scene.add_camera(Rect::new(0, 0, 10, 10));
        let second = scene.add_camera(Rect::new(50, 0, 10, 10));

        let mut player = Player::new(&mut scene, &config);
        assert_eq!(player.active_camera(), Some(first));
        player.handle_event(press(KeyCode::Tab));
        assert_eq!(player.active_camera(), Some(second));
        player.handle_event(press(KeyCode::Tab));
        assert_eq!(player.active_camera(), Some(first));
    }

    #[test]
    fn pan_of_a_removed_camera_is_dropped() {
        let config = config();
        let mut scene = Scene::new();
        let cam = scene.add_camera(Rect::new(0, 0, 10, 10));

        let mut player = Player::new(&mut scene, &config);
        player.handle_event(press(KeyCode::Left));
        player.scene.remove(cam).unwrap();
        player.apply_pending();
        assert!(player.pending.is_empty());
        assert_eq!(player.scene.camera_count(), 0);
    }

    #[test]
    fn quit_keys() {
        let config = config();
        let mut scene = Scene::new();
        let mut player = Player::new(&mut scene, &config);
        assert_eq!(player.handle_event(press(KeyCode::Char('q'))), PlayAction::Quit);
        assert_eq!(player.handle_event(press(KeyCode::Esc)), PlayAction::Quit);
        assert_eq!(player.handle_event(Event::Resize(80, 24)), PlayAction::Repaint);
    }
}
