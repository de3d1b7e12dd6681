mod canvas;
mod input;
mod menubar;
mod panel;
pub mod state;
mod ui;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use crossterm::{cursor, event, execute, terminal};
use log::info;

use crate::config::Config;
use crate::player::Player;

use input::Action;
use state::EditorState;
use ui::Layout;

pub struct Editor {
    state: EditorState,
    fullscreen: bool,
}

impl Editor {
    pub fn open(path: &Path, config: Config) -> Result<Self> {
        let state = EditorState::open(path, config)?;
        info!("editing {}", path.display());
        Ok(Editor { state, fullscreen: false })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.main_loop(&mut stdout);

        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    fn main_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.full_redraw(stdout)?;

        loop {
            let event = event::read()?;
            match input::handle_event(&mut self.state, event) {
                Action::Continue => {}
                Action::Redraw => self.full_redraw(stdout)?,
                Action::Play => {
                    let before = self.state.scene.clone();
                    let played = {
                        let state = &mut self.state;
                        let config = &state.config;
                        Player::new(&mut state.scene, config).run(stdout)
                    };
                    self.state.finish_play(&before);
                    if let Err(e) = played {
                        self.state.status_message = Some(format!("Play failed: {e:#}"));
                    }
                    self.full_redraw(stdout)?;
                }
                Action::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    if self.fullscreen {
                        stdout.write_all(b"\x1b[10;1t")?;
                    } else {
                        stdout.write_all(b"\x1b[10;0t")?;
                    }
                    stdout.flush()?;
                    self.full_redraw(stdout)?;
                }
                Action::Quit => break,
            }
        }

        Ok(())
    }

    fn full_redraw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let layout = Layout::compute(term_w, term_h);
        self.state.layout = layout;

        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        menubar::render_menubar(stdout, &self.state)?;
        canvas::render_canvas(stdout, &layout, &self.state)?;
        panel::render_right_panel(stdout, &layout, &self.state)?;
        menubar::render_status(stdout, &layout, &self.state)?;

        stdout.flush()?;
        Ok(())
    }
}
