use std::io;

use crossterm::{cursor, queue, style, terminal};

use crate::menubar::{render_hints, Hint};

use super::state::{EditorState, Mode};
use super::ui::Layout;

/// Items are listed in a consistent order:
///   create → select/move → edit → file → escape/global
///
/// Keys come from the configured bindings; arrows and the prompt keys are
/// fixed.
fn mode_items(state: &EditorState) -> Vec<Hint<'_>> {
    let kb = &state.config.key_bindings;
    match &state.mode {
        Mode::Normal if state.selection.is_some() => vec![
            (kb.add_object.as_str(), "object"),
            (kb.add_camera.as_str(), "camera"),
            (kb.select_next.as_str(), "select"),
            ("←→↑↓", "move"),
            ("Shift+←→↑↓", "size"),
            (kb.recolor.as_str(), "color"),
            (kb.delete.as_str(), "del"),
            (kb.play.as_str(), "play"),
            (kb.save.as_str(), "save"),
            (kb.quit.as_str(), "quit"),
        ],
        Mode::Normal => vec![
            (kb.add_object.as_str(), "object"),
            (kb.add_camera.as_str(), "camera"),
            (kb.select_next.as_str(), "select"),
            ("←→↑↓", "scroll"),
            (kb.play.as_str(), "play"),
            (kb.new_project.as_str(), "new"),
            (kb.load.as_str(), "load"),
            (kb.save.as_str(), "save"),
            (kb.quit.as_str(), "quit"),
            (kb.fullscreen.as_str(), "full"),
        ],
        Mode::Confirm { .. } => vec![
            ("↑↓", "choose"),
            (kb.confirm.as_str(), "ok"),
            ("y", ""),
            ("n", ""),
            (kb.cancel.as_str(), "cancel"),
        ],
        Mode::OpenPath { .. } => vec![("Enter", "load"), ("Backspace", "erase"), ("Esc", "cancel")],
    }
}

pub fn render_menubar(stdout: &mut io::Stdout, state: &EditorState) -> anyhow::Result<()> {
    render_hints(stdout, 0, &mode_items(state))
}

pub fn render_status(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    let mode_str = match &state.mode {
        Mode::Normal => "EDIT",
        Mode::Confirm { .. } => "CONFIRM",
        Mode::OpenPath { .. } => "LOAD",
    };
    let file = state
        .file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dirty_str = if state.dirty { " [modified]" } else { "" };
    let status = state.status_message.as_deref().unwrap_or("");
    let line = format!(
        " {mode_str} | {file}{dirty_str} | {} objects, {} cameras | view ({},{}) {status}",
        state.scene.object_count(),
        state.scene.camera_count(),
        state.view_origin.x,
        state.view_origin.y,
    );
    let line: String = line.chars().take(layout.term_width as usize).collect();

    queue!(
        stdout,
        cursor::MoveTo(0, layout.status_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::SetAttribute(style::Attribute::Dim),
        style::Print(line),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}
