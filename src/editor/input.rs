use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::matches_binding;
use crate::scene::EntryRef;

use super::state::{ConfirmAction, Drag, EditorState, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Play,
    Quit,
    ToggleFullscreen,
}

pub fn handle_event(state: &mut EditorState, event: Event) -> Action {
    match event {
        Event::Key(key) => handle_key(state, key),
        Event::Mouse(mouse) => handle_mouse(state, mouse),
        Event::Resize(_, _) => Action::Redraw,
        _ => Action::Continue,
    }
}

fn handle_key(state: &mut EditorState, key: KeyEvent) -> Action {
    // Global shortcut: works from any mode
    if matches_binding(&state.config.key_bindings.fullscreen, &key) {
        return Action::ToggleFullscreen;
    }

    match &state.mode {
        Mode::Normal => handle_normal(state, key),
        Mode::Confirm { .. } => handle_confirm(state, key),
        Mode::OpenPath { .. } => handle_open_path(state, key),
    }
}

fn handle_normal(state: &mut EditorState, key: KeyEvent) -> Action {
    let bindings = state.config.key_bindings.clone();

    if matches_binding(&bindings.quit, &key) {
        if state.dirty {
            state.mode = Mode::Confirm {
                message: "Unsaved changes! Quit anyway?".into(),
                selected: 1,
                action: ConfirmAction::Quit,
            };
            return Action::Redraw;
        }
        return Action::Quit;
    }
    if matches_binding(&bindings.save, &key) {
        if let Err(e) = state.save() {
            state.status_message = Some(format!("Save failed: {e:#}"));
        }
        return Action::Redraw;
    }
    if matches_binding(&bindings.play, &key) {
        if state.scene.camera_count() == 0 {
            state.status_message = Some("Add a camera before playing".into());
            return Action::Redraw;
        }
        state.drag = None;
        return Action::Play;
    }
    if matches_binding(&bindings.add_object, &key) {
        state.add_object();
        return Action::Redraw;
    }
    if matches_binding(&bindings.add_camera, &key) {
        state.add_camera();
        return Action::Redraw;
    }
    if matches_binding(&bindings.select_next, &key) {
        state.select_step(true);
        return Action::Redraw;
    }
    if matches_binding(&bindings.select_prev, &key) {
        state.select_step(false);
        return Action::Redraw;
    }
    if matches_binding(&bindings.recolor, &key) {
        state.recolor_selection();
        return Action::Redraw;
    }
    if matches_binding(&bindings.new_project, &key) {
        state.mode = Mode::Confirm {
            message: "Discard the scene and start over?".into(),
            selected: 1,
            action: ConfirmAction::NewProject,
        };
        return Action::Redraw;
    }
    if matches_binding(&bindings.load, &key) {
        state.mode = Mode::OpenPath {
            input: state.file_path.display().to_string(),
        };
        return Action::Redraw;
    }
    if matches_binding(&bindings.delete, &key) {
        if let Some(entry) = state.selection {
            state.mode = Mode::Confirm {
                message: format!("Delete {entry}?"),
                selected: 0,
                action: ConfirmAction::Delete(entry),
            };
        }
        return Action::Redraw;
    }
    if matches_binding(&bindings.cancel, &key) {
        state.selection = None;
        state.status_message = None;
        return Action::Redraw;
    }

    let (dx, dy) = match key.code {
        KeyCode::Right => (1, 0),
        KeyCode::Left => (-1, 0),
        KeyCode::Down => (0, 1),
        KeyCode::Up => (0, -1),
        _ => return Action::Continue,
    };

    match state.selection {
        // Shift+Arrow: grow/shrink from the right/bottom edge
        Some(_) if key.modifiers.contains(KeyModifiers::SHIFT) => state.resize_selection(dx, dy),
        Some(_) => state.nudge_selection(dx, dy),
        // Nothing selected: arrows scroll the canvas.
        None => {
            let (sx, sy) = state.config.canvas_scale.step();
            state.view_origin.x = state.view_origin.x.saturating_add(dx.saturating_mul(sx));
            state.view_origin.y = state.view_origin.y.saturating_add(dy.saturating_mul(sy));
        }
    }
    Action::Redraw
}

fn handle_confirm(state: &mut EditorState, key: KeyEvent) -> Action {
    let (selected, action) = match &state.mode {
        Mode::Confirm { selected, action, .. } => (*selected, action.clone()),
        _ => return Action::Continue,
    };

    let bindings = &state.config.key_bindings;
    if matches_binding(&bindings.confirm, &key) {
        if selected == 0 {
            return confirm(state, action);
        }
        state.mode = Mode::Normal;
        return Action::Redraw;
    }
    if matches_binding(&bindings.cancel, &key) {
        state.mode = Mode::Normal;
        return Action::Redraw;
    }

    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            if let Mode::Confirm { selected: sel, .. } = &mut state.mode {
                *sel = 1 - selected;
            }
            Action::Redraw
        }
        KeyCode::Char('y') => confirm(state, action),
        KeyCode::Char('n') => {
            state.mode = Mode::Normal;
            Action::Redraw
        }
        _ => Action::Continue,
    }
}

/// Line editing for the load prompt. Enter and Esc are fixed here so that
/// any character can be typed into the path.
fn handle_open_path(state: &mut EditorState, key: KeyEvent) -> Action {
    let Mode::OpenPath { input } = &mut state.mode else {
        return Action::Continue;
    };

    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            input.push(c);
            Action::Redraw
        }
        KeyCode::Backspace => {
            input.pop();
            Action::Redraw
        }
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            Action::Redraw
        }
        KeyCode::Enter => {
            let path = PathBuf::from(input.trim());
            if path.as_os_str().is_empty() {
                state.mode = Mode::Normal;
            } else if state.dirty {
                state.mode = Mode::Confirm {
                    message: "Unsaved changes! Load anyway?".into(),
                    selected: 1,
                    action: ConfirmAction::Load(path),
                };
            } else {
                state.mode = Mode::Normal;
                state.load(&path);
            }
            Action::Redraw
        }
        _ => Action::Continue,
    }
}

fn confirm(state: &mut EditorState, action: ConfirmAction) -> Action {
    state.mode = Mode::Normal;
    match action {
        ConfirmAction::Delete(entry) => state.delete(entry),
        ConfirmAction::NewProject => state.new_project(),
        ConfirmAction::Load(path) => state.load(&path),
        ConfirmAction::Quit => return Action::Quit,
    }
    Action::Redraw
}

fn handle_mouse(state: &mut EditorState, mouse: MouseEvent) -> Action {
    if state.mode != Mode::Normal {
        return Action::Continue;
    }
    let point = state.cell_to_world(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(p) = point else {
                return Action::Continue;
            };
            state.last_pointer = Some(p);
            match state.scene.hit_test(p) {
                Some(object) => {
                    let origin = state.scene.bounds(object).map(|b| b.origin());
                    if let Ok(origin) = origin {
                        state.drag = Some(Drag {
                            object,
                            grab: (p.x - origin.x, p.y - origin.y),
                        });
                        state.selection = Some(EntryRef::Object(object));
                    }
                }
                None => {
                    state.drag = None;
                    state.selection = None;
                }
            }
            Action::Redraw
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let (Some(p), Some(drag)) = (point, state.drag) else {
                return Action::Continue;
            };
            state.last_pointer = Some(p);
            let moved = state.scene.move_to(
                drag.object,
                p.x.saturating_sub(drag.grab.0),
                p.y.saturating_sub(drag.grab.1),
            );
            match moved {
                Ok(()) => state.dirty = true,
                Err(e) => {
                    state.drag = None;
                    state.status_message = Some(e.to_string());
                }
            }
            Action::Redraw
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.drag = None;
            Action::Continue
        }
        MouseEventKind::Moved => {
            if point.is_some() {
                state.last_pointer = point;
            }
            Action::Continue
        }
        _ => Action::Continue,
    }
}
