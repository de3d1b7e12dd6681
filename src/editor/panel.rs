use std::io;

use crossterm::{cursor, queue, style};

use crate::renderer::to_ct_color;
use crate::scene::{Camera, EntryRef};

use super::state::{EditorState, Mode};
use super::ui::Layout;

/// One-line description of an entry for the scene list.
pub fn entry_summary(state: &EditorState, entry: EntryRef) -> String {
    match state.scene.bounds(entry) {
        Ok(b) => {
            let kind = match entry {
                EntryRef::Object(_) => "Object",
                EntryRef::Camera(_) => "Camera",
            };
            format!("{kind} ({},{}) {}×{}", b.x, b.y, b.width, b.height)
        }
        Err(_) => "(removed)".into(),
    }
}

pub fn render_right_panel(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &EditorState,
) -> anyhow::Result<()> {
    if layout.right_panel_width == 0 {
        return Ok(());
    }

    let panel_x = layout.canvas_x + layout.canvas_width;
    let pw = layout.right_panel_width;
    let cy = layout.canvas_y;
    let max_width = (pw - 3) as usize;

    for y in 0..layout.canvas_height {
        queue!(stdout, cursor::MoveTo(panel_x, cy + y), style::Print("\u{2502}"))?;
    }
    let title = match &state.mode {
        Mode::Confirm { .. } => "Confirm",
        Mode::OpenPath { .. } => "Load project",
        Mode::Normal => "Scene",
    };
    queue!(
        stdout,
        cursor::MoveTo(panel_x + 2, cy),
        style::SetAttribute(style::Attribute::Bold),
        style::Print(title),
        style::SetAttribute(style::Attribute::Reset),
        cursor::MoveTo(panel_x, cy + 1),
        style::Print("\u{253c}"),
        style::Print("\u{2500}".repeat(pw as usize - 1)),
    )?;

    if let Mode::Confirm { message, selected, .. } = &state.mode {
        let mut y = cy + 2;
        for chunk in message.chars().collect::<Vec<_>>().chunks(max_width.max(1)) {
            let line: String = chunk.iter().collect();
            queue!(stdout, cursor::MoveTo(panel_x + 2, y), style::Print(line))?;
            y += 1;
        }
        for (i, label) in ["Yes", "No"].iter().enumerate() {
            queue!(stdout, cursor::MoveTo(panel_x + 2, y + 1 + i as u16))?;
            if i == *selected {
                queue!(
                    stdout,
                    style::SetAttribute(style::Attribute::Reverse),
                    style::Print(format!("> {label}")),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
            } else {
                queue!(stdout, style::Print(format!("  {label}")))?;
            }
        }
        return Ok(());
    }

    if let Mode::OpenPath { input } = &state.mode {
        queue!(
            stdout,
            cursor::MoveTo(panel_x + 2, cy + 2),
            style::SetAttribute(style::Attribute::Dim),
            style::Print("Path:"),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        // Show the tail of long paths, with a block cursor after it.
        let chars: Vec<char> = input.chars().collect();
        let room = max_width.saturating_sub(1);
        let tail: String = chars[chars.len().saturating_sub(room)..].iter().collect();
        queue!(
            stdout,
            cursor::MoveTo(panel_x + 2, cy + 3),
            style::Print(tail),
            style::SetAttribute(style::Attribute::Reverse),
            style::Print(" "),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        return Ok(());
    }

    let entries = state.entries();
    if entries.is_empty() {
        queue!(
            stdout,
            cursor::MoveTo(panel_x + 2, cy + 2),
            style::SetAttribute(style::Attribute::Dim),
            style::Print("(empty scene)"),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        return Ok(());
    }

    // Keep the selection in view.
    let rows = layout.canvas_height.saturating_sub(2) as usize;
    let selected_idx = state
        .selection
        .and_then(|sel| entries.iter().position(|e| *e == sel));
    let scroll = match selected_idx {
        Some(i) if rows > 0 && i >= rows => i + 1 - rows,
        _ => 0,
    };

    for (row, (i, entry)) in entries.iter().enumerate().skip(scroll).take(rows).enumerate() {
        let y = cy + 2 + row as u16;
        let swatch = match entry {
            EntryRef::Object(h) => state.scene.object(*h).map(|o| ('■', o.color)),
            EntryRef::Camera(_) => Some(('□', Camera::COLOR)),
        };
        queue!(stdout, cursor::MoveTo(panel_x + 2, y))?;
        if let Some((ch, color)) = swatch {
            queue!(
                stdout,
                style::SetForegroundColor(to_ct_color(color)),
                style::Print(ch),
                style::ResetColor,
                style::Print(" "),
            )?;
        }
        let text: String = entry_summary(state, *entry)
            .chars()
            .take(max_width.saturating_sub(2))
            .collect();
        if Some(i) == selected_idx {
            queue!(
                stdout,
                style::SetAttribute(style::Attribute::Reverse),
                style::Print(text),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        } else {
            queue!(stdout, style::Print(text))?;
        }
    }

    Ok(())
}
