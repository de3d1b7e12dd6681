use std::io::Write;

use crossterm::{cursor, queue, style, terminal};

/// A key hint: the key is printed bold inside brackets, the label dim.
pub type Hint<'a> = (&'a str, &'a str);

/// Clear row `y` and print `hints` across it.
pub fn render_hints(out: &mut impl Write, y: u16, hints: &[Hint<'_>]) -> anyhow::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            queue!(out, style::Print("  "))?;
        }
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(format!("[{key}]")),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        if !label.is_empty() {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(format!(" {label}")),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
    }
    Ok(())
}
