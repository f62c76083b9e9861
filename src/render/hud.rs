use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
};
use std::fmt::Write as _;
use std::io::{self, Write};

use super::{make_color, AppState};

fn truncate_and_pad_in_place(text: &mut String, width: usize) {
    if width == 0 {
        text.clear();
        return;
    }

    let mut seen_chars = 0usize;
    let mut truncate_byte = None;
    for (idx, _) in text.char_indices() {
        if seen_chars == width {
            truncate_byte = Some(idx);
            break;
        }
        seen_chars += 1;
    }

    if let Some(idx) = truncate_byte {
        text.truncate(idx);
    } else {
        for _ in seen_chars..width {
            text.push(' ');
        }
    }
}

pub fn format_hud(app_state: &mut AppState, width: usize) -> io::Result<()> {
    let rotation = app_state.driver.rotation();
    let canvas = app_state.driver.renderer().canvas();
    let drawn = app_state
        .last_frame
        .as_ref()
        .map_or(0, |frame| frame.drawn_cells());

    let hud = &mut app_state.hud_string_buf;
    hud.clear();
    write!(
        hud,
        "FPS:{:>5.1}  Frame:{}  A:{:>7.2}  B:{:>7.2}  Cells:{}/{}  Canvas:{}x{}  Tab:HUD  Q/Esc:Quit",
        app_state.fps,
        app_state.driver.frames_rendered(),
        rotation.a,
        rotation.b,
        drawn,
        canvas.len(),
        canvas.width(),
        canvas.height(),
    )
    .map_err(|_| io::Error::other("failed to format HUD"))?;
    truncate_and_pad_in_place(hud, width);
    Ok(())
}

/// Draws the status line on the last terminal row.
pub fn draw_hud(
    app_state: &mut AppState,
    terminal_size: (u16, u16),
    stdout: &mut impl Write,
) -> io::Result<()> {
    let (cols, rows) = terminal_size;
    if rows == 0 {
        return Ok(());
    }
    format_hud(app_state, cols as usize)?;

    let tc = app_state.use_truecolor;
    queue!(
        stdout,
        cursor::MoveTo(0, rows - 1),
        SetBackgroundColor(make_color([0, 0, 0], tc)),
        SetForegroundColor(make_color([220, 220, 220], tc)),
        Print(app_state.hud_string_buf.as_str())
    )?;

    Ok(())
}
