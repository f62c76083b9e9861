use crossterm::{
    cursor, queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Instant;

use super::compositor::Frame;
use super::{make_color, AppState, Canvas, MAX_IDLE};
use crate::driver::AnimationDriver;
use crate::error::AppResult;
use crate::input::thread::InputReceiver;

/// Rows reserved under the canvas for the HUD line.
pub const HUD_ROWS: u16 = 1;

/// Top-left terminal cell of a canvas centered in the terminal. Canvases
/// larger than the terminal are pinned to the top-left corner and clipped.
pub fn canvas_origin(canvas: Canvas, terminal_size: (u16, u16), reserved_rows: u16) -> (u16, u16) {
    let (cols, rows) = terminal_size;
    let usable_rows = rows.saturating_sub(reserved_rows);
    let width = u16::try_from(canvas.width()).unwrap_or(u16::MAX);
    let height = u16::try_from(canvas.height()).unwrap_or(u16::MAX);
    (
        cols.saturating_sub(width) / 2,
        usable_rows.saturating_sub(height) / 2,
    )
}

/// `colors` is `Some(use_truecolor)` to decorate glyphs, `None` for plain glyphs.
pub fn draw_frame(
    frame: &Frame,
    origin: (u16, u16),
    terminal_size: (u16, u16),
    colors: Option<bool>,
    stdout: &mut impl Write,
) -> io::Result<()> {
    let (cols, rows) = terminal_size;
    let visible_cols = (cols.saturating_sub(origin.0) as usize).min(frame.canvas().width());
    let mut last_fg: Option<[u8; 3]> = None;

    for (y, (glyphs, cell_colors)) in frame.rows().zip(frame.color_rows()).enumerate() {
        let Some(term_row) = u16::try_from(y).ok().and_then(|y| origin.1.checked_add(y)) else {
            break;
        };
        if term_row >= rows {
            break;
        }

        queue!(stdout, cursor::MoveTo(origin.0, term_row))?;
        for (&ch, &color) in glyphs.iter().zip(cell_colors).take(visible_cols) {
            if let (Some(use_truecolor), Some(rgb)) = (colors, color) {
                if last_fg != Some(rgb) {
                    queue!(stdout, SetForegroundColor(make_color(rgb, use_truecolor)))?;
                    last_fg = Some(rgb);
                }
            }
            queue!(stdout, Print(ch))?;
        }
    }

    Ok(())
}

pub fn render_frame(
    app_state: &mut AppState,
    terminal_size: (u16, u16),
    stdout: &mut impl Write,
) -> io::Result<()> {
    if app_state.needs_clear {
        queue!(stdout, ResetColor, terminal::Clear(ClearType::All))?;
        app_state.needs_clear = false;
    }

    let reserved = if app_state.show_hud { HUD_ROWS } else { 0 };
    if let Some(frame) = app_state.last_frame.as_ref() {
        let origin = canvas_origin(frame.canvas(), terminal_size, reserved);
        let colors = app_state.use_color.then_some(app_state.use_truecolor);
        draw_frame(frame, origin, terminal_size, colors, stdout)?;
    }

    if app_state.show_hud {
        super::hud::draw_hud(app_state, terminal_size, stdout)?;
    }

    queue!(stdout, ResetColor)?;
    stdout.flush()
}

fn record_frame_timing(app_state: &mut AppState, now: Instant) {
    let delta_time = now
        .duration_since(app_state.last_frame_time)
        .as_secs_f32()
        .max(1e-6);
    app_state.last_frame_time = now;

    let instant_fps = 1.0 / delta_time;
    app_state.fps = if app_state.fps <= 0.01 {
        instant_fps
    } else {
        0.90 * app_state.fps + 0.10 * instant_fps
    };
}

pub fn run_app_loop(
    app_state: &mut AppState,
    input_rx: &InputReceiver,
    stdout: &mut impl Write,
) -> AppResult<()> {
    let start = Instant::now();
    app_state.last_frame_time = start;
    app_state.last_frame = Some(app_state.driver.start(start));
    render_frame(app_state, terminal::size()?, stdout)?;

    loop {
        // Drain all pending input events -- never skip
        if crate::input::drain_input_events(app_state, input_rx)? {
            break;
        }
        if app_state.frame_budget_spent() {
            break;
        }

        let now = Instant::now();
        if let Some(frame) = app_state.driver.poll(now) {
            record_frame_timing(app_state, now);
            app_state.last_frame = Some(frame);
            render_frame(app_state, terminal::size()?, stdout)?;
        }

        let idle = app_state
            .driver
            .time_until_tick(Instant::now())
            .unwrap_or(MAX_IDLE)
            .min(MAX_IDLE);
        if !idle.is_zero() {
            std::thread::sleep(idle);
        }
    }

    app_state.driver.stop();
    Ok(())
}

// --- Plain output ---

pub fn write_plain_frame(frame: &Frame, out: &mut impl Write) -> io::Result<()> {
    for line in frame.lines() {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    out.flush()
}

/// Writes frames as bare text, one blank line between frames.
pub fn run_plain_loop(
    driver: &mut AnimationDriver,
    max_frames: Option<u64>,
    out: &mut impl Write,
) -> AppResult<()> {
    let first = driver.start(Instant::now());
    write_plain_frame(&first, out)?;

    while max_frames.map_or(true, |max| driver.frames_rendered() < max) {
        if let Some(frame) = driver.poll(Instant::now()) {
            write_plain_frame(&frame, out)?;
        }
        match driver.time_until_tick(Instant::now()) {
            Some(idle) if !idle.is_zero() => std::thread::sleep(idle),
            Some(_) => {}
            None => break,
        }
    }

    driver.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DonutConfig;
    use crate::render::compositor::{ColorPalette, Compositor};
    use crate::render::RenderState;
    use std::time::Duration;

    fn small_frame(rows: &[&str], palette: ColorPalette) -> Frame {
        let width = rows[0].chars().count();
        let canvas = Canvas::new(width, rows.len()).expect("canvas");
        let mut state = RenderState::new(canvas);
        state.glyphs = rows.iter().flat_map(|row| row.chars()).collect();
        Compositor::first(palette).compose(state)
    }

    #[test]
    fn canvas_is_centered_and_pinned_when_too_big() {
        let canvas = Canvas::reference();
        assert_eq!(canvas_origin(canvas, (120, 40), 0), (20, 9));
        assert_eq!(canvas_origin(canvas, (120, 40), 1), (20, 8));
        assert_eq!(canvas_origin(canvas, (60, 10), 1), (0, 0));
    }

    #[test]
    fn uncolored_draw_prints_glyphs_in_row_order() {
        let frame = small_frame(&["ab", "cd"], ColorPalette::reference());
        let mut out = Vec::new();
        draw_frame(&frame, (0, 0), (80, 24), None, &mut out).expect("draw");
        let text = String::from_utf8(out).expect("utf8");
        let a = text.find("ab").expect("first row");
        let c = text.find("cd").expect("second row");
        assert!(a < c);
        assert!(!text.contains("38;"), "no color codes expected: {text:?}");
    }

    #[test]
    fn uniform_color_is_set_once() {
        let frame = small_frame(&["xy", "zw"], ColorPalette::reference());
        let mut out = Vec::new();
        draw_frame(&frame, (0, 0), (80, 24), Some(true), &mut out).expect("draw");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches("38;2;255;255;255").count(), 1, "{text:?}");
    }

    #[test]
    fn draw_clips_to_the_terminal() {
        let frame = small_frame(&["abcd", "efgh", "ijkl"], ColorPalette::reference());
        let mut out = Vec::new();
        draw_frame(&frame, (0, 0), (2, 2), None, &mut out).expect("draw");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("ab") && text.contains("ef"));
        assert!(!text.contains('c') && !text.contains('i'));
    }

    #[test]
    fn plain_frames_are_bare_lines() {
        let frame = small_frame(&["a ", " b"], ColorPalette::reference());
        let mut out = Vec::new();
        write_plain_frame(&frame, &mut out).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "a \n b\n\n");
    }

    #[test]
    fn plain_loop_honours_the_frame_budget() {
        let config = DonutConfig {
            width: 20,
            height: 8,
            interval: Duration::from_millis(1),
            ..DonutConfig::default()
        };
        let mut driver = config.build_driver().expect("valid");
        let mut out = Vec::new();
        run_plain_loop(&mut driver, Some(3), &mut out).expect("plain loop");

        assert!(!driver.is_running());
        assert_eq!(driver.frames_rendered(), 3);
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 3 * (8 + 1));
    }

    #[test]
    fn render_frame_clears_once() {
        let mut app = AppState::new(DonutConfig::default().build_driver().expect("valid"));
        app.last_frame = Some(app.driver.start(Instant::now()));
        let mut out = Vec::new();
        render_frame(&mut app, (100, 30), &mut out).expect("render");
        assert!(!app.needs_clear);
        let first = String::from_utf8(out).expect("utf8");
        assert!(first.contains("\x1b[2J"));

        let mut out = Vec::new();
        render_frame(&mut app, (100, 30), &mut out).expect("render");
        let second = String::from_utf8(out).expect("utf8");
        assert!(!second.contains("\x1b[2J"));
    }
}
