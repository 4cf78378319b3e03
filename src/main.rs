// SPDX-License-Identifier: MIT
//
// conio — interactive tour of the terminal control layer.
//
// Clears the screen, reports the viewport size and cursor read-back, draws
// the 16-color palette in both channels, then waits for a key. Logging goes
// to stderr (set RUST_LOG=debug to see swallowed platform errors), so run
// with `2>conio.log` to keep the screen clean.
//
// Layout:
//
//   row 0      size / cursor report
//   row 2..9   base hues: name in its own color, then a background swatch
//   row 11..18 bright hues, same shape
//   last row   key prompt

use std::io::{self, Write};
use std::process;

use conio_term::{Color, Terminal, TerminalBackend};

/// Column where the background swatches start.
const SWATCH_COL: u16 = 17;

/// Swatch width in cells.
const SWATCH_WIDTH: usize = 8;

/// Milliseconds to linger on each palette row while drawing.
const ROW_DELAY_MS: u64 = 30;

/// Print `text` and flush, so it lands before the next backend call.
fn put(text: &str) {
    let mut out = io::stdout().lock();
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        log::debug!("write failed: {err}");
    }
}

/// Restore cursor and colors if the tour panics mid-draw.
fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Ok(mut term) = Terminal::stdout() {
            term.set_colors(Color::RESET, Some(Color::RESET));
            term.show_cursor(true);
        }
        original(info);
    }));
}

/// Draw one name + swatch row per hue starting at `top`.
fn draw_palette<B: TerminalBackend>(term: &mut Terminal<B>, top: u16, bright: bool) {
    for (row, (name, base)) in (top..).zip(Color::NAMED) {
        let color = if bright { base.bright() } else { base };

        term.goto(1, row);
        term.set_colors(color, Some(Color::RESET));
        put(&format!("{}{name}", if bright { "bright " } else { "" }));

        term.goto(SWATCH_COL, row);
        term.set_colors(Color::RESET, Some(color));
        put(&" ".repeat(SWATCH_WIDTH));
        term.set_background(Color::RESET);

        term.pause(ROW_DELAY_MS);
    }
}

fn run<B: TerminalBackend>(term: &mut Terminal<B>) -> Option<u32> {
    term.show_cursor(false);
    term.clear();

    let size = term.dimensions();
    let cursor = term.position();
    term.goto(0, 0);
    put(&format!(
        "terminal {}x{}  cursor read-back ({}, {})",
        size.cols, size.rows, cursor.x, cursor.y
    ));

    draw_palette(term, 2, false);
    draw_palette(term, 11, true);

    term.set_colors(Color::RESET, Some(Color::RESET));
    term.goto(0, size.rows.saturating_sub(1));
    term.show_cursor(true);
    term.wait_key("press any key to exit ")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut term = match Terminal::from_env() {
        Ok(term) => term,
        Err(err) => {
            eprintln!("conio: {err}");
            process::exit(1);
        }
    };

    install_panic_hook();

    let key = run(&mut term);
    term.clear();
    match key {
        Some(code) => {
            log::info!("key code {code:#04x}");
            println!("key code {code} ({code:#04x})");
        }
        None => println!("no key read"),
    }
}
