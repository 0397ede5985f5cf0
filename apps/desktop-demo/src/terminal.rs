//! Line-oriented renderer: one status row per painted frame, with the top of
//! the list underneath when the indicator overlaps it.

use std::io::{self, Write};

use pullrefresh_foundation::{IndicatorFrame, IndicatorRenderer, IndicatorStyle, RefreshState};

pub const LIST_LEN: usize = 100;

const VISIBLE_ROWS: usize = 3;
const ROW_HEIGHT: f32 = 20.0;

pub struct TerminalRenderer<W: Write> {
    out: W,
    elapsed_ms: u64,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, elapsed_ms: 0 }
    }

    pub fn set_elapsed_ms(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    pub fn print_list_header(&mut self) -> io::Result<()> {
        for index in 0..VISIBLE_ROWS {
            writeln!(self.out, "    {}", list_item(index))?;
        }
        writeln!(self.out, "    ... ({} items)", LIST_LEN)?;
        self.out.flush()
    }
}

pub fn list_item(index: usize) -> String {
    format!("I'm item {index}")
}

impl<W: Write> IndicatorRenderer for TerminalRenderer<W> {
    type Error = io::Error;

    fn paint(&mut self, frame: &IndicatorFrame, style: &IndicatorStyle) -> io::Result<()> {
        let label = match frame.state {
            RefreshState::Idle => "idle      ",
            RefreshState::Refreshing => "refreshing",
        };
        let glyph = if frame.position_y.value() < 0.0 {
            " "
        } else {
            style.image.as_text()
        };
        // Rows pushed down by the visible part of the indicator.
        let covered = ((frame.position_y.value() + frame.size.value()) / ROW_HEIGHT)
            .clamp(0.0, VISIBLE_ROWS as f32) as usize;
        writeln!(
            self.out,
            "{:>6.2}s {label} {glyph} y={:>6.1} rot={:>5.1}\u{b0} border={:.0} first row: {}",
            self.elapsed_ms as f64 / 1000.0,
            frame.position_y.value(),
            frame.rotation_deg,
            frame.border_width.value(),
            list_item(covered),
        )?;
        self.out.flush()
    }
}
