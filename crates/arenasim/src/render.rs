//! # Snapshot Renderer
//!
//! Prints an arena as a grid of bracketed cells under a row of hex
//! addresses, folded to fit the terminal width.
//!
//! ```text
//!   0x00 0x01 0x02 0x03 0x04 0x05 ...
//!   [ 7] [ 2] [xx] [xx] [xx] [xx] ...
//!   ---
//!   Total blocks: 1 free; 4 used
//! ```
//!
//! Free cells are `--`, used cells `xx`. Boundary-tag blocks also show their
//! size fields (blue) and flag (green for free, red for used). Cells touched
//! by the last operation blink.

use std::fmt::Write as _;

use arenasim_core::boundary_tag::{FLAG_FREE, FLAG_USED, HEADER_WIDTH};
use arenasim_core::{CellState, Layout, Snapshot, TaggedBlock, Word};

/// Select Graphic Rendition codes used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sgr {
    Blink = 5,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
}

/// Formats snapshots for a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderer {
    /// Columns available.
    width: usize,
    /// Emit ANSI escape sequences.
    color: bool,
}

impl Renderer {
    /// Creates a renderer for `width` columns.
    #[must_use]
    pub const fn new(width: usize, color: bool) -> Self {
        Self { width, color }
    }

    /// Renders the grid and the block totals.
    #[must_use]
    pub fn render<W: Word>(&self, snapshot: &Snapshot<W>) -> String {
        let cells = self.cells(snapshot);
        let cell_width = Self::cell_width(cells.len());
        let row = Self::row_len(cells.len(), cell_width, self.width);

        let headers: Vec<String> = (0..cells.len())
            .map(|address| format!("{address:#0cell_width$x}"))
            .collect();

        let mut out = String::new();
        for (header, cells) in headers.chunks(row).zip(cells.chunks(row)) {
            let _ = writeln!(out, "{}", header.join(" "));
            let _ = writeln!(out, "{}", cells.join(" "));
        }

        let _ = writeln!(
            out,
            "---\nTotal blocks: {} free; {} used",
            self.paint(&snapshot.free_blocks().to_string(), &[Sgr::Green]),
            self.paint(&snapshot.used_blocks().to_string(), &[Sgr::Red]),
        );
        out
    }

    /// One formatted cell per arena unit.
    fn cells<W: Word>(&self, snapshot: &Snapshot<W>) -> Vec<String> {
        let width = Self::cell_width(snapshot.capacity.to_usize()) - 2;
        let touched = |address: usize| {
            let start = snapshot.touched.start.to_usize();
            let end = snapshot.touched.end.to_usize();
            (start..end).contains(&address)
        };

        match &snapshot.layout {
            Layout::Cells { cells, .. } => cells
                .iter()
                .enumerate()
                .map(|(address, &cell)| self.usable_cell(cell, touched(address), width))
                .collect(),
            Layout::Tagged(blocks) => blocks
                .iter()
                .flat_map(|block| self.tagged_cells(block, &touched, width))
                .collect(),
        }
    }

    fn tagged_cells<W: Word>(
        &self,
        block: &TaggedBlock<W>,
        touched: &impl Fn(usize) -> bool,
        width: usize,
    ) -> Vec<String> {
        let (flag, flag_color) = if block.state.is_free() {
            (FLAG_FREE, Sgr::Green)
        } else {
            (FLAG_USED, Sgr::Red)
        };
        let usable_start = block.address.to_usize() + usize::from(HEADER_WIDTH);

        let mut cells = Vec::with_capacity(block.usable.len() + 3);
        cells.push(self.cell(&block.size.to_string(), &[Sgr::Blue], width));
        cells.push(self.cell(&flag.to_string(), &[flag_color], width));
        cells.extend(
            block
                .usable
                .iter()
                .enumerate()
                .map(|(offset, &cell)| self.usable_cell(cell, touched(usable_start + offset), width)),
        );
        cells.push(self.cell(&block.trailing_size.to_string(), &[Sgr::Blue], width));
        cells
    }

    fn usable_cell(&self, cell: CellState, touched: bool, width: usize) -> String {
        let (text, mut style) = match cell {
            CellState::Used => ("xx", vec![Sgr::Yellow]),
            CellState::Free => ("--", Vec::new()),
        };
        if !touched {
            return self.cell(text, &style, width);
        }
        if self.color {
            style.push(Sgr::Blink);
            return self.cell(text, &style, width);
        }
        // Without escapes the touched range needs its own glyphs.
        let marked = match cell {
            CellState::Used => "##",
            CellState::Free => "..",
        };
        self.cell(marked, &style, width)
    }

    fn cell(&self, value: &str, style: &[Sgr], width: usize) -> String {
        let text: String = value.chars().take(width).collect();
        let padded = format!("{text:>width$}");
        format!("[{}]", self.paint(&padded, style))
    }

    fn paint(&self, text: &str, style: &[Sgr]) -> String {
        if !self.color || style.is_empty() {
            return text.to_string();
        }
        let codes: Vec<String> = style.iter().map(|&sgr| (sgr as u8).to_string()).collect();
        format!("\x1b[{}m{text}\x1b[0m", codes.join(";"))
    }

    /// Characters per cell: wide enough for `0x` plus the largest address.
    fn cell_width(cells: usize) -> usize {
        let last = cells.saturating_sub(1);
        let digits = (usize::BITS - last.leading_zeros()).div_ceil(4).max(2);
        2 + digits as usize
    }

    /// Cells per row: the whole arena if it fits, otherwise halve until the
    /// row fits or a single cell per row remains.
    fn row_len(cells: usize, cell_width: usize, width: usize) -> usize {
        if cells == 0 {
            return 1;
        }
        let needed = cell_width * cells + cells - 1;
        let mut divisor = 1;
        while divisor <= cells {
            if needed / divisor <= width {
                return (cells / divisor).max(1);
            }
            divisor *= 2;
        }
        cells
    }
}
