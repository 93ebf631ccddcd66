use crate::math::Rgb;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::Write;

/// One character cell of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Option<Rgb>,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: None,
    };
}

/// Character buffer with a per-cell depth buffer
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    z_buffer: Vec<f64>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (width as usize, height as usize);
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
            z_buffer: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Blanks every cell and resets the depth buffer
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.z_buffer.fill(f64::INFINITY);
    }

    /// Resizes to the new dimensions, clearing the contents
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = (width as usize, height as usize);
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
        self.z_buffer = vec![f64::INFINITY; width * height];
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// Plots a glyph if it is nearer than what the cell already holds.
    /// Returns whether the cell was written.
    pub fn plot(&mut self, col: usize, row: usize, depth: f64, glyph: char, color: Rgb) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }

        // Depth test
        let offset = row * self.width + col;
        if depth < self.z_buffer[offset] {
            self.z_buffer[offset] = depth;
            self.cells[offset] = Cell {
                glyph,
                color: Some(color),
            };
            true
        } else {
            false
        }
    }

    /// Writes text above everything plotted, clipped to the canvas
    pub fn draw_text(&mut self, col: usize, row: usize, text: &str, color: Rgb) {
        if row >= self.height {
            return;
        }
        for (i, glyph) in text.chars().enumerate() {
            let x = col + i;
            if x >= self.width {
                break;
            }
            let offset = row * self.width + x;
            self.z_buffer[offset] = f64::NEG_INFINITY;
            self.cells[offset] = Cell {
                glyph,
                color: Some(color),
            };
        }
    }

    /// Writes text centred horizontally on the given row
    pub fn draw_text_centered(&mut self, row: usize, text: &str, color: Rgb) {
        let len = text.chars().count();
        let col = self.width.saturating_sub(len) / 2;
        self.draw_text(col, row, text, color);
    }

    /// Canvas contents without colour, one line per row, trailing blanks trimmed
    pub fn to_plain_string(&self) -> String {
        if self.width == 0 {
            return String::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.glyph).collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Queues the whole canvas to a terminal, starting at the top-left cell
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current: Option<Rgb> = None;
        for row in 0..self.height {
            queue!(out, MoveTo(0, row as u16))?;
            for cell in (0..self.width).filter_map(|col| self.cell(col, row)) {
                if let Some(color) = cell.color {
                    if current != Some(color) {
                        queue!(
                            out,
                            SetForegroundColor(Color::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            })
                        )?;
                        current = Some(color);
                    }
                }
                queue!(out, Print(cell.glyph))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}
