//! Симулятор текстового режима BIOS / BIOS text-mode simulator
//!
//! Моделирует страницу 0 экрана 80×25 так, как её видит программа через
//! `int 0x10`: scroll/clear, set cursor, teletype.
//! Models page 0 of the 80×25 screen as a program sees it through `int 0x10`:
//! scroll/clear, set cursor, teletype.
//!
//! Телетайп / Teletype:
//!   0x07 BEL  — ничего не выводит / prints nothing
//!   0x08 BS   — курсор влево / cursor left
//!   0x0A LF   — строка вниз, прокрутка / next row, scroll
//!   0x0D CR   — столбец 0 / column 0
//!   прочее / other — символ в ячейку, атрибут ячейки сохраняется
//!                    character into the cell, the cell keeps its attribute

use core::fmt;

use crate::attr::Attribute;
use crate::console::{CursorPosition, FirmwareConsole, ScreenGeometry, Window};

const COLS: usize = ScreenGeometry::TEXT_80X25.cols as usize;
const ROWS: usize = ScreenGeometry::TEXT_80X25.rows as usize;

const BEL: u8 = 0x07;
const BS:  u8 = 0x08;
const LF:  u8 = 0x0A;
const CR:  u8 = 0x0D;

/// Ячейка экрана: символ + атрибут / Screen cell: character + attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch:   u8,
    pub attr: Attribute,
}

impl Cell {
    pub const BLANK: Self = Self { ch: b' ', attr: Attribute::DEFAULT };
}

/// Экран 80×25 со счётчиком вызовов / 80×25 screen with a call counter
#[derive(Clone)]
pub struct TextScreen {
    cells:  [[Cell; COLS]; ROWS],
    cursor: CursorPosition,
    calls:  usize,
}

impl Default for TextScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScreen {
    pub const GEOMETRY: ScreenGeometry = ScreenGeometry::TEXT_80X25;

    pub const fn new() -> Self {
        Self {
            cells:  [[Cell::BLANK; COLS]; ROWS],
            cursor: CursorPosition::ORIGIN,
            calls:  0,
        }
    }

    /// Screen filled with `ch` in `attr`, as if left over from earlier output.
    pub const fn filled(ch: u8, attr: Attribute) -> Self {
        Self {
            cells:  [[Cell { ch, attr }; COLS]; ROWS],
            cursor: CursorPosition::ORIGIN,
            calls:  0,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Число обращений к сервису / Number of service invocations so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Characters of one row with trailing blanks removed.
    pub fn row_bytes(&self, row: usize) -> impl Iterator<Item = u8> + '_ {
        let line = &self.cells[row];
        let end = line.iter().rposition(|c| c.ch != b' ').map_or(0, |i| i + 1);
        line[..end].iter().map(|c| c.ch)
    }

    pub fn row_matches(&self, row: usize, text: &[u8]) -> bool {
        self.row_bytes(row).eq(text.iter().copied())
    }

    fn scroll_up(&mut self, lines: usize, window: Window, attr: Attribute) {
        let top = window.top_left.row() as usize;
        let left = window.top_left.col() as usize;
        let bottom = (window.bottom_right.row() as usize).min(ROWS - 1);
        let right = (window.bottom_right.col() as usize).min(COLS - 1);
        if top > bottom || left > right {
            return;
        }

        let height = bottom - top + 1;
        // AL=0 или больше высоты окна — очистка / AL=0 or ≥ height clears
        let shift = if lines == 0 || lines >= height { height } else { lines };

        for row in top..=bottom {
            for col in left..=right {
                let src = row + shift;
                self.cells[row][col] = if src <= bottom {
                    self.cells[src][col]
                } else {
                    Cell { ch: b' ', attr }
                };
            }
        }
    }

    fn advance_line(&mut self) {
        let row = self.cursor.row() as usize + 1;
        if row >= ROWS {
            // Телетайп прокручивает с атрибутом последней строки
            // Teletype scrolls using the attribute of the last row
            let attr = self.cells[ROWS - 1][0].attr;
            self.scroll_up(1, Window::full(Self::GEOMETRY), attr);
            self.cursor = CursorPosition::new((ROWS - 1) as u8, 0);
        } else {
            self.cursor = CursorPosition::new(row as u8, 0);
        }
    }
}

impl FirmwareConsole for TextScreen {
    fn clear_window(&mut self, window: Window, attribute: Attribute) {
        self.calls += 1;
        self.scroll_up(0, window, attribute);
    }

    fn set_cursor(&mut self, page: u8, position: CursorPosition) {
        self.calls += 1;
        if page == 0 {
            self.cursor = position;
        }
    }

    fn write_char(&mut self, page: u8, byte: u8) {
        self.calls += 1;
        if page != 0 {
            return;
        }
        let (row, col) = (self.cursor.row(), self.cursor.col());
        match byte {
            BEL => {}
            BS => {
                if col > 0 {
                    self.cursor = CursorPosition::new(row, col - 1);
                }
            }
            CR => self.cursor = CursorPosition::new(row, 0),
            LF => {
                self.advance_line();
                self.cursor = CursorPosition::new(self.cursor.row(), col);
            }
            _ => {
                if self.cursor.is_on_screen(Self::GEOMETRY) {
                    self.cells[row as usize][col as usize].ch = byte;
                }
                if col as usize + 1 >= COLS {
                    self.advance_line();
                } else {
                    self.cursor = CursorPosition::new(row, col + 1);
                }
            }
        }
    }
}

impl fmt::Display for TextScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let ch = if cell.ch.is_ascii_graphic() || cell.ch == b' ' { cell.ch } else { b'.' };
                write!(f, "{}", ch as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Color;

    fn put(screen: &mut TextScreen, text: &[u8]) {
        for b in text {
            screen.write_char(0, *b);
        }
    }

    #[test]
    fn test_clear_sets_every_cell_and_keeps_cursor() {
        let mut screen = TextScreen::filled(b'#', Attribute::new(Color::Yellow, Color::Red));
        screen.set_cursor(0, CursorPosition::new(5, 6));
        let attr = Attribute::new(Color::White, Color::Blue);
        screen.clear_window(Window::full(TextScreen::GEOMETRY), attr);

        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(screen.cell(row, col), Cell { ch: b' ', attr });
            }
        }
        assert_eq!(screen.cursor(), CursorPosition::new(5, 6));
    }

    #[test]
    fn test_teletype_keeps_cell_attribute() {
        let mut screen = TextScreen::new();
        let attr = Attribute::new(Color::LightGreen, Color::Black);
        screen.clear_window(Window::full(TextScreen::GEOMETRY), attr);
        put(&mut screen, b"ok");
        assert_eq!(screen.cell(0, 0), Cell { ch: b'o', attr });
        assert_eq!(screen.cell(0, 1), Cell { ch: b'k', attr });
        assert_eq!(screen.cursor(), CursorPosition::new(0, 2));
    }

    #[test]
    fn test_teletype_wraps_at_column_80() {
        let mut screen = TextScreen::new();
        screen.set_cursor(0, CursorPosition::new(3, 79));
        put(&mut screen, b"AB");
        assert_eq!(screen.cell(3, 79).ch, b'A');
        assert_eq!(screen.cell(4, 0).ch, b'B');
        assert_eq!(screen.cursor(), CursorPosition::new(4, 1));
    }

    #[test]
    fn test_teletype_scrolls_at_last_row() {
        let mut screen = TextScreen::new();
        put(&mut screen, b"top");
        screen.set_cursor(0, CursorPosition::new(24, 0));
        put(&mut screen, b"bottom\r\n");
        assert!(screen.row_matches(23, b"bottom"));
        assert!(screen.row_matches(24, b""));
        assert!(screen.row_matches(0, b""));
        assert_eq!(screen.cursor(), CursorPosition::new(24, 0));
    }

    #[test]
    fn test_control_characters() {
        let mut screen = TextScreen::new();
        put(&mut screen, b"abc\x08X\x07");
        assert!(screen.row_matches(0, b"abX"));
        put(&mut screen, b"\rZ");
        assert!(screen.row_matches(0, b"ZbX"));
        put(&mut screen, b"\n");
        assert_eq!(screen.cursor(), CursorPosition::new(1, 1));
    }

    #[test]
    fn test_off_screen_cursor_drops_characters() {
        let mut screen = TextScreen::new();
        screen.set_cursor(0, CursorPosition::new(255, 0));
        put(&mut screen, b"X");
        for row in 0..ROWS {
            assert!(screen.row_matches(row, b""));
        }
        assert_eq!(screen.cursor(), CursorPosition::new(255, 1));
    }

    #[test]
    fn test_partial_scroll_window() {
        let mut screen = TextScreen::new();
        for row in 0..3u8 {
            screen.set_cursor(0, CursorPosition::new(row, 0));
            put(&mut screen, &[b'0' + row]);
        }
        let window = Window { top_left: CursorPosition::new(0, 0), bottom_right: CursorPosition::new(2, 79) };
        screen.scroll_up(1, window, Attribute::DEFAULT);
        assert!(screen.row_matches(0, b"1"));
        assert!(screen.row_matches(1, b"2"));
        assert!(screen.row_matches(2, b""));
    }

    #[test]
    fn test_other_pages_ignored() {
        let mut screen = TextScreen::new();
        screen.set_cursor(1, CursorPosition::new(9, 9));
        screen.write_char(1, b'X');
        assert_eq!(screen.cursor(), CursorPosition::ORIGIN);
        assert!(screen.row_matches(0, b""));
        assert_eq!(screen.calls(), 2);
    }

    #[test]
    fn test_render() {
        let mut screen = TextScreen::new();
        put(&mut screen, b"hi");
        let text = screen.to_string();
        assert_eq!(text.lines().count(), ROWS);
        assert!(text.starts_with("hi "));
        assert_eq!(text.lines().next().unwrap().len(), COLS);
    }
}
