//! Примитивы вывода / Display primitives
//!
//!   clear_screen          — очистить 80×25 атрибутом / blank 80×25 with an attribute
//!   set_cursor_position   — курсор на (row, col), страница 0 / cursor to (row, col), page 0
//!   print_string          — байты до первого нуля / bytes up to the first zero
//!
//! Каждый примитив делает ровно те вызовы прошивки, что описаны, и ничего не
//! проверяет у неё в ответ.
//! Each primitive issues exactly the firmware calls described and checks
//! nothing coming back.

use core::num::NonZeroUsize;

use crate::attr::Attribute;
use crate::console::{CursorPosition, FirmwareConsole, ScreenGeometry, Window};
use crate::{Error, Result};

/// Ограничитель длины сканирования / Maximum scan length guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimit(NonZeroUsize);

impl ScanLimit {
    /// Длиннее образа сообщение быть не может / Nothing longer fits in the image
    pub const DEFAULT: Self = match NonZeroUsize::new(crate::image::SECTOR_SIZE) {
        Some(n) => Self(n),
        None => unreachable!(),
    };

    pub fn new(limit: usize) -> Result<Self> {
        NonZeroUsize::new(limit).map(Self).ok_or(Error::InvalidScanLimit)
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ScanLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Очистить весь экран одним вызовом scroll/clear.
/// Clear the whole screen with one scroll/clear call.
///
/// The cursor is left wherever the firmware leaves it.
pub fn clear_screen<C: FirmwareConsole>(console: &mut C, geometry: ScreenGeometry, attribute: Attribute) {
    let window = Window::full(geometry);
    log::debug!("clear-screen: window={:?} attribute={}", window, attribute);
    console.clear_window(window, attribute);
}

/// Переместить курсор. Координаты не проверяются.
/// Move the cursor. Coordinates are forwarded unchecked.
pub fn set_cursor_position<C: FirmwareConsole>(console: &mut C, page: u8, position: CursorPosition) {
    log::debug!("set-cursor-position: page={} position={:?}", page, position);
    console.set_cursor(page, position);
}

/// Вывести байты до первого нуля, по одному вызову на символ.
/// Print bytes up to the first zero, one firmware call per character.
///
/// Returns the number of characters emitted. If no zero shows up within
/// `limit` bytes, exactly `limit` characters have been emitted and
/// [`Error::UnterminatedMessage`] is returned.
pub fn print_string<C: FirmwareConsole>(
    console: &mut C,
    page: u8,
    message: &[u8],
    limit: ScanLimit,
) -> Result<usize> {
    print_bytes(console, page, message.iter().copied(), limit)
}

/// [`print_string`] over any byte source. Nothing after the terminator is pulled.
///
/// A source that runs dry before a zero is treated like one that hits the limit:
/// the scan found no terminator.
pub fn print_bytes<C, I>(console: &mut C, page: u8, bytes: I, limit: ScanLimit) -> Result<usize>
where
    C: FirmwareConsole,
    I: IntoIterator<Item = u8>,
{
    let mut bytes = bytes.into_iter();
    let mut printed = 0;

    while printed < limit.get() {
        match bytes.next() {
            Some(0) => {
                log::debug!("print-string: {} characters", printed);
                return Ok(printed);
            }
            Some(byte) => {
                log::trace!("teletype {:#04x}", byte);
                console.write_char(page, byte);
                printed += 1;
            }
            None => break,
        }
    }

    log::warn!("print-string: no terminator after {} bytes", printed);
    Err(Error::UnterminatedMessage { printed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{VideoRequest, VideoService};
    use crate::sim::TextScreen;
    use core::cell::Cell;

    #[derive(Default)]
    struct RecordingConsole {
        calls: Vec<VideoRequest>,
    }

    impl VideoService for RecordingConsole {
        fn call(&mut self, request: VideoRequest) {
            self.calls.push(request);
        }
    }

    fn teletype(byte: u8) -> VideoRequest {
        VideoRequest::Teletype { byte, page: 0, color: 0 }
    }

    #[test]
    fn test_clear_screen_single_call() {
        let mut console = RecordingConsole::default();
        clear_screen(&mut console, ScreenGeometry::TEXT_80X25, Attribute::DEFAULT);
        assert_eq!(
            console.calls,
            vec![VideoRequest::ScrollUp {
                lines: 0,
                attribute: Attribute::DEFAULT,
                window: Window {
                    top_left: CursorPosition::new(0, 0),
                    bottom_right: CursorPosition::new(24, 79),
                },
            }]
        );
    }

    #[test]
    fn test_clear_screen_blanks_every_cell() {
        let mut screen = TextScreen::new();
        for b in b"garbage left over from the BIOS banner" {
            screen.write_char(0, *b);
        }
        clear_screen(&mut screen, ScreenGeometry::TEXT_80X25, Attribute::DEFAULT);
        for row in 0..25 {
            for col in 0..80 {
                let cell = screen.cell(row, col);
                assert_eq!(cell.ch, b' ');
                assert_eq!(cell.attr, Attribute::DEFAULT);
            }
        }
    }

    #[test]
    fn test_print_hi_emits_two_chars_and_stops_at_terminator() {
        let buffer = [b'H', b'i', 0, b'!', b'!'];
        let reads = Cell::new(0usize);
        let mut console = RecordingConsole::default();

        let source = buffer.iter().copied().inspect(|_| reads.set(reads.get() + 1));
        let printed = print_bytes(&mut console, 0, source, ScanLimit::DEFAULT).unwrap();

        assert_eq!(printed, 2);
        assert_eq!(console.calls, vec![teletype(b'H'), teletype(b'i')]);
        // индексы 0, 1, 2 — и ни байтом дальше / indices 0, 1, 2 and no further
        assert_eq!(reads.get(), 3);
    }

    #[test]
    fn test_print_exactly_n_characters() {
        let mut buffer = [b'x'; 64];
        for n in [0, 1, 17, 63] {
            buffer[n] = 0;
            let mut console = RecordingConsole::default();
            let printed = print_string(&mut console, 0, &buffer, ScanLimit::DEFAULT).unwrap();
            assert_eq!(printed, n);
            assert_eq!(console.calls.len(), n);
            buffer[n] = b'x';
        }
    }

    #[test]
    fn test_print_stops_at_scan_limit() {
        let mut console = RecordingConsole::default();
        let limit = ScanLimit::new(4).unwrap();
        let err = print_string(&mut console, 0, b"unterminated", limit).unwrap_err();
        assert_eq!(err, Error::UnterminatedMessage { printed: 4 });
        assert_eq!(
            console.calls,
            vec![teletype(b'u'), teletype(b'n'), teletype(b't'), teletype(b'e')]
        );
    }

    #[test]
    fn test_print_short_slice_without_terminator() {
        let mut console = RecordingConsole::default();
        let err = print_string(&mut console, 0, b"ab", ScanLimit::DEFAULT).unwrap_err();
        assert_eq!(err, Error::UnterminatedMessage { printed: 2 });
        assert_eq!(err.to_string(), "no terminator found, 2 characters printed");
        assert_eq!(console.calls.len(), 2);
    }

    #[test]
    fn test_scan_limit_rejects_zero() {
        assert_eq!(ScanLimit::new(0), Err(Error::InvalidScanLimit));
        assert_eq!(ScanLimit::DEFAULT.get(), 512);
    }

    #[test]
    fn test_cursor_then_print_lands_at_position() {
        let mut screen = TextScreen::new();
        clear_screen(&mut screen, ScreenGeometry::TEXT_80X25, Attribute::DEFAULT);
        set_cursor_position(&mut screen, 0, CursorPosition::new(7, 33));
        print_string(&mut screen, 0, b"Q\0", ScanLimit::DEFAULT).unwrap();
        assert_eq!(screen.cell(7, 33).ch, b'Q');
        assert_eq!(screen.cursor(), CursorPosition::new(7, 34));
    }

    #[test]
    fn test_out_of_range_cursor_forwarded_unchecked() {
        let mut console = RecordingConsole::default();
        set_cursor_position(&mut console, 0, CursorPosition::new(255, 200));
        assert_eq!(
            console.calls,
            vec![VideoRequest::SetCursor { page: 0, position: CursorPosition::new(255, 200) }]
        );
        assert_eq!(console.calls[0].registers().dx, 0xFFC8);
    }
}
