//! Консольный сервис BIOS / BIOS console service (int 0x10)
//!
//! Используемые функции / Functions in use:
//!   AH=06h  scroll up window   (AL=0 → очистить окно / clear window)
//!   AH=02h  set cursor position
//!   AH=0Eh  teletype output
//!
//! Сервис — внешний коллаборатор: на железе его реализует драйвер в `boot/`,
//! в тестах — [`crate::sim::TextScreen`] или записывающий фейк.
//! The service is an external collaborator: the `boot/` driver implements it
//! on hardware, [`crate::sim::TextScreen`] or a recording fake in tests.

use core::fmt;

use crate::attr::Attribute;

/// Номер прерывания видеосервиса / Video service interrupt vector
pub const VIDEO_INTERRUPT: u8 = 0x10;

pub const FN_SET_CURSOR: u8 = 0x02;
pub const FN_SCROLL_UP:  u8 = 0x06;
pub const FN_TELETYPE:   u8 = 0x0E;

/// Единственная используемая страница / The only display page in use
pub const DEFAULT_PAGE: u8 = 0;

/// Размер текстового экрана / Text screen geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub cols: u8,
    pub rows: u8,
}

impl ScreenGeometry {
    pub const TEXT_80X25: Self = Self { cols: 80, rows: 25 };
}

/// Позиция курсора: старший байт — строка, младший — столбец (как в DX).
/// Cursor position: high byte row, low byte column (the DX layout).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CursorPosition(u16);

impl CursorPosition {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(row: u8, col: u8) -> Self {
        Self(((row as u16) << 8) | col as u16)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    pub const fn row(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn col(self) -> u8 {
        self.0 as u8
    }

    /// `false` for positions the firmware would have to clip or ignore.
    pub const fn is_on_screen(self, geometry: ScreenGeometry) -> bool {
        self.row() < geometry.rows && self.col() < geometry.cols
    }
}

impl fmt::Debug for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Прямоугольник экрана, границы включительно.
/// Screen rectangle, inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub top_left:     CursorPosition,
    pub bottom_right: CursorPosition,
}

impl Window {
    /// Весь экран / The whole screen: rows 0..=rows-1, cols 0..=cols-1
    pub const fn full(geometry: ScreenGeometry) -> Self {
        Self {
            top_left:     CursorPosition::ORIGIN,
            bottom_right: CursorPosition::new(geometry.rows - 1, geometry.cols - 1),
        }
    }
}

/// Консольный сервис прошивки — три операции, без кодов возврата.
/// Firmware console service: three operations, no status returned.
///
/// Every call is synchronous and fire-and-forget: an implementation that
/// fails produces no visible effect and the caller cannot tell.
pub trait FirmwareConsole {
    /// AH=06h, AL=0: заполнить окно пробелами с атрибутом / blank the window.
    fn clear_window(&mut self, window: Window, attribute: Attribute);

    /// AH=02h: позиция курсора не проверяется / position is not validated.
    fn set_cursor(&mut self, page: u8, position: CursorPosition);

    /// AH=0Eh: вывести байт и сдвинуть курсор / emit a byte, advance cursor.
    fn write_char(&mut self, page: u8, byte: u8);
}

// ── Регистры вызова / Call registers ─────────────────────────────────────────

/// Значения AX/BX/CX/DX для `int 0x10` / AX/BX/CX/DX values for `int 0x10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
}

impl Registers {
    pub const fn ah(&self) -> u8 {
        (self.ax >> 8) as u8
    }

    pub const fn al(&self) -> u8 {
        self.ax as u8
    }

    pub const fn bh(&self) -> u8 {
        (self.bx >> 8) as u8
    }

    pub const fn bl(&self) -> u8 {
        self.bx as u8
    }
}

const fn pair(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Один запрос к видеосервису / One video service request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoRequest {
    /// lines = 0 очищает окно / lines = 0 clears the window
    ScrollUp { lines: u8, attribute: Attribute, window: Window },
    SetCursor { page: u8, position: CursorPosition },
    /// `color` используется только в графических режимах
    /// `color` only matters in graphics modes
    Teletype { byte: u8, page: u8, color: u8 },
}

impl VideoRequest {
    pub const fn clear(window: Window, attribute: Attribute) -> Self {
        VideoRequest::ScrollUp { lines: 0, attribute, window }
    }

    pub const fn function(&self) -> u8 {
        match self {
            VideoRequest::ScrollUp { .. }  => FN_SCROLL_UP,
            VideoRequest::SetCursor { .. } => FN_SET_CURSOR,
            VideoRequest::Teletype { .. }  => FN_TELETYPE,
        }
    }

    /// Кодировка регистров по спецификации BIOS.
    /// Register encoding per the BIOS interface.
    pub const fn registers(&self) -> Registers {
        match *self {
            VideoRequest::ScrollUp { lines, attribute, window } => Registers {
                ax: pair(FN_SCROLL_UP, lines),
                bx: pair(attribute.bits(), 0),
                cx: window.top_left.as_u16(),
                dx: window.bottom_right.as_u16(),
            },
            VideoRequest::SetCursor { page, position } => Registers {
                ax: pair(FN_SET_CURSOR, 0),
                bx: pair(page, 0),
                cx: 0,
                dx: position.as_u16(),
            },
            VideoRequest::Teletype { byte, page, color } => Registers {
                ax: pair(FN_TELETYPE, byte),
                bx: pair(page, color),
                cx: 0,
                dx: 0,
            },
        }
    }
}

/// Адаптер: любая реализация, умеющая исполнить запрос, — консоль.
/// Adapter: anything that can execute a raw request is a console.
pub trait VideoService {
    fn call(&mut self, request: VideoRequest);
}

impl<S: VideoService> FirmwareConsole for S {
    fn clear_window(&mut self, window: Window, attribute: Attribute) {
        self.call(VideoRequest::clear(window, attribute));
    }

    fn set_cursor(&mut self, page: u8, position: CursorPosition) {
        self.call(VideoRequest::SetCursor { page, position });
    }

    fn write_char(&mut self, page: u8, byte: u8) {
        self.call(VideoRequest::Teletype { byte, page, color: 0 });
    }
}
