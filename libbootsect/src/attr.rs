//! Атрибут символа текстового режима / Text-mode character attribute
//!
//! Формат байта / Byte layout (CGA/VGA):
//!
//!  Бит / Bit   Значение / Meaning
//!  ─────────────────────────────────
//!  0..2        Foreground blue/green/red
//!  3           Foreground intensity
//!  4..6        Background blue/green/red
//!  7           Blink (или яркий фон / or bright background)

use core::fmt;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attribute: u8 {
        const FG_BLUE   = 0x01;
        const FG_GREEN  = 0x02;
        const FG_RED    = 0x04;
        const FG_BRIGHT = 0x08;
        const BG_BLUE   = 0x10;
        const BG_GREEN  = 0x20;
        const BG_RED    = 0x40;
        const BLINK     = 0x80;
    }
}

impl Attribute {
    /// Светло-серый на чёрном / Light gray on black (0x07)
    pub const DEFAULT: Self = Self::new(Color::LightGray, Color::Black);

    /// Собрать атрибут из двух цветов / Build an attribute from two colours.
    ///
    /// A bright background colour lands in bit 7, which the firmware shows as
    /// blink unless blinking has been disabled.
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self::from_bits_retain(((background as u8) << 4) | foreground as u8)
    }

    pub const fn foreground(self) -> Color {
        Color::from_nibble(self.bits())
    }

    pub const fn background(self) -> Color {
        Color::from_nibble(self.bits() >> 4)
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({} on {})", self.bits(), self.foreground().name(), self.background().name())
    }
}

/// 16 цветов текстового режима / The 16 text-mode colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

impl Color {
    pub const ALL: [Color; 16] = [
        Color::Black, Color::Blue, Color::Green, Color::Cyan,
        Color::Red, Color::Magenta, Color::Brown, Color::LightGray,
        Color::DarkGray, Color::LightBlue, Color::LightGreen, Color::LightCyan,
        Color::LightRed, Color::Pink, Color::Yellow, Color::White,
    ];

    /// Младшие 4 бита → цвет / Low 4 bits → colour
    pub const fn from_nibble(value: u8) -> Self {
        Self::ALL[(value & 0x0F) as usize]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Black      => "black",
            Color::Blue       => "blue",
            Color::Green      => "green",
            Color::Cyan       => "cyan",
            Color::Red        => "red",
            Color::Magenta    => "magenta",
            Color::Brown      => "brown",
            Color::LightGray  => "light-gray",
            Color::DarkGray   => "dark-gray",
            Color::LightBlue  => "light-blue",
            Color::LightGreen => "light-green",
            Color::LightCyan  => "light-cyan",
            Color::LightRed   => "light-red",
            Color::Pink       => "pink",
            Color::Yellow     => "yellow",
            Color::White      => "white",
        }
    }

    /// Case-insensitive lookup by [`Color::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name().eq_ignore_ascii_case(name))
    }
}
