//! Конфигурация загрузки / Boot configuration
//!
//! У загрузочного сектора нет источника конфигурации во время работы: всё
//! фиксируется при сборке в [`BootConfig::DEFAULT`]. Хост-утилита подменяет
//! поля из аргументов командной строки.
//! The boot sector has no runtime configuration source: everything is fixed at
//! build time in [`BootConfig::DEFAULT`]. The host tool overrides fields from
//! its command line.

use crate::attr::Attribute;
use crate::console::{CursorPosition, ScreenGeometry, DEFAULT_PAGE};
use crate::display::ScanLimit;
use crate::layout::BootLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    pub layout:     BootLayout,
    pub geometry:   ScreenGeometry,
    /// Атрибут очистки / Clear attribute
    pub attribute:  Attribute,
    /// Где начинается сообщение / Where the message starts
    pub origin:     CursorPosition,
    pub page:       u8,
    pub scan_limit: ScanLimit,
}

impl BootConfig {
    pub const DEFAULT: Self = Self {
        layout:     BootLayout::DEFAULT,
        geometry:   ScreenGeometry::TEXT_80X25,
        attribute:  Attribute::DEFAULT,
        origin:     CursorPosition::ORIGIN,
        page:       DEFAULT_PAGE,
        scan_limit: ScanLimit::DEFAULT,
    };
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
