//! libbootsect — логика загрузочного сектора / boot sector logic
//!
//! Всё, что не требует реального BIOS: вычисление адресного контекста,
//! примитивы вывода, сценарий загрузки, правила образа, симулятор экрана.
//! Everything that does not need a real BIOS: addressing context computation,
//! display primitives, the boot script, image rules, a text-mode simulator.
//!
//! Использование / Usage:
//!   let report = sequence::run(&mut console, &BootConfig::DEFAULT, &BOOT_MESSAGE)?;

#![cfg_attr(not(test), no_std)]

pub mod attr;
pub mod config;
pub mod console;
pub mod display;
pub mod image;
pub mod layout;
pub mod message;
pub mod sequence;
pub mod sim;

use core::fmt;

pub use config::BootConfig;
pub use message::{Message, BOOT_MESSAGE};
pub use sequence::BootState;

/// Ошибки загрузчика / Boot errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Адрес загрузки не кратен параграфу / Load address not paragraph aligned
    MisalignedLoadAddress { address: u32 },
    /// Стек нулевого размера / Zero-sized stack
    EmptyStack,
    /// Вершина стека не помещается в 16-битное смещение
    /// Stack top does not fit a 16-bit offset
    StackOutOfSegment { offset: u32 },
    /// Stack runs into video/BIOS memory
    StackAboveConventionalMemory { top: u32 },
    /// Терминатор не найден в пределах лимита
    /// No terminator within the scan limit
    UnterminatedMessage { printed: usize },
    InvalidScanLimit,
    /// Шаг сценария вызван не по порядку / Boot step invoked out of order
    OutOfOrder { expected: BootState, actual: BootState },
    ImageTooLarge { len: usize },
    BadImageLength { len: usize },
    MissingSignature { found: [u8; 2] },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MisalignedLoadAddress { address } => {
                write!(f, "load address {:#x} is not 16-byte aligned", address)
            }
            Error::EmptyStack => write!(f, "stack size must not be zero"),
            Error::StackOutOfSegment { offset } => {
                write!(f, "stack top offset {:#x} does not fit in a 64 KiB segment", offset)
            }
            Error::StackAboveConventionalMemory { top } => {
                write!(f, "stack top {:#x} is above conventional memory", top)
            }
            Error::UnterminatedMessage { printed } => {
                write!(f, "no terminator found, {} characters printed", printed)
            }
            Error::InvalidScanLimit => write!(f, "scan limit must be at least 1"),
            Error::OutOfOrder { expected, actual } => {
                write!(f, "boot step requires state {:?}, current state is {:?}", expected, actual)
            }
            Error::ImageTooLarge { len } => {
                write!(f, "{} bytes of code do not fit into {} bytes", len, image::MAX_CODE_SIZE)
            }
            Error::BadImageLength { len } => {
                write!(f, "image is {} bytes, expected {}", len, image::SECTOR_SIZE)
            }
            Error::MissingSignature { found } => write!(
                f,
                "boot signature missing: found {:02x} {:02x}, expected 55 aa",
                found[0], found[1]
            ),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
