//! BIOS video service — int 0x10
//!
//! Консоль прошивки — синглтон на весь процесс; держим её за spin::Mutex,
//! хотя спорить за неё некому.
//! The firmware console is a process-wide singleton; it sits behind a
//! spin::Mutex even though nothing contends for it.

use core::arch::asm;

use libbootsect::console::{Registers, VideoRequest, VideoService, VIDEO_INTERRUPT};
use spin::Mutex;

const _: () = assert!(VIDEO_INTERRUPT == 0x10);

/// Видеосервис BIOS / BIOS video service
pub struct BiosVideo;

impl BiosVideo {
    /// Выполнить `int 0x10` с заданными регистрами. Флаги не проверяются.
    /// Issue `int 0x10` with the given registers. Flags are not checked.
    ///
    /// Некоторые BIOS портят BP/SI/DI — сохраняем их вокруг вызова.
    /// Some BIOSes clobber BP/SI/DI, so they are saved around the call.
    fn interrupt(regs: Registers) {
        unsafe {
            asm!(
                "push bp",
                "push si",
                "push di",
                "int 0x10",
                "pop di",
                "pop si",
                "pop bp",
                inout("ax") regs.ax => _,
                inout("bx") regs.bx => _,
                inout("cx") regs.cx => _,
                inout("dx") regs.dx => _,
            );
        }
    }
}

impl VideoService for BiosVideo {
    fn call(&mut self, request: VideoRequest) {
        Self::interrupt(request.registers());
    }
}

static CONSOLE: Mutex<BiosVideo> = Mutex::new(BiosVideo);

/// Доступ к консоли прошивки / Access to the firmware console
pub fn with_console<R>(f: impl FnOnce(&mut BiosVideo) -> R) -> R {
    f(&mut CONSOLE.lock())
}
