//! HAL — Hardware Abstraction Layer
//!
//! Загрузочный сектор существует только для x86 в реальном режиме.
//! The boot sector only exists for x86 in real mode.

#[cfg(not(target_arch = "x86"))]
compile_error!("bootsect-boot builds only for the 16-bit x86 target: pass --target boot/i386-code16-boot-sector.json");

#[cfg(target_arch = "x86")]
pub mod x86;
#[cfg(target_arch = "x86")]
pub use x86 as current;

/// Остановить процессор навсегда / Halt the processor for good.
pub fn halt() -> ! {
    current::halt()
}
