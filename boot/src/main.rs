//! bootsect — загрузочный сектор / boot sector entry point

#![no_std]
#![no_main]
#![deny(unsafe_op_in_unsafe_fn)]

use core::panic::PanicInfo;

use libbootsect::layout::{AddressingContext, BootLayout};
use libbootsect::{sequence, BootConfig, BOOT_MESSAGE};

mod arch;
mod drivers;

const CONFIG: BootConfig = BootConfig::DEFAULT;

// Ассемблерная заглушка берёт значения из AddressingContext::BOOT —
// та же раскладка должна быть и в конфигурации.
// The asm stub takes its values from AddressingContext::BOOT; the config
// must describe the same layout.
const _: () = assert!(CONFIG.layout.load_address == BootLayout::DEFAULT.load_address);
const _: () = assert!(CONFIG.layout.image_size == BootLayout::DEFAULT.image_size);
const _: () = assert!(CONFIG.layout.stack_size == BootLayout::DEFAULT.stack_size);
const _: () = assert!(AddressingContext::is_valid(&CONFIG.layout));

/// Точка входа Rust — вызывается из `_start` после установки сегментов и стека.
/// Rust entry point, called from `_start` once segments and stack are set.
#[no_mangle]
pub extern "C" fn boot_main() -> ! {
    // Сообщать об ошибке некуда: у сектора нет обратного канала к BIOS.
    // Nowhere to report an error: the sector has no return channel to the BIOS.
    let _ = drivers::video::with_console(|console| {
        sequence::run(console, &CONFIG, &BOOT_MESSAGE)
    });

    arch::halt()
}

/// Panic handler: только останов / halt only.
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    arch::halt()
}
