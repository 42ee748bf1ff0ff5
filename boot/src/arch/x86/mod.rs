//! x86 real mode

pub mod boot;

/// `cli; hlt` в цикле: NMI может разбудить `hlt`, поэтому повторяем.
/// `cli; hlt` in a loop: an NMI can wake `hlt`, so go round again.
pub fn halt() -> ! {
    loop {
        unsafe {
            core::arch::asm!("cli", "hlt", options(nomem, nostack));
        }
    }
}
