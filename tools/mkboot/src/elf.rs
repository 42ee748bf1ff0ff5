//! ELF → плоский образ / ELF → flat binary
//!
//! Сегменты `PT_LOAD` раскладываются по физическим адресам относительно
//! самого младшего из них. Промежутки заполняются нулями, `.bss` (хвост
//! `p_memsz` сверх `p_filesz`) в образ не попадает.
//! `PT_LOAD` segments are laid out by physical address relative to the lowest
//! one. Gaps are zero-filled; `.bss` (the `p_memsz` tail past `p_filesz`) is
//! not part of the image. Сегмент сигнатуры из скрипта линковки лежит по 510,
//! поэтому допустимый размах — весь сектор.
//! The linker script's signature segment sits at 510, so the allowed span is
//! the whole sector.

use anyhow::{bail, Context, Result};
use goblin::elf::{program_header::PT_LOAD, Elf};

use libbootsect::image::SECTOR_SIZE;

const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

pub fn is_elf(bytes: &[u8]) -> bool {
    bytes.starts_with(&ELF_MAGIC)
}

/// Сплющенный образ и его базовый физический адрес
/// Flattened image and its base physical address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatImage {
    pub base:  u64,
    pub bytes: Vec<u8>,
}

pub fn flatten(bytes: &[u8]) -> Result<FlatImage> {
    let elf = Elf::parse(bytes).context("parsing ELF")?;

    let loads: Vec<_> = elf
        .program_headers
        .iter()
        .filter(|ph| ph.p_type == PT_LOAD && ph.p_filesz > 0)
        .collect();
    if loads.is_empty() {
        bail!("ELF has no loadable segments with file contents");
    }

    let base = loads.iter().map(|ph| ph.p_paddr).min().unwrap_or(0);
    let end = loads
        .iter()
        .map(|ph| ph.p_paddr.saturating_add(ph.p_filesz))
        .max()
        .unwrap_or(base);

    let span = usize::try_from(end - base).context("segment span does not fit in memory")?;
    // Больше сектора всё равно не поместится / More than a sector never fits
    if span > SECTOR_SIZE {
        bail!(
            "loadable segments span {} bytes from {:#x}, at most {} fit in a boot sector",
            span,
            base,
            SECTOR_SIZE
        );
    }

    let mut flat = vec![0u8; span];
    for ph in loads {
        let file = ph.file_range();
        let data = bytes.get(file.clone()).with_context(|| {
            format!("segment at {:#x} points outside the file ({:?})", ph.p_paddr, file)
        })?;
        let offset = (ph.p_paddr - base) as usize;
        flat[offset..offset + data.len()].copy_from_slice(data);
        log::debug!(
            "PT_LOAD paddr={:#06x} filesz={:#x} memsz={:#x} -> offset {:#x}",
            ph.p_paddr,
            ph.p_filesz,
            ph.p_memsz,
            offset
        );
    }

    Ok(FlatImage { base, bytes: flat })
}
