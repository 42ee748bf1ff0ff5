//! Образ загрузочного сектора / Boot sector image
//!
//! Формат / Layout:
//!
//!  Смещение / Offset   Содержимое / Contents
//!  ─────────────────────────────────────────
//!  0 .. len            код и данные / code and data
//!  len .. 510          нули / zero padding
//!  510 .. 512          0x55 0xAA — сигнатура / signature
//!
//! Без сигнатуры BIOS не считает диск загрузочным.
//! Without the signature the BIOS does not treat the disk as bootable.

use crate::{Error, Result};

pub const SECTOR_SIZE: usize = 512;
pub const SIGNATURE_OFFSET: usize = 510;
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];
/// Сколько байт остаётся под код / Bytes available for code
pub const MAX_CODE_SIZE: usize = SIGNATURE_OFFSET;

/// Готовый 512-байтный образ / A complete 512-byte image
#[derive(Clone, PartialEq, Eq)]
pub struct BootImage {
    bytes: [u8; SECTOR_SIZE],
}

impl BootImage {
    /// Дополнить код нулями и добавить сигнатуру.
    /// Pad code with zeros and append the signature.
    pub fn from_code(code: &[u8]) -> Result<Self> {
        if code.len() > MAX_CODE_SIZE {
            return Err(Error::ImageTooLarge { len: code.len() });
        }
        let mut bytes = [0u8; SECTOR_SIZE];
        bytes[..code.len()].copy_from_slice(code);
        bytes[SIGNATURE_OFFSET..].copy_from_slice(&BOOT_SIGNATURE);
        log::debug!("sealed {} bytes of code, {} bytes free", code.len(), MAX_CODE_SIZE - code.len());
        Ok(Self { bytes })
    }

    /// Принять уже готовый образ после проверки.
    /// Accept an existing image after verification.
    pub fn parse(image: &[u8]) -> Result<Self> {
        verify(image)?;
        let mut bytes = [0u8; SECTOR_SIZE];
        bytes.copy_from_slice(image);
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SECTOR_SIZE] {
        &self.bytes
    }

    /// Used prefix: everything up to the last non-zero byte before the signature.
    pub fn code_len(&self) -> usize {
        self.bytes[..SIGNATURE_OFFSET]
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1)
    }

    pub fn free_bytes(&self) -> usize {
        MAX_CODE_SIZE - self.code_len()
    }
}

impl core::fmt::Debug for BootImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootImage").field("code_len", &self.code_len()).finish()
    }
}

/// Проверить длину и сигнатуру / Check length and signature
pub fn verify(image: &[u8]) -> Result<()> {
    if image.len() != SECTOR_SIZE {
        return Err(Error::BadImageLength { len: image.len() });
    }
    let found = [image[SIGNATURE_OFFSET], image[SIGNATURE_OFFSET + 1]];
    if found != BOOT_SIGNATURE {
        return Err(Error::MissingSignature { found });
    }
    Ok(())
}

/// `true` if `bytes` already look like a signed sector.
pub fn is_signed_sector(bytes: &[u8]) -> bool {
    verify(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealed_image_has_signature_and_size() {
        let code = [0xFA, 0x31, 0xC0, 0xEB, 0xFE];
        let image = BootImage::from_code(&code).unwrap();
        let bytes = image.as_bytes();
        assert_eq!(bytes.len(), 512);
        assert_eq!(bytes[510], 0x55);
        assert_eq!(bytes[511], 0xAA);
        assert_eq!(&bytes[..5], &code);
        assert!(bytes[5..510].iter().all(|&b| b == 0));
        assert_eq!(image.code_len(), 5);
        assert_eq!(image.free_bytes(), 505);
        assert!(verify(bytes).is_ok());
    }

    #[test]
    fn test_code_fills_all_510_bytes() {
        let code = [0x90u8; MAX_CODE_SIZE];
        let image = BootImage::from_code(&code).unwrap();
        assert_eq!(image.code_len(), 510);
        assert_eq!(image.free_bytes(), 0);
    }

    #[test]
    fn test_code_too_large() {
        let code = [0x90u8; 511];
        assert_eq!(BootImage::from_code(&code), Err(Error::ImageTooLarge { len: 511 }));
    }

    #[test]
    fn test_verify_rejects_wrong_length() {
        assert_eq!(verify(&[0u8; 511]), Err(Error::BadImageLength { len: 511 }));
        assert_eq!(verify(&[0u8; 1024]), Err(Error::BadImageLength { len: 1024 }));
    }

    #[test]
    fn test_verify_rejects_wrong_signature() {
        let mut bytes = [0u8; 512];
        bytes[510] = 0xAA;
        bytes[511] = 0x55;
        assert_eq!(verify(&bytes), Err(Error::MissingSignature { found: [0xAA, 0x55] }));
        assert!(!is_signed_sector(&bytes));
    }

    #[test]
    fn test_parse_keeps_bytes() {
        let sealed = BootImage::from_code(b"\xEB\xFE").unwrap();
        let parsed = BootImage::parse(sealed.as_bytes()).unwrap();
        assert_eq!(parsed, sealed);
    }
}
