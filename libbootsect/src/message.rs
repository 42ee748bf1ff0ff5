//! Статическое сообщение / Static message buffer
//!
//! Буфер зашит в образ при сборке и оканчивается нулём; конструктор — `const fn`,
//! поэтому незавершённый буфер не компилируется.
//! The buffer is baked into the image and ends in a zero byte; the constructor
//! is a `const fn`, so an unterminated buffer fails to compile.

/// Текст по умолчанию / Default boot text
pub const BOOT_MESSAGE: Message = Message::new(b"Oh boy do I sure love assembly!\0");

/// Нуль-терминированная последовательность байтов / Null-terminated bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    bytes: &'static [u8],
}

impl Message {
    /// Panics (at compile time in `const` context) unless `bytes` contains a zero.
    pub const fn new(bytes: &'static [u8]) -> Self {
        assert!(terminator(bytes).is_some(), "message must contain a zero terminator");
        Self { bytes }
    }

    /// Байты вместе с терминатором / Bytes including the terminator
    pub const fn as_bytes_with_nul(&self) -> &'static [u8] {
        self.bytes
    }

    /// Видимая часть до первого нуля / Visible part before the first zero
    pub fn text(&self) -> &'static [u8] {
        match terminator(self.bytes) {
            Some(end) => &self.bytes[..end],
            None => self.bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const fn terminator(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == 0 {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_message_text() {
        assert_eq!(BOOT_MESSAGE.text(), b"Oh boy do I sure love assembly!");
        assert_eq!(BOOT_MESSAGE.len(), 31);
        assert_eq!(*BOOT_MESSAGE.as_bytes_with_nul().last().unwrap(), 0);
    }

    #[test]
    fn test_text_stops_at_first_zero() {
        let msg = Message::new(b"ab\0cd\0");
        assert_eq!(msg.text(), b"ab");
    }

    #[test]
    fn test_empty_message() {
        let msg = Message::new(b"\0");
        assert!(msg.is_empty());
    }

    #[test]
    #[should_panic(expected = "zero terminator")]
    fn test_unterminated_message_rejected() {
        let _ = Message::new(b"no end");
    }
}
