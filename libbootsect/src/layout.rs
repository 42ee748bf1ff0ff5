//! Адресный контекст реального режима / Real-mode addressing context
//!
//! BIOS загружает сектор по 0x7C00 и гарантирует только CS:IP.
//! BIOS loads the sector at 0x7C00 and guarantees nothing but CS:IP.
//!
//! Карта памяти / Memory map (default layout):
//!
//!  Линейный адрес / Linear   Регион / Region
//!  ──────────────────────────────────────────
//!  0x7C00 .. 0x7E00          Boot image (512 байт / bytes)
//!  0x7E00 .. 0x9E00          Stack (8 KiB, растёт вниз / grows down)
//!
//! Сегменты / Segments: CS = DS = ES = SS = 0x07C0, SP = 0x2200.
//! Компилятор адресует стек через DS, поэтому SS совпадает с DS.
//! Compiled code reaches stack objects through DS, so SS equals DS.

use crate::{Error, Result};

/// Физический адрес загрузки / Physical load address
pub const LOAD_ADDRESS: u32 = 0x7C00;
/// Размер образа / Image size
pub const IMAGE_SIZE: u32 = 512;
/// Размер стека / Stack size
pub const STACK_SIZE: u32 = 8 * 1024;

/// Real-mode paragraph: segment value * 16 = linear base.
pub const PARAGRAPH: u32 = 16;
/// Начало видеопамяти / Start of video memory
pub const CONVENTIONAL_MEMORY_END: u32 = 0xA0000;

const SEGMENT_LIMIT: u32 = 0x1_0000;

const _: () = assert!(AddressingContext::is_valid(&BootLayout::DEFAULT));

/// Параметры раскладки памяти / Memory layout parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootLayout {
    pub load_address: u32,
    pub image_size:   u32,
    pub stack_size:   u32,
}

impl BootLayout {
    pub const DEFAULT: Self = Self {
        load_address: LOAD_ADDRESS,
        image_size:   IMAGE_SIZE,
        stack_size:   STACK_SIZE,
    };

    pub const fn image_region(&self) -> Region {
        Region::new(self.load_address, self.image_size)
    }

    /// Stack region starts right after the image.
    pub const fn stack_region(&self) -> Region {
        Region::new(self.image_region().end(), self.stack_size)
    }
}

impl Default for BootLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Полуоткрытый интервал линейных адресов / Half-open linear address range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u32,
    pub len:   u32,
}

impl Region {
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    pub const fn end(&self) -> u32 {
        self.start.saturating_add(self.len)
    }

    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr < self.end()
    }

    pub const fn overlaps(&self, other: &Region) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Значения сегментных регистров и базы регионов.
/// Segment register values and region bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressingContext {
    pub code_segment:  u16,
    pub data_segment:  u16,
    pub stack_segment: u16,
    pub stack_pointer: u16,
    pub code_base:     u32,
    pub stack_base:    u32,
}

impl AddressingContext {
    /// Контекст для раскладки по умолчанию / Context for the default layout
    pub const BOOT: Self = Self::derive(&BootLayout::DEFAULT);

    /// Проверить раскладку и вычислить контекст.
    /// Validate a layout and compute its context.
    pub fn compute(layout: &BootLayout) -> Result<Self> {
        match Self::check(layout) {
            Some(err) => Err(err),
            None => {
                let ctx = Self::derive(layout);
                log::debug!(
                    "addressing: cs={:#06x} ds={:#06x} ss={:#06x} sp={:#06x}",
                    ctx.code_segment, ctx.data_segment, ctx.stack_segment, ctx.stack_pointer
                );
                Ok(ctx)
            }
        }
    }

    /// `true` if `layout` passes every check in [`AddressingContext::compute`].
    pub const fn is_valid(layout: &BootLayout) -> bool {
        Self::check(layout).is_none()
    }

    const fn check(layout: &BootLayout) -> Option<Error> {
        if layout.load_address % PARAGRAPH != 0 {
            return Some(Error::MisalignedLoadAddress { address: layout.load_address });
        }
        if layout.stack_size == 0 {
            return Some(Error::EmptyStack);
        }
        let stack = layout.stack_region();
        if stack.end() > CONVENTIONAL_MEMORY_END {
            return Some(Error::StackAboveConventionalMemory { top: stack.end() });
        }
        let offset = stack.end() - layout.load_address;
        if offset >= SEGMENT_LIMIT {
            return Some(Error::StackOutOfSegment { offset });
        }
        None
    }

    // Вызывать только после check / Only valid after check
    const fn derive(layout: &BootLayout) -> Self {
        let segment = (layout.load_address / PARAGRAPH) as u16;
        let stack = layout.stack_region();
        Self {
            code_segment:  segment,
            data_segment:  segment,
            stack_segment: segment,
            stack_pointer: (stack.end() - layout.load_address) as u16,
            code_base:     layout.load_address,
            stack_base:    stack.start,
        }
    }

    /// Линейный адрес вершины стека / Linear address of the initial stack top
    pub const fn stack_top(&self) -> u32 {
        linear(self.stack_segment, self.stack_pointer)
    }

    /// Linear address written by a push that brings the stack `depth` bytes deep.
    pub const fn stack_slot(&self, depth: u32) -> u32 {
        self.stack_top() - depth
    }

    pub const fn data_address(&self, offset: u16) -> u32 {
        linear(self.data_segment, offset)
    }
}

/// segment:offset → линейный адрес / linear address
pub const fn linear(segment: u16, offset: u16) -> u32 {
    (segment as u32) * PARAGRAPH + offset as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_segments() {
        let ctx = AddressingContext::compute(&BootLayout::DEFAULT).unwrap();
        assert_eq!(ctx.code_segment, 0x07C0);
        assert_eq!(ctx.data_segment, 0x07C0);
        assert_eq!(ctx.stack_segment, 0x07C0);
        assert_eq!(ctx.stack_pointer, 0x2200);
        assert_eq!(ctx.code_base, 0x7C00);
        assert_eq!(ctx.stack_base, 0x7E00);
        assert_eq!(ctx, AddressingContext::BOOT);
    }

    #[test]
    fn test_stack_region_follows_image() {
        let layout = BootLayout::DEFAULT;
        assert_eq!(layout.stack_region().start, layout.image_region().end());
        assert_eq!(AddressingContext::BOOT.stack_top(), 0x9E00);
    }

    #[test]
    fn test_first_8k_of_stack_never_touch_image() {
        let layout = BootLayout::DEFAULT;
        let ctx = AddressingContext::BOOT;
        let image = layout.image_region();
        for depth in 1..=STACK_SIZE {
            let slot = ctx.stack_slot(depth);
            assert!(!image.contains(slot), "depth {} hits image at {:#x}", depth, slot);
            assert!(layout.stack_region().contains(slot));
        }
    }

    #[test]
    fn test_message_offsets_resolve_into_image() {
        let ctx = AddressingContext::BOOT;
        assert_eq!(ctx.data_address(0), LOAD_ADDRESS);
        assert_eq!(ctx.data_address(511), LOAD_ADDRESS + 511);
    }

    #[test]
    fn test_misaligned_load_address() {
        let layout = BootLayout { load_address: 0x7C01, ..BootLayout::DEFAULT };
        assert_eq!(
            AddressingContext::compute(&layout),
            Err(Error::MisalignedLoadAddress { address: 0x7C01 })
        );
        assert!(!AddressingContext::is_valid(&layout));
    }

    #[test]
    fn test_stack_must_fit_segment() {
        let layout = BootLayout { stack_size: 0x10000, ..BootLayout::DEFAULT };
        assert_eq!(
            AddressingContext::compute(&layout),
            Err(Error::StackOutOfSegment { offset: 0x10200 })
        );
    }

    #[test]
    fn test_stack_below_video_memory() {
        let layout = BootLayout { load_address: 0x9F000, stack_size: 0x1000, ..BootLayout::DEFAULT };
        assert_eq!(
            AddressingContext::compute(&layout),
            Err(Error::StackAboveConventionalMemory { top: 0xA0200 })
        );
    }

    #[test]
    fn test_empty_stack_rejected() {
        let layout = BootLayout { stack_size: 0, ..BootLayout::DEFAULT };
        assert_eq!(AddressingContext::compute(&layout), Err(Error::EmptyStack));
    }

    #[test]
    fn test_stack_never_overlaps_image_for_valid_layouts() {
        for stack_size in [1, 16, 0x1000, STACK_SIZE, 0x8000] {
            let layout = BootLayout { stack_size, ..BootLayout::DEFAULT };
            assert!(AddressingContext::is_valid(&layout));
            assert!(!layout.stack_region().overlaps(&layout.image_region()));
        }
    }

    #[test]
    fn test_region_overlap() {
        let a = Region::new(0x100, 0x10);
        assert!(a.overlaps(&Region::new(0x10F, 1)));
        assert!(!a.overlaps(&Region::new(0x110, 1)));
        assert!(!a.overlaps(&Region::new(0x0, 0x100)));
    }

    #[test]
    fn test_linear_address() {
        assert_eq!(linear(0x07C0, 0), 0x7C00);
        assert_eq!(linear(0x0000, 0x7C00), 0x7C00);
        assert_eq!(linear(0xFFFF, 0x10), 0x10_0000);
    }
}
