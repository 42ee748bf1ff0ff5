//! x86 real-mode entry point — инициализатор окружения / environment initializer
//!
//! BIOS прыгает сюда по 0x7C00 с выключенным защищённым режимом; гарантирован
//! только CS:IP, причём 0000:7C00 и 07C0:0000 одинаково возможны.
//! The BIOS jumps here at 0x7C00 in real mode; only CS:IP is guaranteed, and
//! 0000:7C00 and 07C0:0000 are equally possible.
//!
//! Порядок / Order:
//!   1. дальний переход нормализует CS / far jump normalises CS
//!   2. DS = ES = сегмент данных / data segment
//!   3. SS:SP = вершина стека сразу за образом / stack top right after the image
//!   4. calll boot_main (код Rust в code16 использует 32-битные call/ret)
//!      (code16 Rust code uses 32-bit call/ret)
//!
//! Все значения берутся из `AddressingContext::BOOT`.
//! Every value comes from `AddressingContext::BOOT`.

use core::arch::global_asm;

use libbootsect::layout::AddressingContext;

const CONTEXT: AddressingContext = AddressingContext::BOOT;

global_asm!(
    r#"
.section .boot, "awx"
.global _start
.code16
_start:
    cli

    /* CS = code segment */
    ljmp ${code_segment}, $.Lnormalized
.Lnormalized:

    movw ${data_segment}, %ax
    movw %ax, %ds
    movw %ax, %es

    /* SS и SP меняются вместе при cli / SS and SP change together under cli */
    movw ${stack_segment}, %ax
    movw %ax, %ss
    movl ${stack_pointer}, %esp
    xorl %ebp, %ebp

    sti
    cld

    calll boot_main

    /* boot_main не возвращается / boot_main does not return */
.Lhang:
    cli
    hlt
    jmp .Lhang
"#,
    code_segment = const CONTEXT.code_segment,
    data_segment = const CONTEXT.data_segment,
    stack_segment = const CONTEXT.stack_segment,
    stack_pointer = const CONTEXT.stack_pointer,
    options(att_syntax)
);
