//! mkboot — сборка и проверка загрузочного сектора на хосте
//! mkboot — host-side boot sector builder and checker
//!
//! Подкоманды / Subcommands:
//!   image   — плоский бинарник или ELF → 512-байтный образ с сигнатурой
//!   verify  — длина и сигнатура готового образа
//!   layout  — адресный контекст для заданной раскладки
//!   preview — прогнать сценарий на симуляторе экрана
//!   qemu    — запустить образ в qemu-system-i386

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use libbootsect::attr::{Attribute, Color};
use libbootsect::console::CursorPosition;
use libbootsect::display::ScanLimit;
use libbootsect::image::{self, BootImage};
use libbootsect::layout::{AddressingContext, BootLayout};
use libbootsect::sim::TextScreen;
use libbootsect::{sequence, BootConfig, BOOT_MESSAGE};

mod elf;
mod logger;

#[derive(Parser)]
#[command(name = "mkboot")]
#[command(about = "Build, inspect and run a BIOS boot sector", long_about = None)]
struct Cli {
    /// Больше логов (-v, -vv, -vvv) / More log output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Только ошибки / Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet:   bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pad a flat binary or ELF to 512 bytes and append the boot signature
    Image {
        input:  PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check the length and signature of an image
    Verify {
        image: PathBuf,
    },
    /// Print the addressing context for a layout
    Layout {
        #[arg(long, value_parser = parse_u32, default_value_t = BootLayout::DEFAULT.load_address)]
        load_address: u32,
        #[arg(long, value_parser = parse_u32, default_value_t = BootLayout::DEFAULT.stack_size)]
        stack_size:   u32,
    },
    /// Run the boot sequence against a simulated 80x25 screen
    Preview {
        #[arg(long, value_parser = parse_color, default_value = "light-gray")]
        fg:         Color,
        #[arg(long, value_parser = parse_color, default_value = "black")]
        bg:         Color,
        #[arg(long, default_value_t = 0)]
        row:        u8,
        #[arg(long, default_value_t = 0)]
        col:        u8,
        #[arg(long, default_value_t = ScanLimit::DEFAULT.get())]
        scan_limit: usize,
    },
    /// Boot an image in qemu-system-i386
    Qemu {
        image:     PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        qemu_args: Vec<String>,
    },
}

/// Десятичное или `0x`-шестнадцатеричное / Decimal or `0x` hexadecimal
fn parse_u32(text: &str) -> std::result::Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("`{}`: {}", text, e))
}

fn parse_color(text: &str) -> std::result::Result<Color, String> {
    Color::from_name(text).ok_or_else(|| {
        let names: Vec<&str> = Color::ALL.iter().map(|c| c.name()).collect();
        format!("unknown color `{}` (expected one of: {})", text, names.join(", "))
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Image { input, output } => build_image(&input, &output),
        Commands::Verify { image } => verify_image(&image),
        Commands::Layout { load_address, stack_size } => show_layout(load_address, stack_size),
        Commands::Preview { fg, bg, row, col, scan_limit } => {
            let config = BootConfig {
                attribute:  Attribute::new(fg, bg),
                origin:     CursorPosition::new(row, col),
                scan_limit: ScanLimit::new(scan_limit)?,
                ..BootConfig::DEFAULT
            };
            preview(&config)
        }
        Commands::Qemu { image, qemu_args } => run_qemu(&image, &qemu_args),
    }
}

// ── image ───────────────────────────────────────────────────

/// Превратить содержимое входного файла в образ сектора.
/// Turn the input file contents into a sector image.
fn seal(input: &[u8]) -> Result<BootImage> {
    if image::is_signed_sector(input) {
        log::info!("input is already a signed sector, re-verifying");
        return Ok(BootImage::parse(input)?);
    }

    if !elf::is_elf(input) {
        return Ok(BootImage::from_code(input)?);
    }

    let flat = elf::flatten(input)?;
    log::info!("flattened ELF: {} bytes from {:#x}", flat.bytes.len(), flat.base);
    // Скрипт линковки сам ставит сигнатуру по 510
    // The linker script places the signature at 510 itself
    if image::is_signed_sector(&flat.bytes) {
        return Ok(BootImage::parse(&flat.bytes)?);
    }
    Ok(BootImage::from_code(&flat.bytes)?)
}

fn build_image(input: &Path, output: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let sector = seal(&bytes).with_context(|| format!("building image from {}", input.display()))?;
    fs::write(output, sector.as_bytes()).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "✓ {}: {} bytes of code, {} bytes free",
        output.display(),
        sector.code_len(),
        sector.free_bytes()
    );
    Ok(())
}

// ── verify ──────────────────────────────────────────────────

fn verify_image(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let sector = BootImage::parse(&bytes).with_context(|| format!("verifying {}", path.display()))?;
    println!(
        "✓ {}: signed boot sector, {} bytes of code, {} bytes free",
        path.display(),
        sector.code_len(),
        sector.free_bytes()
    );
    Ok(())
}

// ── layout ──────────────────────────────────────────────────

fn describe_layout(layout: &BootLayout) -> Result<String> {
    let ctx = AddressingContext::compute(layout)?;
    let image = layout.image_region();
    let stack = layout.stack_region();
    Ok(format!(
        "image   {:#07x}..{:#07x}\n\
         stack   {:#07x}..{:#07x}\n\
         CS      {:#06x}\n\
         DS/ES   {:#06x}\n\
         SS:SP   {:#06x}:{:#06x}",
        image.start,
        image.end(),
        stack.start,
        stack.end(),
        ctx.code_segment,
        ctx.data_segment,
        ctx.stack_segment,
        ctx.stack_pointer,
    ))
}

fn show_layout(load_address: u32, stack_size: u32) -> Result<()> {
    let layout = BootLayout { load_address, stack_size, ..BootLayout::DEFAULT };
    let text = describe_layout(&layout)
        .with_context(|| format!("load address {:#x}, stack size {:#x}", load_address, stack_size))?;
    println!("{}", text);
    Ok(())
}

// ── preview ─────────────────────────────────────────────────

fn preview(config: &BootConfig) -> Result<()> {
    let mut screen = TextScreen::new();
    let result = sequence::run(&mut screen, config, &BOOT_MESSAGE);

    // Экран печатается и при ошибке: частичный вывод тоже полезен.
    // The screen is printed even on error; partial output is still shown.
    print!("{}", screen);
    println!("cursor {:?}, {} firmware calls", screen.cursor(), screen.calls());

    let report = result.context("boot sequence failed")?;
    println!("{} characters printed, state {:?}", report.printed, report.state);
    Ok(())
}

// ── qemu ────────────────────────────────────────────────────

fn run_qemu(image: &Path, extra: &[String]) -> Result<()> {
    // Не пускаем в эмулятор то, что BIOS всё равно не загрузит.
    verify_image(image)?;

    let drive = format!("format=raw,file={}", image.display());
    log::info!("qemu-system-i386 -drive {} {}", drive, extra.join(" "));
    let status = Command::new("qemu-system-i386")
        .args(["-drive", &drive])
        .args(extra)
        .status()
        .context("starting qemu-system-i386")?;

    if !status.success() {
        bail!("qemu exited with {}", status);
    }
    Ok(())
}
