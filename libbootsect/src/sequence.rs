//! Сценарий загрузки / Entry sequence
//!
//! Состояния / States (строго линейно / strictly linear):
//!
//!   Uninitialized → EnvironmentReady → ScreenCleared
//!     → CursorPositioned → MessagePrinted → Halted
//!
//! Каждый шаг — обязательное условие следующего; шаг не по порядку
//! возвращает [`Error::OutOfOrder`]. Завершение явное: `Halted`.
//! Each step is a hard precondition for the next; a step out of order
//! returns [`Error::OutOfOrder`]. Termination is explicit: `Halted`.

use crate::config::BootConfig;
use crate::console::FirmwareConsole;
use crate::display;
use crate::layout::AddressingContext;
use crate::message::Message;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    EnvironmentReady,
    ScreenCleared,
    CursorPositioned,
    MessagePrinted,
    Halted,
}

/// Итог прогона / Outcome of a full run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    pub context: AddressingContext,
    pub printed: usize,
    pub state:   BootState,
}

pub struct BootSequence<'a, C: FirmwareConsole> {
    console: &'a mut C,
    config:  &'a BootConfig,
    state:   BootState,
}

impl<'a, C: FirmwareConsole> BootSequence<'a, C> {
    pub fn new(console: &'a mut C, config: &'a BootConfig) -> Self {
        Self { console, config, state: BootState::Uninitialized }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    fn expect(&self, expected: BootState) -> Result<()> {
        if self.state != expected {
            return Err(Error::OutOfOrder { expected, actual: self.state });
        }
        Ok(())
    }

    fn enter(&mut self, next: BootState) {
        log::trace!("boot state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Шаг 1: адресный контекст / Step 1: addressing context
    pub fn initialize(&mut self) -> Result<AddressingContext> {
        self.expect(BootState::Uninitialized)?;
        let context = AddressingContext::compute(&self.config.layout)?;
        self.enter(BootState::EnvironmentReady);
        Ok(context)
    }

    /// Шаг 2 / Step 2
    pub fn clear_screen(&mut self) -> Result<()> {
        self.expect(BootState::EnvironmentReady)?;
        display::clear_screen(&mut *self.console, self.config.geometry, self.config.attribute);
        self.enter(BootState::ScreenCleared);
        Ok(())
    }

    /// Шаг 3 / Step 3
    pub fn position_cursor(&mut self) -> Result<()> {
        self.expect(BootState::ScreenCleared)?;
        display::set_cursor_position(&mut *self.console, self.config.page, self.config.origin);
        self.enter(BootState::CursorPositioned);
        Ok(())
    }

    /// Шаг 4 / Step 4
    ///
    /// A message that trips the scan limit still counts as printed: the
    /// characters are on screen and there is nothing to roll back.
    pub fn print_message(&mut self, message: &Message) -> Result<usize> {
        self.expect(BootState::CursorPositioned)?;
        let result = display::print_string(
            &mut *self.console,
            self.config.page,
            message.as_bytes_with_nul(),
            self.config.scan_limit,
        );
        self.enter(BootState::MessagePrinted);
        result
    }

    /// Явное завершение / Explicit termination
    pub fn halt(&mut self) -> Result<BootState> {
        self.expect(BootState::MessagePrinted)?;
        self.enter(BootState::Halted);
        Ok(self.state)
    }
}

/// Выполнить весь сценарий / Run the whole script.
pub fn run<C: FirmwareConsole>(console: &mut C, config: &BootConfig, message: &Message) -> Result<BootReport> {
    let mut seq = BootSequence::new(console, config);
    let context = seq.initialize()?;
    seq.clear_screen()?;
    seq.position_cursor()?;
    let printed = seq.print_message(message)?;
    let state = seq.halt()?;
    log::info!("boot sequence done: {} characters", printed);
    Ok(BootReport { context, printed, state })
}
