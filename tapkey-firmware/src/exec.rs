use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_storage::Storage;

use crate::{
    config::Config,
    debounce::Debouncer,
    dispatcher::Dispatcher,
    event_queue::EventQueue,
    firmware_functions::{self, ResetFn, SuspendFn},
    hid::{Backlight, HidTransport, MacroHandler, PairHandler},
    layers::Profiles,
    matrix::{MatrixDriver, MatrixScanner},
    pairs::PairRegistry,
};

#[derive(Default)]
struct Hooks {
    reset: Option<ResetFn>,
    reset_to_bootloader: Option<ResetFn>,
    shutdown: Option<ResetFn>,
    suspend: Option<SuspendFn>,
}

/// Collects the board's collaborators and settings. [KeyboardBuilder::build] wires them to one
/// shared event queue:
///
/// ```ignore
/// static QUEUE: EventQueue<CriticalSectionRawMutex, 36> = EventQueue::new();
///
/// let mut keyboard = KeyboardBuilder::<_, _, _, _, 4, 9, 36>::new(
///     PinMatrix::new(rows, cols),
///     transport,
///     flash,
///     Profiles::new(Keymap::new(&LAYERS)),
/// )
/// .backlight(leds)
/// .pairs(&PAIRS)
/// .reset_to_bootloader(&enter_dfu)
/// .build(&QUEUE);
/// keyboard.run().await
/// ```
pub struct KeyboardBuilder<
    'k,
    D: MatrixDriver,
    T: HidTransport,
    B: Backlight,
    S: Storage,
    const ROWS: usize,
    const COLS: usize,
    const KEYS: usize,
> {
    driver: D,
    transport: T,
    backlight: B,
    storage: S,
    profiles: Profiles<'k, KEYS>,
    pairs: &'k [[u8; 2]],
    macros: Option<&'k mut dyn MacroHandler>,
    pair_handler: Option<&'k mut dyn PairHandler>,
    config: Config,
    hooks: Hooks,
}

impl<
        'k,
        D: MatrixDriver,
        T: HidTransport,
        S: Storage,
        const ROWS: usize,
        const COLS: usize,
        const KEYS: usize,
    > KeyboardBuilder<'k, D, T, (), S, ROWS, COLS, KEYS>
{
    pub fn new(driver: D, transport: T, storage: S, profiles: Profiles<'k, KEYS>) -> Self {
        Self {
            driver,
            transport,
            backlight: (),
            storage,
            profiles,
            pairs: &[],
            macros: None,
            pair_handler: None,
            config: Config::default(),
            hooks: Hooks::default(),
        }
    }
}

impl<
        'k,
        D: MatrixDriver,
        T: HidTransport,
        B: Backlight,
        S: Storage,
        const ROWS: usize,
        const COLS: usize,
        const KEYS: usize,
    > KeyboardBuilder<'k, D, T, B, S, ROWS, COLS, KEYS>
{
    pub fn backlight<L: Backlight>(
        self,
        backlight: L,
    ) -> KeyboardBuilder<'k, D, T, L, S, ROWS, COLS, KEYS> {
        KeyboardBuilder {
            driver: self.driver,
            transport: self.transport,
            backlight,
            storage: self.storage,
            profiles: self.profiles,
            pairs: self.pairs,
            macros: self.macros,
            pair_handler: self.pair_handler,
            config: self.config,
            hooks: self.hooks,
        }
    }

    pub fn config(mut self, value: Config) -> Self {
        self.config = value;
        self
    }

    pub fn pairs(mut self, value: &'k [[u8; 2]]) -> Self {
        self.pairs = value;
        self
    }

    pub fn macro_handler(mut self, value: &'k mut dyn MacroHandler) -> Self {
        self.macros = Some(value);
        self
    }

    pub fn pair_handler(mut self, value: &'k mut dyn PairHandler) -> Self {
        self.pair_handler = Some(value);
        self
    }

    pub fn reset(mut self, value: ResetFn) -> Self {
        self.hooks.reset = Some(value);
        self
    }

    pub fn reset_to_bootloader(mut self, value: ResetFn) -> Self {
        self.hooks.reset_to_bootloader = Some(value);
        self
    }

    pub fn shutdown(mut self, value: ResetFn) -> Self {
        self.hooks.shutdown = Some(value);
        self
    }

    pub fn suspend(mut self, value: SuspendFn) -> Self {
        self.hooks.suspend = Some(value);
        self
    }

    pub fn build<M: RawMutex>(
        self,
        queue: &'k EventQueue<M, KEYS>,
    ) -> Keyboard<'k, D, M, T, B, S, ROWS, COLS, KEYS> {
        let config = self.config.validated();
        let scanner = MatrixScanner::new(
            self.driver,
            Debouncer::new(config.debounce_ms, config.hold_ms),
            queue,
        );

        let mut dispatcher = Dispatcher::new(
            queue,
            self.profiles,
            self.transport,
            self.backlight,
            self.storage,
        )
        .with_config(config)
        .with_pairs(PairRegistry::new(self.pairs));
        if let Some(handler) = self.macros {
            dispatcher = dispatcher.with_macro_handler(handler);
        }
        if let Some(handler) = self.pair_handler {
            dispatcher = dispatcher.with_pair_handler(handler);
        }

        Keyboard {
            scanner,
            dispatcher,
            scan_period_us: config.scan_period_us,
            hooks: self.hooks,
        }
    }
}

pub struct Keyboard<
    'k,
    D: MatrixDriver,
    M: RawMutex,
    T: HidTransport,
    B: Backlight,
    S: Storage,
    const ROWS: usize,
    const COLS: usize,
    const KEYS: usize,
> {
    scanner: MatrixScanner<'k, D, M, ROWS, COLS, KEYS>,
    dispatcher: Dispatcher<'k, M, T, B, S, KEYS>,
    scan_period_us: u32,
    hooks: Hooks,
}

impl<
        'k,
        D: MatrixDriver,
        M: RawMutex,
        T: HidTransport,
        B: Backlight,
        S: Storage,
        const ROWS: usize,
        const COLS: usize,
        const KEYS: usize,
    > Keyboard<'k, D, M, T, B, S, ROWS, COLS, KEYS>
{
    pub fn scanner(&self) -> &MatrixScanner<'k, D, M, ROWS, COLS, KEYS> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut MatrixScanner<'k, D, M, ROWS, COLS, KEYS> {
        &mut self.scanner
    }

    pub fn dispatcher(&self) -> &Dispatcher<'k, M, T, B, S, KEYS> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<'k, M, T, B, S, KEYS> {
        &mut self.dispatcher
    }

    /// Both halves at once, for boards that run scanning and dispatch as separate tasks.
    pub fn parts_mut(
        &mut self,
    ) -> (
        &mut MatrixScanner<'k, D, M, ROWS, COLS, KEYS>,
        &mut Dispatcher<'k, M, T, B, S, KEYS>,
    ) {
        (&mut self.scanner, &mut self.dispatcher)
    }

    /// Register the board hooks for system commands. Called by [Self::run].
    pub fn install_hooks(&mut self) {
        let hooks = core::mem::take(&mut self.hooks);
        if hooks.reset.is_some() {
            firmware_functions::handle_reset(hooks.reset);
        }
        if hooks.reset_to_bootloader.is_some() {
            firmware_functions::handle_reset_to_bootloader(hooks.reset_to_bootloader);
        }
        if hooks.shutdown.is_some() {
            firmware_functions::handle_shutdown(hooks.shutdown);
        }
        if hooks.suspend.is_some() {
            firmware_functions::handle_suspend(hooks.suspend);
        }
    }

    /// Scan the matrix and dispatch events until the board resets.
    pub async fn run(&mut self) -> ! {
        self.install_hooks();
        crate::info!("keyboard running");
        match select(
            self.scanner.run(self.scan_period_us),
            self.dispatcher.run(),
        )
        .await
        {
            Either::First(never) => never,
            Either::Second(never) => never,
        }
    }
}

#[cfg(test)]
#[path = "exec_test.rs"]
mod test;
