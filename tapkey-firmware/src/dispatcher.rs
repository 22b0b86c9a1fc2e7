use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_storage::Storage;
use tapkey_common::{
    action_code::{Action, BacklightOp, Command, Usage},
    keycodes::key_range,
    ActionCode,
};

use crate::{
    config::Config,
    event_queue::{EventQueue, KeyEvent, Timestamp},
    firmware_functions,
    hid::{
        Backlight, Connection, Device, HidTransport, MacroHandler, PairHandler, TransportError,
        BACKLIGHT_STEP,
    },
    layers::{Keymap, LayerMask, Profiles},
    mouse_keys::MouseKeys,
    nvm::{self, Record, StorageError},
    pairs::{self, PairHit, PairRegistry},
    tap_hold::{self, TapHold},
};

/// Where the [Record] lives in the storage given to the dispatcher.
pub const RECORD_OFFSET: u32 = 0;

/// The runtime loop: takes debounced events from the queue and turns them into HID reports,
/// layer changes and commands. Owns the layer mask and the per position cache of the code each
/// held key was pressed with, so a release always undoes its own press.
pub struct Dispatcher<
    'd,
    M: RawMutex,
    T: HidTransport,
    B: Backlight,
    S: Storage,
    const KEYS: usize,
> {
    queue: &'d EventQueue<M, KEYS>,
    config: Config,
    profiles: Profiles<'d, KEYS>,
    keymap: Keymap<'d, KEYS>,
    connection: Connection,
    pairs: PairRegistry<'d>,
    layer_mask: LayerMask,
    pressed: [ActionCode; KEYS],
    record: Record<KEYS>,
    storage: S,
    transport: T,
    backlight: B,
    macros: Option<&'d mut dyn MacroHandler>,
    pair_handler: Option<&'d mut dyn PairHandler>,
    mouse: MouseKeys,
    last_event: Timestamp,
}

impl<'d, M: RawMutex, T: HidTransport, B: Backlight, S: Storage, const KEYS: usize>
    Dispatcher<'d, M, T, B, S, KEYS>
{
    const OKAY: bool = crate::config::check_key_count::<KEYS>();

    pub fn new(
        queue: &'d EventQueue<M, KEYS>,
        profiles: Profiles<'d, KEYS>,
        mut transport: T,
        backlight: B,
        mut storage: S,
    ) -> Self {
        assert!(Self::OKAY);
        let record = Record::load(&mut storage, RECORD_OFFSET);
        if let Connection::Bluetooth(_) = transport.connection() {
            if let Err(err) = transport.select_bluetooth(record.bluetooth_id) {
                crate::warn!("select bluetooth {} failed {:?}", record.bluetooth_id, err);
            }
        }
        let connection = transport.connection();
        crate::info!("connection {:?}", connection);

        Self {
            queue,
            config: Config::default(),
            keymap: profiles.for_connection(connection),
            profiles,
            connection,
            pairs: PairRegistry::default(),
            layer_mask: LayerMask::BASE,
            pressed: [ActionCode::NONE; KEYS],
            record,
            storage,
            transport,
            backlight,
            macros: None,
            pair_handler: None,
            mouse: MouseKeys::default(),
            last_event: Timestamp::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config.validated();
        self
    }

    pub fn with_pairs(mut self, pairs: PairRegistry<'d>) -> Self {
        self.pairs = pairs;
        self
    }

    pub fn with_macro_handler(mut self, handler: &'d mut dyn MacroHandler) -> Self {
        self.macros = Some(handler);
        self
    }

    pub fn with_pair_handler(mut self, handler: &'d mut dyn PairHandler) -> Self {
        self.pair_handler = Some(handler);
        self
    }

    pub fn queue(&self) -> &'d EventQueue<M, KEYS> {
        self.queue
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layer_mask(&self) -> LayerMask {
        self.layer_mask
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn record(&self) -> &Record<KEYS> {
        &self.record
    }

    /// The code `position` was pressed with, or [ActionCode::NONE] when it is up.
    pub fn pressed(&self, position: u8) -> ActionCode {
        self.pressed
            .get(position as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    pub fn backlight_mut(&mut self) -> &mut B {
        &mut self.backlight
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// Wait for events (bounded by [Self::poll_timeout_ms]), then handle everything queued.
    pub async fn step(&mut self) {
        let timeout = self.poll_timeout_ms();
        self.queue.wait_len(1, timeout).await;
        self.check_connection();

        loop {
            if let Some(hit) =
                pairs::detect(
                    self.queue,
                    &self.pairs,
                    self.config.pair_delay_ms,
                    self.config.event_latency_ms(),
                )
                .await
            {
                self.on_pair(hit);
                continue;
            }
            let Some(event) = self.queue.pop() else {
                break;
            };
            self.observe(&event);
            if event.is_press() {
                self.press(event).await;
            } else {
                self.release(event);
            }
        }

        self.move_mouse();
    }

    /// Short while the mouse or backlight needs regular ticks, long otherwise.
    pub fn poll_timeout_ms(&mut self) -> i32 {
        if self.mouse.is_moving() || self.backlight.animating() {
            self.config.active_tick_ms as i32
        } else {
            self.config.idle_timeout_ms as i32
        }
    }

    fn observe(&mut self, event: &KeyEvent) {
        if event.is_press() {
            self.record.count_press(event.position);
        }
        self.backlight.handle_key(event.position, event.is_press());
    }

    fn on_pair(&mut self, hit: PairHit) {
        self.observe(&hit.first);
        self.observe(&hit.second);
        let mut device = Device::new(&mut self.transport, &mut self.backlight);
        match self.pair_handler.as_deref_mut() {
            Some(handler) => {
                if let Err(err) = handler.handle(&mut device, hit.index) {
                    crate::warn!("pair {} failed {:?}", hit.index, err);
                }
            }
            None => crate::debug!("no pair handler for {}", hit.index),
        }
    }

    async fn press(&mut self, event: KeyEvent) {
        let position = event.position;
        let code = self
            .keymap
            .resolve(self.layer_mask, self.profiles.keymap_position(position));
        let cached = self.dispatch_press(position, code, event.time).await;
        if let Some(slot) = self.pressed.get_mut(position as usize) {
            *slot = cached;
        }
        self.trace(&event, code);
    }

    fn release(&mut self, event: KeyEvent) {
        let code = self
            .pressed
            .get_mut(event.position as usize)
            .map(core::mem::take)
            .unwrap_or_default();
        self.dispatch_release(code);
        self.trace(&event, code);
    }

    /// Apply the press of `code`. Returns the code the release has to undo.
    async fn dispatch_press(
        &mut self,
        position: u8,
        code: ActionCode,
        time: Timestamp,
    ) -> ActionCode {
        match code.decode() {
            Action::NoOp | Action::Transparent => crate::debug!("no action {:?}", code),
            Action::Key { mods, keycode } => self.press_keys(&mods.with_key(keycode)),
            Action::ModTap { mods, tap } => match self.tap_or_hold(position, time).await {
                TapHold::Tap => return self.press_tap(tap),
                TapHold::Hold => self.press_keys(&mods.keycodes()),
            },
            Action::Usage(usage) => self.send_usage(usage, true),
            Action::MouseButton(mask) => {
                let buttons = self.mouse.press_buttons(mask);
                report("mouse buttons", self.transport.mouse_buttons(buttons));
            }
            Action::MouseMove(dir) => self.mouse.start(dir, Timestamp::now()),
            Action::LayerTap { layer, tap } => match self.tap_or_hold(position, time).await {
                TapHold::Tap => return self.press_tap(tap),
                TapHold::Hold => self.set_layer(layer),
            },
            Action::LayerTapToggle { layer } => match self.tap_or_hold(position, time).await {
                TapHold::Tap => {
                    self.layer_mask.toggle(layer);
                    crate::debug!("layer_mask {}", self.layer_mask.bits());
                    return ActionCode::NONE;
                }
                TapHold::Hold => self.set_layer(layer),
            },
            Action::LayerMods { layer, mods } => {
                self.press_keys(&mods.keycodes());
                self.set_layer(layer);
            }
            Action::Macro(index) => self.run_macro(index, true),
            Action::Backlight(op) => self.backlight_op(op),
            Action::Command(cmd) => self.command(cmd),
        }
        code
    }

    fn dispatch_release(&mut self, code: ActionCode) {
        match code.decode() {
            Action::Key { mods, keycode } => self.release_keys(&mods.with_key(keycode)),
            Action::ModTap { mods, .. } => self.release_keys(&mods.keycodes()),
            Action::Usage(usage) => self.send_usage(usage, false),
            Action::MouseButton(mask) => {
                let buttons = self.mouse.release_buttons(mask);
                report("mouse buttons", self.transport.mouse_buttons(buttons));
            }
            Action::MouseMove(dir) => {
                if self.mouse.stop(dir) {
                    report("mouse move", self.transport.move_mouse(0, 0, 0));
                }
            }
            Action::LayerTap { layer, .. } | Action::LayerTapToggle { layer } => {
                self.clear_layer(layer)
            }
            Action::LayerMods { layer, mods } => {
                self.release_keys(&mods.keycodes());
                self.clear_layer(layer);
            }
            Action::Macro(index) => self.run_macro(index, false),
            Action::NoOp
            | Action::Transparent
            | Action::Backlight(_)
            | Action::Command(_) => {}
        }
    }

    async fn tap_or_hold(&self, position: u8, time: Timestamp) -> TapHold {
        tap_hold::classify(
            self.queue,
            position,
            time,
            self.config.tap_delay_ms,
            self.config.fast_type_ms,
            self.config.event_latency_ms(),
        )
        .await
    }

    /// Tap side of a dual role key; keycode 0 sends nothing.
    fn press_tap(&mut self, tap: u8) -> ActionCode {
        if tap == key_range::NONE {
            return ActionCode::NONE;
        }
        self.press_keys(&[tap]);
        ActionCode::key(tap)
    }

    fn press_keys(&mut self, keycodes: &[u8]) {
        if !keycodes.is_empty() {
            report("press", self.transport.press(keycodes));
        }
    }

    fn release_keys(&mut self, keycodes: &[u8]) {
        if !keycodes.is_empty() {
            report("release", self.transport.release(keycodes));
        }
    }

    fn send_usage(&mut self, usage: Usage, pressed: bool) {
        match usage {
            Usage::System(id) => {
                report("system", self.transport.send_system(if pressed { id } else { 0 }))
            }
            Usage::Consumer(id) => report(
                "consumer",
                self.transport.send_consumer(if pressed { id } else { 0 }),
            ),
        }
    }

    fn set_layer(&mut self, layer: u8) {
        self.layer_mask.set(layer);
        crate::debug!("layer_mask {}", self.layer_mask.bits());
    }

    fn clear_layer(&mut self, layer: u8) {
        self.layer_mask.clear(layer);
        crate::debug!("layer_mask {}", self.layer_mask.bits());
    }

    fn run_macro(&mut self, index: u16, pressed: bool) {
        let mut device = Device::new(&mut self.transport, &mut self.backlight);
        match self.macros.as_deref_mut() {
            Some(handler) => {
                if let Err(err) = handler.handle(&mut device, index, pressed) {
                    crate::warn!("macro {} failed {:?}", index, err);
                }
            }
            None => crate::debug!("no macro handler for {}", index),
        }
    }

    fn backlight_op(&mut self, op: BacklightOp) {
        let light = &mut self.backlight;
        match op {
            BacklightOp::Toggle => light.toggle(),
            BacklightOp::NextMode => light.next_mode(),
            BacklightOp::HueUp => light.adjust_hue(BACKLIGHT_STEP),
            BacklightOp::HueDown => light.adjust_hue(-BACKLIGHT_STEP),
            BacklightOp::SatUp => light.adjust_sat(BACKLIGHT_STEP),
            BacklightOp::SatDown => light.adjust_sat(-BACKLIGHT_STEP),
            BacklightOp::ValUp => light.adjust_val(BACKLIGHT_STEP),
            BacklightOp::ValDown => light.adjust_val(-BACKLIGHT_STEP),
        }
    }

    fn command(&mut self, cmd: Command) {
        crate::info!("command {:?}", cmd);
        match cmd {
            Command::Bootloader => firmware_functions::reset_to_bootloader(),
            Command::Suspend => report("suspend", firmware_functions::suspend()),
            Command::Shutdown => firmware_functions::shutdown(),
            Command::Heatmap => self.save_record(),
            Command::UsbToggle => {
                report("usb toggle", self.transport.toggle_usb());
                self.sync_connection();
            }
            Command::BluetoothToggle => {
                report("bluetooth toggle", self.transport.toggle_bluetooth());
                self.sync_connection();
            }
            Command::Bluetooth(id) => self.change_bluetooth(id),
        }
    }

    fn change_bluetooth(&mut self, id: u8) {
        let id = nvm::clamp_bluetooth_id(id as u32);
        if let Err(err) = self.transport.select_bluetooth(id) {
            crate::warn!("select bluetooth {} failed {:?}", id, err);
            return;
        }
        if self.record.bluetooth_id != id {
            self.record.bluetooth_id = id;
            if let Err(err) = self
                .record
                .save_bluetooth_id(&mut self.storage, RECORD_OFFSET)
            {
                storage_failed(err);
            }
        }
        self.sync_connection();
    }

    fn save_record(&mut self) {
        match self.record.save(&mut self.storage, RECORD_OFFSET) {
            Ok(()) => crate::info!("heatmap saved"),
            Err(err) => storage_failed(err),
        }
    }

    fn check_connection(&mut self) {
        if let Some(connection) = self.transport.poll_connection() {
            if connection != self.connection {
                self.set_connection(connection);
            }
        }
    }

    fn sync_connection(&mut self) {
        let connection = self.transport.connection();
        if connection != self.connection {
            self.set_connection(connection);
        }
    }

    /// Switch keymaps. The layer mask starts over at the base layer.
    fn set_connection(&mut self, connection: Connection) {
        crate::info!("connection {:?}", connection);
        self.connection = connection;
        self.keymap = self.profiles.for_connection(connection);
        self.layer_mask = LayerMask::BASE;
    }

    fn move_mouse(&mut self) {
        if let Some((x, y, wheel)) = self.mouse.tick(&self.config.mouse, Timestamp::now()) {
            report("mouse move", self.transport.move_mouse(x, y, wheel));
        }
    }

    fn trace(&mut self, event: &KeyEvent, code: ActionCode) {
        if !self.config.verbose {
            return;
        }
        let latency = event.time.elapsed();
        let gap = event.time.since(self.last_event);
        self.last_event = event.time;
        crate::debug!(
            "{} {} {:?} latency {} | {}",
            event.position,
            if event.is_press() { "\\" } else { "/" },
            code,
            latency,
            gap
        );
    }
}

fn report(what: &str, result: Result<(), TransportError>) {
    if let Err(err) = result {
        crate::warn!("{} failed {:?}", what, err);
    }
}

fn storage_failed<E>(err: StorageError<E>) {
    match err {
        StorageError::Capacity => crate::warn!("storage too small for record"),
        StorageError::Backend(_) => crate::warn!("storage write failed"),
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod test;
