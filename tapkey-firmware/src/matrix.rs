use core::pin::pin;

use embassy_futures::select::select_slice;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

use crate::{
    debounce::Debouncer,
    event_queue::{EventQueue, Timestamp},
};

/// Number of consecutive scans with every key free before waiting for activity.
const IDLE_WAIT_COUNT: u32 = 100;

/// Row and column access to the switch matrix.
#[allow(async_fn_in_trait)]
pub trait MatrixDriver {
    fn set_row(&mut self, row: usize, asserted: bool);
    fn read_column(&mut self, col: usize) -> bool;

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    /// Wait until any switch might be down. The default keeps polling.
    async fn wait_for_activity(&mut self) {}
}

pub const fn check_matrix<const ROWS: usize, const COLS: usize, const KEYS: usize>() -> bool {
    assert!(ROWS * COLS == KEYS);
    crate::config::check_key_count::<KEYS>()
}

/// Scans a `ROWS` x `COLS` matrix and feeds every level through the [Debouncer]. Position is
/// `row * COLS + col`.
pub struct MatrixScanner<
    'q,
    D: MatrixDriver,
    M: RawMutex,
    const ROWS: usize,
    const COLS: usize,
    const KEYS: usize,
> {
    driver: D,
    debouncer: Debouncer<KEYS>,
    queue: &'q EventQueue<M, KEYS>,
    idle_scans: u32,
}

impl<'q, D: MatrixDriver, M: RawMutex, const ROWS: usize, const COLS: usize, const KEYS: usize>
    MatrixScanner<'q, D, M, ROWS, COLS, KEYS>
{
    const OKAY: bool = check_matrix::<ROWS, COLS, KEYS>();

    pub fn new(driver: D, debouncer: Debouncer<KEYS>, queue: &'q EventQueue<M, KEYS>) -> Self {
        assert!(Self::OKAY);
        Self {
            driver,
            debouncer,
            queue,
            idle_scans: 0,
        }
    }

    pub const fn position(row: usize, col: usize) -> u8 {
        (row * COLS + col) as u8
    }

    pub fn debouncer(&self) -> &Debouncer<KEYS> {
        &self.debouncer
    }

    pub fn debouncer_mut(&mut self) -> &mut Debouncer<KEYS> {
        &mut self.debouncer
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// One pass over every row. Returns true when every key is free.
    pub fn scan(&mut self) -> bool {
        let now = self.driver.now();
        for row in 0..ROWS {
            self.driver.set_row(row, true);
            for col in 0..COLS {
                let level = self.driver.read_column(col);
                self.debouncer
                    .sample(Self::position(row, col), level, now, self.queue);
            }
            self.driver.set_row(row, false);
        }

        let idle = self.debouncer.all_free();
        if idle {
            self.idle_scans = self.idle_scans.saturating_add(1);
        } else {
            self.idle_scans = 0;
        }
        idle
    }

    pub async fn run(&mut self, period_us: u32) -> ! {
        let mut ticker = Ticker::every(Duration::from_micros(period_us as u64));
        loop {
            self.scan();
            if self.idle_scans >= IDLE_WAIT_COUNT {
                crate::debug!("matrix idle");
                self.driver.wait_for_activity().await;
                self.idle_scans = 0;
                ticker.reset();
            }
            ticker.next().await;
        }
    }
}

/// [MatrixDriver] over GPIO pins: rows are outputs driven low when asserted, columns are inputs
/// with pull-ups that read low through a closed switch.
pub struct PinMatrix<I: InputPin + Wait, O: OutputPin, const ROWS: usize, const COLS: usize> {
    rows: [O; ROWS],
    cols: [I; COLS],
}

impl<I: InputPin + Wait, O: OutputPin, const ROWS: usize, const COLS: usize>
    PinMatrix<I, O, ROWS, COLS>
{
    pub fn new(mut rows: [O; ROWS], cols: [I; COLS]) -> Self {
        for pin in rows.iter_mut() {
            let _ = pin.set_high();
        }
        Self { rows, cols }
    }
}

impl<I: InputPin + Wait, O: OutputPin, const ROWS: usize, const COLS: usize> MatrixDriver
    for PinMatrix<I, O, ROWS, COLS>
{
    fn set_row(&mut self, row: usize, asserted: bool) {
        if let Some(pin) = self.rows.get_mut(row) {
            let _ = if asserted {
                pin.set_low()
            } else {
                pin.set_high()
            };
        }
    }

    fn read_column(&mut self, col: usize) -> bool {
        self.cols
            .get_mut(col)
            .map(|pin| pin.is_low().unwrap_or(false))
            .unwrap_or(false)
    }

    async fn wait_for_activity(&mut self) {
        for pin in self.rows.iter_mut() {
            let _ = pin.set_low();
        }
        Timer::after_micros(10).await;
        {
            let mut futs = self.cols.each_mut().map(|pin| pin.wait_for_low());
            let _ = select_slice(pin!(futs.as_mut_slice())).await;
        }
        for pin in self.rows.iter_mut() {
            let _ = pin.set_high();
        }
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod test;
