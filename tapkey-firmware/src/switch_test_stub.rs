//! Simulated switch matrices for tests. [Switches] is a [MatrixDriver] with directly scripted
//! switch levels; [PinBoard] hands out row and column pins that behave like a diode matrix.

extern crate std;

use core::cell::RefCell;

use embassy_time::Timer;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;
use std::{rc::Rc, vec, vec::Vec};

use crate::matrix::MatrixDriver;

#[derive(Debug, Default)]
struct SwitchState {
    cols: usize,
    closed: Vec<bool>,
    asserted_row: Option<usize>,
    activity_waits: usize,
}

#[derive(Clone)]
pub struct Switches(Rc<RefCell<SwitchState>>);

impl Switches {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self(Rc::new(RefCell::new(SwitchState {
            cols,
            closed: vec![false; rows * cols],
            ..Default::default()
        })))
    }

    pub fn set(&self, row: usize, col: usize, closed: bool) {
        let mut state = self.0.borrow_mut();
        let i = row * state.cols + col;
        state.closed[i] = closed;
    }

    pub fn activity_waits(&self) -> usize {
        self.0.borrow().activity_waits
    }
}

impl MatrixDriver for Switches {
    fn set_row(&mut self, row: usize, asserted: bool) {
        let mut state = self.0.borrow_mut();
        if asserted {
            state.asserted_row = Some(row);
        } else if state.asserted_row == Some(row) {
            state.asserted_row = None;
        }
    }

    fn read_column(&mut self, col: usize) -> bool {
        let state = self.0.borrow();
        match state.asserted_row {
            Some(row) => state.closed[row * state.cols + col],
            None => false,
        }
    }

    async fn wait_for_activity(&mut self) {
        self.0.borrow_mut().activity_waits += 1;
    }
}

#[derive(Debug)]
pub struct TestError;

impl Error for TestError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct Board {
    cols: usize,
    closed: Vec<bool>,
    /// Output level of each row pin; high is idle.
    row_high: Vec<bool>,
}

impl Board {
    fn col_is_low(&self, col: usize) -> bool {
        self.row_high
            .iter()
            .enumerate()
            .any(|(row, high)| !high && self.closed[row * self.cols + col])
    }
}

/// Pins wired as a matrix with pull-up columns.
#[derive(Clone)]
pub struct PinBoard(Rc<RefCell<Board>>);

impl PinBoard {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self(Rc::new(RefCell::new(Board {
            cols,
            closed: vec![false; rows * cols],
            row_high: vec![true; rows],
        })))
    }

    pub fn set(&self, row: usize, col: usize, closed: bool) {
        let mut board = self.0.borrow_mut();
        let i = row * board.cols + col;
        board.closed[i] = closed;
    }

    pub fn row_pin(&self, row: usize) -> RowPin {
        RowPin {
            board: self.clone(),
            row,
        }
    }

    pub fn col_pin(&self, col: usize) -> ColPin {
        ColPin {
            board: self.clone(),
            col,
        }
    }

    pub fn row_is_high(&self, row: usize) -> bool {
        self.0.borrow().row_high[row]
    }
}

pub struct RowPin {
    board: PinBoard,
    row: usize,
}

pub struct ColPin {
    board: PinBoard,
    col: usize,
}

impl ErrorType for RowPin {
    type Error = TestError;
}

impl ErrorType for ColPin {
    type Error = TestError;
}

impl OutputPin for RowPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board.0.borrow_mut().row_high[self.row] = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.0.borrow_mut().row_high[self.row] = true;
        Ok(())
    }
}

impl InputPin for ColPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.board.0.borrow().col_is_low(self.col))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.board.0.borrow().col_is_low(self.col))
    }
}

impl Wait for ColPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        while self.is_low()? {
            Timer::after_millis(1).await;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        while self.is_high()? {
            Timer::after_millis(1).await;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_low().await?;
        self.wait_for_high().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await?;
        self.wait_for_low().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        if self.is_low()? {
            self.wait_for_high().await
        } else {
            self.wait_for_low().await
        }
    }
}
