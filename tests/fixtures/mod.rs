//! Test fixtures for tempstream integration tests.
//!
//! Provides:
//! - `SimUart`: simulated USART register block (wire capture, RX queue, errors)
//! - `SimAdc`: simulated ADC register block (per-channel inputs, instant or slow conversions)
//! - `MockDelay`: delay provider that records every wait instead of sleeping
//! - `MockIo`: in-memory SerialIo with output capture and queued input
//! - `Timeline`: shared event log ordering delays, conversions and wire bytes

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use tempstream::registers::{adcon0, pir1, rcsta, txsta};
use tempstream::{AdcReg, RegisterBlock, SerialIo, UartReg};

// ============================================================================
// Timeline - shared event log
// ============================================================================

/// Something observable that happened on the simulated board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A wait of this many nanoseconds
    Delay(u64),
    /// A conversion started on this channel
    Conversion(u8),
    /// A byte left the USART
    Byte(u8),
}

/// Event log shared between fixtures.
#[derive(Debug, Clone, Default)]
pub struct Timeline(Rc<RefCell<Vec<Event>>>);

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Wire bytes only, as a string.
    pub fn wire(&self) -> String {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Byte(b) => Some(*b as char),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ============================================================================
// SimUart - simulated USART registers
// ============================================================================

/// Simulated USART.
///
/// `TXIF` reads as clear for `busy_polls` reads after every transmitted
/// byte, then as set. `RCIF` follows the receive queue.
#[derive(Debug)]
pub struct SimUart {
    file: [u8; 7],
    rx: VecDeque<u8>,
    busy_polls: usize,
    pending_busy: usize,
    overrun: bool,
    framing_error: bool,
    timeline: Timeline,

    /// Every register write, in order
    pub writes: Vec<(UartReg, u8)>,

    /// Number of `PIR1` reads that found `TXIF` clear
    pub txif_waits: usize,

    /// Number of times the receiver was restarted (CREN cleared)
    pub receiver_restarts: usize,
}

impl SimUart {
    pub fn new() -> Self {
        Self::with_timeline(&Timeline::new())
    }

    pub fn with_timeline(timeline: &Timeline) -> Self {
        Self {
            file: [0; 7],
            rx: VecDeque::new(),
            busy_polls: 0,
            pending_busy: 0,
            overrun: false,
            framing_error: false,
            timeline: timeline.clone(),
            writes: Vec::new(),
            txif_waits: 0,
            receiver_restarts: 0,
        }
    }

    /// Make `TXIF` stay clear for `polls` reads after each byte.
    pub fn with_busy_polls(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Queue bytes as if received from the line.
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Flag an overrun on the receiver.
    pub fn set_overrun(&mut self) {
        self.overrun = true;
    }

    /// Flag a framing error on the next received byte.
    pub fn set_framing_error(&mut self) {
        self.framing_error = true;
    }

    /// Bytes still waiting in the receive queue.
    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    /// Transmitted bytes as a string.
    pub fn wire(&self) -> String {
        self.timeline.wire()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current raw register value, without read side effects.
    pub fn peek(&self, reg: UartReg) -> u8 {
        self.file[reg as usize]
    }
}

impl RegisterBlock<UartReg> for SimUart {
    fn read(&mut self, reg: UartReg) -> u8 {
        match reg {
            UartReg::Pir1 => {
                let mut value = 0;
                if self.pending_busy > 0 {
                    self.pending_busy -= 1;
                    self.txif_waits += 1;
                } else {
                    value |= pir1::TXIF;
                }
                if !self.rx.is_empty() {
                    value |= pir1::RCIF;
                }
                value
            }
            UartReg::Rcsta => {
                let mut value = self.file[reg as usize];
                if self.overrun {
                    value |= rcsta::OERR;
                }
                if self.framing_error {
                    value |= rcsta::FERR;
                }
                value
            }
            UartReg::Rcreg => {
                self.framing_error = false;
                self.rx.pop_front().unwrap_or(0)
            }
            UartReg::Txsta => self.file[reg as usize] | txsta::TRMT,
            _ => self.file[reg as usize],
        }
    }

    fn write(&mut self, reg: UartReg, value: u8) {
        self.writes.push((reg, value));
        match reg {
            UartReg::Txreg => {
                self.timeline.push(Event::Byte(value));
                self.pending_busy = self.busy_polls;
            }
            UartReg::Rcsta => {
                if value & rcsta::CREN == 0 {
                    self.overrun = false;
                    self.receiver_restarts += 1;
                }
                self.file[reg as usize] = value & !(rcsta::OERR | rcsta::FERR);
            }
            _ => self.file[reg as usize] = value,
        }
    }
}

// ============================================================================
// SimAdc - simulated ADC registers
// ============================================================================

/// Simulated 10-bit ADC.
///
/// Setting `GO/DONE` latches the selected channel's input into the result
/// registers. The flag clears after `busy_polls` reads of `ADCON0`.
#[derive(Debug)]
pub struct SimAdc {
    file: [u8; 5],
    inputs: [u16; 8],
    busy_polls: usize,
    pending_busy: usize,
    timeline: Timeline,

    /// Every `ADCON0` write, in order
    pub adcon0_writes: Vec<u8>,

    /// Number of `ADCON0` reads that found a conversion in progress
    pub done_waits: usize,
}

impl SimAdc {
    pub fn new() -> Self {
        Self::with_timeline(&Timeline::new())
    }

    pub fn with_timeline(timeline: &Timeline) -> Self {
        Self {
            file: [0; 5],
            inputs: [0; 8],
            busy_polls: 0,
            pending_busy: 0,
            timeline: timeline.clone(),
            adcon0_writes: Vec::new(),
            done_waits: 0,
        }
    }

    /// Keep `GO/DONE` set for `polls` reads after each start.
    pub fn with_busy_polls(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Set the count a channel converts to (clamped to 10 bits by the sim).
    pub fn with_input(mut self, channel: u8, counts: u16) -> Self {
        self.set_input(channel, counts);
        self
    }

    pub fn set_input(&mut self, channel: u8, counts: u16) {
        self.inputs[channel as usize] = counts.min(1023);
    }

    /// Current raw register value, without read side effects.
    pub fn peek(&self, reg: AdcReg) -> u8 {
        self.file[reg as usize]
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn conversions(&self) -> usize {
        self.timeline
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Conversion(_)))
            .count()
    }
}

impl RegisterBlock<AdcReg> for SimAdc {
    fn read(&mut self, reg: AdcReg) -> u8 {
        if reg == AdcReg::Adcon0 && self.file[reg as usize] & adcon0::GO_DONE != 0 {
            if self.pending_busy > 0 {
                self.pending_busy -= 1;
                self.done_waits += 1;
            } else {
                self.file[reg as usize] &= !adcon0::GO_DONE;
            }
        }
        self.file[reg as usize]
    }

    fn write(&mut self, reg: AdcReg, value: u8) {
        if reg == AdcReg::Adcon0 {
            self.adcon0_writes.push(value);
            let starting =
                value & adcon0::GO_DONE != 0 && self.file[reg as usize] & adcon0::GO_DONE == 0;
            self.file[reg as usize] = value;
            if starting {
                let channel = (value & adcon0::CHS_MASK) >> adcon0::CHS_SHIFT;
                let result = self.inputs[channel as usize];
                self.file[AdcReg::Adresh as usize] = (result >> 8) as u8;
                self.file[AdcReg::Adresl as usize] = result as u8;
                self.timeline.push(Event::Conversion(channel));
                self.pending_busy = self.busy_polls;
            }
            return;
        }
        self.file[reg as usize] = value;
    }
}

// ============================================================================
// MockDelay - records waits
// ============================================================================

/// Delay provider that logs each wait to the timeline and returns at once.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    timeline: Timeline,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeline(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
        }
    }

    /// All recorded waits, in nanoseconds.
    pub fn waits(&self) -> Vec<u64> {
        self.timeline
            .events()
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ns) => Some(*ns),
                _ => None,
            })
            .collect()
    }

    pub fn total_ns(&self) -> u64 {
        self.waits().iter().sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.push(Event::Delay(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.push(Event::Delay(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timeline.push(Event::Delay(u64::from(ms) * 1_000_000));
    }
}

// ============================================================================
// MockIo - in-memory SerialIo
// ============================================================================

/// Mock serial I/O.
///
/// Captures output, serves queued input, optionally fails after a byte
/// budget to exercise error paths.
#[derive(Debug, Default)]
pub struct MockIo {
    input: VecDeque<u8>,
    output: Vec<u8>,
    fail_after: Option<usize>,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Fail every write once `bytes` bytes have been accepted.
    pub fn failing_after(bytes: usize) -> Self {
        Self {
            fail_after: Some(bytes),
            ..Self::default()
        }
    }

    pub fn push_input(&mut self, input: &[u8]) {
        self.input.extend(input.iter().copied());
    }

    pub fn input_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

impl SerialIo for MockIo {
    type Error = ();

    fn get_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.input.pop_front())
    }

    fn put_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        if let Some(limit) = self.fail_after
            && self.output.len() >= limit
        {
            return Err(());
        }
        self.output.push(byte);
        Ok(())
    }
}

// ============================================================================
// Samplers
// ============================================================================

/// Sampler replaying a fixed sequence (last value repeats).
#[derive(Debug)]
pub struct SequenceSampler {
    values: Vec<Result<u16, tempstream::Error>>,
    index: usize,
    pub channels: Vec<u8>,
}

impl SequenceSampler {
    pub fn new(values: &[u16]) -> Self {
        Self {
            values: values.iter().map(|&v| Ok(v)).collect(),
            index: 0,
            channels: Vec::new(),
        }
    }

    pub fn with_results(values: Vec<Result<u16, tempstream::Error>>) -> Self {
        Self {
            values,
            index: 0,
            channels: Vec::new(),
        }
    }
}

impl tempstream::Sampler for SequenceSampler {
    fn read_channel<D: DelayNs>(
        &mut self,
        channel: u8,
        _delay: &mut D,
    ) -> Result<u16, tempstream::Error> {
        self.channels.push(channel);
        let value = self.values[self.index.min(self.values.len() - 1)];
        self.index += 1;
        value
    }
}
