#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::{DateTime, TimeZone, Utc};
use embedded_hal::delay::DelayNs;
use rpbme280::{Bus, CalibParams, Clock, IdGenerator};
use uuid::Uuid;

/// Bus transaction, as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    WriteByte { address: u8, register: u8, value: u8 },
    ReadByte { address: u8, register: u8 },
    ReadWord { address: u8, register: u8 },
    ReadBlock { address: u8, register: u8, length: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFault(pub &'static str);

/// Scripted bus. Word reads and byte reads each return 0, 1, 2, ... in
/// call order; block reads pop the next entry of `blocks`.
#[derive(Debug, Default)]
pub struct MockBus {
    pub transactions: RefCell<Vec<Transaction>>,
    pub blocks: VecDeque<Vec<u8>>,
    next_word: u16,
    next_byte: u8,
    /// Fail the n-th transaction (0-based).
    pub fail_at: Option<usize>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(block: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.blocks.push_back(block.to_vec());
        bus
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.borrow().clone()
    }

    pub fn clear(&self) {
        self.transactions.borrow_mut().clear();
    }

    fn record(&self, transaction: Transaction) -> Result<(), BusFault> {
        let mut log = self.transactions.borrow_mut();
        let index = log.len();
        log.push(transaction);
        if self.fail_at == Some(index) {
            return Err(BusFault("nack"));
        }
        Ok(())
    }
}

impl Bus for MockBus {
    type Error = BusFault;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusFault> {
        self.record(Transaction::WriteByte {
            address,
            register,
            value,
        })
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, BusFault> {
        self.record(Transaction::ReadByte { address, register })?;
        let value = self.next_byte;
        self.next_byte = self.next_byte.wrapping_add(1);
        Ok(value)
    }

    fn read_word(&mut self, address: u8, register: u8) -> Result<u16, BusFault> {
        self.record(Transaction::ReadWord { address, register })?;
        let value = self.next_word;
        self.next_word = self.next_word.wrapping_add(1);
        Ok(value)
    }

    fn read_block(&mut self, address: u8, register: u8, length: u8) -> Result<Vec<u8>, BusFault> {
        self.record(Transaction::ReadBlock {
            address,
            register,
            length,
        })?;
        Ok(self.blocks.pop_front().unwrap_or_default())
    }
}

/// Accumulates requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hands out 1, 2, 3, ... as UUIDs.
#[derive(Default)]
pub struct SequentialIds(pub u128);

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        self.0 += 1;
        Uuid::from_u128(self.0)
    }
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 3, 18, 19, 26, 14).unwrap()
}

pub fn fixture_params() -> CalibParams {
    CalibParams {
        dig_t1: 20,
        dig_t2: 21,
        dig_t3: 22,
        dig_p1: 10,
        dig_p2: 11,
        dig_p3: 12,
        dig_p4: 13,
        dig_p5: 14,
        dig_p6: 15,
        dig_p7: 16,
        dig_p8: 17,
        dig_p9: 18,
        dig_h1: 0,
        dig_h2: 1,
        dig_h3: 4,
        dig_h4: 3,
        dig_h5: 5,
        dig_h6: 6,
    }
}
