use crate::bus::Bus;

/// Reads signed and unsigned bytes and 16-bit words from one device's registers.
pub struct RegisterReader<'a, B: ?Sized> {
    bus: &'a mut B,
    address: u8,
}

impl<'a, B: Bus + ?Sized> RegisterReader<'a, B> {
    pub fn new(bus: &'a mut B, address: u8) -> Self {
        RegisterReader { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn unsigned_word(&mut self, register: u8) -> Result<u16, B::Error> {
        self.bus.read_word(self.address, register)
    }

    /// Two's complement view of `unsigned_word`.
    pub fn signed_word(&mut self, register: u8) -> Result<i16, B::Error> {
        Ok(self.unsigned_word(register)? as i16)
    }

    pub fn unsigned_byte(&mut self, register: u8) -> Result<u8, B::Error> {
        self.bus.read_byte(self.address, register)
    }

    /// Two's complement view of `unsigned_byte`.
    pub fn signed_byte(&mut self, register: u8) -> Result<i8, B::Error> {
        Ok(self.unsigned_byte(register)? as i8)
    }
}
