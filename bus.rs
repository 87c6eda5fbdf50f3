/// Register-level access to a two-wire bus.
///
/// Every call names the 7-bit device address and the 8-bit register. Word
/// reads return the register pair little-endian, as SMBus does.
pub trait Bus {
    type Error;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;

    fn read_word(&mut self, address: u8, register: u8) -> Result<u16, Self::Error>;

    fn read_block(&mut self, address: u8, register: u8, length: u8)
        -> Result<Vec<u8>, Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_byte(address, register, value)
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_byte(address, register)
    }

    fn read_word(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        (**self).read_word(address, register)
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        length: u8,
    ) -> Result<Vec<u8>, Self::Error> {
        (**self).read_block(address, register, length)
    }
}

#[cfg(feature = "rpi")]
mod rpi {
    use super::Bus;
    use rppal::i2c::{Error, I2c};

    // The slave address is selected before every transfer so one handle can
    // serve several devices on the same bus.
    impl Bus for I2c {
        type Error = Error;

        fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), Error> {
            self.set_slave_address(address as u16)?;
            self.smbus_write_byte(register, value)
        }

        fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Error> {
            self.set_slave_address(address as u16)?;
            self.smbus_read_byte(register)
        }

        fn read_word(&mut self, address: u8, register: u8) -> Result<u16, Error> {
            self.set_slave_address(address as u16)?;
            self.smbus_read_word(register)
        }

        fn read_block(&mut self, address: u8, register: u8, length: u8) -> Result<Vec<u8>, Error> {
            self.set_slave_address(address as u16)?;
            let mut buffer = vec![0u8; length as usize];
            self.write_read(&[register], &mut buffer)?;
            Ok(buffer)
        }
    }
}
