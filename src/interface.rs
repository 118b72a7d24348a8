use core::convert::Infallible;

/// The framing layer between the driver and the bus. Every transfer starts with a control byte
/// selecting whether the controller interprets the rest as commands or as display data.
pub trait DisplayInterface {
    type Error;

    /// Send command bytes, opcodes and arguments alike, one bus transfer per byte.
    fn send_commands(&mut self, cmds: &[u8]) -> Result<(), Self::Error>;

    /// Send display data into the current addressing window, in transfers of at most `WIRE_MAX`
    /// payload bytes.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// The bus address every transfer goes to, for interfaces which have one.
    fn bus_address(&self) -> Option<u8> {
        None
    }
}

/// Stand-in for a display without a reset line. Writes to it do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResetPin;

impl hal::digital::v2::OutputPin for NoResetPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub mod i2c {
    //! The I2C interface. The SH1107 takes a control byte at the start of every transfer:
    //! `0x00` for a command byte, `0x40` for a run of display data. Command bytes are never
    //! batched, the controller is only known to accept one per transfer.

    use super::DisplayInterface;
    use crate::command::consts::{COMMAND_MARKER, DATA_MARKER, DEFAULT_ADDRESS, WIRE_MAX};

    #[derive(Debug)]
    pub struct I2cInterface<I2C> {
        /// The I2C master the SH1107 is attached to.
        i2c: I2C,
        /// 7-bit address of the SH1107 on the bus.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        /// Create a new I2C interface talking to the controller at the 7-bit `address`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Create a new I2C interface at the default address `0x3C`.
        pub fn with_default_address(i2c: I2C) -> Self {
            Self::new(i2c, DEFAULT_ADDRESS)
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        /// Give back the I2C master.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        type Error = I2C::Error;

        fn send_commands(&mut self, cmds: &[u8]) -> Result<(), Self::Error> {
            for &cmd in cmds {
                self.i2c.write(self.address, &[COMMAND_MARKER, cmd])?;
            }
            Ok(())
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            let mut transfer = [0u8; WIRE_MAX + 1];
            transfer[0] = DATA_MARKER;
            for chunk in buf.chunks(WIRE_MAX) {
                transfer[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c.write(self.address, &transfer[..=chunk.len()])?;
            }
            Ok(())
        }

        fn bus_address(&self) -> Option<u8> {
            Some(self.address)
        }
    }

}

#[cfg(test)]
pub mod test_spy {
    //! Interfaces and peripherals for use in unit tests to spy on whatever was sent to them.

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::DisplayInterface;

    /// What reached a `TestSpyInterface`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
    }

    #[derive(Debug)]
    pub struct TestSpyInterface {
        sent: Rc<RefCell<Vec<Sent>>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            TestSpyInterface {
                sent: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// A second handle onto the same record, to be moved into a driver.
        pub fn split(&self) -> Self {
            TestSpyInterface {
                sent: self.sent.clone(),
            }
        }

        /// Exactly one command `cmd` with argument bytes `args` was sent.
        pub fn check(&self, cmd: u8, args: &[u8]) {
            let mut expect = vec![Sent::Cmd(cmd)];
            expect.extend(args.iter().map(|&a| Sent::Cmd(a)));
            assert_eq!(*self.sent.borrow(), expect);
        }

        pub fn check_multi(&self, expect: &[Sent]) {
            assert_eq!(&self.sent.borrow()[..], expect);
        }

        pub fn clear(&mut self) {
            self.sent.borrow_mut().clear()
        }
    }

    impl DisplayInterface for TestSpyInterface {
        type Error = ();

        fn send_commands(&mut self, cmds: &[u8]) -> Result<(), ()> {
            self.sent
                .borrow_mut()
                .extend(cmds.iter().map(|&c| Sent::Cmd(c)));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), ()> {
            self.sent.borrow_mut().push(Sent::Data(data.to_vec()));
            Ok(())
        }
    }

    /// One observable event on the shared bus/pin/delay timeline.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Event {
        Write(u8, Vec<u8>),
        PinHigh,
        PinLow,
        Delay(u16),
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SpyError(pub usize);

    type Timeline = Rc<RefCell<Vec<Event>>>;

    /// An I2C master that records every write, and can fail the write with a given index.
    #[derive(Debug)]
    pub struct SpyI2c {
        events: Timeline,
        fail_at: Option<usize>,
        attempts: Rc<RefCell<usize>>,
    }

    impl SpyI2c {
        pub fn new() -> Self {
            Self::on_timeline(Rc::new(RefCell::new(Vec::new())))
        }

        pub fn on_timeline(events: Timeline) -> Self {
            SpyI2c {
                events,
                fail_at: None,
                attempts: Rc::new(RefCell::new(0)),
            }
        }

        /// Fail the write with index `n` (counting from 0) and every write after it.
        pub fn fail_at(self, n: usize) -> Self {
            SpyI2c {
                fail_at: Some(n),
                ..self
            }
        }

        pub fn split(&self) -> Self {
            SpyI2c {
                events: self.events.clone(),
                fail_at: self.fail_at,
                attempts: self.attempts.clone(),
            }
        }

        /// Successful writes, in order.
        pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Write(addr, bytes) => Some((*addr, bytes.clone())),
                    _ => None,
                })
                .collect()
        }

        pub fn check_writes(&self, address: u8, expect: &[&[u8]]) {
            let writes = self.writes();
            assert_eq!(writes.len(), expect.len());
            for ((addr, bytes), exp) in writes.iter().zip(expect.iter()) {
                assert_eq!(*addr, address);
                assert_eq!(&bytes[..], *exp);
            }
        }

        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }

    impl hal::blocking::i2c::Write for SpyI2c {
        type Error = SpyError;

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            let n = {
                let mut attempts = self.attempts.borrow_mut();
                *attempts += 1;
                *attempts - 1
            };
            match self.fail_at {
                Some(f) if n >= f => Err(SpyError(n)),
                _ => {
                    self.events
                        .borrow_mut()
                        .push(Event::Write(address, bytes.to_vec()));
                    Ok(())
                }
            }
        }
    }

    /// A reset pin recording its edges on a timeline.
    #[derive(Debug)]
    pub struct SpyPin {
        events: Timeline,
    }

    impl SpyPin {
        pub fn on_timeline(events: Timeline) -> Self {
            SpyPin { events }
        }
    }

    impl hal::digital::v2::OutputPin for SpyPin {
        type Error = ();

        fn set_low(&mut self) -> Result<(), ()> {
            self.events.borrow_mut().push(Event::PinLow);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ()> {
            self.events.borrow_mut().push(Event::PinHigh);
            Ok(())
        }
    }

    /// A delay which returns at once and records how long it was asked to wait.
    #[derive(Debug)]
    pub struct SpyDelay {
        events: Timeline,
    }

    impl SpyDelay {
        pub fn on_timeline(events: Timeline) -> Self {
            SpyDelay { events }
        }
    }

    impl hal::blocking::delay::DelayMs<u16> for SpyDelay {
        fn delay_ms(&mut self, ms: u16) {
            self.events.borrow_mut().push(Event::Delay(ms));
        }
    }

    /// A bus, reset pin and delay sharing one timeline, so their relative order can be checked.
    #[derive(Debug)]
    pub struct Bench {
        pub events: Timeline,
    }

    impl Bench {
        pub fn new() -> Self {
            Bench {
                events: Rc::new(RefCell::new(Vec::new())),
            }
        }

        pub fn i2c(&self) -> SpyI2c {
            SpyI2c::on_timeline(self.events.clone())
        }

        pub fn pin(&self) -> SpyPin {
            SpyPin::on_timeline(self.events.clone())
        }

        pub fn delay(&self) -> SpyDelay {
            SpyDelay::on_timeline(self.events.clone())
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }
}
