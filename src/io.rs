//! Byte I/O abstraction for the serial record stream.
//!
//! The `SerialIo` trait is what the acquisition loop writes records to. The
//! USART driver implements it; tests substitute an in-memory capture.

/// Platform-agnostic byte I/O trait.
///
/// Writes may block until the transport accepts the byte (the USART spins
/// on its transmit-empty flag). Reads never block.
pub trait SerialIo {
    /// Platform-specific error type
    type Error;

    /// Non-blocking byte read.
    ///
    /// Returns:
    /// - `Ok(Some(byte))` if a byte was received
    /// - `Ok(None)` if nothing is pending
    /// - `Err(Self::Error)` on I/O error
    fn get_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write one byte.
    fn put_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write a string, stopping at a NUL if one is present.
    ///
    /// Default implementation uses `put_byte()` repeatedly.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes().take_while(|&b| b != 0) {
            self.put_byte(byte)?;
        }
        Ok(())
    }

    /// Read and drop every pending byte.
    ///
    /// Returns how many bytes were discarded.
    fn discard_input(&mut self) -> Result<usize, Self::Error> {
        let mut count = 0;
        while self.get_byte()?.is_some() {
            count += 1;
        }
        Ok(count)
    }
}
