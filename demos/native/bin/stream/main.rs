//! Temperature stream on the native platform
//!
//! Runs the acquisition loop over simulated register blocks. Records go
//! to stdout once a second, exactly as they would leave the USART.
//!
//! ```bash
//! cargo run --bin stream
//! ```
//!
//! Stop with Ctrl-C.

use native_demos::{StdDelay, StdoutUart, ThermalAdc};
use tempstream::{Acquisition, Adc, Claim, DefaultConfig, Error, Uart};

static UART: Claim = Claim::new();
static ADC: Claim = Claim::new();

type Board = Acquisition<Adc<ThermalAdc>, Uart<StdoutUart>, StdDelay, DefaultConfig>;

fn main() -> Result<(), Error> {
    let uart_regs = UART.take(StdoutUart::new)?;
    let adc_regs = ADC.take(ThermalAdc::new)?;

    let board: Board = Acquisition::boot(uart_regs, adc_regs, StdDelay)?;
    board.run()
}
