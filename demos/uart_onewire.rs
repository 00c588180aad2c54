//! Read a Dell PSU's rating through a USB-UART adapter acting as a 1-Wire master.
//!
//! Wire the adapter's TX through a diode (or open drain buffer) onto RX, pull RX up to 5V with ~4.7k, and
//! connect RX to the centre pin of the PSU plug. Each 1-Wire slot is one UART frame:
//! * reset: send `0xF0` at 9600 baud, anything other than `0xF0` echoed back is a presence pulse,
//! * bits: at 115200 baud send `0xFF` for a 1 (or to read), `0x00` for a 0. An echo of `0xFF` reads as 1.

use std::{
    env,
    io::{self, Read, Write},
    time::Duration,
};

use dell_psu::{HeaderMode, PsuReader, SingleWireTransport};
use inquire::Select;
use serialport::{ClearBuffer, SerialPort};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const RESET_BAUD_RATE: u32 = 9600;
const DATA_BAUD_RATE: u32 = 115200;
const RESET_PULSE: u8 = 0xF0;
const SERIAL_TIMEOUT_MS: u64 = 100;

pub struct UartOneWire(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serialport::Error> for IoError {
    fn from(err: serialport::Error) -> Self {
        IoError(err.into())
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl UartOneWire {
    /// Send one UART frame per slot and return what came back on the shared line.
    fn slots<const N: usize>(&mut self, slots: [u8; N]) -> Result<[u8; N], IoError> {
        let mut echo = [0u8; N];
        self.0.write_all(&slots).map_err(IoError)?;
        self.0.read_exact(&mut echo).map_err(IoError)?;
        Ok(echo)
    }
}

impl embedded_io::ErrorType for UartOneWire {
    type Error = IoError;
}

impl SingleWireTransport for UartOneWire {
    fn reset(&mut self) -> Result<bool, Self::Error> {
        self.0.clear(ClearBuffer::All)?;
        self.0.set_baud_rate(RESET_BAUD_RATE)?;
        let [echo] = self.slots([RESET_PULSE])?;
        self.0.set_baud_rate(DATA_BAUD_RATE)?;
        Ok(echo != RESET_PULSE)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            let slots = core::array::from_fn(|bit| if byte >> bit & 1 == 1 { 0xFF } else { 0x00 });
            self.slots::<8>(slots)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let echo = self.slots([0xFF; 8])?;
        let byte = echo
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &slot)| acc | ((slot == 0xFF) as u8) << bit);
        Ok(byte)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    // Pass "strict" as the second argument to only accept genuine Dell bricks.
    let mode = match env::args().nth(2).as_deref() {
        Some("strict") => HeaderMode::Strict,
        _ => HeaderMode::Lenient,
    };

    info!(port = %port_name, ?mode, "Opening 1-Wire adapter");

    let port = serialport::new(&port_name, DATA_BAUD_RATE)
        .timeout(Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    let mut psu = PsuReader::new(UartOneWire(port));

    match psu.psu_detected() {
        Ok(true) => info!("PSU detected"),
        Ok(false) => {
            error!("No PSU detected, is the plug connected?");
            std::process::exit(1);
        }
        Err(err) => {
            error!(%err, "Bus reset failed");
            std::process::exit(1);
        }
    }

    match psu.read_data(mode) {
        Ok(rating) => {
            println!("Header: {}", String::from_utf8_lossy(&psu.header()));
            println!("Rating: {}", rating);
            println!("Watts: {}", psu.watts());
            println!("Voltage: {:.1}V", psu.millivolts() as f32 / 1000.0);
            println!("Current: {:.1}A", psu.milliamps() as f32 / 1000.0);
        }
        Err(err) => {
            error!(%err, raw = ?psu.raw_response(), "Failed to read PSU");
            std::process::exit(1);
        }
    }
}
