use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    payload::{HEADER_LEN, PAYLOAD_LEN, READ_COMMAND, decode_payload, header_matches},
    transport::SingleWireTransport,
    types::{HeaderMode, PsuRating, ReaderState},
};

/// You can create a PsuReader using any bus master which implements [SingleWireTransport].
///
/// The reader keeps the rating from the last successful [Self::read_data]. A failed read leaves the previous
/// values in place, so check the result of `read_data` (or [Self::state]) rather than only the accessors.
pub struct PsuReader<T: SingleWireTransport> {
    transport: T,
    rating: PsuRating,
    /// Last bytes read from the device, kept even when the read was rejected.
    raw_response: [u8; PAYLOAD_LEN],
    state: ReaderState,
}

impl<T: SingleWireTransport> PsuReader<T> {
    /// Create a new PsuReader on the given bus. Values read as zero until the first successful read.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            rating: PsuRating::default(),
            raw_response: [0; PAYLOAD_LEN],
            state: ReaderState::NoData,
        }
    }

    /// Give back the bus master.
    pub fn release(self) -> T {
        self.transport
    }

    /// Reset the bus and return whether a PSU answered.
    ///
    /// Every transaction on the bus must start with a reset, [Self::read_data] does this itself.
    pub fn psu_detected(&mut self) -> Result<bool, T::Error> {
        self.transport.reset().map_err(Error::Transport)
    }

    /// Read and decode the rating from the PSU.
    ///
    /// With [HeaderMode::Strict] the payload must start with `DELL00AC`. On any error the previously decoded
    /// values are kept. [Self::raw_response] is overwritten once the payload phase is reached, even if the
    /// payload is then rejected.
    pub fn read_data(&mut self, mode: HeaderMode) -> Result<PsuRating, T::Error> {
        if !self.psu_detected()? {
            debug!("No PSU present on the bus");
            return Err(Error::NotPresent);
        }

        self.transport.skip_selection().map_err(Error::Transport)?;
        self.transport
            .write_bytes(&READ_COMMAND)
            .map_err(Error::Transport)?;

        // The device echoes a CRC of the command it received. This covers the command only, the payload
        // itself carries no checksum.
        let received = self.transport.read_byte().map_err(Error::Transport)?;
        let expected = self.transport.checksum8(&READ_COMMAND);
        if received != expected {
            warn!(expected, received, "PSU command checksum mismatch");
            return Err(Error::ChecksumMismatch { expected, received });
        }

        for byte in self.raw_response.iter_mut() {
            *byte = self.transport.read_byte().map_err(Error::Transport)?;
        }

        if mode == HeaderMode::Strict && !header_matches(&self.raw_response) {
            warn!(header = ?&self.raw_response[..HEADER_LEN], "PSU header is not DELL00AC");
            return Err(Error::HeaderMismatch);
        }

        let rating = decode_payload(&self.raw_response).inspect_err(|err| {
            warn!(%err, "Could not decode PSU rating");
        })?;

        debug!(
            watts = rating.watts,
            millivolts = rating.millivolts,
            milliamps = rating.milliamps,
            "Read PSU rating"
        );
        self.rating = rating;
        self.state = ReaderState::HasData;
        Ok(rating)
    }

    /// Rated power in watts from the last successful read.
    pub fn watts(&self) -> u16 {
        self.rating.watts
    }

    /// Output voltage in millivolts from the last successful read.
    pub fn millivolts(&self) -> u16 {
        self.rating.millivolts
    }

    /// Output current in milliamps from the last successful read.
    pub fn milliamps(&self) -> u16 {
        self.rating.milliamps
    }

    /// The full rating, or `None` if no read has succeeded yet.
    pub fn rating(&self) -> Option<PsuRating> {
        match self.state {
            ReaderState::NoData => None,
            ReaderState::HasData => Some(self.rating),
        }
    }

    /// Copy of the bytes received during the last transaction that got as far as the payload.
    pub fn raw_response(&self) -> [u8; PAYLOAD_LEN] {
        self.raw_response
    }

    /// The header part of [Self::raw_response].
    pub fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0; HEADER_LEN];
        header.copy_from_slice(&self.raw_response[..HEADER_LEN]);
        header
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }
}
