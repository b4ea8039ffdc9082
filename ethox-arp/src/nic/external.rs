//! A stub nic whose frames come from an external source.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::{Device, Error, Result};

/// An in-memory device.
///
/// Frames to be received are injected by the owner and handed out in order. Transmitted frames
/// are recorded and can be inspected or taken. Transmission can be made to fail, to exercise the
/// error paths of the layers above.
#[derive(Debug, Default)]
pub struct External {
    /// Frames pending to be received, in order.
    recv: VecDeque<Vec<u8>>,

    /// All frames sent so far.
    sent: Vec<Vec<u8>>,

    /// The error to report on transmission, if any.
    fail: Option<Error>,
}

impl External {
    /// A new device without pending frames.
    pub fn new() -> Self {
        External::default()
    }

    /// Queue a frame to be received.
    pub fn inject(&mut self, frame: Vec<u8>) {
        self.recv.push_back(frame)
    }

    /// Remaining number of frames to receive.
    pub fn to_recv(&self) -> usize {
        self.recv.len()
    }

    /// All frames transmitted since the last call to `take_sent`.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Take all frames transmitted so far.
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        core::mem::replace(&mut self.sent, Vec::new())
    }

    /// Make all following transmissions fail with `err`, or succeed again with `None`.
    pub fn set_failure(&mut self, err: Option<Error>) {
        self.fail = err;
    }
}

impl Device for External {
    fn tx(&mut self, frame: &[u8]) -> Result<()> {
        if let Some(err) = self.fail {
            return Err(err);
        }

        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn rx(&mut self, buffer: &mut [u8]) -> Result<Option<usize>> {
        let frame = match self.recv.pop_front() {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let len = frame.len();
        if len > buffer.len() {
            return Err(Error::BadSize);
        }

        buffer[..len].copy_from_slice(&frame);
        Ok(Some(len))
    }
}
