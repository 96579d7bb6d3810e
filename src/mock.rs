//! Mock transport for driving the client in tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{ApnsError, ApnsResult};
use crate::transport::{ConnectParams, Transport};

/// A scripted read outcome for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum ReadScript {
    /// Bytes the socket yields, split across reads as callers request.
    Data(Vec<u8>),
    /// A readable-but-empty read.
    Empty,
    /// Nothing readable within the poll window. A blocking read maps this
    /// to a timeout error.
    Silence,
    /// End of stream. A poll maps this to a readable-but-empty read.
    Eof,
}

#[derive(Debug, Default)]
struct MockState {
    connected: bool,
    op_count: usize,
    connect_count: usize,
    sent_frames: Vec<Vec<u8>>,
    script: VecDeque<ReadScript>,
    connect_error: Option<ApnsError>,
    write_error: Option<ApnsError>,
    last_address: Option<String>,
}

impl MockState {
    fn pop_read(&mut self, max: usize) -> Option<ReadScript> {
        match self.script.pop_front() {
            Some(ReadScript::Data(mut bytes)) => {
                if bytes.len() > max {
                    let rest = bytes.split_off(max);
                    self.script.push_front(ReadScript::Data(rest));
                }
                Some(ReadScript::Data(bytes))
            }
            other => other,
        }
    }
}

/// In-memory transport with scripted reads and recorded writes.
///
/// Clones share state, so a test keeps one handle for assertions while the
/// client owns the other. An exhausted read script means silence for polls
/// and end-of-stream for blocking reads.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mutex poisoned")
    }

    /// Scripts bytes for subsequent reads.
    pub fn queue_read(&self, bytes: impl Into<Vec<u8>>) {
        self.lock().script.push_back(ReadScript::Data(bytes.into()));
    }

    /// Scripts a readable-but-empty read.
    pub fn queue_empty_read(&self) {
        self.lock().script.push_back(ReadScript::Empty);
    }

    /// Scripts a poll window that elapses with nothing readable.
    pub fn queue_silence(&self) {
        self.lock().script.push_back(ReadScript::Silence);
    }

    /// Scripts end-of-stream.
    pub fn queue_eof(&self) {
        self.lock().script.push_back(ReadScript::Eof);
    }

    /// Fails the next connect with `error`.
    pub fn inject_connect_error(&self, error: ApnsError) {
        self.lock().connect_error = Some(error);
    }

    /// Fails the next write with `error`.
    pub fn inject_write_error(&self, error: ApnsError) {
        self.lock().write_error = Some(error);
    }

    /// Frames written so far, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.lock().sent_frames.clone()
    }

    /// Clears the recorded frames.
    pub fn clear_sent(&self) {
        self.lock().sent_frames.clear();
    }

    /// Number of transport operations attempted: connects, writes, and
    /// reads. Bookkeeping queries are not counted.
    pub fn op_count(&self) -> usize {
        self.lock().op_count
    }

    /// Number of successful connects.
    pub fn connect_count(&self) -> usize {
        self.lock().connect_count
    }

    /// Address given to the most recent connect.
    pub fn last_address(&self) -> Option<String> {
        self.lock().last_address.clone()
    }

    /// Forces the connection state, e.g. to simulate a dropped socket.
    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Current connection state without going through the trait.
    pub fn connected(&self) -> bool {
        self.lock().connected
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, params: &ConnectParams) -> ApnsResult<()> {
        let mut state = self.lock();
        state.op_count += 1;
        if let Some(error) = state.connect_error.take() {
            return Err(error);
        }
        state.connected = true;
        state.connect_count += 1;
        state.last_address = Some(params.address.clone());
        Ok(())
    }

    fn disconnect(&mut self) -> ApnsResult<()> {
        self.lock().connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn write_all(&mut self, frame: &[u8]) -> ApnsResult<()> {
        let mut state = self.lock();
        state.op_count += 1;
        if !state.connected {
            return Err(ApnsError::NotConnected);
        }
        if let Some(error) = state.write_error.take() {
            return Err(error);
        }
        state.sent_frames.push(frame.to_vec());
        Ok(())
    }

    fn poll_read(&mut self, max: usize, _wait: Duration) -> ApnsResult<Option<Vec<u8>>> {
        let mut state = self.lock();
        state.op_count += 1;
        if !state.connected {
            return Err(ApnsError::NotConnected);
        }
        match state.pop_read(max) {
            Some(ReadScript::Data(bytes)) => Ok(Some(bytes)),
            Some(ReadScript::Empty) | Some(ReadScript::Eof) => Ok(Some(Vec::new())),
            Some(ReadScript::Silence) | None => Ok(None),
        }
    }

    fn read_chunk(&mut self, max: usize) -> ApnsResult<Option<Vec<u8>>> {
        let mut state = self.lock();
        state.op_count += 1;
        if !state.connected {
            return Err(ApnsError::NotConnected);
        }
        match state.pop_read(max) {
            Some(ReadScript::Data(bytes)) => Ok(Some(bytes)),
            Some(ReadScript::Empty) => Ok(Some(Vec::new())),
            Some(ReadScript::Eof) | None => Ok(None),
            Some(ReadScript::Silence) => {
                Err(ApnsError::ReadFailed("read timed out".to_string()))
            }
        }
    }
}
