//! Transport abstraction for gateway sockets.
//!
//! The trait is the seam between connection management and socket I/O so
//! the client can be driven against a mock in tests.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::ApnsResult;

/// Read/write timeout applied to every gateway socket after connect.
pub const READ_TIMEOUT: Duration = Duration::from_secs(20);

/// Parameters for opening one gateway connection.
#[derive(Clone)]
pub struct ConnectParams {
    /// Gateway address as `host:port`.
    pub address: String,
    /// Path to the PKCS#12 client identity bundle.
    pub identity_file: PathBuf,
    /// Passphrase for the identity bundle. Zeroed on drop.
    pub passphrase: Zeroizing<String>,
    /// TCP connect-phase timeout.
    pub connect_timeout: Duration,
    /// Socket read/write timeout after connect.
    pub read_timeout: Duration,
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("address", &self.address)
            .field("identity_file", &self.identity_file)
            .field("passphrase", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

/// Transport over one gateway socket.
///
/// Implementations are synchronous; every blocking call is bounded by the
/// timeouts in [`ConnectParams`].
pub trait Transport: Send {
    /// Opens the socket and performs the TLS handshake. A no-op when a
    /// live socket is already held.
    fn connect(&mut self, params: &ConnectParams) -> ApnsResult<()>;

    /// Closes the socket. Safe to call when not connected.
    fn disconnect(&mut self) -> ApnsResult<()>;

    /// True when a live socket is held.
    fn is_connected(&self) -> bool;

    /// Writes a whole frame.
    fn write_all(&mut self, frame: &[u8]) -> ApnsResult<()>;

    /// Waits up to `wait` for readability, then reads at most `max` bytes.
    ///
    /// `Ok(None)` means nothing became readable within the window.
    /// `Ok(Some(bytes))` with an empty vec means the socket was readable
    /// but yielded no data (closed or drained).
    fn poll_read(&mut self, max: usize, wait: Duration) -> ApnsResult<Option<Vec<u8>>>;

    /// Blocking read of up to `max` bytes, bounded by the read timeout.
    ///
    /// `Ok(None)` is end-of-stream.
    fn read_chunk(&mut self, max: usize) -> ApnsResult<Option<Vec<u8>>>;
}
