// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Manager
//!
//! Manages the lifecycle of one gateway socket, including the proactive
//! reconnect that runs before the server's idle timeout can bite.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ApnsResult;
use crate::transport::{ConnectParams, Transport};

/// Lead time subtracted from the session budget when deciding whether the
/// gateway is about to idle-close the socket.
pub const RECONNECT_LEAD: Duration = Duration::from_secs(5);

/// Connection manager for one gateway channel.
///
/// Wraps a transport implementation and adds:
/// - Session age tracking from the moment a connect succeeds
/// - A reconnect-before-timeout policy driven by the session budget
/// - Idempotent connect and disconnect
///
/// The gateway drops idle connections server-side without a clean close;
/// writing on such a socket fails. Refreshing the connection shortly
/// before the budget runs out avoids sending into a dead socket.
///
/// # Example
///
/// ```ignore
/// use apns_gateway::{Connection, MockTransport};
///
/// let mut conn = Connection::new(transport, params, budget, true);
/// conn.try_reconnect();
/// conn.write_frame(&frame)?;
/// ```
pub struct Connection<T: Transport> {
    transport: T,
    params: ConnectParams,
    session_budget: Duration,
    reconnect_allowed: bool,
    established_at: Option<Instant>,
}

impl<T: Transport> Connection<T> {
    /// Creates a new connection manager. No socket is opened yet.
    pub fn new(
        transport: T,
        params: ConnectParams,
        session_budget: Duration,
        reconnect_allowed: bool,
    ) -> Self {
        Connection {
            transport,
            params,
            session_budget,
            reconnect_allowed,
            established_at: None,
        }
    }

    /// Connects unless a live socket already exists.
    pub fn ensure_connected(&mut self) -> ApnsResult<()> {
        if self.transport.is_connected() {
            return Ok(());
        }
        self.transport.connect(&self.params)?;
        self.established_at = Some(Instant::now());
        debug!("connected to {}", self.params.address);
        Ok(())
    }

    /// Closes any previous socket, then connects.
    pub fn connect_fresh(&mut self) -> ApnsResult<()> {
        let _ = self.disconnect(); // Ignore disconnect errors
        self.ensure_connected()
    }

    /// Closes the socket if open; a no-op otherwise.
    pub fn disconnect(&mut self) -> ApnsResult<()> {
        if self.transport.is_connected() {
            debug!("disconnecting from {}", self.params.address);
        }
        self.established_at = None;
        self.transport.disconnect()
    }

    /// Returns true if a live socket is held.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Enables or disables the proactive reconnect policy.
    pub fn set_reconnect_allowed(&mut self, allowed: bool) {
        self.reconnect_allowed = allowed;
    }

    /// True when the session budget is nearly spent, or when no session
    /// exists at all.
    pub fn is_timeout_soon(&self, lead: Duration) -> bool {
        match self.established_at {
            Some(at) => budget_exhausted(at.elapsed(), self.session_budget, lead),
            None => true,
        }
    }

    /// Proactive refresh: reconnects when the session is about to expire.
    ///
    /// Runs before a send rather than in reaction to a failure. Also
    /// performs the first connect of a session, since no session counts as
    /// expired. Returns whether a fresh connection was established.
    pub fn try_reconnect(&mut self) -> bool {
        if !self.reconnect_allowed {
            return false;
        }
        if !self.is_timeout_soon(RECONNECT_LEAD) {
            return false;
        }
        match self.connect_fresh() {
            Ok(()) => {
                debug!("refreshed connection to {}", self.params.address);
                true
            }
            Err(e) => {
                warn!("reconnect to {} failed: {}", self.params.address, e);
                false
            }
        }
    }

    /// Writes a whole frame on the live socket.
    pub fn write_frame(&mut self, frame: &[u8]) -> ApnsResult<()> {
        self.transport.write_all(frame)
    }

    /// Polls the socket for up to `max` bytes within `wait`.
    pub fn poll_read(&mut self, max: usize, wait: Duration) -> ApnsResult<Option<Vec<u8>>> {
        self.transport.poll_read(max, wait)
    }

    /// Blocking read of up to `max` bytes.
    pub fn read_chunk(&mut self, max: usize) -> ApnsResult<Option<Vec<u8>>> {
        self.transport.read_chunk(max)
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Whether `elapsed` has consumed the budget up to `lead` before its end.
/// Inclusive at the boundary.
fn budget_exhausted(elapsed: Duration, budget: Duration, lead: Duration) -> bool {
    elapsed >= budget.saturating_sub(lead)
}
