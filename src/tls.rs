// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! TLS Transport
//!
//! Real transport implementation over `native-tls` with the PKCS#12
//! client-certificate identity the gateway requires.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use native_tls::{Identity, TlsConnector, TlsStream};
use tracing::debug;

use crate::error::{ApnsError, ApnsResult};
use crate::transport::{ConnectParams, Transport, READ_TIMEOUT};

/// TLS transport for gateway communication.
///
/// # Example
///
/// ```ignore
/// use apns_gateway::{ConnectParams, TlsTransport, Transport};
///
/// let mut transport = TlsTransport::new();
/// transport.connect(&params)?;
/// transport.write_all(&frame)?;
/// ```
pub struct TlsTransport {
    stream: Option<TlsStream<TcpStream>>,
    read_timeout: Duration,
}

impl TlsTransport {
    /// Creates a new disconnected transport.
    pub fn new() -> Self {
        TlsTransport {
            stream: None,
            read_timeout: READ_TIMEOUT,
        }
    }

    /// Splits `host:port` into the hostname used for SNI and verification.
    fn split_host(address: &str) -> &str {
        match address.rfind(':') {
            Some(colon_pos) => &address[..colon_pos],
            None => address,
        }
    }

    /// Loads the PKCS#12 identity bundle from disk.
    fn load_identity(params: &ConnectParams) -> ApnsResult<Identity> {
        let bundle = std::fs::read(&params.identity_file).map_err(|e| {
            ApnsError::ConnectFailed(format!(
                "identity file {}: {}",
                params.identity_file.display(),
                e
            ))
        })?;
        Identity::from_pkcs12(&bundle, params.passphrase.as_str())
            .map_err(|e| ApnsError::ConnectFailed(format!("client identity rejected: {}", e)))
    }
}

impl Default for TlsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TlsTransport {
    fn connect(&mut self, params: &ConnectParams) -> ApnsResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let identity = Self::load_identity(params)?;

        let addr = params
            .address
            .to_socket_addrs()
            .map_err(|e| {
                ApnsError::ConnectFailed(format!("resolve {}: {}", params.address, e))
            })?
            .next()
            .ok_or_else(|| {
                ApnsError::ConnectFailed(format!("no addresses for {}", params.address))
            })?;

        // Create TCP connection with timeout
        let tcp_stream = TcpStream::connect_timeout(&addr, params.connect_timeout)
            .map_err(|e| ApnsError::ConnectFailed(e.to_string()))?;

        tcp_stream
            .set_read_timeout(Some(params.read_timeout))
            .map_err(|e| ApnsError::ConnectFailed(e.to_string()))?;
        tcp_stream
            .set_write_timeout(Some(params.read_timeout))
            .map_err(|e| ApnsError::ConnectFailed(e.to_string()))?;

        let connector = TlsConnector::builder()
            .identity(identity)
            .build()
            .map_err(|e| ApnsError::ConnectFailed(format!("TLS setup failed: {}", e)))?;

        let stream = connector
            .connect(Self::split_host(&params.address), tcp_stream)
            .map_err(|e| ApnsError::ConnectFailed(format!("TLS handshake failed: {}", e)))?;

        debug!("connected to {}", params.address);
        self.read_timeout = params.read_timeout;
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) -> ApnsResult<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown(); // Ignore errors on close
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn write_all(&mut self, frame: &[u8]) -> ApnsResult<()> {
        let stream = self.stream.as_mut().ok_or(ApnsError::NotConnected)?;
        stream
            .write_all(frame)
            .map_err(|e| ApnsError::WriteFailed(e.to_string()))?;
        stream
            .flush()
            .map_err(|e| ApnsError::WriteFailed(format!("flush failed: {}", e)))?;
        Ok(())
    }

    fn poll_read(&mut self, max: usize, wait: Duration) -> ApnsResult<Option<Vec<u8>>> {
        let stream = self.stream.as_mut().ok_or(ApnsError::NotConnected)?;

        // Narrow the socket timeout to the poll window for one read, then
        // restore it.
        stream
            .get_ref()
            .set_read_timeout(Some(wait))
            .map_err(|e| ApnsError::ReadFailed(e.to_string()))?;

        let mut buf = vec![0u8; max];
        let result = stream.read(&mut buf);

        let _ = stream.get_ref().set_read_timeout(Some(self.read_timeout));

        match result {
            Ok(n) => {
                buf.truncate(n);
                Ok(Some(buf))
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // Nothing readable within the window
                Ok(None)
            }
            Err(e) => Err(ApnsError::ReadFailed(e.to_string())),
        }
    }

    fn read_chunk(&mut self, max: usize) -> ApnsResult<Option<Vec<u8>>> {
        let stream = self.stream.as_mut().ok_or(ApnsError::NotConnected)?;

        let mut buf = vec![0u8; max];
        match stream.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(n) => {
                buf.truncate(n);
                Ok(Some(buf))
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Err(ApnsError::ReadFailed("read timed out".to_string()))
            }
            Err(e) => Err(ApnsError::ReadFailed(e.to_string())),
        }
    }
}
