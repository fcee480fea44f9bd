//! Message-oriented transports for RPC records.
//!
//! A stream transport frames records with RFC 1831 record marking; a
//! datagram transport maps one record to one datagram. The RPC core works
//! against the [`Transport`] trait so the protocol can be chosen at
//! runtime.

use std::io::{Error, ErrorKind, Result};

use nfspry_types::rpc::fragment_header;
use tokio::net::UdpSocket;

use crate::io::{AsyncRead, AsyncWrite};

/// Upper bound on a reassembled record; anything larger is a protocol
/// error, not a legitimate reply.
const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

/// Largest datagram a UDP reply can occupy.
const MAX_DATAGRAM_SIZE: usize = 65535;

#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Sends one complete RPC record.
    async fn send_record(&mut self, record: &[u8]) -> Result<()>;

    /// Receives one complete RPC record.
    async fn recv_record(&mut self) -> Result<Vec<u8>>;
}

/// Record-marked transport over a byte stream (TCP).
pub struct StreamTransport<IO> {
    io: IO,
}

impl<IO> StreamTransport<IO> {
    pub const fn new(io: IO) -> Self {
        Self { io }
    }
}

#[async_trait::async_trait(?Send)]
impl<IO> Transport for StreamTransport<IO>
where
    IO: AsyncRead + AsyncWrite,
{
    async fn send_record(&mut self, record: &[u8]) -> Result<()> {
        let len = u32::try_from(record.len())
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "record too large"))?;
        let header = fragment_header::new(len, true);

        let mut buf = Vec::with_capacity(record.len() + 4);
        buf.extend_from_slice(&header.to_bytes());
        buf.extend_from_slice(record);
        self.io.async_write_all(&buf).await
    }

    async fn recv_record(&mut self) -> Result<Vec<u8>> {
        let mut record = Vec::new();
        loop {
            let mut header = [0u8; 4];
            self.io.async_read_exact(&mut header).await?;
            let header = fragment_header::from(header);

            let len = header.fragment_length() as usize;
            if record.len() + len > MAX_RECORD_SIZE {
                return Err(Error::new(ErrorKind::InvalidData, "RPC record too large"));
            }

            let start = record.len();
            record.resize(start + len, 0);
            self.io.async_read_exact(&mut record[start..]).await?;

            if header.last() {
                return Ok(record);
            }
        }
    }
}

/// Datagram transport over a connected UDP socket.
pub struct DatagramTransport {
    socket: UdpSocket,
}

impl DatagramTransport {
    pub const fn new(socket: UdpSocket) -> Self {
        Self { socket }
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for DatagramTransport {
    async fn send_record(&mut self, record: &[u8]) -> Result<()> {
        let sent = self.socket.send(record).await?;
        if sent != record.len() {
            return Err(Error::new(ErrorKind::InvalidInput, "short datagram send"));
        }
        Ok(())
    }

    async fn recv_record(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let received = self.socket.recv(&mut buf).await?;
        buf.truncate(received);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tokio::io::duplex;

    use super::*;
    use crate::io::tokio::TokioIo;

    #[tokio::test(flavor = "current_thread")]
    async fn stream_roundtrip_single_fragment() {
        let (a, b) = duplex(4096);
        let mut sender = StreamTransport::new(TokioIo::new(a));
        let mut receiver = StreamTransport::new(TokioIo::new(b));

        sender.send_record(b"12345678").await.unwrap();
        let record = receiver.recv_record().await.unwrap();
        assert_eq!(record, b"12345678");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stream_reassembles_fragments() {
        let (a, b) = duplex(4096);
        let mut raw = TokioIo::new(a);
        let mut receiver = StreamTransport::new(TokioIo::new(b));

        // Two fragments: "abcd" then "ef" with the last flag set.
        let mut wire = Vec::new();
        wire.extend_from_slice(&fragment_header::new(4, false).to_bytes());
        wire.extend_from_slice(b"abcd");
        wire.extend_from_slice(&fragment_header::new(2, true).to_bytes());
        wire.extend_from_slice(b"ef");
        raw.async_write_all(&wire).await.unwrap();

        let record = receiver.recv_record().await.unwrap();
        assert_eq!(record, b"abcdef");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stream_sends_last_fragment_header() {
        let (a, b) = duplex(4096);
        let mut sender = StreamTransport::new(TokioIo::new(a));
        let mut raw = TokioIo::new(b);

        sender.send_record(b"xyz").await.unwrap();
        let mut wire = [0u8; 7];
        raw.async_read_exact(&mut wire).await.unwrap();
        assert_eq!(wire[..4], [0x80, 0x00, 0x00, 0x03]);
        assert_eq!(&wire[4..], b"xyz");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn oversized_record_is_rejected() {
        let (a, b) = duplex(4096);
        let mut raw = TokioIo::new(a);
        let mut receiver = StreamTransport::new(TokioIo::new(b));

        let header = fragment_header::new(0x7fff_ffff, true);
        raw.async_write_all(&header.to_bytes()).await.unwrap();

        let err = receiver.recv_record().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
