//! Async record stream: a transport plus its [`StreamReassembler`].
//!
//! [`RecordStream`] wraps anything implementing `AsyncRead + AsyncWrite`
//! (a `TcpStream` in production, `tokio::io::duplex` or a `tokio_test` mock in
//! tests) and exchanges whole records over it.
//!
//! # Read loop contract
//!
//! Reading a record alternates between two steps:
//!
//! 1. If the reassembler already holds a complete record, return it.  No I/O.
//! 2. Otherwise perform one `read()` and feed the result, then go back to 1.
//!
//! A `read()` returning zero bytes means the peer closed the connection and
//! surfaces as [`StreamError::ConnectionClosed`].  Because step 1 always runs
//! first, coalesced records are drained without blocking.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::codec::{ProtocolError, Record};
use crate::protocol::reassembly::StreamReassembler;

/// Size of the scratch buffer handed to each `read()` call.
const READ_CHUNK: usize = 1024;

/// Errors surfaced by [`RecordStream`].
#[derive(Debug, Error)]
pub enum StreamError {
    /// The peer closed the connection (zero-length read).
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// An I/O error occurred on the transport.
    #[error("connection I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record arrived but could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl StreamError {
    /// `true` when a whole record arrived with bad contents and the caller may
    /// choose to discard it and keep reading.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, StreamError::Protocol(e) if e.is_malformed())
    }
}

/// Exchanges fixed-size records over an async byte stream.
pub struct RecordStream<S> {
    inner: S,
    reassembler: StreamReassembler,
    scratch: Vec<u8>,
}

impl<S> RecordStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reassembler: StreamReassembler::new(),
            scratch: vec![0u8; READ_CHUNK],
        }
    }

    /// Bytes received but not yet consumed as a record.
    pub fn buffered(&self) -> usize {
        self.reassembler.buffered()
    }

    /// Performs exactly one `read()` and feeds whatever arrived.
    async fn fill_once(&mut self) -> Result<(), StreamError> {
        let n = self.inner.read(&mut self.scratch).await?;
        if n == 0 {
            return Err(StreamError::ConnectionClosed);
        }
        self.reassembler.feed(&self.scratch[..n]);
        Ok(())
    }

    /// Returns the next `size` raw bytes, reading as often as needed.
    ///
    /// # Errors
    ///
    /// [`StreamError::ConnectionClosed`] on EOF, [`StreamError::Io`] on a
    /// transport failure.
    pub async fn read_raw(&mut self, size: usize) -> Result<Vec<u8>, StreamError> {
        loop {
            if let Some(record) = self.reassembler.take_record(size) {
                return Ok(record);
            }
            self.fill_once().await?;
        }
    }

    /// Reads and decodes the next record of type `R`.
    ///
    /// The record's bytes are consumed even when decoding fails, so a caller
    /// that discards a malformed record stays aligned with the stream.
    ///
    /// # Errors
    ///
    /// Everything [`RecordStream::read_raw`] returns, plus
    /// [`StreamError::Protocol`] for a record that fails to decode.
    pub async fn recv<R: Record>(&mut self) -> Result<R, StreamError> {
        let bytes = self.read_raw(R::SIZE).await?;
        Ok(R::decode(&bytes)?)
    }

    /// Decodes a record using at most one `read()`.
    ///
    /// Used for the session handshake, which must not wait for a slow or
    /// misbehaving peer to trickle in the rest of a record.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::TruncatedRecord`] (wrapped) when the single read did
    /// not deliver a full record.
    pub async fn recv_single_read<R: Record>(&mut self) -> Result<R, StreamError> {
        if !self.reassembler.has_record(R::SIZE) {
            self.fill_once().await?;
        }
        match self.reassembler.take_record(R::SIZE) {
            Some(bytes) => Ok(R::decode(&bytes)?),
            None => Err(ProtocolError::TruncatedRecord {
                needed: R::SIZE,
                available: self.reassembler.buffered(),
            }
            .into()),
        }
    }

    /// Encodes and writes one record.
    ///
    /// # Errors
    ///
    /// [`StreamError::Io`] if the write fails; there is no retry.
    pub async fn send<R: Record>(&mut self, record: &R) -> Result<(), StreamError> {
        self.inner.write_all(&record.encode()).await?;
        self.inner.flush().await?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{Card, Suit};
    use crate::domain::round::RoundStatus;
    use crate::protocol::messages::{CardPayload, Decision, RequestMessage};
    use tokio_test::io::Builder;

    fn card_record(rank: u8) -> CardPayload {
        CardPayload::dealt(Card::new(rank, Suit::Heart).unwrap())
    }

    #[tokio::test]
    async fn test_recv_reassembles_record_split_across_reads() {
        // Arrange
        let bytes = card_record(9).encode();
        let mock = Builder::new()
            .read(&bytes[..2])
            .read(&bytes[2..5])
            .read(&bytes[5..])
            .build();
        let mut stream = RecordStream::new(mock);

        // Act
        let got: CardPayload = stream.recv().await.unwrap();

        // Assert
        assert_eq!(got, card_record(9));
        assert_eq!(stream.buffered(), 0);
    }

    #[tokio::test]
    async fn test_recv_drains_coalesced_records_without_another_read() {
        // Arrange: both records arrive in one read; any further read hits EOF
        let both = [card_record(2).encode(), card_record(3).encode()].concat();
        let mock = Builder::new().read(&both).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let first: CardPayload = stream.recv().await.unwrap();
        let second: CardPayload = stream.recv().await.unwrap();

        // Assert
        assert_eq!(first, card_record(2));
        assert_eq!(second, card_record(3));
    }

    #[tokio::test]
    async fn test_recv_zero_length_read_is_connection_closed() {
        let mock = Builder::new().build();
        let mut stream = RecordStream::new(mock);

        let result = stream.recv::<CardPayload>().await;

        assert!(matches!(result, Err(StreamError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_recv_eof_mid_record_is_connection_closed() {
        let bytes = card_record(4).encode();
        let mock = Builder::new().read(&bytes[..5]).build();
        let mut stream = RecordStream::new(mock);

        let result = stream.recv::<CardPayload>().await;

        assert!(matches!(result, Err(StreamError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_malformed_record_is_consumed_and_stream_stays_aligned() {
        // Arrange: a record with a bad magic followed by a good one
        let mut bad = card_record(5).encode();
        bad[0] = 0;
        let good = CardPayload::finished(RoundStatus::Win).encode();
        let mock = Builder::new().read(&[bad, good].concat()).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let first = stream.recv::<CardPayload>().await;
        let second = stream.recv::<CardPayload>().await;

        // Assert
        assert!(first.as_ref().is_err_and(StreamError::is_malformed_record));
        assert_eq!(second.unwrap(), CardPayload::finished(RoundStatus::Win));
    }

    #[tokio::test]
    async fn test_recv_single_read_short_read_is_truncated() {
        // Arrange: only 20 of the 38 request bytes arrive in the one read
        let bytes = RequestMessage {
            rounds: 2,
            team_name: "t".to_string(),
        }
        .encode();
        let mock = Builder::new().read(&bytes[..20]).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let result = stream.recv_single_read::<RequestMessage>().await;

        // Assert
        assert!(matches!(
            result,
            Err(StreamError::Protocol(ProtocolError::TruncatedRecord {
                needed: 38,
                available: 20
            }))
        ));
    }

    #[tokio::test]
    async fn test_recv_single_read_keeps_leftover_bytes() {
        // Arrange: a request and a decision coalesced into the one read
        let request = RequestMessage {
            rounds: 2,
            team_name: "t".to_string(),
        };
        let both = [request.encode(), Decision::Hit.encode()].concat();
        let mock = Builder::new().read(&both).build();
        let mut stream = RecordStream::new(mock);

        // Act
        let got = stream.recv_single_read::<RequestMessage>().await.unwrap();
        let next = stream.recv::<Decision>().await.unwrap();

        // Assert
        assert_eq!(got, request);
        assert_eq!(next, Decision::Hit);
    }

    #[tokio::test]
    async fn test_send_writes_encoded_record() {
        let mock = Builder::new().write(&Decision::Stand.encode()).build();
        let mut stream = RecordStream::new(mock);

        stream.send(&Decision::Stand).await.unwrap();
    }
}
