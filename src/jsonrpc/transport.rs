//! Transport layer for JSON-RPC communication
//!
//! LSP-style framing: each message is preceded by a `Content-Length` header and a
//! blank line. The framing is generic over any async byte stream; stdio is the
//! deployed transport, in-memory duplex pipes are used by tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace};

use crate::jsonrpc::protocol::JsonRpcResponse;

const CONTENT_LENGTH: &str = "content-length";

/// Largest message body accepted from a peer.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send {
    /// Read one framed message body. `Ok(None)` means the peer closed the stream.
    async fn read_message(&mut self) -> Result<Option<String>>;

    async fn write_response(&mut self, response: &JsonRpcResponse) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    /// Get transport description for logging
    fn description(&self) -> &'static str;
}

/// Content-Length framing over a reader/writer pair
pub struct FramedTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    description: &'static str,
}

/// JSON-RPC over the process's stdin/stdout
pub type StdioTransport = FramedTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::stdin(),
            tokio::io::stdout(),
            "JSON-RPC over stdin/stdout (LSP-style)",
        )
    }
}

impl<R, W> FramedTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, description: &'static str) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            description,
        }
    }

    async fn read_lsp_message(&mut self) -> Result<Option<String>> {
        let mut content_length = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                if saw_header {
                    return Err(anyhow!("Connection closed in the middle of a message header"));
                }
                return Ok(None);
            }

            let line = line.trim_end();

            // Empty line indicates end of headers
            if line.is_empty() {
                if saw_header {
                    break;
                }
                continue;
            }
            saw_header = true;

            if let Some(length) = lsp_format::parse_header_line(line)? {
                content_length = Some(length);
            }

            trace!("Received header: {}", line);
        }

        let content_length =
            content_length.ok_or_else(|| anyhow!("Missing Content-Length header"))?;
        if content_length > MAX_MESSAGE_BYTES {
            return Err(anyhow!(
                "Content-Length {} exceeds the {} byte limit",
                content_length,
                MAX_MESSAGE_BYTES
            ));
        }

        let mut buffer = vec![0u8; content_length];
        self.reader.read_exact(&mut buffer).await?;

        let content = String::from_utf8(buffer)?;
        debug!("Received message: {} bytes", content_length);
        trace!("Message content: {}", content);

        Ok(Some(content))
    }

    async fn write_lsp_message(&mut self, content: &str) -> Result<()> {
        let content_bytes = content.as_bytes();

        self.writer
            .write_all(format!("Content-Length: {}\r\n\r\n", content_bytes.len()).as_bytes())
            .await?;
        self.writer.write_all(content_bytes).await?;
        self.writer.flush().await?;

        debug!("Sent message: {} bytes", content_bytes.len());
        trace!("Message content: {}", content);

        Ok(())
    }
}

#[async_trait]
impl<R, W> Transport for FramedTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_message(&mut self) -> Result<Option<String>> {
        self.read_lsp_message().await
    }

    async fn write_response(&mut self, response: &JsonRpcResponse) -> Result<()> {
        let content = serde_json::to_string(response)?;
        self.write_lsp_message(&content).await
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        debug!("Transport closed: {}", self.description);
        Ok(())
    }

    fn description(&self) -> &'static str {
        self.description
    }
}

/// Helper functions for working with LSP message format
pub mod lsp_format {
    use super::*;

    /// Parse a single header line; `Ok(None)` for headers other than Content-Length
    pub fn parse_header_line(line: &str) -> Result<Option<usize>> {
        let Some((name, value)) = line.split_once(':') else {
            return Err(anyhow!("Malformed header line: {}", line));
        };

        if name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
            let length = value
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("Invalid Content-Length '{}': {}", value.trim(), e))?;
            Ok(Some(length))
        } else {
            Ok(None)
        }
    }

    /// Format message with LSP headers
    pub fn format_message(content: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{}", content.len(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsp_format() {
        let content = r#"{"jsonrpc":"2.0","method":"test","id":1}"#;
        let formatted = lsp_format::format_message(content);

        assert!(formatted.starts_with("Content-Length: 40\r\n\r\n"));
        assert!(formatted.ends_with(content));
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(
            lsp_format::parse_header_line("Content-Length: 42").unwrap(),
            Some(42)
        );
        assert_eq!(
            lsp_format::parse_header_line("content-length:7").unwrap(),
            Some(7)
        );
        assert_eq!(
            lsp_format::parse_header_line("Content-Type: application/json").unwrap(),
            None
        );
        assert!(lsp_format::parse_header_line("Content-Length: many").is_err());
        assert!(lsp_format::parse_header_line("garbage").is_err());
    }

    #[tokio::test]
    async fn test_framed_read_and_eof() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let mut transport = FramedTransport::new(server_read, server_write, "duplex");

        let (_client_read, mut client_write) = tokio::io::split(client);
        let body = r#"{"jsonrpc":"2.0","method":"incidents/stats","id":1}"#;
        client_write
            .write_all(lsp_format::format_message(body).as_bytes())
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        assert_eq!(transport.read_message().await.unwrap().as_deref(), Some(body));
        assert!(transport.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_content_length_is_error() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let mut transport = FramedTransport::new(server_read, server_write, "duplex");

        let (_client_read, mut client_write) = tokio::io::split(client);
        client_write
            .write_all(b"Content-Type: application/json\r\n\r\n{}")
            .await
            .unwrap();

        assert!(transport.read_message().await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_content_length_is_rejected() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let mut transport = FramedTransport::new(server_read, server_write, "duplex");

        let (_client_read, mut client_write) = tokio::io::split(client);
        client_write
            .write_all(b"Content-Length: 18446744073709551615\r\n\r\n{}")
            .await
            .unwrap();

        let err = transport.read_message().await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_one_byte_over_limit_is_rejected() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let mut transport = FramedTransport::new(server_read, server_write, "duplex");

        let (_client_read, mut client_write) = tokio::io::split(client);
        let header = format!("Content-Length: {}\r\n\r\n", MAX_MESSAGE_BYTES + 1);
        client_write.write_all(header.as_bytes()).await.unwrap();
        let err = transport.read_message().await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
