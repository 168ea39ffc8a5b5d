use tokio::io::{AsyncRead, AsyncWrite};

/// A connected gateway byte stream.
///
/// Anything that can be read from and written to asynchronously and moved
/// onto the I/O task qualifies: a [`tokio_serial::SerialStream`] in
/// production, a [`tokio::io::DuplexStream`] in tests.
pub trait GatewayIo: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> GatewayIo for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    async fn write_line<T: GatewayIo>(mut io: T, line: &str) -> T {
        io.write_all(line.as_bytes()).await.unwrap();
        io.write_all(b"\r\n").await.unwrap();
        io
    }

    #[tokio::test]
    async fn duplex_stream_is_gateway_io() {
        let (left, mut right) = tokio::io::duplex(64);
        let _left = write_line(left, "10;RTSSHOW;").await;

        let mut buf = [0u8; 13];
        right.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"10;RTSSHOW;\r\n");
    }
}
