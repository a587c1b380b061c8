//! Remote (TCP) transport
//!
//! Reaches a controller that is not on the local network, through a relay
//! or routed connection. The stream's lifecycle belongs to the caller: it
//! arrives already connected and nothing here reconnects it.

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{trace, warn};

/// Connection-oriented transport; no replies are observed on this path
pub struct RemoteTransport {
    stream: TcpStream,
}

impl RemoteTransport {
    /// Wrap an already-connected stream
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Remote endpoint, if the stream still knows it
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.peer_addr().ok()
    }

    /// Send one frame, fire-and-forget
    ///
    /// Write failures are logged and swallowed, matching the local
    /// transport's contract.
    pub async fn send(&mut self, data: &[u8]) {
        trace!(
            remote = ?self.peer_addr(),
            bytes = data.len(),
            payload = format!("{:02X?}", &data[..data.len().min(16)]),
            "sending frame via TCP"
        );

        let result = async {
            self.stream.write_all(data).await?;
            self.stream.flush().await
        }
        .await;

        if let Err(e) = result {
            warn!(remote = ?self.peer_addr(), error = %e, "frame send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_send_writes_whole_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).await.unwrap();
        let (mut server, _) = listener.accept().await.unwrap();

        let mut transport = RemoteTransport::new(client);
        assert_eq!(transport.peer_addr(), Some(addr));

        let frame = vec![0x17u8; 64];
        transport.send(&frame).await;

        let mut buf = vec![0u8; 64];
        timeout(Duration::from_secs(2), server.read_exact(&mut buf))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(buf, frame);
    }

    #[tokio::test]
    async fn test_send_after_peer_close_is_swallowed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        drop(server);

        let mut transport = RemoteTransport::new(client);

        // The write may need a couple of attempts before the RST lands;
        // none of them may surface an error.
        for _ in 0..3 {
            transport.send(&[0x17u8; 64]).await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
