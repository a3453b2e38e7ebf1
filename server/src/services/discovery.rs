//! UDP responder that lets launchers find the server on the LAN.

use serde::Serialize;
use tokio::net::UdpSocket;

#[derive(Debug, Clone, Copy, Serialize)]
/// Reply payload telling launchers where the HTTP API lives.
pub struct DiscoveryResponse {
    pub protocol: &'static str,
    pub port: u16,
}

impl DiscoveryResponse {
    pub fn http(port: u16) -> Self {
        Self {
            protocol: "http",
            port,
        }
    }
}

/// True for the probe datagram launchers broadcast. Both the URL form and
/// the bare scheme form are accepted.
pub fn is_probe(message: &str) -> bool {
    let Some(rest) = message.trim().strip_prefix("lanlauncher:") else {
        return false;
    };
    rest.trim_start_matches('/') == "get_ip"
}

pub async fn bind(port: u16) -> std::io::Result<UdpSocket> {
    UdpSocket::bind(("0.0.0.0", port)).await
}

/// Answers probes until the socket fails permanently. Malformed datagrams
/// are ignored; transient send errors are logged and serving continues.
pub async fn serve(socket: UdpSocket, response: DiscoveryResponse) {
    let payload = match serde_json::to_vec(&response) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!("Failed to encode discovery response: {}", err);
            return;
        }
    };

    let mut buf = [0u8; 512];
    loop {
        let (len, remote) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(err) => {
                tracing::warn!("Discovery socket receive failed: {}", err);
                continue;
            }
        };

        let message = String::from_utf8_lossy(&buf[..len]);
        if !is_probe(&message) {
            continue;
        }

        match socket.send_to(&payload, remote).await {
            Ok(_) => tracing::debug!(%remote, "Answered discovery probe"),
            Err(err) => tracing::warn!(%remote, "Discovery reply failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn probe_detection() {
        assert!(is_probe("lanlauncher://get_ip"));
        assert!(is_probe("lanlauncher:get_ip"));
        assert!(is_probe("  lanlauncher://get_ip  "));
        assert!(!is_probe("lanlauncher://get_port"));
        assert!(!is_probe("http://get_ip"));
        assert!(!is_probe(""));
    }

    #[tokio::test]
    async fn answers_probe_with_address_payload() {
        let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind server");
        let server_addr = server.local_addr().expect("addr");
        tokio::spawn(serve(server, DiscoveryResponse::http(8080)));

        let client = UdpSocket::bind("127.0.0.1:0").await.expect("bind client");
        client
            .send_to(b"lanlauncher://get_ip", server_addr)
            .await
            .expect("send");

        let mut buf = [0u8; 256];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), client.recv_from(&mut buf))
            .await
            .expect("reply in time")
            .expect("recv");
        let reply: serde_json::Value = serde_json::from_slice(&buf[..len]).expect("json");
        assert_eq!(reply["protocol"], "http");
        assert_eq!(reply["port"], 8080);
    }

    #[tokio::test]
    async fn ignores_unrelated_datagrams() {
        let server = UdpSocket::bind("127.0.0.1:0").await.expect("bind server");
        let server_addr = server.local_addr().expect("addr");
        tokio::spawn(serve(server, DiscoveryResponse::http(8080)));

        let client = UdpSocket::bind("127.0.0.1:0").await.expect("bind client");
        client
            .send_to(b"who goes there", server_addr)
            .await
            .expect("send");

        let mut buf = [0u8; 256];
        let reply = tokio::time::timeout(Duration::from_millis(200), client.recv_from(&mut buf)).await;
        assert!(reply.is_err());
    }
}
