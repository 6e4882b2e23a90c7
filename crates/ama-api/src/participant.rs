use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Fallback identity when nothing about the request identifies its sender.
pub const ANONYMOUS: &str = "anonymous";

/// Best-effort, unauthenticated identity of whoever sent the request.
/// Handlers treat the inner string as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant(pub String);

impl Participant {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a [`Participant`] to the request extensions.
pub async fn identify_participant(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let participant = derive_participant(req.headers(), peer, state.trust_proxy_headers);
    req.extensions_mut().insert(participant);
    next.run(req).await
}

/// Precedence: first `X-Forwarded-For` hop, then `X-Real-IP` (both only when
/// proxy headers are trusted), then the TCP peer, then [`ANONYMOUS`].
pub fn derive_participant(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> Participant {
    if trust_proxy_headers {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return Participant(ip.to_string());
        }

        if let Some(ip) = header_str(headers, "x-real-ip").map(str::trim).filter(|v| !v.is_empty()) {
            return Participant(ip.to_string());
        }
    }

    match peer {
        Some(addr) => Participant(addr.ip().to_string()),
        None => Participant(ANONYMOUS.to_string()),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let h = headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(derive_participant(&h, Some(peer), true).as_str(), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_when_forwarded_missing_or_blank() {
        let h = headers(&[("x-forwarded-for", " , 10.0.0.1"), ("x-real-ip", "198.51.100.2")]);
        assert_eq!(derive_participant(&h, None, true).as_str(), "198.51.100.2");

        let h = headers(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(derive_participant(&h, None, true).as_str(), "198.51.100.2");
    }

    #[test]
    fn test_peer_then_anonymous() {
        let peer: SocketAddr = "192.0.2.10:41000".parse().unwrap();
        assert_eq!(derive_participant(&HeaderMap::new(), Some(peer), true).as_str(), "192.0.2.10");
        assert_eq!(derive_participant(&HeaderMap::new(), None, true).as_str(), ANONYMOUS);
    }

    #[test]
    fn test_untrusted_proxy_headers_are_ignored() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7"), ("x-real-ip", "198.51.100.2")]);
        let peer: SocketAddr = "192.0.2.10:41000".parse().unwrap();
        assert_eq!(derive_participant(&h, Some(peer), false).as_str(), "192.0.2.10");
        assert_eq!(derive_participant(&h, None, false).as_str(), ANONYMOUS);
    }
}
