use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client IP for a request.
///
/// With `trust_forwarded_for`, the rightmost `X-Forwarded-For` hop wins: it is
/// the address the nearest proxy saw. Entries left of it are written by the
/// client and ignored.
/// Otherwise the peer address from `ConnectInfo` is used; it is absent when the
/// router is driven without `into_make_service_with_connect_info` (tests).
pub fn client_ip(req: &Request, trust_forwarded_for: bool) -> Option<IpAddr> {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').next())
            .and_then(|hop| hop.trim().parse().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(xff: Option<&str>) -> Request {
        let mut b = axum::http::Request::builder().uri("/");
        if let Some(v) = xff {
            b = b.header(X_FORWARDED_FOR, v);
        }
        b.body(Body::empty()).unwrap()
    }

    #[test]
    fn forwarded_for_only_when_trusted() {
        let req = request(Some("203.0.113.7"));
        assert_eq!(client_ip(&req, true), Some("203.0.113.7".parse().unwrap()));
        assert_eq!(client_ip(&req, false), None);
    }

    #[test]
    fn forged_left_hops_are_ignored() {
        for forged in ["10.9.9.1", "10.9.9.2, 198.18.0.1", "not-an-ip"] {
            let req = request(Some(&format!("{forged}, 203.0.113.5")));
            assert_eq!(client_ip(&req, true), Some("203.0.113.5".parse().unwrap()), "xff={forged}");
        }
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut req = request(Some("not-an-ip"));
        let peer: SocketAddr = "192.0.2.4:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_ip(&req, true), Some(peer.ip()));
    }
}
