//! `host:port` address tokens
//!
//! Actor addresses travel through the engine as plain strings. Sends to a
//! token that does not parse are dropped, since there is no channel back to
//! the engine to report them.

use std::net::{Ipv4Addr, SocketAddrV4};

/// Address tokens at or above this length are rejected outright
pub const MAX_ADDRESS_LEN: usize = 128;

/// Why an address token was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address is {0} bytes (limit {MAX_ADDRESS_LEN})")]
    TooLong(usize),
    #[error("address has no ':port' suffix")]
    MissingPort,
    #[error("address has no host before ':'")]
    MissingHost,
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("invalid IPv4 host '{0}'")]
    InvalidHost(String),
}

/// Parse an `ip:port` token into a socket address.
///
/// The split happens at the last colon; the host must be a dotted IPv4
/// address and the port a decimal `u16`.
pub fn parse_address(addr: &str) -> Result<SocketAddrV4, AddressError> {
    if addr.is_empty() {
        return Err(AddressError::Empty);
    }
    if addr.len() >= MAX_ADDRESS_LEN {
        return Err(AddressError::TooLong(addr.len()));
    }

    let colon = addr.rfind(':').ok_or(AddressError::MissingPort)?;
    if colon == 0 {
        return Err(AddressError::MissingHost);
    }

    let (host, port) = (&addr[..colon], &addr[colon + 1..]);
    let port: u16 = port
        .parse()
        .map_err(|_| AddressError::InvalidPort(port.to_string()))?;
    let ip: Ipv4Addr = host
        .parse()
        .map_err(|_| AddressError::InvalidHost(host.to_string()))?;

    Ok(SocketAddrV4::new(ip, port))
}
