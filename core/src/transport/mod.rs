//! Unreliable datagram transport for rollback protocol packets
//!
//! The rollback engine never touches sockets itself. Each tick it is handed a
//! [`NetAdapter`] and uses it to send packets to `host:port` addresses and to
//! drain whatever arrived since the last tick. Payloads are opaque here; only
//! the address convention belongs to this layer.
//!
//! [`UdpTransport`] is the stock adapter: a non-blocking IPv4 UDP socket bound
//! to the configured port.
//!
//! ```ignore
//! let mut transport = UdpTransport::bind(7000)?;
//! transport.send("10.0.0.2:7000", &packet);
//! for datagram in transport.receive_all() {
//!     engine_input(datagram.address(), datagram.payload());
//! }
//! ```

mod address;
mod adapter;
mod discovery;
mod error;
mod udp;


pub use adapter::{Datagram, NetAdapter};
pub use address::{AddressError, MAX_ADDRESS_LEN, parse_address};
pub use discovery::{Newcomers, PrimedAdapter, discover_senders};
pub use error::TransportError;
pub use udp::{INITIAL_RESULT_CAPACITY, MAX_DATAGRAM_SIZE, PROBE_PAYLOAD, UdpTransport};
