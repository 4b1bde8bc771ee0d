//! User and client identifiers.
//!
//! Two identifier spaces exist on the network. The user ID is a 128-bit
//! value chosen by the client itself and kept across sessions; two of its
//! bytes are fixed markers. The client ID is a 32-bit value assigned by a
//! server for the lifetime of one TCP connection; it doubles as the
//! client's packed IPv4 address when the client is directly reachable.

use std::fmt;

use rand::RngCore;

/// Client IDs below this threshold are "low IDs": server-local, transient,
/// and a sign the client cannot accept incoming connections.
pub const LOW_ID_THRESHOLD: u32 = 0x0100_0000;

/// A 128-bit user identifier.
///
/// Freshly generated IDs are random except for two marker bytes: byte 5 is
/// 0x0E and byte 14 is 0x6F (the 6th and 15th counting from one). Once
/// constructed the markers never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserId([u8; 16]);

impl UserId {
    /// Generates a fresh random user ID with the marker bytes set.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes[5] = 0x0E;
        bytes[14] = 0x6F;
        UserId(bytes)
    }

    /// Wraps raw bytes, e.g. an ID received from a remote peer. The bytes
    /// are taken as-is; only [`UserId::generate`] enforces the markers.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        UserId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for UserId {
    fn from(bytes: [u8; 16]) -> Self {
        UserId::from_bytes(bytes)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// A 32-bit client identifier assigned at the server handshake.
///
/// A high ID equals the client's IPv4 address X.Y.Z.W packed as
/// X + 2^8·Y + 2^16·Z + 2^24·W. A low ID (below [`LOW_ID_THRESHOLD`]) marks
/// a firewalled client that needs the callback mechanism.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ClientId(u32);

impl ClientId {
    pub fn new(id: u32) -> Self {
        ClientId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether this is a low (server-local) ID.
    pub fn is_low(&self) -> bool {
        self.0 < LOW_ID_THRESHOLD
    }
}

impl From<u32> for ClientId {
    fn from(id: u32) -> Self {
        ClientId(id)
    }
}

impl From<ClientId> for u32 {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.0.to_le_bytes();
        write!(f, "{x}.{y}.{z}.{w}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_markers() {
        for _ in 0..32 {
            let uid = UserId::generate();
            assert_eq!(uid.as_bytes()[5], 0x0E);
            assert_eq!(uid.as_bytes()[14], 0x6F);
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn user_id_displays_upper_hex() {
        let uid = UserId::from_bytes([0xAB; 16]);
        assert_eq!(uid.to_string(), "AB".repeat(16));
    }

    #[test]
    fn low_id_threshold() {
        assert!(ClientId::new(0).is_low());
        assert!(ClientId::new(LOW_ID_THRESHOLD - 1).is_low());
        assert!(!ClientId::new(LOW_ID_THRESHOLD).is_low());
        assert!(!ClientId::new(u32::MAX).is_low());
    }

    #[test]
    fn high_id_formats_as_packed_ipv4() {
        // 192 + 168·2^8 + 1·2^16 + 42·2^24
        let id = ClientId::new(192 + (168 << 8) + (1 << 16) + (42 << 24));
        assert_eq!(id.to_string(), "192.168.1.42");
        assert_eq!(ClientId::new(0xFFFF_FFFF).to_string(), "255.255.255.255");
        assert_eq!(ClientId::new(1).to_string(), "1.0.0.0");
    }
}
