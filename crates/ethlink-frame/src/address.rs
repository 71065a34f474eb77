use std::fmt;
use std::str::FromStr;

use crate::error::{FrameError, Result};

/// A 6-byte Ethernet hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// The all-ones broadcast address.
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Error parsing a textual hardware address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mac address {0:?} (expected six hex octets like aa:bb:cc:dd:ee:ff)")]
pub struct ParseMacError(String);

impl FromStr for MacAddr {
    type Err = ParseMacError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(|c: char| c == ':' || c == '-');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| ParseMacError(s.to_string()))?;
            if part.len() != 2 {
                return Err(ParseMacError(s.to_string()));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| ParseMacError(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ParseMacError(s.to_string()));
        }
        Ok(Self(octets))
    }
}

/// Size of an encoded [`AddressDescriptor`].
pub const DESCRIPTOR_SIZE: usize = 16;

/// Size of the generic part every descriptor starts with.
pub const DESCRIPTOR_OVERHEAD: usize = 8;

/// Flag bit: the frame was (or should be) sent to the broadcast address.
pub const FLAG_BROADCAST: u8 = 1;

/// Link-layer addressing unit exchanged with upper layers.
///
/// On receive it names the sender and whether the frame was broadcast;
/// on send it picks the destination.
///
/// Encoded form (16 bytes):
/// ```text
/// ┌──────────────┬───────┬──────┬────────────┬──────────┬───────────┐
/// │ addr_len (2) │ flags │ type │ prefix (4) │ zero (2) │ mac (6)   │
/// │ native order │ (1)   │ (1)  │            │          │           │
/// └──────────────┴───────┴──────┴────────────┴──────────┴───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressDescriptor {
    pub mac: MacAddr,
    pub broadcast: bool,
}

impl AddressDescriptor {
    pub fn unicast(mac: MacAddr) -> Self {
        Self {
            mac,
            broadcast: false,
        }
    }

    pub fn broadcast() -> Self {
        Self {
            mac: MacAddr::BROADCAST,
            broadcast: true,
        }
    }

    /// Destination address a frame for this descriptor goes to.
    pub fn destination(&self) -> MacAddr {
        if self.broadcast {
            MacAddr::BROADCAST
        } else {
            self.mac
        }
    }

    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_SIZE] {
        let mut out = [0u8; DESCRIPTOR_SIZE];
        out[0..2].copy_from_slice(&(DESCRIPTOR_SIZE as u16).to_ne_bytes());
        if self.broadcast {
            out[2] |= FLAG_BROADCAST;
        }
        out[10..16].copy_from_slice(&self.mac.0);
        out
    }

    /// Parse a descriptor from the front of `src`.
    ///
    /// Returns the descriptor and how many bytes it occupied. A descriptor
    /// shorter than [`DESCRIPTOR_SIZE`] is zero-extended.
    pub fn parse_prefix(src: &[u8]) -> Result<(Self, usize)> {
        if src.len() < DESCRIPTOR_OVERHEAD {
            return Err(FrameError::BadAddress {
                addr_len: src.len(),
                available: src.len(),
            });
        }
        let addr_len = u16::from_ne_bytes([src[0], src[1]]) as usize;
        if !(DESCRIPTOR_OVERHEAD..=DESCRIPTOR_SIZE).contains(&addr_len) || addr_len > src.len() {
            return Err(FrameError::BadAddress {
                addr_len,
                available: src.len(),
            });
        }

        let mut raw = [0u8; DESCRIPTOR_SIZE];
        raw[..addr_len].copy_from_slice(&src[..addr_len]);

        let mut mac = [0u8; 6];
        mac.copy_from_slice(&raw[10..16]);
        let descriptor = Self {
            mac: MacAddr(mac),
            broadcast: raw[2] & FLAG_BROADCAST != 0,
        };
        Ok((descriptor, addr_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_display_and_parse() {
        let mac = MacAddr([0x02, 0x00, 0x5e, 0x10, 0xab, 0xff]);
        assert_eq!(mac.to_string(), "02:00:5e:10:ab:ff");
        assert_eq!("02:00:5e:10:ab:ff".parse::<MacAddr>().unwrap(), mac);
        assert_eq!("02-00-5E-10-AB-FF".parse::<MacAddr>().unwrap(), mac);
    }

    #[test]
    fn mac_parse_rejects_malformed() {
        assert!("02:00:5e:10:ab".parse::<MacAddr>().is_err());
        assert!("02:00:5e:10:ab:ff:01".parse::<MacAddr>().is_err());
        assert!("2:00:5e:10:ab:ff".parse::<MacAddr>().is_err());
        assert!("zz:00:5e:10:ab:ff".parse::<MacAddr>().is_err());
        assert!("".parse::<MacAddr>().is_err());
    }

    #[test]
    fn descriptor_layout() {
        let desc = AddressDescriptor::unicast(MacAddr([1, 2, 3, 4, 5, 6]));
        let bytes = desc.to_bytes();
        assert_eq!(u16::from_ne_bytes([bytes[0], bytes[1]]), 16);
        assert_eq!(bytes[2], 0);
        assert_eq!(&bytes[4..10], &[0; 6]);
        assert_eq!(&bytes[10..], &[1, 2, 3, 4, 5, 6]);

        let bcast = AddressDescriptor::broadcast().to_bytes();
        assert_eq!(bcast[2] & FLAG_BROADCAST, FLAG_BROADCAST);
    }

    #[test]
    fn parse_prefix_reads_encoded_descriptor() {
        let desc = AddressDescriptor::unicast(MacAddr([0xaa; 6]));
        let mut wire = desc.to_bytes().to_vec();
        wire.extend_from_slice(b"payload");

        let (parsed, used) = AddressDescriptor::parse_prefix(&wire).unwrap();
        assert_eq!(parsed, desc);
        assert_eq!(used, DESCRIPTOR_SIZE);
    }

    #[test]
    fn parse_prefix_zero_extends_short_descriptor() {
        let mut wire = vec![0u8; DESCRIPTOR_OVERHEAD];
        wire[0..2].copy_from_slice(&(DESCRIPTOR_OVERHEAD as u16).to_ne_bytes());
        wire[2] = FLAG_BROADCAST;
        wire.extend_from_slice(b"rest");

        let (parsed, used) = AddressDescriptor::parse_prefix(&wire).unwrap();
        assert!(parsed.broadcast);
        assert_eq!(parsed.mac, MacAddr([0; 6]));
        assert_eq!(used, DESCRIPTOR_OVERHEAD);
    }

    #[test]
    fn parse_prefix_rejects_implausible_lengths() {
        assert!(matches!(
            AddressDescriptor::parse_prefix(&[0u8; 4]),
            Err(FrameError::BadAddress { .. })
        ));

        let mut too_long = [0u8; 32];
        too_long[0..2].copy_from_slice(&32u16.to_ne_bytes());
        assert!(matches!(
            AddressDescriptor::parse_prefix(&too_long),
            Err(FrameError::BadAddress { addr_len: 32, .. })
        ));

        let mut too_short = [0u8; 16];
        too_short[0..2].copy_from_slice(&4u16.to_ne_bytes());
        assert!(AddressDescriptor::parse_prefix(&too_short).is_err());

        let mut truncated = [0u8; 10];
        truncated[0..2].copy_from_slice(&16u16.to_ne_bytes());
        assert!(matches!(
            AddressDescriptor::parse_prefix(&truncated),
            Err(FrameError::BadAddress {
                addr_len: 16,
                available: 10
            })
        ));
    }

    #[test]
    fn destination_honours_broadcast_flag() {
        let mac = MacAddr([9; 6]);
        assert_eq!(AddressDescriptor::unicast(mac).destination(), mac);
        let flagged = AddressDescriptor {
            mac,
            broadcast: true,
        };
        assert_eq!(flagged.destination(), MacAddr::BROADCAST);
    }
}
