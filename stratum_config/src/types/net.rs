//! Network mask and network address value types.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::ValueError;

/// IPv4 netmask written in dotted form, such as `255.255.255.0`.
///
/// The set bits must be contiguous from the most significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpMask(Ipv4Addr);

impl IpMask {
    /// Mask with `prefix_len` leading ones.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `prefix_len` exceeds 32.
    pub fn from_prefix_len(prefix_len: u8) -> Result<Self, ValueError> {
        Ok(Self(Ipv4Addr::from(v4_mask(prefix_len)?)))
    }

    /// Number of leading one bits.
    #[must_use]
    pub const fn prefix_len(&self) -> u32 {
        self.0.to_bits().leading_ones()
    }

    /// Mask as an address.
    #[must_use]
    pub const fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl Default for IpMask {
    fn default() -> Self {
        Self(Ipv4Addr::UNSPECIFIED)
    }
}

impl FromStr for IpMask {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::new(format!("invalid IP mask: {s:?}"));
        let addr: Ipv4Addr = s.trim().parse().map_err(|_| invalid())?;
        let bits = addr.to_bits();
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(invalid());
        }
        Ok(Self(addr))
    }
}

impl fmt::Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network in CIDR notation, such as `10.0.0.0/8` or `fd00::/64`.
///
/// Host bits are cleared on parse, so `10.1.2.3/8` reads as `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNetwork {
    /// Build a network, clearing host bits of `addr`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `prefix_len` is too long for the
    /// address family.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, ValueError> {
        let masked = match addr {
            IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(v4.to_bits() & v4_mask(prefix_len)?)),
            IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(v6.to_bits() & v6_mask(prefix_len)?)),
        };
        Ok(Self {
            addr: masked,
            prefix_len,
        })
    }

    /// Network address.
    #[must_use]
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Prefix length in bits.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns `true` when `ip` falls inside this network.
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        Self::new(ip, self.prefix_len).is_ok_and(|other| other.addr == self.addr)
    }
}

impl Default for IpNetwork {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl FromStr for IpNetwork {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::new(format!("invalid CIDR address: {s}"));
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let prefix_len: u8 = prefix.parse().map_err(|_| invalid())?;
        Self::new(addr, prefix_len).map_err(|_| invalid())
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

fn v4_mask(prefix_len: u8) -> Result<u32, ValueError> {
    match prefix_len {
        0 => Ok(0),
        1..=32 => Ok(u32::MAX << (32 - u32::from(prefix_len))),
        _ => Err(ValueError::new(format!("prefix length {prefix_len} exceeds 32"))),
    }
}

fn v6_mask(prefix_len: u8) -> Result<u128, ValueError> {
    match prefix_len {
        0 => Ok(0),
        1..=128 => Ok(u128::MAX << (128 - u32::from(prefix_len))),
        _ => Err(ValueError::new(format!("prefix length {prefix_len} exceeds 128"))),
    }
}
