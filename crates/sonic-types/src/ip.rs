//! IP address and prefix types with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family tag shared by [`IpAddress`] and [`IpPrefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Width of an address of this family in bits.
    pub const fn bits(self) -> u8 {
        match self {
            IpFamily::V4 => 32,
            IpFamily::V6 => 128,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "ipv4"),
            IpFamily::V6 => write!(f, "ipv6"),
        }
    }
}

/// An IPv4 address wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    pub const UNSPECIFIED: Self = Ipv4Address(Ipv4Addr::UNSPECIFIED);

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address(Ipv4Addr::new(a, b, c, d))
    }

    pub const fn inner(&self) -> Ipv4Addr {
        self.0
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }

    fn to_bits(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Ipv4Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Address(addr)
    }
}

/// An IPv6 address wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv6Address(Ipv6Addr);

impl Ipv6Address {
    pub const UNSPECIFIED: Self = Ipv6Address(Ipv6Addr::UNSPECIFIED);

    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: u16, b: u16, c: u16, d: u16, e: u16, f: u16, g: u16, h: u16) -> Self {
        Ipv6Address(Ipv6Addr::new(a, b, c, d, e, f, g, h))
    }

    pub const fn inner(&self) -> Ipv6Addr {
        self.0
    }

    pub const fn segments(&self) -> [u16; 8] {
        self.0.segments()
    }

    fn to_bits(self) -> u128 {
        u128::from(self.0)
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv6Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv6Addr>()
            .map(Ipv6Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Ipv6Address(addr)
    }
}

/// An IP address that can be either IPv4 or IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    pub const fn family(&self) -> IpFamily {
        match self {
            IpAddress::V4(_) => IpFamily::V4,
            IpAddress::V6(_) => IpFamily::V6,
        }
    }

    pub const fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub const fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    /// Builds the netmask of `family` with the first `prefix_len` bits set.
    ///
    /// # Errors
    ///
    /// Returns an error if `prefix_len` is wider than the family.
    pub fn netmask(family: IpFamily, prefix_len: u8) -> Result<Self, ParseError> {
        if prefix_len > family.bits() {
            return Err(ParseError::InvalidIpPrefix(format!(
                "prefix length {} exceeds maximum {} for {}",
                prefix_len,
                family.bits(),
                family
            )));
        }
        let len = u32::from(prefix_len);
        Ok(match family {
            IpFamily::V4 => {
                let bits = u32::MAX.checked_shl(32 - len).unwrap_or(0);
                IpAddress::V4(Ipv4Address(Ipv4Addr::from(bits)))
            }
            IpFamily::V6 => {
                let bits = u128::MAX.checked_shl(128 - len).unwrap_or(0);
                IpAddress::V6(Ipv6Address(Ipv6Addr::from(bits)))
            }
        })
    }

    /// Returns the prefix length if this address is a contiguous netmask
    /// (all ones followed by all zeros).
    pub fn mask_len(&self) -> Option<u8> {
        let (ones, zeros, width) = match self {
            IpAddress::V4(a) => {
                let bits = a.to_bits();
                (bits.leading_ones(), bits.trailing_zeros(), 32)
            }
            IpAddress::V6(a) => {
                let bits = a.to_bits();
                (bits.leading_ones(), bits.trailing_zeros(), 128)
            }
        };
        // an all-zero mask reports `width` trailing zeros and no leading ones
        (ones + zeros == width).then(|| ones as u8)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => addr.fmt(f),
            IpAddress::V6(addr) => addr.fmt(f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            s.parse::<Ipv6Address>().map(IpAddress::V6)
        } else {
            s.parse::<Ipv4Address>().map(IpAddress::V4)
        }
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(addr: Ipv4Address) -> Self {
        IpAddress::V4(addr)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(addr: Ipv6Address) -> Self {
        IpAddress::V6(addr)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::V4(Ipv4Address(addr))
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddress::V6(Ipv6Address(addr))
    }
}

/// An IP prefix carried as address plus mask.
///
/// Host bits of `address` outside the mask are preserved exactly as given;
/// a route to `192.168.0.1` with mask `255.255.0.0` round-trips unchanged.
/// Construction through [`IpPrefix::with_mask`] does not validate, so values
/// received from callers must be checked with [`IpPrefix::is_well_formed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpPrefix {
    address: IpAddress,
    mask: IpAddress,
}

impl IpPrefix {
    /// Creates a prefix from an address and a prefix length.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length is invalid for the address type
    /// (>32 for IPv4, >128 for IPv6).
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<Self, ParseError> {
        let mask = IpAddress::netmask(address.family(), prefix_len)?;
        Ok(IpPrefix { address, mask })
    }

    /// Creates a prefix from raw parts without checking them.
    pub const fn with_mask(address: IpAddress, mask: IpAddress) -> Self {
        IpPrefix { address, mask }
    }

    pub const fn address(&self) -> &IpAddress {
        &self.address
    }

    pub const fn mask(&self) -> &IpAddress {
        &self.mask
    }

    pub const fn family(&self) -> IpFamily {
        self.address.family()
    }

    /// True when address and mask share a family and the mask is contiguous.
    pub fn is_well_formed(&self) -> bool {
        self.address.family() == self.mask.family() && self.mask.mask_len().is_some()
    }

    /// Prefix length, or `None` for a malformed prefix.
    pub fn prefix_len(&self) -> Option<u8> {
        if self.address.family() != self.mask.family() {
            return None;
        }
        self.mask.mask_len()
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix_len() {
            Some(len) => write!(f, "{}/{}", self.address, len),
            None => write!(f, "{}/{}", self.address, self.mask),
        }
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    /// Accepts both `addr/len` and `addr/mask`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, tail) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;

        let address: IpAddress = addr_str.parse()?;
        if tail.contains('.') || tail.contains(':') {
            let mask: IpAddress = tail.parse()?;
            return Ok(IpPrefix::with_mask(address, mask));
        }
        let prefix_len: u8 = tail
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;

        IpPrefix::new(address, prefix_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ip_address_family() {
        let v4: IpAddress = "10.0.0.1".parse().unwrap();
        assert_eq!(v4.family(), IpFamily::V4);

        let v6: IpAddress = "::1".parse().unwrap();
        assert_eq!(v6.family(), IpFamily::V6);
    }

    #[test]
    fn test_netmask() {
        let mask = IpAddress::netmask(IpFamily::V4, 16).unwrap();
        assert_eq!(mask.to_string(), "255.255.0.0");
        assert_eq!(mask.mask_len(), Some(16));

        let zero = IpAddress::netmask(IpFamily::V4, 0).unwrap();
        assert_eq!(zero.to_string(), "0.0.0.0");
        assert_eq!(zero.mask_len(), Some(0));

        let full = IpAddress::netmask(IpFamily::V6, 128).unwrap();
        assert_eq!(full.mask_len(), Some(128));

        assert!(IpAddress::netmask(IpFamily::V4, 33).is_err());
    }

    #[test]
    fn test_non_contiguous_mask() {
        let mask: IpAddress = "255.0.255.0".parse().unwrap();
        assert_eq!(mask.mask_len(), None);
    }

    #[test]
    fn test_prefix_keeps_host_bits() {
        let prefix: IpPrefix = "192.168.0.1/255.255.0.0".parse().unwrap();
        assert!(prefix.is_well_formed());
        assert_eq!(prefix.prefix_len(), Some(16));
        assert_eq!(prefix.address().to_string(), "192.168.0.1");
        assert_eq!(prefix.to_string(), "192.168.0.1/16");
    }

    #[test]
    fn test_prefix_parse_length() {
        let prefix: IpPrefix = "2001:db8::/32".parse().unwrap();
        assert_eq!(prefix.family(), IpFamily::V6);
        assert_eq!(prefix.prefix_len(), Some(32));

        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("2001:db8::/129".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_prefix_family_mismatch() {
        let prefix = IpPrefix::with_mask(
            "10.0.0.0".parse().unwrap(),
            "ffff:ffff::".parse().unwrap(),
        );
        assert!(!prefix.is_well_formed());
        assert_eq!(prefix.prefix_len(), None);
        assert_eq!(prefix.to_string(), "10.0.0.0/ffff:ffff::");
    }
}
