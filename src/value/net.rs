//! IP prefixes (`net` primitive).
//!
//! The address is always stored masked to its prefix length, so
//! `10.1.2.3/8` and `10.0.0.0/8` are the same value. The payload is the
//! address octets followed by the mask octets (8 bytes for IPv4, 32 for IPv6).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use eyre::{bail, ensure, Result, WrapErr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Net {
    addr: IpAddr,
    bits: u8,
}

fn max_bits(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn v4_mask(bits: u8) -> u32 {
    if bits == 0 {
        0
    } else {
        u32::MAX << (32 - bits as u32)
    }
}

fn v6_mask(bits: u8) -> u128 {
    if bits == 0 {
        0
    } else {
        u128::MAX << (128 - bits as u32)
    }
}

impl Net {
    pub fn new(addr: IpAddr, bits: u8) -> Result<Net> {
        ensure!(
            bits <= max_bits(&addr),
            "prefix length {} too long for {}",
            bits,
            addr
        );
        let addr = match addr {
            IpAddr::V4(a) => IpAddr::V4(Ipv4Addr::from(u32::from(a) & v4_mask(bits))),
            IpAddr::V6(a) => IpAddr::V6(Ipv6Addr::from(u128::from(a) & v6_mask(bits))),
        };
        Ok(Net { addr, bits })
    }

    /// Parses CIDR notation, e.g. `192.168.0.0/16` or `fe80::/10`.
    pub fn parse(s: &str) -> Result<Net> {
        let (addr, bits) = s
            .split_once('/')
            .ok_or_else(|| eyre::eyre!("invalid network '{}': missing prefix length", s))?;
        let addr: IpAddr = addr
            .parse()
            .wrap_err_with(|| format!("invalid network '{}': bad address", s))?;
        ensure!(
            !bits.is_empty() && bits.bytes().all(|b| b.is_ascii_digit()),
            "invalid network '{}': bad prefix length",
            s
        );
        let bits: u8 = bits
            .parse()
            .wrap_err_with(|| format!("invalid network '{}': bad prefix length", s))?;
        Net::new(addr, bits)
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                u32::from(*ip) & v4_mask(self.bits) == u32::from(net)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                u128::from(*ip) & v6_mask(self.bits) == u128::from(net)
            }
            _ => false,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self.addr {
            IpAddr::V4(a) => {
                let mut out = a.octets().to_vec();
                out.extend_from_slice(&v4_mask(self.bits).to_be_bytes());
                out
            }
            IpAddr::V6(a) => {
                let mut out = a.octets().to_vec();
                out.extend_from_slice(&v6_mask(self.bits).to_be_bytes());
                out
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Net> {
        match bytes.len() {
            8 => {
                let addr: [u8; 4] = bytes[..4].try_into()?;
                let mask = u32::from_be_bytes(bytes[4..].try_into()?);
                ensure!(
                    mask.leading_ones() + mask.trailing_zeros() == 32,
                    "non-contiguous IPv4 mask"
                );
                Net::new(IpAddr::from(addr), mask.leading_ones() as u8)
            }
            32 => {
                let addr: [u8; 16] = bytes[..16].try_into()?;
                let mask = u128::from_be_bytes(bytes[16..].try_into()?);
                ensure!(
                    mask.leading_ones() + mask.trailing_zeros() == 128,
                    "non-contiguous IPv6 mask"
                );
                Net::new(IpAddr::from(addr), mask.leading_ones() as u8)
            }
            n => bail!("net payload must be 8 or 32 bytes, got {}", n),
        }
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.bits)
    }
}
