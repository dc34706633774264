//! The resolver pool.
//!
//! A fixed table of public recursive resolvers queried concurrently for a
//! domain's NS set. Entries that stop answering only reduce coverage; they
//! never block a check.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

/// One public resolver in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolverEntry {
    /// Human-readable provider name
    pub label: &'static str,
    /// Address queried on port 53
    pub address: Ipv4Addr,
}

impl ResolverEntry {
    /// Creates a pool entry.
    pub const fn new(label: &'static str, address: Ipv4Addr) -> Self {
        Self { label, address }
    }
}

impl fmt::Display for ResolverEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.address)
    }
}

// Sourced from the public resolver list at https://dnschecker.org/
const RESOLVER_POOL: &[ResolverEntry] = &[
    ResolverEntry::new("OpenDNS", Ipv4Addr::new(208, 67, 222, 220)),
    ResolverEntry::new("Google", Ipv4Addr::new(8, 8, 8, 8)),
    ResolverEntry::new("Quad9_1", Ipv4Addr::new(9, 9, 9, 9)),
    ResolverEntry::new("AT&T Services", Ipv4Addr::new(12, 121, 117, 201)),
    ResolverEntry::new("Quad9_2", Ipv4Addr::new(149, 112, 112, 112)),
    ResolverEntry::new("NeuStar", Ipv4Addr::new(156, 154, 70, 64)),
    ResolverEntry::new("Fortinet Inc", Ipv4Addr::new(208, 91, 112, 53)),
    ResolverEntry::new("IONICA LLC", Ipv4Addr::new(176, 103, 130, 130)),
    ResolverEntry::new("Liquid Telecommunications Ltd", Ipv4Addr::new(5, 11, 11, 5)),
    ResolverEntry::new("Pyton Communication Services B.V.", Ipv4Addr::new(193, 58, 204, 59)),
    ResolverEntry::new("Association Gitoyen", Ipv4Addr::new(80, 67, 169, 40)),
    ResolverEntry::new("Prioritytelecom Spain S.A.", Ipv4Addr::new(212, 230, 255, 1)),
    ResolverEntry::new("Oskar Emmenegger", Ipv4Addr::new(194, 209, 157, 109)),
    ResolverEntry::new("nemox.net", Ipv4Addr::new(83, 137, 41, 9)),
    ResolverEntry::new("4D Data Centres Ltd", Ipv4Addr::new(37, 209, 219, 30)),
    ResolverEntry::new("Verizon Deutschland GmbH", Ipv4Addr::new(194, 172, 160, 4)),
    ResolverEntry::new("Marcatel Com", Ipv4Addr::new(200, 56, 224, 11)),
    ResolverEntry::new("Universo Online S.A", Ipv4Addr::new(200, 221, 11, 100)),
    ResolverEntry::new("TT Dotcom Sdn Bhd", Ipv4Addr::new(211, 25, 206, 147)),
    ResolverEntry::new("Cloudflare Inc", Ipv4Addr::new(1, 1, 1, 1)),
    ResolverEntry::new("Pacific Internet", Ipv4Addr::new(61, 8, 0, 113)),
    ResolverEntry::new("SiteHost", Ipv4Addr::new(223, 165, 64, 97)),
    ResolverEntry::new("Tefincom S.A.", Ipv4Addr::new(103, 86, 99, 100)),
    ResolverEntry::new("LG Dacom Corporation", Ipv4Addr::new(164, 124, 101, 2)),
    ResolverEntry::new("Shenzhen Sunrise Technology Co. Ltd.", Ipv4Addr::new(202, 46, 34, 75)),
    ResolverEntry::new("Teknet Yazlim", Ipv4Addr::new(31, 7, 37, 37)),
    ResolverEntry::new("Kappa Internet Services Private Limited", Ipv4Addr::new(115, 178, 96, 2)),
    ResolverEntry::new("CMPak Limited", Ipv4Addr::new(209, 150, 154, 1)),
    ResolverEntry::new("CLOUDITY Network", Ipv4Addr::new(185, 83, 212, 30)),
    ResolverEntry::new("Daniel Cid", Ipv4Addr::new(185, 228, 168, 9)),
];

/// Returns the process-wide resolver pool.
pub fn resolver_pool() -> &'static [ResolverEntry] {
    RESOLVER_POOL
}
