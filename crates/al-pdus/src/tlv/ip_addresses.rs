use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// How an IPv4/IPv6 address was assigned to an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOrigin {
    Unknown,
    Dhcp,
    Static,
    SlaacOrAutoip,
}

impl AddressOrigin {
    fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(AddressOrigin::Unknown),
            0x01 => Ok(AddressOrigin::Dhcp),
            0x02 => Ok(AddressOrigin::Static),
            0x03 => Ok(AddressOrigin::SlaacOrAutoip),
            other => Err(PduParseErr::InvalidValue { field: "address_origin", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            AddressOrigin::Unknown => 0x00,
            AddressOrigin::Dhcp => 0x01,
            AddressOrigin::Static => 0x02,
            AddressOrigin::SlaacOrAutoip => 0x03,
        }
    }
}

/// One assigned IPv4 address and the DHCP server that handed it out, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4AddrEntry {
    pub origin: AddressOrigin,
    pub address: [u8; 4],
    pub dhcp_server: [u8; 4],
}

/// One interface's set of IPv4 addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4InterfaceEntry {
    pub mac: MacAddr,
    pub addresses: Vec<Ipv4AddrEntry>,
}

/// Ipv4Address TLV (top-level spec §4.4, TopologyResponse content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Addresses {
    pub interfaces: Vec<Ipv4InterfaceEntry>,
}

impl Ipv4Addresses {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let if_count = r.read_u8("ipv4_interface_count")? as usize;
        let mut interfaces = Vec::with_capacity(if_count);
        for _ in 0..if_count {
            let mac = r.read_mac("ipv4_interface_mac")?;
            let addr_count = r.read_u8("ipv4_address_count")? as usize;
            let mut addresses = Vec::with_capacity(addr_count);
            for _ in 0..addr_count {
                let origin = AddressOrigin::from_u8(r.read_u8("ipv4_origin")?)?;
                let address = [
                    r.read_u8("ipv4_0")?,
                    r.read_u8("ipv4_1")?,
                    r.read_u8("ipv4_2")?,
                    r.read_u8("ipv4_3")?,
                ];
                let dhcp_server = [
                    r.read_u8("dhcp_0")?,
                    r.read_u8("dhcp_1")?,
                    r.read_u8("dhcp_2")?,
                    r.read_u8("dhcp_3")?,
                ];
                addresses.push(Ipv4AddrEntry { origin, address, dhcp_server });
            }
            interfaces.push(Ipv4InterfaceEntry { mac, addresses });
        }
        Ok(Self { interfaces })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.interfaces.len() as u8);
        for iface in &self.interfaces {
            w.write_mac(&iface.mac);
            w.write_u8(iface.addresses.len() as u8);
            for a in &iface.addresses {
                w.write_u8(a.origin.as_u8());
                w.write_bytes(&a.address);
                w.write_bytes(&a.dhcp_server);
            }
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + self
            .interfaces
            .iter()
            .map(|iface| 6 + 1 + iface.addresses.len() as u32 * 9)
            .sum::<u32>()
    }
}

/// One assigned IPv6 address and the address it was derived from, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6AddrEntry {
    pub origin: AddressOrigin,
    pub address: [u8; 16],
    pub origin_address: [u8; 16],
}

/// One interface's set of IPv6 addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6InterfaceEntry {
    pub mac: MacAddr,
    pub link_local: [u8; 16],
    pub addresses: Vec<Ipv6AddrEntry>,
}

/// Ipv6Address TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Addresses {
    pub interfaces: Vec<Ipv6InterfaceEntry>,
}

impl Ipv6Addresses {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let if_count = r.read_u8("ipv6_interface_count")? as usize;
        let mut interfaces = Vec::with_capacity(if_count);
        for _ in 0..if_count {
            let mac = r.read_mac("ipv6_interface_mac")?;
            let mut link_local = [0u8; 16];
            link_local.copy_from_slice(r.read_bytes(16, "ipv6_link_local")?);
            let addr_count = r.read_u8("ipv6_address_count")? as usize;
            let mut addresses = Vec::with_capacity(addr_count);
            for _ in 0..addr_count {
                let origin = AddressOrigin::from_u8(r.read_u8("ipv6_origin")?)?;
                let mut address = [0u8; 16];
                address.copy_from_slice(r.read_bytes(16, "ipv6_address")?);
                let mut origin_address = [0u8; 16];
                origin_address.copy_from_slice(r.read_bytes(16, "ipv6_origin_address")?);
                addresses.push(Ipv6AddrEntry { origin, address, origin_address });
            }
            interfaces.push(Ipv6InterfaceEntry { mac, link_local, addresses });
        }
        Ok(Self { interfaces })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.interfaces.len() as u8);
        for iface in &self.interfaces {
            w.write_mac(&iface.mac);
            w.write_bytes(&iface.link_local);
            w.write_u8(iface.addresses.len() as u8);
            for a in &iface.addresses {
                w.write_u8(a.origin.as_u8());
                w.write_bytes(&a.address);
                w.write_bytes(&a.origin_address);
            }
        }
    }

    pub fn wire_len(&self) -> u32 {
        1 + self
            .interfaces
            .iter()
            .map(|iface| 6 + 16 + 1 + iface.addresses.len() as u32 * 33)
            .sum::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_addresses_round_trip() {
        let v = Ipv4Addresses {
            interfaces: vec![Ipv4InterfaceEntry {
                mac: MacAddr::new([1; 6]),
                addresses: vec![Ipv4AddrEntry {
                    origin: AddressOrigin::Dhcp,
                    address: [192, 168, 1, 50],
                    dhcp_server: [192, 168, 1, 1],
                }],
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(Ipv4Addresses::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn ipv6_addresses_round_trip() {
        let v = Ipv6Addresses {
            interfaces: vec![Ipv6InterfaceEntry {
                mac: MacAddr::new([1; 6]),
                link_local: [0xfe; 16],
                addresses: vec![Ipv6AddrEntry {
                    origin: AddressOrigin::SlaacOrAutoip,
                    address: [0xab; 16],
                    origin_address: [0; 16],
                }],
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(Ipv6Addresses::parse(&mut r).unwrap(), v);
    }
}
