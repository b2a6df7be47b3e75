use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// Non1905NeighborDeviceList TLV: neighbors seen on a local interface that
/// do not speak 1905.1 (top-level spec §4.4, TopologyResponse content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Non1905NeighborDeviceList {
    pub local_mac: MacAddr,
    pub neighbors: Vec<MacAddr>,
}

impl Non1905NeighborDeviceList {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let local_mac = r.read_mac("local_mac")?;
        let mut neighbors = Vec::new();
        while !r.is_empty() {
            neighbors.push(r.read_mac("neighbor_mac")?);
        }
        Ok(Self { local_mac, neighbors })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.local_mac);
        for mac in &self.neighbors {
            w.write_mac(mac);
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 6 * self.neighbors.len() as u32
    }
}

/// One 1905-speaking neighbor entry: carries whether it bridges 1905 traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry {
    pub mac: MacAddr,
    pub bridges_1905: bool,
}

/// NeighborDeviceList TLV: 1905.1 AL neighbors seen on a local interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborDeviceList {
    pub local_mac: MacAddr,
    pub neighbors: Vec<NeighborEntry>,
}

impl NeighborDeviceList {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let local_mac = r.read_mac("local_mac")?;
        let mut neighbors = Vec::new();
        while !r.is_empty() {
            let mac = r.read_mac("neighbor_mac")?;
            let flags = r.read_u8("neighbor_flags")?;
            neighbors.push(NeighborEntry { mac, bridges_1905: flags & 0x80 != 0 });
        }
        Ok(Self { local_mac, neighbors })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.local_mac);
        for n in &self.neighbors {
            w.write_mac(&n.mac);
            w.write_u8(if n.bridges_1905 { 0x80 } else { 0x00 });
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 7 * self.neighbors.len() as u32
    }
}

/// One L2 neighbor entry plus the MACs it is known to sit behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2NeighborEntry {
    pub mac: MacAddr,
    pub behind_macs: Vec<MacAddr>,
}

/// L2NeighborDevice TLV (Multi-AP extension: non-1905 L2 topology hints).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2NeighborDevice {
    pub local_mac: MacAddr,
    pub neighbors: Vec<L2NeighborEntry>,
}

impl L2NeighborDevice {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let local_mac = r.read_mac("local_mac")?;
        let count = r.read_u16("l2_neighbor_count")? as usize;
        let mut neighbors = Vec::with_capacity(count);
        for _ in 0..count {
            let mac = r.read_mac("l2_neighbor_mac")?;
            let behind_count = r.read_u16("behind_mac_count")? as usize;
            let mut behind_macs = Vec::with_capacity(behind_count);
            for _ in 0..behind_count {
                behind_macs.push(r.read_mac("behind_mac")?);
            }
            neighbors.push(L2NeighborEntry { mac, behind_macs });
        }
        Ok(Self { local_mac, neighbors })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.local_mac);
        w.write_u16(self.neighbors.len() as u16);
        for n in &self.neighbors {
            w.write_mac(&n.mac);
            w.write_u16(n.behind_macs.len() as u16);
            for mac in &n.behind_macs {
                w.write_mac(mac);
            }
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 2
            + self
                .neighbors
                .iter()
                .map(|n| 6 + 2 + 6 * n.behind_macs.len() as u32)
                .sum::<u32>()
    }
}
