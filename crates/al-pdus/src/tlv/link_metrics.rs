use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

/// Which neighbor(s) a LinkMetricQuery TLV asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMetricNeighbor {
    AllNeighbors,
    SpecificNeighbor(MacAddr),
}

/// Which direction(s) of metric a LinkMetricQuery TLV asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMetricType {
    TxOnly,
    RxOnly,
    Both,
}

impl LinkMetricType {
    fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        match v {
            0x00 => Ok(LinkMetricType::TxOnly),
            0x01 => Ok(LinkMetricType::RxOnly),
            0x02 => Ok(LinkMetricType::Both),
            other => Err(PduParseErr::InvalidValue { field: "link_metric_type", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            LinkMetricType::TxOnly => 0x00,
            LinkMetricType::RxOnly => 0x01,
            LinkMetricType::Both => 0x02,
        }
    }
}

/// LinkMetricQuery TLV (top-level spec §4.4: LinkMetricQuery/LinkMetricResponse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMetricQuery {
    pub neighbor: LinkMetricNeighbor,
    pub metric_type: LinkMetricType,
}

impl LinkMetricQuery {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let kind = r.read_u8("neighbor_type")?;
        let neighbor = match kind {
            0x00 => {
                r.skip(6, "unused_neighbor_mac")?;
                LinkMetricNeighbor::AllNeighbors
            }
            0x01 => LinkMetricNeighbor::SpecificNeighbor(r.read_mac("neighbor_mac")?),
            other => return Err(PduParseErr::InvalidValue { field: "neighbor_type", value: other as u64 }),
        };
        let metric_type = LinkMetricType::from_u8(r.read_u8("metric_type")?)?;
        Ok(Self { neighbor, metric_type })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        match self.neighbor {
            LinkMetricNeighbor::AllNeighbors => {
                w.write_u8(0x00);
                w.write_mac(&MacAddr::ZERO);
            }
            LinkMetricNeighbor::SpecificNeighbor(mac) => {
                w.write_u8(0x01);
                w.write_mac(&mac);
            }
        }
        w.write_u8(self.metric_type.as_u8());
    }

    pub fn wire_len(&self) -> u32 {
        1 + 6 + 1
    }
}

/// One transmitter-side link entry (top-level spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxLinkEntry {
    pub local_if: MacAddr,
    pub neighbor_if: MacAddr,
    pub media_type: u16,
    pub bridge_present: bool,
    pub packet_errors: u32,
    pub transmitted_packets: u32,
    pub mac_throughput_capacity_mbps: u16,
    pub link_availability_pct: u16,
    pub phy_rate_mbps: u16,
}

/// TransmitterLinkMetric TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitterLinkMetric {
    pub al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub link_entries: Vec<TxLinkEntry>,
}

impl TransmitterLinkMetric {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let al_mac = r.read_mac("al_mac")?;
        let neighbor_al_mac = r.read_mac("neighbor_al_mac")?;
        let mut link_entries = Vec::new();
        while !r.is_empty() {
            let local_if = r.read_mac("local_if")?;
            let neighbor_if = r.read_mac("neighbor_if")?;
            let media_type = r.read_u16("media_type")?;
            let bridge_present = r.read_u8("bridge_present")? != 0;
            let packet_errors = r.read_u32("packet_errors")?;
            let transmitted_packets = r.read_u32("transmitted_packets")?;
            let mac_throughput_capacity_mbps = r.read_u16("mac_throughput_capacity")?;
            let link_availability_pct = r.read_u16("link_availability")?;
            let phy_rate_mbps = r.read_u16("phy_rate")?;
            link_entries.push(TxLinkEntry {
                local_if,
                neighbor_if,
                media_type,
                bridge_present,
                packet_errors,
                transmitted_packets,
                mac_throughput_capacity_mbps,
                link_availability_pct,
                phy_rate_mbps,
            });
        }
        Ok(Self { al_mac, neighbor_al_mac, link_entries })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.al_mac);
        w.write_mac(&self.neighbor_al_mac);
        for e in &self.link_entries {
            w.write_mac(&e.local_if);
            w.write_mac(&e.neighbor_if);
            w.write_u16(e.media_type);
            w.write_u8(if e.bridge_present { 1 } else { 0 });
            w.write_u32(e.packet_errors);
            w.write_u32(e.transmitted_packets);
            w.write_u16(e.mac_throughput_capacity_mbps);
            w.write_u16(e.link_availability_pct);
            w.write_u16(e.phy_rate_mbps);
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 6 + self.link_entries.len() as u32 * (6 + 6 + 2 + 1 + 4 + 4 + 2 + 2 + 2)
    }
}

/// One receiver-side link entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxLinkEntry {
    pub local_if: MacAddr,
    pub neighbor_if: MacAddr,
    pub media_type: u16,
    pub packet_errors: u32,
    pub received_packets: u32,
    pub rssi_dbm: i8,
}

/// ReceiverLinkMetric TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverLinkMetric {
    pub al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub link_entries: Vec<RxLinkEntry>,
}

impl ReceiverLinkMetric {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let al_mac = r.read_mac("al_mac")?;
        let neighbor_al_mac = r.read_mac("neighbor_al_mac")?;
        let mut link_entries = Vec::new();
        while !r.is_empty() {
            let local_if = r.read_mac("local_if")?;
            let neighbor_if = r.read_mac("neighbor_if")?;
            let media_type = r.read_u16("media_type")?;
            let packet_errors = r.read_u32("packet_errors")?;
            let received_packets = r.read_u32("received_packets")?;
            let rssi_dbm = r.read_u8("rssi")? as i8;
            link_entries.push(RxLinkEntry {
                local_if,
                neighbor_if,
                media_type,
                packet_errors,
                received_packets,
                rssi_dbm,
            });
        }
        Ok(Self { al_mac, neighbor_al_mac, link_entries })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.al_mac);
        w.write_mac(&self.neighbor_al_mac);
        for e in &self.link_entries {
            w.write_mac(&e.local_if);
            w.write_mac(&e.neighbor_if);
            w.write_u16(e.media_type);
            w.write_u32(e.packet_errors);
            w.write_u32(e.received_packets);
            w.write_u8(e.rssi_dbm as u8);
        }
    }

    pub fn wire_len(&self) -> u32 {
        6 + 6 + self.link_entries.len() as u32 * (6 + 6 + 2 + 4 + 4 + 1)
    }
}

/// LinkMetricResultCode TLV: carries failure when the queried neighbor is
/// not actually a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMetricResultCode {
    InvalidNeighbor,
}

impl LinkMetricResultCode {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        match r.read_u8("link_metric_result_code")? {
            0x00 => Ok(LinkMetricResultCode::InvalidNeighbor),
            other => Err(PduParseErr::InvalidValue { field: "link_metric_result_code", value: other as u64 }),
        }
    }
    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(0x00);
    }
    pub fn wire_len(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_metric_query_round_trips_all_neighbors() {
        let v = LinkMetricQuery { neighbor: LinkMetricNeighbor::AllNeighbors, metric_type: LinkMetricType::Both };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(LinkMetricQuery::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn transmitter_link_metric_round_trips() {
        let v = TransmitterLinkMetric {
            al_mac: MacAddr::new([1; 6]),
            neighbor_al_mac: MacAddr::new([2; 6]),
            link_entries: vec![TxLinkEntry {
                local_if: MacAddr::new([3; 6]),
                neighbor_if: MacAddr::new([4; 6]),
                media_type: 0x0103,
                bridge_present: true,
                packet_errors: 5,
                transmitted_packets: 1000,
                mac_throughput_capacity_mbps: 100,
                link_availability_pct: 95,
                phy_rate_mbps: 300,
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(TransmitterLinkMetric::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn receiver_link_metric_round_trips() {
        let v = ReceiverLinkMetric {
            al_mac: MacAddr::new([1; 6]),
            neighbor_al_mac: MacAddr::new([2; 6]),
            link_entries: vec![RxLinkEntry {
                local_if: MacAddr::new([3; 6]),
                neighbor_if: MacAddr::new([4; 6]),
                media_type: 0x0103,
                packet_errors: 2,
                received_packets: 900,
                rssi_dbm: -42,
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len() as u32, v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(ReceiverLinkMetric::parse(&mut r).unwrap(), v);
    }
}
