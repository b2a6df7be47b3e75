use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::vendor::ReasonCode;
use crate::tlv::link_metrics::{ReceiverLinkMetric, TransmitterLinkMetric};

/// ALME-GET-METRIC.request. `neighbor_dev_address` of all-zero means "all
/// neighbors" (top-level spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetMetricRequest {
    pub neighbor_dev_address: MacAddr,
}

impl GetMetricRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { neighbor_dev_address: r.read_mac("neighbor_dev_address")? })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.neighbor_dev_address);
    }
}

fn parse_length_prefixed_tx(r: &mut ByteReader) -> Result<Option<TransmitterLinkMetric>, PduParseErr> {
    let len = r.read_u16("tx_metric_len")? as usize;
    if len == 0 {
        return Ok(None);
    }
    let mut body = ByteReader::new(r.read_bytes(len, "tx_metric")?);
    Ok(Some(TransmitterLinkMetric::parse(&mut body)?))
}

fn parse_length_prefixed_rx(r: &mut ByteReader) -> Result<Option<ReceiverLinkMetric>, PduParseErr> {
    let len = r.read_u16("rx_metric_len")? as usize;
    if len == 0 {
        return Ok(None);
    }
    let mut body = ByteReader::new(r.read_bytes(len, "rx_metric")?);
    Ok(Some(ReceiverLinkMetric::parse(&mut body)?))
}

fn forge_length_prefixed_tx(w: &mut ByteWriter, tx: &Option<TransmitterLinkMetric>) {
    match tx {
        Some(m) => {
            w.write_u16(m.wire_len() as u16);
            m.forge(w);
        }
        None => w.write_u16(0),
    }
}

fn forge_length_prefixed_rx(w: &mut ByteWriter, rx: &Option<ReceiverLinkMetric>) {
    match rx {
        Some(m) => {
            w.write_u16(m.wire_len() as u16);
            m.forge(w);
        }
        None => w.write_u16(0),
    }
}

/// One entry of an ALME-GET-METRIC.response: the 1905 link metrics between
/// this device and `neighbor_dev_address` over `local_intf_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptorEntry {
    pub neighbor_dev_address: MacAddr,
    pub local_intf_address: MacAddr,
    pub bridge_flag: bool,
    pub tx_metric: Option<TransmitterLinkMetric>,
    pub rx_metric: Option<ReceiverLinkMetric>,
}

impl MetricDescriptorEntry {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let neighbor_dev_address = r.read_mac("neighbor_dev_address")?;
        let local_intf_address = r.read_mac("local_intf_address")?;
        let bridge_flag = r.read_u8("bridge_flag")? != 0;
        let tx_metric = parse_length_prefixed_tx(r)?;
        let rx_metric = parse_length_prefixed_rx(r)?;
        Ok(Self { neighbor_dev_address, local_intf_address, bridge_flag, tx_metric, rx_metric })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.neighbor_dev_address);
        w.write_mac(&self.local_intf_address);
        w.write_u8(self.bridge_flag as u8);
        forge_length_prefixed_tx(w, &self.tx_metric);
        forge_length_prefixed_rx(w, &self.rx_metric);
    }

    fn wire_len(&self) -> usize {
        6 + 6
            + 1
            + 2
            + self.tx_metric.as_ref().map(|m| m.wire_len() as usize).unwrap_or(0)
            + 2
            + self.rx_metric.as_ref().map(|m| m.wire_len() as usize).unwrap_or(0)
    }
}

/// ALME-GET-METRIC.response. `reason_code` is `Success` when `metrics` is
/// populated; `UnmatchedNeighborMacAddress` when the request named a MAC
/// that is not a known 1905 neighbor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMetricResponse {
    pub metrics: Vec<MetricDescriptorEntry>,
    pub reason_code: ReasonCode,
}

impl GetMetricResponse {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("metrics_nr")? as usize;
        let mut metrics = Vec::with_capacity(count);
        for _ in 0..count {
            metrics.push(MetricDescriptorEntry::parse(r)?);
        }
        let reason_code = ReasonCode::from_u8(r.read_u8("reason_code")?)?;
        Ok(Self { metrics, reason_code })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.metrics.len() as u8);
        for m in &self.metrics {
            m.forge(w);
        }
        w.write_u8(self.reason_code.as_u8());
    }

    pub fn wire_len(&self) -> usize {
        1 + self.metrics.iter().map(MetricDescriptorEntry::wire_len).sum::<usize>() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::link_metrics::TxLinkEntry;

    #[test]
    fn get_metric_response_round_trips_with_no_metrics() {
        let v = GetMetricResponse { metrics: vec![], reason_code: ReasonCode::UnmatchedNeighborMacAddress };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(GetMetricResponse::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn get_metric_response_round_trips_with_tx_metric() {
        let tx = TransmitterLinkMetric {
            al_mac: MacAddr::new([1; 6]),
            neighbor_al_mac: MacAddr::new([2; 6]),
            link_entries: vec![TxLinkEntry {
                local_if: MacAddr::new([3; 6]),
                neighbor_if: MacAddr::new([4; 6]),
                media_type: 0x0100,
                bridge_present: false,
                packet_errors: 0,
                transmitted_packets: 1000,
                mac_throughput_capacity_mbps: 1000,
                link_availability_pct: 100,
                phy_rate_mbps: 866,
            }],
        };
        let v = GetMetricResponse {
            metrics: vec![MetricDescriptorEntry {
                neighbor_dev_address: MacAddr::new([2; 6]),
                local_intf_address: MacAddr::new([3; 6]),
                bridge_flag: false,
                tx_metric: Some(tx),
                rx_metric: None,
            }],
            reason_code: ReasonCode::Success,
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len(), v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(GetMetricResponse::parse(&mut r).unwrap(), v);
    }
}
