use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use al_core::{MacAddr, PduParseErr};

use super::header::CmduHeader;

struct PendingCmdu {
    message_type: u16,
    fragments: BTreeMap<u8, Vec<u8>>,
    last_fragment_id: Option<u8>,
    expires_at: Instant,
}

/// Reassembles fragmented CMDUs keyed by (source MAC, message id)
/// (top-level spec §4.3). Each stored fragment is the TLV-section bytes
/// with that fragment's own End-of-message stripped; reassembly re-appends
/// a single End-of-message once all fragments up to the last one arrive.
pub struct ReassemblyTable {
    entries: HashMap<(MacAddr, u16), PendingCmdu>,
    ttl: Duration,
}

impl ReassemblyTable {
    pub fn new(ttl: Duration) -> Self {
        Self { entries: HashMap::new(), ttl }
    }

    /// Feed one fragment's TLV-section bytes (everything after the 6-byte
    /// header, including this fragment's own End-of-message). Returns the
    /// fully reassembled TLV-section bytes (with exactly one trailing
    /// End-of-message) once the last fragment has arrived and no gaps
    /// remain.
    pub fn insert_fragment(
        &mut self,
        source: MacAddr,
        header: &CmduHeader,
        tlv_section: &[u8],
        now: Instant,
    ) -> Result<Option<Vec<u8>>, PduParseErr> {
        if tlv_section.len() < 3 || tlv_section[tlv_section.len() - 3..] != [0x00, 0x00, 0x00] {
            return Err(PduParseErr::InvalidLength { expected: 3, found: tlv_section.len() });
        }
        let trimmed = tlv_section[..tlv_section.len() - 3].to_vec();

        let key = (source, header.message_id);
        let entry = self.entries.entry(key).or_insert_with(|| PendingCmdu {
            message_type: header.message_type,
            fragments: BTreeMap::new(),
            last_fragment_id: None,
            expires_at: now + self.ttl,
        });
        entry.expires_at = now + self.ttl;
        entry.fragments.insert(header.fragment_id, trimmed);
        if header.is_last_fragment() {
            entry.last_fragment_id = Some(header.fragment_id);
        }

        if let Some(last) = entry.last_fragment_id {
            let complete = entry.fragments.len() == last as usize + 1
                && (0..=last).all(|id| entry.fragments.contains_key(&id));
            if complete {
                let mut out = Vec::new();
                for id in 0..=last {
                    out.extend_from_slice(&entry.fragments[&id]);
                }
                out.extend_from_slice(&[0x00, 0x00, 0x00]);
                self.entries.remove(&key);
                return Ok(Some(out));
            }
        }
        Ok(None)
    }

    /// Drop reassembly state for CMDUs whose last fragment never arrived.
    pub fn evict_expired(&mut self, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Message type of a still-pending reassembly, if one exists for this key.
    pub fn pending_message_type(&self, source: MacAddr, message_id: u16) -> Option<u16> {
        self.entries.get(&(source, message_id)).map(|e| e.message_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(fragment_id: u8, last: bool) -> CmduHeader {
        CmduHeader {
            message_type: 0x0003,
            message_id: 7,
            fragment_id,
            flags: if last { CmduHeader::LAST_FRAGMENT } else { 0 },
        }
    }

    #[test]
    fn reassembles_two_fragments_in_order() {
        let mut table = ReassemblyTable::new(Duration::from_secs(5));
        let mac = MacAddr::new([1; 6]);
        let now = Instant::now();

        let frag0 = [0x01, 0x00, 0x06, 1, 2, 3, 4, 5, 6, 0x00, 0x00, 0x00];
        let frag1 = [0x02, 0x00, 0x06, 7, 8, 9, 10, 11, 12, 0x00, 0x00, 0x00];

        assert!(table.insert_fragment(mac, &header(0, false), &frag0, now).unwrap().is_none());
        let result = table.insert_fragment(mac, &header(1, true), &frag1, now).unwrap().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&frag0[..frag0.len() - 3]);
        expected.extend_from_slice(&frag1[..frag1.len() - 3]);
        expected.extend_from_slice(&[0x00, 0x00, 0x00]);
        assert_eq!(result, expected);
        assert_eq!(table.pending_count(), 0);
    }

    #[test]
    fn out_of_order_delivery_still_reassembles() {
        let mut table = ReassemblyTable::new(Duration::from_secs(5));
        let mac = MacAddr::new([2; 6]);
        let now = Instant::now();
        let frag0 = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        let frag1 = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00];

        assert!(table.insert_fragment(mac, &header(1, true), &frag1, now).unwrap().is_none());
        assert!(table.insert_fragment(mac, &header(0, false), &frag0, now).unwrap().is_some());
    }

    #[test]
    fn random_interleaved_delivery_reassembles_many_fragments() {
        // xorshift64, seeded from a fixed constant (top-level spec §8
        // property 2: "random interleaved delivery of its fragments").
        struct Rng(u64);
        impl Rng {
            fn next(&mut self) -> u64 {
                self.0 ^= self.0 << 13;
                self.0 ^= self.0 >> 7;
                self.0 ^= self.0 << 17;
                self.0
            }
        }
        let mut rng = Rng(0xc0ffee_1905);

        let mac = MacAddr::new([9; 6]);
        let now = Instant::now();
        let fragment_count = 6u8;
        let fragments: Vec<Vec<u8>> = (0..fragment_count)
            .map(|id| vec![id, id.wrapping_add(1), id.wrapping_add(2), 0x00, 0x00, 0x00])
            .collect();

        // Fisher-Yates shuffle of the delivery order, not the payloads.
        let mut order: Vec<u8> = (0..fragment_count).collect();
        for i in (1..order.len()).rev() {
            let j = (rng.next() as usize) % (i + 1);
            order.swap(i, j);
        }

        let mut table = ReassemblyTable::new(Duration::from_secs(5));
        let mut result = None;
        for &id in &order {
            let h = header(id, id == fragment_count - 1);
            result = table.insert_fragment(mac, &h, &fragments[id as usize], now).unwrap();
        }
        let reassembled = result.expect("last fragment in the shuffled order completes reassembly");

        let mut expected = Vec::new();
        for frag in &fragments {
            expected.extend_from_slice(&frag[..frag.len() - 3]);
        }
        expected.extend_from_slice(&[0x00, 0x00, 0x00]);
        assert_eq!(reassembled, expected);
    }

    #[test]
    fn expired_entries_are_evicted() {
        let mut table = ReassemblyTable::new(Duration::from_millis(10));
        let mac = MacAddr::new([3; 6]);
        let t0 = Instant::now();
        let frag0 = [0x00, 0x00, 0x00];
        table.insert_fragment(mac, &header(0, false), &frag0, t0).unwrap();
        assert_eq!(table.pending_count(), 1);
        table.evict_expired(t0 + Duration::from_millis(50));
        assert_eq!(table.pending_count(), 0);
    }
}
