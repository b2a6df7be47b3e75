use al_core::{ByteReader, ByteWriter, MacAddr, PduParseErr};

use super::vendor::ReasonCode;

/// Forwarding rule bit-matching pattern. Each field is paired with a flag
/// byte; a `false` flag means that field is ignored when matching frames
/// (top-level spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationSet {
    pub mac_da: Option<MacAddr>,
    pub mac_sa: Option<MacAddr>,
    pub ether_type: Option<u16>,
    pub vid: Option<u16>,
    pub pcp: Option<u8>,
}

impl ClassificationSet {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let mac_da = r.read_mac("mac_da")?;
        let mac_da_flag = r.read_u8("mac_da_flag")? != 0;
        let mac_sa = r.read_mac("mac_sa")?;
        let mac_sa_flag = r.read_u8("mac_sa_flag")? != 0;
        let ether_type = r.read_u16("ether_type")?;
        let ether_type_flag = r.read_u8("ether_type_flag")? != 0;
        let vid = r.read_u16("vid")?;
        let vid_flag = r.read_u8("vid_flag")? != 0;
        let pcp = r.read_u8("pcp")?;
        let pcp_flag = r.read_u8("pcp_flag")? != 0;
        Ok(Self {
            mac_da: mac_da_flag.then_some(mac_da),
            mac_sa: mac_sa_flag.then_some(mac_sa),
            ether_type: ether_type_flag.then_some(ether_type),
            vid: vid_flag.then_some(vid),
            pcp: pcp_flag.then_some(pcp),
        })
    }

    fn forge(&self, w: &mut ByteWriter) {
        w.write_mac(&self.mac_da.unwrap_or(MacAddr::new([0; 6])));
        w.write_u8(self.mac_da.is_some() as u8);
        w.write_mac(&self.mac_sa.unwrap_or(MacAddr::new([0; 6])));
        w.write_u8(self.mac_sa.is_some() as u8);
        w.write_u16(self.ether_type.unwrap_or(0));
        w.write_u8(self.ether_type.is_some() as u8);
        w.write_u16(self.vid.unwrap_or(0));
        w.write_u8(self.vid.is_some() as u8);
        w.write_u8(self.pcp.unwrap_or(0));
        w.write_u8(self.pcp.is_some() as u8);
    }

    const WIRE_LEN: usize = 6 + 1 + 6 + 1 + 2 + 1 + 2 + 1 + 1 + 1;
}

fn parse_mac_list(r: &mut ByteReader) -> Result<Vec<MacAddr>, PduParseErr> {
    let count = r.read_u8("addresses_nr")? as usize;
    let mut addresses = Vec::with_capacity(count);
    for _ in 0..count {
        addresses.push(r.read_mac("address")?);
    }
    Ok(addresses)
}

fn forge_mac_list(w: &mut ByteWriter, addresses: &[MacAddr]) {
    w.write_u8(addresses.len() as u8);
    for mac in addresses {
        w.write_mac(mac);
    }
}

/// ALME-SET-FWD-RULE.request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFwdRuleRequest {
    pub classification_set: ClassificationSet,
    pub addresses: Vec<MacAddr>,
}

impl SetFwdRuleRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let classification_set = ClassificationSet::parse(r)?;
        let addresses = parse_mac_list(r)?;
        Ok(Self { classification_set, addresses })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        self.classification_set.forge(w);
        forge_mac_list(w, &self.addresses);
    }
}

/// ALME-SET-FWD-RULE.confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFwdRuleConfirm {
    pub rule_id: u16,
    pub reason_code: ReasonCode,
}

impl SetFwdRuleConfirm {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let rule_id = r.read_u16("rule_id")?;
        let reason_code = ReasonCode::from_u8(r.read_u8("reason_code")?)?;
        Ok(Self { rule_id, reason_code })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.rule_id);
        w.write_u8(self.reason_code.as_u8());
    }
}

/// One entry of an ALME-GET-FWD-RULES.response. `last_matched` is the
/// number of seconds since this rule's classification set last matched a
/// frame; zero means "no information available" (top-level spec §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FwdRuleEntry {
    pub classification_set: ClassificationSet,
    pub addresses: Vec<MacAddr>,
    pub last_matched: u16,
}

impl FwdRuleEntry {
    fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let classification_set = ClassificationSet::parse(r)?;
        let addresses = parse_mac_list(r)?;
        let last_matched = r.read_u16("last_matched")?;
        Ok(Self { classification_set, addresses, last_matched })
    }

    fn forge(&self, w: &mut ByteWriter) {
        self.classification_set.forge(w);
        forge_mac_list(w, &self.addresses);
        w.write_u16(self.last_matched);
    }

    fn wire_len(&self) -> usize {
        ClassificationSet::WIRE_LEN + 1 + self.addresses.len() * 6 + 2
    }
}

/// ALME-GET-FWD-RULES.response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetFwdRulesResponse {
    pub rules: Vec<FwdRuleEntry>,
}

impl GetFwdRulesResponse {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let count = r.read_u8("rules_nr")? as usize;
        let mut rules = Vec::with_capacity(count);
        for _ in 0..count {
            rules.push(FwdRuleEntry::parse(r)?);
        }
        Ok(Self { rules })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u8(self.rules.len() as u8);
        for rule in &self.rules {
            rule.forge(w);
        }
    }

    pub fn wire_len(&self) -> usize {
        1 + self.rules.iter().map(FwdRuleEntry::wire_len).sum::<usize>()
    }
}

/// ALME-MODIFY-FWD-RULE.request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyFwdRuleRequest {
    pub rule_id: u16,
    pub addresses: Vec<MacAddr>,
}

impl ModifyFwdRuleRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let rule_id = r.read_u16("rule_id")?;
        let addresses = parse_mac_list(r)?;
        Ok(Self { rule_id, addresses })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.rule_id);
        forge_mac_list(w, &self.addresses);
    }
}

/// ALME-MODIFY-FWD-RULE.confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyFwdRuleConfirm {
    pub rule_id: u16,
    pub reason_code: ReasonCode,
}

impl ModifyFwdRuleConfirm {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let rule_id = r.read_u16("rule_id")?;
        let reason_code = ReasonCode::from_u8(r.read_u8("reason_code")?)?;
        Ok(Self { rule_id, reason_code })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.rule_id);
        w.write_u8(self.reason_code.as_u8());
    }
}

/// ALME-REMOVE-FWD-RULE.request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFwdRuleRequest {
    pub rule_id: u16,
}

impl RemoveFwdRuleRequest {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        Ok(Self { rule_id: r.read_u16("rule_id")? })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.rule_id);
    }
}

/// ALME-REMOVE-FWD-RULE.confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFwdRuleConfirm {
    pub rule_id: u16,
    pub reason_code: ReasonCode,
}

impl RemoveFwdRuleConfirm {
    pub fn parse(r: &mut ByteReader) -> Result<Self, PduParseErr> {
        let rule_id = r.read_u16("rule_id")?;
        let reason_code = ReasonCode::from_u8(r.read_u8("reason_code")?)?;
        Ok(Self { rule_id, reason_code })
    }

    pub fn forge(&self, w: &mut ByteWriter) {
        w.write_u16(self.rule_id);
        w.write_u8(self.reason_code.as_u8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classification_set() -> ClassificationSet {
        ClassificationSet {
            mac_da: Some(MacAddr::new([1; 6])),
            mac_sa: None,
            ether_type: Some(0x893a),
            vid: None,
            pcp: Some(3),
        }
    }

    #[test]
    fn set_fwd_rule_request_round_trips() {
        let v = SetFwdRuleRequest {
            classification_set: sample_classification_set(),
            addresses: vec![MacAddr::new([2; 6]), MacAddr::new([3; 6])],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(SetFwdRuleRequest::parse(&mut r).unwrap(), v);
    }

    #[test]
    fn get_fwd_rules_response_round_trips() {
        let v = GetFwdRulesResponse {
            rules: vec![FwdRuleEntry {
                classification_set: sample_classification_set(),
                addresses: vec![MacAddr::new([4; 6])],
                last_matched: 0,
            }],
        };
        let mut w = ByteWriter::new();
        v.forge(&mut w);
        assert_eq!(w.len(), v.wire_len());
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(GetFwdRulesResponse::parse(&mut r).unwrap(), v);
    }
}
