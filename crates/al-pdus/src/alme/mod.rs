//! ALME-SAP: the wire protocol between a High Level Entity (HLE, reached
//! over the ALME TCP port) and the abstraction layer itself (top-level
//! spec §6). The standard defines the primitive *semantics* but leaves the
//! byte layout to the implementer; this module fixes one: a single type
//! byte followed by a primitive-specific body, with exactly one request
//! producing exactly one confirm/response per connection.

pub mod forwarding;
pub mod interface;
pub mod metric;
pub mod vendor;

pub use forwarding::{
    ClassificationSet, FwdRuleEntry, GetFwdRulesResponse, ModifyFwdRuleConfirm, ModifyFwdRuleRequest,
    RemoveFwdRuleConfirm, RemoveFwdRuleRequest, SetFwdRuleConfirm, SetFwdRuleRequest,
};
pub use interface::{
    GetIntfListResponse, GetIntfPwrStateRequest, GetIntfPwrStateResponse, IntfDescriptorEntry,
    SetIntfPwrStateConfirm, SetIntfPwrStateRequest,
};
pub use metric::{GetMetricRequest, GetMetricResponse, MetricDescriptorEntry};
pub use vendor::{CustomCommand, CustomCommandRequest, CustomCommandResponse, PowerState, ReasonCode};

use al_core::{ByteReader, ByteWriter, PduParseErr};

/// ALME-SAP message type (top-level spec §6, "Table 5.x" primitive list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlmeType {
    GetIntfListRequest = 0x01,
    GetIntfListResponse = 0x02,
    SetIntfPwrStateRequest = 0x03,
    SetIntfPwrStateConfirm = 0x04,
    GetIntfPwrStateRequest = 0x05,
    GetIntfPwrStateResponse = 0x06,
    SetFwdRuleRequest = 0x07,
    SetFwdRuleConfirm = 0x08,
    GetFwdRulesRequest = 0x09,
    GetFwdRulesResponse = 0x0a,
    ModifyFwdRuleRequest = 0x0b,
    ModifyFwdRuleConfirm = 0x0c,
    RemoveFwdRuleRequest = 0x0d,
    RemoveFwdRuleConfirm = 0x0e,
    GetMetricRequest = 0x0f,
    GetMetricResponse = 0x10,
    CustomCommandRequest = 0xf0,
    CustomCommandResponse = 0xf1,
}

impl AlmeType {
    pub fn from_u8(v: u8) -> Result<Self, PduParseErr> {
        use AlmeType::*;
        Ok(match v {
            0x01 => GetIntfListRequest,
            0x02 => GetIntfListResponse,
            0x03 => SetIntfPwrStateRequest,
            0x04 => SetIntfPwrStateConfirm,
            0x05 => GetIntfPwrStateRequest,
            0x06 => GetIntfPwrStateResponse,
            0x07 => SetFwdRuleRequest,
            0x08 => SetFwdRuleConfirm,
            0x09 => GetFwdRulesRequest,
            0x0a => GetFwdRulesResponse,
            0x0b => ModifyFwdRuleRequest,
            0x0c => ModifyFwdRuleConfirm,
            0x0d => RemoveFwdRuleRequest,
            0x0e => RemoveFwdRuleConfirm,
            0x0f => GetMetricRequest,
            0x10 => GetMetricResponse,
            0xf0 => CustomCommandRequest,
            0xf1 => CustomCommandResponse,
            other => return Err(PduParseErr::InvalidValue { field: "alme_type", value: other as u64 }),
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One ALME-SAP primitive, framed as a type byte followed by its body.
/// `GetIntfListRequest`, `GetFwdRulesRequest` carry no body at all.
#[derive(Debug, Clone, PartialEq)]
pub enum AlmeMessage {
    GetIntfListRequest,
    GetIntfListResponse(GetIntfListResponse),
    SetIntfPwrStateRequest(SetIntfPwrStateRequest),
    SetIntfPwrStateConfirm(SetIntfPwrStateConfirm),
    GetIntfPwrStateRequest(GetIntfPwrStateRequest),
    GetIntfPwrStateResponse(GetIntfPwrStateResponse),
    SetFwdRuleRequest(SetFwdRuleRequest),
    SetFwdRuleConfirm(SetFwdRuleConfirm),
    GetFwdRulesRequest,
    GetFwdRulesResponse(GetFwdRulesResponse),
    ModifyFwdRuleRequest(ModifyFwdRuleRequest),
    ModifyFwdRuleConfirm(ModifyFwdRuleConfirm),
    RemoveFwdRuleRequest(RemoveFwdRuleRequest),
    RemoveFwdRuleConfirm(RemoveFwdRuleConfirm),
    GetMetricRequest(GetMetricRequest),
    GetMetricResponse(GetMetricResponse),
    CustomCommandRequest(CustomCommandRequest),
    CustomCommandResponse(CustomCommandResponse),
}

impl AlmeMessage {
    pub fn alme_type(&self) -> AlmeType {
        use AlmeMessage::*;
        match self {
            GetIntfListRequest => AlmeType::GetIntfListRequest,
            GetIntfListResponse(_) => AlmeType::GetIntfListResponse,
            SetIntfPwrStateRequest(_) => AlmeType::SetIntfPwrStateRequest,
            SetIntfPwrStateConfirm(_) => AlmeType::SetIntfPwrStateConfirm,
            GetIntfPwrStateRequest(_) => AlmeType::GetIntfPwrStateRequest,
            GetIntfPwrStateResponse(_) => AlmeType::GetIntfPwrStateResponse,
            SetFwdRuleRequest(_) => AlmeType::SetFwdRuleRequest,
            SetFwdRuleConfirm(_) => AlmeType::SetFwdRuleConfirm,
            GetFwdRulesRequest => AlmeType::GetFwdRulesRequest,
            GetFwdRulesResponse(_) => AlmeType::GetFwdRulesResponse,
            ModifyFwdRuleRequest(_) => AlmeType::ModifyFwdRuleRequest,
            ModifyFwdRuleConfirm(_) => AlmeType::ModifyFwdRuleConfirm,
            RemoveFwdRuleRequest(_) => AlmeType::RemoveFwdRuleRequest,
            RemoveFwdRuleConfirm(_) => AlmeType::RemoveFwdRuleConfirm,
            GetMetricRequest(_) => AlmeType::GetMetricRequest,
            GetMetricResponse(_) => AlmeType::GetMetricResponse,
            CustomCommandRequest(_) => AlmeType::CustomCommandRequest,
            CustomCommandResponse(_) => AlmeType::CustomCommandResponse,
        }
    }

    pub fn forge(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_u8(self.alme_type().as_u8());
        use AlmeMessage::*;
        match self {
            GetIntfListRequest | GetFwdRulesRequest => {}
            GetIntfListResponse(v) => v.forge(&mut w),
            SetIntfPwrStateRequest(v) => v.forge(&mut w),
            SetIntfPwrStateConfirm(v) => v.forge(&mut w),
            GetIntfPwrStateRequest(v) => v.forge(&mut w),
            GetIntfPwrStateResponse(v) => v.forge(&mut w),
            SetFwdRuleRequest(v) => v.forge(&mut w),
            SetFwdRuleConfirm(v) => v.forge(&mut w),
            GetFwdRulesResponse(v) => v.forge(&mut w),
            ModifyFwdRuleRequest(v) => v.forge(&mut w),
            ModifyFwdRuleConfirm(v) => v.forge(&mut w),
            RemoveFwdRuleRequest(v) => v.forge(&mut w),
            RemoveFwdRuleConfirm(v) => v.forge(&mut w),
            GetMetricRequest(v) => v.forge(&mut w),
            GetMetricResponse(v) => v.forge(&mut w),
            CustomCommandRequest(v) => v.forge(&mut w),
            CustomCommandResponse(v) => v.forge(&mut w),
        }
        w.into_vec()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, PduParseErr> {
        let mut r = ByteReader::new(bytes);
        let alme_type = AlmeType::from_u8(r.read_u8("alme_type")?)?;
        Ok(match alme_type {
            AlmeType::GetIntfListRequest => AlmeMessage::GetIntfListRequest,
            AlmeType::GetIntfListResponse => AlmeMessage::GetIntfListResponse(GetIntfListResponse::parse(&mut r)?),
            AlmeType::SetIntfPwrStateRequest => {
                AlmeMessage::SetIntfPwrStateRequest(SetIntfPwrStateRequest::parse(&mut r)?)
            }
            AlmeType::SetIntfPwrStateConfirm => {
                AlmeMessage::SetIntfPwrStateConfirm(SetIntfPwrStateConfirm::parse(&mut r)?)
            }
            AlmeType::GetIntfPwrStateRequest => {
                AlmeMessage::GetIntfPwrStateRequest(GetIntfPwrStateRequest::parse(&mut r)?)
            }
            AlmeType::GetIntfPwrStateResponse => {
                AlmeMessage::GetIntfPwrStateResponse(GetIntfPwrStateResponse::parse(&mut r)?)
            }
            AlmeType::SetFwdRuleRequest => AlmeMessage::SetFwdRuleRequest(SetFwdRuleRequest::parse(&mut r)?),
            AlmeType::SetFwdRuleConfirm => AlmeMessage::SetFwdRuleConfirm(SetFwdRuleConfirm::parse(&mut r)?),
            AlmeType::GetFwdRulesRequest => AlmeMessage::GetFwdRulesRequest,
            AlmeType::GetFwdRulesResponse => AlmeMessage::GetFwdRulesResponse(GetFwdRulesResponse::parse(&mut r)?),
            AlmeType::ModifyFwdRuleRequest => {
                AlmeMessage::ModifyFwdRuleRequest(ModifyFwdRuleRequest::parse(&mut r)?)
            }
            AlmeType::ModifyFwdRuleConfirm => {
                AlmeMessage::ModifyFwdRuleConfirm(ModifyFwdRuleConfirm::parse(&mut r)?)
            }
            AlmeType::RemoveFwdRuleRequest => {
                AlmeMessage::RemoveFwdRuleRequest(RemoveFwdRuleRequest::parse(&mut r)?)
            }
            AlmeType::RemoveFwdRuleConfirm => {
                AlmeMessage::RemoveFwdRuleConfirm(RemoveFwdRuleConfirm::parse(&mut r)?)
            }
            AlmeType::GetMetricRequest => AlmeMessage::GetMetricRequest(GetMetricRequest::parse(&mut r)?),
            AlmeType::GetMetricResponse => AlmeMessage::GetMetricResponse(GetMetricResponse::parse(&mut r)?),
            AlmeType::CustomCommandRequest => {
                AlmeMessage::CustomCommandRequest(CustomCommandRequest::parse(&mut r)?)
            }
            AlmeType::CustomCommandResponse => {
                AlmeMessage::CustomCommandResponse(CustomCommandResponse::parse(&mut r)?)
            }
        })
    }
}
