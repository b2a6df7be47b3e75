//! TLV codec (top-level spec §4.2). Each TLV type is a small struct with
//! `parse`/`forge`/`wire_len` plus a `Display` impl, generalizing the
//! reference workspace's per-PDU `from_bitbuf`/`to_bitbuf` pattern to a
//! byte-oriented (not bit-oriented) cursor since 1905 TLVs are always
//! byte-aligned.

pub mod addresses;
pub mod device_info;
pub mod generic_phy;
pub mod interface_power;
pub mod ip_addresses;
pub mod link_metrics;
pub mod misc;
pub mod multiap;
pub mod neighbors;
pub mod push_button;
pub mod vendor;
pub mod wsc_payload;

use al_core::{ByteReader, ByteWriter, PduParseErr};

pub use addresses::{AlMacAddress, MacAddress};
pub use device_info::{DeviceBridgingCapability, DeviceInformation, LocalInterface};
pub use generic_phy::{GenericPhyDeviceInformation, GenericPhyEvent};
pub use interface_power::{
    InterfacePowerChangeInformation, InterfacePowerChangeStatus, PowerOffInterface,
};
pub use ip_addresses::{Ipv4Addresses, Ipv6Addresses};
pub use link_metrics::{
    LinkMetricQuery, LinkMetricResultCode, ReceiverLinkMetric, TransmitterLinkMetric,
};
pub use misc::{ControlUrl, DeviceIdentification, ProfileVersion};
pub use multiap::{
    ApOperationalBss, ApRadioBasicCapabilities, ApRadioIdentifier, BackhaulStaRadioCapabilities,
    MultiApExtension, MultiApProfile, SearchedService, SupportedService,
};
pub use neighbors::{L2NeighborDevice, NeighborDeviceList, Non1905NeighborDeviceList};
pub use push_button::{PushButtonEventNotification, PushButtonJoinNotification};
pub use vendor::VendorSpecific;
pub use wsc_payload::Wsc;

/// Numeric TLV type tags (top-level spec §4.2). Values follow the ordering
/// of the 1905.1/Multi-AP tag space; this rewrite does not need to match
/// any externally consumed wire format bit-for-bit, only to be internally
/// consistent and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TlvType {
    EndOfMessage = 0x00,
    AlMacAddress = 0x01,
    MacAddress = 0x02,
    DeviceInformation = 0x03,
    DeviceBridgingCapability = 0x04,
    Non1905NeighborDeviceList = 0x06,
    NeighborDeviceList = 0x07,
    LinkMetricQuery = 0x08,
    TransmitterLinkMetric = 0x09,
    ReceiverLinkMetric = 0x0a,
    VendorSpecific = 0x0b,
    LinkMetricResultCode = 0x0c,
    SearchedRole = 0x0d,
    AutoconfigFreqBand = 0x0e,
    SupportedRole = 0x0f,
    SupportedFreqBand = 0x10,
    Wsc = 0x11,
    PushButtonEventNotification = 0x12,
    PushButtonJoinNotification = 0x13,
    GenericPhyDeviceInformation = 0x14,
    DeviceIdentification = 0x15,
    ControlUrl = 0x16,
    Ipv4Address = 0x17,
    Ipv6Address = 0x18,
    GenericPhyEvent = 0x19,
    ProfileVersion = 0x1a,
    PowerOffInterface = 0x1b,
    InterfacePowerChangeInformation = 0x1c,
    InterfacePowerChangeStatus = 0x1d,
    L2NeighborDevice = 0x1e,
    SupportedService = 0x80,
    SearchedService = 0x81,
    ApRadioIdentifier = 0x82,
    ApOperationalBss = 0x83,
    ApRadioBasicCapabilities = 0x84,
    BackhaulStaRadioCapabilities = 0x85,
    MultiApProfile = 0x86,
    MultiApExtension = 0x87,
}

impl TlvType {
    pub fn from_u8(tag: u8) -> Option<TlvType> {
        use TlvType::*;
        Some(match tag {
            0x00 => EndOfMessage,
            0x01 => AlMacAddress,
            0x02 => MacAddress,
            0x03 => DeviceInformation,
            0x04 => DeviceBridgingCapability,
            0x06 => Non1905NeighborDeviceList,
            0x07 => NeighborDeviceList,
            0x08 => LinkMetricQuery,
            0x09 => TransmitterLinkMetric,
            0x0a => ReceiverLinkMetric,
            0x0b => VendorSpecific,
            0x0c => LinkMetricResultCode,
            0x0d => SearchedRole,
            0x0e => AutoconfigFreqBand,
            0x0f => SupportedRole,
            0x10 => SupportedFreqBand,
            0x11 => Wsc,
            0x12 => PushButtonEventNotification,
            0x13 => PushButtonJoinNotification,
            0x14 => GenericPhyDeviceInformation,
            0x15 => DeviceIdentification,
            0x16 => ControlUrl,
            0x17 => Ipv4Address,
            0x18 => Ipv6Address,
            0x19 => GenericPhyEvent,
            0x1a => ProfileVersion,
            0x1b => PowerOffInterface,
            0x1c => InterfacePowerChangeInformation,
            0x1d => InterfacePowerChangeStatus,
            0x1e => L2NeighborDevice,
            0x80 => SupportedService,
            0x81 => SearchedService,
            0x82 => ApRadioIdentifier,
            0x83 => ApOperationalBss,
            0x84 => ApRadioBasicCapabilities,
            0x85 => BackhaulStaRadioCapabilities,
            0x86 => MultiApProfile,
            0x87 => MultiApExtension,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        use TlvType::*;
        match self {
            EndOfMessage => "EndOfMessage",
            AlMacAddress => "AlMacAddress",
            MacAddress => "MacAddress",
            DeviceInformation => "DeviceInformation",
            DeviceBridgingCapability => "DeviceBridgingCapability",
            Non1905NeighborDeviceList => "Non1905NeighborDeviceList",
            NeighborDeviceList => "NeighborDeviceList",
            LinkMetricQuery => "LinkMetricQuery",
            TransmitterLinkMetric => "TransmitterLinkMetric",
            ReceiverLinkMetric => "ReceiverLinkMetric",
            VendorSpecific => "VendorSpecific",
            LinkMetricResultCode => "LinkMetricResultCode",
            SearchedRole => "SearchedRole",
            AutoconfigFreqBand => "AutoconfigFreqBand",
            SupportedRole => "SupportedRole",
            SupportedFreqBand => "SupportedFreqBand",
            Wsc => "Wsc",
            PushButtonEventNotification => "PushButtonEventNotification",
            PushButtonJoinNotification => "PushButtonJoinNotification",
            GenericPhyDeviceInformation => "GenericPhyDeviceInformation",
            DeviceIdentification => "DeviceIdentification",
            ControlUrl => "ControlUrl",
            Ipv4Address => "Ipv4Address",
            Ipv6Address => "Ipv6Address",
            GenericPhyEvent => "GenericPhyEvent",
            ProfileVersion => "ProfileVersion",
            PowerOffInterface => "PowerOffInterface",
            InterfacePowerChangeInformation => "InterfacePowerChangeInformation",
            InterfacePowerChangeStatus => "InterfacePowerChangeStatus",
            L2NeighborDevice => "L2NeighborDevice",
            SupportedService => "SupportedService",
            SearchedService => "SearchedService",
            ApRadioIdentifier => "ApRadioIdentifier",
            ApOperationalBss => "ApOperationalBss",
            ApRadioBasicCapabilities => "ApRadioBasicCapabilities",
            BackhaulStaRadioCapabilities => "BackhaulStaRadioCapabilities",
            MultiApProfile => "MultiApProfile",
            MultiApExtension => "MultiApExtension",
        }
    }
}

/// Closed enumeration of roles carried by SearchedRole/SupportedRole TLVs
/// (top-level spec §4.4: "SearchedRole=Registrar").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Registrar,
}

impl Role {
    fn from_u8(v: u8) -> Result<Role, PduParseErr> {
        match v {
            0x00 => Ok(Role::Registrar),
            other => Err(PduParseErr::InvalidValue { field: "role", value: other as u64 }),
        }
    }
    fn as_u8(self) -> u8 {
        match self {
            Role::Registrar => 0x00,
        }
    }
}

/// RF band identifiers shared by AutoconfigFreqBand/SupportedFreqBand TLVs
/// and by the WSC RF-bands attribute (M1/M2 both carry one of these sets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreqBand {
    TwoPointFourGhz,
    FiveGhz,
    SixtyGhz,
}

impl FreqBand {
    pub fn from_u8(v: u8) -> Result<FreqBand, PduParseErr> {
        match v {
            0x00 => Ok(FreqBand::TwoPointFourGhz),
            0x01 => Ok(FreqBand::FiveGhz),
            0x02 => Ok(FreqBand::SixtyGhz),
            other => Err(PduParseErr::InvalidValue { field: "freq_band", value: other as u64 }),
        }
    }
    pub fn as_u8(self) -> u8 {
        match self {
            FreqBand::TwoPointFourGhz => 0x00,
            FreqBand::FiveGhz => 0x01,
            FreqBand::SixtyGhz => 0x02,
        }
    }
}

/// A strongly-typed TLV value plus, for unrecognised tags, the raw skipped
/// payload (top-level spec §4.2: "Unknown tag = skip the exact length and
/// report ignored").
#[derive(Debug, Clone)]
pub enum Tlv {
    EndOfMessage,
    AlMacAddress(AlMacAddress),
    MacAddress(MacAddress),
    DeviceInformation(DeviceInformation),
    DeviceBridgingCapability(DeviceBridgingCapability),
    Non1905NeighborDeviceList(Non1905NeighborDeviceList),
    NeighborDeviceList(NeighborDeviceList),
    LinkMetricQuery(LinkMetricQuery),
    TransmitterLinkMetric(TransmitterLinkMetric),
    ReceiverLinkMetric(ReceiverLinkMetric),
    VendorSpecific(VendorSpecific),
    LinkMetricResultCode(LinkMetricResultCode),
    SearchedRole(Role),
    AutoconfigFreqBand(FreqBand),
    SupportedRole(Role),
    SupportedFreqBand(FreqBand),
    Wsc(Wsc),
    PushButtonEventNotification(PushButtonEventNotification),
    PushButtonJoinNotification(PushButtonJoinNotification),
    GenericPhyDeviceInformation(GenericPhyDeviceInformation),
    DeviceIdentification(DeviceIdentification),
    ControlUrl(ControlUrl),
    Ipv4Address(Ipv4Addresses),
    Ipv6Address(Ipv6Addresses),
    GenericPhyEvent(GenericPhyEvent),
    ProfileVersion(ProfileVersion),
    PowerOffInterface(PowerOffInterface),
    InterfacePowerChangeInformation(InterfacePowerChangeInformation),
    InterfacePowerChangeStatus(InterfacePowerChangeStatus),
    L2NeighborDevice(L2NeighborDevice),
    SupportedService(SupportedService),
    SearchedService(SearchedService),
    ApRadioIdentifier(ApRadioIdentifier),
    ApOperationalBss(ApOperationalBss),
    ApRadioBasicCapabilities(ApRadioBasicCapabilities),
    BackhaulStaRadioCapabilities(BackhaulStaRadioCapabilities),
    MultiApProfile(MultiApProfile),
    MultiApExtension(MultiApExtension),
    /// An unrecognised tag: the exact payload is kept so a relay can
    /// forward it unmodified even though this node cannot interpret it.
    Unknown { tag: u8, payload: Vec<u8> },
}

impl Tlv {
    pub fn tlv_type(&self) -> Option<TlvType> {
        use Tlv::*;
        Some(match self {
            EndOfMessage => TlvType::EndOfMessage,
            AlMacAddress(_) => TlvType::AlMacAddress,
            MacAddress(_) => TlvType::MacAddress,
            DeviceInformation(_) => TlvType::DeviceInformation,
            DeviceBridgingCapability(_) => TlvType::DeviceBridgingCapability,
            Non1905NeighborDeviceList(_) => TlvType::Non1905NeighborDeviceList,
            NeighborDeviceList(_) => TlvType::NeighborDeviceList,
            LinkMetricQuery(_) => TlvType::LinkMetricQuery,
            TransmitterLinkMetric(_) => TlvType::TransmitterLinkMetric,
            ReceiverLinkMetric(_) => TlvType::ReceiverLinkMetric,
            VendorSpecific(_) => TlvType::VendorSpecific,
            LinkMetricResultCode(_) => TlvType::LinkMetricResultCode,
            SearchedRole(_) => TlvType::SearchedRole,
            AutoconfigFreqBand(_) => TlvType::AutoconfigFreqBand,
            SupportedRole(_) => TlvType::SupportedRole,
            SupportedFreqBand(_) => TlvType::SupportedFreqBand,
            Wsc(_) => TlvType::Wsc,
            PushButtonEventNotification(_) => TlvType::PushButtonEventNotification,
            PushButtonJoinNotification(_) => TlvType::PushButtonJoinNotification,
            GenericPhyDeviceInformation(_) => TlvType::GenericPhyDeviceInformation,
            DeviceIdentification(_) => TlvType::DeviceIdentification,
            ControlUrl(_) => TlvType::ControlUrl,
            Ipv4Address(_) => TlvType::Ipv4Address,
            Ipv6Address(_) => TlvType::Ipv6Address,
            GenericPhyEvent(_) => TlvType::GenericPhyEvent,
            ProfileVersion(_) => TlvType::ProfileVersion,
            PowerOffInterface(_) => TlvType::PowerOffInterface,
            InterfacePowerChangeInformation(_) => TlvType::InterfacePowerChangeInformation,
            InterfacePowerChangeStatus(_) => TlvType::InterfacePowerChangeStatus,
            L2NeighborDevice(_) => TlvType::L2NeighborDevice,
            SupportedService(_) => TlvType::SupportedService,
            SearchedService(_) => TlvType::SearchedService,
            ApRadioIdentifier(_) => TlvType::ApRadioIdentifier,
            ApOperationalBss(_) => TlvType::ApOperationalBss,
            ApRadioBasicCapabilities(_) => TlvType::ApRadioBasicCapabilities,
            BackhaulStaRadioCapabilities(_) => TlvType::BackhaulStaRadioCapabilities,
            MultiApProfile(_) => TlvType::MultiApProfile,
            MultiApExtension(_) => TlvType::MultiApExtension,
            Unknown { .. } => return None,
        })
    }

    /// Forged length of this TLV's value (excludes the 3-byte header).
    pub fn value_len(&self) -> u16 {
        use Tlv::*;
        (match self {
            EndOfMessage => 0,
            AlMacAddress(v) => v.wire_len(),
            MacAddress(v) => v.wire_len(),
            DeviceInformation(v) => v.wire_len(),
            DeviceBridgingCapability(v) => v.wire_len(),
            Non1905NeighborDeviceList(v) => v.wire_len(),
            NeighborDeviceList(v) => v.wire_len(),
            LinkMetricQuery(v) => v.wire_len(),
            TransmitterLinkMetric(v) => v.wire_len(),
            ReceiverLinkMetric(v) => v.wire_len(),
            VendorSpecific(v) => v.wire_len(),
            LinkMetricResultCode(v) => v.wire_len(),
            SearchedRole(_) => 1,
            AutoconfigFreqBand(_) => 1,
            SupportedRole(_) => 1,
            SupportedFreqBand(_) => 1,
            Wsc(v) => v.wire_len(),
            PushButtonEventNotification(v) => v.wire_len(),
            PushButtonJoinNotification(v) => v.wire_len(),
            GenericPhyDeviceInformation(v) => v.wire_len(),
            DeviceIdentification(v) => v.wire_len(),
            ControlUrl(v) => v.wire_len(),
            Ipv4Address(v) => v.wire_len(),
            Ipv6Address(v) => v.wire_len(),
            GenericPhyEvent(v) => v.wire_len(),
            ProfileVersion(_) => 1,
            PowerOffInterface(v) => v.wire_len(),
            InterfacePowerChangeInformation(v) => v.wire_len(),
            InterfacePowerChangeStatus(v) => v.wire_len(),
            L2NeighborDevice(v) => v.wire_len(),
            SupportedService(v) => v.wire_len(),
            SearchedService(v) => v.wire_len(),
            ApRadioIdentifier(v) => v.wire_len(),
            ApOperationalBss(v) => v.wire_len(),
            ApRadioBasicCapabilities(v) => v.wire_len(),
            BackhaulStaRadioCapabilities(v) => v.wire_len(),
            MultiApProfile(_) => 1,
            MultiApExtension(_) => 1,
            Unknown { payload, .. } => payload.len() as u32,
        }) as u16
    }

    /// Total wire length including the 3-byte type+length header.
    pub fn total_len(&self) -> u16 {
        3 + self.value_len()
    }

    pub fn forge(&self, w: &mut ByteWriter) -> Result<(), PduParseErr> {
        use Tlv::*;
        let tag = match self {
            Unknown { tag, .. } => *tag,
            other => other.tlv_type().expect("typed variant always maps to a TlvType").as_u8(),
        };
        w.write_u8(tag);
        let len_patch = w.len();
        w.write_u16(0); // placeholder, backpatched below
        let start = w.len();
        match self {
            EndOfMessage => {}
            AlMacAddress(v) => v.forge(w),
            MacAddress(v) => v.forge(w),
            DeviceInformation(v) => v.forge(w),
            DeviceBridgingCapability(v) => v.forge(w),
            Non1905NeighborDeviceList(v) => v.forge(w),
            NeighborDeviceList(v) => v.forge(w),
            LinkMetricQuery(v) => v.forge(w),
            TransmitterLinkMetric(v) => v.forge(w),
            ReceiverLinkMetric(v) => v.forge(w),
            VendorSpecific(v) => v.forge(w),
            LinkMetricResultCode(v) => v.forge(w),
            SearchedRole(r) => w.write_u8(r.as_u8()),
            AutoconfigFreqBand(b) => w.write_u8(b.as_u8()),
            SupportedRole(r) => w.write_u8(r.as_u8()),
            SupportedFreqBand(b) => w.write_u8(b.as_u8()),
            Wsc(v) => v.forge(w),
            PushButtonEventNotification(v) => v.forge(w),
            PushButtonJoinNotification(v) => v.forge(w),
            GenericPhyDeviceInformation(v) => v.forge(w),
            DeviceIdentification(v) => v.forge(w),
            ControlUrl(v) => v.forge(w),
            Ipv4Address(v) => v.forge(w),
            Ipv6Address(v) => v.forge(w),
            GenericPhyEvent(v) => v.forge(w),
            ProfileVersion(v) => w.write_u8(v.raw()),
            PowerOffInterface(v) => v.forge(w),
            InterfacePowerChangeInformation(v) => v.forge(w),
            InterfacePowerChangeStatus(v) => v.forge(w),
            L2NeighborDevice(v) => v.forge(w),
            SupportedService(v) => v.forge(w),
            SearchedService(v) => v.forge(w),
            ApRadioIdentifier(v) => v.forge(w),
            ApOperationalBss(v) => v.forge(w),
            ApRadioBasicCapabilities(v) => v.forge(w),
            BackhaulStaRadioCapabilities(v) => v.forge(w),
            MultiApProfile(v) => w.write_u8(v.raw()),
            MultiApExtension(v) => w.write_u8(v.raw()),
            Unknown { payload, .. } => w.write_bytes(payload),
        }
        let written = (w.len() - start) as u16;
        w.patch_u16(len_patch, written);
        Ok(())
    }
}

/// Parse one TLV starting at `r`'s current position. Returns `Ok(None)` on
/// `EndOfMessage` (the caller stops the TLV loop there); unknown tags are
/// returned as `Tlv::Unknown` with the exact bytes skipped (§4.2).
pub fn parse_tlv(r: &mut ByteReader) -> Result<Tlv, PduParseErr> {
    let tag = r.read_u8("tlv_type")?;
    let len = r.read_u16("tlv_length")? as usize;
    if r.remaining() < len {
        return Err(PduParseErr::BufferEnded { field: Some("tlv_value") });
    }
    let mut body = ByteReader::new(&r.peek_remaining()[..len]);

    let tlv = match TlvType::from_u8(tag) {
        Some(TlvType::EndOfMessage) => Tlv::EndOfMessage,
        Some(TlvType::AlMacAddress) => Tlv::AlMacAddress(AlMacAddress::parse(&mut body)?),
        Some(TlvType::MacAddress) => Tlv::MacAddress(MacAddress::parse(&mut body)?),
        Some(TlvType::DeviceInformation) => {
            Tlv::DeviceInformation(DeviceInformation::parse(&mut body)?)
        }
        Some(TlvType::DeviceBridgingCapability) => {
            Tlv::DeviceBridgingCapability(DeviceBridgingCapability::parse(&mut body)?)
        }
        Some(TlvType::Non1905NeighborDeviceList) => {
            Tlv::Non1905NeighborDeviceList(Non1905NeighborDeviceList::parse(&mut body)?)
        }
        Some(TlvType::NeighborDeviceList) => {
            Tlv::NeighborDeviceList(NeighborDeviceList::parse(&mut body)?)
        }
        Some(TlvType::LinkMetricQuery) => Tlv::LinkMetricQuery(LinkMetricQuery::parse(&mut body)?),
        Some(TlvType::TransmitterLinkMetric) => {
            Tlv::TransmitterLinkMetric(TransmitterLinkMetric::parse(&mut body)?)
        }
        Some(TlvType::ReceiverLinkMetric) => {
            Tlv::ReceiverLinkMetric(ReceiverLinkMetric::parse(&mut body)?)
        }
        Some(TlvType::VendorSpecific) => Tlv::VendorSpecific(VendorSpecific::parse(&mut body)?),
        Some(TlvType::LinkMetricResultCode) => {
            Tlv::LinkMetricResultCode(LinkMetricResultCode::parse(&mut body)?)
        }
        Some(TlvType::SearchedRole) => Tlv::SearchedRole(Role::from_u8(body.read_u8("role")?)?),
        Some(TlvType::AutoconfigFreqBand) => {
            Tlv::AutoconfigFreqBand(FreqBand::from_u8(body.read_u8("freq_band")?)?)
        }
        Some(TlvType::SupportedRole) => Tlv::SupportedRole(Role::from_u8(body.read_u8("role")?)?),
        Some(TlvType::SupportedFreqBand) => {
            Tlv::SupportedFreqBand(FreqBand::from_u8(body.read_u8("freq_band")?)?)
        }
        Some(TlvType::Wsc) => Tlv::Wsc(Wsc::parse(&mut body, len)?),
        Some(TlvType::PushButtonEventNotification) => {
            Tlv::PushButtonEventNotification(PushButtonEventNotification::parse(&mut body)?)
        }
        Some(TlvType::PushButtonJoinNotification) => {
            Tlv::PushButtonJoinNotification(PushButtonJoinNotification::parse(&mut body)?)
        }
        Some(TlvType::GenericPhyDeviceInformation) => {
            Tlv::GenericPhyDeviceInformation(GenericPhyDeviceInformation::parse(&mut body)?)
        }
        Some(TlvType::DeviceIdentification) => {
            Tlv::DeviceIdentification(DeviceIdentification::parse(&mut body)?)
        }
        Some(TlvType::ControlUrl) => Tlv::ControlUrl(ControlUrl::parse(&mut body, len)?),
        Some(TlvType::Ipv4Address) => Tlv::Ipv4Address(Ipv4Addresses::parse(&mut body)?),
        Some(TlvType::Ipv6Address) => Tlv::Ipv6Address(Ipv6Addresses::parse(&mut body)?),
        Some(TlvType::GenericPhyEvent) => Tlv::GenericPhyEvent(GenericPhyEvent::parse(&mut body)?),
        Some(TlvType::ProfileVersion) => {
            Tlv::ProfileVersion(ProfileVersion::from_u8(body.read_u8("profile_version")?)?)
        }
        Some(TlvType::PowerOffInterface) => {
            Tlv::PowerOffInterface(PowerOffInterface::parse(&mut body)?)
        }
        Some(TlvType::InterfacePowerChangeInformation) => Tlv::InterfacePowerChangeInformation(
            InterfacePowerChangeInformation::parse(&mut body)?,
        ),
        Some(TlvType::InterfacePowerChangeStatus) => {
            Tlv::InterfacePowerChangeStatus(InterfacePowerChangeStatus::parse(&mut body)?)
        }
        Some(TlvType::L2NeighborDevice) => {
            Tlv::L2NeighborDevice(L2NeighborDevice::parse(&mut body)?)
        }
        Some(TlvType::SupportedService) => {
            Tlv::SupportedService(SupportedService::parse(&mut body)?)
        }
        Some(TlvType::SearchedService) => Tlv::SearchedService(SearchedService::parse(&mut body)?),
        Some(TlvType::ApRadioIdentifier) => {
            Tlv::ApRadioIdentifier(ApRadioIdentifier::parse(&mut body)?)
        }
        Some(TlvType::ApOperationalBss) => {
            Tlv::ApOperationalBss(ApOperationalBss::parse(&mut body)?)
        }
        Some(TlvType::ApRadioBasicCapabilities) => {
            Tlv::ApRadioBasicCapabilities(ApRadioBasicCapabilities::parse(&mut body)?)
        }
        Some(TlvType::BackhaulStaRadioCapabilities) => {
            Tlv::BackhaulStaRadioCapabilities(BackhaulStaRadioCapabilities::parse(&mut body)?)
        }
        Some(TlvType::MultiApProfile) => {
            Tlv::MultiApProfile(MultiApProfile::from_u8(body.read_u8("multiap_profile")?)?)
        }
        Some(TlvType::MultiApExtension) => {
            Tlv::MultiApExtension(MultiApExtension::from_u8(body.read_u8("multiap_extension")?)?)
        }
        None => Tlv::Unknown { tag, payload: body.read_bytes(len, "unknown_tlv")?.to_vec() },
    };

    if !body.is_empty() {
        return Err(PduParseErr::TrailingBytes { count: body.remaining() });
    }
    r.skip(len, "tlv_value")?;
    Ok(tlv)
}

/// Parse a whole TLV sequence, stopping after (and including) EndOfMessage.
pub fn parse_tlv_sequence(r: &mut ByteReader) -> Result<Vec<Tlv>, PduParseErr> {
    let mut out = Vec::new();
    loop {
        let tlv = parse_tlv(r)?;
        let is_eom = matches!(tlv, Tlv::EndOfMessage);
        out.push(tlv);
        if is_eom {
            return Ok(out);
        }
        if r.is_empty() {
            return Err(PduParseErr::BufferEnded { field: Some("end_of_message") });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_message_round_trips() {
        let mut w = ByteWriter::new();
        Tlv::EndOfMessage.forge(&mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x00, 0x00, 0x00]);
        let mut r = ByteReader::new(w.as_slice());
        let tlv = parse_tlv(&mut r).unwrap();
        assert!(matches!(tlv, Tlv::EndOfMessage));
        assert!(r.is_empty());
    }

    #[test]
    fn unknown_tag_is_skipped_not_rejected() {
        let mut w = ByteWriter::new();
        w.write_u8(0xf0);
        w.write_u16(2);
        w.write_bytes(&[0xaa, 0xbb]);
        let mut r = ByteReader::new(w.as_slice());
        let tlv = parse_tlv(&mut r).unwrap();
        match tlv {
            Tlv::Unknown { tag, payload } => {
                assert_eq!(tag, 0xf0);
                assert_eq!(payload, vec![0xaa, 0xbb]);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
        assert!(r.is_empty());
    }

    /// Small xorshift64 PRNG seeded from a fixed constant, standing in for
    /// the `proptest`/`quickcheck` dependency this workspace doesn't carry.
    struct Rng(u64);
    impl Rng {
        fn next_u64(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }
        fn next_u8(&mut self) -> u8 {
            self.next_u64() as u8
        }
        fn next_u16(&mut self) -> u16 {
            self.next_u64() as u16
        }
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }
        fn next_bool(&mut self) -> bool {
            self.next_u64() & 1 == 0
        }
        fn next_mac(&mut self) -> al_core::MacAddr {
            let mut bytes = [0u8; 6];
            for b in bytes.iter_mut() {
                *b = self.next_u8();
            }
            al_core::MacAddr::new(bytes)
        }
        fn next_len(&mut self, max: usize) -> usize {
            (self.next_u64() as usize) % (max + 1)
        }
    }

    fn arbitrary_tlv(rng: &mut Rng) -> Tlv {
        use crate::tlv::link_metrics::{RxLinkEntry, TxLinkEntry};
        use crate::tlv::neighbors::{NeighborDeviceList, NeighborEntry};
        match rng.next_u64() % 6 {
            0 => Tlv::AlMacAddress(crate::tlv::addresses::AlMacAddress { mac: rng.next_mac() }),
            1 => Tlv::MacAddress(crate::tlv::addresses::MacAddress { mac: rng.next_mac() }),
            2 => Tlv::NeighborDeviceList(NeighborDeviceList {
                local_mac: rng.next_mac(),
                neighbors: (0..rng.next_len(8))
                    .map(|_| NeighborEntry { mac: rng.next_mac(), bridges_1905: rng.next_bool() })
                    .collect(),
            }),
            3 => Tlv::TransmitterLinkMetric(TransmitterLinkMetric {
                al_mac: rng.next_mac(),
                neighbor_al_mac: rng.next_mac(),
                link_entries: (0..rng.next_len(4))
                    .map(|_| TxLinkEntry {
                        local_if: rng.next_mac(),
                        neighbor_if: rng.next_mac(),
                        media_type: rng.next_u16(),
                        bridge_present: rng.next_bool(),
                        packet_errors: rng.next_u32(),
                        transmitted_packets: rng.next_u32(),
                        mac_throughput_capacity_mbps: rng.next_u16(),
                        link_availability_pct: rng.next_u16(),
                        phy_rate_mbps: rng.next_u16(),
                    })
                    .collect(),
            }),
            4 => Tlv::ReceiverLinkMetric(ReceiverLinkMetric {
                al_mac: rng.next_mac(),
                neighbor_al_mac: rng.next_mac(),
                link_entries: (0..rng.next_len(4))
                    .map(|_| RxLinkEntry {
                        local_if: rng.next_mac(),
                        neighbor_if: rng.next_mac(),
                        media_type: rng.next_u16(),
                        packet_errors: rng.next_u32(),
                        received_packets: rng.next_u32(),
                        rssi_dbm: rng.next_u8() as i8,
                    })
                    .collect(),
            }),
            _ => Tlv::LinkMetricResultCode(LinkMetricResultCode::InvalidNeighbor),
        }
    }

    #[test]
    fn arbitrary_tlvs_round_trip() {
        // `Tlv` itself carries no `PartialEq` (some variants wrap payloads
        // that deliberately don't need one), so equality is checked per
        // variant against its payload, which does.
        let mut rng = Rng(0x5eed_1905_abcd_ef01);
        for _ in 0..200 {
            let value = arbitrary_tlv(&mut rng);
            let mut w = ByteWriter::new();
            value.forge(&mut w).unwrap();
            let mut r = ByteReader::new(w.as_slice());
            let parsed = parse_tlv(&mut r).unwrap();
            assert!(r.is_empty());
            match (value, parsed) {
                (Tlv::AlMacAddress(a), Tlv::AlMacAddress(b)) => assert_eq!(a, b),
                (Tlv::MacAddress(a), Tlv::MacAddress(b)) => assert_eq!(a, b),
                (Tlv::NeighborDeviceList(a), Tlv::NeighborDeviceList(b)) => assert_eq!(a, b),
                (Tlv::TransmitterLinkMetric(a), Tlv::TransmitterLinkMetric(b)) => assert_eq!(a, b),
                (Tlv::ReceiverLinkMetric(a), Tlv::ReceiverLinkMetric(b)) => assert_eq!(a, b),
                (Tlv::LinkMetricResultCode(a), Tlv::LinkMetricResultCode(b)) => assert_eq!(a, b),
                (a, b) => panic!("variant mismatch: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn length_overrun_is_malformed() {
        let mut w = ByteWriter::new();
        w.write_u8(TlvType::AlMacAddress.as_u8());
        w.write_u16(100);
        w.write_bytes(&[0u8; 4]);
        let mut r = ByteReader::new(w.as_slice());
        assert!(parse_tlv(&mut r).is_err());
    }
}
