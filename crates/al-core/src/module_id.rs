/// Identifies one of the message-handler modules registered with the
/// dispatcher (top-level spec §4.4, §5). Playing the role the reference
/// workspace's per-protocol-layer entity enum plays, but keyed to the 1905
/// CMDU handler groups instead of TETRA's MAC/LLC/MLE/MM/CMCE layering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// TopologyDiscovery / TopologyNotification / TopologyQuery / TopologyResponse.
    Topology,
    /// LinkMetricQuery / LinkMetricResponse.
    LinkMetric,
    /// APAutoconfigurationSearch/Response/WSC/Renew — the WSC M1/M2 enrolment state machine.
    Autoconfig,
    /// PushButtonEventNotification / PushButtonJoinNotification.
    PushButton,
    /// HigherLayerQuery / HigherLayerResponse.
    HigherLayer,
    /// ALME-SAP request/response handling.
    Alme,
    /// Registered vendor-specific (OUI-keyed) CMDU handlers.
    VendorSpecific,
    /// ALME forwarding-rule bookkeeping (classification-set table; §C of SPEC_FULL).
    Forwarding,
}
