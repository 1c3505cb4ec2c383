//! Call control block: the primitives an application submits and the indications it receives.

use core::fmt;

use q931_ies::message::Ies;

use crate::Q931Lib;
use crate::call::{CallId, CallTimer};
use crate::chanset::Chanset;
use crate::error::Result;
use crate::transport::IntfId;

/// Request or response from the application to the stack
#[derive(Debug, Clone)]
pub enum Q931Primitive {
    SetupRequest { intf: IntfId, ies: Ies },
    MoreInfoRequest { call: CallId, ies: Ies },
    ProceedingRequest { call: CallId, ies: Ies },
    AlertingRequest { call: CallId, ies: Ies },
    SetupResponse { call: CallId, ies: Ies },
    SetupCompleteRequest { call: CallId, ies: Ies },
    DisconnectRequest { call: CallId, ies: Ies },
    ReleaseRequest { call: CallId, ies: Ies },
    RejectRequest { call: CallId, ies: Ies },
    InfoRequest { call: CallId, ies: Ies },
    NotifyRequest { call: CallId, ies: Ies },
    ProgressRequest { call: CallId, ies: Ies },
    FacilityRequest { call: CallId, ies: Ies },
    StatusEnquiryRequest { call: CallId, ies: Ies },
    SuspendRequest { call: CallId, ies: Ies },
    SuspendResponse { call: CallId, ies: Ies },
    SuspendRejectRequest { call: CallId, ies: Ies },
    ResumeRequest { intf: IntfId, ies: Ies },
    ResumeResponse { call: CallId, ies: Ies },
    ResumeRejectRequest { call: CallId, ies: Ies },
    RestartRequest { intf: IntfId, channels: Chanset },
    /// Channels of the peer's RESTART are free again
    RestartResponse { intf: IntfId },
}

/// Indication or confirmation from the stack to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Q931Indication {
    /// SETUP received; the call is in Call Present
    Setup { call: CallId, intf: IntfId, ies: Ies },
    /// SETUP ACKNOWLEDGE received, more digits wanted
    MoreInfo { call: CallId, ies: Ies },
    Proceeding { call: CallId, ies: Ies },
    Alerting { call: CallId, ies: Ies },
    /// CONNECT received on an outgoing call
    SetupConfirm { call: CallId, ies: Ies },
    /// CONNECT ACKNOWLEDGE received on an incoming call
    SetupComplete { call: CallId, ies: Ies },
    ConnectChannel { call: CallId, channel: u8 },
    DisconnectChannel { call: CallId, channel: u8 },
    Disconnect { call: CallId, ies: Ies },
    /// Peer released the call, or it was cleared locally. The call is gone.
    Release { call: CallId, ies: Ies },
    /// Release initiated here has completed. The call is gone.
    ReleaseConfirm { call: CallId, ies: Ies, timed_out: bool },
    /// Outgoing call refused before it was established. The call is gone.
    Reject { call: CallId, ies: Ies },
    Info { call: CallId, ies: Ies },
    Notify { call: CallId, ies: Ies },
    Progress { call: CallId, ies: Ies },
    Facility { call: CallId, ies: Ies },
    Status { call: CallId, ies: Ies },
    Timeout { call: CallId, timer: CallTimer },
    /// A received message was rejected with a STATUS or clearing message
    Error { call: CallId, cause: u8 },
    Suspend { call: CallId, ies: Ies },
    SuspendConfirm { call: CallId, ies: Ies, ok: bool },
    /// RESUME received for `suspended`; the new call is in Resume Request
    Resume { call: CallId, suspended: CallId, ies: Ies },
    ResumeConfirm { call: CallId, ies: Ies, ok: bool },
    ManagementRestartConfirm { intf: IntfId, channels: Chanset, ok: bool },
    /// Peer restarts `channels`. Their calls are already cleared; answer with `restart_response`.
    Restart { intf: IntfId, channels: Chanset },
    /// No `restart_response` within T317. The restart was acknowledged regardless.
    RestartTimeout { intf: IntfId, channels: Chanset },
}

impl Q931Indication {
    pub fn call(&self) -> Option<CallId> {
        use Q931Indication::*;
        match self {
            Setup { call, .. }
            | MoreInfo { call, .. }
            | Proceeding { call, .. }
            | Alerting { call, .. }
            | SetupConfirm { call, .. }
            | SetupComplete { call, .. }
            | ConnectChannel { call, .. }
            | DisconnectChannel { call, .. }
            | Disconnect { call, .. }
            | Release { call, .. }
            | ReleaseConfirm { call, .. }
            | Reject { call, .. }
            | Info { call, .. }
            | Notify { call, .. }
            | Progress { call, .. }
            | Facility { call, .. }
            | Status { call, .. }
            | Timeout { call, .. }
            | Error { call, .. }
            | Suspend { call, .. }
            | SuspendConfirm { call, .. }
            | Resume { call, .. }
            | ResumeConfirm { call, .. } => Some(*call),
            ManagementRestartConfirm { .. } | Restart { .. } | RestartTimeout { .. } => None,
        }
    }
}

impl fmt::Display for Q931Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Q931Indication::*;
        match self {
            Setup { call, ies, .. } => write!(f, "SetupIndication {} {}", call, ies),
            MoreInfo { call, .. } => write!(f, "MoreInfoIndication {}", call),
            Proceeding { call, .. } => write!(f, "ProceedingIndication {}", call),
            Alerting { call, .. } => write!(f, "AlertingIndication {}", call),
            SetupConfirm { call, .. } => write!(f, "SetupConfirm {}", call),
            SetupComplete { call, .. } => write!(f, "SetupCompleteIndication {}", call),
            ConnectChannel { call, channel } => write!(f, "ConnectChannel {} B{}", call, channel),
            DisconnectChannel { call, channel } => write!(f, "DisconnectChannel {} B{}", call, channel),
            Disconnect { call, ies } => write!(f, "DisconnectIndication {} {}", call, ies),
            Release { call, ies } => write!(f, "ReleaseIndication {} {}", call, ies),
            ReleaseConfirm { call, timed_out, .. } => write!(f, "ReleaseConfirm {} timed_out {}", call, timed_out),
            Reject { call, ies } => write!(f, "RejectIndication {} {}", call, ies),
            Info { call, ies } => write!(f, "InfoIndication {} {}", call, ies),
            Notify { call, ies } => write!(f, "NotifyIndication {} {}", call, ies),
            Progress { call, ies } => write!(f, "ProgressIndication {} {}", call, ies),
            Facility { call, .. } => write!(f, "FacilityIndication {}", call),
            Status { call, ies } => write!(f, "StatusIndication {} {}", call, ies),
            Timeout { call, timer } => write!(f, "TimeoutIndication {} {}", call, timer),
            Error { call, cause } => write!(f, "ErrorIndication {} cause {}", call, cause),
            Suspend { call, .. } => write!(f, "SuspendIndication {}", call),
            SuspendConfirm { call, ok, .. } => write!(f, "SuspendConfirm {} ok {}", call, ok),
            Resume { call, suspended, .. } => write!(f, "ResumeIndication {} for {}", call, suspended),
            ResumeConfirm { call, ok, .. } => write!(f, "ResumeConfirm {} ok {}", call, ok),
            ManagementRestartConfirm { intf, channels, ok } => {
                write!(f, "ManagementRestartConfirm intf {} {} ok {}", intf, channels, ok)
            }
            Restart { intf, channels } => write!(f, "RestartIndication intf {} {}", intf, channels),
            RestartTimeout { intf, channels } => write!(f, "RestartTimeout intf {} {}", intf, channels),
        }
    }
}

impl Q931Lib {
    /// Execute one primitive. Returns the new call for SetupRequest and ResumeRequest.
    pub fn dispatch(&mut self, prim: Q931Primitive) -> Result<Option<CallId>> {
        use Q931Primitive::*;
        tracing::trace!("dispatch {:?}", prim);
        match prim {
            SetupRequest { intf, ies } => self.setup_request(intf, ies).map(Some),
            ResumeRequest { intf, ies } => self.resume_request(intf, ies).map(Some),
            RestartRequest { intf, channels } => self.restart_request(intf, channels).map(|_| None),
            RestartResponse { intf } => self.restart_response(intf).map(|_| None),
            MoreInfoRequest { call, ies } => self.more_info_request(call, ies).map(|_| None),
            ProceedingRequest { call, ies } => self.proceeding_request(call, ies).map(|_| None),
            AlertingRequest { call, ies } => self.alerting_request(call, ies).map(|_| None),
            SetupResponse { call, ies } => self.setup_response(call, ies).map(|_| None),
            SetupCompleteRequest { call, ies } => self.setup_complete_request(call, ies).map(|_| None),
            DisconnectRequest { call, ies } => self.disconnect_request(call, ies).map(|_| None),
            ReleaseRequest { call, ies } => self.release_request(call, ies).map(|_| None),
            RejectRequest { call, ies } => self.reject_request(call, ies).map(|_| None),
            InfoRequest { call, ies } => self.info_request(call, ies).map(|_| None),
            NotifyRequest { call, ies } => self.notify_request(call, ies).map(|_| None),
            ProgressRequest { call, ies } => self.progress_request(call, ies).map(|_| None),
            FacilityRequest { call, ies } => self.facility_request(call, ies).map(|_| None),
            StatusEnquiryRequest { call, ies } => self.status_enquiry_request(call, ies).map(|_| None),
            SuspendRequest { call, ies } => self.suspend_request(call, ies).map(|_| None),
            SuspendResponse { call, ies } => self.suspend_response(call, ies).map(|_| None),
            SuspendRejectRequest { call, ies } => self.suspend_reject_request(call, ies).map(|_| None),
            ResumeResponse { call, ies } => self.resume_response(call, ies).map(|_| None),
            ResumeRejectRequest { call, ies } => self.resume_reject_request(call, ies).map(|_| None),
        }
    }
}
