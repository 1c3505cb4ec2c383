use q931_ies::enums::call_state_value::CallStateValue;

use crate::transport::DlcId;

/// One terminal's leg of a broadcast SETUP on a multipoint interface
#[derive(Debug, Clone)]
pub struct Ces {
    pub tei: u8,
    pub dlc: DlcId,
    pub state: CallStateValue,
    pub(crate) t308_expired: bool,
}

impl Ces {
    pub fn new(tei: u8, dlc: DlcId) -> Self {
        Ces { tei, dlc, state: CallStateValue::Null, t308_expired: false }
    }

    pub fn set_state(&mut self, state: CallStateValue) {
        if self.state != state {
            tracing::trace!(tei = self.tei, "CES {} -> {}", self.state, state);
            self.state = state;
        }
    }

    /// Still a candidate for selection
    pub fn is_responding(&self) -> bool {
        matches!(
            self.state,
            CallStateValue::OverlapSending
                | CallStateValue::OutgoingCallProceeding
                | CallStateValue::CallDelivered
                | CallStateValue::ConnectRequest
        )
    }

    /// Progress of the leg towards answer
    pub fn rank(&self) -> u8 {
        state_rank(self.state)
    }
}

/// Ordering of outgoing call states by progress towards answer
pub(crate) fn state_rank(state: CallStateValue) -> u8 {
    match state {
        CallStateValue::OverlapSending => 1,
        CallStateValue::OutgoingCallProceeding => 2,
        CallStateValue::CallDelivered => 3,
        CallStateValue::ConnectRequest => 4,
        _ => 0,
    }
}
