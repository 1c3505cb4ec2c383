pub mod call_state_value;
pub mod cause_value;
pub mod coding_standard;
pub mod ie_id;
pub mod location;
pub mod message_type;

pub mod information_transfer_capability;
pub mod information_transfer_rate;
pub mod transfer_mode;
pub mod user_info_layer1;
pub mod user_info_layer2;
pub mod user_info_layer3;

pub mod numbering_plan;
pub mod presentation_indicator;
pub mod screening_indicator;
pub mod subaddress_type;
pub mod type_of_number;

pub mod notification_description;
pub mod progress_description;
pub mod restart_class;
pub mod signal_value;
