pub mod ia5;
pub mod layer_info;
pub mod network_id;
pub mod party_number;
pub mod subaddress;
