pub mod address;
pub mod amount;
pub mod types;

pub use address::{short_address, validate_address, AddressError};
pub use amount::{
    compute_share, format_minor_units, parse_contribution_amount, to_minor_units, AmountError,
};
pub use types::{ApiResponse, AssetConfig, Beneficiary, Campaign, Organization, TransferRecord};
