pub mod asset_registry;
pub mod token_contract;

pub use asset_registry::pallet as pallet_mock_asset_registry;
pub use token_contract::pallet as pallet_mock_token_contract;
