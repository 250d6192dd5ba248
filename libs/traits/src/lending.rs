// Copyright 2023 Centrifuge Foundation (centrifuge.io).
//
// This file is part of the Centrifuge chain project.
// Centrifuge is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version (see http://www.gnu.org/licenses).
// Centrifuge is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

use frame_support::{dispatch::DispatchResult, RuntimeDebug};
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_core::U256;
use sp_runtime::DispatchError;
use sp_std::vec::Vec;

/// Privileged accounts an asset was registered with.
#[derive(Encode, Decode, Clone, PartialEq, Eq, TypeInfo, RuntimeDebug, MaxEncodedLen)]
pub struct AssetAuthorities<AccountId> {
	/// Account that registered the asset. Residual balances are sent back
	/// here when a holder relinquishes the asset.
	pub registrant: AccountId,

	/// Account able to revoke balances from any holder.
	pub clawback: Option<AccountId>,

	/// Account able to freeze balances of any holder.
	pub freeze: Option<AccountId>,
}

/// Registry of fungible assets where accounts must hold a registration
/// before they can receive an asset.
pub trait AssetRegistry<AccountId> {
	type AssetId;

	/// Returns the authorities of an asset or `None` if the asset is not
	/// registered.
	fn authorities(asset: &Self::AssetId) -> Option<AssetAuthorities<AccountId>>;

	/// Registers `holder` as able to receive `asset`.
	fn opt_in(holder: &AccountId, asset: &Self::AssetId) -> DispatchResult;

	/// Removes the registration of `holder` for `asset`.
	/// The holder is expected to hold no balance of the asset anymore.
	fn opt_out(holder: &AccountId, asset: &Self::AssetId) -> DispatchResult;
}

/// Calls understood by an external token contract.
#[derive(Encode, Decode, Clone, PartialEq, Eq, TypeInfo, RuntimeDebug)]
pub enum TokenCall<AccountId> {
	/// Returns the balance of `owner` as a 256 bits big endian word.
	BalanceOf { owner: AccountId },

	/// Returns how much `spender` can move on behalf of `owner` as a 256
	/// bits big endian word.
	Allowance { owner: AccountId, spender: AccountId },

	/// Moves `amount` from `from` to `to` using the allowance given to the
	/// caller. Returns a boolean encoded as a 256 bits word.
	TransferFrom {
		from: AccountId,
		to: AccountId,
		amount: U256,
	},
}

/// A token ledger implemented by a contract the runtime can call into.
/// The output is the raw return data of the contract, decoding it is up to
/// the caller.
pub trait TokenContract<AccountId> {
	type ContractId;

	fn call(
		contract: &Self::ContractId,
		caller: &AccountId,
		call: TokenCall<AccountId>,
	) -> Result<Vec<u8>, DispatchError>;
}
