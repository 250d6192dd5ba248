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

//! Calls into external token contracts.
//!
//! Contracts answer with raw 32 bytes words. Every answer is decoded here
//! into a typed value or rejected, the rest of the pallet never sees the
//! raw output.

use cfg_traits::lending::{TokenCall, TokenContract};
use frame_support::ensure;
use sp_core::U256;
use sp_runtime::{ArithmeticError, DispatchError, DispatchResult};

use crate::{Config, Error, LOG_TARGET};

const WORD_SIZE: usize = 32;

/// Decodes a big endian 256 bits unsigned integer.
/// The input must be exactly one word.
pub fn decode_uint256(output: &[u8]) -> Option<U256> {
	(output.len() == WORD_SIZE).then(|| U256::from_big_endian(output))
}

/// Decodes a boolean encoded as a 256 bits word with value `0` or `1`.
pub fn decode_bool(output: &[u8]) -> Option<bool> {
	let value = decode_uint256(output)?;
	if value.is_zero() {
		Some(false)
	} else if value == U256::one() {
		Some(true)
	} else {
		None
	}
}

/// Converts a balance into a token amount. Balances above `u128::MAX` are
/// rejected instead of clamped.
pub fn to_u256<B: TryInto<u128>>(amount: B) -> Result<U256, ArithmeticError> {
	amount
		.try_into()
		.map(U256::from)
		.map_err(|_| ArithmeticError::Overflow)
}

fn call_uint256<T: Config>(
	contract: &T::ContractId,
	caller: &T::AccountId,
	call: TokenCall<T::AccountId>,
) -> Result<U256, DispatchError> {
	let output = T::TokenContract::call(contract, caller, call)?;
	decode_uint256(&output).ok_or_else(|| malformed::<T>(&output))
}

fn malformed<T: Config>(output: &[u8]) -> DispatchError {
	log::warn!(
		target: LOG_TARGET,
		"Token contract answered with a malformed output: {:?}",
		output
	);

	Error::<T>::MalformedTokenResponse.into()
}

pub fn balance_of<T: Config>(
	contract: &T::ContractId,
	caller: &T::AccountId,
	owner: &T::AccountId,
) -> Result<U256, DispatchError> {
	call_uint256::<T>(
		contract,
		caller,
		TokenCall::BalanceOf {
			owner: owner.clone(),
		},
	)
}

pub fn allowance<T: Config>(
	contract: &T::ContractId,
	caller: &T::AccountId,
	owner: &T::AccountId,
	spender: &T::AccountId,
) -> Result<U256, DispatchError> {
	call_uint256::<T>(
		contract,
		caller,
		TokenCall::Allowance {
			owner: owner.clone(),
			spender: spender.clone(),
		},
	)
}

/// Moves `amount` from `from` to `to` using the allowance `from` gave to
/// `caller`. Fails unless the contract confirms the transfer.
pub fn transfer_from<T: Config>(
	contract: &T::ContractId,
	caller: &T::AccountId,
	from: &T::AccountId,
	to: &T::AccountId,
	amount: T::Balance,
) -> DispatchResult {
	let output = T::TokenContract::call(
		contract,
		caller,
		TokenCall::TransferFrom {
			from: from.clone(),
			to: to.clone(),
			amount: to_u256(amount)?,
		},
	)?;

	let done = decode_bool(&output).ok_or_else(|| malformed::<T>(&output))?;
	ensure!(done, Error::<T>::TokenTransferRejected);

	Ok(())
}
