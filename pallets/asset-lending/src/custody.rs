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

//! Value movements in and out of the escrow of a loan.
//!
//! Incoming value is always measured: the escrow balance is read before and
//! after the transfer and the difference is what the caller delivered.

use cfg_traits::lending::AssetRegistry;
use frame_support::{
	ensure,
	traits::{
		tokens::{
			fungible::{Inspect as _, Mutate as _},
			fungibles::{Inspect as _, Mutate as _},
			Fortitude, Preservation,
		},
		Get,
	},
};
use sp_runtime::{
	traits::{EnsureAdd, EnsureSub, One, Zero},
	DispatchError, DispatchResult,
};

use crate::{
	token,
	types::PaymentAsset,
	Config, Error, PolicyViolation, StateViolation, ValueMismatch,
};

/// What the escrow got when the principal was committed.
pub enum Receipt<Balance> {
	/// Measured amount now held by the escrow.
	Custodied(Balance),

	/// Nothing moved. The lender authorized the escrow to move the
	/// principal later.
	Authorized,
}

/// Where the payback ended once the borrower repaid.
pub enum Settlement {
	/// Held by the escrow until the lender claims it.
	Escrowed,

	/// Already owned by the lender.
	Delivered,
}

impl<T: Config> PaymentAsset<T> {
	/// Registrations the escrow needs before it can hold the payment asset.
	pub fn register(&self, escrow: &T::AccountId) -> DispatchResult {
		match self {
			Self::Asset(asset) => register_asset::<T>(escrow, *asset),
			Self::Native | Self::ExternalToken(_) => Ok(()),
		}
	}

	/// Checks the economic terms of a loan against the margins required
	/// for this payment asset.
	pub fn validate_terms(&self, amount: T::Balance, payback: T::Balance) -> DispatchResult {
		match self {
			Self::Native | Self::Asset(_) => {
				ensure!(
					amount > T::MinPrincipal::get(),
					Error::<T>::from(PolicyViolation::PrincipalTooLow)
				);
				ensure!(
					payback > amount.ensure_add(T::MinPremium::get())?,
					Error::<T>::from(PolicyViolation::InsufficientPremium)
				);
			}
			Self::ExternalToken(_) => {
				ensure!(
					payback > amount,
					Error::<T>::from(PolicyViolation::InsufficientPremium)
				);
			}
		}

		Ok(())
	}

	/// Commits the principal of `lender`.
	pub fn take_payment(
		&self,
		escrow: &T::AccountId,
		lender: &T::AccountId,
		amount: T::Balance,
	) -> Result<Receipt<T::Balance>, DispatchError> {
		match self {
			Self::ExternalToken(contract) => {
				let amount = token::to_u256(amount)?;

				ensure!(
					token::balance_of::<T>(contract, escrow, lender)? >= amount,
					Error::<T>::from(ValueMismatch::InsufficientBalance)
				);
				ensure!(
					token::allowance::<T>(contract, escrow, lender, escrow)? >= amount,
					Error::<T>::from(ValueMismatch::InsufficientAllowance)
				);

				Ok(Receipt::Authorized)
			}
			Self::Native | Self::Asset(_) => self.pull(escrow, lender, amount).map(Receipt::Custodied),
		}
	}

	/// Hands the principal to the borrower.
	pub fn disburse(
		&self,
		escrow: &T::AccountId,
		lender: &T::AccountId,
		borrower: &T::AccountId,
		amount: T::Balance,
	) -> DispatchResult {
		match self {
			Self::ExternalToken(contract) => {
				token::transfer_from::<T>(contract, escrow, lender, borrower, amount)
			}
			Self::Native | Self::Asset(_) => self.push(escrow, borrower, amount),
		}
	}

	/// Collects the payback of `borrower`.
	pub fn take_payback(
		&self,
		escrow: &T::AccountId,
		borrower: &T::AccountId,
		lender: &T::AccountId,
		payback: T::Balance,
	) -> Result<Settlement, DispatchError> {
		match self {
			Self::ExternalToken(contract) => {
				token::transfer_from::<T>(contract, escrow, borrower, lender, payback)?;
				Ok(Settlement::Delivered)
			}
			Self::Native | Self::Asset(_) => {
				let received = self.pull(escrow, borrower, payback)?;
				ensure!(
					received == payback,
					Error::<T>::from(ValueMismatch::PaymentAmount)
				);
				Ok(Settlement::Escrowed)
			}
		}
	}

	/// Sends value held by the escrow to `to` and drops the escrow
	/// registration for the payment asset.
	pub fn release_payment(
		&self,
		escrow: &T::AccountId,
		to: &T::AccountId,
		amount: T::Balance,
	) -> DispatchResult {
		self.push(escrow, to, amount)?;
		self.release_residual(escrow)
	}

	/// Drops the escrow registration for the payment asset, if any.
	pub fn release_residual(&self, escrow: &T::AccountId) -> DispatchResult {
		match self {
			Self::Asset(asset) => close_out_asset::<T>(escrow, *asset),
			Self::Native | Self::ExternalToken(_) => Ok(()),
		}
	}

	fn balance(&self, who: &T::AccountId) -> Result<T::Balance, DispatchError> {
		match self {
			Self::Native => Ok(T::NativeCurrency::balance(who)),
			Self::Asset(asset) => Ok(T::Tokens::balance(*asset, who)),
			Self::ExternalToken(_) => Err(Error::<T>::from(StateViolation::NotCustodial).into()),
		}
	}

	fn spendable(&self, who: &T::AccountId) -> Result<T::Balance, DispatchError> {
		match self {
			Self::Native => Ok(T::NativeCurrency::reducible_balance(
				who,
				Preservation::Expendable,
				Fortitude::Polite,
			)),
			Self::Asset(asset) => Ok(T::Tokens::reducible_balance(
				*asset,
				who,
				Preservation::Expendable,
				Fortitude::Polite,
			)),
			Self::ExternalToken(_) => Err(Error::<T>::from(StateViolation::NotCustodial).into()),
		}
	}

	fn push(&self, from: &T::AccountId, to: &T::AccountId, amount: T::Balance) -> DispatchResult {
		match self {
			Self::Native => {
				T::NativeCurrency::transfer(from, to, amount, Preservation::Expendable)?;
			}
			Self::Asset(asset) => {
				T::Tokens::transfer(*asset, from, to, amount, Preservation::Expendable)?;
			}
			Self::ExternalToken(_) => {
				return Err(Error::<T>::from(StateViolation::NotCustodial).into())
			}
		}

		Ok(())
	}

	/// Moves `amount` from `from` into the escrow and returns what the
	/// escrow actually received.
	fn pull(
		&self,
		escrow: &T::AccountId,
		from: &T::AccountId,
		amount: T::Balance,
	) -> Result<T::Balance, DispatchError> {
		ensure!(
			self.spendable(from)? >= amount,
			Error::<T>::from(ValueMismatch::InsufficientBalance)
		);

		let before = self.balance(escrow)?;
		self.push(from, escrow, amount)?;

		Ok(self.balance(escrow)?.ensure_sub(before)?)
	}
}

/// Checks an asset can be held without a third party being able to revoke
/// or freeze it, and registers the escrow as holder.
pub fn register_asset<T: Config>(escrow: &T::AccountId, asset: T::AssetId) -> DispatchResult {
	let authorities = T::AssetRegistry::authorities(&asset).ok_or(Error::<T>::AssetNotFound)?;

	ensure!(
		authorities.clawback.is_none(),
		Error::<T>::from(PolicyViolation::ClawbackAuthority)
	);
	ensure!(
		authorities.freeze.is_none(),
		Error::<T>::from(PolicyViolation::FreezeAuthority)
	);

	T::AssetRegistry::opt_in(escrow, &asset)
}

/// Sends any residual balance of `asset` to its registrant and drops the
/// escrow registration.
pub fn close_out_asset<T: Config>(escrow: &T::AccountId, asset: T::AssetId) -> DispatchResult {
	let registrant = T::AssetRegistry::authorities(&asset)
		.ok_or(Error::<T>::AssetNotFound)?
		.registrant;

	let residual = T::Tokens::balance(asset, escrow);
	if !residual.is_zero() {
		T::Tokens::transfer(asset, escrow, &registrant, residual, Preservation::Expendable)?;
	}

	T::AssetRegistry::opt_out(escrow, &asset)
}

/// Moves the single unit of the collateral from `from` into the escrow.
pub fn take_collateral<T: Config>(
	escrow: &T::AccountId,
	from: &T::AccountId,
	asset: T::AssetId,
) -> DispatchResult {
	let unit = T::Balance::one();

	ensure!(
		T::Tokens::reducible_balance(asset, from, Preservation::Expendable, Fortitude::Polite)
			>= unit,
		Error::<T>::from(ValueMismatch::InsufficientBalance)
	);

	let before = T::Tokens::balance(asset, escrow);
	T::Tokens::transfer(asset, from, escrow, unit, Preservation::Expendable)?;
	let received = T::Tokens::balance(asset, escrow).ensure_sub(before)?;

	ensure!(
		received == unit,
		Error::<T>::from(ValueMismatch::CollateralQuantity)
	);

	Ok(())
}

/// Gives the collateral held by the escrow to `to` and relinquishes it.
pub fn release_collateral<T: Config>(
	escrow: &T::AccountId,
	to: &T::AccountId,
	asset: T::AssetId,
) -> DispatchResult {
	T::Tokens::transfer(asset, escrow, to, T::Balance::one(), Preservation::Expendable)?;
	close_out_asset::<T>(escrow, asset)
}
