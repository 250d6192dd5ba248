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

use frame_support::{ensure, pallet_prelude::*, RuntimeDebugNoBound};
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::{
	traits::{EnsureAdd, Zero},
	ArithmeticError,
};

use crate::{AuthorizationViolation, Config, Error, StateViolation, TimingViolation};

/// Unix time in seconds.
pub type Seconds = u64;

/// Lifecycle of a loan. Each operation is only legal in one status and the
/// status only moves forward.
#[derive(
	Encode,
	Decode,
	Clone,
	Copy,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Default,
	TypeInfo,
	RuntimeDebug,
	MaxEncodedLen,
)]
pub enum LendStatus {
	/// Created, nothing configured yet.
	#[default]
	#[codec(index = 0)]
	Uninitialized,

	/// Payment and collateral assets are fixed.
	#[codec(index = 1)]
	Configured,

	/// A lender committed the principal.
	#[codec(index = 2)]
	Funded,

	/// The collateral is in escrow and the principal was disbursed.
	#[codec(index = 3)]
	Lent,

	/// The payback is in escrow, waiting for the lender to claim it.
	#[codec(index = 4)]
	Repaid,

	/// Terminal. Nothing remains in custody.
	#[codec(index = 5)]
	Settled,
}

/// Settlement variant of a loan, fixed at configuration.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, MaxEncodedLen)]
pub enum LendType {
	/// Principal and payback are paid with the native currency.
	#[codec(index = 1)]
	AssetForNative,

	/// Principal and payback are paid with a fungible asset.
	#[codec(index = 2)]
	AssetForAsset,

	/// Principal and payback are moved by an external token contract
	/// directly between the parties.
	#[codec(index = 3)]
	AssetForExternalToken,
}

/// What the principal and the payback of a loan are paid with.
#[derive(Encode, Decode, Clone, PartialEq, Eq, TypeInfo, RuntimeDebugNoBound, MaxEncodedLen)]
#[scale_info(skip_type_params(T))]
pub enum PaymentAsset<T: Config> {
	/// Native currency held by the escrow
	Native,

	/// Fungible asset held by the escrow
	Asset(T::AssetId),

	/// Token moved by the contract straight between lender and borrower
	ExternalToken(T::ContractId),
}

impl<T: Config> PaymentAsset<T> {
	pub fn lend_type(&self) -> LendType {
		match self {
			Self::Native => LendType::AssetForNative,
			Self::Asset(_) => LendType::AssetForAsset,
			Self::ExternalToken(_) => LendType::AssetForExternalToken,
		}
	}

	/// Whether the escrow holds the principal and the payback.
	pub fn is_custodial(&self) -> bool {
		!matches!(self, Self::ExternalToken(_))
	}
}

/// State of a single loan.
#[derive(Encode, Decode, Clone, PartialEq, Eq, TypeInfo, RuntimeDebugNoBound, MaxEncodedLen)]
#[scale_info(skip_type_params(T))]
pub struct LendingRecord<T: Config> {
	/// Account that created the loan. Only it can configure it.
	pub creator: T::AccountId,

	/// Receives the payback or the collateral. It is the creator until the
	/// loan is funded.
	pub lender: T::AccountId,

	/// Set once the collateral is posted.
	pub borrower: Option<T::AccountId>,

	/// Set once the loan is configured.
	pub payment: Option<PaymentAsset<T>>,

	/// Unique asset used as collateral. Cleared once the escrow no longer
	/// holds a registration for it.
	pub collateral: Option<T::AssetId>,

	/// Principal
	pub amount: T::Balance,

	/// Amount the borrower must repay
	pub payback: T::Balance,

	/// Amount repaid
	pub paid: T::Balance,

	/// Current stage of the loan
	pub status: LendStatus,

	/// Start of the repayment window.
	pub date: Seconds,

	/// Length of the repayment window.
	pub time: Seconds,
}

impl<T: Config> LendingRecord<T> {
	pub fn new(creator: T::AccountId) -> Self {
		Self {
			lender: creator.clone(),
			creator,
			borrower: None,
			payment: None,
			collateral: None,
			amount: Zero::zero(),
			payback: Zero::zero(),
			paid: Zero::zero(),
			status: LendStatus::Uninitialized,
			date: 0,
			time: 0,
		}
	}

	pub fn lend_type(&self) -> Option<LendType> {
		self.payment.as_ref().map(PaymentAsset::lend_type)
	}

	pub fn payment(&self) -> Result<&PaymentAsset<T>, DispatchError> {
		self.payment
			.as_ref()
			.ok_or_else(|| Error::<T>::from(StateViolation::NotConfigured).into())
	}

	pub fn collateral(&self) -> Result<T::AssetId, DispatchError> {
		self.collateral
			.ok_or_else(|| Error::<T>::from(StateViolation::NotConfigured).into())
	}

	/// Last second the borrower can repay at.
	pub fn due_date(&self) -> Result<Seconds, ArithmeticError> {
		self.date.ensure_add(self.time)
	}

	pub fn ensure_status(&self, expected: LendStatus, violation: StateViolation) -> DispatchResult {
		ensure!(self.status == expected, Error::<T>::from(violation));
		Ok(())
	}

	pub fn ensure_creator(&self, who: &T::AccountId) -> DispatchResult {
		ensure!(
			&self.creator == who,
			Error::<T>::from(AuthorizationViolation::NotCreator)
		);
		Ok(())
	}

	pub fn ensure_lender(&self, who: &T::AccountId) -> DispatchResult {
		ensure!(
			&self.lender == who,
			Error::<T>::from(AuthorizationViolation::NotLender)
		);
		Ok(())
	}

	pub fn ensure_borrower(&self, who: &T::AccountId) -> DispatchResult {
		ensure!(
			self.borrower.as_ref() == Some(who),
			Error::<T>::from(AuthorizationViolation::NotBorrower)
		);
		Ok(())
	}

	pub fn ensure_repayment_window_open(&self, now: Seconds) -> DispatchResult {
		ensure!(
			now <= self.due_date()?,
			Error::<T>::from(TimingViolation::RepaymentWindowElapsed)
		);
		Ok(())
	}

	pub fn ensure_repayment_window_elapsed(&self, now: Seconds) -> DispatchResult {
		ensure!(
			now > self.due_date()?,
			Error::<T>::from(TimingViolation::RepaymentWindowOpen)
		);
		Ok(())
	}
}
