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

//! # Asset Lending Pallet
//!
//! Peer to peer loans where a borrower posts a unique asset as collateral
//! and receives a principal from a lender. The borrower gets the collateral
//! back by repaying before the deadline. Otherwise the lender can claim it.
//!
//! Each loan lives in its own slot with its own escrow account derived from
//! the pallet id and the loan id. A loan moves through
//! `Uninitialized -> Configured -> Funded -> Lent -> Repaid -> Settled` and
//! every call is only valid in one of those states.
//!
//! The principal and the payback can be paid with:
//! - the native currency, held by the escrow.
//! - a fungible asset, held by the escrow.
//! - an external token contract. The escrow never holds it, the contract
//!   moves it between the parties using the allowance of the payer.
//!
//! ## Overview
//! | Call         | Caller   | From status              | To status       |
//! |--------------|----------|--------------------------|-----------------|
//! | `create`     | anyone   | -                        | Uninitialized   |
//! | `setup`      | creator  | Uninitialized            | Configured      |
//! | `fund`       | anyone   | Configured               | Funded          |
//! | `lend_nft`   | anyone   | Funded                   | Lent            |
//! | `pay_debt`   | borrower | Lent                     | Repaid/Settled  |
//! | `claim_nft`  | lender   | Lent (after deadline)    | Settled         |
//! | `claim_debt` | lender   | Repaid                   | Settled         |
//! | `opt_out`    | lender   | Uninitialized..=Funded   | Settled         |
//! | `close`      | lender   | Uninitialized or Settled | removed         |

#![cfg_attr(not(feature = "std"), no_std)]

pub mod custody;
pub mod token;
pub mod types;
pub mod weights;

#[cfg(test)]
mod tests;

pub use pallet::*;
pub use weights::WeightInfo;

pub(crate) const LOG_TARGET: &str = "runtime::asset-lending";

#[frame_support::pallet]
pub mod pallet {
	use cfg_traits::lending::{AssetRegistry, TokenContract};
	use frame_support::{
		pallet_prelude::*,
		traits::{
			tokens::{
				self,
				fungible::{self, Inspect as _, Mutate as _},
				fungibles, Fortitude, Preservation,
			},
			UnixTime,
		},
		PalletError, PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::traits::{AccountIdConversion, EnsureAdd, One, Zero};

	use super::*;
	use crate::{
		custody::{Receipt, Settlement},
		types::{LendStatus, LendType, LendingRecord, PaymentAsset, Seconds},
	};

	const STORAGE_VERSION: StorageVersion = StorageVersion::new(0);

	#[pallet::pallet]
	#[pallet::storage_version(STORAGE_VERSION)]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Balance type of the native currency and the fungible assets.
		/// Amounts sent to token contracts must fit in a `u128`.
		type Balance: tokens::Balance;

		/// Identify a fungible asset. Collaterals are assets with a single
		/// unit in existence.
		type AssetId: Parameter + Member + Copy + MaxEncodedLen;

		/// Identify an external token contract
		type ContractId: Parameter + Member + Copy + MaxEncodedLen;

		/// Identify a loan in the pallet
		type LoanId: Parameter
			+ Member
			+ MaxEncodedLen
			+ TypeInfo
			+ Copy
			+ Default
			+ EnsureAdd
			+ One;

		/// Native currency used by loans paid with it
		type NativeCurrency: fungible::Mutate<Self::AccountId, Balance = Self::Balance>;

		/// Fungible assets used as collateral or as payment
		type Tokens: fungibles::Mutate<Self::AccountId, AssetId = Self::AssetId, Balance = Self::Balance>;

		/// Registrations needed to hold an asset
		type AssetRegistry: AssetRegistry<Self::AccountId, AssetId = Self::AssetId>;

		/// External token contracts used by loans paid with them
		type TokenContract: TokenContract<Self::AccountId, ContractId = Self::ContractId>;

		/// Fetching method for the time of the current block
		type Time: UnixTime;

		/// Used to derive the escrow account of each loan
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Loans held by the escrow must lend strictly more than this
		#[pallet::constant]
		type MinPrincipal: Get<Self::Balance>;

		/// Loans held by the escrow must pay back strictly more than the
		/// principal plus this
		#[pallet::constant]
		type MinPremium: Get<Self::Balance>;

		/// Information of runtime weights
		type WeightInfo: WeightInfo;
	}

	/// Contains the last loan id generated
	#[pallet::storage]
	pub(crate) type LastLoanId<T: Config> = StorageValue<_, T::LoanId, ValueQuery>;

	/// Every loan not yet closed
	#[pallet::storage]
	#[pallet::getter(fn loan)]
	pub type Loans<T: Config> =
		StorageMap<_, Blake2_128Concat, T::LoanId, LendingRecord<T>, OptionQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// A loan slot was created
		Created {
			loan_id: T::LoanId,
			creator: T::AccountId,
		},
		/// The assets of a loan were fixed
		Configured {
			loan_id: T::LoanId,
			lend_type: LendType,
			payment: PaymentAsset<T>,
			collateral: T::AssetId,
		},
		/// A lender committed the principal
		Funded {
			loan_id: T::LoanId,
			lender: T::AccountId,
			amount: T::Balance,
			payback: T::Balance,
			time: Seconds,
		},
		/// The collateral was posted and the principal disbursed
		Lent {
			loan_id: T::LoanId,
			borrower: T::AccountId,
			amount: T::Balance,
			date: Seconds,
		},
		/// The borrower repaid and got the collateral back
		DebtPaid {
			loan_id: T::LoanId,
			borrower: T::AccountId,
			paid: T::Balance,
		},
		/// The lender took the collateral of an overdue loan
		CollateralClaimed {
			loan_id: T::LoanId,
			lender: T::AccountId,
			collateral: T::AssetId,
		},
		/// The lender took the payback
		DebtClaimed {
			loan_id: T::LoanId,
			lender: T::AccountId,
			amount: T::Balance,
		},
		/// The loan was cancelled before any collateral was posted
		OptedOut { loan_id: T::LoanId },
		/// The loan was removed
		Closed {
			loan_id: T::LoanId,
			residual: T::Balance,
		},
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Emits when the loan doesn't exist
		LoanNotFound,
		/// Emits when an asset is not registered
		AssetNotFound,
		/// Emits when a token contract answers with an unexpected output
		MalformedTokenResponse,
		/// Emits when a token contract refuses a transfer
		TokenTransferRejected,
		/// Emits when the loan is not in the right state for the call
		StateViolation(StateViolation),
		/// Emits when the caller is not allowed to perform the call
		AuthorizationViolation(AuthorizationViolation),
		/// Emits when the value provided doesn't match the expected one
		ValueMismatch(ValueMismatch),
		/// Emits when the loan terms or its assets are not accepted
		PolicyViolation(PolicyViolation),
		/// Emits when the call is done outside of its time window
		TimingViolation(TimingViolation),
	}

	/// Error related to the loan status
	#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, PalletError)]
	pub enum StateViolation {
		/// Emits when the loan was already configured
		NotUninitialized,
		/// Emits when the loan is not configured or was already funded
		NotConfigured,
		/// Emits when the loan is not funded or the collateral was already
		/// posted
		NotFunded,
		/// Emits when the collateral is not in escrow
		NotLent,
		/// Emits when the loan was not repaid
		NotRepaid,
		/// Emits when there is nothing to claim
		NothingPaid,
		/// Emits when opting out once the collateral was posted
		CollateralPosted,
		/// Emits when closing while the escrow still holds the collateral
		/// registration
		CollateralHeld,
		/// Emits when closing a loan that is still running
		NotSettled,
		/// Emits when the escrow is asked to move value it never holds
		NotCustodial,
	}

	impl<T> From<StateViolation> for Error<T> {
		fn from(error: StateViolation) -> Self {
			Error::<T>::StateViolation(error)
		}
	}

	/// Error related to the caller identity
	#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, PalletError)]
	pub enum AuthorizationViolation {
		/// Emits when the caller didn't create the loan
		NotCreator,
		/// Emits when the caller is not the lender
		NotLender,
		/// Emits when the caller is not the borrower
		NotBorrower,
	}

	impl<T> From<AuthorizationViolation> for Error<T> {
		fn from(error: AuthorizationViolation) -> Self {
			Error::<T>::AuthorizationViolation(error)
		}
	}

	/// Error related to the value or the asset provided
	#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, PalletError)]
	pub enum ValueMismatch {
		/// Emits when the amount paid is not the expected one
		PaymentAmount,
		/// Emits when the asset posted is not the collateral of the loan
		CollateralAsset,
		/// Emits when the collateral posted is not exactly one unit
		CollateralQuantity,
		/// Emits when the payer doesn't own enough
		InsufficientBalance,
		/// Emits when the escrow is not allowed to move enough on behalf of
		/// the payer
		InsufficientAllowance,
	}

	impl<T> From<ValueMismatch> for Error<T> {
		fn from(error: ValueMismatch) -> Self {
			Error::<T>::ValueMismatch(error)
		}
	}

	/// Error related to the loan terms and its assets
	#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, PalletError)]
	pub enum PolicyViolation {
		/// Emits when the principal is below the minimum
		PrincipalTooLow,
		/// Emits when the payback doesn't exceed the principal enough
		InsufficientPremium,
		/// Emits when the repayment window is empty
		ZeroDuration,
		/// Emits when an asset can be revoked from its holders
		ClawbackAuthority,
		/// Emits when an asset can be frozen
		FreezeAuthority,
		/// Emits when the payment asset is the collateral
		SameAsset,
	}

	impl<T> From<PolicyViolation> for Error<T> {
		fn from(error: PolicyViolation) -> Self {
			Error::<T>::PolicyViolation(error)
		}
	}

	/// Error related to the repayment window
	#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, TypeInfo, RuntimeDebug, PalletError)]
	pub enum TimingViolation {
		/// Emits when claiming the collateral before the deadline
		RepaymentWindowOpen,
		/// Emits when repaying after the deadline
		RepaymentWindowElapsed,
	}

	impl<T> From<TimingViolation> for Error<T> {
		fn from(error: TimingViolation) -> Self {
			Error::<T>::TimingViolation(error)
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Creates an empty loan owned by the caller, who stays its lender
		/// until someone funds it.
		#[pallet::weight(T::WeightInfo::create())]
		#[pallet::call_index(0)]
		pub fn create(origin: OriginFor<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;

			let loan_id = Self::generate_loan_id()?;
			Loans::<T>::insert(loan_id, LendingRecord::new(who.clone()));

			log::debug!(target: LOG_TARGET, "Loan {:?} created by {:?}", loan_id, who);

			Self::deposit_event(Event::<T>::Created {
				loan_id,
				creator: who,
			});

			Ok(())
		}

		/// Fixes what the loan is paid with and which asset is accepted as
		/// collateral. The escrow registers as holder of both.
		#[pallet::weight(T::WeightInfo::setup())]
		#[pallet::call_index(1)]
		pub fn setup(
			origin: OriginFor<T>,
			loan_id: T::LoanId,
			payment: PaymentAsset<T>,
			collateral: T::AssetId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);

			Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Uninitialized, StateViolation::NotUninitialized)?;
				loan.ensure_creator(&who)?;

				if let PaymentAsset::Asset(asset) = &payment {
					ensure!(
						*asset != collateral,
						Error::<T>::from(PolicyViolation::SameAsset)
					);
				}

				custody::register_asset::<T>(&escrow, collateral)?;
				payment.register(&escrow)?;

				loan.payment = Some(payment.clone());
				loan.collateral = Some(collateral);
				loan.status = LendStatus::Configured;

				Ok(())
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Loan {:?} configured with {:?} against {:?}",
				loan_id,
				payment,
				collateral
			);

			Self::deposit_event(Event::<T>::Configured {
				loan_id,
				lend_type: payment.lend_type(),
				payment,
				collateral,
			});

			Ok(())
		}

		/// Commits `amount` as principal, repaid with `payback` within
		/// `time` seconds from the moment the collateral is posted.
		/// The caller becomes the lender.
		#[pallet::weight(T::WeightInfo::fund())]
		#[pallet::call_index(2)]
		pub fn fund(
			origin: OriginFor<T>,
			loan_id: T::LoanId,
			amount: T::Balance,
			payback: T::Balance,
			time: Seconds,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);

			Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Configured, StateViolation::NotConfigured)?;
				ensure!(time > 0, Error::<T>::from(PolicyViolation::ZeroDuration));
				Self::now().ensure_add(time)?;

				let payment = loan.payment()?;
				payment.validate_terms(amount, payback)?;

				match payment.take_payment(&escrow, &who, amount)? {
					Receipt::Custodied(received) => ensure!(
						received == amount,
						Error::<T>::from(ValueMismatch::PaymentAmount)
					),
					Receipt::Authorized => (),
				}

				loan.lender = who.clone();
				loan.amount = amount;
				loan.payback = payback;
				loan.time = time;
				loan.status = LendStatus::Funded;

				Ok(())
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Loan {:?} funded by {:?} with {:?}",
				loan_id,
				who,
				amount
			);

			Self::deposit_event(Event::<T>::Funded {
				loan_id,
				lender: who,
				amount,
				payback,
				time,
			});

			Ok(())
		}

		/// Posts `quantity` of `asset` as collateral and receives the
		/// principal. The caller becomes the borrower and the repayment
		/// window starts.
		#[pallet::weight(T::WeightInfo::lend_nft())]
		#[pallet::call_index(3)]
		pub fn lend_nft(
			origin: OriginFor<T>,
			loan_id: T::LoanId,
			asset: T::AssetId,
			quantity: T::Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);
			let now = Self::now();

			let amount = Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Funded, StateViolation::NotFunded)?;
				ensure!(
					asset == loan.collateral()?,
					Error::<T>::from(ValueMismatch::CollateralAsset)
				);
				ensure!(
					quantity == T::Balance::one(),
					Error::<T>::from(ValueMismatch::CollateralQuantity)
				);

				// Deadline must fit in `Seconds`
				now.ensure_add(loan.time)?;

				custody::take_collateral::<T>(&escrow, &who, asset)?;
				loan.payment()?
					.disburse(&escrow, &loan.lender, &who, loan.amount)?;

				loan.borrower = Some(who.clone());
				loan.date = now;
				loan.status = LendStatus::Lent;

				Ok(loan.amount)
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Loan {:?} lent to {:?} until {:?}",
				loan_id,
				who,
				now
			);

			Self::deposit_event(Event::<T>::Lent {
				loan_id,
				borrower: who,
				amount,
				date: now,
			});

			Ok(())
		}

		/// Repays the loan with exactly `amount` and gets the collateral
		/// back. Only possible until the end of the repayment window.
		#[pallet::weight(T::WeightInfo::pay_debt())]
		#[pallet::call_index(4)]
		pub fn pay_debt(
			origin: OriginFor<T>,
			loan_id: T::LoanId,
			amount: T::Balance,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);
			let now = Self::now();

			Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Lent, StateViolation::NotLent)?;
				loan.ensure_borrower(&who)?;
				loan.ensure_repayment_window_open(now)?;
				ensure!(
					amount == loan.payback,
					Error::<T>::from(ValueMismatch::PaymentAmount)
				);

				let settlement =
					loan.payment()?
						.take_payback(&escrow, &who, &loan.lender, amount)?;
				custody::release_collateral::<T>(&escrow, &who, loan.collateral()?)?;

				loan.collateral = None;
				loan.paid = amount;
				loan.status = match settlement {
					Settlement::Escrowed => LendStatus::Repaid,
					Settlement::Delivered => LendStatus::Settled,
				};

				Ok(())
			})?;

			log::debug!(target: LOG_TARGET, "Loan {:?} repaid by {:?}", loan_id, who);

			Self::deposit_event(Event::<T>::DebtPaid {
				loan_id,
				borrower: who,
				paid: amount,
			});

			Ok(())
		}

		/// Takes the collateral of a loan not repaid in time.
		#[pallet::weight(T::WeightInfo::claim_nft())]
		#[pallet::call_index(5)]
		pub fn claim_nft(origin: OriginFor<T>, loan_id: T::LoanId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);
			let now = Self::now();

			let collateral = Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Lent, StateViolation::NotLent)?;
				loan.ensure_lender(&who)?;
				loan.ensure_repayment_window_elapsed(now)?;

				let collateral = loan.collateral()?;
				custody::release_collateral::<T>(&escrow, &who, collateral)?;
				loan.payment()?.release_residual(&escrow)?;

				loan.collateral = None;
				loan.status = LendStatus::Settled;

				Ok(collateral)
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Loan {:?} defaulted, collateral claimed by {:?}",
				loan_id,
				who
			);

			Self::deposit_event(Event::<T>::CollateralClaimed {
				loan_id,
				lender: who,
				collateral,
			});

			Ok(())
		}

		/// Takes the payback held by the escrow.
		#[pallet::weight(T::WeightInfo::claim_debt())]
		#[pallet::call_index(6)]
		pub fn claim_debt(origin: OriginFor<T>, loan_id: T::LoanId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);

			let amount = Self::mutate_loan(loan_id, |loan| {
				loan.ensure_status(LendStatus::Repaid, StateViolation::NotRepaid)?;
				ensure!(
					!loan.paid.is_zero(),
					Error::<T>::from(StateViolation::NothingPaid)
				);
				loan.ensure_lender(&who)?;

				loan.payment()?.release_payment(&escrow, &who, loan.paid)?;
				loan.status = LendStatus::Settled;

				Ok(loan.paid)
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Loan {:?} payback of {:?} claimed by {:?}",
				loan_id,
				amount,
				who
			);

			Self::deposit_event(Event::<T>::DebtClaimed {
				loan_id,
				lender: who,
				amount,
			});

			Ok(())
		}

		/// Cancels a loan before the collateral is posted. A committed
		/// principal held by the escrow goes back to the lender.
		#[pallet::weight(T::WeightInfo::opt_out())]
		#[pallet::call_index(7)]
		pub fn opt_out(origin: OriginFor<T>, loan_id: T::LoanId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);

			Self::mutate_loan(loan_id, |loan| {
				ensure!(
					loan.status <= LendStatus::Funded,
					Error::<T>::from(StateViolation::CollateralPosted)
				);
				loan.ensure_lender(&who)?;

				if let Some(payment) = &loan.payment {
					if loan.status == LendStatus::Funded && payment.is_custodial() {
						payment.release_payment(&escrow, &loan.lender, loan.amount)?;
					} else {
						payment.release_residual(&escrow)?;
					}
				}

				if let Some(collateral) = loan.collateral.take() {
					custody::close_out_asset::<T>(&escrow, collateral)?;
				}

				loan.status = LendStatus::Settled;

				Ok(())
			})?;

			log::debug!(target: LOG_TARGET, "Loan {:?} cancelled by {:?}", loan_id, who);

			Self::deposit_event(Event::<T>::OptedOut { loan_id });

			Ok(())
		}

		/// Removes a finished loan. Whatever native currency is left in the
		/// escrow goes to the lender.
		#[pallet::weight(T::WeightInfo::close())]
		#[pallet::call_index(8)]
		pub fn close(origin: OriginFor<T>, loan_id: T::LoanId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			let escrow = Self::escrow_account(loan_id);

			let loan = Loans::<T>::get(loan_id).ok_or(Error::<T>::LoanNotFound)?;
			ensure!(
				loan.collateral.is_none(),
				Error::<T>::from(StateViolation::CollateralHeld)
			);
			ensure!(
				matches!(loan.status, LendStatus::Uninitialized | LendStatus::Settled),
				Error::<T>::from(StateViolation::NotSettled)
			);
			loan.ensure_lender(&who)?;

			let residual = T::NativeCurrency::reducible_balance(
				&escrow,
				Preservation::Expendable,
				Fortitude::Polite,
			);
			if !residual.is_zero() {
				T::NativeCurrency::transfer(&escrow, &who, residual, Preservation::Expendable)?;
			}

			Loans::<T>::remove(loan_id);

			log::debug!(target: LOG_TARGET, "Loan {:?} closed", loan_id);

			Self::deposit_event(Event::<T>::Closed { loan_id, residual });

			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Account holding the value in custody of a loan.
		pub fn escrow_account(loan_id: T::LoanId) -> T::AccountId {
			T::PalletId::get().into_sub_account_truncating(loan_id)
		}

		fn now() -> Seconds {
			T::Time::now().as_secs()
		}

		fn generate_loan_id() -> Result<T::LoanId, DispatchError> {
			LastLoanId::<T>::try_mutate(|last_loan_id| {
				*last_loan_id = last_loan_id.ensure_add(T::LoanId::one())?;
				Ok(*last_loan_id)
			})
		}

		fn mutate_loan<F, R>(loan_id: T::LoanId, f: F) -> Result<R, DispatchError>
		where
			F: FnOnce(&mut LendingRecord<T>) -> Result<R, DispatchError>,
		{
			Loans::<T>::try_mutate(loan_id, |loan| {
				f(loan.as_mut().ok_or(Error::<T>::LoanNotFound)?)
			})
		}
	}
}
