use std::time::Duration;

use frame_support::{assert_noop, assert_ok, traits::tokens::fungibles::Inspect};
use sp_core::U256;
use sp_runtime::ArithmeticError;

use super::{
	pallet::{
		AuthorizationViolation, Error, Event, LastLoanId, Loans, PolicyViolation, StateViolation,
		TimingViolation, ValueMismatch,
	},
	types::{LendStatus, LendType, LendingRecord, PaymentAsset, Seconds},
};

const AMOUNT: Balance = 3_000_000;
const PAYBACK: Balance = 6_000_000;
const TIME: Seconds = 86_400;

use mock::*;

mod fund_loan;
mod lend_loan;
mod util;
