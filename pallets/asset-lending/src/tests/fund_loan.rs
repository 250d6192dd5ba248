use super::*;

#[test]
fn with_wrong_loan_id() {
	new_test_ext().execute_with(|| {
		assert_noop!(
			AssetLending::fund(RuntimeOrigin::signed(LENDER), 0, AMOUNT, PAYBACK, TIME),
			Error::<Runtime>::LoanNotFound
		);
	});
}

#[test]
fn without_setup() {
	new_test_ext().execute_with(|| {
		let loan_id = util::create_loan();

		assert_noop!(
			AssetLending::fund(RuntimeOrigin::signed(LENDER), loan_id, AMOUNT, PAYBACK, TIME),
			Error::<Runtime>::from(StateViolation::NotConfigured)
		);
	});
}

#[test]
fn twice() {
	for payment in util::all_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::funded_loan(payment);

			assert_noop!(
				AssetLending::fund(RuntimeOrigin::signed(ANY), loan_id, AMOUNT, PAYBACK, TIME),
				Error::<Runtime>::from(StateViolation::NotConfigured)
			);
		});
	}
}

#[test]
fn with_zero_duration() {
	for payment in util::all_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment);

			assert_noop!(
				AssetLending::fund(RuntimeOrigin::signed(LENDER), loan_id, AMOUNT, PAYBACK, 0),
				Error::<Runtime>::from(PolicyViolation::ZeroDuration)
			);
		});
	}
}

#[test]
fn with_principal_too_low() {
	for payment in util::custodial_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment);

			assert_noop!(
				AssetLending::fund(
					RuntimeOrigin::signed(LENDER),
					loan_id,
					MIN_PRINCIPAL,
					PAYBACK,
					TIME
				),
				Error::<Runtime>::from(PolicyViolation::PrincipalTooLow)
			);
		});
	}
}

#[test]
fn with_insufficient_premium() {
	for payment in util::custodial_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment);

			assert_noop!(
				AssetLending::fund(
					RuntimeOrigin::signed(LENDER),
					loan_id,
					AMOUNT,
					AMOUNT + MIN_PREMIUM,
					TIME
				),
				Error::<Runtime>::from(PolicyViolation::InsufficientPremium)
			);
		});
	}
}

#[test]
fn with_overflowing_premium() {
	new_test_ext().execute_with(|| {
		let loan_id = util::configured_loan(util::native());

		assert_noop!(
			AssetLending::fund(
				RuntimeOrigin::signed(LENDER),
				loan_id,
				Balance::MAX,
				Balance::MAX,
				TIME
			),
			ArithmeticError::Overflow
		);
	});
}

#[test]
fn with_unrepresentable_deadline() {
	for payment in util::all_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment);

			assert_noop!(
				AssetLending::fund(
					RuntimeOrigin::signed(LENDER),
					loan_id,
					AMOUNT,
					PAYBACK,
					Seconds::MAX
				),
				ArithmeticError::Overflow
			);
		});
	}
}

#[test]
fn with_insufficient_funds() {
	for payment in util::custodial_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment);
			let amount = INITIAL_BALANCE + 1;

			assert_noop!(
				AssetLending::fund(
					RuntimeOrigin::signed(LENDER),
					loan_id,
					amount,
					amount + PAYBACK,
					TIME
				),
				Error::<Runtime>::from(ValueMismatch::InsufficientBalance)
			);
		});
	}
}

#[test]
fn with_successful_funding() {
	for payment in util::custodial_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::configured_loan(payment.clone());
			let escrow = util::escrow(loan_id);

			assert_ok!(AssetLending::fund(
				RuntimeOrigin::signed(LENDER),
				loan_id,
				AMOUNT,
				PAYBACK,
				TIME
			));

			let loan = util::get_loan(loan_id);
			assert_eq!(loan.status, LendStatus::Funded);
			assert_eq!(loan.creator, CREATOR);
			assert_eq!(loan.lender, LENDER);
			assert_eq!(loan.amount, AMOUNT);
			assert_eq!(loan.payback, PAYBACK);
			assert_eq!(loan.time, TIME);

			assert_eq!(util::payment_balance(&payment, &escrow), AMOUNT);
			assert_eq!(
				util::payment_balance(&payment, &LENDER),
				INITIAL_BALANCE - AMOUNT
			);

			System::assert_last_event(RuntimeEvent::AssetLending(Event::Funded {
				loan_id,
				lender: LENDER,
				amount: AMOUNT,
				payback: PAYBACK,
				time: TIME,
			}));
		});
	}
}

#[test]
fn with_the_lowest_accepted_terms() {
	new_test_ext().execute_with(|| {
		let loan_id = util::configured_loan(util::native());
		let amount = MIN_PRINCIPAL + 1;

		assert_ok!(AssetLending::fund(
			RuntimeOrigin::signed(LENDER),
			loan_id,
			amount,
			amount + MIN_PREMIUM + 1,
			1
		));
	});
}
