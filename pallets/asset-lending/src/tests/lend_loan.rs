use super::*;

#[test]
fn with_wrong_loan_id() {
	new_test_ext().execute_with(|| {
		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), 0, COLLATERAL, 1),
			Error::<Runtime>::LoanNotFound
		);
	});
}

#[test]
fn without_funding() {
	new_test_ext().execute_with(|| {
		let loan_id = util::configured_loan(util::native());

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), loan_id, COLLATERAL, 1),
			Error::<Runtime>::from(StateViolation::NotFunded)
		);
	});
}

#[test]
fn with_wrong_collateral() {
	new_test_ext().execute_with(|| {
		let loan_id = util::funded_loan(util::native());

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(ANY), loan_id, OTHER_COLLATERAL, 1),
			Error::<Runtime>::from(ValueMismatch::CollateralAsset)
		);
	});
}

#[test]
fn with_wrong_quantity() {
	new_test_ext().execute_with(|| {
		let loan_id = util::funded_loan(util::native());

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), loan_id, COLLATERAL, 0),
			Error::<Runtime>::from(ValueMismatch::CollateralQuantity)
		);

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), loan_id, COLLATERAL, 2),
			Error::<Runtime>::from(ValueMismatch::CollateralQuantity)
		);
	});
}

#[test]
fn without_owning_the_collateral() {
	new_test_ext().execute_with(|| {
		let loan_id = util::funded_loan(util::native());

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(ANY), loan_id, COLLATERAL, 1),
			Error::<Runtime>::from(ValueMismatch::InsufficientBalance)
		);
	});
}

#[test]
fn with_unrepresentable_deadline() {
	new_test_ext().execute_with(|| {
		let loan_id = util::configured_loan(util::native());

		// Deadline fits at funding time only
		assert_ok!(AssetLending::fund(
			RuntimeOrigin::signed(LENDER),
			loan_id,
			AMOUNT,
			PAYBACK,
			Seconds::MAX - util::now_secs()
		));

		advance_time(Duration::from_secs(1));

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), loan_id, COLLATERAL, 1),
			ArithmeticError::Overflow
		);

		// The lender can still get the principal back
		assert_ok!(AssetLending::opt_out(
			RuntimeOrigin::signed(LENDER),
			loan_id
		));
		assert_eq!(Balances::free_balance(&LENDER), INITIAL_BALANCE);
	});
}

#[test]
fn twice() {
	new_test_ext().execute_with(|| {
		let loan_id = util::lent_loan(util::native());

		assert_noop!(
			AssetLending::lend_nft(RuntimeOrigin::signed(BORROWER), loan_id, COLLATERAL, 1),
			Error::<Runtime>::from(StateViolation::NotFunded)
		);
	});
}

#[test]
fn with_successful_lending() {
	for payment in util::all_payments() {
		new_test_ext().execute_with(|| {
			let loan_id = util::funded_loan(payment.clone());
			let escrow = util::escrow(loan_id);
			let borrower_balance = util::payment_balance(&payment, &BORROWER);

			assert_ok!(AssetLending::lend_nft(
				RuntimeOrigin::signed(BORROWER),
				loan_id,
				COLLATERAL,
				1
			));

			let loan = util::get_loan(loan_id);
			assert_eq!(loan.status, LendStatus::Lent);
			assert_eq!(loan.borrower, Some(BORROWER));
			assert_eq!(loan.date, util::now_secs());
			assert_eq!(loan.collateral, Some(COLLATERAL));

			assert_eq!(OrmlTokens::balance(COLLATERAL, &escrow), 1);
			assert_eq!(OrmlTokens::balance(COLLATERAL, &BORROWER), 0);

			assert_eq!(util::payment_balance(&payment, &escrow), 0);
			assert_eq!(
				util::payment_balance(&payment, &BORROWER),
				borrower_balance + AMOUNT
			);
			assert_eq!(
				util::payment_balance(&payment, &LENDER),
				INITIAL_BALANCE - AMOUNT
			);

			System::assert_last_event(RuntimeEvent::AssetLending(Event::Lent {
				loan_id,
				borrower: BORROWER,
				amount: AMOUNT,
				date: START.as_secs(),
			}));
		});
	}
}
