use super::*;

pub fn native() -> PaymentAsset<Runtime> {
	PaymentAsset::Native
}

pub fn asset() -> PaymentAsset<Runtime> {
	PaymentAsset::Asset(PAYMENT_ASSET)
}

pub fn external_token() -> PaymentAsset<Runtime> {
	PaymentAsset::ExternalToken(TOKEN_CONTRACT)
}

/// Payment assets held by the escrow
pub fn custodial_payments() -> [PaymentAsset<Runtime>; 2] {
	[native(), asset()]
}

pub fn all_payments() -> [PaymentAsset<Runtime>; 3] {
	[native(), asset(), external_token()]
}

pub fn get_loan(loan_id: LoanId) -> LendingRecord<Runtime> {
	Loans::<Runtime>::get(loan_id).expect("loan exists")
}

pub fn escrow(loan_id: LoanId) -> AccountId {
	AssetLending::escrow_account(loan_id)
}

pub fn now_secs() -> Seconds {
	now().as_secs()
}

/// Balance of `who` in the asset a loan is paid with
pub fn payment_balance(payment: &PaymentAsset<Runtime>, who: &AccountId) -> Balance {
	match payment {
		PaymentAsset::Native => Balances::free_balance(who),
		PaymentAsset::Asset(asset) => OrmlTokens::balance(*asset, who),
		PaymentAsset::ExternalToken(_) => fake_token::balance_of(who).as_u128(),
	}
}

pub fn create_loan() -> LoanId {
	assert_ok!(AssetLending::create(RuntimeOrigin::signed(CREATOR)));
	LastLoanId::<Runtime>::get()
}

pub fn configured_loan(payment: PaymentAsset<Runtime>) -> LoanId {
	let loan_id = create_loan();
	assert_ok!(AssetLending::setup(
		RuntimeOrigin::signed(CREATOR),
		loan_id,
		payment,
		COLLATERAL
	));

	loan_id
}

pub fn funded_loan(payment: PaymentAsset<Runtime>) -> LoanId {
	let loan_id = configured_loan(payment.clone());
	if let PaymentAsset::ExternalToken(_) = payment {
		// Spent once the collateral is posted
		fake_token::approve(&LENDER, &escrow(loan_id), AMOUNT);
	}

	assert_ok!(AssetLending::fund(
		RuntimeOrigin::signed(LENDER),
		loan_id,
		AMOUNT,
		PAYBACK,
		TIME
	));

	loan_id
}

pub fn lent_loan(payment: PaymentAsset<Runtime>) -> LoanId {
	let loan_id = funded_loan(payment);
	assert_ok!(AssetLending::lend_nft(
		RuntimeOrigin::signed(BORROWER),
		loan_id,
		COLLATERAL,
		1
	));

	loan_id
}

pub fn repaid_loan(payment: PaymentAsset<Runtime>) -> LoanId {
	let loan_id = lent_loan(payment.clone());
	if let PaymentAsset::ExternalToken(_) = payment {
		fake_token::approve(&BORROWER, &escrow(loan_id), PAYBACK);
	}

	assert_ok!(AssetLending::pay_debt(
		RuntimeOrigin::signed(BORROWER),
		loan_id,
		PAYBACK
	));

	loan_id
}

pub fn defaulted_loan(payment: PaymentAsset<Runtime>) -> LoanId {
	let loan_id = lent_loan(payment);
	advance_time(Duration::from_secs(TIME + 1));
	assert_ok!(AssetLending::claim_nft(RuntimeOrigin::signed(LENDER), loan_id));

	loan_id
}
