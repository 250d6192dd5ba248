// Copyright 2023 Centrifuge Foundation (centrifuge.io).
// This file is part of Centrifuge chain project.

// Centrifuge is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version (see http://www.gnu.org/licenses).

// Centrifuge is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

use frame_support::weights::Weight;

pub trait WeightInfo {
	fn create() -> Weight;
	fn setup() -> Weight;
	fn fund() -> Weight;
	fn lend_nft() -> Weight;
	fn pay_debt() -> Weight;
	fn claim_nft() -> Weight;
	fn claim_debt() -> Weight;
	fn opt_out() -> Weight;
	fn close() -> Weight;
}

impl WeightInfo for () {
	fn create() -> Weight {
		Weight::zero()
	}

	fn setup() -> Weight {
		Weight::zero()
	}

	fn fund() -> Weight {
		Weight::zero()
	}

	fn lend_nft() -> Weight {
		Weight::zero()
	}

	fn pay_debt() -> Weight {
		Weight::zero()
	}

	fn claim_nft() -> Weight {
		Weight::zero()
	}

	fn claim_debt() -> Weight {
		Weight::zero()
	}

	fn opt_out() -> Weight {
		Weight::zero()
	}

	fn close() -> Weight {
		Weight::zero()
	}
}
