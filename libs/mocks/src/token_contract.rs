#[frame_support::pallet(dev_mode)]
pub mod pallet {
	use cfg_traits::lending::{TokenCall, TokenContract};
	use frame_support::pallet_prelude::*;
	use mock_builder::{execute_call, register_call};

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type ContractId;
	}

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::storage]
	type CallIds<T: Config> = StorageMap<_, _, String, mock_builder::CallId>;

	impl<T: Config> Pallet<T> {
		pub fn mock_call(
			f: impl Fn(
					&T::ContractId,
					&T::AccountId,
					TokenCall<T::AccountId>,
				) -> Result<Vec<u8>, DispatchError>
				+ 'static,
		) {
			register_call!(move |(a, b, c)| f(a, b, c));
		}
	}

	impl<T: Config> TokenContract<T::AccountId> for Pallet<T> {
		type ContractId = T::ContractId;

		fn call(
			a: &Self::ContractId,
			b: &T::AccountId,
			c: TokenCall<T::AccountId>,
		) -> Result<Vec<u8>, DispatchError> {
			execute_call!((a, b, c))
		}
	}
}
