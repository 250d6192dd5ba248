#[frame_support::pallet(dev_mode)]
pub mod pallet {
	use cfg_traits::lending::{AssetAuthorities, AssetRegistry};
	use frame_support::pallet_prelude::*;
	use mock_builder::{execute_call, register_call};

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type AssetId;
	}

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::storage]
	type CallIds<T: Config> = StorageMap<_, _, String, mock_builder::CallId>;

	impl<T: Config> Pallet<T> {
		pub fn mock_authorities(
			f: impl Fn(&T::AssetId) -> Option<AssetAuthorities<T::AccountId>> + 'static,
		) {
			register_call!(f);
		}

		pub fn mock_opt_in(f: impl Fn(&T::AccountId, &T::AssetId) -> DispatchResult + 'static) {
			register_call!(move |(a, b)| f(a, b));
		}

		pub fn mock_opt_out(f: impl Fn(&T::AccountId, &T::AssetId) -> DispatchResult + 'static) {
			register_call!(move |(a, b)| f(a, b));
		}
	}

	impl<T: Config> AssetRegistry<T::AccountId> for Pallet<T> {
		type AssetId = T::AssetId;

		fn authorities(a: &Self::AssetId) -> Option<AssetAuthorities<T::AccountId>> {
			execute_call!(a)
		}

		fn opt_in(a: &T::AccountId, b: &Self::AssetId) -> DispatchResult {
			execute_call!((a, b))
		}

		fn opt_out(a: &T::AccountId, b: &Self::AssetId) -> DispatchResult {
			execute_call!((a, b))
		}
	}
}
