#![cfg_attr(not(feature = "std"), no_std)]

//! # Proxy Admin Pallet
//!
//! Controller holding the admin rights of an upgradeable dispatcher. Its pallet account is
//! configured as the dispatcher's admin, and `OwnerOrigin` decides who may drive it.
//! Owners therefore never sign as the dispatcher admin themselves, and can use the
//! ledger behind the dispatcher like any other account.

use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*, PalletId};
use frame_system::pallet_prelude::*;
use pallet_upgrade_proxy::UpgradeableProxy;
use sp_runtime::traits::AccountIdConversion;
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

pub mod weights;

#[cfg(test)]
mod mock;


pub(crate) const LOG_TARGET: &str = "runtime::proxy-admin";

pub type ImplementationIdOf<T> = <<T as Config>::Proxy as UpgradeableProxy<
    <T as frame_system::Config>::AccountId,
>>::ImplementationId;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Dispatcher administered by this controller.
        type Proxy: UpgradeableProxy<Self::AccountId>;

        /// Origin allowed to upgrade or hand over the dispatcher.
        type OwnerOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// Derives the controller account, which the dispatcher knows as its admin.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Dispatcher `proxy` now runs `implementation`
        ProxyUpgraded { proxy: T::AccountId, implementation: ImplementationIdOf<T> },
        /// Admin rights over `proxy` handed to `admin`
        ProxyAdminChanged { proxy: T::AccountId, admin: T::AccountId },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// ProxyAdmin: unknown proxy
        UnknownProxy,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::upgrade())]
        pub fn upgrade(
            origin: OriginFor<T>,
            proxy: T::AccountId,
            implementation: ImplementationIdOf<T>,
        ) -> DispatchResult {
            T::OwnerOrigin::ensure_origin(origin)?;
            Self::ensure_known(&proxy)?;

            T::Proxy::upgrade_to(&Self::account_id(), implementation)?;
            log::info!(target: LOG_TARGET, "proxy {:?} upgraded to {:?}", proxy, implementation);
            Self::deposit_event(Event::ProxyUpgraded { proxy, implementation });
            Ok(())
        }

        /// Upgrades and runs `data` with the new logic, as the controller account.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::upgrade_and_call(data.len() as u32))]
        pub fn upgrade_and_call(
            origin: OriginFor<T>,
            proxy: T::AccountId,
            implementation: ImplementationIdOf<T>,
            data: Vec<u8>,
        ) -> DispatchResult {
            T::OwnerOrigin::ensure_origin(origin)?;
            Self::ensure_known(&proxy)?;

            T::Proxy::upgrade_to_and_call(&Self::account_id(), implementation, &data)?;
            log::info!(
                target: LOG_TARGET,
                "proxy {:?} upgraded to {:?} with {} byte payload",
                proxy,
                implementation,
                data.len(),
            );
            Self::deposit_event(Event::ProxyUpgraded { proxy, implementation });
            Ok(())
        }

        /// Hands admin rights over `proxy` to `new_admin`. The controller loses them.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::change_proxy_admin())]
        pub fn change_proxy_admin(
            origin: OriginFor<T>,
            proxy: T::AccountId,
            new_admin: T::AccountId,
        ) -> DispatchResult {
            T::OwnerOrigin::ensure_origin(origin)?;
            Self::ensure_known(&proxy)?;

            T::Proxy::change_admin(&Self::account_id(), new_admin.clone())?;
            Self::deposit_event(Event::ProxyAdminChanged { proxy, admin: new_admin });
            Ok(())
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    fn ensure_known(proxy: &T::AccountId) -> DispatchResult {
        ensure!(*proxy == T::Proxy::proxy_account(), Error::<T>::UnknownProxy);
        Ok(())
    }

    /// Admin of `proxy`. Fails once the controller is no longer that admin.
    pub fn get_proxy_admin(proxy: &T::AccountId) -> Result<T::AccountId, DispatchError> {
        Self::ensure_known(proxy)?;
        T::Proxy::admin(&Self::account_id())
    }

    /// Logic version `proxy` currently runs.
    pub fn get_proxy_implementation(
        proxy: &T::AccountId,
    ) -> Result<ImplementationIdOf<T>, DispatchError> {
        Self::ensure_known(proxy)?;
        T::Proxy::implementation(&Self::account_id())
    }
}
