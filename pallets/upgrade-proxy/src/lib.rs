#![cfg_attr(not(feature = "std"), no_std)]

//! # Upgrade Proxy Pallet
//!
//! Transparent dispatcher in front of a versioned logic table. Its storage holds only the
//! control region ([`Admin`] and [`Implementation`]); ledger state lives in the logic
//! pallet's own storage and is shared by every logic version.
//!
//! Calls are classified by who sends them:
//!
//! - the admin may only upgrade, change the admin, or read the control region. A
//!   [`Pallet::forward`] from the admin fails with [`Error::AdminCannotFallback`].
//! - everyone else has [`Pallet::forward`] payloads run by the active logic version,
//!   with their own account as caller and the pallet account as the ledger's address.
//!
//! The admin is expected to be a controller pallet (see `pallet-proxy-admin`), which
//! reaches the dispatcher through [`UpgradeableProxy`].

use frame_support::{
    dispatch::DispatchResult, ensure, pallet_prelude::*, storage::with_storage_layer, PalletId,
};
use frame_system::pallet_prelude::*;
use pallet_stable_token::{CallContext, LogicRegistry};
use sp_runtime::traits::{AccountIdConversion, MaybeSerializeDeserialize};
use sp_std::prelude::*;

pub use pallet::*;
pub use weights::WeightInfo;

pub mod weights;

#[cfg(test)]
mod mock;


pub(crate) const LOG_TARGET: &str = "runtime::upgrade-proxy";

/// Opaque payload handed to the active logic version.
pub type InputOf<T> = BoundedVec<u8, <T as Config>::MaxInputLen>;

/// Administrative surface of an upgradeable dispatcher, as seen by its controller.
///
/// Every function takes the calling account and fails unless it is the current admin.
pub trait UpgradeableProxy<AccountId> {
    type ImplementationId: Parameter + Member + MaxEncodedLen + Copy;

    /// Address of the dispatcher, which is also the address the ledger code runs as.
    fn proxy_account() -> AccountId;

    fn admin(caller: &AccountId) -> Result<AccountId, DispatchError>;

    fn implementation(caller: &AccountId) -> Result<Self::ImplementationId, DispatchError>;

    fn upgrade_to(caller: &AccountId, implementation: Self::ImplementationId) -> DispatchResult;

    /// Upgrades, then runs `data` with the new logic as `caller`. Nothing is kept if
    /// either step fails.
    fn upgrade_to_and_call(
        caller: &AccountId,
        implementation: Self::ImplementationId,
        data: &[u8],
    ) -> DispatchResult;

    fn change_admin(caller: &AccountId, new_admin: AccountId) -> DispatchResult;
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Identifier of a logic version.
        type ImplementationId: Parameter + Member + MaxEncodedLen + Copy + MaybeSerializeDeserialize;

        /// Table of logic versions forwarded payloads run against.
        type Logic: LogicRegistry<Self::AccountId, Self::ImplementationId>;

        /// Derives the dispatcher account.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Longest payload accepted for forwarding.
        #[pallet::constant]
        type MaxInputLen: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// The only account allowed to administer the dispatcher.
    #[pallet::storage]
    pub type Admin<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Logic version forwarded calls currently run against.
    #[pallet::storage]
    pub type Implementation<T: Config> = StorageValue<_, T::ImplementationId, OptionQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Forwarded calls now run against `implementation`
        Upgraded { implementation: T::ImplementationId },
        /// Admin rights moved to `admin`
        AdminChanged { previous: T::AccountId, admin: T::AccountId },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// TransparentUpgradeableProxy: admin cannot fallback to proxy target
        AdminCannotFallback,
        /// TransparentUpgradeableProxy: caller is not the admin
        NotAdmin,
        /// ERC1967: new implementation is not usable
        InvalidImplementation,
        /// TransparentUpgradeableProxy: no implementation set
        NoImplementation,
        /// TransparentUpgradeableProxy: input too long
        InputTooLong,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxInputLen::get() > 0, "MaxInputLen must allow a call selector");
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Initial admin, usually the controller pallet's account
        pub admin: Option<T::AccountId>,
        /// Initial logic version
        pub implementation: Option<T::ImplementationId>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(implementation) = &self.implementation {
                assert!(T::Logic::is_usable(implementation), "Genesis implementation is not usable");
                Implementation::<T>::put(implementation);
            }
            if let Some(admin) = &self.admin {
                Admin::<T>::put(admin);
            }
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Runs `input` with the active logic version. Not available to the admin.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::forward(input.len() as u32))]
        pub fn forward(origin: OriginFor<T>, input: InputOf<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            ensure!(!Self::is_admin(&who), Error::<T>::AdminCannotFallback);
            Self::do_forward(who, &input)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::upgrade_to())]
        pub fn upgrade_to(
            origin: OriginFor<T>,
            implementation: T::ImplementationId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_upgrade_to(&who, implementation)
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::upgrade_to_and_call(data.len() as u32))]
        pub fn upgrade_to_and_call(
            origin: OriginFor<T>,
            implementation: T::ImplementationId,
            data: InputOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_upgrade_to_and_call(&who, implementation, &data)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::change_admin())]
        pub fn change_admin(origin: OriginFor<T>, new_admin: T::AccountId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_change_admin(&who, new_admin)
        }
    }
}

impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    fn is_admin(who: &T::AccountId) -> bool {
        Admin::<T>::get().as_ref() == Some(who)
    }

    fn ensure_admin(who: &T::AccountId) -> DispatchResult {
        ensure!(Self::is_admin(who), Error::<T>::NotAdmin);
        Ok(())
    }

    /// Current admin, readable by the admin only.
    pub fn query_admin(caller: &T::AccountId) -> Result<T::AccountId, DispatchError> {
        Self::ensure_admin(caller)?;
        Admin::<T>::get().ok_or_else(|| Error::<T>::NotAdmin.into())
    }

    /// Active logic version, readable by the admin only.
    pub fn query_implementation(caller: &T::AccountId) -> Result<T::ImplementationId, DispatchError> {
        Self::ensure_admin(caller)?;
        Implementation::<T>::get().ok_or_else(|| Error::<T>::NoImplementation.into())
    }

    fn do_forward(caller: T::AccountId, input: &[u8]) -> DispatchResult {
        let implementation = Implementation::<T>::get().ok_or(Error::<T>::NoImplementation)?;
        let ctx = CallContext { caller, this: Self::account_id() };
        T::Logic::execute(&implementation, &ctx, input)
    }

    pub(crate) fn do_upgrade_to(
        who: &T::AccountId,
        implementation: T::ImplementationId,
    ) -> DispatchResult {
        Self::ensure_admin(who)?;
        ensure!(T::Logic::is_usable(&implementation), Error::<T>::InvalidImplementation);

        Implementation::<T>::put(implementation);
        log::info!(target: LOG_TARGET, "upgraded to implementation {:?}", implementation);
        Self::deposit_event(Event::Upgraded { implementation });
        Ok(())
    }

    pub(crate) fn do_upgrade_to_and_call(
        who: &T::AccountId,
        implementation: T::ImplementationId,
        data: &[u8],
    ) -> DispatchResult {
        ensure!(data.len() <= T::MaxInputLen::get() as usize, Error::<T>::InputTooLong);
        with_storage_layer(|| {
            Self::do_upgrade_to(who, implementation)?;
            Self::do_forward(who.clone(), data)
        })
    }

    pub(crate) fn do_change_admin(who: &T::AccountId, new_admin: T::AccountId) -> DispatchResult {
        Self::ensure_admin(who)?;

        Admin::<T>::put(&new_admin);
        log::info!(target: LOG_TARGET, "admin changed from {:?} to {:?}", who, new_admin);
        Self::deposit_event(Event::AdminChanged { previous: who.clone(), admin: new_admin });
        Ok(())
    }
}

impl<T: Config> UpgradeableProxy<T::AccountId> for Pallet<T> {
    type ImplementationId = T::ImplementationId;

    fn proxy_account() -> T::AccountId {
        Self::account_id()
    }

    fn admin(caller: &T::AccountId) -> Result<T::AccountId, DispatchError> {
        Self::query_admin(caller)
    }

    fn implementation(caller: &T::AccountId) -> Result<T::ImplementationId, DispatchError> {
        Self::query_implementation(caller)
    }

    fn upgrade_to(caller: &T::AccountId, implementation: T::ImplementationId) -> DispatchResult {
        Self::do_upgrade_to(caller, implementation)
    }

    fn upgrade_to_and_call(
        caller: &T::AccountId,
        implementation: T::ImplementationId,
        data: &[u8],
    ) -> DispatchResult {
        Self::do_upgrade_to_and_call(caller, implementation, data)
    }

    fn change_admin(caller: &T::AccountId, new_admin: T::AccountId) -> DispatchResult {
        Self::do_change_admin(caller, new_admin)
    }
}

impl<T> Error<T> {
    /// Text the error is reported with to clients.
    pub fn message(&self) -> &'static str {
        match self {
            Error::AdminCannotFallback =>
                "TransparentUpgradeableProxy: admin cannot fallback to proxy target",
            Error::NotAdmin => "TransparentUpgradeableProxy: caller is not the admin",
            Error::InvalidImplementation => "ERC1967: new implementation is not usable",
            Error::NoImplementation => "TransparentUpgradeableProxy: no implementation set",
            Error::InputTooLong => "TransparentUpgradeableProxy: input too long",
            _ => "",
        }
    }
}
