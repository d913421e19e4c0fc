#![cfg_attr(not(feature = "std"), no_std)]
// Storage getters are kept as the public read surface of the ledger.
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Stable Token Pallet
//!
//! Reserve-backed, compliance-gated fungible ledger. The pallet itself exposes no
//! extrinsics: every state change arrives as an encoded [`LedgerCall`] forwarded by an
//! upgrade dispatcher, and is executed by whichever logic version the dispatcher points
//! at (see [`logic`]). Storage is shared by all logic versions and is append-only
//! across them.
//!
//! Two disjoint roles gate privileged operations:
//!
//! - **compliance**: whitelist, freeze, pause, reserve attestation, seizure, rescue, and
//!   handing over the compliance role or the burn account.
//! - **operator**: mint, burn, and handing over the operator role.
//!
//! Read access goes through the storage getters (`balance_of`, `total_supply`,
//! `allowance`, ...) and is never blocked by the pause switch.

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    traits::{fungible, fungibles},
};
use frame_system::pallet_prelude::*;
use sp_runtime::traits::MaybeSerializeDeserialize;
use sp_std::prelude::*;

pub use logic::{
    CallContext, ImplementationId, Implementations, LedgerCall, LogicRegistry, TokenSetup,
    LEDGER_V1, LEDGER_V2,
};
pub use pallet::*;
pub use policy::Role;

mod ledger;
pub mod logic;
mod policy;
mod rescue;

#[cfg(test)]
mod mock;


pub(crate) const LOG_TARGET: &str = "runtime::stable-token";

/// The current storage layout version.
///
/// Logic versions declare the layout they were written against; the dispatcher refuses to
/// switch to logic older than the layout on chain.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

pub type TokenNameOf = BoundedVec<u8, ConstU32<64>>;
pub type TokenSymbolOf = BoundedVec<u8, ConstU32<16>>;
pub type CurrencyCodeOf = BoundedVec<u8, ConstU32<16>>;

pub type NativeBalanceOf<T> = <<T as Config>::NativeCurrency as fungible::Inspect<
    <T as frame_system::Config>::AccountId,
>>::Balance;
pub type AssetBalanceOf<T> = <<T as Config>::Assets as fungibles::Inspect<
    <T as frame_system::Config>::AccountId,
>>::Balance;

/// Ledger call as decoded by the logic table of runtime `T`.
pub type CallOf<T> = LedgerCall<<T as frame_system::Config>::AccountId, <T as Config>::AssetId>;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Native currency that can end up on the ledger account by mistake.
        type NativeCurrency: fungible::Mutate<Self::AccountId>;

        /// Identifier of foreign assets held by the ledger account.
        type AssetId: Parameter + Member + MaxEncodedLen + MaybeSerializeDeserialize;

        /// Foreign assets that can end up on the ledger account by mistake.
        type Assets: fungibles::Mutate<Self::AccountId, AssetId = Self::AssetId>;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Set exactly once by the initializer; never reset by a logic upgrade.
    #[pallet::storage]
    #[pallet::getter(fn is_initialized)]
    pub type Initialized<T> = StorageValue<_, bool, ValueQuery>;

    /// Token name (e.g., "StableCoinToken")
    #[pallet::storage]
    #[pallet::getter(fn token_name)]
    pub type TokenName<T> = StorageValue<_, TokenNameOf, ValueQuery>;

    /// Token symbol (e.g., "SCT")
    #[pallet::storage]
    #[pallet::getter(fn token_symbol)]
    pub type TokenSymbol<T> = StorageValue<_, TokenSymbolOf, ValueQuery>;

    /// Fiat currency the token tracks (e.g., "HSCT")
    #[pallet::storage]
    #[pallet::getter(fn currency)]
    pub type TokenCurrency<T> = StorageValue<_, CurrencyCodeOf, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn decimals)]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    /// Total token supply. Never exceeds [`ReserveBalance`].
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Attested off-ledger collateral capping the supply.
    #[pallet::storage]
    #[pallet::getter(fn reserve_balance)]
    pub type ReserveBalance<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Approved spending, keyed by (owner, spender).
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Whitelisted accounts (can send/receive transfers while whitelisting is enabled)
    #[pallet::storage]
    #[pallet::getter(fn is_whitelisted)]
    pub type Whitelist<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn whitelisted_status)]
    pub type WhitelistEnabled<T> = StorageValue<_, bool, ValueQuery>;

    /// Frozen accounts (cannot send transfers)
    #[pallet::storage]
    #[pallet::getter(fn is_frozen)]
    pub type Frozen<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn paused)]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    #[pallet::storage]
    #[pallet::getter(fn compliance)]
    pub type Compliance<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    #[pallet::storage]
    #[pallet::getter(fn operator)]
    pub type Operator<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Account that redemptions are burned from.
    #[pallet::storage]
    #[pallet::getter(fn burn_account)]
    pub type BurnAccount<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Ledger identity and roles were set up
        Initialized { compliance: T::AccountId, operator: T::AccountId, burn_account: T::AccountId },
        /// Tokens transferred from one account to another
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// Allowance of `spender` over `owner`'s tokens set to `amount`
        Approval { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// New tokens minted
        Minted { to: T::AccountId, amount: u128 },
        /// Tokens burned from the burn account
        Burned { from: T::AccountId, amount: u128 },
        /// Compliance moved tokens without the owner's approval
        Seized { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// Attested reserve changed
        ReserveBalanceUpdated { previous: u128, reserve: u128 },
        /// Account frozen (cannot send transfers)
        Frozen { account: T::AccountId },
        /// Account unfrozen
        Unfrozen { account: T::AccountId },
        /// Account added to whitelist
        Whitelisted { account: T::AccountId },
        /// Account removed from whitelist
        RemovedFromWhitelist { account: T::AccountId },
        WhitelistingEnabled,
        WhitelistingDisabled,
        Paused { account: T::AccountId },
        Unpaused { account: T::AccountId },
        ComplianceUpdated { previous: T::AccountId, compliance: T::AccountId },
        OperatorUpdated { previous: T::AccountId, operator: T::AccountId },
        BurnAccountUpdated { account: T::AccountId },
        /// Stray native currency returned from the ledger account
        RescueNativeCurrency { to: T::AccountId, amount: u128 },
        /// Stray foreign asset returned from the ledger account
        RescueAsset { asset: T::AssetId, to: T::AccountId, amount: u128 },
    }

    /// Errors of the ledger. [`Error::message`] gives the text each one is reported with.
    #[pallet::error]
    pub enum Error<T> {
        /// Permissions: Only compliance team call this method
        NotCompliance,
        /// Permissions: Only operator team call this method
        NotOperator,
        /// Pausable: paused
        Paused,
        /// Pausable: not paused
        NotPaused,
        /// StableToken:reserve balance limit
        ReserveLimit,
        /// StableToken:reserve below total supply
        ReserveBelowSupply,
        /// ERC20: transfer amount exceeds balance
        InsufficientBalance,
        /// ERC20: insufficient allowance
        InsufficientAllowance,
        /// ERC20: burn amount exceeds balance
        BurnExceedsBalance,
        /// ERC20: decreased allowance below zero
        AllowanceBelowZero,
        /// Whitelist: account is not whitelisted
        NotWhitelisted,
        /// Freezable: account is frozen
        AccountFrozen,
        /// Initializable: contract is already initialized
        AlreadyInitialized,
        /// Initializable: contract is not initialized
        NotInitialized,
        /// StableToken:metadata too long
        BadMetadata,
        /// StableToken:arithmetic overflow
        Overflow,
        /// Rescuable: amount exceeds held balance
        InsufficientHeldBalance,
        /// StableToken:undecodable call
        UndecodableCall,
        /// StableToken:call not supported by this implementation
        UnsupportedCall,
        /// StableToken:unknown implementation
        UnknownImplementation,
        /// Permissions: compliance and operator must be different accounts
        RolesOverlap,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Token name
        pub name: Vec<u8>,
        /// Token symbol
        pub symbol: Vec<u8>,
        /// Tracked fiat currency code
        pub currency: Vec<u8>,
        /// Token decimals
        pub decimals: u8,
        /// The ledger is initialized at genesis when all three roles are given. Leaving all
        /// three out defers setup to the first forwarded `Initialize`, which anyone can send.
        pub compliance: Option<T::AccountId>,
        pub operator: Option<T::AccountId>,
        pub burn_account: Option<T::AccountId>,
        pub whitelist_enabled: bool,
        /// Attested reserve at genesis
        pub reserve_balance: u128,
        /// Accounts to whitelist at genesis
        pub whitelisted_accounts: Vec<T::AccountId>,
        /// Initial token mints (account, amount), capped by the reserve
        pub initial_balances: Vec<(T::AccountId, u128)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let roles_given = [
                self.compliance.is_some(),
                self.operator.is_some(),
                self.burn_account.is_some(),
            ];
            assert!(
                roles_given.iter().all(|given| *given) || roles_given.iter().all(|given| !*given),
                "Genesis roles must be given all together or not at all"
            );

            if let (Some(compliance), Some(operator), Some(burn_account)) =
                (&self.compliance, &self.operator, &self.burn_account)
            {
                Pallet::<T>::do_initialize(TokenSetup {
                    name: self.name.clone(),
                    symbol: self.symbol.clone(),
                    currency: self.currency.clone(),
                    decimals: self.decimals,
                    compliance: compliance.clone(),
                    operator: operator.clone(),
                    burn_account: burn_account.clone(),
                    whitelist_enabled: self.whitelist_enabled,
                })
                .expect("Invalid genesis token setup");
            }

            ReserveBalance::<T>::put(self.reserve_balance);

            for account in &self.whitelisted_accounts {
                Whitelist::<T>::insert(account, true);
            }

            let mut total: u128 = 0;
            for (account, amount) in &self.initial_balances {
                Balances::<T>::mutate(account, |balance| *balance = balance.saturating_add(*amount));
                total = total.saturating_add(*amount);
            }
            assert!(total <= self.reserve_balance, "Genesis balances exceed the reserve balance");
            TotalSupply::<T>::put(total);
        }
    }
}

impl<T> Error<T> {
    /// Text the error is reported with to clients.
    pub fn message(&self) -> &'static str {
        match self {
            Error::NotCompliance => "Permissions: Only compliance team call this method",
            Error::NotOperator => "Permissions: Only operator team call this method",
            Error::Paused => "Pausable: paused",
            Error::NotPaused => "Pausable: not paused",
            Error::ReserveLimit => "StableToken:reserve balance limit",
            Error::ReserveBelowSupply => "StableToken:reserve below total supply",
            Error::InsufficientBalance => "ERC20: transfer amount exceeds balance",
            Error::InsufficientAllowance => "ERC20: insufficient allowance",
            Error::BurnExceedsBalance => "ERC20: burn amount exceeds balance",
            Error::AllowanceBelowZero => "ERC20: decreased allowance below zero",
            Error::NotWhitelisted => "Whitelist: account is not whitelisted",
            Error::AccountFrozen => "Freezable: account is frozen",
            Error::AlreadyInitialized => "Initializable: contract is already initialized",
            Error::NotInitialized => "Initializable: contract is not initialized",
            Error::BadMetadata => "StableToken:metadata too long",
            Error::Overflow => "StableToken:arithmetic overflow",
            Error::InsufficientHeldBalance => "Rescuable: amount exceeds held balance",
            Error::UndecodableCall => "StableToken:undecodable call",
            Error::UnsupportedCall => "StableToken:call not supported by this implementation",
            Error::UnknownImplementation => "StableToken:unknown implementation",
            Error::RolesOverlap => "Permissions: compliance and operator must be different accounts",
            _ => "",
        }
    }
}
