//! Versioned ledger logic.
//!
//! The dispatcher never interprets a forwarded call. It hands the raw SCALE bytes of a
//! [`LedgerCall`] to [`LogicRegistry::execute`] together with the identifier of the
//! active logic version. [`Implementations`] is the table from identifier to code. All
//! versions read and write the same pallet storage, so replacing the active identifier
//! swaps behavior without touching balances, roles or the initializer latch.
//!
//! New versions may append call variants and storage items, never reorder or reuse them.

use crate::*;
use codec::{Decode, DecodeAll, Encode};
use frame_support::{storage::with_storage_layer, traits::GetStorageVersion};
use scale_info::TypeInfo;
use sp_std::marker::PhantomData;

/// Identifier of a ledger logic version.
pub type ImplementationId = u32;

/// The initial ledger logic.
pub const LEDGER_V1: ImplementationId = 1;
/// V1 plus atomic batch transfers.
pub const LEDGER_V2: ImplementationId = 2;

/// Who is calling, and on behalf of which ledger account the code runs.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub struct CallContext<AccountId> {
    /// Original signer of the forwarded call.
    pub caller: AccountId,
    /// Account of the dispatcher; holds any stray funds sent to the ledger.
    pub this: AccountId,
}

/// Arguments of the one-time initializer.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug, TypeInfo)]
pub struct TokenSetup<AccountId> {
    pub name: Vec<u8>,
    pub symbol: Vec<u8>,
    pub currency: Vec<u8>,
    pub decimals: u8,
    pub compliance: AccountId,
    pub operator: AccountId,
    pub burn_account: AccountId,
    pub whitelist_enabled: bool,
}

/// Selector and arguments of a forwarded ledger operation.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug, TypeInfo)]
pub enum LedgerCall<AccountId, AssetId> {
    #[codec(index = 0)]
    Initialize(TokenSetup<AccountId>),
    #[codec(index = 1)]
    Transfer { to: AccountId, amount: u128 },
    #[codec(index = 2)]
    Approve { spender: AccountId, amount: u128 },
    #[codec(index = 3)]
    IncreaseAllowance { spender: AccountId, delta: u128 },
    #[codec(index = 4)]
    DecreaseAllowance { spender: AccountId, delta: u128 },
    #[codec(index = 5)]
    TransferFrom { owner: AccountId, to: AccountId, amount: u128 },
    #[codec(index = 6)]
    Mint { to: AccountId, amount: u128 },
    #[codec(index = 7)]
    Burn { amount: u128 },
    #[codec(index = 8)]
    UpdateOperator { operator: AccountId },
    #[codec(index = 9)]
    Pause,
    #[codec(index = 10)]
    Unpause,
    #[codec(index = 11)]
    Freeze { account: AccountId },
    #[codec(index = 12)]
    UnFreeze { account: AccountId },
    #[codec(index = 13)]
    Whitelist { account: AccountId },
    #[codec(index = 14)]
    UnWhitelist { account: AccountId },
    #[codec(index = 15)]
    EnableWhitelisted,
    #[codec(index = 16)]
    DisableWhitelisted,
    #[codec(index = 17)]
    UpdateReserveBalance { reserve: u128 },
    #[codec(index = 18)]
    SeizeTransferFrom { from: AccountId, to: AccountId, amount: u128 },
    #[codec(index = 19)]
    UpdateCompliance { compliance: AccountId },
    #[codec(index = 20)]
    UpdateBurnAccount { account: AccountId },
    #[codec(index = 21)]
    RescueNativeCurrency { to: AccountId, amount: u128 },
    #[codec(index = 22)]
    RescueAsset { asset: AssetId, to: AccountId, amount: u128 },
    /// Since [`LEDGER_V2`].
    #[codec(index = 23)]
    BatchTransfer { transfers: Vec<(AccountId, u128)> },
}

/// Indirection table consulted by the dispatcher.
pub trait LogicRegistry<AccountId, Id> {
    /// Whether `id` names code that can run against the storage currently on chain.
    fn is_usable(id: &Id) -> bool;

    /// Decodes `input` and runs it with logic `id`. Either the whole call takes effect
    /// or none of it does.
    fn execute(id: &Id, ctx: &CallContext<AccountId>, input: &[u8]) -> DispatchResult;
}

type LogicFn<T> = fn(&CallContext<<T as frame_system::Config>::AccountId>, CallOf<T>) -> DispatchResult;

struct LogicEntry<T: Config> {
    id: ImplementationId,
    /// Storage layout the code was written against.
    layout: StorageVersion,
    logic: LogicFn<T>,
}

/// Logic versions known to runtime `T`.
pub struct Implementations<T>(PhantomData<T>);

impl<T: Config> Implementations<T> {
    fn entries() -> [LogicEntry<T>; 2] {
        [
            LogicEntry { id: LEDGER_V1, layout: StorageVersion::new(1), logic: v1::<T> },
            LogicEntry { id: LEDGER_V2, layout: StorageVersion::new(1), logic: v2::<T> },
        ]
    }

    fn lookup(id: &ImplementationId) -> Option<LogicEntry<T>> {
        Self::entries().into_iter().find(|entry| entry.id == *id)
    }
}

impl<T: Config> LogicRegistry<T::AccountId, ImplementationId> for Implementations<T> {
    fn is_usable(id: &ImplementationId) -> bool {
        Self::lookup(id)
            .map(|entry| entry.layout >= Pallet::<T>::on_chain_storage_version())
            .unwrap_or(false)
    }

    fn execute(
        id: &ImplementationId,
        ctx: &CallContext<T::AccountId>,
        input: &[u8],
    ) -> DispatchResult {
        let entry = Self::lookup(id).ok_or(Error::<T>::UnknownImplementation)?;
        let mut data = input;
        let call = CallOf::<T>::decode_all(&mut data).map_err(|_| Error::<T>::UndecodableCall)?;
        log::trace!(target: LOG_TARGET, "logic v{} executing {:?} for {:?}", id, call, ctx.caller);

        with_storage_layer(|| (entry.logic)(ctx, call))
    }
}

fn v1<T: Config>(ctx: &CallContext<T::AccountId>, call: CallOf<T>) -> DispatchResult {
    let who = &ctx.caller;
    match call {
        LedgerCall::Initialize(setup) => Pallet::<T>::do_initialize(setup),
        LedgerCall::Transfer { to, amount } => Pallet::<T>::do_transfer(who, to, amount),
        LedgerCall::Approve { spender, amount } => Pallet::<T>::do_approve(who, spender, amount),
        LedgerCall::IncreaseAllowance { spender, delta } =>
            Pallet::<T>::do_increase_allowance(who, spender, delta),
        LedgerCall::DecreaseAllowance { spender, delta } =>
            Pallet::<T>::do_decrease_allowance(who, spender, delta),
        LedgerCall::TransferFrom { owner, to, amount } =>
            Pallet::<T>::do_transfer_from(who, owner, to, amount),
        LedgerCall::Mint { to, amount } => Pallet::<T>::do_mint(who, to, amount),
        LedgerCall::Burn { amount } => Pallet::<T>::do_burn(who, amount),
        LedgerCall::UpdateOperator { operator } =>
            Pallet::<T>::do_update_operator(who.clone(), operator),
        LedgerCall::Pause => Pallet::<T>::do_pause(who.clone()),
        LedgerCall::Unpause => Pallet::<T>::do_unpause(who.clone()),
        LedgerCall::Freeze { account } => Pallet::<T>::do_freeze(who, account),
        LedgerCall::UnFreeze { account } => Pallet::<T>::do_unfreeze(who, account),
        LedgerCall::Whitelist { account } => Pallet::<T>::do_whitelist(who, account),
        LedgerCall::UnWhitelist { account } => Pallet::<T>::do_unwhitelist(who, account),
        LedgerCall::EnableWhitelisted => Pallet::<T>::do_set_whitelisting(who, true),
        LedgerCall::DisableWhitelisted => Pallet::<T>::do_set_whitelisting(who, false),
        LedgerCall::UpdateReserveBalance { reserve } =>
            Pallet::<T>::do_update_reserve_balance(who, reserve),
        LedgerCall::SeizeTransferFrom { from, to, amount } =>
            Pallet::<T>::do_seize_transfer_from(who, from, to, amount),
        LedgerCall::UpdateCompliance { compliance } =>
            Pallet::<T>::do_update_compliance(who.clone(), compliance),
        LedgerCall::UpdateBurnAccount { account } =>
            Pallet::<T>::do_update_burn_account(who, account),
        LedgerCall::RescueNativeCurrency { to, amount } =>
            Pallet::<T>::do_rescue_native(ctx, to, amount),
        LedgerCall::RescueAsset { asset, to, amount } =>
            Pallet::<T>::do_rescue_asset(ctx, asset, to, amount),
        LedgerCall::BatchTransfer { .. } => Err(Error::<T>::UnsupportedCall.into()),
    }
}

fn v2<T: Config>(ctx: &CallContext<T::AccountId>, call: CallOf<T>) -> DispatchResult {
    match call {
        LedgerCall::BatchTransfer { transfers } => {
            for (to, amount) in transfers {
                Pallet::<T>::do_transfer(&ctx.caller, to, amount)?;
            }
            Ok(())
        },
        call => v1::<T>(ctx, call),
    }
}
