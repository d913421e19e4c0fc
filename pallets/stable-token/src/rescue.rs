//! Recovery of native currency and foreign assets sent to the ledger account.

use crate::*;
use frame_support::traits::tokens::{Fortitude, Preservation};

impl<T: Config> Pallet<T> {
    pub(crate) fn do_rescue_native(
        ctx: &CallContext<T::AccountId>,
        to: T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_role(&ctx.caller, Role::Compliance)?;
        Self::ensure_not_paused()?;

        let value: NativeBalanceOf<T> = amount.try_into().map_err(|_| Error::<T>::Overflow)?;
        let held = <T::NativeCurrency as fungible::Inspect<T::AccountId>>::reducible_balance(
            &ctx.this,
            Preservation::Expendable,
            Fortitude::Polite,
        );
        ensure!(value <= held, Error::<T>::InsufficientHeldBalance);

        <T::NativeCurrency as fungible::Mutate<T::AccountId>>::transfer(
            &ctx.this,
            &to,
            value,
            Preservation::Expendable,
        )?;
        log::info!(target: LOG_TARGET, "rescued {} native units to {:?}", amount, to);
        Self::deposit_event(Event::RescueNativeCurrency { to, amount });
        Ok(())
    }

    pub(crate) fn do_rescue_asset(
        ctx: &CallContext<T::AccountId>,
        asset: T::AssetId,
        to: T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_role(&ctx.caller, Role::Compliance)?;
        Self::ensure_not_paused()?;

        let value: AssetBalanceOf<T> = amount.try_into().map_err(|_| Error::<T>::Overflow)?;
        let held = <T::Assets as fungibles::Inspect<T::AccountId>>::reducible_balance(
            asset.clone(),
            &ctx.this,
            Preservation::Expendable,
            Fortitude::Polite,
        );
        ensure!(value <= held, Error::<T>::InsufficientHeldBalance);

        <T::Assets as fungibles::Mutate<T::AccountId>>::transfer(
            asset.clone(),
            &ctx.this,
            &to,
            value,
            Preservation::Expendable,
        )?;
        log::info!(target: LOG_TARGET, "rescued {} of asset {:?} to {:?}", amount, asset, to);
        Self::deposit_event(Event::RescueAsset { asset, to, amount });
        Ok(())
    }
}
