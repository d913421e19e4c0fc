//! Initializer guard and balance-moving operations.
//!
//! Every operation runs all of its checks before the first storage write, so a failure
//! leaves the ledger untouched even outside a transactional layer.

use crate::*;

impl<T: Config> Pallet<T> {
    /// One-time setup of identity and roles. Fails forever after the first success,
    /// whichever logic version is active.
    pub(crate) fn do_initialize(setup: TokenSetup<T::AccountId>) -> DispatchResult {
        ensure!(!Initialized::<T>::get(), Error::<T>::AlreadyInitialized);
        ensure!(setup.compliance != setup.operator, Error::<T>::RolesOverlap);

        let name: TokenNameOf = setup.name.try_into().map_err(|_| Error::<T>::BadMetadata)?;
        let symbol: TokenSymbolOf = setup.symbol.try_into().map_err(|_| Error::<T>::BadMetadata)?;
        let currency: CurrencyCodeOf =
            setup.currency.try_into().map_err(|_| Error::<T>::BadMetadata)?;

        TokenName::<T>::put(name);
        TokenSymbol::<T>::put(symbol);
        TokenCurrency::<T>::put(currency);
        Decimals::<T>::put(setup.decimals);
        Compliance::<T>::put(&setup.compliance);
        Operator::<T>::put(&setup.operator);
        BurnAccount::<T>::put(&setup.burn_account);
        WhitelistEnabled::<T>::put(setup.whitelist_enabled);
        Initialized::<T>::put(true);

        log::info!(
            target: LOG_TARGET,
            "ledger initialized (compliance {:?}, operator {:?})",
            setup.compliance,
            setup.operator,
        );
        Self::deposit_event(Event::Initialized {
            compliance: setup.compliance,
            operator: setup.operator,
            burn_account: setup.burn_account,
        });
        Ok(())
    }

    pub(crate) fn do_mint(who: &T::AccountId, to: T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_role(who, Role::Operator)?;
        Self::ensure_not_paused()?;
        Self::ensure_whitelisted(&to)?;

        // An overflowing sum is necessarily above any reserve.
        let supply = TotalSupply::<T>::get().checked_add(amount).ok_or(Error::<T>::ReserveLimit)?;
        ensure!(supply <= ReserveBalance::<T>::get(), Error::<T>::ReserveLimit);
        let balance = Balances::<T>::get(&to).checked_add(amount).ok_or(Error::<T>::Overflow)?;

        TotalSupply::<T>::put(supply);
        Balances::<T>::insert(&to, balance);
        Self::deposit_event(Event::Minted { to, amount });
        Ok(())
    }

    /// Redeems `amount` from the burn account.
    pub(crate) fn do_burn(who: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_role(who, Role::Operator)?;
        Self::ensure_not_paused()?;

        let from = BurnAccount::<T>::get().ok_or(Error::<T>::NotInitialized)?;
        let balance = Balances::<T>::get(&from);
        ensure!(balance >= amount, Error::<T>::BurnExceedsBalance);
        let supply = TotalSupply::<T>::get().checked_sub(amount).ok_or(Error::<T>::Overflow)?;

        Balances::<T>::insert(&from, balance - amount);
        TotalSupply::<T>::put(supply);
        Self::deposit_event(Event::Burned { from, amount });
        Ok(())
    }

    pub(crate) fn do_transfer(who: &T::AccountId, to: T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_not_paused()?;
        Self::ensure_not_frozen(who)?;
        Self::ensure_whitelisted(who)?;
        Self::ensure_can_receive(&to)?;

        Self::move_balance(who, &to, amount)?;
        Self::deposit_event(Event::Transferred { from: who.clone(), to, amount });
        Ok(())
    }

    /// Spends `who`'s allowance over `owner`. An allowance of `u128::MAX` is never
    /// decremented.
    pub(crate) fn do_transfer_from(
        who: &T::AccountId,
        owner: T::AccountId,
        to: T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_not_paused()?;
        Self::ensure_not_frozen(&owner)?;
        Self::ensure_not_frozen(who)?;
        Self::ensure_whitelisted(&owner)?;
        Self::ensure_can_receive(&to)?;

        let allowance = Allowances::<T>::get(&owner, who);
        ensure!(allowance >= amount, Error::<T>::InsufficientAllowance);

        Self::move_balance(&owner, &to, amount)?;
        if allowance != u128::MAX {
            let remaining = allowance - amount;
            Allowances::<T>::insert(&owner, who, remaining);
            Self::deposit_event(Event::Approval {
                owner: owner.clone(),
                spender: who.clone(),
                amount: remaining,
            });
        }
        Self::deposit_event(Event::Transferred { from: owner, to, amount });
        Ok(())
    }

    /// Regulatory override: skips allowance, whitelist and freeze checks, but not the pause.
    pub(crate) fn do_seize_transfer_from(
        who: &T::AccountId,
        from: T::AccountId,
        to: T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Self::move_balance(&from, &to, amount)?;
        log::info!(target: LOG_TARGET, "seized {} from {:?} to {:?}", amount, from, to);
        Self::deposit_event(Event::Transferred { from: from.clone(), to: to.clone(), amount });
        Self::deposit_event(Event::Seized { from, to, amount });
        Ok(())
    }

    pub(crate) fn do_approve(who: &T::AccountId, spender: T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_allowance_parties(who, &spender)?;
        Self::set_allowance(who, spender, amount);
        Ok(())
    }

    pub(crate) fn do_increase_allowance(
        who: &T::AccountId,
        spender: T::AccountId,
        delta: u128,
    ) -> DispatchResult {
        Self::ensure_allowance_parties(who, &spender)?;
        let amount = Allowances::<T>::get(who, &spender)
            .checked_add(delta)
            .ok_or(Error::<T>::Overflow)?;
        Self::set_allowance(who, spender, amount);
        Ok(())
    }

    pub(crate) fn do_decrease_allowance(
        who: &T::AccountId,
        spender: T::AccountId,
        delta: u128,
    ) -> DispatchResult {
        Self::ensure_allowance_parties(who, &spender)?;
        let amount = Allowances::<T>::get(who, &spender)
            .checked_sub(delta)
            .ok_or(Error::<T>::AllowanceBelowZero)?;
        Self::set_allowance(who, spender, amount);
        Ok(())
    }

    fn ensure_allowance_parties(owner: &T::AccountId, spender: &T::AccountId) -> DispatchResult {
        Self::ensure_not_paused()?;
        Self::ensure_whitelisted(owner)?;
        Self::ensure_whitelisted(spender)
    }

    fn set_allowance(owner: &T::AccountId, spender: T::AccountId, amount: u128) {
        Allowances::<T>::insert(owner, &spender, amount);
        Self::deposit_event(Event::Approval { owner: owner.clone(), spender, amount });
    }

    /// Debits `from` and credits `to`. Supply is untouched.
    fn move_balance(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        let from_balance = Balances::<T>::get(from);
        ensure!(from_balance >= amount, Error::<T>::InsufficientBalance);
        if from == to {
            return Ok(());
        }
        let to_balance = Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;

        Balances::<T>::insert(from, from_balance - amount);
        Balances::<T>::insert(to, to_balance);
        Ok(())
    }

    /// Checks that balances sum to the supply and the supply stays within the reserve.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
        let supply = TotalSupply::<T>::get();
        let sum = Balances::<T>::iter_values()
            .try_fold(0u128, |acc, balance| acc.checked_add(balance))
            .ok_or(sp_runtime::TryRuntimeError::Other("balance sum overflows"))?;

        ensure!(sum == supply, sp_runtime::TryRuntimeError::Other("balances do not sum to total supply"));
        ensure!(
            supply <= ReserveBalance::<T>::get(),
            sp_runtime::TryRuntimeError::Other("total supply exceeds reserve balance")
        );
        Ok(())
    }
}
