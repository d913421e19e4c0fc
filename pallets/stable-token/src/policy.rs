//! Role, pause, whitelist and freeze guards, and the compliance/operator
//! administration built on them.

use crate::*;

/// Privileged roles of the ledger. The two never share an operation or an account.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum Role {
    Compliance,
    Operator,
}

impl<T: Config> Pallet<T> {
    /// Whether `who` currently holds `role`.
    pub fn has_role(who: &T::AccountId, role: Role) -> bool {
        let holder = match role {
            Role::Compliance => Compliance::<T>::get(),
            Role::Operator => Operator::<T>::get(),
        };
        holder.as_ref() == Some(who)
    }

    /// First check of every role-gated operation.
    pub(crate) fn ensure_role(who: &T::AccountId, role: Role) -> DispatchResult {
        if Self::has_role(who, role) {
            return Ok(());
        }
        Err(match role {
            Role::Compliance => Error::<T>::NotCompliance,
            Role::Operator => Error::<T>::NotOperator,
        }
        .into())
    }

    pub(crate) fn ensure_not_paused() -> DispatchResult {
        ensure!(!Paused::<T>::get(), Error::<T>::Paused);
        Ok(())
    }

    /// No-op while whitelisting is disabled.
    pub(crate) fn ensure_whitelisted(who: &T::AccountId) -> DispatchResult {
        if WhitelistEnabled::<T>::get() {
            ensure!(Whitelist::<T>::get(who), Error::<T>::NotWhitelisted);
        }
        Ok(())
    }

    /// Recipients must be whitelisted, except the burn account which receives redemptions.
    pub(crate) fn ensure_can_receive(to: &T::AccountId) -> DispatchResult {
        if BurnAccount::<T>::get().as_ref() == Some(to) {
            return Ok(());
        }
        Self::ensure_whitelisted(to)
    }

    pub(crate) fn ensure_not_frozen(who: &T::AccountId) -> DispatchResult {
        ensure!(!Frozen::<T>::get(who), Error::<T>::AccountFrozen);
        Ok(())
    }

    pub(crate) fn do_pause(who: T::AccountId) -> DispatchResult {
        Self::ensure_role(&who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Paused::<T>::put(true);
        log::info!(target: LOG_TARGET, "ledger paused by {:?}", who);
        Self::deposit_event(Event::Paused { account: who });
        Ok(())
    }

    /// The one compliance operation that runs while paused.
    pub(crate) fn do_unpause(who: T::AccountId) -> DispatchResult {
        Self::ensure_role(&who, Role::Compliance)?;
        ensure!(Paused::<T>::get(), Error::<T>::NotPaused);

        Paused::<T>::put(false);
        log::info!(target: LOG_TARGET, "ledger unpaused by {:?}", who);
        Self::deposit_event(Event::Unpaused { account: who });
        Ok(())
    }

    pub(crate) fn do_freeze(who: &T::AccountId, account: T::AccountId) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Frozen::<T>::insert(&account, true);
        Self::deposit_event(Event::Frozen { account });
        Ok(())
    }

    pub(crate) fn do_unfreeze(who: &T::AccountId, account: T::AccountId) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Frozen::<T>::remove(&account);
        Self::deposit_event(Event::Unfrozen { account });
        Ok(())
    }

    pub(crate) fn do_whitelist(who: &T::AccountId, account: T::AccountId) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Whitelist::<T>::insert(&account, true);
        Self::deposit_event(Event::Whitelisted { account });
        Ok(())
    }

    pub(crate) fn do_unwhitelist(who: &T::AccountId, account: T::AccountId) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        Whitelist::<T>::remove(&account);
        Self::deposit_event(Event::RemovedFromWhitelist { account });
        Ok(())
    }

    pub(crate) fn do_set_whitelisting(who: &T::AccountId, enabled: bool) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        WhitelistEnabled::<T>::put(enabled);
        Self::deposit_event(if enabled {
            Event::WhitelistingEnabled
        } else {
            Event::WhitelistingDisabled
        });
        Ok(())
    }

    pub(crate) fn do_update_reserve_balance(who: &T::AccountId, reserve: u128) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;
        ensure!(reserve >= TotalSupply::<T>::get(), Error::<T>::ReserveBelowSupply);

        let previous = ReserveBalance::<T>::get();
        ReserveBalance::<T>::put(reserve);
        log::debug!(target: LOG_TARGET, "reserve balance {} -> {}", previous, reserve);
        Self::deposit_event(Event::ReserveBalanceUpdated { previous, reserve });
        Ok(())
    }

    pub(crate) fn do_update_compliance(who: T::AccountId, compliance: T::AccountId) -> DispatchResult {
        Self::ensure_role(&who, Role::Compliance)?;
        Self::ensure_not_paused()?;
        ensure!(!Self::has_role(&compliance, Role::Operator), Error::<T>::RolesOverlap);

        Compliance::<T>::put(&compliance);
        log::info!(target: LOG_TARGET, "compliance role moved from {:?} to {:?}", who, compliance);
        Self::deposit_event(Event::ComplianceUpdated { previous: who, compliance });
        Ok(())
    }

    pub(crate) fn do_update_operator(who: T::AccountId, operator: T::AccountId) -> DispatchResult {
        Self::ensure_role(&who, Role::Operator)?;
        Self::ensure_not_paused()?;
        ensure!(!Self::has_role(&operator, Role::Compliance), Error::<T>::RolesOverlap);

        Operator::<T>::put(&operator);
        log::info!(target: LOG_TARGET, "operator role moved from {:?} to {:?}", who, operator);
        Self::deposit_event(Event::OperatorUpdated { previous: who, operator });
        Ok(())
    }

    pub(crate) fn do_update_burn_account(who: &T::AccountId, account: T::AccountId) -> DispatchResult {
        Self::ensure_role(who, Role::Compliance)?;
        Self::ensure_not_paused()?;

        BurnAccount::<T>::put(&account);
        Self::deposit_event(Event::BurnAccountUpdated { account });
        Ok(())
    }
}
