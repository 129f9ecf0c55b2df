use crate::error::*;
use crate::state::lockup::{Lockup, LockupKind};
use crate::state::registrar::VotingMintConfig;
use anchor_lang::prelude::*;
use std::cmp::min;
use std::convert::TryFrom;

/// Bookkeeping for a single deposit for a given mint and lockup schedule.
#[zero_copy(unsafe)]
#[derive(Default, Debug, PartialEq)]
pub struct DepositEntry {
    // Locked state.
    lockup: Lockup,

    /// Owner of the mining account credited with this deposit's stake in
    /// the rewards ledger. Defaults to the voter authority.
    delegate: Pubkey,

    /// Amount in deposited, in native currency. Withdraws of vested tokens
    /// directly reduce this amount.
    ///
    /// This directly tracks the total amount added by the user. They may
    /// never withdraw more than this amount.
    amount_deposited_native: u64,

    /// Amount in locked when the lockup began, in native currency.
    ///
    /// Vesting is resolved on every deposit and withdraw, which keeps this
    /// value at or below amount_deposited_native.
    ///
    /// This value is needed to compute the amount that vests each peroid,
    /// which should not change due to withdraws.
    amount_initially_locked_native: u64,

    /// The last time the delegate was changed.
    delegate_last_update_ts: i64,

    // Points to the VotingMintConfig this deposit uses.
    voting_mint_config_idx: u8,

    // True if the deposit entry is being used.
    is_used: bool,

    reserved: [u8; 6],
}
const_assert!(std::mem::size_of::<DepositEntry>() == 32 + 32 + 3 * 8 + 1 + 1 + 6);
const_assert!(std::mem::size_of::<DepositEntry>() % 8 == 0);

/// impl: factory function and getters
impl DepositEntry {
    pub fn new(
        lockup: Lockup,
        voting_mint_config_idx: u8,
        delegate: Pubkey,
        curr_ts: i64,
    ) -> DepositEntry {
        DepositEntry {
            lockup,
            delegate,
            amount_deposited_native: 0,
            amount_initially_locked_native: 0,
            delegate_last_update_ts: curr_ts,
            voting_mint_config_idx,
            is_used: true,
            reserved: [0; 6],
        }
    }

    #[inline(always)]
    pub fn get_lockup(&self) -> Lockup {
        self.lockup
    }

    #[inline(always)]
    pub fn get_delegate(&self) -> Pubkey {
        self.delegate
    }

    #[inline(always)]
    pub fn get_amount_deposited_native(&self) -> u64 {
        self.amount_deposited_native
    }

    #[inline(always)]
    pub fn get_amount_initially_locked_native(&self) -> u64 {
        self.amount_initially_locked_native
    }

    #[inline(always)]
    pub fn get_voting_mint_config_idx(&self) -> u8 {
        self.voting_mint_config_idx
    }

    #[inline(always)]
    pub fn get_delegate_last_update_ts(&self) -> i64 {
        self.delegate_last_update_ts
    }

    #[inline(always)]
    pub fn is_used(&self) -> bool {
        self.is_used
    }

    /// Whether the rewards ledger tracks this deposit as staked.
    #[inline(always)]
    pub fn is_staked(&self) -> bool {
        self.is_used && self.lockup.kind != LockupKind::None
    }
}

impl DepositEntry {
    /// Resets the slot. Only empty deposits whose lockup is over may be
    /// closed. Constant lockups never end, an empty one may always be closed.
    pub fn close(&mut self, curr_ts: i64) -> Result<()> {
        require!(self.is_used, VsrError::UnusedDepositEntryIndex);
        require_eq!(
            self.amount_deposited_native,
            0,
            VsrError::VotingTokenNonZero
        );
        require!(
            self.lockup.kind == LockupKind::Constant || self.lockup.expired(curr_ts),
            VsrError::DepositStillLocked
        );

        *self = DepositEntry::default();
        Ok(())
    }

    /// Funds an empty locked entry with `amount` tokens taken from an
    /// unlocked entry of the same voter. A lockup that already started is
    /// restarted at curr_ts with its full duration.
    pub fn stake(&mut self, curr_ts: i64, amount: u64) -> Result<()> {
        require!(self.is_used, VsrError::UnusedDepositEntryIndex);
        require!(
            self.lockup.kind != LockupKind::None,
            VsrError::InvalidLockupKind
        );
        require_eq!(
            self.amount_deposited_native,
            0,
            VsrError::DepositEntryNotEmpty
        );

        self.lockup.restart(curr_ts)?;
        self.amount_deposited_native = amount;
        self.amount_initially_locked_native = amount;
        self.delegate_last_update_ts = curr_ts;
        Ok(())
    }

    /// Moves vested tokens out of the locked base and drops vesting periods
    /// that lie in the past.
    pub fn resolve_vesting(&mut self, curr_ts: i64) -> Result<()> {
        let vested_amount = self.vested(curr_ts)?;
        self.amount_initially_locked_native = self
            .amount_initially_locked_native
            .checked_sub(vested_amount)
            .ok_or_else(|| error!(VsrError::InternalProgramError))?;
        self.lockup.remove_past_periods(curr_ts)
    }

    /// Adds tokens. While the lockup is in force they join the locked base,
    /// otherwise they are immediately withdrawable.
    pub fn deposit(&mut self, curr_ts: i64, amount: u64) -> Result<()> {
        require!(self.is_used, VsrError::UnusedDepositEntryIndex);

        self.resolve_vesting(curr_ts)?;

        if !self.lockup.expired(curr_ts) {
            self.amount_initially_locked_native = self
                .amount_initially_locked_native
                .checked_add(amount)
                .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        }
        self.amount_deposited_native = self
            .amount_deposited_native
            .checked_add(amount)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        Ok(())
    }

    /// Removes unlocked tokens.
    pub fn withdraw(&mut self, curr_ts: i64, amount: u64) -> Result<()> {
        require!(self.is_used, VsrError::UnusedDepositEntryIndex);

        let amount_unlocked = self.amount_unlocked(curr_ts)?;
        require_gte!(
            amount_unlocked,
            amount,
            VsrError::InsufficientUnlockedTokens
        );

        self.resolve_vesting(curr_ts)?;
        self.amount_deposited_native = self
            .amount_deposited_native
            .checked_sub(amount)
            .ok_or_else(|| error!(VsrError::InternalProgramError))?;
        self.amount_initially_locked_native = min(
            self.amount_initially_locked_native,
            self.amount_deposited_native,
        );
        Ok(())
    }

    /// Replaces the lockup with a new one starting at curr_ts. All deposited
    /// tokens, plus the additional amount, become locked under it.
    ///
    /// The new lockup may not be less strict or shorter than what is left
    /// of the current one.
    pub fn extend_lockup(&mut self, curr_ts: i64, lockup: Lockup, additional_amount: u64) -> Result<()> {
        require!(self.is_used, VsrError::UnusedDepositEntryIndex);
        require!(lockup.kind != LockupKind::None, VsrError::InvalidLockupKind);
        require_gte!(
            lockup.kind.strictness(),
            self.lockup.kind.strictness(),
            VsrError::InvalidLockupKind
        );
        require_gte!(
            lockup.seconds_left(curr_ts),
            self.lockup.seconds_left(curr_ts),
            VsrError::CannotShortenLockup
        );

        self.amount_deposited_native = self
            .amount_deposited_native
            .checked_add(additional_amount)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        self.amount_initially_locked_native = self.amount_deposited_native;
        self.lockup = lockup;
        Ok(())
    }

    pub fn change_delegate(&mut self, curr_ts: i64, delegate: Pubkey, min_interval_secs: u64) -> Result<()> {
        require!(self.is_staked(), VsrError::InvalidLockupKind);
        require_keys_neq!(self.delegate, delegate, VsrError::SameDelegate);

        let since_update = curr_ts.saturating_sub(self.delegate_last_update_ts);
        require_gte!(
            since_update,
            i64::try_from(min_interval_secs).map_err(|_| error!(VsrError::ArithmeticOverflow))?,
            VsrError::DelegateUpdateTooSoon
        );

        self.delegate = delegate;
        self.delegate_last_update_ts = curr_ts;
        Ok(())
    }

    /// # Voting Power Caclulation
    ///
    /// Returns the voting power for the deposit, giving locked tokens boosted
    /// voting power:
    ///
    ///    voting_power = baseline_vote_weight
    ///                   + locked_fraction * lockup_duration_factor * max_extra_lockup_vote_weight
    ///
    /// with
    ///   - locked_fraction = share of amount_initially_locked_native that is still
    ///     locked at curr_ts, see Lockup::locked_fraction()
    ///   - lockup_duration_factor = min(lockup_duration / lockup_saturation_secs, 1),
    ///     where lockup_duration is the full length of the schedule
    ///   - the VotingMintConfig providing the values for
    ///     baseline_vote_weight, max_extra_lockup_vote_weight, lockup_saturation_secs
    ///
    /// The duration factor is fixed when the schedule is set up, only the
    /// locked fraction changes over time.
    ///
    /// ## Cliff Lockup
    ///
    /// The cliff lockup allows one to lockup their tokens for a set period
    /// of time, unlocking all at once on a given date. The bonus stays flat
    /// until end_ts and is zero from then on.
    ///
    /// ## Constant Lockup
    ///
    /// Never expires, so the bonus never decays.
    ///
    /// ## Linear Vesting Lockup
    ///
    /// The bonus drops by one tranche at every period boundary, following the
    /// vested amount.
    ///
    pub fn voting_power(&self, voting_mint_config: &VotingMintConfig, curr_ts: i64) -> Result<u64> {
        let (baseline_vote_weight, locked_vote_weight) =
            self.voting_power_parts(voting_mint_config, curr_ts)?;
        baseline_vote_weight
            .checked_add(locked_vote_weight)
            .ok_or_else(|| error!(VsrError::VoterWeightOverflow))
    }

    /// The (baseline, lockup bonus) split of the deposit's voting power.
    pub fn voting_power_parts(
        &self,
        voting_mint_config: &VotingMintConfig,
        curr_ts: i64,
    ) -> Result<(u64, u64)> {
        let baseline_vote_weight =
            voting_mint_config.baseline_vote_weight(self.amount_deposited_native)?;
        let max_locked_vote_weight =
            voting_mint_config.max_extra_lockup_vote_weight(self.amount_initially_locked_native)?;
        let locked_vote_weight = self.voting_power_locked(
            curr_ts,
            max_locked_vote_weight,
            voting_mint_config.lockup_saturation_secs,
        )?;
        require_gte!(
            max_locked_vote_weight,
            locked_vote_weight,
            VsrError::InternalErrorBadLockupVoteWeight
        );
        Ok((baseline_vote_weight, locked_vote_weight))
    }

    /// Vote power contribution from locked funds only.
    pub fn voting_power_locked(
        &self,
        curr_ts: i64,
        max_locked_vote_weight: u64,
        lockup_saturation_secs: u64,
    ) -> Result<u64> {
        if self.lockup.kind == LockupKind::None
            || self.lockup.expired(curr_ts)
            || max_locked_vote_weight == 0
        {
            return Ok(0);
        }
        require_gt!(
            lockup_saturation_secs,
            0,
            VsrError::LockupSaturationMustBePositive
        );

        let (locked_numerator, locked_denominator) = self.lockup.locked_fraction(curr_ts)?;
        let duration_secs = min(self.lockup.duration_secs(), lockup_saturation_secs);

        let compute = || -> Option<u64> {
            let denominator =
                (locked_denominator as u128).checked_mul(lockup_saturation_secs as u128)?;
            u64::try_from(
                (max_locked_vote_weight as u128)
                    .checked_mul(locked_numerator as u128)?
                    .checked_mul(duration_secs as u128)?
                    .checked_div(denominator)?,
            )
            .ok()
        };
        compute().ok_or_else(|| error!(VsrError::VoterWeightOverflow))
    }

    /// Returns the amount of unlocked tokens for this deposit--in native units
    /// of the original token amount (not scaled by the exchange rate).
    pub fn vested(&self, curr_ts: i64) -> Result<u64> {
        if self.lockup.expired(curr_ts) {
            return Ok(self.amount_initially_locked_native);
        }
        if self.lockup.kind.is_vesting() {
            self.vested_linearly(curr_ts)
        } else {
            Ok(0)
        }
    }

    fn vested_linearly(&self, curr_ts: i64) -> Result<u64> {
        let period_current = self.lockup.period_current(curr_ts)?;
        let periods_total = self.lockup.periods_total()?;
        if period_current == 0 {
            return Ok(0);
        }
        if period_current >= periods_total {
            return Ok(self.amount_initially_locked_native);
        }
        let vested = (self.amount_initially_locked_native as u128)
            .checked_mul(period_current as u128)
            .and_then(|v| v.checked_div(periods_total as u128))
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        Ok(vested)
    }

    /// Returns native tokens still locked.
    #[inline(always)]
    pub fn amount_locked(&self, curr_ts: i64) -> Result<u64> {
        self.amount_initially_locked_native
            .checked_sub(self.vested(curr_ts)?)
            .ok_or_else(|| error!(VsrError::InternalProgramError))
    }

    /// Returns native tokens that are unlocked given current vesting
    /// and previous withdraws.
    #[inline(always)]
    pub fn amount_unlocked(&self, curr_ts: i64) -> Result<u64> {
        Ok(self
            .amount_deposited_native
            .saturating_sub(self.amount_locked(curr_ts)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::registrar::tests::rate;
    use crate::{LockupKind::*, *};

    fn entry(kind: LockupKind, curr_ts: i64, start_ts: i64, periods: u32) -> Result<DepositEntry> {
        Ok(DepositEntry::new(
            Lockup::new_from_periods(kind, curr_ts, start_ts, periods)?,
            0,
            Pubkey::new_unique(),
            curr_ts,
        ))
    }

    #[test]
    pub fn close_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let end = 1 + 2 * day;
        let mut entry = entry(Daily, 0, 1, 2)?;
        entry.deposit(0, 10)?;

        assert_eq!(entry.close(end), Err(error!(VsrError::VotingTokenNonZero)) as Result<()>);

        entry.amount_deposited_native = 0;
        assert_eq!(entry.close(end - 1), Err(error!(VsrError::DepositStillLocked)) as Result<()>);
        entry.close(end)?;
        assert!(!entry.is_used());
        assert_eq!(entry, DepositEntry::default());

        // closing again should fail
        assert_eq!(entry.close(end), Err(error!(VsrError::UnusedDepositEntryIndex)) as Result<()>);

        Ok(())
    }

    #[test]
    pub fn close_empty_locked_entry_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;

        // an empty cliff stays until its lockup is over
        let mut cliff = entry(Cliff, 0, 0, 30)?;
        assert_eq!(cliff.close(0), Err(error!(VsrError::DepositStillLocked)) as Result<()>);
        assert_eq!(
            cliff.close(15 * day),
            Err(error!(VsrError::DepositStillLocked)) as Result<()>
        );
        cliff.close(30 * day)?;
        assert!(!cliff.is_used());

        // constant lockups never expire, an empty one closes at any time
        let mut constant = entry(Constant, 0, 0, 10)?;
        constant.close(day)?;
        assert!(!constant.is_used());

        Ok(())
    }

    #[test]
    pub fn deposit_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let lockup_start = 1; // arbitrary point
        let mut entry = entry(Daily, 0, lockup_start, 4)?;
        let lockup = entry.lockup;

        // deposit at time 0
        entry.deposit(0, 10_000)?;

        assert_eq!(entry.amount_deposited_native, 10_000);
        assert_eq!(entry.amount_initially_locked_native, 10_000);
        assert_eq!(entry.lockup, lockup);

        // deposit at time 1
        entry.deposit(1, 10_000)?;
        assert_eq!(entry.amount_deposited_native, 20_000);
        assert_eq!(entry.amount_initially_locked_native, 20_000);
        assert_eq!(entry.lockup, lockup);

        // deposit at lock_start + day, a quarter has vested
        entry.deposit(lockup_start + day, 10_000)?;
        assert_eq!(entry.amount_deposited_native, 30_000);
        assert_eq!(entry.amount_initially_locked_native, 25_000);
        assert_ne!(entry.lockup, lockup);
        assert_eq!(entry.lockup.kind, Daily);
        assert_eq!(entry.lockup.start_ts(), lockup_start + day);
        assert_eq!(entry.lockup.end_ts(), lockup.end_ts());
        assert_eq!(entry.amount_unlocked(lockup_start + day)?, 5_000);

        // close, then deposit again
        entry.amount_deposited_native = 0;
        let lockup_end = lockup_start + 4 * day;
        entry.close(lockup_end)?;
        assert_eq!(
            entry.deposit(lockup_end, 10_000),
            Err(error!(VsrError::UnusedDepositEntryIndex)) as Result<()>
        );

        Ok(())
    }

    #[test]
    pub fn deposit_into_expired_lockup_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Cliff, 0, 0, 1)?;
        entry.deposit(0, 1_000)?;
        assert_eq!(entry.amount_locked(0)?, 1_000);

        entry.deposit(2 * day, 500)?;
        assert_eq!(entry.amount_deposited_native, 1_500);
        assert_eq!(entry.amount_initially_locked_native, 0);
        assert_eq!(entry.amount_unlocked(2 * day)?, 1_500);

        let mut entry = self::entry(None, 0, 0, 0)?;
        entry.deposit(0, 700)?;
        assert_eq!(entry.amount_initially_locked_native, 0);
        assert_eq!(entry.amount_unlocked(0)?, 700);

        Ok(())
    }

    #[test]
    pub fn far_future_lockup_start_test() -> Result<()> {
        // Check that voting power stays correct even if the lockup is very far in the
        // future, or at least more than lockup_saturation_secs in the future.
        let day = SECS_PER_DAY as i64;
        let saturation: i64 = 5 * day;
        let lockup_start = 10_000_000_000; // arbitrary point
        let mut entry = entry(Daily, lockup_start, lockup_start, 2)?;
        entry.deposit(lockup_start, 10_000)?;
        let voting_mint_config = rate(Pubkey::new_unique(), 1, 1, saturation as u64);

        let baseline_vote_weight =
            voting_mint_config.baseline_vote_weight(entry.amount_deposited_native)?;
        assert_eq!(baseline_vote_weight, 10_000);
        let max_locked_vote_weight = voting_mint_config
            .max_extra_lockup_vote_weight(entry.amount_initially_locked_native)?;
        assert_eq!(max_locked_vote_weight, 10_000);

        // The timestamp 100_000 is very far before the lockup_start timestamp.
        // The two day schedule is below saturation: 10_000 * 2/5.
        let withdrawable = entry.amount_unlocked(100_000)?;
        assert_eq!(withdrawable, 0);
        assert_eq!(entry.voting_power(&voting_mint_config, 100_000)?, 14_000);
        assert_eq!(entry.voting_power(&voting_mint_config, lockup_start - saturation)?, 14_000);
        assert_eq!(entry.voting_power(&voting_mint_config, lockup_start + day - 1)?, 14_000);

        // one of two tranches left
        assert_eq!(entry.voting_power(&voting_mint_config, lockup_start + day)?, 12_000);
        assert_eq!(entry.voting_power(&voting_mint_config, lockup_start + 2 * day)?, 10_000);

        Ok(())
    }

    #[test]
    pub fn cliff_voting_power_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Cliff, 0, 0, 30)?;
        entry.deposit(0, 50)?;
        // bonus only, saturated at 30 days
        let config = rate(Pubkey::new_unique(), 0, 2, 30 * SECS_PER_DAY);

        // flat until the cliff
        assert_eq!(entry.voting_power_parts(&config, 0)?, (0, 100));
        assert_eq!(entry.voting_power_parts(&config, 15 * day)?, (0, 100));
        assert_eq!(entry.voting_power_parts(&config, 30 * day - 1)?, (0, 100));
        assert_eq!(entry.voting_power_parts(&config, 30 * day)?, (0, 0));
        assert_eq!(entry.voting_power(&config, 31 * day)?, 0);
        assert_eq!(entry.amount_unlocked(31 * day)?, 50);

        // a 30 day cliff earns half of a 60 day saturation
        let config = rate(Pubkey::new_unique(), 0, 2, 60 * SECS_PER_DAY);
        assert_eq!(entry.voting_power(&config, 0)?, 50);
        assert_eq!(entry.voting_power(&config, 30 * day - 1)?, 50);
        assert_eq!(entry.voting_power(&config, 30 * day)?, 0);

        // with a short saturation the bonus is capped at the max
        let config = rate(Pubkey::new_unique(), 1, 1, SECS_PER_DAY);
        assert_eq!(entry.voting_power(&config, 0)?, 100);
        assert_eq!(entry.voting_power(&config, 29 * day)?, 100);
        assert_eq!(entry.voting_power(&config, 30 * day)?, 50);

        Ok(())
    }

    #[test]
    pub fn constant_voting_power_test() -> Result<()> {
        let month = SECS_PER_MONTH as i64;
        let mut entry = entry(Constant, 0, 0, 10)?;
        entry.deposit(0, 1_000)?;
        let config = rate(Pubkey::new_unique(), 1, 1, 20 * SECS_PER_DAY);

        // 10 of 20 saturation days
        for ts in [0, month, 100 * month] {
            assert_eq!(entry.voting_power_parts(&config, ts)?, (1_000, 500));
            assert_eq!(entry.amount_locked(ts)?, 1_000);
        }

        Ok(())
    }

    #[test]
    pub fn monthly_vesting_voting_power_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let t0 = 1_000;
        let mut entry = entry(Monthly, t0, t0, 12)?;
        entry.deposit(t0, 120)?;
        // saturated by the twelve month schedule
        let config = rate(Pubkey::new_unique(), 0, 1, 365 * SECS_PER_DAY);
        assert_eq!(entry.get_lockup().duration_secs(), 365 * SECS_PER_DAY);

        assert_eq!(entry.voting_power(&config, t0)?, 120);

        let at = t0 + 45 * day;
        assert_eq!(entry.vested(at)?, 10);
        assert_eq!(entry.amount_locked(at)?, 110);
        assert_eq!(entry.amount_unlocked(at)?, 10);
        assert_eq!(entry.get_lockup().locked_fraction(at)?, (11, 12));
        // eleven of twelve tranches are still locked
        assert_eq!(entry.voting_power(&config, at)?, 110);

        Ok(())
    }

    #[test]
    pub fn voting_power_decays_monotonically_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Daily, 0, 0, 30)?;
        entry.deposit(0, 1_000_000)?;
        let config = rate(Pubkey::new_unique(), 1, 3, 10 * SECS_PER_DAY);

        let mut last = entry.voting_power(&config, -day)?;
        for hour in 0..(32 * 24) {
            let power = entry.voting_power(&config, hour * 3_600)?;
            assert!(power <= last);
            assert!(power >= 1_000_000);
            last = power;
        }
        assert_eq!(last, 1_000_000);

        Ok(())
    }

    #[test]
    pub fn daily_vested_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let lockup_start = 1; // arbitrary point
        let mut entry = entry(Daily, 0, lockup_start, 2)?;
        entry.deposit(lockup_start, 10_000)?;

        let mut vested = entry.vested(lockup_start - 1)?;
        let mut amount_locked = entry.amount_locked(lockup_start - 1)?;
        let mut amount_unlocked = entry.amount_unlocked(lockup_start - 1)?;
        assert_eq!(vested, 0);
        assert_eq!(amount_locked, 10_000);
        assert_eq!(amount_unlocked, 0);

        vested = entry.vested(lockup_start + day - 1)?;
        amount_locked = entry.amount_locked(lockup_start + day - 1)?;
        amount_unlocked = entry.amount_unlocked(lockup_start + day - 1)?;
        assert_eq!(vested, 0);
        assert_eq!(amount_locked, 10_000);
        assert_eq!(amount_unlocked, 0);

        vested = entry.vested(lockup_start + day)?;
        amount_locked = entry.amount_locked(lockup_start + day)?;
        amount_unlocked = entry.amount_unlocked(lockup_start + day)?;
        assert_eq!(vested, 5_000);
        assert_eq!(amount_locked, 5_000);
        assert_eq!(amount_unlocked, 5_000);

        vested = entry.vested(lockup_start + day + day)?;
        amount_locked = entry.amount_locked(lockup_start + day + day)?;
        amount_unlocked = entry.amount_unlocked(lockup_start + day + day)?;
        assert_eq!(vested, 10_000);
        assert_eq!(amount_locked, 0);
        assert_eq!(amount_unlocked, 10_000);

        Ok(())
    }

    #[test]
    pub fn constant_vested_test() -> Result<()> {
        let month = SECS_PER_MONTH as i64;
        let lockup_start = 1; // arbitrary point
        let mut entry = entry(Constant, 0, lockup_start, 30)?;
        entry.deposit(lockup_start, 10_000)?;

        for ts in [lockup_start - 1, lockup_start + month - 1, lockup_start + month + 1] {
            assert_eq!(entry.vested(ts)?, 0);
            assert_eq!(entry.amount_locked(ts)?, 10_000);
            assert_eq!(entry.amount_unlocked(ts)?, 0);
        }

        Ok(())
    }

    #[test]
    pub fn withdraw_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let lockup_start = 0; // arbitrary point
        let mut entry = entry(Daily, lockup_start, lockup_start, 4)?;
        entry.deposit(0, 10_000)?;

        let withdraw_at = lockup_start + day;
        assert_eq!(entry.amount_unlocked(withdraw_at)?, 2_500);

        // First withdrawal: amount 1000, the vested quarter leaves the locked base
        entry.withdraw(withdraw_at, 1_000)?;
        assert_eq!(entry.amount_deposited_native, 9_000);
        assert_eq!(entry.amount_initially_locked_native, 7_500);
        assert_eq!(entry.amount_unlocked(withdraw_at)?, 1_500);
        assert_eq!(entry.lockup.start_ts(), withdraw_at);

        // Second withdrawal: amount 1000
        entry.withdraw(withdraw_at, 1_000)?;
        assert_eq!(entry.amount_deposited_native, 8_000);
        assert_eq!(entry.amount_initially_locked_native, 7_500);
        assert_eq!(entry.amount_unlocked(withdraw_at)?, 500);

        // Third withdrawal: amount 1000
        assert_eq!(
            entry.withdraw(withdraw_at, 1_000),
            Err(error!(VsrError::InsufficientUnlockedTokens)) as Result<()>
        );

        // Fourth withdrawal: amount 500
        entry.withdraw(withdraw_at, 500)?;
        assert_eq!(entry.amount_deposited_native, 7_500);
        assert_eq!(entry.amount_unlocked(withdraw_at)?, 0);

        // the remaining tranches keep their size
        assert_eq!(entry.amount_unlocked(withdraw_at + day)?, 2_500);
        assert_eq!(entry.amount_unlocked(withdraw_at + 3 * day)?, 7_500);

        Ok(())
    }

    #[test]
    pub fn withdraw_keeps_locked_within_deposited_test() -> Result<()> {
        let month = SECS_PER_MONTH as i64;
        let mut entry = entry(Monthly, 0, 0, 12)?;
        entry.deposit(0, 120)?;

        for k in 1..=12i64 {
            let ts = k * month + 17;
            let unlocked = entry.amount_unlocked(ts)?;
            assert_eq!(unlocked, 10);
            entry.withdraw(ts, unlocked)?;
            assert!(entry.amount_initially_locked_native <= entry.amount_deposited_native);
            assert_eq!(entry.amount_deposited_native, 120 - 10 * k as u64);
        }
        assert_eq!(entry.amount_deposited_native, 0);
        entry.close(12 * month + 17)?;

        Ok(())
    }

    #[test]
    pub fn no_lockup_round_trip_test() -> Result<()> {
        let mut entry = entry(None, 5, 5, 0)?;
        entry.deposit(5, 4_321)?;
        let unlocked = entry.amount_unlocked(5)?;
        assert_eq!(unlocked, 4_321);
        entry.withdraw(5, unlocked)?;
        assert_eq!(entry.amount_deposited_native, 0);
        entry.close(5)?;
        Ok(())
    }

    #[test]
    pub fn extend_lockup_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Cliff, 0, 0, 10)?;
        entry.deposit(0, 1_000)?;

        // shorter than what is left
        let shorter = Lockup::new_from_periods(Cliff, 2 * day, 2 * day, 7)?;
        assert_eq!(
            entry.extend_lockup(2 * day, shorter, 0),
            Err(error!(VsrError::CannotShortenLockup)) as Result<()>
        );
        // less strict
        let vesting = Lockup::new_from_periods(Monthly, 2 * day, 2 * day, 12)?;
        assert_eq!(
            entry.extend_lockup(2 * day, vesting, 0),
            Err(error!(VsrError::InvalidLockupKind)) as Result<()>
        );
        // no lockup at all
        let none = Lockup::new_from_periods(None, 2 * day, 2 * day, 0)?;
        assert_eq!(
            entry.extend_lockup(2 * day, none, 0),
            Err(error!(VsrError::InvalidLockupKind)) as Result<()>
        );

        // cliff to constant with the same remaining time
        let constant = Lockup::new_from_periods(Constant, 2 * day, 2 * day, 8)?;
        entry.extend_lockup(2 * day, constant, 500)?;
        assert_eq!(entry.amount_deposited_native, 1_500);
        assert_eq!(entry.amount_initially_locked_native, 1_500);
        assert_eq!(entry.lockup.kind, Constant);

        // and back out of constant into a cliff
        let cliff = Lockup::new_from_periods(Cliff, 100 * day, 100 * day, 8)?;
        entry.extend_lockup(100 * day, cliff, 0)?;
        assert_eq!(entry.amount_unlocked(108 * day)?, 1_500);

        Ok(())
    }

    #[test]
    pub fn extend_expired_lockup_relocks_everything_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Daily, 0, 0, 2)?;
        entry.deposit(0, 1_000)?;

        let lockup = Lockup::new_from_periods(Daily, 5 * day, 5 * day, 1)?;
        entry.extend_lockup(5 * day, lockup, 0)?;
        assert_eq!(entry.amount_locked(5 * day)?, 1_000);
        assert_eq!(entry.amount_unlocked(6 * day)?, 1_000);

        Ok(())
    }

    #[test]
    pub fn change_delegate_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let owner = Pubkey::new_unique();
        let mut entry = DepositEntry::new(Lockup::new_from_periods(Cliff, 0, 0, 10)?, 0, owner, 0);
        let delegate = Pubkey::new_unique();

        assert_eq!(
            entry.change_delegate(day, delegate, 5 * SECS_PER_DAY),
            Err(error!(VsrError::DelegateUpdateTooSoon)) as Result<()>
        );
        assert_eq!(
            entry.change_delegate(5 * day, owner, 5 * SECS_PER_DAY),
            Err(error!(VsrError::SameDelegate)) as Result<()>
        );

        entry.change_delegate(5 * day, delegate, 5 * SECS_PER_DAY)?;
        assert_eq!(entry.get_delegate(), delegate);
        assert_eq!(entry.get_delegate_last_update_ts(), 5 * day);

        let mut unstaked = DepositEntry::new(Lockup::default(), 0, owner, 0);
        assert_eq!(
            unstaked.change_delegate(10 * day, delegate, 0),
            Err(error!(VsrError::InvalidLockupKind)) as Result<()>
        );

        Ok(())
    }

    #[test]
    pub fn stake_test() -> Result<()> {
        let day = SECS_PER_DAY as i64;
        let mut entry = entry(Cliff, 0, 0, 10)?;

        // a started lockup runs its full length again from the stake time
        entry.stake(5 * day, 300)?;
        assert_eq!(entry.lockup.start_ts(), 5 * day);
        assert_eq!(entry.lockup.end_ts(), Some(15 * day));
        assert_eq!(entry.lockup.duration_secs(), 10 * SECS_PER_DAY);
        assert_eq!(entry.amount_deposited_native, 300);
        assert_eq!(entry.amount_initially_locked_native, 300);
        assert_eq!(entry.amount_locked(15 * day - 1)?, 300);
        assert_eq!(entry.amount_unlocked(15 * day)?, 300);

        assert_eq!(
            entry.stake(6 * day, 100),
            Err(error!(VsrError::DepositEntryNotEmpty)) as Result<()>
        );

        // a lockup in the future keeps its start
        let mut pending = self::entry(Cliff, 0, 10 * day, 10)?;
        pending.stake(day, 100)?;
        assert_eq!(pending.lockup.start_ts(), 10 * day);
        assert_eq!(pending.lockup.end_ts(), Some(20 * day));

        let mut unlocked = self::entry(None, 0, 0, 0)?;
        assert_eq!(
            unlocked.stake(0, 100),
            Err(error!(VsrError::InvalidLockupKind)) as Result<()>
        );

        Ok(())
    }
}
