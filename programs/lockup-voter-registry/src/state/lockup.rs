use crate::error::*;
use anchor_lang::prelude::*;
use std::convert::TryFrom;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 86_400;

/// Seconds in one month.
pub const SECS_PER_MONTH: u64 = 365 * SECS_PER_DAY / 12;

/// Maximum acceptable number of lockup periods.
///
/// In the linear vesting voting power computation, a factor like
/// `periods^2 * period_secs` is used. With the current setting
/// that would be 36500^2 * SECS_PER_MONTH << 2^64.
///
/// This setting limits the maximum lockup duration for lockup methods
/// with daily periods to 200 years.
pub const MAX_LOCKUP_PERIODS: u32 = 365 * 200;

/// Lockups cannot start further than this in the future.
pub const MAX_LOCKUP_IN_FUTURE_SECS: i64 = 100 * 365 * 24 * 60 * 60;

#[zero_copy(unsafe)]
#[derive(AnchorSerialize, AnchorDeserialize, Debug, PartialEq, Eq)]
pub struct Lockup {
    /// Start of the lockup.
    ///
    /// Note, that if start_ts is in the future, the funds are nevertheless
    /// locked up!
    ///
    /// Similarly vote power computations don't care about start_ts and always
    /// assume the full amount of the lockup is in effect.
    pub(crate) start_ts: i64,

    /// End of the lockup.
    ///
    /// For Constant lockups this only encodes the duration as
    /// `end_ts - start_ts`; the lockup never ends.
    pub(crate) end_ts: i64,

    /// Type of lockup.
    pub kind: LockupKind,

    pub(crate) reserved: [u8; 15],
}
const_assert!(std::mem::size_of::<Lockup>() == 2 * 8 + 1 + 15);
const_assert!(std::mem::size_of::<Lockup>() % 8 == 0);

impl Default for Lockup {
    fn default() -> Self {
        Self {
            start_ts: 0,
            end_ts: 0,
            kind: LockupKind::None,
            reserved: [0; 15],
        }
    }
}

impl Lockup {
    /// Create lockup for a given period
    pub fn new_from_periods(
        kind: LockupKind,
        curr_ts: i64,
        start_ts: i64,
        periods: u32,
    ) -> Result<Self> {
        require_gt!(
            curr_ts
                .checked_add(MAX_LOCKUP_IN_FUTURE_SECS)
                .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?,
            start_ts,
            VsrError::DepositStartTooFarInFuture
        );
        require_gte!(MAX_LOCKUP_PERIODS, periods, VsrError::InvalidLockupPeriod);
        if kind != LockupKind::None {
            require_gt!(periods, 0, VsrError::InvalidLockupPeriod);
        }

        let duration = (periods as u64)
            .checked_mul(kind.unit_secs())
            .and_then(|secs| i64::try_from(secs).ok())
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        Ok(Self {
            kind,
            start_ts,
            end_ts: start_ts
                .checked_add(duration)
                .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?,
            reserved: [0; 15],
        })
    }

    #[inline(always)]
    pub fn start_ts(&self) -> i64 {
        self.start_ts
    }

    /// The end of the lockup, or None if it never ends.
    pub fn end_ts(&self) -> Option<i64> {
        match self.kind {
            LockupKind::Constant => None,
            _ => Some(self.end_ts),
        }
    }

    /// True when the lockup is finished.
    pub fn expired(&self, curr_ts: i64) -> bool {
        self.seconds_left(curr_ts) == 0
    }

    /// Number of seconds left in the lockup.
    /// May be more than end_ts-start_ts if curr_ts < start_ts.
    pub fn seconds_left(&self, mut curr_ts: i64) -> u64 {
        if self.kind == LockupKind::Constant {
            curr_ts = self.start_ts;
        }
        if curr_ts >= self.end_ts {
            0
        } else {
            (self.end_ts - curr_ts) as u64
        }
    }

    /// Number of seconds since the start of the lockup.
    pub fn seconds_since_start(&self, curr_ts: i64) -> u64 {
        if curr_ts <= self.start_ts {
            0
        } else {
            (curr_ts - self.start_ts) as u64
        }
    }

    /// Full length of the lockup, as reported to the rewards ledger.
    pub fn duration_secs(&self) -> u64 {
        self.seconds_left(self.start_ts)
    }

    /// Number of full periods that have passed since start, capped at
    /// the total number of periods.
    pub fn period_current(&self, curr_ts: i64) -> Result<u64> {
        let period_secs = self.kind.period_secs();
        if period_secs == 0 {
            return Ok(0);
        }
        let elapsed = self.seconds_since_start(curr_ts) / period_secs;
        Ok(elapsed.min(self.periods_total()?))
    }

    /// Number of periods left, counting a partially elapsed period as a
    /// full one.
    pub fn periods_left(&self, curr_ts: i64) -> Result<u64> {
        let period_secs = self.kind.period_secs();
        if period_secs == 0 {
            return Ok(0);
        }
        if curr_ts < self.start_ts {
            return self.periods_total();
        }
        self.seconds_left(curr_ts)
            .checked_add(period_secs - 1)
            .map(|secs| secs / period_secs)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))
    }

    /// Total number of vesting periods. Non-vesting lockups count as a
    /// single tranche.
    pub fn periods_total(&self) -> Result<u64> {
        let period_secs = self.kind.period_secs();
        if period_secs == 0 {
            return Ok(1);
        }

        let lockup_secs = self.seconds_left(self.start_ts);
        require_eq!(
            lockup_secs % period_secs,
            0,
            VsrError::InvalidLockupPeriod
        );
        Ok(lockup_secs / period_secs)
    }

    /// Share of the locked base that is still locked at curr_ts, as a
    /// (numerator, denominator) pair.
    pub fn locked_fraction(&self, curr_ts: i64) -> Result<(u64, u64)> {
        match self.kind {
            LockupKind::None => Ok((0, 1)),
            LockupKind::Constant => Ok((1, 1)),
            LockupKind::Cliff => Ok((u64::from(!self.expired(curr_ts)), 1)),
            LockupKind::Daily | LockupKind::Monthly => {
                let total = self.periods_total()?;
                require_gt!(total, 0, VsrError::InvalidLockupPeriod);
                Ok((total - self.period_current(curr_ts)?, total))
            }
        }
    }

    /// Moves a lockup that already started to begin at curr_ts, keeping its
    /// duration. Lockups starting in the future are left alone.
    pub fn restart(&mut self, curr_ts: i64) -> Result<()> {
        if curr_ts <= self.start_ts {
            return Ok(());
        }
        let duration = i64::try_from(self.duration_secs())
            .map_err(|_| error!(VsrError::ArithmeticOverflow))?;
        self.start_ts = curr_ts;
        self.end_ts = curr_ts
            .checked_add(duration)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        Ok(())
    }

    /// Drop vesting periods that are fully in the past, keeping end_ts.
    pub fn remove_past_periods(&mut self, curr_ts: i64) -> Result<()> {
        let periods = self.period_current(curr_ts)?;
        let shift = periods
            .checked_mul(self.kind.period_secs())
            .and_then(|secs| i64::try_from(secs).ok())
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        self.start_ts = self
            .start_ts
            .checked_add(shift)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
        require_gte!(self.end_ts, self.start_ts, VsrError::InternalProgramError);
        Ok(())
    }
}

#[repr(u8)]
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LockupKind {
    /// No lockup, tokens can be withdrawn as long as not engaged in a proposal.
    #[default]
    None,

    /// Lock up for a number of days, where a linear fraction vests each day.
    Daily,

    /// Lock up for a number of months, where a linear fraction vests each month.
    Monthly,

    /// Lock up for a number of days, no vesting.
    Cliff,

    /// Lock up permanently. The number of days specified becomes the minimum
    /// unlock period when the deposit (or a part of it) is changed to Cliff.
    Constant,
}

impl LockupKind {
    /// The lockup length is specified by passing the number of lockup periods
    /// to create_deposit_entry. This describes a period's length.
    ///
    /// For vesting lockups, the period length is also the vesting period.
    pub fn unit_secs(&self) -> u64 {
        match self {
            LockupKind::None => 0,
            LockupKind::Daily => SECS_PER_DAY,
            LockupKind::Monthly => SECS_PER_MONTH,
            LockupKind::Cliff => SECS_PER_DAY,
            LockupKind::Constant => SECS_PER_DAY,
        }
    }

    /// Length of a vesting period, zero for kinds that don't vest.
    pub fn period_secs(&self) -> u64 {
        if self.is_vesting() {
            self.unit_secs()
        } else {
            0
        }
    }

    /// Lockups cannot decrease in strictness
    pub fn strictness(&self) -> u8 {
        match self {
            LockupKind::None => 0,
            LockupKind::Daily => 1,
            LockupKind::Monthly => 2,
            LockupKind::Cliff => 3, // can freely move between Cliff and Constant
            LockupKind::Constant => 3,
        }
    }

    pub fn is_vesting(&self) -> bool {
        matches!(self, LockupKind::Daily | LockupKind::Monthly)
    }
}
