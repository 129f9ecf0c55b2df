use crate::error::*;
use crate::events::*;
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct LogVoterInfo<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    #[account(
        constraint = voter.load()?.get_registrar() == registrar.key()
    )]
    pub voter: AccountLoader<'info, Voter>,
}

/// A no-effect instruction that logs information about the voter and deposits.
///
/// With the current implementation, the log is limited to the deposit
/// entries in `[deposit_entry_begin, deposit_entry_begin + deposit_entry_count)`.
pub fn log_voter_info(
    ctx: Context<LogVoterInfo>,
    deposit_entry_begin: u8,
    deposit_entry_count: u8,
) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    let voter = &ctx.accounts.voter.load()?;
    let curr_ts = registrar.clock_unix_timestamp()?;
    let deposit_entry_begin = deposit_entry_begin as usize;
    let deposit_entry_count = deposit_entry_count as usize;

    msg!("voter");
    emit!(VoterInfo {
        voting_power: voter.weight(curr_ts, registrar)?,
        voting_power_baseline: voter.weight_baseline(registrar)?,
    });

    msg!("deposit_entries");
    for (index, d_entry) in voter
        .get_deposits()
        .iter()
        .enumerate()
        .skip(deposit_entry_begin)
        .take(deposit_entry_count)
    {
        if !d_entry.is_used() {
            continue;
        }
        let lockup = &d_entry.get_lockup();
        let mint_idx = d_entry.get_voting_mint_config_idx();
        let voting_mint_config = registrar.voting_mint_config(mint_idx)?;
        let baseline_vote_weight =
            voting_mint_config.baseline_vote_weight(d_entry.get_amount_deposited_native())?;
        let amount_locked = d_entry.amount_locked(curr_ts)?;

        let locking = if amount_locked == 0 {
            None
        } else {
            Some(LockingInfo {
                amount: amount_locked,
                end_timestamp: lockup.end_ts().map(|ts| ts as u64),
                vesting: vesting_info(d_entry, curr_ts)?,
            })
        };

        emit!(DepositEntryInfo {
            deposit_entry_index: index as u8,
            voting_mint_config_index: mint_idx,
            unlocked: d_entry.amount_unlocked(curr_ts)?,
            voting_power: d_entry.voting_power(voting_mint_config, curr_ts)?,
            voting_power_baseline: baseline_vote_weight,
            locking,
        });
    }

    Ok(())
}

fn vesting_info(d_entry: &DepositEntry, curr_ts: i64) -> Result<Option<VestingInfo>> {
    let lockup = d_entry.get_lockup();
    if !lockup.kind.is_vesting() {
        return Ok(None);
    }
    let periods_total = lockup.periods_total()?;
    let period_secs = lockup.kind.period_secs();
    let next_period = lockup
        .period_current(curr_ts)?
        .checked_add(1)
        .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;
    let next_timestamp = next_period
        .checked_mul(period_secs)
        .and_then(|secs| secs.checked_add(lockup.start_ts() as u64))
        .ok_or_else(|| error!(VsrError::ArithmeticOverflow))?;

    Ok(Some(VestingInfo {
        rate: d_entry
            .get_amount_initially_locked_native()
            .checked_div(periods_total)
            .ok_or_else(|| error!(VsrError::InternalProgramError))?,
        next_timestamp,
    }))
}
