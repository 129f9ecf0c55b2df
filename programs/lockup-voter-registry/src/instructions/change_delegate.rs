use crate::cpi_instructions;
use crate::events::ChangeDelegateEvent;
use crate::state::*;
use anchor_lang::prelude::*;

/// Minimum time between two delegate changes of a deposit entry.
pub const DELEGATE_UPDATE_DIFF_THRESHOLD_SECS: u64 = 5 * SECS_PER_DAY;

#[derive(Accounts)]
pub struct ChangeDelegate<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    // checking the PDA address it just an extra precaution,
    // the other constraints must be exhaustive
    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_bump(),
        constraint = voter.load()?.get_registrar() == registrar.key(),
        constraint = voter.load()?.get_voter_authority() == voter_authority.key(),
    )]
    pub voter: AccountLoader<'info, Voter>,
    pub voter_authority: Signer<'info>,

    /// The wallet whose mining account is credited from now on.
    /// CHECK: any address may be a delegate
    pub delegate: UncheckedAccount<'info>,

    /// CHECK: checked against the registrar
    #[account(mut)]
    pub reward_pool: UncheckedAccount<'info>,

    /// CHECK: mining PDA will be checked in the rewards contract
    #[account(
        mut,
        seeds = [b"mining", voter_authority.key().as_ref(), reward_pool.key().as_ref()],
        seeds::program = rewards_program.key(),
        bump,
    )]
    pub deposit_mining: UncheckedAccount<'info>,

    /// CHECK: must be the mining account of the current delegate
    #[account(mut)]
    pub old_delegate_mining: UncheckedAccount<'info>,

    /// CHECK: must be the mining account of the new delegate
    #[account(mut)]
    pub new_delegate_mining: UncheckedAccount<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,
}

/// Points a locked deposit entry's stake at another delegate's mining
/// account.
///
/// A delegate can be changed at most once every
/// DELEGATE_UPDATE_DIFF_THRESHOLD_SECS.
pub fn change_delegate(ctx: Context<ChangeDelegate>, deposit_entry_index: u8) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    registrar.check_rewards_accounts(
        &ctx.accounts.rewards_program.key(),
        &ctx.accounts.reward_pool.key(),
    )?;
    let curr_ts = registrar.clock_unix_timestamp()?;
    let new_delegate = ctx.accounts.delegate.key();

    let (old_delegate, staked_amount) = {
        let voter = &mut ctx.accounts.voter.load_mut()?;
        let d_entry = voter.active_deposit_mut(deposit_entry_index)?;
        let old_delegate = d_entry.get_delegate();
        d_entry.change_delegate(curr_ts, new_delegate, DELEGATE_UPDATE_DIFF_THRESHOLD_SECS)?;
        (old_delegate, d_entry.get_amount_deposited_native())
    };

    cpi_instructions::check_mining_address(
        &ctx.accounts.old_delegate_mining.key(),
        &registrar.rewards_program,
        &old_delegate,
        &registrar.reward_pool,
    )?;
    cpi_instructions::check_mining_address(
        &ctx.accounts.new_delegate_mining.key(),
        &registrar.rewards_program,
        &new_delegate,
        &registrar.reward_pool,
    )?;

    cpi_instructions::change_delegate(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        ctx.accounts.deposit_mining.to_account_info(),
        ctx.accounts.registrar.to_account_info(),
        ctx.accounts.voter_authority.to_account_info(),
        ctx.accounts.old_delegate_mining.to_account_info(),
        ctx.accounts.new_delegate_mining.to_account_info(),
        staked_amount,
        registrar_seeds!(registrar),
    )?;

    emit!(ChangeDelegateEvent {
        voter: ctx.accounts.voter_authority.key(),
        deposit_entry_index,
        old_delegate,
        new_delegate,
    });

    Ok(())
}
