use crate::cpi_instructions;
use crate::events::StakeEvent;
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Stake<'info> {
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
    /// The owner of the deposit and its mining account
    pub voter_authority: Signer<'info>,

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

    /// CHECK: must be the mining account of the target entry's delegate
    #[account(mut)]
    pub delegate_mining: UncheckedAccount<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,
}

/// Locks `amount` tokens of an unlocked deposit entry by moving them into an
/// empty locked entry of the same voter and mint.
///
/// The tokens stay in the vault. The target's lockup restarts now if it
/// already began, and the rewards ledger starts counting the stake.
///
/// `source_deposit_entry_index`: Index of the unlocked entry to take from.
/// `target_deposit_entry_index`: Index of the empty locked entry to fill.
/// `amount`: Number of native tokens to move.
pub fn stake(
    ctx: Context<Stake>,
    source_deposit_entry_index: u8,
    target_deposit_entry_index: u8,
    amount: u64,
) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    registrar.check_rewards_accounts(
        &ctx.accounts.rewards_program.key(),
        &ctx.accounts.reward_pool.key(),
    )?;
    let curr_ts = registrar.clock_unix_timestamp()?;

    let target = {
        let voter = &mut ctx.accounts.voter.load_mut()?;
        voter.stake(
            source_deposit_entry_index,
            target_deposit_entry_index,
            curr_ts,
            amount,
        )?
    };

    cpi_instructions::check_mining_address(
        &ctx.accounts.delegate_mining.key(),
        &registrar.rewards_program,
        &target.get_delegate(),
        &registrar.reward_pool,
    )?;

    let lockup = target.get_lockup();
    cpi_instructions::deposit_mining(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        ctx.accounts.deposit_mining.to_account_info(),
        ctx.accounts.registrar.to_account_info(),
        ctx.accounts.delegate_mining.to_account_info(),
        amount,
        lockup.duration_secs(),
        &ctx.accounts.voter_authority.key(),
        registrar_seeds!(registrar),
    )?;

    msg!(
        "Staked {} from deposit entry {} into deposit entry {} with lockup kind {:?}",
        amount,
        source_deposit_entry_index,
        target_deposit_entry_index,
        lockup.kind,
    );

    emit!(StakeEvent {
        voter: ctx.accounts.voter_authority.key(),
        source_deposit_entry_index,
        target_deposit_entry_index,
        amount,
    });

    Ok(())
}
