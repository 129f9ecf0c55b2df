use crate::events::CloseDepositEntryEvent;
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CloseDepositEntry<'info> {
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
}

/// Close an empty deposit entry, allowing it to be reused in the future.
///
/// Deposit entries can only be closed when they don't hold any tokens and
/// their lockup has ended. Empty constant lockups can always be closed.
pub fn close_deposit_entry(ctx: Context<CloseDepositEntry>, deposit_entry_index: u8) -> Result<()> {
    let curr_ts = ctx.accounts.registrar.load()?.clock_unix_timestamp()?;
    let voter = &mut ctx.accounts.voter.load_mut()?;
    voter
        .active_deposit_mut(deposit_entry_index)?
        .close(curr_ts)?;

    emit!(CloseDepositEntryEvent {
        voter: voter.get_voter_authority(),
        deposit_entry_index,
    });

    Ok(())
}
