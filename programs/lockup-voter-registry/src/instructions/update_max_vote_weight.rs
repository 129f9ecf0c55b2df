use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

// Remaining accounts should all the token mints that have registered
// exchange rates.
#[derive(Accounts)]
pub struct UpdateMaxVoteWeight<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    #[account(
        mut,
        seeds = [registrar.load()?.realm.as_ref(), b"max-voter-weight-record".as_ref(), registrar.load()?.realm_governing_token_mint.as_ref()],
        bump = registrar.load()?.max_voter_weight_record_bump,
        constraint = max_voter_weight_record.realm == registrar.load()?.realm,
        constraint = max_voter_weight_record.governing_token_mint == registrar.load()?.realm_governing_token_mint,
    )]
    pub max_voter_weight_record: Account<'info, MaxVoterWeightRecord>,
}

/// Calculates the max vote weight for the registry. This is a function
/// of the total supply of all exchange rate mints, converted into a
/// common currency with a common number of decimals.
///
/// Note that this method is only safe to use if the cumulative supply for
/// all tokens fits into a u64 *after* converting into common decimals, as
/// defined by the voting mints' `digit_shift`.
pub fn update_max_vote_weight<'info>(
    ctx: Context<'_, '_, 'info, 'info, UpdateMaxVoteWeight<'info>>,
) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    let supplies = mint_supplies(ctx.remaining_accounts)?;

    let record = &mut ctx.accounts.max_voter_weight_record;
    record.max_voter_weight = registrar.max_vote_weight(&supplies)?;
    record.max_voter_weight_expiry = Some(Clock::get()?.slot);

    Ok(())
}

/// Reads the supply of every mint account in `accounts`.
pub fn mint_supplies<'info>(accounts: &'info [AccountInfo<'info>]) -> Result<Vec<(Pubkey, u64)>> {
    accounts
        .iter()
        .map(|info| {
            let mint = Account::<Mint>::try_from(info)?;
            Ok((info.key(), mint.supply))
        })
        .collect()
}
