use crate::error::*;
use crate::instructions::mint_supplies;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

// Remaining accounts must be all the token mints that have registered
// as voting mints, including the newly registered one.
#[derive(Accounts)]
pub struct ConfigureVotingMint<'info> {
    #[account(
        mut,
        constraint = registrar.load()?.realm_authority == realm_authority.key() @ VsrError::InvalidRealmAuthority,
    )]
    pub registrar: AccountLoader<'info, Registrar>,
    pub realm_authority: Signer<'info>,

    /// Token mint that is being configured.
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [registrar.load()?.realm.as_ref(), b"max-voter-weight-record".as_ref(), registrar.load()?.realm_governing_token_mint.as_ref()],
        bump = registrar.load()?.max_voter_weight_record_bump,
        constraint = max_voter_weight_record.realm == registrar.load()?.realm,
        constraint = max_voter_weight_record.governing_token_mint == registrar.load()?.realm_governing_token_mint,
    )]
    pub max_voter_weight_record: Account<'info, MaxVoterWeightRecord>,
}

/// Creates or updates a voting mint configuration.
///
/// * `idx`: index of the rate to be set
/// * `digit_shift`: how many digits to shift the native token amount, see below
/// * `baseline_vote_weight_scaled_factor`: vote weight factor for all funds in vault,
///   in units of 1/SCALED_FACTOR_BASE
/// * `max_extra_lockup_vote_weight_scaled_factor`: max extra weight for lockups,
///   in units of 1/SCALED_FACTOR_BASE
/// * `lockup_saturation_secs`: lockup duration at which the full vote weight
///   bonus is given to locked up deposits
/// * `grant_authority`: key allowed to call grant for this mint
///
/// This instruction can be called several times for the same mint and index to
/// change the voting mint configuration.
///
/// The vote weight for `amount` of native tokens will be
/// ```ignore
/// vote_weight =
///     amount * 10^(digit_shift)
///            * (baseline_vote_weight_scaled_factor/SCALED_FACTOR_BASE
///               + min(1, lockup_secs/lockup_saturation_secs)
///                 * max_extra_lockup_vote_weight_scaled_factor/SCALED_FACTOR_BASE
///              )
/// ```
///
/// Example: If you have token A with 6 decimals and token B with 9 decimals, you
/// could set up:
///    * A with digit_shift=0,  baseline=2e9, max_extra=0 (so A's voting power is
///      2 per native unit)
///    * B with digit_shift=-3, baseline=1e9, max_extra=1e9 (so B's voting power is
///      1 per 1000 native units, doubling for saturated lockups)
///
/// Note that the max vote weight, which is computed from the supplies of all
/// configured mints passed as remaining accounts, must fit into a u64.
#[allow(clippy::too_many_arguments)]
pub fn configure_voting_mint<'info>(
    ctx: Context<'_, '_, 'info, 'info, ConfigureVotingMint<'info>>,
    idx: u16,
    digit_shift: i8,
    baseline_vote_weight_scaled_factor: u64,
    max_extra_lockup_vote_weight_scaled_factor: u64,
    lockup_saturation_secs: u64,
    grant_authority: Option<Pubkey>,
) -> Result<()> {
    let registrar = &mut ctx.accounts.registrar.load_mut()?;
    let mint = ctx.accounts.mint.key();

    registrar.configure_voting_mint(
        idx,
        VotingMintConfig::new(
            mint,
            grant_authority,
            digit_shift,
            baseline_vote_weight_scaled_factor,
            max_extra_lockup_vote_weight_scaled_factor,
            lockup_saturation_secs,
        ),
    )?;

    let supplies = mint_supplies(ctx.remaining_accounts)?;

    // Check for overflow in vote weight
    let max_vote_weight = registrar.max_vote_weight(&supplies)?;

    let record = &mut ctx.accounts.max_voter_weight_record;
    record.max_voter_weight = max_vote_weight;
    record.max_voter_weight_expiry = Some(Clock::get()?.slot);

    msg!(
        "Configured voting mint {} at index {}, max vote weight {}",
        mint,
        idx,
        max_vote_weight
    );

    Ok(())
}
