use crate::cpi_instructions;
use crate::state::*;
use anchor_lang::prelude::*;
use std::mem::size_of;
use std::ops::DerefMut;

#[derive(Accounts)]
pub struct CreateVoter<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    #[account(
        init,
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter_authority.key().as_ref()],
        bump,
        payer = payer,
        space = 8 + size_of::<Voter>(),
    )]
    pub voter: AccountLoader<'info, Voter>,

    /// The authority controling the voter. Must be the same as the
    /// `governing_token_owner` in the token owner record used with
    /// spl-governance.
    pub voter_authority: Signer<'info>,

    /// The voter weight record is the account that will be shown to spl-governance
    /// to prove how much vote weight the voter has. See update_voter_weight_record.
    #[account(
        init,
        seeds = [registrar.key().as_ref(), b"voter-weight-record".as_ref(), voter_authority.key().as_ref()],
        bump,
        payer = payer,
        space = size_of::<VoterWeightRecord>(),
    )]
    pub voter_weight_record: Box<Account<'info, VoterWeightRecord>>,

    /// CHECK: mining PDA will be checked in the rewards contract
    /// PDA(["mining", voter_authority, reward_pool], rewards_program)
    #[account(
        mut,
        seeds = [b"mining", voter_authority.key().as_ref(), reward_pool.key().as_ref()],
        seeds::program = rewards_program.key(),
        bump,
    )]
    pub deposit_mining: UncheckedAccount<'info>,

    /// CHECK: checked against the registrar
    #[account(mut)]
    pub reward_pool: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Creates a new voter account. There can only be a single voter per
/// voter_authority.
///
/// The user must register with spl-governance using the same voter_authority.
/// Their token owner record will be required for withdrawing funds later.
///
/// A mining account for the voter authority is opened in the reward pool.
pub fn create_voter(
    ctx: Context<CreateVoter>,
    voter_bump: u8,
    voter_weight_record_bump: u8,
) -> Result<()> {
    require_eq!(voter_bump, ctx.bumps.voter);
    require_eq!(voter_weight_record_bump, ctx.bumps.voter_weight_record);

    let registrar = &ctx.accounts.registrar.load()?;
    registrar.check_rewards_accounts(
        &ctx.accounts.rewards_program.key(),
        &ctx.accounts.reward_pool.key(),
    )?;
    let voter_authority = ctx.accounts.voter_authority.key();

    {
        let voter = &mut ctx.accounts.voter.load_init()?;
        (*voter.deref_mut()) = Voter::new(
            voter_authority,
            ctx.accounts.registrar.key(),
            voter_bump,
            voter_weight_record_bump,
        );
    }

    let voter_weight_record = &mut ctx.accounts.voter_weight_record;
    voter_weight_record.account_discriminator =
        spl_governance_addin_api::voter_weight::VoterWeightRecord::ACCOUNT_DISCRIMINATOR;
    voter_weight_record.realm = registrar.realm;
    voter_weight_record.governing_token_mint = registrar.realm_governing_token_mint;
    voter_weight_record.governing_token_owner = voter_authority;

    cpi_instructions::initialize_mining(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        ctx.accounts.deposit_mining.to_account_info(),
        ctx.accounts.payer.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        &voter_authority,
    )?;

    Ok(())
}
