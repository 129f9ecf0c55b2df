use crate::cpi_instructions;
use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use spl_governance::state::realm;
use std::mem::size_of;

#[derive(Accounts)]
pub struct CreateRegistrar<'info> {
    /// The voting registrar. There can only be a single registrar
    /// per governance realm and governing mint.
    #[account(
        init,
        seeds = [realm.key().as_ref(), b"registrar".as_ref(), realm_governing_token_mint.key().as_ref()],
        bump,
        payer = payer,
        space = 8 + size_of::<Registrar>()
    )]
    pub registrar: AccountLoader<'info, Registrar>,

    #[account(
        init,
        seeds = [realm.key().as_ref(), b"max-voter-weight-record".as_ref(), realm_governing_token_mint.key().as_ref()],
        bump,
        payer = payer,
        space = size_of::<MaxVoterWeightRecord>(),
    )]
    pub max_voter_weight_record: Account<'info, MaxVoterWeightRecord>,

    /// An spl-governance realm
    ///
    /// realm is validated in the instruction:
    /// - realm is owned by the governance_program_id
    /// - realm_governing_token_mint must be the community or council mint
    /// - realm_authority is realm.authority
    /// CHECK:
    pub realm: UncheckedAccount<'info>,

    /// The program id of the spl-governance program the realm belongs to.
    /// CHECK:
    pub governance_program_id: UncheckedAccount<'info>,
    /// Either the realm community mint or the council mint.
    pub realm_governing_token_mint: Account<'info, Mint>,
    pub realm_authority: Signer<'info>,

    /// The reward pool is created by the rewards program, with the
    /// registrar as its deposit authority.
    /// CHECK: initialized by cpi
    #[account(mut)]
    pub reward_pool: UncheckedAccount<'info>,

    /// CHECK: initialized by cpi
    #[account(mut)]
    pub reward_vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Creates a new voting registrar.
///
/// `registrar_bump` is the bump of the registrar PDA. The reward pool
/// created alongside forwards `fill_authority` and
/// `distribution_authority` to the rewards program.
///
/// To use the registrar, call ConfigVotingMint to register token mints
/// that may be used for voting.
pub fn create_registrar(
    ctx: Context<CreateRegistrar>,
    registrar_bump: u8,
    fill_authority: Pubkey,
    distribution_authority: Pubkey,
) -> Result<()> {
    // Verify that "realm_authority" is the expected authority on "realm"
    // and that the mint matches one of the realm mints too.
    let realm = realm::get_realm_data_for_governing_token_mint(
        &ctx.accounts.governance_program_id.key(),
        &ctx.accounts.realm.to_account_info(),
        &ctx.accounts.realm_governing_token_mint.key(),
    )?;
    require_keys_eq!(
        realm.authority.ok_or_else(|| error!(VsrError::InvalidRealmAuthority))?,
        ctx.accounts.realm_authority.key(),
        VsrError::InvalidRealmAuthority
    );

    require_eq!(registrar_bump, ctx.bumps.registrar);

    {
        let registrar = &mut ctx.accounts.registrar.load_init()?;
        registrar.bump = registrar_bump;
        registrar.max_voter_weight_record_bump = ctx.bumps.max_voter_weight_record;
        registrar.governance_program_id = ctx.accounts.governance_program_id.key();
        registrar.realm = ctx.accounts.realm.key();
        registrar.realm_governing_token_mint = ctx.accounts.realm_governing_token_mint.key();
        registrar.realm_authority = ctx.accounts.realm_authority.key();
        registrar.rewards_program = ctx.accounts.rewards_program.key();
        registrar.reward_pool = ctx.accounts.reward_pool.key();
        registrar.fill_authority = fill_authority;
        registrar.distribution_authority = distribution_authority;
        registrar.time_offset = 0;
    }

    // Initialize MaxVoterWeightRecord, no mints are configured yet
    let max_voter_weight_record = &mut ctx.accounts.max_voter_weight_record;
    max_voter_weight_record.account_discriminator =
        spl_governance_addin_api::max_voter_weight::MaxVoterWeightRecord::ACCOUNT_DISCRIMINATOR;
    max_voter_weight_record.realm = ctx.accounts.realm.key();
    max_voter_weight_record.governing_token_mint = ctx.accounts.realm_governing_token_mint.key();
    max_voter_weight_record.max_voter_weight = 0;
    max_voter_weight_record.max_voter_weight_expiry = Some(Clock::get()?.slot);

    cpi_instructions::initialize_pool(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        ctx.accounts.realm_governing_token_mint.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.payer.to_account_info(),
        ctx.accounts.registrar.to_account_info(),
        ctx.accounts.rent.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        fill_authority,
        distribution_authority,
        &[
            ctx.accounts.realm.key().as_ref(),
            b"registrar".as_ref(),
            ctx.accounts.realm_governing_token_mint.key().as_ref(),
            &[registrar_bump],
        ],
    )?;

    msg!(
        "Created registrar for realm {} with reward pool {}",
        ctx.accounts.realm.key(),
        ctx.accounts.reward_pool.key()
    );

    Ok(())
}
