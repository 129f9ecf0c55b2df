use crate::cpi_instructions;
use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount};
use bytemuck::bytes_of_mut;
use std::ops::DerefMut;

// Remaining accounts must be all the token accounts owned by voter that
// should be closed. They must be writable so that they can be closed and
// the sol required for rent can be sent back to the sol_destination.
#[derive(Accounts)]
pub struct CloseVoter<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    // checking the PDA address it just an extra precaution,
    // the other constraints must be exhaustive
    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_bump(),
        constraint = voter.load()?.get_registrar() == registrar.key(),
        constraint = voter.load()?.get_voter_authority() == voter_authority.key(),
        close = sol_destination
    )]
    pub voter: AccountLoader<'info, Voter>,

    // also, it's the owner of the mining account
    pub voter_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter-weight-record".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_weight_record_bump(),
        close = sol_destination
    )]
    pub voter_weight_record: Account<'info, VoterWeightRecord>,

    /// CHECK: mining PDA will be checked in the rewards contract
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
    /// CHECK: Destination may be any address.
    pub sol_destination: UncheckedAccount<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Closes the voter account (Optionally, also token vaults, as part of remaining_accounts),
/// allowing one to retrieve rent exemption SOL.
/// Only accounts with no remaining deposits can be closed.
pub fn close_voter<'info>(ctx: Context<'_, '_, 'info, 'info, CloseVoter<'info>>) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    registrar.check_rewards_accounts(
        &ctx.accounts.rewards_program.key(),
        &ctx.accounts.reward_pool.key(),
    )?;

    {
        let voter = ctx.accounts.voter.load()?;
        require!(!voter.has_deposits(), VsrError::VotingTokenNonZero);

        for deposit_vault_info in ctx.remaining_accounts.iter() {
            let deposit_vault_ta = Account::<TokenAccount>::try_from(deposit_vault_info)?;
            registrar.voting_mint_config_index(deposit_vault_ta.mint)?;

            require_keys_eq!(
                deposit_vault_info.key(),
                get_associated_token_address(&ctx.accounts.voter.key(), &deposit_vault_ta.mint),
                VsrError::InvalidAuthority
            );
            require_keys_eq!(
                deposit_vault_ta.owner,
                ctx.accounts.voter.key(),
                VsrError::InvalidAuthority
            );
            require_eq!(deposit_vault_ta.amount, 0, VsrError::VaultTokenNonZero);

            // close vault
            let cpi_close_accounts = CloseAccount {
                account: deposit_vault_ta.to_account_info(),
                destination: ctx.accounts.sol_destination.to_account_info(),
                authority: ctx.accounts.voter.to_account_info(),
            };
            token::close_account(CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                cpi_close_accounts,
                &[voter_seeds!(voter)],
            ))?;
        }
    }

    {
        // zero out voter account to prevent reinit attacks
        let mut voter = ctx.accounts.voter.load_mut()?;
        let voter_bytes = bytes_of_mut(voter.deref_mut());
        voter_bytes.fill(0);
    }

    cpi_instructions::close_mining(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.deposit_mining.to_account_info(),
        ctx.accounts.voter_authority.to_account_info(),
        ctx.accounts.sol_destination.to_account_info(),
        ctx.accounts.registrar.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        registrar_seeds!(registrar),
    )?;

    Ok(())
}
