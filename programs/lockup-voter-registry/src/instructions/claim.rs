use crate::cpi_instructions;
use crate::events::ClaimEvent;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct Claim<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    // checking the PDA address it just an extra precaution,
    // the other constraints must be exhaustive
    #[account(
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_bump(),
        constraint = voter.load()?.get_registrar() == registrar.key(),
        constraint = voter.load()?.get_voter_authority() == voter_authority.key(),
    )]
    pub voter: AccountLoader<'info, Voter>,
    pub voter_authority: Signer<'info>,

    /// CHECK: checked against the registrar
    pub reward_pool: UncheckedAccount<'info>,

    pub reward_mint: Box<Account<'info, Mint>>,

    /// CHECK: the reward pool's vault, checked in the rewards contract
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    /// CHECK: mining PDA will be checked in the rewards contract
    #[account(
        mut,
        seeds = [b"mining", voter_authority.key().as_ref(), reward_pool.key().as_ref()],
        seeds::program = rewards_program.key(),
        bump,
    )]
    pub deposit_mining: UncheckedAccount<'info>,

    #[account(
        mut,
        token::mint = reward_mint,
    )]
    pub user_reward_token_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Claims the rewards accrued by the voter authority's mining account into
/// `user_reward_token_account`.
pub fn claim(ctx: Context<Claim>) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    registrar.check_rewards_accounts(
        &ctx.accounts.rewards_program.key(),
        &ctx.accounts.reward_pool.key(),
    )?;

    let amount = cpi_instructions::claim(
        ctx.accounts.rewards_program.to_account_info(),
        ctx.accounts.reward_pool.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.deposit_mining.to_account_info(),
        ctx.accounts.voter_authority.to_account_info(),
        ctx.accounts.registrar.to_account_info(),
        ctx.accounts.user_reward_token_account.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        registrar_seeds!(registrar),
    )?;

    msg!("Claimed {} reward tokens", amount);

    emit!(ClaimEvent {
        voter: ctx.accounts.voter_authority.key(),
        amount,
    });

    Ok(())
}
