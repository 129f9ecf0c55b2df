use crate::cpi_instructions;
use crate::error::*;
use crate::events::DepositEvent;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

#[derive(Accounts)]
pub struct Deposit<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    // checking the PDA address it just an extra precaution,
    // the other constraints must be exhaustive
    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter.load()?.get_voter_authority().key().as_ref()],
        bump = voter.load()?.get_voter_bump(),
        constraint = voter.load()?.get_registrar() == registrar.key(),
    )]
    pub voter: AccountLoader<'info, Voter>,

    #[account(
        mut,
        associated_token::authority = voter,
        associated_token::mint = deposit_token.mint,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = deposit_token.owner == deposit_authority.key(),
    )]
    pub deposit_token: Box<Account<'info, TokenAccount>>,
    pub deposit_authority: Signer<'info>,

    /// CHECK: checked against the registrar
    #[account(mut)]
    pub reward_pool: UncheckedAccount<'info>,

    /// CHECK: mining PDA will be checked in the rewards contract
    #[account(
        mut,
        seeds = [b"mining", voter.load()?.get_voter_authority().as_ref(), reward_pool.key().as_ref()],
        seeds::program = rewards_program.key(),
        bump,
    )]
    pub deposit_mining: UncheckedAccount<'info>,

    /// CHECK: must be the mining account of the deposit entry's delegate
    #[account(mut)]
    pub delegate_mining: UncheckedAccount<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Deposit<'info> {
    pub fn transfer_ctx(&self) -> CpiContext<'_, '_, '_, 'info, token::Transfer<'info>> {
        let program = self.token_program.to_account_info();
        let accounts = token::Transfer {
            from: self.deposit_token.to_account_info(),
            to: self.vault.to_account_info(),
            authority: self.deposit_authority.to_account_info(),
        };
        CpiContext::new(program, accounts)
    }
}

/// Adds tokens to a deposit entry.
///
/// Tokens will be transfered from deposit_token to vault using the deposit_authority.
///
/// The deposit entry must have been initialized with create_deposit_entry.
/// If the lockup is still in force the tokens become locked under it,
/// and locked entries are credited in the reward pool.
///
/// `deposit_entry_index`: Index of the deposit entry.
/// `amount`: Number of native tokens to transfer.
pub fn deposit(ctx: Context<Deposit>, deposit_entry_index: u8, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let registrar = &ctx.accounts.registrar.load()?;
    let curr_ts = registrar.clock_unix_timestamp()?;

    let (voter_authority, d_entry) = {
        let voter = &mut ctx.accounts.voter.load_mut()?;
        let voter_authority = voter.get_voter_authority();
        let d_entry = voter.active_deposit_mut(deposit_entry_index)?;

        // Get the exchange rate entry associated with this deposit.
        let mint_idx = registrar.voting_mint_config_index(ctx.accounts.deposit_token.mint)?;
        require_eq!(
            mint_idx,
            d_entry.get_voting_mint_config_idx() as usize,
            VsrError::InvalidMint
        );

        d_entry.deposit(curr_ts, amount)?;
        (voter_authority, *d_entry)
    };

    // Deposit tokens into the vault.
    token::transfer(ctx.accounts.transfer_ctx(), amount)?;

    if d_entry.is_staked() {
        registrar.check_rewards_accounts(
            &ctx.accounts.rewards_program.key(),
            &ctx.accounts.reward_pool.key(),
        )?;
        cpi_instructions::check_mining_address(
            &ctx.accounts.delegate_mining.key(),
            &registrar.rewards_program,
            &d_entry.get_delegate(),
            &registrar.reward_pool,
        )?;

        cpi_instructions::deposit_mining(
            ctx.accounts.rewards_program.to_account_info(),
            ctx.accounts.reward_pool.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            ctx.accounts.registrar.to_account_info(),
            ctx.accounts.delegate_mining.to_account_info(),
            amount,
            d_entry.get_lockup().duration_secs(),
            &voter_authority,
            registrar_seeds!(registrar),
        )?;
    }

    msg!(
        "Deposited amount {} at deposit index {} with lockup kind {:?} and {} seconds left",
        amount,
        deposit_entry_index,
        d_entry.get_lockup().kind,
        d_entry.get_lockup().seconds_left(curr_ts),
    );

    emit!(DepositEvent {
        voter: voter_authority,
        deposit_entry_index,
        amount,
    });

    Ok(())
}
