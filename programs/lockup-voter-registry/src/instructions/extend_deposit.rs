use crate::cpi_instructions::{self, StakeExtension};
use crate::error::*;
use crate::events::ExtendDepositEvent;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};
use std::convert::TryFrom;

#[derive(Accounts)]
pub struct ExtendDeposit<'info> {
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

    #[account(
        mut,
        associated_token::authority = voter,
        associated_token::mint = deposit_token.mint,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = deposit_token.owner == voter_authority.key(),
    )]
    pub deposit_token: Box<Account<'info, TokenAccount>>,

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

    /// CHECK: must be the mining account of the deposit entry's delegate
    #[account(mut)]
    pub delegate_mining: UncheckedAccount<'info>,

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> ExtendDeposit<'info> {
    pub fn transfer_ctx(&self) -> CpiContext<'_, '_, '_, 'info, token::Transfer<'info>> {
        let program = self.token_program.to_account_info();
        let accounts = token::Transfer {
            from: self.deposit_token.to_account_info(),
            to: self.vault.to_account_info(),
            authority: self.voter_authority.to_account_info(),
        };
        CpiContext::new(program, accounts)
    }
}

/// Restakes a deposit under a new lockup starting now.
///
/// The new lockup may not be less strict than the current one and may not
/// end before the current one would. All deposited tokens plus
/// `additional_amount` become locked under it.
///
/// `deposit_entry_index`: Index of the deposit entry.
/// `kind`, `periods`: the new lockup, see create_deposit_entry.
/// `additional_amount`: Number of native tokens to add from deposit_token.
pub fn extend_deposit(
    ctx: Context<ExtendDeposit>,
    deposit_entry_index: u8,
    kind: LockupKind,
    periods: u32,
    additional_amount: u64,
) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    let curr_ts = registrar.clock_unix_timestamp()?;

    let (old_entry, d_entry) = {
        let voter = &mut ctx.accounts.voter.load_mut()?;
        let d_entry = voter.active_deposit_mut(deposit_entry_index)?;

        // Get the exchange rate entry associated with this deposit.
        let mint_idx = registrar.voting_mint_config_index(ctx.accounts.deposit_token.mint)?;
        require_eq!(
            mint_idx,
            d_entry.get_voting_mint_config_idx() as usize,
            VsrError::InvalidMint
        );

        let old_entry = *d_entry;
        let lockup = Lockup::new_from_periods(kind, curr_ts, curr_ts, periods)?;
        d_entry.extend_lockup(curr_ts, lockup, additional_amount)?;
        (old_entry, *d_entry)
    };

    if additional_amount > 0 {
        token::transfer(ctx.accounts.transfer_ctx(), additional_amount)?;
    }

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

    let mining_owner = ctx.accounts.voter_authority.key();
    let new_lockup = d_entry.get_lockup();
    if old_entry.is_staked() {
        let old_lockup = old_entry.get_lockup();
        let old_lockup_secs = if old_lockup.expired(curr_ts) {
            0
        } else {
            old_lockup.duration_secs()
        };
        cpi_instructions::extend_stake(
            ctx.accounts.rewards_program.to_account_info(),
            ctx.accounts.reward_pool.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            ctx.accounts.registrar.to_account_info(),
            ctx.accounts.delegate_mining.to_account_info(),
            StakeExtension {
                old_lockup_secs,
                new_lockup_secs: new_lockup.duration_secs(),
                deposit_start_ts: u64::try_from(old_lockup.start_ts())
                    .map_err(|_| error!(VsrError::ArithmeticOverflow))?,
                base_amount: old_entry.get_amount_deposited_native(),
                additional_amount,
            },
            &mining_owner,
            registrar_seeds!(registrar),
        )?;
    } else {
        // unlocked tokens enter the reward pool for the first time
        cpi_instructions::deposit_mining(
            ctx.accounts.rewards_program.to_account_info(),
            ctx.accounts.reward_pool.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            ctx.accounts.registrar.to_account_info(),
            ctx.accounts.delegate_mining.to_account_info(),
            d_entry.get_amount_deposited_native(),
            new_lockup.duration_secs(),
            &mining_owner,
            registrar_seeds!(registrar),
        )?;
    }

    msg!(
        "Extended deposit at index {} with amount {} to lockup kind {:?} with {} seconds left",
        deposit_entry_index,
        d_entry.get_amount_deposited_native(),
        new_lockup.kind,
        new_lockup.seconds_left(curr_ts),
    );

    emit!(ExtendDepositEvent {
        voter: mining_owner,
        deposit_entry_index,
        additional_amount,
        lockup: new_lockup,
    });

    Ok(())
}
