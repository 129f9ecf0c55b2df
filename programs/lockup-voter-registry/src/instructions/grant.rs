use crate::cpi_instructions;
use crate::error::*;
use crate::events::GrantEvent;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount};
use std::convert::TryFrom;

#[derive(Accounts)]
pub struct Grant<'info> {
    pub registrar: AccountLoader<'info, Registrar>,

    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_bump(),
        constraint = voter.load()?.get_registrar() == registrar.key(),
        constraint = voter.load()?.get_voter_authority() == voter_authority.key(),
    )]
    pub voter: AccountLoader<'info, Voter>,

    /// The voter receiving the grant.
    /// CHECK: only used as a PDA seed
    pub voter_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        associated_token::authority = voter,
        associated_token::mint = deposit_mint,
        payer = payer
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = deposit_token.owner == token_authority.key(),
        constraint = deposit_token.mint == deposit_mint.key(),
    )]
    pub deposit_token: Box<Account<'info, TokenAccount>>,

    /// Either the realm authority or the mint's grant authority.
    pub token_authority: Signer<'info>,

    pub deposit_mint: Box<Account<'info, Mint>>,

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

    /// CHECK: Rewards Program account
    #[account(executable)]
    pub rewards_program: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

impl<'info> Grant<'info> {
    pub fn transfer_ctx(&self) -> CpiContext<'_, '_, '_, 'info, token::Transfer<'info>> {
        let program = self.token_program.to_account_info();
        let accounts = token::Transfer {
            from: self.deposit_token.to_account_info(),
            to: self.vault.to_account_info(),
            authority: self.token_authority.to_account_info(),
        };
        CpiContext::new(program, accounts)
    }
}

/// Gives a grant to a voter.
///
/// The tokens are locked up under a new deposit entry in the first free slot
/// of the voter. Only the realm authority or the grant authority of the
/// deposited mint may call this.
///
/// `kind`, `start_ts`, `periods`: the lockup, see create_deposit_entry.
/// `amount`: Number of native tokens to transfer.
pub fn grant(
    ctx: Context<Grant>,
    kind: LockupKind,
    start_ts: Option<u64>,
    periods: u32,
    amount: u64,
) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    let mint_idx = registrar.voting_mint_config_index(ctx.accounts.deposit_mint.key())?;
    registrar.check_grant_authority(mint_idx as u8, &ctx.accounts.token_authority.key())?;

    let curr_ts = registrar.clock_unix_timestamp()?;
    let start_ts = match start_ts {
        Some(ts) => i64::try_from(ts).map_err(|_| error!(VsrError::ArithmeticOverflow))?,
        None => curr_ts,
    };
    let voter_authority = ctx.accounts.voter_authority.key();

    let (deposit_entry_index, d_entry) = {
        let voter = &mut ctx.accounts.voter.load_mut()?;
        let deposit_entry_index = voter.free_deposit_entry_index()?;
        let lockup = Lockup::new_from_periods(kind, curr_ts, start_ts, periods)?;
        voter.activate(
            deposit_entry_index,
            DepositEntry::new(lockup, mint_idx as u8, voter_authority, curr_ts),
        )?;

        let d_entry = voter.active_deposit_mut(deposit_entry_index)?;
        d_entry.deposit(curr_ts, amount)?;
        (deposit_entry_index, *d_entry)
    };

    token::transfer(ctx.accounts.transfer_ctx(), amount)?;

    if d_entry.is_staked() && amount > 0 {
        registrar.check_rewards_accounts(
            &ctx.accounts.rewards_program.key(),
            &ctx.accounts.reward_pool.key(),
        )?;

        // the voter authority is its own delegate
        cpi_instructions::deposit_mining(
            ctx.accounts.rewards_program.to_account_info(),
            ctx.accounts.reward_pool.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            ctx.accounts.registrar.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            amount,
            d_entry.get_lockup().duration_secs(),
            &voter_authority,
            registrar_seeds!(registrar),
        )?;
    }

    msg!(
        "Granted amount {} at deposit index {} with lockup kind {:?} and {} seconds left",
        amount,
        deposit_entry_index,
        kind,
        d_entry.get_lockup().seconds_left(curr_ts),
    );

    emit!(GrantEvent {
        voter: voter_authority,
        grant_authority: ctx.accounts.token_authority.key(),
        deposit_entry_index,
        amount,
        lockup: d_entry.get_lockup(),
    });

    Ok(())
}
