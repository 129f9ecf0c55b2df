use crate::cpi_instructions;
use crate::error::*;
use crate::events::WithdrawEvent;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    /// The token_owner_record for the voter_authority. This is needed
    /// to be able to forbid withdraws while the voter is engaged with
    /// a vote or has an open proposal.
    ///
    /// token_owner_record is validated in the instruction:
    /// - owned by registrar.governance_program_id
    /// - for the registrar.realm
    /// - for the registrar.realm_governing_token_mint
    /// - governing_token_owner is voter_authority
    /// CHECK: verified while loading data
    pub token_owner_record: UncheckedAccount<'info>,

    /// Withdraws must update the voter weight record, to prevent a stale
    /// record being used to vote after the withdraw.
    #[account(
        mut,
        seeds = [registrar.key().as_ref(), b"voter-weight-record".as_ref(), voter_authority.key().as_ref()],
        bump = voter.load()?.get_voter_weight_record_bump(),
        constraint = voter_weight_record.realm == registrar.load()?.realm,
        constraint = voter_weight_record.governing_token_owner == voter.load()?.get_voter_authority(),
        constraint = voter_weight_record.governing_token_mint == registrar.load()?.realm_governing_token_mint,
    )]
    pub voter_weight_record: Account<'info, VoterWeightRecord>,

    #[account(
        mut,
        associated_token::authority = voter,
        associated_token::mint = destination.mint,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub destination: Box<Account<'info, TokenAccount>>,

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

impl<'info> Withdraw<'info> {
    pub fn transfer_ctx(&self) -> CpiContext<'_, '_, '_, 'info, token::Transfer<'info>> {
        let program = self.token_program.to_account_info();
        let accounts = token::Transfer {
            from: self.vault.to_account_info(),
            to: self.destination.to_account_info(),
            authority: self.voter.to_account_info(),
        };
        CpiContext::new(program, accounts)
    }
}

/// Withdraws tokens from a deposit entry, if they are unlocked according
/// to the deposit's vesting schedule.
///
/// `deposit_entry_index`: The deposit entry to withdraw from.
/// `amount` is in units of the native currency being withdrawn.
pub fn withdraw(ctx: Context<Withdraw>, deposit_entry_index: u8, amount: u64) -> Result<()> {
    let registrar = &ctx.accounts.registrar.load()?;
    let curr_ts = registrar.clock_unix_timestamp()?;

    let d_entry = {
        // Load the accounts.
        let voter = &mut ctx.accounts.voter.load_mut()?;

        // Governance may forbid withdraws, for example when engaged in a vote.
        let token_owner_record = load_token_owner_record(
            &ctx.accounts.token_owner_record.to_account_info(),
            voter,
            registrar,
        )?;
        token_owner_record.assert_can_withdraw_governing_tokens()?;

        // Get the exchange rate for the token being withdrawn.
        let mint_idx = registrar.voting_mint_config_index(ctx.accounts.destination.mint)?;

        let d_entry = voter.active_deposit_mut(deposit_entry_index)?;
        require_eq!(
            mint_idx,
            d_entry.get_voting_mint_config_idx() as usize,
            VsrError::InvalidMint
        );
        d_entry.withdraw(curr_ts, amount)?;
        let d_entry = *d_entry;

        // Update the voter weight record
        let record = &mut ctx.accounts.voter_weight_record;
        record.voter_weight = voter.weight(curr_ts, registrar)?;
        record.voter_weight_expiry = Some(Clock::get()?.slot);

        d_entry
    };

    // Transfer the tokens to withdraw.
    {
        let voter = &ctx.accounts.voter.load()?;
        token::transfer(
            ctx.accounts
                .transfer_ctx()
                .with_signer(&[voter_seeds!(voter)]),
            amount,
        )?;
    }

    if d_entry.is_staked() && amount > 0 {
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

        cpi_instructions::withdraw_mining(
            ctx.accounts.rewards_program.to_account_info(),
            ctx.accounts.reward_pool.to_account_info(),
            ctx.accounts.deposit_mining.to_account_info(),
            ctx.accounts.registrar.to_account_info(),
            ctx.accounts.delegate_mining.to_account_info(),
            amount,
            &ctx.accounts.voter_authority.key(),
            registrar_seeds!(registrar),
        )?;
    }

    msg!(
        "Withdrew amount {} at deposit index {} with lockup kind {:?} and {} seconds left",
        amount,
        deposit_entry_index,
        d_entry.get_lockup().kind,
        d_entry.get_lockup().seconds_left(curr_ts),
    );

    emit!(WithdrawEvent {
        voter: ctx.accounts.voter_authority.key(),
        deposit_entry_index,
        amount,
    });

    Ok(())
}

pub fn load_token_owner_record(
    account_info: &AccountInfo,
    voter: &Voter,
    registrar: &Registrar,
) -> Result<spl_governance::state::token_owner_record::TokenOwnerRecordV2> {
    let record = spl_governance::state::token_owner_record::get_token_owner_record_data_for_realm_and_governing_mint(
        &registrar.governance_program_id,
        account_info,
        &registrar.realm,
        &registrar.realm_governing_token_mint,
    )?;
    require_keys_eq!(
        record.governing_token_owner,
        voter.get_voter_authority(),
        VsrError::InvalidTokenOwnerRecord
    );
    Ok(record)
}
