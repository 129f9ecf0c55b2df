use anchor_lang::prelude::*;

use crate::Lockup;

#[event]
#[derive(Debug)]
pub struct DepositEvent {
    // voter authority address
    pub voter: Pubkey,
    pub deposit_entry_index: u8,
    pub amount: u64,
}

#[event]
#[derive(Debug)]
pub struct WithdrawEvent {
    // voter authority address
    pub voter: Pubkey,
    pub deposit_entry_index: u8,
    pub amount: u64,
}

#[event]
#[derive(Debug)]
pub struct ExtendDepositEvent {
    // voter authority address
    pub voter: Pubkey,
    pub deposit_entry_index: u8,
    pub additional_amount: u64,
    pub lockup: Lockup,
}

#[event]
#[derive(Debug)]
pub struct ChangeDelegateEvent {
    // voter authority address
    pub voter: Pubkey,
    pub deposit_entry_index: u8,
    pub old_delegate: Pubkey,
    pub new_delegate: Pubkey,
}

#[event]
#[derive(Debug)]
pub struct ClaimEvent {
    // voter authority address
    pub voter: Pubkey,
    pub amount: u64,
}

#[event]
#[derive(Debug)]
pub struct GrantEvent {
    // voter authority address
    pub voter: Pubkey,
    pub grant_authority: Pubkey,
    pub deposit_entry_index: u8,
    pub amount: u64,
    pub lockup: Lockup,
}

#[event]
#[derive(Debug)]
pub struct CloseDepositEntryEvent {
    // voter authority address
    pub voter: Pubkey,
    pub deposit_entry_index: u8,
}

#[event]
#[derive(Debug)]
pub struct StakeEvent {
    // voter authority address
    pub voter: Pubkey,
    pub source_deposit_entry_index: u8,
    pub target_deposit_entry_index: u8,
    pub amount: u64,
}

#[event]
#[derive(Debug)]
pub struct VoterInfo {
    /// Voter's total voting power
    pub voting_power: u64,
    /// Voter's total voting power, when ignoring any effects from lockup
    pub voting_power_baseline: u64,
}

#[event]
#[derive(Debug)]
pub struct DepositEntryInfo {
    pub deposit_entry_index: u8,
    pub voting_mint_config_index: u8,
    /// Amount that is unlocked
    pub unlocked: u64,
    /// Voting power implied by this deposit entry
    pub voting_power: u64,
    /// Voting power without any adjustments for lockup
    pub voting_power_baseline: u64,
    /// Information about locked tokens
    pub locking: Option<LockingInfo>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug)]
pub struct LockingInfo {
    /// Amount of locked tokens
    pub amount: u64,
    /// Time at which the lockup fully ends (None for Constant lockups)
    pub end_timestamp: Option<u64>,
    /// Information about vesting, if any
    pub vesting: Option<VestingInfo>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug)]
pub struct VestingInfo {
    /// Amount of tokens vested each period
    pub rate: u64,
    /// Time of the next upcoming vesting
    pub next_timestamp: u64,
}
