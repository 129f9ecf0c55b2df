use crate::error::*;
use crate::state::deposit_entry::DepositEntry;
use crate::state::lockup::LockupKind;
use crate::state::registrar::Registrar;
use anchor_lang::prelude::*;

/// Number of deposit entries a voter can hold.
pub const VOTER_DEPOSIT_ENTRY_COUNT: usize = 32;

/// User account for minting voting rights.
#[account(zero_copy(unsafe))]
pub struct Voter {
    voter_authority: Pubkey,
    registrar: Pubkey,
    deposits: [DepositEntry; VOTER_DEPOSIT_ENTRY_COUNT],
    voter_bump: u8,
    voter_weight_record_bump: u8,
    reserved: [u8; 94],
}
const_assert!(
    std::mem::size_of::<Voter>() == 2 * 32 + VOTER_DEPOSIT_ENTRY_COUNT * 96 + 1 + 1 + 94
);
const_assert!(std::mem::size_of::<Voter>() % 8 == 0);

/// impl: factory function and getters
impl Voter {
    pub fn new(
        voter_authority: Pubkey,
        registrar: Pubkey,
        voter_bump: u8,
        voter_weight_record_bump: u8,
    ) -> Voter {
        Voter {
            voter_authority,
            registrar,
            deposits: [DepositEntry::default(); VOTER_DEPOSIT_ENTRY_COUNT],
            voter_bump,
            voter_weight_record_bump,
            reserved: [0; 94],
        }
    }

    #[inline(always)]
    pub fn get_voter_authority(&self) -> Pubkey {
        self.voter_authority
    }

    #[inline(always)]
    pub fn get_registrar(&self) -> Pubkey {
        self.registrar
    }

    #[inline(always)]
    pub fn get_deposits(&self) -> &[DepositEntry] {
        &self.deposits
    }

    #[inline(always)]
    pub fn get_voter_bump(&self) -> u8 {
        self.voter_bump
    }

    #[inline(always)]
    pub fn get_voter_weight_record_bump(&self) -> u8 {
        self.voter_weight_record_bump
    }
}

impl Voter {
    pub fn deposit_entry_at(&self, index: u8) -> Result<&DepositEntry> {
        let index = index as usize;
        require_gt!(
            self.deposits.len(),
            index,
            VsrError::OutOfBoundsDepositEntryIndex
        );
        Ok(&self.deposits[index])
    }

    pub fn deposit_entry_at_mut(&mut self, index: u8) -> Result<&mut DepositEntry> {
        let index = index as usize;
        require_gt!(
            self.deposits.len(),
            index,
            VsrError::OutOfBoundsDepositEntryIndex
        );
        Ok(&mut self.deposits[index])
    }

    pub fn active_deposit(&self, index: u8) -> Result<&DepositEntry> {
        let d = self.deposit_entry_at(index)?;
        require!(d.is_used(), VsrError::UnusedDepositEntryIndex);
        Ok(d)
    }

    pub fn active_deposit_mut(&mut self, index: u8) -> Result<&mut DepositEntry> {
        let d = self.deposit_entry_at_mut(index)?;
        require!(d.is_used(), VsrError::UnusedDepositEntryIndex);
        Ok(d)
    }

    /// Puts a fresh entry into an unused slot.
    pub fn activate(&mut self, index: u8, entry: DepositEntry) -> Result<()> {
        let d = self.deposit_entry_at_mut(index)?;
        require!(!d.is_used(), VsrError::ActiveDepositEntryIndex);
        *d = entry;
        Ok(())
    }

    /// Moves `amount` unlocked tokens from the unlocked entry at `source_index`
    /// into the empty locked entry at `target_index`. Returns the funded
    /// target entry.
    pub fn stake(
        &mut self,
        source_index: u8,
        target_index: u8,
        curr_ts: i64,
        amount: u64,
    ) -> Result<DepositEntry> {
        let source = self.active_deposit(source_index)?;
        require!(
            source.get_lockup().kind == LockupKind::None,
            VsrError::StakeSourceLocked
        );
        let mint_idx = source.get_voting_mint_config_idx();

        let mut target = *self.active_deposit(target_index)?;
        require_eq!(
            target.get_voting_mint_config_idx(),
            mint_idx,
            VsrError::InvalidMint
        );
        target.stake(curr_ts, amount)?;

        self.active_deposit_mut(source_index)?
            .withdraw(curr_ts, amount)?;
        *self.active_deposit_mut(target_index)? = target;
        Ok(target)
    }

    /// Index of the first unused slot.
    pub fn free_deposit_entry_index(&self) -> Result<u8> {
        self.deposits
            .iter()
            .position(|d| !d.is_used())
            .map(|index| index as u8)
            .ok_or_else(|| error!(VsrError::DepositEntryFull))
    }

    /// The full vote weight available to the voter
    pub fn weight(&self, curr_ts: i64, registrar: &Registrar) -> Result<u64> {
        self.deposits
            .iter()
            .filter(|d| d.is_used())
            .try_fold(0u64, |sum, d| {
                let config = registrar.voting_mint_config(d.get_voting_mint_config_idx())?;
                sum.checked_add(d.voting_power(config, curr_ts)?)
                    .ok_or_else(|| error!(VsrError::VoterWeightOverflow))
            })
    }

    /// The vote weight available to the voter when ignoring any lockup effects
    pub fn weight_baseline(&self, registrar: &Registrar) -> Result<u64> {
        self.deposits
            .iter()
            .filter(|d| d.is_used())
            .try_fold(0u64, |sum, d| {
                let config = registrar.voting_mint_config(d.get_voting_mint_config_idx())?;
                sum.checked_add(config.baseline_vote_weight(d.get_amount_deposited_native())?)
                    .ok_or_else(|| error!(VsrError::VoterWeightOverflow))
            })
    }

    /// True if any deposit still holds tokens.
    pub fn has_deposits(&self) -> bool {
        self.deposits
            .iter()
            .any(|d| d.is_used() && d.get_amount_deposited_native() > 0)
    }
}

#[macro_export]
macro_rules! voter_seeds {
    ( $voter:expr ) => {
        &[
            $voter.get_registrar().as_ref(),
            b"voter".as_ref(),
            $voter.get_voter_authority().as_ref(),
            &[$voter.get_voter_bump()],
        ]
    };
}

pub use voter_seeds;
