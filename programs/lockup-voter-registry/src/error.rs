use anchor_lang::prelude::*;

#[error_code]
pub enum VsrError {
    // 6000 / 0x1770
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    // 6001 / 0x1771
    #[msg("Voting mint not found in the registrar")]
    VotingMintNotFound,
    // 6002 / 0x1772
    #[msg("Voting mint config index is out of bounds")]
    OutOfBoundsVotingMintConfigIndex,
    // 6003 / 0x1773
    #[msg("Voting mint config slot is not in use")]
    VotingMintNotConfigured,
    // 6004 / 0x1774
    #[msg("Voting mint config index is already in use by another mint")]
    VotingMintConfigIndexAlreadyInUse,
    // 6005 / 0x1775
    #[msg("Voting mint is already configured with a different index")]
    VotingMintConfiguredWithDifferentIndex,
    // 6006 / 0x1776
    #[msg("Lockup saturation must be positive")]
    LockupSaturationMustBePositive,
    // 6007 / 0x1777
    #[msg("A mint account for a configured voting mint is missing")]
    MintAccountsMissing,
    // 6008 / 0x1778
    #[msg("Vote weight overflowed")]
    VoterWeightOverflow,
    // 6009 / 0x1779
    #[msg("Deposit entry index is out of bounds")]
    OutOfBoundsDepositEntryIndex,
    // 6010 / 0x177a
    #[msg("Deposit entry is not in use")]
    UnusedDepositEntryIndex,
    // 6011 / 0x177b
    #[msg("Deposit entry is already in use")]
    ActiveDepositEntryIndex,
    // 6012 / 0x177c
    #[msg("All deposit entries are in use")]
    DepositEntryFull,
    // 6013 / 0x177d
    #[msg("Deposit entry still holds tokens")]
    VotingTokenNonZero,
    // 6014 / 0x177e
    #[msg("Not enough unlocked tokens")]
    InsufficientUnlockedTokens,
    // 6015 / 0x177f
    #[msg("Deposit is still locked")]
    DepositStillLocked,
    // 6016 / 0x1780
    #[msg("Invalid lockup period")]
    InvalidLockupPeriod,
    // 6017 / 0x1781
    #[msg("Invalid lockup kind")]
    InvalidLockupKind,
    // 6018 / 0x1782
    #[msg("Lockup cannot be shortened")]
    CannotShortenLockup,
    // 6019 / 0x1783
    #[msg("Deposit start is too far in the future")]
    DepositStartTooFarInFuture,
    // 6020 / 0x1784
    #[msg("Delegate is unchanged")]
    SameDelegate,
    // 6021 / 0x1785
    #[msg("Delegate was updated too recently")]
    DelegateUpdateTooSoon,
    // 6022 / 0x1786
    #[msg("Invalid authority")]
    InvalidAuthority,
    // 6023 / 0x1787
    #[msg("Invalid realm authority")]
    InvalidRealmAuthority,
    // 6024 / 0x1788
    #[msg("Invalid token owner record")]
    InvalidTokenOwnerRecord,
    // 6025 / 0x1789
    #[msg("Mint does not match the deposit entry")]
    InvalidMint,
    // 6026 / 0x178a
    #[msg("Vault still holds tokens")]
    VaultTokenNonZero,
    // 6027 / 0x178b
    #[msg("Rewards program does not match the registrar")]
    InvalidRewardsProgram,
    // 6028 / 0x178c
    #[msg("Reward pool does not match the registrar")]
    InvalidRewardPool,
    // 6029 / 0x178d
    #[msg("Mining account does not match its owner")]
    InvalidMining,
    // 6030 / 0x178e
    #[msg("Rewards program call failed")]
    RewardsCpiFailed,
    // 6031 / 0x178f
    #[msg("Debug instructions are disabled")]
    DebugInstruction,
    // 6032 / 0x1790
    #[msg("6032")]
    InternalProgramError,
    // 6033 / 0x1791
    #[msg("6033")]
    InternalErrorBadLockupVoteWeight,
    // 6034 / 0x1792
    #[msg("Target deposit entry already holds tokens")]
    DepositEntryNotEmpty,
    // 6035 / 0x1793
    #[msg("Only tokens of an unlocked deposit entry can be staked")]
    StakeSourceLocked,
}
