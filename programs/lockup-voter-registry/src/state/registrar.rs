use crate::error::*;
use anchor_lang::prelude::*;

pub const SCALED_FACTOR_BASE: u64 = 1_000_000_000;

/// Number of voting mints a registrar can hold.
pub const MAX_VOTING_MINTS: usize = 4;

/// Instance of a voting rights distributor.
#[account(zero_copy(unsafe))]
pub struct Registrar {
    pub governance_program_id: Pubkey,
    pub realm: Pubkey,
    pub realm_governing_token_mint: Pubkey,
    pub realm_authority: Pubkey,

    /// The rewards ledger this registrar keeps stake positions in.
    pub rewards_program: Pubkey,
    pub reward_pool: Pubkey,
    /// Forwarded to the reward pool on creation.
    pub fill_authority: Pubkey,
    pub distribution_authority: Pubkey,

    /// Storage for voting mints and their configuration.
    /// The length should be adjusted for one's use case.
    pub voting_mints: [VotingMintConfig; MAX_VOTING_MINTS],

    /// Debug only: time offset, to allow tests to move forward in time.
    pub time_offset: i64,
    pub bump: u8,
    pub max_voter_weight_record_bump: u8,
    pub reserved1: [u8; 6],
    pub reserved2: [u64; 8],
}
const_assert!(
    std::mem::size_of::<Registrar>()
        == 8 * 32 + MAX_VOTING_MINTS * 152 + 8 + 1 + 1 + 6 + 8 * 8
);
const_assert!(std::mem::size_of::<Registrar>() % 8 == 0);

impl Registrar {
    pub fn clock_unix_timestamp(&self) -> Result<i64> {
        Clock::get()?
            .unix_timestamp
            .checked_add(self.time_offset)
            .ok_or_else(|| error!(VsrError::ArithmeticOverflow))
    }

    pub fn voting_mint_config_index(&self, mint: Pubkey) -> Result<usize> {
        self.voting_mints
            .iter()
            .position(|r| r.in_use() && r.mint == mint)
            .ok_or_else(|| error!(VsrError::VotingMintNotFound))
    }

    /// The exchange rate entry at idx. Fails for indices that were never
    /// configured.
    pub fn voting_mint_config(&self, idx: u8) -> Result<&VotingMintConfig> {
        let idx = idx as usize;
        require_gt!(
            self.voting_mints.len(),
            idx,
            VsrError::OutOfBoundsVotingMintConfigIndex
        );
        let config = &self.voting_mints[idx];
        require!(config.in_use(), VsrError::VotingMintNotConfigured);
        Ok(config)
    }

    /// Binds idx to mint with a new exchange rate.
    ///
    /// Reconfiguring an index with the mint it already holds overwrites the
    /// rate. An index is never rebound to a different mint, and a mint is
    /// never registered under two indices.
    pub fn configure_voting_mint(&mut self, idx: u16, config: VotingMintConfig) -> Result<()> {
        let idx = idx as usize;
        require_gt!(
            self.voting_mints.len(),
            idx,
            VsrError::OutOfBoundsVotingMintConfigIndex
        );
        require_gt!(
            config.lockup_saturation_secs,
            0,
            VsrError::LockupSaturationMustBePositive
        );

        let existing = &self.voting_mints[idx];
        require!(
            !existing.in_use() || existing.mint == config.mint,
            VsrError::VotingMintConfigIndexAlreadyInUse
        );
        if let Ok(mint_idx) = self.voting_mint_config_index(config.mint) {
            require_eq!(
                mint_idx,
                idx,
                VsrError::VotingMintConfiguredWithDifferentIndex
            );
        }

        self.voting_mints[idx] = config;
        Ok(())
    }

    /// The maximum vote weight the registrar's mints can produce, given the
    /// supply of every configured mint. This is the sum over mints of
    /// supply converted into common decimals, with both the baseline and the
    /// full lockup bonus applied.
    pub fn max_vote_weight(&self, supplies: &[(Pubkey, u64)]) -> Result<u64> {
        self.voting_mints
            .iter()
            .filter(|config| config.in_use())
            .try_fold(0u64, |sum, config| {
                let supply = supplies
                    .iter()
                    .find(|(mint, _)| *mint == config.mint)
                    .map(|(_, supply)| *supply)
                    .ok_or_else(|| error!(VsrError::MintAccountsMissing))?;
                sum.checked_add(config.baseline_vote_weight(supply)?)
                    .and_then(|sum| {
                        config
                            .max_extra_lockup_vote_weight(supply)
                            .ok()
                            .and_then(|extra| sum.checked_add(extra))
                    })
                    .ok_or_else(|| error!(VsrError::VoterWeightOverflow))
            })
    }

    /// The rewards ledger accounts passed to an instruction must be the
    /// ones the registrar was created with.
    pub fn check_rewards_accounts(&self, rewards_program: &Pubkey, reward_pool: &Pubkey) -> Result<()> {
        require_keys_eq!(
            *rewards_program,
            self.rewards_program,
            VsrError::InvalidRewardsProgram
        );
        require_keys_eq!(*reward_pool, self.reward_pool, VsrError::InvalidRewardPool);
        Ok(())
    }

    /// Capability check for creating deposits on behalf of other voters.
    pub fn check_grant_authority(&self, idx: u8, authority: &Pubkey) -> Result<()> {
        let config = self.voting_mint_config(idx)?;
        require!(
            *authority == self.realm_authority || config.is_grant_authority(authority),
            VsrError::InvalidAuthority
        );
        Ok(())
    }
}

#[macro_export]
macro_rules! registrar_seeds {
    ( $registrar:expr ) => {
        &[
            $registrar.realm.as_ref(),
            b"registrar".as_ref(),
            $registrar.realm_governing_token_mint.as_ref(),
            &[$registrar.bump],
        ]
    };
}

pub use registrar_seeds;

/// Exchange rate for an asset that can be used to mint voting rights.
///
/// See documentation of configure_voting_mint for details on how
/// native token amounts convert to vote weight.
#[zero_copy(unsafe)]
#[derive(AnchorSerialize, AnchorDeserialize, Default)]
pub struct VotingMintConfig {
    /// Mint for this entry.
    pub mint: Pubkey,

    /// The authority that is allowed to push grants into voters
    pub grant_authority: Pubkey,

    /// Vote weight factor for all funds in the account, no matter if locked or not.
    ///
    /// In 1/SCALED_FACTOR_BASE units.
    pub baseline_vote_weight_scaled_factor: u64,

    /// Maximum extra vote weight factor for lockups.
    ///
    /// This is the extra votes gained for lockups lasting lockup_saturation_secs or
    /// longer. Shorter lockups receive only a fraction of the maximum extra vote weight,
    /// based on lockup_time divided by lockup_saturation_secs.
    ///
    /// In 1/SCALED_FACTOR_BASE units.
    pub max_extra_lockup_vote_weight_scaled_factor: u64,

    /// Number of seconds of lockup needed to reach the maximum lockup bonus.
    pub lockup_saturation_secs: u64,

    /// Number of digits to shift native amounts, applying a 10^digit_shift factor.
    pub digit_shift: i8,

    pub reserved1: [u8; 7],
    pub reserved2: [u64; 7],
}
const_assert!(std::mem::size_of::<VotingMintConfig>() == 2 * 32 + 3 * 8 + 1 + 7 + 7 * 8);
const_assert!(std::mem::size_of::<VotingMintConfig>() % 8 == 0);

impl VotingMintConfig {
    pub fn new(
        mint: Pubkey,
        grant_authority: Option<Pubkey>,
        digit_shift: i8,
        baseline_vote_weight_scaled_factor: u64,
        max_extra_lockup_vote_weight_scaled_factor: u64,
        lockup_saturation_secs: u64,
    ) -> Self {
        Self {
            mint,
            grant_authority: grant_authority.unwrap_or_default(),
            baseline_vote_weight_scaled_factor,
            max_extra_lockup_vote_weight_scaled_factor,
            lockup_saturation_secs,
            digit_shift,
            reserved1: [0; 7],
            reserved2: [0; 7],
        }
    }

    /// Converts an amount in this voting mints's native currency
    /// to the base vote weight (without the deposit or lockup scalings)
    /// by applying digit_shift.
    fn digit_shift_native(&self, amount_native: u64) -> Result<u64> {
        let compute = || -> Option<u64> {
            let val = if self.digit_shift < 0 {
                (amount_native as u128).checked_div(10u128.checked_pow(self.digit_shift.unsigned_abs() as u32)?)?
            } else {
                (amount_native as u128).checked_mul(10u128.checked_pow(self.digit_shift as u32)?)?
            };
            u64::try_from(val).ok()
        };
        compute().ok_or_else(|| error!(VsrError::VoterWeightOverflow))
    }

    /// Apply a factor in SCALED_FACTOR_BASE units.
    fn apply_factor(base: u64, factor: u64) -> Result<u64> {
        let compute = || -> Option<u64> {
            u64::try_from(
                (base as u128)
                    .checked_mul(factor as u128)?
                    .checked_div(SCALED_FACTOR_BASE as u128)?,
            )
            .ok()
        };
        compute().ok_or_else(|| error!(VsrError::VoterWeightOverflow))
    }

    /// The vote weight a deposit of a number of native tokens should have.
    ///
    /// This vote_weight is a component for all funds in a voter account, no
    /// matter if locked up or not.
    pub fn baseline_vote_weight(&self, amount_native: u64) -> Result<u64> {
        Self::apply_factor(
            self.digit_shift_native(amount_native)?,
            self.baseline_vote_weight_scaled_factor,
        )
    }

    /// The maximum extra vote weight a number of locked up native tokens can have.
    /// Will be multiplied with a factor between 0 and 1 for the lockup duration.
    pub fn max_extra_lockup_vote_weight(&self, amount_native: u64) -> Result<u64> {
        Self::apply_factor(
            self.digit_shift_native(amount_native)?,
            self.max_extra_lockup_vote_weight_scaled_factor,
        )
    }

    /// Whether a grant authority is set and matches.
    pub fn is_grant_authority(&self, authority: &Pubkey) -> bool {
        self.grant_authority != Pubkey::default() && self.grant_authority == *authority
    }

    /// Whether this voting mint is configured.
    pub fn in_use(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_registrar_data() -> Registrar {
        Registrar {
            governance_program_id: Pubkey::new_unique(),
            realm: Pubkey::new_unique(),
            realm_governing_token_mint: Pubkey::new_unique(),
            realm_authority: Pubkey::new_unique(),
            rewards_program: Pubkey::new_unique(),
            reward_pool: Pubkey::new_unique(),
            fill_authority: Pubkey::new_unique(),
            distribution_authority: Pubkey::new_unique(),
            voting_mints: [VotingMintConfig::default(); MAX_VOTING_MINTS],
            time_offset: 0,
            bump: 0,
            max_voter_weight_record_bump: 0,
            reserved1: [0; 6],
            reserved2: [0; 8],
        }
    }

    pub(crate) fn rate(mint: Pubkey, baseline: u64, extra: u64, saturation: u64) -> VotingMintConfig {
        VotingMintConfig::new(
            mint,
            None,
            0,
            baseline * SCALED_FACTOR_BASE,
            extra * SCALED_FACTOR_BASE,
            saturation,
        )
    }

    #[test]
    fn configure_voting_mint_test() -> Result<()> {
        let mut registrar = new_registrar_data();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();

        registrar.configure_voting_mint(0, rate(mint_a, 1, 0, 1))?;
        assert_eq!(registrar.voting_mint_config_index(mint_a)?, 0);

        // reconfiguring the same mint overwrites the rate
        registrar.configure_voting_mint(0, rate(mint_a, 2, 0, 1))?;
        assert_eq!(
            registrar.voting_mint_config(0)?.baseline_vote_weight_scaled_factor,
            2 * SCALED_FACTOR_BASE
        );

        // an index never changes its mint
        assert_eq!(
            registrar.configure_voting_mint(0, rate(mint_b, 1, 0, 1)),
            Err(error!(VsrError::VotingMintConfigIndexAlreadyInUse)) as Result<()>
        );
        // a mint is never registered twice
        assert_eq!(
            registrar.configure_voting_mint(1, rate(mint_a, 1, 0, 1)),
            Err(error!(VsrError::VotingMintConfiguredWithDifferentIndex)) as Result<()>
        );
        assert_eq!(
            registrar.configure_voting_mint(MAX_VOTING_MINTS as u16, rate(mint_b, 1, 0, 1)),
            Err(error!(VsrError::OutOfBoundsVotingMintConfigIndex)) as Result<()>
        );
        assert_eq!(
            registrar.configure_voting_mint(1, rate(mint_b, 1, 0, 0)),
            Err(error!(VsrError::LockupSaturationMustBePositive)) as Result<()>
        );

        registrar.configure_voting_mint(1, rate(mint_b, 1, 0, 1))?;
        assert_eq!(registrar.voting_mint_config_index(mint_b)?, 1);

        Ok(())
    }

    #[test]
    fn voting_mint_lookup_test() -> Result<()> {
        let mut registrar = new_registrar_data();
        let mint = Pubkey::new_unique();
        registrar.configure_voting_mint(2, rate(mint, 1, 1, 1))?;

        assert_eq!(
            registrar.voting_mint_config_index(Pubkey::new_unique()),
            Err(error!(VsrError::VotingMintNotFound))
        );
        assert_eq!(
            registrar.voting_mint_config(0).map(|_| ()),
            Err(error!(VsrError::VotingMintNotConfigured)) as Result<()>
        );
        assert_eq!(
            registrar.voting_mint_config(MAX_VOTING_MINTS as u8).map(|_| ()),
            Err(error!(VsrError::OutOfBoundsVotingMintConfigIndex)) as Result<()>
        );
        assert_eq!(registrar.voting_mint_config(2)?.mint, mint);

        Ok(())
    }

    #[test]
    fn digit_shift_test() -> Result<()> {
        let mut config = rate(Pubkey::new_unique(), 1, 0, 1);

        config.digit_shift = 3;
        assert_eq!(config.baseline_vote_weight(7)?, 7_000);

        config.digit_shift = -2;
        assert_eq!(config.baseline_vote_weight(1_234)?, 12);

        config.digit_shift = 19;
        assert_eq!(
            config.baseline_vote_weight(u64::MAX),
            Err(error!(VsrError::VoterWeightOverflow))
        );

        Ok(())
    }

    #[test]
    fn max_vote_weight_test() -> Result<()> {
        let mut registrar = new_registrar_data();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();
        registrar.configure_voting_mint(0, rate(mint_a, 1, 0, 1))?;
        registrar.configure_voting_mint(1, rate(mint_b, 0, 2, 1))?;

        let supplies = [(mint_a, 1_000), (mint_b, 500)];
        assert_eq!(registrar.max_vote_weight(&supplies)?, 1_000 + 2 * 500);

        assert_eq!(
            registrar.max_vote_weight(&supplies[..1]),
            Err(error!(VsrError::MintAccountsMissing))
        );

        let huge = [(mint_a, u64::MAX), (mint_b, 1)];
        assert_eq!(
            registrar.max_vote_weight(&huge),
            Err(error!(VsrError::VoterWeightOverflow))
        );

        Ok(())
    }

    #[test]
    fn check_rewards_accounts_test() -> Result<()> {
        let registrar = new_registrar_data();
        let program = registrar.rewards_program;
        let pool = registrar.reward_pool;

        registrar.check_rewards_accounts(&program, &pool)?;
        assert_eq!(
            registrar.check_rewards_accounts(&Pubkey::new_unique(), &pool),
            Err(error!(VsrError::InvalidRewardsProgram)) as Result<()>
        );
        assert_eq!(
            registrar.check_rewards_accounts(&program, &program),
            Err(error!(VsrError::InvalidRewardPool)) as Result<()>
        );

        Ok(())
    }

    #[test]
    fn grant_authority_test() -> Result<()> {
        let mut registrar = new_registrar_data();
        let grant_authority = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        registrar.configure_voting_mint(
            0,
            VotingMintConfig::new(mint, Some(grant_authority), 0, 1, 0, 1),
        )?;
        registrar.configure_voting_mint(1, rate(Pubkey::new_unique(), 1, 0, 1))?;

        registrar.check_grant_authority(0, &grant_authority)?;
        let realm_authority = registrar.realm_authority;
        registrar.check_grant_authority(0, &realm_authority)?;
        registrar.check_grant_authority(1, &realm_authority)?;

        assert_eq!(
            registrar.check_grant_authority(1, &grant_authority),
            Err(error!(VsrError::InvalidAuthority)) as Result<()>
        );
        assert_eq!(
            registrar.check_grant_authority(0, &Pubkey::default()),
            Err(error!(VsrError::InvalidAuthority)) as Result<()>
        );

        Ok(())
    }
}
