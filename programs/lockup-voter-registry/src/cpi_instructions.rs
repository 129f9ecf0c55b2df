use crate::error::*;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke, invoke_signed},
    system_program, sysvar,
};

/// Instructions understood by the rewards ledger program.
///
/// The variant order is the wire tag, do not reorder.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum RewardsInstruction {
    InitializePool {
        fill_authority: Pubkey,
        distribution_authority: Pubkey,
    },
    /// Signed by the pool's fill authority, never sent by this program.
    FillVault {
        amount: u64,
        distribution_ends_at: u64,
    },
    InitializeMining {
        mining_owner: Pubkey,
    },
    DepositMining {
        amount: u64,
        lockup_period_secs: u64,
        owner: Pubkey,
    },
    WithdrawMining {
        amount: u64,
        owner: Pubkey,
    },
    Claim,
    ExtendStake {
        old_lockup_secs: u64,
        new_lockup_secs: u64,
        deposit_start_ts: u64,
        base_amount: u64,
        additional_amount: u64,
        mining_owner: Pubkey,
    },
    /// Signed by the pool's distribution authority, never sent by this
    /// program.
    DistributeRewards,
    CloseMining,
    ChangeDelegate {
        staked_amount: u64,
    },
}

/// Address of the mining account `owner` holds in `reward_pool`.
pub fn find_mining_address(rewards_program: &Pubkey, owner: &Pubkey, reward_pool: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"mining", owner.as_ref(), reward_pool.as_ref()],
        rewards_program,
    )
    .0
}

/// Fails unless `mining` is the mining account of `owner`.
pub fn check_mining_address(
    mining: &Pubkey,
    rewards_program: &Pubkey,
    owner: &Pubkey,
    reward_pool: &Pubkey,
) -> Result<()> {
    require_keys_eq!(
        *mining,
        find_mining_address(rewards_program, owner, reward_pool),
        VsrError::InvalidMining
    );
    Ok(())
}

fn build(
    rewards_program: &Pubkey,
    accounts: Vec<AccountMeta>,
    instruction: &RewardsInstruction,
) -> Result<Instruction> {
    let data = instruction
        .try_to_vec()
        .map_err(|_| error!(VsrError::RewardsCpiFailed))?;
    Ok(Instruction {
        program_id: *rewards_program,
        accounts,
        data,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn initialize_pool_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    reward_mint: &Pubkey,
    reward_vault: &Pubkey,
    payer: &Pubkey,
    deposit_authority: &Pubkey,
    fill_authority: Pubkey,
    distribution_authority: Pubkey,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new(*reward_pool, false),
        AccountMeta::new_readonly(*reward_mint, false),
        AccountMeta::new(*reward_vault, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(*deposit_authority, true),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(anchor_spl::token::ID, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    build(
        rewards_program,
        accounts,
        &RewardsInstruction::InitializePool {
            fill_authority,
            distribution_authority,
        },
    )
}

pub fn initialize_mining_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    mining: &Pubkey,
    payer: &Pubkey,
    mining_owner: Pubkey,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new(*reward_pool, false),
        AccountMeta::new(*mining, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    build(
        rewards_program,
        accounts,
        &RewardsInstruction::InitializeMining { mining_owner },
    )
}

fn stake_accounts(
    reward_pool: &Pubkey,
    mining: &Pubkey,
    deposit_authority: &Pubkey,
    delegate_mining: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*reward_pool, false),
        AccountMeta::new(*mining, false),
        AccountMeta::new_readonly(*deposit_authority, true),
        AccountMeta::new(*delegate_mining, false),
    ]
}

#[allow(clippy::too_many_arguments)]
pub fn deposit_mining_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    mining: &Pubkey,
    deposit_authority: &Pubkey,
    delegate_mining: &Pubkey,
    amount: u64,
    lockup_period_secs: u64,
    owner: Pubkey,
) -> Result<Instruction> {
    build(
        rewards_program,
        stake_accounts(reward_pool, mining, deposit_authority, delegate_mining),
        &RewardsInstruction::DepositMining {
            amount,
            lockup_period_secs,
            owner,
        },
    )
}

pub fn withdraw_mining_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    mining: &Pubkey,
    deposit_authority: &Pubkey,
    delegate_mining: &Pubkey,
    amount: u64,
    owner: Pubkey,
) -> Result<Instruction> {
    build(
        rewards_program,
        stake_accounts(reward_pool, mining, deposit_authority, delegate_mining),
        &RewardsInstruction::WithdrawMining { amount, owner },
    )
}

/// Lockup parameters of a stake before and after an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeExtension {
    pub old_lockup_secs: u64,
    pub new_lockup_secs: u64,
    pub deposit_start_ts: u64,
    pub base_amount: u64,
    pub additional_amount: u64,
}

pub fn extend_stake_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    mining: &Pubkey,
    deposit_authority: &Pubkey,
    delegate_mining: &Pubkey,
    extension: StakeExtension,
    mining_owner: Pubkey,
) -> Result<Instruction> {
    build(
        rewards_program,
        stake_accounts(reward_pool, mining, deposit_authority, delegate_mining),
        &RewardsInstruction::ExtendStake {
            old_lockup_secs: extension.old_lockup_secs,
            new_lockup_secs: extension.new_lockup_secs,
            deposit_start_ts: extension.deposit_start_ts,
            base_amount: extension.base_amount,
            additional_amount: extension.additional_amount,
            mining_owner,
        },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn change_delegate_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    mining: &Pubkey,
    deposit_authority: &Pubkey,
    mining_owner: &Pubkey,
    old_delegate_mining: &Pubkey,
    new_delegate_mining: &Pubkey,
    staked_amount: u64,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new(*reward_pool, false),
        AccountMeta::new(*mining, false),
        AccountMeta::new_readonly(*deposit_authority, true),
        AccountMeta::new_readonly(*mining_owner, true),
        AccountMeta::new(*old_delegate_mining, false),
        AccountMeta::new(*new_delegate_mining, false),
    ];
    build(
        rewards_program,
        accounts,
        &RewardsInstruction::ChangeDelegate { staked_amount },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn claim_ix(
    rewards_program: &Pubkey,
    reward_pool: &Pubkey,
    reward_mint: &Pubkey,
    vault: &Pubkey,
    mining: &Pubkey,
    mining_owner: &Pubkey,
    deposit_authority: &Pubkey,
    user_reward_token_account: &Pubkey,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new_readonly(*reward_pool, false),
        AccountMeta::new_readonly(*reward_mint, false),
        AccountMeta::new(*vault, false),
        AccountMeta::new(*mining, false),
        AccountMeta::new_readonly(*mining_owner, true),
        AccountMeta::new_readonly(*deposit_authority, true),
        AccountMeta::new(*user_reward_token_account, false),
        AccountMeta::new_readonly(anchor_spl::token::ID, false),
    ];
    build(rewards_program, accounts, &RewardsInstruction::Claim)
}

pub fn close_mining_ix(
    rewards_program: &Pubkey,
    mining: &Pubkey,
    mining_owner: &Pubkey,
    target_account: &Pubkey,
    deposit_authority: &Pubkey,
    reward_pool: &Pubkey,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new(*mining, false),
        AccountMeta::new_readonly(*mining_owner, true),
        AccountMeta::new(*target_account, false),
        AccountMeta::new_readonly(*deposit_authority, true),
        AccountMeta::new(*reward_pool, false),
    ];
    build(rewards_program, accounts, &RewardsInstruction::CloseMining)
}

/// Reads the amount a `Claim` call reported through return data.
pub fn parse_claimed_amount(
    return_data: Option<(Pubkey, Vec<u8>)>,
    rewards_program: &Pubkey,
) -> Result<u64> {
    let (program_id, data) = return_data.ok_or_else(|| error!(VsrError::RewardsCpiFailed))?;
    require_keys_eq!(program_id, *rewards_program, VsrError::RewardsCpiFailed);
    let bytes: [u8; 8] = data
        .as_slice()
        .try_into()
        .map_err(|_| error!(VsrError::RewardsCpiFailed))?;
    Ok(u64::from_le_bytes(bytes))
}

#[allow(clippy::too_many_arguments)]
pub fn initialize_pool<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    reward_mint: AccountInfo<'a>,
    reward_vault: AccountInfo<'a>,
    payer: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    rent: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    fill_authority: Pubkey,
    distribution_authority: Pubkey,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = initialize_pool_ix(
        program_id.key,
        reward_pool.key,
        reward_mint.key,
        reward_vault.key,
        payer.key,
        deposit_authority.key,
        fill_authority,
        distribution_authority,
    )?;
    invoke_signed(
        &ix,
        &[
            reward_pool,
            reward_mint,
            reward_vault,
            payer,
            deposit_authority,
            rent,
            token_program,
            system_program,
            program_id,
        ],
        &[signers_seeds],
    )?;
    Ok(())
}

pub fn initialize_mining<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    payer: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    mining_owner: &Pubkey,
) -> Result<()> {
    let ix = initialize_mining_ix(
        program_id.key,
        reward_pool.key,
        mining.key,
        payer.key,
        *mining_owner,
    )?;
    invoke(&ix, &[reward_pool, mining, payer, system_program, program_id])?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn deposit_mining<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    delegate_mining: AccountInfo<'a>,
    amount: u64,
    lockup_period_secs: u64,
    owner: &Pubkey,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = deposit_mining_ix(
        program_id.key,
        reward_pool.key,
        mining.key,
        deposit_authority.key,
        delegate_mining.key,
        amount,
        lockup_period_secs,
        *owner,
    )?;
    invoke_signed(
        &ix,
        &[reward_pool, mining, deposit_authority, delegate_mining, program_id],
        &[signers_seeds],
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw_mining<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    delegate_mining: AccountInfo<'a>,
    amount: u64,
    owner: &Pubkey,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = withdraw_mining_ix(
        program_id.key,
        reward_pool.key,
        mining.key,
        deposit_authority.key,
        delegate_mining.key,
        amount,
        *owner,
    )?;
    invoke_signed(
        &ix,
        &[reward_pool, mining, deposit_authority, delegate_mining, program_id],
        &[signers_seeds],
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn extend_stake<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    delegate_mining: AccountInfo<'a>,
    extension: StakeExtension,
    mining_owner: &Pubkey,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = extend_stake_ix(
        program_id.key,
        reward_pool.key,
        mining.key,
        deposit_authority.key,
        delegate_mining.key,
        extension,
        *mining_owner,
    )?;
    invoke_signed(
        &ix,
        &[reward_pool, mining, deposit_authority, delegate_mining, program_id],
        &[signers_seeds],
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn change_delegate<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    mining_owner: AccountInfo<'a>,
    old_delegate_mining: AccountInfo<'a>,
    new_delegate_mining: AccountInfo<'a>,
    staked_amount: u64,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = change_delegate_ix(
        program_id.key,
        reward_pool.key,
        mining.key,
        deposit_authority.key,
        mining_owner.key,
        old_delegate_mining.key,
        new_delegate_mining.key,
        staked_amount,
    )?;
    invoke_signed(
        &ix,
        &[
            reward_pool,
            mining,
            deposit_authority,
            mining_owner,
            old_delegate_mining,
            new_delegate_mining,
            program_id,
        ],
        &[signers_seeds],
    )?;
    Ok(())
}

/// Claims the mining owner's rewards and returns the claimed amount.
#[allow(clippy::too_many_arguments)]
pub fn claim<'a>(
    program_id: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    reward_mint: AccountInfo<'a>,
    vault: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    mining_owner: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    user_reward_token_account: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    signers_seeds: &[&[u8]],
) -> Result<u64> {
    let rewards_program = *program_id.key;
    let ix = claim_ix(
        program_id.key,
        reward_pool.key,
        reward_mint.key,
        vault.key,
        mining.key,
        mining_owner.key,
        deposit_authority.key,
        user_reward_token_account.key,
    )?;
    invoke_signed(
        &ix,
        &[
            reward_pool,
            reward_mint,
            vault,
            mining,
            mining_owner,
            deposit_authority,
            user_reward_token_account,
            token_program,
            program_id,
        ],
        &[signers_seeds],
    )?;
    parse_claimed_amount(get_return_data(), &rewards_program)
}

pub fn close_mining<'a>(
    program_id: AccountInfo<'a>,
    mining: AccountInfo<'a>,
    mining_owner: AccountInfo<'a>,
    target_account: AccountInfo<'a>,
    deposit_authority: AccountInfo<'a>,
    reward_pool: AccountInfo<'a>,
    signers_seeds: &[&[u8]],
) -> Result<()> {
    let ix = close_mining_ix(
        program_id.key,
        mining.key,
        mining_owner.key,
        target_account.key,
        deposit_authority.key,
        reward_pool.key,
    )?;
    invoke_signed(
        &ix,
        &[
            mining,
            mining_owner,
            target_account,
            deposit_authority,
            reward_pool,
            program_id,
        ],
        &[signers_seeds],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_tags_test() -> Result<()> {
        let program = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mining = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let delegate_mining = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ix = deposit_mining_ix(
            &program,
            &pool,
            &mining,
            &authority,
            &delegate_mining,
            500,
            86_400,
            owner,
        )?;
        assert_eq!(ix.program_id, program);
        assert_eq!(ix.data[0], 3);
        assert_eq!(ix.data[1..9], 500u64.to_le_bytes());
        assert_eq!(ix.data[9..17], 86_400u64.to_le_bytes());
        assert_eq!(ix.data[17..49], owner.to_bytes());
        assert_eq!(ix.data.len(), 49);

        let ix = close_mining_ix(&program, &mining, &owner, &owner, &authority, &pool)?;
        assert_eq!(ix.data, vec![8]);

        let ix = change_delegate_ix(
            &program,
            &pool,
            &mining,
            &authority,
            &owner,
            &delegate_mining,
            &mining,
            7,
        )?;
        assert_eq!(ix.data[0], 9);
        assert_eq!(ix.data[1..], 7u64.to_le_bytes());

        // authority-signed variants still hold their slots
        let fill = RewardsInstruction::FillVault {
            amount: 1,
            distribution_ends_at: 2,
        }
        .try_to_vec()
        .unwrap();
        assert_eq!(fill[0], 1);
        assert_eq!(fill.len(), 17);
        assert_eq!(RewardsInstruction::DistributeRewards.try_to_vec().unwrap(), vec![7]);

        Ok(())
    }

    #[test]
    fn stake_accounts_test() -> Result<()> {
        let program = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mining = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let delegate_mining = Pubkey::new_unique();

        let ix = withdraw_mining_ix(
            &program,
            &pool,
            &mining,
            &authority,
            &delegate_mining,
            1,
            Pubkey::new_unique(),
        )?;
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|a| a.pubkey).collect();
        assert_eq!(keys, vec![pool, mining, authority, delegate_mining]);
        // only the registrar signs
        let signers: Vec<bool> = ix.accounts.iter().map(|a| a.is_signer).collect();
        assert_eq!(signers, vec![false, false, true, false]);
        assert!(!ix.accounts[2].is_writable);

        Ok(())
    }

    #[test]
    fn extend_stake_data_test() -> Result<()> {
        let program = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let extension = StakeExtension {
            old_lockup_secs: 10,
            new_lockup_secs: 20,
            deposit_start_ts: 30,
            base_amount: 40,
            additional_amount: 50,
        };

        let ix = extend_stake_ix(&program, &key, &key, &key, &key, extension, owner)?;
        let decoded = RewardsInstruction::try_from_slice(&ix.data).unwrap();
        assert_eq!(
            decoded,
            RewardsInstruction::ExtendStake {
                old_lockup_secs: 10,
                new_lockup_secs: 20,
                deposit_start_ts: 30,
                base_amount: 40,
                additional_amount: 50,
                mining_owner: owner,
            }
        );

        Ok(())
    }

    #[test]
    fn find_mining_address_test() {
        let program = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let pool = Pubkey::new_unique();

        let mining = find_mining_address(&program, &owner, &pool);
        assert_eq!(mining, find_mining_address(&program, &owner, &pool));
        assert_ne!(mining, find_mining_address(&program, &pool, &owner));
        assert_ne!(
            mining,
            find_mining_address(&program, &Pubkey::new_unique(), &pool)
        );
    }

    #[test]
    fn check_mining_address_test() -> Result<()> {
        let program = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mining = find_mining_address(&program, &owner, &pool);

        check_mining_address(&mining, &program, &owner, &pool)?;
        assert_eq!(
            check_mining_address(&mining, &program, &Pubkey::new_unique(), &pool),
            Err(error!(VsrError::InvalidMining)) as Result<()>
        );

        Ok(())
    }

    #[test]
    fn parse_claimed_amount_test() -> Result<()> {
        let program = Pubkey::new_unique();

        assert_eq!(
            parse_claimed_amount(Some((program, 1234u64.to_le_bytes().to_vec())), &program)?,
            1234
        );
        assert_eq!(
            parse_claimed_amount(None, &program),
            Err(error!(VsrError::RewardsCpiFailed))
        );
        assert_eq!(
            parse_claimed_amount(Some((program, vec![1, 2, 3])), &program),
            Err(error!(VsrError::RewardsCpiFailed))
        );
        assert_eq!(
            parse_claimed_amount(
                Some((Pubkey::new_unique(), 1u64.to_le_bytes().to_vec())),
                &program
            ),
            Err(error!(VsrError::RewardsCpiFailed))
        );

        Ok(())
    }
}
