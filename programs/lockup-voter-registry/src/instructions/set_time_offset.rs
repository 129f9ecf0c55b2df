use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SetTimeOffset<'info> {
    #[account(
        mut,
        constraint = registrar.load()?.realm_authority == realm_authority.key() @ VsrError::InvalidRealmAuthority,
    )]
    pub registrar: AccountLoader<'info, Registrar>,
    pub realm_authority: Signer<'info>,
}

/// A debug-only instruction that advances the time.
pub fn set_time_offset(ctx: Context<SetTimeOffset>, time_offset: i64) -> Result<()> {
    require!(cfg!(feature = "devnet"), VsrError::DebugInstruction);

    let registrar = &mut ctx.accounts.registrar.load_mut()?;
    registrar.time_offset = time_offset;
    msg!("Time offset set to {}", time_offset);

    Ok(())
}
