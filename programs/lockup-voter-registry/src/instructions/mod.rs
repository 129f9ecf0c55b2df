pub use change_delegate::*;
pub use claim::*;
pub use close_deposit_entry::*;
pub use close_voter::*;
pub use configure_voting_mint::*;
pub use create_deposit_entry::*;
pub use create_registrar::*;
pub use create_voter::*;
pub use deposit::*;
pub use extend_deposit::*;
pub use grant::*;
pub use log_voter_info::*;
pub use set_time_offset::*;
pub use stake::*;
pub use update_max_vote_weight::*;
pub use update_voter_weight_record::*;
pub use withdraw::*;

mod change_delegate;
mod claim;
mod close_deposit_entry;
mod close_voter;
mod configure_voting_mint;
mod create_deposit_entry;
mod create_registrar;
mod create_voter;
mod deposit;
mod extend_deposit;
mod grant;
mod log_voter_info;
mod set_time_offset;
mod stake;
mod update_max_vote_weight;
mod update_voter_weight_record;
mod withdraw;
