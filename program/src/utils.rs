// Keeper Lottery Program - Utility Functions
use solana_program::{
    account_info::AccountInfo, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, rent::Rent,
};

use crate::state::LOTTERY_SEED;

/// Find the program derived address of an authority's lottery
pub fn find_lottery_address(program_id: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LOTTERY_SEED, authority.as_ref()], program_id)
}

/// Lamports an account holds above its rent-exempt minimum
pub fn balance_above_rent(account: &AccountInfo, rent: &Rent) -> u64 {
    account
        .lamports()
        .saturating_sub(rent.minimum_balance(account.data_len()))
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
