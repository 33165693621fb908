// Keeper Lottery
// A raffle whose draw is triggered by keepers and settled by a randomness coordinator

// Core modules
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

// Events indexers watch for
pub mod events;

// Per-network deployment parameters
pub mod network;

// VRF module for randomness
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process_instruction(program_id, accounts, instruction_data)
}
