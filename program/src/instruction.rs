// Keeper Lottery Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    error::LotteryError,
    state::{Lottery, LotteryConfig},
    utils,
    vrf::RandomWord,
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum LotteryInstruction {
    /// Create the lottery account for an authority
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority, pays for the lottery account
    /// 1. `[writable]` The lottery account (PDA of `["lottery", authority]`)
    /// 2. `[]` The coordinator allowed to deliver randomness
    /// 3. `[]` System program
    Initialize { config: LotteryConfig },

    /// Join the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player, pays `amount`
    /// 1. `[writable]` The lottery account
    /// 2. `[]` System program
    EnterLottery { amount: u64 },

    /// Evaluate upkeep eligibility without changing state; the result is
    /// set as return data
    ///
    /// Accounts expected:
    /// 0. `[]` The lottery account
    CheckUpkeep { perform_data: Vec<u8> },

    /// Close the round and request randomness
    ///
    /// Accounts expected:
    /// 0. `[signer]` The keeper
    /// 1. `[writable]` The lottery account
    PerformUpkeep { perform_data: Vec<u8> },

    /// Coordinator callback delivering the random words for a request
    ///
    /// Accounts expected:
    /// 0. `[signer]` The coordinator
    /// 1. `[writable]` The lottery account
    /// 2. `[writable]` The drawn player, receives the prize
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<RandomWord>,
    },

    /// Re-issue a request the coordinator did not answer in time
    ///
    /// Accounts expected:
    /// 0. `[signer]` The keeper
    /// 1. `[writable]` The lottery account
    RetryRandomnessRequest {},
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create initialize instruction
pub fn initialize(
    program_id: &Pubkey,
    authority: &Pubkey,
    coordinator: &Pubkey,
    config: LotteryConfig,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = utils::find_lottery_address(program_id, authority);
    let data = LotteryInstruction::Initialize { config }.pack()?;

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(*coordinator, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_lottery instruction
pub fn enter_lottery(
    program_id: &Pubkey,
    player: &Pubkey,
    lottery: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::EnterLottery { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(*lottery, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey, lottery: &Pubkey) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::CheckUpkeep {
        perform_data: Vec::new(),
    }
    .pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*lottery, false)],
        data,
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    keeper: &Pubkey,
    lottery: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::PerformUpkeep {
        perform_data: Vec::new(),
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*keeper, true),
        AccountMeta::new(*lottery, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create fulfill_random_words instruction, picking the winner account the
/// first word selects from the decoded lottery
pub fn fulfill_random_words(
    program_id: &Pubkey,
    coordinator: &Pubkey,
    lottery_address: &Pubkey,
    lottery: &Lottery,
    request_id: u64,
    random_words: Vec<RandomWord>,
) -> Result<Instruction, ProgramError> {
    let word = random_words
        .first()
        .ok_or(LotteryError::InvalidRandomWords)?;
    let winner = lottery
        .drawn_player(word)
        .ok_or(LotteryError::NoPlayers)?;
    let data = LotteryInstruction::FulfillRandomWords {
        request_id,
        random_words,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*coordinator, true),
        AccountMeta::new(*lottery_address, false),
        AccountMeta::new(winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create retry_randomness_request instruction
pub fn retry_randomness_request(
    program_id: &Pubkey,
    keeper: &Pubkey,
    lottery: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::RetryRandomnessRequest {}.pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*keeper, true),
        AccountMeta::new(*lottery, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
