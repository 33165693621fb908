// Keeper Lottery Program - Errors
use solana_program::{msg, program_error::ProgramError};
use thiserror::Error;

use crate::state::LotteryState;

/// Errors that may be returned by the lottery program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LotteryError {
    /// Entry attempted while a winner is being calculated
    #[error("Lottery__NotOpen")]
    NotOpen,

    /// Entry amount below the entrance fee
    #[error("Lottery__NotEnoughFunds")]
    NotEnoughFunds,

    /// Upkeep invoked while the eligibility conditions do not hold
    #[error("Lottery__UpkeepNotNeeded(balance: {balance}, players: {players}, state: {state:?})")]
    UpkeepNotNeeded {
        balance: u64,
        players: u32,
        state: LotteryState,
    },

    /// Prize could not be moved to the winner
    #[error("Lottery__TransferFailed")]
    TransferFailed,

    /// Callback for a request that is unknown, stale or already fulfilled
    #[error("nonexistent request")]
    NonexistentRequest,

    /// Fulfillment not signed by the registered coordinator
    #[error("Only the registered coordinator can fulfill randomness")]
    InvalidCoordinator,

    /// Winner account does not match the drawn player
    #[error("Winner account does not match the drawn player")]
    InvalidWinnerAccount,

    /// Fulfillment carried no random words
    #[error("At least one random word is required")]
    InvalidRandomWords,

    /// Player list has reached the account's capacity
    #[error("Lottery is full")]
    LotteryFull,

    #[error("Lottery not initialized")]
    NotInitialized,

    #[error("Lottery already initialized")]
    AlreadyInitialized,

    /// Passed lottery account is not the expected PDA
    #[error("Invalid lottery account address")]
    InvalidLotteryAddress,

    #[error("Invalid lottery configuration")]
    InvalidConfig,

    /// No randomness request is outstanding
    #[error("Lottery is not calculating a winner")]
    NotCalculating,

    /// Outstanding request is still within its timeout
    #[error("Randomness request has not timed out yet")]
    RequestNotTimedOut,

    /// Draw attempted on a round without entrants
    #[error("No players in the current round")]
    NoPlayers,
}

impl LotteryError {
    /// Code carried by `ProgramError::Custom` for this error
    pub fn code(&self) -> u32 {
        match self {
            LotteryError::NotOpen => 0,
            LotteryError::NotEnoughFunds => 1,
            LotteryError::UpkeepNotNeeded { .. } => 2,
            LotteryError::TransferFailed => 3,
            LotteryError::NonexistentRequest => 4,
            LotteryError::InvalidCoordinator => 5,
            LotteryError::InvalidWinnerAccount => 6,
            LotteryError::InvalidRandomWords => 7,
            LotteryError::LotteryFull => 8,
            LotteryError::NotInitialized => 9,
            LotteryError::AlreadyInitialized => 10,
            LotteryError::InvalidLotteryAddress => 11,
            LotteryError::InvalidConfig => 12,
            LotteryError::NotCalculating => 13,
            LotteryError::RequestNotTimedOut => 14,
            LotteryError::NoPlayers => 15,
        }
    }
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        // Custom codes cannot carry data, so the full message goes to the log
        msg!("Error: {}", e);
        ProgramError::Custom(e.code())
    }
}
