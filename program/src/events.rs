// Keeper Lottery Program - Events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    entrypoint::ProgramResult, log::sol_log_data, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

/// Notifications indexers watch for
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum LotteryEvent {
    LotteryEnter { player: Pubkey },
    RequestedLotteryWinner { request_id: u64 },
    WinnerPicked { winner: Pubkey },
}

impl LotteryEvent {
    /// Log the event as a readable line and as borsh bytes
    pub fn emit(&self) -> ProgramResult {
        match self {
            LotteryEvent::LotteryEnter { player } => msg!("LotteryEnter: {}", player),
            LotteryEvent::RequestedLotteryWinner { request_id } => {
                msg!("RequestedLotteryWinner: {}", request_id)
            }
            LotteryEvent::WinnerPicked { winner } => msg!("WinnerPicked: {}", winner),
        }
        let data = self
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        sol_log_data(&[&data]);
        Ok(())
    }
}
