// Keeper Lottery Program - Instruction Processor
use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    error::LotteryError,
    events::LotteryEvent,
    instruction::LotteryInstruction,
    state::{Lottery, LotteryConfig, LOTTERY_SEED},
    utils,
    vrf::RandomWord,
};

/// Program state handler.
pub struct Processor {}

impl Processor {
    /// Process a lottery instruction
    pub fn process_instruction(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::Initialize { config } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(program_id, accounts, config)
            }
            LotteryInstruction::EnterLottery { amount } => {
                msg!("Instruction: Enter Lottery");
                Self::process_enter_lottery(program_id, accounts, amount)
            }
            LotteryInstruction::CheckUpkeep { .. } => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts)
            }
            LotteryInstruction::PerformUpkeep { .. } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts)
            }
            LotteryInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, &random_words)
            }
            LotteryInstruction::RetryRandomnessRequest {} => {
                msg!("Instruction: Retry Randomness Request");
                Self::process_retry_randomness_request(program_id, accounts)
            }
        }
    }

    /// Process Initialize instruction
    fn process_initialize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: LotteryConfig,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();

        // Get accounts
        let authority_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify authority is signer
        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        config.validate()?;

        // Verify the lottery account is the authority's PDA
        let (expected_lottery, bump_seed) =
            utils::find_lottery_address(program_id, authority_info.key);
        if *lottery_info.key != expected_lottery {
            msg!("Invalid lottery account address");
            return Err(LotteryError::InvalidLotteryAddress.into());
        }

        if lottery_info.owner == program_id {
            return Err(LotteryError::AlreadyInitialized.into());
        }

        // Create the lottery account
        let rent = Rent::get()?;
        let rent_lamports = rent.minimum_balance(Lottery::LEN);
        let bump = [bump_seed];
        let lottery_seeds: &[&[u8]] = &[LOTTERY_SEED, authority_info.key.as_ref(), &bump];
        if lottery_info.lamports() == 0 {
            invoke_signed(
                &system_instruction::create_account(
                    authority_info.key,
                    lottery_info.key,
                    rent_lamports,
                    Lottery::LEN as u64,
                    program_id,
                ),
                &[
                    authority_info.clone(),
                    lottery_info.clone(),
                    system_program_info.clone(),
                ],
                &[lottery_seeds],
            )?;
        } else {
            // Address already holds lamports, create_account would fail.
            // Top up to rent exemption, then allocate and assign it.
            let top_up = rent_lamports.saturating_sub(lottery_info.lamports());
            if top_up > 0 {
                invoke(
                    &system_instruction::transfer(authority_info.key, lottery_info.key, top_up),
                    &[
                        authority_info.clone(),
                        lottery_info.clone(),
                        system_program_info.clone(),
                    ],
                )?;
            }
            invoke_signed(
                &system_instruction::allocate(lottery_info.key, Lottery::LEN as u64),
                &[lottery_info.clone(), system_program_info.clone()],
                &[lottery_seeds],
            )?;
            invoke_signed(
                &system_instruction::assign(lottery_info.key, program_id),
                &[lottery_info.clone(), system_program_info.clone()],
                &[lottery_seeds],
            )?;
        }

        // Get current time
        let clock = Clock::get()?;
        let lottery = Lottery::new(
            *authority_info.key,
            *coordinator_info.key,
            bump_seed,
            config,
            clock.unix_timestamp,
        );

        // Serialize and save lottery state
        lottery.save(lottery_info)?;

        msg!(
            "Lottery initialized: Coordinator={}, EntranceFee={} SOL, Interval={}s",
            coordinator_info.key,
            utils::lamports_to_sol(config.entrance_fee),
            config.interval
        );
        Ok(())
    }

    /// Process EnterLottery instruction
    fn process_enter_lottery(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();

        // Get accounts
        let player_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify player is signer
        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_lottery_owner(program_id, lottery_info)?;

        // Record the entry
        let mut lottery = Lottery::load(lottery_info)?;
        lottery.enter(*player_info.key, amount)?;

        // Transfer the payment to the lottery account
        invoke(
            &system_instruction::transfer(player_info.key, lottery_info.key, amount),
            &[
                player_info.clone(),
                lottery_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        lottery.save(lottery_info)?;

        LotteryEvent::LotteryEnter {
            player: *player_info.key,
        }
        .emit()?;
        msg!(
            "Entered as player #{} with {} SOL",
            lottery.number_of_players(),
            utils::lamports_to_sol(amount)
        );
        Ok(())
    }

    /// Process CheckUpkeep instruction
    fn process_check_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;
        Self::check_lottery_owner(program_id, lottery_info)?;

        let lottery = Lottery::load(lottery_info)?;

        // Get current time and the pot held above rent
        let clock = Clock::get()?;
        let balance = utils::balance_above_rent(lottery_info, &Rent::get()?);

        // Publish the result as return data
        let check = lottery.check_upkeep(clock.unix_timestamp, balance);
        let data = check
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidAccountData)?;
        set_return_data(&data);

        msg!("Upkeep needed: {}", check.upkeep_needed);
        Ok(())
    }

    /// Process PerformUpkeep instruction
    fn process_perform_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();

        // Get accounts
        let keeper_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;

        // Verify keeper is signer
        if !keeper_info.is_signer {
            msg!("Keeper must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_lottery_owner(program_id, lottery_info)?;

        let mut lottery = Lottery::load(lottery_info)?;
        let clock = Clock::get()?;
        let balance = utils::balance_above_rent(lottery_info, &Rent::get()?);

        let request = lottery.perform_upkeep(clock.unix_timestamp, balance)?;
        lottery.save(lottery_info)?;

        LotteryEvent::RequestedLotteryWinner {
            request_id: request.request_id,
        }
        .emit()?;
        msg!(
            "Randomness requested: Subscription={}, Confirmations={}, CallbackGasLimit={}, Words={}",
            request.subscription_id,
            request.confirmations,
            request.callback_gas_limit,
            request.num_words
        );
        Ok(())
    }

    /// Process FulfillRandomWords instruction
    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_words: &[RandomWord],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();

        // Get accounts
        let coordinator_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        Self::check_lottery_owner(program_id, lottery_info)?;
        let mut lottery = Lottery::load(lottery_info)?;

        // Verify the registered coordinator signed
        if !coordinator_info.is_signer || *coordinator_info.key != lottery.coordinator {
            msg!("Fulfillment must be signed by coordinator {}", lottery.coordinator);
            return Err(LotteryError::InvalidCoordinator.into());
        }

        // Pick the winner and reset the round
        let clock = Clock::get()?;
        let winner = lottery.fulfill(request_id, random_words, clock.unix_timestamp)?;
        if *winner_info.key != winner {
            msg!("Drawn player is {}, got {}", winner, winner_info.key);
            return Err(LotteryError::InvalidWinnerAccount.into());
        }

        // Reset is written before any lamports move
        lottery.save(lottery_info)?;

        // Pay out everything above rent
        let prize = utils::balance_above_rent(lottery_info, &Rent::get()?);
        if !winner_info.is_writable {
            msg!("Winner account is not writable");
            return Err(LotteryError::TransferFailed.into());
        }
        let lottery_lamports = lottery_info
            .lamports()
            .checked_sub(prize)
            .ok_or(LotteryError::TransferFailed)?;
        let winner_lamports = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(LotteryError::TransferFailed)?;
        **lottery_info.try_borrow_mut_lamports()? = lottery_lamports;
        **winner_info.try_borrow_mut_lamports()? = winner_lamports;

        LotteryEvent::WinnerPicked { winner }.emit()?;
        msg!(
            "Request {} fulfilled, {} SOL paid out",
            request_id,
            utils::lamports_to_sol(prize)
        );
        Ok(())
    }

    /// Process RetryRandomnessRequest instruction
    fn process_retry_randomness_request(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();

        // Get accounts
        let keeper_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;

        // Verify keeper is signer
        if !keeper_info.is_signer {
            msg!("Keeper must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_lottery_owner(program_id, lottery_info)?;

        let mut lottery = Lottery::load(lottery_info)?;
        let stale_request_id = lottery.latest_request_id();
        let clock = Clock::get()?;
        let request = lottery.retry_request(clock.unix_timestamp)?;
        lottery.save(lottery_info)?;

        LotteryEvent::RequestedLotteryWinner {
            request_id: request.request_id,
        }
        .emit()?;
        msg!("Request {} replaced by {}", stale_request_id, request.request_id);
        Ok(())
    }

    /// Verify the lottery account belongs to this program
    fn check_lottery_owner(program_id: &Pubkey, lottery_info: &AccountInfo) -> ProgramResult {
        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }
        Ok(())
    }
}
