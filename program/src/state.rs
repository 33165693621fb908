// Keeper Lottery Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    borsh::try_from_slice_unchecked,
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
};

use crate::{
    error::LotteryError,
    vrf::{self, RandomWord, RandomnessRequest, NUM_WORDS},
};

/// Seed prefix of the lottery PDA, followed by the authority key
pub const LOTTERY_SEED: &[u8] = b"lottery";

/// Players a single round can hold (bounded by the fixed account size)
pub const MAX_PLAYERS: usize = 128;

/// Round status
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotteryState {
    /// Accepting entries
    Open,
    /// Waiting for the coordinator to deliver randomness
    Calculating,
}

/// Deployment parameters, fixed at initialization
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LotteryConfig {
    /// Minimum entry payment in lamports
    pub entrance_fee: u64,
    /// Minimum seconds between rounds
    pub interval: u64,
    /// Compute budget the coordinator reserves for the callback
    pub callback_gas_limit: u32,
    /// Oracle key hash
    pub gas_lane: [u8; 32],
    /// Oracle billing handle
    pub subscription_id: u64,
    /// Confirmations the oracle waits before answering
    pub request_confirmations: u16,
    /// Seconds after which a stuck request may be re-issued
    pub request_timeout: u64,
}

impl LotteryConfig {
    pub const LEN: usize = 8 + 8 + 4 + 32 + 8 + 2 + 8;

    pub fn validate(&self) -> Result<(), LotteryError> {
        if self.entrance_fee == 0 {
            return Err(LotteryError::InvalidConfig);
        }
        Ok(())
    }
}

/// Result of the upkeep eligibility check, published as return data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    pub perform_data: Vec<u8>,
}

/// Lottery account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct Lottery {
    pub is_initialized: bool,
    /// Bump of the lottery PDA
    pub bump: u8,
    /// Account that deployed this lottery
    pub authority: Pubkey,
    /// Key allowed to deliver randomness
    pub coordinator: Pubkey,
    pub config: LotteryConfig,
    /// Entrants of the current round, in entry order
    pub players: Vec<Pubkey>,
    /// Time the current round started
    pub last_timestamp: UnixTimestamp,
    /// Winner of the last resolved round
    pub recent_winner: Pubkey,
    pub lottery_state: LotteryState,
    /// Id of the most recent randomness request
    pub latest_request_id: u64,
    /// Source of request ids
    pub request_counter: u64,
    /// Outstanding request, present exactly while calculating
    pub pending_request: Option<RandomnessRequest>,
}

impl IsInitialized for Lottery {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Lottery {
    pub const LEN: usize = 1
        + 1
        + 32
        + 32
        + LotteryConfig::LEN
        + 4
        + 32 * MAX_PLAYERS
        + 8
        + 32
        + 1
        + 8
        + 8
        + 1
        + RandomnessRequest::LEN;

    /// Create an open lottery whose first round starts at `now`
    pub fn new(
        authority: Pubkey,
        coordinator: Pubkey,
        bump: u8,
        config: LotteryConfig,
        now: UnixTimestamp,
    ) -> Self {
        Self {
            is_initialized: true,
            bump,
            authority,
            coordinator,
            config,
            players: Vec::new(),
            last_timestamp: now,
            recent_winner: Pubkey::default(),
            lottery_state: LotteryState::Open,
            latest_request_id: 0,
            request_counter: 0,
            pending_request: None,
        }
    }

    /// Decode lottery account data, ignoring unused trailing capacity
    pub fn from_account_data(data: &[u8]) -> Result<Self, ProgramError> {
        try_from_slice_unchecked::<Lottery>(data).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Decode an initialized lottery from its account
    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        let lottery = Self::from_account_data(&account.data.borrow())?;
        if !lottery.is_initialized() {
            return Err(LotteryError::NotInitialized.into());
        }
        Ok(lottery)
    }

    pub fn save(&self, account: &AccountInfo) -> ProgramResult {
        self.serialize(&mut &mut account.data.borrow_mut()[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    /// Add `player` to the current round
    pub fn enter(&mut self, player: Pubkey, amount: u64) -> Result<(), LotteryError> {
        if amount < self.config.entrance_fee {
            return Err(LotteryError::NotEnoughFunds);
        }
        if self.lottery_state != LotteryState::Open {
            return Err(LotteryError::NotOpen);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(LotteryError::LotteryFull);
        }
        self.players.push(player);
        Ok(())
    }

    /// Whether a keeper should trigger the draw, given the clock and the
    /// lamports held above rent
    pub fn upkeep_needed(&self, now: UnixTimestamp, balance: u64) -> bool {
        let is_open = self.lottery_state == LotteryState::Open;
        let elapsed = now.saturating_sub(self.last_timestamp);
        let time_passed = elapsed >= 0 && elapsed as u64 >= self.config.interval;
        let has_players = !self.players.is_empty();
        let has_balance = balance > 0;
        is_open && time_passed && has_players && has_balance
    }

    pub fn check_upkeep(&self, now: UnixTimestamp, balance: u64) -> UpkeepCheck {
        UpkeepCheck {
            upkeep_needed: self.upkeep_needed(now, balance),
            perform_data: Vec::new(),
        }
    }

    /// Close entries and issue a randomness request
    pub fn perform_upkeep(
        &mut self,
        now: UnixTimestamp,
        balance: u64,
    ) -> Result<RandomnessRequest, LotteryError> {
        if !self.upkeep_needed(now, balance) {
            return Err(LotteryError::UpkeepNotNeeded {
                balance,
                players: self.players.len() as u32,
                state: self.lottery_state,
            });
        }
        self.lottery_state = LotteryState::Calculating;
        Ok(self.issue_request(now))
    }

    /// Replace an outstanding request that the coordinator never answered
    pub fn retry_request(&mut self, now: UnixTimestamp) -> Result<RandomnessRequest, LotteryError> {
        let pending = self.pending_request.ok_or(LotteryError::NotCalculating)?;
        let waited = now.saturating_sub(pending.requested_at);
        if waited < 0 || (waited as u64) < self.config.request_timeout {
            return Err(LotteryError::RequestNotTimedOut);
        }
        Ok(self.issue_request(now))
    }

    fn issue_request(&mut self, now: UnixTimestamp) -> RandomnessRequest {
        self.request_counter += 1;
        let request = RandomnessRequest {
            request_id: self.request_counter,
            key_hash: self.config.gas_lane,
            subscription_id: self.config.subscription_id,
            confirmations: self.config.request_confirmations,
            callback_gas_limit: self.config.callback_gas_limit,
            num_words: NUM_WORDS,
            requested_at: now,
        };
        self.latest_request_id = request.request_id;
        self.pending_request = Some(request);
        request
    }

    /// Player the given word selects in the current round
    pub fn drawn_player(&self, random_word: &RandomWord) -> Option<Pubkey> {
        let index = vrf::winner_index(random_word, self.players.len() as u64);
        self.players.get(index as usize).copied()
    }

    /// Resolve the outstanding request: record the winner and reset the
    /// round. The caller moves the prize after this returns.
    pub fn fulfill(
        &mut self,
        request_id: u64,
        random_words: &[RandomWord],
        now: UnixTimestamp,
    ) -> Result<Pubkey, LotteryError> {
        match self.pending_request {
            Some(pending) if pending.request_id == request_id => {}
            _ => return Err(LotteryError::NonexistentRequest),
        }
        let word = random_words.first().ok_or(LotteryError::InvalidRandomWords)?;
        let winner = self.drawn_player(word).ok_or(LotteryError::NoPlayers)?;

        self.recent_winner = winner;
        self.players.clear();
        self.lottery_state = LotteryState::Open;
        self.last_timestamp = now;
        self.pending_request = None;
        Ok(winner)
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn lottery_state(&self) -> LotteryState {
        self.lottery_state
    }

    pub fn number_of_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.players.get(index)
    }

    pub fn recent_winner(&self) -> Pubkey {
        self.recent_winner
    }

    pub fn latest_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn latest_request_id(&self) -> u64 {
        self.latest_request_id
    }

    pub fn num_words(&self) -> u32 {
        NUM_WORDS
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.request_confirmations
    }
}
