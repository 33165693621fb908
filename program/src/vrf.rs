// Randomness oracle integration for the keeper lottery
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, keccak};

/// A single 256-bit random word, big-endian
pub type RandomWord = [u8; 32];

/// Random words requested per round
pub const NUM_WORDS: u32 = 1;

/// A randomness request issued to the coordinator and not yet fulfilled
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    /// Correlation id the coordinator must echo back
    pub request_id: u64,
    /// Oracle routing parameter (gas lane)
    pub key_hash: [u8; 32],
    /// Oracle billing handle
    pub subscription_id: u64,
    /// Confirmations the oracle waits before answering
    pub confirmations: u16,
    /// Compute budget reserved for the callback
    pub callback_gas_limit: u32,
    /// Number of words to deliver
    pub num_words: u32,
    /// Clock time the request was issued
    pub requested_at: UnixTimestamp,
}

impl RandomnessRequest {
    pub const LEN: usize = 8 + 32 + 8 + 2 + 4 + 4 + 8;
}

/// Reduce a random word modulo `player_count`, reading the word as a
/// 256-bit big-endian integer
pub fn winner_index(word: &RandomWord, player_count: u64) -> u64 {
    if player_count == 0 {
        return 0;
    }

    let modulus = player_count as u128;
    let remainder = word
        .iter()
        .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % modulus);
    remainder as u64
}

/// Encode a small integer as a random word
pub fn word_from_u64(value: u64) -> RandomWord {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Deterministic words for local networks, `keccak(request_id, i)` with both
/// operands padded to 32 bytes
pub fn mock_random_words(request_id: u64, num_words: u32) -> Vec<RandomWord> {
    (0..num_words as u64)
        .map(|i| {
            keccak::hashv(&[&word_from_u64(request_id), &word_from_u64(i)]).to_bytes()
        })
        .collect()
}
