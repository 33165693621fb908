// Keeper Lottery Program - Per-network deployment parameters
use solana_program::native_token::LAMPORTS_PER_SOL;

use crate::state::LotteryConfig;

/// Networks where a locally generated coordinator key stands in for the oracle
pub const DEVELOPMENT_CHAINS: [&str; 2] = ["localnet", "localhost"];

/// 0.01 SOL
pub const DEFAULT_ENTRANCE_FEE: u64 = LAMPORTS_PER_SOL / 100;
pub const DEFAULT_CALLBACK_GAS_LIMIT: u32 = 500_000;
pub const DEFAULT_INTERVAL: u64 = 30;
pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60 * 60;

const LIVE_GAS_LANE: [u8; 32] = [
    0x8a, 0xf3, 0x98, 0x99, 0x5b, 0x04, 0xc2, 0x8e, 0x99, 0x51, 0xad, 0xb9, 0x72, 0x1e, 0xf7, 0x4c,
    0x74, 0xf9, 0x3e, 0x6a, 0x47, 0x8f, 0x39, 0xe7, 0xe0, 0x77, 0x7b, 0xe1, 0x35, 0x27, 0xe7, 0xef,
];

const TEST_GAS_LANE: [u8; 32] = [
    0xd8, 0x9b, 0x2b, 0xf1, 0x50, 0xe3, 0xb9, 0xe1, 0x34, 0x46, 0x98, 0x6e, 0x57, 0x1f, 0xb9, 0xca,
    0xb2, 0x4b, 0x13, 0xce, 0xa0, 0xa4, 0x3e, 0xa2, 0x0a, 0x60, 0x49, 0xa8, 0x5c, 0xc8, 0x07, 0xcc,
];

/// Deployment parameters for one network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub entrance_fee: u64,
    pub gas_lane: [u8; 32],
    pub subscription_id: u64,
    pub callback_gas_limit: u32,
    pub interval: u64,
    pub request_confirmations: u16,
    pub request_timeout: u64,
}

impl NetworkConfig {
    const fn new(name: &'static str, gas_lane: [u8; 32]) -> Self {
        Self {
            name,
            entrance_fee: DEFAULT_ENTRANCE_FEE,
            gas_lane,
            subscription_id: 0,
            callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
            interval: DEFAULT_INTERVAL,
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn is_development(&self) -> bool {
        DEVELOPMENT_CHAINS.contains(&self.name)
    }
}

pub const NETWORKS: [NetworkConfig; 3] = [
    NetworkConfig::new("mainnet-beta", LIVE_GAS_LANE),
    NetworkConfig::new("devnet", TEST_GAS_LANE),
    NetworkConfig::new("localnet", LIVE_GAS_LANE),
];

/// Look a network up by name; `localhost` shares the `localnet` parameters
pub fn network_config(name: &str) -> Option<NetworkConfig> {
    let name = if name == "localhost" { "localnet" } else { name };
    NETWORKS.iter().find(|network| network.name == name).copied()
}

impl From<&NetworkConfig> for LotteryConfig {
    fn from(network: &NetworkConfig) -> Self {
        LotteryConfig {
            entrance_fee: network.entrance_fee,
            interval: network.interval,
            callback_gas_limit: network.callback_gas_limit,
            gas_lane: network.gas_lane,
            subscription_id: network.subscription_id,
            request_confirmations: network.request_confirmations,
            request_timeout: network.request_timeout,
        }
    }
}
