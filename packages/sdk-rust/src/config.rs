//! Client configuration: endpoint, program ids, commitment and confirmation budget.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::error::{Error, Result};
use crate::state::PoolSchema;
use crate::transaction::ConfirmationPolicy;

// ─── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PROGRAM_ID: &str = "AQ5Pyb28e6rLJLLVnUCJhFxNwMyAf9kFSZ5Dvg45QGev";
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
pub const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

const ENV_PREFIX: &str = "TOKEN_STREAM_";

// ─── Config ───────────────────────────────────────────────────────────────────

/// Serializable client settings. Ids and commitment are kept as strings so a
/// config file round-trips unchanged; the typed accessors validate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url:            String,
    pub program_id:         String,
    pub token_program_id:   String,
    /// `processed`, `confirmed` or `finalized`.
    pub commitment:         String,
    pub confirm_timeout_ms: u64,
    pub poll_interval_ms:   u64,
    pub pool_schema:        PoolSchema,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url:            DEVNET_RPC.to_string(),
            program_id:         DEFAULT_PROGRAM_ID.to_string(),
            token_program_id:   SPL_TOKEN_PROGRAM_ID.to_string(),
            commitment:         "confirmed".to_string(),
            confirm_timeout_ms: 60_000,
            poll_interval_ms:   500,
            pool_schema:        PoolSchema::default(),
        }
    }
}

impl ClientConfig {
    pub fn devnet() -> Self {
        Self::default()
    }

    pub fn mainnet() -> Self {
        Self { rpc_url: MAINNET_RPC.to_string(), ..Self::default() }
    }

    /// Defaults overridden by any `TOKEN_STREAM_*` variable that is set:
    /// `RPC_URL`, `PROGRAM_ID`, `TOKEN_PROGRAM_ID`, `COMMITMENT`,
    /// `CONFIRM_TIMEOUT_MS`, `POLL_INTERVAL_MS`, `POOL_SCHEMA`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("bad config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("RPC_URL") {
            config.rpc_url = v;
        }
        if let Some(v) = lookup("PROGRAM_ID") {
            config.program_id = v;
        }
        if let Some(v) = lookup("TOKEN_PROGRAM_ID") {
            config.token_program_id = v;
        }
        if let Some(v) = lookup("COMMITMENT") {
            config.commitment = v;
        }
        if let Some(v) = lookup("CONFIRM_TIMEOUT_MS") {
            config.confirm_timeout_ms = parse_millis("CONFIRM_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("POLL_INTERVAL_MS") {
            config.poll_interval_ms = parse_millis("POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("POOL_SCHEMA") {
            config.pool_schema = serde_json::from_value(serde_json::Value::String(v.clone()))
                .map_err(|_| Error::Config(format!("{ENV_PREFIX}POOL_SCHEMA: unknown schema `{v}`")))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check every string field parses and the polling budget is usable.
    pub fn validate(&self) -> Result<()> {
        self.program_id()?;
        self.token_program_id()?;
        self.commitment_config()?;
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be non-zero".into()));
        }
        Ok(())
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        parse_pubkey("program_id", &self.program_id)
    }

    pub fn token_program_id(&self) -> Result<Pubkey> {
        parse_pubkey("token_program_id", &self.token_program_id)
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| Error::Config(format!("unknown commitment `{}`", self.commitment)))
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            timeout:       Duration::from_millis(self.confirm_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

fn parse_pubkey(name: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| Error::Config(format!("{name} `{value}`: {e}")))
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{ENV_PREFIX}{name}: expected milliseconds, got `{value}`")))
}
