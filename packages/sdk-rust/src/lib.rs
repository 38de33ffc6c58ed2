//! Token-stream Rust SDK
//!
//! Client for the token-stream program on Solana: create liquidity pools,
//! swap, deposit and withdraw pooled tokens, and open streaming-payment
//! agreements between two accounts. Instruction payloads and account state
//! are encoded with fixed, explicit layouts; every write is one atomic
//! transaction that is submitted once and reported as confirmed, failed or
//! inconclusive.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use token_stream_sdk::{CreatePoolParams, TokenStreamClient};
//! use solana_sdk::signature::Keypair;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TokenStreamClient::devnet()?;
//!     let payer = Keypair::new(); // use a funded keypair
//!
//!     // 1. Derive the pool authority before creating its token accounts
//!     let pool = client.new_pool_account()?;
//!     println!("create the mint and token accounts owned by {}", pool.authority);
//!
//!     // 2. Allocate + initialize in one transaction
//!     # let (token_account_a, pool_mint, fee_account, pool_token_account) = Default::default();
//!     let created = client.create_pool(&payer, &pool, CreatePoolParams {
//!         token_account_a, pool_mint, fee_account, pool_token_account,
//!     }).await?;
//!     println!("pool {} created: {}", created.pool, created.signature);
//!
//!     // 3. Read it back
//!     let state = client.load_pool(&created.pool).await?;
//!     println!("nonce {}  fee account {}", state.nonce, state.fee_account);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`TokenStreamClient::new_pool_account`] | Fresh pool keypair with derived authority + nonce |
//! | [`TokenStreamClient::create_pool`] | Allocate and initialize a pool atomically |
//! | [`TokenStreamClient::swap`] | Swap with a minimum-out guard and optional host fee |
//! | [`TokenStreamClient::deposit_all_token_types`] | Deposit for an exact pool-token amount |
//! | [`TokenStreamClient::withdraw_all_token_types`] | Burn pool tokens for underlying tokens |
//! | [`TokenStreamClient::deposit_single_token_type_exact_amount_in`] | One-sided deposit |
//! | [`TokenStreamClient::withdraw_single_token_type_exact_amount_out`] | One-sided withdrawal |
//! | [`TokenStreamClient::open_stream_agreement`] | Allocate two agreements and open a stream |
//! | [`TokenStreamClient::load_pool`] | Decode pool state |
//! | [`TokenStreamClient::load_stream_agreement`] | Decode a stream agreement |
//!
//! Progress of a single transaction can be observed by building a
//! [`TransactionEnvelope`] and subscribing to the [`PendingOperation`]
//! returned by [`Orchestrator::prepare`].
//!
//! The crate logs through `tracing`; install a subscriber in the binary to
//! see the events.

pub mod client;
pub mod config;
pub mod derivation;
pub mod error;
pub mod instructions;
pub mod layout;
pub mod ledger;
pub mod state;
pub mod transaction;
pub mod types;

pub use client::TokenStreamClient;
pub use config::ClientConfig;
pub use derivation::{derive_authority, verify_authority, PoolAccount};
pub use error::{Error, Result};
pub use layout::Numberu64;
pub use ledger::{Ledger, RpcLedger, SignatureStatus};
pub use state::{PoolSchema, PoolState, StreamAgreementState};
pub use transaction::{
    ConfirmationPolicy, OperationState, Orchestrator, PendingOperation, TransactionEnvelope,
};
pub use types::*;
