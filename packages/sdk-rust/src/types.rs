//! Parameter and result types for [`TokenStreamClient`](crate::TokenStreamClient) operations.
//!
//! Params carry the caller-owned token accounts; everything the pool account
//! already records (mint, fee account, token program, authority) is read
//! fresh from the ledger by the client. Results are `Serialize` so agents can
//! forward them as JSON.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::state::PoolSchema;

// ─── create_pool ──────────────────────────────────────────────────────────────

/// Accounts for `InitializePool`. All token accounts and the pool mint must
/// already exist and be owned by the pool authority from
/// [`PoolAccount`](crate::PoolAccount).
#[derive(Debug, Clone)]
pub struct CreatePoolParams {
    /// Source token account (token A) held by the authority.
    pub token_account_a:    Pubkey,
    pub pool_mint:          Pubkey,
    pub fee_account:        Pubkey,
    /// Receives the initial pool tokens.
    pub pool_token_account: Pubkey,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePoolResult {
    pub signature: String,
    pub pool:      Pubkey,
    pub authority: Pubkey,
    pub nonce:     u8,
    pub schema:    PoolSchema,
    /// Lamports moved into the pool account.
    pub rent:      u64,
}

// ─── swap ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SwapParams {
    pub pool:               Pubkey,
    pub user_source:        Pubkey,
    /// Pool token account receiving `amount_in`.
    pub pool_source:        Pubkey,
    /// Pool token account paying out.
    pub pool_destination:   Pubkey,
    pub user_destination:   Pubkey,
    pub host_fee_account:   Option<Pubkey>,
    pub amount_in:          u64,
    pub minimum_amount_out: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapResult {
    pub signature:          String,
    pub pool:               Pubkey,
    pub amount_in:          u64,
    pub minimum_amount_out: u64,
}

// ─── all-token-type liquidity ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DepositAllParams {
    pub pool:               Pubkey,
    pub user_source:        Pubkey,
    pub pool_token_account: Pubkey,
    /// User's pool-token account credited with `pool_token_amount`.
    pub user_pool_account:  Pubkey,
    pub pool_token_amount:  u64,
}

#[derive(Debug, Clone)]
pub struct WithdrawAllParams {
    pub pool:               Pubkey,
    pub user_pool_account:  Pubkey,
    pub pool_token_account: Pubkey,
    pub user_destination:   Pubkey,
    pub pool_token_amount:  u64,
}

/// Result of either all-token-type liquidity operation.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityResult {
    pub signature:         String,
    pub pool:              Pubkey,
    pub user_pool_account: Pubkey,
    pub pool_token_amount: u64,
}

// ─── single-token-type liquidity ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DepositSingleParams {
    pub pool:                      Pubkey,
    pub source:                    Pubkey,
    pub user_pool_account:         Pubkey,
    /// Pool's second token account. Required when the pool schema does not
    /// record one; ignored otherwise.
    pub pool_token_account_b:      Option<Pubkey>,
    pub source_token_amount:       u64,
    pub minimum_pool_token_amount: u64,
}

#[derive(Debug, Clone)]
pub struct WithdrawSingleParams {
    pub pool:                      Pubkey,
    pub user_pool_account:         Pubkey,
    pub user_destination:          Pubkey,
    /// See [`DepositSingleParams::pool_token_account_b`].
    pub pool_token_account_b:      Option<Pubkey>,
    pub destination_token_amount:  u64,
    pub maximum_pool_token_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SingleSidedResult {
    pub signature:         String,
    pub pool:              Pubkey,
    /// Token amount deposited or withdrawn.
    pub token_amount:      u64,
    /// Minimum pool tokens accepted (deposit) or maximum burned (withdraw).
    pub pool_token_limit:  u64,
}

// ─── open_stream_agreement ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenStreamParams {
    pub pool:               Pubkey,
    /// Authority over the user accounts; not a signer of the instruction.
    pub transfer_authority: Pubkey,
    pub user_account_a:     Pubkey,
    pub user_account_b:     Pubkey,
    /// Tokens per second, program units.
    pub flow_rate:          u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenStreamResult {
    pub signature:   String,
    pub pool:        Pubkey,
    pub agreement_a: Pubkey,
    pub agreement_b: Pubkey,
    pub flow_rate:   u64,
}
