//! [`TokenStreamClient`], the entry point for pool, swap and stream operations.

use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::{debug, info};

use crate::{
    config::ClientConfig,
    derivation::PoolAccount,
    error::{Error, Result},
    instructions::{
        create_pool_ixs, deposit_all_token_types_ix, deposit_single_token_type_exact_amount_in_ix,
        open_stream_ixs, swap_ix, withdraw_all_token_types_ix,
        withdraw_single_token_type_exact_amount_out_ix,
    },
    ledger::{Ledger, RpcLedger},
    state::{PoolSchema, PoolState, StreamAgreementState},
    transaction::{Orchestrator, TransactionEnvelope},
    types::{
        CreatePoolParams, CreatePoolResult, DepositAllParams, DepositSingleParams,
        LiquidityResult, OpenStreamParams, OpenStreamResult, SingleSidedResult, SwapParams,
        SwapResult, WithdrawAllParams, WithdrawSingleParams,
    },
};

/// Async client for the token-stream program.
///
/// Holds no mutable state: every operation fetches the accounts it needs,
/// builds its own envelope and waits for a terminal outcome. Fee payers and
/// signers are passed per call.
///
/// ```rust,no_run
/// # use token_stream_sdk::{TokenStreamClient, SwapParams};
/// # use solana_sdk::signature::Keypair;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TokenStreamClient::devnet()?;
/// let wallet = Keypair::new();
/// # let (pool, src, pool_src, pool_dst, dst) = Default::default();
/// let swap = client.swap(&wallet, &wallet, SwapParams {
///     pool,
///     user_source:        src,
///     pool_source:        pool_src,
///     pool_destination:   pool_dst,
///     user_destination:   dst,
///     host_fee_account:   None,
///     amount_in:          100_000,
///     minimum_amount_out: 90_674,
/// }).await?;
/// println!("swapped: {}", swap.signature);
/// # Ok(())
/// # }
/// ```
pub struct TokenStreamClient<L: ?Sized = RpcLedger> {
    ledger:           Arc<L>,
    config:           ClientConfig,
    program_id:       Pubkey,
    token_program_id: Pubkey,
    orchestrator:     Orchestrator<L>,
}

impl TokenStreamClient<RpcLedger> {
    /// Client talking JSON-RPC to `config.rpc_url`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let ledger = RpcLedger::new(config.rpc_url.clone(), config.commitment_config()?);
        Self::with_ledger(Arc::new(ledger), config)
    }

    pub fn devnet() -> Result<Self> {
        Self::new(ClientConfig::devnet())
    }

    pub fn mainnet() -> Result<Self> {
        Self::new(ClientConfig::mainnet())
    }

    /// Configured from `TOKEN_STREAM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<L: Ledger + ?Sized> TokenStreamClient<L> {
    /// Client over any [`Ledger`] (an in-memory one in tests).
    pub fn with_ledger(ledger: Arc<L>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let program_id = config.program_id()?;
        let token_program_id = config.token_program_id()?;
        let orchestrator = Orchestrator::new(Arc::clone(&ledger), config.confirmation_policy());
        Ok(Self { ledger, config, program_id, token_program_id, orchestrator })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn pool_schema(&self) -> PoolSchema {
        self.config.pool_schema
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// For callers that want to [`prepare`](Orchestrator::prepare) their own
    /// envelopes and watch state transitions.
    pub fn orchestrator(&self) -> &Orchestrator<L> {
        &self.orchestrator
    }

    // ── Bootstrap ─────────────────────────────────────────────────────────────

    /// Fresh pool keypair with its authority and nonce already derived.
    ///
    /// Create the pool mint and token accounts owned by `authority` before
    /// calling [`create_pool`](Self::create_pool) with the same value.
    pub fn new_pool_account(&self) -> Result<PoolAccount> {
        PoolAccount::generate(&self.program_id)
    }

    pub async fn pool_rent_exemption(&self) -> Result<u64> {
        self.ledger.minimum_balance_for_rent_exemption(self.pool_schema().span()).await
    }

    pub async fn stream_agreement_rent_exemption(&self) -> Result<u64> {
        self.ledger.minimum_balance_for_rent_exemption(StreamAgreementState::LEN).await
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Allocate the pool account and initialize it in one transaction.
    pub async fn create_pool(
        &self,
        payer:  &Keypair,
        pool:   &PoolAccount,
        params: CreatePoolParams,
    ) -> Result<CreatePoolResult> {
        let schema = self.pool_schema();
        let rent = self.pool_rent_exemption().await?;
        info!(pool = %pool.address(), ?schema, rent, "creating pool");

        let ixs = create_pool_ixs(
            &self.program_id,
            &payer.pubkey(),
            &pool.address(),
            schema.span(),
            rent,
            &pool.authority,
            &params.token_account_a,
            &params.pool_mint,
            &params.fee_account,
            &params.pool_token_account,
            &self.token_program_id,
            pool.nonce,
        )?;
        let envelope = TransactionEnvelope::new("create_pool", payer)
            .instructions(ixs)
            .signer(&pool.keypair);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(CreatePoolResult {
            signature: sig.to_string(),
            pool:      pool.address(),
            authority: pool.authority,
            nonce:     pool.nonce,
            schema,
            rent,
        })
    }

    /// Swap `amount_in` of the source token for at least `minimum_amount_out`.
    pub async fn swap(
        &self,
        payer:              &Keypair,
        transfer_authority: &Keypair,
        params:             SwapParams,
    ) -> Result<SwapResult> {
        let (state, authority) = self.fetch_pool(&params.pool).await?;

        let ix = swap_ix(
            &self.program_id,
            &params.pool,
            &authority,
            &transfer_authority.pubkey(),
            &params.user_source,
            &params.pool_source,
            &params.pool_destination,
            &params.user_destination,
            &state.pool_mint,
            &state.fee_account,
            params.host_fee_account.as_ref(),
            &state.token_program_id,
            params.amount_in,
            params.minimum_amount_out,
        )?;
        let envelope = TransactionEnvelope::new("swap", payer)
            .instruction(ix)
            .signer(transfer_authority);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(SwapResult {
            signature:          sig.to_string(),
            pool:               params.pool,
            amount_in:          params.amount_in,
            minimum_amount_out: params.minimum_amount_out,
        })
    }

    pub async fn deposit_all_token_types(
        &self,
        payer:              &Keypair,
        transfer_authority: &Keypair,
        params:             DepositAllParams,
    ) -> Result<LiquidityResult> {
        let (state, authority) = self.fetch_pool(&params.pool).await?;

        let ix = deposit_all_token_types_ix(
            &self.program_id,
            &params.pool,
            &authority,
            &transfer_authority.pubkey(),
            &params.user_source,
            &params.pool_token_account,
            &state.pool_mint,
            &params.user_pool_account,
            &state.token_program_id,
            params.pool_token_amount,
        )?;
        let envelope = TransactionEnvelope::new("deposit_all_token_types", payer)
            .instruction(ix)
            .signer(transfer_authority);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(LiquidityResult {
            signature:         sig.to_string(),
            pool:              params.pool,
            user_pool_account: params.user_pool_account,
            pool_token_amount: params.pool_token_amount,
        })
    }

    pub async fn withdraw_all_token_types(
        &self,
        payer:              &Keypair,
        transfer_authority: &Keypair,
        params:             WithdrawAllParams,
    ) -> Result<LiquidityResult> {
        let (state, authority) = self.fetch_pool(&params.pool).await?;

        let ix = withdraw_all_token_types_ix(
            &self.program_id,
            &params.pool,
            &authority,
            &transfer_authority.pubkey(),
            &state.pool_mint,
            &params.user_pool_account,
            &params.pool_token_account,
            &params.user_destination,
            &state.fee_account,
            &state.token_program_id,
            params.pool_token_amount,
        )?;
        let envelope = TransactionEnvelope::new("withdraw_all_token_types", payer)
            .instruction(ix)
            .signer(transfer_authority);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(LiquidityResult {
            signature:         sig.to_string(),
            pool:              params.pool,
            user_pool_account: params.user_pool_account,
            pool_token_amount: params.pool_token_amount,
        })
    }

    /// Deposit exactly `source_token_amount` of one token type.
    ///
    /// Fails with [`Error::MissingAccount`] before anything is built when the
    /// pool's second token account is neither stored nor supplied.
    pub async fn deposit_single_token_type_exact_amount_in(
        &self,
        payer:              &Keypair,
        transfer_authority: &Keypair,
        params:             DepositSingleParams,
    ) -> Result<SingleSidedResult> {
        let (state, authority) = self.fetch_pool(&params.pool).await?;
        let into_b = pool_token_account_b(&state, params.pool_token_account_b)?;

        let ix = deposit_single_token_type_exact_amount_in_ix(
            &self.program_id,
            &params.pool,
            &authority,
            &transfer_authority.pubkey(),
            &params.source,
            &state.token_account_a,
            &into_b,
            &state.pool_mint,
            &params.user_pool_account,
            &state.token_program_id,
            params.source_token_amount,
            params.minimum_pool_token_amount,
        )?;
        let envelope = TransactionEnvelope::new("deposit_single_token_type_exact_amount_in", payer)
            .instruction(ix)
            .signer(transfer_authority);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(SingleSidedResult {
            signature:        sig.to_string(),
            pool:             params.pool,
            token_amount:     params.source_token_amount,
            pool_token_limit: params.minimum_pool_token_amount,
        })
    }

    /// Withdraw exactly `destination_token_amount` of one token type.
    pub async fn withdraw_single_token_type_exact_amount_out(
        &self,
        payer:              &Keypair,
        transfer_authority: &Keypair,
        params:             WithdrawSingleParams,
    ) -> Result<SingleSidedResult> {
        let (state, authority) = self.fetch_pool(&params.pool).await?;
        let from_b = pool_token_account_b(&state, params.pool_token_account_b)?;

        let ix = withdraw_single_token_type_exact_amount_out_ix(
            &self.program_id,
            &params.pool,
            &authority,
            &transfer_authority.pubkey(),
            &state.pool_mint,
            &params.user_pool_account,
            &state.token_account_a,
            &from_b,
            &params.user_destination,
            &state.fee_account,
            &state.token_program_id,
            params.destination_token_amount,
            params.maximum_pool_token_amount,
        )?;
        let envelope = TransactionEnvelope::new("withdraw_single_token_type_exact_amount_out", payer)
            .instruction(ix)
            .signer(transfer_authority);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(SingleSidedResult {
            signature:        sig.to_string(),
            pool:             params.pool,
            token_amount:     params.destination_token_amount,
            pool_token_limit: params.maximum_pool_token_amount,
        })
    }

    /// Allocate two agreement accounts and open a stream between them.
    ///
    /// Both agreement keypairs are generated here and sign alongside `payer`.
    pub async fn open_stream_agreement(
        &self,
        payer:  &Keypair,
        params: OpenStreamParams,
    ) -> Result<OpenStreamResult> {
        let (_, authority) = self.fetch_pool(&params.pool).await?;
        let rent = self.stream_agreement_rent_exemption().await?;

        let agreement_a = Keypair::new();
        let agreement_b = Keypair::new();
        info!(
            pool = %params.pool,
            agreement_a = %agreement_a.pubkey(),
            agreement_b = %agreement_b.pubkey(),
            flow_rate = params.flow_rate,
            "opening stream agreement"
        );

        let ixs = open_stream_ixs(
            &self.program_id,
            &payer.pubkey(),
            StreamAgreementState::LEN,
            rent,
            &params.pool,
            &authority,
            &params.transfer_authority,
            &params.user_account_a,
            &agreement_a.pubkey(),
            &params.user_account_b,
            &agreement_b.pubkey(),
            params.flow_rate,
        )?;
        let envelope = TransactionEnvelope::new("open_stream_agreement", payer)
            .instructions(ixs)
            .signer(&agreement_a)
            .signer(&agreement_b);
        let sig = self.orchestrator.execute(envelope).await?;

        Ok(OpenStreamResult {
            signature:   sig.to_string(),
            pool:        params.pool,
            agreement_a: agreement_a.pubkey(),
            agreement_b: agreement_b.pubkey(),
            flow_rate:   params.flow_rate,
        })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Decode the pool at `address` with the configured schema.
    pub async fn load_pool(&self, address: &Pubkey) -> Result<PoolState> {
        self.fetch_pool(address).await.map(|(state, _)| state)
    }

    /// Pool state plus its verified authority.
    pub async fn load_pool_with_authority(&self, address: &Pubkey) -> Result<(PoolState, Pubkey)> {
        self.fetch_pool(address).await
    }

    pub async fn load_stream_agreement(&self, address: &Pubkey) -> Result<StreamAgreementState> {
        let data = self.account_data(address).await?;
        StreamAgreementState::unpack(&data)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>> {
        self.ledger
            .account_data(address)
            .await?
            .ok_or(Error::AccountNotFound(*address))
    }

    async fn fetch_pool(&self, address: &Pubkey) -> Result<(PoolState, Pubkey)> {
        let data = self.account_data(address).await?;
        let state = PoolState::unpack(self.pool_schema(), &data)?;
        let authority = state.authority_for(address, &self.program_id)?;
        debug!(pool = %address, %authority, nonce = state.nonce, "pool loaded");
        Ok((state, authority))
    }
}

fn pool_token_account_b(state: &PoolState, supplied: Option<Pubkey>) -> Result<Pubkey> {
    state
        .token_account_b
        .or(supplied)
        .ok_or(Error::MissingAccount("pool token account B"))
}
