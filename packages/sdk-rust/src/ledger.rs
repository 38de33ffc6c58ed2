//! The ledger boundary: account reads, rent, submission and status polling.
//!
//! Everything the SDK needs from a Solana node goes through [`Ledger`], so the
//! orchestrator and client can run against an in-memory ledger in tests.

use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::debug;

use crate::error::{Error, Result};

/// Status of a submitted transaction as last observed on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Not yet seen at the configured commitment.
    Pending,
    Confirmed,
    /// Landed but failed; the ledger's error text.
    Failed(String),
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Raw account data, or `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Lamports an account of `span` bytes needs to be rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, span: usize) -> Result<u64>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Submit a signed transaction. A program or runtime rejection comes back
    /// as [`Error::LedgerRejected`]; anything else is a transport failure.
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus>;
}

// ─── JSON-RPC ─────────────────────────────────────────────────────────────────

/// [`Ledger`] backed by the nonblocking Solana JSON-RPC client.
pub struct RpcLedger {
    rpc:        RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), commitment),
            commitment,
        }
    }

    /// Wrap an already configured client (custom sender, timeouts).
    pub fn from_client(rpc: RpcClient, commitment: CommitmentConfig) -> Self {
        Self { rpc, commitment }
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self.rpc.get_account_with_commitment(address, self.commitment).await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn minimum_balance_for_rent_exemption(&self, span: usize) -> Result<u64> {
        Ok(self.rpc.get_minimum_balance_for_rent_exemption(span).await?)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(|err| classify_send_error(err, transaction.signatures.first().copied()))
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus> {
        let status = self
            .rpc
            .get_signature_status_with_commitment(signature, self.commitment)
            .await?;
        Ok(match status {
            None => SignatureStatus::Pending,
            Some(Ok(())) => SignatureStatus::Confirmed,
            Some(Err(tx_err)) => SignatureStatus::Failed(tx_err.to_string()),
        })
    }
}

/// Split a send failure into a definite answer from the node and a transport
/// failure.
///
/// Any JSON-RPC error response (preflight failure, signature verification,
/// invalid params) is a rejection carrying the node's message and, for a
/// failed preflight, the program logs. Everything else leaves the outcome
/// unknown and stays [`Error::Rpc`].
fn classify_send_error(err: ClientError, signature: Option<Signature>) -> Error {
    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, data }) => {
            let logs = match data {
                RpcResponseErrorData::SendTransactionPreflightFailure(sim) => {
                    sim.logs.clone().unwrap_or_default()
                }
                _ => Vec::new(),
            };
            debug!(code, %message, log_lines = logs.len(), "node rejected transaction");
            Error::LedgerRejected { signature, reason: message.clone(), logs }
        }
        ClientErrorKind::TransactionError(tx_err) => Error::LedgerRejected {
            signature,
            reason: tx_err.to_string(),
            logs:   Vec::new(),
        },
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use solana_client::{
        rpc_client::RpcClientConfig,
        rpc_request::RpcRequest,
        rpc_sender::{RpcSender, RpcTransportStats},
    };
    use solana_sdk::{
        instruction::Instruction,
        signature::{Keypair, Signer},
    };

    const ALREADY_INITIALIZED_LOG: &str = "Program log: Error: account already initialized";

    /// Answers every send with the error built by `.0`.
    struct ScriptedSender(fn() -> ClientError);

    #[async_trait]
    impl RpcSender for ScriptedSender {
        async fn send(
            &self,
            request: RpcRequest,
            _params: Value,
        ) -> solana_client::client_error::Result<Value> {
            match request {
                RpcRequest::GetVersion => Ok(json!({ "solana-core": "2.1.0", "feature-set": 0 })),
                _ => Err((self.0)()),
            }
        }

        fn get_transport_stats(&self) -> RpcTransportStats {
            RpcTransportStats::default()
        }

        fn url(&self) -> String {
            "scripted".to_string()
        }
    }

    fn ledger(script: fn() -> ClientError) -> RpcLedger {
        let commitment = CommitmentConfig::confirmed();
        let rpc = RpcClient::new_sender(
            ScriptedSender(script),
            RpcClientConfig::with_commitment(commitment),
        );
        RpcLedger::from_client(rpc, commitment)
    }

    fn signed_transaction() -> Transaction {
        let payer = Keypair::new();
        let ix = Instruction::new_with_bytes(Pubkey::new_unique(), &[0], vec![]);
        Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), &[&payer], Hash::new_unique())
    }

    fn response_error(code: i64, message: &str, data: RpcResponseErrorData) -> ClientError {
        ClientError::from(ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code,
            message: message.to_string(),
            data,
        }))
    }

    fn preflight_failure() -> ClientError {
        let sim = serde_json::from_value(json!({
            "err": { "InstructionError": [0, { "Custom": 0 }] },
            "logs": [
                "Program AQ5Pyb28e6rLJLLVnUCJhFxNwMyAf9kFSZ5Dvg45QGev invoke [1]",
                ALREADY_INITIALIZED_LOG,
                "Program AQ5Pyb28e6rLJLLVnUCJhFxNwMyAf9kFSZ5Dvg45QGev failed: custom program error: 0x0",
            ],
        }))
        .unwrap();
        response_error(
            -32002,
            "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x0",
            RpcResponseErrorData::SendTransactionPreflightFailure(sim),
        )
    }

    fn signature_verification_failure() -> ClientError {
        response_error(-32003, "Transaction signature verification failure", RpcResponseErrorData::Empty)
    }

    fn connection_reset() -> ClientError {
        ClientError::from(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"))
    }

    #[tokio::test]
    async fn preflight_failure_keeps_message_and_program_logs() {
        let tx = signed_transaction();
        let err = ledger(preflight_failure).send_transaction(&tx).await.unwrap_err();

        match &err {
            Error::LedgerRejected { signature, reason, logs } => {
                assert_eq!(*signature, Some(tx.signatures[0]));
                assert_eq!(
                    reason,
                    "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x0"
                );
                assert_eq!(logs.len(), 3);
                assert_eq!(logs[1], ALREADY_INITIALIZED_LOG);
            }
            other => panic!("expected LedgerRejected, got {other:?}"),
        }
        assert!(err.to_string().contains(ALREADY_INITIALIZED_LOG), "{err}");
    }

    #[tokio::test]
    async fn non_preflight_response_error_is_a_rejection() {
        let tx = signed_transaction();
        let err = ledger(signature_verification_failure).send_transaction(&tx).await.unwrap_err();

        assert!(
            matches!(
                err,
                Error::LedgerRejected { ref reason, ref logs, .. }
                    if reason == "Transaction signature verification failure" && logs.is_empty()
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn transport_failure_stays_rpc() {
        let tx = signed_transaction();
        let err = ledger(connection_reset).send_transaction(&tx).await.unwrap_err();
        assert!(matches!(err, Error::Rpc(_)), "{err:?}");
    }

    #[test]
    fn transaction_error_kind_is_a_rejection() {
        let err = ClientError::from(ClientErrorKind::TransactionError(
            solana_sdk::transaction::TransactionError::AccountInUse,
        ));
        let mapped = classify_send_error(err, None);
        assert!(matches!(mapped, Error::LedgerRejected { signature: None, .. }), "{mapped:?}");
    }
}
