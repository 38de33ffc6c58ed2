//! Scripted in-memory ledger shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use token_stream_sdk::{
    ClientConfig, ConfirmationPolicy, Error, Ledger, Result, SignatureStatus, TokenStreamClient,
};

/// What the ledger does with the next submitted transaction.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Accept and report confirmed after `pending_polls` pending polls.
    Confirm { pending_polls: usize },
    /// Preflight rejection with this reason.
    RejectOnSend(String),
    /// Preflight rejection carrying the simulated program logs.
    RejectWithLogs { reason: String, logs: Vec<String> },
    /// Accept, then report an execution failure.
    FailOnChain(String),
    /// Accept and stay pending forever.
    NeverConfirm,
    /// Transport error while sending.
    DropOnSend,
}

pub const RENT_PER_BYTE: u64 = 6_960;

pub struct MockLedger {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    outcome:  Mutex<Outcome>,
    sent:     Mutex<Vec<Transaction>>,
    polls:    Mutex<HashMap<Signature, usize>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            outcome:  Mutex::new(Outcome::Confirm { pending_polls: 0 }),
            sent:     Mutex::new(Vec::new()),
            polls:    Mutex::new(HashMap::new()),
        }
    }
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> usize {
        self.polls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn minimum_balance_for_rent_exemption(&self, span: usize) -> Result<u64> {
        Ok(span as u64 * RENT_PER_BYTE)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.sent.lock().unwrap().push(transaction.clone());
        let signature = transaction.signatures[0];
        match self.outcome.lock().unwrap().clone() {
            Outcome::RejectOnSend(reason) => {
                Err(Error::LedgerRejected { signature: Some(signature), reason, logs: Vec::new() })
            }
            Outcome::RejectWithLogs { reason, logs } => {
                Err(Error::LedgerRejected { signature: None, reason, logs })
            }
            Outcome::DropOnSend => Err(Error::Rpc(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset").into(),
            )),
            _ => Ok(signature),
        }
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureStatus> {
        let polls = {
            let mut polls = self.polls.lock().unwrap();
            let n = polls.entry(*signature).or_insert(0);
            *n += 1;
            *n
        };
        Ok(match self.outcome.lock().unwrap().clone() {
            Outcome::Confirm { pending_polls } if polls > pending_polls => SignatureStatus::Confirmed,
            Outcome::FailOnChain(reason) => SignatureStatus::Failed(reason),
            _ => SignatureStatus::Pending,
        })
    }
}

pub fn fast_policy() -> ConfirmationPolicy {
    ConfirmationPolicy {
        timeout:       std::time::Duration::from_secs(5),
        poll_interval: std::time::Duration::from_millis(10),
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig { confirm_timeout_ms: 5_000, poll_interval_ms: 10, ..ClientConfig::default() }
}

pub fn client(ledger: &Arc<MockLedger>) -> TokenStreamClient<MockLedger> {
    TokenStreamClient::with_ledger(Arc::clone(ledger), test_config()).unwrap()
}
