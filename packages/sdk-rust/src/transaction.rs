//! Envelope assembly, submission and confirmation.
//!
//! An operation moves through
//! `Built -> Submitted -> {Confirmed | Failed | TimedOut}` exactly once.
//! [`PendingOperation::subscribe`] exposes those transitions; the final one
//! is also returned from [`PendingOperation::run`] as a `Result`.

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tokio::sync::watch;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ledger::{Ledger, SignatureStatus};

// ─── Envelope ─────────────────────────────────────────────────────────────────

/// Instructions plus every keypair needed to authorize them.
///
/// Built fresh for each operation and consumed by submission, so an
/// envelope can never be sent twice.
pub struct TransactionEnvelope<'a> {
    label:        &'static str,
    fee_payer:    &'a Keypair,
    signers:      Vec<&'a Keypair>,
    instructions: Vec<Instruction>,
}

impl<'a> TransactionEnvelope<'a> {
    pub fn new(label: &'static str, fee_payer: &'a Keypair) -> Self {
        Self { label, fee_payer, signers: Vec::new(), instructions: Vec::new() }
    }

    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn instructions(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(instructions);
        self
    }

    /// Add a co-signer (new account, transfer authority). Duplicates of the
    /// fee payer or of an earlier signer are dropped.
    pub fn signer(mut self, signer: &'a Keypair) -> Self {
        let key = signer.pubkey();
        if key != self.fee_payer.pubkey() && self.signers.iter().all(|s| s.pubkey() != key) {
            self.signers.push(signer);
        }
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    pub fn instruction_list(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Fee payer first, then co-signers in insertion order.
    pub fn signer_keys(&self) -> Vec<Pubkey> {
        std::iter::once(self.fee_payer.pubkey())
            .chain(self.signers.iter().map(|s| s.pubkey()))
            .collect()
    }

    /// Compile and sign against `blockhash`.
    pub fn sign(self, blockhash: Hash) -> Result<Transaction> {
        if self.instructions.is_empty() {
            return Err(Error::InvalidState {
                layout: "envelope",
                reason: format!("`{}` has no instructions", self.label),
            });
        }
        let mut signers: Vec<&dyn Signer> = vec![self.fee_payer];
        signers.extend(self.signers.iter().map(|k| *k as &dyn Signer));

        let mut tx = Transaction::new_with_payer(&self.instructions, Some(&self.fee_payer.pubkey()));
        tx.try_sign(&signers, blockhash)
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(tx)
    }
}

// ─── State machine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Built,
    Submitted(Signature),
    Confirmed(Signature),
    /// Ledger's reason, verbatim.
    Failed(String),
    /// No terminal status within the budget; the transaction may still land.
    TimedOut(Signature),
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationState::Confirmed(_) | OperationState::Failed(_) | OperationState::TimedOut(_)
        )
    }
}

/// How long to wait for a terminal status and how often to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout:       Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(60), poll_interval: Duration::from_millis(500) }
    }
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────

pub struct Orchestrator<L: ?Sized> {
    ledger: Arc<L>,
    policy: ConfirmationPolicy,
}

impl<L: ?Sized> Clone for Orchestrator<L> {
    fn clone(&self) -> Self {
        Self { ledger: Arc::clone(&self.ledger), policy: self.policy }
    }
}

impl<L: Ledger + ?Sized> Orchestrator<L> {
    pub fn new(ledger: Arc<L>, policy: ConfirmationPolicy) -> Self {
        Self { ledger, policy }
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    /// Wrap an envelope in the `Built` state without sending anything.
    pub fn prepare<'a>(&self, envelope: TransactionEnvelope<'a>) -> PendingOperation<'a, L> {
        let (state, _) = watch::channel(OperationState::Built);
        PendingOperation {
            ledger: Arc::clone(&self.ledger),
            policy: self.policy,
            envelope,
            state,
        }
    }

    /// Submit and wait; the confirmed signature or the terminal error.
    pub async fn execute(&self, envelope: TransactionEnvelope<'_>) -> Result<Signature> {
        self.prepare(envelope).run().await
    }
}

/// One operation in flight. Dropping it before [`run`](Self::run) sends nothing.
pub struct PendingOperation<'a, L: ?Sized> {
    ledger:   Arc<L>,
    policy:   ConfirmationPolicy,
    envelope: TransactionEnvelope<'a>,
    state:    watch::Sender<OperationState>,
}

impl<'a, L: Ledger + ?Sized> PendingOperation<'a, L> {
    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    pub fn envelope(&self) -> &TransactionEnvelope<'a> {
        &self.envelope
    }

    pub async fn run(self) -> Result<Signature> {
        let Self { ledger, policy, envelope, state } = self;
        let label = envelope.label();

        let blockhash = match ledger.latest_blockhash().await {
            Ok(hash) => hash,
            Err(err) => {
                state.send_replace(OperationState::Failed(err.to_string()));
                return Err(err);
            }
        };
        let tx = match envelope.sign(blockhash) {
            Ok(tx) => tx,
            Err(err) => {
                state.send_replace(OperationState::Failed(err.to_string()));
                return Err(err);
            }
        };
        // known before sending; the fee payer's signature names the transaction
        let signature = tx.signatures[0];
        let started = Instant::now();

        match ledger.send_transaction(&tx).await {
            Ok(_) => {
                info!(label, %signature, "transaction submitted");
                state.send_replace(OperationState::Submitted(signature));
            }
            Err(Error::LedgerRejected { reason, logs, .. }) => {
                warn!(label, %signature, %reason, log_lines = logs.len(), "transaction rejected");
                state.send_replace(OperationState::Failed(reason.clone()));
                return Err(Error::LedgerRejected { signature: Some(signature), reason, logs });
            }
            Err(err) => {
                // no answer from the node; it may have reached the leader anyway
                warn!(label, %signature, error = %err, "send failed; outcome unknown");
                state.send_replace(OperationState::TimedOut(signature));
                return Err(Error::Inconclusive { signature, waited: started.elapsed() });
            }
        }

        let outcome = timeout(policy.timeout, await_terminal(&*ledger, &signature, policy)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(SignatureStatus::Confirmed) => {
                info!(label, %signature, elapsed_ms, "transaction confirmed");
                state.send_replace(OperationState::Confirmed(signature));
                Ok(signature)
            }
            Ok(SignatureStatus::Failed(reason)) => {
                warn!(label, %signature, %reason, elapsed_ms, "transaction failed");
                state.send_replace(OperationState::Failed(reason.clone()));
                Err(Error::LedgerRejected { signature: Some(signature), reason, logs: Vec::new() })
            }
            Ok(SignatureStatus::Pending) | Err(_) => {
                warn!(label, %signature, elapsed_ms, "no confirmation within budget");
                state.send_replace(OperationState::TimedOut(signature));
                Err(Error::Inconclusive { signature, waited: started.elapsed() })
            }
        }
    }
}

/// Poll until the ledger reports a terminal status. Transport errors are
/// logged and polled through; the caller's timeout bounds the loop.
async fn await_terminal<L: Ledger + ?Sized>(
    ledger:    &L,
    signature: &Signature,
    policy:    ConfirmationPolicy,
) -> SignatureStatus {
    loop {
        match ledger.signature_status(signature).await {
            Ok(SignatureStatus::Pending) => debug!(%signature, "pending"),
            Ok(terminal) => return terminal,
            Err(err) => warn!(%signature, error = %err, "status poll failed"),
        }
        sleep(policy.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::instruction::AccountMeta;

    fn noop(program: Pubkey, signer: Pubkey) -> Instruction {
        Instruction {
            program_id: program,
            accounts:   vec![AccountMeta::new_readonly(signer, true)],
            data:       vec![9],
        }
    }

    #[test]
    fn signer_list_is_deduplicated_payer_first() {
        let payer = Keypair::new();
        let other = Keypair::new();
        let env = TransactionEnvelope::new("t", &payer)
            .signer(&other)
            .signer(&payer)
            .signer(&other);
        assert_eq!(env.signer_keys(), vec![payer.pubkey(), other.pubkey()]);
    }

    #[test]
    fn sign_produces_fee_payer_signature_first() {
        let payer = Keypair::new();
        let authority = Keypair::new();
        let tx = TransactionEnvelope::new("t", &payer)
            .instruction(noop(Pubkey::new_unique(), authority.pubkey()))
            .signer(&authority)
            .sign(Hash::new_unique())
            .unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(tx.message.account_keys[0], payer.pubkey());
        tx.verify().unwrap();
    }

    #[test]
    fn missing_signer_is_a_signing_error() {
        let payer = Keypair::new();
        let absent = Keypair::new();
        let err = TransactionEnvelope::new("t", &payer)
            .instruction(noop(Pubkey::new_unique(), absent.pubkey()))
            .sign(Hash::new_unique())
            .unwrap_err();
        assert!(matches!(err, Error::Signing(_)), "{err}");
    }

    #[test]
    fn empty_envelope_is_rejected() {
        let payer = Keypair::new();
        let err = TransactionEnvelope::new("empty", &payer).sign(Hash::new_unique()).unwrap_err();
        assert!(matches!(err, Error::InvalidState { layout: "envelope", .. }));
    }

    #[test]
    fn terminal_states() {
        let sig = Signature::default();
        assert!(!OperationState::Built.is_terminal());
        assert!(!OperationState::Submitted(sig).is_terminal());
        assert!(OperationState::Confirmed(sig).is_terminal());
        assert!(OperationState::Failed("x".into()).is_terminal());
        assert!(OperationState::TimedOut(sig).is_terminal());
    }
}
