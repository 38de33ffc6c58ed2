//! SDK error type.

use std::time::Duration;

use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// All errors returned by the token-stream SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed before reaching the program.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Codec ────────────────────────────────────────────────────────────────
    /// Input does not fit the declared layout (missing field, wrong kind,
    /// 64-bit overflow). A programming error; never retried.
    #[error("Layout mismatch in {layout}: {reason}")]
    LayoutMismatch { layout: &'static str, reason: String },

    /// Buffer is shorter than the layout's declared span.
    #[error("Truncated buffer for {layout}: {actual} bytes, expected at least {expected}")]
    TruncatedBuffer { layout: &'static str, expected: usize, actual: usize },

    /// Decoded account is not in a usable state (flag unset, bad count).
    #[error("Invalid {layout} state: {reason}")]
    InvalidState { layout: &'static str, reason: String },

    // ── Derivation ───────────────────────────────────────────────────────────
    #[error("No valid authority derivation for program {program_id}")]
    NoValidDerivation { program_id: Pubkey },

    // ── Accounts ─────────────────────────────────────────────────────────────
    #[error("Account {0} does not exist")]
    AccountNotFound(Pubkey),

    /// A structurally required account was not supplied and cannot be
    /// recovered from on-chain state.
    #[error("Missing required account: {0}")]
    MissingAccount(&'static str),

    // ── Ledger outcomes ──────────────────────────────────────────────────────
    /// The ledger refused or failed the transaction. `reason` is the node's
    /// message verbatim; `logs` holds the program logs from a failed preflight.
    #[error("Transaction rejected: {reason}{}", log_lines(.logs))]
    LedgerRejected { signature: Option<Signature>, reason: String, logs: Vec<String> },

    /// No terminal status was observed. Re-fetch state before building a
    /// new envelope.
    #[error("Transaction {signature} unconfirmed after {}ms", .waited.as_millis())]
    Inconclusive { signature: Signature, waited: Duration },

    #[error("Signing error: {0}")]
    Signing(String),

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// `true` for errors meaning the account is absent, too small or not yet
    /// initialized.
    pub fn is_account_not_ready(&self) -> bool {
        matches!(
            self,
            Error::AccountNotFound(_) | Error::TruncatedBuffer { .. } | Error::InvalidState { .. }
        )
    }
}

fn log_lines(logs: &[String]) -> String {
    logs.iter().map(|line| format!("\n  {line}")).collect()
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_truncated_buffer() {
        let err = Error::TruncatedBuffer { layout: "stream_agreement", expected: 786, actual: 10 };
        assert_eq!(
            err.to_string(),
            "Truncated buffer for stream_agreement: 10 bytes, expected at least 786"
        );
    }

    #[test]
    fn ledger_rejection_keeps_reason_verbatim() {
        let err = Error::LedgerRejected {
            signature: None,
            reason: "Error processing Instruction 1: account already initialized".into(),
            logs: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Transaction rejected: Error processing Instruction 1: account already initialized"
        );
    }

    #[test]
    fn ledger_rejection_appends_program_logs() {
        let err = Error::LedgerRejected {
            signature: None,
            reason: "Transaction simulation failed".into(),
            logs: vec![
                "Program AQ5P invoke [1]".into(),
                "Program log: Error: account already initialized".into(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Transaction rejected: Transaction simulation failed\n  Program AQ5P invoke [1]\n  \
             Program log: Error: account already initialized"
        );
    }

    #[test]
    fn account_not_ready_family() {
        assert!(Error::AccountNotFound(Pubkey::new_unique()).is_account_not_ready());
        assert!(Error::InvalidState { layout: "pool", reason: "x".into() }.is_account_not_ready());
        assert!(!Error::MissingAccount("host fee").is_account_not_ready());
        assert!(!Error::Inconclusive {
            signature: Signature::default(),
            waited: Duration::from_secs(1),
        }
        .is_account_not_ready());
    }
}
