//! Authority derivation and account bootstrap.
//!
//! The program signs for a pool (or agreement) through an address derived
//! from the parent account's public key: `find_program_address([parent], program)`.
//! The bump found by the search is the *nonce*; it is stored in the pool
//! account and resubmitted in `InitializePool` so the program can re-check it.

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::error::{Error, Result};

/// Derive the authority address and nonce for `seed` under `program_id`.
///
/// Fails with [`Error::NoValidDerivation`] when every nonce in `255..=0`
/// lands on the curve or the seed itself is not a valid seed (over 32 bytes).
pub fn derive_authority(seed: &[u8], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(&[seed], program_id)
        .ok_or(Error::NoValidDerivation { program_id: *program_id })
}

/// Recompute the authority from a persisted nonce and compare it.
pub fn verify_authority(
    seed:       &[u8],
    nonce:      u8,
    program_id: &Pubkey,
    expected:   &Pubkey,
) -> Result<()> {
    let derived = Pubkey::create_program_address(&[seed, &[nonce]], program_id)
        .map_err(|_| Error::NoValidDerivation { program_id: *program_id })?;
    if derived != *expected {
        return Err(Error::InvalidState {
            layout: "authority",
            reason: format!("nonce {nonce} derives {derived}, expected {expected}"),
        });
    }
    Ok(())
}

/// Authority address for an existing pool whose nonce is known.
pub fn authority_from_nonce(pool: &Pubkey, nonce: u8, program_id: &Pubkey) -> Result<Pubkey> {
    Pubkey::create_program_address(&[pool.as_ref(), &[nonce]], program_id)
        .map_err(|_| Error::NoValidDerivation { program_id: *program_id })
}

// ─── Bootstrap ────────────────────────────────────────────────────────────────

/// A fresh pool account together with its derived authority.
///
/// The authority must own the pool's token accounts and mint before
/// `create_pool` runs, so it is derived up front from the new keypair.
#[derive(Debug)]
pub struct PoolAccount {
    pub keypair:   Keypair,
    pub authority: Pubkey,
    pub nonce:     u8,
}

impl PoolAccount {
    pub fn generate(program_id: &Pubkey) -> Result<Self> {
        Self::from_keypair(Keypair::new(), program_id)
    }

    pub fn from_keypair(keypair: Keypair, program_id: &Pubkey) -> Result<Self> {
        let (authority, nonce) = derive_authority(keypair.pubkey().as_ref(), program_id)?;
        Ok(Self { keypair, authority, nonce })
    }

    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derivation_is_verifiable_with_its_nonce() {
        let program = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let (authority, nonce) = derive_authority(pool.as_ref(), &program).unwrap();

        verify_authority(pool.as_ref(), nonce, &program, &authority).unwrap();
        assert_eq!(authority_from_nonce(&pool, nonce, &program).unwrap(), authority);
        assert!(!authority.is_on_curve());
    }

    #[test]
    fn wrong_expected_authority_is_invalid_state() {
        let program = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let (_, nonce) = derive_authority(pool.as_ref(), &program).unwrap();
        let err = verify_authority(pool.as_ref(), nonce, &program, &Pubkey::new_unique())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState { layout: "authority", .. }));
    }

    #[test]
    fn oversized_seed_has_no_derivation() {
        let program = Pubkey::new_unique();
        let err = derive_authority(&[7u8; 33], &program).unwrap_err();
        assert!(matches!(err, Error::NoValidDerivation { program_id } if program_id == program));
    }

    #[test]
    fn pool_account_matches_manual_derivation() {
        let program = Pubkey::new_unique();
        let pool = PoolAccount::generate(&program).unwrap();
        let (authority, nonce) = derive_authority(pool.address().as_ref(), &program).unwrap();
        assert_eq!((pool.authority, pool.nonce), (authority, nonce));
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(seed in any::<[u8; 32]>(), program in any::<[u8; 32]>()) {
            let program = Pubkey::from(program);
            let first = derive_authority(&seed, &program).unwrap();
            let second = derive_authority(&seed, &program).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
