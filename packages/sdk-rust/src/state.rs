//! On-chain account deserialization.
//!
//! Parses raw account bytes for pools (195 or 227 bytes depending on the
//! [`PoolSchema`]) and stream agreements (786 bytes). Offsets follow the
//! program's packed layouts; there is no discriminator.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::derivation::authority_from_nonce;
use crate::error::{Error, Result};
use crate::layout::{decode, encode, field, FieldKind, Fields, Layout, Value};

// ─── Pool ─────────────────────────────────────────────────────────────────────

/// Single-sided pool layout:
/// ```text
/// version(1) is_initialized(1) nonce(1) token_program_id(32)
/// token_account_a(32) pool_mint(32) mint_a(32) authority(32) fee_account(32)
/// = 195 bytes
/// ```
pub const POOL_LAYOUT: Layout = Layout {
    name: "pool",
    fields: &[
        field("version", FieldKind::U8),
        field("is_initialized", FieldKind::Flag),
        field("nonce", FieldKind::U8),
        field("token_program_id", FieldKind::Pubkey),
        field("token_account_a", FieldKind::Pubkey),
        field("pool_mint", FieldKind::Pubkey),
        field("mint_a", FieldKind::Pubkey),
        field("authority", FieldKind::Pubkey),
        field("fee_account", FieldKind::Pubkey),
    ],
};

/// Two-sided pool layout; the authority is not stored:
/// ```text
/// version(1) is_initialized(1) nonce(1) token_program_id(32)
/// token_account_a(32) token_account_b(32) pool_mint(32) mint_a(32) mint_b(32)
/// fee_account(32) = 227 bytes
/// ```
pub const POOL_LAYOUT_TWO_SIDED: Layout = Layout {
    name: "pool_two_sided",
    fields: &[
        field("version", FieldKind::U8),
        field("is_initialized", FieldKind::Flag),
        field("nonce", FieldKind::U8),
        field("token_program_id", FieldKind::Pubkey),
        field("token_account_a", FieldKind::Pubkey),
        field("token_account_b", FieldKind::Pubkey),
        field("pool_mint", FieldKind::Pubkey),
        field("mint_a", FieldKind::Pubkey),
        field("mint_b", FieldKind::Pubkey),
        field("fee_account", FieldKind::Pubkey),
    ],
};

/// Which pool layout the deployed program writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSchema {
    #[default]
    SingleSided,
    TwoSided,
}

impl PoolSchema {
    pub fn layout(self) -> &'static Layout {
        match self {
            PoolSchema::SingleSided => &POOL_LAYOUT,
            PoolSchema::TwoSided => &POOL_LAYOUT_TWO_SIDED,
        }
    }

    /// Account size to allocate for a new pool.
    pub fn span(self) -> usize {
        self.layout().span()
    }
}

/// Deserialized pool account state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub schema:           PoolSchema,
    /// Reserved by the program; not interpreted here.
    pub version:          u8,
    pub is_initialized:   bool,
    /// Bump used to derive `authority` from the pool address.
    pub nonce:            u8,
    pub token_program_id: Pubkey,
    pub token_account_a:  Pubkey,
    /// Only stored by [`PoolSchema::TwoSided`].
    pub token_account_b:  Option<Pubkey>,
    pub pool_mint:        Pubkey,
    /// Source mint.
    pub mint_a:           Pubkey,
    pub mint_b:           Option<Pubkey>,
    /// Only stored by [`PoolSchema::SingleSided`]; see [`PoolState::authority_for`].
    pub authority:        Option<Pubkey>,
    pub fee_account:      Pubkey,
}

impl PoolState {
    /// Deserialize a pool account from raw bytes.
    pub fn unpack(schema: PoolSchema, data: &[u8]) -> Result<Self> {
        let f = decode(schema.layout(), data)?;
        let (token_account_b, mint_b, authority) = match schema {
            PoolSchema::SingleSided => (None, None, Some(f.pubkey("authority")?)),
            PoolSchema::TwoSided => {
                (Some(f.pubkey("token_account_b")?), Some(f.pubkey("mint_b")?), None)
            }
        };
        Ok(Self {
            schema,
            version:          f.u8("version")?,
            is_initialized:   f.flag("is_initialized")?,
            nonce:            f.u8("nonce")?,
            token_program_id: f.pubkey("token_program_id")?,
            token_account_a:  f.pubkey("token_account_a")?,
            token_account_b,
            pool_mint:        f.pubkey("pool_mint")?,
            mint_a:           f.pubkey("mint_a")?,
            mint_b,
            authority,
            fee_account:      f.pubkey("fee_account")?,
        })
    }

    /// Serialize back into the schema's layout.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut f = Fields::new()
            .with("version", Value::U8(self.version))
            .with("is_initialized", Value::Flag(self.is_initialized))
            .with("nonce", Value::U8(self.nonce))
            .with("token_program_id", Value::Pubkey(self.token_program_id))
            .with("token_account_a", Value::Pubkey(self.token_account_a))
            .with("pool_mint", Value::Pubkey(self.pool_mint))
            .with("mint_a", Value::Pubkey(self.mint_a))
            .with("fee_account", Value::Pubkey(self.fee_account));
        if let Some(authority) = self.authority {
            f.insert("authority", Value::Pubkey(authority));
        }
        if let Some(account_b) = self.token_account_b {
            f.insert("token_account_b", Value::Pubkey(account_b));
        }
        if let Some(mint_b) = self.mint_b {
            f.insert("mint_b", Value::Pubkey(mint_b));
        }
        encode(self.schema.layout(), &f)
    }

    /// The pool's authority: the stored one, or the address re-derived from
    /// `pool` and the stored nonce.
    ///
    /// A stored authority is checked against the nonce as well, so a pool
    /// written under a different program id is rejected here rather than by
    /// the program.
    pub fn authority_for(&self, pool: &Pubkey, program_id: &Pubkey) -> Result<Pubkey> {
        let derived = authority_from_nonce(pool, self.nonce, program_id)?;
        match self.authority {
            Some(stored) if stored != derived => Err(Error::InvalidState {
                layout: self.schema.layout().name,
                reason: format!("stored authority {stored} does not match nonce {}", self.nonce),
            }),
            _ => Ok(derived),
        }
    }
}

// ─── Stream agreement ─────────────────────────────────────────────────────────

pub const STREAM_BALANCE_LEN: usize = 32;
pub const AGREEMENT_TABLE_LEN: usize = 720;
/// Width of one packed record in the agreement table. `MAX_AGREEMENTS` and the
/// rejection of any larger `agreement_count` both follow from this width.
pub const AGREEMENT_RECORD_LEN: usize = 72;
pub const MAX_AGREEMENTS: usize = AGREEMENT_TABLE_LEN / AGREEMENT_RECORD_LEN;

/// Stream agreement layout:
/// ```text
/// is_initialized(1) agreement_count(1) stream_balance(32) agreements(720)
/// stream_token_info_account(32) = 786 bytes
/// ```
pub const STREAM_AGREEMENT_LAYOUT: Layout = Layout {
    name: "stream_agreement",
    fields: &[
        field("is_initialized", FieldKind::Flag),
        field("agreement_count", FieldKind::U8),
        field("stream_balance", FieldKind::Blob(STREAM_BALANCE_LEN)),
        field("agreements", FieldKind::Blob(AGREEMENT_TABLE_LEN)),
        field("stream_token_info_account", FieldKind::Pubkey),
    ],
};

/// Deserialized stream agreement account.
///
/// The balance and the agreement records stay opaque: their accounting is
/// the program's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamAgreementState {
    pub is_initialized:            bool,
    pub agreement_count:           u8,
    pub stream_balance:            [u8; STREAM_BALANCE_LEN],
    pub agreement_table:           Vec<u8>,
    pub stream_token_info_account: Pubkey,
}

impl StreamAgreementState {
    pub const LEN: usize = STREAM_AGREEMENT_LAYOUT.span();

    /// Deserialize a stream agreement account from raw bytes.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let f = decode(&STREAM_AGREEMENT_LAYOUT, data)?;
        let agreement_count = f.u8("agreement_count")?;
        if agreement_count as usize > MAX_AGREEMENTS {
            return Err(Error::InvalidState {
                layout: STREAM_AGREEMENT_LAYOUT.name,
                reason: format!(
                    "{agreement_count} agreements of {AGREEMENT_RECORD_LEN} bytes overflow the \
                     {AGREEMENT_TABLE_LEN}-byte table"
                ),
            });
        }
        let stream_balance: [u8; STREAM_BALANCE_LEN] = f
            .blob("stream_balance")?
            .try_into()
            .map_err(|_| Error::LayoutMismatch {
                layout: STREAM_AGREEMENT_LAYOUT.name,
                reason: "stream_balance width".into(),
            })?;
        Ok(Self {
            is_initialized: f.flag("is_initialized")?,
            agreement_count,
            stream_balance,
            agreement_table: f.blob("agreements")?.to_vec(),
            stream_token_info_account: f.pubkey("stream_token_info_account")?,
        })
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let f = Fields::new()
            .with("is_initialized", Value::Flag(self.is_initialized))
            .with("agreement_count", Value::U8(self.agreement_count))
            .with("stream_balance", Value::Blob(self.stream_balance.to_vec()))
            .with("agreements", Value::Blob(self.agreement_table.clone()))
            .with("stream_token_info_account", Value::Pubkey(self.stream_token_info_account));
        encode(&STREAM_AGREEMENT_LAYOUT, &f)
    }

    /// The live records, in table order. Slots past `agreement_count` are skipped.
    pub fn agreements(&self) -> impl Iterator<Item = &[u8]> {
        self.agreement_table
            .chunks_exact(AGREEMENT_RECORD_LEN)
            .take(self.agreement_count as usize)
    }
}
