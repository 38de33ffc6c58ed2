//! Low-level instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission. Account order and signer/writable flags
//! mirror what the program reads, exactly; payloads are a one-byte opcode
//! followed by the operation's packed fields.
//!
//! Builders do no I/O. The only way they fail is a codec error.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};

use crate::error::Result;
use crate::layout::{encode, field, FieldKind, Fields, Layout, Numberu64, Value};

// ─── Opcodes ──────────────────────────────────────────────────────────────────

pub mod opcode {
    pub const INITIALIZE_POOL: u8 = 0;
    pub const SWAP: u8 = 1;
    /// Shares its value with [`SWAP`] on the deployed program.
    pub const DEPOSIT_ALL_TOKEN_TYPES: u8 = 1;
    pub const WITHDRAW_ALL_TOKEN_TYPES: u8 = 2;
    pub const OPEN_STREAM_AGREEMENT: u8 = 3;
    pub const DEPOSIT_SINGLE_TOKEN_TYPE_EXACT_AMOUNT_IN: u8 = 4;
    pub const WITHDRAW_SINGLE_TOKEN_TYPE_EXACT_AMOUNT_OUT: u8 = 5;
}

// ─── Payload layouts ──────────────────────────────────────────────────────────

pub const INITIALIZE_POOL_DATA: Layout = Layout {
    name: "initialize_pool",
    fields: &[field("instruction", FieldKind::U8), field("nonce", FieldKind::U8)],
};

pub const SWAP_DATA: Layout = Layout {
    name: "swap",
    fields: &[
        field("instruction", FieldKind::U8),
        field("amount_in", FieldKind::U64),
        field("minimum_amount_out", FieldKind::U64),
    ],
};

pub const DEPOSIT_ALL_TOKEN_TYPES_DATA: Layout = Layout {
    name: "deposit_all_token_types",
    fields: &[field("instruction", FieldKind::U8), field("pool_token_amount", FieldKind::U64)],
};

pub const WITHDRAW_ALL_TOKEN_TYPES_DATA: Layout = Layout {
    name: "withdraw_all_token_types",
    fields: &[field("instruction", FieldKind::U8), field("pool_token_amount", FieldKind::U64)],
};

pub const DEPOSIT_SINGLE_DATA: Layout = Layout {
    name: "deposit_single_token_type_exact_amount_in",
    fields: &[
        field("instruction", FieldKind::U8),
        field("source_token_amount", FieldKind::U64),
        field("minimum_pool_token_amount", FieldKind::U64),
    ],
};

pub const WITHDRAW_SINGLE_DATA: Layout = Layout {
    name: "withdraw_single_token_type_exact_amount_out",
    fields: &[
        field("instruction", FieldKind::U8),
        field("destination_token_amount", FieldKind::U64),
        field("maximum_pool_token_amount", FieldKind::U64),
    ],
};

pub const OPEN_STREAM_AGREEMENT_DATA: Layout = Layout {
    name: "open_stream_agreement",
    fields: &[field("instruction", FieldKind::U8), field("flow_rate", FieldKind::U64)],
};

fn payload(layout: &Layout, op: u8, amounts: &[(&'static str, u64)]) -> Result<Vec<u8>> {
    let mut fields = Fields::new().with("instruction", Value::U8(op));
    for &(name, amount) in amounts {
        fields.insert(name, Value::U64(Numberu64::from(amount)));
    }
    encode(layout, &fields)
}

// ─── Account allocation ───────────────────────────────────────────────────────

/// System-program `create_account` for a new account owned by `owner`.
///
/// `lamports` must be the rent-exempt minimum for `space`, fetched just
/// before the envelope is built.
pub fn allocate_account_ix(
    payer:       &Pubkey,
    new_account: &Pubkey,
    lamports:    u64,
    space:       usize,
    owner:       &Pubkey,
) -> Instruction {
    system_instruction::create_account(payer, new_account, lamports, space as u64, owner)
}

// ─── initialize_pool ─────────────────────────────────────────────────────────

/// Build the `InitializePool` instruction.
///
/// `pool` must already be allocated (see [`create_pool_ixs`]); `nonce` is the
/// bump that derives `authority` from `pool`.
#[allow(clippy::too_many_arguments)]
pub fn initialize_pool_ix(
    program_id:         &Pubkey,
    pool:               &Pubkey,
    authority:          &Pubkey,
    token_account_a:    &Pubkey,
    pool_mint:          &Pubkey,
    fee_account:        &Pubkey,
    pool_token_account: &Pubkey,
    token_program_id:   &Pubkey,
    nonce:              u8,
) -> Result<Instruction> {
    let data = encode(
        &INITIALIZE_POOL_DATA,
        &Fields::new()
            .with("instruction", Value::U8(opcode::INITIALIZE_POOL))
            .with("nonce", Value::U8(nonce)),
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*pool,                       false),  // mut
            AccountMeta::new_readonly(*authority,         false),
            AccountMeta::new_readonly(*token_account_a,   false),
            AccountMeta::new(*pool_mint,                  false),  // mut
            AccountMeta::new_readonly(*fee_account,       false),
            AccountMeta::new(*pool_token_account,         false),  // mut
            AccountMeta::new_readonly(*token_program_id,  false),
        ],
        data,
    })
}

/// `[allocate(pool), initialize_pool]`, sent together so pool creation is atomic.
#[allow(clippy::too_many_arguments)]
pub fn create_pool_ixs(
    program_id:         &Pubkey,
    payer:              &Pubkey,
    pool:               &Pubkey,
    pool_span:          usize,
    rent_lamports:      u64,
    authority:          &Pubkey,
    token_account_a:    &Pubkey,
    pool_mint:          &Pubkey,
    fee_account:        &Pubkey,
    pool_token_account: &Pubkey,
    token_program_id:   &Pubkey,
    nonce:              u8,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        allocate_account_ix(payer, pool, rent_lamports, pool_span, program_id),
        initialize_pool_ix(
            program_id,
            pool,
            authority,
            token_account_a,
            pool_mint,
            fee_account,
            pool_token_account,
            token_program_id,
            nonce,
        )?,
    ])
}

// ─── swap ─────────────────────────────────────────────────────────────────────

/// Build the `Swap` instruction.
///
/// `host_fee_account`, when given, sits between the fee account and the
/// token program; when `None` the account list is one shorter.
#[allow(clippy::too_many_arguments)]
pub fn swap_ix(
    program_id:         &Pubkey,
    pool:               &Pubkey,
    authority:          &Pubkey,
    transfer_authority: &Pubkey,
    user_source:        &Pubkey,
    pool_source:        &Pubkey,
    pool_destination:   &Pubkey,
    user_destination:   &Pubkey,
    pool_mint:          &Pubkey,
    fee_account:        &Pubkey,
    host_fee_account:   Option<&Pubkey>,
    token_program_id:   &Pubkey,
    amount_in:          u64,
    minimum_amount_out: u64,
) -> Result<Instruction> {
    let data = payload(
        &SWAP_DATA,
        opcode::SWAP,
        &[("amount_in", amount_in), ("minimum_amount_out", minimum_amount_out)],
    )?;

    let mut accounts = vec![
        AccountMeta::new_readonly(*pool,               false),
        AccountMeta::new_readonly(*authority,          false),
        AccountMeta::new_readonly(*transfer_authority, true),   // signer
        AccountMeta::new(*user_source,                 false),  // mut
        AccountMeta::new(*pool_source,                 false),  // mut
        AccountMeta::new(*pool_destination,            false),  // mut
        AccountMeta::new(*user_destination,            false),  // mut
        AccountMeta::new(*pool_mint,                   false),  // mut
        AccountMeta::new(*fee_account,                 false),  // mut
    ];
    if let Some(host) = host_fee_account {
        accounts.push(AccountMeta::new(*host, false));          // mut
    }
    accounts.push(AccountMeta::new_readonly(*token_program_id, false));

    Ok(Instruction { program_id: *program_id, accounts, data })
}

// ─── deposit_all_token_types ──────────────────────────────────────────────────

/// Build the `DepositAllTokenTypes` instruction.
#[allow(clippy::too_many_arguments)]
pub fn deposit_all_token_types_ix(
    program_id:         &Pubkey,
    pool:               &Pubkey,
    authority:          &Pubkey,
    transfer_authority: &Pubkey,
    user_source:        &Pubkey,
    pool_token_account: &Pubkey,
    pool_mint:          &Pubkey,
    user_pool_account:  &Pubkey,
    token_program_id:   &Pubkey,
    pool_token_amount:  u64,
) -> Result<Instruction> {
    let data = payload(
        &DEPOSIT_ALL_TOKEN_TYPES_DATA,
        opcode::DEPOSIT_ALL_TOKEN_TYPES,
        &[("pool_token_amount", pool_token_amount)],
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool,               false),
            AccountMeta::new_readonly(*authority,          false),
            AccountMeta::new_readonly(*transfer_authority, true),   // signer
            AccountMeta::new(*user_source,                 false),  // mut
            AccountMeta::new(*pool_token_account,          false),  // mut
            AccountMeta::new(*pool_mint,                   false),  // mut
            AccountMeta::new(*user_pool_account,           false),  // mut
            AccountMeta::new_readonly(*token_program_id,   false),
        ],
        data,
    })
}

// ─── withdraw_all_token_types ─────────────────────────────────────────────────

/// Build the `WithdrawAllTokenTypes` instruction.
///
/// The payload carries only the pool-token amount; the program reads no
/// per-token minimums.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_all_token_types_ix(
    program_id:         &Pubkey,
    pool:               &Pubkey,
    authority:          &Pubkey,
    transfer_authority: &Pubkey,
    pool_mint:          &Pubkey,
    user_pool_account:  &Pubkey,
    pool_token_account: &Pubkey,
    user_destination:   &Pubkey,
    fee_account:        &Pubkey,
    token_program_id:   &Pubkey,
    pool_token_amount:  u64,
) -> Result<Instruction> {
    let data = payload(
        &WITHDRAW_ALL_TOKEN_TYPES_DATA,
        opcode::WITHDRAW_ALL_TOKEN_TYPES,
        &[("pool_token_amount", pool_token_amount)],
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool,               false),
            AccountMeta::new_readonly(*authority,          false),
            AccountMeta::new_readonly(*transfer_authority, true),   // signer
            AccountMeta::new(*pool_mint,                   false),  // mut
            AccountMeta::new(*user_pool_account,           false),  // mut
            AccountMeta::new(*pool_token_account,          false),  // mut
            AccountMeta::new(*user_destination,            false),  // mut
            AccountMeta::new(*fee_account,                 false),  // mut
            AccountMeta::new_readonly(*token_program_id,   false),
        ],
        data,
    })
}

// ─── single-sided deposit / withdraw ──────────────────────────────────────────

/// Build the `DepositSingleTokenTypeExactAmountIn` instruction.
#[allow(clippy::too_many_arguments)]
pub fn deposit_single_token_type_exact_amount_in_ix(
    program_id:                &Pubkey,
    pool:                      &Pubkey,
    authority:                 &Pubkey,
    transfer_authority:        &Pubkey,
    source:                    &Pubkey,
    into_a:                    &Pubkey,
    into_b:                    &Pubkey,
    pool_mint:                 &Pubkey,
    user_pool_account:         &Pubkey,
    token_program_id:          &Pubkey,
    source_token_amount:       u64,
    minimum_pool_token_amount: u64,
) -> Result<Instruction> {
    let data = payload(
        &DEPOSIT_SINGLE_DATA,
        opcode::DEPOSIT_SINGLE_TOKEN_TYPE_EXACT_AMOUNT_IN,
        &[
            ("source_token_amount", source_token_amount),
            ("minimum_pool_token_amount", minimum_pool_token_amount),
        ],
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool,               false),
            AccountMeta::new_readonly(*authority,          false),
            AccountMeta::new_readonly(*transfer_authority, true),   // signer
            AccountMeta::new_readonly(*source,             false),
            AccountMeta::new(*into_a,                      false),  // mut
            AccountMeta::new(*into_b,                      false),  // mut
            AccountMeta::new(*pool_mint,                   false),  // mut
            AccountMeta::new(*user_pool_account,           false),  // mut
            AccountMeta::new_readonly(*token_program_id,   false),
        ],
        data,
    })
}

/// Build the `WithdrawSingleTokenTypeExactAmountOut` instruction.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_single_token_type_exact_amount_out_ix(
    program_id:                &Pubkey,
    pool:                      &Pubkey,
    authority:                 &Pubkey,
    transfer_authority:        &Pubkey,
    pool_mint:                 &Pubkey,
    user_pool_account:         &Pubkey,
    from_a:                    &Pubkey,
    from_b:                    &Pubkey,
    user_destination:          &Pubkey,
    fee_account:               &Pubkey,
    token_program_id:          &Pubkey,
    destination_token_amount:  u64,
    maximum_pool_token_amount: u64,
) -> Result<Instruction> {
    let data = payload(
        &WITHDRAW_SINGLE_DATA,
        opcode::WITHDRAW_SINGLE_TOKEN_TYPE_EXACT_AMOUNT_OUT,
        &[
            ("destination_token_amount", destination_token_amount),
            ("maximum_pool_token_amount", maximum_pool_token_amount),
        ],
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool,               false),
            AccountMeta::new_readonly(*authority,          false),
            AccountMeta::new_readonly(*transfer_authority, true),   // signer
            AccountMeta::new(*pool_mint,                   false),  // mut
            AccountMeta::new(*user_pool_account,           false),  // mut
            AccountMeta::new(*from_a,                      false),  // mut
            AccountMeta::new(*from_b,                      false),  // mut
            AccountMeta::new(*user_destination,            false),  // mut
            AccountMeta::new(*fee_account,                 false),  // mut
            AccountMeta::new_readonly(*token_program_id,   false),
        ],
        data,
    })
}

// ─── open_stream_agreement ────────────────────────────────────────────────────

/// Build the `OpenStreamAgreement` instruction.
///
/// Only the pool is written; the agreement accounts are filled in by the
/// program through the pool authority. The last meta is the program itself.
#[allow(clippy::too_many_arguments)]
pub fn open_stream_agreement_ix(
    program_id:         &Pubkey,
    pool:               &Pubkey,
    authority:          &Pubkey,
    transfer_authority: &Pubkey,
    user_account_a:     &Pubkey,
    agreement_a:        &Pubkey,
    user_account_b:     &Pubkey,
    agreement_b:        &Pubkey,
    flow_rate:          u64,
) -> Result<Instruction> {
    let data = payload(
        &OPEN_STREAM_AGREEMENT_DATA,
        opcode::OPEN_STREAM_AGREEMENT,
        &[("flow_rate", flow_rate)],
    )?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*pool,                        false),  // mut
            AccountMeta::new_readonly(*authority,          false),
            AccountMeta::new_readonly(*transfer_authority, false),
            AccountMeta::new_readonly(*user_account_a,     false),
            AccountMeta::new_readonly(*agreement_a,        false),
            AccountMeta::new_readonly(*user_account_b,     false),
            AccountMeta::new_readonly(*agreement_b,        false),
            AccountMeta::new_readonly(*program_id,         false),
        ],
        data,
    })
}

/// `[allocate(agreement_a), allocate(agreement_b), open_stream_agreement]`.
#[allow(clippy::too_many_arguments)]
pub fn open_stream_ixs(
    program_id:         &Pubkey,
    payer:              &Pubkey,
    agreement_span:     usize,
    rent_lamports:      u64,
    pool:               &Pubkey,
    authority:          &Pubkey,
    transfer_authority: &Pubkey,
    user_account_a:     &Pubkey,
    agreement_a:        &Pubkey,
    user_account_b:     &Pubkey,
    agreement_b:        &Pubkey,
    flow_rate:          u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        allocate_account_ix(payer, agreement_a, rent_lamports, agreement_span, program_id),
        allocate_account_ix(payer, agreement_b, rent_lamports, agreement_span, program_id),
        open_stream_agreement_ix(
            program_id,
            pool,
            authority,
            transfer_authority,
            user_account_a,
            agreement_a,
            user_account_b,
            agreement_b,
            flow_rate,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::decode;
    use solana_sdk::system_program;

    fn keys(n: usize) -> Vec<Pubkey> {
        (0..n).map(|_| Pubkey::new_unique()).collect()
    }

    /// `(is_signer, is_writable)` per meta, for table comparisons.
    fn flags(ix: &Instruction) -> Vec<(bool, bool)> {
        ix.accounts.iter().map(|m| (m.is_signer, m.is_writable)).collect()
    }

    fn pubkeys(ix: &Instruction) -> Vec<Pubkey> {
        ix.accounts.iter().map(|m| m.pubkey).collect()
    }

    const R: (bool, bool) = (false, false);
    const W: (bool, bool) = (false, true);
    const S: (bool, bool) = (true, false);

    #[test]
    fn initialize_pool_layout() {
        let k = keys(8);
        let ix = initialize_pool_ix(&k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], 253)
            .unwrap();
        assert_eq!(ix.program_id, k[0]);
        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![W, R, R, W, R, W, R]);
        assert_eq!(ix.data, vec![0, 253]);
        assert_eq!(ix.data.len(), INITIALIZE_POOL_DATA.span());
    }

    #[test]
    fn swap_without_host_fee() {
        let k = keys(11);
        let ix = swap_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], &k[9], None, &k[10],
            100_000, 90_674,
        )
        .unwrap();

        let mut expected = vec![1u8];
        expected.extend_from_slice(&100_000u64.to_le_bytes());
        expected.extend_from_slice(&90_674u64.to_le_bytes());
        assert_eq!(ix.data, expected);
        assert_eq!(ix.data.len(), 17);

        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![R, R, S, W, W, W, W, W, W, R]);
    }

    #[test]
    fn swap_with_host_fee_inserts_before_token_program() {
        let k = keys(12);
        let ix = swap_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], &k[9], Some(&k[11]),
            &k[10], 5, 4,
        )
        .unwrap();
        assert_eq!(ix.accounts.len(), 11);
        assert_eq!(ix.accounts[9].pubkey, k[11]);
        assert_eq!(flags(&ix)[9], W);
        assert_eq!(ix.accounts[10].pubkey, k[10]);
        assert_eq!(flags(&ix)[10], R);
    }

    #[test]
    fn deposit_all_layout() {
        let k = keys(9);
        let ix = deposit_all_token_types_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], 10_000_000,
        )
        .unwrap();
        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![R, R, S, W, W, W, W, R]);
        assert_eq!(ix.data[0], opcode::DEPOSIT_ALL_TOKEN_TYPES);
        assert_eq!(ix.data.len(), DEPOSIT_ALL_TOKEN_TYPES_DATA.span());

        let fields = decode(&DEPOSIT_ALL_TOKEN_TYPES_DATA, &ix.data).unwrap();
        assert_eq!(fields.u64("pool_token_amount").unwrap(), Numberu64::from(10_000_000));
    }

    #[test]
    fn withdraw_all_layout() {
        let k = keys(10);
        let ix = withdraw_all_token_types_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], &k[9], 100_000,
        )
        .unwrap();
        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![R, R, S, W, W, W, W, W, R]);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[0], 2);
        assert_eq!(&ix.data[1..], &100_000u64.to_le_bytes());
    }

    #[test]
    fn deposit_single_layout() {
        let k = keys(10);
        let ix = deposit_single_token_type_exact_amount_in_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], &k[9], 7, 3,
        )
        .unwrap();
        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![R, R, S, R, W, W, W, W, R]);
        assert_eq!(ix.data.len(), 17);
        let fields = decode(&DEPOSIT_SINGLE_DATA, &ix.data).unwrap();
        assert_eq!(fields.u8("instruction").unwrap(), 4);
        assert_eq!(fields.u64("minimum_pool_token_amount").unwrap(), Numberu64::from(3));
    }

    #[test]
    fn withdraw_single_layout() {
        let k = keys(11);
        let ix = withdraw_single_token_type_exact_amount_out_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], &k[9], &k[10], 9, 12,
        )
        .unwrap();
        assert_eq!(pubkeys(&ix), k[1..].to_vec());
        assert_eq!(flags(&ix), vec![R, R, S, W, W, W, W, W, W, R]);
        let fields = decode(&WITHDRAW_SINGLE_DATA, &ix.data).unwrap();
        assert_eq!(fields.u8("instruction").unwrap(), 5);
        assert_eq!(fields.u64("destination_token_amount").unwrap(), Numberu64::from(9));
        assert_eq!(fields.u64("maximum_pool_token_amount").unwrap(), Numberu64::from(12));
    }

    #[test]
    fn open_stream_layout_ends_with_program_id() {
        let k = keys(8);
        let ix = open_stream_agreement_ix(
            &k[0], &k[1], &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], 1_212_438_012_090,
        )
        .unwrap();
        let mut expected = k[1..].to_vec();
        expected.push(k[0]);
        assert_eq!(pubkeys(&ix), expected);
        assert_eq!(flags(&ix), vec![W, R, R, R, R, R, R, R]);
        assert_eq!(ix.data[0], 3);
        assert_eq!(&ix.data[1..], &1_212_438_012_090u64.to_le_bytes());
    }

    #[test]
    fn create_pool_allocates_then_initializes_same_account() {
        let k = keys(9);
        let (program, payer, pool) = (k[0], k[1], k[2]);
        let ixs = create_pool_ixs(
            &program, &payer, &pool, 195, 2_039_280, &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], 255,
        )
        .unwrap();

        assert_eq!(ixs.len(), 2);
        let alloc = &ixs[0];
        assert_eq!(alloc.program_id, system_program::id());
        assert_eq!(alloc.accounts[0].pubkey, payer);
        assert_eq!(alloc.accounts[1].pubkey, pool);
        assert!(alloc.accounts[1].is_signer);
        assert_eq!(ixs[1].accounts[0].pubkey, pool);
        assert_eq!(ixs[1].program_id, program);
    }

    #[test]
    fn open_stream_allocates_both_agreements_first() {
        let k = keys(9);
        let ixs = open_stream_ixs(
            &k[0], &k[1], 786, 6_361_920, &k[2], &k[3], &k[4], &k[5], &k[6], &k[7], &k[8], 1,
        )
        .unwrap();
        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].accounts[1].pubkey, k[6]);
        assert_eq!(ixs[1].accounts[1].pubkey, k[8]);
        assert_eq!(ixs[2].accounts[4].pubkey, k[6]);
        assert_eq!(ixs[2].accounts[6].pubkey, k[8]);
    }
}
