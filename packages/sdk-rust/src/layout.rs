//! Fixed-layout binary codec.
//!
//! Every account and instruction payload the program understands is a
//! packed record: fields in declaration order, fixed widths, no padding
//! beyond declared blob sizes. A [`Layout`] describes one such record and
//! [`encode`] / [`decode`] move between [`Fields`] and raw bytes.

use std::collections::BTreeMap;
use std::fmt;

use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

// ─── Numberu64 ────────────────────────────────────────────────────────────────

/// Unsigned amount carried as a wide integer and serialized as exactly eight
/// little-endian bytes.
///
/// Arithmetic happens on the wide value; only [`Numberu64::to_le_bytes`]
/// enforces the 64-bit wire width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numberu64(u128);

impl Numberu64 {
    pub const WIDTH: usize = 8;

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    /// Wire form. Fails when the value needs more than eight bytes.
    pub fn to_le_bytes(self) -> Result<[u8; 8]> {
        let be = self.0.to_be_bytes();
        let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
        let significant = &be[first..];
        if significant.len() > Self::WIDTH {
            return Err(Error::LayoutMismatch {
                layout: "u64",
                reason: format!("{} does not fit in {} bytes", self.0, Self::WIDTH),
            });
        }
        // big-endian significant bytes → little-endian, top bytes stay zero
        let mut out = [0u8; 8];
        for (slot, byte) in out.iter_mut().zip(significant.iter().rev()) {
            *slot = *byte;
        }
        Ok(out)
    }

    /// Parse the wire form. The buffer must be exactly eight bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::WIDTH {
            return Err(Error::LayoutMismatch {
                layout: "u64",
                reason: format!("invalid buffer length: {}", bytes.len()),
            });
        }
        let mut be = [0u8; 16];
        for (slot, byte) in be[16 - Self::WIDTH..].iter_mut().zip(bytes.iter().rev()) {
            *slot = *byte;
        }
        Ok(Self(u128::from_be_bytes(be)))
    }

    /// Narrow to a native `u64`, failing like the encoder would.
    pub fn to_u64(self) -> Result<u64> {
        self.to_le_bytes().map(u64::from_le_bytes)
    }
}

impl From<u64> for Numberu64 {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Numberu64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ─── Layout description ───────────────────────────────────────────────────────

/// Wire kind of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    /// One byte that must be non-zero for the record to be usable.
    Flag,
    U64,
    Pubkey,
    Blob(usize),
}

impl FieldKind {
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Flag => 1,
            FieldKind::U64 => Numberu64::WIDTH,
            FieldKind::Pubkey => 32,
            FieldKind::Blob(len) => len,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// A named, ordered record layout.
#[derive(Debug)]
pub struct Layout {
    pub name:   &'static str,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    /// Total declared size in bytes.
    pub const fn span(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].kind.width();
            i += 1;
        }
        total
    }

    /// Byte offset of `name`, if the layout declares it.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for spec in self.fields {
            if spec.name == name {
                return Some(offset);
            }
            offset += spec.kind.width();
        }
        None
    }
}

// ─── Field values ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    Flag(bool),
    U64(Numberu64),
    Pubkey(Pubkey),
    Blob(Vec<u8>),
}

/// Named field values for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    layout: &'static str,
    values: BTreeMap<&'static str, Value>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: Value) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn u8(&self, name: &'static str) -> Result<u8> {
        match self.require(name)? {
            Value::U8(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "u8", other)),
        }
    }

    pub fn flag(&self, name: &'static str) -> Result<bool> {
        match self.require(name)? {
            Value::Flag(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "flag", other)),
        }
    }

    pub fn u64(&self, name: &'static str) -> Result<Numberu64> {
        match self.require(name)? {
            Value::U64(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "u64", other)),
        }
    }

    pub fn pubkey(&self, name: &'static str) -> Result<Pubkey> {
        match self.require(name)? {
            Value::Pubkey(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "pubkey", other)),
        }
    }

    pub fn blob(&self, name: &'static str) -> Result<&[u8]> {
        match self.require(name)? {
            Value::Blob(v) => Ok(v),
            other => Err(self.wrong_kind(name, "blob", other)),
        }
    }

    fn require(&self, name: &'static str) -> Result<&Value> {
        self.values.get(name).ok_or_else(|| Error::LayoutMismatch {
            layout: self.layout_name(),
            reason: format!("missing field `{name}`"),
        })
    }

    fn wrong_kind(&self, name: &str, wanted: &str, got: &Value) -> Error {
        Error::LayoutMismatch {
            layout: self.layout_name(),
            reason: format!("field `{name}` is not a {wanted}: {got:?}"),
        }
    }

    fn layout_name(&self) -> &'static str {
        if self.layout.is_empty() { "fields" } else { self.layout }
    }
}

// ─── Codec ────────────────────────────────────────────────────────────────────

/// Serialize `fields` into exactly `layout.span()` bytes.
pub fn encode(layout: &Layout, fields: &Fields) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(layout.span());
    for spec in layout.fields {
        let value = fields.get(spec.name).ok_or_else(|| Error::LayoutMismatch {
            layout: layout.name,
            reason: format!("missing field `{}`", spec.name),
        })?;
        match (spec.kind, value) {
            (FieldKind::U8, Value::U8(v)) => out.push(*v),
            (FieldKind::Flag, Value::Flag(v)) => out.push(u8::from(*v)),
            (FieldKind::U64, Value::U64(v)) => out.extend_from_slice(&v.to_le_bytes()?),
            (FieldKind::Pubkey, Value::Pubkey(v)) => out.extend_from_slice(v.as_ref()),
            (FieldKind::Blob(len), Value::Blob(v)) if v.len() == len => out.extend_from_slice(v),
            (FieldKind::Blob(len), Value::Blob(v)) => {
                return Err(Error::LayoutMismatch {
                    layout: layout.name,
                    reason: format!("blob `{}` is {} bytes, declared {len}", spec.name, v.len()),
                });
            }
            (kind, value) => {
                return Err(Error::LayoutMismatch {
                    layout: layout.name,
                    reason: format!("field `{}` declared {kind:?}, got {value:?}", spec.name),
                });
            }
        }
    }
    Ok(out)
}

/// Parse the first `layout.span()` bytes of `data`.
///
/// Trailing bytes are ignored; a cleared [`FieldKind::Flag`] fails with
/// [`Error::InvalidState`].
pub fn decode(layout: &Layout, data: &[u8]) -> Result<Fields> {
    let expected = layout.span();
    if data.len() < expected {
        return Err(Error::TruncatedBuffer { layout: layout.name, expected, actual: data.len() });
    }

    let mut fields = Fields { layout: layout.name, values: BTreeMap::new() };
    let mut offset = 0;
    for spec in layout.fields {
        let width = spec.kind.width();
        let raw = &data[offset..offset + width];
        let value = match spec.kind {
            FieldKind::U8 => Value::U8(raw[0]),
            FieldKind::Flag => {
                if raw[0] == 0 {
                    return Err(Error::InvalidState {
                        layout: layout.name,
                        reason: format!("`{}` is not set", spec.name),
                    });
                }
                Value::Flag(true)
            }
            FieldKind::U64 => Value::U64(Numberu64::from_le_bytes(raw)?),
            FieldKind::Pubkey => Value::Pubkey(read_pubkey(raw, layout.name)?),
            FieldKind::Blob(_) => Value::Blob(raw.to_vec()),
        };
        fields.insert(spec.name, value);
        offset += width;
    }
    Ok(fields)
}

fn read_pubkey(raw: &[u8], layout: &'static str) -> Result<Pubkey> {
    let b: [u8; 32] = raw.try_into().map_err(|_| Error::LayoutMismatch {
        layout,
        reason: "slice too short for Pubkey (32 bytes)".into(),
    })?;
    Ok(Pubkey::from(b))
}
