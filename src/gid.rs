//! Deterministic identities for categories and expenses.
//!
//! An identity is a version 3 (MD5, name-based) UUID computed from a fixed
//! per-table seed and the concatenated textual form of the identifying
//! fields. Field order is part of the contract: reordering changes the id.

use chrono::NaiveDate;
use uuid::Uuid;

/// Canonical text used when a value takes part in an identity.
///
/// The renderings are frozen. Changing one re-keys every stored row.
pub trait IdentityField {
    fn identity_repr(&self) -> String;
}

impl IdentityField for &str {
    fn identity_repr(&self) -> String {
        (*self).to_string()
    }
}

impl IdentityField for String {
    fn identity_repr(&self) -> String {
        self.clone()
    }
}

/// Shortest round-trip form, always with a fractional part: `3.0`, `3.5`.
impl IdentityField for f64 {
    fn identity_repr(&self) -> String {
        format!("{self:?}")
    }
}

impl IdentityField for NaiveDate {
    fn identity_repr(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gid {
    Categories,
    Expenses,
}

impl Gid {
    pub fn seed(&self) -> Uuid {
        let bytes: [u8; 16] = match self {
            // 91edbbf6-2ecb-4f49-a08d-94888ce3735d
            Self::Categories => [
                0x91, 0xed, 0xbb, 0xf6, 0x2e, 0xcb, 0x4f, 0x49, 0xa0, 0x8d, 0x94, 0x88, 0x8c, 0xe3,
                0x73, 0x5d,
            ],
            // 3f8c2a71-6d4e-4b9a-8e15-c07d2b9f4a63
            Self::Expenses => [
                0x3f, 0x8c, 0x2a, 0x71, 0x6d, 0x4e, 0x4b, 0x9a, 0x8e, 0x15, 0xc0, 0x7d, 0x2b, 0x9f,
                0x4a, 0x63,
            ],
        };
        Uuid::from_bytes(bytes)
    }

    /// Identity of `fields`, concatenated in the given order without separator.
    pub fn create(&self, fields: &[&dyn IdentityField]) -> String {
        let name: String = fields.iter().map(|f| f.identity_repr()).collect();
        Uuid::new_v3(&self.seed(), name.as_bytes()).to_string()
    }
}
