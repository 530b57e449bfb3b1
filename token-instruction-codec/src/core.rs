//! Core types for instruction decoding and rendering.

use serde::Serialize;
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use crate::error::Result;

/// A decoded instruction field for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    /// Field name
    pub name: String,
    /// Field value as string
    pub value: String,
    /// Nested fields (struct members, union alternatives)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DecodedField>,
}

impl DecodedField {
    /// Create a simple field with name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Create a field with nested children.
    pub fn with_children(name: impl Into<String>, children: Vec<DecodedField>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            children,
        }
    }

    /// Render an optional value, using `<none>` for the absent state.
    pub fn optional<T: std::fmt::Display>(name: impl Into<String>, value: Option<&T>) -> Self {
        match value {
            Some(v) => Self::new(name, v.to_string()),
            None => Self::new(name, NONE_VALUE),
        }
    }
}

/// Display value of an absent optional field.
pub const NONE_VALUE: &str = "<none>";

/// Result of decoding an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Human-readable instruction name (e.g., "Create", "CreateMasterEditionV3")
    pub name: String,
    /// Instruction discriminant
    pub discriminant: u8,
    /// Decoded parameter fields to display
    pub fields: Vec<DecodedField>,
    /// Account names in order (index corresponds to account position)
    pub account_names: Vec<String>,
}

impl DecodedInstruction {
    /// Create a decoded instruction with fields and account names.
    pub fn with_fields_and_accounts(
        name: impl Into<String>,
        discriminant: u8,
        fields: Vec<DecodedField>,
        account_names: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            discriminant,
            fields,
            account_names,
        }
    }

    /// Name of the account at `index`, if the instruction declares one.
    pub fn account_name(&self, index: usize) -> Option<&str> {
        self.account_names.get(index).map(String::as_str)
    }
}

/// Trait for instruction decoders - each program implements this.
pub trait InstructionDecoder: Send + Sync {
    /// Program ID this decoder handles.
    fn program_id(&self) -> Pubkey;

    /// Human-readable program name (e.g., "AssociatedTokenAccount").
    fn program_name(&self) -> &'static str;

    /// Decode instruction data and accounts into a structured representation.
    fn decode(&self, data: &[u8], accounts: &[AccountMeta]) -> Result<DecodedInstruction>;
}
