//! Log types produced by transaction-level decoding.
//!
//! These are independent of how the message was obtained and are consumed by
//! [`crate::formatter`] and the snapshot helpers.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use tracing::debug;

use crate::{
    codec::ProgramInstruction,
    core::DecodedInstruction,
    error::{CodecError, Result},
    instruction::Instruction,
    programs::{
        ASSOCIATED_TOKEN_PROGRAM_ID, COMPUTE_BUDGET_PROGRAM_ID, SYSTEM_PROGRAM_ID,
        TOKEN_2022_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
    },
    registry::DecoderRegistry,
};

/// Decoded view of a whole message.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    /// First signature, or the default signature for an unsigned message.
    pub signature: Signature,
    /// Static account keys of the message with their access flags.
    pub accounts: Vec<MessageAccount>,
    pub instructions: Vec<InstructionLog>,
}

impl TransactionLog {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            ..Self::default()
        }
    }

    /// Instructions that failed to decode although a decoder was registered.
    pub fn failed_instructions(&self) -> impl Iterator<Item = &InstructionLog> {
        self.instructions.iter().filter(|ix| ix.error.is_some())
    }
}

/// One static account key of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageAccount {
    pub pubkey: Pubkey,
    pub access: AccountAccess,
}

/// Account access pattern within a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAccess {
    Readonly,
    Writable,
    Signer,
    SignerWritable,
}

impl AccountAccess {
    pub fn new(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (true, true) => AccountAccess::SignerWritable,
            (true, false) => AccountAccess::Signer,
            (false, true) => AccountAccess::Writable,
            (false, false) => AccountAccess::Readonly,
        }
    }

    pub fn from_meta(meta: &AccountMeta) -> Self {
        Self::new(meta.is_signer, meta.is_writable)
    }

    pub fn text(&self) -> &'static str {
        match self {
            AccountAccess::Readonly => "readonly",
            AccountAccess::Writable => "writable",
            AccountAccess::Signer => "signer",
            AccountAccess::SignerWritable => "signer+writable",
        }
    }
}

/// One instruction of a message, decoded when a decoder for its program is registered.
#[derive(Debug, Clone)]
pub struct InstructionLog {
    pub index: usize,
    pub program_id: Pubkey,
    pub program_name: String,
    pub instruction_name: Option<String>,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
    pub decoded_instruction: Option<DecodedInstruction>,
    /// Decode failure of a registered decoder.
    pub error: Option<CodecError>,
}

impl InstructionLog {
    pub fn new(index: usize, program_id: Pubkey, program_name: String) -> Self {
        Self {
            index,
            program_id,
            program_name,
            instruction_name: None,
            accounts: Vec::new(),
            data: Vec::new(),
            decoded_instruction: None,
            error: None,
        }
    }

    /// Log entry for an instruction built locally.
    pub fn from_instruction<I: ProgramInstruction>(
        index: usize,
        instruction: &Instruction<I>,
    ) -> Result<Self> {
        let decoded = instruction.render();
        Ok(Self {
            index,
            program_id: instruction.program_id,
            program_name: I::PROGRAM_NAME.to_string(),
            instruction_name: Some(decoded.name.clone()),
            accounts: instruction.accounts()?,
            data: instruction.data()?,
            decoded_instruction: Some(decoded),
            error: None,
        })
    }

    /// Decode with the decoder registered for this instruction's program, if any.
    pub fn decode(&mut self, registry: &DecoderRegistry) {
        if !registry.has_decoder(&self.program_id) {
            return;
        }
        match registry.decode(&self.program_id, &self.data, &self.accounts) {
            Ok((decoded, decoder)) => {
                self.instruction_name = Some(decoded.name.clone());
                self.program_name = decoder.program_name().to_string();
                self.decoded_instruction = Some(decoded);
            }
            Err(e) => {
                debug!(
                    index = self.index,
                    program_id = %self.program_id,
                    error = %e,
                    "failed to decode instruction"
                );
                self.error = Some(e);
            }
        }
    }
}

const WELL_KNOWN_PROGRAMS: &[(Pubkey, &str)] = &[
    (SYSTEM_PROGRAM_ID, "System Program"),
    (COMPUTE_BUDGET_PROGRAM_ID, "Compute Budget"),
    (TOKEN_PROGRAM_ID, "SPL Token"),
    (TOKEN_2022_PROGRAM_ID, "SPL Token 2022"),
    (ASSOCIATED_TOKEN_PROGRAM_ID, "AssociatedTokenAccount"),
    (TOKEN_METADATA_PROGRAM_ID, "TokenMetadata"),
];

/// Name of a program the decoder knows about, from the registry or the well-known table.
pub fn known_program_name(
    program_id: &Pubkey,
    registry: Option<&DecoderRegistry>,
) -> Option<String> {
    if let Some(decoder) = registry.and_then(|reg| reg.get_decoder(program_id)) {
        return Some(decoder.program_name().to_string());
    }

    WELL_KNOWN_PROGRAMS
        .iter()
        .find(|(id, _)| id == program_id)
        .map(|(_, name)| name.to_string())
}

/// Get human-readable program name from pubkey
///
/// First consults the decoder registry if provided, then falls back to hardcoded mappings.
pub fn get_program_name(program_id: &Pubkey, registry: Option<&DecoderRegistry>) -> String {
    known_program_name(program_id, registry)
        .unwrap_or_else(|| format!("Unknown Program ({program_id})"))
}
