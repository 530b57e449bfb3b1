//! # token-instruction-codec
//!
//! Instruction builders and decoders for the SPL Associated Token Account
//! program and the Metaplex Token Metadata program.
//!
//! Every instruction is one discriminant byte followed by the borsh encoding of
//! its arguments. Accounts travel next to the data and bind positionally to a
//! fixed list of slots per instruction.
//!
//! | Export | Description |
//! |--------|-------------|
//! | [`VariantCodec`] | Discriminant-to-shape table of one program |
//! | [`ProgramInstruction`] | Closed instruction set of one program |
//! | [`Payload`] | Arguments plus account slots of one instruction |
//! | [`Instruction`] | Program address plus one program instruction |
//! | [`DecoderRegistry`] | Decoders keyed by program address |
//! | [`DecoderConfig`] | Program deployments and rendering options |
//! | [`TransactionFormatter`] | Format decoded messages with ANSI colors |
//!
//! Note: rendering, configuration and message decoding are only available off-chain.

// Re-export solana types for use by dependent crates (available on all targets)
pub use solana_instruction;
pub use solana_pubkey;
pub use solana_signature;

pub mod codec;
mod core;
pub mod error;
pub mod instruction;
pub mod payload;
pub mod programs;
pub mod registry;
mod wire;

pub use codec::{ProgramInstruction, VariantCodec, VariantDef};
pub use crate::core::{DecodedField, DecodedInstruction, InstructionDecoder};
pub use error::{AccountsDefect, CodecError, Result};
pub use instruction::Instruction;
pub use payload::{AccountConsumer, AccountSlot, InstructionArgs, Payload, TreeRenderable};
pub use programs::{
    AssociatedTokenAccountInstruction, AssociatedTokenAccountInstructionDecoder,
    TokenMetadataInstruction, TokenMetadataInstructionDecoder,
};
pub use registry::{DecoderRegistry, ProgramDecoder};

// Off-chain only modules (uses tabled)
#[cfg(not(target_os = "solana"))]
pub mod config;
#[cfg(not(target_os = "solana"))]
pub mod formatter;
#[cfg(all(not(target_os = "solana"), feature = "transaction"))]
pub mod transaction;
#[cfg(not(target_os = "solana"))]
pub mod types;

#[cfg(not(target_os = "solana"))]
pub use config::{DecoderConfig, LogVerbosity};
#[cfg(not(target_os = "solana"))]
pub use formatter::{strip_ansi_codes, Colors, TransactionFormatter, TreeFormatter};
#[cfg(all(not(target_os = "solana"), feature = "transaction"))]
pub use transaction::{
    decode_message, decode_transaction, decode_transaction_snapshot, format_transaction,
    transaction_log_to_snapshot, AccountSnapshot, InstructionSnapshot, TransactionSnapshot,
};
#[cfg(not(target_os = "solana"))]
pub use types::{get_program_name, AccountAccess, InstructionLog, TransactionLog};
