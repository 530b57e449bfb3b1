//! Shared fixtures for the token-instruction-codec integration tests.
//!
//! Keys are derived from a repeated byte so that snapshot files stay stable
//! across runs.

use solana_hash::Hash;
use solana_instruction::{AccountMeta, Instruction};
use solana_keypair::{keypair_from_seed, Keypair};
use solana_message::{Message, VersionedMessage};
use solana_pubkey::Pubkey;
use solana_transaction::{versioned::VersionedTransaction, Transaction};
use token_instruction_codec::{strip_ansi_codes, DecoderConfig, LogVerbosity, TransactionLog};

pub use token_instruction_codec::{
    decode_message, decode_transaction, decode_transaction_snapshot, format_transaction,
    transaction_log_to_snapshot,
};

/// Address whose 32 bytes are all `seed`.
pub fn key(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed; 32])
}

pub fn deterministic_keypair(seed_byte: u8) -> Keypair {
    keypair_from_seed(&[seed_byte; 32]).unwrap()
}

/// `count` distinct writable, non-signer accounts.
pub fn writable_accounts(count: usize) -> Vec<AccountMeta> {
    (0..count).map(|_| AccountMeta::new(Pubkey::new_unique(), false)).collect()
}

/// Unsigned legacy message paid for by `payer`.
pub fn legacy_message(instructions: &[Instruction], payer: &Pubkey) -> VersionedMessage {
    VersionedMessage::Legacy(Message::new(instructions, Some(payer)))
}

/// Legacy transaction signed by `signers`, the first of which pays.
pub fn signed_transaction(instructions: &[Instruction], signers: &[&Keypair]) -> VersionedTransaction {
    let payer = signers.first().map(|signer| solana_signer::Signer::pubkey(*signer));
    let message = Message::new(instructions, payer.as_ref());
    VersionedTransaction::from(Transaction::new(signers, message, Hash::default()))
}

/// Config rendering plain text at `verbosity`.
pub fn plain_config(verbosity: LogVerbosity) -> DecoderConfig {
    DecoderConfig::default()
        .with_colors(false)
        .with_verbosity(verbosity)
}

/// Formatted transaction with any escape codes removed.
pub fn format_plain(log: &TransactionLog, config: &DecoderConfig) -> String {
    strip_ansi_codes(&format_transaction(log, config, 1))
}
