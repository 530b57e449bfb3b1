//! Message-level decoding and JSON snapshots.
//!
//! Provides:
//! - [`decode_message`] / [`decode_transaction`] -- decode every instruction into a [`TransactionLog`]
//! - [`format_transaction`] -- render a [`TransactionLog`] with [`TransactionFormatter`]
//! - Snapshot types for insta JSON testing

use serde::Serialize;
use solana_instruction::AccountMeta;
use solana_message::VersionedMessage;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;
use tracing::trace;

use crate::{
    config::DecoderConfig,
    core::DecodedField,
    formatter::TransactionFormatter,
    types::{get_program_name, AccountAccess, InstructionLog, MessageAccount, TransactionLog},
};

// ---------------------------------------------------------------------------
// Transaction decoding
// ---------------------------------------------------------------------------

/// Decode every instruction of a signed transaction.
pub fn decode_transaction(tx: &VersionedTransaction, config: &DecoderConfig) -> TransactionLog {
    let signature = tx.signatures.first().copied().unwrap_or_default();
    decode_message_with_signature(&tx.message, signature, config)
}

/// Decode every instruction of a message.
///
/// Instructions for programs without a registered decoder keep their raw data;
/// decode failures are recorded per instruction and never abort the message.
pub fn decode_message(message: &VersionedMessage, config: &DecoderConfig) -> TransactionLog {
    decode_message_with_signature(message, Signature::default(), config)
}

fn decode_message_with_signature(
    message: &VersionedMessage,
    signature: Signature,
    config: &DecoderConfig,
) -> TransactionLog {
    let account_keys = message.static_account_keys();
    let mut log = TransactionLog::new(signature);
    log.accounts = account_keys
        .iter()
        .enumerate()
        .map(|(idx, pubkey)| MessageAccount {
            pubkey: *pubkey,
            access: AccountAccess::new(
                message.is_signer(idx),
                message.is_maybe_writable(idx, None),
            ),
        })
        .collect();

    let registry = config.decoder_registry();
    for (ix_index, compiled_ix) in message.instructions().iter().enumerate() {
        let program_id = account_keys
            .get(compiled_ix.program_id_index as usize)
            .copied()
            .unwrap_or_default();
        let program_name = get_program_name(&program_id, Some(&registry));

        let mut ix_log = InstructionLog::new(ix_index, program_id, program_name);
        ix_log.data = compiled_ix.data.clone();
        ix_log.accounts = resolve_accounts(&compiled_ix.accounts, account_keys, message);
        ix_log.decode(&registry);

        log.instructions.push(ix_log);
    }

    log
}

/// Format a decoded transaction log into a human-readable string.
pub fn format_transaction(
    log: &TransactionLog,
    config: &DecoderConfig,
    tx_number: usize,
) -> String {
    let formatter = TransactionFormatter::new(config);
    formatter.format(log, tx_number)
}

// ---------------------------------------------------------------------------
// Snapshot types (JSON-serializable for insta)
// ---------------------------------------------------------------------------

/// JSON-serializable snapshot of an entire transaction.
#[derive(Debug, Serialize)]
pub struct TransactionSnapshot {
    pub signature: String,
    pub instructions: Vec<InstructionSnapshot>,
}

/// JSON-serializable snapshot of a single instruction.
#[derive(Debug, Serialize)]
pub struct InstructionSnapshot {
    pub program_id: String,
    pub program_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction_name: Option<String>,
    pub accounts: Vec<AccountSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded_fields: Option<Vec<DecodedField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON-serializable snapshot of an account reference within an instruction.
#[derive(Debug, Serialize)]
pub struct AccountSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// Decode a transaction straight into a JSON-serializable snapshot.
pub fn decode_transaction_snapshot(
    tx: &VersionedTransaction,
    config: &DecoderConfig,
) -> TransactionSnapshot {
    let log = decode_transaction(tx, config);
    transaction_log_to_snapshot(&log)
}

/// Convert a [`TransactionLog`] into a [`TransactionSnapshot`].
pub fn transaction_log_to_snapshot(log: &TransactionLog) -> TransactionSnapshot {
    TransactionSnapshot {
        signature: log.signature.to_string(),
        instructions: log
            .instructions
            .iter()
            .map(instruction_to_snapshot)
            .collect(),
    }
}

fn instruction_to_snapshot(ix: &InstructionLog) -> InstructionSnapshot {
    let decoded = ix.decoded_instruction.as_ref();
    let accounts: Vec<AccountSnapshot> = ix
        .accounts
        .iter()
        .enumerate()
        .map(|(i, a)| AccountSnapshot {
            name: decoded.and_then(|d| d.account_name(i)).map(str::to_string),
            pubkey: a.pubkey.to_string(),
            is_signer: a.is_signer,
            is_writable: a.is_writable,
        })
        .collect();

    InstructionSnapshot {
        program_id: ix.program_id.to_string(),
        program_name: ix.program_name.clone(),
        instruction_name: ix.instruction_name.clone(),
        accounts,
        decoded_fields: decoded.map(|d| d.fields.clone()),
        error: ix.error.as_ref().map(ToString::to_string),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Resolve compiled instruction account indices to `AccountMeta`.
///
/// Indices that point into address lookup tables are not resolved and map to
/// the default pubkey.
fn resolve_accounts(
    account_indices: &[u8],
    account_keys: &[Pubkey],
    message: &VersionedMessage,
) -> Vec<AccountMeta> {
    account_indices
        .iter()
        .map(|&idx| {
            let idx = idx as usize;
            let pubkey = account_keys.get(idx).copied().unwrap_or_else(|| {
                trace!(index = idx, "account index outside static keys");
                Pubkey::default()
            });
            let is_signer = message.is_signer(idx);
            let is_writable = message.is_maybe_writable(idx, None);
            if is_writable {
                AccountMeta::new(pubkey, is_signer)
            } else {
                AccountMeta::new_readonly(pubkey, is_signer)
            }
        })
        .collect()
}
