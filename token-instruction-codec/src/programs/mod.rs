//! Instruction sets of the supported programs.
//!
//! Both programs use a 1-byte discriminator:
//! - Associated Token Account: 0, 1, 2
//! - Token Metadata: 17, 33 (other values belong to shapes not modelled here)

use solana_pubkey::{pubkey, Pubkey};

pub mod associated_token_account;
pub mod token_metadata;

pub use associated_token_account::{
    AssociatedTokenAccountInstruction, AssociatedTokenAccountInstructionDecoder,
};
pub use token_metadata::{TokenMetadataInstruction, TokenMetadataInstructionDecoder};

pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey =
    pubkey!("ComputeBudget111111111111111111111111111111");
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const TOKEN_2022_PROGRAM_ID: Pubkey = pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
