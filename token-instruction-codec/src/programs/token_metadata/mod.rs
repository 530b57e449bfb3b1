//! Metaplex Token Metadata program instructions.
//!
//! Only two shapes are modelled. Their discriminants are fixed by the program:
//!
//! | Instruction | Discriminant |
//! |---|---|
//! | `CreateMasterEditionV3` | 17 |
//! | `CreateMetadataAccountV3` | 33 |

mod types;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;
use tracing::trace;

pub use self::types::{Collection, CollectionDetails, Creator, DataV2, UseMethod, Uses};
use super::{SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::{
    core::DecodedField,
    error::Result,
    instruction::Instruction,
    instruction_set,
    payload::{AccountSlot, InstructionArgs, Payload},
    registry::ProgramDecoder,
};

pub const PROGRAM_NAME: &str = "TokenMetadata";

pub const INSTRUCTION_CREATE_MASTER_EDITION_V3: u8 = 17;
pub const INSTRUCTION_CREATE_METADATA_ACCOUNT_V3: u8 = 33;

/// Seed prefix of metadata and edition accounts.
pub const METADATA_SEED: &[u8] = b"metadata";
/// Seed suffix of master edition accounts.
pub const EDITION_SEED: &[u8] = b"edition";

///   0. `[writable]` edition
///   1. `[writable]` mint
///   2. `[signer]` update authority
///   3. `[signer]` mint authority
///   4. `[writable, signer]` payer
///   5. `[writable]` metadata
///   6. `[]` token program (default `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`)
///   7. `[]` system program (default `11111111111111111111111111111111`)
const CREATE_MASTER_EDITION_V3_ACCOUNTS: &[AccountSlot] = &[
    AccountSlot::writable("edition"),
    AccountSlot::writable("mint"),
    AccountSlot::readonly("update_authority").signer(),
    AccountSlot::readonly("mint_authority").signer(),
    AccountSlot::writable("payer").signer(),
    AccountSlot::writable("metadata"),
    AccountSlot::readonly("token_program").with_default(TOKEN_PROGRAM_ID),
    AccountSlot::readonly("system_program").with_default(SYSTEM_PROGRAM_ID),
];

///   0. `[writable]` metadata
///   1. `[]` mint
///   2. `[signer]` mint authority
///   3. `[writable, signer]` payer
///   4. `[signer]` update authority, signer flag chosen by the builder
///   5. `[]` system program (default `11111111111111111111111111111111`)
const CREATE_METADATA_ACCOUNT_V3_ACCOUNTS: &[AccountSlot] = &[
    AccountSlot::writable("metadata"),
    AccountSlot::readonly("mint"),
    AccountSlot::readonly("mint_authority").signer(),
    AccountSlot::writable("payer").signer(),
    AccountSlot::readonly("update_authority").signer(),
    AccountSlot::readonly("system_program").with_default(SYSTEM_PROGRAM_ID),
];

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateMasterEditionV3Args {
    /// `None` allows unlimited prints.
    #[borsh(
        serialize_with = "crate::wire::optional::serialize",
        deserialize_with = "crate::wire::optional::deserialize"
    )]
    pub max_supply: Option<u64>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateMetadataAccountV3Args {
    pub data: DataV2,
    pub is_mutable: bool,
    #[borsh(
        serialize_with = "crate::wire::optional::serialize",
        deserialize_with = "crate::wire::optional::deserialize"
    )]
    pub collection_details: Option<CollectionDetails>,
}

impl InstructionArgs for CreateMasterEditionV3Args {
    const NAME: &'static str = "CreateMasterEditionV3";
    const DISCRIMINANT: u8 = INSTRUCTION_CREATE_MASTER_EDITION_V3;
    const ACCOUNTS: &'static [AccountSlot] = CREATE_MASTER_EDITION_V3_ACCOUNTS;

    fn fields(&self) -> Vec<DecodedField> {
        vec![DecodedField::optional("max_supply", self.max_supply.as_ref())]
    }
}

impl InstructionArgs for CreateMetadataAccountV3Args {
    const NAME: &'static str = "CreateMetadataAccountV3";
    const DISCRIMINANT: u8 = INSTRUCTION_CREATE_METADATA_ACCOUNT_V3;
    const ACCOUNTS: &'static [AccountSlot] = CREATE_METADATA_ACCOUNT_V3_ACCOUNTS;

    fn fields(&self) -> Vec<DecodedField> {
        let mut fields = vec![
            self.data.to_field(),
            DecodedField::new("is_mutable", self.is_mutable.to_string()),
        ];
        if let Some(details) = self.collection_details {
            fields.push(details.to_field());
        }
        fields
    }
}

pub type CreateMasterEditionV3 = Payload<CreateMasterEditionV3Args>;
pub type CreateMetadataAccountV3 = Payload<CreateMetadataAccountV3Args>;

instruction_set! {
    /// Instructions of the Token Metadata program.
    pub enum TokenMetadataInstruction {
        program = "TokenMetadata", id = TOKEN_METADATA_PROGRAM_ID;
        CreateMasterEditionV3(CreateMasterEditionV3Args),
        CreateMetadataAccountV3(CreateMetadataAccountV3Args),
    }
}

pub type TokenMetadataInstructionDecoder = ProgramDecoder<TokenMetadataInstruction>;

/// Metadata account of `mint` and its bump seed.
pub fn find_metadata_account(mint: &Pubkey) -> (Pubkey, u8) {
    find_metadata_account_with_program_id(mint, &TOKEN_METADATA_PROGRAM_ID)
}

pub fn find_metadata_account_with_program_id(mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref()],
        program_id,
    )
}

/// Master edition account of `mint` and its bump seed.
pub fn find_master_edition_account(mint: &Pubkey) -> (Pubkey, u8) {
    find_master_edition_account_with_program_id(mint, &TOKEN_METADATA_PROGRAM_ID)
}

pub fn find_master_edition_account_with_program_id(
    mint: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref(), EDITION_SEED],
        program_id,
    )
}

/// Builder for [`CreateMasterEditionV3`].
///
/// Metadata and edition accounts are derived from the mint when not set.
#[derive(Debug, Clone)]
pub struct CreateMasterEditionV3Builder {
    program_id: Pubkey,
    payload: CreateMasterEditionV3,
}

impl Default for CreateMasterEditionV3Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateMasterEditionV3Builder {
    pub fn new() -> Self {
        Self {
            program_id: TOKEN_METADATA_PROGRAM_ID,
            payload: Payload::new(CreateMasterEditionV3Args::default()),
        }
    }

    /// Builder for `mint` with a single authority acting as update authority,
    /// mint authority and payer.
    pub fn for_mint(mint: Pubkey, authority: Pubkey) -> Self {
        Self::new()
            .mint(mint)
            .update_authority(authority)
            .mint_authority(authority)
            .payer(authority)
    }

    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn max_supply(mut self, max_supply: u64) -> Self {
        self.payload.args.max_supply = Some(max_supply);
        self
    }

    pub fn edition(mut self, edition: Pubkey) -> Self {
        self.payload.set_address(0, edition);
        self
    }

    pub fn mint(mut self, mint: Pubkey) -> Self {
        self.payload.set_address(1, mint);
        self
    }

    pub fn update_authority(mut self, update_authority: Pubkey) -> Self {
        self.payload.set_address(2, update_authority);
        self
    }

    pub fn mint_authority(mut self, mint_authority: Pubkey) -> Self {
        self.payload.set_address(3, mint_authority);
        self
    }

    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payload.set_address(4, payer);
        self
    }

    pub fn metadata(mut self, metadata: Pubkey) -> Self {
        self.payload.set_address(5, metadata);
        self
    }

    pub fn token_program(mut self, token_program: Pubkey) -> Self {
        self.payload.set_address(6, token_program);
        self
    }

    pub fn system_program(mut self, system_program: Pubkey) -> Self {
        self.payload.set_address(7, system_program);
        self
    }

    pub fn build(mut self) -> Result<Instruction<TokenMetadataInstruction>> {
        if let Some(mint) = self.payload.address(1) {
            if self.payload.address(0).is_none() {
                let (edition, _) =
                    find_master_edition_account_with_program_id(&mint, &self.program_id);
                trace!(%edition, "derived master edition account");
                self.payload.set_address(0, edition);
            }
            if self.payload.address(5).is_none() {
                let (metadata, _) =
                    find_metadata_account_with_program_id(&mint, &self.program_id);
                trace!(%metadata, "derived metadata account");
                self.payload.set_address(5, metadata);
            }
        }
        self.payload.ensure_accounts()?;
        Ok(Instruction::new(self.payload).with_program_id(self.program_id))
    }
}

/// Builder for [`CreateMetadataAccountV3`].
///
/// The metadata account is derived from the mint when not set.
#[derive(Debug, Clone)]
pub struct CreateMetadataAccountV3Builder {
    program_id: Pubkey,
    payload: CreateMetadataAccountV3,
}

impl Default for CreateMetadataAccountV3Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateMetadataAccountV3Builder {
    pub fn new() -> Self {
        Self {
            program_id: TOKEN_METADATA_PROGRAM_ID,
            payload: Payload::new(CreateMetadataAccountV3Args::default()),
        }
    }

    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn data(mut self, data: DataV2) -> Self {
        self.payload.args.data = data;
        self
    }

    pub fn is_mutable(mut self, is_mutable: bool) -> Self {
        self.payload.args.is_mutable = is_mutable;
        self
    }

    pub fn collection_details(mut self, collection_details: CollectionDetails) -> Self {
        self.payload.args.collection_details = Some(collection_details);
        self
    }

    pub fn metadata(mut self, metadata: Pubkey) -> Self {
        self.payload.set_address(0, metadata);
        self
    }

    pub fn mint(mut self, mint: Pubkey) -> Self {
        self.payload.set_address(1, mint);
        self
    }

    pub fn mint_authority(mut self, mint_authority: Pubkey) -> Self {
        self.payload.set_address(2, mint_authority);
        self
    }

    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payload.set_address(3, payer);
        self
    }

    /// The update authority only needs to sign when it differs from the mint authority.
    pub fn update_authority(mut self, update_authority: Pubkey, as_signer: bool) -> Self {
        self.payload
            .accounts
            .set(4, AccountMeta::new_readonly(update_authority, as_signer));
        self
    }

    pub fn system_program(mut self, system_program: Pubkey) -> Self {
        self.payload.set_address(5, system_program);
        self
    }

    pub fn build(mut self) -> Result<Instruction<TokenMetadataInstruction>> {
        if let (None, Some(mint)) = (self.payload.address(0), self.payload.address(1)) {
            let (metadata, _) = find_metadata_account_with_program_id(&mint, &self.program_id);
            trace!(%metadata, "derived metadata account");
            self.payload.set_address(0, metadata);
        }
        self.payload.ensure_accounts()?;
        Ok(Instruction::new(self.payload).with_program_id(self.program_id))
    }
}
