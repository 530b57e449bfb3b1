//! SPL Associated Token Account program instructions.
//!
//! None of the instructions carry arguments: the instruction data is the
//! discriminant byte alone. Empty instruction data is the legacy encoding of
//! [`Create`] and decodes as such.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;
use tracing::trace;

use super::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::{
    core::DecodedField,
    error::Result,
    instruction::Instruction,
    instruction_set,
    payload::{AccountSlot, InstructionArgs, Payload},
    registry::ProgramDecoder,
};

pub const PROGRAM_NAME: &str = "AssociatedTokenAccount";

/// Discriminant of [`Create`].
pub const INSTRUCTION_CREATE: u8 = 0;
/// Discriminant of [`CreateIdempotent`].
pub const INSTRUCTION_CREATE_IDEMPOTENT: u8 = 1;
/// Discriminant of [`RecoverNested`].
pub const INSTRUCTION_RECOVER_NESTED: u8 = 2;

///   0. `[writable, signer]` funding account
///   1. `[writable]` associated token account
///   2. `[]` wallet
///   3. `[]` mint
///   4. `[]` system program (default `11111111111111111111111111111111`)
///   5. `[]` token program (default `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`)
const CREATE_ACCOUNTS: &[AccountSlot] = &[
    AccountSlot::writable("funding_account").signer(),
    AccountSlot::writable("associated_token_account"),
    AccountSlot::readonly("wallet"),
    AccountSlot::readonly("mint"),
    AccountSlot::readonly("system_program").with_default(SYSTEM_PROGRAM_ID),
    AccountSlot::readonly("token_program").with_default(TOKEN_PROGRAM_ID),
];

///   0. `[writable]` nested associated token account, owned by the owner ATA
///   1. `[]` mint of the nested account
///   2. `[writable]` wallet's associated token account for the nested mint
///   3. `[]` owner associated token account, owned by the wallet
///   4. `[]` mint of the owner account
///   5. `[writable, signer]` wallet
///   6. `[]` token program (default `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`)
const RECOVER_NESTED_ACCOUNTS: &[AccountSlot] = &[
    AccountSlot::writable("nested_associated_token_account"),
    AccountSlot::readonly("nested_mint"),
    AccountSlot::writable("destination_associated_token_account"),
    AccountSlot::readonly("owner_associated_token_account"),
    AccountSlot::readonly("owner_mint"),
    AccountSlot::writable("wallet").signer(),
    AccountSlot::readonly("token_program").with_default(TOKEN_PROGRAM_ID),
];

/// Creates an associated token account for a wallet and mint. Fails on-chain if
/// the account already exists.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateArgs;

/// Creates an associated token account if it does not exist yet. Fails on-chain
/// if it exists with a different owner.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateIdempotentArgs;

/// Moves the tokens out of a nested associated token account (an ATA owned by
/// an ATA) into the wallet's ATA and closes the nested account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoverNestedArgs;

impl InstructionArgs for CreateArgs {
    const NAME: &'static str = "Create";
    const DISCRIMINANT: u8 = INSTRUCTION_CREATE;
    const ACCOUNTS: &'static [AccountSlot] = CREATE_ACCOUNTS;

    fn fields(&self) -> Vec<DecodedField> {
        Vec::new()
    }
}

impl InstructionArgs for CreateIdempotentArgs {
    const NAME: &'static str = "CreateIdempotent";
    const DISCRIMINANT: u8 = INSTRUCTION_CREATE_IDEMPOTENT;
    const ACCOUNTS: &'static [AccountSlot] = CREATE_ACCOUNTS;

    fn fields(&self) -> Vec<DecodedField> {
        Vec::new()
    }
}

impl InstructionArgs for RecoverNestedArgs {
    const NAME: &'static str = "RecoverNested";
    const DISCRIMINANT: u8 = INSTRUCTION_RECOVER_NESTED;
    const ACCOUNTS: &'static [AccountSlot] = RECOVER_NESTED_ACCOUNTS;

    fn fields(&self) -> Vec<DecodedField> {
        Vec::new()
    }
}

pub type Create = Payload<CreateArgs>;
pub type CreateIdempotent = Payload<CreateIdempotentArgs>;
pub type RecoverNested = Payload<RecoverNestedArgs>;

instruction_set! {
    /// Instructions of the associated token account program.
    pub enum AssociatedTokenAccountInstruction {
        program = "AssociatedTokenAccount", id = ASSOCIATED_TOKEN_PROGRAM_ID,
            empty_data = CreateArgs;
        Create(CreateArgs),
        CreateIdempotent(CreateIdempotentArgs),
        RecoverNested(RecoverNestedArgs),
    }
}

pub type AssociatedTokenAccountInstructionDecoder = ProgramDecoder<AssociatedTokenAccountInstruction>;

/// Address of the associated token account of `wallet` for `mint`, owned by the SPL Token program.
pub fn get_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(
        wallet,
        mint,
        &TOKEN_PROGRAM_ID,
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}

/// Address of the associated token account for a specific token program and
/// associated token account program deployment.
pub fn get_associated_token_address_with_program_id(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    program_id: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
        program_id,
    )
    .0
}

/// Builder for [`Create`] and, with [`CreateBuilder::idempotent`], [`CreateIdempotent`].
///
/// The associated token account is derived from the wallet, mint and token
/// program when it is not set explicitly.
#[derive(Debug, Clone)]
pub struct CreateBuilder {
    program_id: Pubkey,
    idempotent: bool,
    payload: Create,
}

impl Default for CreateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateBuilder {
    pub fn new() -> Self {
        Self {
            program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            idempotent: false,
            payload: Payload::new(CreateArgs),
        }
    }

    /// Builder with funding account, wallet and mint set.
    pub fn for_wallet(payer: Pubkey, wallet: Pubkey, mint: Pubkey) -> Self {
        Self::new().funding_account(payer).wallet(wallet).mint(mint)
    }

    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Build `CreateIdempotent` instead of `Create`.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn funding_account(mut self, payer: Pubkey) -> Self {
        self.payload.set_address(0, payer);
        self
    }

    pub fn associated_token_account(mut self, address: Pubkey) -> Self {
        self.payload.set_address(1, address);
        self
    }

    pub fn wallet(mut self, wallet: Pubkey) -> Self {
        self.payload.set_address(2, wallet);
        self
    }

    pub fn mint(mut self, mint: Pubkey) -> Self {
        self.payload.set_address(3, mint);
        self
    }

    pub fn system_program(mut self, system_program: Pubkey) -> Self {
        self.payload.set_address(4, system_program);
        self
    }

    pub fn token_program(mut self, token_program: Pubkey) -> Self {
        self.payload.set_address(5, token_program);
        self
    }

    pub fn build(mut self) -> Result<Instruction<AssociatedTokenAccountInstruction>> {
        if self.payload.address(1).is_none() {
            if let (Some(wallet), Some(mint), Some(token_program)) = (
                self.payload.address(2),
                self.payload.address(3),
                self.payload.address(5),
            ) {
                let ata = get_associated_token_address_with_program_id(
                    &wallet,
                    &mint,
                    &token_program,
                    &self.program_id,
                );
                trace!(%ata, "derived associated token account");
                self.payload.set_address(1, ata);
            }
        }
        self.payload.ensure_accounts()?;

        let instruction: AssociatedTokenAccountInstruction = if self.idempotent {
            Payload {
                args: CreateIdempotentArgs,
                accounts: self.payload.accounts,
            }
            .into()
        } else {
            self.payload.into()
        };
        Ok(Instruction::new(instruction).with_program_id(self.program_id))
    }
}

/// Builder for [`RecoverNested`].
///
/// Given the wallet and both mints, the three associated token accounts are
/// derived when not set explicitly.
#[derive(Debug, Clone)]
pub struct RecoverNestedBuilder {
    program_id: Pubkey,
    payload: RecoverNested,
}

impl Default for RecoverNestedBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoverNestedBuilder {
    pub fn new() -> Self {
        Self {
            program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            payload: Payload::new(RecoverNestedArgs),
        }
    }

    /// Builder with wallet, owner mint and nested mint set.
    pub fn for_wallet(wallet: Pubkey, owner_mint: Pubkey, nested_mint: Pubkey) -> Self {
        Self::new()
            .wallet(wallet)
            .owner_mint(owner_mint)
            .nested_mint(nested_mint)
    }

    pub fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn nested_associated_token_account(mut self, address: Pubkey) -> Self {
        self.payload.set_address(0, address);
        self
    }

    pub fn nested_mint(mut self, mint: Pubkey) -> Self {
        self.payload.set_address(1, mint);
        self
    }

    pub fn destination_associated_token_account(mut self, address: Pubkey) -> Self {
        self.payload.set_address(2, address);
        self
    }

    pub fn owner_associated_token_account(mut self, address: Pubkey) -> Self {
        self.payload.set_address(3, address);
        self
    }

    pub fn owner_mint(mut self, mint: Pubkey) -> Self {
        self.payload.set_address(4, mint);
        self
    }

    pub fn wallet(mut self, wallet: Pubkey) -> Self {
        self.payload.set_address(5, wallet);
        self
    }

    pub fn token_program(mut self, token_program: Pubkey) -> Self {
        self.payload.set_address(6, token_program);
        self
    }

    pub fn build(mut self) -> Result<Instruction<AssociatedTokenAccountInstruction>> {
        self.derive_missing();
        self.payload.ensure_accounts()?;
        Ok(Instruction::new(self.payload).with_program_id(self.program_id))
    }

    fn derive_missing(&mut self) {
        let (Some(wallet), Some(token_program)) =
            (self.payload.address(5), self.payload.address(6))
        else {
            return;
        };
        let derive = |owner: &Pubkey, mint: &Pubkey| {
            get_associated_token_address_with_program_id(
                owner,
                mint,
                &token_program,
                &self.program_id,
            )
        };

        let owner_ata = match (self.payload.address(3), self.payload.address(4)) {
            (Some(owner_ata), _) => Some(owner_ata),
            (None, Some(owner_mint)) => Some(derive(&wallet, &owner_mint)),
            (None, None) => None,
        };
        let nested_mint = self.payload.address(1);

        let nested = match (self.payload.address(0), owner_ata, nested_mint) {
            (None, Some(owner_ata), Some(nested_mint)) => Some(derive(&owner_ata, &nested_mint)),
            _ => None,
        };
        let destination = match (self.payload.address(2), nested_mint) {
            (None, Some(nested_mint)) => Some(derive(&wallet, &nested_mint)),
            _ => None,
        };

        if self.payload.address(3).is_none() {
            if let Some(owner_ata) = owner_ata {
                self.payload.set_address(3, owner_ata);
            }
        }
        if let Some(nested) = nested {
            self.payload.set_address(0, nested);
        }
        if let Some(destination) = destination {
            self.payload.set_address(2, destination);
        }
    }
}
