//! Instruction payloads: borsh-encoded arguments bound to a fixed list of account slots.

use std::fmt::Debug;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use crate::{
    codec::VariantDef,
    core::{DecodedField, DecodedInstruction},
    error::{AccountsDefect, CodecError, Result},
};

/// Static description of one account position of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSlot {
    pub name: &'static str,
    pub writable: bool,
    pub signer: bool,
    /// Address filled in by builders when the caller does not set the slot.
    pub default: Option<Pubkey>,
}

impl AccountSlot {
    pub const fn readonly(name: &'static str) -> Self {
        Self {
            name,
            writable: false,
            signer: false,
            default: None,
        }
    }

    pub const fn writable(name: &'static str) -> Self {
        Self {
            writable: true,
            ..Self::readonly(name)
        }
    }

    pub const fn signer(self) -> Self {
        Self {
            signer: true,
            ..self
        }
    }

    pub const fn with_default(self, address: Pubkey) -> Self {
        Self {
            default: Some(address),
            ..self
        }
    }

    /// Account reference for `pubkey` carrying this slot's attributes.
    pub fn meta(&self, pubkey: Pubkey) -> AccountMeta {
        AccountMeta {
            pubkey,
            is_signer: self.signer,
            is_writable: self.writable,
        }
    }
}

/// Fixed-arity account list of a payload. Unset slots are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountSlots(Vec<Option<AccountMeta>>);

impl AccountSlots {
    /// Slots for `layout`, with default addresses already applied.
    pub fn with_defaults(layout: &[AccountSlot]) -> Self {
        Self(
            layout
                .iter()
                .map(|slot| slot.default.map(|address| slot.meta(address)))
                .collect(),
        )
    }

    /// Fully populated slots, in order.
    pub fn from_metas(metas: &[AccountMeta]) -> Self {
        Self(metas.iter().cloned().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AccountMeta> {
        self.0.get(index).and_then(Option::as_ref)
    }

    pub fn set(&mut self, index: usize, meta: AccountMeta) {
        debug_assert!(index < self.0.len(), "account slot {index} out of range");
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(meta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&AccountMeta>> {
        self.0.iter().map(Option::as_ref)
    }

    /// Index of the first slot left unset.
    pub fn first_unset(&self) -> Option<usize> {
        self.0.iter().position(Option::is_none)
    }
}

/// Argument block of one instruction shape.
///
/// The borsh encoding of the implementor is the instruction data that follows
/// the discriminant byte.
pub trait InstructionArgs: BorshSerialize + BorshDeserialize + Clone + Debug + PartialEq {
    const NAME: &'static str;
    const DISCRIMINANT: u8;
    const ACCOUNTS: &'static [AccountSlot];

    /// Parameter fields for tree rendering.
    fn fields(&self) -> Vec<DecodedField>;

    fn variant() -> VariantDef {
        VariantDef {
            name: Self::NAME,
            discriminant: Self::DISCRIMINANT,
            accounts: Self::ACCOUNTS,
        }
    }
}

/// One instruction shape: its arguments plus its account slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<A> {
    pub args: A,
    pub accounts: AccountSlots,
}

impl<A: InstructionArgs> Payload<A> {
    /// Payload with default accounts applied and every other slot unset.
    pub fn new(args: A) -> Self {
        Self {
            args,
            accounts: AccountSlots::with_defaults(A::ACCOUNTS),
        }
    }

    /// Payload whose slots are filled from `accounts`, which must match the arity exactly.
    pub fn with_accounts(args: A, accounts: &[AccountMeta]) -> Result<Self> {
        let mut payload = Self::new(args);
        payload.set_accounts(accounts)?;
        Ok(payload)
    }

    pub const fn name(&self) -> &'static str {
        A::NAME
    }

    pub const fn discriminant(&self) -> u8 {
        A::DISCRIMINANT
    }

    /// Account bound to the slot called `name`.
    pub fn account(&self, name: &str) -> Option<&AccountMeta> {
        A::ACCOUNTS
            .iter()
            .position(|slot| slot.name == name)
            .and_then(|index| self.accounts.get(index))
    }

    /// Fails with `MalformedAccounts` naming the first unset slot.
    pub fn ensure_accounts(&self) -> Result<()> {
        self.accounts().map(|_| ())
    }

    /// Set slot `index` to `pubkey` with the slot's declared attributes.
    pub(crate) fn set_address(&mut self, index: usize, pubkey: Pubkey) {
        if let Some(slot) = A::ACCOUNTS.get(index) {
            self.accounts.set(index, slot.meta(pubkey));
        }
    }

    /// Address bound to slot `index`, if set.
    pub(crate) fn address(&self, index: usize) -> Option<Pubkey> {
        self.accounts.get(index).map(|meta| meta.pubkey)
    }
}

/// Access to an instruction's ordered account list.
pub trait AccountConsumer {
    /// Ordered account references; fails if any slot is unset.
    fn accounts(&self) -> Result<Vec<AccountMeta>>;

    /// Replace every slot with `accounts`, which must match the arity exactly.
    fn set_accounts(&mut self, accounts: &[AccountMeta]) -> Result<()>;
}

impl<A: InstructionArgs> AccountConsumer for Payload<A> {
    fn accounts(&self) -> Result<Vec<AccountMeta>> {
        if self.accounts.len() != A::ACCOUNTS.len() {
            return Err(CodecError::ArityMismatch {
                instruction: A::NAME,
                expected: A::ACCOUNTS.len(),
                actual: self.accounts.len(),
            });
        }
        self.accounts
            .iter()
            .zip(A::ACCOUNTS)
            .enumerate()
            .map(|(index, (meta, slot))| {
                meta.cloned().ok_or(CodecError::MalformedAccounts {
                    instruction: A::NAME,
                    defect: AccountsDefect::UnsetSlot {
                        index,
                        name: slot.name,
                    },
                })
            })
            .collect()
    }

    fn set_accounts(&mut self, accounts: &[AccountMeta]) -> Result<()> {
        if accounts.len() != A::ACCOUNTS.len() {
            return Err(CodecError::ArityMismatch {
                instruction: A::NAME,
                expected: A::ACCOUNTS.len(),
                actual: accounts.len(),
            });
        }
        self.accounts = AccountSlots::from_metas(accounts);
        Ok(())
    }
}

/// Structured, human-readable dump of an instruction.
pub trait TreeRenderable {
    fn render(&self) -> DecodedInstruction;
}

impl<A: InstructionArgs> TreeRenderable for Payload<A> {
    fn render(&self) -> DecodedInstruction {
        DecodedInstruction::with_fields_and_accounts(
            A::NAME,
            A::DISCRIMINANT,
            self.args.fields(),
            A::ACCOUNTS.iter().map(|slot| slot.name.to_string()).collect(),
        )
    }
}
