//! The instruction envelope: a program address plus one program instruction.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use crate::{
    codec::ProgramInstruction,
    core::DecodedInstruction,
    error::Result,
};

/// A finalized instruction addressed to a deployment of program `I`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction<I> {
    pub program_id: Pubkey,
    pub payload: I,
}

impl<I: ProgramInstruction> Instruction<I> {
    /// Instruction addressed to the program's default deployment.
    pub fn new(payload: impl Into<I>) -> Self {
        Self {
            program_id: I::DEFAULT_PROGRAM_ID,
            payload: payload.into(),
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Decode an instruction received by `program_id`.
    pub fn decode(program_id: Pubkey, data: &[u8], accounts: &[AccountMeta]) -> Result<Self> {
        Ok(Self {
            program_id,
            payload: I::decode(data, accounts)?,
        })
    }

    pub fn discriminant(&self) -> u8 {
        self.payload.discriminant()
    }

    pub fn name(&self) -> &'static str {
        self.payload.name()
    }

    /// Encoded instruction data: `discriminant || args`.
    pub fn data(&self) -> Result<Vec<u8>> {
        self.payload.encode()
    }

    pub fn accounts(&self) -> Result<Vec<AccountMeta>> {
        self.payload.accounts()
    }

    pub fn render(&self) -> DecodedInstruction {
        self.payload.render()
    }

    /// Convert into the runtime instruction type used for transaction assembly.
    pub fn to_instruction(&self) -> Result<solana_instruction::Instruction> {
        Ok(solana_instruction::Instruction {
            program_id: self.program_id,
            accounts: self.accounts()?,
            data: self.data()?,
        })
    }
}
