//! Decoder registry: which decoder handles instructions sent to which program address.

use std::{collections::HashMap, fmt, marker::PhantomData};

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;
use tracing::debug;

use crate::{
    codec::ProgramInstruction,
    core::{DecodedInstruction, InstructionDecoder},
    error::{CodecError, Result},
    programs::{AssociatedTokenAccountInstruction, TokenMetadataInstruction},
};

/// [`InstructionDecoder`] for every program whose instructions implement [`ProgramInstruction`].
pub struct ProgramDecoder<I> {
    program_id: Pubkey,
    _instruction: PhantomData<fn() -> I>,
}

impl<I: ProgramInstruction> ProgramDecoder<I> {
    /// Decoder for the program's mainnet address.
    pub fn new() -> Self {
        Self::with_program_id(I::DEFAULT_PROGRAM_ID)
    }

    /// Decoder for a deployment at `program_id`.
    pub fn with_program_id(program_id: Pubkey) -> Self {
        Self {
            program_id,
            _instruction: PhantomData,
        }
    }

    /// Name of the instruction registered under `discriminant`.
    pub fn instruction_name(&self, discriminant: u8) -> Option<&'static str> {
        I::codec().ok()?.instruction_name(discriminant)
    }
}

impl<I: ProgramInstruction> Default for ProgramDecoder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Clone for ProgramDecoder<I> {
    fn clone(&self) -> Self {
        Self {
            program_id: self.program_id,
            _instruction: PhantomData,
        }
    }
}

impl<I: ProgramInstruction> fmt::Debug for ProgramDecoder<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramDecoder")
            .field("program", &I::PROGRAM_NAME)
            .field("program_id", &self.program_id)
            .finish()
    }
}

impl<I: ProgramInstruction> InstructionDecoder for ProgramDecoder<I> {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn program_name(&self) -> &'static str {
        I::PROGRAM_NAME
    }

    fn decode(&self, data: &[u8], accounts: &[AccountMeta]) -> Result<DecodedInstruction> {
        I::decode(data, accounts).map(|instruction| instruction.render())
    }
}

/// Caller-owned table of decoders keyed by program address.
///
/// Registration needs `&mut self`; a finished registry can be shared behind an `Arc`.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<Pubkey, Box<dyn InstructionDecoder>>,
}

impl DecoderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with both programs at their mainnet addresses.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ProgramDecoder::<AssociatedTokenAccountInstruction>::new()));
        registry.register(Box::new(ProgramDecoder::<TokenMetadataInstruction>::new()));
        registry
    }

    /// Register `decoder` under its program id. Returns the decoder it replaced.
    pub fn register(
        &mut self,
        decoder: Box<dyn InstructionDecoder>,
    ) -> Option<Box<dyn InstructionDecoder>> {
        let program_id = decoder.program_id();
        let replaced = self.decoders.insert(program_id, decoder);
        if let Some(previous) = &replaced {
            debug!(
                %program_id,
                replaced = previous.program_name(),
                "replaced instruction decoder"
            );
        }
        replaced
    }

    pub fn has_decoder(&self, program_id: &Pubkey) -> bool {
        self.decoders.contains_key(program_id)
    }

    pub fn get_decoder(&self, program_id: &Pubkey) -> Option<&dyn InstructionDecoder> {
        self.decoders.get(program_id).map(|d| d.as_ref())
    }

    /// Registered program ids, in no particular order.
    pub fn program_ids(&self) -> impl Iterator<Item = &Pubkey> {
        self.decoders.keys()
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode an instruction sent to `program_id` with the decoder registered for it.
    pub fn decode(
        &self,
        program_id: &Pubkey,
        data: &[u8],
        accounts: &[AccountMeta],
    ) -> Result<(DecodedInstruction, &dyn InstructionDecoder)> {
        let decoder = self
            .get_decoder(program_id)
            .ok_or(CodecError::UnknownProgram(*program_id))?;
        let decoded = decoder.decode(data, accounts)?;
        Ok((decoded, decoder))
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.decoders
                    .iter()
                    .map(|(program_id, decoder)| (program_id, decoder.program_name())),
            )
            .finish()
    }
}
