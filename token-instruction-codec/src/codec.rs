//! The variant codec: one discriminant byte selecting one of a program's payload shapes.
//!
//! Each program registers its shapes with a [`VariantCodec`] and exposes them as a
//! sum type implementing [`ProgramInstruction`], generated by [`instruction_set!`].
//!
//! Wire layout of every instruction: `discriminant (1 byte) || borsh(args)`.

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;
use tracing::{debug, trace};

use crate::{
    core::DecodedInstruction,
    error::{AccountsDefect, CodecError, Result},
    payload::{AccountConsumer, AccountSlot, AccountSlots, InstructionArgs, Payload},
    wire::InstructionReader,
};

/// Registration record of one payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDef {
    pub name: &'static str,
    pub discriminant: u8,
    pub accounts: &'static [AccountSlot],
}

impl VariantDef {
    pub const fn arity(&self) -> usize {
        self.accounts.len()
    }
}

/// Discriminant-to-shape table of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCodec {
    program: &'static str,
    variants: Vec<VariantDef>,
}

impl VariantCodec {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            variants: Vec::new(),
        }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Shapes in registration order.
    pub fn variants(&self) -> &[VariantDef] {
        &self.variants
    }

    /// Add a shape. Discriminants must be unique within the program.
    pub fn register(&mut self, variant: VariantDef) -> Result<&mut Self> {
        if let Some(existing) = self
            .variants
            .iter()
            .find(|v| v.discriminant == variant.discriminant)
        {
            return Err(CodecError::DuplicateDiscriminant {
                program: self.program,
                discriminant: variant.discriminant,
                existing: existing.name,
                rejected: variant.name,
            });
        }
        self.variants.push(variant);
        Ok(self)
    }

    pub fn lookup(&self, discriminant: u8) -> Result<&VariantDef> {
        self.variants
            .iter()
            .find(|v| v.discriminant == discriminant)
            .ok_or(CodecError::UnknownDiscriminant {
                program: self.program,
                discriminant,
            })
    }

    /// Name of the shape registered under `discriminant`.
    pub fn instruction_name(&self, discriminant: u8) -> Option<&'static str> {
        self.lookup(discriminant).ok().map(|v| v.name)
    }

    /// Read the leading discriminant of `data` and return its shape.
    pub fn read_discriminant(&self, data: &[u8]) -> Result<&VariantDef> {
        let discriminant = *data.first().ok_or(CodecError::TruncatedData {
            program: self.program,
            instruction: None,
            needed: 1,
            available: 0,
        })?;
        self.lookup(discriminant)
    }

    /// Encode `payload` as `discriminant || args`.
    ///
    /// Fails with `MalformedAccounts` if any account slot of the payload is unset.
    pub fn encode<A: InstructionArgs>(&self, payload: &Payload<A>) -> Result<Vec<u8>> {
        let encoding_error = |reason: String| CodecError::Encoding {
            program: self.program,
            instruction: A::NAME,
            discriminant: A::DISCRIMINANT,
            reason,
        };
        match self.lookup(A::DISCRIMINANT) {
            Ok(variant) if variant.name == A::NAME => {}
            Ok(variant) => {
                return Err(encoding_error(format!(
                    "discriminant is registered for {}",
                    variant.name
                )))
            }
            Err(_) => return Err(encoding_error("shape is not registered".to_string())),
        }
        payload.ensure_accounts()?;

        let mut data = vec![A::DISCRIMINANT];
        borsh::to_writer(&mut data, &payload.args).map_err(|e| encoding_error(e.to_string()))?;
        Ok(data)
    }

    /// Decode `data` as shape `A` and bind `accounts` to its slots positionally.
    ///
    /// `data` includes the discriminant byte. Accounts beyond the arity are ignored.
    pub fn decode<A: InstructionArgs>(
        &self,
        data: &[u8],
        accounts: &[AccountMeta],
    ) -> Result<Payload<A>> {
        let variant = self.read_discriminant(data)?;
        if variant.discriminant != A::DISCRIMINANT || variant.name != A::NAME {
            return Err(CodecError::UnknownDiscriminant {
                program: self.program,
                discriminant: variant.discriminant,
            });
        }

        let mut reader = InstructionReader::new(data, 1);
        let args = A::deserialize_reader(&mut reader).map_err(|e| match reader.short_read() {
            Some(needed) => CodecError::TruncatedData {
                program: self.program,
                instruction: Some(A::NAME),
                needed,
                available: data.len(),
            },
            None => CodecError::InvalidData {
                instruction: A::NAME,
                discriminant: A::DISCRIMINANT,
                reason: e.to_string(),
            },
        })?;
        if reader.remaining() > 0 {
            debug!(
                instruction = A::NAME,
                consumed = reader.position(),
                trailing = reader.remaining(),
                "ignoring trailing instruction data"
            );
        }

        let arity = A::ACCOUNTS.len();
        if accounts.len() < arity {
            return Err(CodecError::MalformedAccounts {
                instruction: A::NAME,
                defect: AccountsDefect::TooFew {
                    expected: arity,
                    actual: accounts.len(),
                },
            });
        }
        if accounts.len() > arity {
            trace!(
                instruction = A::NAME,
                extra = accounts.len() - arity,
                "ignoring extra accounts"
            );
        }

        Ok(Payload {
            args,
            accounts: AccountSlots::from_metas(&accounts[..arity]),
        })
    }
}

/// A program's closed set of instructions.
pub trait ProgramInstruction: AccountConsumer + Sized {
    /// Program name used in diagnostics.
    const PROGRAM_NAME: &'static str;
    /// Mainnet address of the program.
    const DEFAULT_PROGRAM_ID: Pubkey;

    /// Codec with every shape of the program registered, built on first use.
    fn codec() -> Result<&'static VariantCodec>;

    fn discriminant(&self) -> u8;

    fn name(&self) -> &'static str;

    /// Encode as `discriminant || args`.
    fn encode(&self) -> Result<Vec<u8>>;

    /// Decode `data` and bind `accounts`, dispatching on the discriminant.
    fn decode(data: &[u8], accounts: &[AccountMeta]) -> Result<Self>;

    /// Structured dump of parameters and account names.
    fn render(&self) -> DecodedInstruction;
}

/// Generate a program's instruction sum type and its [`ProgramInstruction`] impl.
///
/// ```ignore
/// instruction_set! {
///     /// Docs.
///     pub enum MyInstruction {
///         program = "MyProgram", id = MY_PROGRAM_ID;
///         First(FirstArgs),
///         Second(SecondArgs),
///     }
/// }
/// ```
///
/// An optional `, empty_data = ArgsType` after the id decodes empty instruction
/// data as the shape with those arguments.
#[macro_export]
macro_rules! instruction_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            program = $program:literal, id = $id:expr $(, empty_data = $empty:ty)?;
            $($(#[$vmeta:meta])* $variant:ident($args:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis enum $name {
            $($(#[$vmeta])* $variant($crate::payload::Payload<$args>),)+
        }

        $(
            impl From<$crate::payload::Payload<$args>> for $name {
                fn from(payload: $crate::payload::Payload<$args>) -> Self {
                    Self::$variant(payload)
                }
            }
        )+

        impl $name {
            const EMPTY_DATA: Option<u8> = {
                let candidates: &[u8] =
                    &[$(<$empty as $crate::payload::InstructionArgs>::DISCRIMINANT)?];
                match candidates {
                    [discriminant, ..] => Some(*discriminant),
                    [] => None,
                }
            };
        }

        impl $crate::codec::ProgramInstruction for $name {
            const PROGRAM_NAME: &'static str = $program;
            const DEFAULT_PROGRAM_ID: $crate::solana_pubkey::Pubkey = $id;

            fn codec() -> $crate::error::Result<&'static $crate::codec::VariantCodec> {
                static CODEC: ::std::sync::OnceLock<
                    $crate::error::Result<$crate::codec::VariantCodec>,
                > = ::std::sync::OnceLock::new();
                CODEC
                    .get_or_init(|| {
                        let mut codec = $crate::codec::VariantCodec::new($program);
                        $(codec.register(<$args as $crate::payload::InstructionArgs>::variant())?;)+
                        Ok(codec)
                    })
                    .as_ref()
                    .map_err(Clone::clone)
            }

            fn discriminant(&self) -> u8 {
                match self {
                    $(Self::$variant(payload) => payload.discriminant(),)+
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(payload) => payload.name(),)+
                }
            }

            fn encode(&self) -> $crate::error::Result<Vec<u8>> {
                let codec = Self::codec()?;
                match self {
                    $(Self::$variant(payload) => codec.encode(payload),)+
                }
            }

            fn decode(
                data: &[u8],
                accounts: &[$crate::solana_instruction::AccountMeta],
            ) -> $crate::error::Result<Self> {
                let codec = Self::codec()?;
                let legacy;
                let data = match (data.is_empty(), Self::EMPTY_DATA) {
                    (true, Some(discriminant)) => {
                        legacy = [discriminant];
                        &legacy[..]
                    }
                    _ => data,
                };
                let variant = codec.read_discriminant(data)?;
                $(
                    if variant.discriminant
                        == <$args as $crate::payload::InstructionArgs>::DISCRIMINANT
                    {
                        return codec.decode::<$args>(data, accounts).map(Self::$variant);
                    }
                )+
                Err($crate::error::CodecError::UnknownDiscriminant {
                    program: $program,
                    discriminant: variant.discriminant,
                })
            }

            fn render(&self) -> $crate::DecodedInstruction {
                match self {
                    $(Self::$variant(payload) => $crate::payload::TreeRenderable::render(payload),)+
                }
            }
        }

        impl $crate::payload::AccountConsumer for $name {
            fn accounts(&self) -> $crate::error::Result<Vec<$crate::solana_instruction::AccountMeta>> {
                match self {
                    $(Self::$variant(payload) => $crate::payload::AccountConsumer::accounts(payload),)+
                }
            }

            fn set_accounts(
                &mut self,
                accounts: &[$crate::solana_instruction::AccountMeta],
            ) -> $crate::error::Result<()> {
                match self {
                    $(Self::$variant(payload) => {
                        $crate::payload::AccountConsumer::set_accounts(payload, accounts)
                    })+
                }
            }
        }
    };
}
