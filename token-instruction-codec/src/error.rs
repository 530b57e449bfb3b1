use solana_pubkey::Pubkey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Why an account list could not be bound to an instruction's account slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsDefect {
    /// Fewer accounts were supplied than the instruction requires.
    TooFew { expected: usize, actual: usize },
    /// A required slot was never populated.
    UnsetSlot { index: usize, name: &'static str },
}

impl std::fmt::Display for AccountsDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountsDefect::TooFew { expected, actual } => {
                write!(f, "expected at least {expected} accounts, got {actual}")
            }
            AccountsDefect::UnsetSlot { index, name } => {
                write!(f, "account slot #{index} `{name}` is not set")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{program}: unknown instruction discriminant {discriminant}")]
    UnknownDiscriminant {
        program: &'static str,
        discriminant: u8,
    },
    /// Data ended early. `needed` is a lower bound: the size of the first read
    /// that ran past the end, which for a length-prefixed field may be a
    /// single chunk of the declared length.
    #[error(
        "{}: instruction data truncated, needs at least {needed} bytes but only {available} available",
        truncated_subject(.program, .instruction)
    )]
    TruncatedData {
        program: &'static str,
        /// `None` when not even the discriminant was present.
        instruction: Option<&'static str>,
        needed: usize,
        available: usize,
    },
    #[error("{instruction} (discriminant {discriminant}): invalid instruction data: {reason}")]
    InvalidData {
        instruction: &'static str,
        discriminant: u8,
        reason: String,
    },
    #[error("{instruction}: malformed accounts: {defect}")]
    MalformedAccounts {
        instruction: &'static str,
        defect: AccountsDefect,
    },
    #[error("{instruction}: expected exactly {expected} accounts, got {actual}")]
    ArityMismatch {
        instruction: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{program}: cannot encode {instruction} (discriminant {discriminant}): {reason}")]
    Encoding {
        program: &'static str,
        instruction: &'static str,
        discriminant: u8,
        reason: String,
    },
    #[error("{program}: discriminant {discriminant} already registered for {existing}, cannot register {rejected}")]
    DuplicateDiscriminant {
        program: &'static str,
        discriminant: u8,
        existing: &'static str,
        rejected: &'static str,
    },
    #[error("no decoder registered for program {0}")]
    UnknownProgram(Pubkey),
}

fn truncated_subject(program: &&'static str, instruction: &Option<&'static str>) -> &'static str {
    instruction.unwrap_or(*program)
}
