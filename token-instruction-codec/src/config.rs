//! Decoder configuration: program deployments and rendering options.

use std::{fmt, str::FromStr};

use solana_pubkey::Pubkey;
use tracing::warn;

use crate::{
    programs::{
        AssociatedTokenAccountInstructionDecoder, TokenMetadataInstructionDecoder,
        ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    },
    registry::DecoderRegistry,
};

pub const ATA_PROGRAM_ID_ENV: &str = "ATA_PROGRAM_ID";
pub const TOKEN_METADATA_PROGRAM_ID_ENV: &str = "TOKEN_METADATA_PROGRAM_ID";
pub const VERBOSITY_ENV: &str = "INSTRUCTION_DECODER_VERBOSITY";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// How much of each instruction is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVerbosity {
    /// Program and instruction names only.
    Brief,
    /// Names, parameters and accounts.
    #[default]
    Standard,
    /// Everything in `Standard` plus the raw instruction data.
    Detailed,
}

impl FromStr for LogVerbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brief" => Ok(LogVerbosity::Brief),
            "standard" => Ok(LogVerbosity::Standard),
            "detailed" => Ok(LogVerbosity::Detailed),
            other => Err(format!("unknown verbosity `{other}`")),
        }
    }
}

impl fmt::Display for LogVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogVerbosity::Brief => "brief",
            LogVerbosity::Standard => "standard",
            LogVerbosity::Detailed => "detailed",
        };
        f.write_str(name)
    }
}

/// Configuration shared by the registry builder and the formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Address of the associated token account program deployment.
    pub ata_program_id: Pubkey,
    /// Address of the token metadata program deployment.
    pub token_metadata_program_id: Pubkey,
    pub verbosity: LogVerbosity,
    /// Emit ANSI colors in formatted output.
    pub use_colors: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            ata_program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
            verbosity: LogVerbosity::Standard,
            use_colors: true,
        }
    }
}

impl DecoderConfig {
    /// Detailed output without colors, for tests and snapshots.
    pub fn debug() -> Self {
        Self {
            verbosity: LogVerbosity::Detailed,
            use_colors: false,
            ..Self::default()
        }
    }

    /// Defaults overridden by environment variables.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `ATA_PROGRAM_ID` | associated token account program address |
    /// | `TOKEN_METADATA_PROGRAM_ID` | token metadata program address |
    /// | `INSTRUCTION_DECODER_VERBOSITY` | `brief`, `standard` or `detailed` |
    /// | `NO_COLOR` | any non-empty value disables colors |
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(program_id) = parse_var(&lookup, ATA_PROGRAM_ID_ENV) {
            config.ata_program_id = program_id;
        }
        if let Some(program_id) = parse_var(&lookup, TOKEN_METADATA_PROGRAM_ID_ENV) {
            config.token_metadata_program_id = program_id;
        }
        if let Some(verbosity) = parse_var(&lookup, VERBOSITY_ENV) {
            config.verbosity = verbosity;
        }
        if lookup(NO_COLOR_ENV).is_some_and(|value| !value.is_empty()) {
            config.use_colors = false;
        }
        config
    }

    pub fn with_ata_program_id(mut self, program_id: Pubkey) -> Self {
        self.ata_program_id = program_id;
        self
    }

    pub fn with_token_metadata_program_id(mut self, program_id: Pubkey) -> Self {
        self.token_metadata_program_id = program_id;
        self
    }

    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Registry with both program decoders at the configured addresses.
    pub fn decoder_registry(&self) -> DecoderRegistry {
        let mut registry = DecoderRegistry::new();
        registry.register(Box::new(
            AssociatedTokenAccountInstructionDecoder::with_program_id(self.ata_program_id),
        ));
        registry.register(Box::new(TokenMetadataInstructionDecoder::with_program_id(
            self.token_metadata_program_id,
        )));
        registry
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring invalid configuration value");
            None
        }
    }
}
