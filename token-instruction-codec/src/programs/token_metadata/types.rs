//! Argument types shared by the Token Metadata instructions.
//!
//! Field order is the borsh layout of the on-chain program. Optional fields go
//! through [`crate::wire::optional`] so that any nonzero presence flag decodes
//! as present.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use crate::core::{DecodedField, NONE_VALUE};

// ============================================================================
// Metadata Data
// ============================================================================

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// Share of the royalties, in percent.
    pub share: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub verified: bool,
    pub key: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

impl fmt::Display for UseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UseMethod::Burn => "Burn",
            UseMethod::Multiple => "Multiple",
            UseMethod::Single => "Single",
        };
        f.write_str(name)
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DataV2 {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Royalty in basis points (500 = 5%).
    pub seller_fee_basis_points: u16,
    #[borsh(
        serialize_with = "crate::wire::optional::serialize",
        deserialize_with = "crate::wire::optional::deserialize"
    )]
    pub creators: Option<Vec<Creator>>,
    #[borsh(
        serialize_with = "crate::wire::optional::serialize",
        deserialize_with = "crate::wire::optional::deserialize"
    )]
    pub collection: Option<Collection>,
    #[borsh(
        serialize_with = "crate::wire::optional::serialize",
        deserialize_with = "crate::wire::optional::deserialize"
    )]
    pub uses: Option<Uses>,
}

// ============================================================================
// Collection Details
// ============================================================================

/// Tag byte selects the alternative; only that alternative's fields follow.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionDetails {
    V1 { size: u64 },
    /// Reserved layout, the padding is written as-is.
    V2 { padding: [u8; 8] },
}

// ============================================================================
// Rendering
// ============================================================================

impl Creator {
    fn to_field(self, index: usize) -> DecodedField {
        DecodedField::with_children(
            format!("creator[{index}]"),
            vec![
                DecodedField::new("address", self.address.to_string()),
                DecodedField::new("verified", self.verified.to_string()),
                DecodedField::new("share", self.share.to_string()),
            ],
        )
    }
}

impl Collection {
    fn to_field(self) -> DecodedField {
        DecodedField::with_children(
            "collection",
            vec![
                DecodedField::new("verified", self.verified.to_string()),
                DecodedField::new("key", self.key.to_string()),
            ],
        )
    }
}

impl Uses {
    fn to_field(self) -> DecodedField {
        DecodedField::with_children(
            "uses",
            vec![
                DecodedField::new("use_method", self.use_method.to_string()),
                DecodedField::new("remaining", self.remaining.to_string()),
                DecodedField::new("total", self.total.to_string()),
            ],
        )
    }
}

impl DataV2 {
    pub(crate) fn to_field(&self) -> DecodedField {
        let creators = match &self.creators {
            Some(creators) => DecodedField::with_children(
                format!("creators[len={}]", creators.len()),
                creators
                    .iter()
                    .enumerate()
                    .map(|(i, creator)| creator.to_field(i))
                    .collect(),
            ),
            None => DecodedField::new("creators", NONE_VALUE),
        };
        DecodedField::with_children(
            "data",
            vec![
                DecodedField::new("name", self.name.clone()),
                DecodedField::new("symbol", self.symbol.clone()),
                DecodedField::new("uri", self.uri.clone()),
                DecodedField::new(
                    "seller_fee_basis_points",
                    self.seller_fee_basis_points.to_string(),
                ),
                creators,
                self.collection
                    .map(Collection::to_field)
                    .unwrap_or_else(|| DecodedField::new("collection", NONE_VALUE)),
                self.uses
                    .map(Uses::to_field)
                    .unwrap_or_else(|| DecodedField::new("uses", NONE_VALUE)),
            ],
        )
    }
}

impl CollectionDetails {
    pub(crate) fn to_field(self) -> DecodedField {
        let alternative = match self {
            CollectionDetails::V1 { size } => {
                DecodedField::with_children("V1", vec![DecodedField::new("size", size.to_string())])
            }
            CollectionDetails::V2 { padding } => DecodedField::with_children(
                "V2",
                vec![DecodedField::new("padding", format!("{padding:?}"))],
            ),
        };
        DecodedField::with_children("collection_details", vec![alternative])
    }
}
