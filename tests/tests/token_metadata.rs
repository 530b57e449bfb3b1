use solana_instruction::AccountMeta;
use token_instruction_codec::{
    programs::{
        token_metadata::{
            find_master_edition_account, find_metadata_account, Collection, CollectionDetails,
            CreateMasterEditionV3Args, CreateMasterEditionV3Builder, CreateMetadataAccountV3Args,
            CreateMetadataAccountV3Builder, Creator, DataV2, UseMethod, Uses,
        },
        TokenMetadataInstruction, TOKEN_METADATA_PROGRAM_ID,
    },
    AccountConsumer, CodecError, DecoderConfig, Instruction, Payload, ProgramInstruction,
};
use token_instruction_codec_tests::{
    decode_message, key, legacy_message, transaction_log_to_snapshot, writable_accounts,
};

type MetadataInstruction = Instruction<TokenMetadataInstruction>;

fn sample_data() -> DataV2 {
    DataV2 {
        name: "Token".to_string(),
        symbol: "TKN".to_string(),
        uri: "https://example.com/token.json".to_string(),
        seller_fee_basis_points: 250,
        creators: Some(vec![Creator {
            address: key(6),
            verified: false,
            share: 100,
        }]),
        collection: None,
        uses: Some(Uses {
            use_method: UseMethod::Multiple,
            remaining: 3,
            total: 10,
        }),
    }
}

fn metadata_builder() -> CreateMetadataAccountV3Builder {
    CreateMetadataAccountV3Builder::new()
        .data(sample_data())
        .is_mutable(true)
        .collection_details(CollectionDetails::V1 { size: 0 })
        .metadata(key(2))
        .mint(key(3))
        .mint_authority(key(4))
        .payer(key(1))
        .update_authority(key(5), true)
}

#[test]
fn test_create_metadata_account_v3_round_trip() {
    let built = metadata_builder().build().unwrap();
    let raw = built.to_instruction().unwrap();
    assert_eq!(raw.program_id, TOKEN_METADATA_PROGRAM_ID);
    assert_eq!(raw.data[0], 33);
    assert_eq!(&raw.data[1..], borsh::to_vec(&built_args(&built)).unwrap().as_slice());

    let decoded = MetadataInstruction::decode(raw.program_id, &raw.data, &raw.accounts).unwrap();
    assert_eq!(decoded, built);
    assert_eq!(decoded.data().unwrap(), raw.data);
}

fn built_args(ix: &MetadataInstruction) -> CreateMetadataAccountV3Args {
    match &ix.payload {
        TokenMetadataInstruction::CreateMetadataAccountV3(payload) => payload.args.clone(),
        other => panic!("unexpected instruction {}", other.name()),
    }
}

fn assert_round_trip(ix: &MetadataInstruction) {
    let raw = ix.to_instruction().unwrap();
    let decoded = MetadataInstruction::decode(raw.program_id, &raw.data, &raw.accounts).unwrap();
    assert_eq!(&decoded, ix);
    assert_eq!(decoded.data().unwrap(), raw.data);
}

#[test]
fn test_collection_and_padding_alternative_round_trip() {
    let data = DataV2 {
        collection: Some(Collection {
            verified: true,
            key: key(7),
        }),
        uses: Some(Uses {
            use_method: UseMethod::Burn,
            remaining: 1,
            total: 1,
        }),
        ..sample_data()
    };
    let padding = [1, 2, 3, 4, 5, 6, 7, 8];
    let ix = metadata_builder()
        .data(data)
        .collection_details(CollectionDetails::V2 { padding })
        .build()
        .unwrap();
    assert_round_trip(&ix);

    let args = built_args(&ix);
    assert_eq!(args.collection_details, Some(CollectionDetails::V2 { padding }));
    let raw = ix.to_instruction().unwrap();
    // Tag 1 followed by the padding bytes as written.
    assert_eq!(&raw.data[raw.data.len() - 9..], &[1, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_every_use_method_round_trips() {
    for use_method in [UseMethod::Burn, UseMethod::Multiple, UseMethod::Single] {
        let data = DataV2 {
            uses: Some(Uses {
                use_method,
                remaining: 2,
                total: 5,
            }),
            ..sample_data()
        };
        let ix = metadata_builder().data(data).build().unwrap();
        assert_round_trip(&ix);
        assert_eq!(
            built_args(&ix).data.uses.map(|uses| uses.use_method),
            Some(use_method)
        );
    }
}

#[test]
fn test_master_edition_with_max_supply_round_trips() {
    for max_supply in [0u64, 1, u64::MAX] {
        let ix = CreateMasterEditionV3Builder::for_mint(key(3), key(4))
            .payer(key(1))
            .max_supply(max_supply)
            .build()
            .unwrap();
        assert_round_trip(&ix);
        let raw = ix.to_instruction().unwrap();
        assert_eq!(&raw.data[..2], &[17, 1]);
        assert_eq!(&raw.data[2..], &max_supply.to_le_bytes());
    }
}

#[test]
fn test_encode_rejects_unset_slot() {
    let payload: TokenMetadataInstruction =
        Payload::new(CreateMetadataAccountV3Args::default()).into();
    let err = payload.encode().unwrap_err();
    assert_eq!(
        err.to_string(),
        "CreateMetadataAccountV3: malformed accounts: account slot #0 `metadata` is not set"
    );
}

#[test]
fn test_minimal_metadata_layout() {
    let args = CreateMetadataAccountV3Args {
        data: DataV2 {
            name: "X".to_string(),
            symbol: "Y".to_string(),
            uri: "Z".to_string(),
            seller_fee_basis_points: 500,
            ..DataV2::default()
        },
        is_mutable: true,
        collection_details: None,
    };
    let payload: TokenMetadataInstruction =
        Payload::with_accounts(args, &writable_accounts(6)).unwrap().into();
    assert_eq!(
        payload.encode().unwrap(),
        vec![
            33, 1, 0, 0, 0, b'X', 1, 0, 0, 0, b'Y', 1, 0, 0, 0, b'Z', 0xF4, 0x01, 0, 0, 0, 1, 0
        ]
    );
}

#[test]
fn test_master_edition_without_max_supply() {
    let accounts = writable_accounts(8);
    let decoded = TokenMetadataInstruction::decode(&[17, 0], &accounts).unwrap();
    match &decoded {
        TokenMetadataInstruction::CreateMasterEditionV3(payload) => {
            assert_eq!(payload.args, CreateMasterEditionV3Args { max_supply: None });
            assert_eq!(payload.account("edition"), Some(&accounts[0]));
            assert_eq!(payload.account("system_program"), Some(&accounts[7]));
        }
        other => panic!("unexpected instruction {}", other.name()),
    }
    assert_eq!(decoded.encode().unwrap(), vec![17, 0]);
}

#[test]
fn test_dropping_the_last_byte_is_truncation() {
    let with_supply = CreateMasterEditionV3Builder::for_mint(key(3), key(4))
        .payer(key(1))
        .max_supply(5)
        .build()
        .unwrap();
    let without_supply = CreateMasterEditionV3Builder::for_mint(key(3), key(4))
        .payer(key(1))
        .build()
        .unwrap();
    let metadata = metadata_builder().build().unwrap();

    for ix in [with_supply, without_supply, metadata] {
        let raw = ix.to_instruction().unwrap();
        let truncated = &raw.data[..raw.data.len() - 1];
        let err = TokenMetadataInstruction::decode(truncated, &raw.accounts).unwrap_err();
        match err {
            CodecError::TruncatedData {
                program,
                instruction,
                available,
                ..
            } => {
                assert_eq!(program, "TokenMetadata");
                assert_eq!(instruction, Some(ix.name()));
                assert_eq!(available, truncated.len());
            }
            other => panic!("{}: expected truncation, got {other}", ix.name()),
        }
    }
}

#[test]
fn test_absent_optionals_round_trip() {
    let built = CreateMetadataAccountV3Builder::new()
        .data(DataV2 {
            name: "Plain".to_string(),
            ..DataV2::default()
        })
        .metadata(key(2))
        .mint(key(3))
        .mint_authority(key(4))
        .payer(key(1))
        .update_authority(key(4), false)
        .build()
        .unwrap();
    let raw = built.to_instruction().unwrap();
    // creators, collection, uses, is_mutable, collection_details
    assert_eq!(&raw.data[raw.data.len() - 5..], &[0, 0, 0, 0, 0]);

    let decoded = TokenMetadataInstruction::decode(&raw.data, &raw.accounts).unwrap();
    assert_eq!(decoded, built.payload);
}

#[test]
fn test_arity_mismatch_reports_expected_count() {
    let mut payload: TokenMetadataInstruction =
        Payload::new(CreateMetadataAccountV3Args::default()).into();
    let err = payload.set_accounts(&writable_accounts(5)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "CreateMetadataAccountV3: expected exactly 6 accounts, got 5"
    );
}

#[test]
fn test_unknown_discriminants() {
    for discriminant in [0u8, 1, 16, 18, 32, 34, 255] {
        let err = TokenMetadataInstruction::decode(&[discriminant], &writable_accounts(8))
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownDiscriminant {
                program: "TokenMetadata",
                discriminant,
            }
        );
    }
}

#[test]
fn test_master_edition_accounts_derived_from_mint() {
    let mint = key(3);
    let raw = CreateMasterEditionV3Builder::for_mint(mint, key(4))
        .payer(key(1))
        .max_supply(1)
        .build()
        .unwrap()
        .to_instruction()
        .unwrap();
    assert_eq!(raw.accounts[0].pubkey, find_master_edition_account(&mint).0);
    assert_eq!(raw.accounts[5].pubkey, find_metadata_account(&mint).0);
    assert_eq!(raw.accounts[3], AccountMeta::new_readonly(key(4), true));
    assert_eq!(raw.data, vec![17, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_message_snapshot() {
    let ix = metadata_builder().build().unwrap().to_instruction().unwrap();
    let message = legacy_message(&[ix], &key(1));
    let log = decode_message(&message, &DecoderConfig::default());
    assert_eq!(log.failed_instructions().count(), 0);

    let snapshot = transaction_log_to_snapshot(&log);
    insta::assert_json_snapshot!("create_metadata_account_v3", snapshot);
}
