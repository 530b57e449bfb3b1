use std::{sync::Arc, thread};

use solana_signature::Signature;
use solana_signer::Signer;
use token_instruction_codec::{
    programs::{
        associated_token_account::CreateBuilder, token_metadata::CreateMasterEditionV3Builder,
        ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    },
    AssociatedTokenAccountInstructionDecoder, DecoderConfig, DecoderRegistry, LogVerbosity,
    TokenMetadataInstructionDecoder,
};
use token_instruction_codec_tests::{
    decode_message, decode_transaction, decode_transaction_snapshot, deterministic_keypair,
    format_plain, key, legacy_message, plain_config, signed_transaction, writable_accounts,
};

#[test]
fn test_decode_signed_transaction() {
    let payer = deterministic_keypair(1);
    let ix = CreateBuilder::for_wallet(payer.pubkey(), key(3), key(4))
        .idempotent()
        .build()
        .unwrap()
        .to_instruction()
        .unwrap();
    let tx = signed_transaction(&[ix], &[&payer]);

    let config = DecoderConfig::default();
    let log = decode_transaction(&tx, &config);
    assert_eq!(log.signature, tx.signatures[0]);
    assert_ne!(log.signature, Signature::default());

    let snapshot = decode_transaction_snapshot(&tx, &config);
    assert_eq!(snapshot.signature, tx.signatures[0].to_string());
    assert_eq!(snapshot.instructions.len(), 1);
    let ix = &snapshot.instructions[0];
    assert_eq!(ix.program_name, "AssociatedTokenAccount");
    assert_eq!(ix.instruction_name.as_deref(), Some("CreateIdempotent"));
    assert_eq!(ix.accounts[0].pubkey, payer.pubkey().to_string());
    assert!(ix.accounts[0].is_signer);
    assert_eq!(ix.accounts[0].name.as_deref(), Some("funding_account"));
    assert!(ix.error.is_none());
}

#[test]
fn test_alternate_deployment_is_decoded() {
    let staging = key(42);
    let ix = CreateMasterEditionV3Builder::for_mint(key(3), key(1))
        .program_id(staging)
        .max_supply(10)
        .build()
        .unwrap()
        .to_instruction()
        .unwrap();
    assert_eq!(ix.program_id, staging);
    let message = legacy_message(&[ix], &key(1));

    // The mainnet deployment does not know the staging address.
    let mainnet = decode_message(&message, &DecoderConfig::default());
    let undecoded = &mainnet.instructions[0];
    assert!(undecoded.decoded_instruction.is_none());
    assert!(undecoded.error.is_none());
    assert_eq!(undecoded.program_name, format!("Unknown Program ({staging})"));

    let config = DecoderConfig::default().with_token_metadata_program_id(staging);
    let decoded = decode_message(&message, &config);
    let ix = &decoded.instructions[0];
    assert_eq!(ix.program_name, "TokenMetadata");
    assert_eq!(ix.instruction_name.as_deref(), Some("CreateMasterEditionV3"));
    let fields = &ix.decoded_instruction.as_ref().unwrap().fields;
    assert_eq!(fields[0].name, "max_supply");
    assert_eq!(fields[0].value, "10");
}

#[test]
fn test_registry_last_registration_wins() {
    let mut registry = DecoderRegistry::new();
    assert!(registry.is_empty());
    assert!(registry
        .register(Box::new(AssociatedTokenAccountInstructionDecoder::new()))
        .is_none());
    let replaced = registry.register(Box::new(
        TokenMetadataInstructionDecoder::with_program_id(ASSOCIATED_TOKEN_PROGRAM_ID),
    ));
    assert_eq!(
        replaced.map(|decoder| decoder.program_name()),
        Some("AssociatedTokenAccount")
    );
    assert_eq!(registry.len(), 1);

    assert_eq!(
        registry
            .get_decoder(&ASSOCIATED_TOKEN_PROGRAM_ID)
            .map(|decoder| decoder.program_name()),
        Some("TokenMetadata")
    );

    let (decoded, decoder) = registry
        .decode(&ASSOCIATED_TOKEN_PROGRAM_ID, &[17, 0], &writable_accounts(8))
        .unwrap();
    assert_eq!(decoded.name, "CreateMasterEditionV3");
    assert_eq!(decoder.program_id(), ASSOCIATED_TOKEN_PROGRAM_ID);
    assert!(registry
        .decode(&TOKEN_METADATA_PROGRAM_ID, &[17, 0], &writable_accounts(8))
        .is_err());
}

#[test]
fn test_registry_is_shared_across_threads() {
    let registry = Arc::new(DecoderRegistry::with_defaults());
    let handles: Vec<_> = (0..4u8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let ix = CreateBuilder::for_wallet(key(1), key(10 + n), key(20 + n))
                    .build()
                    .unwrap()
                    .to_instruction()
                    .unwrap();
                let (decoded, _) = registry
                    .decode(&ix.program_id, &ix.data, &ix.accounts)
                    .unwrap();
                decoded.name
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "Create");
    }
}

#[test]
fn test_formatted_transaction() {
    let ix = CreateMasterEditionV3Builder::new()
        .edition(key(2))
        .mint(key(3))
        .update_authority(key(4))
        .mint_authority(key(4))
        .payer(key(1))
        .metadata(key(5))
        .build()
        .unwrap()
        .to_instruction()
        .unwrap();
    let message = legacy_message(&[ix], &key(1));
    let config = plain_config(LogVerbosity::Standard);
    let log = decode_message(&message, &config);
    let formatted = format_plain(&log, &config);

    let expected_tree = format!(
        "[0] Program: TokenMetadata ({TOKEN_METADATA_PROGRAM_ID})
└─ Instruction: CreateMasterEditionV3
   ├─ Params
   │  └─ max_supply: <none>
   └─ Accounts[len=8]
      ├─ #0 edition: {} (writable)
      ├─ #1 mint: {} (writable)
      ├─ #2 update_authority: {} (signer)
      ├─ #3 mint_authority: {} (signer)
      ├─ #4 payer: {} (signer+writable)
      ├─ #5 metadata: {} (writable)
      ├─ #6 token_program: TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA (readonly)
      └─ #7 system_program: 11111111111111111111111111111111 (readonly)
",
        key(2),
        key(3),
        key(4),
        key(4),
        key(1),
        key(5),
    );
    assert!(formatted.starts_with("Transaction #1\nSignature: 1111111111"));
    assert!(formatted.contains("Accounts[len=8]:"));
    assert!(formatted.contains("TokenMetadata"));
    assert!(formatted.contains("Instructions[len=1]:\n"));
    assert!(
        formatted.ends_with(&expected_tree),
        "unexpected output:\n{formatted}"
    );

    let brief = plain_config(LogVerbosity::Brief);
    let brief_output = format_plain(&decode_message(&message, &brief), &brief);
    assert!(!brief_output.contains("Accounts"));
    assert!(brief_output.ends_with("└─ Instruction: CreateMasterEditionV3\n"));
}

#[test]
fn test_failed_instruction_is_rendered() {
    let payer = key(1);
    let raw = solana_instruction::Instruction {
        program_id: TOKEN_METADATA_PROGRAM_ID,
        accounts: vec![solana_instruction::AccountMeta::new(payer, true)],
        data: vec![33, 1, 0],
    };
    let message = legacy_message(&[raw], &payer);
    let config = plain_config(LogVerbosity::Detailed);
    let log = decode_message(&message, &config);
    assert_eq!(log.failed_instructions().count(), 1);

    let formatted = format_plain(&log, &config);
    assert!(formatted.contains("└─ Instruction: <failed to decode>"));
    assert!(formatted.contains(
        "Error: CreateMetadataAccountV3: instruction data truncated, needs at least 5 bytes but only 3 available"
    ));
    assert!(formatted.contains(&format!(
        "Data[len=3]: {}",
        bs58::encode([33u8, 1, 0]).into_string()
    )));
}
