//! End-to-end batch lifecycle against the bundled ledger backends.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;
use uniqcode::ledger::{Ledger, LedgerError, MemoryLedger, SqliteLedger};
use uniqcode::{
    BatchId, BatchSecret, ChaincodeConfig, CodeService, Invocation, OrderCode, UniqueCode,
    UniqueCodeError, LAST_BATCH_ID_KEY,
};
use uniqcode_testkit::fixtures::{admin_credential, user_credential};
use uniqcode_testkit::{FaultyLedger, SecretParams, SCENARIO_TIMESTAMP as NOW};

fn admin(tx_id: &str) -> Invocation {
    Invocation::at(admin_credential(), tx_id, NOW)
}

async fn issue_two<L: Ledger>(service: &CodeService<L>) {
    let ts = NOW.to_string();
    assert_eq!(service.issue_batch(&admin("tx1"), &ts).await.unwrap(), BatchId::new(0));
    assert_eq!(service.issue_batch(&admin("tx2"), &ts).await.unwrap(), BatchId::new(1));
}

#[tokio::test]
async fn test_two_batches_full_cycle() {
    let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
    issue_two(&service).await;

    let ctx = admin("tx3");
    let first = service.list_batch_codes(&ctx, BatchId::new(0)).await.unwrap();
    let second = service.list_batch_codes(&ctx, BatchId::new(1)).await.unwrap();

    assert_eq!(first.len(), 10_000);
    assert_eq!(second.len(), 10_000);
    assert_eq!(first[0].as_str(), "0000000001532478");
    assert_eq!(first[9_999].as_str(), "0000010000932e27");
    assert_eq!(second[0].as_str(), "000001000133f6b4");
    assert_eq!(second[9_999].as_str(), "0000020000be43bd");

    let mut seen = HashSet::new();
    for code in first.iter().chain(second.iter()) {
        assert!(seen.insert(code.as_str().to_string()), "duplicate {}", code);
    }

    for code in first.iter().step_by(997).chain(second.iter().step_by(997)) {
        assert!(service.verify_code(code.as_str()).await.unwrap());
    }

    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::new(2));
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
    issue_two(&service).await;

    let keys_before = service.ledger().state_keys().unwrap();
    let a = service.list_batch_codes(&admin("tx3"), BatchId::new(1)).await.unwrap();
    let b = service.list_batch_codes(&admin("tx4"), BatchId::new(1)).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(service.ledger().state_keys().unwrap(), keys_before);
}

#[tokio::test]
async fn test_mutated_codes_fail() {
    let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
    issue_two(&service).await;

    // suffix of ordinal 1 moved onto ordinal 2
    assert!(!service.verify_code("0000000002532478").await.unwrap());
    // code from batch 0 with its ordinal pushed into batch 1
    assert!(!service.verify_code("0000010001532478").await.unwrap());
    // last suffix character flipped
    assert!(!service.verify_code("0000020000be43bc").await.unwrap());
}

#[tokio::test]
async fn test_rejected_issuance_leaves_no_trace() {
    let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
    let ts = NOW.to_string();

    let user = Invocation::at(user_credential(), "tx1", NOW);
    assert!(matches!(
        service.issue_batch(&user, &ts).await,
        Err(UniqueCodeError::Unauthorized(_))
    ));

    let stale = (NOW - 300_000_000).to_string();
    assert!(matches!(
        service.issue_batch(&admin("tx1"), &stale).await,
        Err(UniqueCodeError::StaleOrInvalidTimestamp(_))
    ));

    assert!(service.ledger().state_keys().unwrap().is_empty());
    assert_eq!(service.ledger().private_len("UNIQUE_CODE_SECRET").unwrap(), 0);
    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::FIRST);
}

#[tokio::test]
async fn test_override_then_collision() {
    let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
    issue_two(&service).await;

    service.set_last_batch_id(BatchId::new(0)).await.unwrap();
    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::new(1));

    let err = service
        .issue_batch(&admin("tx5"), &NOW.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, UniqueCodeError::BatchAlreadyExists(id) if id == BatchId::new(1)));

    // existing batch untouched
    assert!(service.verify_code("000001000133f6b4").await.unwrap());
}

#[tokio::test]
async fn test_secret_write_failure_does_not_advance() {
    let ledger = FaultyLedger::new(MemoryLedger::new()).fail_writes_to("0");
    let service = CodeService::new(ledger, ChaincodeConfig::default());

    let err = service
        .issue_batch(&admin("tx1"), &NOW.to_string())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UniqueCodeError::Persistence(LedgerError::WriteRejected { .. })
    ));

    let inner = service.ledger().inner();
    assert!(inner.state_keys().unwrap().is_empty());
    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::FIRST);
}

#[tokio::test]
async fn test_atomic_pointer_failure_writes_nothing() {
    let ledger = FaultyLedger::new(MemoryLedger::new())
        .fail_writes_to(LAST_BATCH_ID_KEY)
        .atomic();
    let service = CodeService::new(ledger, ChaincodeConfig::default());

    assert!(service.issue_batch(&admin("tx1"), &NOW.to_string()).await.is_err());

    let inner = service.ledger().inner();
    assert!(inner.state_keys().unwrap().is_empty());
    assert_eq!(inner.private_len("UNIQUE_CODE_SECRET").unwrap(), 0);
}

#[tokio::test]
async fn test_sequential_pointer_failure_blocks_reissue() {
    let ledger = FaultyLedger::new(MemoryLedger::new()).fail_writes_to(LAST_BATCH_ID_KEY);
    let service = CodeService::new(ledger, ChaincodeConfig::default());
    let ts = NOW.to_string();

    assert!(service.issue_batch(&admin("tx1"), &ts).await.is_err());

    // secret and range landed in order, pointer did not move
    assert!(service.verify_code("0000000001532478").await.unwrap());
    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::FIRST);

    // the next attempt collides instead of overwriting the secret
    assert!(matches!(
        service.issue_batch(&admin("tx2"), &ts).await,
        Err(UniqueCodeError::BatchAlreadyExists(_))
    ));
    assert!(service.verify_code("0000000001532478").await.unwrap());
}

#[tokio::test]
async fn test_batch_created_after_check_is_not_overwritten() {
    // The existence check reads a snapshot that predates batch 0.
    let ledger = FaultyLedger::new(MemoryLedger::new())
        .stale_reads_of("0")
        .atomic();
    let service = CodeService::new(ledger, ChaincodeConfig::default());
    let collection = service.config().secret_collection.clone();

    let original = BatchSecret::derive(&NOW.to_string(), "tx1");
    let range = BatchId::new(0).ordinal_range().encode().unwrap();
    let inner = service.ledger().inner();
    inner
        .put_private_data(&collection, "0", Bytes::copy_from_slice(original.as_bytes()))
        .await
        .unwrap();
    inner.put_state("0", Bytes::from(range)).await.unwrap();

    let err = service
        .issue_batch(&admin("tx2"), &NOW.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, UniqueCodeError::BatchAlreadyExists(id) if id == BatchId::FIRST));

    let stored = inner.get_private_data(&collection, "0").await.unwrap().unwrap();
    assert_eq!(stored.as_ref(), original.as_bytes());
    assert!(!inner.has_state(LAST_BATCH_ID_KEY).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sqlite_issuances_never_share_a_batch() {
    let ts = NOW.to_string();

    for round in 0..16 {
        let ledger = Arc::new(SqliteLedger::open_memory().unwrap());
        let service = Arc::new(CodeService::with_shared(
            ledger.clone(),
            ChaincodeConfig::default(),
        ));

        let handles: Vec<_> = ["txA", "txB"]
            .into_iter()
            .map(|tx| {
                let service = service.clone();
                let ts = ts.clone();
                let tx_id = format!("{tx}-{round}");
                tokio::spawn(async move {
                    let result = service.issue_batch(&admin(&tx_id), &ts).await;
                    (tx_id, result)
                })
            })
            .collect();

        let mut issued = HashSet::new();
        for handle in handles {
            let (tx_id, result) = handle.await.unwrap();
            match result {
                Ok(id) => {
                    assert!(issued.insert(id), "batch {} issued twice", id);
                    let first = OrderCode::new(id.ordinal_range().start).unwrap();
                    let code = UniqueCode::issue(&first, &BatchSecret::derive(&ts, &tx_id));
                    assert!(service.verify_code(code.as_str()).await.unwrap());
                }
                Err(UniqueCodeError::BatchAlreadyExists(_)) => {}
                Err(other) => panic!("unexpected issuance error: {other}"),
            }
        }

        assert!(!issued.is_empty());
        for id in &issued {
            assert!(ledger.has_state(&id.key()).await.unwrap());
        }
        assert_eq!(
            service.peek_next_batch_id().await.unwrap(),
            BatchId::new(issued.len() as u64)
        );
    }
}

#[tokio::test]
async fn test_read_failure_is_persistence() {
    let ledger = FaultyLedger::new(MemoryLedger::new()).fail_reads_of(LAST_BATCH_ID_KEY);
    let service = CodeService::new(ledger, ChaincodeConfig::default());

    assert!(matches!(
        service.peek_next_batch_id().await,
        Err(UniqueCodeError::Persistence(LedgerError::Io(_)))
    ));
}

#[tokio::test]
async fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    {
        let ledger = SqliteLedger::open(&path).unwrap();
        let service = CodeService::new(ledger, ChaincodeConfig::default());
        issue_two(&service).await;
    }

    let ledger = SqliteLedger::open(&path).unwrap();
    let service = CodeService::new(ledger, ChaincodeConfig::default());
    assert_eq!(service.peek_next_batch_id().await.unwrap(), BatchId::new(2));
    assert!(service.verify_code("00000000022fe1ca").await.unwrap());
    assert!(service.verify_code("0000020000be43bd").await.unwrap());

    let codes = service
        .list_batch_codes(&admin("tx9"), BatchId::new(0))
        .await
        .unwrap();
    assert_eq!(codes[1].as_str(), "00000000022fe1ca");
}

const HEX: &[u8] = b"0123456789abcdef";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_issued_batch_verifies_and_rejects_edits(
        params: SecretParams,
        pick in 0usize..10_000,
        pos in 0usize..16,
        replacement in 0usize..16,
    ) {
        let replacement = HEX[replacement] as char;
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let (first, codes, all_verified, original, edited) = runtime.block_on(async {
            let service = CodeService::new(MemoryLedger::new(), ChaincodeConfig::default());
            let ctx = Invocation::at(admin_credential(), params.tx_id.clone(), params.timestamp);
            let id = service
                .issue_batch(&ctx, &params.timestamp.to_string())
                .await
                .unwrap();
            let codes = service.list_batch_codes(&ctx, id).await.unwrap();

            let mut all_verified = true;
            for code in &codes {
                all_verified &= service.verify_code(code.as_str()).await.unwrap();
            }

            let original = codes[pick].as_str().to_string();
            let mut chars: Vec<char> = original.chars().collect();
            chars[pos] = replacement;
            let mutated: String = chars.into_iter().collect();
            let edited = service.verify_code(&mutated).await;

            (codes[0].clone(), codes.len(), all_verified, original, edited)
        });

        prop_assert_eq!(codes, 10_000);
        prop_assert!(all_verified);
        let expected = UniqueCode::issue(&OrderCode::new(1).unwrap(), &params.secret());
        prop_assert_eq!(first, expected);

        prop_assume!(original.as_bytes()[pos] as char != replacement);
        if pos < 10 {
            prop_assert!(
                matches!(
                    edited,
                    Ok(false)
                        | Err(UniqueCodeError::BatchNotFound(_))
                        | Err(UniqueCodeError::MalformedCode(_))
                ),
                "ordinal edit at {} gave {:?}",
                pos,
                edited
            );
        } else {
            prop_assert!(matches!(edited, Ok(false)), "suffix edit at {} gave {:?}", pos, edited);
        }
    }
}
