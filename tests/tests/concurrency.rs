//! Concurrent pipeline runs: independent keys proceed in parallel and
//! same-key writes serialize in storage, each with its own audit record.

use std::sync::Arc;
use std::thread;
use wardbook_tests::prelude::*;

const THREADS: usize = 8;
const WRITES_PER_THREAD: usize = 5;

#[test]
fn test_parallel_creates_are_each_audited() {
    // GIVEN one relational pipeline shared by every thread
    let fixture = RelationalFixture::new();
    let pipeline = Arc::new(fixture.pipeline.clone());

    // WHEN every thread creates its own patients
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || {
                (0..WRITES_PER_THREAD)
                    .map(|i| {
                        let payload = fields! {
                            "name" => format!("patient {}-{}", t, i),
                            "age" => i as i64,
                        };
                        pipeline
                            .execute(MutationRequest::create(EntityKind::Patient, payload))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let outcomes: Vec<MutationOutcome> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    // THEN every create landed with its own key and audit record
    let total = THREADS * WRITES_PER_THREAD;
    assert!(outcomes.iter().all(MutationOutcome::is_applied));
    let mut keys: Vec<&RowKey> = outcomes.iter().filter_map(|o| o.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(fixture.pipeline.list(EntityKind::Patient).unwrap().len(), total);
    assert_eq!(fixture.store().audit_log().unwrap().len(), total);
}

#[test]
fn test_same_key_patches_are_last_writer_wins() {
    // GIVEN one stored patient
    let fixture = RelationalFixture::new();
    let key = fixture
        .pipeline
        .execute(MutationRequest::create(EntityKind::Patient, alice_patient()))
        .unwrap()
        .key()
        .cloned()
        .unwrap();
    let pipeline = Arc::new(fixture.pipeline.clone());

    // WHEN several threads patch the same row
    let handles: Vec<_> = (0..THREADS as i64)
        .map(|score| {
            let pipeline = Arc::clone(&pipeline);
            let key = key.clone();
            thread::spawn(move || {
                pipeline
                    .execute(MutationRequest::patch(
                        EntityKind::Patient,
                        key,
                        fields! { "satisfaction" => score * 10 },
                    ))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_applied());
    }

    // THEN every patch is audited and the row holds the last audited value
    let audit = fixture.store().audit_log().unwrap();
    assert_eq!(audit.len(), 1 + THREADS);
    let last_after = audit.last().unwrap().after().unwrap().unwrap();
    let row = fixture.pipeline.get(EntityKind::Patient, &key).unwrap().unwrap();
    assert_eq!(row.get("satisfaction"), last_after.get("satisfaction"));
    // each update saw the state left by the one before it
    for pair in audit[1..].windows(2) {
        assert_eq!(pair[0].new_values, pair[1].old_values);
    }
}

#[test]
fn test_document_pipeline_is_shareable() {
    let pipeline = Arc::new(document_pipeline());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || {
                for i in 0..WRITES_PER_THREAD {
                    let week = (t * WRITES_PER_THREAD + i + 1) as i64;
                    let outcome = pipeline
                        .execute(MutationRequest::create(
                            EntityKind::ServiceWeekly,
                            weekly_metrics("emergency", week, 1),
                        ))
                        .unwrap();
                    assert!(outcome.is_applied());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        pipeline.list(EntityKind::ServiceWeekly).unwrap().len(),
        THREADS * WRITES_PER_THREAD
    );
}
