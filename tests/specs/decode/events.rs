//! Event decoding specs
//!
//! Verify the events a caller sees for well-formed journals.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn single_event_with_interned_host() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .header(4, 12, 0)
            .host("web01")
            .active_host(1)
            .event(&EventRecord::new(1, "hello")),
    );

    let outcome = journal.decode().passes();

    assert_eq!(
        outcome.events,
        vec![Seen {
            message: "hello".to_string(),
            host: Some("web01".to_string()),
            source: None,
            index_time: 0,
            stream_id: 0,
            metadata: 0,
        }]
    );
    assert_eq!(outcome.position, std::fs::metadata(journal.path()).unwrap().len());
}

#[test]
fn events_come_back_in_stream_order() {
    let mut builder = JournalBuilder::new().header(4, 0, 0);
    for i in 0..50u64 {
        builder = builder.event(
            &EventRecord::new(33, format!("event {i}"))
                .with_stream(i, i * 10, 0)
                .with_time(i as i64, 0),
        );
    }
    let journal = JournalFile::from_builder(builder);

    let outcome = journal.decode().passes();

    let expected: Vec<String> = (0..50).map(|i| format!("event {i}")).collect();
    assert_eq!(outcome.messages(), expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(outcome
        .events
        .iter()
        .enumerate()
        .all(|(i, e)| e.stream_id == i as u64 && e.index_time == i as i64));
    assert_eq!(outcome.stats.events, 50);
    assert_eq!(outcome.stats.records, 51);
}

#[test]
fn shorter_message_after_longer_one() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .event(&EventRecord::new(33, "x".repeat(100)))
            .event(&EventRecord::new(33, "y".repeat(10))),
    );

    let outcome = journal.decode().passes();

    assert_eq!(outcome.messages(), vec!["x".repeat(100).as_str(), "y".repeat(10).as_str()]);
}

#[test]
fn decoding_twice_gives_identical_events() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .header(4, 0, 1_600_000_000)
            .host("a")
            .host("b")
            .active_state(ActiveStateUpdate {
                host: Some(2),
                base_time: Some(1_600_000_000),
                ..Default::default()
            })
            .event(&EventRecord::new(34, "first").with_time(3, 0))
            .active_host(1)
            .event(&EventRecord::new(37, "second").with_extended_storage("xs")),
    );

    let first = journal.decode().passes();
    let second = journal.decode().passes();

    assert_eq!(first.events, second.events);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn metadata_follows_configuration() {
    let record = EventRecord::new(40, "with fields")
        .with_metadata(0x18, &[42])
        .with_metadata(0x1c, &[0, 5, 1])
        .with_metadata(0x2f, &[]);
    let journal = JournalFile::from_builder(JournalBuilder::new().event(&record));

    let materialized = journal.decode().passes();
    let skipped = journal
        .decode_with(DecoderConfig {
            metadata: MetadataMode::Skip,
            ..DecoderConfig::default()
        })
        .passes();

    assert_eq!(materialized.events[0].metadata, 3);
    assert_eq!(skipped.events[0].metadata, 0);
    assert_eq!(skipped.messages(), vec!["with fields"]);
}

#[test]
fn metadata_kinds_are_exposed() {
    let record = EventRecord::new(40, "m")
        .with_metadata(0x1a, &[7])
        .with_metadata(0x2f, &[]);
    let journal = JournalFile::from_builder(JournalBuilder::new().event(&record));
    let mut decoder = journal.open();

    let event = decoder.next_event().unwrap().unwrap();
    let kinds: Vec<Option<MetadataKind>> = event.metadata().iter().map(|m| m.kind()).collect();

    assert_eq!(
        kinds,
        vec![
            Some(MetadataKind::Float64),
            Some(MetadataKind::Float64SigfigsPrecision)
        ]
    );
    assert!(kinds.iter().flatten().all(|k| k.is_float()));
    assert_eq!(event.metadata()[1].code(), 2);
}

#[test]
fn legacy_metadata_is_untyped() {
    let record = EventRecord::new(1, "old")
        .with_metadata(0x0d, &[5])
        .with_metadata(0x10, &[-1]);
    let journal = JournalFile::from_builder(JournalBuilder::new().event(&record));
    let mut decoder = journal.open();

    let event = decoder.next_event().unwrap().unwrap();

    assert_eq!(event.metadata().len(), 2);
    assert!(event.metadata().iter().all(|m| m.kind().is_none()));
    assert_eq!(event.metadata()[0].key(), 0x68);
    assert_eq!(event.metadata()[0].values(), &[5]);
    assert_eq!(event.metadata()[1].values(), &[-1]);
    assert_eq!(event.message(), b"old");
}

#[test]
fn large_event_through_minimum_buffer() {
    let message = "m".repeat(100_000);
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .private(&vec![0u8; 70_000])
            .event(&EventRecord::new(37, message.clone()).with_extended_storage(vec![1u8; 40_000])),
    );

    let outcome = journal.decode_with(DecoderConfig::for_testing()).passes();

    assert_eq!(outcome.messages(), vec![message.as_str()]);
}

mod properties {
    use crate::prelude::*;
    use proptest::prelude::*;

    fn arb_event() -> impl Strategy<Value = EventRecord> {
        (
            prop::sample::select(vec![1u8, 2, 33, 34, 37, 40]),
            "[a-z ]{0,64}",
            any::<u64>(),
            -1_000_000i64..1_000_000,
            prop::collection::vec(any::<i64>(), 0..4),
        )
            .prop_map(|(opcode, message, stream_id, time, values)| {
                let key = if opcode <= 2 || opcode >= 36 { 0x18 } else { 2 };
                values.into_iter().fold(
                    EventRecord::new(opcode, message)
                        .with_stream(stream_id, 0, 0)
                        .with_time(time, 0)
                        .with_extended_storage("xs"),
                    |record, value| record.with_metadata(key, &[value]),
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn file_decodes_identically_across_runs(
            events in prop::collection::vec(arb_event(), 0..10),
            base_time in any::<i32>(),
        ) {
            let builder = events.iter().fold(
                JournalBuilder::new()
                    .host("web01")
                    .active_state(ActiveStateUpdate {
                        host: Some(1),
                        base_time: Some(base_time),
                        ..Default::default()
                    }),
                |builder, event| builder.event(event),
            );
            let journal = JournalFile::from_builder(builder);

            let first = journal.decode();
            let second = journal.decode_with(DecoderConfig::for_testing());

            prop_assert!(first.error.is_none());
            prop_assert_eq!(&first.events, &second.events);
            let expected: Vec<&str> = events
                .iter()
                .map(|e| std::str::from_utf8(&e.message).unwrap_or_default())
                .collect();
            prop_assert_eq!(first.messages(), expected);
        }
    }
}
