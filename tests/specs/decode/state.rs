//! Decoder state specs
//!
//! Verify interned strings and active state as seen between events.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn active_state_switches_between_events() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .host("web01")
            .host("web02")
            .source("/var/log/a")
            .active_state(ActiveStateUpdate {
                host: Some(1),
                source: Some(1),
                ..Default::default()
            })
            .event(&EventRecord::new(33, "one"))
            .active_host(2)
            .event(&EventRecord::new(33, "two")),
    );

    let outcome = journal.decode().passes();

    let hosts: Vec<_> = outcome.events.iter().map(|e| e.host.clone()).collect();
    assert_eq!(hosts, vec![Some("web01".to_string()), Some("web02".to_string())]);
    assert!(outcome
        .events
        .iter()
        .all(|e| e.source.as_deref() == Some("/var/log/a")));
}

#[test]
fn host_and_base_time_record_leaves_source_alone() {
    let journal = JournalFile::new(&[
        0x04, 1, b's', // new source "s"
        0x03, 1, b'h', // new host "h"
        0x14, 1, // active source 1
        0x19, 1, 0x10, 0x27, 0, 0, // active host 1, base time 10000
    ]);
    let mut decoder = journal.open();

    assert!(decoder.next_event().unwrap().is_none());
    assert_eq!(decoder.state().active_source(), 1);
    assert_eq!(decoder.state().active_host(), 1);
    assert_eq!(decoder.state().base_time(), 10_000);
    assert_eq!(decoder.source().unwrap(), "s");
}

#[test]
fn header_does_not_shift_event_times() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .header(4, 12, 1_000_000)
            .event(&EventRecord::new(33, "e").with_time(5, 0)),
    );
    let mut decoder = journal.open();

    let time = decoder.next_event().unwrap().unwrap().index_time();

    assert_eq!(time, 5);
    let header = decoder.header().unwrap();
    assert_eq!(header.base_index_time, 1_000_000);
    assert_eq!(header.align_mask(), 0xfff);
}

#[test]
fn string_tables_are_separate() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .host("h1")
            .source("s1")
            .source_type("st1")
            .string(StringTable::Generic, "g1")
            .host("h2"),
    );
    let mut decoder = journal.open();

    assert!(decoder.next_event().unwrap().is_none());
    let state = decoder.state();
    let hosts: Vec<&str> = state.table(StringTable::Host).iter().collect();
    assert_eq!(hosts, vec!["h1", "h2"]);
    assert_eq!(state.lookup(StringTable::Source, 1).unwrap(), "s1");
    assert_eq!(state.lookup(StringTable::SourceType, 1).unwrap(), "st1");
    assert_eq!(state.lookup(StringTable::Generic, 1).unwrap(), "g1");
    assert_eq!(decoder.stats().strings, 5);
}

#[test]
fn out_of_range_host_reports_table_size() {
    let journal = JournalFile::from_builder(
        JournalBuilder::new()
            .host("only")
            .active_host(2)
            .event(&EventRecord::new(33, "e")),
    );
    let mut decoder = journal.open();

    assert!(decoder.advance());
    let err = decoder.host().unwrap_err();

    assert_eq!(err.to_string(), "invalid host reference: index 2 with 1 entries");
}
