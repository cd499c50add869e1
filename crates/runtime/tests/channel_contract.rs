//! Exchange channel contract: atomic replace, no clearing, staleness.

use std::fs;
use std::time::{Duration, Instant};

use game_core::{ActionApplicator, ActionCommand, ActorIndex, InputResponse, LogicalButton};
use runtime::{ChannelReader, ChannelWriter, PollGate, ReadOutcome};
use tempfile::TempDir;

fn action(move_x: i64, move_y: i64, shoot_x: i64, shoot_y: i64) -> String {
    format!(
        r#"{{"move_x":{},"move_y":{},"shoot_x":{},"shoot_y":{}}}"#,
        move_x, move_y, shoot_x, shoot_y
    )
}

/// publish, poll, publish again, poll: the second poll sees the second
/// value, never an empty or cleared slot.
#[test]
fn value_published_between_polls_is_observed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("action.json");
    let mut writer = ChannelWriter::new(&path);
    let mut reader = ChannelReader::new(&path);

    writer.publish(&action(1, 0, 0, 0)).expect("first publish");
    assert_eq!(
        reader.poll().expect("first poll"),
        ReadOutcome::Updated(action(1, 0, 0, 0))
    );

    writer.publish(&action(-1, -1, 0, 1)).expect("second publish");
    assert_eq!(
        reader.poll().expect("second poll"),
        ReadOutcome::Updated(action(-1, -1, 0, 1))
    );
    assert_eq!(
        fs::read_to_string(&path).expect("slot still holds the record"),
        action(-1, -1, 0, 1)
    );
}

#[test]
fn republishing_identical_content_counts_as_new() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("action.json");
    let mut writer = ChannelWriter::new(&path);
    let mut reader = ChannelReader::new(&path);

    writer.publish(&action(0, 1, 0, 0)).expect("publish");
    reader.poll().expect("poll");
    std::thread::sleep(Duration::from_millis(20));
    writer.publish(&action(0, 1, 0, 0)).expect("republish");

    assert_eq!(
        reader.poll().expect("poll after republish"),
        ReadOutcome::Updated(action(0, 1, 0, 0))
    );
}

#[test]
fn reader_cadence_is_independent_of_writer() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("action.json");
    let mut writer = ChannelWriter::new(&path);
    let mut reader = ChannelReader::new(&path);
    let mut gate = PollGate::new(4);

    // The writer publishes every tick; the reader only looks every 4th.
    let mut observed = Vec::new();
    for tick in 1..=8 {
        writer.publish(&"x".repeat(tick)).expect("publish");
        if gate.tick() {
            if let ReadOutcome::Updated(text) = reader.poll().expect("poll") {
                observed.push(text);
            }
        }
    }

    assert_eq!(observed, vec!["x".repeat(4), "x".repeat(8)]);
}

#[test]
fn stale_command_stays_in_effect() {
    let start = Instant::now();
    let threshold = Duration::from_secs(1);
    let mut applicator = ActionApplicator::default();
    let command = ActionCommand::from_components([1, 0, 0, -1]).expect("valid command");
    applicator.ingest(command, start);

    let later = start + Duration::from_millis(2500);
    let age = applicator.age(later).expect("a command was ingested");
    assert!(age > threshold);
    assert!(applicator.is_stale(later, threshold));
    assert_eq!(applicator.current(), command);
    assert_eq!(
        applicator.query(ActorIndex::PRIMARY, LogicalButton::ShootUp),
        InputResponse::Handled(true)
    );
}
