//! Scheduling many lights from one time source

mod common;

use common::*;
use light_style::{LightAction, LightCollection, LightCommand, LightId, Phase, UseType};

type Collection<'t> = LightCollection<'t, TestInstant, MockSink, MockTimeSource, 32, 8>;

fn values(collection: &Collection<'_>, id: usize) -> Vec<String> {
    collection
        .light(LightId(id))
        .unwrap()
        .sink()
        .values()
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn lights_tick_independently() {
    let timer = MockTimeSource::new();
    let mut collection = Collection::new(&timer);

    collection.add_light(LightId(0), styled_light(32, "", "ab", "")).unwrap();
    collection.add_light(LightId(1), styled_light(33, "", "xyz", "")).unwrap();
    collection.handle_command(LightId(0), LightAction::Spawn).unwrap();

    timer.advance(TestDuration(50));
    collection.handle_command(LightId(1), LightAction::Spawn).unwrap();
    assert_eq!(collection.next_service(), Some(TestDuration(50)));

    for _ in 0..4 {
        timer.advance(TestDuration(50));
        collection.service_all();
    }

    assert_eq!(values(&collection, 0), ["a", "b"]);
    assert_eq!(values(&collection, 1), ["x", "y"]);
}

#[test]
fn stopped_light_releases_its_deadline() {
    let timer = MockTimeSource::new();
    let mut collection = Collection::new(&timer);

    collection.add_light(LightId(3), styled_light(40, "", "m", "k")).unwrap();
    collection.handle_command(LightId(3), LightAction::Spawn).unwrap();
    collection
        .handle_command(LightId(3), LightAction::Use(UseType::Off))
        .unwrap();
    assert_eq!(collection.phase(LightId(3)), Ok(Phase::Stop));

    timer.advance(TestDuration(100));
    assert_eq!(collection.service_all(), Some(TestDuration(100)));
    timer.advance(TestDuration(100));
    assert_eq!(collection.service_all(), None);

    assert_eq!(collection.phase(LightId(3)), Ok(Phase::Stopped));
    assert_eq!(values(&collection, 3), ["k", "a"]);
}

#[test]
fn ignored_use_keeps_pending_tick() {
    let timer = MockTimeSource::new();
    let mut collection = Collection::new(&timer);

    collection.add_light(LightId(0), styled_light(32, "", "ab", "")).unwrap();
    collection.handle_command(LightId(0), LightAction::Spawn).unwrap();

    timer.advance(TestDuration(60));
    collection
        .handle_command(LightId(0), LightAction::Use(UseType::On))
        .unwrap();
    assert_eq!(collection.next_service(), Some(TestDuration(40)));
}

#[test]
fn restored_light_is_armed_on_insert() {
    let timer = MockTimeSource::new();
    let mut original = styled_light(32, "", "mnoaz", "");
    original.spawn();
    tick_n(&mut original, 2);

    let restored = TestLight::restore(&original.save(), MockSink::new()).unwrap();
    let mut collection = Collection::new(&timer);
    collection.add_light(LightId(0), restored).unwrap();
    assert_eq!(collection.next_service(), Some(TestDuration(100)));

    timer.advance(TestDuration(100));
    collection.service_all();
    assert_eq!(values(&collection, 0), ["o"]);
}

#[test]
fn queued_commands_reach_their_lights() {
    let timer = MockTimeSource::new();
    let mut collection = Collection::new(&timer);
    collection.add_light(LightId(2), styled_light(34, "", "q", "")).unwrap();

    let queue = [
        LightCommand::new(LightId(2), LightAction::Spawn),
        LightCommand::new(LightId(2), LightAction::Use(UseType::Toggle)),
    ];
    for command in queue {
        collection.dispatch(command).unwrap();
    }

    assert_eq!(values(&collection, 2), ["a"]);
    assert_eq!(collection.next_service(), None);
    assert!(collection
        .dispatch(LightCommand::new(LightId(5), LightAction::Spawn))
        .is_err());
}
