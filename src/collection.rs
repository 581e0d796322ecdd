use crate::command::{LightAction, LightCommand};
use crate::light::LightStyle;
use crate::sink::StyleSink;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{Phase, ServiceTiming};

/// An identifier for a light within a collection.
///
/// A simple wrapper around `usize`, used as the slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightId(pub usize);

impl From<usize> for LightId {
    fn from(id: usize) -> Self {
        LightId(id)
    }
}

impl From<LightId> for usize {
    fn from(id: LightId) -> Self {
        id.0
    }
}

/// Errors that can occur during collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CollectionError {
    /// The specified light ID does not exist in the collection.
    InvalidLightId(LightId),

    /// Attempted to add a light with an ID that already exists.
    DuplicateLightId(LightId),

    /// The light ID exceeds the collection's capacity.
    LightIdOutOfBounds { id: LightId, capacity: usize },
}

impl core::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CollectionError::InvalidLightId(id) => {
                write!(f, "light ID {} does not exist in collection", id.0)
            }
            CollectionError::DuplicateLightId(id) => {
                write!(f, "light ID {} already exists in collection", id.0)
            }
            CollectionError::LightIdOutOfBounds { id, capacity } => {
                write!(
                    f,
                    "light ID {} exceeds collection capacity of {}",
                    id.0, capacity
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CollectionError {}

struct Slot<I: TimeInstant, S: StyleSink, const N: usize> {
    light: LightStyle<S, I::Duration, N>,
    next_tick: Option<I>,
}

/// Deadline-based ticker for a set of lights.
///
/// Each light has at most one pending tick. [`service_all`](Self::service_all)
/// ticks every light whose deadline has passed and re-arms or drops its
/// deadline according to the returned [`ServiceTiming`].
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Style sink type (the same for every light)
/// * `T` - Time source implementation type
/// * `N` - Maximum pattern length
/// * `MAX_LIGHTS` - Maximum number of lights this collection can hold
pub struct LightCollection<
    't,
    I: TimeInstant,
    S: StyleSink,
    T: TimeSource<I>,
    const N: usize,
    const MAX_LIGHTS: usize,
> {
    slots: [Option<Slot<I, S, N>>; MAX_LIGHTS],
    time_source: &'t T,
}

impl<'t, I, S, T, const N: usize, const MAX_LIGHTS: usize>
    LightCollection<'t, I, S, T, N, MAX_LIGHTS>
where
    I: TimeInstant,
    S: StyleSink,
    T: TimeSource<I>,
{
    /// Creates a new empty collection.
    pub fn new(time_source: &'t T) -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            time_source,
        }
    }

    /// Adds a light under `id`.
    ///
    /// A light that is already in a ticking phase (typically one just
    /// restored from a save) is armed immediately.
    ///
    /// # Errors
    /// * `DuplicateLightId` - A light with this ID already exists
    /// * `LightIdOutOfBounds` - The ID exceeds the collection's capacity
    pub fn add_light(
        &mut self,
        id: LightId,
        light: LightStyle<S, I::Duration, N>,
    ) -> Result<(), CollectionError> {
        let idx = id.0;

        if idx >= MAX_LIGHTS {
            return Err(CollectionError::LightIdOutOfBounds {
                id,
                capacity: MAX_LIGHTS,
            });
        }

        if self.slots[idx].is_some() {
            return Err(CollectionError::DuplicateLightId(id));
        }

        let now = self.time_source.now();
        let next_tick = deadline(now, light.service_timing());
        self.slots[idx] = Some(Slot { light, next_tick });
        Ok(())
    }

    /// Routes an action to the specified light and updates its deadline.
    ///
    /// An ignored use event leaves the pending tick untouched.
    ///
    /// # Errors
    /// * `InvalidLightId` - No light with this ID exists
    pub fn handle_command(&mut self, id: LightId, action: LightAction) -> Result<(), CollectionError> {
        let now = self.time_source.now();
        let slot = self.slot_mut(id)?;

        if let Some(timing) = slot.light.handle_action(action) {
            slot.next_tick = deadline(now, timing);
        }
        Ok(())
    }

    /// Routes a queued command to its light.
    ///
    /// # Errors
    /// * `InvalidLightId` - No light with the command's ID exists
    pub fn dispatch(&mut self, command: LightCommand<LightId>) -> Result<(), CollectionError> {
        self.handle_command(command.light_id, command.action)
    }

    /// Ticks every light whose deadline has passed.
    ///
    /// Each due light is ticked once per call.
    ///
    /// # Returns
    /// * `Some(duration)` - Sleep for this long before the next call
    /// * `None` - Every light is idle; nothing to do until the next command
    pub fn service_all(&mut self) -> Option<I::Duration> {
        let now = self.time_source.now();

        for slot in self.slots.iter_mut().flatten() {
            let due = slot.next_tick.is_some_and(|tick| tick <= now);
            if due {
                let timing = slot.light.tick();
                slot.next_tick = deadline(now, timing);
            }
        }

        self.next_service()
    }

    /// Returns the time until the earliest pending tick, or `None` if there is none.
    ///
    /// An overdue tick reports `ZERO`.
    pub fn next_service(&self) -> Option<I::Duration> {
        let now = self.time_source.now();

        self.slots
            .iter()
            .flatten()
            .filter_map(|slot| slot.next_tick)
            .map(|tick| {
                if tick > now {
                    tick.duration_since(now)
                } else {
                    I::Duration::ZERO
                }
            })
            .min_by_key(|duration| duration.as_millis())
    }

    /// Returns the light with the given ID.
    ///
    /// # Errors
    /// Returns `InvalidLightId` if the light does not exist in the collection.
    pub fn light(&self, id: LightId) -> Result<&LightStyle<S, I::Duration, N>, CollectionError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|slot| &slot.light)
            .ok_or(CollectionError::InvalidLightId(id))
    }

    /// Returns the current phase of the specified light.
    ///
    /// # Errors
    /// Returns `InvalidLightId` if the light does not exist in the collection.
    pub fn phase(&self, id: LightId) -> Result<Phase, CollectionError> {
        Ok(self.light(id)?.phase())
    }

    /// Returns the number of lights currently in the collection.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if the collection contains no lights.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the collection contains a light with the given ID.
    pub fn contains(&self, id: LightId) -> bool {
        self.slots.get(id.0).is_some_and(Option::is_some)
    }

    fn slot_mut(&mut self, id: LightId) -> Result<&mut Slot<I, S, N>, CollectionError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(CollectionError::InvalidLightId(id))
    }
}

fn deadline<I: TimeInstant>(now: I, timing: ServiceTiming<I::Duration>) -> Option<I> {
    match timing {
        // On overflow tick again straight away rather than stalling the light
        ServiceTiming::Delay(delay) => Some(now.checked_add(delay).unwrap_or(now)),
        ServiceTiming::Idle => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightConfig;
    use crate::sink::StyleTable;
    use crate::types::UseType;
    use core::cell::{Cell, RefCell};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestDuration(u64);

    impl TimeDuration for TestDuration {
        const ZERO: Self = TestDuration(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            TestDuration(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            TestDuration(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestInstant(u64);

    impl TimeInstant for TestInstant {
        type Duration = TestDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            TestDuration(self.0 - earlier.0)
        }

        fn checked_add(self, duration: Self::Duration) -> Option<Self> {
            self.0.checked_add(duration.0).map(TestInstant)
        }
    }

    struct MockTimeSource {
        current_time: Cell<TestInstant>,
    }

    impl MockTimeSource {
        fn new() -> Self {
            Self {
                current_time: Cell::new(TestInstant(0)),
            }
        }

        fn advance(&self, millis: u64) {
            let current = self.current_time.get();
            self.current_time.set(TestInstant(current.0 + millis));
        }
    }

    impl TimeSource<TestInstant> for MockTimeSource {
        fn now(&self) -> TestInstant {
            self.current_time.get()
        }
    }

    type Table = RefCell<StyleTable<64, 16>>;
    type TestLight<'a> = LightStyle<&'a Table, TestDuration, 16>;

    fn looping_light<'a>(table: &'a Table, style: i32, pattern: &str) -> TestLight<'a> {
        let config = LightConfig::builder()
            .style(style)
            .pattern(pattern)
            .unwrap()
            .extended(true)
            .build();
        LightStyle::new(config, table)
    }

    #[test]
    fn can_create_empty_collection() {
        let timer = MockTimeSource::new();
        let collection = LightCollection::<TestInstant, &Table, MockTimeSource, 16, 4>::new(&timer);

        assert!(collection.is_empty());
        assert_eq!(collection.next_service(), None);
    }

    #[test]
    fn rejects_duplicate_and_out_of_bounds_ids() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut collection = LightCollection::<TestInstant, _, _, 16, 2>::new(&timer);

        collection
            .add_light(LightId(0), looping_light(&table, 32, "ab"))
            .unwrap();

        assert_eq!(
            collection.add_light(LightId(0), looping_light(&table, 33, "ab")),
            Err(CollectionError::DuplicateLightId(LightId(0)))
        );
        assert_eq!(
            collection.add_light(LightId(2), looping_light(&table, 34, "ab")),
            Err(CollectionError::LightIdOutOfBounds {
                id: LightId(2),
                capacity: 2
            })
        );
        assert_eq!(collection.len(), 1);
        assert!(collection.contains(LightId(0)));
        assert!(!collection.contains(LightId(1)));
    }

    #[test]
    fn commands_to_missing_lights_fail() {
        let timer = MockTimeSource::new();
        let mut collection =
            LightCollection::<TestInstant, &Table, MockTimeSource, 16, 2>::new(&timer);

        assert_eq!(
            collection.handle_command(LightId(1), LightAction::Spawn),
            Err(CollectionError::InvalidLightId(LightId(1)))
        );
        assert_eq!(
            collection.handle_command(LightId(7), LightAction::Spawn),
            Err(CollectionError::InvalidLightId(LightId(7)))
        );
    }

    #[test]
    fn service_all_ticks_due_lights() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut collection = LightCollection::<TestInstant, _, _, 16, 4>::new(&timer);

        collection
            .add_light(LightId(0), looping_light(&table, 32, "ab"))
            .unwrap();
        collection
            .handle_command(LightId(0), LightAction::Spawn)
            .unwrap();
        assert_eq!(collection.next_service(), Some(TestDuration(100)));

        // Not due yet
        timer.advance(50);
        assert_eq!(collection.service_all(), Some(TestDuration(50)));
        assert_eq!(table.borrow().get(32), Some(""));

        timer.advance(50);
        assert_eq!(collection.service_all(), Some(TestDuration(100)));
        assert_eq!(table.borrow().get(32), Some("a"));

        timer.advance(100);
        collection.service_all();
        assert_eq!(table.borrow().get(32), Some("b"));
    }

    #[test]
    fn service_all_returns_none_when_all_idle() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut collection = LightCollection::<TestInstant, _, _, 16, 4>::new(&timer);

        let config = LightConfig::builder()
            .style(32)
            .pattern_stop("")
            .unwrap()
            .build();
        collection
            .add_light(LightId(0), LightStyle::new(config, &table))
            .unwrap();
        collection
            .handle_command(LightId(0), LightAction::Spawn)
            .unwrap();

        assert_eq!(collection.service_all(), None);
        assert_eq!(table.borrow().get(32), Some("m"));
    }

    #[test]
    fn stop_pattern_disarms_after_completion() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut collection = LightCollection::<TestInstant, _, _, 16, 4>::new(&timer);

        let config = LightConfig::builder()
            .style(35)
            .pattern("m")
            .unwrap()
            .pattern_stop("k")
            .unwrap()
            .extended(true)
            .build();
        collection
            .add_light(LightId(3), LightStyle::new(config, &table))
            .unwrap();
        collection
            .handle_command(LightId(3), LightAction::Spawn)
            .unwrap();
        collection
            .handle_command(LightId(3), LightAction::Use(UseType::Off))
            .unwrap();
        assert_eq!(collection.phase(LightId(3)), Ok(Phase::Stop));

        timer.advance(100);
        assert_eq!(collection.service_all(), Some(TestDuration(100)));
        assert_eq!(table.borrow().get(35), Some("k"));

        timer.advance(100);
        assert_eq!(collection.service_all(), None);
        assert_eq!(table.borrow().get(35), Some("a"));
        assert_eq!(collection.phase(LightId(3)), Ok(Phase::Stopped));
    }

    #[test]
    fn ignored_use_keeps_pending_tick() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut collection = LightCollection::<TestInstant, _, _, 16, 4>::new(&timer);

        collection
            .add_light(LightId(0), looping_light(&table, 32, "ab"))
            .unwrap();
        collection
            .handle_command(LightId(0), LightAction::Spawn)
            .unwrap();

        timer.advance(60);
        collection
            .handle_command(LightId(0), LightAction::Use(UseType::On))
            .unwrap();
        assert_eq!(collection.next_service(), Some(TestDuration(40)));
    }

    #[test]
    fn restored_ticking_light_is_armed_on_add() {
        let timer = MockTimeSource::new();
        let table = Table::new(StyleTable::new());
        let mut light = looping_light(&table, 32, "abc");
        light.spawn();
        light.tick();
        let saved = light.save();

        let mut collection = LightCollection::<TestInstant, _, _, 16, 4>::new(&timer);
        collection
            .add_light(LightId(1), LightStyle::restore(&saved, &table).unwrap())
            .unwrap();
        assert_eq!(collection.next_service(), Some(TestDuration(100)));

        timer.advance(100);
        collection.service_all();
        assert_eq!(table.borrow().get(32), Some("b"));
    }
}
