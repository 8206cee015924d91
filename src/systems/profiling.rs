use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bevy_ecs::system::IntoSystem;
use bevy_ecs::{resource::Resource, system::System};
use circular_buffer::CircularBuffer;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// The number of systems that can be profiled.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// The number of durations kept per system.
const TIMING_WINDOW_SIZE: usize = 30;

/// Recent run durations of a single system.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
}

impl TimingBuffer {
    pub fn add_timing(&mut self, duration: Duration) {
        self.buffer.push_back(duration);
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    pub fn average(&self) -> Duration {
        if self.buffer.is_empty() {
            return Duration::ZERO;
        }
        self.buffer.iter().sum::<Duration>() / self.buffer.len() as u32
    }
}

/// Counts completed frames (one update phase each).
#[derive(Resource, Debug, Default)]
pub struct Timing {
    current_tick: AtomicU64,
}

impl Timing {
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    /// Increments the tick counter and returns the new value
    pub fn increment_tick(&self) -> u64 {
        self.current_tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    PlayerMotion,
    Physics,
    Contacts,
    Collision,
    Spawn,
    Retire,
    Camera,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

#[derive(Resource, Debug)]
pub struct SystemTimings {
    timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl SystemTimings {
    pub fn add_timing(&self, id: SystemId, duration: Duration) {
        if let Some(buffer) = self.timings.get(&id) {
            buffer.lock().add_timing(duration);
        }
    }

    pub fn average(&self, id: SystemId) -> Duration {
        self.timings
            .get(&id)
            .map(|buffer| buffer.lock().average())
            .unwrap_or(Duration::ZERO)
    }

    /// The most expensive systems of the latest frame, slowest first.
    pub fn slowest_systems(&self) -> SmallVec<[(SystemId, Duration); 3]> {
        let mut recent: SmallVec<[(SystemId, Duration); MAX_SYSTEMS]> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .filter_map(|id| self.timings.get(&id).map(|b| (id, b.lock().most_recent())))
            .collect();
        recent.sort_by(|a, b| b.1.cmp(&a.1));
        recent.into_iter().take(3).collect()
    }
}

/// Wraps a system so each run is timed into [`SystemTimings`], when that resource exists.
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut bevy_ecs::world::World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut is_initialized = false;
    move |world: &mut bevy_ecs::world::World| {
        if !is_initialized {
            system.initialize(world);
            is_initialized = true;
        }

        let start = std::time::Instant::now();
        system.run((), world);
        let duration = start.elapsed();

        if let Some(timings) = world.get_resource::<SystemTimings>() {
            timings.add_timing(id, duration);
        }
    }
}
