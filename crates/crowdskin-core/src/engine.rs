//! The tree growth engine.
//!
//! Owns the one [`GrowthState`] of a user, runs the add-reflection state
//! machine (`Idle -> Placing -> Committing -> Idle`), schedules the delayed
//! phases on its own timeline, persists after every mutation and pushes
//! [`GrowthEvent`]s to subscribers.
//!
//! Everything runs on the caller's thread. Delayed work (leaf settling,
//! mushroom maturation) is queued with a due time and executed by
//! [`TreeGrowthEngine::run_due`], which the host calls from its event loop.

use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::constants::STORAGE_KEY;
use crate::events::{GrowthEvent, GrowthPhase};
use crate::feedback::FeedbackCue;
use crate::models::{
    gentle_question, EmotionalTrend, GrowthState, Leaf, NewReflection, QuietThought,
    SeasonalEffects,
};
use crate::placement;
use crate::store::{StateStorage, StorageError};
use chrono::{DateTime, Duration, FixedOffset};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    CommitLeaf,
    MatureThought(String),
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    due: DateTime<FixedOffset>,
    /// Insertion order, breaks ties between tasks due at the same instant
    seq: u64,
    task: Task,
}

/// Everything a view needs to render the tree in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub growth_state: GrowthState,
    pub phase: GrowthPhase,
    pub is_growing: bool,
    pub leaf_morphing: bool,
    pub silent_mode: bool,
    pub current_trend: Option<EmotionalTrend>,
    pub seasonal_effects: SeasonalEffects,
    pub queued_reflections: usize,
}

pub struct TreeGrowthEngine {
    config: CoreConfig,
    state: GrowthState,
    storage: Box<dyn StateStorage>,
    cue: Box<dyn FeedbackCue>,
    clock: Box<dyn Clock>,
    rng: StdRng,

    phase: GrowthPhase,
    /// Leaf placed but not yet committed
    settling_leaf: Option<Leaf>,
    /// Reflections submitted while another leaf was still growing
    queued: VecDeque<NewReflection>,
    scheduled: Vec<ScheduledTask>,
    next_seq: u64,

    silent_mode: bool,
    current_trend: Option<EmotionalTrend>,
    subscribers: Vec<Sender<GrowthEvent>>,
}

impl TreeGrowthEngine {
    /// Load the persisted state (or start a fresh tree) and get ready.
    ///
    /// A missing, unreadable or corrupt blob silently yields the default
    /// state. Quiet thoughts saved before they matured are scheduled again.
    pub fn initialize(
        config: CoreConfig,
        storage: Box<dyn StateStorage>,
        cue: Box<dyn FeedbackCue>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let state = Self::load_state(storage.as_ref());

        let mut engine = Self {
            config,
            state,
            storage,
            cue,
            clock,
            rng: StdRng::from_entropy(),
            phase: GrowthPhase::Idle,
            settling_leaf: None,
            queued: VecDeque::new(),
            scheduled: Vec::new(),
            next_seq: 0,
            silent_mode: false,
            current_trend: None,
            subscribers: Vec::new(),
        };

        let pending: Vec<(String, DateTime<FixedOffset>)> = engine
            .state
            .quiet_thoughts()
            .iter()
            .filter(|t| !t.has_grown)
            .map(|t| (t.id.clone(), t.date))
            .collect();
        let maturation_delay = engine.config.maturation_delay();
        for (id, date) in pending {
            engine.schedule(date + maturation_delay, Task::MatureThought(id));
        }

        engine.current_trend = engine.analyze_trend();

        info!(
            total_reflections = engine.state.total_reflections(),
            quiet_thoughts = engine.state.quiet_thoughts().len(),
            "Tree growth engine ready"
        );
        engine
    }

    fn load_state(storage: &dyn StateStorage) -> GrowthState {
        let blob = match storage.load(STORAGE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No saved tree, starting fresh");
                return GrowthState::default();
            }
            Err(e) => {
                warn!("Could not read saved tree, starting fresh: {}", e);
                return GrowthState::default();
            }
        };

        match serde_json::from_str(&blob) {
            Ok(state) => state,
            Err(e) => {
                warn!("Saved tree is unreadable, starting fresh: {}", e);
                GrowthState::default()
            }
        }
    }

    /// Use a seeded generator for placement jitter (reproducible layouts).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Read access =====

    pub fn state(&self) -> &GrowthState {
        &self.state
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn phase(&self) -> GrowthPhase {
        self.phase
    }

    /// A reflection is somewhere between placement and commit.
    pub fn is_growing(&self) -> bool {
        self.phase != GrowthPhase::Idle
    }

    /// The new leaf is still finding its place.
    pub fn leaf_morphing(&self) -> bool {
        self.phase == GrowthPhase::Placing
    }

    pub fn silent_mode(&self) -> bool {
        self.silent_mode
    }

    /// Trend as of the last state change.
    pub fn current_trend(&self) -> Option<&EmotionalTrend> {
        self.current_trend.as_ref()
    }

    pub fn queued_reflections(&self) -> usize {
        self.queued.len()
    }

    pub fn seasonal_effects(&self) -> SeasonalEffects {
        SeasonalEffects::derive(&self.state, self.silent_mode)
    }

    /// Supportive question for the reflection loop, phrased for right now.
    pub fn gentle_question(&self) -> String {
        gentle_question(self.current_trend.as_ref(), self.clock.now())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            growth_state: self.state.clone(),
            phase: self.phase,
            is_growing: self.is_growing(),
            leaf_morphing: self.leaf_morphing(),
            silent_mode: self.silent_mode,
            current_trend: self.current_trend.clone(),
            seasonal_effects: self.seasonal_effects(),
            queued_reflections: self.queued.len(),
        }
    }

    /// Receive every event from now on. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<GrowthEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Analyse the recent history. `None` until the tree has three leaves.
    pub fn analyze_trend(&self) -> Option<EmotionalTrend> {
        EmotionalTrend::analyze(self.state.leaves())
    }

    // ===== Mutations =====

    /// Grow a leaf for this reflection.
    ///
    /// The leaf is placed immediately and the engine enters the placing
    /// phase; the commit happens once the settle delay has elapsed (see
    /// [`run_due`](Self::run_due)), or right away when the delay is zero.
    /// A reflection submitted while another one is still growing waits in a
    /// queue and is placed only after the earlier commit, so every leaf sees
    /// an up-to-date count.
    pub fn add_reflection(&mut self, mut reflection: NewReflection) {
        // Stamp on submission so waiting in the queue cannot shift the time of day
        if reflection.date.is_none() {
            reflection.date = Some(self.clock.now());
        }
        if self.is_growing() {
            debug!(
                queued = self.queued.len() + 1,
                "Leaf still growing, queueing reflection"
            );
            self.queued.push_back(reflection);
            return;
        }
        self.start_growth(reflection);
    }

    fn start_growth(&mut self, reflection: NewReflection) {
        let now = self.clock.now();
        let reflection = reflection.into_reflection(now);

        let leaf_count = self.state.total_reflections();
        let position = placement::place_leaf(leaf_count, &reflection.mood, &mut self.rng);
        debug!(
            mood = %reflection.mood,
            x = position.x,
            y = position.y,
            growth_day = leaf_count + 1,
            "Placed leaf"
        );

        self.settling_leaf = Some(Leaf::grow(reflection, position, leaf_count + 1));
        self.set_phase(GrowthPhase::Placing);

        let settle_delay = self.config.settle_delay();
        if settle_delay <= Duration::zero() {
            self.commit_settling_leaf();
        } else {
            self.schedule(now + settle_delay, Task::CommitLeaf);
        }
    }

    fn commit_settling_leaf(&mut self) {
        let Some(leaf) = self.settling_leaf.take() else {
            return;
        };
        let mood = leaf.reflection.mood.clone();
        let time_of_day = leaf.reflection.time_of_day();

        self.set_phase(GrowthPhase::Committing);
        self.state.commit_leaf(leaf);
        self.persist();
        self.publish_state_change();
        self.set_phase(GrowthPhase::Idle);

        if let Err(e) = self.cue.growth_cue(&mood, time_of_day) {
            debug!("Growth cue unavailable: {}", e);
        }

        if let Some(next) = self.queued.pop_front() {
            self.start_growth(next);
        }
    }

    /// Let a thought sink into the soil. The words are not kept; the tree
    /// simply calms back to its default tone.
    pub fn add_whisper(&mut self, text: &str) {
        debug!(chars = text.chars().count(), "Whisper released");
        self.state.reset_tone();
        self.persist();
        self.publish_state_change();

        if let Err(e) = self.cue.soil_cue() {
            debug!("Soil cue unavailable: {}", e);
        }
    }

    /// Drop a quiet thought at the foot of the tree. After the maturation
    /// delay it turns into a mushroom. Returns the thought's id.
    pub fn add_quiet_thought(&mut self, text: &str) -> String {
        let now = self.clock.now();
        let thought = QuietThought::new(text.to_string(), now);
        let id = thought.id.clone();

        self.state.push_quiet_thought(thought);
        self.persist();
        self.publish_state_change();

        self.schedule(
            now + self.config.maturation_delay(),
            Task::MatureThought(id.clone()),
        );
        id
    }

    fn mature_thought(&mut self, id: &str) {
        if !self.state.mature_quiet_thought(id) {
            return;
        }
        let mushroom_count = self.state.mushroom_count();
        debug!(thought_id = id, mushroom_count, "Quiet thought grew into a mushroom");

        self.persist();
        self.emit(GrowthEvent::QuietThoughtMatured {
            thought_id: id.to_string(),
            mushroom_count,
        });
        self.publish_state_change();
    }

    pub fn toggle_quiet_bloom_mode(&mut self) -> bool {
        let enabled = self.state.toggle_quiet_bloom_mode();
        self.persist();
        self.publish_state_change();
        enabled
    }

    /// Display-only; not persisted.
    pub fn toggle_silent_mode(&mut self) -> bool {
        self.silent_mode = !self.silent_mode;
        self.emit(GrowthEvent::SilentModeChanged(self.silent_mode));
        self.silent_mode
    }

    // ===== Timeline =====

    /// Run every scheduled phase whose due time has passed, oldest first.
    /// Returns how many ran.
    pub fn run_due(&mut self) -> usize {
        let mut ran = 0;
        loop {
            let now = self.clock.now();
            let next = self
                .scheduled
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= now)
                .min_by_key(|(_, t)| (t.due, t.seq))
                .map(|(index, _)| index);

            let Some(index) = next else {
                break;
            };
            let scheduled = self.scheduled.swap_remove(index);
            match scheduled.task {
                Task::CommitLeaf => self.commit_settling_leaf(),
                Task::MatureThought(id) => self.mature_thought(&id),
            }
            ran += 1;
        }
        ran
    }

    /// When the next scheduled phase is due, for hosts that sleep between ticks.
    pub fn next_due(&self) -> Option<DateTime<FixedOffset>> {
        self.scheduled.iter().map(|t| t.due).min()
    }

    fn schedule(&mut self, due: DateTime<FixedOffset>, task: Task) {
        self.scheduled.push(ScheduledTask {
            due,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    // ===== Plumbing =====

    fn set_phase(&mut self, phase: GrowthPhase) {
        self.phase = phase;
        self.emit(GrowthEvent::PhaseChanged(phase));
    }

    fn publish_state_change(&mut self) {
        self.current_trend = self.analyze_trend();
        self.emit(GrowthEvent::StateChanged {
            total_reflections: self.state.total_reflections(),
            trend: self.current_trend.clone(),
        });
    }

    fn emit(&mut self, event: GrowthEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Write-through save. Failures are logged; memory stays authoritative.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!("Failed to save tree state: {}", e);
        }
    }

    fn try_persist(&mut self) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&self.state)?;
        self.storage.save(STORAGE_KEY, &blob)
    }
}
