use chrono::{DateTime, Duration};
use crowdskin_core::constants::{canopy, STORAGE_KEY};
use crowdskin_core::{
    CoreConfig, GrowthState, JsonFileStorage, ManualClock, MemoryStorage, Mood, MoodTone,
    NewReflection, NoopCue, TreeGrowthEngine,
};
use tempfile::tempdir;

fn clock() -> ManualClock {
    ManualClock::new(DateTime::parse_from_rfc3339("2024-01-15T20:00:00+01:00").unwrap())
}

/// Engine that commits leaves immediately.
fn instant_engine(storage: MemoryStorage, clock: &ManualClock) -> TreeGrowthEngine {
    let config = CoreConfig {
        settle_delay_ms: 0,
        ..CoreConfig::default()
    };
    TreeGrowthEngine::initialize(
        config,
        Box::new(storage),
        Box::new(NoopCue),
        Box::new(clock.clone()),
    )
    .with_seed(2024)
}

fn reflect(engine: &mut TreeGrowthEngine, mood: &str) {
    engine.add_reflection(NewReflection::new(mood, "diamond", "blue", 6));
}

#[test]
fn test_count_matches_leaves_after_every_add() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    for n in 1..=40u32 {
        reflect(&mut engine, "hopeful");
        assert_eq!(engine.state().total_reflections(), n);
        assert_eq!(engine.state().leaves().len(), n as usize);
    }
}

#[test]
fn test_thirty_peaceful_reflections_bring_flowers() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    for _ in 0..29 {
        reflect(&mut engine, "peaceful");
    }
    assert!(!engine.state().has_flowers());

    reflect(&mut engine, "peaceful");
    let state = engine.state();
    assert!(state.has_flowers());
    assert!(!state.has_bird());
    assert!(!state.has_lanterns());
    assert!(!state.twilight_mode());
    assert_eq!(state.branch_count(), 3);
}

#[test]
fn test_milestones_follow_the_counter() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    for n in 1..=150u32 {
        reflect(&mut engine, Mood::KNOWN[n as usize % 8].as_str());
        let state = engine.state();
        assert_eq!(state.has_flowers(), n >= 30, "flowers at {}", n);
        assert_eq!(state.has_bird(), n >= 50, "bird at {}", n);
        assert_eq!(state.has_lanterns(), n >= 100, "lanterns at {}", n);
        assert_eq!(state.twilight_mode(), n >= 150, "twilight at {}", n);
        assert!(state.emotional_pattern().len() <= 10);
    }
}

#[test]
fn test_every_leaf_lands_inside_the_canopy() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    for n in 0..200 {
        let mood = if n % 9 == 0 { "numb" } else { Mood::KNOWN[n % 8].as_str() };
        reflect(&mut engine, mood);
    }

    for leaf in engine.state().leaves() {
        let p = leaf.position;
        assert!(p.x >= canopy::MIN_X && p.x <= canopy::MAX_X, "x={}", p.x);
        assert!(p.y >= canopy::MIN_Y && p.y <= canopy::MAX_Y, "y={}", p.y);
        assert!(p.depth >= 0.0 && p.depth < canopy::MAX_DEPTH);
    }
}

#[test]
fn test_sharp_week_asks_for_gentleness() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    for mood in [
        "anxious",
        "overwhelmed",
        "frustrated",
        "heavy",
        "heavy",
        "heavy",
        "heavy",
    ] {
        reflect(&mut engine, mood);
    }

    let trend = engine.analyze_trend().unwrap();
    assert_eq!(trend.mood_streak, 7);
    assert!(trend.needs_gentle_reminder);
    assert_eq!(trend.dominant_mood, Mood::Heavy);
    assert!(trend.last_soft_day.is_none());
}

#[test]
fn test_trend_needs_three_leaves() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    assert!(engine.analyze_trend().is_none());
    reflect(&mut engine, "gentle");
    reflect(&mut engine, "gentle");
    assert!(engine.analyze_trend().is_none());
    reflect(&mut engine, "gentle");
    assert!(engine.analyze_trend().is_some());
}

#[test]
fn test_whisper_leaves_the_tree_untouched() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);
    reflect(&mut engine, "anxious");
    reflect(&mut engine, "frustrated");
    let before = engine.state().clone();

    engine.add_whisper("test");

    let after = engine.state();
    assert_eq!(after.mood_tone(), MoodTone::Sage);
    assert_eq!(after.total_reflections(), before.total_reflections());
    assert_eq!(after.leaves(), before.leaves());
}

#[test]
fn test_mushrooms_match_grown_thoughts() {
    let clock = clock();
    let mut engine = instant_engine(MemoryStorage::new(), &clock);

    engine.add_quiet_thought("one");
    clock.advance(Duration::seconds(1));
    engine.add_quiet_thought("two");
    assert_eq!(engine.state().mushroom_count(), 0);

    clock.advance(Duration::seconds(2));
    engine.run_due();
    assert_eq!(engine.state().mushroom_count(), 1);

    clock.advance(Duration::seconds(1));
    engine.run_due();
    let state = engine.state();
    assert_eq!(state.mushroom_count(), 2);
    assert_eq!(
        state.mushroom_count() as usize,
        state.quiet_thoughts().iter().filter(|t| t.has_grown).count()
    );
}

#[test]
fn test_state_survives_restart_on_disk() {
    let dir = tempdir().unwrap();
    let clock = clock();
    let config = CoreConfig::new(dir.path());

    let mut engine = TreeGrowthEngine::initialize(
        config.clone(),
        Box::new(JsonFileStorage::new(&config.data_dir)),
        Box::new(NoopCue),
        Box::new(clock.clone()),
    );
    for mood in ["gentle", "heavy", "hopeful", "disconnected"] {
        engine.add_reflection(NewReflection::new(mood, "star", "lavender", 9).with_notes("today"));
        clock.advance(config.settle_delay());
        engine.run_due();
    }
    engine.add_quiet_thought("let go");
    engine.toggle_quiet_bloom_mode();
    let expected = engine.state().clone();
    drop(engine);

    let reloaded = TreeGrowthEngine::initialize(
        config.clone(),
        Box::new(JsonFileStorage::new(&config.data_dir)),
        Box::new(NoopCue),
        Box::new(clock.clone()),
    );
    assert_eq!(reloaded.state(), &expected);
    assert!(reloaded.state().leaves().iter().all(|l| l.is_glowing));
    assert_eq!(reloaded.current_trend(), reloaded.analyze_trend().as_ref());
}

#[test]
fn test_round_trip_through_serialized_blob() {
    let clock = clock();
    let storage = MemoryStorage::new();
    let mut engine = instant_engine(storage.clone(), &clock);
    for mood in ["peaceful", "anxious", "gentle", "wistful"] {
        reflect(&mut engine, mood);
    }
    engine.add_quiet_thought("quiet");

    let blob = storage.get(STORAGE_KEY).unwrap();
    let decoded: GrowthState = serde_json::from_str(&blob).unwrap();
    assert_eq!(&decoded, engine.state());

    let again: GrowthState = serde_json::from_str(&serde_json::to_string(&decoded).unwrap()).unwrap();
    assert_eq!(again, decoded);
}

#[test]
fn test_older_blob_backfills_new_fields() {
    let clock = clock();
    let old_blob = r#"{
        "totalReflections": 1,
        "leaves": [{
            "id": "leaf-1700000000000",
            "reflection": {
                "id": "1700000000000",
                "date": "2023-11-14T08:13:20.000Z",
                "mood": "hopeful",
                "shape": "circle",
                "color": "green",
                "intensity": 8
            },
            "shape": "circle",
            "color": "green",
            "position": { "x": 70, "y": 30 },
            "growthDay": 1
        }],
        "moodTone": "green",
        "hasFlowers": false,
        "hasBird": false,
        "hasLanterns": false,
        "lastReflectionDate": "2023-11-14T08:13:20.000Z"
    }"#;
    let storage = MemoryStorage::with_blob(STORAGE_KEY, old_blob);
    let engine = instant_engine(storage, &clock);
    let state = engine.state();

    assert_eq!(state.total_reflections(), 1);
    assert_eq!(state.mood_tone(), MoodTone::Green);
    assert_eq!(state.leaves()[0].position.depth, 0.0);
    // Intensity 8 glows even though the blob never stored the flag
    assert!(state.leaves()[0].is_glowing);
    assert!(state.quiet_thoughts().is_empty());
    assert!(state.emotional_pattern().is_empty());
    assert!(!state.is_quiet_bloom_mode());
    assert_eq!(state.mushroom_count(), 0);
    assert!(state.last_reflection_date().is_some());
}

fn saved_leaf(n: usize) -> serde_json::Value {
    serde_json::json!({
        "id": format!("leaf-{}", n),
        "reflection": {
            "id": n.to_string(),
            "date": "2023-11-14T08:13:20.000Z",
            "mood": "peaceful",
            "shape": "oval",
            "color": "sage",
            "intensity": 5
        },
        "shape": "oval",
        "color": "sage",
        "position": { "x": 50, "y": 30 },
        "growthDay": n
    })
}

fn saved_tree(leaves: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "totalReflections": leaves.len(),
        "leaves": leaves,
        "moodTone": "sage"
    })
    .to_string()
}

#[test]
fn test_leaf_missing_a_field_keeps_the_whole_tree() {
    let clock = clock();
    let mut leaves: Vec<serde_json::Value> = (1..=10).map(saved_leaf).collect();
    if let Some(reflection) = leaves[2]["reflection"].as_object_mut() {
        reflection.remove("color");
    }
    let storage = MemoryStorage::with_blob(STORAGE_KEY, &saved_tree(leaves));

    let mut engine = instant_engine(storage.clone(), &clock);
    assert_eq!(engine.state().leaves().len(), 10);

    engine.add_whisper("hi");
    let saved: GrowthState = serde_json::from_str(&storage.get(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(saved.total_reflections(), 10);
    assert_eq!(saved.leaves().len(), 10);
}

#[test]
fn test_corrupt_leaf_is_dropped_and_the_rest_survive_a_save() {
    let clock = clock();
    let mut leaves: Vec<serde_json::Value> = (1..=10).map(saved_leaf).collect();
    leaves[3]["reflection"]["date"] = serde_json::json!(12);
    let storage = MemoryStorage::with_blob(STORAGE_KEY, &saved_tree(leaves));

    let mut engine = instant_engine(storage.clone(), &clock);
    assert_eq!(engine.state().leaves().len(), 9);

    reflect(&mut engine, "hopeful");
    let saved: GrowthState = serde_json::from_str(&storage.get(STORAGE_KEY).unwrap()).unwrap();
    let ids: Vec<&str> = saved.leaves().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(saved.leaves().len(), 10);
    assert!(!ids.contains(&"leaf-4"));
    for n in [1, 2, 3, 5, 6, 7, 8, 9, 10] {
        assert!(ids.contains(&format!("leaf-{}", n).as_str()), "leaf-{} lost", n);
    }
}
