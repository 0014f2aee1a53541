//! Integration tests for the full round pipeline.
//!
//! Exercises: ModuleManifest → ModuleCatalog → layout parse → corridor
//! assembly → observation loop → tension, end to end.
//!
//! All tests are pure logic — no engine, no rendering.

use rand::rngs::StdRng;
use rand::SeedableRng;

use redlight_logic::builder::{assemble_layout, AssemblyConfig, CorridorChain};
use redlight_logic::catalog::ModuleCatalog;
use redlight_logic::manifest::{ManifestEntry, ModuleManifest};
use redlight_logic::modules::ModuleKind;
use redlight_logic::observation::{
    ExitDecision, ObservationConfig, ObservationDirector, Outcome, Phase,
};
use redlight_logic::tension::{TensionConfig, TensionMeter};

// ── Helpers ────────────────────────────────────────────────────────────

const REFERENCE_LAYOUT: &str = "FFRFFLFFDFE";

fn manifest() -> ModuleManifest {
    let entry = |name: &str, token: char, length: f32| ManifestEntry {
        name: name.to_string(),
        token,
        length,
        width: 2.0,
    };
    ModuleManifest {
        tileset: "test_tileset".to_string(),
        modules: vec![
            entry("straight", 'F', 4.0),
            entry("turn_left", 'L', 4.0),
            entry("turn_right", 'R', 4.0),
            entry("doorway", 'D', 3.0),
            entry("dead_end", 'X', 2.0),
        ],
    }
}

fn build_reference_chain(join_bias: f32) -> CorridorChain {
    let catalog = manifest().to_catalog();
    let config = AssemblyConfig {
        join_bias,
        ..AssemblyConfig::default()
    };
    assemble_layout(REFERENCE_LAYOUT, &catalog, &config).unwrap()
}

fn director_config() -> ObservationConfig {
    ObservationConfig {
        free_move_secs: (1.0, 1.0),
        watching_secs: (1.0, 1.0),
        required_samples: 2,
        ..ObservationConfig::default()
    }
}

// ── Manifest → catalog → assembly ──────────────────────────────────────

#[test]
fn manifest_builds_valid_catalog() {
    let m = manifest();
    assert!(m.validate().is_empty());
    let catalog = m.to_catalog();
    assert!(catalog.validate().is_empty());
    assert_eq!(catalog.len(), 5);
}

#[test]
fn reference_layout_assembles_ten_contiguous_modules() {
    let chain = build_reference_chain(0.0);
    assert_eq!(chain.len(), 10);
    for pair in chain.modules.windows(2) {
        assert!(
            pair[0].exit_pose.approx_eq(&pair[1].placement_pose, 1e-3),
            "seam {} → {}",
            pair[0].index,
            pair[1].index
        );
    }
}

#[test]
fn join_bias_preserves_module_count_and_order() {
    let biased = build_reference_chain(0.05);
    let flush = build_reference_chain(0.0);
    assert_eq!(biased.len(), flush.len());
    for (a, b) in biased.modules.iter().zip(flush.modules.iter()) {
        assert_eq!(a.kind, b.kind);
    }
}

#[test]
fn chain_progress_tracks_the_walk() {
    let chain = build_reference_chain(0.0);
    let start = chain.start_pose().unwrap();
    let end = chain.end_pose().unwrap();
    assert!(chain.progress(start.x, start.z) < 0.05);
    assert!(chain.progress(end.x, end.z) > 0.95);

    // Walking module by module, progress is monotone.
    let mut last = 0.0;
    for m in &chain.modules {
        let p = chain.progress(m.exit_pose.x, m.exit_pose.z);
        assert!(p >= last - 1e-4, "progress regressed at module {}", m.index);
        last = p;
    }
}

#[test]
fn missing_prototype_fails_the_whole_build() {
    let mut m = manifest();
    m.modules.retain(|e| e.token != 'D');
    let catalog = m.to_catalog();
    let result = assemble_layout(REFERENCE_LAYOUT, &catalog, &AssemblyConfig::default());
    assert!(result.is_err(), "doorway missing — build must abort");
}

// ── Full round scenarios ───────────────────────────────────────────────

/// A player who stands still through every watching window and then exits.
#[test]
fn disciplined_player_wins() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut director = ObservationDirector::new(director_config(), &mut rng);
    let mut tension = TensionMeter::new(TensionConfig::default());
    let chain = build_reference_chain(0.03);

    let dt = 0.05;
    let mut elapsed = 0.0;
    while elapsed < 10.0 && !director.is_ended() {
        // Move only while free, freeze while watched.
        let speed = if director.is_watching() { 0.0 } else { 1.4 };
        director.step(dt, speed, &mut rng);
        let progress = (elapsed / 10.0_f32).min(1.0);
        let t = tension.update(dt, progress, director.is_watching());
        assert!((0.0..=1.0).contains(&t));
        elapsed += dt;
    }

    assert!(director.collected_samples() >= 2);
    assert_eq!(director.on_reached_exit(), ExitDecision::Accepted);
    assert_eq!(director.phase(), Phase::Ended(Outcome::Win));
    assert!(chain.total_length > 0.0);
}

/// A player who keeps walking through a watching window fails once.
#[test]
fn restless_player_fails_terminally() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut director = ObservationDirector::new(director_config(), &mut rng);

    let dt = 0.05;
    let mut round_ended = 0;
    for _ in 0..400 {
        for event in director.step(dt, 1.4, &mut rng) {
            if matches!(
                event,
                redlight_logic::observation::PhaseEvent::RoundEnded(Outcome::Fail)
            ) {
                round_ended += 1;
            }
        }
    }

    assert_eq!(round_ended, 1);
    assert_eq!(director.outcome(), Some(Outcome::Fail));
    assert!(matches!(
        director.on_reached_exit(),
        ExitDecision::Rejected { .. }
    ));
}

/// Exit attempts before enough samples are banked bounce the player back.
#[test]
fn early_exit_attempt_is_rejected_and_round_continues() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut director = ObservationDirector::new(director_config(), &mut rng);

    // Survive exactly one watching window.
    director.step(1.0, 0.0, &mut rng); // FreeMove expires
    director.step(1.0, 0.0, &mut rng); // Watching survived
    assert_eq!(director.collected_samples(), 1);

    assert_eq!(
        director.on_reached_exit(),
        ExitDecision::Rejected {
            collected: 1,
            required: 2
        }
    );
    assert!(!director.is_ended(), "rejection must not end the round");

    // Survive another window; now the gate opens.
    director.step(1.0, 0.0, &mut rng);
    director.step(1.0, 0.0, &mut rng);
    assert_eq!(director.on_reached_exit(), ExitDecision::Accepted);
}

/// Tension keeps rising toward the watching floor during a long watch and
/// never leaves the unit range, even with hostile inputs.
#[test]
fn tension_stays_bounded_across_a_round() {
    let mut rng = StdRng::seed_from_u64(47);
    let mut director = ObservationDirector::new(director_config(), &mut rng);
    let mut tension = TensionMeter::new(TensionConfig::default());

    for i in 0..1000 {
        director.step(0.02, 0.0, &mut rng);
        // Deliberately hostile progress values.
        let progress = (i as f32 / 100.0) - 2.0;
        let t = tension.update(0.02, progress, director.is_watching());
        assert!((0.0..=1.0).contains(&t), "tension {t} escaped [0,1]");
    }
}
