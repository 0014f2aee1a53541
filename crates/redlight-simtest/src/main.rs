//! Redlight Headless Round Harness
//!
//! Validates corridor assembly and round-direction logic without an engine
//! host. Runs entirely in-process — no rendering, no audio, no scene graph.
//!
//! Usage:
//!   cargo run -p redlight-simtest
//!   cargo run -p redlight-simtest -- --verbose

use rand::rngs::StdRng;
use rand::SeedableRng;

use redlight_logic::builder::{assemble_layout, AssemblyConfig, AssemblyError};
use redlight_logic::catalog::ModuleCatalog;
use redlight_logic::layout::{parse_layout, LayoutError};
use redlight_logic::manifest::ModuleManifest;
use redlight_logic::modules::ModuleKind;
use redlight_logic::observation::{
    ExitDecision, ObservationConfig, ObservationDirector, Outcome, Phase, PhaseEvent,
};
use redlight_logic::tension::{stinger_interval, vignette_opacity, TensionConfig, TensionMeter};
use redlight_logic::validation::has_errors;

// ── Module manifest (same JSON the host loads) ──────────────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/module_manifest.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Redlight Round Harness ===\n");

    let mut results = Vec::new();

    // 1. Module manifest validation
    results.extend(validate_module_manifest(verbose));

    // 2. Layout parsing sweep
    results.extend(validate_layout_parsing(verbose));

    // 3. Assembly geometry
    results.extend(validate_assembly(verbose));

    // 4. Observation director
    results.extend(validate_observation(verbose));

    // 5. Tension curves
    results.extend(validate_tension(verbose));

    // 6. Scripted full round
    results.extend(validate_full_round(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Module Manifest ──────────────────────────────────────────────────

fn validate_module_manifest(verbose: bool) -> Vec<TestResult> {
    println!("--- Module Manifest ---");
    let mut results = Vec::new();

    let manifest: ModuleManifest = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "manifest_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let findings = manifest.validate();
    results.push(TestResult {
        name: "manifest_validates".into(),
        passed: !has_errors(&findings),
        detail: if findings.is_empty() {
            format!("{} prototypes, no findings", manifest.modules.len())
        } else {
            format!("{} findings: {:?}", findings.len(), findings)
        },
    });

    // Every module kind is covered
    let all_kinds = ModuleKind::all()
        .iter()
        .all(|k| manifest.modules.iter().any(|e| e.token == k.token()));
    results.push(TestResult {
        name: "manifest_covers_all_kinds".into(),
        passed: all_kinds,
        detail: "every layout token has a prototype".into(),
    });

    // Catalog conversion produces a valid catalog
    let catalog = manifest.to_catalog();
    results.push(TestResult {
        name: "manifest_catalog_valid".into(),
        passed: catalog.validate().is_empty(),
        detail: "converted catalog validates clean".into(),
    });

    if verbose {
        println!("  Tileset '{}' prototypes:", manifest.tileset);
        for e in &manifest.modules {
            println!(
                "    {} ('{}'): {:.1} x {:.1} m",
                e.name, e.token, e.length, e.width
            );
        }
    }

    results
}

// ── 2. Layout Parsing ───────────────────────────────────────────────────

fn validate_layout_parsing(_verbose: bool) -> Vec<TestResult> {
    println!("--- Layout Parsing ---");
    let mut results = Vec::new();

    // Reference layout: ten commands before the terminator.
    let parsed = parse_layout("FFRFFLFFDFE");
    results.push(TestResult {
        name: "layout_reference_string".into(),
        passed: matches!(&parsed, Ok(kinds) if kinds.len() == 10),
        detail: format!("FFRFFLFFDFE → {:?} commands", parsed.map(|k| k.len())),
    });

    // Terminator stops parsing mid-string
    let truncated = parse_layout("FFEFF");
    results.push(TestResult {
        name: "layout_terminator_stops".into(),
        passed: matches!(&truncated, Ok(kinds) if kinds.len() == 2),
        detail: "commands after 'E' are ignored".into(),
    });

    // Whitespace tolerated
    let spaced = parse_layout("F F\nR E");
    results.push(TestResult {
        name: "layout_whitespace_skipped".into(),
        passed: matches!(&spaced, Ok(kinds) if kinds.len() == 3),
        detail: "whitespace between tokens is skipped".into(),
    });

    // Unknown token is fatal with its position
    let bad = parse_layout("FF?F");
    results.push(TestResult {
        name: "layout_unknown_token_fatal".into(),
        passed: matches!(
            &bad,
            Err(LayoutError::UnknownToken {
                index: 2,
                token: '?'
            })
        ),
        detail: format!("'?' at index 2 → {:?}", bad.err()),
    });

    // Every token maps to its kind and back
    let round_trip = ModuleKind::all()
        .iter()
        .all(|k| ModuleKind::from_token(k.token()) == Some(*k));
    results.push(TestResult {
        name: "layout_token_round_trip".into(),
        passed: round_trip,
        detail: "token/kind mapping is bijective".into(),
    });

    results
}

// ── 3. Assembly Geometry ────────────────────────────────────────────────

fn validate_assembly(verbose: bool) -> Vec<TestResult> {
    println!("--- Assembly Geometry ---");
    let mut results = Vec::new();

    let catalog = ModuleCatalog::standard();
    let config = AssemblyConfig {
        join_bias: 0.0,
        ..AssemblyConfig::default()
    };

    // Reference layout assembles with coincident seams
    match assemble_layout("FFRFFLFFDFE", &catalog, &config) {
        Ok(chain) => {
            results.push(TestResult {
                name: "assembly_reference_count".into(),
                passed: chain.len() == 10,
                detail: format!("{} modules placed", chain.len()),
            });
            let seams_ok = chain
                .modules
                .windows(2)
                .all(|p| p[0].exit_pose.approx_eq(&p[1].placement_pose, config.snap_tolerance));
            results.push(TestResult {
                name: "assembly_seams_coincide".into(),
                passed: seams_ok,
                detail: "every exit socket meets the next entry socket".into(),
            });
            if verbose {
                println!("  Reference chain poses:");
                for m in &chain.modules {
                    println!(
                        "    [{}] {:?} at ({:.2}, {:.2}) yaw {:.2}",
                        m.index, m.kind, m.pose.x, m.pose.z, m.pose.yaw
                    );
                }
            }
        }
        Err(e) => {
            results.push(TestResult {
                name: "assembly_reference_count".into(),
                passed: false,
                detail: format!("assembly failed: {}", e),
            });
        }
    }

    // Dead end truncates the chain
    let truncated = assemble_layout("FFXFFF", &catalog, &config);
    results.push(TestResult {
        name: "assembly_dead_end_stops".into(),
        passed: matches!(&truncated, Ok(chain) if chain.len() == 3),
        detail: "placement stops after the dead-end module".into(),
    });

    // Missing prototype aborts the whole build
    let mut partial = ModuleCatalog::empty();
    for kind in ModuleKind::all() {
        if kind != ModuleKind::Doorway {
            if let Some(spec) = catalog.get(kind) {
                partial.register(*spec);
            }
        }
    }
    let aborted = assemble_layout("FFDFF", &partial, &config);
    results.push(TestResult {
        name: "assembly_missing_prototype_fatal".into(),
        passed: matches!(
            aborted,
            Err(AssemblyError::MissingPrototype(ModuleKind::Doorway))
        ),
        detail: "no partial corridor on missing prototype".into(),
    });

    // Join bias keeps count and progress behavior
    let biased_config = AssemblyConfig {
        join_bias: 0.05,
        ..AssemblyConfig::default()
    };
    match assemble_layout("FFFFF", &catalog, &biased_config) {
        Ok(chain) => {
            let end = chain.end_pose();
            let progress_end = end.map(|p| chain.progress(p.x, p.z)).unwrap_or(0.0);
            results.push(TestResult {
                name: "assembly_join_bias_progress".into(),
                passed: chain.len() == 5 && progress_end > 0.99,
                detail: format!(
                    "5 biased modules, end progress {:.3}",
                    progress_end
                ),
            });
        }
        Err(e) => {
            results.push(TestResult {
                name: "assembly_join_bias_progress".into(),
                passed: false,
                detail: format!("assembly failed: {}", e),
            });
        }
    }

    // Opposite turns cancel heading
    let heading = assemble_layout("FLRF", &catalog, &config)
        .ok()
        .and_then(|c| c.end_pose())
        .map(|p| p.yaw.abs())
        .unwrap_or(f32::MAX);
    results.push(TestResult {
        name: "assembly_turns_cancel".into(),
        passed: heading < 1e-3,
        detail: format!("FLRF end yaw {:.4}", heading),
    });

    results
}

// ── 4. Observation Director ─────────────────────────────────────────────

fn validate_observation(verbose: bool) -> Vec<TestResult> {
    println!("--- Observation Director ---");
    let mut results = Vec::new();

    let config = ObservationConfig {
        free_move_secs: (2.0, 2.0),
        watching_secs: (1.0, 1.0),
        required_samples: 2,
        ..ObservationConfig::default()
    };

    // Still player survives many cycles
    let mut rng = StdRng::seed_from_u64(42);
    let mut director = ObservationDirector::new(config, &mut rng);
    for _ in 0..600 {
        director.step(0.02, 0.0, &mut rng);
    }
    results.push(TestResult {
        name: "observation_still_survives".into(),
        passed: !director.is_ended() && director.collected_samples() >= 2,
        detail: format!(
            "{} samples banked over 12 s, phase {:?}",
            director.collected_samples(),
            director.phase()
        ),
    });

    // Exit accepts once enough samples are banked
    let decision = director.on_reached_exit();
    results.push(TestResult {
        name: "observation_exit_accepts".into(),
        passed: decision == ExitDecision::Accepted
            && director.phase() == Phase::Ended(Outcome::Win),
        detail: format!("{:?}", decision),
    });

    // Moving during a watching window fails exactly once
    let mut rng = StdRng::seed_from_u64(42);
    let mut director = ObservationDirector::new(config, &mut rng);
    let mut fails = 0;
    for _ in 0..600 {
        for event in director.step(0.02, 2.0, &mut rng) {
            if matches!(event, PhaseEvent::RoundEnded(Outcome::Fail)) {
                fails += 1;
            }
        }
    }
    results.push(TestResult {
        name: "observation_motion_fails_once".into(),
        passed: fails == 1 && director.phase() == Phase::Ended(Outcome::Fail),
        detail: format!("{} failure events emitted", fails),
    });

    // Duration sampling stays inside the configured ranges
    let ranged = ObservationConfig {
        free_move_secs: (4.0, 8.0),
        watching_secs: (3.0, 6.0),
        ..config
    };
    let mut rng = StdRng::seed_from_u64(7);
    let mut in_range = true;
    for _ in 0..50 {
        let d = ObservationDirector::new(ranged, &mut rng);
        let t = d.time_remaining();
        if !(4.0..=8.0).contains(&t) {
            in_range = false;
        }
    }
    results.push(TestResult {
        name: "observation_durations_in_range".into(),
        passed: in_range,
        detail: "50 sampled free-move durations within (4, 8) s".into(),
    });

    // Config validation catches inverted ranges
    let bad = ObservationConfig {
        watching_secs: (6.0, 3.0),
        ..ObservationConfig::default()
    };
    results.push(TestResult {
        name: "observation_config_validation".into(),
        passed: has_errors(&bad.validate()) && ObservationConfig::default().validate().is_empty(),
        detail: "inverted range rejected, defaults clean".into(),
    });

    if verbose {
        let mut rng = StdRng::seed_from_u64(1);
        let mut director = ObservationDirector::new(ranged, &mut rng);
        println!("  Phase trace (still player, 30 s):");
        let mut t = 0.0f32;
        for _ in 0..1500 {
            for event in director.step(0.02, 0.0, &mut rng) {
                if let PhaseEvent::PhaseChanged(phase) = event {
                    println!("    t={:5.2}s → {:?}", t, phase);
                }
            }
            t += 0.02;
        }
    }

    results
}

// ── 5. Tension Curves ───────────────────────────────────────────────────

fn validate_tension(verbose: bool) -> Vec<TestResult> {
    println!("--- Tension Curves ---");
    let mut results = Vec::new();

    let config = TensionConfig::default();

    // Watching pulls the value up to the floor
    let mut meter = TensionMeter::new(config);
    for _ in 0..200 {
        meter.update(0.05, 0.0, true);
    }
    let at_floor = (meter.value() - config.watching_floor).abs() < 0.01;
    results.push(TestResult {
        name: "tension_converges_to_floor".into(),
        passed: at_floor,
        detail: format!("value {:.3} vs floor {:.2}", meter.value(), config.watching_floor),
    });

    // Releasing the watch decays back toward base
    for _ in 0..200 {
        meter.update(0.05, 0.0, false);
    }
    results.push(TestResult {
        name: "tension_decays_to_base".into(),
        passed: (meter.value() - config.base).abs() < 0.01,
        detail: format!("value {:.3} vs base {:.2}", meter.value(), config.base),
    });

    // Value bounded under hostile inputs
    let mut hostile = TensionMeter::new(TensionConfig {
        base: 1.0,
        progress_bonus: 50.0,
        response_speed: 500.0,
        ..config
    });
    let mut bounded = true;
    for _ in 0..20 {
        let v = hostile.update(100.0, 1000.0, true);
        if !(0.0..=1.0).contains(&v) {
            bounded = false;
        }
    }
    results.push(TestResult {
        name: "tension_bounded".into(),
        passed: bounded,
        detail: "value stays in [0, 1] under extreme inputs".into(),
    });

    // Stinger cadence shortens monotonically with tension
    let mut monotone = true;
    let mut last = f32::MAX;
    for i in 0..=10 {
        let interval = stinger_interval(&config, i as f32 / 10.0);
        if interval > last {
            monotone = false;
        }
        last = interval;
    }
    results.push(TestResult {
        name: "tension_stinger_monotone".into(),
        passed: monotone
            && stinger_interval(&config, 0.0) == config.stinger_interval_max
            && stinger_interval(&config, 1.0) == config.stinger_interval_min,
        detail: format!(
            "{:.0} s at rest → {:.0} s at full tension",
            config.stinger_interval_max, config.stinger_interval_min
        ),
    });

    // Vignette smoothstep endpoints and midrange easing
    let vignette_ok = vignette_opacity(0.0) == 0.0
        && vignette_opacity(1.0) == 1.0
        && vignette_opacity(0.2) < 0.2
        && vignette_opacity(0.8) > 0.8;
    results.push(TestResult {
        name: "tension_vignette_curve".into(),
        passed: vignette_ok,
        detail: "smoothstep: slow in, hard close".into(),
    });

    if verbose {
        println!("  Tension → stinger interval / vignette:");
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            println!(
                "    {:.1}: {:5.1} s / {:.3}",
                t,
                stinger_interval(&config, t),
                vignette_opacity(t)
            );
        }
    }

    results
}

// ── 6. Scripted Full Round ──────────────────────────────────────────────

/// Walk a scripted player through an assembled corridor: freeze whenever
/// watched, creep forward otherwise, and present at the exit gate.
fn validate_full_round(verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Full Round ---");
    let mut results = Vec::new();

    let manifest: ModuleManifest = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "round_manifest".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };
    let catalog = manifest.to_catalog();
    let config = AssemblyConfig::default();

    let chain = match assemble_layout("FFRFFLFFDFE", &catalog, &config) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "round_assembly".into(),
                passed: false,
                detail: format!("assembly failed: {}", e),
            });
            return results;
        }
    };

    let observation = ObservationConfig {
        free_move_secs: (2.0, 4.0),
        watching_secs: (1.0, 2.0),
        required_samples: 2,
        ..ObservationConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let mut director = ObservationDirector::new(observation, &mut rng);
    let mut tension = TensionMeter::new(TensionConfig::default());

    // Walk the chain segment by segment at 1.2 m/s, freezing when watched.
    let dt = 0.02f32;
    let walk_speed = 1.2f32;
    let mut segment = 0usize;
    let mut along = 0.0f32;
    let (mut x, mut z) = chain
        .start_pose()
        .map(|p| (p.x, p.z))
        .unwrap_or((0.0, 0.0));
    let mut ticks = 0u32;
    let mut max_tension = 0.0f32;

    while segment < chain.modules.len() && ticks < 120_000 {
        ticks += 1;
        let speed = if director.is_watching() { 0.0 } else { walk_speed };
        if speed > 0.0 {
            let m = &chain.modules[segment];
            let (ax, az) = (m.placement_pose.x, m.placement_pose.z);
            let (bx, bz) = (m.exit_pose.x, m.exit_pose.z);
            let seg_len = ((bx - ax).powi(2) + (bz - az).powi(2)).sqrt();
            along += speed * dt;
            if along >= seg_len {
                along = 0.0;
                segment += 1;
            } else if seg_len > 0.0 {
                let t = along / seg_len;
                x = ax + (bx - ax) * t;
                z = az + (bz - az) * t;
            }
        }
        director.step(dt, speed, &mut rng);
        let value = tension.update(dt, chain.progress(x, z), director.is_watching());
        max_tension = max_tension.max(value);
        if director.is_ended() {
            break;
        }
    }

    results.push(TestResult {
        name: "round_disciplined_walk_survives".into(),
        passed: !director.is_ended(),
        detail: format!(
            "walked the chain in {} ticks, {} samples banked",
            ticks,
            director.collected_samples()
        ),
    });

    // Keep standing at the exit until enough samples are banked.
    let mut waited = 0u32;
    while director.collected_samples() < observation.required_samples && waited < 120_000 {
        director.step(dt, 0.0, &mut rng);
        waited += 1;
    }
    let decision = director.on_reached_exit();
    results.push(TestResult {
        name: "round_exit_accepts".into(),
        passed: decision == ExitDecision::Accepted,
        detail: format!("{:?} after {} extra ticks", decision, waited),
    });

    results.push(TestResult {
        name: "round_tension_rose".into(),
        passed: max_tension > TensionConfig::default().base && max_tension <= 1.0,
        detail: format!("peak tension {:.3}", max_tension),
    });

    if verbose {
        println!(
            "  Final position ({:.2}, {:.2}), progress {:.3}",
            x,
            z,
            chain.progress(x, z)
        );
    }

    results
}
