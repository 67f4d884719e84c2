//! Tests for explorer.rs and transcript.rs

use chrono::{TimeZone, Utc};
use explorer_shared::catalog::PerturbationCatalog;
use explorer_shared::clock::FixedClock;
use explorer_shared::gateway::{FakeGateway, FnGateway, GatewayRequest};
use explorer_shared::sampler::CountRange;
use explorer_shared::settings::GauntletSettings;
use explorer_shared::transcript::{render_transcript, transcript_file_name};
use explorer_shared::{Explorer, ExplorerSettings, GatewayError, SamplingError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap())
}

/// Canned response derived only from the prompt text.
fn keyed_response(req: &GatewayRequest) -> Result<String, GatewayError> {
    let checksum: u64 = req.prompt.bytes().map(u64::from).sum();
    Ok(format!("response #{} for a {}-char prompt", checksum % 997, req.prompt.len()))
}

fn run_transcript(seed: u64) -> String {
    let catalog = PerturbationCatalog::builtin();
    let gateway = FnGateway::new(|req: &GatewayRequest, _n| keyed_response(req));
    let clock = clock();
    let explorer = Explorer::new(&catalog, &gateway, &clock, ExplorerSettings::default());
    let mut rng = StdRng::seed_from_u64(seed);

    let record = explorer.run(7, "Honey never spoils.", &mut rng).unwrap();
    render_transcript(&record, 100)
}

#[test]
fn test_seeded_runs_produce_identical_transcripts() {
    assert_eq!(run_transcript(42), run_transcript(42));
}

#[test]
fn test_run_sequences_all_stages() {
    let catalog = PerturbationCatalog::builtin();
    let gateway = FnGateway::new(|req: &GatewayRequest, n| {
        if req.prompt.contains("PHASE 1: REACH THE BOUNDARY") {
            Ok("boundary text".to_string())
        } else if req.prompt.contains("GENERATE FROM THE EDGE") {
            Ok("## PHASE 3: GENERATE FROM THE EDGE\nIdea A.".to_string())
        } else if req.prompt.contains("translate this into plain") {
            Ok(" Plain words. ".to_string())
        } else {
            Ok(format!("Evolved: {}", n))
        }
    });
    let clock = clock();
    let settings = ExplorerSettings {
        gauntlet: GauntletSettings {
            iterations: CountRange::exactly(3).unwrap(),
            ..GauntletSettings::default()
        },
        ..ExplorerSettings::default()
    };
    let explorer = Explorer::new(&catalog, &gateway, &clock, settings);
    let mut rng = StdRng::seed_from_u64(3);

    let record = explorer.run(12, "A claim.", &mut rng).unwrap();

    assert_eq!(record.cycle, 12);
    assert_eq!(record.topic, "A claim.");
    assert_eq!(record.boundary, "boundary text");
    assert!((1..=2).contains(&record.initial_perturbations.len()));
    assert_eq!(record.gauntlet.initial_idea, "Idea A.");
    assert_eq!(record.gauntlet.iterations, 3);
    // calls 3, 4, 5 are the reflections
    assert_eq!(record.gauntlet.final_idea, "Evolved: 5");
    assert_eq!(record.translation, "Plain words.");
    assert_eq!(gateway.call_count(), 6);
    assert!(record.gauntlet.is_consistent());
}

#[test]
fn test_budgets_per_stage() {
    let catalog = PerturbationCatalog::builtin();
    let gateway = FakeGateway::always_ok("text");
    let clock = clock();
    let settings = ExplorerSettings {
        gauntlet: GauntletSettings {
            iterations: CountRange::exactly(2).unwrap(),
            ..GauntletSettings::default()
        },
        timeout_secs: 45,
        ..ExplorerSettings::default()
    };
    let explorer = Explorer::new(&catalog, &gateway, &clock, settings);
    let mut rng = StdRng::seed_from_u64(3);
    explorer.run(1, "topic", &mut rng).unwrap();

    let budgets: Vec<u32> = gateway
        .requests()
        .iter()
        .map(|r| r.max_output_tokens)
        .collect();
    assert_eq!(budgets, vec![4000, 1500, 800, 800, 400]);
    assert!(gateway.requests().iter().all(|r| r.timeout_secs == 45));
}

#[test]
fn test_failing_gateway_does_not_abort_run() {
    let catalog = PerturbationCatalog::builtin();
    let gateway = FakeGateway::always_error("invalid api key");
    let clock = clock();
    let explorer = Explorer::new(&catalog, &gateway, &clock, ExplorerSettings::default());
    let mut rng = StdRng::seed_from_u64(10);

    let record = explorer.run(2, "topic", &mut rng).unwrap();
    let marker = "ERROR: invalid api key";

    assert_eq!(record.boundary, marker);
    assert_eq!(record.initial_response, marker);
    assert_eq!(record.gauntlet.initial_idea, marker);
    assert!((8..=20).contains(&record.gauntlet.iterations));
    assert!(record
        .gauntlet
        .reflection_chain
        .iter()
        .all(|r| r.idea_after == marker));
    assert_eq!(record.translation, marker);
}

#[test]
fn test_misconfigured_perturbation_range_fails_fast() {
    let catalog = PerturbationCatalog::builtin();
    let gateway = FakeGateway::always_ok("text");
    let clock = clock();
    let settings = ExplorerSettings {
        gauntlet: GauntletSettings {
            initial_perturbations: CountRange::exactly(13).unwrap(),
            ..GauntletSettings::default()
        },
        ..ExplorerSettings::default()
    };
    let explorer = Explorer::new(&catalog, &gateway, &clock, settings);
    let mut rng = StdRng::seed_from_u64(3);

    let result = explorer.run(1, "topic", &mut rng);
    assert!(matches!(
        result,
        Err(SamplingError::TooManyCategories {
            requested: 13,
            available: 12,
        })
    ));
    // only the boundary call happened
    assert_eq!(gateway.call_count(), 1);
}

#[test]
fn test_transcript_layout_and_previews() {
    let catalog = PerturbationCatalog::builtin();
    let long_idea = "x".repeat(250);
    let gateway = FakeGateway::always_ok(long_idea.clone());
    let clock = clock();
    let settings = ExplorerSettings {
        gauntlet: GauntletSettings {
            iterations: CountRange::exactly(2).unwrap(),
            ..GauntletSettings::default()
        },
        ..ExplorerSettings::default()
    };
    let explorer = Explorer::new(&catalog, &gateway, &clock, settings);
    let mut rng = StdRng::seed_from_u64(3);
    let record = explorer.run(5, "A claim.", &mut rng).unwrap();

    let transcript = render_transcript(&record, 100);
    assert!(transcript.starts_with("EXPLORER - CYCLE 5 [GAUNTLET MODE]"));
    assert!(transcript.contains("Timestamp: 20261019_123000"));
    assert!(transcript.contains("Topic: A claim."));
    assert!(transcript.contains("Elapsed: 0.00s"));
    assert!(transcript.contains("Gauntlet Iterations: 2"));
    assert!(transcript.contains("[Iteration 1] Perturbations: "));
    assert!(transcript.contains("[Iteration 2] Perturbations: "));
    assert!(transcript.contains(&format!("After: {}...\n", "x".repeat(100))));

    let order = [
        "PHASES 1-2: BOUNDARY EXPLORATION",
        "PHASE 3: INITIAL IDEA (Pre-Gauntlet)",
        "GAUNTLET: EVOLUTIONARY REFINEMENT",
        "FINAL IDEA (Post-Gauntlet)",
        "TRANSLATION (Plain Language)",
    ];
    let positions: Vec<usize> = order.iter().map(|h| transcript.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // full text is kept in the record
    assert_eq!(record.gauntlet.final_idea.len(), 250);
    assert_eq!(
        transcript_file_name(&record),
        "explorer_5_20261019_123000_gauntlet.txt"
    );
}
