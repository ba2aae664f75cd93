//! Hearthside Headless Simulation Harness
//!
//! Validates courtship, narration, and the backend contract without a
//! network, a renderer, or a real text-generation service. Runs
//! entirely in-process.
//!
//! Usage:
//!   cargo run -p hearthside-simtest
//!   cargo run -p hearthside-simtest -- --verbose

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use hearthside_core::backend::{BackendConfig, BackendError, DialogueBackend};
use hearthside_core::components::{Name, Position};
use hearthside_core::context::SimulationContext;
use hearthside_core::output::{NotificationSink, RenderSink};
use hearthside_core::persistence;
use hearthside_core::systems::{
    DateEndReason, DatingRegistry, NarrationScheduler, RelationKind, SocialEvent,
};
use hearthside_logic::dating::DateStage;
use hearthside_logic::generation::{GenerationRequest, GenerationResponse, SamplingParams};
use hearthside_logic::opinion;

// ── Test doubles ────────────────────────────────────────────────────────

struct StaticBackend(&'static str);

impl DialogueBackend for StaticBackend {
    fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
        Ok(self.0.to_string())
    }
}

struct FailingBackend;

impl DialogueBackend for FailingBackend {
    fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
        Err(BackendError::EmptyResponse)
    }
}

/// Holds every generation until the harness releases it.
struct GatedBackend {
    release: Mutex<Receiver<()>>,
    text: &'static str,
}

impl DialogueBackend for GatedBackend {
    fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
        let _ = self.release.lock().unwrap().recv();
        Ok(self.text.to_string())
    }
}

#[derive(Clone, Default)]
struct SharedRender(Rc<RefCell<Vec<(u32, String)>>>);

impl RenderSink for SharedRender {
    fn draw_floating_text(&mut self, speaker: u32, text: &str, _duration_ms: u64) {
        self.0.borrow_mut().push((speaker, text.to_string()));
    }
}

#[derive(Clone, Default)]
struct SharedNotices(Rc<RefCell<Vec<String>>>);

impl NotificationSink for SharedNotices {
    fn notify(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

type Shown = Rc<RefCell<Vec<(u32, String)>>>;
type Notices = Rc<RefCell<Vec<String>>>;

fn sim_with(backend: Arc<dyn DialogueBackend>) -> (SimulationContext, Shown, Notices) {
    let render = SharedRender::default();
    let notices = SharedNotices::default();
    let shown = Rc::clone(&render.0);
    let notes = Rc::clone(&notices.0);
    let sim = SimulationContext::with_sinks(
        BackendConfig::default(),
        backend,
        Box::new(render),
        Box::new(notices),
    )
    .with_seed(7);
    (sim, shown, notes)
}

fn spawn_pair(sim: &mut SimulationContext) -> (u32, u32) {
    let a = sim.spawn_colonist(Name::new("Mara", "Finch"), Position::new(10.0, 10.0));
    let b = sim.spawn_colonist(Name::new("Ezra", "Bell"), Position::new(11.0, 10.0));
    (a, b)
}

fn record_events(sim: &mut SimulationContext) -> Rc<RefCell<Vec<SocialEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    sim.events.subscribe(move |event| log.borrow_mut().push(*event));
    seen
}

/// Drive a date from proposal to completion with a 250 ms virtual step,
/// collecting the stages it passes through.
fn run_date(sim: &mut SimulationContext, a: u32, b: u32) -> Vec<DateStage> {
    let mut stages = Vec::new();
    let mut now = 0u64;
    for _ in 0..600 {
        if let Some(stage) = sim.dates.stage_of(a) {
            if stages.last() != Some(&stage) {
                stages.push(stage);
            }
        }
        sim.tick(now);
        now += 250;
        if !sim.dates.is_active(a) && !sim.is_running_date(a) && !sim.is_running_date(b) {
            break;
        }
    }
    stages
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Hearthside Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Dating registry invariants
    results.extend(validate_dating_registry(verbose));

    // 2. Narration scheduling and pacing
    results.extend(validate_narration(verbose));

    // 3. Backend wire contract
    results.extend(validate_wire_contract(verbose));

    // 4. Full date lifecycle
    results.extend(validate_date_lifecycle(verbose));

    // 5. Affairs and taunts
    results.extend(validate_affairs_and_taunts(verbose));

    // 6. Backend failure and cancellation
    results.extend(validate_backend_boundary(verbose));

    // 7. Save and load
    results.extend(validate_persistence(verbose));

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

// ── 1. Dating Registry ──────────────────────────────────────────────────

fn validate_dating_registry(_verbose: bool) -> Vec<TestResult> {
    println!("--- Dating Registry ---");
    let mut results = Vec::new();

    // Unordered pairs answer the same for either partner
    let mut registry = DatingRegistry::new();
    let started = registry.try_start(4, 2);
    results.push(TestResult {
        name: "registry_pair_symmetry".into(),
        passed: started
            && registry.partner_of(2) == Some(4)
            && registry.partner_of(4) == Some(2)
            && registry.stage_of(2) == registry.stage_of(4),
        detail: format!(
            "partner_of(2)={:?} partner_of(4)={:?}",
            registry.partner_of(2),
            registry.partner_of(4)
        ),
    });

    // At most one date per colonist, in either pair order
    let double = registry.try_start(2, 9) || registry.try_start(9, 4) || registry.try_start(2, 4);
    results.push(TestResult {
        name: "registry_single_booking".into(),
        passed: !double && registry.active_count() == 1,
        detail: format!("{} active after double-book attempts", registry.active_count()),
    });

    // Self-pairs refused
    let mut registry = DatingRegistry::new();
    results.push(TestResult {
        name: "registry_no_self_dates".into(),
        passed: !registry.try_start(5, 5) && registry.active_count() == 0,
        detail: "self-pair refused".into(),
    });

    // end is idempotent and clears both sides
    let mut registry = DatingRegistry::new();
    registry.try_start(1, 2);
    registry.end(2);
    registry.end(2);
    registry.end(1);
    results.push(TestResult {
        name: "registry_end_idempotent".into(),
        passed: !registry.is_active(1) && !registry.is_active(2),
        detail: "repeated end calls are harmless".into(),
    });

    // advance walks stages in order and removes on the last one
    let mut registry = DatingRegistry::new();
    registry.try_start(1, 2);
    let mut walked = Vec::new();
    while let Some(stage) = registry.stage_of(1) {
        walked.push(stage);
        registry.advance(2);
    }
    let expected = vec![
        DateStage::Proposed,
        DateStage::Travel,
        DateStage::Activity,
        DateStage::Lovin,
    ];
    results.push(TestResult {
        name: "registry_advance_monotonic".into(),
        passed: walked == expected && !registry.is_active(1),
        detail: format!("stages seen: {:?}", walked),
    });

    // advance without a date is a no-op
    let mut registry = DatingRegistry::new();
    registry.advance(7);
    results.push(TestResult {
        name: "registry_advance_without_date".into(),
        passed: registry.active_count() == 0,
        detail: "no-op without an active date".into(),
    });

    results
}

// ── 2. Narration Scheduler ──────────────────────────────────────────────

fn validate_narration(verbose: bool) -> Vec<TestResult> {
    println!("--- Narration Scheduler ---");
    let mut results = Vec::new();

    // One visible utterance at a time, strict FIFO, wall-clock pacing
    let mut scheduler = NarrationScheduler::new();
    let mut sink = SharedRender::default();
    scheduler.enqueue(1, "First", 500, None);
    scheduler.enqueue(2, "Second", 300, None);
    scheduler.on_tick(0, &mut sink);
    let after_first = sink.0.borrow().len();
    scheduler.on_tick(499, &mut sink);
    let before_expiry = sink.0.borrow().len();
    scheduler.on_tick(500, &mut sink);
    let after_expiry = sink.0.borrow().len();
    let shown = sink.0.borrow();
    let order_ok = shown.len() == 2 && shown[0].1 == "First" && shown[1].1 == "Second";
    drop(shown);
    results.push(TestResult {
        name: "narration_fifo_pacing".into(),
        passed: after_first == 1 && before_expiry == 1 && after_expiry == 2 && order_ok,
        detail: format!(
            "shown at t=0/499/500: {}/{}/{}",
            after_first, before_expiry, after_expiry
        ),
    });

    // Zero durations rejected at enqueue
    let mut scheduler = NarrationScheduler::new();
    let accepted = scheduler.enqueue(1, "Nothing", 0, None);
    results.push(TestResult {
        name: "narration_zero_duration_rejected".into(),
        passed: !accepted && scheduler.queue_len() == 0,
        detail: "zero-duration utterance refused".into(),
    });

    // Conversation completion fires exactly once, at the last dequeue
    let mut scheduler = NarrationScheduler::new();
    let mut sink = SharedRender::default();
    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    let id = scheduler.start_conversation_with(move || counter.set(counter.get() + 1));
    scheduler.enqueue(1, "One", 100, Some(id));
    scheduler.enqueue(2, "Two", 100, Some(id));
    scheduler.enqueue(1, "Three", 100, Some(id));
    scheduler.on_tick(0, &mut sink);
    let early = fired.get();
    scheduler.on_tick(100, &mut sink);
    let middle = fired.get();
    scheduler.on_tick(200, &mut sink);
    let at_last = fired.get();
    scheduler.on_tick(300, &mut sink);
    scheduler.on_tick(400, &mut sink);
    results.push(TestResult {
        name: "narration_completion_exactly_once".into(),
        passed: early == 0 && middle == 0 && at_last == 1 && fired.get() == 1,
        detail: format!("callback fired {} time(s)", fired.get()),
    });

    // Manual close-out is idempotent
    let mut scheduler = NarrationScheduler::new();
    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    let id = scheduler.start_conversation_with(move || counter.set(counter.get() + 1));
    scheduler.close_conversation(id);
    scheduler.close_conversation(id);
    results.push(TestResult {
        name: "narration_close_idempotent".into(),
        passed: fired.get() == 1 && !scheduler.is_conversation_active(id),
        detail: format!("callback fired {} time(s) across two closes", fired.get()),
    });

    if verbose {
        println!("  pacing: conversations interleave with standalone lines in queue order");
    }

    results
}

// ── 3. Wire Contract ────────────────────────────────────────────────────

fn validate_wire_contract(_verbose: bool) -> Vec<TestResult> {
    println!("--- Wire Contract ---");
    let mut results = Vec::new();

    // Request carries exactly the expected keys
    let config = BackendConfig::default();
    let request = config.request("A prompt.".to_string());
    let value = serde_json::to_value(&request).unwrap_or_default();
    let base_keys_ok = value.get("prompt").is_some()
        && value.get("max_length").is_some()
        && value.get("temperature").is_some()
        && value.get("stop_sequence").is_some();
    results.push(TestResult {
        name: "wire_request_keys".into(),
        passed: base_keys_ok && value.get("top_p").is_none(),
        detail: format!("request body: {}", value),
    });

    // Alternate sampling flattens into the top level
    let mut sampled = config.clone();
    sampled.sampling = Some(SamplingParams {
        top_p: 0.9,
        top_k: 40,
        rep_pen: 1.1,
    });
    let value = serde_json::to_value(&sampled.request("p".to_string())).unwrap_or_default();
    results.push(TestResult {
        name: "wire_sampling_flattened".into(),
        passed: value.get("top_p").is_some()
            && value.get("top_k").is_some()
            && value.get("sampling").is_none(),
        detail: "sampling block merges into request body".into(),
    });

    // Response parsing takes the first result's text
    let parsed: Result<GenerationResponse, _> =
        serde_json::from_str(r#"{"results":[{"text":" Hello. "},{"text":"Ignored."}]}"#);
    let first = parsed.as_ref().ok().and_then(|r| r.first_text());
    results.push(TestResult {
        name: "wire_response_first_text".into(),
        passed: first == Some("Hello."),
        detail: format!("first_text={:?}", first),
    });

    // Empty result lists are not usable text
    let empty: Result<GenerationResponse, _> = serde_json::from_str(r#"{"results":[]}"#);
    results.push(TestResult {
        name: "wire_empty_results".into(),
        passed: empty.ok().and_then(|r| r.first_text().map(str::to_string)).is_none(),
        detail: "empty results yield no text".into(),
    });

    // Config JSON fills missing fields with defaults
    let partial: Result<BackendConfig, _> =
        serde_json::from_str(r#"{"endpoint": "http://example.test/gen"}"#);
    let ok = match &partial {
        Ok(c) => c.endpoint == "http://example.test/gen" && c.max_length == 80,
        Err(_) => false,
    };
    results.push(TestResult {
        name: "wire_config_defaults".into(),
        passed: ok,
        detail: "partial config JSON takes defaults".into(),
    });

    results
}

// ── 4. Date Lifecycle ───────────────────────────────────────────────────

fn validate_date_lifecycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Date Lifecycle ---");
    let mut results = Vec::new();

    // High opinion accepts, and the date runs every stage to completion
    let (mut sim, _shown, notes) = sim_with(Arc::new(StaticBackend(
        "Mara: Lovely evening.\nEzra: It is.",
    )));
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, 150);
    let accepted = sim.try_propose(a, b);
    let stages = run_date(&mut sim, a, b);
    let expected = vec![
        DateStage::Proposed,
        DateStage::Travel,
        DateStage::Activity,
        DateStage::Lovin,
    ];
    results.push(TestResult {
        name: "lifecycle_full_progression".into(),
        passed: accepted && stages == expected && !sim.dates.is_active(a),
        detail: format!("stages: {:?}", stages),
    });
    results.push(TestResult {
        name: "lifecycle_success_bonus".into(),
        passed: sim.relationships.opinion_of(a, b) == opinion::DATE_SUCCESS_BONUS
            && sim.relationships.opinion_of(b, a) == 150 + opinion::DATE_SUCCESS_BONUS,
        detail: format!(
            "opinions after: {} and {}",
            sim.relationships.opinion_of(a, b),
            sim.relationships.opinion_of(b, a)
        ),
    });
    results.push(TestResult {
        name: "lifecycle_notice_posted".into(),
        passed: notes.borrow().iter().any(|n| n.contains("lovely date")),
        detail: format!("{} notices posted", notes.borrow().len()),
    });

    // Low opinion rejects and costs the proposer standing
    let (mut sim, _shown, _notes) = sim_with(Arc::new(StaticBackend("x")));
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, opinion::PROPOSAL_THRESHOLD);
    let accepted = sim.try_propose(a, b);
    results.push(TestResult {
        name: "lifecycle_threshold_rejects".into(),
        passed: !accepted
            && !sim.dates.is_active(a)
            && sim.relationships.opinion_of(b, a)
                == opinion::PROPOSAL_THRESHOLD - opinion::REBUFF_STING,
        detail: format!(
            "opinion at threshold rejects, now {}",
            sim.relationships.opinion_of(b, a)
        ),
    });

    // A partner going down ends the date defensively, exactly once
    let (mut sim, _shown, _notes) = sim_with(Arc::new(StaticBackend("Line.")));
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, 150);
    let seen = record_events(&mut sim);
    sim.try_propose(a, b);
    sim.tick(0);
    sim.tick(250);
    sim.set_downed(b, true);
    sim.tick(500);
    sim.tick(750);
    let ended: Vec<SocialEvent> = seen
        .borrow()
        .iter()
        .copied()
        .filter(|e| matches!(e, SocialEvent::DateEnded { .. }))
        .collect();
    let reason_ok = matches!(
        ended.first(),
        Some(SocialEvent::DateEnded {
            reason: DateEndReason::PartnerUnavailable,
            ..
        })
    );
    results.push(TestResult {
        name: "lifecycle_defensive_end".into(),
        passed: !sim.dates.is_active(a)
            && !sim.is_running_date(a)
            && !sim.is_running_date(b)
            && ended.len() == 1
            && reason_ok,
        detail: format!("{} DateEnded event(s), reason ok: {}", ended.len(), reason_ok),
    });

    if verbose {
        println!("  lifecycle covers proposal, travel, activity chat, and wrap-up");
    }

    results
}

// ── 5. Affairs & Taunts ─────────────────────────────────────────────────

fn validate_affairs_and_taunts(_verbose: bool) -> Vec<TestResult> {
    println!("--- Affairs & Taunts ---");
    let mut results = Vec::new();

    // A lover standing next to the date catches the cheater
    let (mut sim, _shown, notes) = sim_with(Arc::new(StaticBackend("Line.")));
    let a = sim.spawn_colonist(Name::new("Mara", "Finch"), Position::new(10.0, 10.0));
    let b = sim.spawn_colonist(Name::new("Ezra", "Bell"), Position::new(11.0, 10.0));
    let lover = sim.spawn_colonist(Name::new("Joss", "Vale"), Position::new(12.0, 10.0));
    sim.relationships.set_lovers(a, lover);
    sim.relationships.set_opinion(lover, a, 80);
    sim.relationships.set_opinion(b, a, 150);
    let seen = record_events(&mut sim);
    sim.try_propose(a, b);
    sim.tick(0);
    sim.tick(1_000);
    sim.tick(1_250);
    let caught_count = seen
        .borrow()
        .iter()
        .filter(|e| matches!(e, SocialEvent::CaughtCheating { .. }))
        .count();
    results.push(TestResult {
        name: "affair_caught_once".into(),
        passed: caught_count == 1 && !sim.dates.is_active(a),
        detail: format!("{} CaughtCheating event(s)", caught_count),
    });
    results.push(TestResult {
        name: "affair_penalty_and_breakup".into(),
        passed: sim.relationships.opinion_of(lover, a) == 80 - opinion::CHEATING_PENALTY
            && sim.relationships.lover_of(a).is_none()
            && sim.relationships.get(a, lover).map(|r| r.kind) == Some(RelationKind::ExLover),
        detail: format!(
            "lover's opinion now {}, kind {:?}",
            sim.relationships.opinion_of(lover, a),
            sim.relationships.get(a, lover).map(|r| r.kind)
        ),
    });
    results.push(TestResult {
        name: "affair_notice_posted".into(),
        passed: notes.borrow().iter().any(|n| n.contains("caught")),
        detail: format!("{} notices posted", notes.borrow().len()),
    });

    // Combat hits can draw a generated taunt from the attacker
    let (mut sim, shown, _notes) = sim_with(Arc::new(StaticBackend("Brock: Stay down!")));
    let attacker = sim.spawn_colonist(Name::new("Brock", "Hale"), Position::new(1.0, 1.0));
    let victim = sim.spawn_colonist(Name::new("Finn", "Ash"), Position::new(2.0, 1.0));
    let mut now = 0u64;
    for _ in 0..400 {
        sim.report_combat_hit(attacker, victim);
        sim.tick(now);
        now += 100;
        if !shown.borrow().is_empty() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    let first = shown.borrow().first().cloned();
    results.push(TestResult {
        name: "taunt_displayed".into(),
        passed: first
            .as_ref()
            .map(|(speaker, text)| *speaker == attacker && text == "Stay down!")
            .unwrap_or(false),
        detail: format!("first bubble: {:?}", first),
    });

    results
}

// ── 6. Backend Boundary ─────────────────────────────────────────────────

fn validate_backend_boundary(_verbose: bool) -> Vec<TestResult> {
    println!("--- Backend Boundary ---");
    let mut results = Vec::new();

    // A failing backend never stalls or unwinds the date
    let (mut sim, shown, _notes) = sim_with(Arc::new(FailingBackend));
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, 150);
    sim.try_propose(a, b);
    run_date(&mut sim, a, b);
    results.push(TestResult {
        name: "backend_failure_nonfatal".into(),
        passed: !sim.dates.is_active(a)
            && !sim.is_running_date(a)
            && shown.borrow().is_empty()
            && sim.relationships.opinion_of(a, b) == opinion::DATE_SUCCESS_BONUS,
        detail: format!(
            "date completed with {} bubbles shown",
            shown.borrow().len()
        ),
    });

    // Results landing after cancellation are discarded
    let (release_tx, release_rx): (Sender<()>, Receiver<()>) = mpsc::channel();
    let backend = Arc::new(GatedBackend {
        release: Mutex::new(release_rx),
        text: "Mara: Hi.\nEzra: Hi yourself.",
    });
    let (mut sim, shown, _notes) = sim_with(backend);
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, 150);
    sim.try_propose(a, b);
    let mut now = 0u64;
    for _ in 0..600 {
        sim.tick(now);
        now += 250;
        if sim.pending_generations() > 0 {
            break;
        }
    }
    let submitted = sim.pending_generations() > 0;
    sim.set_downed(a, true);
    sim.tick(now);
    now += 250;
    sim.tick(now);
    now += 250;
    let date_over = !sim.dates.is_active(a);
    let _ = release_tx.send(());
    for _ in 0..200 {
        sim.tick(now);
        now += 250;
        if sim.pending_generations() == 0 {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    results.push(TestResult {
        name: "backend_late_result_discarded".into(),
        passed: submitted
            && date_over
            && sim.pending_generations() == 0
            && shown.borrow().is_empty(),
        detail: format!(
            "submitted={} date_over={} bubbles={}",
            submitted,
            date_over,
            shown.borrow().len()
        ),
    });

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    // Colony survives a round trip; the in-progress date does not
    let (mut sim, _shown, _notes) = sim_with(Arc::new(StaticBackend("Line.")));
    let (a, b) = spawn_pair(&mut sim);
    sim.relationships.set_opinion(b, a, 150);
    sim.try_propose(a, b);
    sim.tick(0);
    let was_active = sim.dates.is_active(a);

    let mut buffer = Vec::new();
    let saved = sim.save(&mut buffer).is_ok();

    let (mut restored, _shown2, _notes2) = sim_with(Arc::new(StaticBackend("Line.")));
    let loaded = restored.load(buffer.as_slice()).is_ok();
    results.push(TestResult {
        name: "persistence_round_trip".into(),
        passed: saved
            && loaded
            && restored.colonist_count() == 2
            && restored.relationships.opinion_of(b, a) == 150
            && restored.directory.display_name(&restored.world, a) == "Mara",
        detail: format!(
            "saved={} loaded={} colonists={}",
            saved,
            loaded,
            restored.colonist_count()
        ),
    });
    results.push(TestResult {
        name: "persistence_dates_are_transient".into(),
        passed: was_active && !restored.dates.is_active(a) && restored.narration.is_idle(),
        detail: "active date not carried across a load".into(),
    });

    // Corrupt data is an error value, not a panic
    let corrupt = persistence::load_simulation(&[1u8, 2, 3][..]);
    results.push(TestResult {
        name: "persistence_corrupt_rejected".into(),
        passed: corrupt.is_err(),
        detail: "truncated save rejected".into(),
    });

    results
}
