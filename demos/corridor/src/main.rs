//! corridor — two movers meet head-on in a 1.5 m corridor while pooled
//! visitors cross an open plaza next to it.
//!
//! Usage: `corridor [config.json]`.  The JSON file may set any subset of
//! `CrowdConfig`; omitted fields keep their defaults.  Set `RUST_LOG=debug`
//! to see yields, pool fallbacks and failed queries as they happen.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cf_core::{CrowdConfig, MoverId, PrefabKind, Tier, Vec2};
use cf_mover::{KinematicBody, Locomotion, MoverProfile, NegotiationEvent, load_profiles_reader};
use cf_path::{DirectSolver, PathError};
use cf_sim::{CrowdBuilder, CrowdObserver, FrameReport};
use cf_space::Wall;

// ── Constants ─────────────────────────────────────────────────────────────────

const SIM_SECS:       f64        = 25.0;
const VISITOR:        PrefabKind = PrefabKind(0);
const VISITOR_POOL:   usize      = 4;
const VISITOR_COUNT:  usize      = 6;
const CORRIDOR_HALF:  f32        = 0.75;
const CORRIDOR_LEN:   f32        = 20.0;

// Mover 3 walks east, mover 7 walks west; equal priority, so 7 gives way.
const PROFILES_CSV: &str = "\
mover_id,tier,personal_space_radius,avoidance_priority,speed,radius,hints\n\
3,high,0.6,50,1.4,0.3,important\n\
7,high,0.6,50,1.4,0.3,\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct EventLog {
    now:        f64,
    yields:     usize,
    arrivals:   usize,
    failures:   usize,
    fallbacks:  usize,
    peak_queue: usize,
}

impl CrowdObserver for EventLog {
    fn on_frame_start(&mut self, _frame: u64, now: f64) {
        self.now = now;
    }

    fn on_frame_end(&mut self, report: &FrameReport) {
        self.peak_queue = self.peak_queue.max(report.requested);
    }

    fn on_negotiation(&mut self, mover: MoverId, event: &NegotiationEvent) {
        match event {
            NegotiationEvent::Yielded { peer, retreat_to } => {
                self.yields += 1;
                match retreat_to {
                    Some(p) => println!("{:>6.2}s  {mover} yields to {peer}, backing off to {p}", self.now),
                    None => println!("{:>6.2}s  {mover} yields to {peer}, no room: holding", self.now),
                }
            }
            NegotiationEvent::Holding { peer, timed_out } => {
                let how = if *timed_out { "retreat timed out" } else { "in place" };
                println!("{:>6.2}s  {mover} waits for {peer} ({how})", self.now);
            }
            NegotiationEvent::Resumed { peer, reason, .. } => {
                println!("{:>6.2}s  {mover} resumes after {peer}: {reason:?}", self.now);
            }
        }
    }

    fn on_path_failed(&mut self, mover: MoverId, error: &PathError) {
        self.failures += 1;
        println!("{:>6.2}s  {mover} path failed: {error}", self.now);
    }

    fn on_arrival(&mut self, mover: MoverId) {
        self.arrivals += 1;
        println!("{:>6.2}s  {mover} arrived", self.now);
    }

    fn on_pool_fallback(&mut self, mover: MoverId, kind: PrefabKind) {
        self.fallbacks += 1;
        println!("{:>6.2}s  {mover} spawned fresh ({kind} pool empty)", self.now);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<CrowdConfig> {
    let Some(path) = path else {
        return Ok(CrowdConfig::default());
    };
    let text = std::fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))?;
    let config: CrowdConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

fn corridor_walls() -> [Wall; 2] {
    [
        Wall::new(Vec2::new(-CORRIDOR_LEN, CORRIDOR_HALF), Vec2::new(CORRIDOR_LEN, CORRIDOR_HALF)),
        Wall::new(Vec2::new(-CORRIDOR_LEN, -CORRIDOR_HALF), Vec2::new(CORRIDOR_LEN, -CORRIDOR_HALF)),
    ]
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;

    println!("=== corridor — crowdflow movement coordination ===");
    println!(
        "Frame rate: {} Hz  |  Dispatch budget: {}  |  Seed: {}",
        config.frame_hz, config.queue.dispatch_budget, config.seed
    );
    println!();

    // 1. Profiles and crowd.
    let profiles = load_profiles_reader(Cursor::new(PROFILES_CSV))?;
    let mut crowd = CrowdBuilder::new(config, DirectSolver, |_| KinematicBody::default())
        .walls(corridor_walls())
        .profiles(profiles)
        .prewarm(VISITOR, VISITOR_POOL)
        .build()?;

    // 2. The corridor pair.
    let east = MoverId(3);
    let west = MoverId(7);
    crowd.register(east, KinematicBody::new(Vec2::new(-4.5, 0.0), Default::default()))?;
    crowd.register(west, KinematicBody::new(Vec2::new(4.5, 0.0), Default::default()))?;
    crowd.set_destination(east, Vec2::new(10.0, 0.0))?;
    crowd.set_destination(west, Vec2::new(-10.0, 0.0))?;

    // 3. Visitors crossing the plaza north of the corridor.
    let visitor = MoverProfile::default().with_tier(Tier::Low).with_speed(1.1);
    let mut visitors = Vec::with_capacity(VISITOR_COUNT);
    for i in 0..VISITOR_COUNT {
        let x = -10.0 + 4.0 * i as f32;
        let id = crowd.spawn(VISITOR, Vec2::new(x, 8.0), 0.0, visitor.clone())?;
        crowd.set_destination(id, Vec2::new(x, 20.0))?;
        visitors.push(id);
    }
    println!(
        "Movers: {}  |  Walls: {}  |  Pool: {} prewarmed",
        crowd.len(),
        crowd.space().wall_count(),
        crowd.pool().stats().prewarmed,
    );
    println!();

    // 4. Run; visitors leave the crowd once they arrive.
    let mut log = EventLog::default();
    let t0 = Instant::now();
    let frames = crowd.clock().frames_for_secs(SIM_SECS);
    for _ in 0..frames {
        crowd.step(&mut log);
        let done: Vec<MoverId> = visitors
            .iter()
            .copied()
            .filter(|&id| crowd.mover(id).is_some_and(|m| m.destination().is_none()))
            .collect();
        for id in done {
            crowd.despawn(id)?;
            visitors.retain(|&v| v != id);
        }
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulated {SIM_SECS} s in {:.3} s wall time", elapsed.as_secs_f64());
    println!(
        "  yields: {}  arrivals: {}  failures: {}  pool fallbacks: {}  peak requests/frame: {}",
        log.yields, log.arrivals, log.failures, log.fallbacks, log.peak_queue
    );
    let queue = crowd.queue().stats();
    println!(
        "  queries: {} enqueued, {} dispatched, {} superseded",
        queue.enqueued, queue.dispatched, queue.superseded
    );
    let pool = crowd.pool().stats();
    println!(
        "  pool: {} recycled, {} fresh, {} despawned, {} free",
        pool.recycled,
        pool.fresh,
        pool.despawned,
        crowd.pool().free_count(VISITOR)
    );
    println!();

    println!("{:<12} {:<8} {:<18} {:<10}", "Mover", "Tier", "Position", "Moving");
    println!("{}", "-".repeat(50));
    for id in crowd.ids() {
        let Some(m) = crowd.mover(id) else { continue };
        let p = m.body().position();
        println!(
            "{:<12} {:<8} {:<18} {:<10}",
            id.to_string(),
            m.tier().as_str(),
            format!("({:.2}, {:.2})", p.x, p.y),
            if m.destination().is_some() { "yes" } else { "no" },
        );
    }

    Ok(())
}
