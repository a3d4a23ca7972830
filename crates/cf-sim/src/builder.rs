//! Fluent builder for constructing a [`Crowd`].

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::info;

use cf_core::{CrowdConfig, FrameClock, MoverId, PrefabKind, Vec2};
use cf_field::DensityField;
use cf_mover::{Locomotion, MoverProfile};
use cf_path::{PathRequestQueue, PathSolver};
use cf_pool::{EntityPool, Poolable};
use cf_schedule::TickScheduler;
use cf_space::{CrowdSpace, Wall};

use crate::{Crowd, SimResult};

/// Fluent builder for [`Crowd<L, S>`].
///
/// # Required inputs
///
/// - [`CrowdConfig`] — frame rate, tiers, field grid, queue budget, …
/// - `S: PathSolver` — the path search (e.g. [`cf_path::DirectSolver`])
/// - a factory creating `L` bodies for the entity pool
///
/// # Optional inputs
///
/// | Method             | Default                  |
/// |--------------------|--------------------------|
/// | `.walls(iter)`     | no walls                 |
/// | `.prop(pos, r)`    | no props                 |
/// | `.profiles(map)`   | every mover gets `MoverProfile::default()` |
/// | `.prewarm(k, n)`   | empty pool               |
///
/// # Example
///
/// ```rust,ignore
/// let profiles = load_profiles_csv(Path::new("profiles.csv"))?;
/// let mut crowd = CrowdBuilder::new(config, DirectSolver, |_| KinematicBody::default())
///     .walls(corridor_walls)
///     .profiles(profiles)
///     .prewarm(PrefabKind(0), 8)
///     .build()?;
/// ```
pub struct CrowdBuilder<L: Locomotion + Poolable, S: PathSolver> {
    config:   CrowdConfig,
    solver:   S,
    pool:     EntityPool<L>,
    walls:    Vec<Wall>,
    props:    Vec<(Vec2, f32)>,
    profiles: IndexMap<MoverId, MoverProfile>,
    prewarm:  Vec<(PrefabKind, usize)>,
}

impl<L: Locomotion + Poolable, S: PathSolver> CrowdBuilder<L, S> {
    /// Create a builder with all required inputs.
    pub fn new(config: CrowdConfig, solver: S, factory: impl FnMut(PrefabKind) -> L + 'static) -> Self {
        Self {
            config,
            solver,
            pool:     EntityPool::new(factory),
            walls:    Vec::new(),
            props:    Vec::new(),
            profiles: IndexMap::new(),
            prewarm:  Vec::new(),
        }
    }

    /// Static wall segments for the ray probe.
    pub fn walls(mut self, walls: impl IntoIterator<Item = Wall>) -> Self {
        self.walls.extend(walls);
        self
    }

    /// A static round obstacle.  It blocks probes but never negotiates.
    pub fn prop(mut self, position: Vec2, radius: f32) -> Self {
        self.props.push((position, radius));
        self
    }

    /// Per-mover profiles used by [`Crowd::register`].
    pub fn profiles(mut self, profiles: IndexMap<MoverId, MoverProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Fill the pool's free queue for `kind` at build time.
    pub fn prewarm(mut self, kind: PrefabKind, count: usize) -> Self {
        self.prewarm.push((kind, count));
        self
    }

    /// Validate the configuration, allocate the field, and return an empty
    /// crowd at time zero.
    pub fn build(mut self) -> SimResult<Crowd<L, S>> {
        self.config.validate()?;
        let field = DensityField::new(&self.config.field)?;

        let mut space = CrowdSpace::with_walls(self.walls);
        for (position, radius) in self.props {
            space.add_prop(position, radius);
        }
        for (kind, count) in self.prewarm {
            self.pool.prewarm(kind, count);
        }

        info!(
            frame_hz = self.config.frame_hz,
            dispatch_budget = self.config.queue.dispatch_budget,
            cells = field.cell_count(),
            walls = space.wall_count(),
            profiles = self.profiles.len(),
            "crowd built"
        );

        Ok(Crowd {
            clock:     FrameClock::with_rate(self.config.frame_hz),
            queue:     PathRequestQueue::new(self.config.queue.dispatch_budget),
            config:    self.config,
            field,
            space,
            scheduler: TickScheduler::new(),
            movers:    FxHashMap::default(),
            pool:      self.pool,
            pooled:    FxHashMap::default(),
            profiles:  self.profiles,
            solver:    self.solver,
            next_id:   MoverId(0),
            fallbacks: Vec::new(),
            order:     Vec::new(),
        })
    }
}
