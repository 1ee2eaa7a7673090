//! Controller module - the blast/gravity/refill state machine
//!
//! [`BoardController`] owns the grid and is the only thing that mutates it.
//! A player blast runs the whole chain synchronously:
//!
//! ```text
//! blast -> gravity -> fill -> cascade check -> (deadlock? shuffle) -> stable
//! ```
//!
//! Each step is also public so a presentation layer can drive the chain one
//! step at a time and animate in between. The phase stays busy until
//! [`BoardController::check_cascade`] settles the board.
//!
//! Randomness and event delivery are injected at construction.

use tracing::{debug, info};

use crate::config::{LevelConfig, Thresholds};
use crate::deadlock;
use crate::events::EventSink;
use crate::grid::{BlockFall, Grid};
use crate::groups::{self, Group, IconMap};
use crate::rng::RandomSource;
use crate::shuffle;
use crate::snapshot::BoardSnapshot;
use crate::types::{
    BoardEvent, BoardPhase, Color, IconVariant, Position, ShuffleOutcome, MIN_GROUP_SIZE,
};

/// A block created by refill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub position: Position,
    pub color: Color,
}

/// Everything the last blast changed, in order, for replay by an animation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub blasted: Vec<Position>,
    pub falls: Vec<BlockFall>,
    pub spawned: Vec<Spawn>,
}

/// Board state machine
#[derive(Debug)]
pub struct BoardController<R: RandomSource, S: EventSink> {
    grid: Grid,
    config: LevelConfig,
    rng: R,
    sink: S,
    phase: BoardPhase,
    /// Cleared by `stop()`; an inactive board never spawns blocks.
    active: bool,
    icons: IconMap,
    last_cascade: CascadeReport,
    /// Monotonic id, increments on every (re)initialize.
    episode_id: u32,
}

impl<R: RandomSource, S: EventSink> BoardController<R, S> {
    /// Create an idle controller. Call [`initialize`](Self::initialize) or
    /// [`restart`](Self::restart) to populate the board.
    pub fn new(config: LevelConfig, rng: R, sink: S) -> Self {
        let config = config.sanitized();
        let grid = Grid::new(config.rows, config.columns);
        let icons = IconMap::empty(grid.rows(), grid.columns());
        Self {
            grid,
            config,
            rng,
            sink,
            phase: BoardPhase::Idle,
            active: false,
            icons,
            last_cascade: CascadeReport::default(),
            episode_id: 0,
        }
    }

    /// Start from an authored layout. The board is active and stable; no
    /// events are emitted. The grid keeps its own dimensions for this level
    /// only; [`restart`](Self::restart) builds from the sanitized config.
    pub fn with_grid(grid: Grid, config: LevelConfig, rng: R, sink: S) -> Self {
        let config = config.sanitized();
        let icons = groups::classify_icons(&grid, &config.thresholds);
        Self {
            grid,
            config,
            rng,
            sink,
            phase: BoardPhase::Stable,
            active: true,
            icons,
            last_cascade: CascadeReport::default(),
            episode_id: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// True while a transition is in flight; callers gate input on this
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn last_cascade(&self) -> &CascadeReport {
        &self.last_cascade
    }

    pub fn get_block(&self, pos: Position) -> Option<Color> {
        self.grid.get(pos)
    }

    pub fn is_valid(&self, pos: Position) -> bool {
        self.grid.is_valid(pos)
    }

    /// Group under `pos`, including singletons; `None` for empty or invalid
    pub fn find_group_at(&self, pos: Position) -> Option<Group> {
        groups::find_group(&self.grid, pos)
    }

    /// Icon variant from the last classification
    pub fn icon_at(&self, pos: Position) -> Option<IconVariant> {
        if !self.grid.is_occupied(pos) {
            return None;
        }
        self.icons.get(pos)
    }

    pub fn icons(&self) -> &IconMap {
        &self.icons
    }

    pub fn is_deadlocked(&self) -> bool {
        deadlock::is_deadlocked(&self.grid)
    }

    pub fn available_moves(&self) -> usize {
        deadlock::available_moves(&self.grid)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.write_grid(&self.grid);
        out.color_count = self.config.color_count;
        out.phase = self.phase;
        out.active = self.active;
        out.deadlocked = self.is_deadlocked();
        out.available_moves = self.available_moves() as u32;
        out.episode_id = self.episode_id;
    }

    /// Store new dimensions and color count (sanitized). Takes effect on the
    /// next [`initialize`](Self::initialize)/[`restart`](Self::restart).
    pub fn set_parameters(&mut self, rows: u8, columns: u8, color_count: u8) {
        self.config = LevelConfig {
            rows,
            columns,
            color_count,
            ..self.config.clone()
        }
        .sanitized();
        debug!(
            rows = self.config.rows,
            columns = self.config.columns,
            color_count = self.config.color_count,
            "board parameters set"
        );
    }

    /// Replace the icon thresholds and reclassify the current board
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.config.thresholds = thresholds.sanitized();
        self.reclassify();
    }

    pub fn set_auto_shuffle(&mut self, enabled: bool) {
        self.config.auto_shuffle_on_deadlock = enabled;
    }

    /// Configure and populate a fresh board
    pub fn initialize(&mut self, rows: u8, columns: u8, color_count: u8) {
        self.set_parameters(rows, columns, color_count);
        self.restart();
    }

    /// Populate a fresh board with the current parameters. The result always
    /// has at least one move.
    pub fn restart(&mut self) {
        self.phase = BoardPhase::Initializing;
        self.grid = Grid::new(self.config.rows, self.config.columns);

        let positions: Vec<Position> = self.grid.positions().collect();
        for pos in positions {
            let color = self.random_color();
            self.grid.set(pos, Some(color));
        }

        if deadlock::is_deadlocked(&self.grid) && !shuffle::repair(&mut self.grid) {
            // Every block has a distinct color; recolor one to pair with its
            // neighbor. A fresh board has no multiset to preserve.
            let a = Position::new(0, 0);
            let b = if self.grid.columns() > 1 { a.right() } else { a.up() };
            let color = self.grid.get(a);
            self.grid.set(b, color);
            debug!("initial deadlock resolved by recoloring");
        }

        self.active = true;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.last_cascade = CascadeReport::default();
        self.reclassify();

        info!(
            episode_id = self.episode_id,
            rows = self.grid.rows(),
            columns = self.grid.columns(),
            color_count = self.config.color_count,
            moves = self.available_moves(),
            "level started"
        );
        self.sink.emit(BoardEvent::LevelStart);
        self.finish();
    }

    /// Blast a group the player picked. Returns the number of blocks removed.
    ///
    /// Out-of-bounds, empty and duplicate positions are dropped first; fewer
    /// than two remaining positions is a no-op returning 0. Otherwise the
    /// cells are cleared and gravity, refill and the cascade check follow.
    pub fn blast_group(&mut self, positions: &[Position]) -> usize {
        if positions.len() < MIN_GROUP_SIZE {
            return 0;
        }

        let mut targets: Vec<Position> = Vec::with_capacity(positions.len());
        for &pos in positions {
            if !self.grid.is_occupied(pos) {
                debug!(x = pos.x, y = pos.y, "blast ignores empty or invalid position");
                continue;
            }
            if !targets.contains(&pos) {
                targets.push(pos);
            }
        }
        if targets.len() < MIN_GROUP_SIZE {
            return 0;
        }

        self.phase = BoardPhase::Blasting;
        for &pos in &targets {
            self.grid.set(pos, None);
        }
        let count = targets.len();
        debug!(count, "blocks blasted");
        self.sink.emit(BoardEvent::BlocksBlasted { count });

        let falls = self.apply_gravity();
        let spawned = self.fill_empty();
        self.last_cascade = CascadeReport {
            blasted: targets,
            falls,
            spawned,
        };
        self.check_cascade();

        count
    }

    /// Blast the group under `pos` (click routing). Returns blocks removed.
    pub fn blast_at(&mut self, pos: Position) -> usize {
        match self.find_group_at(pos) {
            Some(group) => self.blast_group(&group.positions),
            None => 0,
        }
    }

    /// Compact every column downward. Returns the moves made.
    pub fn apply_gravity(&mut self) -> Vec<BlockFall> {
        self.phase = BoardPhase::ApplyingGravity;
        let falls = self.grid.apply_gravity();
        debug!(falls = falls.len(), "gravity applied");
        falls
    }

    /// Fill every empty cell with a random color. Skipped entirely when the
    /// board is inactive.
    pub fn fill_empty(&mut self) -> Vec<Spawn> {
        if !self.active {
            debug!("fill skipped: board inactive");
            return Vec::new();
        }

        self.phase = BoardPhase::Filling;
        let empty: Vec<Position> = self
            .grid
            .positions()
            .filter(|&pos| !self.grid.is_occupied(pos))
            .collect();

        let mut spawned = Vec::with_capacity(empty.len());
        for position in empty {
            let color = self.random_color();
            self.grid.set(position, Some(color));
            spawned.push(Spawn { position, color });
        }
        debug!(spawned = spawned.len(), "empty cells filled");
        spawned
    }

    /// Reclassify icons and evaluate deadlock. Emits `Deadlock` when no move
    /// remains (and shuffles if auto-shuffle is enabled on an active board),
    /// then `BoardStable`. Returns whether a deadlock was found.
    pub fn check_cascade(&mut self) -> bool {
        self.phase = BoardPhase::CheckingCascade;
        self.reclassify();

        let deadlocked = deadlock::is_deadlocked(&self.grid);
        if deadlocked {
            info!(episode_id = self.episode_id, "board deadlocked");
            self.sink.emit(BoardEvent::Deadlock);
            if self.active && self.config.auto_shuffle_on_deadlock {
                // shuffle() emits its own BoardStable.
                self.shuffle();
                return true;
            }
        }

        self.finish();
        deadlocked
    }

    /// Rearrange the existing blocks so a move exists, if one can.
    pub fn shuffle(&mut self) -> ShuffleOutcome {
        self.phase = BoardPhase::Shuffling;
        let outcome = shuffle::shuffle(&mut self.grid, &mut self.rng);
        info!(outcome = outcome.as_str(), "board shuffled");

        self.reclassify();
        self.sink.emit(BoardEvent::Shuffled { outcome });
        self.finish();
        outcome
    }

    /// Mark the level as over. Later refills become no-ops.
    pub fn stop(&mut self) {
        if !self.active && self.phase == BoardPhase::Stopped {
            return;
        }
        self.active = false;
        self.phase = BoardPhase::Stopped;
        info!(episode_id = self.episode_id, "board stopped");
    }

    fn random_color(&mut self) -> Color {
        let index = self.rng.next_range(self.config.color_count as u32) as u8;
        Color::from_index(index).unwrap_or(Color::Red)
    }

    fn reclassify(&mut self) {
        self.icons = groups::classify_icons(&self.grid, &self.config.thresholds);
    }

    fn finish(&mut self) {
        self.phase = if self.active {
            BoardPhase::Stable
        } else {
            BoardPhase::Stopped
        };
        self.sink.emit(BoardEvent::BoardStable);
    }
}
