use std::time::Duration;

use ice_slide_core::{CellCoord, Command, ConfigurationError, Direction, Event};
use ice_slide_system_builder::Builder;
use ice_slide_system_catalog::MapCatalog;
use ice_slide_system_levels::{Advance, LevelSequencer, ProgressTracker};
use ice_slide_system_movement::{Movement, MovementConfig};
use ice_slide_world::{self as world, query, World};
use log::{debug, error, info, warn};

/// Collects the collaborators a [`Session`] needs before play can start.
#[derive(Debug)]
pub(crate) struct SessionBuilder {
    catalog: Option<MapCatalog>,
    builder: Option<Builder>,
    movement: MovementConfig,
    sequencer: LevelSequencer,
    progress: ProgressTracker,
    auto_load: bool,
}

impl SessionBuilder {
    pub(crate) fn new(sequencer: LevelSequencer, progress: ProgressTracker) -> Self {
        Self {
            catalog: None,
            builder: None,
            movement: MovementConfig::default(),
            sequencer,
            progress,
            auto_load: true,
        }
    }

    pub(crate) fn with_catalog(mut self, catalog: MapCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub(crate) fn with_builder(mut self, builder: Builder) -> Self {
        self.builder = Some(builder);
        self
    }

    pub(crate) fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    /// Controls whether the current level is built when the session starts.
    pub(crate) fn auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    /// Wires the session, failing when the catalog or builder is absent.
    pub(crate) fn build(self) -> Result<Session, ConfigurationError> {
        let catalog = require(self.catalog, ConfigurationError::MissingCatalog)?;
        let builder = require(self.builder, ConfigurationError::MissingBuilder)?;

        let mut session = Session {
            catalog,
            builder,
            world: World::new(),
            movement: Movement::new(self.movement),
            sequencer: self.sequencer,
            progress: self.progress,
            goals_reached: 0,
        };
        if self.auto_load {
            let _ = session.load_current_level();
        }
        Ok(session)
    }
}

fn require<T>(value: Option<T>, missing: ConfigurationError) -> Result<T, ConfigurationError> {
    value.ok_or_else(|| {
        error!("{missing}; session not started");
        missing
    })
}

/// Single-threaded play loop tying the map pipeline to the slide engine.
#[derive(Debug)]
pub(crate) struct Session {
    catalog: MapCatalog,
    builder: Builder,
    world: World,
    movement: Movement,
    sequencer: LevelSequencer,
    progress: ProgressTracker,
    goals_reached: usize,
}

impl Session {
    /// Builds the sequencer's current level, falling back to the first map
    /// when the catalog has no map of that id.
    pub(crate) fn load_current_level(&mut self) -> bool {
        let Some(level_id) = self.sequencer.current_id() else {
            warn!("no level selected; nothing to load");
            return false;
        };

        let mut commands = Vec::new();
        let map = self.catalog.get_or_first(level_id);
        if self.builder.handle(map, &mut commands).is_err() {
            return false;
        }
        info!("loading level {level_id}");

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.dispatch(events, None);
        true
    }

    /// Switches to the level named `id` when it is unlocked.
    ///
    /// A rejected selection keeps the current level, building it first when
    /// no map is loaded yet.
    pub(crate) fn select_level(&mut self, id: &str) -> bool {
        if !self.progress.is_unlocked(id) {
            warn!("level {id} is locked");
            self.keep_current_level();
            return false;
        }
        let mut changes = Vec::new();
        if let Err(rejection) = self.sequencer.select_id(id, &mut changes) {
            warn!("{rejection}");
            self.keep_current_level();
            return false;
        }
        announce(&changes);
        self.load_current_level()
    }

    fn keep_current_level(&mut self) {
        if query::map_id(&self.world).is_none() {
            let _ = self.load_current_level();
        }
    }

    /// Feeds one directional input to the slide engine.
    pub(crate) fn press(&mut self, direction: Direction) {
        self.dispatch(Vec::new(), Some(direction));
    }

    /// Advances simulated time by `dt`.
    pub(crate) fn tick(&mut self, dt: Duration) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.dispatch(events, None);
    }

    pub(crate) fn is_sliding(&self) -> bool {
        self.movement.is_sliding()
    }

    pub(crate) fn current_level(&self) -> Option<&str> {
        self.sequencer.current_id()
    }

    pub(crate) fn actor_cell(&self) -> Option<CellCoord> {
        query::actor(&self.world).map(|actor| actor.cell)
    }

    pub(crate) fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub(crate) fn goals_reached(&self) -> usize {
        self.goals_reached
    }

    fn dispatch(&mut self, events: Vec<Event>, input: Option<Direction>) {
        let mut commands = Vec::new();
        {
            let grid = query::grid_view(&self.world);
            let actor = query::actor(&self.world);
            self.movement
                .handle(&events, input, &grid, actor, &mut commands);
        }

        let mut produced = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut produced);
        }
        if produced
            .iter()
            .any(|event| matches!(event, Event::GoalReached { .. }))
        {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        self.goals_reached += 1;
        let Some(level_id) = self.sequencer.current_id().map(str::to_owned) else {
            return;
        };
        if self.progress.complete(&level_id) {
            info!("level {level_id} completed");
        }

        let mut changes = Vec::new();
        if self.sequencer.next(&mut changes) == Advance::Wrapped {
            info!("every level completed");
        }
        announce(&changes);
        let _ = self.load_current_level();
    }
}

fn announce(changes: &[Event]) {
    for change in changes {
        if let Event::LevelChanged { index } = change {
            debug!("level index changed to {index}");
        }
    }
}
