use crate::config::{Args, DisplayMode, SimConfig};
use crate::grid::{plant, Cell, Grid};
use crate::render::{Console, Flow, Overlay, Renderer};
use crate::rng::{seeded, RandomSource};
use crate::sim::{step, strike, Strike};
use anyhow::Context;
use clap::Parser;
use std::io;
use tracing::{debug, info};

/// Why a run halted. All of these are normal endings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stop {
    /// No cell is left burning.
    Extinguished,
    /// The requested number of cycles has been shown.
    CycleLimit,
    /// The viewer asked to quit.
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CycleReport {
    pub(crate) cycle: u64,
    pub(crate) changes: usize,
    pub(crate) cumulative_changes: u64,
    pub(crate) strike: Option<Strike>,
    pub(crate) extinguished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) cycles: u64,
    pub(crate) cumulative_changes: u64,
    pub(crate) stop: Stop,
}

/// Run state: both grid buffers and the burn counters, owned for the whole
/// run. `current` is never written while `next` is being computed.
pub(crate) struct Simulation {
    config: SimConfig,
    current: Grid<Cell>,
    next: Grid<Cell>,
    burn: Grid<u8>,
    cycle: u64,
    cumulative_changes: u64,
}

impl Simulation {
    pub(crate) fn new(config: SimConfig, rng: &mut impl RandomSource) -> Self {
        let grid = plant(config.size, config.density, config.burning_percent, rng);
        Self::from_grid(config, grid)
    }

    pub(crate) fn from_grid(config: SimConfig, grid: Grid<Cell>) -> Self {
        let size = grid.size();
        Self {
            config,
            next: Grid::new(size),
            burn: Grid::new(size),
            current: grid,
            cycle: 0,
            cumulative_changes: 0,
        }
    }

    pub(crate) fn grid(&self) -> &Grid<Cell> {
        &self.current
    }

    pub(crate) fn cycle(&self) -> u64 {
        self.cycle
    }

    fn at_cycle_limit(&self) -> bool {
        matches!(self.config.max_cycles, Some(max) if self.cycle >= max)
    }

    /// Lightning, then one transition. On extinguishment the buffers stay
    /// put and the cycle index does not move; otherwise `next` becomes
    /// `current`.
    pub(crate) fn advance(&mut self, rng: &mut impl RandomSource) -> CycleReport {
        let hit = strike(&mut self.current, &mut self.burn, &self.config, rng);
        if let Some(s) = hit {
            debug!(row = s.row, col = s.col, ignited = s.ignited, "lightning");
        }

        let changes = step(
            &self.current,
            &mut self.next,
            &mut self.burn,
            &self.config,
            rng,
        );
        self.cumulative_changes += changes as u64;
        let extinguished = !self.next.contains(Cell::Burning);
        debug!(cycle = self.cycle, changes, extinguished, "cycle");

        let report = CycleReport {
            cycle: self.cycle,
            changes,
            cumulative_changes: self.cumulative_changes,
            strike: hit,
            extinguished,
        };
        if !extinguished {
            std::mem::swap(&mut self.current, &mut self.next);
            self.cycle += 1;
        }
        report
    }

    pub(crate) fn run(
        &mut self,
        rng: &mut impl RandomSource,
        renderer: &mut impl Renderer,
    ) -> anyhow::Result<RunSummary> {
        renderer.begin(&self.config)?;
        let stop = loop {
            renderer.frame(self.cycle, &self.current)?;
            if self.at_cycle_limit() {
                break Stop::CycleLimit;
            }
            let report = self.advance(rng);
            let flow = renderer.report(&report, &self.config)?;
            if report.extinguished {
                break Stop::Extinguished;
            }
            if flow == Flow::Quit {
                break Stop::Interrupted;
            }
        };

        let summary = RunSummary {
            cycles: self.cycle,
            cumulative_changes: self.cumulative_changes,
            stop,
        };
        info!(?summary, "simulation finished");
        renderer.finish(&summary)?;
        Ok(summary)
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.to_config()?;
    let (mut rng, seed) = seeded(args.seed);
    info!(?config, seed, "starting wildfire");

    let mut sim = Simulation::new(config, &mut rng);
    match args.display_mode() {
        DisplayMode::Print => {
            let mut console = Console::new(io::stdout().lock());
            sim.run(&mut rng, &mut console)?;
        }
        DisplayMode::Overlay => {
            let mut overlay =
                Overlay::start(args.frame_delay()).context("could not set up the terminal")?;
            sim.run(&mut rng, &mut overlay)?;
        }
    }
    debug!(
        cycle = sim.cycle(),
        burned = sim.grid().count(Cell::Burned),
        standing = sim.grid().count(Cell::Tree),
        "final grid"
    );
    Ok(())
}
