use crate::app::{CycleReport, RunSummary, Stop};
use crate::config::SimConfig;
use crate::grid::{Cell, Grid};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Display side of the cycle loop. The driver hands over snapshots only.
pub(crate) trait Renderer {
    fn begin(&mut self, _config: &SimConfig) -> anyhow::Result<()> {
        Ok(())
    }
    fn frame(&mut self, cycle: u64, grid: &Grid<Cell>) -> anyhow::Result<()>;
    fn report(&mut self, report: &CycleReport, config: &SimConfig) -> anyhow::Result<Flow>;
    fn finish(&mut self, summary: &RunSummary) -> anyhow::Result<()>;
}

pub(crate) fn status_line(config: &SimConfig) -> String {
    format!(
        "size: {}, pCatch: {:.2}, density: {:.2}, pBurning: {:.2}, pNeighbor: {:.2}",
        config.size,
        config.catch_fire_percent as f64 / 100.0,
        config.density as f64 / 100.0,
        config.burning_percent as f64 / 100.0,
        config.neighbor_effect as f64 / 100.0,
    )
}

pub(crate) fn grid_lines(grid: &Grid<Cell>) -> impl Iterator<Item = String> + '_ {
    grid.rows().map(|row| row.iter().map(|c| c.glyph()).collect())
}

/// Plain line-oriented output: print mode, and the body of overlay mode.
pub(crate) struct Console<W: Write> {
    out: W,
    eol: &'static str,
    banner: bool,
}

impl<W: Write> Console<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            eol: "\n",
            banner: true,
        }
    }

    fn line(&mut self, s: &str) -> io::Result<()> {
        write!(self.out, "{s}{}", self.eol)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for Console<W> {
    fn begin(&mut self, config: &SimConfig) -> anyhow::Result<()> {
        if !self.banner {
            return Ok(());
        }
        let steps = config.max_cycles.unwrap_or(0);
        self.line("===========================")?;
        self.line("======== Wildfire =========")?;
        self.line("===========================")?;
        self.line(&format!("=== Print {steps:02} Time Steps ==="))?;
        self.line("===========================")?;
        Ok(())
    }

    fn frame(&mut self, cycle: u64, grid: &Grid<Cell>) -> anyhow::Result<()> {
        self.line(&format!("Cycle: {cycle}"))?;
        for row in grid_lines(grid) {
            self.line(&row)?;
        }
        Ok(())
    }

    fn report(&mut self, report: &CycleReport, config: &SimConfig) -> anyhow::Result<Flow> {
        self.line(&status_line(config))?;
        if let Some(hit) = report.strike.filter(|s| s.ignited) {
            self.line(&format!("Lightning struck at ({}, {})!", hit.row, hit.col))?;
        }
        self.line(&format!(
            "cycle: {}, current changes: {}, cumulative changes: {}",
            report.cycle, report.changes, report.cumulative_changes
        ))?;
        if report.extinguished {
            self.line("Fires are out.")?;
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn finish(&mut self, summary: &RunSummary) -> anyhow::Result<()> {
        if summary.stop == Stop::Interrupted {
            self.line("Interrupted.")?;
        }
        self.line(&format!(
            "Simulation finished after {} cycles.",
            summary.cycles
        ))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Raw mode lets us read single keys while pacing; restored on drop.
struct TermGuard;

impl TermGuard {
    fn new(out: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(out, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Redraws each cycle in place at the top of the screen.
pub(crate) struct Overlay {
    console: Console<Stdout>,
    delay: Duration,
    _guard: TermGuard,
}

impl Overlay {
    pub(crate) fn start(delay: Duration) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        let guard = TermGuard::new(&mut out)?;
        Ok(Self {
            console: Console {
                out,
                eol: "\r\n",
                banner: false,
            },
            delay,
            _guard: guard,
        })
    }

    /// Sleeps out the frame delay, watching for a quit key.
    fn pace(&self) -> anyhow::Result<Flow> {
        let deadline = Instant::now() + self.delay;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() || !event::poll(left)? {
                return Ok(Flow::Continue);
            }
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c =
                    k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || matches!(k.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(Flow::Quit);
                }
            }
        }
    }
}

impl Renderer for Overlay {
    fn frame(&mut self, cycle: u64, grid: &Grid<Cell>) -> anyhow::Result<()> {
        queue!(self.console.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        self.console.frame(cycle, grid)
    }

    fn report(&mut self, report: &CycleReport, config: &SimConfig) -> anyhow::Result<Flow> {
        self.console.report(report, config)?;
        if report.extinguished {
            return Ok(Flow::Continue);
        }
        self.pace()
    }

    fn finish(&mut self, summary: &RunSummary) -> anyhow::Result<()> {
        self.console.finish(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse;
    use crate::sim::Strike;

    fn text(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn glyphs_per_state() {
        assert_eq!(Cell::Empty.glyph(), ' ');
        assert_eq!(Cell::Tree.glyph(), 'Y');
        assert_eq!(Cell::Burning.glyph(), '*');
        assert_eq!(Cell::Burned.glyph(), '.');
    }

    #[test]
    fn status_line_uses_two_decimals() {
        let cfg = SimConfig::default();
        assert_eq!(
            status_line(&cfg),
            "size: 10, pCatch: 0.30, density: 0.50, pBurning: 0.10, pNeighbor: 0.25"
        );
    }

    #[test]
    fn frame_prints_cycle_and_rows() {
        let mut c = Console::new(Vec::new());
        let g = parse(&["Y* .Y", "     ", ".....", "*****", "YYYYY"]);
        c.frame(4, &g).unwrap();
        assert_eq!(text(c), "Cycle: 4\nY* .Y\n     \n.....\n*****\nYYYYY\n");
    }

    #[test]
    fn banner_shows_requested_steps() {
        let mut c = Console::new(Vec::new());
        let cfg = SimConfig {
            max_cycles: Some(7),
            ..SimConfig::default()
        };
        c.begin(&cfg).unwrap();
        assert!(text(c).contains("=== Print 07 Time Steps ===\n"));
    }

    #[test]
    fn report_announces_lightning_and_extinction() {
        let mut c = Console::new(Vec::new());
        let cfg = SimConfig::default();
        let report = CycleReport {
            cycle: 2,
            changes: 5,
            cumulative_changes: 11,
            strike: Some(Strike {
                row: 1,
                col: 3,
                ignited: true,
            }),
            extinguished: true,
        };
        assert_eq!(c.report(&report, &cfg).unwrap(), Flow::Continue);
        let out = text(c);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], status_line(&cfg));
        assert_eq!(lines[1], "Lightning struck at (1, 3)!");
        assert_eq!(lines[2], "cycle: 2, current changes: 5, cumulative changes: 11");
        assert_eq!(lines[3], "Fires are out.");
    }

    #[test]
    fn wasted_strike_is_not_announced() {
        let mut c = Console::new(Vec::new());
        let report = CycleReport {
            cycle: 0,
            changes: 1,
            cumulative_changes: 1,
            strike: Some(Strike {
                row: 0,
                col: 0,
                ignited: false,
            }),
            extinguished: false,
        };
        c.report(&report, &SimConfig::default()).unwrap();
        assert!(!text(c).contains("Lightning"));
    }

    #[test]
    fn finish_reports_cycle_count() {
        let mut c = Console::new(Vec::new());
        c.finish(&RunSummary {
            cycles: 12,
            cumulative_changes: 40,
            stop: Stop::Extinguished,
        })
        .unwrap();
        assert_eq!(text(c), "Simulation finished after 12 cycles.\n");
    }
}
