use clap::{ArgAction, Parser};
use std::time::Duration;
use thiserror::Error;

pub(crate) const MAX_PRINT_CYCLES: u64 = 10_000;

/// Immutable parameters of one run. Always validated before construction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SimConfig {
    pub(crate) size: usize,
    pub(crate) density: u32,
    pub(crate) burning_percent: u32,
    pub(crate) catch_fire_percent: u32,
    pub(crate) neighbor_effect: u32,
    pub(crate) lightning_enabled: bool,
    pub(crate) lightning_chance: f64,
    pub(crate) max_cycles: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 10,
            density: 50,
            burning_percent: 10,
            catch_fire_percent: 30,
            neighbor_effect: 25,
            lightning_enabled: false,
            lightning_chance: 0.01,
            max_cycles: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("(-bN) proportion already burning must be an integer in [1...100].")]
    BurningPercent(u32),
    #[error("(-cN) probability a tree will catch fire must be an integer in [1...100].")]
    CatchFirePercent(u32),
    #[error("(-dN) density of trees in the grid must be an integer in [1...100].")]
    Density(u32),
    #[error("(-nN) %neighbors influence catching fire must be an integer in [0...100].")]
    NeighborEffect(u32),
    #[error("(-pN) number of states to print must be an integer in [0...10000].")]
    PrintCycles(u64),
    #[error("(-sN) simulation grid size must be an integer in [5...40].")]
    Size(usize),
    #[error("(-Ln) lightning probability must be a floating-point number in [0.0...1.0].")]
    LightningChance(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DisplayMode {
    /// Frames scroll past one after another, no pacing.
    Print,
    /// Frames redraw in place at the top of the terminal.
    Overlay,
}

#[derive(Parser, Debug)]
#[command(
    name = "wildfire",
    about = "Wildfire spread on a grid of trees",
    disable_help_flag = true
)]
pub(crate) struct Args {
    /// View simulation options and quit
    #[arg(short = 'H', long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    /// proportion of trees that are already burning, 0 < N < 101
    #[arg(short = 'b', value_name = "N", default_value_t = 10)]
    burning: u32,

    /// probability that a tree will catch fire, 0 < N < 101
    #[arg(short = 'c', value_name = "N", default_value_t = 30)]
    catch_fire: u32,

    /// density: the proportion of trees in the grid, 0 < N < 101
    #[arg(short = 'd', value_name = "N", default_value_t = 50)]
    density: u32,

    /// proportion of neighbors that influence a tree catching fire, -1 < N < 101
    #[arg(short = 'n', value_name = "N", default_value_t = 25)]
    neighbors: u32,

    /// print N states one after another, then quit
    #[arg(short = 'p', value_name = "N")]
    print: Option<u64>,

    /// simulation grid size, 4 < N < 41
    #[arg(short = 's', value_name = "N", default_value_t = 10)]
    size: usize,

    /// enable lightning strikes with the given per-cycle probability
    #[arg(
        short = 'L',
        value_name = "P",
        num_args = 0..=1,
        default_missing_value = "0.01"
    )]
    lightning: Option<f64>,

    /// fixed RNG seed (defaults to the wall clock)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// ms between frames in overlay mode
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,
}

impl Args {
    pub(crate) fn to_config(&self) -> Result<SimConfig, ConfigError> {
        if !(1..=100).contains(&self.burning) {
            return Err(ConfigError::BurningPercent(self.burning));
        }
        if !(1..=100).contains(&self.catch_fire) {
            return Err(ConfigError::CatchFirePercent(self.catch_fire));
        }
        if !(1..=100).contains(&self.density) {
            return Err(ConfigError::Density(self.density));
        }
        if self.neighbors > 100 {
            return Err(ConfigError::NeighborEffect(self.neighbors));
        }
        if let Some(n) = self.print {
            if n > MAX_PRINT_CYCLES {
                return Err(ConfigError::PrintCycles(n));
            }
        }
        if !(5..=40).contains(&self.size) {
            return Err(ConfigError::Size(self.size));
        }
        if let Some(p) = self.lightning {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::LightningChance(p));
            }
        }

        let defaults = SimConfig::default();
        Ok(SimConfig {
            size: self.size,
            density: self.density,
            burning_percent: self.burning,
            catch_fire_percent: self.catch_fire,
            neighbor_effect: self.neighbors,
            lightning_enabled: self.lightning.is_some(),
            lightning_chance: self.lightning.unwrap_or(defaults.lightning_chance),
            max_cycles: self.print,
        })
    }

    pub(crate) fn display_mode(&self) -> DisplayMode {
        if self.print.is_some() {
            DisplayMode::Print
        } else {
            DisplayMode::Overlay
        }
    }

    pub(crate) fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wildfire").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_sim_defaults() {
        let args = parse(&[]);
        assert_eq!(args.to_config().unwrap(), SimConfig::default());
        assert_eq!(args.display_mode(), DisplayMode::Overlay);
        assert_eq!(args.frame_delay(), Duration::from_millis(200));
    }

    #[test]
    fn attached_short_values() {
        let cfg = parse(&["-s20", "-d80", "-b5", "-c60", "-n0", "-p15"])
            .to_config()
            .unwrap();
        assert_eq!(cfg.size, 20);
        assert_eq!(cfg.density, 80);
        assert_eq!(cfg.burning_percent, 5);
        assert_eq!(cfg.catch_fire_percent, 60);
        assert_eq!(cfg.neighbor_effect, 0);
        assert_eq!(cfg.max_cycles, Some(15));
    }

    #[test]
    fn print_flag_switches_display_mode() {
        let args = parse(&["-p0"]);
        assert_eq!(args.display_mode(), DisplayMode::Print);
        assert_eq!(args.to_config().unwrap().max_cycles, Some(0));
    }

    #[test]
    fn lightning_bare_and_valued() {
        let off = parse(&[]).to_config().unwrap();
        assert!(!off.lightning_enabled);

        let bare = parse(&["-L"]).to_config().unwrap();
        assert!(bare.lightning_enabled);
        assert_eq!(bare.lightning_chance, 0.01);

        let valued = parse(&["-L0.25"]).to_config().unwrap();
        assert!(valued.lightning_enabled);
        assert_eq!(valued.lightning_chance, 0.25);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(parse(&["-s4"]).to_config(), Err(ConfigError::Size(4)));
        assert_eq!(parse(&["-s41"]).to_config(), Err(ConfigError::Size(41)));
        assert_eq!(parse(&["-d0"]).to_config(), Err(ConfigError::Density(0)));
        assert_eq!(parse(&["-b101"]).to_config(), Err(ConfigError::BurningPercent(101)));
        assert_eq!(parse(&["-c0"]).to_config(), Err(ConfigError::CatchFirePercent(0)));
        assert_eq!(parse(&["-n101"]).to_config(), Err(ConfigError::NeighborEffect(101)));
        assert_eq!(parse(&["-p10001"]).to_config(), Err(ConfigError::PrintCycles(10_001)));
        assert_eq!(
            parse(&["-L1.5"]).to_config(),
            Err(ConfigError::LightningChance(1.5))
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        let cfg = parse(&["-s5", "-d100", "-b100", "-c100", "-n100", "-L1.0", "-p10000"])
            .to_config()
            .unwrap();
        assert_eq!(cfg.size, 5);
        assert_eq!(cfg.neighbor_effect, 100);
        assert_eq!(cfg.lightning_chance, 1.0);
    }

    #[test]
    fn error_messages_name_the_flag() {
        let msg = ConfigError::Size(3).to_string();
        assert!(msg.starts_with("(-sN)"));
        assert!(ConfigError::PrintCycles(0).to_string().contains("10000"));
    }

    #[test]
    fn negative_numbers_fail_to_parse() {
        let argv = ["wildfire", "-n-1"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
