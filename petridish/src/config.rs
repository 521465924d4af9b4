use crate::error::{ConfigError, Result};
use crate::genome::{Mutation, Team};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SURFACE_WIDTH: f64 = 800.;
pub const SURFACE_HEIGHT: f64 = 600.;

pub const MAX_POPULATION_PER_TEAM: u32 = 50;
pub const SPAWN_INTERVAL_SECONDS: u32 = 5;

/// bacterium constants
pub mod b {
    /// size of a generation 0 bacterium, every generation adds 1
    pub const BASE_SIZE: f64 = 5.;
    /// bacteria slow down to this and never speed up again
    pub const MAX_SPEED: f64 = 1.3;
    /// chance per division that the children mutate
    pub const MUTATION_CHANCE: f64 = 0.05;
    /// children are placed this many sizes away from the parent, in opposite directions
    pub const SPLIT_OFFSET: f64 = 2.;
    /// bacteria left behind by a fertile death
    pub const FERTILE_OFFSPRING: usize = 3;

    /// division time ranges, in seconds
    pub const DIVISION_SECS: std::ops::Range<f64> = 10.0..15.;
    pub const FAST_DIVISION_SECS: std::ops::Range<f64> = 5.0..10.;
}

/// the area bacteria live on, [0, width] x [0, height].
/// both sides are always positive, build one with `Surface::new`
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    width: f64,
    height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let check = |field, v: f64| {
            if v.is_finite() && v > 0. {
                Ok(v)
            } else {
                Err(ConfigError::OutOfRange {
                    field,
                    value: v.to_string(),
                    expected: "a positive number",
                })
            }
        };
        Ok(Self {
            width: check("width", width)?,
            height: check("height", height)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

/// values the user can change while the simulation runs.
/// they are read again every time they matter, never cached.
pub trait ControlPanel {
    fn max_population_per_team(&self) -> Result<u32>;
    fn spawn_interval(&self) -> Result<Duration>;
    /// team for manual spawns
    fn team(&self) -> Result<Team>;
    /// generation for manual spawns
    fn generation(&self) -> Result<u32>;
    /// mutation for manual spawns, if any
    fn mutation(&self) -> Result<Option<Mutation>>;
}

fn interval_from_secs(secs: u32, raw: impl ToString) -> Result<Duration> {
    if secs == 0 {
        return Err(ConfigError::OutOfRange {
            field: "spawn_interval_seconds",
            value: raw.to_string(),
            expected: "at least 1",
        });
    }
    Ok(Duration::from_secs(secs.into()))
}

/// settings for a headless run, usually read from a toml file.
/// missing keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub seed: u64,
    pub surface: Surface,
    pub max_population_per_team: u32,
    pub spawn_interval_seconds: u32,
    pub random_spawn: bool,
    pub team: Team,
    pub generation: u32,
    pub mutation: Option<Mutation>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1234,
            surface: Surface::default(),
            max_population_per_team: MAX_POPULATION_PER_TEAM,
            spawn_interval_seconds: SPAWN_INTERVAL_SECONDS,
            random_spawn: false,
            team: Team::Yellow,
            generation: 0,
            mutation: None,
        }
    }
}

impl Settings {
    pub fn from_toml(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s)?;
        // re-validate, serde happily takes negative sizes
        Surface::new(settings.surface.width, settings.surface.height)?;
        Ok(settings)
    }
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl ControlPanel for Settings {
    fn max_population_per_team(&self) -> Result<u32> {
        Ok(self.max_population_per_team)
    }
    fn spawn_interval(&self) -> Result<Duration> {
        interval_from_secs(self.spawn_interval_seconds, self.spawn_interval_seconds)
    }
    fn team(&self) -> Result<Team> {
        Ok(self.team)
    }
    fn generation(&self) -> Result<u32> {
        Ok(self.generation)
    }
    fn mutation(&self) -> Result<Option<Mutation>> {
        Ok(self.mutation)
    }
}

/// control values as a ui hands them over: unparsed text.
/// parsing happens on every read so a bad value is reported when it is used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawControls {
    pub max_population_per_team: String,
    pub spawn_interval_seconds: String,
    pub team: String,
    pub generation: String,
    /// empty means no mutation
    pub mutation: String,
}

fn parse_u32(field: &'static str, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        field,
        value: raw.to_owned(),
    })
}

impl ControlPanel for RawControls {
    fn max_population_per_team(&self) -> Result<u32> {
        parse_u32("max_population_per_team", &self.max_population_per_team)
    }
    fn spawn_interval(&self) -> Result<Duration> {
        let raw = &self.spawn_interval_seconds;
        interval_from_secs(parse_u32("spawn_interval_seconds", raw)?, raw)
    }
    fn team(&self) -> Result<Team> {
        self.team.parse()
    }
    fn generation(&self) -> Result<u32> {
        parse_u32("generation", &self.generation)
    }
    fn mutation(&self) -> Result<Option<Mutation>> {
        if self.mutation.trim().is_empty() {
            Ok(None)
        } else {
            self.mutation.parse().map(Some)
        }
    }
}

#[test]
fn settings_defaults_and_overrides() {
    let s = Settings::from_toml(
        r#"
        seed = 7
        max_population_per_team = 3
        mutation = "fertile-death"

        [surface]
        width = 100.0
        height = 50.0
        "#,
    )
    .unwrap();
    assert_eq!(s.seed, 7);
    assert_eq!(s.max_population_per_team().unwrap(), 3);
    assert_eq!(s.mutation().unwrap(), Some(Mutation::FertileDeath));
    assert_eq!(s.surface, Surface::new(100., 50.).unwrap());
    assert_eq!(s.spawn_interval_seconds, SPAWN_INTERVAL_SECONDS);
    assert_eq!(s.team().unwrap(), Team::Yellow);
}

#[test]
fn settings_reject_garbage() {
    assert!(matches!(
        Settings::from_toml("colour = \"mauve\""),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        Settings::from_toml("[surface]\nwidth = -1.0\nheight = 10.0"),
        Err(ConfigError::OutOfRange { field: "width", .. })
    ));
    let s = Settings {
        spawn_interval_seconds: 0,
        ..Default::default()
    };
    assert!(s.spawn_interval().is_err());
}

#[test]
fn raw_controls_parse_on_read() {
    let mut c = RawControls {
        max_population_per_team: " 12 ".into(),
        spawn_interval_seconds: "2".into(),
        team: "blue".into(),
        generation: "3".into(),
        mutation: "".into(),
    };
    assert_eq!(c.max_population_per_team().unwrap(), 12);
    assert_eq!(c.spawn_interval().unwrap(), Duration::from_secs(2));
    assert_eq!(c.team().unwrap(), Team::Blue);
    assert_eq!(c.generation().unwrap(), 3);
    assert_eq!(c.mutation().unwrap(), None);

    c.max_population_per_team = "lots".into();
    c.mutation = "fastReproduction".into();
    assert!(matches!(
        c.max_population_per_team(),
        Err(ConfigError::Invalid {
            field: "max_population_per_team",
            ..
        })
    ));
    assert_eq!(c.mutation().unwrap(), Some(Mutation::FastReproduction));
    c.spawn_interval_seconds = "0".into();
    assert!(matches!(
        c.spawn_interval(),
        Err(ConfigError::OutOfRange { .. })
    ));
}
