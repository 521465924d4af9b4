use crate::error::ConfigError;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

/// allegiance of a bacterium, also its colour.
/// bacteria of the same team push each other away, all others fight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Team {
    Yellow,
    Red,
    Green,
    Blue,
    Pink,
}

impl Team {
    pub const ALL: [Team; 5] = [Team::Yellow, Team::Red, Team::Green, Team::Blue, Team::Pink];

    pub fn random<R: Rng>(mut rng: R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
    /// position in [`Team::ALL`], handy for per-team tables
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn name(self) -> &'static str {
        match self {
            Team::Yellow => "yellow",
            Team::Red => "red",
            Team::Green => "green",
            Team::Blue => "blue",
            Team::Pink => "pink",
        }
    }
}

impl FromStr for Team {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Team::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownTeam(s.to_owned()))
    }
}

/// heritable traits, picked up with a small chance on every division
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mutation {
    /// divides every 5-10 seconds instead of 10-15
    FastReproduction,
    /// takes the winner down with it when losing a fight
    ExplosiveDeath,
    /// leaves three fresh bacteria of its team behind when it dies
    FertileDeath,
}

impl Mutation {
    pub const ALL: [Mutation; 3] = [
        Mutation::ExplosiveDeath,
        Mutation::FastReproduction,
        Mutation::FertileDeath,
    ];

    pub fn random<R: Rng>(mut rng: R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
    fn bit(self) -> u8 {
        match self {
            Mutation::FastReproduction => 1,
            Mutation::ExplosiveDeath => 1 << 1,
            Mutation::FertileDeath => 1 << 2,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Mutation::FastReproduction => "fast-reproduction",
            Mutation::ExplosiveDeath => "explosive-death",
            Mutation::FertileDeath => "fertile-death",
        }
    }
}

impl FromStr for Mutation {
    type Err = ConfigError;
    /// accepts fast-reproduction, fast_reproduction and fastReproduction alike
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |s: &str| {
            s.chars()
                .filter(|c| *c != '-' && *c != '_')
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        };
        let wanted = squash(s.trim());
        Mutation::ALL
            .into_iter()
            .find(|m| squash(m.name()) == wanted)
            .ok_or_else(|| ConfigError::UnknownMutation(s.to_owned()))
    }
}

/// set of mutations a bacterium carries, one bit per kind.
/// kinds only ever get added.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mutations(u8);

impl Mutations {
    pub fn empty() -> Self {
        Self(0)
    }
    pub fn insert(&mut self, m: Mutation) {
        self.0 |= m.bit();
    }
    #[must_use]
    pub fn with(mut self, m: Mutation) -> Self {
        self.insert(m);
        self
    }
    pub fn contains(self, m: Mutation) -> bool {
        self.0 & m.bit() != 0
    }
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn iter(self) -> impl Iterator<Item = Mutation> {
        Mutation::ALL.into_iter().filter(move |m| self.contains(*m))
    }
    /// the mutation that decides the outline colour.
    /// explosive death beats fast reproduction beats fertile death
    pub fn most_visible(self) -> Option<Mutation> {
        self.iter().next()
    }
}

impl From<Option<Mutation>> for Mutations {
    fn from(m: Option<Mutation>) -> Self {
        m.into_iter().collect()
    }
}

impl FromIterator<Mutation> for Mutations {
    fn from_iter<I: IntoIterator<Item = Mutation>>(iter: I) -> Self {
        let mut s = Self::empty();
        for m in iter {
            s.insert(m);
        }
        s
    }
}

impl std::fmt::Debug for Mutations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[test]
fn outline_priority() {
    let all: Mutations = Mutation::ALL.into_iter().collect();
    assert_eq!(all.most_visible(), Some(Mutation::ExplosiveDeath));
    let m = Mutations::empty()
        .with(Mutation::FertileDeath)
        .with(Mutation::FastReproduction);
    assert_eq!(m.most_visible(), Some(Mutation::FastReproduction));
    assert_eq!(
        Mutations::from(Some(Mutation::FertileDeath)).most_visible(),
        Some(Mutation::FertileDeath)
    );
    assert_eq!(Mutations::empty().most_visible(), None);
}

#[test]
fn insert_is_idempotent() {
    let mut m = Mutations::empty();
    m.insert(Mutation::FertileDeath);
    m.insert(Mutation::FertileDeath);
    assert_eq!(m.len(), 1);
    assert!(m.contains(Mutation::FertileDeath));
    assert!(!m.contains(Mutation::ExplosiveDeath));
}

#[test]
fn parse_names() {
    assert_eq!("Pink".parse::<Team>().unwrap(), Team::Pink);
    assert!("purple".parse::<Team>().is_err());
    for s in ["explosiveDeath", "explosive-death", "EXPLOSIVE_DEATH"] {
        assert_eq!(s.parse::<Mutation>().unwrap(), Mutation::ExplosiveDeath);
    }
    assert!("immortality".parse::<Mutation>().is_err());
    for t in Team::ALL {
        assert_eq!(Team::ALL[t.index()], t);
    }
}
