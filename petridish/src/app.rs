use crate::bacterium::Bacterium;
use crate::collision;
use crate::config::{self, ControlPanel, Surface};
use crate::error::Result;
use crate::genome::{Mutation, Mutations, Team};
use crate::snapshot::{Snapshot, Sprite, TickEvents};
use crate::stablevec::{Handle, StableVec};
use crate::vecmath::Vector;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg as DetRng;
use rayon::prelude::ParallelIterator;
use std::time::Duration;
use tracing::{debug, info};

/// the whole simulation state.
/// everything goes through &mut self, so a tick or a command always runs to
/// completion before the next one starts.
#[derive(Debug)]
pub struct Simulation {
    pub(crate) population: StableVec<Bacterium>,
    pub(crate) rng: DetRng,
    pub(crate) surface: Surface,
    /// the bacterium currently held by the pointer, it neither moves nor divides
    pub(crate) dragging: Option<Handle>,
    /// simulation clock, set by the last tick
    pub(crate) now: Duration,
    pub(crate) ticks: u64,
}

impl Simulation {
    pub fn new(seed: u64, surface: Surface) -> Self {
        Self {
            population: StableVec::with_capacity(
                Team::ALL.len() * config::MAX_POPULATION_PER_TEAM as usize,
            ),
            rng: DetRng::seed_from_u64(seed),
            surface,
            dragging: None,
            now: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }
    /// changes the dish size, a bad size leaves the old one in place
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.surface = Surface::new(width, height)?;
        Ok(())
    }
    pub fn now(&self) -> Duration {
        self.now
    }
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
    pub fn len(&self) -> usize {
        self.population.len()
    }
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }
    pub fn get(&self, h: Handle) -> Option<&Bacterium> {
        self.population.get(h)
    }
    pub fn bacteria(&self) -> impl Iterator<Item = (Handle, &Bacterium)> {
        self.population.iter()
    }
    pub fn dragging(&self) -> Option<Handle> {
        self.dragging
    }
    pub fn team_count(&self, team: Team) -> usize {
        self.population.values().filter(|b| b.team == team).count()
    }

    fn team_counts(&self) -> [usize; Team::ALL.len()] {
        let mut counts = [0; Team::ALL.len()];
        for b in self.population.values() {
            counts[b.team.index()] += 1;
        }
        counts
    }

    fn random_pos(&mut self) -> Vector {
        [
            self.rng.random_range(0.0..self.surface.width()),
            self.rng.random_range(0.0..self.surface.height()),
        ]
    }

    /// places a new bacterium at an exact position
    pub fn spawn_at(
        &mut self,
        team: Team,
        pos: Vector,
        generation: u32,
        mutations: Mutations,
    ) -> Handle {
        let b = Bacterium::new(&mut self.rng, team, pos, generation, mutations, self.now);
        self.population.add(b)
    }

    /// places a new bacterium somewhere on the surface
    pub fn spawn(&mut self, team: Team, generation: u32, mutation: Option<Mutation>) -> Handle {
        let pos = self.random_pos();
        self.spawn_at(team, pos, generation, mutation.into())
    }

    /// one bacterium per team
    pub fn spawn_all_teams(&mut self, generation: u32, mutation: Option<Mutation>) -> Vec<Handle> {
        Team::ALL
            .into_iter()
            .map(|team| self.spawn(team, generation, mutation))
            .collect()
    }

    /// a plain generation 0 bacterium of a random team
    pub fn spawn_random(&mut self) -> Handle {
        let team = Team::random(&mut self.rng);
        self.spawn(team, 0, None)
    }

    /// spawns whatever the panel currently has selected
    pub fn spawn_selected(&mut self, panel: &impl ControlPanel) -> Result<Handle> {
        let team = panel.team()?;
        let generation = panel.generation()?;
        let mutation = panel.mutation()?;
        Ok(self.spawn(team, generation, mutation))
    }

    /// like spawn_selected, but ignores the selected team and spawns all of them
    pub fn spawn_all_selected(&mut self, panel: &impl ControlPanel) -> Result<Vec<Handle>> {
        let generation = panel.generation()?;
        let mutation = panel.mutation()?;
        Ok(self.spawn_all_teams(generation, mutation))
    }

    /// removes every bacterium the point lies in.
    /// returns how many died
    pub fn kill_near(&mut self, point: Vector) -> usize {
        let victims: Vec<Handle> = self
            .population
            .iter()
            .filter(|(_, b)| b.covers(point))
            .map(|(h, _)| h)
            .collect();
        self.bury(victims).0
    }

    /// grabs the first bacterium under the point
    pub fn pick_for_drag(&mut self, point: Vector) -> Option<Handle> {
        self.dragging = self
            .population
            .iter()
            .find(|(_, b)| b.covers(point))
            .map(|(h, _)| h);
        self.dragging
    }

    /// moves the held bacterium, no physics involved.
    /// returns false if the handle is not the one being dragged or it died meanwhile
    pub fn drag_move(&mut self, h: Handle, point: Vector) -> bool {
        if self.dragging != Some(h) {
            return false;
        }
        match self.population.get_mut(h) {
            Some(b) => {
                b.pos = point;
                true
            }
            None => false,
        }
    }

    pub fn release_drag(&mut self) {
        self.dragging = None;
    }

    /// empties the dish
    pub fn restart(&mut self) {
        info!(removed = self.population.len(), "restarting");
        self.population.clear();
        self.dragging = None;
    }

    /// removes the given bacteria, fertile ones leave offspring behind.
    /// handles that are already dead are skipped, so duplicates are fine.
    /// returns (deaths, fertile spawns)
    fn bury(&mut self, doomed: Vec<Handle>) -> (usize, usize) {
        let mut deaths = 0;
        let mut spawns = 0;
        for h in doomed {
            let Some(b) = self.population.get(h) else {
                continue;
            };
            let team = b.team;
            if b.has(Mutation::FertileDeath) {
                for _ in 0..config::b::FERTILE_OFFSPRING {
                    self.spawn(team, 0, None);
                }
                spawns += config::b::FERTILE_OFFSPRING;
                debug!(team = team.name(), "fertile death");
            }
            self.population.remove(h);
            deaths += 1;
        }
        (deaths, spawns)
    }

    /// advances the simulation to `now`.
    ///
    /// every bacterium that is not being dragged moves and, if its time has come
    /// and its team has room, divides. then all pairs are checked for collisions
    /// and the losers of fights are removed.
    pub fn tick(&mut self, now: Duration, panel: &impl ControlPanel) -> Result<Snapshot> {
        // read before touching anything, a bad value must not leave half a tick behind
        let max_population = panel.max_population_per_team()?;
        self.now = now;
        self.ticks += 1;

        let dragging = self.dragging;
        let surface = self.surface;
        // everyone alive right now gets updated, children born during this tick wait
        // for the next one
        let present = self.population.handles();

        self.population
            .par_iter_mut()
            .filter(|(h, _)| Some(*h) != dragging)
            .for_each(|(_, b)| b.motion(&surface));

        let mut counts = self.team_counts();
        let mut divisions = 0;
        for h in present {
            if Some(h) == dragging {
                continue;
            }
            let Some(b) = self.population.get_mut(h) else {
                continue;
            };
            let team = b.team.index();
            if !b.division_due(now, counts[team], max_population) {
                continue;
            }
            let children = b.divide(&mut self.rng, now);
            debug!(
                team = b.team.name(),
                generation = b.generation + 1,
                mutations = ?children.iter().map(|c| c.mutations).collect::<Vec<_>>(),
                "division"
            );
            self.population.remove(h);
            self.population.extend(children);
            counts[team] += 1;
            divisions += 1;
        }

        let doomed = collision::resolve(&mut self.population);
        let (deaths, fertile_spawns) = self.bury(doomed);

        let mut snapshot = self.snapshot();
        snapshot.events = TickEvents {
            divisions,
            deaths,
            fertile_spawns,
        };
        Ok(snapshot)
    }

    /// the current population as something drawable
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.now,
            sprites: self
                .population
                .iter()
                .map(|(h, b)| Sprite::new(h, b))
                .collect(),
            events: TickEvents::default(),
        }
    }
}
