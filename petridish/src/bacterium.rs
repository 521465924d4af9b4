use crate::config;
use crate::config::Surface;
use crate::genome::{Mutation, Mutations, Team};
use crate::vecmath;
use crate::vecmath::Vector;
use rand::Rng;
use std::f64::consts::{PI, TAU};
use std::time::Duration;

/// a single bacterium.
/// times are measured on the simulation clock, time since the simulation started.
#[derive(Clone, PartialEq, Debug)]
pub struct Bacterium {
    pub team: Team,
    pub pos: Vector,
    pub generation: u32,
    pub mutations: Mutations,
    pub speed: f64,
    /// heading in radians
    pub direction: f64,
    pub division_time: Duration,
    pub last_division: Duration,
}

impl Bacterium {
    pub fn new<R: Rng>(
        mut rng: R,
        team: Team,
        pos: Vector,
        generation: u32,
        mutations: Mutations,
        now: Duration,
    ) -> Self {
        let speed = rng.random_range(1.0..2.);
        let direction = rng.random_range(0.0..TAU);
        Self {
            team,
            pos,
            generation,
            mutations,
            speed,
            direction,
            division_time: division_time(&mut rng, mutations),
            last_division: now,
        }
    }

    /// collision and draw radius, grows with every generation
    pub fn size(&self) -> f64 {
        config::b::BASE_SIZE + self.generation as f64
    }

    pub fn has(&self, m: Mutation) -> bool {
        self.mutations.contains(m)
    }

    /// true if the point is inside the drawn circle (edge included)
    pub fn covers(&self, point: Vector) -> bool {
        vecmath::dist(self.pos, point) <= self.size()
    }

    /// move one step along the heading and bounce off the edges.
    /// the bounce only turns the bacterium around, it may stay outside the
    /// edge band for a step until the new heading carries it back.
    pub fn motion(&mut self, surface: &Surface) {
        let step = vecmath::scale(vecmath::heading(self.direction), self.speed);
        self.pos = vecmath::add(self.pos, step);

        let size = self.size();
        let [x, y] = self.pos;
        if x < size || x > surface.width() - size {
            self.direction = PI - self.direction;
        }
        if y < size || y > surface.height() - size {
            self.direction = -self.direction;
        }

        self.speed = self.speed.min(config::b::MAX_SPEED);
    }

    /// whether the bacterium wants to divide right now.
    /// team_count is the current number of bacteria on its team.
    pub fn division_due(&self, now: Duration, team_count: usize, max_population: u32) -> bool {
        team_count < max_population as usize
            && now.saturating_sub(self.last_division) >= self.division_time
    }

    /// splits into two children of the next generation.
    /// the caller is responsible for replacing self with the children.
    pub fn divide<R: Rng>(&mut self, mut rng: R, now: Duration) -> [Bacterium; 2] {
        self.last_division = now;
        self.division_time = division_time(&mut rng, self.mutations);

        let offset = self.size() * config::b::SPLIT_OFFSET;
        let angle = rng.random_range(0.0..TAU);
        let push = vecmath::scale(vecmath::heading(angle), offset);
        let pos1 = vecmath::add(self.pos, push);
        let pos2 = vecmath::sub(self.pos, push);

        // one roll decides for both children, only the kind is rolled per child
        let chance: f64 = rng.random();
        let mut mutations1 = self.mutations;
        let mut mutations2 = self.mutations;
        if chance < config::b::MUTATION_CHANCE {
            mutations1.insert(Mutation::random(&mut rng));
        }
        if chance < config::b::MUTATION_CHANCE {
            mutations2.insert(Mutation::random(&mut rng));
        }

        let generation = self.generation + 1;
        let child1 = Bacterium::new(&mut rng, self.team, pos1, generation, mutations1, now);
        let child2 = Bacterium::new(&mut rng, self.team, pos2, generation, mutations2, now);
        [child1, child2]
    }
}

fn division_time<R: Rng>(mut rng: R, mutations: Mutations) -> Duration {
    let secs = if mutations.contains(Mutation::FastReproduction) {
        rng.random_range(config::b::FAST_DIVISION_SECS)
    } else {
        rng.random_range(config::b::DIVISION_SECS)
    };
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg as DetRng;

    fn at(rng: &mut DetRng, pos: Vector, generation: u32, mutations: Mutations) -> Bacterium {
        Bacterium::new(rng, Team::Red, pos, generation, mutations, Duration::ZERO)
    }

    #[test]
    fn fresh_bacteria() {
        let mut rng = DetRng::seed_from_u64(1);
        for generation in 0..20 {
            let b = at(&mut rng, [0., 0.], generation, Mutations::empty());
            assert_eq!(b.size(), 5. + generation as f64);
            assert!((1.0..2.).contains(&b.speed));
            assert!((0.0..TAU).contains(&b.direction));
            assert!(b.division_time >= Duration::from_secs(10));
            assert!(b.division_time < Duration::from_secs(15));

            let fast = Mutations::empty().with(Mutation::FastReproduction);
            let b = at(&mut rng, [0., 0.], generation, fast);
            assert!(b.division_time >= Duration::from_secs(5));
            assert!(b.division_time < Duration::from_secs(10));
        }
    }

    #[test]
    fn motion_caps_speed() {
        let mut rng = DetRng::seed_from_u64(2);
        let surface = Surface::default();
        for _ in 0..100 {
            let mut b = at(&mut rng, [400., 300.], 0, Mutations::empty());
            let before = b.speed;
            b.motion(&surface);
            assert!(b.speed <= config::b::MAX_SPEED);
            assert_eq!(b.speed, before.min(1.3));
        }
        // slow ones stay slow
        let mut b = at(&mut rng, [400., 300.], 0, Mutations::empty());
        b.speed = 0.5;
        b.motion(&surface);
        assert_eq!(b.speed, 0.5);
    }

    #[test]
    fn bounce_does_not_clamp() {
        let mut rng = DetRng::seed_from_u64(3);
        let surface = Surface::default();
        let mut b = at(&mut rng, [3., 300.], 0, Mutations::empty());
        b.speed = 1.;
        b.direction = PI;
        b.motion(&surface);
        // walked further out, heading flipped back inside
        assert!((b.pos[0] - 2.).abs() < 1e-9);
        assert!(b.direction.abs() < 1e-9);

        let mut b = at(&mut rng, [400., surface.height() - 2.], 0, Mutations::empty());
        b.speed = 1.;
        b.direction = PI / 2.;
        b.motion(&surface);
        assert!(b.pos[1] > surface.height() - 2.);
        assert!((b.direction + PI / 2.).abs() < 1e-9);
    }

    #[test]
    fn division_needs_time_and_room() {
        let mut rng = DetRng::seed_from_u64(4);
        let b = at(&mut rng, [0., 0.], 0, Mutations::empty());
        let late = Duration::from_secs(15);
        assert!(!b.division_due(Duration::from_secs(9), 0, 10));
        assert!(b.division_due(late, 0, 10));
        assert!(b.division_due(late, 9, 10));
        assert!(!b.division_due(late, 10, 10));
        assert!(!b.division_due(late, 1, 1));
        assert!(!b.division_due(late, 0, 0));
    }

    #[test]
    fn children() {
        let mut rng = DetRng::seed_from_u64(5);
        let mut parent = at(&mut rng, [100., 100.], 3, Mutations::empty());
        let now = Duration::from_secs(20);
        let [a, b] = parent.divide(&mut rng, now);
        assert_eq!(parent.last_division, now);
        for child in [&a, &b] {
            assert_eq!(child.generation, 4);
            assert_eq!(child.size(), 9.);
            assert_eq!(child.team, Team::Red);
            assert_eq!(child.last_division, now);
            // two sizes of the parent away
            assert!((vecmath::dist(child.pos, parent.pos) - 16.).abs() < 1e-9);
        }
        // on opposite sides
        let mid = vecmath::scale(vecmath::add(a.pos, b.pos), 0.5);
        assert!(vecmath::dist(mid, parent.pos) < 1e-9);
    }

    #[test]
    fn mutations_come_in_pairs() {
        let mut rng = DetRng::seed_from_u64(6);
        let inherited = Mutations::empty().with(Mutation::FertileDeath);
        let mut mutated = 0;
        let mut mixed = 0;
        for _ in 0..2000 {
            let mut parent = at(&mut rng, [100., 100.], 0, Mutations::empty());
            let [a, b] = parent.divide(&mut rng, Duration::ZERO);
            assert_eq!(a.mutations.len(), b.mutations.len());
            if !a.mutations.is_empty() {
                mutated += 1;
                if a.mutations != b.mutations {
                    mixed += 1;
                }
            }

            let mut parent = at(&mut rng, [100., 100.], 0, inherited);
            let [a, b] = parent.divide(&mut rng, Duration::ZERO);
            assert!(a.has(Mutation::FertileDeath));
            assert!(b.has(Mutation::FertileDeath));
        }
        // 5% of 2000, give or take
        assert!(mutated > 40 && mutated < 200, "{}", mutated);
        // each child rolls its own kind
        assert!(mixed > 0);
    }
}
