use crate::bacterium::Bacterium;
use crate::genome::{Mutation, Team};
use crate::stablevec::Handle;
use crate::vecmath::Vector;
use serde_derive::Serialize;
use std::time::Duration;

pub type Rgba = [f32; 4];

const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
// css green, not full brightness
const GREEN: Rgba = [0.0, 128. / 255., 0.0, 1.0];
const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
const PINK: Rgba = [1.0, 192. / 255., 203. / 255., 1.0];

pub const OUTLINE_WIDTH: f64 = 1.5;

pub fn team_colour(team: Team) -> Rgba {
    match team {
        Team::Yellow => YELLOW,
        Team::Red => RED,
        Team::Green => GREEN,
        Team::Blue => BLUE,
        Team::Pink => PINK,
    }
}

/// half transparent ring around mutated bacteria
pub fn mutation_colour(m: Mutation) -> Rgba {
    match m {
        Mutation::ExplosiveDeath => [1.0, 0.0, 0.0, 0.5],
        Mutation::FastReproduction => [0.0, 1.0, 0.0, 0.5],
        Mutation::FertileDeath => [0.0, 0.0, 1.0, 0.5],
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Outline {
    pub colour: Rgba,
    pub width: f64,
}

/// everything needed to draw one bacterium as a filled circle
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Sprite {
    pub handle: Handle,
    pub team: Team,
    pub pos: Vector,
    pub radius: f64,
    pub fill: Rgba,
    pub outline: Option<Outline>,
}

impl Sprite {
    pub fn new(handle: Handle, b: &Bacterium) -> Self {
        Self {
            handle,
            team: b.team,
            pos: b.pos,
            radius: b.size(),
            fill: team_colour(b.team),
            outline: b.mutations.most_visible().map(|m| Outline {
                colour: mutation_colour(m),
                width: OUTLINE_WIDTH,
            }),
        }
    }
}

/// what happened during a tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickEvents {
    pub divisions: usize,
    pub deaths: usize,
    pub fertile_spawns: usize,
}

/// read-only picture of the population, handed to whoever draws it
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub time: Duration,
    pub sprites: Vec<Sprite>,
    pub events: TickEvents,
}

#[test]
fn outlines() {
    use crate::genome::Mutations;
    use rand::SeedableRng;
    let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(0);
    let mut pop = crate::stablevec::StableVec::new();
    let plain = Bacterium::new(&mut rng, Team::Pink, [1., 2.], 1, Mutations::empty(), Duration::ZERO);
    let h = pop.add(plain.clone());
    let s = Sprite::new(h, &plain);
    assert_eq!(s.outline, None);
    assert_eq!(s.fill, PINK);
    assert_eq!(s.radius, 6.);

    let both = Mutations::empty()
        .with(Mutation::FertileDeath)
        .with(Mutation::ExplosiveDeath);
    let mutant = Bacterium::new(&mut rng, Team::Red, [1., 2.], 0, both, Duration::ZERO);
    let s = Sprite::new(h, &mutant);
    assert_eq!(
        s.outline,
        Some(Outline {
            colour: [1.0, 0.0, 0.0, 0.5],
            width: 1.5
        })
    );
}
