use crate::bacterium::Bacterium;
use crate::genome::Mutation;
use crate::stablevec::{Handle, StableVec};
use crate::vecmath;

/// who dies when two bacteria of different teams touch
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// the first one loses, blast is set if it takes the winner along
    FirstFalls { blast: bool },
    SecondFalls { blast: bool },
    /// same generation, both die
    BothFall,
}

pub fn touching(a: &Bacterium, b: &Bacterium) -> bool {
    vecmath::dist(a.pos, b.pos) < a.size() + b.size()
}

/// the higher generation wins, mutations do not matter on a draw
pub fn combat(a: &Bacterium, b: &Bacterium) -> Verdict {
    use std::cmp::Ordering::*;
    match a.generation.cmp(&b.generation) {
        Greater => Verdict::SecondFalls {
            blast: b.has(Mutation::ExplosiveDeath),
        },
        Less => Verdict::FirstFalls {
            blast: a.has(Mutation::ExplosiveDeath),
        },
        Equal => Verdict::BothFall,
    }
}

/// pushes two allies apart, one unit in total.
/// the faster one moves less.
pub fn repel(a: &mut Bacterium, b: &mut Bacterium) {
    let angle = vecmath::atan2(vecmath::sub(a.pos, b.pos));
    let away = vecmath::heading(angle);
    let total = a.speed + b.speed;
    let a_move = b.speed / total;
    let b_move = a.speed / total;
    a.pos = vecmath::add(a.pos, vecmath::scale(away, a_move));
    b.pos = vecmath::sub(b.pos, vecmath::scale(away, b_move));
}

/// looks at every pair of bacteria once.
/// allies are pushed apart right away, so later pairs see the new positions.
/// fights only mark the losers, the returned list can contain duplicates.
pub fn resolve(population: &mut StableVec<Bacterium>) -> Vec<Handle> {
    let handles = population.handles();
    let mut doomed = Vec::new();
    for (i, &h1) in handles.iter().enumerate() {
        for &h2 in &handles[i + 1..] {
            let Some((b1, b2)) = population.pair_mut(h1, h2) else {
                continue;
            };
            if !touching(b1, b2) {
                continue;
            }
            if b1.team == b2.team {
                repel(b1, b2);
                continue;
            }
            match combat(b1, b2) {
                Verdict::FirstFalls { blast } => {
                    doomed.push(h1);
                    if blast {
                        doomed.push(h2);
                    }
                }
                Verdict::SecondFalls { blast } => {
                    doomed.push(h2);
                    if blast {
                        doomed.push(h1);
                    }
                }
                Verdict::BothFall => {
                    doomed.push(h1);
                    doomed.push(h2);
                }
            }
        }
    }
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Mutations, Team};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg as DetRng;
    use std::time::Duration;

    fn bact(rng: &mut DetRng, team: Team, pos: [f64; 2], generation: u32, m: Mutations) -> Bacterium {
        Bacterium::new(rng, team, pos, generation, m, Duration::ZERO)
    }

    #[test]
    fn repel_separates() {
        let mut rng = DetRng::seed_from_u64(11);
        for i in 0..50 {
            let mut a = bact(&mut rng, Team::Blue, [100., 100.], 0, Mutations::empty());
            let mut b = bact(&mut rng, Team::Blue, [100. + i as f64 * 0.2, 101.], 0, Mutations::empty());
            let before = vecmath::dist(a.pos, b.pos);
            let (sa, sb) = (a.speed, b.speed);
            let (pa, pb) = (a.pos, b.pos);
            repel(&mut a, &mut b);
            let after = vecmath::dist(a.pos, b.pos);
            assert!(after > before);
            // displacements add up to one, the faster one moves less
            let da = vecmath::dist(a.pos, pa);
            let db = vecmath::dist(b.pos, pb);
            assert!((da + db - 1.).abs() < 1e-9);
            if sa > sb {
                assert!(da < db);
            }
        }
    }

    #[test]
    fn repel_on_top_of_each_other() {
        let mut rng = DetRng::seed_from_u64(12);
        let mut a = bact(&mut rng, Team::Blue, [50., 50.], 0, Mutations::empty());
        let mut b = bact(&mut rng, Team::Blue, [50., 50.], 0, Mutations::empty());
        repel(&mut a, &mut b);
        assert!((vecmath::dist(a.pos, b.pos) - 1.).abs() < 1e-9);
        assert!(a.pos[0] > b.pos[0]);
    }

    #[test]
    fn verdicts() {
        let mut rng = DetRng::seed_from_u64(13);
        let boom = Mutations::empty().with(Mutation::ExplosiveDeath);
        let old = bact(&mut rng, Team::Red, [0., 0.], 2, Mutations::empty());
        let young = bact(&mut rng, Team::Green, [0., 0.], 0, Mutations::empty());
        let young_boom = bact(&mut rng, Team::Green, [0., 0.], 0, boom);
        let old_boom = bact(&mut rng, Team::Pink, [0., 0.], 2, boom);

        assert_eq!(combat(&old, &young), Verdict::SecondFalls { blast: false });
        assert_eq!(combat(&young, &old), Verdict::FirstFalls { blast: false });
        assert_eq!(combat(&old, &young_boom), Verdict::SecondFalls { blast: true });
        assert_eq!(combat(&young_boom, &old), Verdict::FirstFalls { blast: true });
        // the winner exploding does not matter
        assert_eq!(combat(&old_boom, &young), Verdict::SecondFalls { blast: false });
        assert_eq!(combat(&old, &old_boom), Verdict::BothFall);
    }

    #[test]
    fn resolve_marks_and_pushes() {
        let mut rng = DetRng::seed_from_u64(14);
        let mut pop = StableVec::new();
        let red = pop.add(bact(&mut rng, Team::Red, [10., 10.], 1, Mutations::empty()));
        let green = pop.add(bact(&mut rng, Team::Green, [12., 10.], 0, Mutations::empty()));
        let blue1 = pop.add(bact(&mut rng, Team::Blue, [200., 200.], 0, Mutations::empty()));
        let blue2 = pop.add(bact(&mut rng, Team::Blue, [203., 200.], 0, Mutations::empty()));
        let loner = pop.add(bact(&mut rng, Team::Pink, [400., 400.], 0, Mutations::empty()));
        let before = vecmath::dist(pop.get(blue1).unwrap().pos, pop.get(blue2).unwrap().pos);

        let doomed = resolve(&mut pop);
        assert_eq!(doomed, vec![green]);
        assert!(!doomed.contains(&red) && !doomed.contains(&loner));
        let after = vecmath::dist(pop.get(blue1).unwrap().pos, pop.get(blue2).unwrap().pos);
        assert!(after > before);
        // marking is not removing
        assert_eq!(pop.len(), 5);
    }

    #[test]
    fn resolve_pushes_in_order() {
        let mut rng = DetRng::seed_from_u64(16);
        let mut pop = StableVec::new();
        let mut at = |x: f64, speed: f64| {
            let mut b = bact(&mut rng, Team::Yellow, [x, 100.], 0, Mutations::empty());
            b.speed = speed;
            pop.add(b)
        };
        // b and c start out of reach, the push from a moves b into c
        let a = at(100., 3.);
        let b = at(109., 1.);
        let c = at(119.5, 1.);

        let doomed = resolve(&mut pop);
        assert!(doomed.is_empty());
        let x = |h| pop.get(h).unwrap().pos[0];
        // a gives way 1/4, b 3/4. then b and c split one unit evenly
        assert!((x(a) - 99.75).abs() < 1e-9);
        assert!((x(b) - 109.25).abs() < 1e-9);
        assert!((x(c) - 120.).abs() < 1e-9);
    }

    #[test]
    fn resolve_can_mark_twice() {
        let mut rng = DetRng::seed_from_u64(15);
        let mut pop = StableVec::new();
        let weak = pop.add(bact(&mut rng, Team::Red, [10., 10.], 0, Mutations::empty()));
        pop.add(bact(&mut rng, Team::Green, [12., 10.], 1, Mutations::empty()));
        pop.add(bact(&mut rng, Team::Blue, [10., 12.], 1, Mutations::empty()));
        let doomed = resolve(&mut pop);
        assert_eq!(doomed.iter().filter(|h| **h == weak).count(), 2);
    }
}
