use crate::app::Simulation;
use crate::genome::{Mutation, Team};
use std::time::Duration;
use tracing::info;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TeamReport {
    pub team: Team,
    pub count: usize,
    pub highest_generation: Option<u32>,
    /// carriers per mutation, in the order of [`Mutation::ALL`]
    pub carriers: [usize; Mutation::ALL.len()],
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Report {
    pub time: Duration,
    pub ticks: u64,
    pub total: usize,
    pub teams: Vec<TeamReport>,
}

impl Report {
    /// the team with the most bacteria, ties go to the earlier team
    pub fn leader(&self) -> Option<&TeamReport> {
        self.teams
            .iter()
            .filter(|t| t.count > 0)
            .rev()
            .max_by_key(|t| t.count)
    }

    pub const CSV_HEADER: &'static str = "time_ms, ticks, total, team, count, highest_generation, explosive, fast, fertile";

    /// one line per team
    pub fn csv_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.teams.iter().map(move |t| {
            format!(
                "{}, {}, {}, {}, {}, {}, {}, {}, {}\n",
                self.time.as_millis(),
                self.ticks,
                self.total,
                t.team.name(),
                t.count,
                t.highest_generation.map(|g| g.to_string()).unwrap_or_default(),
                t.carriers[0],
                t.carriers[1],
                t.carriers[2],
            )
        })
    }
}

impl Simulation {
    pub fn gen_report(&self) -> Report {
        let mut teams: Vec<TeamReport> = Team::ALL
            .into_iter()
            .map(|team| TeamReport {
                team,
                count: 0,
                highest_generation: None,
                carriers: [0; Mutation::ALL.len()],
            })
            .collect();
        for (_, b) in self.bacteria() {
            let t = &mut teams[b.team.index()];
            t.count += 1;
            t.highest_generation = t.highest_generation.max(Some(b.generation));
            for (i, m) in Mutation::ALL.into_iter().enumerate() {
                if b.has(m) {
                    t.carriers[i] += 1;
                }
            }
        }
        Report {
            time: self.now(),
            ticks: self.ticks(),
            total: self.len(),
            teams,
        }
    }

    pub fn report(&self) {
        let r = self.gen_report();
        if r.total == 0 {
            info!(ticks = r.ticks, "no bacteria at all");
            return;
        }
        info!(
            ticks = r.ticks,
            time = ?r.time,
            total = r.total,
            leader = r.leader().map(|t| t.team.name()),
            "report"
        );
        for t in r.teams.iter().filter(|t| t.count > 0) {
            info!(
                team = t.team.name(),
                count = t.count,
                highest_generation = t.highest_generation,
                explosive = t.carriers[0],
                fast = t.carriers[1],
                fertile = t.carriers[2],
                "team"
            );
        }
    }
}

#[test]
fn report_counts() {
    use crate::config::Surface;
    use crate::genome::Mutations;
    let mut sim = Simulation::new(9, Surface::default());
    assert!(sim.gen_report().leader().is_none());
    sim.spawn(Team::Red, 3, Some(Mutation::FertileDeath));
    sim.spawn(Team::Red, 1, None);
    sim.spawn_at(
        Team::Blue,
        [10., 10.],
        0,
        Mutations::empty()
            .with(Mutation::ExplosiveDeath)
            .with(Mutation::FastReproduction),
    );
    let r = sim.gen_report();
    assert_eq!(r.total, 3);
    let red = &r.teams[Team::Red.index()];
    assert_eq!(red.count, 2);
    assert_eq!(red.highest_generation, Some(3));
    assert_eq!(red.carriers, [0, 0, 1]);
    let blue = &r.teams[Team::Blue.index()];
    assert_eq!(blue.carriers, [1, 1, 0]);
    assert_eq!(r.teams[Team::Pink.index()].highest_generation, None);
    assert_eq!(r.leader().unwrap().team, Team::Red);
    assert_eq!(r.csv_lines().count(), Team::ALL.len());
    assert!(r.csv_lines().nth(1).unwrap().contains(", red, 2, 3, 0, 0, 1"));
}
