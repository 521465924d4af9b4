use crate::app::Simulation;
use crate::config::ControlPanel;
use crate::error::Result;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// a simulation that a background task and the main loop can both work on.
/// whoever holds the lock runs a full tick or command before letting go.
pub type Shared = Arc<Mutex<Simulation>>;

pub fn shared(sim: Simulation) -> Shared {
    Arc::new(Mutex::new(sim))
}

/// background thread that drops a random bacterium into the dish every interval,
/// no matter how fast the simulation ticks.
/// stops when stopped or dropped.
#[derive(Debug)]
pub struct RandomSpawn {
    stop: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl RandomSpawn {
    pub fn start(sim: Shared, interval: Duration) -> Self {
        let (stop, stopped) = mpsc::channel::<()>();
        info!(?interval, "random spawn started");
        let worker = std::thread::spawn(move || {
            loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // stop signal or the handle is gone
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                let Ok(mut guard) = sim.lock() else {
                    error!("simulation lock poisoned, random spawn gives up");
                    break;
                };
                let h = guard.spawn_random();
                debug!(?h, "random spawn");
            }
        });
        Self {
            stop: Some(stop),
            worker: Some(worker),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// signals the thread and waits for it, no spawn happens after this returns.
    /// the thread may be waiting on the simulation lock, so calling this while
    /// holding that lock deadlocks.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // dropping the sender wakes the thread up as well
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("random spawn thread panicked");
            }
            info!("random spawn stopped");
        }
    }
}

impl Drop for RandomSpawn {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// the on/off switch for random spawning
#[derive(Debug, Default)]
pub struct Spawner {
    active: Option<RandomSpawn>,
}

impl Spawner {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// switches random spawning on or off, the interval is read from the panel
    /// when switching on. returns whether it is now on.
    /// switching off waits for the thread, see `RandomSpawn::stop` about the lock.
    pub fn toggle(&mut self, sim: &Shared, panel: &impl ControlPanel) -> Result<bool> {
        match self.active.take() {
            Some(running) => {
                running.stop();
                Ok(false)
            }
            None => {
                let interval = panel.spawn_interval()?;
                self.active = Some(RandomSpawn::start(Arc::clone(sim), interval));
                Ok(true)
            }
        }
    }

    /// switches random spawning off if it is on, same locking rule as `toggle`
    pub fn stop(&mut self) {
        if let Some(running) = self.active.take() {
            running.stop();
        }
    }
}
