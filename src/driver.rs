use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use log::{info, warn};

use crate::{
    agent::{AgentController, Status},
    config::ReplayConfig,
    grid::{Cell, Grid},
    policy::PolicyTable,
};

/// Suspends the replay between steps
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Real-time pacing on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Skips every pause
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&mut self, _duration: Duration) {}
}

/// Snapshot handed to the observer after each tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub step: u32,
    pub cell: Cell,
    pub status: Status,
}

type Observer = Box<dyn FnMut(Frame) + Send>;

/// Paces an [`AgentController`] through a replay and reports how it ended
pub struct Driver<P: Pacer> {
    pacer: P,
    start_delay: Duration,
    step_interval: Duration,
    stop: Arc<AtomicBool>,
    observer: Option<Observer>,
}

impl<P: Pacer> Driver<P> {
    pub fn new(config: &ReplayConfig, pacer: P) -> Self {
        Self {
            pacer,
            start_delay: config.start_delay(),
            step_interval: config.step_interval(),
            stop: Arc::new(AtomicBool::new(false)),
            observer: None,
        }
    }

    /// Call `observer` with a [`Frame`] after every tick
    pub fn with_observer(mut self, observer: impl FnMut(Frame) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Flag that tears the run down; no step executes once it is set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Drive `agent` until it reaches a terminal state or the run is stopped
    pub fn run(
        &mut self,
        agent: &mut AgentController,
        grid: &Grid,
        table: &PolicyTable,
    ) -> Status {
        self.pacer.pause(self.start_delay);

        loop {
            if self.stopped() {
                info!("replay stopped at step {}", agent.step_count());
                return agent.status();
            }

            let status = agent.tick(grid, table);
            if let Some(observer) = self.observer.as_mut() {
                observer(Frame {
                    step: agent.step_count(),
                    cell: agent.position(),
                    status,
                });
            }

            if status.is_terminal() {
                report(status, agent);
                return status;
            }

            self.pacer.pause(self.step_interval);
        }
    }
}

fn report(status: Status, agent: &AgentController) {
    match status {
        Status::ReachedGoal => info!("replay succeeded in {} steps", agent.step_count()),
        Status::HaltedUnknownState => warn!(
            "replay halted on untrained state {} after {} steps",
            agent.position(),
            agent.step_count()
        ),
        Status::StepBudgetExhausted => {
            info!("replay ran out of steps at {}", agent.position())
        }
        Status::Running => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::policy::PolicyEntry;

    /// Records pauses instead of sleeping
    #[derive(Default)]
    struct RecordingPacer(Vec<Duration>);

    impl Pacer for RecordingPacer {
        fn pause(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    fn line_table(len: i32) -> PolicyTable {
        PolicyTable::from_entries((0..len).map(|x| PolicyEntry {
            x,
            y: 0,
            q_values: [0.0, 0.0, 0.0, 1.0],
        }))
    }

    #[test]
    fn paces_start_and_each_step() {
        let config = ReplayConfig::default();
        let grid = Grid::new(4, 1, [], Cell::new(3, 0));
        let mut agent = AgentController::new(Cell::new(0, 0), 200);
        let mut driver = Driver::new(&config, RecordingPacer::default());

        let status = driver.run(&mut agent, &grid, &line_table(3));
        assert_eq!(status, Status::ReachedGoal);

        let pauses = &driver.pacer.0;
        assert_eq!(pauses[0], Duration::from_secs(1), "settle delay first");
        assert_eq!(pauses.len(), 4, "start delay plus one pause per move");
        assert!(pauses[1..].iter().all(|&d| d == Duration::from_millis(300)));
    }

    #[test]
    fn stop_flag_prevents_steps() {
        let config = ReplayConfig::default();
        let grid = Grid::default();
        let mut agent = AgentController::new(Cell::new(0, 0), 200);
        let mut driver = Driver::new(&config, NoPacer);

        driver.stop_handle().store(true, Ordering::Release);
        let status = driver.run(&mut agent, &grid, &line_table(10));
        assert_eq!(status, Status::Running);
        assert_eq!(agent.step_count(), 0);
    }

    #[test]
    fn observer_can_tear_down_mid_run() {
        let config = ReplayConfig::default();
        let grid = Grid::new(50, 1, [], Cell::new(49, 0));
        let mut agent = AgentController::new(Cell::new(0, 0), 200);
        let driver = Driver::new(&config, NoPacer);

        let stop = driver.stop_handle();
        let frames = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&frames);
        let mut driver = driver.with_observer(move |frame| {
            seen.lock().unwrap().push(frame);
            if frame.step == 5 {
                stop.store(true, Ordering::Release);
            }
        });

        driver.run(&mut agent, &grid, &line_table(49));
        assert_eq!(agent.step_count(), 5, "no step after teardown");
        assert_eq!(frames.lock().unwrap().len(), 5);
        assert_eq!(agent.position(), Cell::new(5, 0));
    }

    #[test]
    fn reports_exhaustion() {
        let config = ReplayConfig {
            max_steps: 3,
            ..Default::default()
        };
        let grid = Grid::new(50, 1, [], Cell::new(49, 0));
        let mut agent = config.agent();
        let mut driver = Driver::new(&config, NoPacer);

        let status = driver.run(&mut agent, &grid, &line_table(49));
        assert_eq!(status, Status::StepBudgetExhausted);
        assert_eq!(agent.step_count(), 3);
    }
}
