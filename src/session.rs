use std::{panic, thread};

use tracing::{error, info};

use crate::{
    config::SessionConfig, error::SessionError, log::LogSink, philosopher::Philosopher,
    table::Table,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meals {
    pub name: String,
    pub meals: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub diners: Vec<Meals>,
}

impl SessionReport {
    pub fn total(&self) -> u64 {
        self.diners.iter().map(|d| d.meals).sum()
    }

    pub fn all_ate(&self) -> bool {
        self.diners.iter().all(|d| d.meals > 0)
    }
}

/// Runs one dinner: seat everyone, open the table for `config.session`, close
/// it, and wait for every diner to leave.
///
/// The table lives outside the thread scope, so it is only dropped after every
/// diner thread has been joined. A panic in any diner is re-raised here once
/// the others have finished.
pub fn run(config: &SessionConfig, sink: &dyn LogSink) -> Result<SessionReport, SessionError> {
    config.validate()?;
    let n = config.agent_count;
    let table = Table::new(n);

    let report = thread::scope(|s| {
        let handles = (0..n)
            .map(|i| {
                let diner = Philosopher::new(config.name(i), &table, i, config.pace(i), sink);
                let name = diner.name().to_owned();
                (name, s.spawn(move || diner.dine()))
            })
            .collect::<Vec<_>>();

        info!(diners = n, session = ?config.session, "dinner started");
        table.gate().open();
        thread::sleep(config.session);
        table.gate().close();
        info!("dinner over, waiting for diners to finish");

        let mut diners = Vec::with_capacity(n);
        let mut failure = None;
        for (name, handle) in handles {
            match handle.join() {
                Ok(meals) => diners.push(Meals { name, meals }),
                Err(payload) => {
                    error!(%name, "diner panicked");
                    failure.get_or_insert(payload);
                }
            }
        }
        if let Some(payload) = failure {
            panic::resume_unwind(payload);
        }
        SessionReport { diners }
    });

    info!(meals = report.total(), "all diners joined");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{SessionConfig, NAMES},
        error::SessionError,
        log::{LogSink, MemorySink},
        pace::Steps,
        session::run,
    };
    use std::{
        collections::HashMap,
        time::{Duration, Instant},
    };

    fn fast(agent_count: usize, session: Duration) -> SessionConfig {
        let mut config = SessionConfig::new(agent_count, session);
        config.think = Steps::new(1, 3, Duration::from_millis(1));
        config.eat = Steps::new(1, 3, Duration::from_millis(2));
        config
    }

    fn split(line: &str) -> (&str, &str) {
        // Names are left-padded into a column, then one space, then the event
        let (name, event) = line.split_once(' ').unwrap_or((line, ""));
        (name, event.trim_start())
    }

    #[test]
    fn rejects_invalid_config_before_seating() {
        let sink = MemorySink::new();
        let config = SessionConfig::new(1, Duration::from_millis(10));
        assert_eq!(run(&config, &sink), Err(SessionError::TooFewAgents(1)));
        assert!(sink.is_empty());
    }

    // agent_count=5, session of 2 seconds with the default pace
    #[test]
    fn five_diners_all_finish_eating() {
        let sink = MemorySink::new();
        let config = SessionConfig::new(5, Duration::from_secs(2));
        let start = Instant::now();
        let report = run(&config, &sink).unwrap();
        let elapsed = start.elapsed();

        assert_eq!(report.diners.len(), 5);
        assert!(report.all_ate(), "{report:?}");
        // Each diner finishes at most one cycle after close, blocked by at most
        // its neighbours' meals
        assert!(elapsed < config.session + config.max_cycle() * 5, "{elapsed:?}");

        let lines = sink.lines();
        for name in NAMES {
            assert!(lines.iter().any(|l| split(l) == (name, "finished eating.")));
        }
        let finished = lines.iter().filter(|l| l.ends_with("finished eating.")).count();
        assert_eq!(report.total(), finished as u64);
    }

    #[test]
    fn two_diners_share_both_forks() {
        let sink = MemorySink::new();
        let report = run(&fast(2, Duration::from_millis(200)), &sink).unwrap();
        assert!(report.all_ate(), "{report:?}");
        assert_eq!(
            report.diners.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec!["Aristotle", "Platon"]
        );

        // With two seats every fork is shared, so meals strictly alternate
        // start/finish with nobody else eating in between
        let lines = sink.lines();
        let mut eating: Option<&str> = None;
        for line in &lines {
            match split(line) {
                (name, "started eating.") => {
                    assert_eq!(eating, None, "{name} started while {eating:?} ate");
                    eating = Some(name);
                }
                (name, "finished eating.") => {
                    assert_eq!(eating, Some(name));
                    eating = None;
                }
                _ => {}
            }
        }
    }

    #[test]
    fn neighbours_never_eat_together() {
        let n = 7;
        let sink = MemorySink::new();
        let config = fast(n, Duration::from_millis(300));
        run(&config, &sink).unwrap();

        let seat: HashMap<String, usize> = (0..n).map(|i| (config.name(i), i)).collect();
        let mut eating = vec![false; n];
        let mut meals = 0;
        for line in sink.lines() {
            let (name, event) = split(&line);
            let i = seat[name];
            let (left, right) = ((i + n - 1) % n, (i + 1) % n);
            match event {
                "started eating." => {
                    assert!(!eating[i]);
                    assert!(!eating[left] && !eating[right], "{name} shares a fork");
                    eating[i] = true;
                }
                "finished eating." => {
                    assert!(eating[i]);
                    eating[i] = false;
                    meals += 1;
                }
                _ => {}
            }
        }
        assert!(eating.iter().all(|e| !e));
        assert!(meals > 0);
    }

    #[test]
    fn long_and_non_ascii_names_are_logged_whole() {
        let sink = MemorySink::new();
        let mut config = fast(2, Duration::from_millis(50));
        config.names = vec!["Wittgenstein".into(), "Kierkegård".into()];
        run(&config, &sink).unwrap();
        let lines = sink.lines();
        for name in &config.names {
            assert!(lines.iter().any(|l| split(l) == (name.as_str(), "finished eating.")));
        }
        assert!(lines.iter().all(|l| matches!(
            split(l),
            ("Wittgenstein" | "Kierkegård", "is thinking" | "started eating." | "finished eating.")
        )));
    }

    #[test]
    fn every_diner_eats_across_sessions() {
        for round in 0..20 {
            let sink = MemorySink::new();
            let report = run(&fast(5, Duration::from_millis(100)), &sink).unwrap();
            assert!(report.all_ate(), "round {round}: {report:?}");
        }
    }

    #[test]
    fn nothing_written_after_join() {
        let sink = MemorySink::new();
        let mut config = fast(4, Duration::from_millis(100));
        config.seed = Some(7);
        run(&config, &sink).unwrap();
        let written = sink.len();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(sink.len(), written);
    }

    struct Exploding;
    impl LogSink for Exploding {
        fn write_line(&self, line: &str) {
            if line.starts_with("Platon") {
                panic!("sink refused {line}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "sink refused")]
    fn diner_panic_is_reraised() {
        let _ = run(&fast(3, Duration::from_millis(50)), &Exploding);
    }
}
