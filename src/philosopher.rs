use std::thread;

use tracing::debug;

use crate::{
    log::LogSink,
    pace::Pace,
    sync::{gate::Gate, Mutex},
    table::{Seat, Table},
};

/// A diner bound to one seat of a [`Table`].
///
/// Borrowing the table ties every diner's lifetime to it, so a table can't be
/// dropped while a diner thread still uses its forks.
pub struct Philosopher<'t, P> {
    name: String,
    seat: Seat<'t>,
    gate: &'t Gate,
    pace: P,
    sink: &'t dyn LogSink,
}

impl<'t, P: Pace> Philosopher<'t, P> {
    pub fn new(
        name: impl Into<String>,
        table: &'t Table,
        index: usize,
        pace: P,
        sink: &'t dyn LogSink,
    ) -> Self {
        Self {
            name: name.into(),
            seat: table.seat(index),
            gate: table.gate(),
            pace,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs think/eat cycles until the gate closes, returning the number of
    /// meals eaten.
    ///
    /// Blocks until the session opens. Once inside, a cycle always runs to the
    /// end and the gate is only checked between cycles.
    pub fn dine(mut self) -> u64 {
        debug!(name = %self.name, seat = self.seat.index(), "waiting for the table");
        if !self.gate.wait_open() {
            debug!(name = %self.name, "session closed before it was seen open");
            return 0;
        }

        let mut meals = 0;
        loop {
            self.think();
            self.eat();
            meals += 1;
            if !self.gate.is_active() {
                break;
            }
        }
        debug!(name = %self.name, meals, "left the table");
        meals
    }

    fn think(&mut self) {
        thread::sleep(self.pace.think());
        self.say("is thinking");
    }

    fn eat(&mut self) {
        let _forks = self.seat.acquire();
        debug!(name = %self.name, forks = ?self.seat.forks(), "picked up forks");
        self.say("started eating.");
        thread::sleep(self.pace.eat());
        self.say("finished eating.");
    }

    fn say(&self, text: &str) {
        self.sink.write_line(&format!("{:<10} {text}", self.name));
    }
}
