//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tickstate::machine::{Controller, Machine};
use tickstate::state_enum;
use tickstate::unit::{StateCore, StateUnit};
use tickstate::{Payload, State};
use tracing_subscriber::fmt::MakeWriter;

state_enum! {
    pub enum Phase {
        Idle,
        Running,
        Paused,
    }
}

pub type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Clone)]
pub struct TestEnv {
    pub ready: bool,
}

/// Controller registering one [`Recorder`] per phase, in declaration order.
#[derive(Default)]
pub struct Rig {
    pub journal: Journal,
    pub debug: bool,
}

impl Controller for Rig {
    type State = Phase;
    type Env = TestEnv;

    fn initialize(&mut self, machine: &Machine<Self>) {
        machine.set_debug(self.debug);
        for phase in [Phase::Idle, Phase::Running, Phase::Paused] {
            let unit = Recorder::new(phase.name(), self.journal.clone());
            machine.register_state(phase, unit).unwrap();
        }
    }
}

/// Unit that appends every hook it receives to a shared journal.
pub struct Recorder {
    core: StateCore<Rig>,
    label: String,
    journal: Journal,
}

impl Recorder {
    pub fn new(label: &str, journal: Journal) -> Self {
        Self {
            core: StateCore::new(),
            label: label.to_string(),
            journal,
        }
    }

    fn record(&self, event: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}.{}", self.label, event));
    }
}

impl StateUnit<Rig> for Recorder {
    fn core(&self) -> &StateCore<Rig> {
        &self.core
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn on_awake(&self) {
        self.record("awake");
    }

    fn on_enter(&self, data: Option<Payload>) {
        self.core.log_enter(self.name());
        match data.and_then(|payload| payload.downcast::<&'static str>().ok()) {
            Some(text) => self.record(&format!("enter({text})")),
            None => self.record("enter"),
        }
    }

    fn on_exit(&self) {
        self.core.log_exit(self.name());
        self.record("exit");
    }

    fn on_update(&self) {
        self.record("update");
    }

    fn on_fixed_update(&self) {
        self.record("fixed_update");
    }
}

pub fn awake_rig() -> (Machine<Rig>, Journal) {
    let rig = Rig::default();
    let journal = rig.journal.clone();
    let machine = Machine::new(rig);
    machine.awake().unwrap();
    journal.borrow_mut().clear();
    (machine, journal)
}

/// In-memory sink for `tracing` output.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Run `f` with this capture installed as the thread's subscriber.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
