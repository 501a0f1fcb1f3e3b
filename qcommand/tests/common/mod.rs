#![allow(unused)]

use std::{
    collections::VecDeque,
    io,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use bytes::BytesMut;
use qcommand::{DatagramChannel, EngineError, EngineOp, QuicConnection};

pub fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Everything the fakes observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Polled(&'static str),
    Sent(&'static str, Vec<u8>),
    Timeout(&'static str),
    Dispose(&'static str),
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub fn events(journal: &Journal) -> Vec<Event> {
    journal.lock().unwrap().clone()
}

/// A channel shared by every connection, accepting a budget of datagrams
/// before it blocks. Datagrams are recorded under the connection named by
/// their destination port.
#[derive(Debug)]
pub struct ScriptedChannel {
    budget: Mutex<Option<usize>>,
    failure: Mutex<Option<io::ErrorKind>>,
    names: Mutex<Vec<(SocketAddr, &'static str)>>,
    pub sends: AtomicUsize,
    journal: Journal,
}

impl ScriptedChannel {
    pub fn new(journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            budget: Mutex::new(None),
            failure: Mutex::new(None),
            names: Mutex::default(),
            sends: AtomicUsize::new(0),
            journal: journal.clone(),
        })
    }

    pub fn name(&self, addr: SocketAddr, name: &'static str) {
        self.names.lock().unwrap().push((addr, name));
    }

    pub fn block(&self) {
        *self.budget.lock().unwrap() = Some(0);
    }

    pub fn allow(&self, datagrams: usize) {
        *self.budget.lock().unwrap() = Some(datagrams);
    }

    pub fn unblock(&self) {
        *self.budget.lock().unwrap() = None;
    }

    pub fn fail_next(&self, kind: io::ErrorKind) {
        *self.failure.lock().unwrap() = Some(kind);
    }

    pub fn sent(&self) -> Vec<(&'static str, Vec<u8>)> {
        self.journal
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                Event::Sent(name, datagram) => Some((*name, datagram.clone())),
                _ => None,
            })
            .collect()
    }
}

impl DatagramChannel for ScriptedChannel {
    fn send(&self, datagram: &[u8], dst: SocketAddr) -> io::Result<usize> {
        self.sends.fetch_add(1, Ordering::AcqRel);
        if let Some(kind) = self.failure.lock().unwrap().take() {
            return Err(io::Error::new(kind, "scripted failure"));
        }
        let mut budget = self.budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => return Ok(0),
            Some(left) => *left -= 1,
            None => {}
        }
        let name = self
            .names
            .lock()
            .unwrap()
            .iter()
            .find(|(addr, _)| *addr == dst)
            .map_or("peer", |(_, name)| *name);
        self.journal
            .lock()
            .unwrap()
            .push(Event::Sent(name, datagram.to_vec()));
        Ok(datagram.len())
    }
}

/// A QUIC engine with a scripted list of datagrams to emit.
#[derive(Debug)]
pub struct ScriptedConnection {
    name: &'static str,
    remote: SocketAddr,
    pending: Mutex<VecDeque<Vec<u8>>>,
    on_timeout: Mutex<Vec<Vec<u8>>>,
    closing: Mutex<Option<Vec<u8>>>,
    pub marked_closed: AtomicBool,
    pub polls: AtomicUsize,
    pub timeouts: AtomicUsize,
    pub force_closes: AtomicUsize,
    pub disposals: AtomicUsize,
    fail_timeout: AtomicBool,
    journal: Journal,
}

impl ScriptedConnection {
    pub fn new(name: &'static str, port: u16, journal: &Journal) -> Arc<Self> {
        Self::with_remote(name, SocketAddr::from(([192, 0, 2, 1], port)), journal)
    }

    pub fn with_remote(name: &'static str, remote: SocketAddr, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name,
            remote,
            pending: Mutex::default(),
            on_timeout: Mutex::default(),
            closing: Mutex::default(),
            marked_closed: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
            timeouts: AtomicUsize::new(0),
            force_closes: AtomicUsize::new(0),
            disposals: AtomicUsize::new(0),
            fail_timeout: AtomicBool::new(false),
            journal: journal.clone(),
        })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    pub fn push(&self, datagram: &[u8]) {
        self.pending.lock().unwrap().push_back(datagram.to_vec());
    }

    pub fn push_on_timeout(&self, datagram: &[u8]) {
        self.on_timeout.lock().unwrap().push(datagram.to_vec());
    }

    pub fn close_with(&self, datagram: &[u8]) {
        self.marked_closed.store(true, Ordering::Release);
        *self.closing.lock().unwrap() = Some(datagram.to_vec());
    }

    pub fn fail_timeout(&self) {
        self.fail_timeout.store(true, Ordering::Release);
    }
}

impl QuicConnection for ScriptedConnection {
    fn produce_next_datagram(&self, buf: &mut BytesMut) -> Result<usize, EngineError> {
        self.polls.fetch_add(1, Ordering::AcqRel);
        self.journal.lock().unwrap().push(Event::Polled(self.name));
        match self.pending.lock().unwrap().pop_front() {
            Some(datagram) => {
                buf.extend_from_slice(&datagram);
                Ok(datagram.len())
            }
            None => Ok(0),
        }
    }

    fn remote_address(&self) -> SocketAddr {
        self.remote
    }

    fn on_timeout(&self) -> Result<(), EngineError> {
        if self.fail_timeout.load(Ordering::Acquire) {
            return Err(EngineError::new(EngineOp::Timeout, "scripted failure"));
        }
        self.timeouts.fetch_add(1, Ordering::AcqRel);
        self.journal.lock().unwrap().push(Event::Timeout(self.name));
        let fired = core::mem::take(&mut *self.on_timeout.lock().unwrap());
        self.pending.lock().unwrap().extend(fired);
        Ok(())
    }

    fn is_marked_closed(&self) -> bool {
        self.marked_closed.load(Ordering::Acquire)
    }

    fn force_close(&self) -> Result<bool, EngineError> {
        self.force_closes.fetch_add(1, Ordering::AcqRel);
        match self.closing.lock().unwrap().take() {
            Some(datagram) => {
                self.pending.lock().unwrap().push_back(datagram);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::AcqRel);
        self.journal.lock().unwrap().push(Event::Dispose(self.name));
    }
}
