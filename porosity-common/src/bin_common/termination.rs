use std::{
    io,
    os::raw::c_int,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use signal_hook::{consts::signal::*, low_level};

/// Signals that ask a batch to stop
pub const STOP_SIGNALS: [c_int; 2] = [SIGINT, SIGTERM];

/// Signals received before the process is killed the usual way instead of waiting for
/// the current picture.
pub const SIGNALS_BEFORE_KILL: usize = 2;

/// Set once the user asks a batch to stop. The batch polls it before every picture, so
/// the picture being processed is always finished and the table stays consistent.
#[derive(Clone, Debug, Default)]
pub struct StopRequest {
    received: Arc<AtomicUsize>,
}

impl StopRequest {
    /// Starts counting [`STOP_SIGNALS`]
    pub fn install() -> io::Result<Self> {
        let stop = Self::default();
        for signal in STOP_SIGNALS {
            let received = Arc::clone(&stop.received);
            // SAFETY: only touches an atomic and calls the crate's own signal-safe helper
            unsafe {
                low_level::register(signal, move || {
                    if received.fetch_add(1, Ordering::SeqCst) >= SIGNALS_BEFORE_KILL {
                        let _ = low_level::emulate_default_handler(signal);
                    }
                })?;
            }
        }
        Ok(stop)
    }

    /// Asks to stop without a signal
    pub fn request(&self) {
        self.received.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.signals_received() > 0
    }

    pub fn signals_received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    /// A `should_stop` callback for [`crate::batch::process_until`]
    pub fn poll(&self) -> impl FnMut() -> bool + '_ {
        move || {
            let stop = self.is_requested();
            if stop {
                log::debug!("Stop requested after {} signals", self.signals_received());
            }
            stop
        }
    }
}
