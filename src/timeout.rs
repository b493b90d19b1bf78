//Mcsplit
//Copyright (C) 2024-2025 The mcsplit developers
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// A wall-clock deadline for the search. A timer thread sleeps on a condvar until either the
/// deadline passes, in which case it stores the shared abort flag, or [SearchTimeout::stop]
/// notifies it that the search finished first. The solver itself never blocks on anything; it
/// only polls the flag at the entry of each recursive call.
pub struct SearchTimeout {
    finished: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl SearchTimeout {

    /// Spawns the timer thread. The abort flag is stored after `seconds` seconds unless the
    /// search completes before that.
    pub fn start(seconds: u64, abort: Arc<AtomicBool>) -> Self {
        let finished = Arc::new((Mutex::new(false), Condvar::new()));
        let pair = Arc::clone(&finished);
        let handle = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(seconds);
            let (lock, cvar) = &*pair;
            let mut done = lock.lock().unwrap();
            loop {
                if *done {
                    return;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let (guard, timeout) = cvar.wait_timeout(done, deadline - now).unwrap();
                done = guard;
                if timeout.timed_out() {
                    break;
                }
            }
            abort.store(true, Ordering::Relaxed);
        });
        Self { finished, handle: Some(handle) }
    }

    /// Notifies the timer that the search is over and joins it. The abort flag is left
    /// untouched if the deadline had not passed.
    pub fn stop(mut self) {
        let (lock, cvar) = &*self.finished;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}
