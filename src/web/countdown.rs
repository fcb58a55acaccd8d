// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::interval_at;

use crate::session::TickOutcome;
use crate::session::Ticket;
use crate::web::state::MutableState;

const TICK: Duration = Duration::from_secs(1);

/// Owns the task that ticks one countdown. Dropping it stops the task.
pub struct CountdownTask {
    ticket: Ticket,
    handle: JoinHandle<()>,
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Makes the running countdown task match the session's live countdown.
/// Must be called with the state locked, after every session transition.
pub fn sync_countdown(shared: &Arc<Mutex<MutableState>>, mutable: &mut MutableState) {
    let live = mutable.session.ticket();
    let armed = mutable.countdown.as_ref().map(|task| task.ticket);
    if live == armed {
        return;
    }
    // Release the old task before arming a new one.
    mutable.countdown = None;
    if let Some(ticket) = live {
        log::debug!("Arming countdown {ticket:?}");
        let handle = tokio::spawn(run_countdown(Arc::clone(shared), ticket));
        mutable.countdown = Some(CountdownTask { ticket, handle });
    }
}

async fn run_countdown(shared: Arc<Mutex<MutableState>>, ticket: Ticket) {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    loop {
        interval.tick().await;
        let running = {
            let mut mutable = shared.lock().unwrap();
            match mutable.session.tick(ticket) {
                TickOutcome::Running { .. } => true,
                TickOutcome::TimedOut | TickOutcome::Stale => {
                    if mutable.countdown.as_ref().map(|task| task.ticket) == Some(ticket) {
                        mutable.countdown = None;
                    }
                    false
                }
            }
        };
        if !running {
            break;
        }
    }
}
