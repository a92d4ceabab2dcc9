//! Delayed one-shot events, invalidated by stage changes.
//!
//! Every event carries the stage epoch it was scheduled in. Loading a stage
//! bumps the epoch, so anything queued against the old stage is discarded
//! instead of firing into the new one.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Top the stage's placed monsters back up to their authored count.
    RefillMonsters,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    due: u64,
    epoch: u32,
    event: Event,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: u64,
    epoch: u32,
    queue: Vec<Scheduled>,
}

impl Scheduler {
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Invalidate everything queued so far.
    pub fn advance_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.queue.clear();
    }

    pub fn schedule(&mut self, delay: u64, event: Event) {
        self.queue.push(Scheduled {
            due: self.now + delay,
            epoch: self.epoch,
            event,
        });
    }

    /// Advance one tick and return the events now due for this epoch, in
    /// the order they were scheduled.
    pub fn tick(&mut self) -> Vec<Event> {
        self.now += 1;
        let (now, epoch) = (self.now, self.epoch);
        let mut due = Vec::new();
        self.queue.retain(|s| {
            if s.due > now {
                return true;
            }
            if s.epoch == epoch {
                due.push(s.event);
            }
            false
        });
        due
    }
}
