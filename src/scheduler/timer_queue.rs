use std::{
  cmp::Ordering,
  collections::{BinaryHeap, HashMap},
  time::Duration,
};

use super::TimerHandle;
use crate::rc::MutRc;

pub(crate) enum TimerTask {
  Once(Box<dyn FnOnce()>),
  Repeat { period: Duration, task: Box<dyn FnMut()> },
}

struct Entry {
  at: Duration,
  seq: u64,
  id: u64,
}

impl PartialEq for Entry {
  fn eq(&self, other: &Self) -> bool { self.at == other.at && self.seq == other.seq }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Entry {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by sequence
    other.at.cmp(&self.at).then_with(|| other.seq.cmp(&self.seq))
  }
}

#[derive(Default)]
struct QueueState {
  next_id: u64,
  next_seq: u64,
  heap: BinaryHeap<Entry>,
  // `None` while a repeating task is running; removing the key during the
  // run cancels the reschedule.
  tasks: HashMap<u64, Option<TimerTask>>,
}

impl QueueState {
  fn push(&mut self, id: u64, at: Duration) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.heap.push(Entry { at, seq, id });
  }

  fn pop_due(&mut self, limit: Duration) -> Option<(Duration, u64, TimerTask)> {
    loop {
      let entry = self.heap.peek()?;
      if entry.at > limit {
        return None;
      }
      let Entry { at, id, .. } = self.heap.pop()?;
      let task = match self.tasks.get_mut(&id) {
        Some(slot) => slot.take(),
        None => continue,
      };
      match task {
        Some(TimerTask::Once(f)) => {
          self.tasks.remove(&id);
          return Some((at, id, TimerTask::Once(f)));
        }
        Some(repeat) => return Some((at, id, repeat)),
        None => continue,
      }
    }
  }
}

/// Timer storage shared by the scheduler implementations.
#[derive(Clone, Default)]
pub(crate) struct TimerQueue(MutRc<QueueState>);

impl TimerQueue {
  pub(crate) fn schedule(&self, at: Duration, task: TimerTask) -> TimerHandle {
    let mut state = self.0.rc_deref_mut();
    let id = state.next_id;
    state.next_id += 1;
    state.tasks.insert(id, Some(task));
    state.push(id, at);
    TimerHandle(id)
  }

  pub(crate) fn cancel(&self, handle: TimerHandle) {
    let task = self.0.rc_deref_mut().tasks.remove(&handle.0);
    // Dropped outside the borrow: the closure may own subscriptions.
    drop(task);
  }

  pub(crate) fn len(&self) -> usize { self.0.rc_deref().tasks.len() }

  /// Earliest instant at which a live timer is due.
  pub(crate) fn next_deadline(&self) -> Option<Duration> {
    let mut state = self.0.rc_deref_mut();
    loop {
      let (at, id) = {
        let entry = state.heap.peek()?;
        (entry.at, entry.id)
      };
      if state.tasks.contains_key(&id) {
        return Some(at);
      }
      state.heap.pop();
    }
  }

  /// Runs every timer due at or before `limit`, in time order, including
  /// timers scheduled by the callbacks themselves. `on_advance` is told the
  /// due time before each callback runs. Returns the number of callbacks run.
  pub(crate) fn run_until(&self, limit: Duration, mut on_advance: impl FnMut(Duration)) -> usize {
    let mut ran = 0;
    loop {
      let due = self.0.rc_deref_mut().pop_due(limit);
      let Some((at, id, task)) = due else { return ran };
      on_advance(at);
      ran += 1;
      match task {
        TimerTask::Once(f) => f(),
        TimerTask::Repeat { period, mut task } => {
          task();
          let mut state = self.0.rc_deref_mut();
          if let Some(slot) = state.tasks.get_mut(&id) {
            *slot = Some(TimerTask::Repeat { period, task });
            state.push(id, at + period);
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[rxstream_macro::test]
  fn same_instant_runs_fifo() {
    let queue = TimerQueue::default();
    let log = Rc::new(RefCell::new(vec![]));
    for name in ["a", "b", "c"] {
      let l = log.clone();
      queue.schedule(Duration::from_millis(5), TimerTask::Once(Box::new(move || l.borrow_mut().push(name))));
    }
    assert_eq!(queue.run_until(Duration::from_millis(5), |_| {}), 3);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    assert_eq!(queue.len(), 0);
  }

  #[rxstream_macro::test]
  fn cancelled_timer_is_skipped() {
    let queue = TimerQueue::default();
    let handle = queue.schedule(Duration::from_millis(1), TimerTask::Once(Box::new(|| panic!())));
    queue.cancel(handle);
    assert_eq!(queue.next_deadline(), None);
    assert_eq!(queue.run_until(Duration::from_secs(1), |_| {}), 0);
  }
}
