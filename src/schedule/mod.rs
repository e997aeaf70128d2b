//! Deadline queue for delayed one-shot work.
//!
//! Replacement spawns, parade arming and the parade finale are queued here
//! and drained at the start of each tick in deadline order. Ties resolve in
//! scheduling order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Work the engine performs when a deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    SpawnReplacement,
    StartParade,
    /// One staggered finale burst
    ParadeFinaleBurst,
    ParadeSettle,
}

#[derive(Debug, Clone)]
struct Entry {
    deadline: f32,
    seq: u64,
    task: ScheduledTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .total_cmp(&other.deadline)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run `delay` seconds after `now`.
    pub fn schedule(&mut self, now: f32, delay: f32, task: ScheduledTask) {
        let entry = Entry {
            deadline: now + delay.max(0.0),
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    /// Pop every task whose deadline is at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.deadline > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    pub fn pending(&self, task: ScheduledTask) -> usize {
        self.heap.iter().filter(|Reverse(e)| e.task == task).count()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
