// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registry: a `(host, port)`-keyed map of records plus a
//! lazy-deletion priority heap for "next Ready worker" selection.
//!
//! The heap holds `(state_rank, seq, addr)` tuples pushed only when a
//! record becomes Ready. A `BinaryHeap` can't mutate an entry's key in
//! place, so instead of re-heapifying on every state change, stale
//! entries are left in the heap and discarded on pop: an entry is live
//! only if it still matches the map's current `(state, seq)` for that
//! address.

use mr_core::{TaskId, WorkerAddr, WorkerRecord, WorkerState};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Default)]
pub struct WorkerRegistry {
    workers: HashMap<WorkerAddr, WorkerRecord>,
    heap: BinaryHeap<Reverse<(u8, u64, WorkerAddr)>>,
    next_seq: u64,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `addr`. If an entry already exists for it, that entry is
    /// first transitioned to Dead (orphaning its assigned task, if any),
    /// then a fresh Ready record is installed with a new sequence number.
    /// Returns the orphaned task id, if the prior record was Busy.
    pub fn register(&mut self, addr: WorkerAddr) -> Option<TaskId> {
        let orphaned = self.transition_to_dead(&addr);
        self.next_seq += 1;
        let seq = self.next_seq;
        self.workers.insert(addr.clone(), WorkerRecord::new_ready(addr.clone(), seq));
        self.heap.push(Reverse((WorkerState::Ready.rank(), seq, addr)));
        orphaned
    }

    /// Transitions `addr` to Dead. Returns the orphaned task id if the
    /// prior state was Busy. A no-op (returns `None`) if `addr` is unknown
    /// or already Dead — tombstones are never re-transitioned.
    pub fn mark_dead(&mut self, addr: &WorkerAddr) -> Option<TaskId> {
        self.transition_to_dead(addr)
    }

    fn transition_to_dead(&mut self, addr: &WorkerAddr) -> Option<TaskId> {
        let record = self.workers.get_mut(addr)?;
        if record.state == WorkerState::Dead {
            return None;
        }
        let orphaned = (record.state == WorkerState::Busy).then_some(record.assigned_task).flatten();
        record.state = WorkerState::Dead;
        record.assigned_task = None;
        orphaned
    }

    pub fn mark_busy(&mut self, addr: &WorkerAddr, task_id: TaskId) {
        if let Some(record) = self.workers.get_mut(addr) {
            record.state = WorkerState::Busy;
            record.assigned_task = Some(task_id);
        }
    }

    /// Marks `addr` Ready and pushes a fresh heap entry for it. A no-op on
    /// Dead tombstones — they never return to Ready without re-registering.
    pub fn mark_ready(&mut self, addr: &WorkerAddr) {
        if let Some(record) = self.workers.get_mut(addr) {
            if record.state == WorkerState::Dead {
                return;
            }
            record.state = WorkerState::Ready;
            record.assigned_task = None;
            record.missed_heartbeats = 0;
            self.heap.push(Reverse((WorkerState::Ready.rank(), record.seq, addr.clone())));
        }
    }

    /// Re-pushes `addr` onto the heap without touching its counters. Used
    /// when a worker was popped as the next assignee but there was no task
    /// to hand it this round.
    pub fn requeue_ready(&mut self, addr: &WorkerAddr) {
        if let Some(record) = self.workers.get(addr) {
            if record.state == WorkerState::Ready {
                self.heap.push(Reverse((WorkerState::Ready.rank(), record.seq, addr.clone())));
            }
        }
    }

    /// Resets the missed-heartbeat counter for a known, non-Dead worker.
    /// Unknown or Dead senders are ignored.
    pub fn record_heartbeat(&mut self, addr: &WorkerAddr) {
        if let Some(record) = self.workers.get_mut(addr) {
            if record.state != WorkerState::Dead {
                record.missed_heartbeats = 0;
            }
        }
    }

    /// Increments every non-Dead worker's missed-heartbeat counter; any
    /// reaching `limit` is transitioned to Dead. Returns the `(addr,
    /// orphaned task)` pairs for every worker that died this round.
    pub fn age_heartbeats(&mut self, limit: u32) -> Vec<(WorkerAddr, Option<TaskId>)> {
        let addrs: Vec<WorkerAddr> = self
            .workers
            .iter()
            .filter(|(_, record)| record.state != WorkerState::Dead)
            .map(|(addr, _)| addr.clone())
            .collect();

        let mut newly_dead = Vec::new();
        for addr in addrs {
            let reached_limit = match self.workers.get_mut(&addr) {
                Some(record) => {
                    record.missed_heartbeats += 1;
                    record.missed_heartbeats >= limit
                }
                None => continue,
            };
            if reached_limit {
                let orphaned = self.transition_to_dead(&addr);
                newly_dead.push((addr, orphaned));
            }
        }
        newly_dead
    }

    /// Pops the next live Ready worker, discarding stale heap entries along
    /// the way. Does **not** mutate the record's state — the caller marks
    /// it Busy once assignment actually succeeds.
    pub fn pop_ready(&mut self) -> Option<WorkerAddr> {
        while let Some(Reverse((_, seq, addr))) = self.heap.pop() {
            if let Some(record) = self.workers.get(&addr) {
                if record.state == WorkerState::Ready && record.seq == seq {
                    return Some(addr);
                }
            }
        }
        None
    }

    pub fn state_of(&self, addr: &WorkerAddr) -> Option<WorkerState> {
        self.workers.get(addr).map(|record| record.state)
    }

    /// Every worker not (yet) known to be Dead, for shutdown broadcast.
    pub fn all_non_dead(&self) -> Vec<WorkerAddr> {
        self.workers
            .iter()
            .filter(|(_, record)| record.state != WorkerState::Dead)
            .map(|(addr, _)| addr.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
