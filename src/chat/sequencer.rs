// ABOUTME: Reply sequencer — applies overlapping backend replies in the order they were sent.
// ABOUTME: Early replies wait for earlier sends; replies issued before a reset are dropped.

use std::collections::BTreeMap;

/// Identifies one outstanding send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendTicket {
    pub seq: u64,
    pub epoch: u64,
}

/// Result of handing a completed send to the sequencer.
#[derive(Debug, PartialEq)]
pub enum Completion<T> {
    /// The ticket predates the last reset; its value was dropped.
    Stale,
    /// Values now ready to apply, in send order. May be empty if an earlier
    /// send is still outstanding.
    Ready(Vec<(SendTicket, T)>),
}

#[derive(Debug)]
pub struct ReplySequencer<T> {
    epoch: u64,
    next_seq: u64,
    next_to_apply: u64,
    buffered: BTreeMap<u64, T>,
}

impl<T> Default for ReplySequencer<T> {
    fn default() -> Self {
        Self {
            epoch: 0,
            next_seq: 0,
            next_to_apply: 0,
            buffered: BTreeMap::new(),
        }
    }
}

impl<T> ReplySequencer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new send.
    pub fn issue(&mut self) -> SendTicket {
        let ticket = SendTicket {
            seq: self.next_seq,
            epoch: self.epoch,
        };
        self.next_seq += 1;
        ticket
    }

    /// Record a finished send and drain everything that can now be applied.
    pub fn complete(&mut self, ticket: SendTicket, value: T) -> Completion<T> {
        if ticket.epoch != self.epoch || ticket.seq < self.next_to_apply {
            return Completion::Stale;
        }
        self.buffered.insert(ticket.seq, value);

        let mut ready = Vec::new();
        while let Some(value) = self.buffered.remove(&self.next_to_apply) {
            ready.push((
                SendTicket {
                    seq: self.next_to_apply,
                    epoch: self.epoch,
                },
                value,
            ));
            self.next_to_apply += 1;
        }
        Completion::Ready(ready)
    }

    /// Sends issued in this epoch that have not been applied yet.
    pub fn outstanding(&self) -> usize {
        (self.next_seq - self.next_to_apply) as usize
    }

    /// Abandon all outstanding sends; their replies will come back stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.next_to_apply = self.next_seq;
        self.buffered.clear();
    }
}
