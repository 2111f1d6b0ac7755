// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
In-process cluster: one OS thread per worker.

Each ordered pair of workers shares an unbounded FIFO channel, so messages
between two workers arrive in the order they were sent. A worker that
returns drops its channel ends; any peer that later sends to or waits on it
gets `ClusterError::Disconnected` instead of blocking forever.
*/

use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};
use spikenet_neural::{Rank, SpikeEvent};
use tracing::{debug, trace};

use crate::communicator::{Communicator, COORDINATOR};
use crate::message::Message;
use crate::types::{ClusterError, ClusterResult};

/// Channel ends of one worker
pub struct LocalCommunicator {
    rank: Rank,
    size: usize,
    /// `outbox[peer]` sends to `peer`; `None` for self
    outbox: Vec<Option<Sender<Message>>>,
    /// `inbox[peer]` receives from `peer`; `None` for self
    inbox: Vec<Option<Receiver<Message>>>,
}

impl LocalCommunicator {
    fn peers(&self) -> impl Iterator<Item = Rank> + '_ {
        (0..self.size).filter(move |&peer| peer != self.rank)
    }

    fn disconnected(&self, peer: Rank) -> ClusterError {
        ClusterError::Disconnected {
            rank: self.rank,
            peer,
        }
    }

    fn send(&self, peer: Rank, message: Message) -> ClusterResult<()> {
        trace!(target: "spikenet-cluster", "{} -> {}: {}", self.rank, peer, message.kind());
        self.outbox
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.disconnected(peer))?
            .send(message)
            .map_err(|_| self.disconnected(peer))
    }

    fn recv(&self, peer: Rank) -> ClusterResult<Message> {
        self.inbox
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.disconnected(peer))?
            .recv()
            .map_err(|_| self.disconnected(peer))
    }

    fn unexpected(&self, peer: Rank, expected: &'static str, got: &Message) -> ClusterError {
        ClusterError::UnexpectedMessage {
            rank: self.rank,
            peer,
            expected,
            got: got.kind(),
        }
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn exchange_spikes(&self, local: &[SpikeEvent]) -> ClusterResult<Vec<SpikeEvent>> {
        for peer in self.peers() {
            self.send(peer, Message::Spikes(local.to_vec()))?;
        }
        let mut remote = Vec::new();
        for peer in self.peers() {
            match self.recv(peer)? {
                Message::Spikes(spikes) => remote.extend(spikes),
                other => return Err(self.unexpected(peer, "spikes", &other)),
            }
        }
        Ok(remote)
    }

    fn broadcast_reward(&self, value: Option<f64>) -> ClusterResult<f64> {
        if self.rank == COORDINATOR {
            let value = value.unwrap_or(0.0);
            for peer in self.peers() {
                self.send(peer, Message::Reward(value))?;
            }
            return Ok(value);
        }
        match self.recv(COORDINATOR)? {
            Message::Reward(value) => Ok(value),
            other => Err(self.unexpected(COORDINATOR, "reward", &other)),
        }
    }

    fn gather_bytes(&self, bytes: Vec<u8>) -> ClusterResult<Option<Vec<Vec<u8>>>> {
        if self.rank != COORDINATOR {
            self.send(COORDINATOR, Message::Bundle(bytes))?;
            return Ok(None);
        }
        let mut gathered = Vec::with_capacity(self.size);
        let mut own = Some(bytes);
        for peer in 0..self.size {
            if peer == self.rank {
                gathered.push(own.take().unwrap_or_default());
                continue;
            }
            match self.recv(peer)? {
                Message::Bundle(buffer) => gathered.push(buffer),
                other => return Err(self.unexpected(peer, "bundle", &other)),
            }
        }
        Ok(Some(gathered))
    }

    fn barrier(&self) -> ClusterResult<()> {
        for peer in self.peers() {
            self.send(peer, Message::Barrier)?;
        }
        for peer in self.peers() {
            match self.recv(peer)? {
                Message::Barrier => {}
                other => return Err(self.unexpected(peer, "barrier", &other)),
            }
        }
        Ok(())
    }
}

/// Runs `workers` copies of a worker function on scoped threads
pub struct LocalCluster;

impl LocalCluster {
    /// Fully connected communicators, index = rank
    pub fn communicators(workers: usize) -> ClusterResult<Vec<LocalCommunicator>> {
        if workers == 0 {
            return Err(ClusterError::InvalidSize(workers));
        }
        let mut outboxes: Vec<Vec<Option<Sender<Message>>>> =
            (0..workers).map(|_| (0..workers).map(|_| None).collect()).collect();
        let mut inboxes: Vec<Vec<Option<Receiver<Message>>>> =
            (0..workers).map(|_| (0..workers).map(|_| None).collect()).collect();

        for from in 0..workers {
            for to in 0..workers {
                if from != to {
                    let (tx, rx) = unbounded();
                    outboxes[from][to] = Some(tx);
                    inboxes[to][from] = Some(rx);
                }
            }
        }

        Ok(outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| LocalCommunicator {
                rank,
                size: workers,
                outbox,
                inbox,
            })
            .collect())
    }

    /// Run `worker` once per rank and return the results in rank order
    ///
    /// # Errors
    ///
    /// `ClusterError::WorkerPanicked` if a worker thread panicked and
    /// `ClusterError::Spawn` if a thread could not be started. Errors a
    /// worker returns itself are part of `R`.
    pub fn run<R, F>(workers: usize, worker: F) -> ClusterResult<Vec<R>>
    where
        F: Fn(LocalCommunicator) -> R + Sync,
        R: Send,
    {
        let communicators = Self::communicators(workers)?;
        debug!(target: "spikenet-cluster", "Starting {} in-process workers", workers);

        thread::scope(|scope| {
            let worker = &worker;
            let mut handles = Vec::with_capacity(workers);
            for communicator in communicators {
                let rank = communicator.rank;
                let handle = thread::Builder::new()
                    .name(format!("spikenet-worker-{}", rank))
                    .spawn_scoped(scope, move || worker(communicator))
                    .map_err(|e| ClusterError::Spawn {
                        rank,
                        reason: e.to_string(),
                    })?;
                handles.push((rank, handle));
            }

            handles
                .into_iter()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .map_err(|_| ClusterError::WorkerPanicked(rank))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_neural::Gid;

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            LocalCluster::communicators(0),
            Err(ClusterError::InvalidSize(0))
        ));
    }

    #[test]
    fn test_exchange_returns_peer_spikes_in_rank_order() {
        let results = LocalCluster::run(3, |comm| {
            let local = vec![SpikeEvent::new(Gid(comm.rank() as u32), 1.0)];
            comm.exchange_spikes(&local).unwrap()
        })
        .unwrap();

        assert_eq!(results[0], vec![SpikeEvent::new(Gid(1), 1.0), SpikeEvent::new(Gid(2), 1.0)]);
        assert_eq!(results[1], vec![SpikeEvent::new(Gid(0), 1.0), SpikeEvent::new(Gid(2), 1.0)]);
        assert_eq!(results[2], vec![SpikeEvent::new(Gid(0), 1.0), SpikeEvent::new(Gid(1), 1.0)]);
    }

    #[test]
    fn test_reward_broadcast_from_coordinator() {
        let results = LocalCluster::run(4, |comm| {
            let value = comm.is_coordinator().then_some(-1.0);
            comm.broadcast_reward(value).unwrap()
        })
        .unwrap();
        assert_eq!(results, vec![-1.0; 4]);
    }

    #[test]
    fn test_gather_bytes_in_rank_order() {
        let results = LocalCluster::run(3, |comm| {
            comm.barrier().unwrap();
            comm.gather_bytes(vec![comm.rank() as u8; 2]).unwrap()
        })
        .unwrap();
        assert_eq!(results[0], Some(vec![vec![0, 0], vec![1, 1], vec![2, 2]]));
        assert_eq!(results[1], None);
        assert_eq!(results[2], None);
    }

    #[test]
    fn test_mismatched_collectives_are_reported() {
        let results = LocalCluster::run(2, |comm| {
            if comm.is_coordinator() {
                comm.barrier().map(|_| ())
            } else {
                comm.exchange_spikes(&[]).map(|_| ())
            }
        })
        .unwrap();
        assert!(matches!(
            results[0],
            Err(ClusterError::UnexpectedMessage { expected: "barrier", got: "spikes", .. })
        ));
    }
}
