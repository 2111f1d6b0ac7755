// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Round-robin assignment of cells to workers.

GID `g` is owned by worker `g mod W`. A worker's local index for a cell is
its position in the ascending list of owned GIDs, which for round-robin is
`g / W`.
*/

use crate::types::{DevelopmentError, DevelopmentResult};
use spikenet_neural::{Gid, Rank};

/// Cells owned by one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    rank: Rank,
    workers: usize,
    n_cells: usize,
    owned: Vec<Gid>,
}

impl Partition {
    /// Partition `n_cells` over `n_workers` and keep the share of `rank`
    pub fn round_robin(n_cells: usize, n_workers: usize, rank: Rank) -> DevelopmentResult<Self> {
        if n_workers == 0 {
            return Err(DevelopmentError::InvalidPartition(
                "at least one worker is required".to_string(),
            ));
        }
        if rank >= n_workers {
            return Err(DevelopmentError::InvalidPartition(format!(
                "rank {} out of range for {} workers",
                rank, n_workers
            )));
        }

        let owned = (rank..n_cells).step_by(n_workers).map(Gid::from).collect();
        Ok(Self {
            rank,
            workers: n_workers,
            n_cells,
            owned,
        })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Total cells in the network (not just this worker's share)
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// Worker owning `gid`
    #[inline]
    pub fn owner_of(&self, gid: Gid) -> Rank {
        gid.index() % self.workers
    }

    #[inline]
    pub fn is_local(&self, gid: Gid) -> bool {
        gid.index() < self.n_cells && self.owner_of(gid) == self.rank
    }

    /// Position of `gid` in this worker's ascending owned list
    pub fn local_index(&self, gid: Gid) -> Option<usize> {
        self.is_local(gid).then(|| gid.index() / self.workers)
    }

    /// Owned GIDs, ascending
    pub fn owned(&self) -> &[Gid] {
        &self.owned
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_assignment() {
        let partition = Partition::round_robin(10, 3, 1).unwrap();
        assert_eq!(partition.owned(), &[Gid(1), Gid(4), Gid(7)]);
        assert_eq!(partition.owner_of(Gid(8)), 2);
        assert_eq!(partition.local_index(Gid(7)), Some(2));
        assert_eq!(partition.local_index(Gid(8)), None);
    }

    #[test]
    fn test_more_workers_than_cells() {
        let partition = Partition::round_robin(2, 4, 3).unwrap();
        assert!(partition.is_empty());
    }

    #[test]
    fn test_invalid_rank_rejected() {
        assert!(Partition::round_robin(10, 2, 2).is_err());
        assert!(Partition::round_robin(10, 0, 0).is_err());
    }
}
