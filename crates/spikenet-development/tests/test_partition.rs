// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for round-robin partitioning

use proptest::prelude::*;
use spikenet_development::Partition;
use spikenet_neural::Gid;

proptest! {
    /// The union of all workers' shares covers every GID exactly once
    #[test]
    fn partition_is_disjoint_cover(n_cells in 0usize..500, workers in 1usize..9) {
        let mut seen = vec![0u32; n_cells];
        for rank in 0..workers {
            let partition = Partition::round_robin(n_cells, workers, rank).unwrap();
            for &gid in partition.owned() {
                seen[gid.index()] += 1;
            }
        }
        prop_assert!(seen.iter().all(|&count| count == 1));
    }

    /// Owner and local index agree with the owned list
    #[test]
    fn local_index_matches_position(n_cells in 1usize..300, workers in 1usize..6) {
        for rank in 0..workers {
            let partition = Partition::round_robin(n_cells, workers, rank).unwrap();
            for (position, &gid) in partition.owned().iter().enumerate() {
                prop_assert_eq!(partition.owner_of(gid), rank);
                prop_assert_eq!(partition.local_index(gid), Some(position));
            }
            prop_assert!(partition.owned().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn foreign_cells_have_no_local_index(n_cells in 1usize..300, workers in 2usize..6, gid in 0u32..300) {
        let partition = Partition::round_robin(n_cells, workers, 0).unwrap();
        let gid = Gid(gid);
        if partition.owner_of(gid) != 0 || gid.index() >= n_cells {
            prop_assert_eq!(partition.local_index(gid), None);
        }
    }
}
