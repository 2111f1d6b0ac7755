// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Resolved population table.

Populations occupy contiguous GID ranges in configuration order. Names are
resolved to `PopulationId`s once here so that generation never handles
strings.
*/

use std::ops::Range;

use ahash::AHashMap;
use spikenet_config::{NetworkConfig, PopulationRole};
use spikenet_neural::{Cell, CellClass, Gid, Polarity, PopulationId};

use crate::layout::SpatialLayout;
use crate::partition::Partition;
use crate::types::{DevelopmentError, DevelopmentResult};

/// Population role with names resolved to ids
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Standard,
    Drive,
    MotorCommand {
        muscles: usize,
        antagonists: Vec<usize>,
    },
    AntagonistInhibitory {
        mirrors: PopulationId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub id: PopulationId,
    pub name: String,
    pub polarity: Polarity,
    pub class: CellClass,
    /// First GID of the population
    pub start: usize,
    pub size: usize,
    pub depth_band: [f64; 2],
    pub role: Role,
}

impl Population {
    pub fn gids(&self) -> Range<usize> {
        self.start..self.start + self.size
    }

    pub fn contains(&self, gid: Gid) -> bool {
        self.gids().contains(&gid.index())
    }

    /// Index of `gid` within this population
    pub fn offset(&self, gid: Gid) -> usize {
        gid.index() - self.start
    }

    pub fn is_drive(&self) -> bool {
        matches!(self.role, Role::Drive)
    }
}

/// All populations plus a per-cell population lookup
#[derive(Debug, Clone)]
pub struct PopulationTable {
    populations: Vec<Population>,
    by_name: AHashMap<String, PopulationId>,
    cell_population: Vec<PopulationId>,
}

impl PopulationTable {
    pub fn from_config(network: &NetworkConfig) -> DevelopmentResult<Self> {
        let mut by_name = AHashMap::with_capacity(network.populations.len());
        for (index, spec) in network.populations.iter().enumerate() {
            let id = u16::try_from(index).map_err(|_| {
                DevelopmentError::InvalidConfiguration("too many populations".to_string())
            })?;
            by_name.insert(spec.name.clone(), PopulationId(id));
        }

        let mut populations = Vec::with_capacity(network.populations.len());
        let mut cell_population = Vec::with_capacity(network.total_cells());
        let mut start = 0;
        for (index, spec) in network.populations.iter().enumerate() {
            let role = match &spec.role {
                PopulationRole::Standard => Role::Standard,
                PopulationRole::Drive => Role::Drive,
                PopulationRole::MotorCommand {
                    muscles,
                    antagonists,
                } => Role::MotorCommand {
                    muscles: *muscles,
                    antagonists: antagonists.clone(),
                },
                PopulationRole::AntagonistInhibitory { mirrors } => Role::AntagonistInhibitory {
                    mirrors: *by_name
                        .get(mirrors)
                        .ok_or_else(|| DevelopmentError::UnknownPopulation(mirrors.clone()))?,
                },
            };
            let id = PopulationId(index as u16);
            populations.push(Population {
                id,
                name: spec.name.clone(),
                polarity: spec.polarity,
                class: spec.class,
                start,
                size: spec.size,
                depth_band: spec.depth_band,
                role,
            });
            cell_population.extend(std::iter::repeat(id).take(spec.size));
            start += spec.size;
        }

        Ok(Self {
            populations,
            by_name,
            cell_population,
        })
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn total_cells(&self) -> usize {
        self.cell_population.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Population> {
        self.populations.iter()
    }

    pub fn get(&self, id: PopulationId) -> &Population {
        &self.populations[id.index()]
    }

    /// Look a population up by name
    ///
    /// # Errors
    ///
    /// `DevelopmentError::UnknownPopulation` for names not in the table
    pub fn by_name(&self, name: &str) -> DevelopmentResult<&Population> {
        self.by_name
            .get(name)
            .map(|id| self.get(*id))
            .ok_or_else(|| DevelopmentError::UnknownPopulation(name.to_string()))
    }

    /// Population of a cell; `gid` must be below `total_cells()`
    #[inline]
    pub fn of(&self, gid: Gid) -> &Population {
        self.get(self.cell_population[gid.index()])
    }

    /// Instantiate the cells owned by `partition`
    pub fn local_cells(&self, layout: &SpatialLayout, partition: &Partition) -> Vec<Cell> {
        partition
            .owned()
            .iter()
            .enumerate()
            .map(|(local_index, &gid)| {
                let population = self.of(gid);
                Cell {
                    gid,
                    population: population.id,
                    polarity: population.polarity,
                    class: population.class,
                    position: layout.position(gid),
                    rank: partition.rank(),
                    local_index,
                }
            })
            .collect()
    }
}
