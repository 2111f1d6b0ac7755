// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation time and periodic-action markers

/// Tolerance for comparing accumulated times (ms)
const TIME_EPSILON: f64 = 1e-9;

/// Periodic actions tracked by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Reward,
    Snapshot,
    Actuator,
    Progress,
}

impl Marker {
    fn slot(self) -> usize {
        match self {
            Marker::Reward => 0,
            Marker::Snapshot => 1,
            Marker::Actuator => 2,
            Marker::Progress => 3,
        }
    }
}

/// Current time, duration, increment bound and the time each periodic
/// action last ran. All markers start at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    time: f64,
    duration: f64,
    loop_step: f64,
    markers: [f64; 4],
}

impl SimulationClock {
    pub fn new(duration: f64, loop_step: f64) -> Self {
        Self {
            time: 0.0,
            duration,
            loop_step,
            markers: [0.0; 4],
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// End of the next increment: `min(duration, time + loop_step)`
    pub fn next_stop(&self) -> f64 {
        (self.time + self.loop_step).min(self.duration)
    }

    pub fn advance_to(&mut self, t: f64) {
        self.time = t;
    }

    pub fn is_done(&self) -> bool {
        self.time >= self.duration - TIME_EPSILON
    }

    /// Whether at least `interval` passed since `marker` was last set
    pub fn due(&self, marker: Marker, interval: f64) -> bool {
        self.time - self.markers[marker.slot()] >= interval - TIME_EPSILON
    }

    pub fn mark(&mut self, marker: Marker) {
        self.markers[marker.slot()] = self.time;
    }

    pub fn last(&self, marker: Marker) -> f64 {
        self.markers[marker.slot()]
    }

    /// Fraction of the run completed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.time / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_increment_is_clipped() {
        let mut clock = SimulationClock::new(25.0, 10.0);
        let mut stops = Vec::new();
        while !clock.is_done() {
            let t = clock.next_stop();
            stops.push(t);
            clock.advance_to(t);
        }
        assert_eq!(stops, vec![10.0, 20.0, 25.0]);
    }

    #[test]
    fn test_markers() {
        let mut clock = SimulationClock::new(100.0, 1.0);
        clock.advance_to(49.0);
        assert!(!clock.due(Marker::Reward, 50.0));
        clock.advance_to(50.0);
        assert!(clock.due(Marker::Reward, 50.0));
        clock.mark(Marker::Reward);
        assert_eq!(clock.last(Marker::Reward), 50.0);
        assert!(!clock.due(Marker::Reward, 50.0));
        assert!(clock.due(Marker::Snapshot, 50.0));
    }
}
