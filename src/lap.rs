//! Lap timing against the start/finish zone.
//!
//! Crossings are edge-triggered: a car entering the zone counts once, and the
//! zone re-arms only after the car's centre has left it.  Times are wall-clock
//! milliseconds with time spent in the pause menu subtracted.

use crate::config::RaceConfig;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LapTimer {
    /// 0 until the first crossing (the run to the line from the grid).
    pub lap: u32,
    lap_start_ms: u64,
    pub last_lap_ms: Option<u64>,
    pub best_lap_ms: Option<u64>,
    pub total_lap_ms: u64,
    pub completed_laps: u32,
    crossed_line: bool,
    pause_started_ms: Option<u64>,
    paused_this_lap_ms: u64,
}

/// A start-line crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapCrossing {
    /// Lap number the car is now on.
    pub lap: u32,
    /// Time of the lap just finished; `None` for the first crossing.
    pub lap_time_ms: Option<u64>,
}

impl LapTimer {
    /// Stamp the start of a pause.  Repeated calls keep the first stamp.
    pub fn begin_pause(&mut self, now_ms: u64) {
        if self.pause_started_ms.is_none() {
            self.pause_started_ms = Some(now_ms);
        }
    }

    /// Add the pause that began at [`begin_pause`](Self::begin_pause) to this
    /// lap's paused total.
    pub fn end_pause(&mut self, now_ms: u64) {
        if let Some(start) = self.pause_started_ms.take() {
            self.paused_this_lap_ms += now_ms.saturating_sub(start);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_ms.is_some()
    }

    /// Running time of the current lap, net of pauses.
    pub fn current_lap_ms(&self, now_ms: u64) -> Option<u64> {
        if self.lap == 0 {
            return None;
        }
        let ongoing = self
            .pause_started_ms
            .map_or(0, |start| now_ms.saturating_sub(start));
        Some(
            now_ms
                .saturating_sub(self.lap_start_ms)
                .saturating_sub(self.paused_this_lap_ms + ongoing),
        )
    }

    /// `total / completed`, once at least one lap is done.
    pub fn average_lap_ms(&self) -> Option<u64> {
        (self.completed_laps > 0).then(|| self.total_lap_ms / u64::from(self.completed_laps))
    }

    /// Feed the car's zone membership for this tick.
    pub fn update(&mut self, in_zone: bool, now_ms: u64) -> Option<LapCrossing> {
        if !in_zone {
            self.crossed_line = false;
            return None;
        }
        if self.crossed_line {
            return None;
        }
        self.crossed_line = true;

        let lap_time_ms = self.current_lap_ms(now_ms);
        if let Some(time) = lap_time_ms {
            self.last_lap_ms = Some(time);
            self.best_lap_ms = Some(self.best_lap_ms.map_or(time, |best| best.min(time)));
            self.total_lap_ms += time;
            self.completed_laps += 1;
        }

        self.lap += 1;
        self.lap_start_ms = now_ms;
        self.paused_this_lap_ms = 0;
        Some(LapCrossing {
            lap: self.lap,
            lap_time_ms,
        })
    }
}

/// Settle per-lap damage bookkeeping after a crossing: a lap without any
/// damage earns the clean-lap bonus when healing is on.
pub fn settle_lap_damage(vehicle: &mut Vehicle, config: &RaceConfig) {
    if config.healing_enabled && vehicle.lap_damage_increase == 0.0 {
        vehicle.damage = (vehicle.damage - config.clean_lap_bonus_recovery).max(0.0);
    }
    vehicle.lap_damage_increase = 0.0;
}
