use std::collections::BTreeMap;

use web_time::Duration;

use super::Level;

/// best times are kept per level, at most this many each
pub const MAX_RECORDS: usize = 5;

/// fastest completed games, per level, fastest first
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BestTimes {
    times: BTreeMap<Level, Vec<Duration>>,
}

impl BestTimes {
    pub fn times(&self, level: Level) -> &[Duration] {
        self.times.get(&level).map_or(&[], Vec::as_slice)
    }

    pub fn best(&self, level: Level) -> Option<Duration> {
        self.times(level).first().copied()
    }

    /// returns the rank (zero based) if `time` made it into the list
    pub fn insert(&mut self, level: Level, time: Duration) -> Option<usize> {
        let times = self.times.entry(level).or_default();
        let rank = times.partition_point(|&t| t <= time);
        if rank >= MAX_RECORDS {
            return None;
        }
        times.insert(rank, time);
        times.truncate(MAX_RECORDS);
        log::info!("new record for {}: {} (rank {})", level.name(), format_time(time), rank + 1);
        Some(rank)
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }
}

/// `mm:ss.cc`, minutes keep counting past 59
pub fn format_time(time: Duration) -> String {
    let centis = time.as_millis() / 10;
    let minutes = centis / 6000;
    let seconds = (centis / 100) % 60;
    format!("{minutes:02}:{seconds:02}.{:02}", centis % 100)
}
