use chrono::{NaiveTime, Weekday};
use common::errors::AppError;
use std::collections::HashMap;

/// Weekly watchable intervals: weekday to inclusive [start, end] local times.
/// Days without an entry are never watchable.
#[derive(Debug, Clone)]
pub struct ViewingWindows {
    windows: HashMap<Weekday, (NaiveTime, NaiveTime)>,
}

const DEFAULT_WINDOWS: &[(&str, &str, &str)] = &[
    ("Monday", "15:00:00", "22:30:00"),
    ("Tuesday", "15:00:00", "22:30:00"),
    ("Wednesday", "15:00:00", "22:30:00"),
    ("Thursday", "15:00:00", "22:30:00"),
    ("Friday", "15:00:00", "23:30:00"),
    ("Saturday", "09:00:00", "23:30:00"),
    ("Sunday", "09:00:00", "22:00:00"),
];

impl ViewingWindows {
    /// Build a window table from day-name keyed (start, end) time strings.
    pub fn from_table(table: &HashMap<String, (String, String)>) -> Result<Self, AppError> {
        let mut windows = HashMap::new();

        for (day, (start, end)) in table {
            let weekday: Weekday = day
                .parse()
                .map_err(|_| AppError::validation(format!("Unknown weekday: {day}")))?;
            let start = parse_time(start)?;
            let end = parse_time(end)?;
            if end < start {
                return Err(AppError::validation(format!(
                    "Window for {day} ends before it starts"
                )));
            }
            windows.insert(weekday, (start, end));
        }

        if windows.is_empty() {
            return Err(AppError::validation("Viewing window table is empty"));
        }

        Ok(Self { windows })
    }

    pub fn get(&self, day: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        self.windows.get(&day).copied()
    }

    /// Whether `time` falls inside `day`'s window, bounds inclusive.
    pub fn contains(&self, day: Weekday, time: NaiveTime) -> bool {
        self.windows
            .get(&day)
            .is_some_and(|&(start, end)| start <= time && time <= end)
    }
}

impl Default for ViewingWindows {
    fn default() -> Self {
        let table = DEFAULT_WINDOWS
            .iter()
            .map(|&(day, start, end)| (day.to_string(), (start.to_string(), end.to_string())))
            .collect();
        Self::from_table(&table).expect("built-in viewing windows are valid")
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|_| AppError::validation(format!("Invalid window time: {raw}")))
}
