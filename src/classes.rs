use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::stats::{Attribute, StatVector};

/// Class used whenever matching is impossible (empty table, or no stats
/// were judged at all).
pub const DEFAULT_CLASS: &str = "Deprived";

/// A starting class baseline: its level plus the nine attribute values it
/// begins the game with. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ClassProfile {
    pub name: String,
    pub level: u32,
    pub stats: StatVector,
}

/// The starting-class table, read once and never mutated. Row order is
/// preserved; `match_class` ties resolve to the earliest row.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    profiles: Vec<ClassProfile>,
}

impl ClassTable {
    /// Loads the table from `path` when given, otherwise from the table
    /// compiled into the binary. A missing or malformed table degrades to
    /// an empty one with a warning; it never aborts the session.
    pub fn load(path: Option<&Path>) -> Self {
        let parsed = match path {
            Some(path) => std::fs::read_to_string(path)
                .map_err(AppError::from)
                .and_then(|text| Self::parse(&text)),
            None => Self::parse(include_str!("../data/class_stats.csv")),
        };

        match parsed {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(error = %err, "class table unavailable, using empty table");
                Self::default()
            }
        }
    }

    /// Parses the row-oriented table: a header naming the columns, then
    /// one row per class. Any malformed row rejects the whole table.
    pub fn parse(text: &str) -> AppResult<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| AppError::ClassTable("empty table".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let column_index = |name: &str| -> AppResult<usize> {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| AppError::ClassTable(format!("missing column {name}")))
        };

        let class_col = column_index("Class")?;
        let level_col = column_index("Level")?;
        let mut attr_cols = Vec::with_capacity(Attribute::ALL.len());
        for attr in Attribute::ALL {
            attr_cols.push((attr, column_index(attr.name())?));
        }

        let mut profiles = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(AppError::ClassTable(format!(
                    "row has {} fields, expected {}",
                    fields.len(),
                    columns.len()
                )));
            }

            let parse_value = |col: usize| -> AppResult<u32> {
                fields[col].parse().map_err(|_| {
                    AppError::ClassTable(format!("bad value {:?} in row {:?}", fields[col], line))
                })
            };

            let mut stats = StatVector::zeroed();
            for &(attr, col) in &attr_cols {
                stats.set(attr, parse_value(col)?);
            }

            profiles.push(ClassProfile {
                name: fields[class_col].to_string(),
                level: parse_value(level_col)?,
                stats,
            });
        }

        Ok(Self { profiles })
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn profile(&self, name: &str) -> Option<&ClassProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Picks the class whose top-three attributes overlap the user's
    /// top-three the most. Ties go to the earliest row; an empty table
    /// yields [`DEFAULT_CLASS`]. Always returns exactly one name.
    pub fn match_class(&self, stats: &StatVector) -> &str {
        let user_top = stats.top_three();

        let mut best: Option<&ClassProfile> = None;
        let mut best_score = -1i32;

        for profile in &self.profiles {
            let class_top = profile.stats.top_three();
            let score = user_top
                .iter()
                .filter(|attr| class_top.contains(attr))
                .count() as i32;

            if score > best_score {
                best_score = score;
                best = Some(profile);
            }
        }

        best.map_or(DEFAULT_CLASS, |p| p.name.as_str())
    }
}
