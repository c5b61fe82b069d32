use std::collections::BTreeMap;

use serde::Serialize;

use crate::workouts::{ExerciseDefinition, WorkoutEntry};

/// Entries of one exercise, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistoryGroup {
    pub exercise_name: String,
    pub entries: Vec<WorkoutEntry>,
}

/// Workout history grouped by exercise name.
///
/// Built from the full stored list after every write, so each group is sorted
/// newest first from authoritative data rather than patched in place.
#[derive(Debug, Default, Clone)]
pub struct ExerciseHistory {
    groups: BTreeMap<String, Vec<WorkoutEntry>>,
}

impl ExerciseHistory {
    pub fn build<D, E>(definitions: D, entries: E) -> Self
    where
        D: IntoIterator<Item = ExerciseDefinition>,
        E: IntoIterator<Item = WorkoutEntry>,
    {
        let mut history = Self::default();
        for def in definitions {
            history.define(def.exercise_name);
        }
        for entry in entries {
            history
                .groups
                .entry(entry.exercise_name.clone())
                .or_default()
                .push(entry);
        }
        for group in history.groups.values_mut() {
            sort_newest_first(group);
        }
        history
    }

    /// Adds an exercise name with an empty history if it is not known yet.
    pub fn define(&mut self, exercise_name: String) {
        self.groups.entry(exercise_name).or_default();
    }

    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn entries(&self, exercise_name: &str) -> Option<&[WorkoutEntry]> {
        self.groups.get(exercise_name).map(Vec::as_slice)
    }

    pub fn into_groups(self) -> Vec<ExerciseHistoryGroup> {
        self.groups
            .into_iter()
            .map(|(exercise_name, entries)| ExerciseHistoryGroup {
                exercise_name,
                entries,
            })
            .collect()
    }
}

fn sort_newest_first(group: &mut [WorkoutEntry]) {
    group.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
