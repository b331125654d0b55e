//! Random routine generation
//!
//! A routine is generated by narrowing the catalog down to the exercises which can be performed
//! at a location, keeping those which primarily train one of the targeted muscles and drawing a
//! random subset of them.

use std::collections::BTreeSet;

use rand::Rng;

use crate::{Catalog, ExerciseDefinition, ExerciseSet, Location, RoutineExercise, exercises_for};

pub const DEFAULT_ROUTINE_SIZE: usize = 6;

/// Exercises whose primary muscles intersect `targets`.
///
/// No target muscles select no exercises.
#[must_use]
pub fn filter_by_muscles<'a>(
    exercises: &[&'a ExerciseDefinition],
    targets: &BTreeSet<String>,
) -> Vec<&'a ExerciseDefinition> {
    exercises
        .iter()
        .copied()
        .filter(|e| e.trains_any(targets))
        .collect()
}

/// Draw up to `count` exercises without replacement and wrap each into a routine exercise with
/// one placeholder set.
///
/// If the pool holds fewer than `count` exercises, all of them are returned in random order.
pub fn sample<R: Rng + ?Sized>(
    exercises: &[&ExerciseDefinition],
    count: usize,
    rng: &mut R,
) -> Vec<RoutineExercise> {
    draw(exercises.to_vec(), count, rng)
        .into_iter()
        .map(|e| RoutineExercise::from_definition(e, ExerciseSet::PLACEHOLDER))
        .collect()
}

fn draw<T, R: Rng + ?Sized>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    let count = count.min(pool.len());
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let index = rng.random_range(0..pool.len());
        picked.push(pool.swap_remove(index));
    }
    picked
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutineGenerator {
    pub count: usize,
    pub set: ExerciseSet,
}

impl Default for RoutineGenerator {
    fn default() -> Self {
        Self {
            count: DEFAULT_ROUTINE_SIZE,
            set: ExerciseSet::PLACEHOLDER,
        }
    }
}

impl RoutineGenerator {
    pub fn generate<R: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        location: &Location,
        muscles: &BTreeSet<String>,
        rng: &mut R,
    ) -> Vec<RoutineExercise> {
        let candidates = filter_by_muscles(&exercises_for(location, catalog), muscles);
        log::debug!(
            "generating routine for {} from {} candidates",
            location.name,
            candidates.len()
        );
        draw(candidates, self.count, rng)
            .into_iter()
            .map(|e| RoutineExercise::from_definition(e, self.set))
            .collect()
    }
}
