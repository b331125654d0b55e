use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, ExerciseDefinition, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    async fn read_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn create_routine(
        &self,
        name: Name,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError>;
    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn create_routine(
        &self,
        name: Name,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError>;
    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: RoutineID,
    pub name: Name,
    pub exercises: Vec<RoutineExercise>,
}

impl Routine {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Sum of the weights of all sets. Reps are not factored in.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.exercises.iter().map(RoutineExercise::total_weight).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(Uuid);

impl RoutineID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A catalog exercise instantiated into a routine.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineExercise {
    pub name: String,
    pub sets: Vec<ExerciseSet>,
    pub muscles: Vec<String>,
    pub instructions: Vec<String>,
    pub equipment: Option<String>,
}

impl RoutineExercise {
    #[must_use]
    pub fn from_definition(definition: &ExerciseDefinition, set: ExerciseSet) -> Self {
        Self {
            name: definition.name.clone(),
            sets: vec![set],
            muscles: definition.primary_muscles.clone(),
            instructions: definition.instructions.clone(),
            equipment: Some(definition.equipment.clone()),
        }
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.sets.iter().map(|s| s.weight).sum()
    }

    pub fn add_set(&mut self) {
        self.sets.push(ExerciseSet::default());
    }

    /// Remove the set at `index`. The last remaining set cannot be removed.
    pub fn remove_set(&mut self, index: usize) -> Result<ExerciseSet, SetError> {
        if index >= self.sets.len() {
            return Err(SetError::OutOfRange(index));
        }
        if self.sets.len() == 1 {
            return Err(SetError::LastSet);
        }
        Ok(self.sets.remove(index))
    }

    pub fn update_set(&mut self, index: usize, set: ExerciseSet) -> Result<(), SetError> {
        match self.sets.get_mut(index) {
            Some(s) => {
                *s = set;
                Ok(())
            }
            None => Err(SetError::OutOfRange(index)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExerciseSet {
    pub reps: u32,
    pub weight: f64,
}

impl ExerciseSet {
    /// Scheme given to generated exercises, expected to be edited before the workout is finished.
    pub const PLACEHOLDER: ExerciseSet = ExerciseSet {
        reps: 10,
        weight: 100.0,
    };

    pub fn new(reps: u32, weight: f64) -> Result<Self, SetError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SetError::InvalidWeight(weight));
        }
        Ok(Self { reps, weight })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetError {
    #[error("Set {0} does not exist")]
    OutOfRange(usize),
    #[error("An exercise must keep at least one set")]
    LastSet,
    #[error("Weight must be a non-negative number ({0})")]
    InvalidWeight(f64),
}
