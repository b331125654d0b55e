use std::collections::BTreeSet;

use derive_more::Deref;
use uuid::Uuid;

use crate::{Catalog, CreateError, DeleteError, ExerciseDefinition, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait LocationRepository {
    async fn read_locations(&self) -> Result<Vec<Location>, ReadError>;
    async fn create_location(
        &self,
        name: Name,
        equipment: BTreeSet<String>,
    ) -> Result<Location, CreateError>;
    async fn delete_location(&self, id: LocationID) -> Result<LocationID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait LocationService {
    async fn get_locations(&self) -> Result<Vec<Location>, ReadError>;
    async fn create_location(
        &self,
        name: Name,
        equipment: BTreeSet<String>,
    ) -> Result<Location, CreateError>;
    async fn delete_location(&self, id: LocationID) -> Result<LocationID, DeleteError>;

    #[must_use]
    fn search_locations<'a>(&self, locations: &'a [Location], query: &str) -> Vec<&'a Location> {
        locations
            .iter()
            .filter(|l| l.name.contains_ignore_case(query))
            .collect()
    }
}

/// A place to work out, characterized by the equipment available there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationID,
    pub name: Name,
    equipment: BTreeSet<String>,
}

impl Location {
    /// Equipment names are stored lower-cased so that they match the catalog.
    #[must_use]
    pub fn new<S: AsRef<str>>(
        id: LocationID,
        name: Name,
        equipment: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            name,
            equipment: equipment
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn equipment(&self) -> &BTreeSet<String> {
        &self.equipment
    }

    #[must_use]
    pub fn provides(&self, exercise: &ExerciseDefinition) -> bool {
        exercise.is_body_only() || self.equipment.contains(&exercise.equipment)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocationID(Uuid);

impl LocationID {
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

impl From<Uuid> for LocationID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for LocationID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// All catalog exercises which can be performed at `location`, in catalog order.
///
/// Body-only exercises are always included, so a location without equipment is not an error.
#[must_use]
pub fn exercises_for<'a>(location: &Location, catalog: &'a Catalog) -> Vec<&'a ExerciseDefinition> {
    catalog.iter().filter(|e| location.provides(e)).collect()
}
