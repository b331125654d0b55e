use std::{
    collections::{BTreeSet, VecDeque},
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use hypertrofind_domain as domain;
use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;
use uuid::Uuid;

use crate::log::{Entry, Error as LogError, MAX_ENTRIES, Repository as LogRepository};

/// Catalog shipped with the application, used when the data directory holds no `exercises.json`.
pub const BUNDLED_CATALOG: &str = include_str!("../resources/exercises.json");

/// Persists each collection as a pretty-printed JSON file inside a data directory.
///
/// Locations and routines stored without IDs are assigned new ones when they are read, and the
/// file is rewritten. Such a read fails with [`domain::StorageError::Unavailable`] if the data
/// directory is not writable.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    bundled_catalog: Option<&'static str>,
}

impl JsonStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            bundled_catalog: Some(BUNDLED_CATALOG),
        }
    }

    /// Require `exercises.json` to be present in the data directory.
    #[must_use]
    pub fn without_bundled_catalog(mut self) -> Self {
        self.bundled_catalog = None;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, store: Store) -> PathBuf {
        self.dir.join(format!("{}.json", store.as_ref()))
    }

    /// Returns `None` if the file does not exist.
    fn read<T: DeserializeOwned>(&self, store: Store) -> Result<Option<T>, JsonStoreError> {
        self.read_file(store)
            .inspect_err(|err| warn!("failed to read {}: {err}", store.as_ref()))
    }

    fn write<T: Serialize + ?Sized>(&self, store: Store, value: &T) -> Result<(), JsonStoreError> {
        self.write_file(store, value)
            .inspect_err(|err| warn!("failed to write {}: {err}", store.as_ref()))
    }

    /// Must not log, as it backs the log repository.
    fn read_file<T: DeserializeOwned>(&self, store: Store) -> Result<Option<T>, JsonStoreError> {
        match fs::read(self.path(store)) {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Must not log, as it backs the log repository.
    fn write_file<T: Serialize + ?Sized>(
        &self,
        store: Store,
        value: &T,
    ) -> Result<(), JsonStoreError> {
        let content = serde_json::to_string_pretty(value)?;
        let path = self.path(store);
        let tmp = path.with_extension("json.tmp");
        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Read a collection whose entries are addressed by ID.
    ///
    /// Entries written without an ID get a new one, and the file is rewritten so that the IDs
    /// stay stable.
    fn read_keyed<V>(&self, store: Store) -> Result<Vec<V>, JsonStoreError>
    where
        V: Keyed + Serialize + DeserializeOwned,
    {
        let mut values: Vec<V> = self.read(store)?.unwrap_or_default();
        let mut assigned = 0;
        for value in &mut values {
            if value.assign_missing_id() {
                assigned += 1;
            }
        }
        if assigned > 0 {
            info!("assigned IDs to {assigned} entries of {}", store.as_ref());
            self.write(store, &values)?;
        }
        Ok(values)
    }
}

fn convert_all<V, R>(values: Vec<V>) -> Result<Vec<R>, JsonStoreError>
where
    R: TryFrom<V>,
    <R as TryFrom<V>>::Error: std::error::Error + Send + Sync + 'static,
{
    values
        .into_iter()
        .map(|v| R::try_from(v).map_err(|err| JsonStoreError::Invalid(err.into())))
        .collect()
}

/// Parse a catalog in the JSON format of `exercises.json`.
pub fn parse_catalog(json: &str) -> Result<domain::Catalog, domain::CatalogError> {
    let exercises: Vec<Exercise> = serde_json::from_str(json)
        .map_err(|err| domain::CatalogError::Unavailable(Box::new(err)))?;
    let exercises: Vec<domain::ExerciseDefinition> = convert_all(exercises)
        .map_err(|err| domain::CatalogError::Unavailable(Box::new(err)))?;
    Ok(domain::Catalog::new(exercises))
}

impl domain::CatalogRepository for JsonStore {
    async fn read_catalog(&self) -> Result<domain::Catalog, domain::CatalogError> {
        match self.read::<Vec<Exercise>>(Store::Exercises) {
            Ok(Some(exercises)) => Ok(domain::Catalog::new(
                convert_all::<_, domain::ExerciseDefinition>(exercises)
                    .map_err(|err| domain::CatalogError::Unavailable(Box::new(err)))?,
            )),
            Ok(None) => match self.bundled_catalog {
                Some(json) => {
                    debug!("no exercises.json in {}, using bundled catalog", self.dir.display());
                    parse_catalog(json)
                }
                None => Err(domain::CatalogError::Unavailable(
                    format!("missing exercises.json in {}", self.dir.display()).into(),
                )),
            },
            Err(err) => Err(domain::CatalogError::Unavailable(Box::new(err))),
        }
    }
}

impl domain::LocationRepository for JsonStore {
    async fn read_locations(&self) -> Result<Vec<domain::Location>, domain::ReadError> {
        Ok(convert_all(self.read_keyed::<Location>(Store::Locations)?)?)
    }

    async fn create_location(
        &self,
        name: domain::Name,
        equipment: BTreeSet<String>,
    ) -> Result<domain::Location, domain::CreateError> {
        let mut locations = self
            .read_keyed::<Location>(Store::Locations)
            .map_err(domain::ReadError::from)?;
        let location = domain::Location::new(domain::LocationID::new(), name, equipment);
        locations.push(Location::from(&location));
        self.write(Store::Locations, &locations)
            .map_err(domain::ReadError::from)?;
        Ok(location)
    }

    async fn delete_location(
        &self,
        id: domain::LocationID,
    ) -> Result<domain::LocationID, domain::DeleteError> {
        let mut locations = self
            .read_keyed::<Location>(Store::Locations)
            .map_err(domain::ReadError::from)?;
        let Some(index) = locations.iter().position(|l| l.id == Some(*id)) else {
            return Err(domain::DeleteError::NotFound);
        };
        locations.remove(index);
        self.write(Store::Locations, &locations)
            .map_err(domain::ReadError::from)?;
        Ok(id)
    }
}

impl domain::RoutineRepository for JsonStore {
    async fn read_routines(&self) -> Result<Vec<domain::Routine>, domain::ReadError> {
        Ok(convert_all(self.read_keyed::<Routine>(Store::Routines)?)?)
    }

    async fn create_routine(
        &self,
        name: domain::Name,
        exercises: Vec<domain::RoutineExercise>,
    ) -> Result<domain::Routine, domain::CreateError> {
        let mut routines = self
            .read_keyed::<Routine>(Store::Routines)
            .map_err(domain::ReadError::from)?;
        let routine = domain::Routine {
            id: domain::RoutineID::new(),
            name,
            exercises,
        };
        routines.push(Routine::from(&routine));
        self.write(Store::Routines, &routines)
            .map_err(domain::ReadError::from)?;
        Ok(routine)
    }

    async fn replace_routine(
        &self,
        routine: domain::Routine,
    ) -> Result<domain::Routine, domain::UpdateError> {
        let mut routines = self
            .read_keyed::<Routine>(Store::Routines)
            .map_err(domain::ReadError::from)?;
        let Some(r) = routines.iter_mut().find(|r| r.id == Some(*routine.id)) else {
            return Err(domain::UpdateError::NotFound);
        };
        *r = Routine::from(&routine);
        self.write(Store::Routines, &routines)
            .map_err(domain::ReadError::from)?;
        Ok(routine)
    }

    async fn delete_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineID, domain::DeleteError> {
        let mut routines = self
            .read_keyed::<Routine>(Store::Routines)
            .map_err(domain::ReadError::from)?;
        let Some(index) = routines.iter().position(|r| r.id == Some(*id)) else {
            return Err(domain::DeleteError::NotFound);
        };
        routines.remove(index);
        self.write(Store::Routines, &routines)
            .map_err(domain::ReadError::from)?;
        Ok(id)
    }
}

impl domain::CompletedRoutineRepository for JsonStore {
    async fn read_completed_routines(
        &self,
    ) -> Result<Vec<domain::CompletedRoutine>, domain::ReadError> {
        Ok(convert_all(
            self.read::<Vec<CompletedRoutine>>(Store::CompletedRoutines)?
                .unwrap_or_default(),
        )?)
    }

    async fn append_completed_routine(
        &self,
        completed_routine: domain::CompletedRoutine,
    ) -> Result<domain::CompletedRoutine, domain::CreateError> {
        let mut completed_routines = self
            .read::<Vec<CompletedRoutine>>(Store::CompletedRoutines)
            .map_err(domain::ReadError::from)?
            .unwrap_or_default();
        completed_routines.push(CompletedRoutine::from(&completed_routine));
        self.write(Store::CompletedRoutines, &completed_routines)
            .map_err(domain::ReadError::from)?;
        Ok(completed_routine)
    }
}

impl domain::SettingsRepository for JsonStore {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        match self.read::<Settings>(Store::Settings)? {
            Some(settings) => Ok(domain::Settings::try_from(settings)
                .map_err(|err| JsonStoreError::Invalid(err.into()))?),
            None => Ok(domain::Settings::default()),
        }
    }

    async fn write_settings(
        &self,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        self.write(Store::Settings, &Settings::from(settings))
            .map_err(domain::ReadError::from)?;
        Ok(settings)
    }
}

impl LogRepository for JsonStore {
    fn read_entries(&self) -> Result<VecDeque<Entry>, LogError> {
        self.read_file(Store::Log)
            .map(Option::unwrap_or_default)
            .map_err(|err| LogError::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: Entry) -> Result<(), LogError> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
        self.write_file(Store::Log, &entries)
            .map_err(|err| LogError::Unknown(err.to_string()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum JsonStoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] anyhow::Error),
}

impl From<JsonStoreError> for domain::StorageError {
    fn from(value: JsonStoreError) -> Self {
        match value {
            JsonStoreError::Io(_) => domain::StorageError::Unavailable,
            _ => domain::StorageError::Other(Box::new(value)),
        }
    }
}

impl From<JsonStoreError> for domain::ReadError {
    fn from(value: JsonStoreError) -> Self {
        match value {
            JsonStoreError::Io(_) => domain::ReadError::Storage(value.into()),
            JsonStoreError::Json(_) | JsonStoreError::Invalid(_) => {
                domain::ReadError::Other(Box::new(value))
            }
        }
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    #[strum(serialize = "exercises")]
    Exercises,
    #[strum(serialize = "locations")]
    Locations,
    #[strum(serialize = "routines")]
    Routines,
    #[strum(serialize = "completedRoutines")]
    CompletedRoutines,
    #[strum(serialize = "settings")]
    Settings,
    #[strum(serialize = "log")]
    Log,
}

/// Entries of collections which are addressed by ID.
trait Keyed {
    /// Returns `true` if a new ID was assigned.
    fn assign_missing_id(&mut self) -> bool;
}

/// Failure to turn stored data into domain objects.
#[derive(thiserror::Error, Debug)]
pub enum InvalidData {
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    Parse(#[from] domain::ParseError),
    #[error(transparent)]
    Set(#[from] domain::SetError),
    #[error("invalid number of repetitions ({0})")]
    Reps(f64),
    #[error("routine size must be positive")]
    RoutineSize,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub force: Option<String>,
    pub level: String,
    pub mechanic: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub category: String,
}

impl From<&domain::ExerciseDefinition> for Exercise {
    fn from(value: &domain::ExerciseDefinition) -> Self {
        Self {
            name: value.name.clone(),
            force: value.force.map(|f| f.to_string()),
            level: value.level.to_string(),
            mechanic: value.mechanic.map(|m| m.to_string()),
            equipment: Some(value.equipment.clone()),
            primary_muscles: value.primary_muscles.clone(),
            secondary_muscles: value.secondary_muscles.clone(),
            instructions: value.instructions.clone(),
            category: value.category.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::ExerciseDefinition {
    type Error = domain::ParseError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            force: value.force.as_deref().map(str::parse).transpose()?,
            level: value.level.parse()?,
            mechanic: value.mechanic.as_deref().map(str::parse).transpose()?,
            equipment: value
                .equipment
                .unwrap_or_else(|| domain::BODY_ONLY.to_string()),
            primary_muscles: value.primary_muscles,
            secondary_muscles: value.secondary_muscles,
            instructions: value.instructions,
            category: value.category,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub equipment: Vec<String>,
}

impl Keyed for Location {
    fn assign_missing_id(&mut self) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(Uuid::new_v4());
        true
    }
}

impl From<&domain::Location> for Location {
    fn from(value: &domain::Location) -> Self {
        Self {
            id: Some(*value.id),
            name: value.name.to_string(),
            equipment: value.equipment().iter().cloned().collect(),
        }
    }
}

impl TryFrom<Location> for domain::Location {
    type Error = domain::NameError;

    fn try_from(value: Location) -> Result<Self, Self::Error> {
        Ok(domain::Location::new(
            value.id.map(domain::LocationID::from).unwrap_or_default(),
            domain::Name::new(&value.name)?,
            value.equipment,
        ))
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Routine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub exercises: Vec<RoutineExercise>,
}

impl Keyed for Routine {
    fn assign_missing_id(&mut self) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(Uuid::new_v4());
        true
    }
}

impl From<&domain::Routine> for Routine {
    fn from(value: &domain::Routine) -> Self {
        Self {
            id: Some(*value.id),
            name: value.name.to_string(),
            exercises: value.exercises.iter().map(RoutineExercise::from).collect(),
        }
    }
}

impl TryFrom<Routine> for domain::Routine {
    type Error = InvalidData;

    fn try_from(value: Routine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.map(domain::RoutineID::from).unwrap_or_default(),
            name: domain::Name::new(&value.name)?,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::RoutineExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct RoutineExercise {
    pub name: String,
    pub sets: Vec<ExerciseSet>,
    #[serde(default)]
    pub muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub equipment: Option<String>,
}

impl From<&domain::RoutineExercise> for RoutineExercise {
    fn from(value: &domain::RoutineExercise) -> Self {
        Self {
            name: value.name.clone(),
            sets: value.sets.iter().copied().map(ExerciseSet::from).collect(),
            muscles: value.muscles.clone(),
            instructions: value.instructions.clone(),
            equipment: value.equipment.clone(),
        }
    }
}

impl TryFrom<RoutineExercise> for domain::RoutineExercise {
    type Error = InvalidData;

    fn try_from(value: RoutineExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            sets: value
                .sets
                .into_iter()
                .map(domain::ExerciseSet::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            muscles: value.muscles,
            instructions: value.instructions,
            equipment: value.equipment,
        })
    }
}

/// Repetitions are stored as floating point numbers.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSet {
    pub reps: f64,
    pub weight: f64,
}

impl From<domain::ExerciseSet> for ExerciseSet {
    fn from(value: domain::ExerciseSet) -> Self {
        Self {
            reps: f64::from(value.reps),
            weight: value.weight,
        }
    }
}

impl TryFrom<ExerciseSet> for domain::ExerciseSet {
    type Error = InvalidData;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(value: ExerciseSet) -> Result<Self, Self::Error> {
        if !value.reps.is_finite() || value.reps < 0.0 || value.reps > f64::from(u32::MAX) {
            return Err(InvalidData::Reps(value.reps));
        }
        Ok(domain::ExerciseSet::new(
            value.reps.round() as u32,
            value.weight,
        )?)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedRoutine {
    pub routine: Routine,
    pub weight: f64,
    pub date: NaiveDateTime,
    pub day: String,
}

impl From<&domain::CompletedRoutine> for CompletedRoutine {
    fn from(value: &domain::CompletedRoutine) -> Self {
        Self {
            routine: Routine::from(&value.routine),
            weight: value.weight,
            date: value.date,
            day: value.day.clone(),
        }
    }
}

impl TryFrom<CompletedRoutine> for domain::CompletedRoutine {
    type Error = InvalidData;

    fn try_from(value: CompletedRoutine) -> Result<Self, Self::Error> {
        Ok(Self {
            routine: domain::Routine::try_from(value.routine)?,
            weight: value.weight,
            date: value.date,
            day: value.day,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub routine_size: usize,
    pub day_grouping: DayGrouping,
    pub placeholder_set: ExerciseSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(domain::Settings::default())
    }
}

impl From<domain::Settings> for Settings {
    fn from(value: domain::Settings) -> Self {
        Self {
            routine_size: value.routine_size,
            day_grouping: value.day_grouping.into(),
            placeholder_set: value.placeholder_set.into(),
        }
    }
}

impl TryFrom<Settings> for domain::Settings {
    type Error = InvalidData;

    fn try_from(value: Settings) -> Result<Self, Self::Error> {
        if value.routine_size == 0 {
            return Err(InvalidData::RoutineSize);
        }
        Ok(Self {
            routine_size: value.routine_size,
            day_grouping: value.day_grouping.into(),
            placeholder_set: value.placeholder_set.try_into()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayGrouping {
    Individual,
    Summed,
}

impl From<domain::DayGrouping> for DayGrouping {
    fn from(value: domain::DayGrouping) -> Self {
        match value {
            domain::DayGrouping::Individual => DayGrouping::Individual,
            domain::DayGrouping::Summed => DayGrouping::Summed,
        }
    }
}

impl From<DayGrouping> for domain::DayGrouping {
    fn from(value: DayGrouping) -> Self {
        match value {
            DayGrouping::Individual => domain::DayGrouping::Individual,
            DayGrouping::Summed => domain::DayGrouping::Summed,
        }
    }
}
