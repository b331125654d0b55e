use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use log::{debug, error, info};
use rand::Rng;

use crate::{
    AppState, Catalog, CatalogError, CatalogRepository, CatalogService, CompletedRoutine,
    CompletedRoutineRepository, CreateError, DeleteError, LoadError, Location, LocationID,
    LocationRepository, LocationService, Name, ReadError, Routine, RoutineExercise, RoutineID,
    RoutineRepository, RoutineService, Settings, SettingsRepository, SettingsService, UpdateError,
    WeeklyStats, WorkoutService, complete, sort_newest_first, weekly_stats,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R> Service<R>
where
    R: CatalogRepository
        + LocationRepository
        + RoutineRepository
        + CompletedRoutineRepository
        + SettingsRepository,
{
    pub async fn load_state(&self) -> Result<AppState, LoadError> {
        let catalog = self.get_catalog().await?;
        let locations = self.get_locations().await?;
        let routines = self.get_routines().await?;
        let completed_routines = self.get_completed_routines().await?;
        info!(
            "loaded {} exercises, {} locations, {} routines, {} completed routines",
            catalog.len(),
            locations.len(),
            routines.len(),
            completed_routines.len()
        );
        Ok(AppState::new(
            catalog,
            locations,
            routines,
            completed_routines,
        ))
    }
}

impl<R: SettingsRepository> Service<R> {
    /// Generate a random routine with the configured size and set scheme.
    pub async fn generate_routine<G: Rng + ?Sized>(
        &self,
        catalog: &Catalog,
        location: &Location,
        muscles: &BTreeSet<String>,
        rng: &mut G,
    ) -> Result<Vec<RoutineExercise>, ReadError> {
        let settings = self.get_settings().await?;
        Ok(settings
            .generator()
            .generate(catalog, location, muscles, rng))
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: CatalogRepository> CatalogService for Service<R> {
    async fn get_catalog(&self) -> Result<Catalog, CatalogError> {
        let result = self.repository.read_catalog().await;
        if let Err(ref err) = result {
            error!("failed to get catalog: {err}");
        }
        result
    }
}

impl<R: LocationRepository> LocationService for Service<R> {
    async fn get_locations(&self) -> Result<Vec<Location>, ReadError> {
        log_on_error!(
            self.repository.read_locations(),
            ReadError,
            "get",
            "locations"
        )
    }

    async fn create_location(
        &self,
        name: Name,
        equipment: BTreeSet<String>,
    ) -> Result<Location, CreateError> {
        log_on_error!(
            self.repository.create_location(name, equipment),
            CreateError,
            "create",
            "location"
        )
    }

    async fn delete_location(&self, id: LocationID) -> Result<LocationID, DeleteError> {
        log_on_error!(
            self.repository.delete_location(id),
            DeleteError,
            "delete",
            "location"
        )
    }
}

impl<R: RoutineRepository> RoutineService for Service<R> {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn create_routine(
        &self,
        name: Name,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError> {
        log_on_error!(
            self.repository.create_routine(name, exercises),
            CreateError,
            "create",
            "routine"
        )
    }

    async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.replace_routine(routine),
            UpdateError,
            "replace",
            "routine"
        )
    }

    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
        log_on_error!(
            self.repository.delete_routine(id),
            DeleteError,
            "delete",
            "routine"
        )
    }
}

impl<R: CompletedRoutineRepository + SettingsRepository> WorkoutService for Service<R> {
    async fn get_completed_routines(&self) -> Result<Vec<CompletedRoutine>, ReadError> {
        let mut completed_routines = log_on_error!(
            self.repository.read_completed_routines(),
            ReadError,
            "get",
            "completed routines"
        )?;
        sort_newest_first(&mut completed_routines);
        Ok(completed_routines)
    }

    async fn finish_workout(
        &self,
        routine: Routine,
        now: NaiveDateTime,
    ) -> Result<CompletedRoutine, CreateError> {
        let completed_routine = complete(routine, now);
        info!(
            "finished {} with a total weight of {}",
            completed_routine.routine.name, completed_routine.weight
        );
        log_on_error!(
            self.repository.append_completed_routine(completed_routine),
            CreateError,
            "append",
            "completed routine"
        )
    }

    async fn get_weekly_stats(&self, now: NaiveDateTime) -> Result<WeeklyStats, ReadError> {
        let settings = self.get_settings().await?;
        let completed_routines = self.get_completed_routines().await?;
        Ok(weekly_stats(
            &completed_routines,
            now,
            settings.day_grouping,
        ))
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
        log_on_error!(
            self.repository.write_settings(settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        DayGrouping, ExerciseSet, LiftData, StorageError,
        catalog::tests::CATALOG,
        workout::tests::{datetime, routine},
    };

    use super::*;

    #[derive(Default)]
    struct FakeRepository {
        catalog: Option<Catalog>,
        locations: RefCell<Vec<Location>>,
        routines: RefCell<Vec<Routine>>,
        completed_routines: RefCell<Vec<CompletedRoutine>>,
        settings: RefCell<Settings>,
        unavailable: bool,
    }

    impl FakeRepository {
        fn check(&self) -> Result<(), StorageError> {
            if self.unavailable {
                Err(StorageError::Unavailable)
            } else {
                Ok(())
            }
        }
    }

    impl CatalogRepository for FakeRepository {
        async fn read_catalog(&self) -> Result<Catalog, CatalogError> {
            self.catalog
                .clone()
                .ok_or_else(|| CatalogError::Unavailable("no catalog".into()))
        }
    }

    impl LocationRepository for FakeRepository {
        async fn read_locations(&self) -> Result<Vec<Location>, ReadError> {
            self.check()?;
            Ok(self.locations.borrow().clone())
        }

        async fn create_location(
            &self,
            name: Name,
            equipment: BTreeSet<String>,
        ) -> Result<Location, CreateError> {
            self.check()?;
            let location = Location::new(LocationID::new(), name, equipment);
            self.locations.borrow_mut().push(location.clone());
            Ok(location)
        }

        async fn delete_location(&self, id: LocationID) -> Result<LocationID, DeleteError> {
            self.check()?;
            let mut locations = self.locations.borrow_mut();
            let len = locations.len();
            locations.retain(|l| l.id != id);
            if locations.len() == len {
                return Err(DeleteError::NotFound);
            }
            Ok(id)
        }
    }

    impl RoutineRepository for FakeRepository {
        async fn read_routines(&self) -> Result<Vec<Routine>, ReadError> {
            self.check()?;
            Ok(self.routines.borrow().clone())
        }

        async fn create_routine(
            &self,
            name: Name,
            exercises: Vec<RoutineExercise>,
        ) -> Result<Routine, CreateError> {
            self.check()?;
            let routine = Routine {
                id: RoutineID::new(),
                name,
                exercises,
            };
            self.routines.borrow_mut().push(routine.clone());
            Ok(routine)
        }

        async fn replace_routine(&self, routine: Routine) -> Result<Routine, UpdateError> {
            self.check()?;
            let mut routines = self.routines.borrow_mut();
            let r = routines
                .iter_mut()
                .find(|r| r.id == routine.id)
                .ok_or(UpdateError::NotFound)?;
            *r = routine.clone();
            Ok(routine)
        }

        async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
            self.check()?;
            self.routines.borrow_mut().retain(|r| r.id != id);
            Ok(id)
        }
    }

    impl CompletedRoutineRepository for FakeRepository {
        async fn read_completed_routines(&self) -> Result<Vec<CompletedRoutine>, ReadError> {
            self.check()?;
            Ok(self.completed_routines.borrow().clone())
        }

        async fn append_completed_routine(
            &self,
            completed_routine: CompletedRoutine,
        ) -> Result<CompletedRoutine, CreateError> {
            self.check()?;
            self.completed_routines
                .borrow_mut()
                .push(completed_routine.clone());
            Ok(completed_routine)
        }
    }

    impl SettingsRepository for FakeRepository {
        async fn read_settings(&self) -> Result<Settings, ReadError> {
            self.check()?;
            Ok(*self.settings.borrow())
        }

        async fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
            self.check()?;
            *self.settings.borrow_mut() = settings;
            Ok(settings)
        }
    }

    fn service() -> Service<FakeRepository> {
        Service::new(FakeRepository {
            catalog: Some(CATALOG.clone()),
            ..FakeRepository::default()
        })
    }

    #[tokio::test]
    async fn test_load_state() {
        let service = service();
        service
            .create_location(Name::new("Gym").unwrap(), BTreeSet::from(["barbell".into()]))
            .await
            .unwrap();
        service
            .create_routine(Name::new("Push").unwrap(), vec![])
            .await
            .unwrap();
        service
            .finish_workout(routine(&[&[50.0]]), datetime(2024, 8, 19, 9))
            .await
            .unwrap();
        service
            .finish_workout(routine(&[&[70.0]]), datetime(2024, 8, 20, 9))
            .await
            .unwrap();

        let state = service.load_state().await.unwrap();

        assert_eq!(state.catalog.len(), CATALOG.len());
        assert_eq!(state.locations.len(), 1);
        assert_eq!(state.routines.len(), 1);
        assert_eq!(
            state
                .completed_routines()
                .iter()
                .map(|c| c.weight)
                .collect::<Vec<_>>(),
            vec![70.0, 50.0]
        );
    }

    #[tokio::test]
    async fn test_load_state_without_catalog() {
        let service = Service::new(FakeRepository::default());
        assert!(matches!(
            service.load_state().await,
            Err(LoadError::Catalog(CatalogError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_storage_unavailable() {
        let service = Service::new(FakeRepository {
            catalog: Some(CATALOG.clone()),
            unavailable: true,
            ..FakeRepository::default()
        });
        assert!(matches!(
            service.load_state().await,
            Err(LoadError::Read(ReadError::Storage(StorageError::Unavailable)))
        ));
        assert!(matches!(
            service
                .finish_workout(routine(&[]), datetime(2024, 8, 19, 9))
                .await,
            Err(CreateError::Storage(StorageError::Unavailable))
        ));
    }

    #[tokio::test]
    async fn test_finish_workout() {
        let service = service();
        let completed_routine = service
            .finish_workout(
                routine(&[&[50.0, 60.0], &[40.0, 30.0]]),
                datetime(2024, 8, 23, 19),
            )
            .await
            .unwrap();

        assert_approx_eq!(completed_routine.weight, 180.0);
        assert_eq!(completed_routine.day, "Fri");
        assert_eq!(
            service.get_completed_routines().await.unwrap(),
            vec![completed_routine]
        );
    }

    #[tokio::test]
    async fn test_get_weekly_stats_uses_configured_grouping() {
        let service = service();
        for (weight, hour) in [(100.0, 8), (50.0, 18)] {
            service
                .finish_workout(routine(&[&[weight]]), datetime(2024, 8, 19, hour))
                .await
                .unwrap();
        }
        let now = datetime(2024, 8, 21, 12);

        let stats = service.get_weekly_stats(now).await.unwrap();
        assert_eq!(stats.per_day.len(), 2);
        assert_approx_eq!(stats.average, 150.0);

        service
            .set_settings(Settings {
                day_grouping: DayGrouping::Summed,
                ..Settings::default()
            })
            .await
            .unwrap();

        let stats = service.get_weekly_stats(now).await.unwrap();
        assert_eq!(
            stats.per_day,
            vec![LiftData {
                day: "Mon".to_string(),
                weight: 150.0
            }]
        );
        assert_approx_eq!(stats.max, 100.0);
    }

    #[tokio::test]
    async fn test_generate_routine_uses_settings() {
        let service = service();
        service
            .set_settings(Settings {
                routine_size: 2,
                placeholder_set: ExerciseSet {
                    reps: 6,
                    weight: 40.0,
                },
                ..Settings::default()
            })
            .await
            .unwrap();
        let location = Location::new(1.into(), Name::new("Gym").unwrap(), ["barbell"]);

        let exercises = service
            .generate_routine(
                &CATALOG,
                &location,
                &BTreeSet::from(["chest".to_string(), "biceps".to_string()]),
                &mut StdRng::seed_from_u64(5),
            )
            .await
            .unwrap();

        assert_eq!(exercises.len(), 2);
        for e in exercises {
            assert_eq!(
                e.sets,
                vec![ExerciseSet {
                    reps: 6,
                    weight: 40.0
                }]
            );
        }
    }

    #[tokio::test]
    async fn test_delete_location() {
        let service = service();
        let location = service
            .create_location(Name::new("Gym").unwrap(), BTreeSet::new())
            .await
            .unwrap();

        assert_eq!(
            service.delete_location(location.id).await.unwrap(),
            location.id
        );
        assert!(matches!(
            service.delete_location(location.id).await,
            Err(DeleteError::NotFound)
        ));
        assert!(service.get_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_routine() {
        let service = service();
        let mut routine = service
            .create_routine(Name::new("Push").unwrap(), vec![])
            .await
            .unwrap();
        routine.name = Name::new("Pull").unwrap();

        assert_eq!(
            service.replace_routine(routine.clone()).await.unwrap(),
            routine
        );
        assert!(matches!(
            service
                .replace_routine(Routine {
                    id: RoutineID::new(),
                    ..routine
                })
                .await,
            Err(UpdateError::NotFound)
        ));
    }
}
