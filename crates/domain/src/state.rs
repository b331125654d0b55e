use crate::{
    Catalog, CompletedRoutine, Location, LocationID, Routine, RoutineID, sort_newest_first,
};

/// Data shared by the screens of the application.
///
/// Owned by the caller and passed to whatever needs it. Routines and locations are removed by
/// ID, so structurally identical entries stay independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub catalog: Catalog,
    pub locations: Vec<Location>,
    pub routines: Vec<Routine>,
    completed_routines: Vec<CompletedRoutine>,
}

impl AppState {
    #[must_use]
    pub fn new(
        catalog: Catalog,
        locations: Vec<Location>,
        routines: Vec<Routine>,
        mut completed_routines: Vec<CompletedRoutine>,
    ) -> Self {
        sort_newest_first(&mut completed_routines);
        Self {
            catalog,
            locations,
            routines,
            completed_routines,
        }
    }

    #[must_use]
    pub fn routine(&self, id: RoutineID) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    pub fn add_routine(&mut self, routine: Routine) {
        self.routines.push(routine);
    }

    /// Replace the routine with the same ID. Returns `false` if there is none.
    pub fn replace_routine(&mut self, routine: Routine) -> bool {
        match self.routines.iter_mut().find(|r| r.id == routine.id) {
            Some(r) => {
                *r = routine;
                true
            }
            None => false,
        }
    }

    pub fn remove_routine(&mut self, id: RoutineID) -> Option<Routine> {
        let index = self.routines.iter().position(|r| r.id == id)?;
        Some(self.routines.remove(index))
    }

    #[must_use]
    pub fn location(&self, id: LocationID) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn add_location(&mut self, location: Location) {
        self.locations.push(location);
    }

    pub fn remove_location(&mut self, id: LocationID) -> Option<Location> {
        let index = self.locations.iter().position(|l| l.id == id)?;
        Some(self.locations.remove(index))
    }

    /// Completed routines, newest first.
    #[must_use]
    pub fn completed_routines(&self) -> &[CompletedRoutine] {
        &self.completed_routines
    }

    pub fn record_completion(&mut self, completed_routine: CompletedRoutine) {
        self.completed_routines.push(completed_routine);
        sort_newest_first(&mut self.completed_routines);
    }
}
