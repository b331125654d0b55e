use crate::{
    DEFAULT_ROUTINE_SIZE, DayGrouping, ExerciseSet, ReadError, RoutineGenerator, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, ReadError>;
    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub routine_size: usize,
    pub day_grouping: DayGrouping,
    pub placeholder_set: ExerciseSet,
}

impl Settings {
    #[must_use]
    pub fn generator(&self) -> RoutineGenerator {
        RoutineGenerator {
            count: self.routine_size,
            set: self.placeholder_set,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            routine_size: DEFAULT_ROUTINE_SIZE,
            day_grouping: DayGrouping::Individual,
            placeholder_set: ExerciseSet::PLACEHOLDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_settings_default_generator() {
        assert_eq!(Settings::default().generator(), RoutineGenerator::default());
    }

    #[test]
    fn test_settings_generator() {
        let settings = Settings {
            routine_size: 4,
            day_grouping: DayGrouping::Summed,
            placeholder_set: ExerciseSet {
                reps: 8,
                weight: 60.0,
            },
        };
        assert_eq!(
            settings.generator(),
            RoutineGenerator {
                count: 4,
                set: ExerciseSet {
                    reps: 8,
                    weight: 60.0
                }
            }
        );
    }
}
