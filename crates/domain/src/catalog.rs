use std::collections::{BTreeMap, BTreeSet};

use crate::{CatalogError, ExerciseDefinition};

#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_catalog(&self) -> Result<Catalog, CatalogError>;
}

#[allow(async_fn_in_trait)]
pub trait CatalogService {
    async fn get_catalog(&self) -> Result<Catalog, CatalogError>;
}

/// Read-only collection of the known exercises.
///
/// The order of the source is preserved, names are unique. If the source contains the same name
/// more than once, the first entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    exercises: Vec<ExerciseDefinition>,
    index: BTreeMap<String, usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(exercises: impl IntoIterator<Item = ExerciseDefinition>) -> Self {
        let mut catalog = Catalog::default();
        for exercise in exercises {
            if catalog.index.contains_key(&exercise.name) {
                continue;
            }
            catalog
                .index
                .insert(exercise.name.clone(), catalog.exercises.len());
            catalog.exercises.push(exercise);
        }
        catalog
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExerciseDefinition> {
        self.index.get(name).map(|i| &self.exercises[*i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExerciseDefinition> {
        self.exercises.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Exercises whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ExerciseDefinition> {
        let query = query.trim().to_lowercase();
        self.exercises
            .iter()
            .filter(|e| query.is_empty() || e.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Distinct primary muscles in order of first appearance.
    #[must_use]
    pub fn muscles(&self) -> Vec<&str> {
        distinct(
            self.exercises
                .iter()
                .flat_map(|e| e.primary_muscles.iter().map(String::as_str)),
        )
    }

    /// Distinct equipment in order of first appearance.
    #[must_use]
    pub fn equipment(&self) -> Vec<&str> {
        distinct(self.exercises.iter().map(|e| e.equipment.as_str()))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ExerciseDefinition;
    type IntoIter = std::slice::Iter<'a, ExerciseDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.exercises.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Force, Level, Mechanic};

    use super::*;

    pub(crate) fn exercise(
        name: &str,
        equipment: &str,
        primary_muscles: &[&str],
    ) -> ExerciseDefinition {
        ExerciseDefinition {
            name: name.to_string(),
            force: Some(Force::Push),
            level: Level::Beginner,
            mechanic: Some(Mechanic::Compound),
            equipment: equipment.to_string(),
            primary_muscles: primary_muscles.iter().map(ToString::to_string).collect(),
            secondary_muscles: vec![],
            instructions: vec![format!("Perform the {name}.")],
            category: "strength".to_string(),
        }
    }

    pub(crate) static CATALOG: std::sync::LazyLock<Catalog> = std::sync::LazyLock::new(|| {
        Catalog::new([
            exercise("Push Up", "body only", &["chest"]),
            exercise("Bench Press", "barbell", &["chest"]),
            exercise("Barbell Curl", "barbell", &["biceps"]),
            exercise("Dumbbell Fly", "dumbbell", &["chest"]),
            exercise("Pull Up", "body only", &["lats", "biceps"]),
            exercise("Leg Press", "machine", &["quadriceps"]),
        ])
    });

    #[test]
    fn test_catalog_new_skips_duplicates() {
        let catalog = Catalog::new([
            exercise("Push Up", "body only", &["chest"]),
            exercise("Push Up", "barbell", &["triceps"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Push Up").unwrap().equipment, "body only");
    }

    #[test]
    fn test_catalog_get() {
        assert_eq!(
            CATALOG.get("Leg Press").map(|e| e.equipment.as_str()),
            Some("machine")
        );
        assert_eq!(CATALOG.get("leg press"), None);
    }

    #[test]
    fn test_catalog_iter_preserves_order() {
        assert_eq!(
            CATALOG.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec![
                "Push Up",
                "Bench Press",
                "Barbell Curl",
                "Dumbbell Fly",
                "Pull Up",
                "Leg Press"
            ]
        );
    }

    #[rstest]
    #[case("", 6)]
    #[case("press", 2)]
    #[case("PULL", 1)]
    #[case("  curl ", 1)]
    #[case("squat", 0)]
    fn test_catalog_search(#[case] query: &str, #[case] expected: usize) {
        assert_eq!(CATALOG.search(query).len(), expected);
    }

    #[test]
    fn test_catalog_muscles() {
        assert_eq!(
            CATALOG.muscles(),
            vec!["chest", "biceps", "lats", "quadriceps"]
        );
    }

    #[test]
    fn test_catalog_equipment() {
        assert_eq!(
            CATALOG.equipment(),
            vec!["body only", "barbell", "dumbbell", "machine"]
        );
    }

    #[test]
    fn test_catalog_empty() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.muscles().is_empty());
        assert!(catalog.search("").is_empty());
    }
}
