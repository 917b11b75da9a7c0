//! Exercise catalog types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exercise category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Barbell,
    Dumbbell,
    Bodyweight,
    Machine,
    Cable,
    /// Olympic lifts and their derivatives
    Weightlifting,
}

impl ExerciseCategory {
    /// Storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseCategory::Barbell => "barbell",
            ExerciseCategory::Dumbbell => "dumbbell",
            ExerciseCategory::Bodyweight => "bodyweight",
            ExerciseCategory::Machine => "machine",
            ExerciseCategory::Cable => "cable",
            ExerciseCategory::Weightlifting => "weightlifting",
        }
    }

    /// Parse a storage identifier.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "barbell" => Some(ExerciseCategory::Barbell),
            "dumbbell" => Some(ExerciseCategory::Dumbbell),
            "bodyweight" => Some(ExerciseCategory::Bodyweight),
            "machine" => Some(ExerciseCategory::Machine),
            "cable" => Some(ExerciseCategory::Cable),
            "weightlifting" => Some(ExerciseCategory::Weightlifting),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseCategory::Barbell => write!(f, "Barbell"),
            ExerciseCategory::Dumbbell => write!(f, "Dumbbell"),
            ExerciseCategory::Bodyweight => write!(f, "Bodyweight"),
            ExerciseCategory::Machine => write!(f, "Machine"),
            ExerciseCategory::Cable => write!(f, "Cable"),
            ExerciseCategory::Weightlifting => write!(f, "Weightlifting"),
        }
    }
}

/// Equipment needed for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    Band,
    /// No equipment
    None,
}

impl Equipment {
    /// Storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Equipment::Barbell => "barbell",
            Equipment::Dumbbell => "dumbbell",
            Equipment::Kettlebell => "kettlebell",
            Equipment::Machine => "machine",
            Equipment::Cable => "cable",
            Equipment::Band => "band",
            Equipment::None => "none",
        }
    }

    /// Parse a storage identifier.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "barbell" => Some(Equipment::Barbell),
            "dumbbell" => Some(Equipment::Dumbbell),
            "kettlebell" => Some(Equipment::Kettlebell),
            "machine" => Some(Equipment::Machine),
            "cable" => Some(Equipment::Cable),
            "band" => Some(Equipment::Band),
            "none" => Some(Equipment::None),
            _ => None,
        }
    }

    /// Typical equipment for a category.
    pub fn for_category(category: ExerciseCategory) -> Self {
        match category {
            ExerciseCategory::Barbell | ExerciseCategory::Weightlifting => Equipment::Barbell,
            ExerciseCategory::Dumbbell => Equipment::Dumbbell,
            ExerciseCategory::Bodyweight => Equipment::None,
            ExerciseCategory::Machine => Equipment::Machine,
            ExerciseCategory::Cable => Equipment::Cable,
        }
    }
}

/// Muscle group worked by an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    FullBody,
}

/// A canonical exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCatalogEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Display name, unique ignoring case
    pub name: String,
    pub category: ExerciseCategory,
    /// Never empty
    pub muscle_groups: Vec<MuscleGroup>,
    pub equipment: Equipment,
    /// Synthesized during import rather than shipped with the catalog
    pub is_custom: bool,
}

impl ExerciseCatalogEntry {
    /// Create a catalog-provided entry.
    pub fn new(
        name: impl Into<String>,
        category: ExerciseCategory,
        muscle_groups: Vec<MuscleGroup>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            muscle_groups,
            equipment: Equipment::for_category(category),
            is_custom: false,
        }
    }

    /// Primary muscle group.
    pub fn primary_muscle(&self) -> MuscleGroup {
        self.muscle_groups
            .first()
            .copied()
            .unwrap_or(MuscleGroup::FullBody)
    }
}
