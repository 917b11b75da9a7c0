//! Free-text exercise name resolution.
//!
//! Names from an export are matched against the catalog in four steps, first
//! hit wins:
//!
//! 1. exact match ignoring case
//! 2. match after normalization (lowercase, equipment qualifiers such as
//!    `(Barbell)` removed, whitespace collapsed)
//! 3. the normalized input contains a normalized catalog name; the longest
//!    such name wins, so plural or suffixed spellings reuse the entry
//! 4. a custom entry is synthesized with attributes guessed from keywords
//!    and persisted, so the next lookup hits step 1
//!
//! Resolution itself never fails. Only the store can.

use crate::exercises::types::{Equipment, ExerciseCatalogEntry, ExerciseCategory, MuscleGroup};
use crate::storage::repository::ExerciseStore;
use crate::storage::DatabaseError;

/// Equipment qualifiers stripped during normalization (lowercase).
const QUALIFIERS: &[&str] = &[
    "(barbell)",
    "(bar)",
    "(dumbbell)",
    "(dumbbells)",
    "(machine)",
    "(smith machine)",
    "(cable)",
    "(bodyweight)",
    "(weighted)",
    "(assisted)",
    "(kettlebell)",
    "(band)",
    "(plate)",
    "(halter)",
    "(dambıl)",
    "(makine)",
    "(kablo)",
    "(vücut ağırlığı)",
    "(ağırlıklı)",
];

/// How a name was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Normalized,
    Contains,
}

/// Resolves exercise names against a catalog loaded from an [`ExerciseStore`].
///
/// The catalog is loaded once. Entries synthesized through [`resolve`](Self::resolve)
/// are added to the in-memory copy as well as the store.
pub struct ExerciseResolver<'a, S: ExerciseStore + ?Sized> {
    store: &'a S,
    catalog: Vec<ExerciseCatalogEntry>,
    /// Normalized names, parallel to `catalog`
    normalized: Vec<String>,
    created: Vec<String>,
}

impl<'a, S: ExerciseStore + ?Sized> ExerciseResolver<'a, S> {
    /// Load the catalog from the store.
    pub fn load(store: &'a S) -> Result<Self, DatabaseError> {
        let catalog = store.fetch_all_exercises()?;
        let normalized = catalog.iter().map(|e| normalize_name(&e.name)).collect();

        tracing::debug!("Exercise resolver loaded {} catalog entries", catalog.len());

        Ok(Self {
            store,
            catalog,
            normalized,
            created: Vec::new(),
        })
    }

    /// Current catalog, including entries synthesized so far.
    pub fn catalog(&self) -> &[ExerciseCatalogEntry] {
        &self.catalog
    }

    /// Names of entries synthesized by this resolver.
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Look a name up without synthesizing anything.
    pub fn find(&self, name: &str) -> Option<(&ExerciseCatalogEntry, MatchKind)> {
        let name = name.trim();

        if let Some(entry) = self
            .catalog
            .iter()
            .find(|e| e.name.trim().to_lowercase() == name.to_lowercase())
        {
            return Some((entry, MatchKind::Exact));
        }

        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }

        if let Some(i) = self.normalized.iter().position(|n| *n == wanted) {
            return Some((&self.catalog[i], MatchKind::Normalized));
        }

        self.normalized
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_empty() && wanted.contains(n.as_str()))
            .fold(None, |best: Option<(usize, usize)>, (i, n)| match best {
                Some((_, len)) if len >= n.len() => best,
                _ => Some((i, n.len())),
            })
            .map(|(i, _)| (&self.catalog[i], MatchKind::Contains))
    }

    /// Resolve a name, synthesizing and persisting a custom entry if nothing matches.
    pub fn resolve(&mut self, name: &str) -> Result<ExerciseCatalogEntry, DatabaseError> {
        if let Some((entry, kind)) = self.find(name) {
            if kind != MatchKind::Exact {
                tracing::debug!("Resolved '{}' to '{}' ({:?})", name, entry.name, kind);
            }
            return Ok(entry.clone());
        }

        let entry = synthesize_entry(name);
        self.store.save_exercise(&entry)?;

        tracing::debug!(
            "Created custom exercise '{}' ({}, {:?})",
            entry.name,
            entry.category,
            entry.muscle_groups
        );

        self.normalized.push(normalize_name(&entry.name));
        self.catalog.push(entry.clone());
        self.created.push(entry.name.clone());

        Ok(entry)
    }
}

/// Lowercase, strip equipment qualifiers and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.to_lowercase();
    for qualifier in QUALIFIERS {
        normalized = normalized.replace(qualifier, " ");
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a custom catalog entry for an unknown name.
pub fn synthesize_entry(name: &str) -> ExerciseCatalogEntry {
    let (category, equipment, muscle_groups) = infer_attributes(name);
    let mut entry = ExerciseCatalogEntry::new(name.trim(), category, muscle_groups);
    entry.equipment = equipment;
    entry.is_custom = true;
    entry
}

const CATEGORY_RULES: &[(&[&str], ExerciseCategory)] = &[
    (
        &["dumbbell", "dambıl", "db ", "kettlebell"],
        ExerciseCategory::Dumbbell,
    ),
    (
        &["cable", "kablo", "pulldown", "pushdown", "face pull", "crossover"],
        ExerciseCategory::Cable,
    ),
    (
        &[
            "machine",
            "makine",
            "smith",
            "leg press",
            "leg extension",
            "leg curl",
            "pec deck",
            "hack squat",
        ],
        ExerciseCategory::Machine,
    ),
    (
        &["clean", "snatch", "jerk"],
        ExerciseCategory::Weightlifting,
    ),
    (&["barbell", "bar ", "halter"], ExerciseCategory::Barbell),
    (
        &[
            "push up",
            "pull up",
            "chin up",
            "dip",
            "plank",
            "bodyweight",
            "sit up",
            "crunch",
            "burpee",
            "muscle up",
            "band",
            "vücut",
        ],
        ExerciseCategory::Bodyweight,
    ),
];

const MUSCLE_RULES: &[(&[&str], &[MuscleGroup])] = &[
    (
        &[
            "crunch",
            "plank",
            "sit up",
            "ab ",
            "abs ",
            "core",
            "leg raise",
            "russian twist",
            "karın",
        ],
        &[MuscleGroup::Core],
    ),
    (
        &["leg curl", "hamstring", "romanian", "rdl", "good morning", "nordic"],
        &[MuscleGroup::Hamstrings, MuscleGroup::Glutes],
    ),
    (
        &["deadlift"],
        &[MuscleGroup::Hamstrings, MuscleGroup::Glutes, MuscleGroup::Back],
    ),
    (
        &["hip thrust", "glute", "bridge"],
        &[MuscleGroup::Glutes, MuscleGroup::Hamstrings],
    ),
    (&["calf", "calves", "baldır"], &[MuscleGroup::Calves]),
    (
        &["squat", "lunge", "leg", "step up", "bacak"],
        &[MuscleGroup::Quads, MuscleGroup::Glutes],
    ),
    (
        &["clean", "snatch", "jerk", "thruster", "burpee"],
        &[MuscleGroup::FullBody],
    ),
    (
        &["tricep", "pushdown", "skull", "kickback"],
        &[MuscleGroup::Triceps],
    ),
    (
        &["bench", "chest", "fly", "flye", "push up", "pec", "dip", "göğüs"],
        &[MuscleGroup::Chest, MuscleGroup::Triceps],
    ),
    (
        &[
            "overhead press",
            "shoulder",
            "military",
            "lateral raise",
            "front raise",
            "rear delt",
            "delt",
            "arnold",
            "face pull",
            "upright row",
            "shrug",
            "ohp",
            "omuz",
        ],
        &[MuscleGroup::Shoulders],
    ),
    (
        &[
            "row", "pulldown", "pull up", "chin up", "pullover", "lat ", "back", "sırt",
        ],
        &[MuscleGroup::Back, MuscleGroup::Biceps],
    ),
    (
        &["wrist", "forearm", "farmer", "grip"],
        &[MuscleGroup::Forearms],
    ),
    (&["curl", "bicep", "pazı"], &[MuscleGroup::Biceps]),
];

/// Guess category, equipment and muscles from an exercise name.
pub fn infer_attributes(name: &str) -> (ExerciseCategory, Equipment, Vec<MuscleGroup>) {
    let text = keyword_text(name);

    let category = CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| has_keyword(&text, keywords))
        .map(|(_, category)| *category)
        .unwrap_or(ExerciseCategory::Barbell);

    let equipment = if has_keyword(&text, &["kettlebell"]) {
        Equipment::Kettlebell
    } else if has_keyword(&text, &["band"]) {
        Equipment::Band
    } else {
        Equipment::for_category(category)
    };

    let muscle_groups = MUSCLE_RULES
        .iter()
        .find(|(keywords, _)| has_keyword(&text, keywords))
        .map(|(_, muscles)| muscles.to_vec())
        .unwrap_or_else(|| vec![MuscleGroup::FullBody]);

    (category, equipment, muscle_groups)
}

/// Keywords match at word starts; a trailing space forces a whole word.
fn has_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|kw| text.contains(&format!(" {}", kw)))
}

/// Lowercase words separated by single spaces, padded on both sides.
fn keyword_text(name: &str) -> String {
    let lowered = name.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" "))
}
