use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Version state of a recipe, either as published or as found upstream.
///
/// Every sub-field may be missing; the object itself is always present on a
/// [`RecipeStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionState {
    pub version: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
    pub commit_count: Option<u64>,
}

/// Where an automated update was pushed, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatedBranch {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
}

impl UpdatedBranch {
    /// Returns `(owner, repo, branch)` when all three parts are non-empty.
    pub fn parts(&self) -> Option<(&str, &str, &str)> {
        let owner = non_empty(self.owner.as_deref())?;
        let repo = non_empty(self.repo.as_deref())?;
        let branch = non_empty(self.branch.as_deref())?;
        Some((owner, repo, branch))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

/// Status of one tracked recipe as published by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default = "default_supported", deserialize_with = "null_as_supported")]
    pub supported: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deprecated: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updatable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub up_to_date: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inconsistent_versioning: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: VersionState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new: VersionState,
    #[serde(default)]
    pub update_error: Option<String>,
    #[serde(default)]
    pub test_error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_branch: UpdatedBranch,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prs_opened: Vec<PullRequest>,
}

impl RecipeStatus {
    /// A supported record with every optional field empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            homepage: None,
            supported: true,
            deprecated: false,
            updatable: false,
            up_to_date: false,
            inconsistent_versioning: false,
            current: VersionState::default(),
            new: VersionState::default(),
            update_error: None,
            test_error: None,
            details: None,
            updated_branch: UpdatedBranch::default(),
            prs_opened: Vec::new(),
        }
    }
}

fn default_supported() -> bool {
    true
}

fn null_as_supported<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_supported))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Producer metadata carried by the published document form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotMeta {
    pub date: Option<String>,
    /// Producer run time in seconds.
    pub duration: Option<f64>,
    pub version: Option<u32>,
    #[serde(deserialize_with = "run_id_as_string")]
    pub github_action_run_id: Option<String>,
}

fn run_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot document must be a JSON object")]
    NotAnObject,
    #[error("`recipes` must be an object or an array")]
    InvalidRecipes,
    #[error("record {key:?} is malformed: {source}")]
    Record {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record at index {index} has no name")]
    MissingName { index: usize },
}

/// A whole published status document.
///
/// Records keep the order in which the document lists them. The map key is
/// informational; each record's own `name` identifies it for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    meta: SnapshotMeta,
    entries: Vec<(String, RecipeStatus)>,
}

impl Snapshot {
    /// Builds a snapshot from keyed records. A repeated key keeps its first
    /// position and its last record.
    pub fn new(meta: SnapshotMeta, entries: impl IntoIterator<Item = (String, RecipeStatus)>) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut deduped: Vec<(String, RecipeStatus)> = Vec::new();
        for (key, record) in entries {
            match positions.get(&key) {
                Some(&index) => deduped[index].1 = record,
                None => {
                    positions.insert(key.clone(), deduped.len());
                    deduped.push((key, record));
                }
            }
        }
        Self {
            meta,
            entries: deduped,
        }
    }

    /// Builds a snapshot keyed by each record's name.
    pub fn from_records(records: impl IntoIterator<Item = RecipeStatus>) -> Self {
        Self::new(
            SnapshotMeta::default(),
            records.into_iter().map(|r| (r.name.clone(), r)),
        )
    }

    /// Parses either the bare envelope (`{key: record, ...}`) or the published
    /// document (`{"date": .., "recipes": [..] | {..}, ..}`).
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Object(mut document) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        if !is_published_document(&document) {
            return Ok(Self::new(SnapshotMeta::default(), keyed_records(document)?));
        }

        let recipes = document.remove("recipes").unwrap_or(Value::Null);
        let meta = SnapshotMeta::deserialize(Value::Object(document))?;
        let entries = match recipes {
            Value::Object(map) => keyed_records(map)?,
            Value::Array(list) => listed_records(list)?,
            _ => return Err(SnapshotError::InvalidRecipes),
        };
        Ok(Self::new(meta, entries))
    }

    pub fn meta(&self) -> &SnapshotMeta {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &RecipeStatus> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn get(&self, key: &str) -> Option<&RecipeStatus> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }
}

const META_KEYS: [&str; 4] = ["date", "duration", "version", "github_action_run_id"];

const RECORD_KEYS: [&str; 14] = [
    "name",
    "homepage",
    "supported",
    "deprecated",
    "updatable",
    "up_to_date",
    "inconsistent_versioning",
    "current",
    "new",
    "update_error",
    "test_error",
    "details",
    "updated_branch",
    "prs_opened",
];

/// A document is the published form when `recipes` is a list, or a map of
/// records rather than a record itself. Scalar metadata next to `recipes`
/// settles the ambiguous case.
fn is_published_document(document: &Map<String, Value>) -> bool {
    let has_meta = META_KEYS
        .iter()
        .any(|key| document.get(*key).is_some_and(|value| !value.is_object()));
    match document.get("recipes") {
        Some(Value::Array(_)) => true,
        Some(Value::Object(inner)) => has_meta || !looks_like_record(inner),
        _ => false,
    }
}

fn looks_like_record(map: &Map<String, Value>) -> bool {
    map.iter()
        .any(|(key, value)| !value.is_object() || RECORD_KEYS.contains(&key.as_str()))
}

fn keyed_records(map: Map<String, Value>) -> Result<Vec<(String, RecipeStatus)>, SnapshotError> {
    map.into_iter()
        .map(|(key, value)| {
            let mut record: RecipeStatus =
                serde_json::from_value(value).map_err(|source| SnapshotError::Record {
                    key: key.clone(),
                    source,
                })?;
            if record.name.is_empty() {
                record.name = key.clone();
            }
            Ok((key, record))
        })
        .collect()
}

fn listed_records(list: Vec<Value>) -> Result<Vec<(String, RecipeStatus)>, SnapshotError> {
    list.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: RecipeStatus =
                serde_json::from_value(value).map_err(|source| SnapshotError::Record {
                    key: format!("#{index}"),
                    source,
                })?;
            if record.name.is_empty() {
                return Err(SnapshotError::MissingName { index });
            }
            Ok((record.name.clone(), record))
        })
        .collect()
}
