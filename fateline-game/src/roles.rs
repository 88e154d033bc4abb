//! Passenger table loading, cleaning, and role sampling.
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::constants::{BASE_PROB_PERISHED, BASE_PROB_SURVIVED, CABIN_CLASS_MAX, CABIN_CLASS_MIN};

/// Errors raised while loading game data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("passenger table is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("passenger table has no usable rows after cleaning")]
    EmptyTable,
    #[error("event catalog parse failed: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Immutable snapshot of one sampled passenger record.
///
/// Created once at game start; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    /// Historical outcome flag from the source table.
    pub survived: bool,
    pub class: u8,
    pub sex: String,
    pub age: f64,
    pub siblings_spouses: u32,
    pub parents_children: u32,
    pub fare: f64,
    pub embarked: Option<String>,
}

/// Coarse heuristic prior, not a model: the historical flag alone decides
/// which prior applies.
#[must_use]
pub fn base_survival_prob(role: &Role) -> f64 {
    if role.survived {
        BASE_PROB_SURVIVED
    } else {
        BASE_PROB_PERISHED
    }
}

/// Human-readable label for a cabin class.
#[must_use]
pub const fn class_name(class: u8) -> &'static str {
    match class {
        1 => "First Class",
        2 => "Second Class",
        _ => "Third Class",
    }
}

// Column aliases accepted during header normalization. The source table
// ships with a mangled survival column name and uses the passenger id
// as the role name.
const SURVIVED_ALIASES: &[&str] = &["survived", "2urvived"];
const NAME_ALIASES: &[&str] = &["name", "passengerid"];

/// Cleaned passenger records ready for role sampling.
#[derive(Debug, Clone, Default)]
pub struct PassengerTable {
    passengers: Vec<Role>,
}

const DEFAULT_PASSENGER_DATA: &str = include_str!("../assets/passengers.csv");

struct Columns {
    survived: usize,
    class: usize,
    name: usize,
    sex: usize,
    age: Option<usize>,
    sibsp: Option<usize>,
    parch: Option<usize>,
    fare: Option<usize>,
    embarked: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, DataError> {
        let names: Vec<String> = split_row(header)
            .iter()
            .map(|name| name.trim().to_ascii_lowercase())
            .collect();
        let find = |aliases: &[&str]| {
            names
                .iter()
                .position(|name| aliases.iter().any(|alias| name == alias))
        };

        Ok(Self {
            survived: find(SURVIVED_ALIASES).ok_or(DataError::MissingColumn("survived"))?,
            class: find(&["pclass"]).ok_or(DataError::MissingColumn("pclass"))?,
            name: find(NAME_ALIASES).ok_or(DataError::MissingColumn("name"))?,
            sex: find(&["sex"]).ok_or(DataError::MissingColumn("sex"))?,
            age: find(&["age"]),
            sibsp: find(&["sibsp"]),
            parch: find(&["parch"]),
            fare: find(&["fare"]),
            embarked: find(&["embarked"]),
        })
    }
}

fn split_row(line: &str) -> Vec<&str> {
    line.trim_end_matches('\r').split(',').collect()
}

fn field<'a>(fields: &[&'a str], idx: Option<usize>) -> Option<&'a str> {
    let value = fields.get(idx?)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn parse_flag(value: &str) -> Option<bool> {
    value.parse::<f64>().ok().map(|flag| flag != 0.0)
}

fn parse_class(value: &str) -> Option<u8> {
    let class = value.parse::<f64>().ok()?;
    let class = class as u8;
    (CABIN_CLASS_MIN..=CABIN_CLASS_MAX)
        .contains(&class)
        .then_some(class)
}

impl PassengerTable {
    /// Parse and clean a CSV-shaped passenger table.
    ///
    /// Rows missing any of {survival flag, cabin class, identifier, sex}
    /// are silently dropped; a missing age is imputed with the mean of
    /// every parseable age in the column, including ages carried by rows
    /// that the drop step removes.
    ///
    /// # Errors
    ///
    /// Returns an error when a required column is absent from the header
    /// or no rows survive cleaning.
    pub fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or(DataError::EmptyTable)?;
        let columns = Columns::from_header(header)?;

        let mut passengers = Vec::new();
        let mut missing_age = Vec::new();
        let mut age_sum = 0.0;
        let mut age_count = 0_u32;

        for line in lines {
            let fields = split_row(line);

            // The imputation mean covers the whole column, so ages must be
            // tallied before the required-field drops below.
            let age = field(&fields, columns.age).and_then(|v| v.parse::<f64>().ok());
            if let Some(age) = age {
                age_sum += age;
                age_count += 1;
            }

            // Cleaning policy, not an error path: incomplete rows vanish.
            let Some(survived) = field(&fields, Some(columns.survived)).and_then(parse_flag)
            else {
                continue;
            };
            let Some(class) = field(&fields, Some(columns.class)).and_then(parse_class) else {
                continue;
            };
            let Some(name) = field(&fields, Some(columns.name)) else {
                continue;
            };
            let Some(sex) = field(&fields, Some(columns.sex)) else {
                continue;
            };

            if age.is_none() {
                missing_age.push(passengers.len());
            }

            let parse_count = |idx| {
                field(&fields, idx)
                    .and_then(|v: &str| v.parse::<f64>().ok())
                    .map_or(0, |n| n as u32)
            };

            passengers.push(Role {
                name: name.to_string(),
                survived,
                class,
                sex: sex.to_string(),
                age: age.unwrap_or(0.0),
                siblings_spouses: parse_count(columns.sibsp),
                parents_children: parse_count(columns.parch),
                fare: field(&fields, columns.fare)
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(0.0),
                embarked: field(&fields, columns.embarked).map(str::to_string),
            });
        }

        if passengers.is_empty() {
            return Err(DataError::EmptyTable);
        }

        if age_count > 0 {
            let mean_age = age_sum / f64::from(age_count);
            for idx in missing_age {
                passengers[idx].age = mean_age;
            }
        }

        log::debug!("passenger table cleaned: {} rows", passengers.len());
        Ok(Self { passengers })
    }

    /// Load the sample table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset fails cleaning.
    pub fn load_from_static() -> Result<Self, DataError> {
        Self::from_csv(DEFAULT_PASSENGER_DATA)
    }

    /// Sample one passenger from the requested cabin class.
    pub fn sample_role<R: Rng>(&self, class: u8, rng: &mut R) -> Option<Role> {
        let pool: Vec<&Role> = self
            .passengers
            .iter()
            .filter(|role| role.class == class)
            .collect();
        pool.choose(rng).map(|role| (*role).clone())
    }

    #[must_use]
    pub fn class_count(&self, class: u8) -> usize {
        self.passengers
            .iter()
            .filter(|role| role.class == class)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    #[must_use]
    pub fn passengers(&self) -> &[Role] {
        &self.passengers
    }
}
