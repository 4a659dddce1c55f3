use serde::{Deserialize, Deserializer};

/// Wrapper for optional fields that can be explicitly cleared.
/// - `Unchanged`: Field was not provided in the request, keep existing value
/// - `Clear`: Field was explicitly set to null, clear the value
/// - `Set(T)`: Field was set to a new value
///
/// In JSON: null means Clear, value means Set(value), absent means Unchanged.
/// Fields of this type must carry `#[serde(default)]` for absence to work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Clearable<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Clearable<T> {
    /// Split into a "touched" flag and the value to store when touched.
    pub fn into_assignment(self) -> (bool, Option<T>) {
        match self {
            Clearable::Unchanged => (false, None),
            Clearable::Clear => (true, None),
            Clearable::Set(v) => (true, Some(v)),
        }
    }
}

impl Clearable<String> {
    /// Trim a new value; a blank value counts as clearing the field.
    pub fn normalized(self) -> Self {
        match self {
            Clearable::Set(v) => match normalize_optional(Some(v)) {
                Some(v) => Clearable::Set(v),
                None => Clearable::Clear,
            },
            other => other,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Clearable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<T>::deserialize(deserializer)?;
        Ok(match opt {
            Some(v) => Clearable::Set(v),
            None => Clearable::Clear,
        })
    }
}

/// Trim an optional text value, mapping blank strings to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Key used for case-insensitive whole-string matching of categories and moments.
pub fn match_key(value: &str) -> String {
    value.trim().to_lowercase()
}
