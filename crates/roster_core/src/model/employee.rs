//! Employee record model.
//!
//! # Responsibility
//! - Define the canonical `EmployeeRecord` persisted in the roster slot.
//! - Normalize raw form input into records.
//! - Provide the fixed sample set used by seeding.
//!
//! # Invariants
//! - `id` is the stable key; uniqueness is enforced by the store, not here.
//! - `age` is opaque text. Older payloads may carry it as a JSON number.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};

/// Stable caller-provided key of an employee record.
pub type EmployeeId = String;

/// One employee entry as stored in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    /// Display text. Accepts string or number on read, always written as string.
    #[serde(deserialize_with = "age_from_text_or_number")]
    pub age: String,
    pub address: String,
}

impl EmployeeRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age: age.into(),
            address: address.into(),
        }
    }
}

/// Raw field values as submitted by a form.
///
/// Nothing is trimmed until [`EmployeeForm::into_record`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub id: String,
    pub name: String,
    pub age: String,
    pub address: String,
}

impl EmployeeForm {
    /// Prefills a form from an existing record, as when entering edit mode.
    pub fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            age: record.age.clone(),
            address: record.address.clone(),
        }
    }

    /// Converts form input into a record.
    ///
    /// `id`, `name` and `address` are trimmed; `age` is kept verbatim.
    pub fn into_record(self) -> EmployeeRecord {
        EmployeeRecord {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            age: self.age,
            address: self.address.trim().to_string(),
        }
    }
}

/// Returns the fixed demonstration data set.
pub fn sample_employees() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new("1001", "Ahmad Suleiman", "34", "Amman, Jordan"),
        EmployeeRecord::new("1002", "Lina Haddad", "28", "Irbid, Jordan"),
        EmployeeRecord::new("1003", "Omar Qasem", "41", "Aqaba, Jordan"),
        EmployeeRecord::new("1004", "Zaid Abbas", "25", "Zarqa, Jordan"),
    ]
}

fn age_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct AgeVisitor;

    impl Visitor<'_> for AgeVisitor {
        type Value = String;

        fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(AgeVisitor)
}

#[cfg(test)]
mod tests {
    use super::{sample_employees, EmployeeForm, EmployeeRecord};
    use std::collections::HashSet;

    #[test]
    fn form_trims_everything_but_age() {
        let form = EmployeeForm {
            id: " 2001 ".to_string(),
            name: "  Rana Khalil ".to_string(),
            age: " 30 ".to_string(),
            address: " Salt, Jordan\t".to_string(),
        };

        let record = form.into_record();
        assert_eq!(record.id, "2001");
        assert_eq!(record.name, "Rana Khalil");
        assert_eq!(record.age, " 30 ");
        assert_eq!(record.address, "Salt, Jordan");
    }

    #[test]
    fn numeric_age_deserializes_as_text() {
        let record: EmployeeRecord = serde_json::from_str(
            r#"{"id":"1001","name":"Ahmad Suleiman","age":34,"address":"Amman, Jordan"}"#,
        )
        .expect("numeric age should parse");
        assert_eq!(record.age, "34");

        let json = serde_json::to_string(&record).expect("record should serialize");
        assert!(json.contains(r#""age":"34""#));
    }

    #[test]
    fn sample_ids_are_distinct() {
        let samples = sample_employees();
        let ids = samples.iter().map(|r| r.id.as_str()).collect::<HashSet<_>>();
        assert_eq!(samples.len(), 4);
        assert_eq!(ids.len(), 4);
    }
}
