//! Log record
//!
//! The single data type served by goallog.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GoalLogError, Result};

/// A user-submitted record of a date, notes, a goal and whether it was met
///
/// Decoding is lenient:
/// - keys match field names case-insensitively (`Date`, `GOAL`)
/// - missing fields and `null` values leave the zero value
/// - unknown keys are ignored, and a later duplicate key wins
/// - a bare `null` decodes to an empty log
///
/// So `{}` is a well-formed (but invalid) log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Log {
    pub id: String,
    pub date: String,
    pub notes: String,
    pub goal: String,
    #[serde(rename = "goalAccomplished")]
    pub goal_accomplished: bool,
}

impl Log {
    /// Build a log without an id (the store assigns one)
    pub fn new(
        date: impl Into<String>,
        notes: impl Into<String>,
        goal: impl Into<String>,
        goal_accomplished: bool,
    ) -> Self {
        Self {
            id: String::new(),
            date: date.into(),
            notes: notes.into(),
            goal: goal.into(),
            goal_accomplished,
        }
    }

    /// Decode a log from a request body
    ///
    /// Only the first JSON value is read; anything after it is ignored.
    /// An empty body fails with `EOF`.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Log>();
        match stream.next() {
            Some(Ok(log)) => Ok(log),
            Some(Err(e)) if e.is_eof() => Err(GoalLogError::MalformedBody(
                "unexpected EOF".to_string(),
            )),
            Some(Err(e)) => Err(GoalLogError::MalformedBody(e.to_string())),
            None => Err(GoalLogError::MalformedBody("EOF".to_string())),
        }
    }
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Date,
    Notes,
    Goal,
    GoalAccomplished,
}

impl Field {
    fn of(key: &str) -> Option<Self> {
        const FIELDS: [(&str, Field); 5] = [
            ("id", Field::Id),
            ("date", Field::Date),
            ("notes", Field::Notes),
            ("goal", Field::Goal),
            ("goalAccomplished", Field::GoalAccomplished),
        ];

        FIELDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, field)| *field)
    }
}

impl<'de> Deserialize<'de> for Log {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(LogVisitor)
    }
}

struct LogVisitor;

impl<'de> Visitor<'de> for LogVisitor {
    type Value = Log;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a log object")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Log, E> {
        Ok(Log::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Log, A::Error> {
        let mut log = Log::default();

        while let Some(key) = map.next_key::<String>()? {
            match Field::of(&key) {
                Some(Field::Id) => set(&mut log.id, map.next_value()?),
                Some(Field::Date) => set(&mut log.date, map.next_value()?),
                Some(Field::Notes) => set(&mut log.notes, map.next_value()?),
                Some(Field::Goal) => set(&mut log.goal, map.next_value()?),
                Some(Field::GoalAccomplished) => {
                    set(&mut log.goal_accomplished, map.next_value()?)
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(log)
    }
}

/// `null` keeps whatever the field already holds
fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
