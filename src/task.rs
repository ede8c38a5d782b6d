use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Builds a fresh record stamped with `now`. Callers trim and validate the title.
    pub fn new(title: String, desc: String, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            title,
            desc,
            completed: false,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Applies the `Some` fields of `fields`; id and created_at never change.
    pub fn merge(&mut self, fields: TaskUpdate) {
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(desc) = fields.desc {
            self.desc = desc;
        }
        if let Some(completed) = fields.completed {
            self.completed = completed;
        }
    }
}

/// Partial update: only the named fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn text(title: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            desc: Some(desc.into()),
            completed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn new_task_uses_millis_id_and_iso_timestamp() {
        let task = Task::new("Buy milk".into(), "2%".into(), at(1_700_000_000_123));
        assert_eq!(task.id, "1700000000123");
        assert_eq!(task.created_at, "2023-11-14T22:13:20.123Z");
        assert!(!task.completed);
    }

    #[test]
    fn serializes_with_camel_case_created_at() {
        let task = Task::new("A".into(), String::new(), at(0));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00.000Z");
        assert_eq!(json["desc"], "");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn missing_desc_and_completed_default() {
        let raw = r#"{"id":"1","title":"T","createdAt":"2024-01-01T00:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.desc, "");
        assert!(!task.completed);
    }

    #[test]
    fn merge_leaves_unnamed_fields() {
        let mut task = Task::new("Old".into(), "keep".into(), at(5));
        let before = task.clone();
        task.merge(TaskUpdate {
            title: Some("New".into()),
            ..TaskUpdate::default()
        });
        assert_eq!(task.title, "New");
        assert_eq!(task.desc, "keep");
        assert_eq!(task.completed, before.completed);
        assert_eq!(task.id, before.id);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn counts_tally_completed() {
        let mut a = Task::new("a".into(), String::new(), at(1));
        let b = Task::new("b".into(), String::new(), at(2));
        a.completed = true;
        assert_eq!(
            Counts::of(&[a, b]),
            Counts {
                total: 2,
                completed: 1
            }
        );
    }
}
