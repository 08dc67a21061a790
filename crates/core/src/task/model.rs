//! Task domain model
//!
//! Pure functions over a single task record: creation, validation, tag
//! derivation, due-date advancement and priority scoring. No I/O here;
//! every date-dependent operation takes its reference date explicitly.

use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence rule governing due-date advancement on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    /// No recurrence; also absorbs unrecognized values in legacy records
    #[serde(other)]
    None,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::None
    }
}

/// A label derived from a task's current state and due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Done,
    Important,
    Overdue,
    Today,
    #[serde(rename = "this week")]
    ThisWeek,
}

/// A single to-do item
///
/// Serialized field names match the persisted blob layout (camelCase).
/// `tags` is stored with the rest of the record but is never
/// authoritative: it is overwritten from the other fields on every
/// read and write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub task_name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub is_important: bool,
}

impl Task {
    /// Create a new task with the given name
    ///
    /// The id is the creation timestamp in milliseconds; the service
    /// layer guarantees uniqueness across the collection.
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            task_name: task_name.into(),
            due_date: None,
            repeat: Repeat::default(),
            tags: Vec::new(),
            is_done: false,
            is_important: false,
        }
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the recurrence rule
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the important flag
    pub fn with_important(mut self, is_important: bool) -> Self {
        self.is_important = is_important;
        self
    }

    /// Derive the tags for this task as of the given calendar day
    ///
    /// Decision order, first match ends the date checks:
    /// done is terminal; `important` stacks ahead of any date tag;
    /// then overdue, today, and due-within-seven-days in that order.
    pub fn tags_for(&self, today: NaiveDate) -> Vec<Tag> {
        let mut tags = Vec::new();

        if self.is_done {
            tags.push(Tag::Done);
            return tags;
        }

        if self.is_important {
            tags.push(Tag::Important);
        }

        let Some(due) = self.due_date else {
            return tags;
        };

        if due < today {
            tags.push(Tag::Overdue);
        } else if due == today {
            tags.push(Tag::Today);
        } else if today
            .checked_add_days(Days::new(7))
            .is_some_and(|week_end| due <= week_end)
        {
            tags.push(Tag::ThisWeek);
        }

        tags
    }

    /// Overwrite `tags` with a fresh derivation
    pub fn refresh_tags(&mut self, today: NaiveDate) {
        self.tags = self.tags_for(today);
    }

    /// Priority score for sort order, higher is more urgent
    ///
    /// Overdue dominates (+1000), then important (+100); a due date
    /// contributes +10 minus the whole days until the due day's
    /// midnight, floored toward negative infinity so a task due
    /// earlier today still gains from the negative day count. The
    /// score depends on `now` and is never persisted.
    pub fn priority(&self, now: NaiveDateTime) -> i64 {
        let mut score = 0;

        if self.tags_for(now.date()).contains(&Tag::Overdue) {
            score += 1000;
        }

        if self.is_important {
            score += 100;
        }

        if let Some(due) = self.due_date {
            score += 10;
            let seconds_until_due = (due.and_time(NaiveTime::MIN) - now).num_seconds();
            score -= seconds_until_due.div_euclid(86_400);
        }

        score
    }
}

/// True iff the name is non-empty after trimming whitespace
pub fn is_valid_task_name(task_name: &str) -> bool {
    !task_name.trim().is_empty()
}

/// Advance a due date by one recurrence interval
///
/// Monthly advancement clamps to the end of the target month
/// (Jan 31 -> Feb 28, or Feb 29 in a leap year). `Repeat::None`
/// returns the date unchanged.
pub fn advance_due_date(due_date: NaiveDate, repeat: Repeat) -> NaiveDate {
    let advanced = match repeat {
        Repeat::Daily => due_date.checked_add_days(Days::new(1)),
        Repeat::Weekly => due_date.checked_add_days(Days::new(7)),
        Repeat::Monthly => due_date.checked_add_months(Months::new(1)),
        Repeat::None => None,
    };
    advanced.unwrap_or(due_date)
}
