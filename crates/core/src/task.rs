//! Task enums, request shapes and validation.
//!
//! Raw request bodies ([`CreateTask`], [`UpdateTask`], [`SetTaskStatus`]) are
//! converted into typed values ([`NewTask`], [`TaskChanges`], [`TaskStatus`])
//! before anything reaches the database. Conversion is where trimming,
//! defaulting, enum parsing and length checks happen.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::nullable;
use crate::text::reject_nul;
use crate::types::{Date, DbId};

/// Maximum task title length (characters).
pub const MAX_TITLE_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Task priority. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a priority, reporting failures against `field`.
    pub fn parse(value: &str, field: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| {
                CoreError::validation(
                    field,
                    format!("Invalid priority '{value}'. Must be one of: low, medium, high"),
                )
            })
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status. `pending` and `completed` may transition freely in both
/// directions; there is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [Self::Pending, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parse a status, reporting failures against `field`.
    pub fn parse(value: &str, field: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| {
                CoreError::validation(
                    field,
                    format!("Invalid status '{value}'. Must be one of: pending, completed"),
                )
            })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A category reference as sent by clients: a JSON number, or a numeric
/// string coming straight from an HTML `<select>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(DbId),
    Text(String),
}

impl CategoryRef {
    /// Resolve to an id. An empty string means "no category".
    pub fn resolve(&self) -> Result<Option<DbId>, CoreError> {
        match self {
            Self::Id(id) => Ok(Some(*id)),
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => text.trim().parse().map(Some).map_err(|_| {
                CoreError::validation("category_id", format!("Invalid category id '{text}'"))
            }),
        }
    }
}

/// Parse a due date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, whose
/// calendar date is kept. Blank input means "no due date".
pub fn parse_due_date(value: &str) -> Result<Option<Date>, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = Date::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| Some(ts.date_naive()))
        .map_err(|_| {
            CoreError::validation(
                "due_date",
                format!("Invalid date '{value}'. Expected YYYY-MM-DD"),
            )
        })
}

/// Blank descriptions are stored as null.
fn normalize_description(value: Option<String>) -> Result<Option<String>, CoreError> {
    let description = value
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(d) = &description {
        reject_nul("description", d)?;
    }
    Ok(description)
}

fn normalize_title(value: Option<&str>) -> Result<String, CoreError> {
    let title = value.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(CoreError::validation("title", "Title is required"));
    }
    reject_nul("title", title)?;
    Ok(title.to_string())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Request body for `POST /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryRef>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// A validated task ready to insert. New tasks always start `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewTask {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub due_date: Option<Date>,
    pub priority: TaskPriority,
}

impl TryFrom<CreateTask> for NewTask {
    type Error = CoreError;

    fn try_from(input: CreateTask) -> Result<Self, Self::Error> {
        let title = normalize_title(input.title.as_deref())?;

        let category_id = match &input.category_id {
            Some(reference) => reference.resolve()?,
            None => None,
        };

        let due_date = match input.due_date.as_deref() {
            Some(raw) => parse_due_date(raw)?,
            None => None,
        };

        let priority = match input.priority.as_deref() {
            Some(raw) => TaskPriority::parse(raw, "priority")?,
            None => TaskPriority::default(),
        };

        let task = NewTask {
            title,
            description: normalize_description(input.description)?,
            category_id,
            due_date,
            priority,
        };
        task.validate()?;
        Ok(task)
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Request body for `PUT/PATCH /tasks/{id}`.
///
/// Every field is optional. Nullable columns use a double option so an
/// explicit `null` clears the value while a missing key leaves it alone.
/// Unknown keys are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTask {
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub category_id: Option<Option<CategoryRef>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub status: Option<Option<String>>,
}

/// Validated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TaskChanges {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<DbId>>,
    pub due_date: Option<Option<Date>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The category the task is being moved into, if any. Clearing the
    /// category needs no ownership check and yields `None`.
    pub fn target_category(&self) -> Option<DbId> {
        self.category_id.flatten()
    }
}

impl TryFrom<UpdateTask> for TaskChanges {
    type Error = CoreError;

    fn try_from(input: UpdateTask) -> Result<Self, Self::Error> {
        let title = match input.title {
            None => None,
            Some(raw) => Some(normalize_title(raw.as_deref())?),
        };

        let category_id = match input.category_id {
            None => None,
            Some(None) => Some(None),
            Some(Some(reference)) => Some(reference.resolve()?),
        };

        let due_date = match input.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(parse_due_date(&raw)?),
        };

        let priority = match input.priority {
            None => None,
            Some(None) => {
                return Err(CoreError::validation("priority", "Priority may not be null"))
            }
            Some(Some(raw)) => Some(TaskPriority::parse(&raw, "priority")?),
        };

        let status = match input.status {
            None => None,
            Some(None) => return Err(CoreError::validation("status", "Status may not be null")),
            Some(Some(raw)) => Some(TaskStatus::parse(&raw, "status")?),
        };

        let changes = TaskChanges {
            title,
            description: input.description.map(normalize_description).transpose()?,
            category_id,
            due_date,
            priority,
            status,
        };
        changes.validate()?;
        Ok(changes)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Request body for `PUT /tasks/{id}/status`.
#[derive(Debug, Default, Deserialize)]
pub struct SetTaskStatus {
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<SetTaskStatus> for TaskStatus {
    type Error = CoreError;

    fn try_from(input: SetTaskStatus) -> Result<Self, Self::Error> {
        match input.status.as_deref() {
            Some(raw) => TaskStatus::parse(raw, "status"),
            None => Err(CoreError::validation("status", "Status is required")),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Query string for `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    /// A category id, or `none` for uncategorized tasks.
    pub category_id: Option<String>,
}

/// Category restriction for a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Uncategorized,
    Id(DbId),
}

/// Validated listing filter. Empty fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<CategoryFilter>,
}

impl TryFrom<TaskListParams> for TaskFilter {
    type Error = CoreError;

    fn try_from(params: TaskListParams) -> Result<Self, Self::Error> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
        }

        let status = present(params.status.as_deref())
            .map(|raw| TaskStatus::parse(raw, "status"))
            .transpose()?;
        let priority = present(params.priority.as_deref())
            .map(|raw| TaskPriority::parse(raw, "priority"))
            .transpose()?;
        let category = present(params.category_id.as_deref())
            .map(|raw| match raw {
                "none" => Ok(CategoryFilter::Uncategorized),
                id => id.parse().map(CategoryFilter::Id).map_err(|_| {
                    CoreError::validation(
                        "category_id",
                        format!("Invalid category filter '{id}'. Use an id or 'none'"),
                    )
                }),
            })
            .transpose()?;

        Ok(TaskFilter {
            status,
            priority,
            category,
        })
    }
}
