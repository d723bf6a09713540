//! Task record and its creation inputs.

use super::validation::{
    DEFAULT_PRIORITY, DEFAULT_STATUS, DESCRIPTION_MAX_CHARS, PRIORITY_MAX_CHARS, STATUS_MAX_CHARS,
    TITLE_MAX_CHARS, USER_ID_MAX_CHARS, Violations,
};
use super::{ExternalId, FieldUpdate, TaskId, TaskPatch, TaskValidationError, ViolationSource};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use mockable::Clock;

/// Unvalidated field values for a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Optional owner tag.
    pub user_id: Option<String>,
    /// Optional remote resource to enrich from.
    pub external_id: Option<ExternalId>,
}

impl TaskDraft {
    /// Creates a draft with default status and priority.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: DEFAULT_STATUS.to_owned(),
            priority: DEFAULT_PRIORITY.to_owned(),
            user_id: None,
            external_id: None,
        }
    }

    /// Checks every field against the task field limits.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] listing every field that breaks a
    /// limit.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        let mut violations = Violations::new(ViolationSource::Body);
        check_fields(
            &mut violations,
            Some(self.title.as_str()),
            self.description.as_deref(),
            Some(self.status.as_str()),
            Some(self.priority.as_str()),
            self.user_id.as_deref(),
        );
        violations.finish()
    }
}

/// Create input as received, before required fields are known to be present.
///
/// `title` must be supplied. `status` and `priority` take their defaults when
/// absent. None of the three may be `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    /// Task title.
    pub title: FieldUpdate<Option<String>>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: FieldUpdate<Option<String>>,
    /// Priority label.
    pub priority: FieldUpdate<Option<String>>,
    /// Optional owner tag.
    pub user_id: Option<String>,
    /// Optional remote resource to enrich from.
    pub external_id: Option<ExternalId>,
}

impl TaskInput {
    /// Resolves defaults and checks every field in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] listing every missing, `null`, or
    /// out-of-range field.
    pub fn into_draft(self) -> Result<TaskDraft, TaskValidationError> {
        let mut violations = Violations::new(ViolationSource::Body);
        let title = violations.require("title", self.title);
        let status = violations.non_null_or("status", self.status, DEFAULT_STATUS);
        let priority = violations.non_null_or("priority", self.priority, DEFAULT_PRIORITY);
        check_fields(
            &mut violations,
            title.as_deref(),
            self.description.as_deref(),
            status.as_deref(),
            priority.as_deref(),
            self.user_id.as_deref(),
        );
        violations.finish()?;
        // `finish` fails whenever a required value is absent.
        Ok(TaskDraft {
            title: title.unwrap_or_default(),
            description: self.description,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            user_id: self.user_id,
            external_id: self.external_id,
        })
    }
}

fn check_fields(
    violations: &mut Violations,
    title: Option<&str>,
    description: Option<&str>,
    status: Option<&str>,
    priority: Option<&str>,
    user_id: Option<&str>,
) {
    if let Some(text) = title {
        violations.check_length("title", text, 1, TITLE_MAX_CHARS);
    }
    violations.check_optional_length("description", description, DESCRIPTION_MAX_CHARS);
    violations.check_optional_length("status", status, STATUS_MAX_CHARS);
    violations.check_optional_length("priority", priority, PRIORITY_MAX_CHARS);
    violations.check_optional_length("user_id", user_id, USER_ID_MAX_CHARS);
}

/// Validated task that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    draft: TaskDraft,
    external_api_data: Option<String>,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Validates a draft and stamps its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] when the draft breaks a field limit.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskValidationError> {
        draft.validate()?;
        Ok(Self {
            draft,
            external_api_data: None,
            created_at: now(clock),
        })
    }

    /// Attaches the serialized enrichment snapshot.
    #[must_use]
    pub fn with_external_api_data(mut self, data: impl Into<String>) -> Self {
        self.external_api_data = Some(data.into());
        self
    }

    /// Returns the serialized enrichment snapshot, if any.
    #[must_use]
    pub fn external_api_data(&self) -> Option<&str> {
        self.external_api_data.as_deref()
    }

    /// Returns the creation timestamp, which is also the first update time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Splits the record into its fields, enrichment snapshot, and creation
    /// time.
    #[must_use]
    pub fn into_parts(self) -> (TaskDraft, Option<String>, DateTime<Utc>) {
        (self.draft, self.external_api_data, self.created_at)
    }

    /// Binds the storage-assigned identifier, producing the stored task.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        let Self {
            draft,
            external_api_data,
            created_at,
        } = self;
        Task {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            external_id: draft.external_id,
            external_api_data,
            user_id: draft.user_id,
            created_at,
            updated_at: created_at,
            completed_at: None,
        }
    }
}

/// A validated patch stamped with the update time it should record.
///
/// Repositories apply it to the row as currently stored, so concurrent
/// updates to different fields do not overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    patch: TaskPatch,
    updated_at: DateTime<Utc>,
}

impl TaskChanges {
    /// Returns the supplied fields.
    #[must_use]
    pub const fn patch(&self) -> &TaskPatch {
        &self.patch
    }

    /// Returns the update time to record.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    external_id: Option<ExternalId>,
    external_api_data: Option<String>,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: String,
    /// Persisted priority.
    pub priority: String,
    /// Persisted remote resource identifier.
    pub external_id: Option<ExternalId>,
    /// Persisted enrichment snapshot.
    pub external_api_data: Option<String>,
    /// Persisted owner tag.
    pub user_id: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            external_id: data.external_id,
            external_api_data: data.external_api_data,
            user_id: data.user_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the priority label.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Returns the remote resource identifier, if any.
    #[must_use]
    pub const fn external_id(&self) -> Option<ExternalId> {
        self.external_id
    }

    /// Returns the enrichment snapshot captured at creation, if any.
    #[must_use]
    pub fn external_api_data(&self) -> Option<&str> {
        self.external_api_data.as_deref()
    }

    /// Returns the owner tag, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Validates a partial update against this task without changing it.
    ///
    /// A supplied `completed_at` is truncated to microseconds, and the
    /// returned update time is strictly after the current `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] when a supplied field breaks a limit.
    pub fn prepare_update(
        &self,
        mut patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<TaskChanges, TaskValidationError> {
        patch.validate()?;
        if let FieldUpdate::Set(Some(at)) = &mut patch.completed_at {
            *at = at.trunc_subsecs(6);
        }
        Ok(TaskChanges {
            patch,
            updated_at: self.advance_to(now(clock)),
        })
    }

    /// Merges prepared changes; fields not supplied keep their values.
    pub fn apply_changes(&mut self, changes: TaskChanges) {
        let TaskChanges { patch, updated_at } = changes;
        let TaskPatch {
            title,
            description,
            status,
            priority,
            user_id,
            completed_at,
        } = patch;

        title.apply_to(&mut self.title);
        description.apply_to(&mut self.description);
        status.apply_to(&mut self.status);
        priority.apply_to(&mut self.priority);
        user_id.apply_to(&mut self.user_id);
        completed_at.apply_to(&mut self.completed_at);
        self.updated_at = self.advance_to(updated_at);
    }

    /// Validates and merges a partial update, then advances `updated_at`.
    ///
    /// Nothing is changed when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] when a supplied field breaks a limit.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskValidationError> {
        let changes = self.prepare_update(patch, clock)?;
        self.apply_changes(changes);
        Ok(())
    }

    /// Returns `timestamp`, or one microsecond past `updated_at` when the
    /// clock has not moved beyond it.
    fn advance_to(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        if timestamp > self.updated_at {
            timestamp
        } else {
            self.updated_at + Duration::microseconds(1)
        }
    }
}

/// Current time at the precision `PostgreSQL` stores.
fn now(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}
