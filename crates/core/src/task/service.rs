//! Task store service
//!
//! Collection-level operations over an injected blob store. Every
//! mutating operation runs a full load -> mutate -> save cycle against
//! the JSON array; there is no isolation between concurrent callers,
//! so interleaved writers clobber each other at whole-collection
//! granularity (last write wins). Acceptable for a single-user local
//! store; a shared deployment needs versioning on top of this.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::Error;
use crate::Result;

use super::blob_store::BlobStore;
use super::model::{advance_due_date, is_valid_task_name, Repeat, Tag, Task};

/// Partial update applied to an existing task
///
/// `due_date` is doubly optional: `None` leaves the field alone,
/// `Some(None)` clears the due date.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub task_name: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub repeat: Option<Repeat>,
    pub is_done: Option<bool>,
    pub is_important: Option<bool>,
}

/// Collection-level task service
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn BlobStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Load the whole collection with tags freshly recomputed
    ///
    /// An absent blob yields an empty collection. So does an unreadable
    /// or corrupt one: the failure is logged and the load degrades to
    /// empty, after which the next write overwrites whatever the blob
    /// held. That fail-open tradeoff can discard data behind a
    /// transient read error.
    pub async fn load_all(&self) -> Vec<Task> {
        let mut tasks = match self.store.read().await {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<Task>>(&contents) {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!("Failed to parse task blob, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read task blob, starting empty: {}", e);
                Vec::new()
            }
        };

        let today = Self::today();
        for task in &mut tasks {
            task.refresh_tags(today);
        }
        tasks
    }

    /// Serialize the whole collection and overwrite the blob
    ///
    /// Write failures surface as `Err` rather than being swallowed, so
    /// callers can tell when a save did not land.
    pub async fn save_all(&self, tasks: &[Task]) -> Result<()> {
        let contents = serde_json::to_string(tasks)?;
        self.store.write(&contents).await?;
        tracing::debug!("Persisted {} tasks", tasks.len());
        Ok(())
    }

    /// Create a task and append it to the collection
    pub async fn add(
        &self,
        task_name: &str,
        due_date: Option<NaiveDate>,
        repeat: Repeat,
        is_important: bool,
    ) -> Result<Task> {
        if !is_valid_task_name(task_name) {
            return Err(Error::InvalidTaskName);
        }

        let mut tasks = self.load_all().await;

        let mut task = Task::new(task_name.trim())
            .with_repeat(repeat)
            .with_important(is_important);
        task.due_date = due_date;

        // Timestamp ids collide when two tasks are created within the
        // same millisecond; bump past the current maximum.
        if tasks.iter().any(|t| t.id == task.id) {
            task.id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        }
        task.refresh_tags(Self::today());

        tasks.push(task.clone());
        self.save_all(&tasks).await?;
        Ok(task)
    }

    /// Apply a partial update to a task
    ///
    /// Returns `Ok(None)` if the id is unknown. A name change must pass
    /// validation or the whole update fails with no field applied.
    pub async fn update(&self, id: i64, update: TaskUpdate) -> Result<Option<Task>> {
        let mut tasks = self.load_all().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &update.task_name {
            if !is_valid_task_name(name) {
                return Err(Error::InvalidTaskName);
            }
        }

        if let Some(name) = update.task_name {
            task.task_name = name.trim().to_string();
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        if let Some(repeat) = update.repeat {
            task.repeat = repeat;
        }
        if let Some(is_done) = update.is_done {
            task.is_done = is_done;
        }
        if let Some(is_important) = update.is_important {
            task.is_important = is_important;
        }
        task.refresh_tags(Self::today());

        let task = task.clone();
        self.save_all(&tasks).await?;
        Ok(Some(task))
    }

    /// Remove a task by id; returns whether a removal occurred
    ///
    /// A miss does not rewrite the blob.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tasks = self.load_all().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Ok(false);
        }
        self.save_all(&tasks).await?;
        Ok(true)
    }

    /// Toggle a task's done state
    ///
    /// A recurring task with a due date rolls its due date forward
    /// instead of completing; it never becomes permanently done through
    /// this path. Everything else flips normally.
    pub async fn toggle_done(&self, id: i64) -> Result<Option<Task>> {
        let mut tasks = self.load_all().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        match (task.is_done, task.repeat, task.due_date) {
            (false, repeat, Some(due)) if repeat != Repeat::None => {
                task.due_date = Some(advance_due_date(due, repeat));
            }
            _ => task.is_done = !task.is_done,
        }
        task.refresh_tags(Self::today());

        let task = task.clone();
        self.save_all(&tasks).await?;
        Ok(Some(task))
    }

    /// Toggle a task's important flag
    pub async fn toggle_important(&self, id: i64) -> Result<Option<Task>> {
        let mut tasks = self.load_all().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.is_important = !task.is_important;
        task.refresh_tags(Self::today());

        let task = task.clone();
        self.save_all(&tasks).await?;
        Ok(Some(task))
    }

    /// Tasks carrying the given tag (or all of them), most urgent first
    ///
    /// The sort is stable, so equal scores keep their stored order.
    pub async fn get_filtered(&self, filter: Option<Tag>) -> Vec<Task> {
        let mut tasks = self.load_all().await;

        if let Some(tag) = filter {
            tasks.retain(|t| t.tags.contains(&tag));
        }

        let now = Self::now();
        tasks.sort_by_key(|t| std::cmp::Reverse(t.priority(now)));
        tasks
    }

    /// Look up a single task by id
    pub async fn get_by_id(&self, id: i64) -> Option<Task> {
        self.load_all().await.into_iter().find(|t| t.id == id)
    }
}
