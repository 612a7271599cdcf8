use chrono::NaiveDate;
use hxbit_core::Completion;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Task {
    pub id: u64,
    pub user_id: Uuid,
    pub activity_id: u64,
    pub title: String,
    pub xp_reward: i32,
    pub completed: bool,
    pub completed_at: Option<u64>,
    pub due_date: Option<NaiveDate>,
    /// Display emphasis only; missing a required task carries no penalty.
    pub is_required: bool,
    pub created_at: u64,
}

/// Everything that changed when a task was completed.
#[derive(Clone, Debug)]
pub struct TaskCompletion {
    pub task_id: u64,
    pub activity_id: u64,
    pub activity_name: String,
    pub completion: Completion,
}

#[derive(Clone, Debug)]
pub enum CompleteTaskOutcome {
    Completed(TaskCompletion),
    AlreadyCompleted,
    NotFound,
}
