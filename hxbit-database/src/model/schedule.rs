use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ScheduleEvent {
    pub id: u64,
    pub user_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: u64,
    pub ends_at: u64,
    pub created_at: u64,
}

impl ScheduleEvent {
    pub fn duration_seconds(&self) -> u64 {
        self.ends_at.saturating_sub(self.starts_at)
    }
}
