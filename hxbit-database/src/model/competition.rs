use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Competition {
    pub id: u64,
    pub user_id: Uuid,
    pub name: String,
    pub organizer: Option<String>,
    pub held_on: Option<NaiveDate>,
    pub placement: Option<String>,
    pub created_at: u64,
}
