use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Activity {
    pub id: u64,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: i32,
    pub xp: i64,
    pub created_at: u64,
}
