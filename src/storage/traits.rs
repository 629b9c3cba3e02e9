use chrono::{DateTime, Utc};

/// One managed record. `id` is assigned by the store and never reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence contract for records. `None` means the id does not exist,
/// which callers must keep distinct from an `Err` storage failure.
pub trait Storage {
    fn insert_record(&self, name: &str, email: &str) -> anyhow::Result<u64>;
    fn list_records(&self) -> anyhow::Result<Vec<Record>>;
    fn load_record(&self, id: u64) -> anyhow::Result<Option<Record>>;
    fn update_record(&self, id: u64, name: &str, email: &str) -> anyhow::Result<Option<Record>>;
    fn delete_record(&self, id: u64) -> anyhow::Result<bool>;
}
