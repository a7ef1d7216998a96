use chrono::NaiveDateTime;

pub struct Post {
    pub id: i64,
    pub sem_url: String,
    pub created: chrono::NaiveDateTime,
    pub modified: chrono::NaiveDateTime,
    pub published: Option<chrono::NaiveDateTime>,
    pub draft: bool,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(title: &str) -> Self {
        let now = NaiveDateTime::default();
        Self {
            id: 0,
            sem_url: title.to_lowercase().replace(' ', "-"),
            created: now,
            modified: now,
            published: None,
            draft: true,
            title: title.to_string(),
            body: String::new(),
        }
    }

    pub fn publish(&mut self, at: NaiveDateTime) {
        self.published = Some(at);
        self.draft = false;
    }
}
