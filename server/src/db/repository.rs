use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use super::models::{Event, EventInput};
use crate::error::Result;
use crate::session::{Clock, SystemClock};

/// Storage behind the event feed and admin CRUD.
pub trait EventRepository: Send + Sync {
    /// Events sorted by start date. Past events are skipped unless `include_past`.
    fn list_events(&self, include_past: bool) -> Result<Vec<Event>>;

    fn get_event(&self, id: i64) -> Result<Option<Event>>;

    fn create_event(&self, input: EventInput) -> Result<Event>;

    fn update_event(&self, id: i64, input: EventInput) -> Result<Option<Event>>;

    /// Returns whether a row was removed.
    fn delete_event(&self, id: i64) -> Result<bool>;
}

#[derive(Clone)]
pub struct MemoryEventRepository {
    events: Arc<DashMap<i64, Event>>,
    next_id: Arc<AtomicI64>,
    clock: Arc<dyn Clock>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for MemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRepository for MemoryEventRepository {
    fn list_events(&self, include_past: bool) -> Result<Vec<Event>> {
        let now = self.clock.now();

        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|entry| include_past || entry.date >= now)
            .map(|entry| entry.value().clone())
            .collect();

        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        Ok(events)
    }

    fn get_event(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.events.get(&id).map(|entry| entry.value().clone()))
    }

    fn create_event(&self, input: EventInput) -> Result<Event> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event::new(id, input, self.clock.now());

        self.events.insert(id, event.clone());
        log::info!("Created event {} ({})", id, event.title);

        Ok(event)
    }

    fn update_event(&self, id: i64, input: EventInput) -> Result<Option<Event>> {
        let now = self.clock.now();

        let updated = self.events.get_mut(&id).map(|mut entry| {
            entry.apply(input, now);
            entry.value().clone()
        });

        if updated.is_some() {
            log::info!("Updated event {}", id);
        }

        Ok(updated)
    }

    fn delete_event(&self, id: i64) -> Result<bool> {
        let removed = self.events.remove(&id).is_some();

        if removed {
            log::info!("Deleted event {}", id);
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ManualClock;
    use chrono::{Duration, Utc};

    fn input(title: &str, date: chrono::DateTime<Utc>) -> EventInput {
        EventInput {
            title: title.to_string(),
            description: String::new(),
            date,
            end_date: None,
            location: String::new(),
            image_url: None,
            max_participants: None,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let repo = MemoryEventRepository::new();
        let date = Utc::now() + Duration::days(1);

        let first = repo.create_event(input("A", date)).unwrap();
        let second = repo.create_event(input("B", date)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_list_upcoming_skips_past_events() {
        let clock = Arc::new(ManualClock::default());
        let repo = MemoryEventRepository::with_clock(clock.clone());
        let now = clock.now();

        repo.create_event(input("Past", now - Duration::days(1))).unwrap();
        repo.create_event(input("Later", now + Duration::days(2))).unwrap();
        repo.create_event(input("Soon", now + Duration::days(1))).unwrap();

        let upcoming = repo.list_events(false).unwrap();
        let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Soon", "Later"]);

        let all = repo.list_events(true).unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Past", "Soon", "Later"]);
    }

    #[test]
    fn test_get_missing_event() {
        let repo = MemoryEventRepository::new();
        assert!(repo.get_event(42).unwrap().is_none());
    }

    #[test]
    fn test_update_event() {
        let clock = Arc::new(ManualClock::default());
        let repo = MemoryEventRepository::with_clock(clock.clone());
        let date = clock.now() + Duration::days(3);

        let created = repo.create_event(input("Old", date)).unwrap();
        clock.advance(Duration::minutes(5));

        let updated = repo
            .update_event(created.id, input("Updated", date))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Updated");
        assert!(updated.updated_at > created.updated_at);

        assert!(repo.update_event(99, input("Nope", date)).unwrap().is_none());
    }

    #[test]
    fn test_delete_event() {
        let repo = MemoryEventRepository::new();
        let created = repo
            .create_event(input("Gone", Utc::now() + Duration::days(1)))
            .unwrap();

        assert!(repo.delete_event(created.id).unwrap());
        assert!(!repo.delete_event(created.id).unwrap());
        assert!(repo.is_empty());
    }
}
