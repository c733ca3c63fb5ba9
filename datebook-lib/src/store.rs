use tokio::sync::watch;
use tracing::debug;

use crate::meeting::{Meeting, MeetingId};

/// The local, in-memory source of truth for every meeting that gets rendered.
///
/// Meetings are kept in insertion (or load) order. The [`Store`] is owned by the application
/// root and only changes through [`Store::load`], [`Store::create`], [`Store::delete`] and
/// [`Store::edit`]. Every change is broadcast to receivers obtained from
/// [`Store::subscribe`]. Inputs are trusted: nothing here validates or fails.
#[derive(Debug)]
pub struct Store {
    meetings: watch::Sender<Vec<Meeting>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            meetings: watch::Sender::new(Vec::new()),
        }
    }

    /// Borrow the current meetings. Don't hold on to this across an `.await`.
    pub fn meetings(&self) -> watch::Ref<'_, Vec<Meeting>> {
        self.meetings.borrow()
    }

    /// An owned copy of the current meetings.
    pub fn snapshot(&self) -> Vec<Meeting> {
        self.meetings.borrow().clone()
    }

    pub fn find(&self, id: MeetingId) -> Option<Meeting> {
        self.meetings.borrow().iter().find(|m| m.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.meetings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.borrow().is_empty()
    }

    /// Get notified about every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Meeting>> {
        self.meetings.subscribe()
    }

    /// Replace everything.
    pub fn load(&mut self, meetings: Vec<Meeting>) {
        debug!("Loaded {} meetings", meetings.len());
        self.meetings.send_replace(meetings);
    }

    /// Append a meeting. Duplicate ids aren't checked.
    pub fn create(&mut self, meeting: Meeting) {
        debug!("Created meeting {}: {}", meeting.id, meeting.name);
        self.meetings.send_modify(|meetings| meetings.push(meeting));
    }

    /// Remove every meeting with the given id.
    pub fn delete(&mut self, id: MeetingId) {
        debug!("Deleted meeting {id}");
        self.meetings
            .send_modify(|meetings| meetings.retain(|m| m.id != id));
    }

    /// Replace the first meeting sharing `meeting`'s id. Does nothing if there is none.
    pub fn edit(&mut self, meeting: Meeting) {
        debug!("Edited meeting {}: {}", meeting.id, meeting.name);
        self.meetings.send_modify(|meetings| {
            if let Some(slot) = meetings.iter_mut().find(|m| m.id == meeting.id) {
                *slot = meeting;
            }
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Utc};

    use super::*;

    fn meeting(id: u64, name: &str) -> Meeting {
        let start: DateTime<Utc> = "2024-03-04T09:00:00Z".parse().unwrap();

        Meeting {
            id: MeetingId(id),
            name: name.into(),
            start_datetime: start,
            end_datetime: start,
        }
    }

    fn names(store: &Store) -> Vec<String> {
        store.meetings().iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn test_load_replaces() {
        let mut store = Store::new();
        store.create(meeting(0, "Old"));

        store.load(vec![meeting(1, "A"), meeting(2, "B")]);

        assert_eq!(names(&store), ["A", "B"]);
    }

    #[test]
    fn test_create_appends() {
        let mut store = Store::new();

        store.create(meeting(5, "First"));
        store.create(meeting(5, "Duplicate"));

        assert_eq!(names(&store), ["First", "Duplicate"]);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let mut store = Store::new();
        store.load(vec![meeting(1, "A"), meeting(2, "B"), meeting(1, "C")]);

        store.delete(MeetingId(1));

        assert_eq!(names(&store), ["B"]);
    }

    #[test]
    fn test_delete_then_reuse_id() {
        let mut store = Store::new();
        store.load(vec![meeting(0, "A"), meeting(1, "B")]);

        store.delete(MeetingId(1));
        store.create(meeting(1, "C"));

        let with_id = store
            .meetings()
            .iter()
            .filter(|m| m.id == MeetingId(1))
            .count();
        assert_eq!(with_id, 1);
        assert_eq!(store.find(MeetingId(1)).unwrap().name, "C");
    }

    #[test]
    fn test_edit_replaces_first_match_only() {
        let mut store = Store::new();
        store.load(vec![meeting(1, "A"), meeting(2, "B"), meeting(1, "C")]);

        store.edit(meeting(1, "Edited"));
        store.edit(meeting(9, "Missing"));

        assert_eq!(names(&store), ["Edited", "B", "C"]);
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let mut store = Store::new();
        let mut rx = store.subscribe();

        assert!(!rx.has_changed().unwrap());

        store.create(meeting(0, "A"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.delete(MeetingId(0));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
