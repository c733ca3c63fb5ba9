//! The add/edit form: a single live draft, per-field error flags, and the save gate in
//! front of the [`Store`].

use chrono::{NaiveDate, TimeZone};
use strum::{Display, EnumIter};
use tracing::debug;

use crate::{
    datetime::{format_display, midnight_display, parse_display},
    meeting::{IdStrategy, Meeting, MeetingId},
    store::Store,
};

/// Names are only accepted while they stay below this many characters.
pub const NAME_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Field {
    Name,
    EditStartDate,
    EditEndDate,
}

/// A meeting that is still being typed in. Dates are raw display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub edit_start_date: String,
    pub edit_end_date: String,
}

impl Draft {
    /// An unnamed draft starting and ending at midnight of `day`.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            name: String::new(),
            edit_start_date: midnight_display(day),
            edit_end_date: midnight_display(day),
        }
    }

    pub fn from_meeting<Tz: TimeZone>(meeting: &Meeting, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            name: meeting.name.clone(),
            edit_start_date: format_display(&meeting.start_datetime, tz),
            edit_end_date: format_display(&meeting.end_datetime, tz),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::EditStartDate => &self.edit_start_date,
            Field::EditEndDate => &self.edit_end_date,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::EditStartDate => self.edit_start_date = value,
            Field::EditEndDate => self.edit_end_date = value,
        }
    }
}

/// Which fields failed the last save attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: bool,
    pub start: bool,
    pub end: bool,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.name || self.start || self.end
    }

    /// Either date failed to parse
    pub fn dates(&self) -> bool {
        self.start || self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Adding(Draft),
    Editing {
        draft: Draft,
        target: MeetingId,
    },
}

impl Mode {
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Mode::Idle => None,
            Mode::Adding(draft) | Mode::Editing { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Mode::Idle => None,
            Mode::Adding(draft) | Mode::Editing { draft, .. } => Some(draft),
        }
    }
}

/// A successful save, already applied to the [`Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Created(Meeting),
    Edited(Meeting),
}

#[derive(Debug, Default)]
pub struct FormController {
    mode: Mode,
    errors: FieldErrors,
    saving: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Raised while a save is being processed, so the controls can't be hit twice.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Start a new meeting on `day`. Ignored unless idle.
    pub fn begin_add(&mut self, day: NaiveDate) -> bool {
        if !self.is_idle() {
            debug!("Not adding a meeting, the form is busy");
            return false;
        }

        self.mode = Mode::Adding(Draft::for_day(day));

        true
    }

    /// Start editing `meeting`. Ignored unless idle.
    pub fn begin_edit<Tz: TimeZone>(&mut self, meeting: &Meeting, tz: &Tz) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        if !self.is_idle() {
            debug!("Not editing meeting {}, the form is busy", meeting.id);
            return false;
        }

        self.mode = Mode::Editing {
            draft: Draft::from_meeting(meeting, tz),
            target: meeting.id,
        };

        true
    }

    /// Update one field of the live draft. Names that would reach [`NAME_LIMIT`] characters
    /// are dropped.
    pub fn input(&mut self, field: Field, value: String) {
        if field == Field::Name && value.chars().count() >= NAME_LIMIT {
            return;
        }

        if let Some(draft) = self.mode.draft_mut() {
            draft.set(field, value);
        }
    }

    /// Point a new meeting's dates at `day`. Drafts of existing meetings are left alone.
    pub fn reseed(&mut self, day: NaiveDate) {
        if let Mode::Adding(draft) = &mut self.mode {
            draft.edit_start_date = midnight_display(day);
            draft.edit_end_date = midnight_display(day);
        }
    }

    /// Validate the draft and, if it holds up, apply it to `store` and go back to idle.
    ///
    /// On failure the error flags are set, the draft stays as it is and `store` is not
    /// touched. An end before the start is accepted.
    pub fn save<Tz: TimeZone>(
        &mut self,
        store: &mut Store,
        ids: IdStrategy,
        tz: &Tz,
    ) -> Option<Commit> {
        self.saving = true;
        let commit = self.commit(store, ids, tz);
        self.saving = false;

        commit
    }

    /// Drop the draft and any errors. Nothing else happens.
    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
        self.errors = FieldErrors::default();
    }

    fn commit<Tz: TimeZone>(
        &mut self,
        store: &mut Store,
        ids: IdStrategy,
        tz: &Tz,
    ) -> Option<Commit> {
        let draft = self.mode.draft()?;

        let start = parse_display(&draft.edit_start_date, tz);
        let end = parse_display(&draft.edit_end_date, tz);
        let errors = FieldErrors {
            name: draft.name.is_empty(),
            start: start.is_none(),
            end: end.is_none(),
        };

        let (Some(start_datetime), Some(end_datetime), false) = (start, end, errors.name) else {
            debug!("Rejected draft: {errors:?}");
            self.errors = errors;
            return None;
        };

        let name = draft.name.clone();

        let commit = match &self.mode {
            Mode::Idle => return None,
            Mode::Adding(_) => {
                let id = ids.next_id(&store.meetings());
                let meeting = Meeting {
                    id,
                    name,
                    start_datetime,
                    end_datetime,
                };
                store.create(meeting.clone());
                Commit::Created(meeting)
            }
            Mode::Editing { target, .. } => {
                let meeting = Meeting {
                    id: *target,
                    name,
                    start_datetime,
                    end_datetime,
                };
                store.edit(meeting.clone());
                Commit::Edited(meeting)
            }
        };

        self.errors = FieldErrors::default();
        self.mode = Mode::Idle;

        Some(commit)
    }
}
