//! Headless model of the calendar screen.
//!
//! [`Calendar`] holds everything the screen needs besides the meetings themselves: which
//! month is shown, which day is selected, the form, and how the initial load went. The
//! [`Store`] stays with the application root and is passed in wherever meetings matter.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::{
    Result,
    config::CoreConfig,
    datetime::{
        DAY_HEADING_FORMAT, MONTH_TITLE_FORMAT, add_months, first_of_month, format_time,
        is_same_day, is_same_month, is_today, local_date, month_days, today,
    },
    form::{Field, FormController},
    meeting::{IdStrategy, Meeting, MeetingId},
    store::Store,
};

pub const NO_EVENTS_PROMPT: &str = "No events for today. Add one!";
pub const ADD_ANOTHER_PROMPT: &str = "Add another event for today";

const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// One day of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// At least one meeting starts on this day
    pub has_meetings: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub in_month: bool,
}

impl DayCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// The days of the displayed month, laid out on a week grid starting on Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Empty cells before the 1st, i.e. its weekday counted from Sunday
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Rows of seven, with `None` for the padding before the 1st and after the last day.
    pub fn weeks(&self) -> Vec<Vec<Option<DayCell>>> {
        let slots: Vec<Option<DayCell>> = std::iter::repeat_n(None, self.leading_blanks)
            .chain(self.cells.iter().copied().map(Some))
            .collect();

        slots
            .chunks(DAYS_PER_WEEK)
            .map(|week| {
                let mut week = week.to_vec();
                week.resize(DAYS_PER_WEEK, None);
                week
            })
            .collect()
    }
}

/// A meeting as listed for the selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaRow {
    pub meeting: Meeting,
    /// `HH:mm - HH:mm`
    pub time_range: String,
}

/// The complete collection to hand to the sync client after a local change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub meetings: Vec<Meeting>,
}

#[derive(Debug)]
pub struct Calendar {
    tz: Tz,
    ids: IdStrategy,
    selected_day: NaiveDate,
    current_month: NaiveDate,
    form: FormController,
    load: LoadState,
}

impl Calendar {
    /// A calendar showing the month of `launch_day` with `launch_day` selected, waiting for
    /// its initial load.
    pub fn new(tz: Tz, ids: IdStrategy, launch_day: NaiveDate) -> Self {
        Self {
            tz,
            ids,
            selected_day: launch_day,
            current_month: first_of_month(launch_day),
            form: FormController::new(),
            load: LoadState::Loading,
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Result<Self> {
        let tz = cfg.time_zone()?;

        Ok(Self::new(tz, cfg.id_strategy, today(&tz)))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// The current date in the calendar's zone, read from the clock on every call.
    pub fn today(&self) -> NaiveDate {
        today(&self.tz)
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selected_day
    }

    /// First day of the displayed month
    pub fn current_month(&self) -> NaiveDate {
        self.current_month
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    /// The displayed month, e.g. `March 2024`.
    pub fn title(&self) -> String {
        self.current_month.format(MONTH_TITLE_FORMAT).to_string()
    }

    /// e.g. `Schedule for Mar 04, 2024`
    pub fn heading(&self) -> String {
        format!(
            "Schedule for {}",
            self.selected_day.format(DAY_HEADING_FORMAT)
        )
    }

    pub fn previous_month(&mut self) {
        self.current_month = add_months(self.current_month, -1);
    }

    pub fn next_month(&mut self) {
        self.current_month = add_months(self.current_month, 1);
    }

    pub fn month_grid(&self, store: &Store) -> MonthGrid {
        let meeting_days: HashSet<NaiveDate> = store
            .meetings()
            .iter()
            .map(|m| local_date(&m.start_datetime, &self.tz))
            .collect();

        let cells = month_days(self.current_month)
            .into_iter()
            .map(|date| DayCell {
                date,
                has_meetings: meeting_days.contains(&date),
                is_today: is_today(date, &self.tz),
                is_selected: is_same_day(date, self.selected_day),
                in_month: is_same_month(date, self.current_month),
            })
            .collect();

        let leading_blanks = self
            .current_month
            .weekday()
            .num_days_from_sunday()
            .try_into()
            .unwrap_or_default();

        MonthGrid {
            leading_blanks,
            cells,
        }
    }

    /// Select `day`. A new meeting being typed in moves along to it.
    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
        self.form.reseed(day);
    }

    /// Meetings starting on the selected day, earliest first.
    pub fn agenda(&self, store: &Store) -> Vec<AgendaRow> {
        let mut meetings: Vec<Meeting> = store
            .meetings()
            .iter()
            .filter(|m| is_same_day(local_date(&m.start_datetime, &self.tz), self.selected_day))
            .cloned()
            .collect();

        meetings.sort_by_key(|m| m.start_datetime);

        meetings
            .into_iter()
            .map(|meeting| AgendaRow {
                time_range: format!(
                    "{} - {}",
                    format_time(&meeting.start_datetime, &self.tz),
                    format_time(&meeting.end_datetime, &self.tz)
                ),
                meeting,
            })
            .collect()
    }

    /// Label of the "add" button. Only offered when the form is closed and nothing is loading.
    pub fn add_prompt(&self, store: &Store) -> Option<&'static str> {
        if self.is_loading() || !self.form.is_idle() {
            return None;
        }

        if self.agenda(store).is_empty() {
            Some(NO_EVENTS_PROMPT)
        } else {
            Some(ADD_ANOTHER_PROMPT)
        }
    }

    pub fn begin_add(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }

        self.form.begin_add(self.selected_day)
    }

    pub fn begin_edit(&mut self, id: MeetingId, store: &Store) -> bool {
        match store.find(id) {
            Some(meeting) => self.form.begin_edit(&meeting, &self.tz),
            None => {
                debug!("Meeting {id} is gone, nothing to edit");
                false
            }
        }
    }

    pub fn input(&mut self, field: Field, value: String) {
        self.form.input(field, value);
    }

    /// Save the form into `store`. Returns what should be written to the endpoint.
    pub fn save(&mut self, store: &mut Store) -> Option<WriteRequest> {
        self.form.save(store, self.ids, &self.tz)?;

        Some(WriteRequest {
            meetings: store.snapshot(),
        })
    }

    /// Close the form without saving.
    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Remove a meeting right away. Returns what should be written to the endpoint.
    pub fn cancel_meeting(&mut self, id: MeetingId, store: &mut Store) -> WriteRequest {
        store.delete(id);

        WriteRequest {
            meetings: store.snapshot(),
        }
    }

    /// Record the result of the initial read, seeding `store` when it succeeded.
    pub fn finish_loading(
        &mut self,
        result: std::result::Result<Vec<Meeting>, String>,
        store: &mut Store,
    ) {
        match result {
            Ok(meetings) => {
                store.load(meetings);
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                warn!("Initial load failed: {e}");
                self.load = LoadState::Failed(e);
            }
        }
    }
}
