use datebook_lib::{LoadState, MeetingId, calendar::{AgendaRow, WriteRequest}};
use iced::{
    Alignment, Element,
    Length::Fill,
    Task,
    widget::{Column, button, column, container, row, scrollable, space, text},
};

use crate::components::{
    Schedule, Shared,
    meeting_form::{self, MeetingForm},
};

#[derive(Debug, Clone)]
pub enum Message {
    AddPressed,
    EditPressed(MeetingId),
    CancelPressed(MeetingId),
    // Components
    MeetingForm(meeting_form::Message),
}

/// Action used for communicating with the parent component
#[derive(Debug)]
pub enum Action {
    None,
    Write(WriteRequest),
}

pub struct Agenda {
    schedule: Shared,
    // Components
    meeting_form: MeetingForm,
}

impl Agenda {
    pub fn new(schedule: Shared) -> (Self, Task<Message>) {
        let (meeting_form, meeting_form_task) = MeetingForm::new(schedule.clone());

        (
            Self {
                schedule,
                meeting_form,
            },
            meeting_form_task.map(Message::MeetingForm),
        )
    }

    pub fn update(&mut self, message: Message) -> Action {
        if let Message::MeetingForm(msg) = message {
            return match self.meeting_form.update(msg) {
                meeting_form::Action::None => Action::None,
                meeting_form::Action::Write(request) => Action::Write(request),
            };
        }

        let mut schedule = self.schedule.write();
        let Schedule { calendar, store } = &mut *schedule;

        match message {
            Message::AddPressed => {
                calendar.begin_add();
                Action::None
            }
            Message::EditPressed(id) => {
                calendar.begin_edit(id, store);
                Action::None
            }
            Message::CancelPressed(id) => Action::Write(calendar.cancel_meeting(id, store)),
            Message::MeetingForm(_) => Action::None,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let schedule = self.schedule.read();
        let calendar = &schedule.calendar;
        let failed = matches!(calendar.load_state(), LoadState::Failed(_));

        let mut content = column![text(calendar.heading()).size(20)].spacing(12);

        if calendar.is_loading() {
            content = content.push(text("Loading..."));
        } else if calendar.form().is_idle() {
            if let Some(prompt) = calendar.add_prompt(&schedule.store) {
                content = content.push(
                    button(text(prompt))
                        .style(button::subtle)
                        .width(Fill)
                        .on_press(Message::AddPressed),
                );
            }

            let rows = calendar
                .agenda(&schedule.store)
                .into_iter()
                .map(meeting_row);
            content = content.push(scrollable(Column::with_children(rows).spacing(8)));
        } else {
            // The form takes its own read lock
            drop(schedule);
            content = content.push(self.meeting_form.view().map(Message::MeetingForm));
        }

        if failed {
            content = content.push(text("An error has occurred.").style(text::danger));
        }

        content.into()
    }
}

fn meeting_row<'a>(entry: AgendaRow) -> Element<'a, Message> {
    let id = entry.meeting.id;

    container(
        row![
            column![text(entry.meeting.name), text(entry.time_range).size(12)].spacing(4),
            space::horizontal(),
            button("Edit")
                .style(button::subtle)
                .on_press(Message::EditPressed(id)),
            button("Cancel")
                .style(button::danger)
                .on_press(Message::CancelPressed(id)),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Fill)
    .style(container::bordered_box)
    .into()
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use chrono_tz::Tz;
    use datebook_lib::{Calendar, IdStrategy, Meeting};

    use super::*;

    fn agenda(meetings: Vec<Meeting>) -> (Agenda, Shared) {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let schedule = Schedule::shared(Calendar::new(Tz::UTC, IdStrategy::Random, day));
        {
            let mut guard = schedule.write();
            let Schedule { calendar, store } = &mut *guard;
            calendar.finish_loading(Ok(meetings), store);
        }
        let (agenda, _) = Agenda::new(schedule.clone());
        (agenda, schedule)
    }

    #[test]
    fn test_cancel_writes_remaining_meetings() {
        let standup = Meeting {
            id: MeetingId(7),
            name: "Standup".into(),
            start_datetime: "2024-03-04T09:00:00Z".parse().unwrap(),
            end_datetime: "2024-03-04T09:15:00Z".parse().unwrap(),
        };
        let (mut agenda, schedule) = agenda(vec![standup]);

        let Action::Write(request) = agenda.update(Message::CancelPressed(MeetingId(7))) else {
            panic!("cancel should produce a write");
        };
        assert!(request.meetings.is_empty());
        assert!(schedule.read().store.is_empty());
    }

    #[test]
    fn test_add_opens_form() {
        let (mut agenda, schedule) = agenda(Vec::new());

        assert!(matches!(agenda.update(Message::AddPressed), Action::None));
        assert!(!schedule.read().calendar.form().is_idle());
    }
}
