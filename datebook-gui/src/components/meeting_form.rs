use datebook_lib::{
    calendar::WriteRequest,
    form::{Field, FieldErrors},
};
use iced::{
    Element, Task, Theme,
    widget::{button, column, container, row, space, text, text_input},
};

use crate::components::{Schedule, Shared};

const DATE_PLACEHOLDER: &str = "dd/mm/yyyy hh:mm";

#[derive(Debug, Clone)]
pub enum Message {
    NameInput(String),
    StartInput(String),
    EndInput(String),
    ConfirmPressed,
    CancelPressed,
}

/// Action used for communicating with the parent component
#[derive(Debug)]
pub enum Action {
    None,
    Write(WriteRequest),
}

pub struct MeetingForm {
    schedule: Shared,
}

impl MeetingForm {
    pub fn new(schedule: Shared) -> (Self, Task<Message>) {
        (Self { schedule }, Task::none())
    }

    pub fn update(&mut self, message: Message) -> Action {
        let mut schedule = self.schedule.write();
        let Schedule { calendar, store } = &mut *schedule;

        match message {
            Message::NameInput(value) => calendar.input(Field::Name, value),
            Message::StartInput(value) => calendar.input(Field::EditStartDate, value),
            Message::EndInput(value) => calendar.input(Field::EditEndDate, value),
            Message::ConfirmPressed => {
                return calendar.save(store).map_or(Action::None, Action::Write);
            }
            Message::CancelPressed => calendar.cancel_form(),
        }

        Action::None
    }

    /// Renders nothing while no meeting is being added or edited.
    pub fn view(&self) -> Element<'_, Message> {
        let schedule = self.schedule.read();
        let form = schedule.calendar.form();
        let Some(draft) = form.mode().draft() else {
            return space::vertical().into();
        };
        let errors = form.errors();
        let saving = form.is_saving();

        let mut content = column![
            text("Name"),
            text_input("...", &draft.name)
                .on_input(Message::NameInput)
                .style(field_style(errors.name)),
        ]
        .spacing(8);

        if errors.name {
            content = content.push(text("Name is required.").style(text::danger));
        }

        content = content.push(
            row![
                column![
                    text("From"),
                    text_input(DATE_PLACEHOLDER, &draft.edit_start_date)
                        .on_input(Message::StartInput)
                        .style(field_style(errors.start)),
                ]
                .spacing(8),
                column![
                    text("To"),
                    text_input(DATE_PLACEHOLDER, &draft.edit_end_date)
                        .on_input(Message::EndInput)
                        .style(field_style(errors.end)),
                ]
                .spacing(8),
            ]
            .spacing(12),
        );

        if errors.dates() {
            content = content.push(text("Format must be dd/mm/yyyy hh:mm").style(text::danger));
        }

        // Both buttons stay inert while a save is being committed
        content = content.push(
            row![
                space::horizontal(),
                button("Cancel")
                    .style(button::subtle)
                    .on_press_maybe((!saving).then_some(Message::CancelPressed)),
                button("Confirm")
                    .style(button::primary)
                    .on_press_maybe((!saving).then_some(Message::ConfirmPressed)),
            ]
            .spacing(8),
        );

        container(content)
            .padding(20)
            .style(container::rounded_box)
            .into()
    }
}

fn field_style(invalid: bool) -> impl Fn(&Theme, text_input::Status) -> text_input::Style {
    move |theme, status| {
        let mut style = text_input::default(theme, status);
        if invalid {
            style.border.color = theme.palette().danger;
            style.border.width = 1.0;
        }
        style
    }
}
