use chrono::NaiveDate;
use datebook_lib::calendar::{self, DayCell};
use iced::{
    Alignment, Element,
    Length::Fill,
    Task,
    widget::{Column, Row, button, column, container, row, space, text},
};

use crate::components::Shared;

const WEEKDAYS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

#[derive(Debug, Clone)]
pub enum Message {
    PreviousMonth,
    NextMonth,
    DaySelected(NaiveDate),
}

pub struct MonthGrid {
    schedule: Shared,
}

impl MonthGrid {
    pub fn new(schedule: Shared) -> (Self, Task<Message>) {
        (Self { schedule }, Task::none())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let mut schedule = self.schedule.write();
        let calendar = &mut schedule.calendar;

        match message {
            Message::PreviousMonth => calendar.previous_month(),
            Message::NextMonth => calendar.next_month(),
            Message::DaySelected(day) => calendar.select_day(day),
        }

        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let schedule = self.schedule.read();
        let calendar = &schedule.calendar;

        let header = row![
            text(calendar.title()).size(20),
            space::horizontal(),
            button(text("<"))
                .style(button::subtle)
                .on_press(Message::PreviousMonth),
            button(text(">"))
                .style(button::subtle)
                .on_press(Message::NextMonth),
        ]
        .spacing(4)
        .align_y(Alignment::Center);

        let weekdays = Row::with_children(
            WEEKDAYS
                .iter()
                .map(|day| container(text(*day).size(12)).center_x(Fill).into()),
        );

        column![header, weekdays, weeks(&calendar.month_grid(&schedule.store))]
            .spacing(12)
            .into()
    }
}

fn weeks<'a>(grid: &calendar::MonthGrid) -> Element<'a, Message> {
    Column::with_children(grid.weeks().into_iter().map(|week| {
        Row::with_children(week.into_iter().map(|slot| match slot {
            Some(cell) => day(cell),
            None => space::horizontal().into(),
        }))
        .spacing(4)
        .into()
    }))
    .spacing(4)
    .into()
}

fn day<'a>(cell: DayCell) -> Element<'a, Message> {
    let style = if cell.is_selected {
        button::primary
    } else if cell.is_today {
        button::danger
    } else {
        button::subtle
    };

    // Presence dot under days that have at least one meeting
    let marker = text(if cell.has_meetings { "•" } else { " " }).size(10);

    column![
        button(text(cell.day().to_string()))
            .style(style)
            .on_press(Message::DaySelected(cell.date)),
        marker,
    ]
    .align_x(Alignment::Center)
    .width(Fill)
    .into()
}
