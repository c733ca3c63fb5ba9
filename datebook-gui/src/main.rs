use std::time::Duration;

use chrono_tz::Tz;
use datebook_lib::{
    Calendar, CoreConfig, HttpRemote, Meeting, SyncClient, WriteOutcome, calendar::WriteRequest,
    datetime,
};
use iced::{
    Element,
    Length::{Fill, FillPortion},
    Subscription, Task, Theme, application,
    widget::{button, column, container, row, rule, space, text},
};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        Schedule, Shared,
        agenda::{self, Agenda},
        month_grid::{self, MonthGrid},
    },
    config::GuiConfig,
};

pub mod components;
pub mod config;

/// How often the view is refreshed so the today marker follows the clock.
const CLOCK_TICK: Duration = Duration::from_secs(60);

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<Vec<Meeting>, String>),
    WriteSettled(WriteOutcome),
    ThemeToggled,
    ClockTicked,
    // Components
    MonthGrid(month_grid::Message),
    Agenda(agenda::Message),
}

struct App {
    title: String,
    theme: Theme,
    cfg: GuiConfig,
    schedule: Shared,
    sync: SyncClient<HttpRemote>,
    // Components
    month_grid: MonthGrid,
    agenda: Agenda,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        // Logging
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");

        let cfg = GuiConfig::load();
        let core = CoreConfig::load().unwrap_or_else(|e| {
            warn!("Using default settings, couldn't load core.toml: {e}");
            CoreConfig::default()
        });

        let calendar = Calendar::from_config(&core).unwrap_or_else(|e| {
            warn!("{e}, falling back to UTC");
            Calendar::new(Tz::UTC, core.id_strategy, datetime::today(&Tz::UTC))
        });
        let schedule = Schedule::shared(calendar);
        let sync = SyncClient::new(HttpRemote::new(core.endpoint));
        info!("Reading meetings from {}", sync.remote().endpoint());

        let (month_grid, month_grid_task) = MonthGrid::new(schedule.clone());
        let (agenda, agenda_task) = Agenda::new(schedule.clone());

        let load = Task::perform(sync.fetch_all(), |result| {
            Message::Loaded(result.map_err(|e| e.to_string()))
        });

        (
            Self {
                title: "Datebook".into(),
                theme: cfg.theme(),
                cfg,
                schedule,
                sync,
                month_grid,
                agenda,
            },
            Task::batch([
                load,
                month_grid_task.map(Message::MonthGrid),
                agenda_task.map(Message::Agenda),
            ]),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(result) => {
                let mut schedule = self.schedule.write();
                let Schedule { calendar, store } = &mut *schedule;
                calendar.finish_loading(result, store);
                Task::none()
            }
            Message::WriteSettled(outcome) => {
                debug!("Write settled: {outcome:?}");
                Task::none()
            }
            Message::ThemeToggled => {
                self.cfg.theme = self.cfg.theme.toggled();
                self.theme = self.cfg.theme();
                if let Err(e) = self.cfg.save() {
                    warn!("Failed to save GUI settings: {e}");
                }
                Task::none()
            }
            // Nothing to update, the grid reads the clock when it is drawn
            Message::ClockTicked => Task::none(),
            // Redirect messages to relevant child components
            Message::MonthGrid(msg) => self.month_grid.update(msg).map(Message::MonthGrid),
            Message::Agenda(msg) => match self.agenda.update(msg) {
                agenda::Action::None => Task::none(),
                agenda::Action::Write(request) => self.write(request),
            },
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        column![
            // Top bar
            row![
                space::horizontal(),
                button(text(self.cfg.theme.toggled().to_string()))
                    .style(button::subtle)
                    .on_press(Message::ThemeToggled),
            ],
            row![
                container(self.month_grid.view().map(Message::MonthGrid)).width(FillPortion(1)),
                rule::vertical(1),
                container(self.agenda.view().map(Message::Agenda)).width(FillPortion(1)),
            ]
            .spacing(24)
            .height(Fill),
        ]
        .spacing(12)
        .padding(24)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::time::every(CLOCK_TICK).map(|_| Message::ClockTicked)
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    /// Fire the write and forget it; the outcome is only logged.
    fn write(&self, request: WriteRequest) -> Task<Message> {
        Task::perform(
            self.sync.replace_all(request.meetings),
            Message::WriteSettled,
        )
    }
}
