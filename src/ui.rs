use chrono::{Datelike, NaiveDate};
use gtk4::Box as GtkBox;
use gtk4::glib;
use gtk4::{Button, Calendar, Justification, Label, Orientation};
use libadwaita::prelude::*;
use libadwaita::{Application, ApplicationWindow, HeaderBar, Toast, ToastOverlay};
use soda_free_counter::{
    ConfigError, Counter, CounterError, DateStore, Settings, Submission, SystemClock,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn};

const WINDOW_TITLE: &str = "Soda-Free Counter";
const SET_BUTTON_LABEL: &str = "Set Last Soda Date";

pub struct CounterWindow {
    window: ApplicationWindow,
    counter: Rc<RefCell<Counter<SystemClock>>>,
    label: Label,
    calendar: Calendar,
    toast_overlay: ToastOverlay,
}

impl CounterWindow {
    pub fn new(app: &Application) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = resolve_settings()?;
        info!(path = %settings.data_path.display(), "using start date file");
        let counter = Counter::open(DateStore::new(settings.data_path), SystemClock);

        let window = ApplicationWindow::builder()
            .application(app)
            .title(WINDOW_TITLE)
            .build();
        window.set_size_request(400, 250);

        let header_bar = HeaderBar::new();
        header_bar.set_title_widget(Some(&Label::new(Some(WINDOW_TITLE))));

        let toast_overlay = ToastOverlay::new();
        let content_box = GtkBox::new(Orientation::Vertical, 0);

        // AdwApplicationWindow has no titlebar slot, the header bar goes in the content
        content_box.append(&header_bar);

        let main_box = GtkBox::new(Orientation::Vertical, 6);
        main_box.set_margin_top(10);
        main_box.set_margin_bottom(10);
        main_box.set_margin_start(10);
        main_box.set_margin_end(10);

        let label = Label::new(None);
        label.set_wrap(true);
        label.set_justify(Justification::Center);
        label.set_vexpand(true);

        // Preselected in restore_state once the counter is loaded
        let calendar = Calendar::new();
        calendar.set_vexpand(true);

        let set_button = Button::with_label(SET_BUTTON_LABEL);
        set_button.add_css_class("suggested-action");

        // Label, calendar, button, top to bottom
        main_box.append(&label);
        main_box.append(&calendar);
        main_box.append(&set_button);
        content_box.append(&main_box);
        toast_overlay.set_child(Some(&content_box));
        window.set_content(Some(&toast_overlay));

        let this = Self {
            window,
            counter: Rc::new(RefCell::new(counter)),
            label,
            calendar,
            toast_overlay,
        };

        this.setup_events(&set_button);
        this.restore_state();
        Ok(this)
    }

    pub fn show(&self) {
        self.window.present();
    }

    fn setup_events(&self, set_button: &Button) {
        let counter = self.counter.clone();
        let label = self.label.clone();
        let calendar = self.calendar.clone();
        let toast_overlay = self.toast_overlay.clone();

        set_button.connect_clicked(move |_| {
            Self::submit_selection(&counter, &calendar, &label, &toast_overlay);
        });
    }

    fn restore_state(&self) {
        let mut counter = self.counter.borrow_mut();

        if let Some(e) = counter.take_warning() {
            Self::show_toast(
                &self.toast_overlay,
                &format!("Stored date could not be read and was ignored: {e}"),
                false,
            );
        }

        if let Some(date) = counter.start_date() {
            select_date(&self.calendar, date);
        }

        self.label.set_text(&counter.label_text());
    }

    fn submit_selection(
        counter: &Rc<RefCell<Counter<SystemClock>>>,
        calendar: &Calendar,
        label: &Label,
        toast_overlay: &ToastOverlay,
    ) {
        let selected = calendar.date();
        let (year, month, day) = (
            selected.year(),
            selected.month() as u32,
            selected.day_of_month() as u32,
        );

        let mut counter = counter.borrow_mut();
        // Rejections only change the label text
        match counter.submit(year, month, day) {
            Ok(Submission::Saved(_)) | Ok(Submission::RejectedFuture) => {}
            Err(CounterError::InvalidDate { .. }) => {
                warn!(year, month, day, "calendar reported an impossible date");
                Self::show_toast(toast_overlay, "The selected date is not valid", false);
            }
            Err(e @ CounterError::Storage(_)) => {
                error!("failed to save start date: {e}");
                Self::show_toast(toast_overlay, &format!("Could not save the date: {e}"), true);
            }
        }

        label.set_text(&counter.label_text());
    }

    fn show_toast(toast_overlay: &ToastOverlay, message: &str, sticky: bool) {
        let toast = Toast::new(message);
        // Zero timeout keeps the toast until dismissed
        if sticky {
            toast.set_timeout(0);
        }
        toast_overlay.add_toast(toast);
    }
}

fn resolve_settings() -> Result<Settings, ConfigError> {
    Settings::load().or_else(|e| {
        warn!("{e}; falling back to the default location");
        Settings::fallback()
    })
}

fn select_date(calendar: &Calendar, date: NaiveDate) {
    match glib::DateTime::from_local(date.year(), date.month() as i32, date.day() as i32, 0, 0, 0.0)
    {
        Ok(datetime) => calendar.select_day(&datetime),
        Err(e) => warn!(%date, "could not preselect stored date: {e}"),
    }
}
