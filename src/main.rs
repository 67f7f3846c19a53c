mod ui;

use gtk4::glib;
use libadwaita::Application;
use libadwaita::prelude::*;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};
use ui::CounterWindow;

const APP_ID: &str = "io.github.soda-free-counter";

fn main() -> glib::ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(|app| match CounterWindow::new(app) {
        Ok(window) => window.show(),
        Err(e) => {
            error!("Failed to create window: {e}");
            app.quit();
        }
    });

    app.run()
}
