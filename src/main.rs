// Lab Calendar
// Main entry point

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use lab_calendar::services::api::{RestCalendarApi, SharedApi};
use lab_calendar::services::settings::{ConfigService, API_TOKEN_ENV, API_URL_ENV};
use lab_calendar::services::store::{CalendarStore, TaskRunner, ThreadRunner};
use lab_calendar::ui_egui::{CalendarApp, CalendarViewContainer};

fn print_help() {
    println!("lab-calendar: desktop client for the lab calendar");
    println!();
    println!("USAGE:");
    println!("  lab-calendar           Start the calendar");
    println!("  lab-calendar --init    Generate a default config file");
    println!();
    println!("CONFIG:");
    if let Some(path) = ConfigService::default_path() {
        println!("  File: {}", path.display());
    }
    println!("  Or set env vars: {} and {}", API_URL_ENV, API_TOKEN_ENV);
    println!();
    println!("KEYS:");
    println!("  Left / Right      Previous / next period");
    println!("  D / W / M         Day, week or month view");
    println!("  Ctrl+T            Jump to today");
    println!("  Ctrl+Plus/Minus   Zoom the time grid");
    println!("  Esc               Close the editor or cancel a drag");
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config_service = ConfigService::from_default_location()?;
    if args.iter().any(|a| a == "--init") {
        let path = config_service.write_default()?;
        println!("Generated config file at: {}", path.display());
        println!("Edit it with your lab API URL and token, then run lab-calendar.");
        return Ok(());
    }

    let config = config_service.load().with_context(|| {
        format!(
            "Failed to load configuration.\n\
             Run `lab-calendar --init` to generate a config file at {},\n\
             or set {} and {}.",
            config_service.path().display(),
            API_URL_ENV,
            API_TOKEN_ENV
        )
    })?;

    let api: SharedApi = Arc::new(RestCalendarApi::new(&config.api)?);
    log::info!("Starting Lab Calendar against {}", config.api.base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Lab Calendar"),
        ..Default::default()
    };

    eframe::run_native(
        "Lab Calendar",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let runner: Arc<dyn TaskRunner> =
                Arc::new(ThreadRunner::with_notifier(move || ctx.request_repaint()));
            let store = CalendarStore::new(api, runner)
                .with_stale_policy(config.sync.discard_stale_responses);
            let container = CalendarViewContainer::new(store, &config);
            let app: Box<dyn eframe::App> = Box::new(CalendarApp::new(cc, container));
            Ok(app)
        }),
    )
    .map_err(|err| anyhow!("Calendar window failed: {}", err))
}
