// Garden Calendar
// Prints the month grid with its event bars

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use garden_calendar::grid::month_grid;
use garden_calendar::interaction::InteractionController;
use garden_calendar::render::render_week;
use garden_calendar::services::settings::SettingsService;
use garden_calendar::services::store::open_store;

fn parse_month(arg: Option<String>) -> Result<NaiveDate> {
    match arg {
        None => Ok(Local::now().date_naive()),
        Some(value) => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
            .with_context(|| format!("Expected a month as YYYY-MM, got {:?}", value)),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let month = parse_month(args.next())?;
    if args.next().is_some() {
        bail!("Usage: garden-calendar [YYYY-MM]");
    }

    let settings = SettingsService::from_environment().load()?;
    let store = open_store(&settings)?;
    let controller =
        InteractionController::new(store, &settings).context("Failed to load events")?;

    log::info!("Rendering {} with {} events", month.format("%B %Y"), controller.events().len());

    println!("{}\n", month.format("%B %Y"));
    let days = month_grid(month, settings.first_day_of_week);
    for week in days.weeks() {
        print!("{}", render_week(&controller.layout_week(week)));
        println!();
    }

    Ok(())
}
