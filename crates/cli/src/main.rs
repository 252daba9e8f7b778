use clap::Parser;
use cropmarket_core::client::http::HttpRecommendationClient;
use cropmarket_core::domain::request::RawFields;
use cropmarket_core::geocode::nominatim::NominatimClient;
use cropmarket_core::geocode::GeocodeClient;
use cropmarket_core::present::GeocodeStatus;
use cropmarket_core::session::{fill_from_place, Session};
use std::io::Write;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod surface;

use surface::{OutputFormat, TerminalSurface};

#[derive(Debug, Parser)]
#[command(name = "cropmarket", about = "Find the most profitable market and day to sell a crop")]
struct Args {
    /// Farm latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<String>,

    /// Farm longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<String>,

    /// Village or town name to look up instead of giving coordinates.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,

    /// Crop to sell, e.g. Tomato.
    #[arg(long)]
    commodity: String,

    /// Quantity in tonnes.
    #[arg(long, allow_hyphen_values = true)]
    quantity: String,

    /// First sale date (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long)]
    date: Option<String>,

    /// Recommendation endpoint; overrides RECOMMEND_ENDPOINT.
    #[arg(long)]
    endpoint: Option<String>,

    /// Print the display model as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = cropmarket_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(endpoint) = args.endpoint.as_deref() {
        settings.recommend_endpoint = endpoint.to_string();
    }

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut fields = RawFields {
        latitude: args.lat.clone().unwrap_or_default(),
        longitude: args.lon.clone().unwrap_or_default(),
        commodity: args.commodity.clone(),
        quantity: args.quantity.clone(),
        selected_date: args.date.clone(),
    };

    if let Some(place) = args.place.as_deref() {
        let geocoder = NominatimClient::from_settings(&settings)?;
        locate_farm(&geocoder, place, &mut fields, &mut std::io::stderr()).await?;
    }

    let client = HttpRecommendationClient::from_settings(&settings).map_err(|err| {
        sentry_anyhow::capture_anyhow(&err);
        err
    })?;
    tracing::debug!(url = %client.url(), "using recommendation endpoint");

    let surface = TerminalSurface::new(format, std::io::stdout(), std::io::stderr());
    let session = Session::start(client, surface);
    tracing::debug!(default_date = %session.default_date(), "session started");

    let outcome = session.submit(&fields).await;
    tracing::debug!(ticket = outcome.ticket.get(), shown = outcome.shown, "submission finished");

    Ok(())
}

/// Fills the coordinate fields from a place name, reporting progress as it goes.
async fn locate_farm<G, W>(
    geocoder: &G,
    place: &str,
    fields: &mut RawFields,
    progress: &mut W,
) -> std::io::Result<()>
where
    G: GeocodeClient + ?Sized,
    W: Write,
{
    writeln!(progress, "{}", GeocodeStatus::searching().text)?;
    progress.flush()?;
    let status = fill_from_place(geocoder, place, fields).await;
    writeln!(progress, "{}", status.text)
}

fn init_sentry(settings: &cropmarket_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
