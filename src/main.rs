#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use mapdraw::consts::MAX_MERCATOR_LAT;
use mapdraw::geocode::{GeocodeConfig, GeocodeError, NominatimResolver};
use mapdraw::session::{DrawMode, FeatureResult};
use mapdraw::surface::{MapSurface, TileSource};
use mapdraw::view::DrawView;
use mapdraw::viewport::{LonLat, Viewport};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("geocoder setup failed: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("a {mode} needs at least {min} distinct vertices, got {got}")]
    TooFewVertices { mode: DrawMode, min: usize, got: usize },
    #[error("the {0} was not completed; vertices may be too close together at this zoom")]
    Incomplete(DrawMode),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mapdraw", about = "Draw on a headless map and report place names, lengths and areas")]
struct Cli {
    /// Reverse geocoder base URL.
    #[arg(long, env = "GEOCODER_BASE_URL")]
    base_url: Option<String>,

    /// User-Agent sent to the geocoder.
    #[arg(long, env = "GEOCODER_USER_AGENT")]
    user_agent: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop a point and look up its place name.
    Point {
        /// Longitude in degrees.
        #[arg(allow_hyphen_values = true, value_parser = parse_lon)]
        lon: f64,
        /// Latitude in degrees.
        #[arg(allow_hyphen_values = true, value_parser = parse_lat)]
        lat: f64,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Draw a line through `lon,lat` vertices and measure its geodesic length.
    Line {
        /// Vertices as `lon,lat` pairs in degrees.
        #[arg(required = true, allow_hyphen_values = true, value_parser = parse_lon_lat)]
        vertices: Vec<LonLat>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Draw a polygon from `lon,lat` vertices and measure its geodesic area.
    Polygon {
        /// Vertices as `lon,lat` pairs in degrees.
        #[arg(required = true, allow_hyphen_values = true, value_parser = parse_lon_lat)]
        vertices: Vec<LonLat>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the base-layer tile covering a coordinate.
    Tile {
        /// Longitude in degrees.
        #[arg(allow_hyphen_values = true, value_parser = parse_lon)]
        lon: f64,
        /// Latitude in degrees.
        #[arg(allow_hyphen_values = true, value_parser = parse_lat)]
        lat: f64,
        /// Tile zoom level.
        #[arg(long, default_value_t = 12)]
        zoom: u8,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct ViewArgs {
    /// Zoom level of the headless view the clicks are made in.
    #[arg(long, default_value_t = 18.0)]
    zoom: f64,
    /// Width of the headless view in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    /// Height of the headless view in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Point { lon, lat, view } => {
            let resolver = resolver(cli.base_url.as_deref(), cli.user_agent)?;
            let result = draw(DrawMode::Point, &[LonLat::new(lon, lat)], view, resolver).await?;
            print_result(&result, cli.json)
        }
        Command::Line { vertices, view } => {
            require_vertices(DrawMode::Line, &vertices, 2)?;
            let resolver = resolver(cli.base_url.as_deref(), cli.user_agent)?;
            let result = draw(DrawMode::Line, &vertices, view, resolver).await?;
            print_result(&result, cli.json)
        }
        Command::Polygon { mut vertices, view } => {
            if vertices.len() > 1 && vertices.first() == vertices.last() {
                vertices.pop();
            }
            require_vertices(DrawMode::Polygon, &vertices, 3)?;
            let resolver = resolver(cli.base_url.as_deref(), cli.user_agent)?;
            let result = draw(DrawMode::Polygon, &vertices, view, resolver).await?;
            print_result(&result, cli.json)
        }
        Command::Tile { lon, lat, zoom } => {
            let source = TileSource::default();
            let tile = source.tile_for(LonLat::new(lon, lat), zoom);
            if cli.json {
                let body = serde_json::json!({ "tile": tile, "url": source.tile_url(tile) });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}/{}/{}  {}", tile.z, tile.x, tile.y, source.tile_url(tile));
            }
            Ok(())
        }
    }
}

fn resolver(base_url: Option<&str>, user_agent: Option<String>) -> Result<Arc<NominatimResolver>, CliError> {
    let mut config = GeocodeConfig::from_env()?;
    if let Some(url) = base_url {
        config = config.with_base_url(url)?;
    }
    if let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) {
        config.user_agent = ua;
    }
    tracing::debug!(base_url = %config.base_url, "geocoder configured");
    Ok(Arc::new(NominatimResolver::new(&config)?))
}

/// Mount a headless view centered on the first vertex and click the shape in.
///
/// Every vertex but the last is a single click; the last is a double-click,
/// which finishes lines and polygons.
async fn draw(
    mode: DrawMode,
    vertices: &[LonLat],
    args: ViewArgs,
    resolver: Arc<NominatimResolver>,
) -> Result<FeatureResult, CliError> {
    let Some((last, rest)) = vertices.split_last() else {
        return Err(CliError::TooFewVertices { mode, min: 1, got: 0 });
    };
    let center = vertices.first().copied().unwrap_or(*last);
    let surface = MapSurface::new(
        TileSource::default(),
        Viewport::centered_on(center, args.zoom, args.width, args.height),
    );
    let mut view = DrawView::mount(surface, resolver);

    view.begin_draw(mode);
    for ll in rest {
        if let Some(screen) = view.to_screen(*ll) {
            view.click(screen);
        }
    }
    if let Some(screen) = view.to_screen(*last) {
        if mode == DrawMode::Point {
            view.click(screen);
        } else {
            view.double_click(screen);
        }
    }
    view.settle().await;

    let result = view.display_state().result;
    if let Some(overlay) = view.unmount() {
        tracing::debug!(features = overlay.len(), "headless view closed");
    }
    result.ok_or(CliError::Incomplete(mode))
}

fn require_vertices(mode: DrawMode, vertices: &[LonLat], min: usize) -> Result<(), CliError> {
    if vertices.len() < min {
        return Err(CliError::TooFewVertices { mode, min, got: vertices.len() });
    }
    Ok(())
}

fn print_result(result: &FeatureResult, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

fn parse_lon(raw: &str) -> Result<f64, String> {
    parse_degrees(raw, 180.0, "longitude")
}

fn parse_lat(raw: &str) -> Result<f64, String> {
    parse_degrees(raw, MAX_MERCATOR_LAT, "latitude")
}

fn parse_lon_lat(raw: &str) -> Result<LonLat, String> {
    let Some((lon, lat)) = raw.split_once(',') else {
        return Err(format!("expected `lon,lat`, got '{raw}'"));
    };
    Ok(LonLat::new(parse_lon(lon)?, parse_lat(lat)?))
}

fn parse_degrees(raw: &str, limit: f64, what: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|e| format!("invalid {what} '{raw}': {e}"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{what} {value} is outside ±{limit}"));
    }
    Ok(value)
}
