use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::location::{LocationError, LocationRecord};
use crate::map::{MapRenderer, Shape};

/// Label drawn at the located position
pub const MARKER: &str = "X";

/// Shown for optional fields the record does not carry
pub const PLACEHOLDER: &str = "-";

/// Info pane rows: label and record key, in display order
const INFO_FIELDS: [(&str, &str); 7] = [
    ("Hostname", "hostname"),
    ("Org", "org"),
    ("Longitude,Latitude", "loc"),
    ("City", "city"),
    ("Region", "region"),
    ("Country", "country"),
    ("Postal", "postal"),
];

/// Finished map pane text
#[derive(Clone, Debug, PartialEq)]
pub struct MapPane {
    /// Braille rows, one string per character row
    pub rows: Vec<String>,
    /// Why the marker could not be placed, if it was not
    pub marker_error: Option<String>,
}

/// One `label: value` row of the info pane
#[derive(Clone, Debug, PartialEq)]
pub struct InfoLine {
    pub label: &'static str,
    pub value: String,
}

/// What has been flushed to the display so far. Render passes write here
/// from their own threads; the draw loop reads a copy.
#[derive(Clone, Debug, Default)]
pub struct PaneSurface {
    pub map: Option<MapPane>,
    pub info: Option<Vec<InfoLine>>,
    map_generation: u64,
}

pub type SharedSurface = Arc<Mutex<PaneSurface>>;

/// Lock the surface only long enough to apply `write`
fn flush(surface: &SharedSurface, write: impl FnOnce(&mut PaneSurface)) {
    let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
    write(&mut guard);
}

/// Render the map for a `cols` x `rows` pane, marking the record's position.
///
/// A record without a usable `loc` still gets the world drawn; the marker is
/// left out and the error is kept for display.
pub fn render_map_pane(renderer: &MapRenderer, record: &LocationRecord, cols: usize, rows: usize) -> MapPane {
    let (marker, marker_error) = match record.coordinate() {
        Ok((lon, lat)) => (Some((lon, lat, MARKER)), None),
        Err(err) => {
            warn!(error = %err, "cannot place marker");
            (None, Some(err.to_string()))
        }
    };

    let canvas = renderer.render(cols, rows, marker);

    MapPane {
        rows: canvas.rows().collect(),
        marker_error,
    }
}

/// Render the info pane lines.
///
/// `loc` is mandatory and shows its error inline; other fields fall back to
/// a placeholder.
pub fn render_info_pane(record: &LocationRecord) -> Vec<InfoLine> {
    INFO_FIELDS
        .iter()
        .map(|&(label, key)| {
            let value = match record.get_key(key) {
                Ok(value) => value,
                Err(err) if key == "loc" => format!("unavailable ({err})"),
                Err(err) => {
                    if !matches!(err, LocationError::MissingKey(_)) {
                        warn!(key, error = %err, "unusable field");
                    }
                    PLACEHOLDER.to_string()
                }
            };
            InfoLine { label, value }
        })
        .collect()
}

/// Start a map render pass on its own thread.
///
/// A pass only flushes if no newer pass has flushed first, so a slow pass
/// for an old terminal size cannot overwrite the current one.
pub fn spawn_map_pass(
    surface: SharedSurface,
    renderer: MapRenderer,
    record: Arc<LocationRecord>,
    cols: usize,
    rows: usize,
    generation: u64,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pane = render_map_pane(&renderer, &record, cols, rows);
        debug!(cols, rows, generation, "map pass finished");
        flush(&surface, |s| {
            if generation >= s.map_generation {
                s.map_generation = generation;
                s.map = Some(pane);
            }
        });
    })
}

/// Start an info render pass on its own thread
pub fn spawn_info_pass(surface: SharedSurface, record: Arc<LocationRecord>) -> JoinHandle<()> {
    thread::spawn(move || {
        let lines = render_info_pane(&record);
        debug!(lines = lines.len(), "info pass finished");
        flush(&surface, |s| s.info = Some(lines));
    })
}

/// Application state
pub struct App {
    pub renderer: MapRenderer,
    pub record: Arc<LocationRecord>,
    pub surface: SharedSurface,
    pub should_quit: bool,
    /// Character extent of the map pane the last pass was started for
    map_extent: (usize, usize),
    map_generation: u64,
}

impl App {
    pub fn new(shapes: Arc<[Shape]>, record: LocationRecord) -> Self {
        Self {
            renderer: MapRenderer::new(shapes),
            record: Arc::new(record),
            surface: SharedSurface::default(),
            should_quit: false,
            map_extent: (0, 0),
            map_generation: 0,
        }
    }

    /// Kick off both render passes for a map pane of `cols` x `rows`
    pub fn start(&mut self, cols: usize, rows: usize) -> Vec<JoinHandle<()>> {
        let info = spawn_info_pass(Arc::clone(&self.surface), Arc::clone(&self.record));
        let map = self.start_map_pass(cols, rows);
        vec![info, map]
    }

    /// Re-render the map if the pane changed size
    pub fn resize(&mut self, cols: usize, rows: usize) -> Option<JoinHandle<()>> {
        if (cols, rows) == self.map_extent {
            return None;
        }
        debug!(cols, rows, "map pane resized");
        Some(self.start_map_pass(cols, rows))
    }

    fn start_map_pass(&mut self, cols: usize, rows: usize) -> JoinHandle<()> {
        self.map_extent = (cols, rows);
        self.map_generation += 1;
        spawn_map_pass(
            Arc::clone(&self.surface),
            self.renderer.clone(),
            Arc::clone(&self.record),
            cols,
            rows,
            self.map_generation,
        )
    }

    /// Copy of the surface, taken under the lock and released immediately
    pub fn snapshot(&self) -> PaneSurface {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
