use tui_geoip::app::{render_info_pane, render_map_pane, App, MARKER};
use tui_geoip::braille::{BrailleCanvas, PixelCanvas};
use tui_geoip::data::{load_geojson_shapes, world_shapes};
use tui_geoip::location::LocationRecord;
use tui_geoip::map::{rasterize_shapes, CanvasSpace, MapRenderer};
use tui_geoip::ui;

const IPINFO_BODY: &str = r#"{
    "ip": "8.8.8.8",
    "hostname": "dns.google",
    "city": "Mountain View",
    "region": "California",
    "country": "US",
    "loc": "37.4056,-122.0775",
    "org": "AS15169 Google LLC",
    "postal": "94043",
    "timezone": "America/Los_Angeles",
    "anycast": true
}"#;

fn record(body: &str) -> LocationRecord {
    LocationRecord::from_json(&mut body.as_bytes().to_vec()).unwrap()
}

#[test]
fn marker_lands_where_the_projection_says() {
    let rec = record(IPINFO_BODY);
    let (lon, lat) = rec.coordinate().unwrap();
    let (cols, rows) = (100, 30);

    let pane = render_map_pane(&MapRenderer::new(world_shapes()), &rec, cols, rows);

    let at = CanvasSpace::from_cells(cols, rows).project(lon, lat);
    let (cx, cy) = (at.x as usize / 2, at.y as usize / 4);
    assert_eq!(pane.rows[cy].chars().nth(cx), Some('X'));
    assert_eq!(pane.rows.iter().map(|r| r.matches(MARKER).count()).sum::<usize>(), 1);
}

#[test]
fn world_map_fills_every_row_band() {
    let space = CanvasSpace::from_cells(120, 40);
    let mut canvas = BrailleCanvas::new(120, 40);
    rasterize_shapes(&mut canvas, &space, &world_shapes());

    let text = canvas.render();
    let lit = text.chars().filter(|c| ('\u{2801}'..='\u{28FF}').contains(c)).count();
    assert!(lit > 500, "only {lit} cells lit");

    // Arctic islands near the top, Tierra del Fuego well into the south
    let lit_rows: Vec<usize> = text
        .lines()
        .enumerate()
        .filter(|(_, row)| row.chars().any(|c| c != '\u{2800}'))
        .map(|(i, _)| i)
        .collect();
    assert!(lit_rows[0] < 6, "{lit_rows:?}");
    assert!(*lit_rows.last().unwrap() > 25, "{lit_rows:?}");
}

#[test]
fn info_pane_matches_record() {
    let lines = render_info_pane(&record(IPINFO_BODY));
    let text: Vec<String> = lines
        .iter()
        .map(|l| format!("{}: {}", l.label, l.value))
        .collect();
    assert_eq!(
        text,
        [
            "Hostname: dns.google",
            "Org: AS15169 Google LLC",
            "Longitude,Latitude: 37.4056,-122.0775",
            "City: Mountain View",
            "Region: California",
            "Country: US",
            "Postal: 94043",
        ]
    );
}

#[test]
fn plain_output_has_map_then_info() {
    let mut app = App::new(world_shapes(), record(IPINFO_BODY));
    for handle in app.start(60, 15) {
        handle.join().unwrap();
    }

    let out = ui::render_plain(&app.snapshot());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 15 + 7);
    assert!(lines[..15].iter().all(|l| l.chars().count() == 60));
    assert_eq!(lines[15], "Hostname: dns.google");
}

#[test]
fn missing_loc_degrades_instead_of_failing() {
    let mut app = App::new(world_shapes(), record(r#"{"ip": "10.0.0.1", "bogon": true}"#));
    for handle in app.start(40, 10) {
        handle.join().unwrap();
    }

    let out = ui::render_plain(&app.snapshot());
    assert!(out.contains("no marker: missing key 'loc'"));
    assert!(out.contains("Longitude,Latitude: unavailable (missing key 'loc')"));
    assert!(out.contains("Hostname: -"));
}

#[test]
fn far_off_shapes_file_renders_within_canvas() {
    let path = std::env::temp_dir().join(format!("tui-geoip-{}-far.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"type": "LineString", "coordinates": [[-1e12, 0], [0, 0]]}"#,
    )
    .unwrap();
    let shapes = load_geojson_shapes(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let space = CanvasSpace::from_cells(80, 20);
    let mut canvas = BrailleCanvas::new(80, 20);
    rasterize_shapes(&mut canvas, &space, &shapes);

    // The equator from the west edge to the center is stroked, nothing else
    let at = space.project(0.0, 0.0);
    let row = canvas.row_to_string(at.y as usize / 4);
    let center = at.x as usize / 2;
    assert!(row.chars().take(center + 1).all(|c| c != '\u{2800}'), "{row}");
    assert!(row.chars().skip(center + 1).all(|c| c == '\u{2800}'), "{row}");
}

#[test]
fn nan_location_leaves_marker_off() {
    let rec = record(r#"{"loc": "NaN,NaN"}"#);
    let pane = render_map_pane(&MapRenderer::new(world_shapes()), &rec, 40, 10);
    assert!(!pane.rows.iter().any(|row| row.contains(MARKER)));
}
