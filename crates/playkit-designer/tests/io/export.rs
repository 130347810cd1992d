use playkit_core::{AppEvent, EventBus, EventFilter, ExportError, ExportEvent, ManualClock};
use playkit_designer::designer_state::DesignerState;
use playkit_designer::export::{Artifact, ArtifactSink, DirectorySink, ExportFormat, Exporter, MemorySink};
use playkit_designer::formations::FormationLibrary;
use playkit_designer::model::{PlayDiagram, Point, Side};
use playkit_designer::svg_renderer::SvgRenderer;
use playkit_settings::{ExportSettings, Theme};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn exporter() -> Exporter {
    Exporter::with_fonts(
        SvgRenderer::default(),
        Arc::new(usvg::fontdb::Database::new()),
    )
}

fn sample_play() -> PlayDiagram {
    let mut state = DesignerState::with_clock(ManualClock::new());
    state.set_name("Mesh Concept");
    let library = FormationLibrary::new();
    state
        .load_formation_from(&library, Side::Offense, "shotgun")
        .expect("offense");
    state
        .load_formation_from(&library, Side::Defense, "nickel")
        .expect("defense");
    state.export_diagram()
}

#[test]
fn test_svg_artifact() {
    let artifact = exporter()
        .export(&sample_play(), ExportFormat::Svg)
        .expect("svg");
    assert_eq!(artifact.file_name, "mesh-concept.svg");
    assert_eq!(artifact.mime_type, "image/svg+xml");

    let svg = String::from_utf8(artifact.bytes).expect("utf8");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="800" height="600""#));
    assert_eq!(svg.matches(r#"class="player offense""#).count(), 11);
    assert_eq!(svg.matches(r#"class="player defense""#).count(), 11);
}

#[test]
fn test_png_artifact() {
    let artifact = exporter()
        .export(&sample_play(), ExportFormat::Png)
        .expect("png");
    assert_eq!(artifact.file_name, "mesh-concept.png");
    assert_eq!(artifact.mime_type, "image/png");
    assert_eq!(&artifact.bytes[..8], &PNG_SIGNATURE);

    let image = image::load_from_memory(&artifact.bytes).expect("decode");
    assert_eq!((image.width(), image.height()), (800, 600));
}

#[test]
fn test_png_size_is_configurable() {
    let artifact = exporter()
        .with_png_size(400, 300)
        .export(&sample_play(), ExportFormat::Png)
        .expect("png");
    let image = image::load_from_memory(&artifact.bytes).expect("decode");
    assert_eq!((image.width(), image.height()), (400, 300));
}

#[test]
fn test_png_zero_size_fails() {
    let result = exporter()
        .with_png_size(0, 0)
        .export(&sample_play(), ExportFormat::Png);
    assert!(matches!(result, Err(ExportError::Raster { .. })));
}

#[test]
fn test_untitled_play_name() {
    let diagram = PlayDiagram::new("!!!");
    assert_eq!(ExportFormat::Svg.file_name(&diagram), "untitled-play.svg");
}

#[test]
fn test_export_does_not_modify_session() {
    let mut state = DesignerState::with_clock(ManualClock::new());
    state.add_player(Side::Offense, Point::new(20.0, 45.0));
    state.mark_saved();
    let before = state.export_diagram();

    let exporter = Exporter::for_session(&state, &ExportSettings::default(), Theme::Whiteboard);
    assert_eq!(exporter.png_size(), (800, 600));
    exporter
        .export(state.diagram(), ExportFormat::Json)
        .expect("json");

    assert_eq!(state.diagram(), &before);
    assert!(!state.has_unsaved_changes());
}

#[test]
fn test_directory_sink_writes_files() {
    let dir = TempDir::new().expect("tempdir");
    let mut sink = DirectorySink::new(dir.path().join("exports"));
    let events = EventBus::new();
    let produced = Arc::new(Mutex::new(Vec::new()));
    let seen = produced.clone();
    events.subscribe(EventFilter::All, move |event| {
        if let AppEvent::Export(ExportEvent::ArtifactProduced { file_name, .. }) = event {
            seen.lock().expect("lock").push(file_name);
        }
    });

    let play = sample_play();
    let exporter = exporter();
    assert!(exporter.export_to_sink(&play, ExportFormat::Json, &mut sink, &events));
    assert!(exporter.export_to_sink(&play, ExportFormat::Svg, &mut sink, &events));

    assert_eq!(sink.delivered().len(), 2);
    assert!(dir.path().join("exports").join("mesh-concept.json").exists());
    assert!(dir.path().join("exports").join("mesh-concept.svg").exists());
    assert_eq!(
        produced.lock().expect("lock").as_slice(),
        &["mesh-concept.json".to_string(), "mesh-concept.svg".to_string()]
    );
}

struct RejectingSink;

impl ArtifactSink for RejectingSink {
    fn deliver(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        Err(ExportError::Delivery {
            file_name: artifact.file_name.clone(),
            reason: "download blocked".to_string(),
        })
    }
}

#[test]
fn test_export_failure_is_swallowed() {
    let events = EventBus::new();
    let failures = Arc::new(Mutex::new(Vec::new()));
    let seen = failures.clone();
    events.subscribe(EventFilter::All, move |event| {
        if let AppEvent::Export(ExportEvent::ExportFailed { format, .. }) = event {
            seen.lock().expect("lock").push(format);
        }
    });

    let delivered = exporter().export_to_sink(
        &sample_play(),
        ExportFormat::Svg,
        &mut RejectingSink,
        &events,
    );
    assert!(!delivered);
    assert_eq!(failures.lock().expect("lock").as_slice(), &["svg".to_string()]);
}

#[test]
fn test_failed_raster_produces_no_artifact() {
    let mut sink = MemorySink::default();
    let delivered = exporter().with_png_size(0, 0).export_to_sink(
        &sample_play(),
        ExportFormat::Png,
        &mut sink,
        &EventBus::new(),
    );
    assert!(!delivered);
    assert!(sink.artifacts.is_empty());
}
