// End-to-end scenarios: config -> stage -> controller -> renderer.

use approx::assert_abs_diff_eq;
use ringdial::config::{self, RingConfig};
use ringdial::controller::{InteractionController, PointerEvent, PointerId, PressOutcome};
use ringdial::error::ConfigValidationError;
use ringdial::geometry::{FULL_TURN, Point, point_on_circle};
use ringdial::quantize::SENTINEL_ANGLE;
use ringdial::render::{LogRenderer, RenderHandle, RenderUpdate, Renderer};
use ringdial::ring::Ring;
use ringdial::stage::{ContainerId, Stage};

const CONFIG: &str = r##"
[[containers]]
id = "budget"

[[sliders]]
container = "budget"
label = "Food"
min_value = 0
max_value = 100
step = 25
radius = 40

[[sliders]]
container = "budget"
label = "Health care"
color = "#0074B3"
min_value = 0
max_value = 11
step = 2.5
radius = 100

[[sliders]]
container = "budget"
label = "Transportation"
min_value = 25
max_value = 725
step = 25
radius = 70
stroke_width = 40

[[sliders]]
container = "elsewhere"
label = "Orphan"
min_value = 0
max_value = 1
step = 1
radius = 10
"##;

#[derive(Default)]
struct CountingRenderer {
    inits: Vec<String>,
    updates: Vec<(RenderHandle, RenderUpdate)>,
}

impl Renderer for CountingRenderer {
    fn on_render_init(&mut self, ring: &Ring) -> RenderHandle {
        self.inits.push(ring.settings().label.clone());
        RenderHandle::from(self.inits.len() as u64 * 10)
    }

    fn on_render_update(&mut self, ring: &Ring, update: &RenderUpdate) {
        self.updates
            .push((ring.render_handle().unwrap(), update.clone()));
    }
}

fn budget() -> ContainerId {
    ContainerId::new("budget")
}

fn build() -> (Stage, CountingRenderer, Vec<ConfigValidationError>) {
    let config = config::parse_config(CONFIG).unwrap();
    let mut renderer = CountingRenderer::default();
    let (stage, skipped) = Stage::from_config(&config, &mut renderer).unwrap();
    (stage, renderer, skipped)
}

#[test]
fn invalid_ring_is_skipped_without_affecting_others() {
    let (stage, renderer, skipped) = build();
    assert_eq!(
        skipped,
        vec![ConfigValidationError::UnknownContainer(ContainerId::new(
            "elsewhere"
        ))]
    );
    assert_eq!(stage.rings().len(), 3);
    assert_eq!(renderer.inits, vec!["Food", "Health care", "Transportation"]);
}

#[test]
fn rings_are_ordered_outer_first() {
    let (stage, _, _) = build();
    let radii: Vec<f64> = stage.rings_in(&budget()).map(|r| r.config().radius).collect();
    assert_eq!(radii, vec![100.0, 70.0, 40.0]);

    let labels: Vec<String> = stage.labels(&budget()).into_iter().map(|l| l.slug).collect();
    assert_eq!(
        labels,
        vec!["label__health_care", "label__transportation", "label__food"]
    );
}

#[test]
fn overlapping_bands_go_to_outer_ring() {
    let mut config = config::parse_config(CONFIG).unwrap();
    // Food now spans 5..75, reaching into Transportation's 50..90
    config.sliders[0].stroke_width = Some(70.0.into());
    let mut renderer = LogRenderer::default();
    let (mut stage, _) = Stage::from_config(&config, &mut renderer).unwrap();
    let mut controller = InteractionController::new();

    let press = PointerEvent::new(PointerId::mouse(), 260.0, 200.0);
    let outcome = controller.on_press(&mut stage, &mut renderer, &budget(), press);
    let PressOutcome::Captured(id) = outcome else {
        panic!("expected a capture, got {outcome:?}");
    };
    assert_eq!(stage.ring(id).unwrap().settings().label, "Transportation");
    assert!(stage.ring(id).unwrap().state().dragging);

    let food = stage
        .rings()
        .iter()
        .find(|r| r.settings().label == "Food")
        .unwrap();
    assert_eq!(food.state().value, 0.0);
    assert!(!food.state().dragging);

    assert!(controller.on_release(&mut stage, press));
    assert!(controller.session().is_none());
}

#[test]
fn full_drag_reaches_maximum_short_of_a_turn() {
    let (mut stage, mut renderer, _) = build();
    let mut controller = InteractionController::new();
    let pointer = PointerId::touch(7);

    // start just right of the top on Health care (radius 100)
    let container = stage.container(&budget()).unwrap().clone();
    let at = |angle: f64| container.to_device(point_on_circle(Point::ORIGIN, 100.0, angle));

    let start = at(0.1);
    let outcome = controller.on_press(
        &mut stage,
        &mut renderer,
        &budget(),
        PointerEvent::new(pointer, start.x, start.y),
    );
    let PressOutcome::Captured(id) = outcome else {
        panic!("expected a capture, got {outcome:?}");
    };
    assert_eq!(stage.ring(id).unwrap().state().value, 0.0);

    let mut last = 0.0;
    for i in 1..200 {
        let p = at(i as f64 * FULL_TURN / 200.0);
        if let Some(update) = controller.on_move(
            &mut stage,
            &mut renderer,
            PointerEvent::new(pointer, p.x, p.y),
        ) {
            assert!(update.value >= last);
            last = update.value;
        }
    }

    let state = stage.ring(id).unwrap().state();
    assert_eq!(state.value, 11.0);
    assert_abs_diff_eq!(state.angle, SENTINEL_ANGLE);
    assert!(state.angle < FULL_TURN);

    let (handle, update) = renderer.updates.last().unwrap();
    assert_eq!(*handle, stage.ring(id).unwrap().render_handle().unwrap());
    assert_eq!(update.label_text, "$11");
    assert!(update.arc.large_arc);
}

#[test]
fn repeated_move_is_idempotent() {
    let (mut stage, mut renderer, _) = build();
    let mut controller = InteractionController::new();
    let pointer = PointerId::mouse();

    controller.on_press(
        &mut stage,
        &mut renderer,
        &budget(),
        PointerEvent::new(pointer, 300.0, 200.0),
    );
    let event = PointerEvent::new(pointer, 150.0, 260.0);
    let first = controller.on_move(&mut stage, &mut renderer, event).unwrap();
    let state = stage.rings().iter().map(Ring::state).collect::<Vec<_>>();
    let second = controller.on_move(&mut stage, &mut renderer, event).unwrap();

    assert_eq!(first, second);
    assert_eq!(state, stage.rings().iter().map(Ring::state).collect::<Vec<_>>());
}

#[test]
fn missing_fields_are_reported_by_name() {
    let ring = RingConfig {
        container: Some(budget()),
        min_value: Some(0.0.into()),
        step: Some(1.0.into()),
        radius: Some(50.0.into()),
        ..RingConfig::default()
    };
    assert_eq!(
        ring.slider_config(),
        Err(ConfigValidationError::Missing { field: "max_value" })
    );
}
