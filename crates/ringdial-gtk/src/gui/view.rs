use super::scene::{RingVisual, SceneRenderer};
use super::theme::{ThemeColors, parse_color};
use super::{LABEL_FONT_SIZE, LABEL_ROW_HEIGHT, SWATCH_HEIGHT, SWATCH_WIDTH, VALUE_FONT_SIZE};
use cairo::Context;
use palette::Srgba;
use ringdial::registry::LabelEntry;
use ringdial::ring::Ring;
use ringdial::stage::{Container, Stage};
use std::f64::consts::PI;

struct RingRenderer<'a> {
    ring: &'a Ring,
    visual: Option<&'a RingVisual>,
}

impl<'a> RingRenderer<'a> {
    fn new(ring: &'a Ring, scene: &'a SceneRenderer) -> Self {
        Self {
            ring,
            visual: ring.render_handle().and_then(|h| scene.visual(h)),
        }
    }

    /// Expects `cr` to be in ring space: origin at the container center,
    /// rotated so angle zero points up.
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_track(cr)?;
        if let Some(visual) = self.visual {
            self.draw_value_arc(cr, visual, colors)?;
            self.draw_handle(cr, visual, colors)?;
        }
        Ok(())
    }

    fn draw_track(&self, cr: &Context) -> Result<(), cairo::Error> {
        let settings = self.ring.settings();
        let (dash, space) = self.ring.dash_pattern();
        let color = parse_color(&settings.track_color, 1.0)
            .unwrap_or(Srgba::new(0.835, 0.835, 0.835, 1.0));

        set_source(cr, color);
        cr.set_line_width(self.ring.config().stroke_width);
        cr.set_dash(&[dash, space], 0.0);
        cr.new_path();
        cr.arc(0.0, 0.0, self.ring.config().radius, 0.0, 2.0 * PI);
        let result = cr.stroke();
        cr.set_dash(&[], 0.0);
        result
    }

    fn draw_value_arc(
        &self,
        cr: &Context,
        visual: &RingVisual,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        if visual.angle <= 0.0 {
            return Ok(());
        }
        let settings = self.ring.settings();
        let color = settings
            .color
            .as_deref()
            .and_then(|c| parse_color(c, settings.opacity))
            .unwrap_or_else(|| {
                let (r, g, b, _) = colors.arc_fallback.into_components();
                Srgba::new(r, g, b, settings.opacity)
            });

        set_source(cr, color);
        cr.set_line_width(self.ring.config().stroke_width);
        cr.new_path();
        cr.arc(0.0, 0.0, self.ring.config().radius, 0.0, visual.angle);
        cr.stroke()
    }

    fn draw_handle(
        &self,
        cr: &Context,
        visual: &RingVisual,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        let settings = self.ring.settings();
        cr.new_path();
        cr.arc(
            visual.handle.x,
            visual.handle.y,
            settings.handle_diameter / 2.0,
            0.0,
            2.0 * PI,
        );
        set_source(cr, colors.handle_fill);
        cr.fill_preserve()?;
        set_source(cr, colors.handle_stroke);
        cr.set_line_width(settings.handle_stroke_width);
        cr.stroke()
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Draws the label column and the rings of `container`, outer rings first.
pub fn draw(
    cr: &Context,
    stage: &Stage,
    scene: &SceneRenderer,
    container: &Container,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let labels = stage.labels(container.id());
    draw_labels(cr, &labels, container, colors)?;

    let center = container.center();
    cr.save()?;
    cr.translate(container.sidebar_width() + center.x, center.y);
    cr.rotate(-PI / 2.0);
    for ring in stage.rings_in(container.id()) {
        RingRenderer::new(ring, scene).draw(cr, colors)?;
    }
    cr.restore()
}

fn draw_labels(
    cr: &Context,
    labels: &[LabelEntry],
    container: &Container,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let column = container.sidebar_width();
    let top = (container.size() - labels.len() as f64 * LABEL_ROW_HEIGHT) / 2.0;

    for (i, label) in labels.iter().enumerate() {
        let baseline = top + (i as f64 + 0.75) * LABEL_ROW_HEIGHT;

        // value, right aligned in the first 40%
        set_source(cr, colors.text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(VALUE_FONT_SIZE);
        if let Ok(ext) = cr.text_extents(&label.value_text) {
            cr.move_to(column * 0.4 - ext.x_advance(), baseline);
            cr.show_text(&label.value_text)?;
        }

        let swatch = label
            .color
            .as_deref()
            .and_then(|c| parse_color(c, 1.0))
            .unwrap_or(colors.arc_fallback);
        set_source(cr, swatch);
        cr.rectangle(
            column * 0.5 - SWATCH_WIDTH / 2.0,
            baseline - SWATCH_HEIGHT,
            SWATCH_WIDTH,
            SWATCH_HEIGHT,
        );
        cr.fill()?;

        set_source(cr, colors.text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(LABEL_FONT_SIZE);
        cr.move_to(column * 0.6, baseline);
        cr.show_text(&label.label)?;
    }
    Ok(())
}
