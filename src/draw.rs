use crate::constants::*;
use instant::Instant;
use snowglobe_core::render::{
    star_pulse, twinkle_factor, Backdrop, Frame, Layer, OrnamentSprite, ParticleSprite, Star,
    STAR_FLARE_CURVES, STAR_FLARE_START, STAR_HALO_RADIUS, STAR_INNER_SCALE, TRUNK_REFRACTION_X,
};
use snowglobe_core::snow::SnowView;
use snowglobe_core::theme::{self, Theme};
use snowglobe_core::viewport::Viewport;
use snowglobe_core::{ParticleKind, ShakeTracker};
use std::f64::consts::{FRAC_PI_4, TAU};
use wasm_bindgen::JsValue;
use web_sys as web;

/// Per-paint inputs that are not part of the projected frame.
pub struct PaintInputs<'a> {
    pub viewport: Viewport,
    pub time_sec: f32,
    pub now: Instant,
    pub shakes: &'a ShakeTracker,
    /// Present only while lit.
    pub snow: Option<SnowView<'a>>,
}

pub struct Painter {
    ctx: web::CanvasRenderingContext2d,
}

impl Painter {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn paint(&self, frame: &Frame, inputs: &PaintInputs) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let canvas = ctx
            .canvas()
            .ok_or_else(|| JsValue::from_str("context has no canvas"))?;
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_global_alpha(1.0);
        ctx.set_filter("none");
        ctx.set_fill_style_str(theme::background_color(frame.theme));
        ctx.fill_rect(0.0, 0.0, w, h);

        if let Some(snow) = &inputs.snow {
            self.paint_snow(snow, &inputs.viewport)?;
        }

        let vp = inputs.viewport;
        ctx.set_transform(
            vp.scale as f64,
            0.0,
            0.0,
            vp.scale as f64,
            vp.offset_x as f64,
            vp.offset_y as f64,
        )?;

        if let Some(backdrop) = &frame.backdrop {
            self.paint_backdrop(backdrop, vp.scale)?;
        }
        for p in &frame.particles {
            self.paint_particle(p, frame.theme, inputs.time_sec)?;
        }
        for item in &frame.layered {
            match &item.layer {
                Layer::Bead(b) => {
                    ctx.set_global_alpha(b.opacity as f64);
                    ctx.set_fill_style_str(b.color);
                    ctx.begin_path();
                    ctx.arc(b.x as f64, b.y as f64, b.radius.max(0.0) as f64, 0.0, TAU)?;
                    ctx.fill();
                }
                Layer::Ornament(o) => {
                    let wobble = inputs.shakes.wobble_angle(o.index, inputs.now);
                    self.paint_ornament(o, frame.theme, wobble)?;
                }
            }
        }
        self.paint_star(&frame.star, vp.scale, inputs.time_sec)?;

        ctx.set_global_alpha(1.0);
        ctx.set_filter("none");
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        Ok(())
    }

    fn paint_snow(&self, snow: &SnowView, vp: &Viewport) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let [x0, y0, rw, rh] = vp.view_rect();
        ctx.set_fill_style_str(SNOW_COLOR);
        for flake in &snow.snowfall.flakes {
            let Some(([fx, fy], sway)) = flake.position_at(snow.elapsed_sec) else {
                continue;
            };
            let x = x0 + fx * rw + sway * vp.scale;
            let y = y0 + fy * rh;
            ctx.set_global_alpha((flake.opacity * snow.opacity) as f64);
            ctx.begin_path();
            ctx.arc(
                x as f64,
                y as f64,
                (flake.size_px * 0.5 * vp.scale).max(0.5) as f64,
                0.0,
                TAU,
            )?;
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn paint_backdrop(&self, backdrop: &Backdrop, scale: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let trunk = &backdrop.trunk;
        let (tx, ty, tw, th) = (
            trunk.x as f64,
            trunk.y as f64,
            trunk.width as f64,
            trunk.height as f64,
        );

        let glass = ctx.create_linear_gradient(tx, 0.0, tx + tw, 0.0);
        glass.add_color_stop(0.0, "rgba(226, 232, 240, 0.1)")?;
        glass.add_color_stop(0.3, "rgba(255, 255, 255, 0.4)")?;
        glass.add_color_stop(0.5, "rgba(255, 255, 255, 0.05)")?;
        glass.add_color_stop(0.7, "rgba(255, 255, 255, 0.4)")?;
        glass.add_color_stop(1.0, "rgba(226, 232, 240, 0.1)")?;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_canvas_gradient(&glass);
        ctx.fill_rect(tx, ty, tw, th);
        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.3)");
        ctx.set_line_width(0.5);
        ctx.stroke_rect(tx, ty, tw, th);

        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.2)");
        for x in [-TRUNK_REFRACTION_X, TRUNK_REFRACTION_X] {
            ctx.begin_path();
            ctx.move_to(x as f64, ty);
            ctx.line_to(x as f64, ty + th);
            ctx.stroke();
        }

        let glow = &backdrop.glow;
        let core = ctx.create_linear_gradient(0.0, 0.0, 0.0, glow.height as f64);
        core.add_color_stop(0.0, glow.top_color)?;
        core.add_color_stop(1.0, glow.bottom_color)?;
        ctx.set_global_alpha(glow.opacity as f64);
        ctx.set_filter(&format!("blur({:.1}px)", GLOW_BLUR_PX * scale));
        ctx.set_fill_style_canvas_gradient(&core);
        let [first, rest @ ..] = glow.outline;
        ctx.begin_path();
        ctx.move_to(first[0] as f64, first[1] as f64);
        for [x, y] in rest {
            ctx.line_to(x as f64, y as f64);
        }
        ctx.close_path();
        ctx.fill();
        ctx.set_filter("none");
        Ok(())
    }

    fn paint_particle(&self, p: &ParticleSprite, theme: Theme, time_sec: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let sparkle = twinkle_factor(p.variant, theme, time_sec, p.anim_offset_sec);
        ctx.save();
        ctx.translate(p.x as f64, p.y as f64)?;
        ctx.scale(p.scale as f64, p.scale as f64)?;
        ctx.set_fill_style_str(p.color);
        match p.kind {
            ParticleKind::Bright => {
                ctx.set_global_alpha((p.opacity * sparkle) as f64);
                ctx.rotate(FRAC_PI_4)?;
                ctx.fill_rect(0.0, 0.0, p.size as f64, p.size as f64);
            }
            ParticleKind::Fine => {
                ctx.set_global_alpha(p.opacity as f64);
                ctx.begin_path();
                ctx.arc(0.0, 0.0, (p.size * 0.5) as f64, 0.0, TAU)?;
                ctx.fill();
            }
        }
        ctx.restore();
        Ok(())
    }

    fn paint_ornament(&self, o: &OrnamentSprite, theme: Theme, wobble: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (hw, hh) = (CRYSTAL_HALF_WIDTH as f64, CRYSTAL_HALF_HEIGHT as f64);
        ctx.save();
        ctx.translate(o.x as f64, o.y as f64)?;
        ctx.scale(o.scale as f64, o.scale as f64)?;
        ctx.set_global_alpha(o.opacity as f64);
        if wobble != 0.0 {
            // Swing from the top of the thread.
            ctx.translate(0.0, THREAD_TOP as f64)?;
            ctx.rotate(wobble as f64)?;
            ctx.translate(0.0, -THREAD_TOP as f64)?;
        }

        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.4)");
        ctx.set_line_width(0.5);
        ctx.begin_path();
        ctx.move_to(0.0, THREAD_BOTTOM as f64);
        ctx.line_to(0.0, THREAD_TOP as f64);
        ctx.stroke();

        let (stops, facet) = theme::crystal_palette(theme);
        let fill = ctx.create_linear_gradient(-hw, -hh, hw, hh);
        fill.add_color_stop(0.0, stops[0])?;
        fill.add_color_stop(0.5, stops[1])?;
        fill.add_color_stop(1.0, stops[2])?;
        ctx.set_fill_style_canvas_gradient(&fill);
        ctx.set_shadow_color("rgba(255, 255, 255, 0.5)");
        ctx.set_shadow_blur(5.0);
        ctx.begin_path();
        ctx.move_to(0.0, -hh);
        ctx.line_to(hw, 0.0);
        ctx.line_to(0.0, hh);
        ctx.line_to(-hw, 0.0);
        ctx.close_path();
        ctx.fill();
        ctx.set_shadow_blur(0.0);
        ctx.set_stroke_style_str("#ffffff");
        ctx.stroke();

        ctx.set_stroke_style_str(facet);
        ctx.begin_path();
        ctx.move_to(0.0, -hh);
        ctx.line_to(0.0, hh);
        ctx.move_to(-hw, 0.0);
        ctx.line_to(hw, 0.0);
        ctx.stroke();
        ctx.restore();
        Ok(())
    }

    fn trace_flare(&self) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(STAR_FLARE_START[0] as f64, STAR_FLARE_START[1] as f64);
        for [cx, cy, x, y] in STAR_FLARE_CURVES {
            ctx.quadratic_curve_to(cx as f64, cy as f64, x as f64, y as f64);
        }
        ctx.close_path();
    }

    fn paint_star(&self, star: &Star, scale: f32, time_sec: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let s = (star.scale * star_pulse(time_sec)) as f64;
        let blur = |px: f32| format!("blur({:.1}px)", px * scale * star.scale);
        ctx.save();
        ctx.scale(s, s)?;

        ctx.set_global_alpha(0.8);
        ctx.set_filter(&blur(STAR_HALO_BLUR_PX));
        ctx.set_fill_style_str(star.palette.halo);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, STAR_HALO_RADIUS as f64, 0.0, TAU)?;
        ctx.fill();

        // Blurred copy under a sharp one, like a merge of glow and source.
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(star.palette.flare);
        ctx.set_filter(&blur(STAR_FLARE_BLUR_PX));
        self.trace_flare();
        ctx.fill();
        ctx.set_filter("none");
        self.trace_flare();
        ctx.fill();

        ctx.rotate(FRAC_PI_4)?;
        ctx.scale(STAR_INNER_SCALE as f64, STAR_INNER_SCALE as f64)?;
        ctx.set_global_alpha(0.8);
        ctx.set_fill_style_str(star.palette.inner);
        self.trace_flare();
        ctx.fill();
        ctx.restore();
        Ok(())
    }
}
