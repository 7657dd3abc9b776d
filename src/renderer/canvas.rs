//! Canvas 2D renderer
//!
//! Draw order: sky, clouds, obstacles, ground, actor, countdown.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::RenderSurface;
use crate::consts::GROUND_STRIPE;
use crate::quiz::Interruption;
use crate::sim::{Actor, Background, Obstacle, Snapshot};
use crate::tuning::Tuning;

const SKY_TOP: &str = "#87CEEB";
const SKY_BOTTOM: &str = "#98D8C8";
const CLOUD: &str = "rgba(255, 255, 255, 0.8)";
const GROUND: &str = "#8B7355";
const GROUND_LINE: &str = "#6B5945";
const OBSTACLE: &str = "#22C55E";
const OBSTACLE_CAP: &str = "#1F9F4B";
/// Tint over the obstacles while the speed boost runs
const OBSTACLE_BOOSTED: &str = "#EF4444";
const ACTOR_BODY: &str = "#FFD700";
const ACTOR_ACCENT: &str = "#FFA500";

const CAP_HEIGHT: f64 = 30.0;
const CAP_OVERHANG: f64 = 5.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    ground_height: f64,
}

impl CanvasRenderer {
    /// Size the canvas to the playfield and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, tuning: &Tuning) -> Result<Self, JsValue> {
        canvas.set_width(tuning.width as u32);
        canvas.set_height(tuning.height as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        log::info!("Canvas renderer ready ({}x{})", tuning.width, tuning.height);
        Ok(Self {
            ctx,
            width: f64::from(tuning.width),
            height: f64::from(tuning.height),
            ground_height: f64::from(tuning.ground_height),
        })
    }

    fn draw_frame(&self, snapshot: &Snapshot<'_>) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.draw_sky()?;
        self.draw_clouds(snapshot.background)?;
        for obstacle in snapshot.obstacles {
            self.draw_obstacle(obstacle, snapshot.boost_active);
        }
        self.draw_ground(snapshot.background);
        self.draw_actor(snapshot.actor)?;
        if let Interruption::CountingDown { remaining, .. } = snapshot.interruption {
            self.draw_countdown(*remaining)?;
        }
        Ok(())
    }

    fn draw_sky(&self) -> Result<(), JsValue> {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, self.height);
        gradient.add_color_stop(0.0, SKY_TOP)?;
        gradient.add_color_stop(1.0, SKY_BOTTOM)?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn draw_clouds(&self, background: &Background) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(CLOUD);
        for cloud in &background.clouds {
            let (x, y, w) = (
                f64::from(cloud.x),
                f64::from(cloud.y),
                f64::from(cloud.width),
            );
            self.ctx.begin_path();
            self.ctx.arc(x, y, w / 2.0, 0.0, TAU)?;
            self.ctx.arc(x + w / 3.0, y, w / 2.5, 0.0, TAU)?;
            self.ctx.arc(x - w / 3.0, y, w / 2.5, 0.0, TAU)?;
            self.ctx.fill();
        }
        Ok(())
    }

    fn draw_obstacle(&self, obstacle: &Obstacle, boosted: bool) {
        let x = f64::from(obstacle.x);
        let w = f64::from(obstacle.width);
        let gap_top = f64::from(obstacle.gap_y);
        let gap_bottom = f64::from(obstacle.gap_bottom());
        let body = if boosted { OBSTACLE_BOOSTED } else { OBSTACLE };

        // Upper column and its cap
        self.ctx.set_fill_style_str(body);
        self.ctx.fill_rect(x, 0.0, w, gap_top);
        self.ctx.set_fill_style_str(OBSTACLE_CAP);
        self.ctx.fill_rect(
            x - CAP_OVERHANG,
            gap_top - CAP_HEIGHT,
            w + 2.0 * CAP_OVERHANG,
            CAP_HEIGHT,
        );

        // Lower column and its cap
        self.ctx.set_fill_style_str(body);
        self.ctx.fill_rect(x, gap_bottom, w, self.height - gap_bottom);
        self.ctx.set_fill_style_str(OBSTACLE_CAP);
        self.ctx
            .fill_rect(x - CAP_OVERHANG, gap_bottom, w + 2.0 * CAP_OVERHANG, CAP_HEIGHT);
    }

    fn draw_ground(&self, background: &Background) {
        let top = self.height - self.ground_height;
        self.ctx.set_fill_style_str(GROUND);
        self.ctx.fill_rect(0.0, top, self.width, self.ground_height);

        self.ctx.set_stroke_style_str(GROUND_LINE);
        self.ctx.set_line_width(2.0);
        let stripe = f64::from(GROUND_STRIPE);
        let mut x = f64::from(background.ground_offset);
        while x < self.width {
            self.ctx.begin_path();
            self.ctx.move_to(x, top);
            self.ctx.line_to(x, self.height);
            self.ctx.stroke();
            x += stripe;
        }
    }

    fn draw_actor(&self, actor: &Actor) -> Result<(), JsValue> {
        let w = f64::from(actor.width());
        let h = f64::from(actor.height());

        self.ctx.save();
        self.ctx
            .translate(f64::from(actor.x()) + w / 2.0, f64::from(actor.y()) + h / 2.0)?;
        self.ctx.rotate(f64::from(actor.rotation).to_radians())?;
        let drawn = self.draw_actor_body(w, h);
        // Always pop the transform, even if a path call failed
        self.ctx.restore();
        drawn
    }

    fn draw_actor_body(&self, w: f64, h: f64) -> Result<(), JsValue> {
        // Body
        self.ctx.set_fill_style_str(ACTOR_BODY);
        self.ctx.begin_path();
        self.ctx.ellipse(0.0, 0.0, w / 2.0, h / 2.0, 0.0, 0.0, TAU)?;
        self.ctx.fill();

        // Eye
        self.ctx.set_fill_style_str("white");
        self.ctx.begin_path();
        self.ctx.arc(8.0, -5.0, 6.0, 0.0, TAU)?;
        self.ctx.fill();
        self.ctx.set_fill_style_str("black");
        self.ctx.begin_path();
        self.ctx.arc(10.0, -5.0, 3.0, 0.0, TAU)?;
        self.ctx.fill();

        // Beak
        self.ctx.set_fill_style_str(ACTOR_ACCENT);
        self.ctx.begin_path();
        self.ctx.move_to(w / 2.0, 0.0);
        self.ctx.line_to(w / 2.0 + 8.0, 3.0);
        self.ctx.line_to(w / 2.0, 6.0);
        self.ctx.close_path();
        self.ctx.fill();

        // Wing
        self.ctx.set_fill_style_str(ACTOR_BODY);
        self.ctx.set_stroke_style_str(ACTOR_ACCENT);
        self.ctx.set_line_width(2.0);
        self.ctx.begin_path();
        self.ctx
            .ellipse(-5.0, 2.0, 12.0, 8.0, (-20.0f64).to_radians(), 0.0, TAU)?;
        self.ctx.fill();
        self.ctx.stroke();
        Ok(())
    }

    fn draw_countdown(&self, remaining: u32) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.35)");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        self.ctx.set_fill_style_str("white");
        self.ctx.set_stroke_style_str("black");
        self.ctx.set_line_width(4.0);
        self.ctx.set_font("bold 96px sans-serif");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let text = remaining.to_string();
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.ctx.stroke_text(&text, cx, cy)?;
        self.ctx.fill_text(&text, cx, cy)?;
        Ok(())
    }
}

impl RenderSurface for CanvasRenderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>) {
        if let Err(e) = self.draw_frame(snapshot) {
            log::warn!("Canvas draw failed: {:?}", e);
        }
    }
}
