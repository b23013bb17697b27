use dronegrid::*;

use flo_canvas::*;
use flo_draw::*;

use futures::executor;
use futures::prelude::*;

use rand::Rng;
use tracing::{info, warn};

const SIDE: usize = 20;
const DRONES: usize = 3;
const STEPS: u32 = 80;
const VIEW: f32 = 1000.;
const CELL: f32 = VIEW / SIDE as f32;

struct SimWorld {
    values: Vec<i64>,
    regrowth_rate: f64,
    starts: Vec<Vec2>,
}

impl SimWorld {
    fn gen_random_world() -> Self {
        let mut rng = rand::thread_rng();

        let values = (0..SIDE * SIDE)
            .map(|_| {
                if rng.gen_bool(0.2) {
                    0
                } else {
                    rng.gen_range(1..100)
                }
            })
            .collect();

        let starts = (0..DRONES)
            .map(|_| {
                Vec2::new(
                    rng.gen_range(0..SIDE as i32),
                    rng.gen_range(0..SIDE as i32),
                )
            })
            .collect();

        SimWorld {
            values,
            regrowth_rate: rng.gen_range(0.02..0.3),
            starts,
        }
    }

    fn loader(&self) -> Box<dyn GridLoader> {
        Box::new(MemoryLoader {
            side: SIDE,
            values: self.values.clone(),
            regrowth_rate: self.regrowth_rate,
        })
    }
}

fn cell_center(pos: Vec2) -> (f32, f32) {
    (
        (pos.x as f32 + 0.5) * CELL,
        VIEW - (pos.y as f32 + 0.5) * CELL,
    )
}

fn drone_color(idx: usize, alpha: f32) -> Color {
    match idx % 3 {
        0 => Color::Rgba(0., 0., 1., alpha),
        1 => Color::Rgba(1., 0., 0., alpha),
        _ => Color::Rgba(0.8, 0.5, 0., alpha),
    }
}

fn draw_circle_at_pos(gc: &mut CanvasGraphicsContext, pos: Vec2, col: Color) {
    let (x, y) = cell_center(pos);
    gc.new_path();

    gc.circle(x, y, CELL * 0.3);

    gc.fill_color(col);

    gc.fill();
    gc.line_width(1.0);
    gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 1.0));
    gc.stroke();
}

fn draw_lines(gc: &mut CanvasGraphicsContext) {
    for i in 0..=SIDE {
        let at = i as f32 * CELL;

        gc.new_path();
        gc.move_to(0., at);
        gc.line_to(VIEW, at);
        gc.move_to(at, 0.);
        gc.line_to(at, VIEW);

        gc.line_width(1.0);
        gc.stroke_color(Color::Rgba(0.0, 0.0, 0.0, 0.3));
        gc.stroke();
    }
}

fn draw_values(gc: &mut CanvasGraphicsContext, field: &ValueField) {
    let mut max: f32 = 1.;
    for x in 0..SIDE as i32 {
        for y in 0..SIDE as i32 {
            let base = field.base(Vec2::new(x, y)).unwrap_or(0);
            max = max.max(base as f32);
        }
    }

    for x in 0..SIDE as i32 {
        for y in 0..SIDE as i32 {
            let weight = field.base(Vec2::new(x, y)).unwrap_or(0) as f32 / max;

            gc.new_path();
            gc.rect(
                CELL * x as f32,
                VIEW - CELL * y as f32,
                CELL * (x + 1) as f32,
                VIEW - CELL * (y + 1) as f32,
            );

            gc.fill_color(Color::Rgba(1. - weight, 1., 1. - weight, 0.6));

            gc.fill();
        }
    }
}

fn draw_paths(gc: &mut CanvasGraphicsContext, result: &RunResult) {
    for (idx, drone) in result.paths.iter().enumerate() {
        let Some(first) = drone.path.first() else {
            continue;
        };

        gc.new_path();

        let (x, y) = cell_center(first.pos());
        gc.move_to(x, y);

        for step in &drone.path[1..] {
            let (x, y) = cell_center(step.pos());
            gc.line_to(x, y);
        }

        gc.line_width(3.0);
        gc.stroke_color(drone_color(idx, 0.7));
        gc.stroke();

        draw_circle_at_pos(gc, first.pos(), drone_color(idx, 1.));
    }
}

struct App {
    sim_world: SimWorld,
    strategy: Strategy,
    result: Option<RunResult>,
    canvas: Canvas,

    horizon: u8,
    draw_values: bool,
    draw_paths: bool,
}

fn build_strategy(sim_world: &SimWorld, horizon: u8) -> Strategy {
    let cfg = RunConfig {
        total_steps: STEPS,
        time_budget_ms: 1_000,
        horizon,
        allow_stay: false,
        ..RunConfig::default()
    };
    Strategy::greedy(sim_world.loader(), sim_world.starts.clone(), cfg)
}

impl App {
    fn new(canvas: Canvas) -> Self {
        let sim_world = SimWorld::gen_random_world();
        let strategy = build_strategy(&sim_world, 2);

        App {
            sim_world,
            strategy,
            result: None,
            canvas,
            horizon: 2,
            draw_values: true,
            draw_paths: true,
        }
    }

    fn simulate(&mut self) {
        let outcome = self.strategy.load().and_then(|()| self.strategy.run());

        match outcome {
            Ok(result) => {
                info!(
                    score = result.total_score,
                    horizon = self.horizon,
                    regrowth_rate = self.sim_world.regrowth_rate,
                    "simulated"
                );
                self.result = Some(result);
            }
            Err(e) => {
                warn!("simulation failed: {e}");
                self.result = None;
            }
        }
    }

    fn redraw(&mut self) {
        self.canvas.draw(|gc| {
            gc.clear_all_layers();
            gc.canvas_height(VIEW);
            gc.center_region(0.0, 0.0, VIEW, VIEW);

            if self.draw_values {
                if let Some(field) = self.strategy.field() {
                    draw_values(gc, field);
                }
            }

            draw_lines(gc);

            if self.draw_paths {
                if let Some(result) = &self.result {
                    draw_paths(gc, result);
                }
            }
        });
    }

    fn regenerate_map(&mut self) {
        self.sim_world = SimWorld::gen_random_world();
        self.strategy = build_strategy(&self.sim_world, self.horizon);
        self.simulate();

        self.redraw();
    }

    fn toggle_horizon(&mut self) {
        self.horizon = if self.horizon == 1 { 2 } else { 1 };
        self.strategy = build_strategy(&self.sim_world, self.horizon);
        self.simulate();

        self.redraw();
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    with_2d_graphics(|| {
        executor::block_on(async {
            let (canvas, mut events) = create_canvas_window_with_events("DRONEGRID");

            let mut app = App::new(canvas);

            app.simulate();
            app.redraw();

            while let Some(event) = events.next().await {
                match event {
                    DrawEvent::KeyDown(_, Some(Key::KeySpace)) => {
                        app.regenerate_map();
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyEscape)) => {
                        std::process::exit(0);
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key1)) => {
                        app.draw_values = !app.draw_values;
                        app.redraw();
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key2)) => {
                        app.draw_paths = !app.draw_paths;
                        app.redraw();
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key3)) => {
                        app.toggle_horizon();
                    }
                    _ => {}
                }
            }
        });
    });
}
