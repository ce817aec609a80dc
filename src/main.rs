//! Board Walk entry point
//!
//! In the browser: builds the board, wires the controls and drives the
//! simulation from `requestAnimationFrame`. Natively: a headless runner that
//! prints visit statistics.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_board {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

    use board_walk::consts::{GRID_SIZE, TOKEN_SIZE};
    use board_walk::host::{Clock, PerformanceClock};
    use board_walk::sim::FrameRequest;
    use board_walk::{BoardLayout, Settings, Simulation, index_for_grid_cell};

    /// Browser app holding the simulation and its frame loop
    struct App {
        sim: Simulation,
        clock: PerformanceClock,
        /// A requestAnimationFrame callback is queued
        loop_pending: bool,
    }

    impl App {
        /// Start the simulation; true if the caller must queue the first frame
        fn start(&mut self) -> bool {
            let request = self.sim.start(self.clock.now_ms());
            if request.is_request() && !self.loop_pending {
                self.loop_pending = true;
                return true;
            }
            false
        }
    }

    fn element(document: &Document, id: &str) -> Option<Element> {
        let el = document.get_element_by_id(id);
        if el.is_none() {
            log::warn!("Missing #{} element", id);
        }
        el
    }

    /// Lay out the 11x11 grid; edge cells become `space-N`
    fn build_board(document: &Document, board: &Element) -> Result<(), JsValue> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let cell = document.create_element("div")?;
                match index_for_grid_cell(row, col) {
                    Ok(index) => {
                        cell.set_class_name("space");
                        cell.set_id(&format!("space-{}", index));
                        cell.set_text_content(Some(&index.to_string()));
                    }
                    Err(_) => cell.set_class_name("empty"),
                }
                board.append_child(&cell)?;
            }
        }
        Ok(())
    }

    fn place_token(token: &HtmlElement, layout: &BoardLayout, space: usize) {
        match layout.token_offset(space, TOKEN_SIZE) {
            Ok(offset) => {
                let _ = token.style().set_property(
                    "transform",
                    &format!("translate({}px, {}px)", offset.x, offset.y),
                );
            }
            Err(e) => log::error!("Token placement failed: {}", e),
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Board Walk starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(clock) = PerformanceClock::new() else {
            log::error!("performance.now() unavailable");
            return;
        };
        let Some(board) = element(&document, "board") else {
            return;
        };
        if let Err(e) = build_board(&document, &board) {
            log::error!("Failed to build board: {:?}", e);
            return;
        }

        // Measure the rendered board so the token lands on cell centers
        let width = board.get_bounding_client_rect().width() as f32;
        let mut settings = Settings::default();
        if width > 0.0 {
            settings.cell_size = width / GRID_SIZE as f32;
        }
        settings.seed = Some(js_sys::Date::now() as u64);

        let speed_range = element(&document, "speedRange")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if let Some(value) = speed_range.as_ref().and_then(|r| r.value().parse::<f64>().ok()) {
            settings.turn_interval_ms = Some(value);
        }

        let mut sim = match Simulation::from_settings(&settings) {
            Ok(sim) => sim,
            Err(e) => {
                log::warn!("Bad settings ({}), using defaults", e);
                settings.turn_interval_ms = None;
                match Simulation::from_settings(&settings) {
                    Ok(sim) => sim,
                    Err(e) => {
                        log::error!("Simulation setup failed: {}", e);
                        return;
                    }
                }
            }
        };
        log::info!("Simulation initialized with seed: {:?}", settings.seed);

        let layout = BoardLayout::new(settings.cell_size);
        let token = element(&document, "token").and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(ref token) = token {
            place_token(token, &layout, 0);
        }

        // Presentation follows turns through the listener only
        {
            let document = document.clone();
            let token = token.clone();
            sim.on_turn_completed(move |turn, _| {
                set_text(&document, "die1", &turn.die1.to_string());
                set_text(&document, "die2", &turn.die2.to_string());
                set_text(&document, "total", &turn.total().to_string());
                if let Some(ref token) = token {
                    place_token(token, &layout, turn.new_position);
                }
            });
        }

        let app = Rc::new(RefCell::new(App {
            sim,
            clock,
            loop_pending: false,
        }));

        setup_controls(&document, app, token, layout, speed_range);

        log::info!("Board Walk ready");
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = element(document, id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(
        document: &Document,
        app: Rc<RefCell<App>>,
        token: Option<HtmlElement>,
        layout: BoardLayout,
        speed_range: Option<HtmlInputElement>,
    ) {
        // Start
        {
            let app = app.clone();
            on_click(document, "startBtn", move || {
                let queue_frame = app.borrow_mut().start();
                if queue_frame {
                    request_animation_frame(app.clone());
                }
            });
        }

        // Stop
        {
            let app = app.clone();
            on_click(document, "stopBtn", move || app.borrow_mut().sim.stop());
        }

        // Restart
        {
            let app = app.clone();
            let document_clone = document.clone();
            on_click(document, "restartBtn", move || {
                app.borrow_mut().sim.reset();
                if let Some(ref token) = token {
                    place_token(token, &layout, 0);
                }
                for id in ["die1", "die2", "total"] {
                    set_text(&document_clone, id, "0");
                }
            });
        }

        // Show visits
        {
            let app = app.clone();
            on_click(document, "showVisitsBtn", move || {
                let report = app.borrow().sim.snapshot().to_string();
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&report);
                }
            });
        }

        // Speed slider
        if let Some(range) = speed_range {
            let document_clone = document.clone();
            let input = range.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(ms) = input.value().parse::<f64>() else {
                    return;
                };
                if app.borrow_mut().sim.set_interval(ms).is_ok() {
                    set_text(&document_clone, "speedDisplay", &format!("{} ms", ms));
                }
            });
            let _ =
                range.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let next = {
            let mut a = app.borrow_mut();
            let outcome = a.sim.on_frame(time);
            if outcome.next == FrameRequest::Halt {
                a.loop_pending = false;
            }
            outcome.next
        };

        if next.is_request() {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_board::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;
    use std::fs;
    use std::str::FromStr;

    use anyhow::{Context, Result, bail};
    use board_walk::host::FrameDriver;
    use board_walk::{Settings, Simulation, SpeedPreset};

    /// Frame period of the simulated display (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.windows(2)
            .find(|w| w[0] == flag)
            .map(|w| w[1].as_str())
    }

    fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
        match arg_value(args, flag) {
            Some(raw) => match raw.parse() {
                Ok(value) => Ok(Some(value)),
                Err(_) => bail!("invalid value for {}: {}", flag, raw),
            },
            None => Ok(None),
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();

        let args: Vec<String> = env::args().collect();

        let mut settings = match arg_value(&args, "--settings") {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading settings from {}", path))?;
                Settings::from_json(&json)?
            }
            None => Settings::default(),
        };
        if let Some(seed) = parse_arg::<u64>(&args, "--seed")? {
            settings.seed = Some(seed);
        }
        if let Some(name) = arg_value(&args, "--speed") {
            settings.speed = match SpeedPreset::from_str(name) {
                Some(preset) => preset,
                None => bail!("unknown speed preset: {}", name),
            };
        }
        if let Some(ms) = parse_arg::<f64>(&args, "--interval")? {
            settings.turn_interval_ms = Some(ms);
        }
        let turns = parse_arg::<u64>(&args, "--turns")?.unwrap_or(10_000);
        let frames = parse_arg::<u64>(&args, "--frames")?;
        let top = parse_arg::<usize>(&args, "--top")?.unwrap_or(10);
        let full_report = args.iter().any(|a| a == "--report");

        let mut sim = Simulation::from_settings(&settings)?;

        println!("Board Walk: headless run");
        println!("  seed:      {}", sim.dice().seed());
        println!("  interval:  {} ms", sim.turn_interval_ms());
        println!("  cadence:   {}", sim.cadence().as_str());

        match frames {
            Some(frames) => {
                println!("  frames:    {} at 60 Hz", frames);
                let mut driver = FrameDriver::new(FRAME_MS);
                driver.start(&mut sim);
                driver.run(&mut sim, frames);
                sim.stop();
            }
            None => {
                println!("  turns:     {}", turns);
                for _ in 0..turns {
                    sim.step();
                }
            }
        }
        println!();

        let snapshot = sim.snapshot();
        println!(
            "{} turns, token on space {}",
            sim.turns_taken(),
            sim.position()
        );
        println!("Most visited spaces:");
        for (space, count) in snapshot.ranked().into_iter().take(top) {
            println!(
                "  {:>2}: {:>8}  ({:.2}%)",
                space,
                count,
                snapshot.frequency(space) * 100.0
            );
        }

        if full_report {
            println!();
            println!("{}", snapshot);
        }

        log::info!("Run complete");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
