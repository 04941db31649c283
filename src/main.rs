//! Pixel Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use pixel_invaders::consts::*;
    use pixel_invaders::leaderboard::{fetch_leaderboard, format_date, format_score, rank_label};
    use pixel_invaders::ledger::bridge::JsLedger;
    use pixel_invaders::notify::{Notification, NotificationKind};
    use pixel_invaders::pipeline::{ScoreSubmission, submit};
    use pixel_invaders::renderer::RenderState;
    use pixel_invaders::sim::{GamePhase, TickInput};
    use pixel_invaders::wallet::bridge::JsWallet;
    use pixel_invaders::wallet::{MAX_USERNAME_LEN, Wallet, format_address};
    use pixel_invaders::{Screen, Session, Settings};

    /// How long a toast stays up (ms)
    const TOAST_MS: f64 = 4000.0;
    const BLOCKING_TOAST_MS: f64 = 8000.0;
    const MAX_TOASTS: usize = 5;

    /// Player actions reachable from keys and buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Start,
        Menu,
        Pause,
        Connect,
        Disconnect,
        Fund,
        EditName,
        Refresh,
        ToggleIdle,
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // DOM overlays
        toasts: Vec<(Notification, f64)>,
        toasts_dirty: bool,
        leaderboard_dirty: bool,
    }

    impl Game {
        fn new(session: Session) -> Self {
            Self {
                session,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                toasts: Vec::new(),
                toasts_dirty: false,
                leaderboard_dirty: true,
            }
        }

        /// Run simulation ticks. Returns the score write to launch, if a run ended.
        fn update(&mut self, dt: f32, time: f64) -> Option<ScoreSubmission> {
            let dt = dt.min(0.1);
            self.accumulator = (self.accumulator + dt).min(SIM_DT * MAX_SUBSTEPS as f32);

            let mut submission = None;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                if let Some(pending) = self.session.tick(&input, SIM_DT) {
                    submission = Some(pending);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
                self.input.pause = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            submission
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let result = match self.session.screen.game() {
                Some(state) => render_state.render(state),
                None => render_state.render_vertices(&[]),
            };
            match result {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Move queued notifications onto the toast stack and expire old ones
        fn collect_toasts(&mut self, now: f64) {
            for notification in self.session.notifications.drain() {
                let ttl = match notification.kind {
                    NotificationKind::Blocking => BLOCKING_TOAST_MS,
                    _ => TOAST_MS,
                };
                self.toasts.push((notification, now + ttl));
                self.toasts_dirty = true;
            }

            let before = self.toasts.len();
            self.toasts.retain(|(_, expires)| *expires > now);
            if self.toasts.len() > MAX_TOASTS {
                let excess = self.toasts.len() - MAX_TOASTS;
                self.toasts.drain(..excess);
            }
            if self.toasts.len() != before {
                self.toasts_dirty = true;
            }
        }

        /// Update HUD, overlays and side panels in the DOM
        fn update_dom(&mut self, time: f64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            self.collect_toasts(time);
            self.update_hud(&document);
            self.update_screens(&document);
            self.update_wallet(&document);

            if self.toasts_dirty {
                self.render_toasts(&document);
                self.toasts_dirty = false;
            }
            if self.leaderboard_dirty {
                self.render_leaderboard(&document);
                self.leaderboard_dirty = false;
            }
        }

        fn update_hud(&self, document: &Document) {
            let (score, lives, wave) = match self.session.screen.game() {
                Some(state) => (state.wave.score, state.wave.lives, state.wave.wave),
                None => (0, self.session.settings.tuning.starting_lives, 1),
            };
            set_text(document, "hud-score", &score.to_string());
            set_text(document, "hud-lives", &lives.to_string());
            set_text(document, "hud-wave", &wave.to_string());

            let show_fps = self.session.settings.show_fps;
            set_hidden(document, "hud-fps", !show_fps);
            if show_fps {
                set_text(document, "hud-fps", &self.fps.to_string());
            }
            set_hidden(document, "idle-indicator", !self.input.idle_mode);
        }

        fn update_screens(&self, document: &Document) {
            let screen = &self.session.screen;
            set_hidden(document, "menu", !matches!(screen, Screen::Menu));

            let paused = matches!(screen, Screen::Playing(state) if state.phase == GamePhase::Paused);
            set_hidden(document, "pause-menu", !paused);

            match screen {
                Screen::GameOver { state, save } => {
                    set_hidden(document, "game-over", false);
                    set_text(document, "final-score", &format_score(state.wave.score));
                    set_text(document, "final-wave", &state.wave.wave.to_string());
                    set_text(document, "save-status", &save.label());
                }
                _ => set_hidden(document, "game-over", true),
            }
        }

        fn update_wallet(&self, document: &Document) {
            let connected = self.session.is_connected();
            let status = match &self.session.identity {
                Some(identity) => {
                    let name = identity.username.as_deref().unwrap_or("Anonymous");
                    let funding = if identity.funded() { "" } else { " (unfunded)" };
                    format!(
                        "{} ({}) | {} ETH{}",
                        name,
                        format_address(&identity.address),
                        identity.balance,
                        funding
                    )
                }
                None => "Not connected".to_string(),
            };
            set_text(document, "wallet-status", &status);
            let unfunded = self
                .session
                .identity
                .as_ref()
                .is_some_and(|identity| !identity.funded());
            if let Some(btn) = document.get_element_by_id("fund-btn") {
                let _ = btn.class_list().toggle_with_force("attention", unfunded);
            }
            set_hidden(document, "connect-btn", connected);
            for id in ["disconnect-btn", "fund-btn", "username-btn"] {
                set_hidden(document, id, !connected);
            }
        }

        fn render_toasts(&self, document: &Document) {
            let Some(container) = document.get_element_by_id("toasts") else {
                return;
            };
            container.set_text_content(None);
            for (toast, _) in &self.toasts {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                el.set_class_name(&format!("toast {}", toast.kind.css_class()));
                append_text(document, &el, "strong", "toast-title", &toast.title);
                append_text(document, &el, "p", "toast-description", &toast.description);
                let _ = container.append_child(&el);
            }
        }

        fn render_leaderboard(&self, document: &Document) {
            let board = &self.session.leaderboard;
            let status = if board.loading {
                "Refreshing..."
            } else if board.stale {
                "Showing last known scores"
            } else {
                ""
            };
            set_text(document, "leaderboard-status", status);

            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_text_content(None);

            if board.is_empty() {
                let text = if board.loading {
                    "Loading..."
                } else {
                    "No scores yet!"
                };
                append_text(document, &list, "li", "leaderboard-empty", text);
                return;
            }

            let now = js_sys::Date::now() as u64;
            for (i, entry) in board.entries.iter().enumerate() {
                let Ok(row) = document.create_element("li") else {
                    continue;
                };
                row.set_class_name("leaderboard-row");
                append_text(document, &row, "span", "rank", &rank_label(i + 1));
                append_text(document, &row, "span", "player", &format_address(&entry.wallet));
                append_text(document, &row, "span", "date", &format_date(entry.timestamp, now));
                append_text(document, &row, "span", "score", &format_score(entry.score));
                let _ = list.append_child(&row);
            }
        }
    }

    /// Set an element's text, skipping the write when unchanged
    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn append_text(document: &Document, parent: &Element, tag: &str, class: &str, text: &str) {
        if let Ok(el) = document.create_element(tag) {
            el.set_class_name(class);
            el.set_text_content(Some(text));
            let _ = parent.append_child(&el);
        }
    }

    fn dispatch(game: &Rc<RefCell<Game>>, action: Action) {
        match action {
            Action::Start => {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                if g.session.start_game(seed).is_ok() {
                    g.accumulator = 0.0;
                    let idle_mode = g.input.idle_mode;
                    g.input = TickInput {
                        idle_mode,
                        ..Default::default()
                    };
                }
            }
            Action::Menu => game.borrow_mut().session.return_to_menu(),
            Action::Pause => game.borrow_mut().input.pause = true,
            Action::Connect => launch_connect(game.clone()),
            Action::Disconnect => {
                JsWallet::new().disconnect();
                game.borrow_mut().session.disconnect();
            }
            Action::Fund => launch_fund(game.clone()),
            Action::EditName => edit_username(game),
            Action::Refresh => {
                launch_leaderboard_refresh(game.clone());
                launch_balance_refresh(game.clone());
            }
            Action::ToggleIdle => {
                let mut g = game.borrow_mut();
                g.input.idle_mode = !g.input.idle_mode;
                log::info!("Idle mode: {}", g.input.idle_mode);
            }
        }
    }

    fn launch_score_write(game: Rc<RefCell<Game>>, submission: ScoreSubmission) {
        wasm_bindgen_futures::spawn_local(async move {
            let ledger = JsLedger::new();
            let result = submit(&ledger, &submission).await;
            let refresh = game.borrow_mut().session.complete_score_write(
                submission.generation,
                submission.record.score(),
                result,
            );
            if refresh {
                launch_leaderboard_refresh(game);
            }
        });
    }

    fn launch_leaderboard_refresh(game: Rc<RefCell<Game>>) {
        let (ticket, settings) = {
            let mut g = game.borrow_mut();
            g.leaderboard_dirty = true;
            (
                g.session.begin_leaderboard_refresh(),
                g.session.settings.ledger.clone(),
            )
        };
        wasm_bindgen_futures::spawn_local(async move {
            let ledger = JsLedger::new();
            let result = fetch_leaderboard(&ledger, &settings).await;
            let mut g = game.borrow_mut();
            g.session.complete_leaderboard_refresh(ticket, result);
            g.leaderboard_dirty = true;
        });
    }

    fn launch_connect(game: Rc<RefCell<Game>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsWallet::new().connect().await;
            game.borrow_mut().session.complete_connect(result);
        });
    }

    fn launch_balance_refresh(game: Rc<RefCell<Game>>) {
        if !game.borrow().session.is_connected() {
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            match JsWallet::new().balance().await {
                Ok(balance) => game.borrow_mut().session.update_balance(balance),
                Err(e) => log::warn!("Balance refresh failed: {}", e),
            }
        });
    }

    fn launch_fund(game: Rc<RefCell<Game>>) {
        let amount = {
            let mut g = game.borrow_mut();
            if g.session.require_identity().is_err() {
                return;
            }
            g.session.settings.ledger.fund_amount.clone()
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsWallet::new().fund(&amount).await;
            game.borrow_mut().session.complete_fund(result);
        });
    }

    fn edit_username(game: &Rc<RefCell<Game>>) {
        let current = {
            let mut g = game.borrow_mut();
            if g.session.require_identity().is_err() {
                return;
            }
            g.session
                .identity
                .as_ref()
                .and_then(|i| i.username.clone())
                .unwrap_or_default()
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let message = format!("Enter username (max {} characters)", MAX_USERNAME_LEN);
        match window.prompt_with_message_and_default(&message, &current) {
            Ok(Some(name)) => {
                let _ = game.borrow_mut().session.set_username(&name);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Username prompt failed: {:?}", e),
        }
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: Vec2,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let playfield = Vec2::new(
            settings.tuning.playfield_width,
            settings.tuning.playfield_height,
        );
        let game = Rc::new(RefCell::new(Game::new(Session::new(settings))));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        // The leaderboard is public; load it before any wallet is connected
        launch_leaderboard_refresh(game.clone());

        game.borrow_mut().render_state = init_renderer(&canvas, width, height, playfield).await;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        request_animation_frame(game);

        log::info!("Pixel Invaders running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down: held movement plus one-shot actions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let action = {
                    let mut g = game.borrow_mut();
                    match event.key().as_str() {
                        "ArrowLeft" => {
                            event.prevent_default();
                            g.input.left = true;
                            None
                        }
                        "ArrowRight" => {
                            event.prevent_default();
                            g.input.right = true;
                            None
                        }
                        " " => {
                            event.prevent_default();
                            if !event.repeat() {
                                g.input.fire = true;
                            }
                            None
                        }
                        "Enter" => Some(Action::Start),
                        "Escape" | "p" | "P" => Some(Action::Pause),
                        "m" | "M" => Some(Action::Menu),
                        "r" | "R" => Some(Action::Refresh),
                        "c" | "C" => Some(Action::Connect),
                        "f" | "F" => Some(Action::Fund),
                        "n" | "N" => Some(Action::EditName),
                        "i" | "I" => Some(Action::ToggleIdle),
                        _ => None,
                    }
                };
                if let Some(action) = action {
                    if !event.repeat() {
                        dispatch(&game, action);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held movement
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons = [
            ("start-btn", Action::Start),
            ("restart-btn", Action::Start),
            ("menu-btn", Action::Menu),
            ("resume-btn", Action::Pause),
            ("connect-btn", Action::Connect),
            ("disconnect-btn", Action::Disconnect),
            ("fund-btn", Action::Fund),
            ("username-btn", Action::EditName),
            ("refresh-btn", Action::Refresh),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::debug!("No #{} button on this page", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                dispatch(&game, action);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.settings.auto_pause {
                        g.session.pause();
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Held keys never see their keyup once focus is gone
                g.input.left = false;
                g.input.right = false;
                if g.session.settings.auto_pause {
                    g.session.pause();
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let submission = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let submission = g.update(dt, time);
            g.render();
            g.update_dom(time);
            submission
        };

        if let Some(submission) = submission {
            launch_score_write(game.clone(), submission);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pixel Invaders (native) starting...");
    log::info!("Native mode runs a headless autopilot against an in-memory ledger");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pixel_invaders::consts::SIM_DT;
    use pixel_invaders::leaderboard::{fetch_leaderboard, format_date, format_score, rank_label};
    use pixel_invaders::ledger::{LedgerWriter, MemoryLedger, ScoreRecord, score_tags};
    use pixel_invaders::pipeline::submit;
    use pixel_invaders::sim::TickInput;
    use pixel_invaders::wallet::{MemoryWallet, Wallet, format_address};
    use pixel_invaders::{GameError, Result, Screen, Session, Settings, epoch_millis};

    /// Ten minutes of simulated play
    const MAX_STEPS: u32 = 120 * 600;
    const RUNS: u64 = 3;
    const DEMO_SEED: u64 = 0x5eed;
    const PLAYER_WALLET: &str = "0x7e57000000000000000000000000000000c0ffee";

    pub fn run() -> Result<()> {
        let settings = Settings::load();
        let ledger = MemoryLedger::new();
        seed_rivals(&ledger, &settings)?;

        let wallet = MemoryWallet::new(PLAYER_WALLET, 0.0);
        let mut session = Session::new(settings);
        refresh(&mut session, &ledger);

        session.complete_connect(pollster::block_on(wallet.connect()));
        let amount = session.settings.ledger.fund_amount.clone();
        session.complete_fund(pollster::block_on(wallet.fund(&amount)));
        session.set_username("autopilot")?;

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for run in 0..RUNS {
            session.start_game(DEMO_SEED + run)?;

            let mut submission = None;
            for _ in 0..MAX_STEPS {
                submission = session.tick(&input, SIM_DT);
                if !matches!(session.screen, Screen::Playing(_)) {
                    break;
                }
            }

            match &session.screen {
                Screen::GameOver { state, .. } => log::info!(
                    "Run {} over: score {} on wave {}",
                    run + 1,
                    state.wave.score,
                    state.wave.wave
                ),
                _ => {
                    log::warn!("Run {} still alive after {} steps; abandoning", run + 1, MAX_STEPS);
                    session.return_to_menu();
                }
            }

            if let Some(submission) = submission {
                let result = pollster::block_on(submit(&ledger, &submission));
                let saved = session.complete_score_write(
                    submission.generation,
                    submission.record.score(),
                    result,
                );
                if saved {
                    refresh(&mut session, &ledger);
                }
            }
            if let Screen::GameOver { save, .. } = &session.screen {
                log::info!("{}", save.label());
            }
        }

        print_leaderboard(&session);
        Ok(())
    }

    /// A few scores from other players so the board is not empty
    fn seed_rivals(ledger: &MemoryLedger, settings: &Settings) -> Result<()> {
        let now = epoch_millis();
        let rivals = [
            (Some("ace"), 1240, 3),
            (Some("rookie"), 90, 30),
            (None, 410, 200),
            (Some("nightowl"), 680, 2_000),
        ];
        for (i, (name, score, minutes_ago)) in rivals.into_iter().enumerate() {
            let record = ScoreRecord::new(
                format!("0x{:040x}", i + 1),
                name.map(str::to_string),
                score,
                now.saturating_sub(minutes_ago * 60_000),
            )
            .with_game(settings.ledger.game_id.clone());
            pollster::block_on(ledger.write(&record, &score_tags(&record)))
                .map_err(GameError::WriteFailed)?;
        }
        Ok(())
    }

    fn refresh(session: &mut Session, ledger: &MemoryLedger) {
        let ticket = session.begin_leaderboard_refresh();
        let result = pollster::block_on(fetch_leaderboard(ledger, &session.settings.ledger));
        session.complete_leaderboard_refresh(ticket, result);
    }

    fn print_leaderboard(session: &Session) {
        let now = epoch_millis();
        println!("\n🏆 Top Scores");
        if session.leaderboard.is_empty() {
            println!("  No scores yet!");
            return;
        }
        for (i, entry) in session.leaderboard.entries.iter().enumerate() {
            println!(
                "  {:>4}  {:<16} {:>12}  {}",
                rank_label(i + 1),
                format_address(&entry.wallet),
                format_score(entry.score),
                format_date(entry.timestamp, now)
            );
        }
    }
}
