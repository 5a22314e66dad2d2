//! Browser driver for a racing session
//!
//! Wires the session's two periodic tasks to the browser: the frame task to
//! `requestAnimationFrame`, the spawn task to `setInterval`. Both are
//! cancelled when the session stops or a word completes, and restarted when
//! the next word loads. The page pulls renderer events as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::storage::LocalStorageStore;
use crate::difficulty::Difficulty;
use crate::settings::Settings;
use crate::sim::{Direction, RaceEvent, RaceOptions, RacingSession};

type WebSession = RacingSession<LocalStorageStore>;

struct Driver {
    session: WebSession,
    raf_handle: Option<i32>,
    interval_handle: Option<i32>,
    interval_closure: Option<Closure<dyn FnMut()>>,
    events: Vec<RaceEvent>,
}

impl Driver {
    fn collect_events(&mut self) {
        self.events.extend(self.session.drain_events());
    }
}

/// Racing game handle exported to the page
#[wasm_bindgen]
pub struct WebRacer {
    driver: Rc<RefCell<Driver>>,
}

#[wasm_bindgen]
impl WebRacer {
    /// Open storage, read settings and build an idle session
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebRacer, JsValue> {
        let store = LocalStorageStore::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let session = RacingSession::with_seed(store, seed, RaceOptions::from_settings(&settings));
        log::info!("Racer created with seed {seed}, {} difficulty", settings.difficulty);

        Ok(WebRacer {
            driver: Rc::new(RefCell::new(Driver {
                session,
                raf_handle: None,
                interval_handle: None,
                interval_closure: None,
                events: Vec::new(),
            })),
        })
    }

    /// Start with the stored word list. `difficulty` overrides settings when given.
    pub fn start(&self, difficulty: Option<String>) -> Result<(), JsValue> {
        let difficulty = match difficulty {
            Some(name) => name
                .parse::<Difficulty>()
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Settings::load().difficulty,
        };
        {
            let mut driver = self.driver.borrow_mut();
            driver
                .session
                .start_from_store(difficulty)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            driver.collect_events();
        }
        schedule(&self.driver);
        Ok(())
    }

    pub fn stop(&self) {
        cancel(&self.driver);
        let mut driver = self.driver.borrow_mut();
        driver.session.stop_session();
        driver.collect_events();
    }

    /// Load the next word and resume the race; returns the word
    pub fn next_word(&self) -> Option<String> {
        let word = {
            let mut driver = self.driver.borrow_mut();
            let word = driver.session.next_word();
            driver.collect_events();
            word
        };
        schedule(&self.driver);
        word
    }

    /// -1 for left, +1 for right
    pub fn move_player(&self, step: i32) -> bool {
        let Some(direction) = Direction::from_step(step) else {
            return false;
        };
        let mut driver = self.driver.borrow_mut();
        let moved = driver.session.move_player(direction);
        driver.collect_events();
        moved
    }

    pub fn set_player_lane(&self, lane: usize) -> bool {
        let mut driver = self.driver.borrow_mut();
        let moved = driver.session.set_player_lane(lane);
        driver.collect_events();
        moved
    }

    pub fn set_difficulty(&self, name: &str) -> Result<(), JsValue> {
        let difficulty = name
            .parse::<Difficulty>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        {
            let mut driver = self.driver.borrow_mut();
            driver.session.set_difficulty(difficulty);
            driver.collect_events();
        }
        // New spawn cadence
        cancel_interval(&self.driver);
        schedule(&self.driver);
        Ok(())
    }

    /// Arrow keys (and A/D) steer the player
    pub fn bind_keyboard(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let driver = self.driver.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let direction = match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => Direction::Left,
                "ArrowRight" | "d" | "D" => Direction::Right,
                _ => return,
            };
            let mut d = driver.borrow_mut();
            if d.session.move_player(direction) {
                event.prevent_default();
            }
            d.collect_events();
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    pub fn set_track_height(&self, height: f32) {
        self.driver.borrow_mut().session.set_track_height(height);
    }

    /// Replace the stored word list (parent screen); takes effect on the next start
    pub fn set_words(&self, words: Vec<String>) -> Result<(), JsValue> {
        let driver = self.driver.borrow();
        driver
            .session
            .store()
            .save_words(&words)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Whether the page should play sound effects for events
    pub fn sounds_enabled(&self) -> bool {
        Settings::load().sounds_enabled
    }

    pub fn score(&self) -> u32 {
        self.driver.borrow().session.score()
    }

    /// All events since the last call, as a JSON array
    pub fn take_events(&self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut self.driver.borrow_mut().events);
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Start whichever browser callbacks the session wants and aren't running
fn schedule(driver: &Rc<RefCell<Driver>>) {
    let (wants_frames, wants_spawns, has_raf, has_interval, interval_ms) = {
        let d = driver.borrow();
        (
            d.session.frame_running(),
            d.session.spawn_running(),
            d.raf_handle.is_some(),
            d.interval_handle.is_some(),
            d.session.config().spawn_interval_ms,
        )
    };

    if wants_spawns && !has_interval {
        start_interval(driver, interval_ms);
    }
    if wants_frames && !has_raf {
        request_animation_frame(driver.clone());
    }
}

/// Frame loop first, then the spawn timer
fn cancel(driver: &Rc<RefCell<Driver>>) {
    if let Some(handle) = driver.borrow_mut().raf_handle.take()
        && let Some(window) = web_sys::window()
    {
        let _ = window.cancel_animation_frame(handle);
    }
    cancel_interval(driver);
}

fn cancel_interval(driver: &Rc<RefCell<Driver>>) {
    let mut d = driver.borrow_mut();
    if let Some(handle) = d.interval_handle.take()
        && let Some(window) = web_sys::window()
    {
        window.clear_interval_with_handle(handle);
    }
    d.interval_closure = None;
}

fn start_interval(driver: &Rc<RefCell<Driver>>, interval_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let tick_driver = driver.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        let mut d = tick_driver.borrow_mut();
        d.session.on_spawn_tick();
        d.collect_events();
    });
    match window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval_ms as i32,
    ) {
        Ok(handle) => {
            let mut d = driver.borrow_mut();
            d.interval_handle = Some(handle);
            d.interval_closure = Some(closure);
        }
        Err(err) => log::error!("setInterval failed: {err:?}"),
    }
}

fn request_animation_frame(driver: Rc<RefCell<Driver>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let frame_driver = driver.clone();
    let closure = Closure::once(move |time: f64| {
        frame(frame_driver, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(handle) => driver.borrow_mut().raf_handle = Some(handle),
        Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
    }
    closure.forget();
}

fn frame(driver: Rc<RefCell<Driver>>, time: f64) {
    let still_racing = {
        let mut d = driver.borrow_mut();
        d.raf_handle = None;
        d.session.on_frame(time);
        d.collect_events();
        d.session.frame_running()
    };

    if still_racing {
        request_animation_frame(driver);
    } else {
        // Word complete or stopped: the spawn timer goes too
        cancel_interval(&driver);
    }
}

/// Page entry: logging and panic hook
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Spelling racer ready");
}
