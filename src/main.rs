//! Cat overlay entry point
//!
//! Wires browser events to the overlay runtime on wasm32. Natively it runs a
//! scripted headless session through the same runtime.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_overlay {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use cat_overlay::Overlay;
    use cat_overlay::platform::web::{DomSurface, cat_id_from_event};
    use cat_overlay::platform::{present, sync_bounds};

    /// Timer pump period; timers fire at their due time regardless
    const TIMER_PUMP_MS: i32 = 25;

    /// Overlay plus the page it draws on
    struct App {
        overlay: Overlay,
        surface: DomSurface,
    }

    impl App {
        fn pump(&mut self) {
            let now = self.surface.now();
            self.overlay.run_timers(now);
            present(&mut self.overlay, &mut self.surface);
        }

        fn frame(&mut self, time: f64) {
            sync_bounds(&mut self.overlay, &self.surface);
            self.overlay.run_timers(time);
            self.overlay.on_frame(time);
            present(&mut self.overlay, &mut self.surface);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Cat overlay starting...");

        let Some(surface) = DomSurface::attach() else {
            web_sys::console::error_1(&"No window or document, overlay disabled".into());
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        let config = surface.load_config();
        let seed = js_sys::Date::now() as u64;
        let mut overlay = Overlay::new(config, seed);
        sync_bounds(&mut overlay, &surface);
        overlay.start(surface.now());
        log::info!("Seed: {}", seed);

        let app = Rc::new(RefCell::new(App { overlay, surface }));
        app.borrow_mut().pump();

        setup_input_handlers(&window, app.clone());
        setup_timer_pump(&window, app.clone());
        request_animation_frame(app);
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Charge key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if !a.overlay.config().is_charge_key(&event.code()) {
                    return;
                }
                event.prevent_default();
                let now = a.surface.now();
                a.overlay.on_key_down(now);
                let a = &mut *a;
                present(&mut a.overlay, &mut a.surface);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Charge key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if !a.overlay.config().is_charge_key(&event.code()) {
                    return;
                }
                event.prevent_default();
                let now = a.surface.now();
                a.overlay.on_key_up(now);
                let a = &mut *a;
                present(&mut a.overlay, &mut a.surface);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Cat clicks stay inside the overlay and play a wiggle
        let layer = app.borrow().surface.cats_layer().cloned();
        if let Some(layer) = layer {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(id) = cat_id_from_event(&event) else {
                    return;
                };
                event.stop_propagation();
                let mut a = app.borrow_mut();
                let now = a.surface.now();
                a.overlay.on_cat_click(id, now);
            });
            let _ =
                layer.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer position in client coordinates, matching the area rectangle
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pointer = glam::Vec2::new(event.client_x() as f32, event.client_y() as f32);
                app.borrow_mut().overlay.on_pointer_move(pointer);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_timer_pump(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().pump();
        });
        if window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TIMER_PUMP_MS,
            )
            .is_err()
        {
            log::warn!("setInterval unavailable, timers run on frames only");
        }
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            overlay_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn overlay_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_overlay::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cat overlay (native) starting...");
    log::info!("Native mode runs a headless session - build for wasm32 to use the page");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cat_overlay::platform::{Surface, present, sync_bounds};
    use cat_overlay::sim::{Bounds, Cat, OverlayMode, Particle, ParticlePose};
    use cat_overlay::{Overlay, OverlayConfig};
    use glam::Vec2;
    use std::collections::HashSet;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const SEED: u64 = 0x5eed;

    /// Surface that only counts what a page would show
    #[derive(Default)]
    struct CountingSurface {
        cats: HashSet<u32>,
        particles: HashSet<u32>,
        fill: u32,
    }

    impl Surface for CountingSurface {
        fn area(&self) -> Option<Bounds> {
            Some(Bounds::from_size(1280.0, 720.0))
        }
        fn attach_cat(&mut self, cat: &Cat) {
            self.cats.insert(cat.id);
        }
        fn place_cat(&mut self, _id: u32, _pos: Vec2, _scale: f32) {}
        fn detach_cat(&mut self, id: u32) {
            self.cats.remove(&id);
        }
        fn attach_particle(&mut self, particle: &Particle) {
            self.particles.insert(particle.id);
        }
        fn place_particle(&mut self, _id: u32, _pose: &ParticlePose) {}
        fn detach_particle(&mut self, id: u32) {
            self.particles.remove(&id);
        }
        fn set_fill(&mut self, percent: u32) {
            self.fill = percent;
        }
        fn set_mode(&mut self, mode: OverlayMode) {
            log::info!("Mode: {:?}", mode);
        }
        fn set_banner(&mut self, visible: bool) {
            log::info!("Banner {}", if visible { "shown" } else { "hidden" });
        }
        fn set_flash(&mut self, _visible: bool) {}
        fn speak(&mut self, phrase: &str) {
            log::info!("Would say: {:?}", phrase);
        }
    }

    /// Frames from `from` to `to` at display rate, timers pumped first
    fn advance(overlay: &mut Overlay, surface: &mut CountingSurface, from: f64, to: f64) {
        let mut t = from;
        while t < to {
            t = (t + FRAME_MS).min(to);
            overlay.run_timers(t);
            overlay.on_frame(t);
            present(overlay, surface);
        }
    }

    pub fn run() {
        let mut surface = CountingSurface::default();
        let mut overlay = Overlay::new(OverlayConfig::default(), SEED);
        sync_bounds(&mut overlay, &surface);
        overlay.start(0.0);
        overlay.on_frame(0.0);
        present(&mut overlay, &mut surface);

        // A short tap, then a full hold
        advance(&mut overlay, &mut surface, 0.0, 1000.0);
        overlay.on_key_down(1000.0);
        advance(&mut overlay, &mut surface, 1000.0, 1500.0);
        overlay.on_key_up(1500.0);
        log::info!("Tap released at {}%", surface.fill);
        advance(&mut overlay, &mut surface, 1500.0, 3000.0);

        overlay.on_key_down(3000.0);
        advance(&mut overlay, &mut surface, 3000.0, 4300.0);
        overlay.on_key_up(4300.0);
        present(&mut overlay, &mut surface);
        log::info!(
            "Hold released at {}%, {} particles on screen",
            surface.fill,
            surface.particles.len()
        );

        advance(&mut overlay, &mut surface, 4300.0, 20_000.0);
        let state = overlay.state();
        log::info!(
            "After 20s: {} cats, {} particles, {:?}, {} celebration(s)",
            surface.cats.len(),
            surface.particles.len(),
            state.hold.lock_state(),
            state.celebration.runs
        );

        overlay.teardown();
        present(&mut overlay, &mut surface);
        log::info!("Teardown left {} cats on screen", surface.cats.len());
    }
}
