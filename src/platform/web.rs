//! Browser surface backed by the page DOM
//!
//! Every element lookup is optional: a page without the meter, banner or
//! cat layer still runs, it just shows less.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Window};

use super::Surface;
use crate::config::OverlayConfig;
use crate::sim::{Bounds, Cat, OverlayMode, Particle, ParticlePose};
use crate::{css_hex, shade};

pub const GAME_AREA_ID: &str = "gameArea";
pub const CATS_LAYER_ID: &str = "catsLayer";
pub const FILL_ID: &str = "spaceFill";
pub const BANNER_ID: &str = "surpriseBanner";
/// Attribute on the game area carrying a JSON config override
pub const CONFIG_ATTRIBUTE: &str = "data-overlay-config";
/// Attribute tying a cat element back to its id
pub const CAT_ID_ATTRIBUTE: &str = "data-cat-id";

/// Stacking order of the unlock glow
const FLASH_LAYER: i32 = 100;

pub struct DomSurface {
    window: Window,
    document: Document,
    area: Option<Element>,
    cats_layer: Option<HtmlElement>,
    fill: Option<HtmlElement>,
    banner: Option<Element>,
    cats: HashMap<u32, HtmlElement>,
    particles: HashMap<u32, HtmlElement>,
    flash: Option<HtmlElement>,
    last_fill: Option<u32>,
}

impl DomSurface {
    /// Bind to the current page; `None` only without a window or document
    pub fn attach() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let area = document.get_element_by_id(GAME_AREA_ID);
        let cats_layer = html_by_id(&document, CATS_LAYER_ID);
        let fill = html_by_id(&document, FILL_ID);
        let banner = document.get_element_by_id(BANNER_ID);

        for (id, found) in [
            (GAME_AREA_ID, area.is_some()),
            (CATS_LAYER_ID, cats_layer.is_some()),
            (FILL_ID, fill.is_some()),
            (BANNER_ID, banner.is_some()),
        ] {
            if !found {
                log::warn!("#{} not found, related visuals disabled", id);
            }
        }

        // Cats ignore the pointer until the scene unlocks
        if let Some(layer) = &cats_layer {
            let _ = layer.style().set_property("pointer-events", "none");
        }

        Some(Self {
            window,
            document,
            area,
            cats_layer,
            fill,
            banner,
            cats: HashMap::new(),
            particles: HashMap::new(),
            flash: None,
            last_fill: None,
        })
    }

    /// Config override from the game area attribute, defaults otherwise
    pub fn load_config(&self) -> OverlayConfig {
        let Some(json) = self
            .area
            .as_ref()
            .and_then(|el| el.get_attribute(CONFIG_ATTRIBUTE))
        else {
            return OverlayConfig::default();
        };
        match OverlayConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded overlay config override");
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                OverlayConfig::default()
            }
        }
    }

    /// Container that receives cat clicks
    pub fn cats_layer(&self) -> Option<&HtmlElement> {
        self.cats_layer.as_ref()
    }

    pub fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn create_div(&self) -> Option<HtmlElement> {
        self.document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }
}

impl Surface for DomSurface {
    fn area(&self) -> Option<Bounds> {
        let rect = self.area.as_ref()?.get_bounding_client_rect();
        Some(Bounds::new(
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
        ))
    }

    fn viewport(&self) -> Option<Bounds> {
        let width = self.window.inner_width().ok()?.as_f64()?;
        let height = self.window.inner_height().ok()?.as_f64()?;
        Some(Bounds::from_size(width as f32, height as f32))
    }

    fn attach_cat(&mut self, cat: &Cat) {
        let Some(layer) = &self.cats_layer else {
            return;
        };
        let Some(el) = self.create_div() else {
            return;
        };
        el.set_class_name("cat");
        let _ = el.set_attribute(CAT_ID_ATTRIBUTE, &cat.id.to_string());
        let size = format!("{}px", cat.size.round());
        let face = format!(
            "radial-gradient(circle at 30% 30%, #fff 6%, rgba(255,255,255,0) 7%), \
             radial-gradient(circle at 70% 30%, #fff 6%, rgba(255,255,255,0) 7%), \
             linear-gradient({}, {})",
            css_hex(cat.color),
            css_hex(shade(cat.color, -12))
        );
        set_styles(
            &el,
            &[
                ("width", size.as_str()),
                ("height", size.as_str()),
                ("background-image", face.as_str()),
                ("left", format!("{}px", cat.pos.x.round()).as_str()),
                ("top", format!("{}px", cat.pos.y.round()).as_str()),
            ],
        );
        if layer.append_child(&el).is_ok() {
            self.cats.insert(cat.id, el);
        }
    }

    fn place_cat(&mut self, id: u32, pos: Vec2, scale: f32) {
        let Some(el) = self.cats.get(&id) else {
            return;
        };
        let transform = if scale == 1.0 {
            String::new()
        } else {
            format!("scale({})", scale)
        };
        set_styles(
            el,
            &[
                ("left", format!("{}px", pos.x.round()).as_str()),
                ("top", format!("{}px", pos.y.round()).as_str()),
                ("transform", transform.as_str()),
            ],
        );
    }

    fn detach_cat(&mut self, id: u32) {
        if let Some(el) = self.cats.remove(&id) {
            el.remove();
        }
    }

    fn attach_particle(&mut self, particle: &Particle) {
        let Some(body) = self.body() else {
            return;
        };
        let Some(el) = self.create_div() else {
            return;
        };
        el.set_text_content(Some(&particle.glyph.to_string()));
        let pose = particle.pose(particle.born_ms);
        // Sparkles anchor to the viewport bottom
        let (edge, offset) = match particle.bottom {
            Some(bottom) => ("bottom", bottom),
            None => ("top", particle.origin.y),
        };
        set_styles(
            &el,
            &[
                ("position", "fixed"),
                ("left", format!("{}px", particle.origin.x).as_str()),
                (edge, format!("{}px", offset).as_str()),
                ("font-size", format!("{}px", particle.size).as_str()),
                ("pointer-events", "none"),
                ("z-index", particle.layer().to_string().as_str()),
                ("opacity", pose.opacity.to_string().as_str()),
                ("transform", pose_transform(&pose).as_str()),
            ],
        );
        if body.append_child(&el).is_ok() {
            self.particles.insert(particle.id, el);
        }
    }

    fn place_particle(&mut self, id: u32, pose: &ParticlePose) {
        if let Some(el) = self.particles.get(&id) {
            set_styles(
                el,
                &[
                    ("transform", pose_transform(pose).as_str()),
                    ("opacity", pose.opacity.to_string().as_str()),
                ],
            );
        }
    }

    fn detach_particle(&mut self, id: u32) {
        if let Some(el) = self.particles.remove(&id) {
            el.remove();
        }
    }

    fn set_fill(&mut self, percent: u32) {
        if self.last_fill == Some(percent) {
            return;
        }
        if let Some(fill) = &self.fill {
            let _ = fill.style().set_property("width", &format!("{}%", percent));
            self.last_fill = Some(percent);
        }
    }

    fn set_mode(&mut self, mode: OverlayMode) {
        if let Some(body) = self.body() {
            let classes = body.class_list();
            let _ = if mode == OverlayMode::Holding {
                classes.add_1("holding")
            } else {
                classes.remove_1("holding")
            };
        }
        if let Some(layer) = &self.cats_layer {
            let classes = layer.class_list();
            if mode == OverlayMode::Unlocked {
                let _ = classes.remove_1("locked");
                let _ = classes.add_1("unlocked");
                let _ = layer.style().set_property("pointer-events", "auto");
            } else {
                let _ = classes.add_1("locked");
            }
        }
    }

    fn set_banner(&mut self, visible: bool) {
        if let Some(banner) = &self.banner {
            let classes = banner.class_list();
            let _ = if visible {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
        }
    }

    fn set_flash(&mut self, visible: bool) {
        if !visible {
            if let Some(el) = self.flash.take() {
                el.remove();
            }
            return;
        }
        if self.flash.is_some() {
            return;
        }
        let (Some(body), Some(el)) = (self.body(), self.create_div()) else {
            return;
        };
        set_styles(
            &el,
            &[
                ("position", "fixed"),
                ("inset", "0"),
                (
                    "background",
                    "radial-gradient(circle at 30% 20%, rgba(255,220,120,.08), rgba(0,0,0,0))",
                ),
                ("pointer-events", "none"),
                ("z-index", FLASH_LAYER.to_string().as_str()),
            ],
        );
        if body.append_child(&el).is_ok() {
            self.flash = Some(el);
        }
    }

    fn vibrate(&mut self, ms: u32) {
        // Unsupported browsers simply return false
        let _ = self.window.navigator().vibrate_with_duration(ms);
    }

    fn speak(&mut self, phrase: &str) {
        let Ok(synth) = self.window.speech_synthesis() else {
            log::debug!("Speech synthesis unavailable");
            return;
        };
        if let Ok(utterance) = web_sys::SpeechSynthesisUtterance::new_with_text(phrase) {
            synth.speak(&utterance);
        }
    }
}

/// Id of the cat an event landed on, if any
pub fn cat_id_from_event(event: &Event) -> Option<u32> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target
        .closest(".cat")
        .ok()??
        .get_attribute(CAT_ID_ATTRIBUTE)?
        .parse()
        .ok()
}

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

fn set_styles(el: &HtmlElement, props: &[(&str, &str)]) {
    let style = el.style();
    for (name, value) in props {
        let _ = style.set_property(name, value);
    }
}

fn pose_transform(pose: &ParticlePose) -> String {
    format!(
        "translate({}px, {}px) rotate({}deg)",
        pose.offset.x, pose.offset.y, pose.rotation_deg
    )
}
