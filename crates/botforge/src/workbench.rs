//! The live configurator: configuration state, the mounted head and its
//! idle timers, driven one frame at a time by the host clock.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use botforge_ir::SceneNode;

use crate::assembler::Assembler;
use crate::catalog::{Catalog, Region};
use crate::config::{ConfigState, Configuration};
use crate::idle::{IdleAnimation, IdleAnimationState, IdleListener, InstanceId};
use crate::scheduler::Scheduler;
use crate::settings::Settings;
use crate::share;
use crate::store::{self, ConfigStore};

struct MountedHead {
    style: usize,
    animation: IdleAnimation,
}

/// A configurator session.
///
/// Edit the configuration through [`state_mut`](Self::state_mut) and call
/// [`frame`](Self::frame) once per rendered frame. A head-style change
/// mounts a new head instance with a fresh idle state; the previous
/// instance's timers are cancelled.
pub struct Workbench {
    state: ConfigState,
    assembler: Assembler,
    settings: Settings,
    scheduler: Scheduler,
    head: Option<MountedHead>,
    idle_listener: Option<Rc<dyn IdleListener>>,
}

impl Workbench {
    /// Session over the standard catalog configured by `settings`.
    pub fn new(settings: Settings) -> Self {
        let catalog = Catalog::standard();
        let initial = Configuration::default().with_color(settings.default_color());
        Self {
            state: ConfigState::with_initial(catalog, initial),
            assembler: Assembler::new(catalog, settings.palette()),
            settings,
            scheduler: Scheduler::new(),
            head: None,
            idle_listener: None,
        }
    }

    /// Observe idle changes of every head mounted from now on.
    pub fn with_idle_listener(mut self, listener: Rc<dyn IdleListener>) -> Self {
        self.idle_listener = Some(listener);
        self
    }

    /// Configuration state.
    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    /// Configuration state, for applying actions.
    pub fn state_mut(&mut self) -> &mut ConfigState {
        &mut self.state
    }

    /// Current configuration.
    pub fn config(&self) -> Configuration {
        self.state.current()
    }

    /// Assembler used for every frame.
    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    /// The timer queue driving the idle animation.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Identity of the mounted head, if a frame has been built.
    pub fn head_instance(&self) -> Option<InstanceId> {
        self.head.as_ref().map(|h| h.animation.instance())
    }

    /// Idle state of the mounted head.
    pub fn idle_state(&self) -> IdleAnimationState {
        self.head
            .as_ref()
            .map(|h| h.animation.state())
            .unwrap_or_default()
    }

    /// Advance the clock by `dt` and build the tree to draw.
    pub fn frame(&mut self, dt: Duration) -> SceneNode {
        let config = self.state.current();
        self.mount_head(config.style(Region::Head));
        let fired = self.scheduler.advance(dt);
        if fired > 0 {
            tracing::trace!(fired, now = ?self.scheduler.now(), "idle timers fired");
        }
        self.assembler.assemble_animated(&config, &self.idle_state())
    }

    /// Remount the head even if its style is unchanged, restarting idle
    /// state from neutral.
    pub fn remount(&mut self) {
        self.head = None;
        let style = self.state.current().style(Region::Head);
        self.mount_head(style);
    }

    fn mount_head(&mut self, style: usize) {
        if self.head.as_ref().is_some_and(|h| h.style == style) {
            return;
        }
        // cancel the old timers before scheduling new ones
        if let Some(mut old) = self.head.take() {
            old.animation.dispose();
        }
        let variant = self.state.catalog().variant(Region::Head, style as i64);
        let timings = self.settings.idle_timings(variant.blink_period);
        let animation = IdleAnimation::start(&self.scheduler, timings, self.idle_listener.clone());
        tracing::debug!(instance = %animation.instance(), head = variant.name, "head mounted");
        self.head = Some(MountedHead { style, animation });
    }

    /// Save the current configuration under `session`.
    pub fn save(&self, store: &mut dyn ConfigStore, session: &str) -> store::Result<()> {
        store.save(session, &self.state.current())
    }

    /// Replace the configuration with the one saved under `session`.
    ///
    /// Returns whether the configuration changed. A session that was never
    /// saved leaves the configuration alone; an unreadable save loads the
    /// defaults.
    pub fn restore(&mut self, store: &dyn ConfigStore, session: &str) -> bool {
        match store.load(session, self.state.catalog()) {
            Ok(Some(config)) => self.state.load(config),
            Ok(None) => {
                tracing::debug!(session, "nothing saved, keeping current configuration");
                false
            }
            Err(err) => {
                tracing::warn!(session, %err, "could not load saved configuration, using defaults");
                self.state.load(Configuration::default())
            }
        }
    }

    /// Share link for the current configuration.
    pub fn share_url(&self, base: &str) -> share::Result<String> {
        share::share_url(base, &self.state.current())
    }

    /// Apply the configuration carried by a share link, if any.
    ///
    /// A link without a token leaves the configuration alone; a corrupt
    /// token loads the defaults.
    pub fn open_link(&mut self, url: &str) -> bool {
        match share::token_from_url(url) {
            Some(token) => {
                let config = share::decode_or_default(token, self.state.catalog());
                self.state.load(config)
            }
            None => false,
        }
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for Workbench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workbench")
            .field("state", &self.state)
            .field("head", &self.head_instance())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessories::HatStyle;
    use crate::idle::{Expression, IdleChange, BLINK_SQUASH};
    use crate::store::MemoryStore;
    use std::cell::RefCell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[derive(Default)]
    struct Events(RefCell<Vec<(InstanceId, IdleChange)>>);

    impl IdleListener for Events {
        fn idle_changed(&self, instance: InstanceId, _state: IdleAnimationState, change: IdleChange) {
            self.0.borrow_mut().push((instance, change));
        }
    }

    fn eye_height(tree: &SceneNode) -> f64 {
        tree.find("eye_left").map(|e| e.transform.scale.y).unwrap_or_default()
    }

    #[test]
    fn first_frame_mounts_a_head() {
        let mut bench = Workbench::default();
        assert_eq!(bench.head_instance(), None);
        let tree = bench.frame(Duration::ZERO);
        assert!(bench.head_instance().is_some());
        assert_eq!(bench.scheduler().pending(), 2);
        assert_eq!(tree.children.len(), 7);
    }

    #[test]
    fn head_blinks_on_its_own_period() {
        // Cube blinks every 2000 ms with the default 150 ms dwell
        let mut bench = Workbench::default();
        let open = bench.frame(Duration::ZERO);
        assert_eq!(eye_height(&open), 1.0);

        let closed = bench.frame(ms(1850));
        assert!(bench.idle_state().blinking);
        assert!((eye_height(&closed) - BLINK_SQUASH).abs() < 1e-12);

        bench.frame(ms(150));
        assert!(!bench.idle_state().blinking);
    }

    #[test]
    fn head_change_remounts_and_cancels_old_timers() {
        let events = Rc::new(Events::default());
        let mut bench = Workbench::default().with_idle_listener(events.clone());
        bench.frame(ms(1900));
        let first = bench.head_instance().unwrap();
        assert!(bench.idle_state().blinking);

        bench.state_mut().cycle_style(Region::Head);
        bench.frame(Duration::ZERO);
        let second = bench.head_instance().unwrap();
        assert_ne!(first, second);
        assert_eq!(bench.idle_state(), IdleAnimationState::default());
        assert_eq!(bench.scheduler().pending(), 2);

        let mark = events.0.borrow().len();
        bench.frame(ms(20_000));
        let later = events.0.borrow();
        assert!(later.len() > mark);
        assert!(later[mark..].iter().all(|(id, _)| *id == second));
    }

    #[test]
    fn other_edits_keep_the_head_instance() {
        let mut bench = Workbench::default();
        bench.frame(Duration::ZERO);
        let instance = bench.head_instance();
        bench.state_mut().set_color("#ff0000").unwrap();
        bench.state_mut().set_hat(Some(HatStyle::Topper));
        bench.state_mut().cycle_style(Region::Legs);
        bench.frame(ms(16));
        assert_eq!(bench.head_instance(), instance);
    }

    #[test]
    fn remount_resets_idle_state() {
        let mut bench = Workbench::default();
        bench.frame(ms(5000));
        assert_ne!(bench.idle_state().expression, Expression::Neutral);
        let before = bench.head_instance();
        bench.remount();
        assert_ne!(bench.head_instance(), before);
        assert_eq!(bench.idle_state(), IdleAnimationState::default());
    }

    #[test]
    fn settings_override_blink_period() {
        let settings = Settings::parse("[idle]\nblink_period_ms = 600").unwrap();
        let mut bench = Workbench::new(settings);
        bench.frame(Duration::ZERO);
        bench.frame(ms(450));
        assert!(bench.idle_state().blinking);
    }

    #[test]
    fn settings_default_color_applies() {
        let settings = Settings::parse("[defaults]\ncolor = \"#123456\"").unwrap();
        let bench = Workbench::new(settings);
        assert_eq!(bench.config().color().to_hex(), "#123456");
    }

    #[test]
    fn save_restore_and_links() {
        let mut store = MemoryStore::new();
        let mut bench = Workbench::default();
        bench.state_mut().set_style(Region::Body, 3);
        bench.save(&mut store, "main").unwrap();
        let saved = bench.config();

        bench.state_mut().reset();
        assert!(bench.restore(&store, "main"));
        assert_eq!(bench.config(), saved);

        let url = bench.share_url("https://bots.example/").unwrap();
        let mut other = Workbench::default();
        assert!(other.open_link(&url));
        assert_eq!(other.config(), saved);
        assert!(!other.open_link("https://bots.example/"));
        other.open_link("https://bots.example/?config=%%%");
        assert_eq!(other.config(), Configuration::default());
    }

    #[test]
    fn restoring_an_unsaved_session_keeps_the_robot() {
        let mut store = MemoryStore::new();
        let mut bench = Workbench::default();
        bench.state_mut().set_style(Region::Arms, 2);
        bench.state_mut().set_color("#abcdef").unwrap();
        let edited = bench.config();

        assert!(!bench.restore(&store, "never-saved"));
        assert_eq!(bench.config(), edited);

        store.insert_raw("broken", r#"{"headStyle":"big"}"#).unwrap();
        assert!(bench.restore(&store, "broken"));
        assert_eq!(bench.config(), Configuration::default());
    }
}
