//! Idle animation: blinking and expression cycling for a live head.
//!
//! An [`IdleAnimation`] owns two scheduler timers and the
//! [`IdleAnimationState`] they advance. The timers hold only weak references,
//! and dropping or disposing the animation cancels both.

use std::cell::Cell;
use std::f64::consts::PI;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use botforge_ir::{Primitive, SceneNode, Vec3};
use serde::{Deserialize, Serialize};

use crate::catalog::shape::{arc, ring};
use crate::scheduler::{Scheduler, TimerHandle};

/// Shortest allowed blink dwell.
pub const MIN_DWELL: Duration = Duration::from_millis(120);
/// Longest allowed blink dwell.
pub const MAX_DWELL: Duration = Duration::from_millis(200);
/// Eye height factor while blinking.
pub const BLINK_SQUASH: f64 = 0.1;

/// Facial expression, cycled round-robin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    /// Resting face.
    #[default]
    Neutral,
    /// Smiling, eyes narrowed.
    Happy,
    /// Wide eyes, round mouth.
    Surprised,
    /// Lowered eyes, frown.
    Angry,
}

/// Mouth constructions available to expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouthShape {
    /// The resting slot.
    Flat,
    /// Downward torus arc.
    Smile,
    /// Upward torus arc.
    Frown,
    /// Small full torus.
    Circle,
}

/// Eye and mouth parameters of an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Uniform eye scale.
    pub eye_scale: f64,
    /// Vertical eye offset.
    pub eye_lift: f64,
    /// Mouth construction.
    pub mouth: MouthShape,
}

impl Expression {
    /// Round-robin order.
    pub const CYCLE: [Expression; 4] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Surprised,
        Expression::Angry,
    ];

    /// The expression after this one.
    pub fn next(self) -> Expression {
        match self {
            Expression::Neutral => Expression::Happy,
            Expression::Happy => Expression::Surprised,
            Expression::Surprised => Expression::Angry,
            Expression::Angry => Expression::Neutral,
        }
    }

    /// Face parameters for this expression.
    pub fn pose(self) -> Pose {
        let (eye_scale, eye_lift, mouth) = match self {
            Expression::Neutral => (1.0, 0.0, MouthShape::Flat),
            Expression::Happy => (0.85, 0.01, MouthShape::Smile),
            Expression::Surprised => (1.25, 0.02, MouthShape::Circle),
            Expression::Angry => (0.9, -0.015, MouthShape::Frown),
        };
        Pose {
            eye_scale,
            eye_lift,
            mouth,
        }
    }
}

/// Transient face state of one head instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdleAnimationState {
    /// Eyes currently closed.
    pub blinking: bool,
    /// Current expression.
    pub expression: Expression,
}

/// Timer periods for one head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimings {
    /// Time from one blink to the next.
    pub blink_period: Duration,
    /// How long the eyes stay closed.
    pub blink_dwell: Duration,
    /// Time between expression changes.
    pub expression_period: Duration,
}

impl Default for IdleTimings {
    fn default() -> Self {
        Self {
            blink_period: Duration::from_millis(2000),
            blink_dwell: Duration::from_millis(150),
            expression_period: Duration::from_millis(5000),
        }
    }
}

impl IdleTimings {
    /// Timings with the dwell clamped into `MIN_DWELL..=MAX_DWELL` and the
    /// blink period kept longer than the dwell.
    pub fn new(blink_period: Duration, blink_dwell: Duration, expression_period: Duration) -> Self {
        let blink_dwell = clamp_dwell(blink_dwell);
        Self {
            blink_period: blink_period.max(blink_dwell * 2),
            blink_dwell,
            expression_period: expression_period.max(Duration::from_millis(1)),
        }
    }

    fn open_interval(&self) -> Duration {
        self.blink_period.saturating_sub(self.blink_dwell)
    }
}

/// Clamp a blink dwell into the allowed window.
pub fn clamp_dwell(dwell: Duration) -> Duration {
    dwell.clamp(MIN_DWELL, MAX_DWELL)
}

/// Identity of a mounted head instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    /// Fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "head#{}", self.0)
    }
}

/// What an idle timer just did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleChange {
    /// Eyes closed.
    BlinkClosed,
    /// Eyes reopened.
    BlinkOpened,
    /// Expression advanced to the given value.
    Expression(Expression),
}

/// Observer of idle state changes.
pub trait IdleListener {
    /// Called after `instance`'s state changed to `state`.
    fn idle_changed(&self, instance: InstanceId, state: IdleAnimationState, change: IdleChange);
}

/// Running idle animation of one head instance.
pub struct IdleAnimation {
    instance: InstanceId,
    state: Rc<Cell<IdleAnimationState>>,
    blink: Option<TimerHandle>,
    expression: Option<TimerHandle>,
}

impl IdleAnimation {
    /// Start both timers on `scheduler` with a fresh neutral state.
    pub fn start(scheduler: &Scheduler, timings: IdleTimings, listener: Option<Rc<dyn IdleListener>>) -> Self {
        let instance = InstanceId::next();
        let state = Rc::new(Cell::new(IdleAnimationState::default()));
        let listener: Option<Weak<dyn IdleListener>> = listener.as_ref().map(Rc::downgrade);

        let blink = {
            let state = Rc::downgrade(&state);
            let listener = listener.clone();
            scheduler.schedule("blink", timings.open_interval(), move || {
                let state = state.upgrade()?;
                let mut s = state.get();
                s.blinking = !s.blinking;
                state.set(s);
                let (change, next) = if s.blinking {
                    (IdleChange::BlinkClosed, timings.blink_dwell)
                } else {
                    (IdleChange::BlinkOpened, timings.open_interval())
                };
                notify(&listener, instance, s, change);
                Some(next)
            })
        };

        let expression = {
            let state = Rc::downgrade(&state);
            scheduler.schedule("expression", timings.expression_period, move || {
                let state = state.upgrade()?;
                let mut s = state.get();
                s.expression = s.expression.next();
                state.set(s);
                notify(&listener, instance, s, IdleChange::Expression(s.expression));
                Some(timings.expression_period)
            })
        };

        tracing::debug!(%instance, ?timings, "idle animation started");
        Self {
            instance,
            state,
            blink: Some(blink),
            expression: Some(expression),
        }
    }

    /// Identity of the head this animation belongs to.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Current state.
    pub fn state(&self) -> IdleAnimationState {
        self.state.get()
    }

    /// Whether the timers are still scheduled.
    pub fn is_running(&self) -> bool {
        self.blink.as_ref().is_some_and(TimerHandle::is_active)
            || self.expression.as_ref().is_some_and(TimerHandle::is_active)
    }

    /// Cancel both timers. The last state stays readable.
    pub fn dispose(&mut self) {
        if self.blink.is_some() || self.expression.is_some() {
            tracing::debug!(instance = %self.instance, "idle animation disposed");
        }
        self.blink.take();
        self.expression.take();
    }
}

impl Drop for IdleAnimation {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for IdleAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleAnimation")
            .field("instance", &self.instance)
            .field("state", &self.state.get())
            .field("running", &self.is_running())
            .finish()
    }
}

fn notify(
    listener: &Option<Weak<dyn IdleListener>>,
    instance: InstanceId,
    state: IdleAnimationState,
    change: IdleChange,
) {
    if let Some(listener) = listener.as_ref().and_then(Weak::upgrade) {
        listener.idle_changed(instance, state, change);
    }
}

/// Perturb the face of a freshly built head to show `state`.
///
/// Touches only the nodes named `eye_left`, `eye_right` and `mouth`; a
/// neutral, open-eyed state leaves the head unchanged.
pub fn apply(state: &IdleAnimationState, head: &mut SceneNode) {
    let pose = state.expression.pose();
    let squash = if state.blinking { BLINK_SQUASH } else { 1.0 };

    for name in ["eye_left", "eye_right"] {
        if let Some(eye) = head.find_mut(name) {
            let t = &mut eye.transform;
            t.scale = t
                .scale
                .mul(Vec3::new(pose.eye_scale, pose.eye_scale * squash, pose.eye_scale));
            t.position.y += pose.eye_lift;
        }
    }

    if let Some(mouth) = head.find_mut("mouth") {
        reshape_mouth(mouth, pose.mouth);
    }
}

fn reshape_mouth(mouth: &mut SceneNode, shape: MouthShape) {
    let Some(mesh) = mouth.mesh.as_mut() else {
        return;
    };
    let Primitive::Box { size } = mesh.primitive else {
        return;
    };
    let (width, thickness) = (size.x, size.y);
    let y = mouth.transform.position.y;
    match shape {
        MouthShape::Flat => {}
        MouthShape::Smile => {
            mesh.primitive = arc(width / 2.0, thickness / 2.0, PI);
            mouth.transform.rotation = Vec3::new(0.0, 0.0, PI);
            mouth.transform.position.y = y + width / 4.0;
        }
        MouthShape::Frown => {
            mesh.primitive = arc(width / 2.0, thickness / 2.0, PI);
            mouth.transform.position.y = y - width / 4.0;
        }
        MouthShape::Circle => {
            mesh.primitive = ring(width * 0.2, thickness / 2.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Region};
    use crate::color::Rgb;
    use crate::palette::Palette;
    use crate::settings::Settings;
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<(InstanceId, Duration, IdleChange)>>,
        clock: RefCell<Option<Scheduler>>,
    }

    impl IdleListener for Recorder {
        fn idle_changed(&self, instance: InstanceId, _state: IdleAnimationState, change: IdleChange) {
            let now = self.clock.borrow().as_ref().map(Scheduler::now).unwrap_or_default();
            self.events.borrow_mut().push((instance, now, change));
        }
    }

    fn recorder(sched: &Scheduler) -> Rc<Recorder> {
        let r = Rc::new(Recorder::default());
        *r.clock.borrow_mut() = Some(sched.clone());
        r
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn head(style: i64) -> SceneNode {
        Catalog::standard().build(Palette::standard(), Region::Head, style, Rgb::SKY, None)
    }

    #[test]
    fn expressions_cycle_round_robin() {
        let mut e = Expression::Neutral;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(e);
            e = e.next();
        }
        assert_eq!(seen, Expression::CYCLE);
        assert_eq!(e, Expression::Neutral);
    }

    #[test]
    fn dwell_is_clamped() {
        assert_eq!(clamp_dwell(ms(10)), MIN_DWELL);
        assert_eq!(clamp_dwell(ms(999)), MAX_DWELL);
        assert_eq!(clamp_dwell(ms(150)), ms(150));
        let t = IdleTimings::new(ms(100), ms(180), ms(5000));
        assert!(t.blink_period > t.blink_dwell);
    }

    #[test]
    fn every_blinking_head_reopens_within_dwell() {
        let settings = Settings::default();
        let heads = Catalog::standard().variants(Region::Head);
        assert!(heads.iter().any(|v| v.blink_period.is_some()));
        for variant in heads.iter().filter(|v| v.blink_period.is_some()) {
            let sched = Scheduler::new();
            let rec = recorder(&sched);
            let timings = settings.idle_timings(variant.blink_period);
            let anim = IdleAnimation::start(&sched, timings, Some(rec.clone()));

            for _ in 0..600 {
                sched.advance(ms(16));
            }
            let events = rec.events.borrow();
            let blinks: Vec<_> = events
                .iter()
                .filter(|(_, _, c)| matches!(c, IdleChange::BlinkClosed | IdleChange::BlinkOpened))
                .collect();
            assert!(blinks.len() >= 4, "{} blinked {} times", variant.name, blinks.len() / 2);
            for pair in blinks.chunks_exact(2) {
                assert_eq!(pair[0].2, IdleChange::BlinkClosed);
                assert_eq!(pair[1].2, IdleChange::BlinkOpened);
                let dwell = pair[1].1 - pair[0].1;
                assert!(dwell >= MIN_DWELL && dwell <= MAX_DWELL, "{}: dwell {dwell:?}", variant.name);
            }
            let closes: Vec<_> = blinks.iter().step_by(2).map(|e| e.1).collect();
            for gap in closes.windows(2) {
                assert_eq!(gap[1] - gap[0], timings.blink_period, "{}", variant.name);
            }
            assert!(anim.is_running());
        }
    }

    #[test]
    fn expression_advances_on_its_period() {
        let sched = Scheduler::new();
        let anim = IdleAnimation::start(&sched, IdleTimings::default(), None);
        sched.advance(ms(4999));
        assert_eq!(anim.state().expression, Expression::Neutral);
        sched.advance(ms(1));
        assert_eq!(anim.state().expression, Expression::Happy);
        sched.advance(ms(15_000));
        assert_eq!(anim.state().expression, Expression::Neutral);
    }

    #[test]
    fn disposed_instance_never_changes_again() {
        let sched = Scheduler::new();
        let rec = recorder(&sched);
        let mut first = IdleAnimation::start(&sched, IdleTimings::default(), Some(rec.clone()));
        let first_id = first.instance();
        sched.advance(ms(6000));
        first.dispose();
        let frozen = first.state();
        assert!(!first.is_running());

        let second = IdleAnimation::start(&sched, IdleTimings::default(), Some(rec.clone()));
        let mark = sched.now();
        sched.advance(ms(30_000));

        assert_eq!(first.state(), frozen);
        assert_eq!(sched.pending(), 2);
        let events = rec.events.borrow();
        assert!(events.iter().all(|(id, at, _)| *id != first_id || *at <= mark));
        assert!(events.iter().any(|(id, _, _)| *id == second.instance()));
    }

    #[test]
    fn dropping_animation_cancels_timers() {
        let sched = Scheduler::new();
        let anim = IdleAnimation::start(&sched, IdleTimings::default(), None);
        assert_eq!(sched.pending(), 2);
        drop(anim);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn resting_state_leaves_head_untouched() {
        let original = head(0);
        let mut perturbed = original.clone();
        apply(&IdleAnimationState::default(), &mut perturbed);
        assert_eq!(perturbed, original);
    }

    #[test]
    fn blink_squashes_only_the_eyes() {
        let original = head(1);
        let mut h = original.clone();
        apply(
            &IdleAnimationState {
                blinking: true,
                expression: Expression::Neutral,
            },
            &mut h,
        );
        for eye in ["eye_left", "eye_right"] {
            assert_eq!(h.find(eye).unwrap().transform.scale.y, BLINK_SQUASH);
        }
        assert_eq!(h.find("mouth"), original.find("mouth"));
        assert_eq!(h.find("shell"), original.find("shell"));
    }

    #[test]
    fn mouth_shapes_follow_expression() {
        let expect = [
            (Expression::Happy, "torus", Some(PI)),
            (Expression::Angry, "torus", Some(PI)),
            (Expression::Surprised, "torus", Some(std::f64::consts::TAU)),
            (Expression::Neutral, "box", None),
        ];
        for (expression, kind, sweep) in expect {
            let mut h = head(2);
            apply(
                &IdleAnimationState {
                    blinking: false,
                    expression,
                },
                &mut h,
            );
            let mouth = h.find("mouth").and_then(|n| n.mesh.as_ref()).unwrap();
            assert_eq!(mouth.primitive.kind(), kind, "{expression:?}");
            if let (Primitive::Torus { arc, .. }, Some(sweep)) = (&mouth.primitive, sweep) {
                assert_eq!(*arc, sweep);
            }
            assert!(mouth.primitive.is_well_formed());
        }
    }

    proptest! {
        #[test]
        fn every_head_animates_to_finite_shapes(style in 0i64..5, blinking: bool, e in 0usize..4) {
            let mut h = head(style);
            apply(&IdleAnimationState { blinking, expression: Expression::CYCLE[e] }, &mut h);
            for node in h.walk() {
                prop_assert!(node.transform.is_finite());
                if let Some(mesh) = &node.mesh {
                    prop_assert!(mesh.primitive.is_well_formed());
                }
            }
        }

        #[test]
        fn dwell_always_in_window(period_ms in 0u64..10_000, dwell_ms in 0u64..10_000) {
            let t = IdleTimings::new(ms(period_ms), ms(dwell_ms), ms(5000));
            prop_assert!(t.blink_dwell >= MIN_DWELL && t.blink_dwell <= MAX_DWELL);
            prop_assert!(t.blink_period > t.blink_dwell);
        }
    }
}
