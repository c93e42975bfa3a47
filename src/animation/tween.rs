//! Time-based property interpolation over scene nodes.
//!
//! A [`Tween`] moves one property of one node from its value at start time
//! to a target over a duration. Tweens can yoyo, repeat, chain into a
//! follow-up tween and run a completion action. A single
//! [`TweenScheduler::advance`] call per frame steps every active tween.

use std::time::Duration;

use glam::Vec3;

use super::easing::EasingFunction;
use crate::scene::{Node, NodeId, SceneGraph};

/// Handle to a started tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

/// A property value: either a target or a captured start value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    /// Node scale.
    Scale(Vec3),
    /// Node position.
    Position(Vec3),
    /// Node position, Y component only.
    PositionY(f32),
    /// Material opacity of a mesh node.
    Opacity(f32),
}

impl TweenValue {
    fn read(self, scene: &SceneGraph, node: NodeId) -> Option<Self> {
        let n = scene.node(node)?;
        Some(match self {
            Self::Scale(_) => Self::Scale(n.transform.scale),
            Self::Position(_) => Self::Position(n.transform.position),
            Self::PositionY(_) => Self::PositionY(n.transform.position.y),
            Self::Opacity(_) => Self::Opacity(n.material()?.opacity),
        })
    }

    fn write(self, scene: &mut SceneGraph, node: NodeId) {
        let Some(n) = scene.node_mut(node) else {
            return;
        };
        match self {
            Self::Scale(v) => n.transform.scale = v,
            Self::Position(v) => n.transform.position = v,
            Self::PositionY(y) => n.transform.position.y = y,
            Self::Opacity(o) => {
                if let Some(m) = n.material_mut() {
                    m.opacity = o;
                }
            }
        }
    }

    fn lerp(self, to: Self, t: f32) -> Self {
        match (self, to) {
            (Self::Scale(a), Self::Scale(b)) => Self::Scale(a.lerp(b, t)),
            (Self::Position(a), Self::Position(b)) => Self::Position(a.lerp(b, t)),
            (Self::PositionY(a), Self::PositionY(b)) => Self::PositionY(a + (b - a) * t),
            (Self::Opacity(a), Self::Opacity(b)) => Self::Opacity(a + (b - a) * t),
            // Mismatched kinds never pair up: `from` is read with `to`'s kind.
            _ => to,
        }
    }
}

/// How many extra times a tween plays after the first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once plus `n` repeats.
    Count(u32),
    /// Play once, no repeats.
    #[default]
    Never,
    /// Repeat forever.
    Infinite,
}

/// Scene write performed when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    /// Hide the node's material and reset its opacity to 1 so the surface
    /// is ready to be shown again.
    HideAndResetOpacity,
}

/// A tween description, not yet started.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    node: NodeId,
    to: TweenValue,
    duration: Duration,
    easing: EasingFunction,
    yoyo: bool,
    repeat: Repeat,
    chain: Vec<Tween>,
    on_complete: Option<CompletionAction>,
}

impl Tween {
    /// Tween `node` toward `to` over `duration`, linear, playing once.
    #[must_use]
    pub fn new(node: NodeId, to: TweenValue, duration: Duration) -> Self {
        Self {
            node,
            to,
            duration,
            easing: EasingFunction::Linear,
            yoyo: false,
            repeat: Repeat::Never,
            chain: Vec::new(),
            on_complete: None,
        }
    }

    /// Builder: easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: alternate direction on every repeat.
    #[must_use]
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Builder: repeat policy.
    #[must_use]
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Builder: start `next` when this tween completes.
    #[must_use]
    pub fn chain(mut self, next: Tween) -> Self {
        self.chain.push(next);
        self
    }

    /// Builder: scene write on completion.
    #[must_use]
    pub fn on_complete(mut self, action: CompletionAction) -> Self {
        self.on_complete = Some(action);
        self
    }

    /// Animated node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Target value.
    #[must_use]
    pub fn target(&self) -> TweenValue {
        self.to
    }
}

/// Something that happened during [`TweenScheduler::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenEvent {
    /// The tween reached its end value and was removed.
    Completed(TweenId),
}

struct ActiveTween {
    id: TweenId,
    tween: Tween,
    from: TweenValue,
    elapsed: Duration,
    repeats_done: u32,
    reversed: bool,
}

impl ActiveTween {
    fn endpoints(&self) -> (TweenValue, TweenValue) {
        if self.reversed {
            (self.tween.to, self.from)
        } else {
            (self.from, self.tween.to)
        }
    }

    fn can_repeat(&self) -> bool {
        match self.tween.repeat {
            Repeat::Never => false,
            Repeat::Count(n) => self.repeats_done < n,
            Repeat::Infinite => true,
        }
    }
}

/// Steps every active tween. Writes are applied in start order, so when
/// two tweens drive the same property the later one wins for that frame.
#[derive(Default)]
pub struct TweenScheduler {
    active: Vec<ActiveTween>,
    next_id: u64,
}

impl TweenScheduler {
    /// Empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `tween`, capturing its start value from the scene now. A
    /// tween whose node or property is missing starts at its target.
    pub fn start(&mut self, tween: Tween, scene: &SceneGraph) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        let from = tween.to.read(scene, tween.node).unwrap_or(tween.to);
        self.active.push(ActiveTween {
            id,
            tween,
            from,
            elapsed: Duration::ZERO,
            repeats_done: 0,
            reversed: false,
        });
        id
    }

    /// Advance every tween by `dt` and write the interpolated values.
    /// Tweens chained from a completing tween start within the same call
    /// but only advance from the next call on.
    pub fn advance(&mut self, dt: Duration, scene: &mut SceneGraph) -> Vec<TweenEvent> {
        let mut events = Vec::new();
        let mut chained = Vec::new();
        let mut i = 0;
        while i < self.active.len() {
            let tween = &mut self.active[i];
            tween.elapsed += dt;
            let duration = tween.tween.duration;

            while !duration.is_zero() && tween.elapsed >= duration && tween.can_repeat() {
                tween.elapsed -= duration;
                tween.repeats_done = tween.repeats_done.saturating_add(1);
                if tween.tween.yoyo {
                    tween.reversed = !tween.reversed;
                }
            }

            let t = if duration.is_zero() {
                1.0
            } else {
                tween.elapsed.as_secs_f32() / duration.as_secs_f32()
            };

            let (from, to) = tween.endpoints();
            if t >= 1.0 && !tween.can_repeat() {
                // Snap exactly onto the end value.
                to.write(scene, tween.tween.node);
                let done = self.active.remove(i);
                if let Some(CompletionAction::HideAndResetOpacity) = done.tween.on_complete {
                    hide_and_reset(scene, done.tween.node);
                }
                events.push(TweenEvent::Completed(done.id));
                chained.extend(done.tween.chain);
                continue;
            }

            let eased = tween.tween.easing.evaluate(t);
            from.lerp(to, eased).write(scene, tween.tween.node);
            i += 1;
        }

        for next in chained {
            let _ = self.start(next, scene);
        }
        events
    }

    /// Stop every tween.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Number of running tweens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no tween is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

fn hide_and_reset(scene: &mut SceneGraph, node: NodeId) {
    if let Some(m) = scene.node_mut(node).and_then(Node::material_mut) {
        m.visible = false;
        m.opacity = 1.0;
    }
}
