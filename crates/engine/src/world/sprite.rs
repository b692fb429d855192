use crate::content::{Animation, Image};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Coin,
    Music,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyKind),
    PowerUp(PowerUpKind),
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 7] = [
        SpriteKind::Player,
        SpriteKind::Enemy(EnemyKind::A),
        SpriteKind::Enemy(EnemyKind::B),
        SpriteKind::Enemy(EnemyKind::C),
        SpriteKind::PowerUp(PowerUpKind::Coin),
        SpriteKind::PowerUp(PowerUpKind::Music),
        SpriteKind::PowerUp(PowerUpKind::Goal),
    ];

    pub fn is_creature(self) -> bool {
        matches!(self, SpriteKind::Player | SpriteKind::Enemy(_))
    }

    /// Walking speed in pixels per millisecond.
    pub fn max_speed(self) -> f32 {
        match self {
            SpriteKind::Player => 0.5,
            SpriteKind::Enemy(EnemyKind::A) => 0.05,
            SpriteKind::Enemy(EnemyKind::B) => 0.2,
            SpriteKind::Enemy(EnemyKind::C) => 0.1,
            SpriteKind::PowerUp(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AnimationSet {
    Creature {
        walk_left: Animation,
        walk_right: Animation,
        dying_left: Animation,
        dying_right: Animation,
    },
    Idle(Animation),
}

impl AnimationSet {
    fn restarted(&self) -> Self {
        match self {
            AnimationSet::Creature {
                walk_left,
                walk_right,
                dying_left,
                dying_right,
            } => AnimationSet::Creature {
                walk_left: walk_left.restarted(),
                walk_right: walk_right.restarted(),
                dying_left: dying_left.restarted(),
                dying_right: dying_right.restarted(),
            },
            AnimationSet::Idle(idle) => AnimationSet::Idle(idle.restarted()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSlot {
    WalkLeft,
    WalkRight,
    DyingLeft,
    DyingRight,
    Idle,
}

impl AnimationSlot {
    fn faces_right(self) -> bool {
        matches!(self, AnimationSlot::WalkRight | AnimationSlot::DyingRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Normal,
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Dormant,
    Active,
}

/// Immutable template a level spawns its sprites from.
///
/// There is no mutable access to a host; `spawn` hands out an owned instance
/// with its own position, animation cursors and lifecycle.
#[derive(Debug)]
pub struct SpriteHost {
    kind: SpriteKind,
    animations: AnimationSet,
}

impl SpriteHost {
    pub fn creature(
        kind: SpriteKind,
        walk_left: Animation,
        walk_right: Animation,
        dying_left: Animation,
        dying_right: Animation,
    ) -> Self {
        Self {
            kind,
            animations: AnimationSet::Creature {
                walk_left,
                walk_right,
                dying_left,
                dying_right,
            },
        }
    }

    pub fn power_up(kind: PowerUpKind, idle: Animation) -> Self {
        Self {
            kind: SpriteKind::PowerUp(kind),
            animations: AnimationSet::Idle(idle),
        }
    }

    pub fn kind(&self) -> SpriteKind {
        self.kind
    }

    pub fn spawn(&self) -> Sprite {
        let current = match self.animations {
            AnimationSet::Creature { .. } => AnimationSlot::WalkLeft,
            AnimationSet::Idle(_) => AnimationSlot::Idle,
        };
        let activity = match self.kind {
            SpriteKind::Player => Activity::Active,
            _ => Activity::Dormant,
        };
        Sprite {
            kind: self.kind,
            position: Vec2::default(),
            velocity: Vec2::default(),
            animations: self.animations.restarted(),
            current,
            state: LifeState::Normal,
            state_time_ms: 0,
            activity,
        }
    }
}

/// A live sprite owned by a level.
#[derive(Debug, Clone)]
pub struct Sprite {
    kind: SpriteKind,
    pub position: Vec2,
    /// Pixels per millisecond.
    pub velocity: Vec2,
    animations: AnimationSet,
    current: AnimationSlot,
    state: LifeState,
    state_time_ms: u64,
    activity: Activity,
}

impl Sprite {
    pub fn kind(&self) -> SpriteKind {
        self.kind
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_awake(&self) -> bool {
        self.activity == Activity::Active
    }

    pub fn current_slot(&self) -> AnimationSlot {
        self.current
    }

    pub fn animation(&self) -> &Animation {
        self.animation_for(self.current)
    }

    pub fn image(&self) -> Option<&Image> {
        self.animation().image()
    }

    pub fn width(&self) -> u32 {
        self.image().map(Image::width).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.image().map(Image::height).unwrap_or(0)
    }

    /// One-way dormant → active transition. A resting enemy starts walking
    /// left when it wakes.
    pub fn wake_up(&mut self) {
        if self.activity == Activity::Active {
            return;
        }
        self.activity = Activity::Active;
        if matches!(self.kind, SpriteKind::Enemy(_))
            && self.state == LifeState::Normal
            && self.velocity.x == 0.0
        {
            self.velocity.x = -self.kind.max_speed();
        }
    }

    pub fn set_dying(&mut self) {
        if !self.kind.is_creature() || self.state != LifeState::Normal {
            return;
        }
        self.state = LifeState::Dying;
        self.state_time_ms = 0;
        self.velocity = Vec2::default();
    }

    /// Moves by velocity, then advances animation and lifecycle. Dying lasts
    /// one pass of the dying animation, then the sprite is dead.
    pub fn update(&mut self, elapsed_ms: u64) {
        let dt = elapsed_ms as f32;
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        let next = self.select_slot();
        if next != self.current {
            self.current = next;
            self.animation_mut(next).start();
        } else {
            self.animation_mut(next).update(elapsed_ms);
        }

        if self.state == LifeState::Dying {
            self.state_time_ms = self.state_time_ms.saturating_add(elapsed_ms);
            if self.state_time_ms >= self.animation().total_duration_ms() {
                self.state = LifeState::Dead;
            }
        }
    }

    fn select_slot(&self) -> AnimationSlot {
        if matches!(self.animations, AnimationSet::Idle(_)) {
            return AnimationSlot::Idle;
        }
        let faces_right = if self.velocity.x < 0.0 {
            false
        } else if self.velocity.x > 0.0 {
            true
        } else {
            self.current.faces_right()
        };
        match (self.state, faces_right) {
            (LifeState::Normal, false) => AnimationSlot::WalkLeft,
            (LifeState::Normal, true) => AnimationSlot::WalkRight,
            (_, false) => AnimationSlot::DyingLeft,
            (_, true) => AnimationSlot::DyingRight,
        }
    }

    fn animation_for(&self, slot: AnimationSlot) -> &Animation {
        match (&self.animations, slot) {
            (AnimationSet::Idle(idle), _) => idle,
            (AnimationSet::Creature { walk_right, .. }, AnimationSlot::WalkRight) => walk_right,
            (AnimationSet::Creature { dying_left, .. }, AnimationSlot::DyingLeft) => dying_left,
            (AnimationSet::Creature { dying_right, .. }, AnimationSlot::DyingRight) => dying_right,
            (AnimationSet::Creature { walk_left, .. }, _) => walk_left,
        }
    }

    fn animation_mut(&mut self, slot: AnimationSlot) -> &mut Animation {
        match (&mut self.animations, slot) {
            (AnimationSet::Idle(idle), _) => idle,
            (AnimationSet::Creature { walk_right, .. }, AnimationSlot::WalkRight) => walk_right,
            (AnimationSet::Creature { dying_left, .. }, AnimationSlot::DyingLeft) => dying_left,
            (AnimationSet::Creature { dying_right, .. }, AnimationSlot::DyingRight) => dying_right,
            (AnimationSet::Creature { walk_left, .. }, _) => walk_left,
        }
    }
}
