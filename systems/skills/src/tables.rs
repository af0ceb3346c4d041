//! Stock skill tables for the six boss kinds.
//!
//! The scheduler itself is kind-agnostic; everything that distinguishes one
//! boss from another is data in these tables. `Husk` deliberately has no
//! entry and never enters the scheduler.

use std::collections::BTreeMap;
use std::time::Duration;

use rift_siege_core::{ActorKind, Damage, SkillKind};

use crate::{SkillShape, SkillSpec, SkillTable};

const fn single_strike(
    kind: SkillKind,
    cooldown_ms: u64,
    windup_ms: u64,
    active_ms: u64,
    recovery_ms: u64,
    shape: SkillShape,
    damage: u32,
) -> SkillSpec {
    SkillSpec {
        kind,
        cooldown: Duration::from_millis(cooldown_ms),
        windup: Duration::from_millis(windup_ms),
        active: Duration::from_millis(active_ms),
        recovery: Duration::from_millis(recovery_ms),
        strikes: 1,
        strike_interval: Duration::ZERO,
        shape,
        damage: Damage::new(damage),
    }
}

/// Builds the stock table for every boss kind.
#[must_use]
pub fn default_tables() -> BTreeMap<ActorKind, SkillTable> {
    let slam = single_strike(
        SkillKind::Slam,
        6_000,
        1_000,
        500,
        500,
        SkillShape::SelfCircle { radius: 3.5 },
        12,
    );
    let dash = single_strike(
        SkillKind::Dash,
        5_000,
        800,
        300,
        700,
        SkillShape::Lane {
            length: 12.0,
            width: 2.0,
        },
        10,
    );
    let sweep = single_strike(
        SkillKind::Sweep,
        4_500,
        900,
        400,
        600,
        SkillShape::Fan {
            radius: 5.0,
            half_angle: 1.1,
        },
        9,
    );
    let barrage = SkillSpec {
        kind: SkillKind::Barrage,
        cooldown: Duration::from_secs(8),
        windup: Duration::from_millis(1_200),
        active: Duration::from_secs(2),
        recovery: Duration::from_millis(800),
        strikes: 5,
        strike_interval: Duration::from_millis(400),
        shape: SkillShape::TargetCircle {
            radius: 1.8,
            max_range: 14.0,
        },
        damage: Damage::new(4),
    };
    let shockwave = single_strike(
        SkillKind::Shockwave,
        10_000,
        2_500,
        500,
        1_000,
        SkillShape::SelfCircle { radius: 7.0 },
        20,
    );
    let lunge = single_strike(
        SkillKind::Lunge,
        5_500,
        1_000,
        300,
        700,
        SkillShape::Lane {
            length: 16.0,
            width: 1.2,
        },
        11,
    );

    BTreeMap::from([
        (ActorKind::Brute, SkillTable::new(vec![slam])),
        (ActorKind::Stalker, SkillTable::new(vec![dash])),
        (ActorKind::Warden, SkillTable::new(vec![sweep])),
        (ActorKind::Ravager, SkillTable::new(vec![barrage])),
        (ActorKind::Colossus, SkillTable::new(vec![shockwave, slam])),
        (ActorKind::Harbinger, SkillTable::new(vec![lunge, sweep])),
    ])
}
