#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Basic melee attacks for actors that are in range and not casting.
//!
//! Every raider swings at the player on its own attack-speed cadence. The
//! rule has exactly two inputs beyond the cooldown: the actor must stand
//! within its attack range and must not be locked by a skill cast. The world
//! re-checks range and the cast lock when applying the strike, so a stale
//! view can at worst produce a dropped command, never a wrong hit.

use std::collections::BTreeMap;
use std::time::Duration;

use rift_siege_core::{ActorId, ActorView, Command, Event, PlayerSnapshot, Team};

/// Pure system that emits basic strike commands on per-actor cooldowns.
#[derive(Debug, Default)]
pub struct BasicCombat {
    cooldowns: BTreeMap<ActorId, Duration>,
}

impl BasicCombat {
    /// Creates a combat system with no tracked actors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and immutable views to emit strike commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        actors: &ActorView,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::ActorDied { actor, .. }
                | Event::ActorEvicted { actor, .. }
                | Event::ActorDespawned { actor, .. } => {
                    let _ = self.cooldowns.remove(actor);
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, actors, player, out),
                _ => {}
            }
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        actors: &ActorView,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(dt);
        }

        for snapshot in actors.iter() {
            if snapshot.team != Team::Raiders || snapshot.casting {
                continue;
            }
            if snapshot.position.distance(player.position) > snapshot.attack_range {
                continue;
            }
            let remaining = self.cooldowns.entry(snapshot.id).or_default();
            if !remaining.is_zero() {
                continue;
            }
            *remaining = snapshot.attack_interval;
            out.push(Command::Strike {
                attacker: snapshot.id,
                amount: snapshot.attack_damage,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_siege_core::{ActorKind, ActorSnapshot, Damage, Health, WorldPoint};

    fn raider(x: f32, casting: bool) -> ActorSnapshot {
        ActorSnapshot {
            id: ActorId::new(ActorKind::Husk, 0, 1),
            kind: ActorKind::Husk,
            team: Team::Raiders,
            position: WorldPoint::new(x, 0.0),
            facing: 0.0,
            radius: 0.5,
            health: Health::new(10),
            casting,
            attack_range: 1.5,
            attack_damage: Damage::new(3),
            attack_interval: Duration::from_secs(1),
            invulnerable: false,
        }
    }

    fn player() -> PlayerSnapshot {
        PlayerSnapshot {
            position: WorldPoint::ORIGIN,
            health: Health::new(50),
            invulnerable: false,
        }
    }

    fn tick() -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(250),
        }
    }

    fn strikes(out: &[Command]) -> usize {
        out.iter()
            .filter(|command| matches!(command, Command::Strike { .. }))
            .count()
    }

    #[test]
    fn in_range_actor_strikes_on_its_cadence() {
        let mut combat = BasicCombat::new();
        let view = ActorView::from_snapshots(vec![raider(1.0, false)]);

        let mut total = 0;
        for _ in 0..8 {
            let mut out = Vec::new();
            combat.handle(&[tick()], &view, &player(), &mut out);
            total += strikes(&out);
        }
        // 2s of ticks with a 1s interval: the opening swing plus one more.
        assert_eq!(total, 2);
    }

    #[test]
    fn out_of_range_actor_never_strikes() {
        let mut combat = BasicCombat::new();
        let view = ActorView::from_snapshots(vec![raider(9.0, false)]);

        let mut out = Vec::new();
        for _ in 0..8 {
            combat.handle(&[tick()], &view, &player(), &mut out);
        }
        assert_eq!(strikes(&out), 0);
    }

    #[test]
    fn casting_suppresses_basic_strikes_entirely() {
        let mut combat = BasicCombat::new();
        let view = ActorView::from_snapshots(vec![raider(1.0, true)]);

        let mut out = Vec::new();
        for _ in 0..8 {
            combat.handle(&[tick()], &view, &player(), &mut out);
        }
        assert_eq!(strikes(&out), 0);
    }

    #[test]
    fn death_clears_the_tracked_cooldown() {
        let mut combat = BasicCombat::new();
        let view = ActorView::from_snapshots(vec![raider(1.0, false)]);
        let mut out = Vec::new();
        combat.handle(&[tick()], &view, &player(), &mut out);
        assert_eq!(strikes(&out), 1);

        combat.handle(
            &[Event::ActorDied {
                actor: ActorId::new(ActorKind::Husk, 0, 1),
                kind: ActorKind::Husk,
            }],
            &ActorView::default(),
            &player(),
            &mut Vec::new(),
        );
        assert!(combat.cooldowns.is_empty());
    }
}
