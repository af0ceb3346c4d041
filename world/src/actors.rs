//! Per-kind actor pools and the live actor body they manage.

use rift_siege_core::{
    ActorId, ActorKind, ActorTemplate, Damage, Health, LoadError, Team, TemplateSource, WorldPoint,
};
use rift_siege_pool::{Handle, Pool, PoolConfig, PoolConfigError};
use std::collections::BTreeMap;
use std::time::Duration;

/// Mutable state of one live actor instance.
#[derive(Debug)]
pub(crate) struct ActorBody {
    pub(crate) kind: ActorKind,
    pub(crate) team: Team,
    pub(crate) position: WorldPoint,
    pub(crate) facing: f32,
    pub(crate) health: Health,
    pub(crate) radius: f32,
    pub(crate) move_speed: f32,
    pub(crate) attack_range: f32,
    pub(crate) attack_damage: Damage,
    pub(crate) attack_interval: Duration,
    pub(crate) invulnerable: bool,
    pub(crate) casting: bool,
}

impl ActorBody {
    fn dormant(template: &ActorTemplate) -> Self {
        Self {
            kind: template.kind,
            team: template.team,
            position: WorldPoint::ORIGIN,
            facing: 0.0,
            health: template.max_health,
            radius: template.radius,
            move_speed: template.move_speed,
            attack_range: template.attack_range,
            attack_damage: template.attack_damage,
            attack_interval: template.attack_interval,
            invulnerable: template.invulnerable,
            casting: false,
        }
    }

    /// Resets every per-use field; the pool intentionally resets nothing.
    fn reset(&mut self, template: &ActorTemplate, position: WorldPoint, facing: f32) {
        self.kind = template.kind;
        self.team = template.team;
        self.position = position;
        self.facing = facing;
        self.health = template.max_health;
        self.radius = template.radius;
        self.move_speed = template.move_speed;
        self.attack_range = template.attack_range;
        self.attack_damage = template.attack_damage;
        self.attack_interval = template.attack_interval;
        self.invulnerable = template.invulnerable;
        self.casting = false;
    }
}

#[derive(Debug)]
struct KindPool {
    template: ActorTemplate,
    pool: Pool<ActorBody>,
}

/// Result of drawing an actor from its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActorSpawn {
    pub(crate) actor: ActorId,
    pub(crate) evicted: Option<ActorId>,
}

/// Errors raised while initializing an actor pool.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolInitError {
    /// The capacity configuration failed validation.
    #[error(transparent)]
    Config(#[from] PoolConfigError),
    /// The backing template could not be loaded or failed validation.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Registry of one pool per actor kind, keyed in deterministic order.
#[derive(Debug, Default)]
pub(crate) struct ActorPools {
    pools: BTreeMap<ActorKind, KindPool>,
}

impl ActorPools {
    /// Loads the backing template once and prewarms the kind's pool.
    pub(crate) fn initialize(
        &mut self,
        kind: ActorKind,
        config: PoolConfig,
        source: &dyn TemplateSource,
    ) -> Result<(), PoolInitError> {
        let template = source.load_template(kind)?;
        validate_template(&template)?;
        let pool = Pool::initialize(config, || ActorBody::dormant(&template))?;
        let _ = self.pools.insert(kind, KindPool { template, pool });
        Ok(())
    }

    /// Draws an actor from the kind's pool, recycling the oldest if full.
    ///
    /// Returns `None` when the kind's pool was never initialized; callers
    /// treat the spawn as a skippable no-op.
    pub(crate) fn spawn(
        &mut self,
        kind: ActorKind,
        position: WorldPoint,
        facing: f32,
    ) -> Option<ActorSpawn> {
        let entry = self.pools.get_mut(&kind)?;
        let outcome = entry.pool.spawn(|| ActorBody::dormant(&entry.template));
        let body = entry
            .pool
            .get_mut(outcome.handle)
            .expect("freshly spawned actor body is live");
        body.reset(&entry.template, position, facing);

        Some(ActorSpawn {
            actor: id_of(kind, outcome.handle),
            evicted: outcome.evicted.map(|handle| id_of(kind, handle)),
        })
    }

    /// Returns an actor to its pool; stale identifiers are no-ops.
    pub(crate) fn despawn(&mut self, actor: ActorId) -> bool {
        self.pools
            .get_mut(&actor.kind())
            .is_some_and(|entry| entry.pool.despawn(handle_of(actor)))
    }

    pub(crate) fn get(&self, actor: ActorId) -> Option<&ActorBody> {
        self.pools
            .get(&actor.kind())
            .and_then(|entry| entry.pool.get(handle_of(actor)))
    }

    pub(crate) fn get_mut(&mut self, actor: ActorId) -> Option<&mut ActorBody> {
        self.pools
            .get_mut(&actor.kind())
            .and_then(|entry| entry.pool.get_mut(handle_of(actor)))
    }

    /// Number of actors currently alive across every kind.
    pub(crate) fn active_count(&self) -> usize {
        self.pools
            .values()
            .map(|entry| entry.pool.active_count())
            .sum()
    }

    /// Iterates live actors in deterministic kind-then-slot order.
    pub(crate) fn iter_active(&self) -> impl Iterator<Item = (ActorId, &ActorBody)> {
        self.pools.iter().flat_map(|(kind, entry)| {
            entry
                .pool
                .iter_active()
                .map(|(handle, body)| (id_of(*kind, handle), body))
        })
    }

    /// Mutably iterates live actors in deterministic kind-then-slot order.
    pub(crate) fn iter_active_mut(&mut self) -> impl Iterator<Item = (ActorId, &mut ActorBody)> {
        self.pools.iter_mut().flat_map(|(kind, entry)| {
            entry
                .pool
                .iter_active_mut()
                .map(|(handle, body)| (id_of(*kind, handle), body))
        })
    }

    /// Identifiers of every live actor, in deterministic order.
    pub(crate) fn active_ids(&self) -> Vec<ActorId> {
        self.iter_active().map(|(id, _)| id).collect()
    }
}

fn validate_template(template: &ActorTemplate) -> Result<(), LoadError> {
    if template.radius <= 0.0 || !template.radius.is_finite() {
        return Err(LoadError::InvalidTemplate {
            kind: template.kind,
            reason: format!("collision radius {} is not positive", template.radius),
        });
    }
    if template.max_health.is_depleted() {
        return Err(LoadError::InvalidTemplate {
            kind: template.kind,
            reason: "spawning with zero health".to_owned(),
        });
    }
    Ok(())
}

fn id_of(kind: ActorKind, handle: Handle) -> ActorId {
    ActorId::new(kind, handle.slot(), handle.generation())
}

fn handle_of(actor: ActorId) -> Handle {
    Handle::new(actor.slot(), actor.generation())
}
