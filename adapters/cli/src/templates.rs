//! Built-in actor templates for the headless runner.
//!
//! Content loading proper lives outside the simulation core; the runner
//! ships this fixed stat block so it can start without any asset pipeline.

use std::time::Duration;

use rift_siege_core::{
    ActorKind, ActorTemplate, Damage, Health, LoadError, Team, TemplateSource,
};

/// Template source backed by a hard-coded stat table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StockTemplates;

impl TemplateSource for StockTemplates {
    fn load_template(&self, kind: ActorKind) -> Result<ActorTemplate, LoadError> {
        let (max_health, radius, move_speed, attack_range, attack_damage, attack_interval_ms) =
            match kind {
                ActorKind::Husk => (20, 0.5, 3.0, 1.2, 2, 900),
                ActorKind::Brute => (70, 1.1, 1.8, 2.0, 5, 1_400),
                ActorKind::Stalker => (45, 0.8, 3.5, 1.6, 4, 1_100),
                ActorKind::Warden => (60, 1.0, 2.2, 2.2, 4, 1_300),
                ActorKind::Ravager => (55, 0.9, 2.6, 1.8, 3, 1_000),
                ActorKind::Colossus => (140, 1.8, 1.2, 2.6, 8, 2_000),
                ActorKind::Harbinger => (80, 1.2, 2.4, 2.0, 6, 1_500),
            };

        Ok(ActorTemplate {
            kind,
            team: Team::Raiders,
            max_health: Health::new(max_health),
            radius,
            move_speed,
            attack_range,
            attack_damage: Damage::new(attack_damage),
            attack_interval: Duration::from_millis(attack_interval_ms),
            invulnerable: false,
        })
    }
}
