use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;
use tracing::{debug, warn};

use crate::ecs::clock::SimClock;
use crate::ecs::components::Item;
use crate::ecs::events::PossessionEvent;
use crate::ecs::resources::{EcsIdGenerator, TransferLog, TransferRecord};
use crate::error::{ErrorCategory, TransferError};

use super::apply_container::{Completion, Deposit};
use super::apply_item::HitOutcome;
use super::{PossessionCommand, PossessionCommandKind};
use super::{apply_agent, apply_container, apply_item};

/// Context threaded through one applicator pass: the tick being applied and
/// the notifications produced so far.
pub(crate) struct ApplyCtx {
    pub tick: u64,
    pub notifications: Vec<PossessionEvent>,
}

impl ApplyCtx {
    fn emit(&mut self, event: PossessionEvent) {
        self.notifications.push(event);
    }

    fn emit_deposit(&mut self, container: Entity, deposit: Deposit) {
        self.emit(PossessionEvent::Deposited {
            container,
            item: deposit.item,
            resource_type: deposit.resource_type,
        });
        if let Some(completion) = deposit.completion {
            self.emit_completion(container, completion);
        }
    }

    fn emit_completion(&mut self, container: Entity, completion: Completion) {
        match completion {
            Completion::Replaced { replacement } => {
                self.emit(PossessionEvent::Completed {
                    container,
                    replacement,
                });
            }
            Completion::Ejected { items } => {
                self.emit(PossessionEvent::Ejected { container, items });
            }
        }
    }
}

fn apply_one(
    ctx: &mut ApplyCtx,
    world: &mut World,
    kind: &PossessionCommandKind,
) -> Result<(), TransferError> {
    match *kind {
        PossessionCommandKind::Pickup { agent, item } => {
            apply_agent::pickup(world, agent, item)?;
            ctx.emit(PossessionEvent::PickedUp { agent, item });
        }
        PossessionCommandKind::Drop { agent } => {
            let item = apply_agent::drop_held(world, agent)?;
            ctx.emit(PossessionEvent::Dropped { agent, item });
        }
        PossessionCommandKind::Throw { agent } => {
            let (item, impulse) = apply_agent::throw_held(world, agent)?;
            ctx.emit(PossessionEvent::Thrown {
                agent,
                item,
                impulse,
            });
        }
        PossessionCommandKind::DepositFree { container, item } => {
            let deposit = apply_container::deposit_free(world, container, item)?;
            ctx.emit_deposit(container, deposit);
        }
        PossessionCommandKind::DepositHeld { container, agent } => {
            let deposit = apply_container::deposit_held(world, container, agent)?;
            ctx.emit_deposit(container, deposit);
        }
        PossessionCommandKind::Withdraw { container, agent } => {
            let item = apply_container::withdraw(world, container, agent)?;
            if let Some(resource_type) = world.get::<Item>(item).map(|i| i.resource_type.clone()) {
                ctx.emit(PossessionEvent::Withdrawn {
                    container,
                    agent,
                    item,
                    resource_type,
                });
            }
        }
        PossessionCommandKind::EjectAll { container, agent } => {
            let items = apply_container::eject_all(world, container, agent)?;
            ctx.emit_completion(container, Completion::Ejected { items });
        }
        PossessionCommandKind::Hit { agent, target } => {
            match apply_item::hit_with_held_tool(world, agent, target)? {
                HitOutcome::Mismatch => {}
                HitOutcome::Damaged { remaining } => {
                    ctx.emit(PossessionEvent::HarvestHit { target, remaining });
                }
                HitOutcome::Depleted { replacement } => {
                    ctx.emit(PossessionEvent::HarvestHit {
                        target,
                        remaining: 0,
                    });
                    ctx.emit(PossessionEvent::HarvestDepleted {
                        target,
                        replacement,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Exclusive system that drains pending `PossessionCommand` messages in
/// emission order, applies each against current state, records it in the
/// `TransferLog` and emits `PossessionEvent` notifications.
///
/// Runs twice per tick: in `PossessionSet::AgentApply` and again in
/// `PossessionSet::ContainerApply`.
pub fn apply_possession_commands(world: &mut World) {
    let commands: Vec<PossessionCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<PossessionCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if commands.is_empty() {
        return;
    }

    let tick = world
        .get_resource::<SimClock>()
        .map(|c| c.tick_count)
        .unwrap_or_default();
    let mut ctx = ApplyCtx {
        tick,
        notifications: Vec::new(),
    };
    let mut records = Vec::with_capacity(commands.len());

    for cmd in &commands {
        let outcome = apply_one(&mut ctx, world, &cmd.kind);
        if let Err(error) = &outcome {
            match error.category() {
                ErrorCategory::RaceRollback => {
                    if let TransferError::RaceRollback { container, agent } = *error {
                        ctx.emit(PossessionEvent::WithdrawRolledBack { container, agent });
                    }
                }
                ErrorCategory::ConfigurationMissing => {
                    warn!(command = %cmd.description, %error, "command rejected");
                    ctx.emit(PossessionEvent::Rejected {
                        error: error.clone(),
                    });
                }
                ErrorCategory::InvalidTransfer | ErrorCategory::QuotaExceeded => {
                    debug!(command = %cmd.description, %error, "command rejected");
                    ctx.emit(PossessionEvent::Rejected {
                        error: error.clone(),
                    });
                }
            }
        }
        records.push((cmd.description.clone(), outcome));
    }

    let stamped: Vec<TransferRecord> = match world.get_resource_mut::<EcsIdGenerator>() {
        Some(mut ids) => records
            .into_iter()
            .map(|(description, outcome)| TransferRecord {
                id: ids.0.next_id(),
                tick: ctx.tick,
                description,
                outcome,
            })
            .collect(),
        None => Vec::new(),
    };
    if let Some(mut log) = world.get_resource_mut::<TransferLog>() {
        for record in stamped {
            log.push(record);
        }
    }

    if let Some(mut messages) = world.get_resource_mut::<Messages<PossessionEvent>>() {
        messages.write_batch(ctx.notifications);
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::Vec3;

    use super::*;
    use crate::ecs::components::{Agent, Pose};
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::{drain_messages, test_app};
    use crate::model::{ResourceType, Signature};

    fn send(world: &mut World, kind: PossessionCommandKind) {
        world
            .resource_mut::<Messages<PossessionCommand>>()
            .write(PossessionCommand::new(kind, "test"));
    }

    #[test]
    fn applies_in_emission_order() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        let stone = spawn::spawn_item(
            world,
            ResourceType::Stone,
            Pose::at(Vec3::X),
            Signature::default(),
        );

        send(world, PossessionCommandKind::Pickup { agent, item: stone });
        send(world, PossessionCommandKind::Drop { agent });
        apply_possession_commands(world);

        let events = drain_messages::<PossessionEvent>(world);
        assert_eq!(
            events,
            vec![
                PossessionEvent::PickedUp { agent, item: stone },
                PossessionEvent::Dropped { agent, item: stone },
            ]
        );
        assert!(world.get::<Agent>(agent).unwrap().is_empty());
        assert!(world.get::<Item>(stone).unwrap().possession().is_free());
    }

    #[test]
    fn rejection_is_logged_not_fatal() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());

        send(world, PossessionCommandKind::Drop { agent });
        apply_possession_commands(world);

        let log = world.resource::<TransferLog>();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records[0].outcome, Err(TransferError::AgentEmpty(agent)));
        assert_eq!(log.rejected().count(), 1);
        let events = drain_messages::<PossessionEvent>(world);
        assert_eq!(
            events,
            vec![PossessionEvent::Rejected {
                error: TransferError::AgentEmpty(agent)
            }]
        );
    }

    #[test]
    fn record_ids_are_monotonic() {
        let mut app = test_app();
        let world = app.world_mut();
        let agent = spawn::spawn_agent(world, Pose::default());
        for _ in 0..3 {
            send(world, PossessionCommandKind::Throw { agent });
        }
        apply_possession_commands(world);
        let ids: Vec<u64> = world
            .resource::<TransferLog>()
            .records
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
