use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for the main simulation tick.
/// Run manually each tick via `app.world_mut().run_schedule(SimTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimTick;

/// Ordered phases within each simulation tick.
///
/// Systems are assigned to phases via `.in_set(SimPhase::Update)` etc.
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Last,
}

/// Possession stages.
///
/// ```text
/// Update:     Agent → AgentApply → Container → ContainerApply
/// PostUpdate: Emphasis
/// ```
///
/// Agent intents are applied before containers decide, so a container sees
/// the ownership the agents resolved this tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PossessionSet {
    Agent,
    AgentApply,
    Container,
    ContainerApply,
    Emphasis,
}

fn configure_possession_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(
        (
            PossessionSet::Agent,
            PossessionSet::AgentApply,
            PossessionSet::Container,
            PossessionSet::ContainerApply,
        )
            .chain()
            .in_set(SimPhase::Update),
    );
    schedule.configure_sets(PossessionSet::Emphasis.in_set(SimPhase::PostUpdate));
}

/// Build a configured `SimTick` schedule with phase ordering.
pub fn configure_sim_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(SimTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            SimPhase::PreUpdate,
            SimPhase::Update,
            SimPhase::PostUpdate,
            SimPhase::Last,
        )
            .chain(),
    );
    configure_possession_ordering(&mut schedule);
    schedule.add_systems(advance_clock.in_set(SimPhase::Last));
    schedule
}
