/// Execute an aggregate command deterministically (no IO, no async).
///
/// The canonical decide-then-evolve step:
///
/// 1. **Decide**: `aggregate.handle(command, policy)` produces events without mutating.
/// 2. **Evolve**: each event is applied via `aggregate.apply(event)`.
///
/// On error the aggregate is left untouched, so callers never observe a
/// half-applied transition. Persistence and notification are the caller's job
/// (see the negotiation service in `dealroom-infra`).
pub fn execute<A>(
    aggregate: &mut A,
    command: &A::Command,
    policy: &A::Policy,
) -> Result<Vec<A::Event>, A::Error>
where
    A: dealroom_core::Aggregate,
{
    let events = A::handle(aggregate, command, policy)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
