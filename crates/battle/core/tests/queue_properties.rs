mod common;

use battle_core::{
    ActionOrderQueue, CreatureOrderQueue, DynamicQueue, ParticipantId, PhaseKind, TieBreaker,
};
use common::{Arena, Unit, owner};
use proptest::collection;
use proptest::prelude::*;

fn drain_creatures(queue: &mut CreatureOrderQueue<Arena>, arena: &Arena) -> Vec<u32> {
    std::iter::from_fn(|| queue.pop(arena).unwrap())
        .map(|phase| owner(phase.as_ref()))
        .collect()
}

proptest! {
    #[test]
    fn distinct_speeds_pop_strictly_descending(
        speeds in collection::btree_set(1u32..1000, 1..12)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        seed in any::<u64>(),
    ) {
        let roster: Vec<(u32, u32)> = speeds.iter().enumerate().map(|(i, &s)| (i as u32 + 1, s)).collect();
        let arena = Arena::with_speeds(&roster);
        let mut queue = CreatureOrderQueue::new(TieBreaker::new(seed));
        for &(id, _) in &roster {
            queue.push(Unit::boxed(PhaseKind::PostTurnStatus, id));
        }

        let popped: Vec<u32> = drain_creatures(&mut queue, &arena)
            .into_iter()
            .map(|id| arena.speeds[&ParticipantId(id)])
            .collect();
        prop_assert_eq!(popped.len(), roster.len());
        prop_assert!(popped.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn speed_reversal_pops_ascending(
        speeds in collection::btree_set(1u32..1000, 2..10)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
    ) {
        let roster: Vec<(u32, u32)> = speeds.iter().enumerate().map(|(i, &s)| (i as u32 + 1, s)).collect();
        let mut arena = Arena::with_speeds(&roster);
        arena.trick_room = true;
        let mut queue = CreatureOrderQueue::new(TieBreaker::new(3));
        for &(id, _) in &roster {
            queue.push(Unit::boxed(PhaseKind::PostTurnStatus, id));
        }

        let popped: Vec<u32> = drain_creatures(&mut queue, &arena)
            .into_iter()
            .map(|id| arena.speeds[&ParticipantId(id)])
            .collect();
        prop_assert!(popped.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn lower_bracket_never_precedes_pending_higher_bracket(
        actions in collection::vec((-3i32..=3, 1u32..300), 1..12),
        seed in any::<u64>(),
    ) {
        let mut arena = Arena::default();
        let mut queue = ActionOrderQueue::new(TieBreaker::new(seed));
        for (index, &(bracket, speed)) in actions.iter().enumerate() {
            let id = index as u32 + 1;
            arena.speeds.insert(ParticipantId(id), speed);
            arena.brackets.insert(ParticipantId(id), bracket);
            queue.push(Unit::boxed(PhaseKind::Move, id));
        }

        let brackets: Vec<i32> = std::iter::from_fn(|| queue.pop(&arena).unwrap())
            .map(|phase| arena.brackets[&ParticipantId(owner(phase.as_ref()))])
            .collect();
        prop_assert_eq!(brackets.len(), actions.len());
        prop_assert!(brackets.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn remove_takes_one_and_keeps_the_rest_in_order(
        speeds in collection::vec(1u32..6, 2..10),
        pick in any::<prop::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let roster: Vec<(u32, u32)> = speeds.iter().enumerate().map(|(i, &s)| (i as u32 + 1, s)).collect();
        let arena = Arena::with_speeds(&roster);
        let target = roster[pick.index(roster.len())].0;

        let build = || {
            let mut queue = CreatureOrderQueue::new(TieBreaker::new(seed));
            for &(id, _) in &roster {
                queue.push(Unit::boxed(PhaseKind::PostTurnStatus, id));
            }
            queue
        };

        let mut untouched = build();
        let expected: Vec<u32> = drain_creatures(&mut untouched, &arena)
            .into_iter()
            .filter(|&id| id != target)
            .collect();

        let mut pruned = build();
        let removed = DynamicQueue::remove(&mut pruned, &arena, &|phase| {
            phase.participant() == Some(ParticipantId(target))
        })
        .unwrap();
        prop_assert!(removed);
        prop_assert_eq!(DynamicQueue::len(&pruned), roster.len() - 1);
        prop_assert_eq!(drain_creatures(&mut pruned, &arena), expected);
    }

    #[test]
    fn same_seed_replays_same_permutation(
        count in 2usize..8,
        seed in any::<u64>(),
    ) {
        let roster: Vec<(u32, u32)> = (1..=count as u32).map(|id| (id, 100)).collect();
        let arena = Arena::with_speeds(&roster);
        let run = || {
            let mut queue = CreatureOrderQueue::new(TieBreaker::new(seed));
            for &(id, _) in &roster {
                queue.push(Unit::boxed(PhaseKind::PostTurnStatus, id));
            }
            drain_creatures(&mut queue, &arena)
        };
        prop_assert_eq!(run(), run());
    }
}

#[test]
fn clear_leaves_nothing_to_pop() {
    let arena = Arena::with_speeds(&[(1, 10), (2, 20), (3, 30)]);
    let mut queue = CreatureOrderQueue::new(TieBreaker::new(1));
    for id in 1..=3 {
        queue.push(Unit::boxed(PhaseKind::PostTurnStatus, id));
    }
    DynamicQueue::clear(&mut queue);
    assert!(DynamicQueue::is_empty(&queue));
    assert!(queue.pop(&arena).unwrap().is_none());
}
