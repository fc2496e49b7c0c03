//! Integration tests for the step-emitting sort engine.

use std::collections::BTreeSet;

use rstest::rstest;

use dsviz::domain::{Algorithm, SortRun, Step, StepKind};
use dsviz::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn run_all(algorithm: Algorithm, values: &[u32]) -> Vec<Step<u32>> {
    SortRun::new(algorithm, values).collect()
}

#[rstest]
fn given_any_algorithm_when_running_to_end_then_array_sorted(
    #[values(Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge)] algorithm: Algorithm,
    #[values(
        vec![64, 34, 25, 12, 22, 11, 90],
        vec![1, 2, 3, 4, 5],
        vec![5, 4, 3, 2, 1],
        vec![7, 7, 3, 7, 1, 3],
        vec![42]
    )]
    values: Vec<u32>,
) {
    let steps = run_all(algorithm, &values);
    let last = steps.last().unwrap();

    let mut expected = values.clone();
    expected.sort_unstable();

    assert!(last.is_complete());
    assert_eq!(last.array, expected);
    assert_eq!(last.sorted, (0..values.len()).collect::<BTreeSet<_>>());
    assert!(last.highlighted.is_empty());
    assert_eq!(
        steps.iter().filter(|s| s.kind == StepKind::Complete).count(),
        1,
        "exactly one terminal step"
    );
}

#[rstest]
fn given_any_algorithm_when_stepping_then_counters_never_decrease(
    #[values(Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge)] algorithm: Algorithm,
) {
    let steps = run_all(algorithm, &[9, 1, 8, 2, 7, 3, 6, 4, 5]);

    for pair in steps.windows(2) {
        assert!(pair[1].comparisons >= pair[0].comparisons);
        assert!(pair[1].swaps >= pair[0].swaps);
        assert!(pair[0].sorted.is_subset(&pair[1].sorted));
    }
}

#[rstest]
fn given_any_algorithm_when_stepping_then_each_step_is_one_mutation(
    #[values(Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge)] algorithm: Algorithm,
) {
    let steps = run_all(algorithm, &[4, 3, 2, 1]);

    let mut prev_cmp = 0;
    let mut prev_swp = 0;
    for step in &steps {
        let d_cmp = step.comparisons - prev_cmp;
        let d_swp = step.swaps - prev_swp;
        match step.kind {
            StepKind::Compare => assert_eq!((d_cmp, d_swp), (1, 0)),
            StepKind::Swap | StepKind::Write => assert_eq!((d_cmp, d_swp), (0, 1)),
            StepKind::MarkSorted | StepKind::Complete => assert_eq!((d_cmp, d_swp), (0, 0)),
        }
        prev_cmp = step.comparisons;
        prev_swp = step.swaps;
    }
}

#[rstest]
#[case(Algorithm::Bubble, 3, 3, 9)]
#[case(Algorithm::Quick, 3, 3, 10)]
#[case(Algorithm::Merge, 2, 5, 8)]
fn given_reversed_triple_when_sorting_then_expected_counters(
    #[case] algorithm: Algorithm,
    #[case] comparisons: u64,
    #[case] swaps: u64,
    #[case] step_count: usize,
) {
    let steps = run_all(algorithm, &[5, 3, 1]);
    let last = steps.last().unwrap();

    assert_eq!(last.array, vec![1, 3, 5]);
    assert_eq!(last.comparisons, comparisons);
    assert_eq!(last.swaps, swaps);
    assert_eq!(steps.len(), step_count);
}

#[rstest]
fn given_bubble_on_reversed_triple_when_stepping_then_step_kinds_in_order() {
    let kinds: Vec<StepKind> = run_all(Algorithm::Bubble, &[5, 3, 1])
        .into_iter()
        .map(|s| s.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            StepKind::Compare,
            StepKind::Swap,
            StepKind::Compare,
            StepKind::Swap,
            StepKind::MarkSorted,
            StepKind::Compare,
            StepKind::Swap,
            StepKind::MarkSorted,
            StepKind::Complete,
        ]
    );
}

#[rstest]
fn given_empty_input_when_running_then_single_complete_step(
    #[values(Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge)] algorithm: Algorithm,
) {
    let steps = run_all(algorithm, &[]);

    assert_eq!(steps.len(), 1);
    assert!(steps[0].is_complete());
    assert!(steps[0].array.is_empty());
    assert_eq!((steps[0].comparisons, steps[0].swaps), (0, 0));
}

#[rstest]
fn given_run_when_iterating_then_input_untouched() {
    let values = vec![3, 1, 2];
    let mut run = SortRun::new(Algorithm::Quick, &values);
    run.by_ref().for_each(drop);

    assert_eq!(values, vec![3, 1, 2]);
    assert_eq!(run.array(), &[1, 2, 3]);
    assert!(run.is_finished());
}

#[rstest]
fn given_merge_with_equal_keys_when_sorting_then_stable() {
    // (key, tag) ordered by key only
    #[derive(Debug, Clone, PartialEq)]
    struct Keyed(u32, char);
    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    let values = vec![Keyed(2, 'a'), Keyed(1, 'b'), Keyed(2, 'c'), Keyed(1, 'd')];
    let last = SortRun::new(Algorithm::Merge, &values).last().unwrap();

    let tags: String = last.array.iter().map(|k| k.1).collect();
    assert_eq!(tags, "bdac");
}
