use ptviz::core::ingest::jsonl::parse_message;
use ptviz::core::processing_tree::ProcessingTimeTree;
use ptviz::core::{Aggregator, SharedAggregate};

fn tree(producer: &str, root_ms: f64, child_ms: f64) -> ProcessingTimeTree {
    ProcessingTimeTree::leaf(producer, producer, root_ms)
        .with_children(vec![ProcessingTimeTree::leaf(producer, "solve", child_ms)])
}

#[test]
fn test_worst_case_is_running_maximum_per_producer() {
    let sequences: [&[f64]; 4] = [
        &[10.0, 50.0, 30.0],
        &[50.0, 10.0, 30.0],
        &[1.0, 2.0, 3.0],
        &[7.0],
    ];

    for times in sequences {
        let mut aggregator = Aggregator::new(false);
        for &t in times {
            aggregator.apply(tree("planner", t, t / 2.0));
        }
        let expected = times.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(
            aggregator.worst_case()["planner"].processing_time,
            expected,
            "sequence {:?}",
            times
        );
        assert_eq!(
            aggregator.latest()["planner"].processing_time,
            *times.last().unwrap()
        );
    }
}

#[test]
fn test_worst_case_keeps_first_tree_on_ties() {
    let mut aggregator = Aggregator::new(false);
    aggregator.apply(tree("planner", 20.0, 1.0));
    aggregator.apply(tree("planner", 20.0, 9.0));

    let worst = &aggregator.worst_case()["planner"];
    assert_eq!(worst.children[0].processing_time, 1.0);
    assert_eq!(aggregator.latest()["planner"].children[0].processing_time, 9.0);
}

#[test]
fn test_producers_are_tracked_independently() {
    let mut aggregator = Aggregator::new(true);
    aggregator.apply(tree("planner", 10.0, 2.0));
    aggregator.apply(tree("controller", 99.0, 1.0));
    aggregator.apply(tree("planner", 20.0, 3.0));

    assert_eq!(aggregator.producer_count(), 2);
    assert_eq!(aggregator.worst_case()["planner"].processing_time, 20.0);
    assert_eq!(aggregator.worst_case()["controller"].processing_time, 99.0);

    let total = aggregator.total().unwrap();
    assert_eq!(total["planner"].processing_time, 30.0);
    assert_eq!(total["planner"].children[0].processing_time, 5.0);
    assert_eq!(total["controller"].processing_time, 99.0);

    let names: Vec<&String> = aggregator.worst_case().keys().collect();
    assert_eq!(names, vec!["controller", "planner"]);
}

#[test]
fn test_wire_messages_feed_the_shared_aggregate() {
    let lines = [
        r#"{"nodes":[{"id":1,"name":"planner","processing_time":12.5,"parent_id":0,"comment":""},{"id":2,"name":"plan","processing_time":8.0,"parent_id":1,"comment":"astar"}]}"#,
        r#"{"nodes":[{"id":1,"name":"planner","processing_time":4.0,"parent_id":0}]}"#,
    ];

    let aggregate = SharedAggregate::new(true);
    for line in lines {
        aggregate.apply(parse_message(line).unwrap());
    }

    let view = aggregate.snapshot();
    assert!(!view.is_empty());
    assert_eq!(view.applied_count, 2);
    assert_eq!(view.worst_case["planner"].processing_time, 12.5);
    assert_eq!(view.latest["planner"].processing_time, 4.0);
    assert_eq!(view.total.as_ref().unwrap()["planner"].processing_time, 16.5);

    let text = view.worst_case["planner"].to_text(true, false);
    assert!(text.contains("plan: 8.00 [ms]: astar"));
}
