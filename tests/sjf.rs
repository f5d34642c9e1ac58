use cpusim::core::TraceKind;
use cpusim::{PoissonWorkload, Simulator, Sjf};

mod common;

/// Each newcomer is shorter than whatever is running and takes the CPU.
#[test]
fn test_sjf_each_arrival_preempts() {
    let outcome = common::run_scripted(Sjf, &[(0.0, 5.0), (1.0, 3.0), (2.0, 1.0)]);

    assert_eq!(outcome.completion_order(), vec![2, 1, 0]);
    assert_eq!(common::completion_time(&outcome, 2), 3.0);
    assert_eq!(common::completion_time(&outcome, 1), 5.0);
    assert_eq!(common::completion_time(&outcome, 0), 9.0);
    assert_eq!(common::start_time(&outcome, 0), 0.0);

    assert_eq!(
        common::slices(&outcome),
        vec![
            (0, 0.0, 1.0),
            (1, 1.0, 2.0),
            (2, 2.0, 3.0),
            (1, 3.0, 5.0),
            (0, 5.0, 9.0),
        ]
    );
    assert_eq!(
        common::ended_by(&outcome),
        vec![
            TraceKind::Preempted { pid: 0 },
            TraceKind::Preempted { pid: 1 },
            TraceKind::Completed { pid: 2 },
            TraceKind::Completed { pid: 1 },
            TraceKind::Completed { pid: 0 },
        ]
    );
}

/// A queued short job runs before the preempted long one resumes.
#[test]
fn test_sjf_short_jobs_run_before_preempted() {
    let outcome = common::run_scripted(Sjf, &[(0.0, 5.0), (1.0, 1.0), (2.0, 1.0)]);

    assert_eq!(outcome.completion_order(), vec![1, 2, 0]);
    assert_eq!(common::completion_time(&outcome, 1), 2.0);
    assert_eq!(common::completion_time(&outcome, 2), 3.0);
    assert_eq!(common::completion_time(&outcome, 0), 7.0);
    assert_eq!(
        common::slices(&outcome),
        vec![(0, 0.0, 1.0), (1, 1.0, 2.0), (2, 2.0, 3.0), (0, 3.0, 7.0)]
    );
    // The cancelled completion of the preempted job never fires early
    assert_eq!(outcome.trace.dispatch_count(0), 2);
}

/// Equal remaining time does not preempt.
#[test]
fn test_sjf_ties_keep_cpu() {
    let outcome = common::run_scripted(Sjf, &[(0.0, 2.0), (1.0, 1.0)]);

    assert_eq!(outcome.completion_order(), vec![0, 1]);
    assert_eq!(common::completion_time(&outcome, 0), 2.0);
    assert_eq!(common::completion_time(&outcome, 1), 3.0);
    assert_eq!(outcome.trace.dispatch_count(0), 1);
}

/// Waiting jobs are picked shortest first, not by arrival.
#[test]
fn test_sjf_picks_shortest_waiting() {
    let outcome = common::run_scripted(
        Sjf,
        &[(0.0, 4.0), (0.5, 6.0), (1.0, 5.0), (1.5, 4.5)],
    );

    assert_eq!(outcome.completion_order(), vec![0, 3, 2, 1]);
    assert_eq!(common::completion_time(&outcome, 3), 8.5);
    assert_eq!(common::completion_time(&outcome, 1), 19.5);
}

/// After every step, no waiting job is strictly shorter than the running one.
#[test]
fn test_sjf_preemption_invariant() {
    common::setup_test();
    let workload = PoissonWorkload::new(14.0, 0.06, 11).unwrap();
    let mut sim = Simulator::new(Sjf, workload, 1_500).with_trace(true);

    while !sim.is_finished() {
        sim.step().unwrap();
        let ctx = &sim.core.ctx;
        if let Some(running) = ctx.running_process() {
            if let Some((_, shortest)) = ctx.ready.peek() {
                assert!(
                    shortest >= running.remaining(),
                    "t={}: waiting job with {shortest} left, running has {}",
                    ctx.now,
                    running.remaining()
                );
            }
        }
    }

    let preemptions = sim
        .core
        .ctx
        .trace
        .events()
        .iter()
        .filter(|e| matches!(e.kind, TraceKind::Preempted { .. }))
        .count();
    assert!(preemptions > 0, "workload never exercised preemption");
}
