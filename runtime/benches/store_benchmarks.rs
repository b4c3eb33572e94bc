//! Store and dispatcher benchmarks
//!
//! Measures the synchronous send path:
//! - Store send without subscribers
//! - Store send with subscribers to notify
//! - Dispatch through the dispatcher into a registered store
//! - Feedback effects
//!
//! Run with: `cargo bench --bench store_benchmarks`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nested_todo_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use nested_todo_runtime::{Dispatcher, Store};

#[derive(Clone, Debug, Default)]
struct BenchState {
    counter: i64,
    log: Vec<i64>,
}

#[derive(Clone, Debug)]
enum BenchAction {
    Increment,
    Quiet,
    IncrementAndLog,
    Log,
}

struct BenchReducer;

impl Reducer for BenchReducer {
    type State = BenchState;
    type Action = BenchAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BenchAction::Increment => {
                state.counter += 1;
                smallvec![Effect::Notify]
            },
            BenchAction::Quiet => SmallVec::new(),
            BenchAction::IncrementAndLog => {
                state.counter += 1;
                smallvec![Effect::feedback(BenchAction::Log), Effect::Notify]
            },
            BenchAction::Log => {
                if state.log.len() >= 1_024 {
                    state.log.clear();
                }
                state.log.push(state.counter);
                smallvec![Effect::None]
            },
        }
    }
}

type BenchStore = Store<BenchState, BenchAction, (), BenchReducer>;

fn store() -> BenchStore {
    Store::new(BenchState::default(), BenchReducer, ())
}

fn benchmark_store_send(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_send");
    group.throughput(Throughput::Elements(1));

    let quiet = store();
    group.bench_function("no_effects", |b| {
        b.iter(|| black_box(quiet.send(BenchAction::Quiet)).expect("send"));
    });

    let notifying = store();
    group.bench_function("notify_no_subscribers", |b| {
        b.iter(|| black_box(notifying.send(BenchAction::Increment)).expect("send"));
    });

    let feedback = store();
    group.bench_function("feedback_then_notify", |b| {
        b.iter(|| black_box(feedback.send(BenchAction::IncrementAndLog)).expect("send"));
    });

    group.finish();
}

fn benchmark_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribers");
    group.throughput(Throughput::Elements(1));

    for subscribers in [1_usize, 8, 64] {
        let store = store();
        for _ in 0..subscribers {
            let reader = store.clone();
            store.subscribe(move || {
                black_box(reader.state(|s| s.counter));
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| black_box(store.send(BenchAction::Increment)).expect("send"));
            },
        );
    }

    group.finish();
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher");
    group.throughput(Throughput::Elements(1));

    let dispatcher = Dispatcher::new();
    let store = store();
    store.register_with(&dispatcher);
    store.subscribe(|| {});

    group.bench_function("dispatch_into_store", |b| {
        b.iter(|| dispatcher.dispatch(black_box(BenchAction::Increment)).expect("dispatch"));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_store_send,
    benchmark_subscribers,
    benchmark_dispatch
);
criterion_main!(benches);
