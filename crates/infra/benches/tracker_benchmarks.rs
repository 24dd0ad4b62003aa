use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

use std::sync::Arc;

use ordertrack_infra::storage::{
    DeviceOrderStore, DeviceStore, InMemoryDeviceStore, InMemoryOrderStore, OrderStore,
};
use ordertrack_infra::tracker::OrderTracker;
use ordertrack_orders::{ProductSnapshot, RandomTrackingNumbers};

fn product(i: usize) -> ProductSnapshot {
    ProductSnapshot::new(format!("p{i}"), "Pro Camera Drone", "drone.jpg", 129_999)
}

fn seeded_tracker<S: OrderStore>(store: S) -> OrderTracker<S, RandomTrackingNumbers> {
    OrderTracker::open(store, RandomTrackingNumbers::seeded("GIGA", 42).unwrap()).unwrap()
}

fn bench_order_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_lifecycle");

    // Fresh tracker per iteration: every mutation clones the whole list.
    group.bench_function("create_order_in_memory", |b| {
        b.iter_batched(
            || seeded_tracker(InMemoryOrderStore::new()),
            |tracker| black_box(tracker.create_order(product(1)).unwrap()),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("create_then_deliver", |b| {
        b.iter_batched(
            || seeded_tracker(InMemoryOrderStore::new()),
            |tracker| {
                let order = tracker.create_order(product(1)).unwrap();
                for _ in 0..4 {
                    black_box(tracker.advance(order.id_typed()).unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_device_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("device_reload");

    for order_count in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*order_count as u64));
        group.bench_with_input(
            BenchmarkId::new("open_tracker", order_count),
            order_count,
            |b, &count| {
                let device = Arc::new(InMemoryDeviceStore::new());
                let tracker = seeded_tracker(DeviceOrderStore::new(device.clone()));
                for i in 0..count {
                    let order = tracker.create_order(product(i)).unwrap();
                    tracker.advance(order.id_typed()).unwrap();
                }
                assert!(device.get("orders").unwrap().is_some());

                b.iter(|| {
                    let reopened = seeded_tracker(DeviceOrderStore::new(device.clone()));
                    black_box(reopened.list_orders().unwrap().len());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_order_lifecycle, bench_device_reload);
criterion_main!(benches);
