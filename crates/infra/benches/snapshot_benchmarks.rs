use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use innkeep_commands::{CheckIn, CommandInvoker};
use innkeep_core::{Money, RoomId};
use innkeep_hotel::{
    ClientDetails, ModelService, ReservationBuilder, Room, RoomKind, SnapshotSupport,
};
use innkeep_infra::{AvailabilityCache, InMemoryModelService};
use std::sync::Arc;

/// Hotel with `rooms` rooms, every one of them holding an active stay.
fn populated_hotel(rooms: u32) -> Arc<InMemoryModelService> {
    let floor = (1..=rooms)
        .map(|n| {
            Room::new(
                RoomId::from_sequence(n),
                format!("{n:04}"),
                RoomKind::Double,
                Money::from_major(80),
            )
        })
        .collect();
    let cache = Arc::new(AvailabilityCache::new());
    let model = Arc::new(InMemoryModelService::with_rooms(cache, floor));

    for n in 1..=rooms {
        let client = model
            .register_client(ClientDetails::new(
                "Guest",
                format!("{n}"),
                format!("DOC-{n}"),
                format!("555-{n:05}"),
            ))
            .unwrap();
        let draft = ReservationBuilder::for_check_in(
            client.id_typed().clone(),
            RoomId::from_sequence(n),
            Money::from_major(80),
        )
        .build()
        .unwrap();
        model.create_reservation(draft).unwrap();
    }
    model
}

fn bench_snapshot_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_capture");

    for reservations in [10u32, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(*reservations as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(reservations),
            reservations,
            |b, &reservations| {
                let model = populated_hotel(reservations);
                b.iter(|| black_box(model.capture().unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_snapshot_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_restore");

    for reservations in [10u32, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(*reservations as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(reservations),
            reservations,
            |b, &reservations| {
                let model = populated_hotel(reservations);
                let snapshot = model.capture().unwrap();
                b.iter(|| model.restore_complete(black_box(&snapshot)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_invoker_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoker_check_in_and_undo");

    for snapshots in [false, true] {
        let label = if snapshots { "with_snapshots" } else { "logical_undo" };
        group.bench_function(label, |b| {
            let model = populated_hotel(200);
            // Free room 0001 for the walk-in.
            let held = model
                .active_reservation_for_room(&RoomId::from_sequence(1))
                .unwrap();
            model.delete_reservation(held.id_typed()).unwrap();
            let service: Arc<dyn ModelService> = model.clone();
            let mut invoker = if snapshots {
                CommandInvoker::with_snapshots(0, model.clone())
            } else {
                CommandInvoker::new(0)
            };

            b.iter(|| {
                let guest = ClientDetails::new("Walk", "In", "DOC-WALKIN", "555-99999");
                let cmd = CheckIn::new(service.clone(), guest, "0001");
                invoker.execute_command(Box::new(cmd)).unwrap();
                invoker.undo().unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_snapshot_capture,
    bench_snapshot_restore,
    bench_invoker_round_trip
);
criterion_main!(benches);
