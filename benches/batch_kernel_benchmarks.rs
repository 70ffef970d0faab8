use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use ratwalk::graph::Graph;
use ratwalk::partition::find_partition;
use ratwalk::sim::batch::{find_all_sums, locate_value};
use ratwalk::sim::state::SimState;
use ratwalk::zone_setup::build_zone_topology;

fn ring_graph(n: u32) -> Graph {
    let mut degree = vec![1u32; n as usize];
    let mut edges = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        edges.push((i, j));
        edges.push((j, i));
    }
    edges.sort();
    for &(i, _) in &edges {
        degree[i as usize] += 1;
    }
    let mut neighbor_start = vec![0u32; n as usize + 1];
    for i in 0..n as usize {
        neighbor_start[i + 1] = neighbor_start[i] + degree[i];
    }
    let mut neighbor = vec![0u32; neighbor_start[n as usize] as usize];
    let mut cursor = neighbor_start.clone();
    for i in 0..n {
        neighbor[cursor[i as usize] as usize] = i;
        cursor[i as usize] += 1;
    }
    for &(i, j) in &edges {
        neighbor[cursor[i as usize] as usize] = j;
        cursor[i as usize] += 1;
    }
    Graph {
        width: n,
        height: 1,
        neighbor_start,
        neighbor,
        zone_id: vec![0; n as usize],
        regions: vec![],
    }
}

fn bench_partitioner(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioner");
    for &regions in &[16usize, 64, 256] {
        let weights: Vec<f64> = (0..regions).map(|i| ((i * 37 % 101) + 1) as f64).collect();
        group.throughput(Throughput::Elements(regions as u64));
        group.bench_with_input(BenchmarkId::new("find_partition_k8", regions), &weights, |b, w| {
            b.iter(|| black_box(find_partition(w, 8)));
        });
    }
    group.finish();
}

fn bench_locate_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_value");
    for &len in &[8usize, 64, 512] {
        let cumulative: Vec<f64> = (1..=len).map(|i| i as f64).collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("locate_value", len), &cumulative, |b, a| {
            b.iter(|| black_box(locate_value((len / 2) as f64 - 0.5, a)));
        });
    }
    group.finish();
}

fn bench_find_all_sums(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_all_sums");
    for &n in &[64u32, 512, 4096] {
        let graph = ring_graph(n);
        let topology = build_zone_topology(&graph, 0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("find_all_sums", n), &graph, |b, graph| {
            let mut state = SimState::new(graph, 1, &[0], 0);
            for w in state.node_weight.iter_mut() {
                *w = 1.5;
            }
            b.iter(|| find_all_sums(black_box(&mut state), graph, &topology));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partitioner, bench_locate_value, bench_find_all_sums);
criterion_main!(benches);
