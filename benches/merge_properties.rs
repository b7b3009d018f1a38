//! Benchmarks for the property merge resolver and the substitution driver.
//!
//! These benchmarks measure the merge over property maps of various sizes
//! and overlap patterns, plus a full driver invocation over topologies of
//! increasing node counts.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use indexmap::IndexMap;
use toposub::catalog::{InMemoryTypeCatalog, TypeDefinition, TypeKind};
use toposub::context::ExecutionContext;
use toposub::matching::MatchingConfiguration;
use toposub::merge::merge_properties;
use toposub::resources::{CandidateResource, InMemoryResourceStore};
use toposub::substitution::{ComputeNodes, SubstitutionDriver};
use toposub::template::{PropertyMap, PropertyValue, Template, Topology};

/// Build a property map with `len` entries; every fourth value is an
/// explicit null so both merge branches get exercised.
fn property_map(len: usize, prefix: &str) -> PropertyMap {
    let mut map = PropertyMap::new();
    for i in 0..len {
        let value = if i % 4 == 0 {
            None
        } else {
            Some(PropertyValue::scalar(format!("{}-{}", prefix, i)))
        };
        map.insert(format!("prop_{}", i), value);
    }
    map
}

/// Property map whose keys do not collide with `property_map` output
fn disjoint_property_map(len: usize, prefix: &str) -> PropertyMap {
    let mut map = PropertyMap::new();
    for i in 0..len {
        map.insert(
            format!("extra_{}", i),
            Some(PropertyValue::scalar(format!("{}-{}", prefix, i))),
        );
    }
    map
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_properties");

    let source = property_map(50, "topo");
    let overlapping = property_map(50, "cand");
    let disjoint = disjoint_property_map(50, "cand");
    let mut mixed = property_map(25, "cand");
    mixed.extend(disjoint_property_map(25, "cand"));

    group.bench_function("overlapping_keys", |b| {
        b.iter_batched(
            || overlapping.clone(),
            |target| merge_properties(black_box(&source), target, true),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("disjoint_keys", |b| {
        b.iter_batched(
            || disjoint.clone(),
            |target| merge_properties(black_box(&source), target, true),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("mixed_keys", |b| {
        b.iter_batched(
            || mixed.clone(),
            |target| merge_properties(black_box(&source), target, true),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_merge_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_scaling");

    for len in [10, 50, 200, 1000] {
        let source = property_map(len, "topo");
        let target = property_map(len, "cand");
        group.bench_with_input(BenchmarkId::new("entries", len), &len, |b, _| {
            b.iter_batched(
                || target.clone(),
                |target| merge_properties(black_box(&source), target, true),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_driver_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_apply");

    for nodes in [1usize, 10, 50] {
        let mut template = Template::new("my.nodes.AwsCompute", "offer");
        template.properties = property_map(10, "cand");
        let candidate = CandidateResource::new("aws-small", template);

        let mut store = InMemoryResourceStore::new();
        store.register(candidate.clone());
        let mut catalog = InMemoryTypeCatalog::new();
        catalog.register(TypeKind::Node, TypeDefinition::new("my.nodes.AwsCompute"));
        let mut driver = SubstitutionDriver::new(Arc::new(store), Arc::new(catalog));
        driver.register(Box::new(ComputeNodes));

        let mut topology = Topology::new();
        let mut configuration = MatchingConfiguration::new();
        for i in 0..nodes {
            let id = format!("node-{}", i);
            let mut node = Template::new("my.nodes.Compute", format!("web-{}", i));
            node.properties = property_map(10, "topo");
            topology.insert(id.clone(), node);
            configuration.confirm(id, "aws-small");
        }

        let mut candidates: IndexMap<String, CandidateResource> = IndexMap::new();
        candidates.insert(candidate.id.clone(), candidate);

        group.bench_with_input(BenchmarkId::new("nodes", nodes), &nodes, |b, _| {
            b.iter_batched(
                || {
                    let mut context = ExecutionContext::new();
                    context.save_configuration("ComputeNodes", configuration.clone());
                    context
                        .cache_mut()
                        .put("ComputeNodes.candidates", candidates.clone());
                    (topology.clone(), context)
                },
                |(mut topology, mut context)| {
                    driver.apply(&mut topology, &mut context).unwrap()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_merge_scaling, bench_driver_apply);
criterion_main!(benches);
