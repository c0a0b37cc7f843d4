//! Behavioural tests for triangulation-driven refinement.

use geo::Coord;
use isochrone_core::sampling::{
    AdaptivePointSource, PointSource, PointSourceError, SeedArray, SeedError,
    max_nearest_neighbour_distance,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Shared state for adaptive source scenarios.
#[derive(Debug, Default)]
struct AdaptiveWorld {
    source: RefCell<Option<AdaptivePointSource>>,
    seed_error: RefCell<Option<SeedError>>,
    outcome: RefCell<Option<Result<Coord<f64>, PointSourceError>>>,
    coverage: RefCell<Vec<f64>>,
}

#[fixture]
fn world() -> AdaptiveWorld {
    AdaptiveWorld::default()
}

fn seed(world: &AdaptiveWorld, pairs: &[(f64, f64)]) {
    let points = pairs.iter().map(|&(x, y)| Coord { x, y }).collect();
    let source = AdaptivePointSource::new(points).expect("valid seeds");
    world.source.replace(Some(source));
}

fn coverage_of(source: &AdaptivePointSource) -> f64 {
    max_nearest_neighbour_distance(source.points()).expect("at least two points")
}

#[given("the seed points 0,0 and 0,1 and 1,1")]
fn given_triangle(world: &AdaptiveWorld) {
    seed(world, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
}

#[given("the seed points 0,0 and 0,1 and 1,1 and 1.1,1")]
fn given_two_triangles(world: &AdaptiveWorld) {
    seed(world, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.1, 1.0)]);
}

#[given("the seed points 0,0 and 1,1 and 2,2")]
fn given_collinear(world: &AdaptiveWorld) {
    seed(world, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
}

#[when("I generate one point")]
fn when_generate_one(world: &AdaptiveWorld) {
    let mut borrowed = world.source.borrow_mut();
    let source = borrowed.as_mut().expect("source seeded");
    world.outcome.replace(Some(source.next_point()));
}

#[when("I generate nine points")]
fn when_generate_nine(world: &AdaptiveWorld) {
    let mut borrowed = world.source.borrow_mut();
    let source = borrowed.as_mut().expect("source seeded");
    let mut coverage = vec![coverage_of(source)];
    for _ in 0..9 {
        source.next_point().expect("point generated");
        coverage.push(coverage_of(source));
    }
    world.coverage.replace(coverage);
}

#[when("I build a source from rows of three coordinates")]
fn when_wide_rows(world: &AdaptiveWorld) {
    let row = |x: f64| SeedArray::List(vec![
        SeedArray::Scalar(x),
        SeedArray::Scalar(0.0),
        SeedArray::Scalar(1.0),
    ]);
    let seeds = SeedArray::List(vec![row(0.0), row(1.0), row(2.0)]);
    let err = AdaptivePointSource::from_array(&seeds).expect_err("rows too wide");
    world.seed_error.replace(Some(err));
}

#[then("the generated point is one third, two thirds")]
fn then_centroid(world: &AdaptiveWorld) {
    let outcome = world.outcome.borrow();
    let point = outcome
        .as_ref()
        .expect("point requested")
        .as_ref()
        .expect("point generated");
    assert!((point.x - 1.0 / 3.0).abs() < 1e-12, "x was {}", point.x);
    assert!((point.y - 2.0 / 3.0).abs() < 1e-12, "y was {}", point.y);
}

#[then("the largest nearest-neighbour distance never grew")]
fn then_non_increasing(world: &AdaptiveWorld) {
    let coverage = world.coverage.borrow();
    for pair in coverage.windows(2) {
        if let [before, after] = pair {
            assert!(*after <= *before + 1e-12, "coverage grew from {before} to {after}");
        }
    }
}

#[then("the largest nearest-neighbour distance shrank overall")]
fn then_shrank(world: &AdaptiveWorld) {
    let coverage = world.coverage.borrow();
    let (first, last) = (
        coverage.first().expect("initial coverage"),
        coverage.last().expect("final coverage"),
    );
    assert!(last < first, "coverage stayed at {first}");
}

#[then("generation fails with degenerate geometry")]
fn then_degenerate(world: &AdaptiveWorld) {
    assert_eq!(
        *world.outcome.borrow(),
        Some(Err(PointSourceError::DegenerateGeometry))
    );
}

#[then("the point set still holds three points")]
fn then_unchanged(world: &AdaptiveWorld) {
    let borrowed = world.source.borrow();
    assert_eq!(borrowed.as_ref().expect("source seeded").points().len(), 3);
}

#[then("the seed array is rejected for its dimensionality")]
fn then_bad_shape(world: &AdaptiveWorld) {
    assert!(matches!(
        *world.seed_error.borrow(),
        Some(SeedError::InvalidDimensionality { .. })
    ));
}

#[scenario(path = "tests/features/adaptive_source.feature", index = 0)]
fn single_triangle(world: AdaptiveWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/adaptive_source.feature", index = 1)]
fn largest_triangle(world: AdaptiveWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/adaptive_source.feature", index = 2)]
fn even_spread(world: AdaptiveWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/adaptive_source.feature", index = 3)]
fn collinear_seeds(world: AdaptiveWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/adaptive_source.feature", index = 4)]
fn wide_rows(world: AdaptiveWorld) {
    let _ = world;
}
