//! End-to-end calibration over a small synthetic network.

use petgraph::visit::EdgeRef;
use viatempo::prelude::*;

/// 4x4 grid, 100 m spacing, bidirectional edges.
fn grid_graph() -> (RoadGraph, Vec<RoadNodeId>) {
    let mut graph = RoadGraph::new();
    let mut nodes = Vec::new();
    for row in 0..4 {
        for col in 0..4 {
            nodes.push(graph.add_node(f64::from(col) * 100.0, f64::from(row) * 100.0));
        }
    }
    let at = |row: usize, col: usize| nodes[row * 4 + col];
    for row in 0..4 {
        for col in 0..4 {
            if col + 1 < 4 {
                graph.add_edge(at(row, col), at(row, col + 1), 100.0);
                graph.add_edge(at(row, col + 1), at(row, col), 100.0);
            }
            if row + 1 < 4 {
                graph.add_edge(at(row, col), at(row + 1, col), 100.0);
                graph.add_edge(at(row + 1, col), at(row, col), 100.0);
            }
        }
    }
    (graph, nodes)
}

/// Trips driven at a constant 10 m/s between grid corners, with slight
/// endpoint noise so snapping has work to do.
fn synthetic_trips(graph: &RoadGraph, nodes: &[RoadNodeId], repeats: usize) -> TripData {
    let corners = [(0usize, 15usize), (15, 0), (3, 12), (12, 3)];
    let mut trips = TripData::default();
    for i in 0..repeats {
        for &(from, to) in &corners {
            let a = graph.point(nodes[from]).unwrap();
            let b = graph.point(nodes[to]).unwrap();
            // Manhattan distance between corners is 600 m; at 10 m/s the
            // trip takes 60 time units.
            let start = (i * 1000) as u64;
            trips.push(TripRecord {
                pickup_time: start,
                dropoff_time: start + 60,
                pickup_xy: [a.x() + 3.0, a.y() - 2.0],
                dropoff_xy: [b.x() - 4.0, b.y() + 1.0],
            });
        }
    }
    trips
}

#[test]
fn calibrates_every_edge_of_a_grid() {
    let (graph, nodes) = grid_graph();
    let table = build_route_table(&graph);
    let trips = synthetic_trips(&graph, &nodes, 12);
    let config = CalibrationConfig {
        min_ride_count: 3,
        ..CalibrationConfig::default()
    };

    let calibration = calibrate(&graph, &table, &trips, &config).unwrap();
    assert_eq!(calibration.stats.accepted, trips.len());
    assert_eq!(calibration.stats.route_missing, 0);
    assert!(calibration.stats.calibrated_edges > 0);

    // Every edge carries a speed and a consistent time, whether
    // calibrated or imputed.
    for edge in calibration.graph.graph.edge_references() {
        let weight = edge.weight();
        assert!(weight.speed > 0.0);
        assert!((weight.time - weight.length / weight.speed).abs() < 1e-9);
    }
    // All observed trips ran at 10 m/s, so calibrated speeds sit there.
    let calibrated = calibration.medians.len();
    assert!(calibrated <= calibration.graph.edge_count());
    for (_, median) in calibration.medians.iter() {
        assert!((median - 10.0).abs() < 1e-6);
    }
}

#[test]
fn uncalibrated_edges_equal_the_population_mean() {
    let (graph, nodes) = grid_graph();
    let table = build_route_table(&graph);
    // Only one corner pair is driven, leaving most edges unobserved.
    let corners = [(0usize, 15usize)];
    let mut trips = TripData::default();
    for i in 0..10u64 {
        let a = graph.point(nodes[corners[0].0]).unwrap();
        let b = graph.point(nodes[corners[0].1]).unwrap();
        trips.push(TripRecord {
            pickup_time: i * 100,
            dropoff_time: i * 100 + 60,
            pickup_xy: [a.x(), a.y()],
            dropoff_xy: [b.x(), b.y()],
        });
    }

    let calibration = calibrate(&graph, &table, &trips, &CalibrationConfig::default()).unwrap();
    assert!(calibration.stats.calibrated_edges > 0);

    // Mean over calibrated edges; uncalibrated edges must equal it
    // exactly.
    let mut sum = 0.0;
    let mut count = 0.0;
    for edge in calibration.graph.graph.edge_references() {
        let key = EdgeKey::new(edge.source(), edge.target());
        if calibration.medians.median(key).is_some() {
            sum += edge.weight().length / calibration.medians.median(key).unwrap();
            count += 1.0;
        }
    }
    let mean = sum / count;
    for edge in calibration.graph.graph.edge_references() {
        let key = EdgeKey::new(edge.source(), edge.target());
        if calibration.medians.median(key).is_none() {
            assert_eq!(edge.weight().speed, mean);
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let (graph, nodes) = grid_graph();
    let table = build_route_table(&graph);
    let trips = synthetic_trips(&graph, &nodes, 12);
    let config = CalibrationConfig {
        min_ride_count: 3,
        ..CalibrationConfig::default()
    };

    let first = calibrate(&graph, &table, &trips, &config).unwrap();
    let second = calibrate(&graph, &table, &trips, &config).unwrap();

    assert_eq!(first.medians, second.medians);
    let speeds = |c: &Calibration| -> Vec<u64> {
        c.graph
            .graph
            .edge_references()
            .map(|e| e.weight().speed.to_bits())
            .collect()
    };
    assert_eq!(speeds(&first), speeds(&second));
}

#[test]
fn far_away_trips_contribute_nothing() {
    let (graph, _) = grid_graph();
    let table = build_route_table(&graph);
    let mut trips = TripData::default();
    // Pickup 500 away from the nearest node, beyond the 300 default.
    trips.push(TripRecord {
        pickup_time: 0,
        dropoff_time: 60,
        pickup_xy: [-500.0, 0.0],
        dropoff_xy: [300.0, 300.0],
    });

    let calibration = calibrate(&graph, &table, &trips, &CalibrationConfig::default()).unwrap();
    assert_eq!(calibration.stats.accepted, 0);
    assert_eq!(calibration.stats.rejected_distance, 1);
    assert_eq!(calibration.stats.calibrated_edges, 0);
    // Everything falls back to the imputed default.
    for edge in calibration.graph.graph.edge_references() {
        assert_eq!(edge.weight().speed, DEFAULT_SPEED);
    }
}

#[test]
fn cached_table_matches_a_fresh_build() {
    let (graph, _) = grid_graph();
    let store = MemoryBlobStore::new();
    let built = load_or_build_route_table(&graph, &store).unwrap();
    let cached = load_or_build_route_table(&graph, &store).unwrap();
    assert_eq!(built, cached);
    assert!(built.domain_matches(&graph));
}
