//! Outlier clipping and mean-speed imputation

use log::{info, warn};
use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;

use super::aggregate::{CalibrationResult, EdgeKey};
use crate::model::{DEFAULT_SPEED, RoadGraph};

/// Bounds every calibrated edge speed within `k` standard deviations of
/// the population mean and imputes the mean for uncalibrated edges.
/// Returns a new annotated graph; the input is not mutated.
///
/// Wrongly reported road lengths produce implausible per-edge speeds,
/// which the clipping suppresses. Statistics run over calibrated edges
/// only, each parallel edge contributing with its own length against the
/// shared node-pair median.
pub(crate) fn clip_speeds(
    graph: &RoadGraph,
    result: &CalibrationResult,
    clip_std_multiplier: f64,
) -> RoadGraph {
    let mut observed = Vec::with_capacity(result.len());
    for edge in graph.graph.edge_references() {
        let key = EdgeKey::new(edge.source(), edge.target());
        if let Some(median) = result.median(key) {
            observed.push(edge.weight().length / median);
        }
    }

    let (mean, std) = if observed.is_empty() {
        warn!(
            "No edge gathered enough rides; imputing {:.2} km/h everywhere",
            DEFAULT_SPEED * 3.6
        );
        (DEFAULT_SPEED, 0.0)
    } else {
        mean_std(&observed)
    };
    info!("Average speed: {:.2} +- {:.2} km/h", mean * 3.6, std * 3.6);

    let lower = mean - clip_std_multiplier * std;
    let upper = mean + clip_std_multiplier * std;

    let mut annotated = graph.clone();
    let edges: Vec<EdgeIndex> = annotated.graph.edge_indices().collect();
    for index in edges {
        let Some((from, to)) = annotated.graph.edge_endpoints(index) else {
            continue;
        };
        let edge = &mut annotated.graph[index];
        let speed = match result.median(EdgeKey::new(from, to)) {
            Some(median) => (edge.length / median).clamp(lower, upper),
            None => mean,
        };
        edge.set_speed(speed);
    }
    annotated
}

/// Population mean and standard deviation.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_from(entries: Vec<(EdgeKey, f64)>) -> CalibrationResult {
        serde_json::from_value(serde_json::to_value(entries).unwrap()).unwrap()
    }

    #[test]
    fn uncalibrated_edges_get_the_population_mean() {
        let mut graph = RoadGraph::new();
        let a = graph.add_node(0.0, 0.0);
        let b = graph.add_node(100.0, 0.0);
        let c = graph.add_node(200.0, 0.0);
        graph.add_edge(a, b, 100.0);
        graph.add_edge(b, c, 100.0);

        // Only a->b is calibrated, at 10 m/s.
        let result = result_from(vec![(EdgeKey::new(a, b), 10.0)]);
        let annotated = clip_speeds(&graph, &result, 2.0);

        let uncalibrated = annotated
            .graph
            .edge_weight(annotated.graph.find_edge(b, c).unwrap())
            .unwrap();
        assert_eq!(uncalibrated.speed, 10.0);
        assert_eq!(uncalibrated.time, 10.0);
    }

    #[test]
    fn outlier_speeds_are_clamped() {
        let mut graph = RoadGraph::new();
        let mut keys = Vec::new();
        // Nine edges at 10 m/s and one at 100 m/s.
        for i in 0..10 {
            let a = graph.add_node(f64::from(i) * 10.0, 0.0);
            let b = graph.add_node(f64::from(i) * 10.0, 100.0);
            graph.add_edge(a, b, 100.0);
            keys.push(EdgeKey::new(a, b));
        }
        let mut entries: Vec<(EdgeKey, f64)> = keys[..9].iter().map(|&k| (k, 10.0)).collect();
        entries.push((keys[9], 1.0));

        let result = result_from(entries);
        let annotated = clip_speeds(&graph, &result, 2.0);

        let speeds: Vec<f64> = annotated
            .graph
            .edge_references()
            .map(|e| e.weight().speed)
            .collect();
        let (mean, std) = mean_std(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 100.0]);
        for (edge, speed) in annotated.graph.edge_references().zip(&speeds) {
            assert!(*speed >= mean - 2.0 * std && *speed <= mean + 2.0 * std);
            assert!((edge.weight().time - edge.weight().length / speed).abs() < 1e-9);
        }
        // The outlier was actually pulled down.
        assert!(speeds[9] < 100.0);
    }

    #[test]
    fn empty_calibration_imputes_the_default_speed() {
        let mut graph = RoadGraph::new();
        let a = graph.add_node(0.0, 0.0);
        let b = graph.add_node(100.0, 0.0);
        graph.add_edge(a, b, 100.0);

        let annotated = clip_speeds(&graph, &CalibrationResult::default(), 2.0);
        let edge = annotated
            .graph
            .edge_weight(annotated.graph.find_edge(a, b).unwrap())
            .unwrap();
        assert_eq!(edge.speed, DEFAULT_SPEED);
    }
}
