//! Distance and duration totals of a node path.
//!
//! When several parallel edges join two consecutive nodes the cheapest one is
//! counted, whichever search variant produced the path.

use petgraph::graph::NodeIndex;

use crate::{
    Meters, Seconds,
    model::{RoadEdge, RoadNetwork},
    routing::query::{Route, WeightMode},
};

/// Aggregates of a computed route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_m: Meters,
    /// Zero unless the route was searched by travel time
    pub duration_s: Seconds,
    pub nodes: usize,
}

/// Sum of the shortest parallel edge `length` between consecutive nodes
pub fn total_length(network: &RoadNetwork, nodes: &[NodeIndex]) -> Meters {
    sum_cheapest_steps(network, nodes, |edge| Some(edge.length))
}

/// Sum of the fastest parallel edge `travel_time` between consecutive nodes.
///
/// Edges without a derived travel time are ignored, so a network that was
/// never annotated sums to zero.
pub fn total_travel_time(network: &RoadNetwork, nodes: &[NodeIndex]) -> Seconds {
    sum_cheapest_steps(network, nodes, |edge| edge.travel_time)
}

pub fn summarize(network: &RoadNetwork, route: &Route, weight: WeightMode) -> RouteSummary {
    let duration_s = match weight {
        WeightMode::Time => total_travel_time(network, route.nodes()),
        WeightMode::Distance => 0.0,
    };

    RouteSummary {
        distance_m: total_length(network, route.nodes()),
        duration_s,
        nodes: route.len(),
    }
}

fn sum_cheapest_steps<F>(network: &RoadNetwork, nodes: &[NodeIndex], attribute: F) -> f64
where
    F: Fn(&RoadEdge) -> Option<f64>,
{
    nodes
        .windows(2)
        .filter_map(|step| {
            let &[from, to] = step else {
                return None;
            };
            // A missing edge contributes nothing
            network
                .edges_connecting(from, to)
                .filter_map(|edge| attribute(edge.weight()))
                .min_by(f64::total_cmp)
        })
        .sum()
}
