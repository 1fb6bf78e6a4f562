//! Drivable road network: a directed multigraph with a spatial index over its nodes

use std::fmt;

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{RoadEdge, RoadNode};
use crate::OsmNodeId;

/// Node position in the spatial index, `[lon, lat]` with the graph index as payload
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Number of R-tree candidates re-ranked by geodesic distance when snapping
const SNAP_CANDIDATES: usize = 8;

/// Road network of a single place.
///
/// Parallel edges between the same ordered node pair are allowed; each one is
/// told apart by its [`EdgeIndex`].
#[derive(Clone)]
pub struct RoadNetwork {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
}

impl RoadNetwork {
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, index: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(index)
    }

    /// OSM ID of a graph node
    pub fn osm_id(&self, index: NodeIndex) -> Option<OsmNodeId> {
        self.node(index).map(|node| node.id)
    }

    pub fn edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.graph.edge_weights()
    }

    /// All parallel edges from `from` to `to`
    pub fn edges_connecting(
        &self,
        from: NodeIndex,
        to: NodeIndex,
    ) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> {
        self.graph.edges_connecting(from, to)
    }

    /// Finds the node closest to `point` (x = lon, y = lat).
    ///
    /// Candidates come from the R-tree in coordinate space and are re-ranked
    /// by haversine distance, which matters away from the equator.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, f64)> {
        self.rtree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(SNAP_CANDIDATES)
            .map(|candidate| {
                let [lon, lat] = *candidate.geom();
                let meters = Haversine.distance(*point, Point::new(lon, lat));
                (candidate.data, meters)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Copy of this network keeping only the edges accepted by `keep`.
    ///
    /// Nodes and their indices are untouched, so routes found on the copy
    /// are valid on the original.
    pub fn retain_edges<F>(&self, keep: F) -> Self
    where
        F: Fn(&RoadEdge) -> bool,
    {
        let mut graph = self.graph.clone();
        graph.retain_edges(|g, edge| g.edge_weight(edge).is_some_and(&keep));
        Self {
            graph,
            rtree: self.rtree.clone(),
        }
    }
}

impl fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}

/// Incremental construction of a [`RoadNetwork`].
///
/// Nodes are deduplicated by OSM ID; the spatial index is bulk loaded once in
/// [`RoadNetworkBuilder::build`].
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    graph: DiGraph<RoadNode, RoadEdge>,
    by_osm_id: HashMap<OsmNodeId, NodeIndex>,
}

impl RoadNetworkBuilder {
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            by_osm_id: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a node at (`lon`, `lat`), or returns the existing one with the same OSM ID
    pub fn add_node(&mut self, id: OsmNodeId, lon: f64, lat: f64) -> NodeIndex {
        *self.by_osm_id.entry(id).or_insert_with(|| {
            self.graph.add_node(RoadNode {
                id,
                geometry: Point::new(lon, lat),
            })
        })
    }

    /// Adds a directed edge; parallel edges are kept
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: RoadEdge) -> EdgeIndex {
        self.graph.add_edge(from, to, edge)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn build(self) -> RoadNetwork {
        let points = self
            .graph
            .node_indices()
            .filter_map(|index| {
                self.graph.node_weight(index).map(|node| {
                    IndexedPoint::new([node.geometry.x(), node.geometry.y()], index)
                })
            })
            .collect();

        RoadNetwork {
            graph: self.graph,
            rtree: RTree::bulk_load(points),
        }
    }
}
