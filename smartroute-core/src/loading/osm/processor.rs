use std::path::Path;

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use log::{debug, warn};
use osmpbf::{Element, ElementReader};

use crate::{
    Error, OsmNodeId,
    model::{RoadEdge, RoadNetwork, RoadNetworkBuilder, TagValue},
};

/// Road classes open to cars
const DRIVABLE_CLASSES: [&str; 15] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
    "service",
    "road",
];

/// `service=*` values that are not part of the through network
const EXCLUDED_SERVICES: [&str; 5] = [
    "parking",
    "parking_aisle",
    "driveway",
    "private",
    "emergency_access",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

/// A drivable way with the tags the cost model needs
#[derive(Debug)]
struct DriveWay {
    refs: Vec<OsmNodeId>,
    highway: TagValue,
    maxspeed: Option<TagValue>,
    direction: Direction,
}

impl DriveWay {
    fn from_tags<'a>(
        tags: impl Iterator<Item = (&'a str, &'a str)>,
        refs: impl Iterator<Item = OsmNodeId>,
    ) -> Option<Self> {
        let mut highway = None;
        let mut maxspeed = None;
        let mut oneway = None;
        let mut roundabout = false;

        for (key, value) in tags {
            match key {
                "highway" => highway = Some(value),
                "maxspeed" => maxspeed = Some(TagValue::parse(value)),
                "oneway" => oneway = Some(value),
                "junction" => roundabout = matches!(value, "roundabout" | "circular"),
                "access" | "motor_vehicle" | "motorcar" if matches!(value, "no" | "private") => {
                    return None;
                }
                "area" if value == "yes" => return None,
                "service" if EXCLUDED_SERVICES.contains(&value) => return None,
                _ => {}
            }
        }

        let highway = highway.filter(|class| DRIVABLE_CLASSES.contains(class))?;
        let direction = match oneway {
            Some("yes" | "true" | "1") => Direction::Forward,
            Some("-1" | "reverse") => Direction::Backward,
            Some(_) => Direction::Both,
            None if highway == "motorway" || roundabout => Direction::Forward,
            None => Direction::Both,
        };

        let refs: Vec<OsmNodeId> = refs.collect();
        (refs.len() >= 2).then(|| DriveWay {
            refs,
            highway: TagValue::parse(highway),
            maxspeed,
            direction,
        })
    }
}

/// Reads the drivable road network from an OSM PBF extract.
///
/// Every pair of consecutive way nodes becomes one edge (two for two-way
/// roads) with its haversine length.
pub(crate) fn read_drivable_network(path: &Path) -> Result<RoadNetwork, Error> {
    let reader = ElementReader::from_path(path)?;

    let mut positions: HashMap<OsmNodeId, (f64, f64)> = HashMap::new();
    let mut ways: Vec<DriveWay> = Vec::new();

    reader.for_each(|element| match element {
        Element::Node(node) => {
            positions.insert(node.id(), (node.lon(), node.lat()));
        }
        Element::DenseNode(node) => {
            positions.insert(node.id(), (node.lon(), node.lat()));
        }
        Element::Way(way) => {
            if let Some(drive_way) = DriveWay::from_tags(way.tags(), way.refs()) {
                ways.push(drive_way);
            }
        }
        Element::Relation(_) => {}
    })?;

    debug!(
        "Read {} nodes and {} drivable ways from {}",
        positions.len(),
        ways.len(),
        path.display()
    );

    Ok(build_network(&positions, &ways))
}

fn build_network(positions: &HashMap<OsmNodeId, (f64, f64)>, ways: &[DriveWay]) -> RoadNetwork {
    let segment_count: usize = ways.iter().map(|way| way.refs.len() - 1).sum();
    let mut builder = RoadNetworkBuilder::with_capacity(segment_count, segment_count * 2);
    let mut missing_nodes = 0usize;

    for way in ways {
        for pair in way.refs.windows(2) {
            let &[a, b] = pair else {
                continue;
            };
            let (Some(&(a_lon, a_lat)), Some(&(b_lon, b_lat))) = (positions.get(&a), positions.get(&b))
            else {
                missing_nodes += 1;
                continue;
            };

            let from = builder.add_node(a, a_lon, a_lat);
            let to = builder.add_node(b, b_lon, b_lat);
            let edge = RoadEdge {
                length: Haversine.distance(Point::new(a_lon, a_lat), Point::new(b_lon, b_lat)),
                highway: Some(way.highway.clone()),
                maxspeed: way.maxspeed.clone(),
                travel_time: None,
            };

            match way.direction {
                Direction::Forward => {
                    builder.add_edge(from, to, edge);
                }
                Direction::Backward => {
                    builder.add_edge(to, from, edge);
                }
                Direction::Both => {
                    builder.add_edge(from, to, edge.clone());
                    builder.add_edge(to, from, edge);
                }
            }
        }
    }

    if missing_nodes > 0 {
        warn!("Skipped {missing_nodes} way segments referencing nodes outside the extract");
    }

    builder.build()
}
