//! Road network components - intersections and road segments

use geo::Point;

use crate::{Meters, OsmNodeId, Seconds, model::TagValue};

/// Road graph node (an intersection or way vertex)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// OSM ID of the node
    pub id: OsmNodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

/// Road graph edge (a drivable road segment)
#[derive(Debug, Clone, Default)]
pub struct RoadEdge {
    /// Segment length in meters
    pub length: Meters,
    /// `highway` class of the segment
    pub highway: Option<TagValue>,
    /// Posted `maxspeed`, raw as tagged
    pub maxspeed: Option<TagValue>,
    /// Derived travel time in seconds, absent until computed
    pub travel_time: Option<Seconds>,
}

impl RoadEdge {
    pub fn new(length: Meters) -> Self {
        Self {
            length: length.max(0.0),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_highway(mut self, highway: impl Into<TagValue>) -> Self {
        self.highway = Some(highway.into());
        self
    }

    #[must_use]
    pub fn with_maxspeed(mut self, maxspeed: impl Into<TagValue>) -> Self {
        self.maxspeed = Some(maxspeed.into());
        self
    }

    /// Normalized road class, if tagged
    pub fn highway_class(&self) -> Option<&str> {
        self.highway.as_ref().and_then(TagValue::first)
    }
}
