//! OSM pbf processing

mod processor;

pub(crate) use processor::read_drivable_network;
