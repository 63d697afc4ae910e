//! JSON topology loading.
//!
//! # Format
//!
//! ```json
//! {
//!   "width": 24, "height": 24,
//!   "buildings": [[2, 2]],
//!   "parking": [[2, 14], [3, 21]],
//!   "traffic_lights": [
//!     {"lanes": [[8, 22], [8, 23]], "initial_state": "red",
//!      "monitored": [[9, 22], [10, 22]], "group": "sema_0"}
//!   ],
//!   "directions": {"up": [[0, 1]], "right": [[1, 9]]},
//!   "congestion_watches": [
//!     {"cell": [1, 9], "direction": "right", "area": [[2, 9]], "threshold": 10}
//!   ]
//! }
//! ```
//!
//! Coordinates are `[x, y]` pairs.  Every list except `width`/`height` may
//! be omitted.  See [`TopologyConfig`] for defaults.

use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::GridResult;
use crate::topology::{Topology, TopologyConfig};

impl Topology {
    /// Parse and validate a topology from a JSON string.
    pub fn from_json_str(json: &str) -> GridResult<Topology> {
        let config: TopologyConfig = serde_json::from_str(json)?;
        Topology::from_config(&config)
    }

    /// Like [`from_json_str`](Self::from_json_str) but reads any `Read`
    /// source.
    pub fn from_json_reader<R: Read>(reader: R) -> GridResult<Topology> {
        let config: TopologyConfig = serde_json::from_reader(BufReader::new(reader))?;
        Topology::from_config(&config)
    }

    /// Load and validate a topology JSON file.
    pub fn load_json(path: &Path) -> GridResult<Topology> {
        let file = std::fs::File::open(path)?;
        log::debug!("loading topology from {}", path.display());
        Topology::from_json_reader(file)
    }
}
