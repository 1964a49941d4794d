//! Floor-division zone partitioning.

use crate::error::Error;
use crate::network::NodeId;

/// Splits `nodes` into `zone_count` disjoint, equally sized zones.
///
/// With `zone_size = nodes.len() / zone_count`, zone `i` is the slice
/// `[i * zone_size, (i + 1) * zone_size)`. The `nodes.len() % zone_count`
/// trailing nodes belong to no zone.
///
/// # Errors
///
/// [`Error::InvalidConfig`] if `zone_count` is zero.
///
/// # Examples
///
/// ```
/// use u_signals::zone::partition;
///
/// let nodes: Vec<u64> = (0..10).collect();
/// let zones = partition(&nodes, 3).unwrap();
/// assert_eq!(zones, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
/// ```
pub fn partition(nodes: &[NodeId], zone_count: usize) -> Result<Vec<Vec<NodeId>>, Error> {
    if zone_count == 0 {
        return Err(Error::InvalidConfig("zone_count must be positive".into()));
    }
    let zone_size = nodes.len() / zone_count;
    Ok((0..zone_count)
        .map(|i| nodes[i * zone_size..(i + 1) * zone_size].to_vec())
        .collect())
}
