/// Construction-time settings for an `AvlTree`.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::{AvlTree, Config};
///
/// let config = Config {
///     chunk_size: 64,
///     ..Config::default()
/// };
/// let tree: AvlTree<u32> = AvlTree::with_config(config);
/// assert_eq!(tree.config().chunk_size, 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of nodes allocated per arena chunk.
    pub chunk_size: usize,
    /// Whether deletion restores the height balance along the ancestor chain. When disabled,
    /// only insertion rotates and heights may drift out of balance after deletes.
    pub rebalance_on_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: 1024,
            rebalance_on_delete: true,
        }
    }
}
