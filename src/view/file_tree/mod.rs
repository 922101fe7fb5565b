// Folder tree shown for the registered roots
//
// Nodes are produced on demand by the provider; the host decides how to draw
// them and when to ask for children.

pub mod node;
pub mod provider;

pub use node::{Collapsible, NodeKind, TreeNode};
pub use provider::{FolderTreeProvider, TreeRefresh};
