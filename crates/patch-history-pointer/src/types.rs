//! Type definitions for paths.

/// One step of a path: an object key, or an array index in decimal form.
pub type PathStep = String;

/// An ordered sequence of steps from the tree root to a node.
pub type Path = Vec<PathStep>;
