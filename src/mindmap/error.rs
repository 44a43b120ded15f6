use thiserror::Error;

use super::node::NodeId;

/// Why the graph store refused a mutation. The graph is left untouched.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GraphError {
    #[error("node limit of {limit} reached ({current} present, {requested} requested)")]
    Capacity {
        limit: usize,
        current: usize,
        requested: usize,
    },
    #[error("no usable words to add")]
    Empty,
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("the root node cannot be deleted")]
    RootDeletion,
    #[error("word must not be blank")]
    BlankWord,
    #[error("duplicate node id `{0}`")]
    DuplicateId(NodeId),
    #[error("graph has {0} root nodes, expected exactly one")]
    RootCount(usize),
    #[error("graph has {0} center nodes, expected exactly one")]
    CenterCount(usize),
    #[error("node `{0}` is not reachable from the root")]
    Unreachable(NodeId),
    #[error("root node `{0}` must not carry a category")]
    CategorizedRoot(NodeId),
    #[error("child node `{0}` has no category")]
    MissingCategory(NodeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddNodesReason {
    Capacity,
    Empty,
    Invalid,
}

/// The one error the engine reports upward: nodes could not be added.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AddNodesError {
    #[error("could not add nodes: the map already holds the maximum of {limit} nodes")]
    Capacity { limit: usize },
    #[error("could not add nodes: nothing to add")]
    Empty,
    #[error("could not add nodes: {0}")]
    Invalid(GraphError),
}

impl AddNodesError {
    pub fn reason(&self) -> AddNodesReason {
        match self {
            Self::Capacity { .. } => AddNodesReason::Capacity,
            Self::Empty => AddNodesReason::Empty,
            Self::Invalid(_) => AddNodesReason::Invalid,
        }
    }
}

impl From<GraphError> for AddNodesError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::Capacity { limit, .. } => Self::Capacity { limit },
            GraphError::Empty => Self::Empty,
            other => Self::Invalid(other),
        }
    }
}
