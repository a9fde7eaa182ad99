pub mod dataset;
pub mod graph;
pub mod node;

pub use graph::{GraphError, ScriptGraph};
pub use node::{AnswerRule, BranchChoice, Edge, PromptNode, StateId};
