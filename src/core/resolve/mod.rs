pub mod natives;
mod resolver;

pub use resolver::{
    reconstruct, DependencyResolver, FailedItem, ItemKind, ResolutionReport, ResolvedDependencySet,
};
