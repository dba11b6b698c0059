mod evaluator;
mod host;

pub use evaluator::{applies, OsRule, Rule, RuleAction};
pub use host::{HostDescriptor, OsFamily, PointerWidth};
