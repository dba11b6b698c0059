pub mod arguments;
pub mod classpath;
pub mod command_line;
pub mod composer;
pub mod task;
pub mod variables;

pub use command_line::{quote_argument, LaunchPlan};
pub use composer::LaunchComposer;
pub use task::launch;
pub use variables::LaunchVariables;
