//! Custom widget components

mod catalog;
mod challenge;
mod forms;
mod header;
mod status_bar;

pub use catalog::{ChallengeList, FilterSidebar, SearchInput};
pub use challenge::{ChallengePanel, DeploymentCard};
pub use forms::{LoginPanel, ProfilePanel, RegisterPanel};
pub use header::MainHeader;
pub use status_bar::StatusBar;
