pub mod debounce;
pub mod feed;
pub mod player;
pub mod providers;
pub mod search;
pub mod session;

pub use search::{SearchCoordinator, SearchSettings, SearchSnapshot};
pub use session::{SearchHandle, SearchSession};
