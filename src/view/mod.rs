pub mod engine;
pub mod error;
pub mod filter_order;
pub mod filter_where;
pub mod params;
pub mod state;
pub mod types;

pub use engine::compute_view;
pub use error::ViewError;
pub use params::ViewParams;
pub use state::{FetchTicket, ListViewState};
pub use types::*;
