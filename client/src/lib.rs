//! Job Search Client
//!
//! Opens one WebSocket per search against the job search server, sends a
//! single request and renders the streamed offers sorted by salary.

pub mod card;
pub mod config;
pub mod connection;
pub mod error;
pub mod results;
pub mod results_view;
pub mod session;
pub mod view;

pub use card::{Card, MatchTier};
pub use connection::{Connection, ConnectionEvent};
pub use error::{ClientError, Result};
pub use results::{ResultSet, SalaryStats};
pub use results_view::{Loader, ResultsView};
pub use session::SearchSession;
pub use view::{TerminalView, View};
