pub mod config;
pub mod error;
pub mod model;
pub mod region;
pub mod size;
pub mod transport;

pub use config::Config;
pub use error::{ChronicleError, Result};
pub use transport::{HttpResponse, Method, Transport};
