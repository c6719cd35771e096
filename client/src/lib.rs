//! # Docket Client
//!
//! Blocking HTTP access to a Parse-style document store, built on
//! [`docket_engine`].
//!
//! - [`HttpTransport`] carries engine requests over `reqwest`
//! - [`Config`] loads credentials and the API root from the environment
//! - [`Address`] is a typed model over the `Address` collection
//!
//! ```no_run
//! use docket_client::{connect, Address, Config};
//! use docket_engine::Model;
//!
//! let config = Config::from_env()?;
//! let client = connect(&config)?;
//!
//! let mut address = Address::new();
//! address.set_name("Test name");
//! address.set_loc_info("zip", "75002")?;
//! address.save(&client)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod address;
pub mod config;
pub mod http;

pub use address::Address;
pub use config::{Config, ConfigError};
pub use http::HttpTransport;

use docket_engine::{Client, TransportError};

/// Build a client backed by a real HTTP transport.
pub fn connect(config: &Config) -> Result<Client<HttpTransport>, TransportError> {
    let transport = HttpTransport::new(config.timeout)?;
    Ok(Client::new(config.client.clone(), transport))
}
