//! Somfy RTS protocol engine for RFLink gateways.
//!
//! This is the layer applications use. Open a gateway, wait for it to
//! identify, read its sixteen RTS channel slots and drive blinds:
//!
//! ```no_run
//! # async fn demo() -> rflink_gateway::Result<()> {
//! use rflink_gateway::{connect, Intent};
//! use rflink_transport::SerialConfig;
//!
//! let gateway = connect(&SerialConfig::new("/dev/ttyACM0"))?;
//! gateway.connect_and_identify().await?;
//! gateway.enumerate_channels().await?;
//! let reply = gateway.send_command(3, Intent::Down).await?;
//! println!("gateway replied {reply}");
//! gateway.close().await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod connector;
pub mod error;
pub mod gateway;
pub mod message;
pub mod record;
pub mod registry;

pub use command::{Intent, LISTING_REQUEST};
pub use config::GatewayConfig;
pub use connector::{connect, connect_with_config};
pub use error::{GatewayError, ParseError, Result};
pub use gateway::{ConnectionState, Gateway};
pub use message::{DeviceInfo, Message};
pub use record::{Address, ChannelRecord, CHANNEL_IDS, UNINITIALIZED_ROLLING_CODE};
pub use registry::{Registry, CHANNEL_COUNT};
