//! Infrastructure Layer
//!
//! Adapters implementing the application ports, plus the inbound HTTP API:
//!
//! - **Driven Adapters (Outbound)**
//!   - `sources/`: trade data sources (Google Sheets, Airtable, Supabase, bot API, in-memory)
//!   - `bot/`: remote bot on/off control
//!   - `http_client`: retrying HTTP client shared by the REST adapters
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!
//! - **Wiring**
//!   - `container`: builds everything from configuration

pub mod bot;
pub mod container;
pub mod http;
pub mod http_client;
pub mod sources;
