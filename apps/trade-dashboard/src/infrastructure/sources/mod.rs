//! Trade data source adapters.
//!
//! Every adapter implements [`TradeDataSourcePort`](crate::application::ports::TradeDataSourcePort);
//! [`ConfiguredSource`] picks one at start-up from configuration.

mod airtable;
mod bot_api;
mod configured;
mod google_sheets;
mod in_memory;
mod supabase;

use reqwest::Url;

use crate::application::ports::DataSourceError;

pub use airtable::AirtableSource;
pub use bot_api::BotApiSource;
pub use configured::ConfiguredSource;
pub use google_sheets::GoogleSheetsSource;
pub use in_memory::InMemoryTradeSource;
pub use supabase::SupabaseSource;

/// Append percent-encoded path segments to a base URL.
fn endpoint_url(base: &str, segments: &[&str]) -> Result<String, DataSourceError> {
    let invalid = |message: String| DataSourceError::InvalidResponse { message };

    let mut url =
        Url::parse(base.trim()).map_err(|e| invalid(format!("invalid base URL '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|()| invalid(format!("base URL '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}
