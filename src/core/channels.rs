//! Remote channel index.

use std::collections::HashMap;

use crate::error::Result;
use crate::retry::Sleeper;
use crate::settings::Settings;
use crate::slack::{ApiError, ChannelApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub is_archived: bool,
}

/// Channel name → info, for every public channel including archived ones.
pub type ChannelIndex = HashMap<String, ChannelInfo>;

/// Page through the whole public channel listing.
///
/// Rate-limited pages are retried after the signaled wait for as long as it
/// takes; any other failure aborts the fetch. Duplicate names keep the last
/// one seen.
pub fn fetch_public_channels<A, S>(
    api: &A,
    sleeper: &S,
    settings: &Settings,
) -> Result<ChannelIndex>
where
    A: ChannelApi + ?Sized,
    S: Sleeper + ?Sized,
{
    let mut index = ChannelIndex::new();
    let mut cursor = String::new();
    let mut pages = 0usize;

    loop {
        let page = match api.list_channels(&cursor, settings.page_limit) {
            Ok(page) => page,
            Err(ApiError::RateLimited(hint)) => {
                let wait = settings.backoff_for(hint);
                log_status!(
                    "fetch",
                    "rate limited while fetching channels, retrying after {:?}",
                    wait
                );
                sleeper.sleep(wait);
                continue;
            }
            Err(ApiError::Failed(err)) => return Err(err),
        };

        pages += 1;
        for channel in page.channels {
            index.insert(
                channel.name,
                ChannelInfo {
                    id: channel.id,
                    is_archived: channel.is_archived,
                },
            );
        }

        if page.next_cursor.is_empty() {
            break;
        }
        cursor = page.next_cursor;
    }

    log_status!(
        "fetch",
        "fetched {} public channels in {} page(s)",
        index.len(),
        pages
    );
    Ok(index)
}
