//! In-memory stand-ins for the remote API and the clock, for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::retry::Sleeper;
use crate::slack::{ApiResult, ChannelApi, ChannelPage, ChannelSummary};

#[derive(Default)]
pub(crate) struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Serves scripted listing pages and rename results in order. Once a script
/// runs out, listing returns an empty last page and renames succeed.
#[derive(Default)]
pub(crate) struct FakeApi {
    pages: RefCell<VecDeque<ApiResult<ChannelPage>>>,
    rename_script: RefCell<VecDeque<ApiResult<()>>>,
    list_calls: RefCell<Vec<String>>,
    renames: RefCell<Vec<(String, String)>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(self, page: ApiResult<ChannelPage>) -> Self {
        self.pages.borrow_mut().push_back(page);
        self
    }

    pub(crate) fn with_channels(self, channels: &[(&str, &str, bool)]) -> Self {
        self.with_page(Ok(page(channels, "")))
    }

    pub(crate) fn with_rename_script(self, script: Vec<ApiResult<()>>) -> Self {
        self.rename_script.borrow_mut().extend(script);
        self
    }

    pub(crate) fn list_calls(&self) -> Vec<String> {
        self.list_calls.borrow().clone()
    }

    pub(crate) fn renames(&self) -> Vec<(String, String)> {
        self.renames.borrow().clone()
    }
}

impl ChannelApi for FakeApi {
    fn list_channels(&self, cursor: &str, _limit: u32) -> ApiResult<ChannelPage> {
        self.list_calls.borrow_mut().push(cursor.to_string());
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ChannelPage::default()))
    }

    fn rename_channel(&self, channel_id: &str, new_name: &str) -> ApiResult<()> {
        self.renames
            .borrow_mut()
            .push((channel_id.to_string(), new_name.to_string()));
        self.rename_script.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

/// Build a page from `(id, name, is_archived)` triples.
pub(crate) fn page(channels: &[(&str, &str, bool)], next_cursor: &str) -> ChannelPage {
    ChannelPage {
        channels: channels
            .iter()
            .map(|(id, name, is_archived)| ChannelSummary {
                id: id.to_string(),
                name: name.to_string(),
                is_archived: *is_archived,
            })
            .collect(),
        next_cursor: next_cursor.to_string(),
    }
}
