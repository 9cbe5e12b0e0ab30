#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use channel_rename::retry::Sleeper;
use channel_rename::slack::{ApiResult, ChannelApi, ChannelPage, ChannelSummary};

/// Workspace stand-in: one listing page, scripted rename results.
#[derive(Default)]
pub struct Workspace {
    channels: Vec<ChannelSummary>,
    rename_script: RefCell<VecDeque<ApiResult<()>>>,
    pub list_calls: Cell<usize>,
    pub rename_calls: RefCell<Vec<(String, String)>>,
}

impl Workspace {
    pub fn with(channels: &[(&str, &str, bool)]) -> Self {
        Self {
            channels: channels
                .iter()
                .map(|(id, name, is_archived)| ChannelSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                    is_archived: *is_archived,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn script_renames(self, script: Vec<ApiResult<()>>) -> Self {
        self.rename_script.borrow_mut().extend(script);
        self
    }

    pub fn rename_count(&self) -> usize {
        self.rename_calls.borrow().len()
    }
}

impl ChannelApi for Workspace {
    fn list_channels(&self, _cursor: &str, _limit: u32) -> ApiResult<ChannelPage> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(ChannelPage {
            channels: self.channels.clone(),
            next_cursor: String::new(),
        })
    }

    fn rename_channel(&self, channel_id: &str, new_name: &str) -> ApiResult<()> {
        self.rename_calls
            .borrow_mut()
            .push((channel_id.to_string(), new_name.to_string()));
        self.rename_script.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

#[derive(Default)]
pub struct NoSleep {
    pub slept: RefCell<Vec<Duration>>,
}

impl Sleeper for NoSleep {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

pub fn plan_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
