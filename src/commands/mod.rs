pub mod rename;

pub type CmdResult<T> = channel_rename::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Print the JSON envelope instead of plain text.
    pub json: bool,
}
