/// Events produced by routing key input against the current mode. The state
/// machine consumes these; it never sees raw key codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    // Mode changes
    EnterSearch,
    LeaveSearch,

    // Query editing (Search mode)
    QueryChar(char),
    QueryBackspace,
    ConfirmQuery,

    // Cursor movement (Navigation mode)
    CursorUp,
    CursorDown,
    JumpToTop,
    JumpToBottom,

    // Cross-cutting
    ExportRequested,
    SetStatus(String),
    ClearStatus,
    Quit,
}
