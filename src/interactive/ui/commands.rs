/// Side effects requested by the state machine. Executed by the session
/// controller, which owns the store and the clipboard seam.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    None,
    /// Copy the currently filtered lines to the system clipboard.
    ExportFiltered,
    ShowMessage(String),
    ClearMessage,
    Quit,
}
