/// Summary of one dispatch tick
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    pub lines: usize,
    pub updates: usize,
    pub malformed: usize,
    pub rows_written: usize,
    pub connection_errors: Vec<String>,
    pub recording_error: Option<String>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.lines == 0 && self.connection_errors.is_empty()
    }

    pub fn has_connection_error(&self) -> bool {
        !self.connection_errors.is_empty()
    }
}
