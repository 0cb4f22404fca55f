/// ProgressReporter port for user feedback while a document is generated
///
/// Domain services never print; the use case reports listing, graph building
/// and resolution issues through this port.
pub trait ProgressReporter {
    /// Reports a step of the run
    fn report(&self, message: &str);

    /// Reports progress over a known number of items
    ///
    /// # Arguments
    /// * `current` - Items processed so far
    /// * `total` - Total number of items
    /// * `message` - Optional message shown next to the bar
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or an error that does not abort the run
    fn report_error(&self, message: &str);

    /// Reports the successful end of a step
    fn report_completion(&self, message: &str);
}
