/// Last-known outcome of the scrape cycle.
///
/// `balance` keeps its last successful value when a scrape fails.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExporterState {
    pub up: bool,
    pub total_scrapes: u64,
    pub balance: f64,
}
