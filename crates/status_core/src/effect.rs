#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the published snapshot and replace the store with it.
    FetchSnapshot { request_id: crate::RequestId },
}
