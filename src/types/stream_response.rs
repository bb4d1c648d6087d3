/// The result of reading a completion stream to its end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamResponse {
    /// Concatenated content of every decoded chunk, in arrival order.
    pub text: String,

    /// The first non-chunk `data:` payload, taken to be the job identifier.
    pub job_id: Option<String>,

    /// Whether any chunk carried `done: true`.
    pub done: bool,

    /// Number of chunks decoded.
    pub chunks: usize,

    /// Number of `event:` lines seen.
    pub events: usize,

    /// Number of lines that were neither chunks nor the job id.
    pub skipped: usize,
}

impl StreamResponse {
    /// Returns true if nothing was reconstructed.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
